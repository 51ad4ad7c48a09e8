use tracing::warn;

use crate::constraint::{jitter, Constraint, LinkKind};
use crate::particle::PointMass;

/// Distance-preserving link between two point masses. The rest distance is
/// captured from the endpoint separation at build time and never changes.
#[derive(Clone, Debug)]
pub struct DistanceLink {
	a: usize,
	b: usize,
	rest: f32,
	kind: LinkKind,
}

impl DistanceLink {
	pub fn new(particles: &[PointMass], a: usize, b: usize) -> Self {
		let rest =
			(particles[a].get_pos() - particles[b].get_pos()).magnitude();
		Self {
			a,
			b,
			rest,
			kind: LinkKind::Structural,
		}
	}

	pub fn with_kind(mut self, kind: LinkKind) -> Self {
		self.kind = kind;
		self
	}

	pub fn build(self) -> Box<dyn Constraint> {
		Box::new(self)
	}

	pub fn rest_distance(&self) -> f32 {
		self.rest
	}

	/// Absolute violation of the rest distance.
	pub fn deviation(&self, particles: &[PointMass]) -> f32 {
		let dp = particles[self.b].get_pos() - particles[self.a].get_pos();
		(dp.magnitude() - self.rest).abs()
	}
}

impl Constraint for DistanceLink {
	fn relax(&self, particles: &mut [PointMass]) {
		let a_to_b = particles[self.b].get_pos() - particles[self.a].get_pos();
		let l = a_to_b.magnitude();
		if !l.is_normal() {
			warn!("bad link length {}", l);
			particles[self.a].offset_pos(jitter());
			particles[self.b].offset_pos(jitter());
			return;
		}
		// move both endpoints half way toward the rest distance; a pinned
		// endpoint refuses its half and the other side absorbs the full
		// correction over repeated passes
		let correction = a_to_b * (1f32 - self.rest / l) * 0.5;
		particles[self.a].offset_pos(correction);
		particles[self.b].offset_pos(-correction);
	}

	fn kind(&self) -> LinkKind {
		self.kind
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use crate::V3;
	use approx::assert_relative_eq;

	fn pair(pa: V3, pb: V3) -> Vec<PointMass> {
		vec![PointMass::new(pa), PointMass::new(pb)]
	}

	#[test]
	fn test_relax_restores_rest_distance() {
		let mut ps = pair(V3::zeros(), V3::new(1., 0., 0.));
		let link = DistanceLink::new(&ps, 0, 1);
		assert_relative_eq!(link.rest_distance(), 1.);
		// stretch the pair, a lone link solves in one symmetric pass
		ps[1].offset_pos(V3::new(2., 0., 0.));
		link.relax(&mut ps);
		assert_relative_eq!(link.deviation(&ps), 0., epsilon = 1e-6);
		assert_relative_eq!(ps[0].get_pos()[0], 1., epsilon = 1e-6);
		assert_relative_eq!(ps[1].get_pos()[0], 2., epsilon = 1e-6);
	}

	#[test]
	fn test_relax_monotone_deviation() {
		let mut ps = pair(V3::zeros(), V3::new(0., -2., 0.));
		let link = DistanceLink::new(&ps, 0, 1);
		ps[1].offset_pos(V3::new(0.3, 1.1, -0.4));
		let mut last = link.deviation(&ps);
		for _ in 0..20 {
			link.relax(&mut ps);
			let dev = link.deviation(&ps);
			assert!(dev <= last + 1e-6);
			last = dev;
		}
		assert_relative_eq!(last, 0., epsilon = 1e-5);
	}

	#[test]
	fn test_pinned_endpoint_absorbs_correction() {
		let mut ps = pair(V3::zeros(), V3::new(1., 0., 0.));
		ps[0].pin();
		let link = DistanceLink::new(&ps, 0, 1);
		ps[1].offset_pos(V3::new(1., 0., 0.));
		// each pass halves the violation on the free endpoint only
		link.relax(&mut ps);
		assert_eq!(ps[0].get_pos(), V3::zeros());
		assert_relative_eq!(ps[1].get_pos()[0], 1.5, epsilon = 1e-6);
		for _ in 0..40 {
			link.relax(&mut ps);
		}
		assert_eq!(ps[0].get_pos(), V3::zeros());
		assert_relative_eq!(ps[1].get_pos()[0], 1., epsilon = 1e-4);
	}

	#[test]
	fn test_coincident_endpoints_recover() {
		let mut ps = pair(V3::zeros(), V3::new(1., 0., 0.));
		let link = DistanceLink::new(&ps, 0, 1);
		ps[1].offset_pos(V3::new(-1., 0., 0.));
		for _ in 0..10 {
			link.relax(&mut ps);
			for p in ps.iter() {
				assert!(p.get_pos().iter().all(|c| c.is_finite()));
			}
		}
		// the jitter split the pair, relaxation pulls it back apart
		assert!(link.deviation(&ps) < 1.);
	}
}
