// Rigid scene primitives the cloth collides against. Both push an interior
// point outward along the direction from the collider center to the point,
// by (threshold - distance), so a point lands on or converges to the
// surface.

use crate::V3;

#[derive(Clone, Copy, Debug)]
pub struct Sphere {
	pub center: V3,
	pub radius: f32,
}

impl Sphere {
	/// Offset that projects `p` onto the surface, `None` when `p` is
	/// already at or outside it, or coincides with the center.
	pub fn project(&self, p: V3) -> Option<V3> {
		let v = p - self.center;
		let l = v.magnitude();
		if l >= self.radius {
			return None;
		}
		let dir = v.try_normalize(f32::EPSILON)?;
		Some(dir * (self.radius - l))
	}
}

/// Axis-aligned cube given by center and half extent. Uses the L-inf
/// metric, so the interior test is exact while the push-out direction
/// stays radial.
#[derive(Clone, Copy, Debug)]
pub struct Cube {
	pub center: V3,
	pub size: f32,
}

impl Cube {
	pub fn project(&self, p: V3) -> Option<V3> {
		let v = p - self.center;
		let l = v.amax();
		if l >= self.size {
			return None;
		}
		let dir = v.try_normalize(f32::EPSILON)?;
		Some(dir * (self.size - l))
	}
}

#[derive(Clone, Copy, Debug)]
pub enum Collider {
	Sphere(Sphere),
	Cube(Cube),
}

impl Collider {
	pub fn project(&self, p: V3) -> Option<V3> {
		match self {
			Self::Sphere(s) => s.project(p),
			Self::Cube(c) => c.project(p),
		}
	}
}

#[cfg(test)]
mod test {
	use super::*;
	use approx::assert_relative_eq;

	#[test]
	fn test_sphere_projects_to_surface() {
		let sphere = Sphere {
			center: V3::zeros(),
			radius: 2.,
		};
		// interior point at distance 0.5 lands at distance 2 exactly,
		// on its original radial direction
		let p = V3::new(0.3, 0.4, 0.);
		let q = p + sphere.project(p).unwrap();
		assert_relative_eq!(q.magnitude(), 2., epsilon = 1e-6);
		assert_relative_eq!(q.cross(&p).magnitude(), 0., epsilon = 1e-6);
		assert!(q.dot(&p) > 0.);
	}

	#[test]
	fn test_sphere_exterior_untouched() {
		let sphere = Sphere {
			center: V3::new(1., 0., 0.),
			radius: 1.,
		};
		assert!(sphere.project(V3::new(3., 0., 0.)).is_none());
		// a point exactly on the surface is already resolved
		assert!(sphere.project(V3::new(2., 0., 0.)).is_none());
	}

	#[test]
	fn test_sphere_degenerate_center_skipped() {
		let sphere = Sphere {
			center: V3::new(1., 1., 1.),
			radius: 2.,
		};
		assert!(sphere.project(V3::new(1., 1., 1.)).is_none());
	}

	#[test]
	fn test_cube_pushes_out_on_axis() {
		let cube = Cube {
			center: V3::zeros(),
			size: 2.,
		};
		// on-axis interior point lands on the face exactly
		let p = V3::new(0.5, 0., 0.);
		let q = p + cube.project(p).unwrap();
		assert_relative_eq!(q[0], 2., epsilon = 1e-6);
		assert!(cube.project(q).is_none());
	}

	#[test]
	fn test_cube_off_axis_converges() {
		let cube = Cube {
			center: V3::zeros(),
			size: 1.,
		};
		let mut p = V3::new(0.4, 0.2, -0.1);
		for _ in 0..50 {
			match cube.project(p) {
				Some(dp) => p += dp,
				None => break,
			}
		}
		assert_relative_eq!(p.amax(), 1., epsilon = 1e-3);
	}

	#[test]
	fn test_cube_exterior_untouched() {
		let cube = Cube {
			center: V3::zeros(),
			size: 1.,
		};
		// Chebyshev metric: euclidean distance may exceed the extent
		// while a corner region still counts as interior
		assert!(cube.project(V3::new(0.9, 0.9, 0.9)).is_some());
		assert!(cube.project(V3::new(1.1, 0., 0.)).is_none());
	}
}
