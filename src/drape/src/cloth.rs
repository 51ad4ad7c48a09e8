use tracing::info;

use crate::collider::{Collider, Cube, Sphere};
use crate::config::SimConfig;
use crate::constraint::distance::DistanceLink;
use crate::constraint::{Constraint, LinkKind};
use crate::error::ClothError;
use crate::particle::PointMass;
use crate::V3;
use protocol::frame_model::{FrameModel, FrameTriangle};

/// A rectangular cloth mesh: a flat grid of point masses tied together by
/// distance links. Topology is fixed after construction, only positions
/// change.
///
/// Each grid cell spans two triangles:
///
/// ```text
/// (x,y)   *--* (x+1,y)
///         | /|
///         |/ |
/// (x,y+1) *--* (x+1,y+1)
/// ```
#[derive(Clone)]
pub struct Cloth {
	nx: usize,
	ny: usize,
	particles: Vec<PointMass>,
	links: Vec<Box<dyn Constraint>>,
}

impl Cloth {
	/// Lay `nx * ny` particles over `[0, width] x [0, -height]` and wire
	/// the structural, shear and bend link passes.
	pub fn new(
		width: f32,
		height: f32,
		nx: usize,
		ny: usize,
	) -> Result<Self, ClothError> {
		if nx < 2 || ny < 2 {
			return Err(ClothError::GridTooSmall(nx, ny));
		}
		if !(width > 0f32 && width.is_finite())
			|| !(height > 0f32 && height.is_finite())
		{
			return Err(ClothError::BadSize(width, height));
		}
		let mut particles = Vec::with_capacity(nx * ny);
		for y in 0..ny {
			for x in 0..nx {
				let pos = V3::new(
					width * x as f32 / nx as f32,
					-height * y as f32 / ny as f32,
					0f32,
				);
				particles.push(PointMass::new(pos));
			}
		}
		let mut cloth = Self {
			nx,
			ny,
			particles,
			links: Vec::new(),
		};
		// structural: immediate axis-aligned neighbors
		for x in 0..nx {
			for y in 0..ny {
				if x < nx - 1 {
					cloth.link(x, y, x + 1, y, LinkKind::Structural);
				}
				if y < ny - 1 {
					cloth.link(x, y, x, y + 1, LinkKind::Structural);
				}
			}
		}
		// shear: the two diagonals of every cell
		for x in 0..nx - 1 {
			for y in 0..ny - 1 {
				cloth.link(x, y, x + 1, y + 1, LinkKind::Shear);
				cloth.link(x + 1, y, x, y + 1, LinkKind::Shear);
			}
		}
		// bend: distance-2 neighbors, axis-aligned and diagonal
		for x in 0..nx {
			for y in 0..ny {
				if x < nx - 2 {
					cloth.link(x, y, x + 2, y, LinkKind::Bend);
				}
				if y < ny - 2 {
					cloth.link(x, y, x, y + 2, LinkKind::Bend);
				}
				if x < nx - 2 && y < ny - 2 {
					cloth.link(x, y, x + 2, y + 2, LinkKind::Bend);
					cloth.link(x + 2, y, x, y + 2, LinkKind::Bend);
				}
			}
		}
		info!(
			"add cloth: {} particles, {} links",
			cloth.particles.len(),
			cloth.links.len(),
		);
		Ok(cloth)
	}

	/// Displace the `x = 0` column by `offset`, then pin it, giving the
	/// cloth a hanging, non-degenerate initial pose.
	pub fn with_pinned_edge(mut self, offset: V3) -> Self {
		for y in 0..self.ny {
			let idx = self.index(0, y);
			self.particles[idx].offset_pos(offset);
			self.particles[idx].pin();
		}
		self
	}

	fn index(&self, x: usize, y: usize) -> usize {
		debug_assert!(x < self.nx && y < self.ny);
		y * self.nx + x
	}

	fn link(&mut self, x1: usize, y1: usize, x2: usize, y2: usize, kind: LinkKind) {
		let a = self.index(x1, y1);
		let b = self.index(x2, y2);
		let link = DistanceLink::new(&self.particles, a, b).with_kind(kind);
		self.links.push(link.build());
	}

	pub fn nx(&self) -> usize {
		self.nx
	}

	pub fn ny(&self) -> usize {
		self.ny
	}

	pub fn particle(&self, x: usize, y: usize) -> &PointMass {
		&self.particles[self.index(x, y)]
	}

	pub fn particle_mut(&mut self, x: usize, y: usize) -> &mut PointMass {
		let idx = self.index(x, y);
		&mut self.particles[idx]
	}

	pub fn particles(&self) -> &[PointMass] {
		&self.particles
	}

	pub fn links(&self) -> impl Iterator<Item = &dyn Constraint> + '_ {
		self.links.iter().map(|l| l.as_ref())
	}

	pub fn pin(&mut self, x: usize, y: usize) {
		let idx = self.index(x, y);
		self.particles[idx].pin();
	}

	/// Accumulate a uniform force (gravity) into every particle.
	pub fn add_force(&mut self, direction: V3) {
		for p in self.particles.iter_mut() {
			p.add_force(direction);
		}
	}

	/// Per-triangle aerodynamic force: the unnormalized face normal scales
	/// the force by triangle area, its direction cosine against the wind
	/// sets the sign and magnitude. All three corners receive the same
	/// force.
	pub fn add_wind(&mut self, direction: V3) {
		for x in 0..self.nx - 1 {
			for y in 0..self.ny - 1 {
				let (t1, t2) = self.quad_triangles(x, y);
				self.add_wind_for_triangle(t1, direction);
				self.add_wind_for_triangle(t2, direction);
			}
		}
	}

	fn add_wind_for_triangle(&mut self, tri: [usize; 3], direction: V3) {
		let normal = self.triangle_normal(tri);
		let d = match normal.try_normalize(f32::EPSILON) {
			Some(d) => d,
			// zero-area triangle, no drag
			None => return,
		};
		let force = normal * d.dot(&direction);
		for idx in tri {
			self.particles[idx].add_force(force);
		}
	}

	fn triangle_normal(&self, tri: [usize; 3]) -> V3 {
		let p1 = self.particles[tri[0]].get_pos();
		let p2 = self.particles[tri[1]].get_pos();
		let p3 = self.particles[tri[2]].get_pos();
		(p2 - p1).cross(&(p3 - p1))
	}

	/// The two triangles of quad `(x, y)`, in the winding the renderer
	/// depends on.
	fn quad_triangles(&self, x: usize, y: usize) -> ([usize; 3], [usize; 3]) {
		let t1 = [
			self.index(x + 1, y),
			self.index(x, y),
			self.index(x, y + 1),
		];
		let t2 = [
			self.index(x + 1, y + 1),
			self.index(x + 1, y),
			self.index(x, y + 1),
		];
		(t1, t2)
	}

	/// One integration step: the full link set is relaxed
	/// `config.iterations` times, then every particle integrates exactly
	/// once.
	pub fn step(&mut self, config: &SimConfig) {
		for _ in 0..config.iterations {
			for link in self.links.iter() {
				link.relax(&mut self.particles);
			}
		}
		for p in self.particles.iter_mut() {
			p.integrate(config.damping, config.step2);
		}
	}

	pub fn resolve_collision(&mut self, collider: &Collider) {
		for p in self.particles.iter_mut() {
			if let Some(dp) = collider.project(p.get_pos()) {
				p.offset_pos(dp);
			}
		}
	}

	pub fn resolve_sphere_collision(&mut self, center: V3, radius: f32) {
		self.resolve_collision(&Collider::Sphere(Sphere { center, radius }));
	}

	pub fn resolve_cube_collision(&mut self, center: V3, size: f32) {
		self.resolve_collision(&Collider::Cube(Cube { center, size }));
	}

	/// Rebuild the smoothed per-vertex normals from current positions.
	/// Pure in the positions: recomputing without motion yields identical
	/// normals.
	pub fn recompute_normals(&mut self) {
		for p in self.particles.iter_mut() {
			p.reset_normal();
		}
		for x in 0..self.nx - 1 {
			for y in 0..self.ny - 1 {
				let (t1, t2) = self.quad_triangles(x, y);
				for tri in [t1, t2] {
					let normal = self.triangle_normal(tri);
					for idx in tri {
						self.particles[idx].add_to_normal(normal);
					}
				}
			}
		}
	}

	/// Snapshot for the external renderer: particle positions and
	/// smoothed normals in grid order plus the fixed triangle list.
	pub fn frame_model(&self) -> FrameModel {
		let particles = self.particles.iter().map(|p| p.render()).collect();
		let mut triangles =
			Vec::with_capacity(2 * (self.nx - 1) * (self.ny - 1));
		for x in 0..self.nx - 1 {
			for y in 0..self.ny - 1 {
				let (t1, t2) = self.quad_triangles(x, y);
				triangles.push(FrameTriangle { ids: t1 });
				triangles.push(FrameTriangle { ids: t2 });
			}
		}
		FrameModel {
			nx: self.nx,
			ny: self.ny,
			particles,
			triangles,
		}
	}
}
