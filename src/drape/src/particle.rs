use crate::V3;
use protocol::frame_model::FrameParticle;

/// Verlet point mass. Velocity is implicit in the distance between the
/// current and previous position.
#[derive(Clone, Debug)]
pub struct PointMass {
	pos: V3,
	ppos: V3,
	accel: V3,
	normal: V3,
	mass: f32,
	movable: bool,
}

impl PointMass {
	pub fn new(pos: V3) -> Self {
		Self {
			pos,
			ppos: pos,
			accel: V3::zeros(),
			normal: V3::zeros(),
			mass: 1f32,
			movable: true,
		}
	}

	pub fn get_pos(&self) -> V3 {
		self.pos
	}

	pub fn get_accel(&self) -> V3 {
		self.accel
	}

	/// Pinned particles keep accumulating force; `integrate` discards it.
	pub fn add_force(&mut self, f: V3) {
		self.accel += f / self.mass;
	}

	pub fn integrate(&mut self, damping: f32, step2: f32) {
		if self.movable {
			let ppos = self.pos;
			self.pos +=
				(self.pos - self.ppos) * (1f32 - damping) + self.accel * step2;
			self.ppos = ppos;
		}
		// reset even when pinned, anchors must not bank force across frames
		self.accel = V3::zeros();
	}

	/// Direct position change, bypassing integration. Relaxation and
	/// collision projection go through here, so pinned particles silently
	/// refuse both.
	pub fn offset_pos(&mut self, dp: V3) {
		if self.movable {
			self.pos += dp;
		}
	}

	pub fn pin(&mut self) {
		self.movable = false;
	}

	pub fn unpin(&mut self) {
		self.movable = true;
	}

	pub fn is_movable(&self) -> bool {
		self.movable
	}

	/// Position change of the last integration step.
	pub fn velocity(&self) -> V3 {
		self.pos - self.ppos
	}

	pub fn add_to_normal(&mut self, n: V3) {
		if let Some(n) = n.try_normalize(f32::EPSILON) {
			self.normal += n;
		}
	}

	pub fn reset_normal(&mut self) {
		self.normal = V3::zeros();
	}

	/// Smoothed vertex normal, zero while no face normal has been
	/// accumulated.
	pub fn get_normal(&self) -> V3 {
		self.normal.try_normalize(f32::EPSILON).unwrap_or_else(V3::zeros)
	}

	pub fn render(&self) -> FrameParticle {
		FrameParticle::new(self.pos, self.get_normal())
	}
}
