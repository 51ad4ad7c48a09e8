// frame_model: cloth state snapshot for rendering

use serde::{Deserialize, Serialize};

use crate::V3;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FrameParticle {
	pub pos: [f32; 3],
	pub normal: [f32; 3],
}

impl FrameParticle {
	pub fn new(pos: V3, normal: V3) -> Self {
		Self {
			pos: pos.into(),
			normal: normal.into(),
		}
	}
}

/// Vertex ids into `FrameModel::particles`, in the winding order the
/// renderer shades with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameTriangle {
	pub ids: [usize; 3],
}

/// One frame of cloth state. Particles are stored in grid order,
/// `id = y * nx + x`; triangles enumerate quads column by column.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FrameModel {
	pub nx: usize,
	pub ny: usize,
	pub particles: Vec<FrameParticle>,
	pub triangles: Vec<FrameTriangle>,
}
