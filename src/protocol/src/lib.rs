pub mod frame_model;

pub type V3 = nalgebra::Vector3<f32>;
