pub mod cloth;
pub mod collider;
pub mod config;
pub mod constraint;
pub mod controller_message;
pub mod error;
pub mod particle;
pub mod world;

pub type V3 = nalgebra::Vector3<f32>;
