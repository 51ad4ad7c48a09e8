use thiserror::Error;

/// Construction and configuration failures. The per-frame simulation step
/// itself never fails, frames always complete.
#[derive(Debug, Error)]
pub enum ClothError {
	#[error("cloth grid {0}x{1} is too small, need at least 2x2")]
	GridTooSmall(usize, usize),
	#[error("cloth size {0}x{1} must be positive and finite")]
	BadSize(f32, f32),
	#[error("bad simulation config: {0}")]
	BadConfig(String),
}
