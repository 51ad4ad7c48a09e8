use crate::error::ClothError;

/// Fixed per-frame simulation constants.
///
/// The iteration count trades stiffness against cost: fewer passes leave
/// the cloth visibly stretchy, more approach rigidity.
#[derive(Clone, Copy, Debug)]
pub struct SimConfig {
	pub damping: f32,
	/// Squared integration step.
	pub step2: f32,
	pub iterations: usize,
}

impl Default for SimConfig {
	fn default() -> Self {
		Self {
			damping: 0.01,
			step2: 0.5 * 0.5,
			iterations: 15,
		}
	}
}

impl SimConfig {
	pub fn with_damping(mut self, damping: f32) -> Self {
		self.damping = damping;
		self
	}

	pub fn with_step2(mut self, step2: f32) -> Self {
		self.step2 = step2;
		self
	}

	pub fn with_iterations(mut self, iterations: usize) -> Self {
		self.iterations = iterations;
		self
	}

	pub fn validate(&self) -> Result<(), ClothError> {
		if !(0f32..1f32).contains(&self.damping) {
			return Err(ClothError::BadConfig(format!(
				"damping {} outside [0, 1)",
				self.damping
			)));
		}
		if !(self.step2 > 0f32 && self.step2.is_finite()) {
			return Err(ClothError::BadConfig(format!(
				"non-positive step2 {}",
				self.step2
			)));
		}
		if self.iterations == 0 {
			return Err(ClothError::BadConfig("zero iterations".to_string()));
		}
		Ok(())
	}
}

#[cfg(test)]
mod test {
	use super::*;

	#[test]
	fn test_default_is_valid() {
		assert!(SimConfig::default().validate().is_ok());
	}

	#[test]
	fn test_validate_rejects_bad_constants() {
		assert!(SimConfig::default().with_damping(1.5).validate().is_err());
		assert!(SimConfig::default().with_damping(-0.1).validate().is_err());
		assert!(SimConfig::default().with_step2(0.).validate().is_err());
		assert!(SimConfig::default()
			.with_step2(f32::INFINITY)
			.validate()
			.is_err());
		assert!(SimConfig::default().with_iterations(0).validate().is_err());
	}
}
