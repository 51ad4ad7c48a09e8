pub mod distance;

use dyn_clone::DynClone;

use crate::particle::PointMass;
use crate::V3;

/// Grid adjacency category of a link. Structural links resist stretch,
/// shear links resist in-plane skew, bend links resist folding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkKind {
	Structural,
	Shear,
	Bend,
}

/// A positional constraint over the mesh's particle storage. Constraints
/// address particles by index, the storage never reallocates after
/// construction.
pub trait Constraint: DynClone + Send {
	/// One relaxation pass. Repeated passes approximate satisfaction,
	/// a single pass does not solve exactly.
	fn relax(&self, particles: &mut [PointMass]);

	fn kind(&self) -> LinkKind;
}

dyn_clone::clone_trait_object!(Constraint);

// small random displacement used to split coincident particles
pub(crate) fn jitter() -> V3 {
	V3::new(
		rand::random::<f32>() - 0.5,
		rand::random::<f32>() - 0.5,
		rand::random::<f32>() - 0.5,
	) * 1e-4
}
