//! Usage errors raised at the tree boundary.

use thiserror::Error;

/// Errors returned before a tree operation touches any state.
///
/// Capacity limits and creation races are not errors; they are reported
/// through [`crate::Resolution`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TreeError {
	/// The coordinate vector length differs from the owner's dimension count.
	#[error("expected {expected} coordinates, got {actual}")]
	DimensionMismatch {
		/// Dimension count declared by the owner.
		expected: usize,
		/// Length of the vector supplied by the caller.
		actual: usize,
	},

	/// The owner passed to an operation declares a different dimension count
	/// than the owner the tree was built from.
	#[error("tree has {expected} dimensions, owner declares {actual}")]
	OwnerMismatch {
		/// Dimension count the tree was built with.
		expected: usize,
		/// Dimension count declared by the owner passed in.
		actual: usize,
	},

	/// The owner declares zero dimensions, so no tree shape exists.
	#[error("point tree requires at least one dimension")]
	NoDimensions,
}

/// Result type for tree operations.
pub type Result<T> = std::result::Result<T, TreeError>;
