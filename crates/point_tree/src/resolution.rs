//! Outcome of resolving a coordinate vector.

use std::sync::Arc;

/// Outcome of [`crate::PointTree::get`] or [`crate::PointTree::get_or_create`].
///
/// Failure variants carry the zero-based dimension index where resolution
/// stopped.
#[derive(Debug)]
pub enum Resolution<V> {
	/// A new point was created and published for this exact vector.
	NewlyCreated(Arc<V>),
	/// The vector already resolved to a point.
	AlreadyExisted(Arc<V>),
	/// The vector does not resolve and creation was not requested.
	NotFoundNoCreate { dimension: usize },
	/// A new value at `dimension` would exceed that level's cardinality limit.
	DimensionCardinalityExceeded { dimension: usize },
	/// A new point would exceed the owner's total point limit.
	TotalCountExceeded { dimension: usize },
}

/// Payload-free mirror of [`Resolution`], used for matching and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Status {
	NewlyCreated,
	AlreadyExisted,
	NotFoundNoCreate,
	DimensionCardinalityExceeded,
	TotalCountExceeded,
}

impl Status {
	/// Returns true for the two limit-driven statuses.
	pub const fn is_capacity_exhausted(self) -> bool {
		matches!(self, Self::DimensionCardinalityExceeded | Self::TotalCountExceeded)
	}
}

impl<V> Resolution<V> {
	pub const fn status(&self) -> Status {
		match self {
			Self::NewlyCreated(_) => Status::NewlyCreated,
			Self::AlreadyExisted(_) => Status::AlreadyExisted,
			Self::NotFoundNoCreate { .. } => Status::NotFoundNoCreate,
			Self::DimensionCardinalityExceeded { .. } => Status::DimensionCardinalityExceeded,
			Self::TotalCountExceeded { .. } => Status::TotalCountExceeded,
		}
	}

	/// Returns the resolved point, if any.
	pub fn point(&self) -> Option<&Arc<V>> {
		match self {
			Self::NewlyCreated(point) | Self::AlreadyExisted(point) => Some(point),
			_ => None,
		}
	}

	/// Consumes the resolution, returning the resolved point, if any.
	pub fn into_point(self) -> Option<Arc<V>> {
		match self {
			Self::NewlyCreated(point) | Self::AlreadyExisted(point) => Some(point),
			_ => None,
		}
	}

	/// Returns the dimension index a failed resolution stopped at.
	pub const fn dimension(&self) -> Option<usize> {
		match self {
			Self::NotFoundNoCreate { dimension }
			| Self::DimensionCardinalityExceeded { dimension }
			| Self::TotalCountExceeded { dimension } => Some(*dimension),
			Self::NewlyCreated(_) | Self::AlreadyExisted(_) => None,
		}
	}

	/// Returns true when a point was resolved, new or existing.
	pub const fn is_found(&self) -> bool {
		matches!(self, Self::NewlyCreated(_) | Self::AlreadyExisted(_))
	}

	/// Returns true when this call published the point.
	pub const fn is_created(&self) -> bool {
		matches!(self, Self::NewlyCreated(_))
	}
}
