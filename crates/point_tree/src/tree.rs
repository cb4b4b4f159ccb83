use std::hash::Hash;
use std::sync::Arc;

use crate::level::DimensionLevel;
use crate::{PointOwner, Resolution, TreeError};

/// Lazily built map from coordinate vectors to shared points.
///
/// The tree does not hold its owner; every operation borrows it, which lets
/// the owner embed the tree without a reference cycle. An owner whose
/// dimension count differs from the one the tree was built with is rejected.
pub struct PointTree<K, V> {
	dimension_count: usize,
	root: DimensionLevel<K, V>,
}

impl<K, V> PointTree<K, V>
where
	K: Eq + Hash + Clone,
{
	/// Creates an empty tree shaped by `owner`.
	pub fn new<O: PointOwner<K, V> + ?Sized>(owner: &O) -> crate::Result<Self> {
		let dimension_count = owner.dimension_count();
		if dimension_count == 0 {
			return Err(TreeError::NoDimensions);
		}
		Ok(Self {
			dimension_count,
			root: DimensionLevel::new(owner, 0, dimension_count),
		})
	}

	pub const fn dimension_count(&self) -> usize {
		self.dimension_count
	}

	/// Returns the point for `coordinates`, creating it when absent.
	pub fn get_or_create<O>(&self, owner: &O, coordinates: &[K]) -> crate::Result<Resolution<V>>
	where
		O: PointOwner<K, V> + ?Sized,
	{
		self.resolve(owner, coordinates, true)
	}

	/// Returns the point for `coordinates` without creating anything.
	pub fn get<O>(&self, owner: &O, coordinates: &[K]) -> crate::Result<Resolution<V>>
	where
		O: PointOwner<K, V> + ?Sized,
	{
		self.resolve(owner, coordinates, false)
	}

	fn resolve<O>(&self, owner: &O, coordinates: &[K], create: bool) -> crate::Result<Resolution<V>>
	where
		O: PointOwner<K, V> + ?Sized,
	{
		if owner.dimension_count() != self.dimension_count {
			return Err(TreeError::OwnerMismatch {
				expected: self.dimension_count,
				actual: owner.dimension_count(),
			});
		}
		if coordinates.len() != self.dimension_count {
			return Err(TreeError::DimensionMismatch {
				expected: self.dimension_count,
				actual: coordinates.len(),
			});
		}
		Ok(self.root.resolve(owner, coordinates, create))
	}

	/// Collects every published point with its full coordinate vector.
	///
	/// Not atomic with respect to concurrent creation: points published while
	/// the walk runs may or may not appear.
	pub fn all_points(&self) -> Vec<(Vec<K>, Arc<V>)> {
		let mut out = Vec::new();
		let mut prefix = Vec::with_capacity(self.dimension_count);
		self.root.collect_points(&mut prefix, &mut out);
		out
	}

	/// Number of distinct values published at the level reached by `path`.
	///
	/// An empty `path` addresses the root. Returns `None` when `path` does not
	/// resolve to a published level.
	pub fn cardinality(&self, path: &[K]) -> Option<usize> {
		if path.len() >= self.dimension_count {
			return None;
		}
		let Some((first, rest)) = path.split_first() else {
			return Some(self.root.len());
		};
		let mut level = self.root.child_level(first)?;
		for key in rest {
			level = level.child_level(key)?;
		}
		Some(level.len())
	}
}

#[cfg(test)]
mod tests;
