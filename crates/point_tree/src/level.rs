//! Tree levels and the reservation-first creation protocol.

use std::hash::Hash;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use rustc_hash::FxBuildHasher;

use crate::reservation::{PointReservation, SlotReservation};
use crate::{PointOwner, Resolution};

type ChildMap<K, T> = DashMap<K, Arc<T>, FxBuildHasher>;

/// Children of one level, keyed by the coordinate value at its dimension.
///
/// The last dimension holds points; every other dimension holds levels.
enum Children<K, V> {
	Internal(ChildMap<K, DimensionLevel<K, V>>),
	Terminal(ChildMap<K, V>),
}

/// One node of the tree, covering a single dimension index.
///
/// `created` counts keys durably inserted into `children` plus reservations
/// still in flight. It never exceeds `limit`, and equals the map size once
/// in-flight creations at this level have finished.
pub(crate) struct DimensionLevel<K, V> {
	dimension: usize,
	dimension_count: usize,
	limit: usize,
	children: Children<K, V>,
	created: AtomicUsize,
}

impl<K, V> DimensionLevel<K, V>
where
	K: Eq + Hash + Clone,
{
	/// Creates an empty, unpublished level for `dimension` of a tree with
	/// `dimension_count` dimensions.
	pub fn new<O: PointOwner<K, V> + ?Sized>(owner: &O, dimension: usize, dimension_count: usize) -> Self {
		debug_assert!(dimension < dimension_count, "level past the last dimension");
		let children = if dimension + 1 == dimension_count {
			Children::Terminal(DashMap::with_hasher(FxBuildHasher))
		} else {
			Children::Internal(DashMap::with_hasher(FxBuildHasher))
		};
		Self {
			dimension,
			dimension_count,
			limit: owner.dimension_values_limit(dimension),
			children,
			created: AtomicUsize::new(0),
		}
	}

	#[cfg(test)]
	pub const fn dimension(&self) -> usize {
		self.dimension
	}

	#[cfg(test)]
	pub const fn is_terminal(&self) -> bool {
		matches!(self.children, Children::Terminal(_))
	}

	/// Number of keys created or reserved at this level.
	pub fn created_count(&self) -> usize {
		self.created.load(Ordering::Acquire)
	}

	/// Number of keys durably published at this level.
	pub fn len(&self) -> usize {
		match &self.children {
			Children::Internal(levels) => levels.len(),
			Children::Terminal(points) => points.len(),
		}
	}

	/// Returns the published child level under `key`, if this level is internal.
	pub fn child_level(&self, key: &K) -> Option<Arc<Self>> {
		match &self.children {
			Children::Internal(levels) => lookup(levels, key),
			Children::Terminal(_) => None,
		}
	}

	/// Resolves `coordinates[self.dimension..]`, creating missing children when
	/// `create` is set.
	///
	/// `coordinates` is always the full vector; the point factory needs it.
	pub fn resolve<O>(&self, owner: &O, coordinates: &[K], create: bool) -> Resolution<V>
	where
		O: PointOwner<K, V> + ?Sized,
	{
		let key = &coordinates[self.dimension];
		match &self.children {
			Children::Terminal(points) => match lookup(points, key) {
				Some(point) => Resolution::AlreadyExisted(point),
				None if create => self.create_point(owner, points, coordinates),
				None => self.not_found(),
			},
			Children::Internal(levels) => loop {
				if let Some(level) = lookup(levels, key) {
					break level.resolve(owner, coordinates, create);
				}
				if !create {
					break self.not_found();
				}
				if let Some(resolution) = self.create_subtree(owner, levels, coordinates) {
					break resolution;
				}
				tracing::trace!(dimension = self.dimension, "retrying against published subtree");
			},
		}
	}

	fn not_found(&self) -> Resolution<V> {
		Resolution::NotFoundNoCreate { dimension: self.dimension }
	}

	fn reserve_slot(&self) -> Option<SlotReservation<'_>> {
		let slot = SlotReservation::try_acquire(&self.created, self.limit);
		if slot.is_none() {
			tracing::debug!(dimension = self.dimension, limit = self.limit, "dimension value limit reached");
		}
		slot
	}

	fn create_point<O>(&self, owner: &O, points: &ChildMap<K, V>, coordinates: &[K]) -> Resolution<V>
	where
		O: PointOwner<K, V> + ?Sized,
	{
		let Some(slot) = self.reserve_slot() else {
			return Resolution::DimensionCardinalityExceeded { dimension: self.dimension };
		};
		let Some(counted) = PointReservation::<K, V, O>::try_acquire(owner) else {
			tracing::debug!(
				dimension = self.dimension,
				limit = owner.total_points_limit(),
				"total point limit reached"
			);
			return Resolution::TotalCountExceeded { dimension: self.dimension };
		};

		let point = Arc::new(owner.create_point(coordinates));
		match insert_if_absent(points, &coordinates[self.dimension], Arc::clone(&point)) {
			Ok(()) => {
				counted.commit();
				slot.commit();
				Resolution::NewlyCreated(point)
			}
			Err(existing) => {
				tracing::trace!(dimension = self.dimension, "lost point publication race");
				Resolution::AlreadyExisted(existing)
			}
		}
	}

	/// Builds and publishes the subtree for a missing key.
	///
	/// Returns `None` when another caller published the key first; every
	/// reservation made here has been released by then.
	fn create_subtree<O>(
		&self,
		owner: &O,
		levels: &ChildMap<K, DimensionLevel<K, V>>,
		coordinates: &[K],
	) -> Option<Resolution<V>>
	where
		O: PointOwner<K, V> + ?Sized,
	{
		let Some(slot) = self.reserve_slot() else {
			return Some(Resolution::DimensionCardinalityExceeded { dimension: self.dimension });
		};
		if owner.total_points() >= owner.total_points_limit() {
			tracing::debug!(
				dimension = self.dimension,
				limit = owner.total_points_limit(),
				"total point limit reached"
			);
			return Some(Resolution::TotalCountExceeded { dimension: self.dimension });
		}

		// Unpublished, so nothing else can reach it while it is built.
		let child = Arc::new(Self::new(owner, self.dimension + 1, self.dimension_count));
		let built = child.resolve(owner, coordinates, true);
		if !built.is_found() {
			return Some(built);
		}
		debug_assert!(built.is_created(), "unpublished subtree resolved an existing point");

		// The built subtree holds exactly one counted point.
		let counted = PointReservation::<K, V, O>::adopt(owner);
		match insert_if_absent(levels, &coordinates[self.dimension], child) {
			Ok(()) => {
				counted.commit();
				slot.commit();
				Some(built)
			}
			Err(_) => {
				tracing::trace!(dimension = self.dimension, "lost subtree publication race");
				None
			}
		}
	}

	/// Appends every published `(vector, point)` under this level to `out`.
	///
	/// `prefix` holds the coordinates of the path leading here and is left
	/// unchanged on return.
	pub fn collect_points(&self, prefix: &mut Vec<K>, out: &mut Vec<(Vec<K>, Arc<V>)>) {
		debug_assert!(self.len() <= self.created_count(), "published keys exceed created count");
		match &self.children {
			Children::Terminal(points) => {
				for entry in points.iter() {
					let mut coordinates = Vec::with_capacity(prefix.len() + 1);
					coordinates.extend_from_slice(prefix);
					coordinates.push(entry.key().clone());
					out.push((coordinates, Arc::clone(entry.value())));
				}
			}
			Children::Internal(levels) => {
				let snapshot: Vec<_> = levels
					.iter()
					.map(|entry| (entry.key().clone(), Arc::clone(entry.value())))
					.collect();
				for (key, level) in snapshot {
					prefix.push(key);
					level.collect_points(prefix, out);
					prefix.pop();
				}
			}
		}
	}
}

/// Clones the child under `key` out of the map without holding its shard lock.
fn lookup<K: Eq + Hash, T>(map: &ChildMap<K, T>, key: &K) -> Option<Arc<T>> {
	map.get(key).map(|entry| Arc::clone(entry.value()))
}

/// Publishes `child` under `key` unless a child is already there.
///
/// On a lost race, returns the child that got there first.
fn insert_if_absent<K: Eq + Hash + Clone, T>(map: &ChildMap<K, T>, key: &K, child: Arc<T>) -> Result<(), Arc<T>> {
	match map.entry(key.clone()) {
		Entry::Occupied(entry) => Err(Arc::clone(entry.get())),
		Entry::Vacant(entry) => {
			entry.insert(child);
			Ok(())
		}
	}
}
