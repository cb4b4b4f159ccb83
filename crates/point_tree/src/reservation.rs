//! Commit-or-rollback guards for bounded counters.
//!
//! Each guard represents one increment that is not yet backed by a published
//! child. Dropping the guard undoes the increment; [`SlotReservation::commit`]
//! and [`PointReservation::commit`] keep it. Early returns and unwinding
//! panics therefore cannot leak a reservation.

use std::marker::PhantomData;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::PointOwner;

/// One provisional slot in a level's `created` counter.
#[must_use = "dropping a reservation releases it immediately"]
pub(crate) struct SlotReservation<'a> {
	counter: &'a AtomicUsize,
	committed: bool,
}

impl<'a> SlotReservation<'a> {
	/// Increments `counter` unless it already holds `limit` slots.
	///
	/// The counter is never observed above `limit`, even while callers race.
	pub fn try_acquire(counter: &'a AtomicUsize, limit: usize) -> Option<Self> {
		counter
			.fetch_update(Ordering::AcqRel, Ordering::Acquire, |count| (count < limit).then_some(count + 1))
			.ok()?;
		Some(Self { counter, committed: false })
	}

	/// Keeps the slot; the caller has published a child for it.
	pub fn commit(mut self) {
		self.committed = true;
	}
}

impl Drop for SlotReservation<'_> {
	fn drop(&mut self) {
		if self.committed {
			return;
		}
		let prev = self.counter.fetch_sub(1, Ordering::AcqRel);
		debug_assert!(prev > 0, "level slot counter underflow");
	}
}

/// One point counted against the owner's global limit.
#[must_use = "dropping a reservation releases it immediately"]
pub(crate) struct PointReservation<'a, K, V, O: PointOwner<K, V> + ?Sized> {
	owner: &'a O,
	committed: bool,
	_marker: PhantomData<fn(&[K]) -> V>,
}

impl<'a, K, V, O: PointOwner<K, V> + ?Sized> PointReservation<'a, K, V, O> {
	/// Counts a new point, or returns `None` when the owner is at its limit.
	pub fn try_acquire(owner: &'a O) -> Option<Self> {
		owner.try_increment_total_points().then(|| Self::adopt(owner))
	}

	/// Takes responsibility for a point that was already counted.
	///
	/// Used when a freshly built subtree holds a committed point whose
	/// publication still depends on the subtree winning its insertion race.
	pub fn adopt(owner: &'a O) -> Self {
		Self {
			owner,
			committed: false,
			_marker: PhantomData,
		}
	}

	pub fn commit(mut self) {
		self.committed = true;
	}
}

impl<K, V, O: PointOwner<K, V> + ?Sized> Drop for PointReservation<'_, K, V, O> {
	fn drop(&mut self) {
		if !self.committed {
			self.owner.decrement_total_points();
		}
	}
}
