use std::sync::atomic::{AtomicUsize, Ordering};

/// Global point count for one aggregate, capped at a fixed limit.
#[derive(Debug)]
pub struct PointCounter {
	count: AtomicUsize,
	limit: usize,
}

impl PointCounter {
	pub const fn new(limit: usize) -> Self {
		Self {
			count: AtomicUsize::new(0),
			limit,
		}
	}

	/// Counts one more point unless the limit is already reached.
	///
	/// On failure the count is left untouched.
	pub fn try_increment(&self) -> bool {
		self.count
			.fetch_update(Ordering::AcqRel, Ordering::Acquire, |count| (count < self.limit).then_some(count + 1))
			.is_ok()
	}

	/// Releases one counted point.
	pub fn decrement(&self) {
		let prev = self.count.fetch_sub(1, Ordering::AcqRel);
		debug_assert!(prev > 0, "point counter underflow");
	}

	pub fn count(&self) -> usize {
		self.count.load(Ordering::Acquire)
	}

	pub const fn limit(&self) -> usize {
		self.limit
	}

	/// Points that can still be created.
	pub fn remaining(&self) -> usize {
		self.limit.saturating_sub(self.count())
	}
}
