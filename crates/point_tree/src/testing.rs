//! Owner fixture shared by unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::PointOwner;

pub(crate) type Key = &'static str;

/// Owner with fixed per-level limits whose points are the joined coordinates.
pub(crate) struct TestOwner {
	limits: Vec<usize>,
	total_limit: usize,
	total: AtomicUsize,
	factory_calls: AtomicUsize,
	panic_on: Option<Key>,
}

impl TestOwner {
	pub fn new(limits: &[usize], total_limit: usize) -> Self {
		Self {
			limits: limits.to_vec(),
			total_limit,
			total: AtomicUsize::new(0),
			factory_calls: AtomicUsize::new(0),
			panic_on: None,
		}
	}

	/// Makes the factory panic for any vector ending in `key`.
	pub fn panicking_on(mut self, key: Key) -> Self {
		self.panic_on = Some(key);
		self
	}

	pub fn factory_calls(&self) -> usize {
		self.factory_calls.load(Ordering::SeqCst)
	}
}

impl PointOwner<Key, String> for TestOwner {
	fn dimension_count(&self) -> usize {
		self.limits.len()
	}

	fn create_point(&self, coordinates: &[Key]) -> String {
		self.factory_calls.fetch_add(1, Ordering::SeqCst);
		if let (Some(key), Some(last)) = (self.panic_on, coordinates.last()) {
			assert_ne!(key, *last, "factory refused {key}");
		}
		coordinates.join("/")
	}

	fn total_points(&self) -> usize {
		self.total.load(Ordering::SeqCst)
	}

	fn total_points_limit(&self) -> usize {
		self.total_limit
	}

	fn try_increment_total_points(&self) -> bool {
		self.total
			.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |count| (count < self.total_limit).then_some(count + 1))
			.is_ok()
	}

	fn decrement_total_points(&self) {
		let prev = self.total.fetch_sub(1, Ordering::SeqCst);
		assert!(prev > 0, "total point counter underflow");
	}

	fn dimension_values_limit(&self, dimension: usize) -> usize {
		self.limits[dimension]
	}
}
