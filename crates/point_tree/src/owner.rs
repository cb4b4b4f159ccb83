/// Collaborator that gives a [`crate::PointTree`] its shape and its bounds.
///
/// The owner holds the global point counter. The tree only ever moves it
/// through [`Self::try_increment_total_points`] and
/// [`Self::decrement_total_points`], pairing every increment that does not
/// end in a published point with exactly one decrement.
pub trait PointOwner<K, V>: Send + Sync {
	/// Number of coordinates in every vector. Fixed for the owner's lifetime.
	fn dimension_count(&self) -> usize;

	/// Builds a new point for `coordinates`.
	///
	/// May run concurrently for the same vector; the losers' values are
	/// dropped unpublished, so construction must not have side effects.
	fn create_point(&self, coordinates: &[K]) -> V;

	/// Current number of points counted against the global limit.
	fn total_points(&self) -> usize;

	/// Global point limit.
	fn total_points_limit(&self) -> usize;

	/// Counts one more point, unless that would exceed the limit.
	///
	/// Returns `false` and leaves the count unchanged when the limit is reached.
	fn try_increment_total_points(&self) -> bool;

	/// Releases one previously counted point.
	fn decrement_total_points(&self);

	/// Maximum number of distinct values a level at `dimension` may hold.
	fn dimension_values_limit(&self, dimension: usize) -> usize;
}
