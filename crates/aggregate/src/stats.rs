/// Snapshot of an aggregate's occupancy for logging and debug displays.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AggregateStats {
	/// Aggregate name from its config.
	pub name: String,
	/// Number of dimensions.
	pub dimensions: usize,
	/// Points currently counted against the limit.
	pub points: usize,
	/// Global point limit.
	pub points_limit: usize,
	/// Distinct values published for the first dimension.
	pub root_values: usize,
}

impl AggregateStats {
	/// Fraction of the point limit in use, in `0.0..=1.0`.
	pub fn saturation(&self) -> f64 {
		if self.points_limit == 0 {
			return 1.0;
		}
		self.points as f64 / self.points_limit as f64
	}

	/// Emits the stats as a tracing event.
	pub fn emit(&self) {
		tracing::info!(
			aggregate = %self.name,
			dimensions = self.dimensions,
			points = self.points,
			points_limit = self.points_limit,
			root_values = self.root_values,
			saturation = self.saturation(),
			"aggregate stats"
		);
	}
}
