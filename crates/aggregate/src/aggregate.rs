use std::sync::Arc;

use strata_point_tree::{PointOwner, PointTree, Resolution};

use crate::{AggregateConfig, AggregateError, AggregateStats, PointCounter, Result};

/// Builds the point for a new label-value combination.
pub type PointFactory<V> = Box<dyn Fn(&[String]) -> V + Send + Sync>;

/// Owner side of an aggregate: layout, limits, counter and factory.
struct AggregateCore<V> {
	config: AggregateConfig,
	counter: PointCounter,
	factory: PointFactory<V>,
}

impl<V> PointOwner<String, V> for AggregateCore<V> {
	fn dimension_count(&self) -> usize {
		self.config.dimensions.len()
	}

	fn create_point(&self, coordinates: &[String]) -> V {
		(self.factory)(coordinates)
	}

	fn total_points(&self) -> usize {
		self.counter.count()
	}

	fn total_points_limit(&self) -> usize {
		self.counter.limit()
	}

	fn try_increment_total_points(&self) -> bool {
		self.counter.try_increment()
	}

	fn decrement_total_points(&self) {
		self.counter.decrement();
	}

	fn dimension_values_limit(&self, dimension: usize) -> usize {
		self.config.dimension_limit(dimension)
	}
}

/// A named metric whose points are keyed by one value per dimension.
///
/// Points are created on first use and live as long as the aggregate.
pub struct Aggregate<V> {
	core: AggregateCore<V>,
	tree: PointTree<String, V>,
}

impl<V> Aggregate<V> {
	/// Creates an empty aggregate after validating `config`.
	pub fn new<F>(config: AggregateConfig, factory: F) -> Result<Self>
	where
		F: Fn(&[String]) -> V + Send + Sync + 'static,
	{
		config.validate()?;
		let core = AggregateCore {
			counter: PointCounter::new(config.total_points_limit),
			config,
			factory: Box::new(factory),
		};
		let tree = PointTree::new(&core)?;
		tracing::debug!(
			aggregate = %core.config.name,
			dimensions = core.config.dimensions.len(),
			points_limit = core.counter.limit(),
			"aggregate created"
		);
		Ok(Self { core, tree })
	}

	pub fn name(&self) -> &str {
		&self.core.config.name
	}

	pub fn config(&self) -> &AggregateConfig {
		&self.core.config
	}

	/// Dimension names in coordinate order.
	pub fn dimension_names(&self) -> impl Iterator<Item = &str> {
		self.core.config.dimensions.iter().map(|dimension| dimension.name.as_str())
	}

	/// Returns the point for `values`, creating it when absent.
	///
	/// `values` holds one value per dimension, in dimension order.
	pub fn get_or_create(&self, values: &[String]) -> Result<Resolution<V>> {
		Ok(self.tree.get_or_create(&self.core, values)?)
	}

	/// Returns the point for `values` without creating anything.
	pub fn get(&self, values: &[String]) -> Result<Resolution<V>> {
		Ok(self.tree.get(&self.core, values)?)
	}

	/// Like [`Self::get_or_create`], with values given as `(dimension, value)`
	/// pairs in any order.
	pub fn get_or_create_labeled(&self, labels: &[(&str, &str)]) -> Result<Resolution<V>> {
		let values = self.coordinates(labels)?;
		self.get_or_create(&values)
	}

	/// Like [`Self::get`], with values given as `(dimension, value)` pairs in
	/// any order.
	pub fn get_labeled(&self, labels: &[(&str, &str)]) -> Result<Resolution<V>> {
		let values = self.coordinates(labels)?;
		self.get(&values)
	}

	/// Orders labeled values by dimension, requiring each dimension exactly once.
	fn coordinates(&self, labels: &[(&str, &str)]) -> Result<Vec<String>> {
		let dimensions = &self.core.config.dimensions;
		let mut slots: Vec<Option<&str>> = vec![None; dimensions.len()];
		for &(name, value) in labels {
			let index = self
				.core
				.config
				.dimension_index(name)
				.ok_or_else(|| AggregateError::UnknownLabel(name.to_owned()))?;
			if slots[index].replace(value).is_some() {
				return Err(AggregateError::DuplicateLabel(name.to_owned()));
			}
		}
		slots
			.into_iter()
			.zip(dimensions)
			.map(|(slot, dimension)| slot.map(str::to_owned).ok_or_else(|| AggregateError::MissingLabel(dimension.name.clone())))
			.collect()
	}

	/// Every published point with its values in dimension order.
	pub fn points(&self) -> Vec<(Vec<String>, Arc<V>)> {
		self.tree.all_points()
	}

	pub fn stats(&self) -> AggregateStats {
		AggregateStats {
			name: self.core.config.name.clone(),
			dimensions: self.tree.dimension_count(),
			points: self.core.counter.count(),
			points_limit: self.core.counter.limit(),
			root_values: self.tree.cardinality(&[]).unwrap_or_default(),
		}
	}
}
