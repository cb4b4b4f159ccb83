//! Metric aggregates backed by a bounded point tree.
//!
//! An [`Aggregate`] owns one [`strata_point_tree::PointTree`] and supplies
//! everything the tree needs from its owner: the dimension layout and limits
//! from an [`AggregateConfig`], the global [`PointCounter`], and the factory
//! that builds a point for a new label combination.

mod aggregate;
mod config;
mod counter;
mod error;
mod stats;

pub use aggregate::{Aggregate, PointFactory};
pub use config::{AggregateConfig, ConfigError, DEFAULT_DIMENSION_LIMIT, DEFAULT_TOTAL_POINTS_LIMIT, DimensionConfig};
pub use counter::PointCounter;
pub use error::{AggregateError, Result};
pub use stats::AggregateStats;
pub use strata_point_tree::{Resolution, Status};
