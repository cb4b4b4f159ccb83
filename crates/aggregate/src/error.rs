use thiserror::Error;

use crate::ConfigError;

/// Errors returned by [`crate::Aggregate`].
#[derive(Debug, Error)]
pub enum AggregateError {
	#[error(transparent)]
	Config(#[from] ConfigError),

	#[error(transparent)]
	Tree(#[from] strata_point_tree::TreeError),

	/// A labeled lookup named a dimension the aggregate does not have.
	#[error("unknown label '{0}'")]
	UnknownLabel(String),

	/// A labeled lookup omitted one of the aggregate's dimensions.
	#[error("missing label '{0}'")]
	MissingLabel(String),

	/// A labeled lookup gave the same dimension twice.
	#[error("duplicate label '{0}'")]
	DuplicateLabel(String),
}

/// Result type for aggregate operations.
pub type Result<T> = std::result::Result<T, AggregateError>;
