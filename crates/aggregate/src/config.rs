//! Aggregate layout and limits, loadable from TOML.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Total point limit applied when the config does not set one.
pub const DEFAULT_TOTAL_POINTS_LIMIT: usize = 10_000;

/// Per-dimension value limit applied when neither the dimension nor the
/// config sets one.
pub const DEFAULT_DIMENSION_LIMIT: usize = 1_000;

/// Errors raised while loading or validating an [`AggregateConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error parsing TOML syntax or shape.
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),

	/// Error reading a configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// The aggregate declares no dimensions.
	#[error("aggregate '{0}' declares no dimensions")]
	NoDimensions(String),

	/// A dimension has an empty name.
	#[error("dimension {0} has an empty name")]
	EmptyDimensionName(usize),

	/// Two dimensions share a name.
	#[error("duplicate dimension: {0}")]
	DuplicateDimension(String),
}

/// One dimension (label) of an aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DimensionConfig {
	pub name: String,
	/// Overrides [`AggregateConfig::default_dimension_limit`] for this dimension.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub limit: Option<usize>,
}

/// Layout and bounds of one aggregate.
///
/// ```toml
/// name = "http_requests"
/// total_points_limit = 1000
///
/// [[dimensions]]
/// name = "method"
/// limit = 8
///
/// [[dimensions]]
/// name = "status"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AggregateConfig {
	pub name: String,
	#[serde(default = "default_total_points_limit")]
	pub total_points_limit: usize,
	#[serde(default = "default_dimension_limit")]
	pub default_dimension_limit: usize,
	#[serde(default)]
	pub dimensions: Vec<DimensionConfig>,
}

fn default_total_points_limit() -> usize {
	DEFAULT_TOTAL_POINTS_LIMIT
}

fn default_dimension_limit() -> usize {
	DEFAULT_DIMENSION_LIMIT
}

impl AggregateConfig {
	/// Creates a config with default limits and no dimensions.
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			total_points_limit: DEFAULT_TOTAL_POINTS_LIMIT,
			default_dimension_limit: DEFAULT_DIMENSION_LIMIT,
			dimensions: Vec::new(),
		}
	}

	/// Appends a dimension using the default limit.
	pub fn dimension(mut self, name: impl Into<String>) -> Self {
		self.dimensions.push(DimensionConfig {
			name: name.into(),
			limit: None,
		});
		self
	}

	/// Appends a dimension with its own value limit.
	pub fn dimension_with_limit(mut self, name: impl Into<String>, limit: usize) -> Self {
		self.dimensions.push(DimensionConfig {
			name: name.into(),
			limit: Some(limit),
		});
		self
	}

	pub fn total_points_limit(mut self, limit: usize) -> Self {
		self.total_points_limit = limit;
		self
	}

	pub fn default_dimension_limit(mut self, limit: usize) -> Self {
		self.default_dimension_limit = limit;
		self
	}

	/// Parses and validates a TOML document.
	pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
		let config: Self = toml::from_str(input)?;
		config.validate()?;
		Ok(config)
	}

	/// Reads, parses and validates a TOML file.
	pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
		let path = path.as_ref();
		let input = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		Self::from_toml_str(&input)
	}

	/// Checks that the layout describes a usable tree.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.dimensions.is_empty() {
			return Err(ConfigError::NoDimensions(self.name.clone()));
		}
		for (index, dimension) in self.dimensions.iter().enumerate() {
			if dimension.name.is_empty() {
				return Err(ConfigError::EmptyDimensionName(index));
			}
			if self.dimensions[..index].iter().any(|prev| prev.name == dimension.name) {
				return Err(ConfigError::DuplicateDimension(dimension.name.clone()));
			}
		}
		Ok(())
	}

	/// Value limit for the dimension at `index`.
	pub fn dimension_limit(&self, index: usize) -> usize {
		self.dimensions
			.get(index)
			.and_then(|dimension| dimension.limit)
			.unwrap_or(self.default_dimension_limit)
	}

	/// Position of the dimension called `name`.
	pub fn dimension_index(&self, name: &str) -> Option<usize> {
		self.dimensions.iter().position(|dimension| dimension.name == name)
	}
}
