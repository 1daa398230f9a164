//! Error types for grid construction and rendering

use thiserror::Error;

/// Grid error type
#[derive(Debug, Error)]
pub enum GridError {
	/// Invalid grid configuration (column names, relations, actions, settings)
	#[error("Configuration error: {0}")]
	Configuration(String),

	/// Requested option or entry does not exist
	#[error("Not found: {0}")]
	NotFound(String),

	/// Failure reported by the data source while fetching a page
	#[error("Data source error: {0}")]
	DataSource(#[from] anyhow::Error),

	/// Template rendering error
	#[error("Template rendering error: {0}")]
	Template(String),
}

impl GridError {
	/// Shorthand for a [`GridError::Configuration`] error
	pub fn configuration(message: impl Into<String>) -> Self {
		Self::Configuration(message.into())
	}
}

/// Result type for grid operations
pub type GridResult<T> = Result<T, GridError>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_grid_error_display() {
		let err = GridError::configuration("column name must not be empty");
		assert_eq!(
			err.to_string(),
			"Configuration error: column name must not be empty"
		);

		let err = GridError::NotFound("option 'subtitle'".to_string());
		assert_eq!(err.to_string(), "Not found: option 'subtitle'");
	}

	#[test]
	fn test_data_source_error_from_anyhow() {
		let err: GridError = anyhow::anyhow!("connection refused").into();
		assert!(matches!(err, GridError::DataSource(_)));
		assert_eq!(err.to_string(), "Data source error: connection refused");
	}
}
