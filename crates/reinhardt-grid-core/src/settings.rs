//! Grid settings
//!
//! Site-wide defaults shared by every grid, loadable from a TOML file:
//!
//! ```toml
//! template_name = "admin/grid.tpl"
//! per_page = 25
//! max_per_page = 200
//! default_actions = "show|edit"
//! strict_columns = true
//! ```

use crate::action::{Actions, DEFAULT_ACTIONS};
use crate::error::{GridError, GridResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Site-wide grid defaults
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
	/// Template passed to the renderer
	pub template_name: String,

	/// Records per page when a grid does not paginate explicitly
	pub per_page: usize,

	/// Upper bound for requested page sizes
	pub max_per_page: usize,

	/// Action spec installed when a grid configures no actions
	pub default_actions: String,

	/// Reject virtual column names matching neither a field nor a relation
	pub strict_columns: bool,
}

impl Default for GridSettings {
	fn default() -> Self {
		Self {
			template_name: "grid.tpl".to_string(),
			per_page: 20,
			max_per_page: 100,
			default_actions: DEFAULT_ACTIONS.to_string(),
			strict_columns: false,
		}
	}
}

impl GridSettings {
	/// Sets the template name
	pub fn with_template_name(mut self, name: impl Into<String>) -> Self {
		self.template_name = name.into();
		self
	}

	/// Sets the default page size
	pub fn with_per_page(mut self, per_page: usize) -> Self {
		self.per_page = per_page;
		self
	}

	/// Enables or disables strict virtual column resolution
	pub fn with_strict_columns(mut self, strict: bool) -> Self {
		self.strict_columns = strict;
		self
	}

	/// Load settings from a TOML file.
	///
	/// # Errors
	///
	/// Returns a configuration error if the file cannot be read, parsed, or
	/// holds invalid values.
	pub fn from_file(path: impl AsRef<Path>) -> GridResult<Self> {
		let path = path.as_ref();
		let content = std::fs::read_to_string(path).map_err(|e| {
			GridError::configuration(format!(
				"failed to read grid settings '{}': {}",
				path.display(),
				e
			))
		})?;

		Self::from_toml(&content)
	}

	/// Parse settings from a TOML string.
	pub fn from_toml(content: &str) -> GridResult<Self> {
		let settings: Self = toml::from_str(content).map_err(|e| {
			GridError::configuration(format!("invalid grid settings: {}", e))
		})?;
		settings.validate()?;
		Ok(settings)
	}

	/// Checks value ranges and the default action spec
	pub fn validate(&self) -> GridResult<()> {
		if self.template_name.is_empty() {
			return Err(GridError::configuration("template_name must not be empty"));
		}
		if self.per_page == 0 || self.max_per_page == 0 {
			return Err(GridError::configuration(
				"per_page and max_per_page must be positive",
			));
		}
		if self.per_page > self.max_per_page {
			return Err(GridError::configuration(format!(
				"per_page ({}) exceeds max_per_page ({})",
				self.per_page, self.max_per_page
			)));
		}
		Actions::parse_strict(&self.default_actions)?;
		Ok(())
	}

	/// Clamps a requested page size to `1..=max_per_page`
	pub fn clamp_per_page(&self, per_page: usize) -> usize {
		per_page.clamp(1, self.max_per_page.max(1))
	}
}
