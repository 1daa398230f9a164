//! Per-grid display options

use crate::error::{GridError, GridResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Default grid title
pub const DEFAULT_TITLE: &str = "List";

/// Display options of one grid
///
/// `title` is a typed field; any other key set through
/// [`GridOptions::set`] lands in `extra` and is passed to the template as is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridOptions {
	/// Grid title (default `"List"`)
	pub title: String,
	/// Additional string options, in insertion order
	pub extra: Vec<(String, String)>,
}

impl Default for GridOptions {
	fn default() -> Self {
		Self {
			title: DEFAULT_TITLE.to_string(),
			extra: Vec::new(),
		}
	}
}

impl GridOptions {
	/// Sets an option
	pub fn set(&mut self, key: &str, value: impl Into<String>) {
		let value = value.into();
		if key == "title" {
			self.title = value;
			return;
		}

		match self.extra.iter_mut().find(|(k, _)| k == key) {
			Some((_, existing)) => *existing = value,
			None => self.extra.push((key.to_string(), value)),
		}
	}

	/// Reads an option
	///
	/// # Errors
	///
	/// Returns [`GridError::NotFound`] for a key that was never set.
	pub fn get(&self, key: &str) -> GridResult<&str> {
		if key == "title" {
			return Ok(&self.title);
		}

		self.extra
			.iter()
			.find(|(k, _)| k == key)
			.map(|(_, v)| v.as_str())
			.ok_or_else(|| GridError::NotFound(format!("grid option '{}'", key)))
	}

	/// All options as a JSON object, `title` first
	pub fn to_map(&self) -> Map<String, Value> {
		let mut map = Map::new();
		map.insert("title".to_string(), Value::String(self.title.clone()));
		for (key, value) in &self.extra {
			map.insert(key.clone(), Value::String(value.clone()));
		}
		map
	}
}
