//! Grid rows

use crate::record::{Record, display_value};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Row identifier, used to build per-row action links
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowId(String);

impl RowId {
	/// Creates a row id
	pub fn new(id: impl Into<String>) -> Self {
		Self(id.into())
	}

	/// Returns the id as a string slice
	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Derives an id from a primary-key value
	///
	/// Only strings and numbers qualify; anything else yields `None`.
	pub fn from_value(value: &Value) -> Option<Self> {
		match value {
			Value::String(s) if !s.is_empty() => Some(Self(s.clone())),
			Value::Number(n) => Some(Self(n.to_string())),
			_ => None,
		}
	}
}

impl fmt::Display for RowId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for RowId {
	fn from(id: &str) -> Self {
		Self(id.to_string())
	}
}

impl From<String> for RowId {
	fn from(id: String) -> Self {
		Self(id)
	}
}

impl From<i64> for RowId {
	fn from(id: i64) -> Self {
		Self(id.to_string())
	}
}

impl From<usize> for RowId {
	fn from(id: usize) -> Self {
		Self(id.to_string())
	}
}

/// A single record of the grid, keyed by column name
///
/// Rows compare equal when their ids are equal.
#[derive(Debug, Clone)]
pub struct Row {
	id: RowId,
	values: Record,
}

impl Row {
	/// Creates a row
	pub fn new(id: impl Into<RowId>, values: Record) -> Self {
		Self {
			id: id.into(),
			values,
		}
	}

	/// Returns the row id
	pub fn id(&self) -> &RowId {
		&self.id
	}

	/// Returns the column values in column order
	pub fn values(&self) -> &Record {
		&self.values
	}

	/// Returns the value of a column
	pub fn get(&self, column: &str) -> Option<&Value> {
		self.values.get(column)
	}

	/// Replaces the value of a column
	///
	/// Intended for row post-process hooks. Setting a column that is not
	/// already present appends it.
	pub fn set(mut self, column: impl Into<String>, value: Value) -> Self {
		self.values.insert(column.into(), value);
		self
	}

	/// Returns the display text of every stored value, in insertion order
	///
	/// Includes values added by [`Row::set`]. The render context builds its
	/// cells from the grid's columns instead.
	pub fn cells(&self) -> Vec<String> {
		self.values.values().map(display_value).collect()
	}
}

impl PartialEq for Row {
	fn eq(&self, other: &Self) -> bool {
		self.id == other.id
	}
}

impl Eq for Row {}
