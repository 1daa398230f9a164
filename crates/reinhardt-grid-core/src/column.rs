//! Column descriptors
//!
//! A [`Column`] names one field of the grid's records. Plain columns read the
//! field directly; relation-bound columns read a field of a nested related
//! entity (`"author.email"` reads `record["author"]["email"]`). Columns are
//! applied to the fetched records in registration order, each one storing
//! its resolved value under its own name.

use crate::error::{GridError, GridResult};
use crate::record::Record;
use serde_json::Value;
use std::fmt::Debug;
use std::sync::Arc;

/// Value transform registered with [`Column::display`]
pub type DisplayFn = Arc<dyn Fn(&Value, &Record) -> Value>;

/// Relation binding of a column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationRef {
	/// Relation accessor name on the primary entity
	pub relation: String,
	/// Field on the related entity. `None` resolves the whole related entity.
	pub field: Option<String>,
}

impl RelationRef {
	/// Creates a relation binding
	pub fn new(relation: impl Into<String>, field: Option<String>) -> Self {
		Self {
			relation: relation.into(),
			field,
		}
	}
}

/// Parses a dotted column name into its relation binding
///
/// Returns `Ok(None)` for plain names. The name is split on the first `.`;
/// a name with more than two segments or an empty segment is rejected.
///
/// # Examples
///
/// ```
/// use reinhardt_grid_core::column::{parse_dotted, RelationRef};
///
/// let parsed = parse_dotted("author.email").unwrap();
/// assert_eq!(parsed, Some(RelationRef::new("author", Some("email".to_string()))));
/// assert_eq!(parse_dotted("title").unwrap(), None);
/// assert!(parse_dotted("author.profile.email").is_err());
/// ```
pub fn parse_dotted(name: &str) -> GridResult<Option<RelationRef>> {
	let Some((relation, field)) = name.split_once('.') else {
		return Ok(None);
	};

	if relation.is_empty() || field.is_empty() || field.contains('.') {
		return Err(GridError::configuration(format!(
			"column '{}' must have the form 'relation.field'",
			name
		)));
	}

	Ok(Some(RelationRef::new(relation, Some(field.to_string()))))
}

/// Upper-cases the first character of `s`
pub(crate) fn capitalize(s: &str) -> String {
	let mut chars = s.chars();
	match chars.next() {
		Some(first) => first.to_uppercase().chain(chars).collect(),
		None => String::new(),
	}
}

/// A named, labeled field descriptor
#[derive(Clone)]
pub struct Column {
	name: String,
	label: String,
	relation: Option<RelationRef>,
	display: Option<DisplayFn>,
}

impl Column {
	/// Creates a column
	///
	/// An empty label defaults to the upper-cased name.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_grid_core::Column;
	///
	/// let column = Column::new("email", "").unwrap();
	/// assert_eq!(column.label(), "EMAIL");
	/// assert!(Column::new("", "Email").is_err());
	/// ```
	pub fn new(name: impl Into<String>, label: impl Into<String>) -> GridResult<Self> {
		let name = name.into();
		if name.is_empty() {
			return Err(GridError::configuration("column name must not be empty"));
		}

		let label = label.into();
		let label = if label.is_empty() {
			name.to_uppercase()
		} else {
			label
		};

		Ok(Self {
			name,
			label,
			relation: None,
			display: None,
		})
	}

	/// Returns the column name
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Returns the header label
	pub fn label(&self) -> &str {
		&self.label
	}

	/// Returns the relation binding, if any
	pub fn relation(&self) -> Option<&RelationRef> {
		self.relation.as_ref()
	}

	/// Replaces the header label
	pub fn set_label(&mut self, label: impl Into<String>) -> &mut Self {
		self.label = label.into();
		self
	}

	/// Binds the column to a field of a related entity
	pub fn bind_relation(&mut self, relation: impl Into<String>, field: Option<String>) -> &mut Self {
		self.relation = Some(RelationRef::new(relation, field));
		self
	}

	/// Registers a transform applied to the resolved value
	///
	/// The closure receives the resolved value and the record as seen by this
	/// column, including values stored by columns registered before it.
	pub fn display<F>(&mut self, f: F) -> &mut Self
	where
		F: Fn(&Value, &Record) -> Value + 'static,
	{
		self.display = Some(Arc::new(f));
		self
	}

	/// Resolves this column's raw value from a record
	///
	/// Missing fields resolve to `null`. When the related value is an array
	/// (a to-many relation), the bound field is collected from each element.
	pub fn resolve(&self, record: &Record) -> Value {
		let Some(relation) = &self.relation else {
			return record.get(&self.name).cloned().unwrap_or(Value::Null);
		};

		let Some(related) = record.get(&relation.relation) else {
			return Value::Null;
		};

		match (&relation.field, related) {
			(None, related) => related.clone(),
			(Some(field), Value::Array(items)) => Value::Array(
				items
					.iter()
					.map(|item| item.get(field).cloned().unwrap_or(Value::Null))
					.collect(),
			),
			(Some(field), related) => related.get(field).cloned().unwrap_or(Value::Null),
		}
	}

	/// Applies the column to every record
	///
	/// Stores the resolved (and transformed) value under the column name,
	/// keeping record order and every other field untouched.
	pub fn apply(&self, records: Vec<Record>) -> Vec<Record> {
		records
			.into_iter()
			.map(|mut record| {
				let mut value = self.resolve(&record);
				if let Some(display) = &self.display {
					value = display(&value, &record);
				}
				record.insert(self.name.clone(), value);
				record
			})
			.collect()
	}
}

impl Debug for Column {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Column")
			.field("name", &self.name)
			.field("label", &self.label)
			.field("relation", &self.relation)
			.field("display", &self.display.is_some())
			.finish()
	}
}

/// Column registration input for batch registration
///
/// Converts from `"name"` (default label) or `("name", "Label")`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
	/// Column name, plain or dotted
	pub name: String,
	/// Explicit label
	pub label: Option<String>,
}

impl From<&str> for ColumnSpec {
	fn from(name: &str) -> Self {
		Self {
			name: name.to_string(),
			label: None,
		}
	}
}

impl From<String> for ColumnSpec {
	fn from(name: String) -> Self {
		Self { name, label: None }
	}
}

impl From<(&str, &str)> for ColumnSpec {
	fn from((name, label): (&str, &str)) -> Self {
		Self {
			name: name.to_string(),
			label: Some(label.to_string()),
		}
	}
}
