//! Data source collaborator
//!
//! The grid never talks to a database directly. It fetches one page of raw
//! records through [`DataSource`] and asks it about the entity's schema when
//! resolving virtual columns. [`MemorySource`] is an in-memory implementation
//! backed by a vector of records.

use crate::error::GridResult;
use crate::record::Record;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
	/// Ascending order
	Ascending,
	/// Descending order
	Descending,
}

/// Sort order of a page request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
	/// Field to sort by
	pub field: String,
	/// Sort direction
	pub direction: SortDirection,
}

impl Sort {
	/// Parses a sort expression from a query parameter
	///
	/// `"name"` sorts ascending, `"-name"` descending.
	pub fn parse(expr: &str) -> Self {
		match expr.strip_prefix('-') {
			Some(field) => Self {
				field: field.to_string(),
				direction: SortDirection::Descending,
			},
			None => Self {
				field: expr.to_string(),
				direction: SortDirection::Ascending,
			},
		}
	}
}

/// Pagination and ordering state passed to [`DataSource::fetch_page`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
	/// Page number (1-indexed)
	pub page: usize,
	/// Number of records per page
	pub per_page: usize,
	/// Sort order, `None` keeps the source's natural order
	pub sort: Option<Sort>,
}

impl PageRequest {
	/// Creates a request for the given page
	pub fn new(page: usize, per_page: usize) -> Self {
		Self {
			page: page.max(1),
			per_page: per_page.max(1),
			sort: None,
		}
	}

	/// Offset of the first record of the page
	///
	/// Saturates at `usize::MAX`, so a page far past the end is empty.
	pub fn offset(&self) -> usize {
		self.page.saturating_sub(1).saturating_mul(self.per_page)
	}
}

/// Pagination metadata of a fetched page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
	/// Current page (1-indexed)
	pub page: usize,
	/// Records per page
	pub per_page: usize,
	/// Total number of records across all pages
	pub total: usize,
}

impl PageInfo {
	/// Returns the total number of pages (at least 1)
	pub fn total_pages(&self) -> usize {
		if self.total == 0 || self.per_page == 0 {
			1
		} else {
			self.total.div_ceil(self.per_page)
		}
	}

	/// Returns whether a previous page exists
	pub fn has_previous(&self) -> bool {
		self.page > 1
	}

	/// Returns whether a next page exists
	pub fn has_next(&self) -> bool {
		self.page < self.total_pages()
	}
}

/// One page of raw records
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
	/// Records in display order
	pub records: Vec<Record>,
	/// Pagination metadata
	pub info: PageInfo,
}

/// Persistence collaborator of a grid
///
/// Implementations wrap an ORM model or query set. Introspection methods must
/// answer `false` for unknown names rather than fail.
pub trait DataSource {
	/// Executes the query for one page
	fn fetch_page(&self, request: &PageRequest) -> GridResult<Page>;

	/// Returns whether the entity has a field (schema column) of this name
	fn has_field(&self, name: &str) -> bool;

	/// Returns whether the entity has a relation accessor of this name
	fn has_relation(&self, name: &str) -> bool;

	/// Registers a relation to be eager-loaded with the next fetch
	fn with_relation(&mut self, name: &str);

	/// Primary-key field, used as the row id
	fn primary_key(&self) -> &str {
		"id"
	}

	/// Resource name, used for the default base path of action links
	fn resource_name(&self) -> &str;
}

/// In-memory data source
///
/// Scalar fields and relations are inferred from the records: keys holding
/// objects or arrays are relations, everything else is a field. Relation
/// data is only returned for relations registered with
/// [`DataSource::with_relation`].
///
/// # Examples
///
/// ```
/// use reinhardt_grid_core::{DataSource, MemorySource, PageRequest};
/// use serde_json::json;
///
/// let source = MemorySource::from_values("posts", vec![
///     json!({"id": 1, "title": "Hello", "author": {"name": "Alice"}}),
/// ]);
/// assert!(source.has_field("title"));
/// assert!(source.has_relation("author"));
///
/// let page = source.fetch_page(&PageRequest::new(1, 10)).unwrap();
/// assert_eq!(page.info.total, 1);
/// assert!(page.records[0].get("author").is_none());
/// ```
#[derive(Debug, Clone)]
pub struct MemorySource {
	resource_name: String,
	primary_key: String,
	records: Vec<Record>,
	fields: Vec<String>,
	relations: Vec<String>,
	eager: Vec<String>,
}

impl MemorySource {
	/// Creates a source over the given records
	pub fn new(resource_name: impl Into<String>, records: Vec<Record>) -> Self {
		let mut fields = Vec::new();
		let mut relations = Vec::new();
		for record in &records {
			for (key, value) in record {
				let bucket = match value {
					Value::Object(_) | Value::Array(_) => &mut relations,
					_ => &mut fields,
				};
				if !bucket.contains(key) {
					bucket.push(key.clone());
				}
			}
		}

		Self {
			resource_name: resource_name.into(),
			primary_key: "id".to_string(),
			records,
			fields,
			relations,
			eager: Vec::new(),
		}
	}

	/// Creates a source from JSON values, skipping values that are not objects
	pub fn from_values(resource_name: impl Into<String>, values: Vec<Value>) -> Self {
		let records = values
			.into_iter()
			.filter_map(|value| match value {
				Value::Object(map) => Some(map),
				_ => None,
			})
			.collect();
		Self::new(resource_name, records)
	}

	/// Overrides the primary-key field
	pub fn with_primary_key(mut self, field: impl Into<String>) -> Self {
		self.primary_key = field.into();
		self
	}

	/// Declares an additional schema field
	pub fn with_field(mut self, field: impl Into<String>) -> Self {
		let field = field.into();
		if !self.fields.contains(&field) {
			self.fields.push(field);
		}
		self
	}

	/// Relations registered for eager loading
	pub fn eager_relations(&self) -> &[String] {
		&self.eager
	}

	fn project(&self, record: &Record) -> Record {
		record
			.iter()
			.filter(|(key, _)| !self.relations.contains(key) || self.eager.contains(key))
			.map(|(key, value)| (key.clone(), value.clone()))
			.collect()
	}
}

impl DataSource for MemorySource {
	fn fetch_page(&self, request: &PageRequest) -> GridResult<Page> {
		let mut records: Vec<&Record> = self.records.iter().collect();

		if let Some(sort) = &request.sort {
			records.sort_by(|a, b| {
				let ordering = compare_values(
					a.get(&sort.field).unwrap_or(&Value::Null),
					b.get(&sort.field).unwrap_or(&Value::Null),
				);
				match sort.direction {
					SortDirection::Ascending => ordering,
					SortDirection::Descending => ordering.reverse(),
				}
			});
		}

		let total = records.len();
		let records = records
			.into_iter()
			.skip(request.offset())
			.take(request.per_page)
			.map(|record| self.project(record))
			.collect();

		Ok(Page {
			records,
			info: PageInfo {
				page: request.page,
				per_page: request.per_page,
				total,
			},
		})
	}

	fn has_field(&self, name: &str) -> bool {
		self.fields.iter().any(|f| f == name)
	}

	fn has_relation(&self, name: &str) -> bool {
		self.relations.iter().any(|r| r == name)
	}

	fn with_relation(&mut self, name: &str) {
		if !self.eager.iter().any(|r| r == name) {
			self.eager.push(name.to_string());
		}
	}

	fn primary_key(&self) -> &str {
		&self.primary_key
	}

	fn resource_name(&self) -> &str {
		&self.resource_name
	}
}

/// Orders JSON values: nulls first, then booleans, numbers, strings
fn compare_values(a: &Value, b: &Value) -> Ordering {
	fn rank(value: &Value) -> u8 {
		match value {
			Value::Null => 0,
			Value::Bool(_) => 1,
			Value::Number(_) => 2,
			Value::String(_) => 3,
			Value::Array(_) | Value::Object(_) => 4,
		}
	}

	match (a, b) {
		(Value::Bool(a), Value::Bool(b)) => a.cmp(b),
		(Value::Number(a), Value::Number(b)) => {
			let a = a.as_f64().unwrap_or(0.0);
			let b = b.as_f64().unwrap_or(0.0);
			a.total_cmp(&b)
		}
		(Value::String(a), Value::String(b)) => a.cmp(b),
		_ => rank(a).cmp(&rank(b)),
	}
}
