//! Per-row actions
//!
//! Every grid row gets the same set of operation links (show, edit, delete),
//! parameterized by the row id and the grid's base resource path.

use crate::error::{GridError, GridResult};
use crate::row::RowId;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default action spec installed when a grid configures none
pub const DEFAULT_ACTIONS: &str = "show|edit|delete";

/// Characters escaped when a row id is used as a path segment
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
	.remove(b'-')
	.remove(b'_')
	.remove(b'.')
	.remove(b'~');

/// Operation available on a row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
	/// Detail page
	Show,
	/// Edit form
	Edit,
	/// Deletion
	Delete,
}

impl Operation {
	/// Token used in action specs
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Show => "show",
			Self::Edit => "edit",
			Self::Delete => "delete",
		}
	}

	/// Link text
	pub fn label(&self) -> &'static str {
		match self {
			Self::Show => "Show",
			Self::Edit => "Edit",
			Self::Delete => "Delete",
		}
	}

	/// HTTP method the link targets
	pub fn method(&self) -> &'static str {
		match self {
			Self::Show | Self::Edit => "GET",
			Self::Delete => "DELETE",
		}
	}

	fn href(&self, base_path: &str, row_id: &RowId) -> String {
		let id = utf8_percent_encode(row_id.as_str(), PATH_SEGMENT);
		match self {
			Self::Show | Self::Delete => format!("{}/{}", base_path, id),
			Self::Edit => format!("{}/{}/edit", base_path, id),
		}
	}
}

impl fmt::Display for Operation {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Operation {
	type Err = GridError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"show" => Ok(Self::Show),
			"edit" => Ok(Self::Edit),
			"delete" => Ok(Self::Delete),
			other => Err(GridError::configuration(format!(
				"unknown action '{}', expected one of show, edit, delete",
				other
			))),
		}
	}
}

/// Rendered link for one operation of one row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionLink {
	/// Operation the link performs
	pub operation: Operation,
	/// Link text
	pub label: String,
	/// Link target
	pub href: String,
	/// HTTP method
	pub method: String,
}

/// Ordered set of enabled row operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actions {
	operations: Vec<Operation>,
}

impl Actions {
	/// Parses a pipe-delimited action spec
	///
	/// Unknown tokens are skipped with a warning and duplicates collapse to
	/// their first occurrence.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_grid_core::{Actions, Operation};
	///
	/// let actions = Actions::parse("edit|delete|edit|archive");
	/// assert_eq!(actions.operations(), &[Operation::Edit, Operation::Delete]);
	/// ```
	pub fn parse(spec: &str) -> Self {
		let mut actions = Self::none();
		for token in tokens(spec) {
			match token.parse() {
				Ok(operation) => actions.insert(operation),
				Err(_) => tracing::warn!(token, spec, "Ignoring unknown grid action"),
			}
		}
		actions
	}

	/// Parses a pipe-delimited action spec, rejecting unknown tokens
	pub fn parse_strict(spec: &str) -> GridResult<Self> {
		let mut actions = Self::none();
		for token in tokens(spec) {
			actions.insert(token.parse()?);
		}
		Ok(actions)
	}

	/// An empty action set
	pub fn none() -> Self {
		Self {
			operations: Vec::new(),
		}
	}

	fn insert(&mut self, operation: Operation) {
		if !self.operations.contains(&operation) {
			self.operations.push(operation);
		}
	}

	/// Enabled operations, in the order they were given
	pub fn operations(&self) -> &[Operation] {
		&self.operations
	}

	/// Returns whether an operation is enabled
	pub fn contains(&self, operation: Operation) -> bool {
		self.operations.contains(&operation)
	}

	/// Builds the links of one row
	///
	/// A trailing `/` on `base_path` is ignored.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_grid_core::{Actions, RowId};
	///
	/// let links = Actions::parse("edit|delete").render(&RowId::from(42_i64), "/posts");
	/// assert_eq!(links[0].href, "/posts/42/edit");
	/// assert_eq!(links[1].href, "/posts/42");
	/// assert_eq!(links[1].method, "DELETE");
	/// ```
	pub fn render(&self, row_id: &RowId, base_path: &str) -> Vec<ActionLink> {
		let base_path = base_path.trim_end_matches('/');
		self.operations
			.iter()
			.map(|operation| ActionLink {
				operation: *operation,
				label: operation.label().to_string(),
				href: operation.href(base_path, row_id),
				method: operation.method().to_string(),
			})
			.collect()
	}

	/// Renders the links of one row as HTML anchors
	pub fn render_html(&self, row_id: &RowId, base_path: &str) -> String {
		self.render(row_id, base_path)
			.iter()
			.map(|link| {
				format!(
					r#"<a href="{}" class="grid-action grid-action-{}" data-method="{}">{}</a>"#,
					html_escape::encode_double_quoted_attribute(&link.href),
					link.operation,
					link.method.to_lowercase(),
					html_escape::encode_text(&link.label),
				)
			})
			.collect::<Vec<_>>()
			.join(" ")
	}
}

impl Default for Actions {
	fn default() -> Self {
		Self::parse(DEFAULT_ACTIONS)
	}
}

fn tokens(spec: &str) -> impl Iterator<Item = &str> {
	spec.split('|').map(str::trim).filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[test]
	fn test_default_actions() {
		let actions = Actions::default();
		assert_eq!(
			actions.operations(),
			&[Operation::Show, Operation::Edit, Operation::Delete]
		);
	}

	#[test]
	fn test_edit_delete_links() {
		let actions = Actions::parse("edit|delete");
		let links = actions.render(&RowId::from(42_i64), "/posts");

		assert_eq!(links.len(), 2);
		assert_eq!(links[0].operation, Operation::Edit);
		assert_eq!(links[0].href, "/posts/42/edit");
		assert_eq!(links[0].method, "GET");
		assert_eq!(links[1].operation, Operation::Delete);
		assert_eq!(links[1].href, "/posts/42");
		assert_eq!(links[1].method, "DELETE");
		assert!(!links.iter().any(|l| l.operation == Operation::Show));
	}

	#[rstest]
	#[case("/posts/")]
	#[case("/posts")]
	fn test_show_link_ignores_trailing_slash(#[case] base: &str) {
		let links = Actions::parse("show").render(&RowId::from("7"), base);
		assert_eq!(links[0].href, "/posts/7");
	}

	#[test]
	fn test_row_id_is_percent_encoded() {
		let links = Actions::parse("edit").render(&RowId::from("a b/c"), "/files");
		assert_eq!(links[0].href, "/files/a%20b%2Fc/edit");
	}

	#[rstest]
	#[case("show|show|edit", vec![Operation::Show, Operation::Edit])]
	#[case("delete | show", vec![Operation::Delete, Operation::Show])]
	#[case("archive|edit", vec![Operation::Edit])]
	#[case("", vec![])]
	fn test_parse(#[case] spec: &str, #[case] expected: Vec<Operation>) {
		assert_eq!(Actions::parse(spec).operations(), expected.as_slice());
	}

	#[test]
	fn test_parse_strict_rejects_unknown_tokens() {
		let result = Actions::parse_strict("show|archive");
		assert!(matches!(result, Err(GridError::Configuration(msg)) if msg.contains("archive")));

		let actions = Actions::parse_strict("show|delete").unwrap();
		assert!(actions.contains(Operation::Delete));
		assert!(!actions.contains(Operation::Edit));
	}

	#[test]
	fn test_render_html_escapes_attributes() {
		let html = Actions::parse("show").render_html(&RowId::from("1"), "/a\"b");
		assert_eq!(
			html,
			r#"<a href="/a&quot;b/1" class="grid-action grid-action-show" data-method="get">Show</a>"#
		);
	}
}
