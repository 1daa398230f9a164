//! Render context and template renderer collaborator
//!
//! A built grid is flattened into a serializable [`GridContext`] which is
//! handed to a [`TemplateRenderer`] together with the configured template
//! name. [`FallbackRenderer`] produces a plain HTML table without any
//! template engine.

use crate::action::ActionLink;
use crate::error::GridResult;
use crate::record::Record;
use crate::row::RowId;
use crate::source::{PageInfo, Sort, SortDirection};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt::Write;

/// Characters escaped in a query parameter value
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
	.remove(b'-')
	.remove(b'_')
	.remove(b'.')
	.remove(b'~');

/// Column header in the render context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnContext {
	/// Column name
	pub name: String,
	/// Header label
	pub label: String,
}

/// Row in the render context
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowContext {
	/// Row id
	pub id: RowId,
	/// Display text per column, in column order
	pub cells: Vec<String>,
	/// Raw values keyed by column name
	pub values: Record,
	/// Action links of the row
	pub actions: Vec<ActionLink>,
}

/// Pagination context
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationContext {
	pub page: usize,
	pub total_pages: usize,
	pub per_page: usize,
	pub total_count: usize,
	pub has_previous: bool,
	pub has_next: bool,
	pub previous_url: Option<String>,
	pub next_url: Option<String>,
}

impl PaginationContext {
	/// Builds page navigation for `resource`
	///
	/// Links carry the `page` query parameter and, when sorted, `sort`. The
	/// sort field is percent-encoded; `resource` is used as given.
	pub fn new(info: &PageInfo, resource: &str, sort: Option<&Sort>) -> Self {
		let url = |page: usize| {
			let mut url = format!("{}?page={}", resource, page);
			if let Some(sort) = sort {
				let prefix = match sort.direction {
					SortDirection::Ascending => "",
					SortDirection::Descending => "-",
				};
				let _ = write!(
					url,
					"&sort={}{}",
					prefix,
					utf8_percent_encode(&sort.field, QUERY_VALUE)
				);
			}
			url
		};

		Self {
			page: info.page,
			total_pages: info.total_pages(),
			per_page: info.per_page,
			total_count: info.total,
			has_previous: info.has_previous(),
			has_next: info.has_next(),
			previous_url: info.has_previous().then(|| url(info.page - 1)),
			next_url: info.has_next().then(|| url(info.page + 1)),
		}
	}
}

/// Everything a template needs to render a grid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridContext {
	/// Grid title
	pub title: String,
	/// Base resource path of action links
	pub resource: String,
	/// Column headers in registration order
	pub columns: Vec<ColumnContext>,
	/// Rows in fetch order
	pub rows: Vec<RowContext>,
	/// Page navigation, absent when nothing was fetched
	pub pagination: Option<PaginationContext>,
	/// Display options, `title` included
	pub options: Map<String, Value>,
	/// Extra template variables, merged at the top level
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

/// Template rendering collaborator
pub trait TemplateRenderer {
	/// Renders the named template with a grid context
	fn render(&self, template_name: &str, context: &GridContext) -> GridResult<String>;
}

/// Plain HTML table renderer
///
/// Ignores the template name. Every piece of text is HTML-escaped.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackRenderer;

impl TemplateRenderer for FallbackRenderer {
	fn render(&self, _template_name: &str, context: &GridContext) -> GridResult<String> {
		use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};

		let mut html = String::from("<div class=\"grid\">\n");
		let _ = writeln!(html, "<h2>{}</h2>", text(&context.title));
		html.push_str("<table class=\"grid-table\">\n<thead>\n<tr>");
		for column in &context.columns {
			let _ = write!(html, "<th>{}</th>", text(&column.label));
		}
		html.push_str("<th></th></tr>\n</thead>\n<tbody>\n");

		for row in &context.rows {
			let _ = write!(html, "<tr data-id=\"{}\">", attr(row.id.as_str()));
			for cell in &row.cells {
				let _ = write!(html, "<td>{}</td>", text(cell));
			}
			html.push_str("<td>");
			let links: Vec<String> = row
				.actions
				.iter()
				.map(|link| {
					format!(
						"<a href=\"{}\" data-method=\"{}\">{}</a>",
						attr(&link.href),
						link.method.to_lowercase(),
						text(&link.label)
					)
				})
				.collect();
			html.push_str(&links.join(" "));
			html.push_str("</td></tr>\n");
		}
		html.push_str("</tbody>\n</table>\n");

		if let Some(pagination) = &context.pagination {
			html.push_str("<nav class=\"grid-pagination\">");
			if let Some(url) = &pagination.previous_url {
				let _ = write!(html, "<a href=\"{}\">&laquo;</a> ", attr(url));
			}
			let _ = write!(
				html,
				"<span>{} / {}</span>",
				pagination.page, pagination.total_pages
			);
			if let Some(url) = &pagination.next_url {
				let _ = write!(html, " <a href=\"{}\">&raquo;</a>", attr(url));
			}
			html.push_str("</nav>\n");
		}

		html.push_str("</div>\n");
		Ok(html)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::action::Actions;
	use serde_json::json;

	fn context() -> GridContext {
		let actions = Actions::parse("edit");
		let id = RowId::from("1");
		GridContext {
			title: "Posts".to_string(),
			resource: "/posts".to_string(),
			columns: vec![ColumnContext {
				name: "title".to_string(),
				label: "Title".to_string(),
			}],
			rows: vec![RowContext {
				actions: actions.render(&id, "/posts"),
				id,
				cells: vec!["<b>Hello</b>".to_string()],
				values: Map::new(),
			}],
			pagination: None,
			options: Map::new(),
			extra: Map::new(),
		}
	}

	#[test]
	fn test_pagination_context_urls() {
		let info = PageInfo {
			page: 2,
			per_page: 10,
			total: 35,
		};
		let sort = Sort::parse("-created_at");

		let ctx = PaginationContext::new(&info, "/posts", Some(&sort));

		assert_eq!(ctx.total_pages, 4);
		assert_eq!(
			ctx.previous_url.as_deref(),
			Some("/posts?page=1&sort=-created_at")
		);
		assert_eq!(ctx.next_url.as_deref(), Some("/posts?page=3&sort=-created_at"));
	}

	#[rstest::rstest]
	#[case("title&page=99", "/posts?page=1&sort=title%26page%3D99")]
	#[case("-a b", "/posts?page=1&sort=-a%20b")]
	#[case("created_at", "/posts?page=1&sort=created_at")]
	fn test_pagination_context_encodes_sort(#[case] expr: &str, #[case] expected: &str) {
		let info = PageInfo {
			page: 2,
			per_page: 10,
			total: 35,
		};
		let sort = Sort::parse(expr);

		let ctx = PaginationContext::new(&info, "/posts", Some(&sort));

		assert_eq!(ctx.previous_url.as_deref(), Some(expected));
	}

	#[test]
	fn test_pagination_context_single_page() {
		let info = PageInfo {
			page: 1,
			per_page: 10,
			total: 3,
		};

		let ctx = PaginationContext::new(&info, "/posts", None);

		assert!(!ctx.has_previous);
		assert!(!ctx.has_next);
		assert_eq!(ctx.previous_url, None);
		assert_eq!(ctx.next_url, None);
	}

	#[test]
	fn test_context_flattens_extra_variables() {
		let mut ctx = context();
		ctx.extra.insert("breadcrumb".to_string(), json!("Home"));

		let value = serde_json::to_value(&ctx).unwrap();

		assert_eq!(value["breadcrumb"], json!("Home"));
		assert_eq!(value["title"], json!("Posts"));
		assert_eq!(value["rows"][0]["actions"][0]["operation"], json!("edit"));
	}

	#[test]
	fn test_fallback_renderer_escapes_cells() {
		let html = FallbackRenderer.render("grid.tpl", &context()).unwrap();

		assert!(html.contains("<h2>Posts</h2>"));
		assert!(html.contains("<th>Title</th>"));
		assert!(html.contains("<td>&lt;b&gt;Hello&lt;/b&gt;</td>"));
		assert!(html.contains(r#"<a href="/posts/1/edit" data-method="get">Edit</a>"#));
		assert!(!html.contains("grid-pagination"));
	}
}
