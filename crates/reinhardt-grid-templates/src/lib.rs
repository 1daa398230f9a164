//! Tera rendering for Reinhardt data grids
//!
//! [`TeraRenderer`] implements [`TemplateRenderer`] on top of the Tera
//! template engine. The built-in `grid.tpl` is compiled into the crate; a
//! template directory can override it or add templates of its own.
//!
//! Templates ending in `.tpl` are autoescaped. The `escape_attr` filter
//! escapes a value for a double-quoted attribute and marks it safe, so links
//! keep their slashes.
//!
//! # Examples
//!
//! ```rust
//! use reinhardt_grid_core::{Grid, MemorySource};
//! use reinhardt_grid_templates::TeraRenderer;
//! use serde_json::json;
//!
//! let mut source = MemorySource::from_values("posts", vec![
//!     json!({"id": 7, "title": "<Hello>"}),
//! ]);
//!
//! let mut grid = Grid::new(&mut source, |grid| {
//!     grid.column("title", "Title")?;
//!     grid.actions("edit");
//!     Ok(())
//! })
//! .with_renderer(TeraRenderer::new().unwrap());
//!
//! let html = grid.render().unwrap();
//! assert!(html.contains("<td>&lt;Hello&gt;</td>"));
//! assert!(html.contains(r#"href="/posts/7/edit""#));
//! ```

use reinhardt_grid_core::{GridContext, GridError, GridResult, TemplateRenderer, display_value};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tera::Tera;

/// Name of the built-in grid template
pub const GRID_TEMPLATE: &str = "grid.tpl";

const GRID_TEMPLATE_SOURCE: &str = include_str!("../templates/grid.tpl");

/// Escapes a value for a double-quoted HTML attribute
struct EscapeAttr;

impl tera::Filter for EscapeAttr {
	fn filter(&self, value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
		let text = display_value(value);
		Ok(Value::String(
			html_escape::encode_double_quoted_attribute(&text).into_owned(),
		))
	}

	fn is_safe(&self) -> bool {
		true
	}
}

/// Tera-backed grid renderer
#[derive(Clone)]
pub struct TeraRenderer {
	tera: Arc<Tera>,
}

impl TeraRenderer {
	/// Creates a renderer with the built-in `grid.tpl`
	///
	/// # Errors
	///
	/// [`GridError::Template`] if the built-in template fails to compile.
	pub fn new() -> GridResult<Self> {
		let mut tera = Tera::default();
		add_builtin(&mut tera)?;
		Ok(Self::with_tera(tera))
	}

	/// Loads every `.tpl` file under `template_dir`
	///
	/// A `grid.tpl` in the directory replaces the built-in one; otherwise the
	/// built-in template is registered as well.
	///
	/// # Errors
	///
	/// [`GridError::Template`] if a template fails to parse.
	pub fn from_dir(template_dir: impl AsRef<Path>) -> GridResult<Self> {
		let pattern = format!("{}/**/*.tpl", template_dir.as_ref().display());
		let mut tera = Tera::new(&pattern).map_err(|e| {
			GridError::Template(format!("Failed to load grid templates from '{}': {}", pattern, e))
		})?;

		if !tera.get_template_names().any(|name| name == GRID_TEMPLATE) {
			add_builtin(&mut tera)?;
		}
		tracing::debug!(
			pattern = %pattern,
			templates = tera.get_template_names().count(),
			"Loaded grid templates"
		);
		Ok(Self::with_tera(tera))
	}

	/// Wraps a configured Tera instance
	///
	/// Use this to register custom filters or functions. `.tpl` autoescaping
	/// and the `escape_attr` filter are added to the instance.
	pub fn with_tera(mut tera: Tera) -> Self {
		tera.autoescape_on(vec![".tpl", ".html", ".htm", ".xml"]);
		tera.register_filter("escape_attr", EscapeAttr);
		Self {
			tera: Arc::new(tera),
		}
	}

	/// The underlying Tera instance
	pub fn tera(&self) -> &Tera {
		&self.tera
	}
}

fn add_builtin(tera: &mut Tera) -> GridResult<()> {
	tera.add_raw_template(GRID_TEMPLATE, GRID_TEMPLATE_SOURCE)
		.map_err(|e| GridError::Template(format!("Failed to add {}: {}", GRID_TEMPLATE, e)))
}

impl TemplateRenderer for TeraRenderer {
	fn render(&self, template_name: &str, context: &GridContext) -> GridResult<String> {
		let tera_context = tera::Context::from_serialize(context)
			.map_err(|e| GridError::Template(format!("Failed to create context: {}", e)))?;

		self.tera.render(template_name, &tera_context).map_err(|e| {
			tracing::warn!(template = template_name, error = %e, "Grid template failed");
			GridError::Template(format!("Failed to render {}: {}", template_name, e))
		})
	}
}

impl std::fmt::Debug for TeraRenderer {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let mut templates: Vec<&str> = self.tera.get_template_names().collect();
		templates.sort_unstable();
		f.debug_struct("TeraRenderer")
			.field("templates", &templates)
			.finish()
	}
}
