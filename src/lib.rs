//! # Reinhardt Grid
//!
//! Declarative data grids for admin panels.
//!
//! A grid is configured by a callback that registers columns (plain fields,
//! `relation.field` paths, or virtual columns resolved against the data
//! source), row actions, and display options. Building fetches one page from
//! a [`DataSource`], turns each record into a [`Row`], and renders the result
//! through a [`TemplateRenderer`].
//!
//! ## Feature Flags
//!
//! - `templates` (default) - Tera-backed rendering with the built-in
//!   `grid.tpl` (via `reinhardt-grid-templates`)
//!
//! Without `templates`, grids render through [`FallbackRenderer`], a plain
//! HTML table writer.
//!
//! ## Quick Example
//!
//! ```rust
//! use reinhardt_grid::prelude::*;
//! use serde_json::json;
//!
//! let mut source = MemorySource::from_values("posts", vec![
//!     json!({"id": 42, "title": "Hello", "author": {"email": "alice@example.com"}}),
//! ]);
//!
//! let mut grid = Grid::new(&mut source, |grid| {
//!     grid.title("Posts");
//!     grid.column("title", "Title")?;
//!     grid.column("author.email", None)?;
//!     grid.actions("edit|delete");
//!     Ok(())
//! });
//!
//! let html = grid.render()?;
//! assert!(html.contains("alice@example.com"));
//! assert!(html.contains("/posts/42/edit"));
//! # Ok::<(), GridError>(())
//! ```

pub use reinhardt_grid_core::{
	ActionLink, Actions, Column, ColumnContext, ColumnSpec, DEFAULT_ACTIONS, DataSource,
	FallbackRenderer, Grid, GridContext, GridError, GridOptions, GridResult, GridSettings,
	GridState, MemorySource, Operation, Page, PageInfo, PageRequest, PaginationContext, Record,
	RelationRef, Row, RowContext, RowId, Sort, SortDirection, TemplateRenderer, display_value,
};

#[cfg(feature = "templates")]
pub use reinhardt_grid_templates::{GRID_TEMPLATE, TeraRenderer};

/// Prelude module for convenient imports
///
/// ```rust
/// use reinhardt_grid::prelude::*;
/// ```
pub mod prelude {
	pub use crate::{
		Actions, Column, DataSource, Grid, GridError, GridResult, GridSettings, MemorySource,
		Operation, Record, Row, RowId, TemplateRenderer,
	};

	#[cfg(feature = "templates")]
	pub use crate::TeraRenderer;
}
