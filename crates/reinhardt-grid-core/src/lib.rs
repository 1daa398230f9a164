//! Declarative data grids for Reinhardt admin panels
//!
//! This crate turns a data source and a configuration callback into an HTML
//! table: columns (plain or across relations), one fetched page of rows,
//! per-row action links, and a render context handed to a template renderer.
//!
//! # Architecture
//!
//! ```mermaid
//! graph TD
//!     A[Grid] --> B[Columns]
//!     A --> C[Rows]
//!     A --> D[Actions]
//!     A --> E[DataSource]
//!     A --> F[TemplateRenderer]
//!     B --> G[RelationRef]
//!     E --> H[MemorySource]
//!     F --> I[FallbackRenderer]
//! ```
//!
//! # Example
//!
//! ```rust
//! use reinhardt_grid_core::{Grid, MemorySource};
//! use serde_json::json;
//!
//! let mut source = MemorySource::from_values("users", vec![
//!     json!({"id": 1, "name": "Alice", "email": "alice@example.com"}),
//!     json!({"id": 2, "name": "Bob", "email": "bob@example.com"}),
//! ]);
//!
//! let mut grid = Grid::new(&mut source, |grid| {
//!     grid.title("Users");
//!     grid.add_columns([("name", "Name"), ("email", "Email")])?;
//!     grid.actions("edit|delete");
//!     Ok(())
//! });
//!
//! let html = grid.render().unwrap();
//! assert!(html.contains("alice@example.com"));
//! assert!(html.contains("/users/2/edit"));
//! ```

#![warn(rustdoc::broken_intra_doc_links)]

pub mod action;
pub mod column;
pub mod error;
pub mod grid;
pub mod options;
pub mod record;
pub mod render;
pub mod row;
pub mod settings;
pub mod source;

// Re-exports for convenience
pub use action::{ActionLink, Actions, DEFAULT_ACTIONS, Operation};
pub use column::{Column, ColumnSpec, RelationRef};
pub use error::{GridError, GridResult};
pub use grid::{Grid, GridState};
pub use options::GridOptions;
pub use record::{Record, display_value};
pub use render::{
	ColumnContext, FallbackRenderer, GridContext, PaginationContext, RowContext, TemplateRenderer,
};
pub use row::{Row, RowId};
pub use settings::GridSettings;
pub use source::{DataSource, MemorySource, Page, PageInfo, PageRequest, Sort, SortDirection};
