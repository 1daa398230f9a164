//! Grid orchestrator
//!
//! A [`Grid`] borrows a [`DataSource`], holds the registered columns and
//! options, and turns one fetched page into rows. Building is lazy: the
//! configuration callback runs the first time [`Grid::build`] (or
//! [`Grid::render`]) is called, exactly once.
//!
//! # Build pipeline
//!
//! 1. Run the configuration callback.
//! 2. Fetch one page from the data source.
//! 3. Apply every column to the records, in registration order. A column
//!    sees the values stored by the columns registered before it.
//! 4. Wrap each record into a [`Row`] keyed by its fetched primary key (or
//!    its index in the page when it has none). Column transforms never change
//!    the id.
//! 5. Run the row post-process hook, if any.
//! 6. Install the default actions when none were configured.
//!
//! # Examples
//!
//! ```
//! use reinhardt_grid_core::{Grid, MemorySource};
//! use serde_json::json;
//!
//! let mut source = MemorySource::from_values("posts", vec![
//!     json!({"id": 1, "title": "Hello", "author": {"email": "alice@example.com"}}),
//! ]);
//!
//! let mut grid = Grid::new(&mut source, |grid| {
//!     grid.title("Posts");
//!     grid.column("title", "Title")?;
//!     grid.column("author.email", None)?;
//!     Ok(())
//! });
//!
//! grid.build().unwrap();
//! assert_eq!(grid.columns()[1].label(), "Email");
//! assert_eq!(grid.rows()[0].get("author.email"), Some(&json!("alice@example.com")));
//! ```

use crate::action::{ActionLink, Actions};
use crate::column::{Column, ColumnSpec, capitalize, parse_dotted};
use crate::error::{GridError, GridResult};
use crate::options::GridOptions;
use crate::record::display_value;
use crate::render::{
	ColumnContext, FallbackRenderer, GridContext, PaginationContext, RowContext, TemplateRenderer,
};
use crate::row::{Row, RowId};
use crate::settings::GridSettings;
use crate::source::{DataSource, PageInfo, PageRequest, Sort};
use serde_json::{Map, Value};
use std::fmt;

/// Configuration callback of a grid
pub type GridBuilderFn<'a, S> = Box<dyn FnOnce(&mut Grid<'a, S>) -> GridResult<()> + 'a>;

type RowMapFn<'a> = Box<dyn Fn(Row) -> Row + 'a>;

/// Lifecycle state of a grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridState {
	/// Configuration callback not run yet
	Unbuilt,
	/// Build in progress (configuration callback running or data being fetched)
	Building,
	/// Rows are available
	Built,
	/// The build failed; the grid cannot be built again
	Failed,
}

/// Declarative data grid over a borrowed data source
pub struct Grid<'a, S: DataSource> {
	source: &'a mut S,
	builder: Option<GridBuilderFn<'a, S>>,
	columns: Vec<Column>,
	rows: Vec<Row>,
	options: GridOptions,
	settings: GridSettings,
	actions: Option<Actions>,
	row_mapper: Option<RowMapFn<'a>>,
	page: usize,
	per_page: Option<usize>,
	sort: Option<Sort>,
	page_info: Option<PageInfo>,
	variables: Map<String, Value>,
	resource: Option<String>,
	renderer: Box<dyn TemplateRenderer + 'a>,
	state: GridState,
}

impl<'a, S: DataSource> Grid<'a, S> {
	/// Creates a grid over `source`, configured by `builder` on first build
	pub fn new<F>(source: &'a mut S, builder: F) -> Self
	where
		F: FnOnce(&mut Grid<'a, S>) -> GridResult<()> + 'a,
	{
		Self {
			source,
			builder: Some(Box::new(builder)),
			columns: Vec::new(),
			rows: Vec::new(),
			options: GridOptions::default(),
			settings: GridSettings::default(),
			actions: None,
			row_mapper: None,
			page: 1,
			per_page: None,
			sort: None,
			page_info: None,
			variables: Map::new(),
			resource: None,
			renderer: Box::new(FallbackRenderer),
			state: GridState::Unbuilt,
		}
	}

	/// Replaces the site-wide settings
	pub fn with_settings(mut self, settings: GridSettings) -> Self {
		self.settings = settings;
		self
	}

	/// Sets the base resource path used for action and pagination links
	///
	/// Defaults to `/{resource_name}` of the data source.
	pub fn with_resource(mut self, path: impl Into<String>) -> Self {
		self.resource = Some(path.into());
		self
	}

	/// Sets the template renderer (defaults to [`FallbackRenderer`])
	pub fn with_renderer<R>(mut self, renderer: R) -> Self
	where
		R: TemplateRenderer + 'a,
	{
		self.renderer = Box::new(renderer);
		self
	}

	fn ensure_configurable(&self) -> GridResult<()> {
		match self.state {
			GridState::Unbuilt | GridState::Building => Ok(()),
			GridState::Built | GridState::Failed => Err(GridError::configuration(
				"columns cannot be registered after the grid is built",
			)),
		}
	}

	fn push_column(&mut self, column: Column) -> GridResult<&mut Column> {
		if self.columns.iter().any(|c| c.name() == column.name()) {
			return Err(GridError::configuration(format!(
				"column '{}' is already registered",
				column.name()
			)));
		}
		self.columns.push(column);
		let index = self.columns.len() - 1;
		Ok(&mut self.columns[index])
	}

	/// Registers a column
	///
	/// Plain names read the field directly; an absent label defaults to the
	/// upper-cased name. Dotted names (`"author.email"`) read a field of a
	/// related entity, register the relation for eager loading, and default
	/// their label to the capitalized field (`"Email"`).
	///
	/// # Errors
	///
	/// [`GridError::Configuration`] for an empty or malformed name, a dotted
	/// prefix that is not a relation of the data source, a duplicate name, or
	/// a grid that is already built.
	pub fn column<'l>(
		&mut self,
		name: &str,
		label: impl Into<Option<&'l str>>,
	) -> GridResult<&mut Column> {
		self.ensure_configurable()?;
		let label = label.into().filter(|l| !l.is_empty());

		let Some(relation) = parse_dotted(name)? else {
			return self.push_column(Column::new(name, label.unwrap_or_default())?);
		};

		if !self.source.has_relation(&relation.relation) {
			return Err(GridError::configuration(format!(
				"'{}' in column '{}' is not a relation of '{}'",
				relation.relation,
				name,
				self.source.resource_name()
			)));
		}
		self.source.with_relation(&relation.relation);

		let label = match (label, &relation.field) {
			(Some(label), _) => label.to_string(),
			(None, Some(field)) => capitalize(field),
			(None, None) => capitalize(&relation.relation),
		};
		let mut column = Column::new(name, label)?;
		column.bind_relation(relation.relation, relation.field);
		self.push_column(column)
	}

	/// Registers several columns
	///
	/// Accepts `"name"` or `("name", "Label")` items.
	///
	/// ```
	/// use reinhardt_grid_core::{Grid, MemorySource};
	///
	/// let mut source = MemorySource::new("users", vec![]);
	/// let mut grid = Grid::new(&mut source, |grid| {
	///     grid.add_columns(["id", "name"])?;
	///     grid.add_columns([("email", "E-mail")])?;
	///     Ok(())
	/// });
	/// grid.build().unwrap();
	/// assert_eq!(grid.columns().len(), 3);
	/// ```
	pub fn add_columns<I, C>(&mut self, specs: I) -> GridResult<()>
	where
		I: IntoIterator<Item = C>,
		C: Into<ColumnSpec>,
	{
		for spec in specs {
			let spec = spec.into();
			self.column(&spec.name, spec.label.as_deref())?;
		}
		Ok(())
	}

	/// Registered columns, in registration order
	pub fn columns(&self) -> &[Column] {
		&self.columns
	}

	/// Registers a column by name only, looking the name up on the entity
	///
	/// - A schema field becomes a plain column labeled with the capitalized
	///   name (or `label`).
	/// - A relation accessor is registered for eager loading and becomes a
	///   column holding the whole related entity.
	/// - Anything else registers nothing and returns `Ok(None)`, unless
	///   [`GridSettings::strict_columns`] is set.
	///
	/// # Errors
	///
	/// [`GridError::Configuration`] for an unknown name in strict mode, a
	/// duplicate name, or a grid that is already built.
	pub fn resolve_virtual_column<'l>(
		&mut self,
		name: &str,
		label: impl Into<Option<&'l str>>,
	) -> GridResult<Option<&mut Column>> {
		self.ensure_configurable()?;
		let label = label
			.into()
			.filter(|l| !l.is_empty())
			.map(str::to_string)
			.unwrap_or_else(|| capitalize(name));

		if self.source.has_field(name) {
			let column = Column::new(name, label)?;
			return self.push_column(column).map(Some);
		}

		if self.source.has_relation(name) {
			self.source.with_relation(name);
			let mut column = Column::new(name, label)?;
			column.bind_relation(name, None);
			return self.push_column(column).map(Some);
		}

		if self.settings.strict_columns {
			return Err(GridError::configuration(format!(
				"'{}' is neither a field nor a relation of '{}'",
				name,
				self.source.resource_name()
			)));
		}

		tracing::warn!(
			column = name,
			resource = self.source.resource_name(),
			"Ignoring unknown virtual column"
		);
		Ok(None)
	}

	/// Built rows (empty until the grid is built)
	pub fn rows(&self) -> &[Row] {
		&self.rows
	}

	/// Registers a function applied to every row after the build
	///
	/// Each row is replaced by the function's return value.
	pub fn map_rows<F>(&mut self, f: F) -> &mut Self
	where
		F: Fn(Row) -> Row + 'a,
	{
		self.row_mapper = Some(Box::new(f));
		self
	}

	/// Sets the row actions from a pipe-delimited spec (`"show|edit|delete"`)
	pub fn actions(&mut self, spec: &str) -> &mut Self {
		self.actions = Some(Actions::parse(spec));
		self
	}

	/// Sets the row actions
	pub fn set_actions(&mut self, actions: Actions) -> &mut Self {
		self.actions = Some(actions);
		self
	}

	/// Configured row actions (the defaults are installed by the build)
	pub fn row_actions(&self) -> Option<&Actions> {
		self.actions.as_ref()
	}

	/// Builds the action links of one row
	pub fn render_actions(&self, row_id: &RowId) -> Vec<ActionLink> {
		let resource = self.resource();
		match &self.actions {
			Some(actions) => actions.render(row_id, &resource),
			None => Actions::parse(&self.settings.default_actions).render(row_id, &resource),
		}
	}

	/// Sets the grid title
	pub fn title(&mut self, title: impl Into<String>) -> &mut Self {
		self.options.title = title.into();
		self
	}

	/// Sets a display option
	pub fn set_option(&mut self, key: &str, value: impl Into<String>) -> &mut Self {
		self.options.set(key, value);
		self
	}

	/// Reads a display option
	///
	/// # Errors
	///
	/// [`GridError::NotFound`] for a key that was never set.
	pub fn option(&self, key: &str) -> GridResult<&str> {
		self.options.get(key)
	}

	/// Display options
	pub fn options(&self) -> &GridOptions {
		&self.options
	}

	/// Adds extra template variables to the render context
	///
	/// Variables are merged at the top level of the context and override
	/// grid entries of the same name.
	pub fn with<I, K>(&mut self, variables: I) -> &mut Self
	where
		I: IntoIterator<Item = (K, Value)>,
		K: Into<String>,
	{
		for (key, value) in variables {
			self.variables.insert(key.into(), value);
		}
		self
	}

	/// Selects the page to fetch; the page size is clamped to
	/// [`GridSettings::max_per_page`]
	pub fn paginate(&mut self, page: usize, per_page: usize) -> &mut Self {
		self.page = page.max(1);
		self.per_page = Some(per_page);
		self
	}

	/// Sets the sort order (`"name"` ascending, `"-name"` descending)
	pub fn order_by(&mut self, expr: &str) -> &mut Self {
		self.sort = Some(Sort::parse(expr));
		self
	}

	/// Page request passed to the data source
	pub fn page_request(&self) -> PageRequest {
		let per_page = self
			.settings
			.clamp_per_page(self.per_page.unwrap_or(self.settings.per_page));
		let mut request = PageRequest::new(self.page, per_page);
		request.sort = self.sort.clone();
		request
	}

	/// Pagination metadata of the fetched page
	pub fn page_info(&self) -> Option<&PageInfo> {
		self.page_info.as_ref()
	}

	/// Page navigation of the fetched page
	pub fn pagination(&self) -> Option<PaginationContext> {
		let resource = self.resource();
		self.page_info
			.as_ref()
			.map(|info| PaginationContext::new(info, &resource, self.sort.as_ref()))
	}

	/// The data source
	pub fn source(&self) -> &S {
		&*self.source
	}

	/// The data source, mutably (e.g. to register eager loads)
	pub fn source_mut(&mut self) -> &mut S {
		&mut *self.source
	}

	/// Settings in effect
	pub fn settings(&self) -> &GridSettings {
		&self.settings
	}

	/// Base resource path of action and pagination links
	pub fn resource(&self) -> String {
		self.resource
			.clone()
			.unwrap_or_else(|| format!("/{}", self.source.resource_name()))
	}

	/// Lifecycle state
	pub fn state(&self) -> GridState {
		self.state
	}

	/// Returns whether the grid is built
	pub fn is_built(&self) -> bool {
		self.state == GridState::Built
	}

	/// Runs the build pipeline once
	///
	/// Later calls are no-ops.
	///
	/// # Errors
	///
	/// Errors from the configuration callback, [`GridError::DataSource`] from
	/// the fetch, and [`GridError::Configuration`] when called again after a
	/// failed build or from inside the configuration callback.
	pub fn build(&mut self) -> GridResult<()> {
		match self.state {
			GridState::Built => return Ok(()),
			GridState::Building => {
				return Err(GridError::configuration(
					"build() cannot be called from the configuration callback",
				));
			}
			GridState::Failed => {
				return Err(GridError::configuration("a previous build of this grid failed"));
			}
			GridState::Unbuilt => {}
		}

		tracing::debug!(resource = self.source.resource_name(), "Building grid");
		self.state = GridState::Building;
		match self.run_build() {
			Ok(()) => {
				self.state = GridState::Built;
				tracing::debug!(
					resource = self.source.resource_name(),
					columns = self.columns.len(),
					rows = self.rows.len(),
					"Grid built"
				);
				Ok(())
			}
			Err(e) => {
				self.state = GridState::Failed;
				Err(e)
			}
		}
	}

	fn run_build(&mut self) -> GridResult<()> {
		if let Some(builder) = self.builder.take() {
			builder(self)?;
		}

		let page = self.source.fetch_page(&self.page_request())?;

		// Ids come from the fetched records, before any column transform
		let primary_key = self.source.primary_key();
		let ids: Vec<RowId> = page
			.records
			.iter()
			.enumerate()
			.map(|(index, record)| {
				record
					.get(primary_key)
					.and_then(RowId::from_value)
					.unwrap_or_else(|| RowId::from(index))
			})
			.collect();

		let mut records = page.records;
		for column in &self.columns {
			records = column.apply(records);
		}

		let mut rows: Vec<Row> = ids
			.into_iter()
			.zip(records)
			.map(|(id, record)| {
				let values = self
					.columns
					.iter()
					.map(|column| {
						let value = record.get(column.name()).cloned().unwrap_or(Value::Null);
						(column.name().to_string(), value)
					})
					.collect();
				Row::new(id, values)
			})
			.collect();

		if let Some(mapper) = &self.row_mapper {
			rows = rows.into_iter().map(mapper).collect();
		}

		if self.actions.is_none() {
			self.actions = Some(Actions::parse(&self.settings.default_actions));
		}

		self.rows = rows;
		self.page_info = Some(page.info);
		Ok(())
	}

	/// Render context of the grid in its current state
	pub fn context(&self) -> GridContext {
		let resource = self.resource();
		let default_actions;
		let actions = match &self.actions {
			Some(actions) => actions,
			None => {
				default_actions = Actions::parse(&self.settings.default_actions);
				&default_actions
			}
		};

		GridContext {
			title: self.options.title.clone(),
			columns: self
				.columns
				.iter()
				.map(|column| ColumnContext {
					name: column.name().to_string(),
					label: column.label().to_string(),
				})
				.collect(),
			rows: self
				.rows
				.iter()
				.map(|row| RowContext {
					id: row.id().clone(),
					cells: self
						.columns
						.iter()
						.map(|column| row.get(column.name()).map(display_value).unwrap_or_default())
						.collect(),
					values: row.values().clone(),
					actions: actions.render(row.id(), &resource),
				})
				.collect(),
			pagination: self.pagination(),
			options: self.options.to_map(),
			extra: self.variables.clone(),
			resource,
		}
	}

	/// Builds the grid if needed and renders it with the configured template
	///
	/// # Errors
	///
	/// Build errors, and [`GridError::Template`] from the renderer.
	pub fn render(&mut self) -> GridResult<String> {
		self.build()?;
		self.renderer
			.render(&self.settings.template_name, &self.context())
	}
}

/// Renders a built grid
///
/// Call [`Grid::render`] (or [`Grid::build`]) first: formatting borrows the
/// grid immutably, so it cannot run the build or report errors. An unbuilt
/// grid or a renderer failure writes nothing and logs a warning.
///
/// ```
/// use reinhardt_grid_core::{Grid, MemorySource};
/// use serde_json::json;
///
/// let mut source = MemorySource::from_values("tags", vec![json!({"id": 1, "name": "rust"})]);
/// let mut grid = Grid::new(&mut source, |grid| {
///     grid.column("name", None)?;
///     Ok(())
/// });
///
/// assert_eq!(grid.to_string(), "");
/// let html = grid.render().unwrap();
/// assert_eq!(grid.to_string(), html);
/// ```
impl<S: DataSource> fmt::Display for Grid<'_, S> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if !self.is_built() {
			tracing::warn!(
				resource = self.source.resource_name(),
				"Formatting a grid that is not built; call Grid::render() or Grid::build() first"
			);
			return Ok(());
		}

		match self
			.renderer
			.render(&self.settings.template_name, &self.context())
		{
			Ok(html) => f.write_str(&html),
			Err(e) => {
				tracing::warn!(error = %e, "Grid rendering failed");
				Ok(())
			}
		}
	}
}

impl<S: DataSource> fmt::Debug for Grid<'_, S> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Grid")
			.field("resource", &self.resource())
			.field("columns", &self.columns)
			.field("rows", &self.rows.len())
			.field("options", &self.options)
			.field("state", &self.state)
			.finish_non_exhaustive()
	}
}
