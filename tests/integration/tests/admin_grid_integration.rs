//! Admin grid integration tests
//!
//! Drives grids end to end through the facade: a typed store standing in for
//! the ORM, relation columns, virtual columns, actions, settings loaded from
//! TOML, and rendering through both renderers.

use proptest::prelude::*;
use reinhardt_grid::FallbackRenderer;
use reinhardt_grid::prelude::*;
use reinhardt_grid_integration_tests::{PostStore, post_store};
use rstest::*;
use serde_json::{Value, json};
use std::cell::Cell;

#[fixture]
fn store() -> PostStore {
	post_store()
}

#[rstest]
fn test_relation_column_eager_loads_and_labels(mut store: PostStore) {
	let mut grid = Grid::new(&mut store, |grid| {
		grid.column("name", "Name")?;
		grid.column("author.email", None)?;
		Ok(())
	});

	grid.build().unwrap();

	assert_eq!(grid.columns()[1].label(), "Email");
	assert!(grid.source().load_author);
	let emails: Vec<&Value> = grid.rows().iter().filter_map(|r| r.get("author.email")).collect();
	assert_eq!(emails, vec![&json!("alice@example.com"), &json!("bob@example.com")]);
}

#[rstest]
fn test_edit_and_delete_actions(mut store: PostStore) {
	let mut grid = Grid::new(&mut store, |grid| {
		grid.actions("edit|delete");
		Ok(())
	});
	grid.build().unwrap();

	let links = grid.render_actions(&RowId::from(42_i64));

	let targets: Vec<(Operation, &str)> =
		links.iter().map(|l| (l.operation, l.href.as_str())).collect();
	assert_eq!(
		targets,
		vec![(Operation::Edit, "/posts/42/edit"), (Operation::Delete, "/posts/42")]
	);
	assert_eq!(links[1].method, "DELETE");
	assert!(links.iter().all(|l| l.operation != Operation::Show));
}

#[rstest]
fn test_virtual_columns_against_typed_store(mut store: PostStore) {
	let registered = Cell::new(Vec::new());
	let mut grid = Grid::new(&mut store, |grid| {
		let mut names = Vec::new();
		for name in ["email", "author", "nonexistent"] {
			if let Some(column) = grid.resolve_virtual_column(name, None)? {
				names.push(column.name().to_string());
			}
		}
		registered.set(names);
		Ok(())
	});

	grid.build().unwrap();

	assert_eq!(registered.take(), vec!["email".to_string(), "author".to_string()]);
	assert_eq!(grid.columns().len(), 2);
	assert_eq!(grid.rows()[0].get("email"), Some(&json!("launch@example.com")));
	assert_eq!(grid.rows()[0].get("author").and_then(|a| a.get("name")), Some(&json!("Alice")));
}

#[rstest]
fn test_build_runs_callback_and_fetch_once(mut store: PostStore) {
	let calls = Cell::new(0);
	let mut grid = Grid::new(&mut store, |grid| {
		calls.set(calls.get() + 1);
		grid.add_columns(["id", "name"])?;
		Ok(())
	});

	grid.build().unwrap();
	let rows = grid.rows().to_vec();
	let values: Vec<Record> = rows.iter().map(|r| r.values().clone()).collect();
	grid.build().unwrap();
	grid.render().unwrap();

	assert_eq!(calls.get(), 1);
	assert_eq!(grid.source().fetches.get(), 1);
	assert_eq!(grid.rows(), rows.as_slice());
	let again: Vec<Record> = grid.rows().iter().map(|r| r.values().clone()).collect();
	assert_eq!(values, again);
}

#[rstest]
fn test_offline_store_error_propagates(mut store: PostStore) {
	store.offline = true;
	let mut grid = Grid::new(&mut store, |grid| {
		grid.column("name", None)?;
		Ok(())
	});

	let err = grid.render().unwrap_err();

	assert!(matches!(&err, GridError::DataSource(e) if e.to_string() == "connection refused"));
	assert_eq!(grid.to_string(), "");
}

#[rstest]
fn test_settings_from_toml_drive_the_grid(mut store: PostStore) {
	let settings = GridSettings::from_toml(
		r#"
		per_page = 1
		default_actions = "show"
		strict_columns = true
		"#,
	)
	.unwrap();
	let mut grid = Grid::new(&mut store, |grid| {
		grid.column("name", None)?;
		Ok(())
	})
	.with_settings(settings)
	.with_renderer(FallbackRenderer);

	let html = grid.render().unwrap();

	assert_eq!(grid.rows().len(), 1);
	assert!(html.contains(r#"href="/posts/42""#));
	assert!(!html.contains("/posts/42/edit"));
	assert!(html.contains(r#"href="/posts?page=2""#));
}

#[rstest]
fn test_strict_settings_reject_unknown_virtual_column(mut store: PostStore) {
	let mut grid = Grid::new(&mut store, |grid| {
		grid.resolve_virtual_column("nonexistent", None)?;
		Ok(())
	})
	.with_settings(GridSettings::default().with_strict_columns(true));

	assert!(matches!(grid.build(), Err(GridError::Configuration(_))));
	assert_eq!(grid.state(), reinhardt_grid::GridState::Failed);
}

#[rstest]
fn test_tera_render_round_trip(mut store: PostStore) {
	let mut grid = Grid::new(&mut store, |grid| {
		grid.title("Posts <all>");
		grid.column("name", "Name")?;
		grid.column("author.name", "Author")?;
		Ok(())
	})
	.with_resource("/admin/posts")
	.with_renderer(TeraRenderer::new().unwrap());

	let first = grid.render().unwrap();
	let second = grid.render().unwrap();

	assert_eq!(first, second);
	assert!(first.contains("<h2>Posts &lt;all&gt;</h2>"));
	assert!(first.contains("<td>Alice</td>"));
	assert!(first.contains(r#"href="/admin/posts/43/edit""#));
}

proptest! {
	#[test]
	fn prop_rows_hold_one_value_per_column(
		names in proptest::sample::subsequence(vec!["id", "name", "email", "author_id", "author.name"], 0..=5)
	) {
		let mut store = post_store();
		let expected: Vec<String> = names.iter().map(|n| n.to_string()).collect();
		let mut grid = Grid::new(&mut store, |grid| {
			grid.add_columns(names.iter().copied())?;
			Ok(())
		});

		grid.build().unwrap();

		for row in grid.rows() {
			let keys: Vec<String> = row.values().keys().cloned().collect();
			prop_assert_eq!(&keys, &expected);
		}
	}
}
