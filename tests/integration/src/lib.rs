//! Integration test support for reinhardt-grid
//!
//! Provides a typed data source standing in for an ORM model, shared by the
//! integration tests under `integration/tests`.

use reinhardt_grid::{DataSource, GridResult, Page, PageInfo, PageRequest, Record};
use serde::Serialize;
use serde_json::Value;
use std::cell::Cell;

#[derive(Debug, Clone, Serialize)]
pub struct Author {
	pub id: i64,
	pub name: String,
	pub email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Post {
	pub id: i64,
	pub name: String,
	pub email: String,
	pub author_id: i64,
}

/// Typed store with an `author` relation, loading it only when asked
///
/// Counts fetches in `fetches`; `offline` makes every fetch fail.
pub struct PostStore {
	pub posts: Vec<Post>,
	pub authors: Vec<Author>,
	pub load_author: bool,
	pub fetches: Cell<usize>,
	pub offline: bool,
}

impl PostStore {
	fn record(&self, post: &Post) -> GridResult<Record> {
		let value = serde_json::to_value(post).map_err(anyhow::Error::from)?;
		let Value::Object(mut record) = value else {
			return Err(anyhow::anyhow!("post did not serialize to an object").into());
		};
		if self.load_author {
			let author = self
				.authors
				.iter()
				.find(|a| a.id == post.author_id)
				.map(serde_json::to_value)
				.transpose()
				.map_err(anyhow::Error::from)?
				.unwrap_or(Value::Null);
			record.insert("author".to_string(), author);
		}
		Ok(record)
	}
}

impl DataSource for PostStore {
	fn fetch_page(&self, request: &PageRequest) -> GridResult<Page> {
		self.fetches.set(self.fetches.get() + 1);
		if self.offline {
			return Err(anyhow::anyhow!("connection refused").into());
		}

		let records = self
			.posts
			.iter()
			.skip(request.offset())
			.take(request.per_page)
			.map(|post| self.record(post))
			.collect::<GridResult<Vec<_>>>()?;

		Ok(Page {
			records,
			info: PageInfo {
				page: request.page,
				per_page: request.per_page,
				total: self.posts.len(),
			},
		})
	}

	fn has_field(&self, name: &str) -> bool {
		matches!(name, "id" | "name" | "email" | "author_id")
	}

	fn has_relation(&self, name: &str) -> bool {
		name == "author"
	}

	fn with_relation(&mut self, name: &str) {
		if name == "author" {
			self.load_author = true;
		}
	}

	fn resource_name(&self) -> &str {
		"posts"
	}
}

/// Two posts by two authors, ids 42 and 43
pub fn post_store() -> PostStore {
	PostStore {
		posts: vec![
			Post {
				id: 42,
				name: "Launch".to_string(),
				email: "launch@example.com".to_string(),
				author_id: 1,
			},
			Post {
				id: 43,
				name: "Follow-up".to_string(),
				email: "follow@example.com".to_string(),
				author_id: 2,
			},
		],
		authors: vec![
			Author {
				id: 1,
				name: "Alice".to_string(),
				email: "alice@example.com".to_string(),
			},
			Author {
				id: 2,
				name: "Bob".to_string(),
				email: "bob@example.com".to_string(),
			},
		],
		load_author: false,
		fetches: Cell::new(0),
		offline: false,
	}
}
