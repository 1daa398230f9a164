//! Raw record representation shared by data sources and columns

use serde_json::{Map, Value};

/// One fetched record: an ordered `field -> value` map.
///
/// Related entities are nested objects stored under the relation name,
/// e.g. `{"id": 1, "author": {"email": "a@example.com"}}`.
pub type Record = Map<String, Value>;

/// Converts a cell value to the text shown in the table.
///
/// `null` renders as an empty cell; arrays and objects render as compact JSON.
pub fn display_value(value: &Value) -> String {
	match value {
		Value::Null => String::new(),
		Value::String(s) => s.clone(),
		Value::Bool(b) => b.to_string(),
		Value::Number(n) => n.to_string(),
		Value::Array(_) | Value::Object(_) => {
			serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	#[case(json!(null), "")]
	#[case(json!("alice"), "alice")]
	#[case(json!(true), "true")]
	#[case(json!(42), "42")]
	#[case(json!(1.5), "1.5")]
	#[case(json!([1, 2]), "[1,2]")]
	#[case(json!({"name": "Bob", "id": 2}), r#"{"name":"Bob","id":2}"#)]
	fn test_display_value(#[case] value: Value, #[case] expected: &str) {
		assert_eq!(display_value(&value), expected);
	}
}
