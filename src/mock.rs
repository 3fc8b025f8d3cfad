//! Mock sample builder: the inverse of flattening. Re-nest parameter rows
//! into a plausible JSON value for a mock server response.

use serde_json::{json, Map, Value};

use crate::doc::ParamRow;
use crate::flatten::ParamType;

/// Build a sample value from rows. Rows are expected in flattening order
/// (parents before children); unknown parents are created as objects.
pub fn sample(rows: &[ParamRow]) -> Value {
    let mut root = Value::Object(Map::new());
    for row in rows {
        *slot_for_path(&mut root, &row.name) = placeholder(row);
    }
    root
}

/// `example` wins, then the first enum literal, then a type placeholder.
fn placeholder(row: &ParamRow) -> Value {
    if let Some(example) = &row.example {
        return example.clone();
    }
    if let Some(first) = row.enum_values.first() {
        return first.clone();
    }
    match row.ty {
        ParamType::String => json!("string"),
        ParamType::Number => json!(0),
        ParamType::Boolean => json!(true),
        ParamType::Array => json!([]),
        ParamType::Object => Value::Object(Map::new()),
        ParamType::Null => Value::Null,
    }
}

fn slot_for_path<'a>(root: &'a mut Value, dotted: &str) -> &'a mut Value {
    let mut cursor = root;
    for seg in dotted.split('.') {
        if !cursor.is_object() {
            *cursor = Value::Object(Map::new());
        }
        cursor = &mut cursor[seg];
    }
    cursor
}
