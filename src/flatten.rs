//! Schema-inference engine (single-file).
//!
//! Flatten an arbitrary JSON value into an ordered, flat list of parameter
//! rows (dotted name, inferred type, nesting depth). Pre-order: a parent row
//! is followed by its children's rows, then the next sibling. Sibling order
//! is input key order (`serde_json` built with `preserve_order`).
//!
//! Quirks kept on purpose:
//! - A non-object top-level value (null, array, primitive) yields an empty
//!   list rather than an error or a synthetic row.
//! - Arrays are leaves; their element schema is never inferred.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ------------------------------- Policy ---------------------------------- //

/// Nesting cap. Inputs come from `serde_json` so they are acyclic, but depth
/// is still unbounded; past this we bail out instead of growing the walk.
pub const MAX_DEPTH: usize = 64;

// ------------------------------- Types ------------------------------------ //

#[derive(Debug, thiserror::Error)]
pub enum FlattenError {
    #[error("nesting deeper than {MAX_DEPTH} levels at `{path}`")]
    DepthExceeded { path: String },
}

/// Inferred type tag for one row. Numbers are always `number`; the engine
/// does not split integer from float.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Number,
    Boolean,
    Array,
    Object,
    Null,
}

impl ParamType {
    pub fn of(v: &Value) -> Self {
        match v {
            Value::Null => ParamType::Null,
            Value::Bool(_) => ParamType::Boolean,
            Value::Number(_) => ParamType::Number,
            Value::String(_) => ParamType::String,
            Value::Array(_) => ParamType::Array,
            Value::Object(_) => ParamType::Object,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ParamType::String => "string",
            ParamType::Number => "number",
            ParamType::Boolean => "boolean",
            ParamType::Array => "array",
            ParamType::Object => "object",
            ParamType::Null => "null",
        }
    }
}

impl std::fmt::Display for ParamType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One documented field of a payload. `description` is always empty at
/// inference time; callers fill it in later.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: ParamType,
    pub description: String,
    pub depth: usize,
}

// ------------------------------- Engine ----------------------------------- //

/// Flatten a JSON value into ordered parameter rows.
///
/// Deterministic and idempotent: the same input always produces the same
/// sequence. Non-object top-level input yields `Ok(vec![])`.
pub fn flatten(value: &Value) -> Result<Vec<ParameterDescriptor>, FlattenError> {
    flatten_at(value, "", 0)
}

/// Flatten starting from an accumulated dotted `prefix` and nesting `depth`.
/// `flatten` is this with an empty prefix at depth 0.
pub fn flatten_at(
    value: &Value,
    prefix: &str,
    depth: usize,
) -> Result<Vec<ParameterDescriptor>, FlattenError> {
    let Value::Object(map) = value else {
        return Ok(Vec::new());
    };

    // Explicit work stack instead of recursion: depth is input-controlled.
    let mut stack: Vec<(String, usize, &Value)> = Vec::new();
    push_entries(map, prefix, depth, &mut stack);

    let mut rows = Vec::new();
    while let Some((name, depth, val)) = stack.pop() {
        if depth >= MAX_DEPTH {
            return Err(FlattenError::DepthExceeded { path: name });
        }
        rows.push(ParameterDescriptor {
            name: name.clone(),
            ty: ParamType::of(val),
            description: String::new(),
            depth,
        });
        // Only plain maps recurse; arrays, primitives, and null are leaves.
        if let Value::Object(child) = val {
            push_entries(child, &name, depth + 1, &mut stack);
        }
    }
    Ok(rows)
}

/// Push `map`'s entries in reverse so popping yields input key order, with a
/// parent's children surfacing before its next sibling.
fn push_entries<'a>(
    map: &'a Map<String, Value>,
    prefix: &str,
    depth: usize,
    stack: &mut Vec<(String, usize, &'a Value)>,
) {
    for (key, val) in map.iter().rev() {
        let name = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        stack.push((name, depth, val));
    }
}

// ------------------------------- Tests ------------------------------------ //
