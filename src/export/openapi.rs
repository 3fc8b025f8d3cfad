//! Minimal OpenAPI 3.0.0 fragment: one path, one operation, parameters or a
//! requestBody schema rebuilt from the flattened rows, a 200 response.

use serde_json::{json, Map, Value};

use crate::doc::{EndpointDoc, ParamRow};
use crate::flatten::ParamType;

pub fn build(doc: &EndpointDoc) -> Value {
    let path = if doc.path.is_empty() {
        "/endpoint"
    } else {
        &doc.path
    };
    let method = doc.method.to_lowercase();

    let mut operation = json!({
        "summary": doc.meta.title,
        "description": doc.meta.description,
        "parameters": query_parameters(doc),
        "responses": {
            "200": { "description": "Successful response" }
        }
    });

    if doc.method != "GET" && !doc.request_params.is_empty() {
        operation["requestBody"] = json!({
            "required": true,
            "content": {
                "application/json": { "schema": object_schema(&doc.request_params) }
            }
        });
    }

    json!({
        "openapi": "3.0.0",
        "info": {
            "title": doc.title(),
            "description": doc.meta.description,
            "version": "1.0.0",
        },
        "paths": {
            path: { method: operation }
        }
    })
}

/// Query parameter list for GET operations; empty otherwise.
fn query_parameters(doc: &EndpointDoc) -> Value {
    if doc.method != "GET" {
        return json!([]);
    }
    let params: Vec<Value> = doc
        .request_params
        .iter()
        .map(|p| {
            json!({
                "name": p.name,
                "in": "query",
                "required": p.required,
                "description": p.description,
                "schema": { "type": p.ty.as_str() }
            })
        })
        .collect();
    Value::Array(params)
}

/// Rebuild a nested object schema from pre-ordered rows. A parent row is
/// written before its children reach it, so overwrites cannot clobber them.
fn object_schema(rows: &[ParamRow]) -> Value {
    let mut root = json!({ "type": "object", "properties": {} });
    for row in rows {
        let slot = slot_for_path(&mut root, &row.name);
        *slot = row_schema(row);
    }

    let required: Vec<Value> = rows
        .iter()
        .filter(|r| r.depth == 0 && r.required)
        .map(|r| Value::String(r.name.clone()))
        .collect();
    if !required.is_empty() {
        root["required"] = Value::Array(required);
    }
    root
}

fn row_schema(row: &ParamRow) -> Value {
    let mut schema = match row.ty {
        ParamType::Object => json!({ "type": "object", "properties": {} }),
        ParamType::Array => json!({ "type": "array", "items": {} }),
        // OpenAPI 3.0 has no null type; nullable string is the closest read
        // of a field only ever seen as null.
        ParamType::Null => json!({ "type": "string", "nullable": true }),
        other => json!({ "type": other.as_str() }),
    };
    if !row.description.is_empty() {
        schema["description"] = Value::String(row.description.clone());
    }
    if let Some(example) = &row.example {
        schema["example"] = example.clone();
    }
    if !row.enum_values.is_empty() {
        schema["enum"] = Value::Array(row.enum_values.clone());
    }
    schema
}

fn slot_for_path<'a>(root: &'a mut Value, dotted: &str) -> &'a mut Value {
    let mut cursor = root;
    for seg in dotted.split('.') {
        if !cursor["properties"].is_object() {
            cursor["properties"] = Value::Object(Map::new());
        }
        cursor = &mut cursor["properties"][seg];
        if cursor.is_null() {
            *cursor = json!({ "type": "object" });
        }
    }
    cursor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flatten;
    use serde_json::json;

    fn rows_from(value: &Value, required: bool) -> Vec<ParamRow> {
        flatten::flatten(value)
            .unwrap()
            .into_iter()
            .map(|d| ParamRow::from_descriptor(d, required))
            .collect()
    }

    #[test]
    fn skeleton_has_info_path_and_response() {
        let mut doc = EndpointDoc::new();
        doc.meta.title = "Login".into();
        doc.method = "POST".into();
        doc.path = "/auth/login".into();
        let spec = build(&doc);

        assert_eq!(spec["openapi"], "3.0.0");
        assert_eq!(spec["info"]["title"], "Login");
        assert_eq!(
            spec["paths"]["/auth/login"]["post"]["responses"]["200"]["description"],
            "Successful response"
        );
    }

    #[test]
    fn empty_path_defaults_to_endpoint() {
        let spec = build(&EndpointDoc::new());
        assert!(spec["paths"]["/endpoint"]["get"].is_object());
    }

    #[test]
    fn get_rows_become_query_parameters() {
        let mut doc = EndpointDoc::new();
        doc.request_params = rows_from(&json!({"page": 1}), false);
        let spec = build(&doc);
        let param = &spec["paths"]["/endpoint"]["get"]["parameters"][0];
        assert_eq!(param["name"], "page");
        assert_eq!(param["in"], "query");
        assert_eq!(param["schema"]["type"], "number");
    }

    #[test]
    fn post_rows_become_nested_request_body_schema() {
        let mut doc = EndpointDoc::new();
        doc.method = "POST".into();
        doc.request_params = rows_from(
            &json!({"user": {"name": "a", "age": 3}, "active": true}),
            true,
        );
        let spec = build(&doc);
        let schema = &spec["paths"]["/endpoint"]["post"]["requestBody"]["content"]
            ["application/json"]["schema"];
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["user"]["type"], "object");
        assert_eq!(
            schema["properties"]["user"]["properties"]["name"]["type"],
            "string"
        );
        assert_eq!(
            schema["properties"]["user"]["properties"]["age"]["type"],
            "number"
        );
        assert_eq!(schema["properties"]["active"]["type"], "boolean");
        let required: Vec<_> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert_eq!(required, ["user", "active"]);
    }

    #[test]
    fn null_rows_map_to_nullable() {
        let mut doc = EndpointDoc::new();
        doc.method = "POST".into();
        doc.request_params = rows_from(&json!({"bio": null}), true);
        let spec = build(&doc);
        let schema = &spec["paths"]["/endpoint"]["post"]["requestBody"]["content"]
            ["application/json"]["schema"];
        assert_eq!(schema["properties"]["bio"]["nullable"], true);
    }
}
