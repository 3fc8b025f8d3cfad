//! Endpoint document model: everything the exporters render.
//!
//! Field names serialize camelCase so doc files read like the payloads they
//! describe (`baseUrl`, `requestBody`, `responseParams`).

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

use crate::flatten::{ParamType, ParameterDescriptor};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, thiserror::Error)]
pub enum DocError {
    #[error("failed to read doc file: {0}")]
    Read(#[source] std::io::Error),

    #[error("failed to write doc file: {0}")]
    Write(#[source] std::io::Error),

    #[error("at JSON path {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

/// One editable parameter row: an inferred descriptor plus the fields the
/// user fills in afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParamRow {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: ParamType,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub depth: usize,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
    #[serde(default, rename = "enum", skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<Value>,
}

impl ParamRow {
    pub fn from_descriptor(d: ParameterDescriptor, required: bool) -> Self {
        Self {
            name: d.name,
            ty: d.ty,
            description: d.description,
            depth: d.depth,
            required,
            example: None,
            enum_values: Vec::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocVersion {
    pub label: String,
    pub saved_at: DateTime<Utc>,
    pub doc: Box<EndpointDoc>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointDoc {
    #[serde(default)]
    pub meta: Meta,
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub path: String,
    #[serde(default = "default_method")]
    pub method: String,
    #[serde(default)]
    pub headers: IndexMap<String, String>,
    #[serde(default)]
    pub request_body: Value,
    #[serde(default)]
    pub response: Value,
    #[serde(default)]
    pub request_params: Vec<ParamRow>,
    #[serde(default)]
    pub response_params: Vec<ParamRow>,
    #[serde(default)]
    pub integration_notes: String,
    /// Newest first; `push_snapshot` prepends.
    #[serde(default)]
    pub versions: Vec<DocVersion>,
}

fn default_method() -> String {
    "GET".to_string()
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl EndpointDoc {
    pub fn new() -> Self {
        Self {
            method: default_method(),
            ..Self::default()
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, self.path)
    }

    pub fn title(&self) -> &str {
        if self.meta.title.is_empty() {
            "API Documentation"
        } else {
            &self.meta.title
        }
    }

    pub fn content_type(&self) -> &str {
        self.headers
            .get("Content-Type")
            .map(String::as_str)
            .unwrap_or("application/json")
    }

    /// Prepend a snapshot of the current state to `versions`. The snapshot
    /// itself carries no version history.
    pub fn push_snapshot(&mut self, label: &str, saved_at: DateTime<Utc>) {
        let mut snapshot = self.clone();
        snapshot.versions.clear();
        self.versions.insert(
            0,
            DocVersion {
                label: label.to_string(),
                saved_at,
                doc: Box::new(snapshot),
            },
        );
    }

    pub fn load(path: &Path) -> Result<Self, DocError> {
        let src = std::fs::read_to_string(path).map_err(DocError::Read)?;
        from_str_with_path(&src)
    }

    pub fn save(&self, path: &Path) -> Result<(), DocError> {
        // Doc serialization cannot fail: no non-string map keys anywhere.
        let src = serde_json::to_string_pretty(self).expect("doc serializes");
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(DocError::Write)?;
        }
        std::fs::write(path, src).map_err(DocError::Write)
    }
}

/// Deserialize with JSON-path context in error messages.
pub fn from_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T, DocError> {
    let de = &mut serde_json::Deserializer::from_str(src);
    serde_path_to_error::deserialize::<_, T>(de).map_err(|err| DocError::Parse {
        path: err.path().to_string(),
        source: err.into_inner(),
    })
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn sample_doc() -> EndpointDoc {
        let mut doc = EndpointDoc::new();
        doc.meta.title = "Login".into();
        doc.base_url = "https://api.example.com".into();
        doc.path = "/auth/login".into();
        doc.method = "POST".into();
        doc.headers
            .insert("Content-Type".into(), "application/json".into());
        doc.request_params = vec![ParamRow {
            name: "email".into(),
            ty: ParamType::String,
            description: String::new(),
            depth: 0,
            required: true,
            example: None,
            enum_values: Vec::new(),
        }];
        doc
    }

    #[test]
    fn snapshots_prepend_newest_first() {
        let mut doc = sample_doc();
        let t1 = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let t2 = Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap();
        doc.push_snapshot("v1", t1);
        doc.meta.title = "Login v2".into();
        doc.push_snapshot("v2", t2);

        assert_eq!(doc.versions.len(), 2);
        assert_eq!(doc.versions[0].label, "v2");
        assert_eq!(doc.versions[1].label, "v1");
        assert_eq!(doc.versions[0].doc.meta.title, "Login v2");
        assert!(doc.versions[0].doc.versions.is_empty());
    }

    #[test]
    fn camel_case_round_trip() {
        let doc = sample_doc();
        let src = serde_json::to_string_pretty(&doc).unwrap();
        assert!(src.contains("\"baseUrl\""));
        assert!(src.contains("\"requestParams\""));
        let back: EndpointDoc = from_str_with_path(&src).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn parse_errors_carry_json_path() {
        let src = json!({"requestParams": [{"name": "x", "type": "nonsense"}]}).to_string();
        match from_str_with_path::<EndpointDoc>(&src) {
            Err(DocError::Parse { path, .. }) => {
                assert!(path.contains("requestParams"), "path was {path}");
            }
            other => panic!("expected Parse error, got {other:?}"),
        }
    }

    #[test]
    fn defaults_fill_missing_fields() {
        let doc: EndpointDoc = from_str_with_path("{}").unwrap();
        assert_eq!(doc.method, "GET");
        assert_eq!(doc.title(), "API Documentation");
        assert_eq!(doc.content_type(), "application/json");
        assert!(doc.request_params.is_empty());
    }
}
