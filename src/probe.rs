//! HTTP-probing collaborator: hit a live endpoint, infer parameter rows from
//! the request body and the parsed response, and hand both to the doc layer.
//!
//! Validation happens in `prepare` (no network); `execute` performs the one
//! request. Any HTTP status counts as a response worth documenting.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Value};

use crate::doc::{from_str_with_path, DocError, ParamRow};
use crate::flatten::{self, FlattenError, ParamType};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("headers must be a JSON object of strings: {0}")]
    BadHeaders(#[source] DocError),

    #[error("set Content-Type to application/json for {method} requests")]
    ContentTypeRequired { method: String },

    #[error("request body is not valid JSON: {0}")]
    BadBody(#[source] DocError),

    #[error("request body must be a non-empty JSON object")]
    EmptyBody,

    #[error(transparent)]
    Flatten(#[from] FlattenError),

    #[error("request failed: {0}")]
    Transport(#[from] Box<ureq::Transport>),

    #[error("failed to read response body: {0}")]
    ReadBody(#[source] std::io::Error),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }

    /// Methods that carry a JSON body we infer request rows from.
    pub fn takes_body(&self) -> bool {
        matches!(self, Method::Post | Method::Put | Method::Patch)
    }
}

/// Header-level auth injection. Auth *flows* (token refresh etc.) are the
/// user's problem; we only place a credential where they tell us to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Auth {
    Bearer(String),
    ApiKeyHeader { name: String, value: String },
    ApiKeyQuery { name: String, value: String },
}

#[derive(Clone, Debug)]
pub struct ProbeSettings {
    pub endpoint: String,
    pub method: Method,
    /// Raw JSON object text, as typed by the user.
    pub headers_json: String,
    /// Query table; entries with empty names are skipped. Always transmitted;
    /// request rows are seeded from it only on GET.
    pub query: Vec<(String, String)>,
    pub body: Option<String>,
    pub auth: Option<Auth>,
}

/// Everything validated and inferred before the network is touched.
#[derive(Clone, Debug)]
pub struct PreparedRequest {
    pub endpoint: String,
    pub method: Method,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub body_text: Option<String>,
    pub request_body: Value,
    pub request_params: Vec<ParamRow>,
}

#[derive(Clone, Debug)]
pub struct ProbeOutcome {
    pub status: u16,
    pub response: Value,
    pub response_params: Vec<ParamRow>,
    /// True when the response text was not JSON and got wrapped as
    /// `{"raw": <text>}`.
    pub raw_fallback: bool,
}

// ————————————————————————————————————————————————————————————————————————————
// PREPARE (pure)
// ————————————————————————————————————————————————————————————————————————————

pub fn prepare(settings: &ProbeSettings) -> Result<PreparedRequest, ProbeError> {
    let mut headers = parse_headers(&settings.headers_json)?;
    let mut query: Vec<(String, String)> = settings
        .query
        .iter()
        .filter(|(name, _)| !name.trim().is_empty())
        .cloned()
        .collect();

    match &settings.auth {
        None => {}
        Some(Auth::Bearer(token)) => {
            headers.push(("Authorization".to_string(), format!("Bearer {token}")));
        }
        Some(Auth::ApiKeyHeader { name, value }) => {
            headers.push((name.clone(), value.clone()));
        }
        Some(Auth::ApiKeyQuery { name, value }) => {
            query.push((name.clone(), value.clone()));
        }
    }

    let mut request_body = Value::Null;
    let mut request_params = Vec::new();
    let mut body_text = None;

    if settings.method.takes_body() {
        let json_content_type = headers
            .iter()
            .any(|(k, v)| k == "Content-Type" && v == "application/json");
        if !json_content_type {
            return Err(ProbeError::ContentTypeRequired {
                method: settings.method.as_str().to_string(),
            });
        }
        let text = settings.body.as_deref().unwrap_or("");
        let parsed: Value = from_str_with_path(text).map_err(ProbeError::BadBody)?;
        let non_empty = parsed.as_object().is_some_and(|m| !m.is_empty());
        if !non_empty {
            return Err(ProbeError::EmptyBody);
        }
        request_params = flatten::flatten(&parsed)?
            .into_iter()
            .map(|d| ParamRow::from_descriptor(d, true))
            .collect();
        request_body = parsed;
        body_text = Some(text.to_string());
    }

    if settings.method == Method::Get {
        // GET request rows come from the query table, not a body.
        request_params = query
            .iter()
            .map(|(name, _)| ParamRow {
                name: name.clone(),
                ty: ParamType::String,
                description: String::new(),
                depth: 0,
                required: false,
                example: None,
                enum_values: Vec::new(),
            })
            .collect();
    }

    Ok(PreparedRequest {
        endpoint: settings.endpoint.clone(),
        method: settings.method,
        headers,
        query,
        body_text,
        request_body,
        request_params,
    })
}

fn parse_headers(src: &str) -> Result<Vec<(String, String)>, ProbeError> {
    if src.trim().is_empty() {
        return Ok(Vec::new());
    }
    let map: indexmap::IndexMap<String, String> =
        from_str_with_path(src).map_err(ProbeError::BadHeaders)?;
    Ok(map.into_iter().collect())
}

// ————————————————————————————————————————————————————————————————————————————
// EXECUTE
// ————————————————————————————————————————————————————————————————————————————

pub fn execute(prepared: &PreparedRequest) -> Result<ProbeOutcome, ProbeError> {
    let url = url_with_query(&prepared.endpoint, &prepared.query);
    let mut request = ureq::request(prepared.method.as_str(), &url);
    for (name, value) in &prepared.headers {
        request = request.set(name, value);
    }

    let result = match &prepared.body_text {
        Some(body) => request.send_string(body),
        None => request.call(),
    };
    let response = match result {
        Ok(r) => r,
        // Non-2xx still documents the endpoint.
        Err(ureq::Error::Status(_, r)) => r,
        Err(ureq::Error::Transport(t)) => return Err(ProbeError::Transport(Box::new(t))),
    };

    let status = response.status();
    let text = response.into_string().map_err(ProbeError::ReadBody)?;
    let (value, raw_fallback) = parse_response_text(&text);
    let response_params = flatten::flatten(&value)?
        .into_iter()
        .map(|d| ParamRow::from_descriptor(d, false))
        .collect();

    Ok(ProbeOutcome {
        status,
        response: value,
        response_params,
        raw_fallback,
    })
}

/// Final request URL: the endpoint plus every accumulated query pair,
/// regardless of method — key-in-query credentials ride along on POST too.
pub fn url_with_query(endpoint: &str, query: &[(String, String)]) -> String {
    if query.is_empty() {
        return endpoint.to_string();
    }
    let encoded = query
        .iter()
        .map(|(name, value)| {
            format!(
                "{}={}",
                urlencoding::encode(name),
                urlencoding::encode(value)
            )
        })
        .collect::<Vec<_>>()
        .join("&");
    let sep = if endpoint.contains('?') { '&' } else { '?' };
    format!("{endpoint}{sep}{encoded}")
}

/// Parse response text as JSON, wrapping non-JSON as `{"raw": <text>}` so
/// the engine still has an object to flatten.
pub fn parse_response_text(text: &str) -> (Value, bool) {
    match serde_json::from_str::<Value>(text) {
        Ok(v) => (v, false),
        Err(_) => (json!({ "raw": text }), true),
    }
}

// ————————————————————————————————————————————————————————————————————————————
// URL SPLIT
// ————————————————————————————————————————————————————————————————————————————

static ENDPOINT_TAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"/[\w\-]+$").expect("valid regex"));

/// Split an endpoint URL into (base_url, path) on the final `/segment`.
/// URLs with no splittable tail keep everything in base_url.
pub fn split_endpoint(endpoint: &str) -> (String, String) {
    match ENDPOINT_TAIL.find(endpoint) {
        Some(m) => (
            endpoint[..m.start()].to_string(),
            m.as_str().to_string(),
        ),
        None => (endpoint.to_string(), String::new()),
    }
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————
