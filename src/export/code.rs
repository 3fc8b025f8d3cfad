//! Code-sample builders: curl, JS fetch, Python requests.
//!
//! Body handling follows the doc's Content-Type: JSON by default,
//! `application/x-www-form-urlencoded` as encoded pairs, multipart as form
//! parts. GET samples append the query string built from the request rows.

use serde_json::Value;
use urlencoding::encode;

use crate::doc::EndpointDoc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Lang {
    Curl,
    Fetch,
    Python,
}

pub fn sample(doc: &EndpointDoc, lang: Lang) -> String {
    match lang {
        Lang::Curl => curl(doc),
        Lang::Fetch => fetch(doc),
        Lang::Python => python(doc),
    }
}

// ————————————————————————————————————————————————————————————————————————————
// BUILDERS
// ————————————————————————————————————————————————————————————————————————————

fn curl(doc: &EndpointDoc) -> String {
    let header_lines = doc
        .headers
        .iter()
        .map(|(k, v)| format!("-H \"{k}: {v}\""))
        .collect::<Vec<_>>()
        .join(" ");

    let mut out = format!("curl -X {} \"{}\" {header_lines}", doc.method, sample_url(doc));
    if doc.method != "GET" && !doc.request_body.is_null() {
        let content_type = doc.content_type();
        if content_type == "application/x-www-form-urlencoded" {
            out.push_str(&format!(" -d '{}'", form_encoded(&doc.request_body)));
        } else if content_type.contains("multipart/form-data") {
            for (k, v) in body_pairs(&doc.request_body) {
                out.push_str(&format!(" -F \"{k}={v}\""));
            }
        } else {
            out.push_str(&format!(" -d '{}'", pretty(&doc.request_body)));
        }
    }
    out
}

fn fetch(doc: &EndpointDoc) -> String {
    let headers = serde_json::to_string_pretty(&doc.headers).unwrap_or_else(|_| "{}".to_string());
    let mut body_line = String::new();
    if doc.method != "GET" && !doc.request_body.is_null() {
        let content_type = doc.content_type();
        let body_expr = if content_type == "application/x-www-form-urlencoded" {
            format!(
                "new URLSearchParams({}).toString()",
                pretty(&doc.request_body)
            )
        } else if content_type.contains("multipart/form-data") {
            let appends = body_pairs(&doc.request_body)
                .into_iter()
                .map(|(k, v)| format!("fd.append('{k}', '{v}');"))
                .collect::<Vec<_>>()
                .join("\n  ");
            format!("(() => {{\n  const fd = new FormData();\n  {appends}\n  return fd;\n}})()")
        } else {
            format!("JSON.stringify({})", pretty(&doc.request_body))
        };
        body_line = format!("\n  body: {body_expr}");
    }

    format!(
        "fetch(\"{}\", {{\n  method: \"{}\",\n  headers: {headers},{body_line}\n}})\n  .then(res => res.json())\n  .then(console.log);",
        sample_url(doc),
        doc.method
    )
}

fn python(doc: &EndpointDoc) -> String {
    let mut lines = vec![
        "import requests".to_string(),
        format!("url = \"{}\"", sample_url(doc)),
        format!(
            "headers = {}",
            serde_json::to_string_pretty(&doc.headers).unwrap_or_else(|_| "{}".to_string())
        ),
    ];
    if doc.method == "GET" {
        lines.push("response = requests.get(url, headers=headers)".to_string());
    } else {
        let method = doc.method.to_lowercase();
        let body = if doc.request_body.is_null() {
            "{}".to_string()
        } else {
            pretty(&doc.request_body)
        };
        lines.push(format!("data = {body}"));
        let content_type = doc.content_type();
        if content_type == "application/x-www-form-urlencoded" {
            lines.push(format!(
                "response = requests.{method}(url, headers=headers, data=data)"
            ));
        } else if content_type.contains("multipart/form-data") {
            lines.push(format!(
                "response = requests.{method}(url, headers=headers, files=data)"
            ));
        } else {
            lines.push(format!(
                "response = requests.{method}(url, headers=headers, json=data)"
            ));
        }
    }
    lines.push("print(response.json())".to_string());
    lines.join("\n")
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

/// GET samples carry the query string built from the request rows; example
/// values fill in where the user provided them.
fn sample_url(doc: &EndpointDoc) -> String {
    let endpoint = doc.endpoint();
    if doc.method != "GET" || doc.request_params.is_empty() {
        return endpoint;
    }
    let query = doc
        .request_params
        .iter()
        .map(|p| {
            let value = p.example.as_ref().map(value_text).unwrap_or_default();
            format!("{}={}", encode(&p.name), encode(&value))
        })
        .collect::<Vec<_>>()
        .join("&");
    format!("{endpoint}?{query}")
}

fn form_encoded(body: &Value) -> String {
    body_pairs(body)
        .into_iter()
        .map(|(k, v)| format!("{}={}", encode(&k), encode(&v)))
        .collect::<Vec<_>>()
        .join("&")
}

fn body_pairs(body: &Value) -> Vec<(String, String)> {
    match body {
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| (k.clone(), value_text(v)))
            .collect(),
        _ => Vec::new(),
    }
}

fn value_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn pretty(v: &Value) -> String {
    serde_json::to_string_pretty(v).unwrap_or_else(|_| v.to_string())
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::ParamRow;
    use crate::flatten::ParamType;
    use serde_json::json;

    fn post_doc() -> EndpointDoc {
        let mut doc = EndpointDoc::new();
        doc.method = "POST".into();
        doc.base_url = "https://api.example.com".into();
        doc.path = "/auth/login".into();
        doc.headers
            .insert("Content-Type".into(), "application/json".into());
        doc.request_body = json!({"email": "a@b.c", "password": "secret"});
        doc
    }

    #[test]
    fn curl_json_body() {
        let c = curl(&post_doc());
        assert!(c.starts_with("curl -X POST \"https://api.example.com/auth/login\""));
        assert!(c.contains("-H \"Content-Type: application/json\""));
        assert!(c.contains("-d '{"));
        assert!(c.contains("\"email\": \"a@b.c\""));
    }

    #[test]
    fn curl_form_urlencoded_body() {
        let mut doc = post_doc();
        doc.headers.insert(
            "Content-Type".into(),
            "application/x-www-form-urlencoded".into(),
        );
        let c = curl(&doc);
        assert!(c.contains("-d 'email=a%40b.c&password=secret'"));
    }

    #[test]
    fn curl_multipart_body() {
        let mut doc = post_doc();
        doc.headers
            .insert("Content-Type".into(), "multipart/form-data".into());
        let c = curl(&doc);
        assert!(c.contains("-F \"email=a@b.c\""));
        assert!(c.contains("-F \"password=secret\""));
    }

    #[test]
    fn get_query_string_uses_examples_and_encodes() {
        let mut doc = EndpointDoc::new();
        doc.base_url = "https://api.example.com".into();
        doc.path = "/search".into();
        doc.request_params = vec![ParamRow {
            name: "q".into(),
            ty: ParamType::String,
            description: String::new(),
            depth: 0,
            required: false,
            example: Some(json!("rust lang")),
            enum_values: Vec::new(),
        }];
        let c = curl(&doc);
        assert!(c.contains("https://api.example.com/search?q=rust%20lang"));
    }

    #[test]
    fn fetch_and_python_carry_the_body() {
        let doc = post_doc();
        let f = fetch(&doc);
        assert!(f.contains("method: \"POST\""));
        assert!(f.contains("body: JSON.stringify({"));

        let p = python(&doc);
        assert!(p.starts_with("import requests"));
        assert!(p.contains("requests.post(url, headers=headers, json=data)"));
        assert!(p.ends_with("print(response.json())"));
    }

    #[test]
    fn get_samples_have_no_body() {
        let mut doc = post_doc();
        doc.method = "GET".into();
        assert!(!curl(&doc).contains("-d "));
        assert!(!fetch(&doc).contains("body:"));
        assert!(python(&doc).contains("requests.get(url, headers=headers)"));
    }
}
