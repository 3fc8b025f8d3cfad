//! Integration-notes generator: required/optional parameter bullets,
//! response field bullets, Content-Type reminder.

use crate::doc::EndpointDoc;

pub fn render(doc: &EndpointDoc) -> String {
    let mut parts: Vec<String> = Vec::new();

    let title = if doc.meta.title.is_empty() {
        "Endpoint Integration"
    } else {
        &doc.meta.title
    };
    parts.push(format!("# {title}"));
    parts.push(format!(
        "Use the `{}` request to `{}`.",
        doc.method,
        doc.endpoint()
    ));

    let required: Vec<_> = doc.request_params.iter().filter(|p| p.required).collect();
    if !required.is_empty() {
        parts.push("\n## Required Parameters".to_string());
        for p in required {
            let desc = if p.description.is_empty() {
                "no description"
            } else {
                &p.description
            };
            parts.push(format!("- `{}` ({}) - {desc}", p.name, p.ty));
        }
    }

    let optional: Vec<_> = doc.request_params.iter().filter(|p| !p.required).collect();
    if !optional.is_empty() {
        parts.push("\n## Optional Parameters".to_string());
        for p in optional {
            if p.description.is_empty() {
                parts.push(format!("- `{}` ({})", p.name, p.ty));
            } else {
                parts.push(format!("- `{}` ({}) - {}", p.name, p.ty, p.description));
            }
        }
    }

    if !doc.response_params.is_empty() {
        parts.push("\n## Response Fields".to_string());
        for p in &doc.response_params {
            parts.push(format!("- `{}` ({})", p.name, p.ty));
        }
    }

    parts.push(format!(
        "\nRemember to set the `Content-Type` header to `{}`.",
        doc.content_type()
    ));

    parts.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::ParamRow;
    use crate::flatten::ParamType;

    #[test]
    fn splits_required_and_optional() {
        let mut doc = EndpointDoc::new();
        doc.method = "POST".into();
        doc.base_url = "https://x.test".into();
        doc.path = "/items".into();
        doc.request_params = vec![
            ParamRow {
                name: "id".into(),
                ty: ParamType::Number,
                description: "item id".into(),
                depth: 0,
                required: true,
                example: None,
                enum_values: Vec::new(),
            },
            ParamRow {
                name: "note".into(),
                ty: ParamType::String,
                description: String::new(),
                depth: 0,
                required: false,
                example: None,
                enum_values: Vec::new(),
            },
        ];

        let notes = render(&doc);
        assert!(notes.contains("Use the `POST` request to `https://x.test/items`."));
        assert!(notes.contains("## Required Parameters\n- `id` (number) - item id"));
        assert!(notes.contains("## Optional Parameters\n- `note` (string)"));
        assert!(notes.ends_with("Remember to set the `Content-Type` header to `application/json`."));
    }

    #[test]
    fn empty_doc_keeps_header_and_reminder_only() {
        let notes = render(&EndpointDoc::new());
        assert!(notes.starts_with("# Endpoint Integration"));
        assert!(!notes.contains("## Required Parameters"));
        assert!(!notes.contains("## Response Fields"));
    }
}
