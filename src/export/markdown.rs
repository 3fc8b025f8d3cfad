//! Markdown rendering: title, endpoint line, request/response tables,
//! integration notes. Empty tables collapse to `_None_`.

use crate::doc::EndpointDoc;

pub fn render(doc: &EndpointDoc) -> String {
    let mut md = format!("# {}\n\n", doc.title());
    md.push_str(&format!("**Description:** {}\n\n", doc.meta.description));
    md.push_str(&format!(
        "**Endpoint:** `{} {}`\n\n",
        doc.method,
        doc.endpoint()
    ));

    md.push_str("## Request Parameters\n");
    if doc.request_params.is_empty() {
        md.push_str("_None_\n");
    } else {
        md.push_str("| Name | Type | Required | Description |\n|---|---|:---:|---|\n");
        for p in &doc.request_params {
            md.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                p.name,
                p.ty,
                if p.required { "Yes" } else { "No" },
                p.description
            ));
        }
    }

    md.push_str("\n## Response Parameters\n");
    if doc.response_params.is_empty() {
        md.push_str("_None_\n");
    } else {
        md.push_str("| Name | Type | Description |\n|---|---|---|\n");
        for p in &doc.response_params {
            md.push_str(&format!("| {} | {} | {} |\n", p.name, p.ty, p.description));
        }
    }

    md.push_str("\n## Integration Notes\n");
    if doc.integration_notes.is_empty() {
        md.push_str("_None_\n");
    } else {
        md.push_str(&doc.integration_notes);
        md.push('\n');
    }
    md
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc::ParamRow;
    use crate::flatten::ParamType;

    fn row(name: &str, ty: ParamType, required: bool) -> ParamRow {
        ParamRow {
            name: name.into(),
            ty,
            description: String::new(),
            depth: 0,
            required,
            example: None,
            enum_values: Vec::new(),
        }
    }

    #[test]
    fn renders_tables_and_endpoint_line() {
        let mut doc = EndpointDoc::new();
        doc.meta.title = "Login".into();
        doc.method = "POST".into();
        doc.base_url = "https://api.example.com".into();
        doc.path = "/auth/login".into();
        doc.request_params = vec![row("email", ParamType::String, true)];
        doc.response_params = vec![row("token", ParamType::String, false)];

        let md = render(&doc);
        assert!(md.starts_with("# Login\n"));
        assert!(md.contains("**Endpoint:** `POST https://api.example.com/auth/login`"));
        assert!(md.contains("| email | string | Yes |  |"));
        assert!(md.contains("| token | string |  |"));
        assert!(md.contains("## Integration Notes\n_None_"));
    }

    #[test]
    fn empty_doc_gets_placeholders() {
        let md = render(&EndpointDoc::new());
        assert!(md.starts_with("# API Documentation\n"));
        assert!(md.contains("## Request Parameters\n_None_"));
        assert!(md.contains("## Response Parameters\n_None_"));
    }
}
