//! Minimal CLI: flatten → table; probe → doc; export → markdown/notes/code/openapi
use anyhow::{bail, Context};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};

use crate::doc::EndpointDoc;
use crate::export::{self, code::Lang};
use crate::flatten;
use crate::mock;
use crate::probe::{self, Auth, Method, ProbeSettings};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// probe a live endpoint or flatten JSON payloads into parameter tables, and
/// export endpoint docs as markdown, integration notes, code samples, or an
/// OpenAPI fragment
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// flatten JSON payload files into an ordered parameter table
    Flatten(FlattenArgs),
    /// probe a live endpoint and seed a doc file from its request/response
    Probe(ProbeArgs),
    /// render a doc file in one of the export formats
    Export(ExportArgs),
    /// print a mock response body rebuilt from a doc's parameter rows
    Mock(MockArgs),
    /// prepend a labeled version snapshot to a doc file
    Snapshot(SnapshotArgs),
}

#[derive(Args, Debug, Clone)]
struct FlattenArgs {
    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,

    /// JSON Pointer to select a subnode in each document (e.g. /data/items/0)
    #[arg(long)]
    json_pointer: Option<String>,

    /// emit rows as JSON instead of a table
    #[arg(long, default_value_t = false)]
    json: bool,

    /// output file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
struct ProbeArgs {
    /// endpoint URL, e.g. https://api.example.com/auth/login
    url: String,

    #[arg(long, value_enum, default_value_t = Method::Get)]
    method: Method,

    /// request headers as a JSON object
    #[arg(long, default_value = r#"{"Content-Type": "application/json"}"#)]
    headers: String,

    /// inline JSON request body (POST/PUT/PATCH)
    #[arg(long, conflicts_with = "body_file")]
    body: Option<String>,

    /// read the JSON request body from a file
    #[arg(long)]
    body_file: Option<PathBuf>,

    /// query parameter as name=value (GET; repeatable)
    #[arg(long = "query", short = 'q')]
    query: Vec<String>,

    /// bearer token for the Authorization header
    #[arg(long, conflicts_with_all = ["api_key_header", "api_key_query"])]
    bearer: Option<String>,

    /// API key header as Name=value
    #[arg(long, conflicts_with = "api_key_query")]
    api_key_header: Option<String>,

    /// API key query parameter as name=value
    #[arg(long)]
    api_key_query: Option<String>,

    /// doc file to write or update (prints the doc to stdout if omitted)
    #[arg(long, short)]
    doc: Option<PathBuf>,

    /// doc title
    #[arg(long)]
    title: Option<String>,

    /// doc description
    #[arg(long)]
    description: Option<String>,

    /// snapshot the existing doc under this label before updating it
    #[arg(long)]
    snapshot: Option<String>,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum ExportFormat {
    Markdown,
    Notes,
    Openapi,
    Code,
}

#[derive(Args, Debug, Clone)]
struct ExportArgs {
    /// doc file to render
    doc: PathBuf,

    #[arg(value_enum)]
    format: ExportFormat,

    /// code sample language (code format only)
    #[arg(long, value_enum, default_value_t = Lang::Curl)]
    lang: Lang,

    /// output file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
struct MockArgs {
    /// doc file to read rows from
    doc: PathBuf,

    /// build the sample from the request rows instead of the response rows
    #[arg(long, default_value_t = false)]
    request: bool,
}

#[derive(Args, Debug, Clone)]
struct SnapshotArgs {
    /// doc file to snapshot
    doc: PathBuf,

    #[arg(long, default_value = "snapshot")]
    label: String,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    pub fn run(&self) -> anyhow::Result<()> {
        match &self.cmd {
            Command::Flatten(target) => run_flatten(target),
            Command::Probe(target) => run_probe(target),
            Command::Export(target) => run_export(target),
            Command::Mock(target) => run_mock(target),
            Command::Snapshot(target) => run_snapshot(target),
        }
    }
}

fn run_flatten(target: &FlattenArgs) -> anyhow::Result<()> {
    let source_paths = resolve_file_path_patterns(&target.input)?;
    let mut sections: Vec<String> = Vec::new();

    for source_path in &source_paths {
        let source_path_str = source_path.to_string_lossy().to_string();
        let source = std::fs::read_to_string(source_path)
            .with_context(|| format!("failed to read source file {source_path_str}"))?;
        let json_value: serde_json::Value = crate::doc::from_str_with_path(&source)
            .with_context(|| format!("failed to parse JSON source file {source_path_str}"))?;
        let selected = match target.json_pointer.as_deref() {
            None => &json_value,
            Some(pointer) => json_value.pointer(pointer).with_context(|| {
                format!("JSON pointer {pointer} selects nothing in {source_path_str}")
            })?,
        };

        let rows = flatten::flatten(selected)
            .with_context(|| format!("failed to flatten {source_path_str}"))?;
        eprintln!(
            "{} {source_path_str}: {} row(s)",
            "flattened".green(),
            rows.len()
        );

        if target.json {
            sections.push(serde_json::to_string_pretty(&rows)?);
        } else {
            sections.push(render_table(&rows));
        }
    }

    write_or_print(target.out.as_deref(), &sections.join("\n"))
}

fn run_probe(target: &ProbeArgs) -> anyhow::Result<()> {
    let body = match &target.body_file {
        Some(path) => Some(std::fs::read_to_string(path).with_context(|| {
            format!("failed to read body file {}", path.to_string_lossy())
        })?),
        None => target.body.clone(),
    };

    let auth = if let Some(token) = &target.bearer {
        Some(Auth::Bearer(token.clone()))
    } else if let Some(pair) = &target.api_key_header {
        let (name, value) = parse_pair(pair)?;
        Some(Auth::ApiKeyHeader { name, value })
    } else if let Some(pair) = &target.api_key_query {
        let (name, value) = parse_pair(pair)?;
        Some(Auth::ApiKeyQuery { name, value })
    } else {
        None
    };

    let settings = ProbeSettings {
        endpoint: target.url.clone(),
        method: target.method,
        headers_json: target.headers.clone(),
        query: target
            .query
            .iter()
            .map(|pair| parse_pair(pair))
            .collect::<anyhow::Result<Vec<_>>>()?,
        body,
        auth,
    };

    let prepared = probe::prepare(&settings)?;
    let outcome = probe::execute(&prepared)?;

    let status_colored = if outcome.status < 400 {
        outcome.status.to_string().green()
    } else {
        outcome.status.to_string().red()
    };
    eprintln!(
        "{} {} {} → {status_colored}, {} request row(s), {} response row(s)",
        "probed".green(),
        target.method.as_str().bold(),
        target.url,
        prepared.request_params.len(),
        outcome.response_params.len()
    );
    if outcome.raw_fallback {
        eprintln!(
            "{} response is not valid JSON; documented as a raw-text wrapper",
            "note:".yellow()
        );
    }

    let mut doc = match &target.doc {
        Some(path) if path.exists() => EndpointDoc::load(path)?,
        _ => EndpointDoc::new(),
    };
    if let Some(label) = &target.snapshot {
        doc.push_snapshot(label, Utc::now());
    }

    let (base_url, path) = probe::split_endpoint(&target.url);
    doc.base_url = base_url;
    doc.path = path;
    doc.method = target.method.as_str().to_string();
    doc.headers = prepared.headers.iter().cloned().collect();
    doc.request_body = prepared.request_body.clone();
    doc.response = outcome.response.clone();
    doc.request_params = prepared.request_params.clone();
    doc.response_params = outcome.response_params.clone();
    if let Some(title) = &target.title {
        doc.meta.title = title.clone();
    }
    if let Some(description) = &target.description {
        doc.meta.description = description.clone();
    }

    match &target.doc {
        Some(path) => {
            doc.save(path)?;
            eprintln!("{} {}", "wrote".green(), path.to_string_lossy());
        }
        None => {
            println!("{}", serde_json::to_string_pretty(&doc)?);
        }
    }
    Ok(())
}

fn run_export(target: &ExportArgs) -> anyhow::Result<()> {
    let doc = EndpointDoc::load(&target.doc)?;
    let rendered = match target.format {
        ExportFormat::Markdown => export::markdown::render(&doc),
        ExportFormat::Notes => export::notes::render(&doc),
        ExportFormat::Openapi => serde_json::to_string_pretty(&export::openapi::build(&doc))?,
        ExportFormat::Code => export::code::sample(&doc, target.lang),
    };
    write_or_print(target.out.as_deref(), &rendered)
}

fn run_mock(target: &MockArgs) -> anyhow::Result<()> {
    let doc = EndpointDoc::load(&target.doc)?;
    let rows = if target.request {
        &doc.request_params
    } else {
        &doc.response_params
    };
    println!("{}", serde_json::to_string_pretty(&mock::sample(rows))?);
    Ok(())
}

fn run_snapshot(target: &SnapshotArgs) -> anyhow::Result<()> {
    let mut doc = EndpointDoc::load(&target.doc)?;
    doc.push_snapshot(&target.label, Utc::now());
    doc.save(&target.doc)?;
    eprintln!(
        "{} `{}` ({} version(s) kept)",
        "snapshotted".green(),
        target.label,
        doc.versions.len()
    );
    Ok(())
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn render_table(rows: &[flatten::ParameterDescriptor]) -> String {
    let mut out = format!("{:<40} {:<8} {:>5}\n", "NAME", "TYPE", "DEPTH");
    for row in rows {
        let indented = format!("{}{}", "  ".repeat(row.depth), row.name);
        out.push_str(&format!(
            "{indented:<40} {:<8} {:>5}\n",
            row.ty.as_str(),
            row.depth
        ));
    }
    out
}

fn write_or_print(out: Option<&Path>, text: &str) -> anyhow::Result<()> {
    match out {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, text)
                .with_context(|| format!("failed to write {}", path.to_string_lossy()))?;
            eprintln!("{} {}", "wrote".green(), path.to_string_lossy());
            Ok(())
        }
        None => {
            println!("{text}");
            Ok(())
        }
    }
}

fn parse_pair(raw: &str) -> anyhow::Result<(String, String)> {
    match raw.split_once('=') {
        Some((name, value)) => Ok((name.to_string(), value.to_string())),
        None => bail!("expected name=value, got `{raw}`"),
    }
}

fn resolve_file_path_patterns<I>(patterns: I) -> anyhow::Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern)? {
                matched_any = true;
                out.push(entry?);
            }
            if !matched_any {
                // Pattern was explicitly a glob but matched nothing -> surface as an error
                bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            // Treat as a literal path
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————
