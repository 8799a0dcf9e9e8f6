//! Markdown rendering
//!
//! Each schema becomes one table:
//!
//! ```text
//! ### Alert
//!
//! |Property|Description|Type|DefaultValue|
//! |---|---|---|---|
//! |closable|Whether Alert can be closed|`boolean`|`false`|
//! ```
//!
//! The version column only appears when some row of that table has a
//! `version` tag.

use crate::config::MarkdownConfig;
use crate::defaults::{locale_spec, ColumnSource, LocaleSpec, MarkdownColumn};
use crate::js_doc::{find_tag, Tag};
use crate::registry::SourceRegistry;
use crate::schema::{Schema, SchemaOutput};
use crate::selector::generate;
use crate::signature::{escape_html_like, to_single_line};
use indexmap::IndexMap;
use std::path::Path;
use tracing::debug;

const VERSION_TAG: &str = "version";
const DEFAULT_VALUE_TAG: &str = "defaultValue";

/// Render every schema of an output; `None` for an unsupported locale
pub fn render_markdown(output: &SchemaOutput, lang: &str) -> Option<IndexMap<String, String>> {
    let Some(spec) = locale_spec(lang) else {
        debug!(lang, "unsupported locale");
        return None;
    };

    let mut rendered = IndexMap::new();
    for (title, schema) in output.entries() {
        rendered.insert(title.to_string(), render_schema(title, schema, spec));
    }
    Some(rendered)
}

/// Generate a file's schemas and render them as Markdown
pub fn generate_markdown(
    registry: &mut SourceRegistry,
    file: impl AsRef<Path>,
    config: &MarkdownConfig,
) -> Option<IndexMap<String, String>> {
    let lang = config.lang();
    if locale_spec(lang).is_none() {
        debug!(lang, "unsupported locale");
        return None;
    }

    let output = generate(registry, file, &config.generate)?;
    render_markdown(&output, lang)
}

/// A table row, either a property or a function parameter
struct Row<'a> {
    name: &'a str,
    type_text: &'a str,
    is_optional: bool,
    tags: &'a [Tag],
    initializer: Option<&'a str>,
}

fn rows(schema: &Schema) -> Vec<Row<'_>> {
    match schema {
        Schema::Interface(s) => s
            .data
            .iter()
            .map(|p| Row {
                name: &p.name,
                type_text: &p.type_text,
                is_optional: p.is_optional,
                tags: &p.tags,
                initializer: None,
            })
            .collect(),
        Schema::Function(s) => s
            .params
            .iter()
            .map(|p| Row {
                name: &p.name,
                type_text: &p.type_text,
                is_optional: p.is_optional,
                tags: &p.tags,
                initializer: p.initializer_text.as_deref(),
            })
            .collect(),
    }
}

fn render_schema(title: &str, schema: &Schema, spec: &LocaleSpec) -> String {
    let rows = rows(schema);
    let has_version = rows.iter().any(|r| find_tag(r.tags, VERSION_TAG).is_some());
    let columns: Vec<&MarkdownColumn> = spec
        .columns
        .iter()
        .filter(|c| has_version || !c.is_version())
        .collect();

    let mut out = format!("### {}\n\n", title);

    if let Some(remark) = remark(schema.tags(), spec.lang) {
        out.push_str(&remark);
        out.push_str("\n\n");
    }

    let titles: Vec<&str> = columns.iter().map(|c| c.title).collect();
    let separators = vec!["---"; columns.len()];
    out.push_str(&format!("|{}|\n|{}|\n", titles.join("|"), separators.join("|")));

    let body: Vec<String> = rows
        .iter()
        .map(|row| {
            let cells: Vec<String> = columns.iter().map(|c| cell(row, c, spec)).collect();
            format!("|{}|", cells.join("|"))
        })
        .collect();
    out.push_str(&body.join("\n"));

    if let Schema::Function(func) = schema {
        if !func.returns.is_empty() {
            out.push_str(&format!("\n\n{}: `{}`", spec.returns, func.returns));
        }
    }

    out
}

/// Declaration text shown above the table: the locale tag (`@en`), or the
/// `remarkEn` / `remarkZh` form
fn remark(tags: &[Tag], lang: &str) -> Option<String> {
    let remark_tag = format!("remark{}{}", lang[..1].to_uppercase(), &lang[1..]);
    find_tag(tags, lang)
        .or_else(|| find_tag(tags, &remark_tag))
        .map(|t| t.value.trim())
        .filter(|v| !v.is_empty())
        .map(escape_html_like)
}

fn cell(row: &Row<'_>, column: &MarkdownColumn, spec: &LocaleSpec) -> String {
    match column.source() {
        ColumnSource::Field(field) => match field.as_str() {
            "name" => text_cell(row.name),
            "type" => {
                let code = format!("`{}`", single_line_code(row.type_text));
                if row.is_optional {
                    code
                } else {
                    format!("{} {}", code, spec.required)
                }
            }
            _ => "-".to_string(),
        },
        ColumnSource::Tag(name) if name == DEFAULT_VALUE_TAG => find_tag(row.tags, &name)
            .map(|t| t.value.as_str())
            .or(row.initializer)
            .map(|v| format!("`{}`", single_line_code(v)))
            .unwrap_or_else(|| "-".to_string()),
        ColumnSource::Tag(name) => find_tag(row.tags, &name)
            .map(|t| text_cell(&t.value))
            .unwrap_or_else(|| "-".to_string()),
    }
}

fn text_cell(text: &str) -> String {
    escape_html_like(&to_single_line(text))
}

/// Normalize text that may already have escaped pipes
fn single_line_code(text: &str) -> String {
    to_single_line(&text.replace("\\|", "|"))
}
