//! SWC/deno_ast TypeScript parsing utilities
//!
//! Parsing, JSDoc lookup, location tracking and source text slicing on top
//! of deno_ast.

use crate::diagnostics::{SchemaError, SchemaResult};
use crate::node::Location;
use deno_ast::swc::ast as swc_ast;
use deno_ast::swc::common::comments::{Comment, CommentKind};
use deno_ast::swc::common::{BytePos, Span};
use deno_ast::{MediaType, ParseParams, ParsedSource, SourcePos, SourceTextInfo, StartSourcePos};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Information about the source file
#[derive(Debug, Clone)]
pub struct SourceInfo {
    pub path: PathBuf,
    pub text: Arc<str>,
    /// Source text info for location lookups
    pub text_info: SourceTextInfo,
}

impl SourceInfo {
    pub fn new(path: impl Into<PathBuf>, text: impl Into<Arc<str>>) -> Self {
        let text: Arc<str> = text.into();
        let text_info = SourceTextInfo::new(text.clone());
        Self {
            path: path.into(),
            text,
            text_info,
        }
    }

    /// Byte offset into `text` for an SWC position
    ///
    /// SWC reserves `BytePos(0)`, so deno_ast starts files at a non-zero
    /// position.
    pub fn byte_index(&self, pos: BytePos) -> usize {
        SourcePos::unsafely_from_byte_pos(pos).as_byte_index(StartSourcePos::START_SOURCE_POS)
    }

    /// 1-indexed line, 0-indexed column
    pub fn line_col(&self, pos: BytePos) -> (usize, usize) {
        let source_pos = SourcePos::unsafely_from_byte_pos(pos);
        let line_and_col = self.text_info.line_and_column_index(source_pos);
        (line_and_col.line_index + 1, line_and_col.column_index)
    }

    pub fn span_to_location(&self, span: Span) -> Location {
        let (line, col) = self.line_col(span.lo);
        Location::new(self.path.display().to_string(), line, col)
    }

    /// Body of a `/** ... */` block separated from `pos` only by whitespace,
    /// without the `/*` and `*/` delimiters
    pub fn block_comment_before(&self, pos: BytePos) -> Option<&str> {
        let before = self.text.get(..self.byte_index(pos))?.trim_end();
        let without_end = before.strip_suffix("*/")?;
        let start = without_end.rfind("/*")?;
        let body = &without_end[start + 2..];
        if body.starts_with('*') && !body.starts_with("*/") {
            Some(body)
        } else {
            None
        }
    }

    /// Source text covered by a span; empty when the span is out of range
    pub fn text_for_span(&self, span: Span) -> &str {
        let start = self.byte_index(span.lo);
        let end = self.byte_index(span.hi).min(self.text.len());
        self.text.get(start..end).unwrap_or_default()
    }
}

/// A parsed TypeScript module with source information
pub struct ParsedModule {
    pub source: ParsedSource,
    pub source_info: SourceInfo,
}

impl std::fmt::Debug for ParsedModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParsedModule")
            .field("path", &self.source_info.path)
            .finish()
    }
}

impl ParsedModule {
    /// The module AST; scripts are rejected at parse time
    pub fn module(&self) -> Option<&swc_ast::Module> {
        match self.source.program_ref() {
            deno_ast::ProgramRef::Module(m) => Some(m),
            deno_ast::ProgramRef::Script(_) => None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.source_info.path
    }

    pub fn span_to_location(&self, span: Span) -> Location {
        self.source_info.span_to_location(span)
    }

    pub fn text_for_span(&self, span: Span) -> &str {
        self.source_info.text_for_span(span)
    }

    fn leading_comments(&self, pos: BytePos) -> Vec<Comment> {
        self.source
            .comments()
            .get_leading(SourcePos::unsafely_from_byte_pos(pos))
            .map(|v| v.to_vec())
            .unwrap_or_default()
    }

    /// The closest `/** ... */` block in front of a span
    ///
    /// A block on the same line as the previous token (`a: string; /** b */ b`)
    /// is stored by SWC as a trailing comment of that token, so the source
    /// text is checked when there is no leading one.
    pub fn jsdoc_for_span(&self, span: Span) -> Option<String> {
        self.leading_comments(span.lo)
            .iter()
            .rev()
            .find(|c| c.kind == CommentKind::Block && c.text.starts_with('*'))
            .map(|c| c.text.to_string())
            .or_else(|| self.source_info.block_comment_before(span.lo).map(str::to_string))
    }
}

/// Parse a TypeScript file from disk
pub fn parse_typescript_file(path: impl AsRef<Path>) -> SchemaResult<ParsedModule> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| {
        SchemaError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to read {}: {}", path.display(), e),
        ))
    })?;

    parse_typescript_source(path, text)
}

/// Parse TypeScript source code from a string
///
/// `path` must be absolute; it only drives the media type (`.ts`, `.tsx`)
/// and the module specifier.
pub fn parse_typescript_source(
    path: impl AsRef<Path>,
    source: impl Into<Arc<str>>,
) -> SchemaResult<ParsedModule> {
    let path = path.as_ref();
    let source: Arc<str> = source.into();

    let media_type = MediaType::from_path(path);

    let specifier = deno_ast::ModuleSpecifier::from_file_path(path)
        .map_err(|_| SchemaError::InvalidPath(path.display().to_string()))?;

    let parsed = deno_ast::parse_module(ParseParams {
        specifier,
        text: source.clone(),
        media_type,
        capture_tokens: true,
        scope_analysis: false,
        maybe_syntax: None,
    })
    .map_err(|e| SchemaError::parse(path, e.to_string()))?;

    if !matches!(parsed.program_ref(), deno_ast::ProgramRef::Module(_)) {
        return Err(SchemaError::NotAModule(path.to_path_buf()));
    }

    Ok(ParsedModule {
        source: parsed,
        source_info: SourceInfo::new(path, source),
    })
}

/// Dotted text of a type entity name, `React.CSSProperties`
pub fn entity_name(name: &swc_ast::TsEntityName) -> String {
    match name {
        swc_ast::TsEntityName::Ident(i) => i.sym.to_string(),
        swc_ast::TsEntityName::TsQualifiedName(q) => {
            format!("{}.{}", entity_name(&q.left), q.right.sym)
        }
    }
}

/// Dotted text of an `extends` expression, `React.HTMLAttributes`
pub fn expr_to_name(expr: &swc_ast::Expr) -> Option<String> {
    match expr {
        swc_ast::Expr::Ident(i) => Some(i.sym.to_string()),
        swc_ast::Expr::Member(m) => {
            let obj = expr_to_name(&m.obj)?;
            match &m.prop {
                swc_ast::MemberProp::Ident(i) => Some(format!("{}.{}", obj, i.sym)),
                _ => None,
            }
        }
        _ => None,
    }
}

/// Name of a property signature key; computed keys other than literals have none
pub fn key_name(expr: &swc_ast::Expr) -> Option<String> {
    match expr {
        swc_ast::Expr::Ident(i) => Some(i.sym.to_string()),
        swc_ast::Expr::Lit(swc_ast::Lit::Str(s)) => {
            Some(String::from_utf8_lossy(s.value.as_bytes()).into_owned())
        }
        swc_ast::Expr::Lit(swc_ast::Lit::Num(n)) => Some(n.value.to_string()),
        _ => None,
    }
}
