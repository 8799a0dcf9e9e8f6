//! Built-in defaults
//!
//! The default-type map fills in members that carry no documentation of their
//! own, and the locale tables drive the Markdown renderer.

use crate::diagnostics::{SchemaError, SchemaResult};
use crate::js_doc::Tag;
use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Locale used when none is requested
pub const DEFAULT_LANG: &str = "en";

lazy_static! {
    /// Column value referring to a member tag, `tag.defaultValue`
    static ref TAG_COLUMN_REGEX: Regex = Regex::new(r"tag\.(\w+)").unwrap();
}

/// Fallback type and tags for an undocumented member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultEntry {
    #[serde(rename = "type")]
    pub type_text: String,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

/// Member name to fallback entry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DefaultTypeMap(IndexMap<String, DefaultEntry>);

impl DefaultTypeMap {
    /// An empty map; every undocumented member is dropped
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in map covering `className` and `style`
    pub fn builtin() -> Self {
        let mut map = Self::new();
        map.insert(
            "className",
            DefaultEntry {
                type_text: "string | string[]".to_string(),
                tags: vec![
                    Tag::new("zh", "节点类名"),
                    Tag::new("en", "Additional css class"),
                ],
            },
        );
        map.insert(
            "style",
            DefaultEntry {
                type_text: "CSSProperties".to_string(),
                tags: vec![Tag::new("zh", "节点样式"), Tag::new("en", "Additional style")],
            },
        );
        map
    }

    pub fn insert(&mut self, name: impl Into<String>, entry: DefaultEntry) {
        self.0.insert(name.into(), entry);
    }

    pub fn get(&self, name: &str) -> Option<&DefaultEntry> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Load a map from a `.json` or `.toml` file
    pub fn from_file(path: impl AsRef<Path>) -> SchemaResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Ok(serde_json::from_str(&text)?),
            Some("toml") => Ok(toml::from_str(&text)?),
            _ => Err(SchemaError::config(format!(
                "unsupported default type map format: {}",
                path.display()
            ))),
        }
    }
}

/// Where a column takes its cell value from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnSource {
    /// A schema field (`name`, `type`)
    Field(String),
    /// A member tag (`tag.en`)
    Tag(String),
}

impl ColumnSource {
    pub fn parse(value: &str) -> Self {
        match TAG_COLUMN_REGEX.captures(value).and_then(|c| c.get(1)) {
            Some(tag) => ColumnSource::Tag(tag.as_str().to_string()),
            None => ColumnSource::Field(value.to_string()),
        }
    }
}

/// One column of a locale's table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkdownColumn {
    pub title: &'static str,
    pub value: &'static str,
}

impl MarkdownColumn {
    pub fn source(&self) -> ColumnSource {
        ColumnSource::parse(self.value)
    }

    pub fn is_version(&self) -> bool {
        self.source() == ColumnSource::Tag("version".to_string())
    }
}

/// Table layout and fixed strings for one locale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocaleSpec {
    pub lang: &'static str,
    pub columns: &'static [MarkdownColumn],
    /// Suffix of the type cell for required members
    pub required: &'static str,
    /// Label of the return type line under function tables
    pub returns: &'static str,
}

const ZH: LocaleSpec = LocaleSpec {
    lang: "zh",
    columns: &[
        MarkdownColumn { title: "参数名", value: "name" },
        MarkdownColumn { title: "描述", value: "tag.zh" },
        MarkdownColumn { title: "类型", value: "type" },
        MarkdownColumn { title: "默认值", value: "tag.defaultValue" },
        MarkdownColumn { title: "版本", value: "tag.version" },
    ],
    required: "**(必填)**",
    returns: "返回值",
};

const EN: LocaleSpec = LocaleSpec {
    lang: "en",
    columns: &[
        MarkdownColumn { title: "Property", value: "name" },
        MarkdownColumn { title: "Description", value: "tag.en" },
        MarkdownColumn { title: "Type", value: "type" },
        MarkdownColumn { title: "DefaultValue", value: "tag.defaultValue" },
        MarkdownColumn { title: "Version", value: "tag.version" },
    ],
    required: "**(Required)**",
    returns: "Returns",
};

/// Table specification for a locale, `None` when unsupported
pub fn locale_spec(lang: &str) -> Option<&'static LocaleSpec> {
    match lang {
        "zh" => Some(&ZH),
        "en" => Some(&EN),
        _ => None,
    }
}
