//! Generation options
//!
//! Options can be built in code with the `with_*` methods or read from a
//! TOML file:
//!
//! ```toml
//! sourceFilesPaths = ["components/**/*.{ts,tsx}"]
//! strictComment = false
//! strictDeclarationOrder = true
//! lang = "zh"
//!
//! [defaultTypeMap.prefixCls]
//! type = "string"
//! tags = [{ name = "en", value = "Class prefix" }]
//! ```

use crate::defaults::{DefaultTypeMap, DEFAULT_LANG};
use crate::diagnostics::{SchemaError, SchemaResult};
use serde::{Deserialize, Deserializer, Serialize};
use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// Options for schema generation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerateConfig {
    /// Fallbacks for undocumented members; the built-in map when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_type_map: Option<DefaultTypeMap>,

    /// Glob patterns of sibling files to load for inheritance lookups
    #[serde(deserialize_with = "one_or_many")]
    pub source_files_paths: Vec<String>,

    /// Never turn plain comment text into `zh`/`en` tags
    pub strict_comment: bool,

    /// Emit schemas as a list in source order instead of a title map
    pub strict_declaration_order: bool,

    /// Base directory for relative patterns; the working directory when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,
}

impl GenerateConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_type_map(mut self, map: DefaultTypeMap) -> Self {
        self.default_type_map = Some(map);
        self
    }

    pub fn with_source_files(mut self, pattern: impl Into<String>) -> Self {
        self.source_files_paths.push(pattern.into());
        self
    }

    pub fn with_strict_comment(mut self, strict: bool) -> Self {
        self.strict_comment = strict;
        self
    }

    pub fn with_strict_declaration_order(mut self, strict: bool) -> Self {
        self.strict_declaration_order = strict;
        self
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// The caller's map, or the built-in one
    pub fn default_types(&self) -> Cow<'_, DefaultTypeMap> {
        match &self.default_type_map {
            Some(map) => Cow::Borrowed(map),
            None => Cow::Owned(DefaultTypeMap::builtin()),
        }
    }

    /// Directory that relative source patterns resolve against
    pub fn root_dir(&self) -> PathBuf {
        match &self.root {
            Some(root) => root.clone(),
            None => std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }
}

/// Options for Markdown generation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkdownConfig {
    #[serde(flatten)]
    pub generate: GenerateConfig,

    /// Output locale (`zh` or `en`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
}

impl MarkdownConfig {
    pub fn new(generate: GenerateConfig) -> Self {
        Self {
            generate,
            lang: None,
        }
    }

    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = Some(lang.into());
        self
    }

    pub fn lang(&self) -> &str {
        self.lang.as_deref().unwrap_or(DEFAULT_LANG)
    }

    /// Read options from a TOML file.
    ///
    /// A relative `root` is taken relative to the file; without one the
    /// file's directory is the root.
    pub fn from_toml_file(path: impl AsRef<Path>) -> SchemaResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let mut config: MarkdownConfig = toml::from_str(&text)?;

        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        config.generate.root = Some(match config.generate.root.take() {
            Some(root) if root.is_absolute() => root,
            Some(root) => dir.join(root),
            None => dir.to_path_buf(),
        });

        if let Some(lang) = config.lang.as_deref() {
            if lang.trim().is_empty() {
                return Err(SchemaError::config("`lang` must not be empty"));
            }
        }

        Ok(config)
    }
}

/// Accept either `"pattern"` or `["a", "b"]`
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(s) => vec![s],
        OneOrMany::Many(v) => v,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_builder() {
        let config = GenerateConfig::new()
            .with_source_files("src/**/*.ts")
            .with_strict_comment(true)
            .with_strict_declaration_order(true)
            .with_root("/project");

        assert_eq!(config.source_files_paths, vec!["src/**/*.ts"]);
        assert!(config.strict_comment);
        assert!(config.strict_declaration_order);
        assert_eq!(config.root_dir(), PathBuf::from("/project"));
        assert_eq!(config.default_types().len(), 2);
    }

    #[test]
    fn test_custom_default_types_replace_builtin() {
        let config = GenerateConfig::new().with_default_type_map(DefaultTypeMap::new());
        assert!(config.default_types().is_empty());
    }

    #[test]
    fn test_markdown_lang_default() {
        assert_eq!(MarkdownConfig::default().lang(), "en");
        assert_eq!(MarkdownConfig::default().with_lang("zh").lang(), "zh");
    }

    #[test]
    fn test_source_paths_single_string() {
        let config: GenerateConfig =
            serde_json::from_str(r#"{ "sourceFilesPaths": "src/*.ts" }"#).unwrap();
        assert_eq!(config.source_files_paths, vec!["src/*.ts"]);
        assert!(!config.strict_comment);
    }

    #[test]
    fn test_from_toml_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("etch.toml");
        std::fs::write(
            &path,
            r#"
sourceFilesPaths = ["components/**/*.ts"]
strictDeclarationOrder = true
lang = "zh"
root = "web"

[defaultTypeMap.prefixCls]
type = "string"
"#,
        )
        .unwrap();

        let config = MarkdownConfig::from_toml_file(&path).unwrap();
        assert_eq!(config.lang(), "zh");
        assert!(config.generate.strict_declaration_order);
        assert_eq!(config.generate.root, Some(dir.path().join("web")));
        assert_eq!(
            config.generate.default_types().get("prefixCls").unwrap().type_text,
            "string"
        );
        assert!(config.generate.default_types().get("className").is_none());
    }

    #[test]
    fn test_from_toml_file_defaults_root_to_file_dir() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("etch.toml");
        std::fs::write(&path, "strictComment = true\n").unwrap();

        let config = MarkdownConfig::from_toml_file(&path).unwrap();
        assert!(config.generate.strict_comment);
        assert_eq!(config.generate.root, Some(dir.path().to_path_buf()));
        assert_eq!(config.lang(), "en");
    }

    #[test]
    fn test_from_toml_file_invalid() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("etch.toml");
        std::fs::write(&path, "strictComment = \"yes\"\n").unwrap();
        assert!(matches!(
            MarkdownConfig::from_toml_file(&path),
            Err(SchemaError::Toml(_))
        ));
    }
}
