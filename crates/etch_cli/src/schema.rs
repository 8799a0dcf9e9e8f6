//! `schema` and `markdown` commands

use anyhow::{bail, Context, Result};
use etch_schema::{
    generate, generate_markdown, DefaultTypeMap, GenerateConfig, MarkdownConfig, SourceRegistry,
};
use std::path::{Path, PathBuf};
use tracing::info;

/// What the command prints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Markdown,
}

/// Run a command with the arguments that follow its name
pub fn run(format: Format, args: &[String]) -> Result<()> {
    let cmd = SchemaCommand::parse(args)?;
    let config = cmd.config()?;
    let mut registry = SourceRegistry::new();

    match format {
        Format::Json => {
            let Some(output) = generate(&mut registry, &cmd.file, &config.generate) else {
                bail!("Could not load {}", cmd.file.display());
            };
            let json = serde_json::to_string_pretty(&output)?;
            match &cmd.output {
                Some(path) => {
                    std::fs::write(path, json)
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    info!(schemas = output.len(), path = %path.display(), "wrote schemas");
                }
                None => println!("{}", json),
            }
        }
        Format::Markdown => {
            if etch_schema::defaults::locale_spec(config.lang()).is_none() {
                bail!("Unsupported language: {} (expected zh or en)", config.lang());
            }
            let Some(tables) = generate_markdown(&mut registry, &cmd.file, &config) else {
                bail!("Could not load {}", cmd.file.display());
            };
            match &cmd.output {
                Some(dir) => {
                    let written = write_tables(dir, &tables)?;
                    info!(tables = written, dir = %dir.display(), "wrote markdown");
                }
                None => {
                    let all: Vec<&str> = tables.values().map(String::as_str).collect();
                    println!("{}", all.join("\n\n"));
                }
            }
        }
    }

    Ok(())
}

/// Parsed command line of `schema` / `markdown`
#[derive(Debug, Default, PartialEq)]
struct SchemaCommand {
    /// Target TypeScript file
    file: PathBuf,
    /// Sibling source globs
    sources: Vec<String>,
    root: Option<PathBuf>,
    lang: Option<String>,
    strict_comment: bool,
    strict_order: bool,
    /// JSON or TOML default-type map
    default_types: Option<PathBuf>,
    /// TOML options file
    config: Option<PathBuf>,
    /// JSON file, or directory for Markdown tables
    output: Option<PathBuf>,
}

impl SchemaCommand {
    fn parse(args: &[String]) -> Result<Self> {
        let mut cmd = SchemaCommand::default();
        let mut file = None;

        let mut i = 0;
        while i < args.len() {
            let arg = args[i].as_str();
            match arg {
                "--source" | "-s" => cmd.sources.push(take_value(args, &mut i)?),
                "--root" | "-r" => cmd.root = Some(PathBuf::from(take_value(args, &mut i)?)),
                "--lang" | "-l" => cmd.lang = Some(take_value(args, &mut i)?),
                "--default-types" => {
                    cmd.default_types = Some(PathBuf::from(take_value(args, &mut i)?))
                }
                "--config" | "-c" => cmd.config = Some(PathBuf::from(take_value(args, &mut i)?)),
                "--output" | "-o" => cmd.output = Some(PathBuf::from(take_value(args, &mut i)?)),
                "--strict-comment" => {
                    cmd.strict_comment = true;
                    i += 1;
                }
                "--strict-order" => {
                    cmd.strict_order = true;
                    i += 1;
                }
                _ if !arg.starts_with('-') => {
                    if file.is_some() {
                        bail!("Unexpected argument: {}", arg);
                    }
                    file = Some(PathBuf::from(arg));
                    i += 1;
                }
                _ => bail!("Unknown flag: {}", arg),
            }
        }

        match file {
            Some(f) => cmd.file = f,
            None => bail!("Missing target file"),
        }

        Ok(cmd)
    }

    /// Options file first, then flags on top
    fn config(&self) -> Result<MarkdownConfig> {
        let mut config = match &self.config {
            Some(path) => MarkdownConfig::from_toml_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => MarkdownConfig::new(GenerateConfig::new()),
        };

        config.generate.source_files_paths.extend(self.sources.iter().cloned());
        if let Some(root) = &self.root {
            config.generate.root = Some(root.clone());
        }
        if let Some(lang) = &self.lang {
            config.lang = Some(lang.clone());
        }
        config.generate.strict_comment |= self.strict_comment;
        config.generate.strict_declaration_order |= self.strict_order;

        if let Some(path) = &self.default_types {
            let map = DefaultTypeMap::from_file(path)
                .with_context(|| format!("Failed to load default types {}", path.display()))?;
            config.generate.default_type_map = Some(map);
        }

        Ok(config)
    }
}

/// Value following the flag at `args[*i]`; advances past both
fn take_value(args: &[String], i: &mut usize) -> Result<String> {
    match args.get(*i + 1) {
        Some(v) => {
            *i += 2;
            Ok(v.clone())
        }
        None => bail!("{} requires a value", args[*i]),
    }
}

/// Write one `<title>.md` per table; returns the number written
fn write_tables<'a>(dir: &Path, tables: impl IntoIterator<Item = (&'a String, &'a String)>) -> Result<usize> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create {}", dir.display()))?;

    let mut written = 0;
    for (title, markdown) in tables {
        let path = dir.join(format!("{}.md", file_stem(title)));
        std::fs::write(&path, markdown)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        written += 1;
    }
    Ok(written)
}

fn file_stem(title: &str) -> String {
    title
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect::<String>()
        .trim()
        .to_string()
}

/// Print command usage
pub fn usage() {
    eprintln!("etch-schema <schema|markdown> <file> [options]");
    eprintln!();
    eprintln!("Generate documentation schemas from TypeScript declarations tagged with @title.");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  schema <file>                      Print schemas as JSON");
    eprintln!("  markdown <file>                    Print Markdown tables");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --source, -s <glob>                Sibling sources for inherited members (repeatable)");
    eprintln!("  --root, -r <dir>                   Base directory for --source globs (default: .)");
    eprintln!("  --lang, -l <zh|en>                 Markdown language (default: en)");
    eprintln!("  --strict-comment                   Ignore comments without @zh/@en tags");
    eprintln!("  --strict-order                     Keep declarations in source order");
    eprintln!("  --default-types <file>             Default types for undocumented members (.json/.toml)");
    eprintln!("  --config, -c <file>                Options file (etch.toml)");
    eprintln!("  --output, -o <path>                JSON file, or directory for <title>.md files");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  etch-schema schema src/alert/index.tsx -s 'src/**/*.ts'");
    eprintln!("  etch-schema markdown src/alert/index.tsx --lang zh -o docs/alert");
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_flags() {
        let cmd = SchemaCommand::parse(&args(&[
            "src/alert.tsx",
            "-s",
            "src/**/*.ts",
            "--source",
            "lib/*.ts",
            "--lang",
            "zh",
            "--strict-comment",
            "--strict-order",
            "-o",
            "out",
        ]))
        .unwrap();

        assert_eq!(cmd.file, PathBuf::from("src/alert.tsx"));
        assert_eq!(cmd.sources, vec!["src/**/*.ts", "lib/*.ts"]);
        assert_eq!(cmd.lang.as_deref(), Some("zh"));
        assert!(cmd.strict_comment);
        assert!(cmd.strict_order);
        assert_eq!(cmd.output, Some(PathBuf::from("out")));
    }

    #[test]
    fn test_parse_errors() {
        assert!(SchemaCommand::parse(&args(&[])).is_err());
        assert!(SchemaCommand::parse(&args(&["a.ts", "--lang"])).is_err());
        assert!(SchemaCommand::parse(&args(&["a.ts", "--bogus"])).is_err());
        assert!(SchemaCommand::parse(&args(&["a.ts", "b.ts"])).is_err());
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("etch.toml");
        std::fs::write(&config_path, "lang = \"zh\"\nsourceFilesPaths = \"a/*.ts\"\n").unwrap();

        let cmd = SchemaCommand::parse(&args(&[
            "x.ts",
            "-c",
            config_path.to_str().unwrap(),
            "-l",
            "en",
            "-s",
            "b/*.ts",
        ]))
        .unwrap();
        let config = cmd.config().unwrap();

        assert_eq!(config.lang(), "en");
        assert_eq!(config.generate.source_files_paths, vec!["a/*.ts", "b/*.ts"]);
        assert_eq!(config.generate.root, Some(dir.path().to_path_buf()));
    }

    #[test]
    fn test_markdown_to_directory() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("alert.tsx");
        std::fs::write(
            &file,
            "/** @title Alert */\nexport interface AlertProps {\n  /** @en Closable */\n  closable?: boolean;\n}\n",
        )
        .unwrap();
        let out = dir.path().join("docs");

        run(
            Format::Markdown,
            &args(&[file.to_str().unwrap(), "-o", out.to_str().unwrap()]),
        )
        .unwrap();

        let markdown = std::fs::read_to_string(out.join("Alert.md")).unwrap();
        assert!(markdown.starts_with("### Alert"));
        assert!(markdown.contains("|closable|Closable|`boolean`|-|"));
    }

    #[test]
    fn test_json_to_file() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("alert.ts");
        std::fs::write(&file, "/** @title Alert */\ninterface A { /** @en B */ b: string }\n").unwrap();
        let out = dir.path().join("schema.json");

        run(Format::Json, &args(&[file.to_str().unwrap(), "-o", out.to_str().unwrap()])).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(out).unwrap()).unwrap();
        assert_eq!(value["Alert"]["data"][0]["isOptional"], serde_json::json!(false));
    }

    #[test]
    fn test_unknown_language_and_missing_file() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.ts");
        assert!(run(Format::Json, &args(&[missing.to_str().unwrap()])).is_err());
        assert!(run(Format::Markdown, &args(&[missing.to_str().unwrap(), "-l", "fr"])).is_err());
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem("Button/Group"), "Button_Group");
        assert_eq!(file_stem("按钮"), "按钮");
    }
}
