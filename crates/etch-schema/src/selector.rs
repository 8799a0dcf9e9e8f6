//! Declaration selection and the schema entry points

use crate::builder::{SchemaBuilder, TitleMode};
use crate::config::GenerateConfig;
use crate::node::{Declaration, DeclarationKind};
use crate::registry::SourceRegistry;
use crate::schema::{Schema, SchemaOutput, TitledSchema};
use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const KIND_ORDER: [DeclarationKind; 3] = [
    DeclarationKind::Interface,
    DeclarationKind::TypeAlias,
    DeclarationKind::Function,
];

/// Declarations to document, in emission order.
///
/// Interfaces come first, then type aliases, then functions. In public mode
/// untitled declarations are left out. With `strict_order` the result is
/// sorted by starting line instead.
pub fn select(declarations: &[Declaration], mode: TitleMode, strict_order: bool) -> Vec<&Declaration> {
    let mut selected: Vec<&Declaration> = KIND_ORDER
        .iter()
        .flat_map(|kind| declarations.iter().filter(move |d| d.kind() == *kind))
        .filter(|d| mode == TitleMode::Base || d.title().is_some())
        .collect();

    if strict_order {
        selected.sort_by_key(|d| d.location.line);
    }

    selected
}

/// Generate the schemas of a file.
///
/// Sibling files named by `config.source_files_paths` are loaded into the
/// registry first so inherited members can be found. Returns `None` when the
/// target file cannot be loaded. With `strict_declaration_order` the result
/// is an ordered list, otherwise a map keyed by title.
pub fn generate(
    registry: &mut SourceRegistry,
    file: impl AsRef<Path>,
    config: &GenerateConfig,
) -> Option<SchemaOutput> {
    let key = prepare(registry, file.as_ref(), config)?;
    let entries = build_entries(registry, &key, config, TitleMode::Public, config.strict_declaration_order)?;

    Some(if config.strict_declaration_order {
        SchemaOutput::Ordered(
            entries
                .into_iter()
                .map(|(title, schema)| TitledSchema { title, schema })
                .collect(),
        )
    } else {
        SchemaOutput::Map(entries.into_iter().collect())
    })
}

/// Generate schemas for every declaration of a file, titled or not.
///
/// Untitled declarations are keyed by their identifier. This is the view of
/// a file used when it only provides base types for other declarations.
pub fn generate_base(
    registry: &mut SourceRegistry,
    file: impl AsRef<Path>,
    config: &GenerateConfig,
) -> Option<IndexMap<String, Schema>> {
    let key = prepare(registry, file.as_ref(), config)?;
    let entries = build_entries(registry, &key, config, TitleMode::Base, false)?;
    Some(entries.into_iter().collect())
}

/// Load sibling patterns and the target; returns the target's registry key
fn prepare(registry: &mut SourceRegistry, file: &Path, config: &GenerateConfig) -> Option<PathBuf> {
    if !config.source_files_paths.is_empty() {
        if let Err(e) = registry.load_patterns(&config.source_files_paths, &config.root_dir()) {
            warn!(error = %e, "failed to load source patterns");
        }
    }

    let key = registry.ensure_loaded(file);
    if key.is_none() {
        debug!(path = %file.display(), "no schema for unresolvable file");
    }
    key
}

fn build_entries(
    registry: &SourceRegistry,
    key: &Path,
    config: &GenerateConfig,
    mode: TitleMode,
    strict_order: bool,
) -> Option<Vec<(String, Schema)>> {
    let source = registry.get(key)?;
    let default_types = config.default_types();
    let builder = SchemaBuilder::new(registry, &default_types)
        .strict_comment(config.strict_comment)
        .mode(mode);

    Some(
        select(&source.declarations, mode, strict_order)
            .into_iter()
            .filter_map(|decl| builder.build(&source.path, decl))
            .collect(),
    )
}
