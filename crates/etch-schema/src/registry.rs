//! Source registry and member enumeration
//!
//! A `SourceRegistry` holds every file parsed during one documentation run.
//! It is owned by the caller and handed to each generation call, so two runs
//! never share state. Base types named in `extends` clauses, type references
//! and intersections are resolved by name against the files it holds.

use crate::diagnostics::{SchemaError, SchemaResult};
use crate::node::{Declaration, DeclarationDef, MemberDef, TypeRef, TypeShape};
use crate::parser;
use globset::{GlobBuilder, GlobMatcher};
use indexmap::IndexMap;
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Extensions tried for a target given without one
const SOURCE_EXTENSIONS: &[&str] = &["ts", "tsx"];

/// One parsed source file
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub declarations: Vec<Declaration>,
}

impl SourceFile {
    /// Interface or type alias with the given name
    pub fn find_type(&self, name: &str) -> Option<&Declaration> {
        self.declarations.iter().find(|d| {
            d.name == name
                && matches!(
                    d.def,
                    DeclarationDef::Interface(_) | DeclarationDef::TypeAlias(_)
                )
        })
    }
}

/// Parsed files available to one documentation run
#[derive(Debug, Default)]
pub struct SourceRegistry {
    files: IndexMap<PathBuf, SourceFile>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn get(&self, path: &Path) -> Option<&SourceFile> {
        self.files.get(&normalize(path))
    }

    /// Parse source text and register it under `path`, replacing any earlier entry
    pub fn add_source(&mut self, path: impl AsRef<Path>, source: &str) -> SchemaResult<&SourceFile> {
        let path = normalize(path.as_ref());
        let declarations = parser::parse_source(&path, source)?;
        Ok(self.insert(path, declarations))
    }

    /// Parse a file from disk and register it
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> SchemaResult<&SourceFile> {
        let path = normalize(path.as_ref());
        let declarations = parser::parse_file(&path)?;
        Ok(self.insert(path, declarations))
    }

    fn insert(&mut self, path: PathBuf, declarations: Vec<Declaration>) -> &SourceFile {
        debug!(path = %path.display(), declarations = declarations.len(), "registered source");
        let (index, _) = self
            .files
            .insert_full(path.clone(), SourceFile { path, declarations });
        &self.files[index]
    }

    /// Make sure a target file is registered and return its key.
    ///
    /// Files not yet loaded are parsed on demand. A path without a `.ts`/`.tsx`
    /// extension is tried with each. Returns `None` when nothing can be loaded.
    pub fn ensure_loaded(&mut self, file: impl AsRef<Path>) -> Option<PathBuf> {
        let file = file.as_ref();

        for candidate in candidates(file) {
            let key = normalize(&candidate);
            if self.files.contains_key(&key) {
                return Some(key);
            }
            if !key.is_file() {
                continue;
            }
            match self.load_file(&key) {
                Ok(source) => return Some(source.path.clone()),
                Err(e) => {
                    warn!(path = %key.display(), error = %e, "failed to load target file");
                    return None;
                }
            }
        }

        debug!(path = %file.display(), "target file not found");
        None
    }

    /// Load every file matching the glob patterns; relative patterns resolve
    /// against `root`. Files already registered are left alone and files that
    /// fail to parse are skipped with a warning. Returns the number of files
    /// newly loaded.
    pub fn load_patterns<S: AsRef<str>>(&mut self, patterns: &[S], root: &Path) -> SchemaResult<usize> {
        let mut loaded = 0;

        for pattern in patterns {
            let pattern = pattern.as_ref();
            let full = root.join(pattern);
            let (base, has_glob) = literal_prefix(&full);

            if !has_glob {
                if full.is_file() && self.load_logged(&full) {
                    loaded += 1;
                }
                continue;
            }

            let matcher = compile_pattern(&full)?;
            for entry in WalkDir::new(&base)
                .follow_links(true)
                .into_iter()
                .filter_map(|e| e.ok())
            {
                let path = entry.path();
                if path.is_file() && matcher.is_match(path) && self.load_logged(path) {
                    loaded += 1;
                }
            }
        }

        debug!(loaded, total = self.files.len(), "loaded source patterns");
        Ok(loaded)
    }

    fn load_logged(&mut self, path: &Path) -> bool {
        if self.files.contains_key(&normalize(path)) {
            return false;
        }
        match self.load_file(path) {
            Ok(_) => true,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping source file");
                false
            }
        }
    }

    /// Find the interface or type alias a reference points at.
    ///
    /// The file the reference appears in is searched first, then every other
    /// registered file in load order.
    pub fn resolve(&self, origin: &Path, reference: &TypeRef) -> Option<(&Path, &Declaration)> {
        let name = reference.local_name();

        if let Some(file) = self.files.get(origin) {
            if let Some(decl) = file.find_type(name) {
                return Some((&file.path, decl));
            }
        }

        self.files
            .values()
            .filter(|f| f.path != origin)
            .find_map(|f| f.find_type(name).map(|d| (f.path.as_path(), d)))
    }
}

/// Source of a declaration's member set
pub trait MemberEnumerator {
    /// Members of `decl`, which lives in the file `origin`
    fn members(&self, origin: &Path, decl: &Declaration) -> Vec<MemberDef>;
}

/// Flattened members: own members first, then inherited members that are not
/// overridden, following `extends` clauses, references and intersections.
impl MemberEnumerator for SourceRegistry {
    fn members(&self, origin: &Path, decl: &Declaration) -> Vec<MemberDef> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        self.flatten(origin, decl, &mut seen, &mut out);
        out
    }
}

impl SourceRegistry {
    fn flatten(
        &self,
        origin: &Path,
        decl: &Declaration,
        seen: &mut HashSet<(PathBuf, String)>,
        out: &mut Vec<MemberDef>,
    ) {
        if !seen.insert((origin.to_path_buf(), decl.name.clone())) {
            debug!(name = %decl.name, "inheritance cycle");
            return;
        }

        match &decl.def {
            DeclarationDef::Interface(iface) => {
                push_members(out, &iface.members);
                for base in &iface.extends {
                    self.flatten_reference(origin, base, seen, out);
                }
            }
            DeclarationDef::TypeAlias(alias) => self.flatten_shape(origin, &alias.shape, seen, out),
            DeclarationDef::Function(_) => {}
        }
    }

    fn flatten_shape(
        &self,
        origin: &Path,
        shape: &TypeShape,
        seen: &mut HashSet<(PathBuf, String)>,
        out: &mut Vec<MemberDef>,
    ) {
        match shape {
            TypeShape::Literal(members) => push_members(out, members),
            TypeShape::Reference(reference) => self.flatten_reference(origin, reference, seen, out),
            TypeShape::Intersection(parts) => {
                for part in parts {
                    self.flatten_shape(origin, part, seen, out);
                }
            }
            TypeShape::Other(_) => {}
        }
    }

    fn flatten_reference(
        &self,
        origin: &Path,
        reference: &TypeRef,
        seen: &mut HashSet<(PathBuf, String)>,
        out: &mut Vec<MemberDef>,
    ) {
        match self.resolve(origin, reference) {
            Some((path, base)) => self.flatten(path, base, seen, out),
            None => debug!(name = %reference.name, "unresolved base type"),
        }
    }
}

/// Only the members written in the declaration itself
#[derive(Debug, Clone, Copy, Default)]
pub struct OwnMembers;

impl MemberEnumerator for OwnMembers {
    fn members(&self, _origin: &Path, decl: &Declaration) -> Vec<MemberDef> {
        let mut out = Vec::new();
        match &decl.def {
            DeclarationDef::Interface(iface) => push_members(&mut out, &iface.members),
            DeclarationDef::TypeAlias(alias) => own_shape_members(&alias.shape, &mut out),
            DeclarationDef::Function(_) => {}
        }
        out
    }
}

fn own_shape_members(shape: &TypeShape, out: &mut Vec<MemberDef>) {
    match shape {
        TypeShape::Literal(members) => push_members(out, members),
        TypeShape::Intersection(parts) => {
            for part in parts {
                own_shape_members(part, out);
            }
        }
        TypeShape::Reference(_) | TypeShape::Other(_) => {}
    }
}

/// Append named members whose name is not taken yet
fn push_members(out: &mut Vec<MemberDef>, members: &[MemberDef]) {
    for member in members {
        let Some(name) = member.name.as_deref() else {
            continue;
        };
        if out.iter().any(|m| m.name.as_deref() == Some(name)) {
            continue;
        }
        out.push(member.clone());
    }
}

/// Canonical absolute form of a path; falls back to a lexical absolute path
/// for files that do not exist on disk
fn normalize(path: &Path) -> PathBuf {
    if let Ok(canonical) = std::fs::canonicalize(path) {
        return canonical;
    }
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

fn candidates(file: &Path) -> Vec<PathBuf> {
    let has_source_ext = file
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| SOURCE_EXTENSIONS.contains(&e));

    if has_source_ext {
        return vec![file.to_path_buf()];
    }

    let mut out = vec![file.to_path_buf()];
    for ext in SOURCE_EXTENSIONS {
        let mut name = file.as_os_str().to_os_string();
        name.push(".");
        name.push(ext);
        out.push(PathBuf::from(name));
    }
    out
}

fn is_glob_component(s: &str) -> bool {
    s.contains(['*', '?', '[', '{'])
}

/// Directory part of a pattern before the first glob component
fn literal_prefix(pattern: &Path) -> (PathBuf, bool) {
    let mut base = PathBuf::new();
    for component in pattern.components() {
        if let Component::Normal(part) = component {
            if is_glob_component(&part.to_string_lossy()) {
                return (base, true);
            }
        }
        base.push(component);
    }
    (base, false)
}

fn compile_pattern(pattern: &Path) -> SchemaResult<GlobMatcher> {
    let text = pattern.to_string_lossy();
    // `*` stays within one directory; only `**` crosses separators
    GlobBuilder::new(&text)
        .literal_separator(true)
        .build()
        .map(|g| g.compile_matcher())
        .map_err(|e| SchemaError::pattern(text.as_ref(), e))
}
