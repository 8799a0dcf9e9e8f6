//! etch-schema: documentation schemas from TypeScript declarations
//!
//! This crate reads the interfaces, type aliases and functions of a
//! TypeScript file and turns the ones tagged with `@title` into structured,
//! multilingual schemas:
//! - Parsing TypeScript/TSX sources using deno_ast/SWC
//! - Reading JSDoc tags (`@zh`, `@en`, `@defaultValue`, `@version`, ...)
//! - Flattening inherited members across the files of one run
//! - Falling back to a default-type map for undocumented members
//! - Rendering locale-specific Markdown tables
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐    ┌──────────────────┐
//! │ target file     │    │ sibling sources  │
//! │ (SWC parse)     │    │ (glob patterns)  │
//! └────────┬────────┘    └────────┬─────────┘
//!          │                      │
//!          └──────────┬───────────┘
//!                     ▼
//!            ┌────────────────┐
//!            │ SourceRegistry │
//!            └───────┬────────┘
//!                    ▼
//!            ┌────────────────┐
//!            │ SchemaBuilder  │
//!            └───────┬────────┘
//!          ┌─────────┴─────────┐
//!          ▼                   ▼
//!    ┌──────────┐        ┌──────────┐
//!    │   JSON   │        │ Markdown │
//!    └──────────┘        └──────────┘
//! ```
//!
//! # Usage
//!
//! ```no_run
//! use etch_schema::{generate_markdown, GenerateConfig, MarkdownConfig, SourceRegistry};
//!
//! let config = MarkdownConfig::new(
//!     GenerateConfig::new().with_source_files("components/**/*.{ts,tsx}"),
//! )
//! .with_lang("zh");
//!
//! let mut registry = SourceRegistry::new();
//! if let Some(tables) = generate_markdown(&mut registry, "components/alert/index.tsx", &config) {
//!     for (title, markdown) in tables {
//!         println!("{}:\n{}", title, markdown);
//!     }
//! }
//! ```

// Core types
pub mod js_doc;
pub mod node;
pub mod schema;
pub mod signature;

// Parsing and utilities
pub mod diagnostics;
pub mod parser;
pub mod registry;
pub mod utils;

// Generation
pub mod builder;
pub mod config;
pub mod defaults;
pub mod markdown;
pub mod selector;

// Re-exports for convenience
pub use builder::{SchemaBuilder, TitleMode};
pub use config::{GenerateConfig, MarkdownConfig};
pub use defaults::{DefaultEntry, DefaultTypeMap, DEFAULT_LANG};
pub use diagnostics::{SchemaError, SchemaResult};
pub use js_doc::{DocBlock, Tag};
pub use markdown::{generate_markdown, render_markdown};
pub use node::{Declaration, DeclarationDef, DeclarationKind, Location};
pub use registry::{MemberEnumerator, OwnMembers, SourceRegistry};
pub use schema::{
    FunctionSchema, InterfaceSchema, ParamSchema, PropertySchema, Schema, SchemaOutput,
    TitledSchema,
};
pub use selector::{generate, generate_base};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
