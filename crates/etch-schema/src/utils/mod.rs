//! Utilities for etch-schema
//!
//! SWC/deno_ast TypeScript parsing helpers.

pub mod swc;

pub use swc::{parse_typescript_file, parse_typescript_source, ParsedModule, SourceInfo};
