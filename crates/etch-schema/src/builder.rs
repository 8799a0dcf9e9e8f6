//! Schema building
//!
//! `SchemaBuilder` turns one declaration into a titled `Schema`. Which members
//! it looks at depends on the declaration kind:
//!
//! - functions use their formal parameters and return type
//! - interfaces tagged `@notExtends` use only their own members
//! - other interfaces and type aliases use the flattened member set
//!
//! A member is kept when its own documentation has a locale tag, or when the
//! default-type map has an entry for its name. Everything else is dropped.

use crate::defaults::DefaultTypeMap;
use crate::js_doc::{has_locale_tag, member_tags, param_tags, Tag};
use crate::node::{Declaration, DeclarationDef, FunctionDef, MemberDef};
use crate::registry::{MemberEnumerator, OwnMembers};
use crate::schema::{FunctionSchema, InterfaceSchema, ParamSchema, PropertySchema, Schema};
use crate::signature::{parse_signature, to_single_line};
use std::path::Path;
use tracing::debug;

/// Tag that limits an interface to its own members
pub const NOT_EXTENDS_TAG: &str = "notExtends";

/// How a declaration gets its title
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TitleMode {
    /// Only declarations with a `@title` tag produce a schema
    #[default]
    Public,
    /// The identifier stands in for a missing `@title`
    Base,
}

/// Builds schemas for the declarations of one run
pub struct SchemaBuilder<'a, E: MemberEnumerator> {
    enumerator: &'a E,
    default_types: &'a DefaultTypeMap,
    strict_comment: bool,
    mode: TitleMode,
}

impl<'a, E: MemberEnumerator> SchemaBuilder<'a, E> {
    pub fn new(enumerator: &'a E, default_types: &'a DefaultTypeMap) -> Self {
        Self {
            enumerator,
            default_types,
            strict_comment: false,
            mode: TitleMode::Public,
        }
    }

    pub fn strict_comment(mut self, strict: bool) -> Self {
        self.strict_comment = strict;
        self
    }

    pub fn mode(mut self, mode: TitleMode) -> Self {
        self.mode = mode;
        self
    }

    /// Title the schema is keyed by, if the declaration gets one
    pub fn title(&self, decl: &Declaration) -> Option<String> {
        match (decl.title(), self.mode) {
            (Some(title), _) => Some(title.to_string()),
            (None, TitleMode::Base) => Some(decl.name.clone()),
            (None, TitleMode::Public) => None,
        }
    }

    /// Build the titled schema of a declaration that lives in `origin`
    pub fn build(&self, origin: &Path, decl: &Declaration) -> Option<(String, Schema)> {
        let Some(title) = self.title(decl) else {
            debug!(name = %decl.name, "skipping untitled declaration");
            return None;
        };

        let tags = decl.doc.as_ref().map(|d| d.tags.clone()).unwrap_or_default();

        let schema = match &decl.def {
            DeclarationDef::Function(func) => Schema::Function(self.function_schema(decl, func, tags)),
            DeclarationDef::Interface(_) if decl.has_tag(NOT_EXTENDS_TAG) => {
                let members = OwnMembers.members(origin, decl);
                Schema::Interface(self.interface_schema(&members, tags))
            }
            DeclarationDef::Interface(_) | DeclarationDef::TypeAlias(_) => {
                let members = self.enumerator.members(origin, decl);
                Schema::Interface(self.interface_schema(&members, tags))
            }
        };

        Some((title, schema))
    }

    fn interface_schema(&self, members: &[MemberDef], tags: Vec<Tag>) -> InterfaceSchema {
        InterfaceSchema {
            tags,
            data: members.iter().filter_map(|m| self.property(m)).collect(),
        }
    }

    /// Explicit docs, then the default-type map, then nothing
    fn property(&self, member: &MemberDef) -> Option<PropertySchema> {
        let Some(signature) = parse_signature(&member.text) else {
            debug!(text = %member.text, "dropping member with unrecognized signature");
            return None;
        };

        let tags = member_tags(member.doc.as_ref(), self.strict_comment);
        if has_locale_tag(&tags) {
            return Some(PropertySchema {
                name: signature.name,
                type_text: signature.type_text,
                is_optional: signature.is_optional,
                tags,
            });
        }

        match self.default_types.get(&signature.name) {
            Some(entry) => Some(PropertySchema {
                name: signature.name,
                type_text: entry.type_text.clone(),
                is_optional: signature.is_optional,
                tags: entry.tags.clone(),
            }),
            None => {
                debug!(name = %signature.name, "dropping undocumented member");
                None
            }
        }
    }

    fn function_schema(&self, decl: &Declaration, func: &FunctionDef, tags: Vec<Tag>) -> FunctionSchema {
        let doc = decl.doc.as_ref();

        let params = func
            .params
            .iter()
            .filter_map(|param| {
                let signature = parse_signature(&param.text)?;
                let param_doc = doc.and_then(|d| d.param(&param.name));
                let initializer_text = param
                    .initializer
                    .clone()
                    .or_else(|| param_doc.as_ref().and_then(|p| p.default.clone()));

                Some(ParamSchema {
                    tags: param_tags(param_doc.as_ref(), self.strict_comment),
                    name: signature.name,
                    type_text: signature.type_text,
                    is_optional: signature.is_optional,
                    initializer_text,
                })
            })
            .collect();

        let returns = func
            .return_type
            .clone()
            .or_else(|| doc.and_then(|d| d.returns_type()))
            .map(|t| to_single_line(&t))
            .unwrap_or_default();

        FunctionSchema {
            tags,
            params,
            returns,
        }
    }
}
