//! Declaration model
//!
//! `Declaration` is the owned, parser-independent view of one interface,
//! type alias or function found in a source file. Members keep their raw
//! source text; the signature parser works on that text directly.

use crate::js_doc::DocBlock;
use serde::{Deserialize, Serialize};

/// Source location of a declaration
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    /// Source filename
    pub filename: String,
    /// 1-indexed line number
    pub line: usize,
    /// 0-indexed column number
    pub col: usize,
}

impl Location {
    pub fn new(filename: impl Into<String>, line: usize, col: usize) -> Self {
        Self {
            filename: filename.into(),
            line,
            col,
        }
    }
}

/// Kind of a documented declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeclarationKind {
    Interface,
    TypeAlias,
    Function,
}

/// One top-level interface, type alias or function
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    /// Identifier as written (`default` for anonymous default exports)
    pub name: String,
    pub location: Location,
    pub doc: Option<DocBlock>,
    pub def: DeclarationDef,
}

impl Declaration {
    pub fn kind(&self) -> DeclarationKind {
        match &self.def {
            DeclarationDef::Interface(_) => DeclarationKind::Interface,
            DeclarationDef::TypeAlias(_) => DeclarationKind::TypeAlias,
            DeclarationDef::Function(_) => DeclarationKind::Function,
        }
    }

    /// Value of a declaration-level tag
    pub fn tag(&self, name: &str) -> Option<&str> {
        self.doc.as_ref().and_then(|d| d.tag(name))
    }

    pub fn has_tag(&self, name: &str) -> bool {
        self.doc.as_ref().is_some_and(|d| d.has_tag(name))
    }

    /// The `@title` tag, if present and non-empty
    pub fn title(&self) -> Option<&str> {
        self.tag("title").filter(|t| !t.is_empty())
    }
}

/// Kind-specific part of a declaration
#[derive(Debug, Clone, PartialEq)]
pub enum DeclarationDef {
    Interface(InterfaceDef),
    TypeAlias(TypeAliasDef),
    Function(FunctionDef),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InterfaceDef {
    /// Base types from the `extends` clause
    pub extends: Vec<TypeRef>,
    /// Members written in this declaration
    pub members: Vec<MemberDef>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeAliasDef {
    pub shape: TypeShape,
}

/// The part of an aliased type that contributes members
#[derive(Debug, Clone, PartialEq)]
pub enum TypeShape {
    /// `{ a: string }`
    Literal(Vec<MemberDef>),
    /// `Base` or `ns.Base<T>`
    Reference(TypeRef),
    /// `A & B & { c: number }`
    Intersection(Vec<TypeShape>),
    /// Anything without a member set of its own (unions, mapped types, ...)
    Other(String),
}

/// A named type reference; type arguments are kept as text only
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    /// Full entity name, `React.HTMLAttributes`
    pub name: String,
    pub type_args: Option<String>,
}

impl TypeRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_args: None,
        }
    }

    /// Last segment of a qualified name, used for lookups
    pub fn local_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }
}

/// One interface or type literal member
#[derive(Debug, Clone, PartialEq)]
pub struct MemberDef {
    /// `None` for index, call and construct signatures
    pub name: Option<String>,
    /// Raw member text, `closable?: boolean;`
    pub text: String,
    pub doc: Option<DocBlock>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FunctionDef {
    pub params: Vec<ParamDef>,
    /// Annotated return type text
    pub return_type: Option<String>,
}

/// One formal parameter of a function
#[derive(Debug, Clone, PartialEq)]
pub struct ParamDef {
    pub name: String,
    /// Signature-shaped text, `title?: string`; untyped parameters become `any`
    pub text: String,
    /// Default value expression text
    pub initializer: Option<String>,
}
