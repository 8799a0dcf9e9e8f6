//! Lowering of parsed TypeScript modules into `Declaration`s
//!
//! Only interfaces, type aliases and function declarations are kept, whether
//! exported, default-exported or module-private. Everything else in a module
//! (classes, variables, imports, enums) is ignored.

use crate::diagnostics::SchemaResult;
use crate::js_doc::DocBlock;
use crate::node::{
    Declaration, DeclarationDef, FunctionDef, InterfaceDef, MemberDef, ParamDef, TypeAliasDef,
    TypeRef, TypeShape,
};
use crate::utils::swc::{
    entity_name, expr_to_name, key_name, parse_typescript_file, parse_typescript_source,
    ParsedModule,
};
use deno_ast::swc::ast as swc_ast;
use deno_ast::swc::common::{Span, Spanned};
use std::collections::HashSet;
use std::path::Path;

/// Parse a TypeScript file and lower its declarations
pub fn parse_file(path: impl AsRef<Path>) -> SchemaResult<Vec<Declaration>> {
    let parsed = parse_typescript_file(path)?;
    Ok(extract_declarations(&parsed))
}

/// Parse TypeScript source text and lower its declarations
pub fn parse_source(path: impl AsRef<Path>, source: &str) -> SchemaResult<Vec<Declaration>> {
    let parsed = parse_typescript_source(path, source)?;
    Ok(extract_declarations(&parsed))
}

/// Declarations of a module in source order
pub fn extract_declarations(parsed: &ParsedModule) -> Vec<Declaration> {
    let Some(module) = parsed.module() else {
        return Vec::new();
    };

    let implemented: HashSet<String> = module
        .body
        .iter()
        .filter_map(function_with_body)
        .collect();

    let mut declarations = Vec::new();
    for item in &module.body {
        // Overload signatures are folded into their implementation
        if let Some((name, false)) = function_body_state(item) {
            if implemented.contains(&name) {
                continue;
            }
        }
        if let Some(decl) = extract_from_item(parsed, item) {
            declarations.push(decl);
        }
    }

    declarations
}

fn function_with_body(item: &swc_ast::ModuleItem) -> Option<String> {
    match function_body_state(item) {
        Some((name, true)) => Some(name),
        _ => None,
    }
}

/// Name of a function declaration and whether it has a body
fn function_body_state(item: &swc_ast::ModuleItem) -> Option<(String, bool)> {
    let fn_decl = match item {
        swc_ast::ModuleItem::ModuleDecl(swc_ast::ModuleDecl::ExportDecl(export)) => {
            match &export.decl {
                swc_ast::Decl::Fn(f) => f,
                _ => return None,
            }
        }
        swc_ast::ModuleItem::Stmt(swc_ast::Stmt::Decl(swc_ast::Decl::Fn(f))) => f,
        _ => return None,
    };
    Some((
        fn_decl.ident.sym.to_string(),
        fn_decl.function.body.is_some(),
    ))
}

fn extract_from_item(parsed: &ParsedModule, item: &swc_ast::ModuleItem) -> Option<Declaration> {
    match item {
        swc_ast::ModuleItem::ModuleDecl(swc_ast::ModuleDecl::ExportDecl(export)) => {
            let mut decl = extract_from_decl(parsed, &export.decl)?;
            // JSDoc sits before `export`, not before the inner declaration
            if decl.doc.is_none() {
                decl.doc = extract_jsdoc(parsed, export.span);
            }
            decl.location = parsed.span_to_location(export.span);
            Some(decl)
        }
        swc_ast::ModuleItem::ModuleDecl(swc_ast::ModuleDecl::ExportDefaultDecl(export)) => {
            let mut decl = extract_from_default_decl(parsed, &export.decl)?;
            if decl.doc.is_none() {
                decl.doc = extract_jsdoc(parsed, export.span);
            }
            decl.location = parsed.span_to_location(export.span);
            Some(decl)
        }
        swc_ast::ModuleItem::Stmt(swc_ast::Stmt::Decl(decl)) => extract_from_decl(parsed, decl),
        _ => None,
    }
}

fn extract_from_decl(parsed: &ParsedModule, decl: &swc_ast::Decl) -> Option<Declaration> {
    match decl {
        swc_ast::Decl::TsInterface(iface) => Some(extract_interface(parsed, iface)),
        swc_ast::Decl::TsTypeAlias(alias) => Some(extract_type_alias(parsed, alias)),
        swc_ast::Decl::Fn(fn_decl) => Some(extract_function(
            parsed,
            fn_decl.ident.sym.to_string(),
            &fn_decl.function,
            fn_decl.span(),
        )),
        _ => None,
    }
}

fn extract_from_default_decl(
    parsed: &ParsedModule,
    decl: &swc_ast::DefaultDecl,
) -> Option<Declaration> {
    match decl {
        swc_ast::DefaultDecl::TsInterfaceDecl(iface) => Some(extract_interface(parsed, iface)),
        swc_ast::DefaultDecl::Fn(fn_expr) => {
            let name = fn_expr
                .ident
                .as_ref()
                .map(|i| i.sym.to_string())
                .unwrap_or_else(|| "default".to_string());
            Some(extract_function(
                parsed,
                name,
                &fn_expr.function,
                fn_expr.span(),
            ))
        }
        swc_ast::DefaultDecl::Class(_) => None,
    }
}

fn extract_interface(parsed: &ParsedModule, iface: &swc_ast::TsInterfaceDecl) -> Declaration {
    let extends = iface
        .extends
        .iter()
        .filter_map(|e| {
            Some(TypeRef {
                name: expr_to_name(&e.expr)?,
                type_args: e
                    .type_args
                    .as_ref()
                    .map(|a| parsed.text_for_span(a.span).to_string()),
            })
        })
        .collect();

    Declaration {
        name: iface.id.sym.to_string(),
        location: parsed.span_to_location(iface.span),
        doc: extract_jsdoc(parsed, iface.span),
        def: DeclarationDef::Interface(InterfaceDef {
            extends,
            members: extract_members(parsed, &iface.body.body),
        }),
    }
}

fn extract_type_alias(parsed: &ParsedModule, alias: &swc_ast::TsTypeAliasDecl) -> Declaration {
    Declaration {
        name: alias.id.sym.to_string(),
        location: parsed.span_to_location(alias.span),
        doc: extract_jsdoc(parsed, alias.span),
        def: DeclarationDef::TypeAlias(TypeAliasDef {
            shape: extract_shape(parsed, &alias.type_ann),
        }),
    }
}

fn extract_shape(parsed: &ParsedModule, ty: &swc_ast::TsType) -> TypeShape {
    match ty {
        swc_ast::TsType::TsTypeLit(lit) => TypeShape::Literal(extract_members(parsed, &lit.members)),
        swc_ast::TsType::TsTypeRef(r) => TypeShape::Reference(TypeRef {
            name: entity_name(&r.type_name),
            type_args: r
                .type_params
                .as_ref()
                .map(|p| parsed.text_for_span(p.span).to_string()),
        }),
        swc_ast::TsType::TsUnionOrIntersectionType(
            swc_ast::TsUnionOrIntersectionType::TsIntersectionType(i),
        ) => TypeShape::Intersection(i.types.iter().map(|t| extract_shape(parsed, t)).collect()),
        swc_ast::TsType::TsParenthesizedType(p) => extract_shape(parsed, &p.type_ann),
        other => TypeShape::Other(parsed.text_for_span(other.span()).to_string()),
    }
}

fn extract_members(parsed: &ParsedModule, elements: &[swc_ast::TsTypeElement]) -> Vec<MemberDef> {
    elements
        .iter()
        .map(|element| {
            let name = match element {
                swc_ast::TsTypeElement::TsPropertySignature(p) => key_name(&p.key),
                swc_ast::TsTypeElement::TsMethodSignature(m) => key_name(&m.key),
                swc_ast::TsTypeElement::TsGetterSignature(g) => key_name(&g.key),
                swc_ast::TsTypeElement::TsSetterSignature(s) => key_name(&s.key),
                _ => None,
            };
            MemberDef {
                name,
                text: parsed.text_for_span(element.span()).to_string(),
                doc: extract_jsdoc(parsed, element.span()),
            }
        })
        .collect()
}

fn extract_function(
    parsed: &ParsedModule,
    name: String,
    function: &swc_ast::Function,
    span: Span,
) -> Declaration {
    Declaration {
        name,
        location: parsed.span_to_location(span),
        doc: extract_jsdoc(parsed, span),
        def: DeclarationDef::Function(FunctionDef {
            params: function
                .params
                .iter()
                .filter_map(|p| extract_param(parsed, &p.pat))
                .collect(),
            return_type: function
                .return_type
                .as_ref()
                .map(|t| parsed.text_for_span(t.type_ann.span()).to_string()),
        }),
    }
}

/// Lower a parameter pattern to `name[?]: type` text
fn extract_param(parsed: &ParsedModule, pat: &swc_ast::Pat) -> Option<ParamDef> {
    match pat {
        swc_ast::Pat::Ident(i) => {
            let name = i.sym.to_string();
            let ty = type_ann_text(parsed, i.type_ann.as_deref());
            Some(ParamDef {
                text: param_text(&name, i.optional, &ty),
                name,
                initializer: None,
            })
        }
        swc_ast::Pat::Assign(a) => {
            let mut param = extract_param(parsed, &a.left)?;
            let ty = match a.left.as_ref() {
                swc_ast::Pat::Ident(i) => type_ann_text(parsed, i.type_ann.as_deref()),
                _ => "any".to_string(),
            };
            param.text = param_text(&param.name, true, &ty);
            param.initializer = Some(parsed.text_for_span(a.right.span()).to_string());
            Some(param)
        }
        swc_ast::Pat::Rest(r) => {
            // Rest parameters are never required
            let mut param = extract_param(parsed, &r.arg)?;
            let ty = match (r.type_ann.as_deref(), r.arg.as_ref()) {
                (Some(ann), _) => type_ann_text(parsed, Some(ann)),
                (None, swc_ast::Pat::Ident(i)) => type_ann_text(parsed, i.type_ann.as_deref()),
                (None, _) => "any".to_string(),
            };
            param.text = param_text(&param.name, true, &ty);
            Some(param)
        }
        swc_ast::Pat::Object(_) | swc_ast::Pat::Array(_) => {
            // Destructured parameters have no single name; the text is kept
            // as written and fails signature parsing downstream.
            let text = parsed.text_for_span(pat.span()).to_string();
            Some(ParamDef {
                name: text.clone(),
                text,
                initializer: None,
            })
        }
        swc_ast::Pat::Expr(_) | swc_ast::Pat::Invalid(_) => None,
    }
}

fn type_ann_text(parsed: &ParsedModule, ann: Option<&swc_ast::TsTypeAnn>) -> String {
    ann.map(|t| parsed.text_for_span(t.type_ann.span()).to_string())
        .unwrap_or_else(|| "any".to_string())
}

fn param_text(name: &str, optional: bool, ty: &str) -> String {
    format!("{}{}: {}", name, if optional { "?" } else { "" }, ty)
}

fn extract_jsdoc(parsed: &ParsedModule, span: Span) -> Option<DocBlock> {
    parsed
        .jsdoc_for_span(span)
        .map(|text| DocBlock::parse(&text))
        .filter(|doc| !doc.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::DeclarationKind;
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> Vec<Declaration> {
        parse_source("/tmp/test.tsx", source).unwrap()
    }

    #[test]
    fn test_parse_interface() {
        let decls = parse(
            r#"
/**
 * @title Alert
 */
export interface AlertProps extends BaseProps, React.HTMLAttributes<HTMLDivElement> {
  /**
   * @en Whether Alert can be closed
   */
  closable?: boolean;
  content: ReactNode;
  [key: string]: any;
}
"#,
        );

        assert_eq!(decls.len(), 1);
        let decl = &decls[0];
        assert_eq!(decl.name, "AlertProps");
        assert_eq!(decl.title(), Some("Alert"));
        assert_eq!(decl.location.line, 5);

        let DeclarationDef::Interface(iface) = &decl.def else {
            panic!("expected interface");
        };
        assert_eq!(
            iface.extends,
            vec![
                TypeRef::new("BaseProps"),
                TypeRef {
                    name: "React.HTMLAttributes".into(),
                    type_args: Some("<HTMLDivElement>".into()),
                },
            ]
        );

        let names: Vec<_> = iface.members.iter().map(|m| m.name.clone()).collect();
        assert_eq!(
            names,
            vec![Some("closable".into()), Some("content".into()), None]
        );
        assert!(iface.members[0].text.starts_with("closable?: boolean"));
        assert_eq!(
            iface.members[0].doc.as_ref().unwrap().tag("en"),
            Some("Whether Alert can be closed")
        );
        assert!(iface.members[1].doc.is_none());
    }

    #[test]
    fn test_parse_type_alias_shapes() {
        let decls = parse(
            r#"
type A = { a: string };
type B = A & { b?: number } & (Other);
type C = 'x' | 'y';
type D = ns.Base<string>;
"#,
        );

        let shapes: Vec<_> = decls
            .iter()
            .map(|d| match &d.def {
                DeclarationDef::TypeAlias(t) => t.shape.clone(),
                _ => panic!("expected type alias"),
            })
            .collect();

        assert!(matches!(&shapes[0], TypeShape::Literal(m) if m.len() == 1));
        match &shapes[1] {
            TypeShape::Intersection(parts) => {
                assert_eq!(parts.len(), 3);
                assert_eq!(parts[0], TypeShape::Reference(TypeRef::new("A")));
                assert_eq!(parts[2], TypeShape::Reference(TypeRef::new("Other")));
            }
            other => panic!("unexpected shape {:?}", other),
        }
        assert_eq!(shapes[2], TypeShape::Other("'x' | 'y'".into()));
        assert_eq!(
            shapes[3],
            TypeShape::Reference(TypeRef {
                name: "ns.Base".into(),
                type_args: Some("<string>".into()),
            })
        );
    }

    #[test]
    fn test_parse_function_params() {
        let decls = parse(
            r#"
/**
 * @title useThing
 */
export default function useThing(title: string, size = 'default', visible?: boolean, ...rest: number[]): Promise<void> {}
"#,
        );

        let decl = &decls[0];
        assert_eq!(decl.kind(), DeclarationKind::Function);
        assert_eq!(decl.title(), Some("useThing"));

        let DeclarationDef::Function(func) = &decl.def else {
            panic!("expected function");
        };
        let texts: Vec<_> = func.params.iter().map(|p| p.text.as_str()).collect();
        assert_eq!(
            texts,
            vec![
                "title: string",
                "size?: any",
                "visible?: boolean",
                "rest?: number[]"
            ]
        );
        assert_eq!(func.params[1].initializer.as_deref(), Some("'default'"));
        assert_eq!(func.return_type.as_deref(), Some("Promise<void>"));
    }

    #[test]
    fn test_untyped_rest_param_is_optional() {
        let decls = parse("function f(a: string, ...args) {}");
        let DeclarationDef::Function(func) = &decls[0].def else {
            panic!("expected function");
        };
        let texts: Vec<_> = func.params.iter().map(|p| p.text.as_str()).collect();
        assert_eq!(texts, vec!["a: string", "args?: any"]);
    }

    #[test]
    fn test_overloads_fold_into_implementation() {
        let decls = parse(
            r#"
export function pick(a: string): string;
export function pick(a: number): number;
export function pick(a: any): any { return a; }
declare function ambient(a: string): void;
"#,
        );

        let names: Vec<_> = decls.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["pick", "ambient"]);
    }

    #[test]
    fn test_ignores_other_items() {
        let decls = parse(
            r#"
import { X } from './x';
export const a = 1;
export class B {}
enum C { D }
interface Local { e: string }
"#,
        );

        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].name, "Local");
        assert!(decls[0].doc.is_none());
    }
}
