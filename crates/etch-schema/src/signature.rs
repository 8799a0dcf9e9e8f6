//! Member signature parsing
//!
//! Works on the raw source text of a single member (`closable?: boolean;`)
//! rather than on the AST, so whatever the author wrote for the type is
//! what ends up in the table.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// `[readonly] name[?]: type[;|,]`, type may span lines
    static ref SIGNATURE_REGEX: Regex =
        Regex::new(r"(?s)^\s*(?:readonly\s+)?([A-Za-z_$][\w$]*)\s*(\?)?\s*:\s*(.*?)\s*[;,]?\s*$")
            .unwrap();

    static ref LINE_BREAK_REGEX: Regex = Regex::new(r"[\r\n\t]+").unwrap();

    static ref SPACE_RUN_REGEX: Regex = Regex::new(r" {2,}").unwrap();

    /// Anything that looks like an HTML element: `<div>`, `<a href="">`
    static ref HTML_TAG_REGEX: Regex = Regex::new(r"<[a-zA-Z]+[^>]*>").unwrap();
}

/// Name, optionality and type text of one member
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub name: String,
    pub is_optional: bool,
    pub type_text: String,
}

/// Parse `name?: type;` style member text.
///
/// Returns `None` for anything that is not a plain named property
/// (index signatures, spreads, call signatures, methods).
pub fn parse_signature(text: &str) -> Option<Signature> {
    let caps = SIGNATURE_REGEX.captures(text)?;
    let name = caps.get(1)?.as_str();
    let type_text = caps.get(3)?.as_str();

    if type_text.is_empty() {
        return None;
    }

    Some(Signature {
        name: name.to_string(),
        is_optional: caps.get(2).is_some(),
        type_text: to_single_line(type_text),
    })
}

/// Collapse text onto one line and make it safe for a Markdown table cell
pub fn to_single_line(text: &str) -> String {
    let text = LINE_BREAK_REGEX.replace_all(text.trim(), "");
    let text = SPACE_RUN_REGEX.replace_all(&text, "");
    text.replace('|', "\\|")
}

/// HTML-escape text only when it contains something that looks like markup
pub fn escape_html_like(text: &str) -> String {
    if HTML_TAG_REGEX.is_match(text) {
        html_escape::encode_text(text).into_owned()
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sig(name: &str, is_optional: bool, type_text: &str) -> Signature {
        Signature {
            name: name.to_string(),
            is_optional,
            type_text: type_text.to_string(),
        }
    }

    #[test]
    fn test_optional_member() {
        assert_eq!(
            parse_signature("closable?: boolean;"),
            Some(sig("closable", true, "boolean"))
        );
    }

    #[test]
    fn test_required_member_without_semicolon() {
        assert_eq!(
            parse_signature("title: string"),
            Some(sig("title", false, "string"))
        );
    }

    #[test]
    fn test_readonly_and_comma() {
        assert_eq!(
            parse_signature("readonly id: number,"),
            Some(sig("id", false, "number"))
        );
    }

    #[test]
    fn test_generic_type() {
        assert_eq!(
            parse_signature("items?: Array<Record<string, number>>;"),
            Some(sig("items", true, "Array<Record<string, number>>"))
        );
    }

    #[test]
    fn test_function_type() {
        assert_eq!(
            parse_signature("onClose?: (e: MouseEvent) => void;"),
            Some(sig("onClose", true, "(e: MouseEvent) => void"))
        );
    }

    #[test]
    fn test_multiline_union() {
        let text = "type?:\n    | 'info'\n    | 'success'\n    | 'warning';";
        assert_eq!(
            parse_signature(text),
            Some(sig("type", true, "\\| 'info'\\| 'success'\\| 'warning'"))
        );
    }

    #[test]
    fn test_dollar_identifier() {
        assert_eq!(
            parse_signature("$el: HTMLElement;"),
            Some(sig("$el", false, "HTMLElement"))
        );
    }

    #[test]
    fn test_index_signature_is_rejected() {
        assert_eq!(parse_signature("[key: string]: any;"), None);
    }

    #[test]
    fn test_spread_is_rejected() {
        assert_eq!(parse_signature("...rest: string[]"), None);
    }

    #[test]
    fn test_method_is_rejected() {
        assert_eq!(parse_signature("focus(): void;"), None);
    }

    #[test]
    fn test_missing_type_is_rejected() {
        assert_eq!(parse_signature("name?: ;"), None);
    }

    #[test]
    fn test_to_single_line() {
        assert_eq!(to_single_line("  a |\n\tb  "), "a \\|b");
        assert_eq!(to_single_line("x    y"), "xy");
        assert_eq!(to_single_line("x y"), "x y");
    }

    #[test]
    fn test_escape_html_like() {
        assert_eq!(escape_html_like("a < b"), "a < b");
        assert_eq!(
            escape_html_like("wrap in <div>"),
            "wrap in &lt;div&gt;"
        );
    }
}
