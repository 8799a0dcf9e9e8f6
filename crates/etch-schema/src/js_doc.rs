//! JSDoc parsing and tag extraction
//!
//! Turns one documentation block into an ordered list of `(name, value)`
//! tags plus the free-text description that precedes the first tag.
//! Tag names are kept verbatim (`@defaultValue` stays `defaultValue`) and
//! repeated tags are preserved in source order, so a member can carry one
//! description tag per locale.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    /// A tag that starts in the middle of a line: `text @en More text`
    static ref INLINE_TAG_REGEX: Regex = Regex::new(r"\s@([A-Za-z])").unwrap();
}

/// Tag names that carry a localized description
pub const LOCALE_TAGS: &[&str] = &["zh", "en"];

/// A name/value pair taken from a documentation block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    pub value: String,
}

impl Tag {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Find the first tag with the given name
pub fn find_tag<'a>(tags: &'a [Tag], name: &str) -> Option<&'a Tag> {
    tags.iter().find(|t| t.name == name)
}

/// Whether any tag is a locale description tag (`zh` / `en`)
pub fn has_locale_tag(tags: &[Tag]) -> bool {
    tags.iter().any(|t| LOCALE_TAGS.contains(&t.name.as_str()))
}

/// Parsed documentation block
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocBlock {
    /// Text before the first tag
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,

    /// Tags in source order
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub tags: Vec<Tag>,
}

impl DocBlock {
    /// Parse a block comment body, with or without the `/**` `*/` delimiters
    pub fn parse(comment: &str) -> Self {
        let cleaned = clean_jsdoc_comment(comment);
        let description = extract_description(&cleaned);
        let tags = parse_tags(&cleaned);
        Self { description, tags }
    }

    pub fn is_empty(&self) -> bool {
        self.description.is_none() && self.tags.is_empty()
    }

    /// Value of the first tag with this name
    pub fn tag(&self, name: &str) -> Option<&str> {
        find_tag(&self.tags, name).map(|t| t.value.as_str())
    }

    pub fn has_tag(&self, name: &str) -> bool {
        find_tag(&self.tags, name).is_some()
    }

    /// Documentation of one parameter, from `@param` tags
    pub fn param(&self, name: &str) -> Option<ParamDoc> {
        self.tags
            .iter()
            .filter(|t| matches!(t.name.as_str(), "param" | "arg" | "argument"))
            .map(|t| parse_param_tag(&t.value))
            .find(|p| p.name == name)
    }

    /// Type written as `@returns {Type}`
    pub fn returns_type(&self) -> Option<String> {
        let value = self.tag("returns").or_else(|| self.tag("return"))?;
        extract_type_and_rest(value).0
    }
}

/// Tags of a member as the pipeline consumes them.
///
/// Without a block the result is empty. When `strict_comment` is off, the
/// plain description is appended as a synthetic tag for every locale that
/// has no explicit one.
pub fn member_tags(doc: Option<&DocBlock>, strict_comment: bool) -> Vec<Tag> {
    let Some(doc) = doc else {
        return Vec::new();
    };

    let mut tags = doc.tags.clone();
    if !strict_comment {
        if let Some(desc) = doc.description.as_deref() {
            promote_description(&mut tags, desc);
        }
    }
    tags
}

/// Tags of a function parameter, derived from the function's `@param` tag
pub fn param_tags(param: Option<&ParamDoc>, strict_comment: bool) -> Vec<Tag> {
    let mut tags = Vec::new();
    if strict_comment {
        return tags;
    }
    if let Some(doc) = param.and_then(|p| p.doc.as_deref()) {
        promote_description(&mut tags, doc);
    }
    tags
}

fn promote_description(tags: &mut Vec<Tag>, description: &str) {
    for locale in LOCALE_TAGS {
        if find_tag(tags, locale).is_none() {
            tags.push(Tag::new(*locale, description));
        }
    }
}

/// Parsed `@param` tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamDoc {
    pub name: String,
    /// Declared default from the `[name=value]` form
    pub default: Option<String>,
    pub doc: Option<String>,
}

/// Remove comment delimiters and leading `*` gutters
fn clean_jsdoc_comment(comment: &str) -> String {
    let mut result = String::new();

    for line in comment.lines() {
        let trimmed = line.trim();

        if trimmed == "/**" || trimmed == "*/" {
            continue;
        }

        let mut content = trimmed;

        if content.starts_with("/**") {
            content = content.trim_start_matches("/**").trim_start();
        }

        if let Some(rest) = content.strip_prefix("* ") {
            content = rest;
        } else if let Some(rest) = content.strip_prefix('*') {
            content = rest;
        }

        if content.ends_with("*/") {
            content = content.trim_end_matches("*/").trim_end();
        }

        if !result.is_empty() && !content.is_empty() {
            result.push('\n');
        }
        result.push_str(content);
    }

    // One tag per line from here on
    INLINE_TAG_REGEX
        .replace_all(result.trim(), "\n@$1")
        .into_owned()
}

/// Description text before the first tag
fn extract_description(text: &str) -> Option<String> {
    if text.starts_with('@') {
        return None;
    }

    let desc = match text.find("\n@") {
        Some(pos) => &text[..pos],
        None => text,
    };

    let trimmed = desc.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn parse_tags(text: &str) -> Vec<Tag> {
    let mut tags = Vec::new();
    let mut current: Option<(String, String)> = None;

    for line in text.lines() {
        let trimmed = line.trim();

        if let Some(after_at) = trimmed.strip_prefix('@') {
            if let Some((name, value)) = current.take() {
                tags.push(Tag::new(name, value.trim()));
            }

            match after_at.find(char::is_whitespace) {
                Some(pos) => {
                    current = Some((after_at[..pos].to_string(), after_at[pos..].to_string()))
                }
                None => current = Some((after_at.to_string(), String::new())),
            }
        } else if let Some((_, ref mut value)) = current {
            if !value.trim().is_empty() {
                value.push('\n');
            }
            value.push_str(trimmed);
        }
    }

    if let Some((name, value)) = current {
        tags.push(Tag::new(name, value.trim()));
    }

    tags
}

/// Parse `{type} [name=default] - description`
fn parse_param_tag(content: &str) -> ParamDoc {
    // The `{type}` part is informational; parameter types come from the source
    let (_, rest) = extract_type_and_rest(content.trim());

    if let Some(inner) = rest.strip_prefix('[') {
        if let Some(bracket_end) = inner.find(']') {
            let bracket_content = &inner[..bracket_end];
            let after_bracket = &inner[bracket_end + 1..];

            let (name, default) = match bracket_content.find('=') {
                Some(eq_pos) => (
                    bracket_content[..eq_pos].trim().to_string(),
                    Some(bracket_content[eq_pos + 1..].trim().to_string()),
                ),
                None => (bracket_content.trim().to_string(), None),
            };

            return ParamDoc {
                name,
                default,
                doc: extract_doc_after_name(after_bracket),
            };
        }
    }

    let (name, doc) = split_name_and_doc(rest);
    ParamDoc {
        name,
        default: None,
        doc,
    }
}

/// Split a leading `{type}` off the content
fn extract_type_and_rest(content: &str) -> (Option<String>, &str) {
    if content.starts_with('{') {
        if let Some(close_pos) = find_matching_brace(content) {
            let type_str = &content[1..close_pos];
            let rest = content[close_pos + 1..].trim();
            return (Some(type_str.trim().to_string()), rest);
        }
    }
    (None, content)
}

/// Byte index of the brace closing the one at index 0
fn find_matching_brace(s: &str) -> Option<usize> {
    let mut depth = 0;
    for (i, c) in s.char_indices() {
        match c {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Split "name - description" or "name description"
fn split_name_and_doc(s: &str) -> (String, Option<String>) {
    let s = s.trim();

    match s.find(char::is_whitespace) {
        Some(pos) => (s[..pos].to_string(), extract_doc_after_name(&s[pos..])),
        None => (s.to_string(), None),
    }
}

fn extract_doc_after_name(s: &str) -> Option<String> {
    let trimmed = s.trim().trim_start_matches('-').trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_locale_tags() {
        let doc = DocBlock::parse(
            r#"/**
             * @zh 是否可以关闭
             * @en Whether Alert can be closed
             * @defaultValue false
             */"#,
        );

        assert_eq!(doc.description, None);
        assert_eq!(
            doc.tags,
            vec![
                Tag::new("zh", "是否可以关闭"),
                Tag::new("en", "Whether Alert can be closed"),
                Tag::new("defaultValue", "false"),
            ]
        );
    }

    #[test]
    fn test_leading_tag_is_not_a_description() {
        let doc = DocBlock::parse("/**\n * @version 1.2.0\n * @defaultValue x\n */");
        assert_eq!(doc.description, None);
        assert!(member_tags(Some(&doc), false)
            .iter()
            .all(|t| !LOCALE_TAGS.contains(&t.name.as_str())));

        let doc = DocBlock::parse("/**\n * @en Closable\n * @defaultValue false\n */");
        assert_eq!(
            member_tags(Some(&doc), false),
            vec![Tag::new("en", "Closable"), Tag::new("defaultValue", "false")]
        );
    }

    #[test]
    fn test_parse_description_and_title() {
        let doc = DocBlock::parse(
            r#"*
 * Alert component.
 *
 * @title Alert
 * @notExtends
 "#,
        );

        assert_eq!(doc.description.as_deref(), Some("Alert component."));
        assert_eq!(doc.tag("title"), Some("Alert"));
        assert!(doc.has_tag("notExtends"));
        assert_eq!(doc.tag("notExtends"), Some(""));
    }

    #[test]
    fn test_multiline_tag_value() {
        let doc = DocBlock::parse("/**\n * @en First line\n * second line\n */");
        assert_eq!(doc.tag("en"), Some("First line\nsecond line"));
    }

    #[test]
    fn test_inline_tags_are_split() {
        let doc = DocBlock::parse("/** @zh 标题 @en Title */");
        assert_eq!(
            doc.tags,
            vec![Tag::new("zh", "标题"), Tag::new("en", "Title")]
        );
    }

    #[test]
    fn test_inline_link_is_not_a_tag() {
        let doc = DocBlock::parse("/** @en See {@link Foo} for details */");
        assert_eq!(doc.tags.len(), 1);
        assert_eq!(doc.tag("en"), Some("See {@link Foo} for details"));
    }

    #[test]
    fn test_member_tags_without_block() {
        assert!(member_tags(None, false).is_empty());
    }

    #[test]
    fn test_member_tags_promotes_plain_comment() {
        let doc = DocBlock::parse("/** Custom icon */");
        let tags = member_tags(Some(&doc), false);
        assert_eq!(
            tags,
            vec![Tag::new("zh", "Custom icon"), Tag::new("en", "Custom icon")]
        );
    }

    #[test]
    fn test_member_tags_keeps_explicit_locale() {
        let doc = DocBlock::parse("/**\n * Plain text\n * @en English\n */");
        let tags = member_tags(Some(&doc), false);
        assert_eq!(
            tags,
            vec![Tag::new("en", "English"), Tag::new("zh", "Plain text")]
        );
    }

    #[test]
    fn test_member_tags_strict_comment() {
        let doc = DocBlock::parse("/**\n * Plain text\n * @version 2.1.0\n */");
        let tags = member_tags(Some(&doc), true);
        assert_eq!(tags, vec![Tag::new("version", "2.1.0")]);
        assert!(!has_locale_tag(&tags));
    }

    #[test]
    fn test_param_doc() {
        let doc = DocBlock::parse(
            r#"/**
             * @param {string} title - The title
             * @param [size=default] Button size
             */"#,
        );

        let title = doc.param("title").unwrap();
        assert_eq!(title.doc.as_deref(), Some("The title"));
        assert_eq!(title.default, None);

        let size = doc.param("size").unwrap();
        assert_eq!(size.default.as_deref(), Some("default"));
        assert_eq!(size.doc.as_deref(), Some("Button size"));

        assert!(doc.param("missing").is_none());
    }

    #[test]
    fn test_param_tags() {
        let param = ParamDoc {
            name: "title".into(),
            default: None,
            doc: Some("The title".into()),
        };
        assert_eq!(
            param_tags(Some(&param), false),
            vec![Tag::new("zh", "The title"), Tag::new("en", "The title")]
        );
        assert!(param_tags(Some(&param), true).is_empty());
        assert!(param_tags(None, false).is_empty());
    }

    #[test]
    fn test_returns_type() {
        let doc = DocBlock::parse("/** @returns {Promise<string>} The contents */");
        assert_eq!(doc.returns_type().as_deref(), Some("Promise<string>"));
        assert_eq!(DocBlock::parse("/** @returns nothing */").returns_type(), None);
    }
}
