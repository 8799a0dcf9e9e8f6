//! Schema output types
//!
//! These serialize with camelCase keys (`isOptional`, `initializerText`).

use crate::js_doc::Tag;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One documented member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertySchema {
    pub name: String,
    /// Single-line type text
    #[serde(rename = "type")]
    pub type_text: String,
    pub is_optional: bool,
    pub tags: Vec<Tag>,
}

/// One function parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParamSchema {
    pub name: String,
    #[serde(rename = "type")]
    pub type_text: String,
    pub is_optional: bool,
    pub tags: Vec<Tag>,
    /// Default value expression, or the declared `@param [name=value]` default
    pub initializer_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceSchema {
    pub tags: Vec<Tag>,
    pub data: Vec<PropertySchema>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionSchema {
    pub tags: Vec<Tag>,
    pub params: Vec<ParamSchema>,
    pub returns: String,
}

/// Schema of one documented declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Schema {
    Function(FunctionSchema),
    Interface(InterfaceSchema),
}

impl Schema {
    /// Declaration-level tags
    pub fn tags(&self) -> &[Tag] {
        match self {
            Schema::Interface(s) => &s.tags,
            Schema::Function(s) => &s.tags,
        }
    }

    /// Number of members or parameters
    pub fn len(&self) -> usize {
        match self {
            Schema::Interface(s) => s.data.len(),
            Schema::Function(s) => s.params.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A schema with its title, as emitted in strict declaration order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitledSchema {
    pub title: String,
    pub schema: Schema,
}

/// Schemas of one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaOutput {
    /// Keyed by title; a later declaration with the same title replaces an earlier one
    Map(IndexMap<String, Schema>),
    /// Every titled declaration in source order
    Ordered(Vec<TitledSchema>),
}

impl SchemaOutput {
    pub fn len(&self) -> usize {
        match self {
            SchemaOutput::Map(m) => m.len(),
            SchemaOutput::Ordered(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `(title, schema)` pairs in output order
    pub fn entries(&self) -> Vec<(&str, &Schema)> {
        match self {
            SchemaOutput::Map(m) => m.iter().map(|(k, v)| (k.as_str(), v)).collect(),
            SchemaOutput::Ordered(v) => v.iter().map(|t| (t.title.as_str(), &t.schema)).collect(),
        }
    }

    /// First schema with the given title
    pub fn get(&self, title: &str) -> Option<&Schema> {
        match self {
            SchemaOutput::Map(m) => m.get(title),
            SchemaOutput::Ordered(v) => v.iter().find(|t| t.title == title).map(|t| &t.schema),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn alert() -> Schema {
        Schema::Interface(InterfaceSchema {
            tags: vec![Tag::new("title", "Alert")],
            data: vec![PropertySchema {
                name: "closable".into(),
                type_text: "boolean".into(),
                is_optional: true,
                tags: vec![Tag::new("en", "Whether Alert can be closed")],
            }],
        })
    }

    #[test]
    fn test_interface_json_shape() {
        let mut map = IndexMap::new();
        map.insert("Alert".to_string(), alert());
        let value = serde_json::to_value(SchemaOutput::Map(map)).unwrap();

        assert_eq!(
            value,
            json!({
                "Alert": {
                    "tags": [{ "name": "title", "value": "Alert" }],
                    "data": [{
                        "name": "closable",
                        "type": "boolean",
                        "isOptional": true,
                        "tags": [{ "name": "en", "value": "Whether Alert can be closed" }]
                    }]
                }
            })
        );
    }

    #[test]
    fn test_function_json_shape() {
        let schema = Schema::Function(FunctionSchema {
            tags: vec![],
            params: vec![ParamSchema {
                name: "size".into(),
                type_text: "string".into(),
                is_optional: true,
                tags: vec![],
                initializer_text: Some("'default'".into()),
            }],
            returns: "void".into(),
        });
        let output = SchemaOutput::Ordered(vec![TitledSchema {
            title: "useSize".into(),
            schema,
        }]);

        let value = serde_json::to_value(&output).unwrap();
        assert_eq!(value[0]["title"], json!("useSize"));
        assert_eq!(value[0]["schema"]["params"][0]["initializerText"], json!("'default'"));
        assert_eq!(value[0]["schema"]["returns"], json!("void"));

        let back: SchemaOutput = serde_json::from_value(value).unwrap();
        assert_eq!(back, output);
    }

    #[test]
    fn test_output_accessors() {
        let output = SchemaOutput::Ordered(vec![
            TitledSchema { title: "Alert".into(), schema: alert() },
            TitledSchema { title: "Alert".into(), schema: alert() },
        ]);
        assert_eq!(output.len(), 2);
        assert_eq!(output.entries()[1].0, "Alert");
        assert_eq!(output.get("Alert").unwrap().len(), 1);
        assert!(output.get("Missing").is_none());
    }
}
