//! Tool input schema parsing.
//!
//! Each tool ships its input schema as a JSON document literal. The parser
//! projects the recognized top-level keys into a [`SchemaDescriptor`] that is
//! announced to clients; it does not validate call arguments against it.
//! Unrecognized keys are ignored.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Schema parse errors.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The document is not a well-formed schema object.
    #[error("Malformed schema document: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Structural view of a tool's input schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaDescriptor {
    /// Top-level type tag (normally `"object"`)
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<String>,

    /// Named properties, each with its own nested schema
    #[serde(default)]
    pub properties: Map<String, Value>,

    /// Required property names; `None` when the key is absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,

    /// `None` means unspecified, which is distinct from `Some(false)`
    #[serde(
        rename = "additionalProperties",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub additional_properties: Option<bool>,

    /// Draft-07 style definitions
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definitions: Option<Map<String, Value>>,

    /// Draft 2019-09+ style definitions, kept apart from `definitions`
    #[serde(rename = "$defs", default, skip_serializing_if = "Option::is_none")]
    pub defs: Option<Map<String, Value>>,
}

impl SchemaDescriptor {
    /// Type tag, `"object"` when unspecified.
    pub fn schema_type(&self) -> &str {
        self.schema_type.as_deref().unwrap_or("object")
    }

    /// Required property names; empty when the document declared none.
    pub fn required(&self) -> &[String] {
        self.required.as_deref().unwrap_or_default()
    }

    pub fn has_required(&self) -> bool {
        self.required.is_some()
    }

    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// Look up a nested definition in `definitions`, then `$defs`.
    pub fn definition(&self, name: &str) -> Option<&Value> {
        self.definitions
            .as_ref()
            .and_then(|d| d.get(name))
            .or_else(|| self.defs.as_ref().and_then(|d| d.get(name)))
    }
}

/// Parses schema documents into descriptors.
pub struct SchemaParser;

impl SchemaParser {
    /// Parse a schema document from JSON text.
    pub fn parse(document: &str) -> Result<SchemaDescriptor, SchemaError> {
        Ok(serde_json::from_str(document)?)
    }

    /// Parse an already-decoded schema document.
    pub fn parse_value(document: Value) -> Result<SchemaDescriptor, SchemaError> {
        Ok(serde_json::from_value(document)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_document() {
        let schema = SchemaParser::parse(
            r##"{
                "type": "object",
                "properties": {
                    "name": {"type": "string", "description": "Topic name"},
                    "partitions": {"type": "integer"}
                },
                "required": ["name"],
                "additionalProperties": false,
                "definitions": {"legacy": {"type": "string"}},
                "$defs": {"modern": {"type": "integer"}}
            }"##,
        )
        .unwrap();

        assert_eq!(schema.schema_type(), "object");
        assert_eq!(schema.properties.len(), 2);
        assert_eq!(schema.required(), ["name".to_string()]);
        assert_eq!(schema.additional_properties, Some(false));
        assert_eq!(schema.definition("legacy").unwrap()["type"], "string");
        assert_eq!(schema.definition("modern").unwrap()["type"], "integer");
        assert!(schema.defs.as_ref().unwrap().get("legacy").is_none());
    }

    #[test]
    fn test_absent_required_is_empty_not_error() {
        let schema = SchemaParser::parse(r#"{"type": "object", "properties": {}}"#).unwrap();
        assert!(schema.required().is_empty());
        assert!(!schema.has_required());
    }

    #[test]
    fn test_absent_additional_properties_is_unspecified() {
        let schema = SchemaParser::parse(r#"{"type": "object"}"#).unwrap();
        assert_eq!(schema.additional_properties, None);
        assert!(schema.properties.is_empty());
    }

    #[test]
    fn test_unrecognized_keys_ignored() {
        let schema = SchemaParser::parse(
            r#"{"type": "object", "title": "Ignored", "x-internal": true}"#,
        )
        .unwrap();
        assert_eq!(schema.schema_type(), "object");
    }

    #[test]
    fn test_malformed_document_fails() {
        assert!(SchemaParser::parse(r#"{"type": "object", "properties": "#).is_err());
        assert!(SchemaParser::parse("[1, 2, 3]").is_err());
        assert!(SchemaParser::parse(r#"{"required": "name"}"#).is_err());
    }

    #[test]
    fn test_serialized_form_omits_unspecified_keys() {
        let schema = SchemaParser::parse(r#"{"type": "object", "properties": {}}"#).unwrap();
        let json = serde_json::to_value(&schema).unwrap();
        assert_eq!(json, serde_json::json!({"type": "object", "properties": {}}));
    }
}
