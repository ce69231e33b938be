// SPDX-License-Identifier: MIT OR Apache-2.0

//! Schema compilation and document validation.
//!
//! This module provides the `CompiledSchema` type, which turns a JSON-Schema-style
//! description into typed rules once, so that every subsequent write validates
//! against the compiled form instead of re-interpreting the schema value.
//!
//! The supported keyword subset covers the needs of settings documents:
//! `type` (a single name or a list of names), `properties`, `required`, `items`,
//! `enum`, the numeric bounds `minimum` / `maximum` / `exclusiveMinimum` /
//! `exclusiveMaximum`, and the size bounds `minLength` / `maxLength` /
//! `minItems` / `maxItems`. Unknown keywords are ignored, so schemas written for
//! richer validators still compile.

use crate::domain::errors::{Result, StoreError};
use crate::domain::Document;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

/// A single problem discovered while validating a document.
///
/// # Examples
///
/// ```
/// use appsave::domain::schema::SchemaViolation;
///
/// let violation = SchemaViolation::new("age", "expected integer, found string");
/// assert_eq!(violation.to_string(), "age: expected integer, found string");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SchemaViolation {
    /// Dotted path to the offending value. The document root is written `$root`,
    /// top-level keys are bare names, and array elements use `key[index]`.
    pub path: String,
    /// Human-readable description of the violation.
    pub message: String,
}

impl SchemaViolation {
    /// Creates a new violation for the given path.
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        SchemaViolation {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// JSON value categories a schema `type` keyword can name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SchemaType {
    Object,
    Array,
    String,
    Integer,
    Number,
    Boolean,
    Null,
}

impl SchemaType {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "object" => Some(SchemaType::Object),
            "array" => Some(SchemaType::Array),
            "string" => Some(SchemaType::String),
            "integer" => Some(SchemaType::Integer),
            "number" => Some(SchemaType::Number),
            "boolean" => Some(SchemaType::Boolean),
            "null" => Some(SchemaType::Null),
            _ => None,
        }
    }

    fn matches(&self, value: &Value) -> bool {
        match self {
            SchemaType::Object => value.is_object(),
            SchemaType::Array => value.is_array(),
            SchemaType::String => value.is_string(),
            // A float with a zero fraction still counts as an integer.
            SchemaType::Integer => {
                value.is_i64()
                    || value.is_u64()
                    || value.as_f64().map(|f| f.fract() == 0.0).unwrap_or(false)
            }
            SchemaType::Number => value.is_number(),
            SchemaType::Boolean => value.is_boolean(),
            SchemaType::Null => value.is_null(),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            SchemaType::Object => "object",
            SchemaType::Array => "array",
            SchemaType::String => "string",
            SchemaType::Integer => "integer",
            SchemaType::Number => "number",
            SchemaType::Boolean => "boolean",
            SchemaType::Null => "null",
        }
    }
}

/// The compiled rule set for one value position in the document tree.
#[derive(Clone, Debug, Default)]
struct SchemaNode {
    /// Permitted value categories. Empty means any type is accepted.
    types: Vec<SchemaType>,
    /// Rules for named keys of an object value.
    properties: BTreeMap<String, SchemaNode>,
    /// Keys an object value must contain.
    required: Vec<String>,
    /// Rule applied to every element of an array value.
    items: Option<Box<SchemaNode>>,
    /// Inclusive lower bound for numeric values.
    minimum: Option<f64>,
    /// Inclusive upper bound for numeric values.
    maximum: Option<f64>,
    /// Exclusive lower bound for numeric values.
    exclusive_minimum: Option<f64>,
    /// Exclusive upper bound for numeric values.
    exclusive_maximum: Option<f64>,
    /// Minimum string length, counted in characters.
    min_length: Option<usize>,
    /// Maximum string length, counted in characters.
    max_length: Option<usize>,
    /// Minimum number of array elements.
    min_items: Option<usize>,
    /// Maximum number of array elements.
    max_items: Option<usize>,
    /// Closed set of permitted values.
    allowed: Option<Vec<Value>>,
}

/// A schema compiled into typed validation rules.
///
/// Compilation happens once, when the schema is installed on the store; every
/// write then validates the candidate document against the compiled rules and
/// collects the full list of violations rather than stopping at the first.
///
/// # Examples
///
/// ```
/// use appsave::domain::schema::CompiledSchema;
/// use appsave::domain::Document;
/// use serde_json::json;
///
/// let schema = CompiledSchema::compile(&json!({
///     "type": "object",
///     "properties": {
///         "age": { "type": "integer", "minimum": 0 }
///     },
///     "required": ["age"]
/// })).unwrap();
///
/// let mut doc = Document::new();
/// doc.insert("age", json!(-3));
/// let violations = schema.validate(&doc);
/// assert_eq!(violations.len(), 1);
/// assert_eq!(violations[0].path, "age");
/// ```
#[derive(Clone, Debug)]
pub struct CompiledSchema {
    root: SchemaNode,
}

impl CompiledSchema {
    /// Compiles a JSON-shaped schema description into typed rules.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidSchema`] when the description is not an
    /// object, names an unknown `type`, or gives a keyword an operand of the
    /// wrong shape (for example a non-integer `minLength`).
    pub fn compile(schema: &Value) -> Result<Self> {
        let root = compile_node(schema, "schema")?;
        Ok(CompiledSchema { root })
    }

    /// Validates a document, returning every violation found.
    ///
    /// An empty vector means the document is valid.
    pub fn validate(&self, document: &Document) -> Vec<SchemaViolation> {
        let mut violations = Vec::new();
        let root_value = document.to_value();
        self.root.check(&root_value, "", &mut violations);
        violations
    }
}

fn compile_node(schema: &Value, location: &str) -> Result<SchemaNode> {
    let obj = schema.as_object().ok_or_else(|| StoreError::InvalidSchema {
        message: format!("{} must be an object, found {}", location, json_type_name(schema)),
    })?;

    let mut node = SchemaNode::default();

    if let Some(type_spec) = obj.get("type") {
        node.types = compile_types(type_spec, location)?;
    }

    if let Some(props) = obj.get("properties") {
        let props = props.as_object().ok_or_else(|| StoreError::InvalidSchema {
            message: format!("\"properties\" at {} must be an object", location),
        })?;
        for (name, child) in props {
            let child_location = format!("{}.properties.{}", location, name);
            node.properties
                .insert(name.clone(), compile_node(child, &child_location)?);
        }
    }

    if let Some(required) = obj.get("required") {
        let entries = required.as_array().ok_or_else(|| StoreError::InvalidSchema {
            message: format!("\"required\" at {} must be an array", location),
        })?;
        for entry in entries {
            let name = entry.as_str().ok_or_else(|| StoreError::InvalidSchema {
                message: format!("\"required\" at {} must contain only strings", location),
            })?;
            node.required.push(name.to_string());
        }
    }

    if let Some(items) = obj.get("items") {
        let child_location = format!("{}.items", location);
        node.items = Some(Box::new(compile_node(items, &child_location)?));
    }

    node.minimum = compile_number(obj, "minimum", location)?;
    node.maximum = compile_number(obj, "maximum", location)?;
    node.exclusive_minimum = compile_number(obj, "exclusiveMinimum", location)?;
    node.exclusive_maximum = compile_number(obj, "exclusiveMaximum", location)?;
    node.min_length = compile_count(obj, "minLength", location)?;
    node.max_length = compile_count(obj, "maxLength", location)?;
    node.min_items = compile_count(obj, "minItems", location)?;
    node.max_items = compile_count(obj, "maxItems", location)?;

    if let Some(allowed) = obj.get("enum") {
        let entries = allowed.as_array().ok_or_else(|| StoreError::InvalidSchema {
            message: format!("\"enum\" at {} must be an array", location),
        })?;
        node.allowed = Some(entries.clone());
    }

    Ok(node)
}

fn compile_types(spec: &Value, location: &str) -> Result<Vec<SchemaType>> {
    let parse_one = |name: &Value| -> Result<SchemaType> {
        let name = name.as_str().ok_or_else(|| StoreError::InvalidSchema {
            message: format!("\"type\" at {} must be a string or an array of strings", location),
        })?;
        SchemaType::parse(name).ok_or_else(|| StoreError::InvalidSchema {
            message: format!("unknown type \"{}\" at {}", name, location),
        })
    };

    match spec {
        // An empty list would match nothing; reject it rather than letting it
        // fall through as "no constraint".
        Value::Array(names) if names.is_empty() => Err(StoreError::InvalidSchema {
            message: format!("\"type\" at {} must name at least one type", location),
        }),
        Value::Array(names) => names.iter().map(parse_one).collect(),
        other => Ok(vec![parse_one(other)?]),
    }
}

fn compile_number(
    obj: &serde_json::Map<String, Value>,
    keyword: &str,
    location: &str,
) -> Result<Option<f64>> {
    match obj.get(keyword) {
        None => Ok(None),
        Some(value) => value
            .as_f64()
            .map(Some)
            .ok_or_else(|| StoreError::InvalidSchema {
                message: format!("\"{}\" at {} must be a number", keyword, location),
            }),
    }
}

fn compile_count(
    obj: &serde_json::Map<String, Value>,
    keyword: &str,
    location: &str,
) -> Result<Option<usize>> {
    match obj.get(keyword) {
        None => Ok(None),
        Some(value) => value
            .as_u64()
            .map(|n| Some(n as usize))
            .ok_or_else(|| StoreError::InvalidSchema {
                message: format!("\"{}\" at {} must be a non-negative integer", keyword, location),
            }),
    }
}

impl SchemaNode {
    fn check(&self, value: &Value, path: &str, out: &mut Vec<SchemaViolation>) {
        if !self.types.is_empty() && !self.types.iter().any(|t| t.matches(value)) {
            out.push(SchemaViolation::new(
                display_path(path),
                format!(
                    "expected {}, found {}",
                    type_list(&self.types),
                    json_type_name(value)
                ),
            ));
        }

        if let Some(allowed) = &self.allowed {
            if !allowed.contains(value) {
                out.push(SchemaViolation::new(
                    display_path(path),
                    "value is not one of the permitted values",
                ));
            }
        }

        // Each keyword only applies to values of its own category, so a type
        // mismatch above does not cascade into spurious secondary violations.
        if let Some(n) = value.as_f64() {
            if let Some(min) = self.minimum {
                if n < min {
                    out.push(SchemaViolation::new(
                        display_path(path),
                        format!("{} is less than the minimum {}", n, min),
                    ));
                }
            }
            if let Some(max) = self.maximum {
                if n > max {
                    out.push(SchemaViolation::new(
                        display_path(path),
                        format!("{} exceeds the maximum {}", n, max),
                    ));
                }
            }
            if let Some(min) = self.exclusive_minimum {
                if n <= min {
                    out.push(SchemaViolation::new(
                        display_path(path),
                        format!("{} must be greater than {}", n, min),
                    ));
                }
            }
            if let Some(max) = self.exclusive_maximum {
                if n >= max {
                    out.push(SchemaViolation::new(
                        display_path(path),
                        format!("{} must be less than {}", n, max),
                    ));
                }
            }
        }

        if let Some(s) = value.as_str() {
            let length = s.chars().count();
            if let Some(min) = self.min_length {
                if length < min {
                    out.push(SchemaViolation::new(
                        display_path(path),
                        format!("string length {} is less than the minimum length {}", length, min),
                    ));
                }
            }
            if let Some(max) = self.max_length {
                if length > max {
                    out.push(SchemaViolation::new(
                        display_path(path),
                        format!("string length {} exceeds the maximum length {}", length, max),
                    ));
                }
            }
        }

        if let Some(elements) = value.as_array() {
            if let Some(min) = self.min_items {
                if elements.len() < min {
                    out.push(SchemaViolation::new(
                        display_path(path),
                        format!("array has {} element(s), fewer than the minimum {}", elements.len(), min),
                    ));
                }
            }
            if let Some(max) = self.max_items {
                if elements.len() > max {
                    out.push(SchemaViolation::new(
                        display_path(path),
                        format!("array has {} element(s), more than the maximum {}", elements.len(), max),
                    ));
                }
            }
            if let Some(items) = &self.items {
                for (i, element) in elements.iter().enumerate() {
                    let element_path = format!("{}[{}]", path, i);
                    items.check(element, &element_path, out);
                }
            }
        }

        if let Some(obj) = value.as_object() {
            for required in &self.required {
                if !obj.contains_key(required) {
                    out.push(SchemaViolation::new(
                        make_path(path, required),
                        "required property is missing",
                    ));
                }
            }
            for (name, child) in &self.properties {
                if let Some(child_value) = obj.get(name) {
                    child.check(child_value, &make_path(path, name), out);
                }
            }
        }
    }
}

/// Returns the JSON type name for violation messages.
fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) => {
            if n.is_i64() || n.is_u64() {
                "integer"
            } else {
                "number"
            }
        }
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Creates a field path from prefix and field name.
fn make_path(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", prefix, field)
    }
}

/// The label used for a violation at the given walk position.
fn display_path(path: &str) -> String {
    if path.is_empty() {
        "$root".to_string()
    } else {
        path.to_string()
    }
}

fn type_list(types: &[SchemaType]) -> String {
    types
        .iter()
        .map(|t| t.name())
        .collect::<Vec<_>>()
        .join(" or ")
}
