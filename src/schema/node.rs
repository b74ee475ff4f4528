//! Schema nodes: inference from single values plus pairwise merge.
//!
//! A `SchemaNode` describes one slot (a whole event, an object property, or
//! an array element). A node starts out as the exact shape of the first
//! value observed and is widened by merging every later observation into it.
//! The merge is commutative and associative, so an incremental left-fold
//! over an event stream reaches the same fixed point regardless of arrival
//! order.

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};

/// `$schema` URI stamped onto every emitted document.
pub const SCHEMA_URI: &str = "http://json-schema.org/schema#";

/// Primitive kind tag for JSON values.
///
/// Variant order matches the lexicographic order of the serialized names,
/// so an ordered kind set serializes already sorted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum JsonType {
    Array,
    Boolean,
    Integer,
    Null,
    Number,
    Object,
    String,
}

impl JsonType {
    fn from_value(value: &Value) -> Self {
        match value {
            Value::Null => JsonType::Null,
            Value::Bool(_) => JsonType::Boolean,
            Value::Number(n) => {
                if n.is_i64() || n.is_u64() {
                    JsonType::Integer
                } else {
                    JsonType::Number
                }
            }
            Value::String(_) => JsonType::String,
            Value::Array(_) => JsonType::Array,
            Value::Object(_) => JsonType::Object,
        }
    }

    fn to_str(self) -> &'static str {
        match self {
            JsonType::Array => "array",
            JsonType::Boolean => "boolean",
            JsonType::Integer => "integer",
            JsonType::Null => "null",
            JsonType::Number => "number",
            JsonType::Object => "object",
            JsonType::String => "string",
        }
    }
}

/// Accumulated structural type descriptor for one slot.
///
/// Invariant: `required` is always a subset of `properties` keys, and only
/// ever shrinks (or stays the same) as more observations merge in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaNode {
    types: BTreeSet<JsonType>,
    properties: BTreeMap<String, SchemaNode>,
    // None until the node has absorbed its first object; a node that never
    // saw an object places no required constraint on merge partners.
    required: Option<BTreeSet<String>>,
    items: Option<Box<SchemaNode>>,
}

impl SchemaNode {
    /// A node with no constraints, e.g. the items of an empty array.
    pub fn unconstrained() -> Self {
        SchemaNode::default()
    }

    fn leaf(kind: JsonType) -> Self {
        let mut node = SchemaNode::default();
        node.types.insert(kind);
        node
    }

    /// Describe exactly one JSON value, with no widening yet.
    ///
    /// Every object key seen here starts out required; merging against later
    /// observations is what demotes keys to optional. Array elements are
    /// folded into a single `items` node.
    pub fn of_value(value: &Value) -> Self {
        match value {
            Value::Array(arr) => {
                let mut node = SchemaNode::leaf(JsonType::Array);
                let mut items = SchemaNode::unconstrained();
                for element in arr {
                    items.merge(SchemaNode::of_value(element));
                }
                node.items = Some(Box::new(items));
                node
            }
            Value::Object(obj) => {
                let mut node = SchemaNode::leaf(JsonType::Object);
                for (key, child) in obj {
                    node.properties.insert(key.clone(), SchemaNode::of_value(child));
                }
                node.required = Some(obj.keys().cloned().collect());
                node
            }
            scalar => SchemaNode::leaf(JsonType::from_value(scalar)),
        }
    }

    /// Widen `self` so it also describes everything `other` describes.
    pub fn merge(&mut self, other: SchemaNode) {
        self.types.extend(other.types);

        // A key stays required only while every object merged in carries it.
        self.required = match (self.required.take(), other.required) {
            (Some(mine), Some(theirs)) => {
                Some(mine.intersection(&theirs).cloned().collect())
            }
            (mine, theirs) => mine.or(theirs),
        };

        // Keys present on only one side pass through untouched: the absent
        // side places no constraint on them.
        for (key, child) in other.properties {
            match self.properties.get_mut(&key) {
                Some(existing) => existing.merge(child),
                None => {
                    self.properties.insert(key, child);
                }
            }
        }

        match (self.items.as_mut(), other.items) {
            (Some(mine), Some(theirs)) => mine.merge(*theirs),
            (None, Some(theirs)) => self.items = Some(theirs),
            _ => {}
        }
    }

    /// Render this node as a JSON Schema fragment.
    ///
    /// Unconstrained facets are omitted: no `type` for an empty kind set,
    /// no `properties`/`required` when empty, and no `items` for arrays
    /// whose elements were never observed.
    pub fn to_value(&self) -> Value {
        let mut out = Map::new();

        if self.types.len() == 1 {
            if let Some(kind) = self.types.iter().next() {
                out.insert("type".to_string(), Value::String(kind.to_str().to_string()));
            }
        } else if self.types.len() > 1 {
            let kinds = self
                .types
                .iter()
                .map(|kind| Value::String(kind.to_str().to_string()))
                .collect();
            out.insert("type".to_string(), Value::Array(kinds));
        }

        if !self.properties.is_empty() {
            let properties = self
                .properties
                .iter()
                .map(|(key, child)| (key.clone(), child.to_value()))
                .collect();
            out.insert("properties".to_string(), Value::Object(properties));
        }

        if let Some(required) = &self.required {
            if !required.is_empty() {
                let keys = required.iter().cloned().map(Value::String).collect();
                out.insert("required".to_string(), Value::Array(keys));
            }
        }

        if let Some(items) = &self.items {
            if !items.types.is_empty() {
                out.insert("items".to_string(), items.to_value());
            }
        }

        Value::Object(out)
    }

    /// Wrap this node as a standalone document under the given title.
    pub fn to_document<'a>(&self, title: &'a str) -> SchemaDocument<'a> {
        SchemaDocument {
            schema: SCHEMA_URI,
            title,
            body: self.to_value(),
        }
    }
}

/// Full schema document emitted for one title.
#[derive(Debug, Serialize)]
pub struct SchemaDocument<'a> {
    #[serde(rename = "$schema")]
    pub schema: &'static str,
    pub title: &'a str,
    #[serde(flatten)]
    pub body: Value,
}
