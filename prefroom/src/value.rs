use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A value held under one preference key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    Boolean(bool),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    StringSet(BTreeSet<String>),
    /// Serialized object, stored as JSON.
    Structured(serde_json::Value),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Boolean(_) => "boolean",
            Self::Int(_) => "int",
            Self::Long(_) => "long",
            Self::Float(_) => "float",
            Self::Double(_) => "double",
            Self::String(_) => "string",
            Self::StringSet(_) => "string_set",
            Self::Structured(_) => "structured",
        }
    }
}
