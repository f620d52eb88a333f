//! TOML schema documents describing preference entities.
//!
//! ```toml
//! [[entity]]
//! name = "UserPrefs"
//! namespace = "crate::prefs"
//!
//! [[entity.field]]
//! name = "age"
//! type = "Int"
//! default = 18
//!
//! [[entity.field]]
//! name = "pet"
//! type = "crate::models::Pet"
//! object = true
//! ```

use serde::Deserialize;

use crate::errors::{GenerateError, GenerateResult};
use crate::model::{AccessorSet, DefaultValue, EntityDescriptor, FieldDescriptor};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SchemaDocument {
    #[serde(default)]
    entity: Vec<EntitySchema>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct EntitySchema {
    #[serde(default)]
    name: String,
    #[serde(default = "default_namespace")]
    namespace: String,
    base: Option<String>,
    #[serde(default)]
    field: Vec<FieldSchema>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FieldSchema {
    name: String,
    #[serde(rename = "type")]
    type_name: String,
    default: Option<toml::Value>,
    #[serde(default)]
    object: bool,
    #[serde(default)]
    has: bool,
    #[serde(default)]
    remove: bool,
}

fn default_namespace() -> String {
    "crate".to_string()
}

/// Parse a schema document into entity descriptors, in document order.
///
/// Only a malformed document fails here. Problems inside one entity, such as
/// an undecodable default, travel with its descriptor so that generation
/// rejects that entity and keeps the rest of the file.
pub fn parse_schema(source: &str) -> GenerateResult<Vec<EntityDescriptor>> {
    let document: SchemaDocument = toml::from_str(source).map_err(|err| GenerateError::Schema {
        message: err.to_string(),
    })?;

    Ok(document.entity.into_iter().map(EntitySchema::into_descriptor).collect())
}

impl EntitySchema {
    fn into_descriptor(self) -> EntityDescriptor {
        EntityDescriptor {
            name: self.name,
            namespace: self.namespace,
            base_type: self.base,
            fields: self.field.into_iter().map(FieldSchema::into_descriptor).collect(),
        }
    }
}

impl FieldSchema {
    fn into_descriptor(self) -> FieldDescriptor {
        FieldDescriptor {
            name: self.name,
            type_name: self.type_name,
            serialized: self.object,
            default_value: self.default.map(default_from_toml),
            accessors: AccessorSet {
                has: self.has,
                remove: self.remove,
                ..AccessorSet::NONE
            },
        }
    }
}

fn default_from_toml(value: toml::Value) -> DefaultValue {
    match value {
        toml::Value::Boolean(v) => DefaultValue::Bool(v),
        toml::Value::Integer(v) => DefaultValue::Int(v),
        toml::Value::Float(v) => DefaultValue::Float(v),
        toml::Value::String(v) => DefaultValue::Str(v),
        toml::Value::Array(items) => {
            let mut strings = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    toml::Value::String(s) => strings.push(s),
                    other => return DefaultValue::Rejected(format!("array holds non-string {other}")),
                }
            }
            DefaultValue::StrList(strings)
        }
        other => DefaultValue::Rejected(format!("{} literals are not supported", other.type_str())),
    }
}
