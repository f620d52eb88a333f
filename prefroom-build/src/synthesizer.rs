//! Field Method Synthesizer: one field descriptor in, its accessor group out.

use crate::errors::{GenerateError, GenerateResult};
use crate::model::{DataType, DefaultValue, FieldDescriptor};
use crate::naming::{AccessorKind, accessor_name, validate_field_name};
use crate::unit::{
    DefaultLiteral, GeneratedMethod, MethodBody, Param, Receiver, StorePrimitive, ValueType, Visibility,
};

/// Store primitives and value type a data type maps onto.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeBinding {
    pub data_type: DataType,
    pub read: StorePrimitive,
    pub write: StorePrimitive,
    pub value_type: String,
}

impl TypeBinding {
    fn new(data_type: DataType, value_type: String) -> Self {
        let (read, write) = match data_type {
            DataType::Boolean => (StorePrimitive::GetBoolean, StorePrimitive::PutBoolean),
            DataType::Int => (StorePrimitive::GetInt, StorePrimitive::PutInt),
            DataType::Long => (StorePrimitive::GetLong, StorePrimitive::PutLong),
            DataType::Float => (StorePrimitive::GetFloat, StorePrimitive::PutFloat),
            DataType::Double => (StorePrimitive::GetDouble, StorePrimitive::PutDouble),
            DataType::String => (StorePrimitive::GetString, StorePrimitive::PutString),
            DataType::StringSet => (StorePrimitive::GetStringSet, StorePrimitive::PutStringSet),
            DataType::Object => (StorePrimitive::GetObject, StorePrimitive::PutObject),
        };
        Self {
            data_type,
            read,
            write,
            value_type,
        }
    }
}

/// Produces accessor methods for the fields of one entity.
pub struct FieldMethodSynthesizer<'a> {
    entity: &'a str,
}

impl<'a> FieldMethodSynthesizer<'a> {
    pub fn new(entity: &'a str) -> Self {
        Self { entity }
    }

    /// Map a field's declared type onto its binding.
    pub fn bind(&self, field: &FieldDescriptor) -> GenerateResult<TypeBinding> {
        if field.serialized {
            let type_path = field.type_name.trim();
            if type_path.is_empty() || syn::parse_str::<syn::Type>(type_path).is_err() {
                return Err(self.unsupported(field));
            }
            return Ok(TypeBinding::new(DataType::Object, type_path.to_string()));
        }

        let data_type = DataType::from_type_name(&field.type_name).ok_or_else(|| self.unsupported(field))?;
        let value_type = data_type.rust_type().ok_or_else(|| self.unsupported(field))?;
        Ok(TypeBinding::new(data_type, value_type.to_string()))
    }

    /// Build the accessor group for `field`: get, put, has, remove as enabled.
    pub fn synthesize(&self, field: &FieldDescriptor) -> GenerateResult<Vec<GeneratedMethod>> {
        validate_field_name(&field.name)?;
        let binding = self.bind(field)?;
        let default = self.default_literal(field, binding.data_type)?;
        let accessors = binding.data_type.default_accessors().union(field.accessors);

        let enabled = AccessorKind::ALL.into_iter().filter(|kind| match kind {
            AccessorKind::Get => accessors.get,
            AccessorKind::Put => accessors.put,
            AccessorKind::Has => accessors.has,
            AccessorKind::Remove => accessors.remove,
        });

        Ok(enabled
            .map(|kind| accessor_method(field, kind, &binding, &default))
            .collect())
    }

    /// Check the declared default against the data type, or pick the natural one.
    fn default_literal(&self, field: &FieldDescriptor, data_type: DataType) -> GenerateResult<DefaultLiteral> {
        let Some(value) = &field.default_value else {
            return Ok(natural_default(data_type));
        };

        let literal = match (data_type, value) {
            (_, DefaultValue::Rejected(message)) => return Err(self.invalid_default(field, message.clone())),
            (DataType::Boolean, DefaultValue::Bool(v)) => DefaultLiteral::Boolean(*v),
            (DataType::Int, DefaultValue::Int(v)) => match i32::try_from(*v) {
                Ok(v) => DefaultLiteral::Int(v),
                Err(_) => return Err(self.invalid_default(field, format!("{v} does not fit in i32"))),
            },
            (DataType::Long, DefaultValue::Int(v)) => DefaultLiteral::Long(*v),
            (DataType::Float, DefaultValue::Float(v)) => {
                let narrowed = *v as f32;
                if v.is_finite() && !narrowed.is_finite() {
                    return Err(self.invalid_default(field, format!("{v} does not fit in f32")));
                }
                DefaultLiteral::Float(narrowed)
            }
            (DataType::Float, DefaultValue::Int(v)) => DefaultLiteral::Float(*v as f32),
            (DataType::Double, DefaultValue::Float(v)) => DefaultLiteral::Double(*v),
            (DataType::Double, DefaultValue::Int(v)) => DefaultLiteral::Double(*v as f64),
            (DataType::String, DefaultValue::Str(v)) => DefaultLiteral::String(v.clone()),
            (DataType::StringSet, DefaultValue::StrList(v)) => DefaultLiteral::StringSet(v.clone()),
            (DataType::Object, _) => {
                return Err(self.invalid_default(
                    field,
                    "is not allowed on serialized fields; the type's Default is used".to_string(),
                ));
            }
            (data_type, value) => {
                return Err(self.invalid_default(field, format!("{value:?} does not match {data_type:?}")));
            }
        };
        Ok(literal)
    }

    fn unsupported(&self, field: &FieldDescriptor) -> GenerateError {
        GenerateError::UnsupportedFieldType {
            entity: self.entity.to_string(),
            field: field.name.clone(),
            type_name: field.type_name.clone(),
        }
    }

    fn invalid_default(&self, field: &FieldDescriptor, message: String) -> GenerateError {
        GenerateError::InvalidDefaultValue {
            entity: self.entity.to_string(),
            field: field.name.clone(),
            message,
        }
    }
}

fn natural_default(data_type: DataType) -> DefaultLiteral {
    match data_type {
        DataType::Boolean => DefaultLiteral::Boolean(false),
        DataType::Int => DefaultLiteral::Int(0),
        DataType::Long => DefaultLiteral::Long(0),
        DataType::Float => DefaultLiteral::Float(0.0),
        DataType::Double => DefaultLiteral::Double(0.0),
        DataType::String => DefaultLiteral::String(String::new()),
        DataType::StringSet => DefaultLiteral::StringSet(Vec::new()),
        DataType::Object => DefaultLiteral::TypeDefault,
    }
}

fn accessor_method(
    field: &FieldDescriptor,
    kind: AccessorKind,
    binding: &TypeBinding,
    default: &DefaultLiteral,
) -> GeneratedMethod {
    let key = field.name.clone();
    let value_type = ValueType::Rust(binding.value_type.clone());

    let (params, returns, body) = match kind {
        AccessorKind::Get => (
            Vec::new(),
            Some(value_type),
            MethodBody::Read {
                key,
                primitive: binding.read,
                default: default.clone(),
            },
        ),
        AccessorKind::Put => (
            vec![Param {
                name: "value".to_string(),
                ty: value_type,
            }],
            None,
            MethodBody::Write {
                key,
                primitive: binding.write,
            },
        ),
        AccessorKind::Has => (
            Vec::new(),
            Some(ValueType::Rust("bool".to_string())),
            MethodBody::Contains { key },
        ),
        AccessorKind::Remove => (Vec::new(), None, MethodBody::Remove { key }),
    };

    GeneratedMethod {
        name: accessor_name(kind, &field.name),
        visibility: Visibility::Public,
        receiver: Receiver::Instance,
        is_constructor: false,
        params,
        returns,
        body,
        accessor: Some((field.name.clone(), kind)),
    }
}
