use thiserror::Error;

/// Reasons generation of a single entity can fail.
///
/// Every variant is fatal to the entity it names and to nothing else;
/// [`crate::generate_all`] keeps going with sibling entities.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateError {
    /// The declared field type has no accessor mapping.
    #[error("entity '{entity}': field '{field}' has unsupported type '{type_name}'")]
    UnsupportedFieldType {
        entity: String,
        field: String,
        type_name: String,
    },

    /// Two fields produce the same accessor method name.
    #[error("entity '{entity}': fields '{first}' and '{second}' both generate '{method}'")]
    DuplicateFieldName {
        entity: String,
        first: String,
        second: String,
        method: String,
    },

    /// Entity name (the storage identifier) is absent.
    #[error("entity is missing required metadata: {what}")]
    MissingRequiredMetadata { what: &'static str },

    /// Default literal does not fit the field's data type.
    #[error("entity '{entity}': field '{field}' default {message}")]
    InvalidDefaultValue {
        entity: String,
        field: String,
        message: String,
    },

    /// A name cannot become a Rust identifier.
    #[error("invalid {kind} name '{name}'")]
    InvalidName { kind: &'static str, name: String },

    /// A type path (base type, namespace, serialized type) does not parse.
    #[error("entity '{entity}': invalid type path '{path}'")]
    InvalidTypePath { entity: String, path: String },

    /// Generated tokens did not form a valid source file.
    #[error("failed to emit '{unit}': {message}")]
    Emit { unit: String, message: String },

    /// Schema document could not be decoded.
    #[error("schema error: {message}")]
    Schema { message: String },
}

pub type GenerateResult<T> = Result<T, GenerateError>;
