//! Input model: one preference entity and its typed key fields.
//!
//! Descriptors arrive here already discovered (from a TOML schema or the
//! derive macro). Nothing in this module resolves types; that happens during
//! generation so unsupported types fail there.

/// One preference entity: a named store plus its key fields.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityDescriptor {
    /// Storage identifier. Also the suffix of the generated unit name.
    pub name: String,
    /// Module path the generated unit lives in (e.g. `crate::prefs`).
    pub namespace: String,
    /// Type the generated unit derefs to, when present.
    pub base_type: Option<String>,
    /// Key fields in declaration order.
    pub fields: Vec<FieldDescriptor>,
}

impl EntityDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: "crate".to_string(),
            base_type: None,
            fields: Vec::new(),
        }
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn base_type(mut self, base: impl Into<String>) -> Self {
        self.base_type = Some(base.into());
        self
    }

    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }
}

/// One typed key of an entity.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    /// Store key and accessor name root.
    pub name: String,
    /// Declared type, e.g. `Int`, `i64`, `BTreeSet<String>` or a serialized type path.
    pub type_name: String,
    /// When set, `type_name` is an arbitrary serde type stored as a structured value.
    pub serialized: bool,
    /// Literal returned by the getter when the key is absent.
    pub default_value: Option<DefaultValue>,
    /// Accessors requested on top of the data type's defaults.
    pub accessors: AccessorSet,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            serialized: false,
            default_value: None,
            accessors: AccessorSet::NONE,
        }
    }

    /// Field holding any serde type, stored through the structured primitives.
    pub fn object(name: impl Into<String>, type_path: impl Into<String>) -> Self {
        Self {
            serialized: true,
            ..Self::new(name, type_path)
        }
    }

    pub fn default_value(mut self, value: DefaultValue) -> Self {
        self.default_value = Some(value);
        self
    }

    pub fn with_has(mut self) -> Self {
        self.accessors.has = true;
        self
    }

    pub fn with_remove(mut self) -> Self {
        self.accessors.remove = true;
        self
    }
}

/// Schema-level default literal, before it is checked against a data type.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    StrList(Vec<String>),
    /// A literal the schema reader could not decode. Generation reports the
    /// message against the owning entity only.
    Rejected(String),
}

/// Closed set of supported data types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Boolean,
    Int,
    Long,
    Float,
    Double,
    String,
    StringSet,
    Object,
}

impl DataType {
    /// Resolve a declared type name. Object fields never come through here.
    pub fn from_type_name(name: &str) -> Option<Self> {
        let compact: String = name.chars().filter(|c| !c.is_whitespace()).collect();
        let compact = compact.trim_start_matches("::");
        let compact = compact.strip_prefix("std::").unwrap_or(compact);
        let compact = compact.strip_prefix("collections::").unwrap_or(compact);
        let compact = compact.strip_prefix("string::").unwrap_or(compact);

        let data_type = match compact {
            "bool" | "Boolean" => Self::Boolean,
            "i32" | "Int" => Self::Int,
            "i64" | "Long" => Self::Long,
            "f32" | "Float" => Self::Float,
            "f64" | "Double" => Self::Double,
            "String" => Self::String,
            "StringSet" | "BTreeSet<String>" | "BTreeSet<std::string::String>" => Self::StringSet,
            _ => return None,
        };
        Some(data_type)
    }

    /// Rust type the accessors exchange. `None` for objects, whose type is user supplied.
    pub fn rust_type(self) -> Option<&'static str> {
        match self {
            Self::Boolean => Some("bool"),
            Self::Int => Some("i32"),
            Self::Long => Some("i64"),
            Self::Float => Some("f32"),
            Self::Double => Some("f64"),
            Self::String => Some("String"),
            Self::StringSet => Some("::std::collections::BTreeSet<String>"),
            Self::Object => None,
        }
    }

    /// Accessors every field of this type gets.
    pub fn default_accessors(self) -> AccessorSet {
        match self {
            Self::StringSet | Self::Object => AccessorSet {
                get: true,
                put: true,
                has: false,
                remove: true,
            },
            _ => AccessorSet::GET_PUT,
        }
    }
}

/// Which accessors a field group carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AccessorSet {
    pub get: bool,
    pub put: bool,
    pub has: bool,
    pub remove: bool,
}

impl AccessorSet {
    pub const NONE: Self = Self {
        get: false,
        put: false,
        has: false,
        remove: false,
    };

    pub const GET_PUT: Self = Self {
        get: true,
        put: true,
        has: false,
        remove: false,
    };

    pub fn union(self, other: Self) -> Self {
        Self {
            get: self.get || other.get,
            put: self.put || other.put,
            has: self.has || other.has,
            remove: self.remove || other.remove,
        }
    }

    pub fn count(self) -> usize {
        [self.get, self.put, self.has, self.remove].into_iter().filter(|on| *on).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_schema_and_rust_names() {
        assert_eq!(DataType::from_type_name("Int"), Some(DataType::Int));
        assert_eq!(DataType::from_type_name("i64"), Some(DataType::Long));
        assert_eq!(DataType::from_type_name("std::string::String"), Some(DataType::String));
        assert_eq!(
            DataType::from_type_name(":: std :: collections :: BTreeSet < String >"),
            Some(DataType::StringSet)
        );
        assert_eq!(DataType::from_type_name("Custom123"), None);
        assert_eq!(DataType::from_type_name("u8"), None);
    }

    #[test]
    fn structured_types_get_remove_by_default() {
        assert_eq!(DataType::Int.default_accessors().count(), 2);
        assert!(DataType::StringSet.default_accessors().remove);
        assert!(DataType::Object.default_accessors().remove);
        assert!(!DataType::Boolean.default_accessors().remove);
    }

    #[test]
    fn union_adds_requested_accessors() {
        let requested = AccessorSet {
            has: true,
            ..AccessorSet::NONE
        };
        let merged = DataType::Float.default_accessors().union(requested);
        assert_eq!(merged.count(), 3);
        assert!(merged.has);
    }
}
