//! Output model: the descriptor of one generated source unit.
//!
//! Descriptors say which store primitive each method calls, with which key
//! and default. Turning them into source text is the emitter's job.

use crate::naming::AccessorKind;

/// A fully assembled generated unit.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedUnit {
    pub type_name: String,
    pub namespace: String,
    /// Identifier the store is opened with.
    pub store_name: String,
    pub super_type: Option<String>,
    pub doc: String,
    pub fields: Vec<GeneratedField>,
    pub methods: Vec<GeneratedMethod>,
}

impl GeneratedUnit {
    /// Fully qualified path of the unit, e.g. `crate::prefs::Preference_UserPrefs`.
    pub fn qualified_name(&self) -> String {
        if self.namespace.is_empty() {
            self.type_name.clone()
        } else {
            format!("{}::{}", self.namespace, self.type_name)
        }
    }

    pub fn method(&self, name: &str) -> Option<&GeneratedMethod> {
        self.methods.iter().find(|m| m.name == name)
    }

    /// Methods generated for fields, excluding constructor, singleton accessor and clear.
    pub fn accessor_methods(&self) -> impl Iterator<Item = &GeneratedMethod> {
        self.methods.iter().filter(|m| m.accessor.is_some())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Private,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedField {
    pub name: String,
    pub kind: FieldKind,
    pub visibility: Visibility,
    pub is_static: bool,
    pub is_final: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Handle to the opened store.
    StoreHandle,
    /// Process-wide slot holding the unit's single instance.
    SingletonInstance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Receiver {
    /// Associated function, no `self`.
    Static,
    /// Borrows the instance.
    Instance,
}

/// Type of a parameter or return value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueType {
    /// A Rust type path, e.g. `i32` or `crate::models::Pet`.
    Rust(String),
    /// The store capability handed to constructors.
    Context,
    /// Shared handle to the generated unit itself.
    SelfShared,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub ty: ValueType,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedMethod {
    pub name: String,
    pub visibility: Visibility,
    pub receiver: Receiver,
    pub is_constructor: bool,
    pub params: Vec<Param>,
    pub returns: Option<ValueType>,
    pub body: MethodBody,
    /// Set for field accessors: the field and accessor flavour.
    pub accessor: Option<(String, AccessorKind)>,
}

impl GeneratedMethod {
    /// Store keys this method touches.
    pub fn referenced_keys(&self) -> Vec<&str> {
        match &self.body {
            MethodBody::Read { key, .. }
            | MethodBody::Write { key, .. }
            | MethodBody::Contains { key }
            | MethodBody::Remove { key } => vec![key.as_str()],
            MethodBody::OpenStore { .. } | MethodBody::SingletonAccess | MethodBody::ClearAll => Vec::new(),
        }
    }

    /// Store primitives the body calls, in call order.
    pub fn primitives(&self) -> Vec<StorePrimitive> {
        match &self.body {
            MethodBody::OpenStore { .. } => vec![StorePrimitive::Open],
            MethodBody::SingletonAccess => Vec::new(),
            MethodBody::Read { primitive, .. } => vec![*primitive],
            MethodBody::Write { primitive, .. } => vec![StorePrimitive::Edit, *primitive, StorePrimitive::Apply],
            MethodBody::Contains { .. } => vec![StorePrimitive::Contains],
            MethodBody::Remove { .. } => vec![StorePrimitive::Edit, StorePrimitive::Remove, StorePrimitive::Apply],
            MethodBody::ClearAll => vec![StorePrimitive::Edit, StorePrimitive::Clear, StorePrimitive::Apply],
        }
    }
}

/// Store access mode requested when opening.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreMode {
    Private,
}

/// What a generated method does against the store.
#[derive(Debug, Clone, PartialEq)]
pub enum MethodBody {
    /// Constructor: open the store scoped by identifier.
    OpenStore { store: String, mode: StoreMode },
    /// Return the shared instance, constructing it when the slot is empty.
    SingletonAccess,
    Read {
        key: String,
        primitive: StorePrimitive,
        default: DefaultLiteral,
    },
    Write { key: String, primitive: StorePrimitive },
    Contains { key: String },
    Remove { key: String },
    /// Clear every key and apply.
    ClearAll,
}

/// Primitives of the store capability the generated code calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorePrimitive {
    Open,
    GetBoolean,
    GetInt,
    GetLong,
    GetFloat,
    GetDouble,
    GetString,
    GetStringSet,
    GetObject,
    PutBoolean,
    PutInt,
    PutLong,
    PutFloat,
    PutDouble,
    PutString,
    PutStringSet,
    PutObject,
    Contains,
    Edit,
    Remove,
    Clear,
    Apply,
}

impl StorePrimitive {
    /// Runtime method name of the primitive.
    pub fn method_name(self) -> &'static str {
        match self {
            Self::Open => "get_shared_preferences",
            Self::GetBoolean => "get_boolean",
            Self::GetInt => "get_int",
            Self::GetLong => "get_long",
            Self::GetFloat => "get_float",
            Self::GetDouble => "get_double",
            Self::GetString => "get_string",
            Self::GetStringSet => "get_string_set",
            Self::GetObject => "get_object",
            Self::PutBoolean => "put_boolean",
            Self::PutInt => "put_int",
            Self::PutLong => "put_long",
            Self::PutFloat => "put_float",
            Self::PutDouble => "put_double",
            Self::PutString => "put_string",
            Self::PutStringSet => "put_string_set",
            Self::PutObject => "put_object",
            Self::Contains => "contains",
            Self::Edit => "edit",
            Self::Remove => "remove",
            Self::Clear => "clear",
            Self::Apply => "apply",
        }
    }
}

/// Default literal already checked against its data type.
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultLiteral {
    Boolean(bool),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
    StringSet(Vec<String>),
    /// `Default::default()` of a serialized type.
    TypeDefault,
}
