//! Name derivation for generated units and accessors.

use crate::errors::{GenerateError, GenerateResult};

/// Prefix of every generated unit name.
pub const UNIT_PREFIX: &str = "Preference_";

/// Name of the storage handle member.
pub const STORE_FIELD: &str = "preference";

/// Name of the shared instance slot.
pub const INSTANCE_FIELD: &str = "instance";

/// Name of the capability parameter taken by the constructor and singleton accessor.
pub const CONTEXT_PARAM: &str = "context";

/// Name of the singleton accessor.
pub const INSTANCE_ACCESSOR: &str = "getInstance";

/// Name of the bulk clear method.
pub const CLEAR_METHOD: &str = "clear";

/// Accessor flavours of a field group, in emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessorKind {
    Get,
    Put,
    Has,
    Remove,
}

impl AccessorKind {
    pub const ALL: [Self; 4] = [Self::Get, Self::Put, Self::Has, Self::Remove];

    pub fn prefix(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Put => "put",
            Self::Has => "has",
            Self::Remove => "remove",
        }
    }
}

/// `Preference_` + entity name.
pub fn unit_name(entity_name: &str) -> String {
    format!("{UNIT_PREFIX}{entity_name}")
}

/// Uppercase the first character, leave the rest untouched.
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Accessor method name, e.g. `getAge` for (`Get`, `age`).
pub fn accessor_name(kind: AccessorKind, field_name: &str) -> String {
    format!("{}{}", kind.prefix(), capitalize(field_name))
}

/// Name of the module-level static backing the shared instance slot.
///
/// Keeps the unit name's case, so units differing only in case get distinct slots.
pub fn instance_static_name(unit_name: &str) -> String {
    format!("{unit_name}_INSTANCE")
}

/// Module names a namespace adds below the generated module root.
///
/// `crate` (or `self`) alone is the root itself; `crate::ui::prefs` yields
/// `["ui", "prefs"]`. Returns `None` for anything that is not a plain module path.
pub fn namespace_modules(namespace: &str) -> Option<Vec<String>> {
    let path = syn::parse_str::<syn::Path>(namespace.trim()).ok()?;
    if path.leading_colon.is_some() {
        return None;
    }

    let mut modules = Vec::with_capacity(path.segments.len());
    for (index, segment) in path.segments.iter().enumerate() {
        if !segment.arguments.is_none() {
            return None;
        }
        let ident = segment.ident.to_string();
        match ident.as_str() {
            "crate" | "self" if index == 0 => {}
            "crate" | "self" | "super" | "Self" => return None,
            _ => modules.push(ident),
        }
    }
    Some(modules)
}

/// Check an entity name. Only `[A-Za-z0-9_]` survives into the unit identifier.
pub fn validate_entity_name(name: &str) -> GenerateResult<()> {
    if name.trim().is_empty() {
        return Err(GenerateError::MissingRequiredMetadata { what: "entity name" });
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(GenerateError::InvalidName {
            kind: "entity",
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Check a field name is a usable Rust identifier.
pub fn validate_field_name(name: &str) -> GenerateResult<()> {
    if syn::parse_str::<syn::Ident>(name).is_err() {
        return Err(GenerateError::InvalidName {
            kind: "field",
            name: name.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_name() {
        assert_eq!(unit_name("UserPrefs"), "Preference_UserPrefs");
        assert_eq!(unit_name("user_prefs_2"), "Preference_user_prefs_2");
        assert_eq!(unit_name("42"), "Preference_42");
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("age"), "Age");
        assert_eq!(capitalize("nickName"), "NickName");
        assert_eq!(capitalize("_hidden"), "_hidden");
        assert_eq!(capitalize("école"), "École");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_accessor_name() {
        assert_eq!(accessor_name(AccessorKind::Get, "age"), "getAge");
        assert_eq!(accessor_name(AccessorKind::Put, "nickname"), "putNickname");
        assert_eq!(accessor_name(AccessorKind::Has, "token"), "hasToken");
        assert_eq!(accessor_name(AccessorKind::Remove, "tags"), "removeTags");
    }

    #[test]
    fn test_instance_static_name() {
        assert_eq!(instance_static_name("Preference_UserPrefs"), "Preference_UserPrefs_INSTANCE");
        assert_ne!(instance_static_name("Preference_Prefs"), instance_static_name("Preference_prefs"));
    }

    #[test]
    fn test_namespace_modules() {
        assert_eq!(namespace_modules("crate"), Some(vec![]));
        assert_eq!(namespace_modules("self"), Some(vec![]));
        assert_eq!(
            namespace_modules("crate::ui::prefs"),
            Some(vec!["ui".to_string(), "prefs".to_string()])
        );
        assert_eq!(namespace_modules("settings"), Some(vec!["settings".to_string()]));
        assert_eq!(namespace_modules("::other_crate::prefs"), None);
        assert_eq!(namespace_modules("crate::super::x"), None);
        assert_eq!(namespace_modules("crate::Vec<u8>"), None);
        assert_eq!(namespace_modules("not a path"), None);
    }

    #[test]
    fn entity_name_rules() {
        assert!(validate_entity_name("User_Prefs9").is_ok());
        assert_eq!(
            validate_entity_name(""),
            Err(GenerateError::MissingRequiredMetadata { what: "entity name" })
        );
        assert!(matches!(
            validate_entity_name("user-prefs"),
            Err(GenerateError::InvalidName { kind: "entity", .. })
        ));
    }

    #[test]
    fn field_name_rules() {
        assert!(validate_field_name("age").is_ok());
        assert!(validate_field_name("nick name").is_err());
        assert!(validate_field_name("fn").is_err());
    }
}
