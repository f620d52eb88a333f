//! Entity Generator: assembles one [`GeneratedUnit`] per entity descriptor.

use std::collections::HashMap;

use crate::errors::{GenerateError, GenerateResult};
use crate::model::EntityDescriptor;
use crate::naming::{
    CLEAR_METHOD, CONTEXT_PARAM, INSTANCE_ACCESSOR, INSTANCE_FIELD, STORE_FIELD, namespace_modules, unit_name,
    validate_entity_name,
};
use crate::synthesizer::FieldMethodSynthesizer;
use crate::unit::{
    FieldKind, GeneratedField, GeneratedMethod, GeneratedUnit, MethodBody, Param, Receiver, StoreMode, ValueType,
    Visibility,
};

const UNIT_DOC: &str = "Generated by prefroom. Do not edit manually.";

/// Generates the unit for a single entity.
pub struct EntityGenerator<'a> {
    entity: &'a EntityDescriptor,
}

impl<'a> EntityGenerator<'a> {
    pub fn new(entity: &'a EntityDescriptor) -> Self {
        Self { entity }
    }

    /// Produce the complete unit, or fail without producing anything.
    pub fn generate(&self) -> GenerateResult<GeneratedUnit> {
        self.validate()?;

        let type_name = unit_name(&self.entity.name);

        let mut methods = vec![self.constructor(), self.instance_accessor()];
        methods.extend(self.field_methods()?);
        methods.push(self.clear_method());

        log::debug!(
            "generated {} with {} methods for {} fields",
            type_name,
            methods.len(),
            self.entity.fields.len()
        );

        Ok(GeneratedUnit {
            type_name,
            namespace: self.entity.namespace.clone(),
            store_name: self.entity.name.clone(),
            super_type: self.entity.base_type.clone(),
            doc: UNIT_DOC.to_string(),
            fields: self.unit_fields(),
            methods,
        })
    }

    fn validate(&self) -> GenerateResult<()> {
        validate_entity_name(&self.entity.name)?;

        let namespace = self.entity.namespace.trim();
        if namespace.is_empty() {
            return Err(GenerateError::MissingRequiredMetadata { what: "namespace" });
        }
        if namespace_modules(namespace).is_none() {
            return Err(self.invalid_path(namespace));
        }
        if let Some(base) = &self.entity.base_type
            && syn::parse_str::<syn::Type>(base).is_err()
        {
            return Err(self.invalid_path(base));
        }
        Ok(())
    }

    fn invalid_path(&self, path: &str) -> GenerateError {
        GenerateError::InvalidTypePath {
            entity: self.entity.name.clone(),
            path: path.to_string(),
        }
    }

    fn unit_fields(&self) -> Vec<GeneratedField> {
        vec![
            GeneratedField {
                name: STORE_FIELD.to_string(),
                kind: FieldKind::StoreHandle,
                visibility: Visibility::Private,
                is_static: false,
                is_final: true,
            },
            GeneratedField {
                name: INSTANCE_FIELD.to_string(),
                kind: FieldKind::SingletonInstance,
                visibility: Visibility::Private,
                is_static: true,
                is_final: false,
            },
        ]
    }

    fn context_param() -> Param {
        Param {
            name: CONTEXT_PARAM.to_string(),
            ty: ValueType::Context,
        }
    }

    fn constructor(&self) -> GeneratedMethod {
        GeneratedMethod {
            name: "new".to_string(),
            visibility: Visibility::Private,
            receiver: Receiver::Static,
            is_constructor: true,
            params: vec![Self::context_param()],
            returns: None,
            body: MethodBody::OpenStore {
                store: self.entity.name.clone(),
                mode: StoreMode::Private,
            },
            accessor: None,
        }
    }

    fn instance_accessor(&self) -> GeneratedMethod {
        GeneratedMethod {
            name: INSTANCE_ACCESSOR.to_string(),
            visibility: Visibility::Public,
            receiver: Receiver::Static,
            is_constructor: false,
            params: vec![Self::context_param()],
            returns: Some(ValueType::SelfShared),
            body: MethodBody::SingletonAccess,
            accessor: None,
        }
    }

    /// Accessor groups in declaration order. Rejects colliding method names.
    fn field_methods(&self) -> GenerateResult<Vec<GeneratedMethod>> {
        let synthesizer = FieldMethodSynthesizer::new(&self.entity.name);
        let reserved = [INSTANCE_ACCESSOR, CLEAR_METHOD, "new"];

        let mut owners: HashMap<String, String> = HashMap::new();
        let mut methods = Vec::new();

        for field in &self.entity.fields {
            for method in synthesizer.synthesize(field)? {
                if let Some(first) = owners.get(&method.name) {
                    return Err(GenerateError::DuplicateFieldName {
                        entity: self.entity.name.clone(),
                        first: first.clone(),
                        second: field.name.clone(),
                        method: method.name,
                    });
                }
                if reserved.contains(&method.name.as_str()) {
                    return Err(GenerateError::DuplicateFieldName {
                        entity: self.entity.name.clone(),
                        first: method.name.clone(),
                        second: field.name.clone(),
                        method: method.name,
                    });
                }
                owners.insert(method.name.clone(), field.name.clone());
                methods.push(method);
            }
        }
        Ok(methods)
    }

    fn clear_method(&self) -> GeneratedMethod {
        GeneratedMethod {
            name: CLEAR_METHOD.to_string(),
            visibility: Visibility::Public,
            receiver: Receiver::Instance,
            is_constructor: false,
            params: Vec::new(),
            returns: None,
            body: MethodBody::ClearAll,
            accessor: None,
        }
    }
}

/// Generate one unit. Shorthand for [`EntityGenerator::generate`].
pub fn generate(entity: &EntityDescriptor) -> GenerateResult<GeneratedUnit> {
    EntityGenerator::new(entity).generate()
}

/// Generate every entity independently; one failure does not affect the rest.
pub fn generate_all(entities: &[EntityDescriptor]) -> Vec<GenerateResult<GeneratedUnit>> {
    entities.iter().map(generate).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DefaultValue, FieldDescriptor};
    use crate::naming::AccessorKind;

    fn user_prefs() -> EntityDescriptor {
        EntityDescriptor::new("UserPrefs")
            .field(FieldDescriptor::new("age", "Int").default_value(DefaultValue::Int(0)))
            .field(FieldDescriptor::new("nickname", "String").default_value(DefaultValue::Str(String::new())))
    }

    #[test]
    fn assembles_methods_in_fixed_order() {
        let unit = generate(&user_prefs()).unwrap();
        let names: Vec<_> = unit.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(
            names,
            ["new", "getInstance", "getAge", "putAge", "getNickname", "putNickname", "clear"]
        );
    }

    #[test]
    fn fields_are_store_handle_and_instance() {
        let unit = generate(&user_prefs()).unwrap();
        assert_eq!(unit.fields.len(), 2);
        assert_eq!(unit.fields[0].kind, FieldKind::StoreHandle);
        assert!(unit.fields[0].is_final && !unit.fields[0].is_static);
        assert_eq!(unit.fields[1].kind, FieldKind::SingletonInstance);
        assert!(unit.fields[1].is_static);
        assert!(unit.fields.iter().all(|f| f.visibility == Visibility::Private));
    }

    #[test]
    fn constructor_opens_store_privately() {
        let unit = generate(&user_prefs()).unwrap();
        let ctor = unit.method("new").unwrap();
        assert!(ctor.is_constructor);
        assert_eq!(ctor.visibility, Visibility::Private);
        assert_eq!(
            ctor.body,
            MethodBody::OpenStore {
                store: "UserPrefs".to_string(),
                mode: StoreMode::Private,
            }
        );
    }

    #[test]
    fn accessor_metadata_tracks_owner_field() {
        let unit = generate(&user_prefs()).unwrap();
        let owners: Vec<_> = unit
            .accessor_methods()
            .map(|m| m.accessor.clone().unwrap())
            .collect();
        assert_eq!(owners[0], ("age".to_string(), AccessorKind::Get));
        assert_eq!(owners[3], ("nickname".to_string(), AccessorKind::Put));
    }

    #[test]
    fn accessor_colliding_with_fixed_method_is_rejected() {
        let entity = EntityDescriptor::new("E").field(FieldDescriptor::new("instance", "Int"));
        assert!(matches!(
            generate(&entity),
            Err(GenerateError::DuplicateFieldName { method, .. }) if method == "getInstance"
        ));
    }

    #[test]
    fn capitalization_collision_is_a_duplicate() {
        let entity = EntityDescriptor::new("E")
            .field(FieldDescriptor::new("score", "Int"))
            .field(FieldDescriptor::new("Score", "Long"));
        assert_eq!(
            generate(&entity),
            Err(GenerateError::DuplicateFieldName {
                entity: "E".to_string(),
                first: "score".to_string(),
                second: "Score".to_string(),
                method: "getScore".to_string(),
            })
        );
    }

    #[test]
    fn missing_metadata_fails() {
        assert_eq!(
            generate(&EntityDescriptor::new("")),
            Err(GenerateError::MissingRequiredMetadata { what: "entity name" })
        );
        assert_eq!(
            generate(&EntityDescriptor::new("E").namespace("  ")),
            Err(GenerateError::MissingRequiredMetadata { what: "namespace" })
        );
    }

    #[test]
    fn namespace_must_be_a_module_path() {
        assert!(generate(&EntityDescriptor::new("E").namespace("crate::ui::prefs")).is_ok());
        for namespace in ["::elsewhere", "crate::super::x", "crate::Vec<u8>"] {
            assert!(
                matches!(
                    generate(&EntityDescriptor::new("E").namespace(namespace)),
                    Err(GenerateError::InvalidTypePath { .. })
                ),
                "{namespace}"
            );
        }
    }

    #[test]
    fn invalid_base_type_fails() {
        let entity = EntityDescriptor::new("E").base_type("not a type");
        assert!(matches!(generate(&entity), Err(GenerateError::InvalidTypePath { .. })));
    }
}
