use prefroom_build::unit::{FieldKind, MethodBody, Receiver, StorePrimitive, ValueType, Visibility};
use prefroom_build::{
    DefaultValue, EmitOptions, EntityDescriptor, FieldDescriptor, GenerateError, generate, generate_all,
    render_file, render_unit,
};

fn user_prefs() -> EntityDescriptor {
    EntityDescriptor::new("UserPrefs")
        .field(FieldDescriptor::new("age", "Int").default_value(DefaultValue::Int(0)))
        .field(FieldDescriptor::new("nickname", "String").default_value(DefaultValue::Str(String::new())))
}

fn kitchen_sink() -> EntityDescriptor {
    EntityDescriptor::new("Settings_2")
        .namespace("crate::settings")
        .base_type("crate::settings::Settings")
        .field(FieldDescriptor::new("enabled", "Boolean").default_value(DefaultValue::Bool(true)))
        .field(FieldDescriptor::new("visits", "i64").with_has())
        .field(FieldDescriptor::new("volume", "Float").default_value(DefaultValue::Float(0.5)))
        .field(FieldDescriptor::new("ratio", "f64"))
        .field(FieldDescriptor::new("tags", "BTreeSet<String>"))
        .field(FieldDescriptor::object("theme", "crate::settings::Theme"))
        .field(FieldDescriptor::new("token", "String").with_remove())
}

#[test]
fn user_prefs_scenario() {
    let unit = generate(&user_prefs()).unwrap();
    assert_eq!(unit.type_name, "Preference_UserPrefs");
    assert_eq!(unit.qualified_name(), "crate::Preference_UserPrefs");

    let get_age = unit.method("getAge").unwrap();
    assert_eq!(get_age.returns, Some(ValueType::Rust("i32".to_string())));
    let put_age = unit.method("putAge").unwrap();
    assert_eq!(put_age.params[0].ty, ValueType::Rust("i32".to_string()));
    assert_eq!(put_age.returns, None);
    let get_nickname = unit.method("getNickname").unwrap();
    assert_eq!(get_nickname.returns, Some(ValueType::Rust("String".to_string())));
    assert!(unit.method("putNickname").is_some());
    assert!(unit.method("getInstance").is_some());
    assert!(unit.method("clear").is_some());
    assert_eq!(unit.methods.len(), 7);
}

#[test]
fn generation_is_deterministic() {
    let entity = kitchen_sink();
    let first = generate(&entity).unwrap();
    let second = generate(&entity).unwrap();
    assert_eq!(first, second);

    let options = EmitOptions::default();
    assert_eq!(render_unit(&first, &options).unwrap(), render_unit(&second, &options).unwrap());
}

#[test]
fn unit_name_is_prefix_plus_identifier() {
    for name in ["UserPrefs", "user_prefs", "Prefs2", "_9_", "123"] {
        let unit = generate(&EntityDescriptor::new(name)).unwrap();
        assert_eq!(unit.type_name, format!("Preference_{name}"));
        assert_eq!(unit.store_name, name);
    }
}

#[test]
fn accessor_count_follows_type_table_in_declaration_order() {
    let unit = generate(&kitchen_sink()).unwrap();

    // bool 2, i64+has 3, f32 2, f64 2, set 3, object 3, string+remove 3
    assert_eq!(unit.accessor_methods().count(), 18);

    let mut owners: Vec<&str> = unit
        .accessor_methods()
        .map(|m| m.accessor.as_ref().unwrap().0.as_str())
        .collect();
    owners.dedup();
    assert_eq!(owners, ["enabled", "visits", "volume", "ratio", "tags", "theme", "token"]);
}

#[test]
fn singleton_shape_holds_for_any_field_count() {
    for entity in [EntityDescriptor::new("Empty"), user_prefs(), kitchen_sink()] {
        let unit = generate(&entity).unwrap();

        let handles = unit.fields.iter().filter(|f| f.kind == FieldKind::StoreHandle).count();
        let slots: Vec<_> = unit
            .fields
            .iter()
            .filter(|f| f.kind == FieldKind::SingletonInstance)
            .collect();
        assert_eq!(handles, 1);
        assert_eq!(slots.len(), 1);
        assert!(slots[0].is_static);

        let ctors: Vec<_> = unit.methods.iter().filter(|m| m.is_constructor).collect();
        assert_eq!(ctors.len(), 1);
        assert_eq!(ctors[0].visibility, Visibility::Private);

        let accessors: Vec<_> = unit
            .methods
            .iter()
            .filter(|m| m.body == MethodBody::SingletonAccess)
            .collect();
        assert_eq!(accessors.len(), 1);
        assert_eq!(accessors[0].visibility, Visibility::Public);
        assert_eq!(accessors[0].receiver, Receiver::Static);

        let clears = unit.methods.iter().filter(|m| m.name == "clear").count();
        assert_eq!(clears, 1);
    }
}

#[test]
fn clear_touches_no_field_key() {
    let unit = generate(&kitchen_sink()).unwrap();
    let clear = unit.method("clear").unwrap();
    assert!(clear.referenced_keys().is_empty());
    assert_eq!(
        clear.primitives(),
        [StorePrimitive::Edit, StorePrimitive::Clear, StorePrimitive::Apply]
    );
    assert_eq!(unit.methods.last().unwrap().name, "clear");
}

#[test]
fn unknown_type_produces_no_unit() {
    let entity = EntityDescriptor::new("Broken")
        .field(FieldDescriptor::new("ok", "Int"))
        .field(FieldDescriptor::new("blob", "Custom123"));
    assert!(matches!(
        generate(&entity),
        Err(GenerateError::UnsupportedFieldType { type_name, .. }) if type_name == "Custom123"
    ));
}

#[test]
fn duplicate_field_names_fail() {
    let entity = EntityDescriptor::new("Scores")
        .field(FieldDescriptor::new("score", "Int"))
        .field(FieldDescriptor::new("score", "Int"));
    assert!(matches!(
        generate(&entity),
        Err(GenerateError::DuplicateFieldName { first, second, .. }) if first == "score" && second == "score"
    ));
}

#[test]
fn failing_entity_does_not_abort_siblings() {
    let entities = [
        user_prefs(),
        EntityDescriptor::new("Bad").field(FieldDescriptor::new("x", "Custom123")),
        EntityDescriptor::new(""),
        EntityDescriptor::new("Other"),
    ];
    let results = generate_all(&entities);
    assert!(results[0].is_ok());
    assert!(matches!(results[1], Err(GenerateError::UnsupportedFieldType { .. })));
    assert!(matches!(results[2], Err(GenerateError::MissingRequiredMetadata { .. })));
    assert!(results[3].is_ok());
}

#[test]
fn rendered_module_parses_and_holds_every_unit() {
    let units = vec![generate(&user_prefs()).unwrap(), generate(&kitchen_sink()).unwrap()];
    let source = render_file(&units, &EmitOptions::default()).unwrap();

    let file = syn::parse_file(&source).unwrap();
    let mut structs = Vec::new();
    collect_structs(&file.items, "crate", &mut structs);
    assert_eq!(
        structs,
        ["crate::Preference_UserPrefs", "crate::settings::Preference_Settings_2"]
    );
    assert!(source.starts_with("//! Auto-generated preference accessors."));
}

#[test]
fn builder_writes_output_and_reports_failures() {
    let dir = tempfile::tempdir().unwrap();
    let schema_dir = dir.path().join("prefs");
    std::fs::create_dir_all(&schema_dir).unwrap();
    std::fs::write(
        schema_dir.join("user.prefs.toml"),
        r#"
        [[entity]]
        name = "UserPrefs"

        [[entity.field]]
        name = "age"
        type = "Int"
        "#,
    )
    .unwrap();
    std::fs::write(
        schema_dir.join("broken.prefs.toml"),
        r#"
        [[entity]]
        name = "Broken"

        [[entity.field]]
        name = "blob"
        type = "Custom123"
        "#,
    )
    .unwrap();

    let output = dir.path().join("generated/preferences.rs");
    let result = prefroom_build::generate_preferences()
        .scan_path(&schema_dir)
        .output_file(&output)
        .run();

    let err = result.unwrap_err().to_string();
    assert!(err.contains("Custom123"), "{err}");

    let code = std::fs::read_to_string(&output).unwrap();
    assert!(code.contains("Preference_UserPrefs"));
    assert!(!code.contains("Preference_Broken"));

    let module = std::fs::read_to_string(dir.path().join("generated/mod.rs")).unwrap();
    assert!(module.contains("pub mod preferences;"));
}

#[test]
fn bad_default_only_drops_its_own_entity() {
    let dir = tempfile::tempdir().unwrap();
    let schema_dir = dir.path().join("prefs");
    std::fs::create_dir_all(&schema_dir).unwrap();
    std::fs::write(
        schema_dir.join("app.prefs.toml"),
        r#"
        [[entity]]
        name = "Good"

        [[entity.field]]
        name = "count"
        type = "Int"

        [[entity]]
        name = "Bad"

        [[entity.field]]
        name = "tags"
        type = "StringSet"
        default = [1]
        "#,
    )
    .unwrap();

    let output = dir.path().join("generated/preferences.rs");
    let result = prefroom_build::generate_preferences()
        .scan_path(&schema_dir)
        .output_file(&output)
        .run();

    let err = result.unwrap_err().to_string();
    assert!(err.contains("entity 'Bad': field 'tags'"), "{err}");
    assert!(err.contains("non-string"), "{err}");

    let code = std::fs::read_to_string(&output).unwrap();
    assert!(code.contains("Preference_Good"));
    assert!(!code.contains("Preference_Bad"));
}

fn collect_structs(items: &[syn::Item], path: &str, out: &mut Vec<String>) {
    for item in items {
        match item {
            syn::Item::Struct(s) => out.push(format!("{path}::{}", s.ident)),
            syn::Item::Mod(m) => {
                if let Some((_, inner)) = &m.content {
                    collect_structs(inner, &format!("{path}::{}", m.ident), out);
                }
            }
            _ => {}
        }
    }
}
