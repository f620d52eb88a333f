pub mod generate;
pub mod inspect;

use std::path::PathBuf;

use anyhow::{Context, Result};
use prefroom_build::{EntityDescriptor, GenerateError, GeneratedUnit, load_schema_file, scan_directory};

use crate::output::OutputManager;

/// Load every entity from the given schema files and directories, sorted by name.
pub fn load_entities(paths: &[PathBuf], output: &OutputManager) -> Result<Vec<EntityDescriptor>> {
    let mut entities = Vec::new();
    for path in paths {
        let files = if path.is_dir() {
            scan_directory(path).with_context(|| format!("Failed to scan {}", path.display()))?
        } else {
            vec![path.clone()]
        };
        for file in files {
            let loaded = load_schema_file(&file)?;
            output.verbose(&format!("{}: {} entities", file.display(), loaded.len()));
            entities.extend(loaded);
        }
    }
    entities.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(entities)
}

/// Generate every entity, reporting failures as they are found.
pub fn generate_reporting(entities: &[EntityDescriptor], output: &OutputManager) -> (Vec<GeneratedUnit>, Vec<GenerateError>) {
    let mut units = Vec::with_capacity(entities.len());
    let mut failures = Vec::new();
    for result in prefroom_build::generate_all(entities) {
        match result {
            Ok(unit) => units.push(unit),
            Err(err) => {
                output.error(&err.to_string());
                failures.push(err);
            }
        }
    }
    (units, failures)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::output::GlobalOptions;

    const SCHEMA: &str = r#"
[[entity]]
name = "Zeta"

[[entity.field]]
name = "flag"
type = "Boolean"

[[entity]]
name = "Alpha"
"#;

    #[test]
    fn loads_files_and_directories_sorted_by_entity_name() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("app.prefs.toml"), SCHEMA).unwrap();
        let single = dir.path().join("single.toml");
        fs::write(&single, "[[entity]]\nname = \"Middle\"\n").unwrap();

        let output = OutputManager::new(GlobalOptions::default());
        let entities = load_entities(&[dir.path().to_path_buf(), single], &output).unwrap();
        let names: Vec<&str> = entities.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["Alpha", "Middle", "Zeta"]);
    }

    #[test]
    fn missing_schema_file_is_an_error() {
        let output = OutputManager::new(GlobalOptions::default());
        let result = load_entities(&[PathBuf::from("does/not/exist.prefs.toml")], &output);
        assert!(result.is_err());
    }

    #[test]
    fn failures_do_not_stop_siblings() {
        let mut entities = prefroom_build::schema::parse_schema(SCHEMA).unwrap();
        entities.push(EntityDescriptor::new("Broken").field(prefroom_build::FieldDescriptor::new("x", "Custom123")));

        let output = OutputManager::new(GlobalOptions {
            quiet: true,
            ..Default::default()
        });
        let (units, failures) = generate_reporting(&entities, &output);
        assert_eq!(units.len(), 2);
        assert_eq!(failures.len(), 1);
    }
}
