//! Discovery of schema files on disk.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::model::EntityDescriptor;
use crate::schema::parse_schema;

/// Suffix schema files must carry to be picked up by a directory scan.
pub const SCHEMA_SUFFIX: &str = ".prefs.toml";

/// Scan a directory recursively for `*.prefs.toml` files, sorted by path.
pub fn scan_directory(path: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(path) {
        let entry = entry.with_context(|| format!("Failed to walk {}", path.display()))?;
        let file_path = entry.path();
        if entry.file_type().is_file()
            && is_schema_file(file_path)
            && !file_path.to_string_lossy().contains("/target/")
        {
            files.push(file_path.to_path_buf());
        }
    }

    files.sort();
    Ok(files)
}

fn is_schema_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(SCHEMA_SUFFIX))
}

/// Read and parse one schema file.
pub fn load_schema_file(path: &Path) -> Result<Vec<EntityDescriptor>> {
    let content = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let entities = parse_schema(&content).with_context(|| format!("Failed to parse {}", path.display()))?;
    log::debug!("{}: {} entities", path.display(), entities.len());
    Ok(entities)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_schema_file() {
        assert!(is_schema_file(Path::new("src/user.prefs.toml")));
        assert!(!is_schema_file(Path::new("Cargo.toml")));
        assert!(!is_schema_file(Path::new("src/prefs.rs")));
    }

    #[test]
    fn scan_finds_nested_schema_files_in_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("b/nested")).unwrap();
        fs::write(dir.path().join("b/nested/z.prefs.toml"), "").unwrap();
        fs::write(dir.path().join("a.prefs.toml"), "").unwrap();
        fs::write(dir.path().join("ignored.toml"), "").unwrap();

        let files = scan_directory(dir.path()).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();
        assert_eq!(names, ["a.prefs.toml", "b/nested/z.prefs.toml"]);
    }

    #[test]
    fn load_reports_path_on_parse_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.prefs.toml");
        fs::write(&path, "[[entity]\n").unwrap();

        let err = load_schema_file(&path).unwrap_err();
        assert!(format!("{err:#}").contains("bad.prefs.toml"));
    }
}
