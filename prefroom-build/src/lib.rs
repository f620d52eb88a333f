//! Schema-to-source generator for typed preference accessors.
//!
//! Each preference entity (a named store plus typed key fields) becomes a
//! `Preference_<Name>` unit with a lazily created process-wide instance and
//! `get`/`put` (and optionally `has`/`remove`) accessors per field.
//!
//! # Example
//!
//! In your `build.rs`:
//!
//! ```ignore
//! fn main() {
//!     prefroom_build::generate_preferences()
//!         .scan_path("prefs/")
//!         .output_file("src/generated/preferences.rs")
//!         .run()
//!         .expect("Failed to generate preferences");
//!
//!     println!("cargo:rerun-if-changed=prefs/");
//! }
//! ```

pub mod emit;
pub mod errors;
mod generator;
pub mod model;
pub mod naming;
mod scanner;
pub mod schema;
pub mod synthesizer;
pub mod unit;

use anyhow::{Context, Result, bail};
use std::fs;
use std::path::{Path, PathBuf};

pub use emit::{EmitOptions, render_file, render_unit, unit_tokens};
pub use errors::{GenerateError, GenerateResult};
pub use generator::{EntityGenerator, generate, generate_all};
pub use model::{AccessorSet, DataType, DefaultValue, EntityDescriptor, FieldDescriptor};
pub use scanner::{load_schema_file, scan_directory};
pub use synthesizer::FieldMethodSynthesizer;
pub use unit::GeneratedUnit;

/// Create a new preference generator with default settings.
pub fn generate_preferences() -> PreferenceGenerator {
    PreferenceGenerator::new()
}

/// Builder for configuring and running generation from schema files.
pub struct PreferenceGenerator {
    scan_paths: Vec<PathBuf>,
    schema_files: Vec<PathBuf>,
    output_file: PathBuf,
    options: EmitOptions,
}

impl PreferenceGenerator {
    /// Create a new generator with default settings.
    pub fn new() -> Self {
        Self {
            scan_paths: Vec::new(),
            schema_files: Vec::new(),
            output_file: PathBuf::from("src/generated/preferences.rs"),
            options: EmitOptions::default(),
        }
    }

    /// Add a directory to scan for `*.prefs.toml` schema files.
    ///
    /// Can be called multiple times to scan multiple directories.
    pub fn scan_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.scan_paths.push(path.into());
        self
    }

    /// Add a single schema file, whatever its name.
    pub fn schema_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.schema_files.push(path.into());
        self
    }

    /// Set the output file path for the generated code.
    ///
    /// Default: `src/generated/preferences.rs`
    pub fn output_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_file = path.into();
        self
    }

    /// Set the path generated code uses to reach the runtime crate.
    ///
    /// Default: `::prefroom`
    pub fn runtime_path(mut self, path: impl Into<String>) -> Self {
        self.options.runtime_path = path.into();
        self
    }

    /// Load every configured schema, sorted by entity name.
    ///
    /// Falls back to scanning `prefs/` when nothing was configured.
    pub fn load_entities(&self) -> Result<Vec<EntityDescriptor>> {
        let mut files = self.schema_files.clone();
        if self.scan_paths.is_empty() && self.schema_files.is_empty() {
            files.extend(scan_directory(Path::new("prefs/"))?);
        }
        for path in &self.scan_paths {
            files.extend(scan_directory(path).with_context(|| format!("Failed to scan {}", path.display()))?);
        }

        let mut entities = Vec::new();
        for file in &files {
            entities.extend(load_schema_file(file)?);
        }

        // Stable order keeps the output byte-identical between runs
        entities.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entities)
    }

    /// Run the generator.
    ///
    /// Writes every entity that generated successfully, then fails if any did not.
    pub fn run(self) -> Result<()> {
        let entities = self.load_entities()?;

        let mut units = Vec::with_capacity(entities.len());
        let mut failures = Vec::new();
        for result in generate_all(&entities) {
            match result {
                Ok(unit) => units.push(unit),
                Err(err) => failures.push(err),
            }
        }

        let code = render_file(&units, &self.options).context("Failed to render generated code")?;

        if let Some(parent) = self.output_file.parent() {
            fs::create_dir_all(parent).with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        // Only write if content has changed (avoids unnecessary recompilation)
        if write_if_changed(&self.output_file, &code)? {
            eprintln!(
                "prefroom-build: Generated {} with {} entities",
                self.output_file.display(),
                units.len()
            );
        }

        if let Some(parent) = self.output_file.parent() {
            let file_stem = self
                .output_file
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("preferences");
            let mod_content = format!(
                "//! Auto-generated module. Do not edit manually.\n\npub mod {file_stem};\npub use {file_stem}::*;\n"
            );
            let mod_file = parent.join("mod.rs");
            if mod_file != self.output_file && write_if_changed(&mod_file, &mod_content)? {
                eprintln!("prefroom-build: Generated {}", mod_file.display());
            }
        }

        if !failures.is_empty() {
            let messages: Vec<String> = failures.iter().map(ToString::to_string).collect();
            bail!("{} entities failed to generate:\n  {}", failures.len(), messages.join("\n  "));
        }
        Ok(())
    }
}

impl Default for PreferenceGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn write_if_changed(path: &Path, content: &str) -> Result<bool> {
    let unchanged = fs::read_to_string(path).is_ok_and(|existing| existing == content);
    if unchanged {
        return Ok(false);
    }
    fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(true)
}
