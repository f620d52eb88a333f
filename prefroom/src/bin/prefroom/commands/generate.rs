use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Args;
use prefroom_build::emit::DEFAULT_RUNTIME_PATH;
use prefroom_build::{EmitOptions, render_file};

use super::{generate_reporting, load_entities};
use crate::examples::ExampleGroup;
use crate::output::OutputManager;

pub const EXAMPLES: &[ExampleGroup] = &[
    ExampleGroup {
        title: "Generate to stdout",
        commands: &["prefroom generate prefs/user.prefs.toml"],
    },
    ExampleGroup {
        title: "Generate into a source file",
        commands: &[
            "prefroom generate prefs/ -o src/generated/preferences.rs",
            "prefroom generate prefs/ -o src/prefs.rs --runtime-path crate::runtime",
        ],
    },
];

#[derive(Args)]
pub struct GenerateArgs {
    /// Schema files, or directories scanned for `*.prefs.toml`
    #[arg(required = true)]
    pub schemas: Vec<PathBuf>,

    /// Write the generated source here instead of stdout
    #[arg(short = 'o', long = "out")]
    pub out: Option<PathBuf>,

    /// Path generated code uses to reach the prefroom runtime
    #[arg(long, default_value = DEFAULT_RUNTIME_PATH)]
    pub runtime_path: String,
}

pub fn handle_generate(args: GenerateArgs, output: &OutputManager) -> Result<()> {
    let entities = load_entities(&args.schemas, output)?;
    let (units, failures) = generate_reporting(&entities, output);

    let options = EmitOptions::default().runtime_path(args.runtime_path);
    let code = render_file(&units, &options).context("Failed to render generated code")?;

    match &args.out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            fs::write(path, &code).with_context(|| format!("Failed to write {}", path.display()))?;
            output.success(&format!("Generated {} with {} units", path.display(), units.len()));
            for unit in &units {
                output.bullet(&unit.type_name);
            }
        }
        None => print!("{code}"),
    }

    if !failures.is_empty() {
        output.warning(&format!("Skipped {} of {} entities", failures.len(), entities.len()));
        bail!("{} entities failed to generate", failures.len());
    }
    Ok(())
}
