use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Args;
use comfy_table::Cell;
use prefroom_build::GeneratedUnit;
use prefroom_build::unit::{GeneratedMethod, MethodBody};
use serde::Serialize;

use super::{generate_reporting, load_entities};
use crate::examples::ExampleGroup;
use crate::output::OutputManager;
use crate::theme::GLYPHS;

pub const EXAMPLES: &[ExampleGroup] = &[ExampleGroup {
    title: "Inspect generated units",
    commands: &[
        "prefroom inspect prefs/              # Table of every unit's methods",
        "prefroom --format json inspect prefs/user.prefs.toml",
    ],
}];

#[derive(Args)]
pub struct InspectArgs {
    /// Schema files, or directories scanned for `*.prefs.toml`
    #[arg(required = true)]
    pub schemas: Vec<PathBuf>,
}

#[derive(Debug, Serialize)]
struct InspectReport {
    units: Vec<UnitSummary>,
    failures: Vec<String>,
}

#[derive(Debug, Serialize)]
struct UnitSummary {
    unit: String,
    store: String,
    base: Option<String>,
    fields: Vec<String>,
    methods: Vec<MethodSummary>,
}

#[derive(Debug, Serialize)]
struct MethodSummary {
    name: String,
    role: &'static str,
    key: Option<String>,
    calls: Vec<&'static str>,
}

impl UnitSummary {
    fn from_unit(unit: &GeneratedUnit) -> Self {
        Self {
            unit: unit.qualified_name(),
            store: unit.store_name.clone(),
            base: unit.super_type.clone(),
            fields: unit.fields.iter().map(|f| f.name.clone()).collect(),
            methods: unit.methods.iter().map(MethodSummary::from_method).collect(),
        }
    }
}

impl MethodSummary {
    fn from_method(method: &GeneratedMethod) -> Self {
        Self {
            name: method.name.clone(),
            role: method_role(method),
            key: method.referenced_keys().first().map(|k| (*k).to_string()),
            calls: method.primitives().into_iter().map(|p| p.method_name()).collect(),
        }
    }
}

fn method_role(method: &GeneratedMethod) -> &'static str {
    if let Some((_, kind)) = &method.accessor {
        return kind.prefix();
    }
    match method.body {
        MethodBody::OpenStore { .. } => "constructor",
        MethodBody::SingletonAccess => "singleton",
        MethodBody::ClearAll => "clear",
        _ => "other",
    }
}

pub fn handle_inspect(args: InspectArgs, output: &OutputManager) -> Result<()> {
    let entities = load_entities(&args.schemas, output)?;
    let (units, failures) = generate_reporting(&entities, output);

    let report = InspectReport {
        units: units.iter().map(UnitSummary::from_unit).collect(),
        failures: failures.iter().map(ToString::to_string).collect(),
    };

    if output.is_json() {
        output.json(&report)?;
    } else if report.units.is_empty() {
        output.info("No units generated");
    } else {
        for summary in &report.units {
            output.heading(&summary.unit);
            output.key_value("Store", &summary.store);
            if let Some(base) = &summary.base {
                output.key_value("Base", base);
            }
            output.key_value("Fields", &summary.fields.join(", "));

            let mut table = output.create_table();
            output.add_table_header(&mut table, &["Method", "Role", "Key", "Calls"]);
            for method in &summary.methods {
                let calls = method.calls.join(&format!(" {} ", GLYPHS.call));
                table.add_row(vec![
                    Cell::new(&method.name),
                    output.role_cell(method.role),
                    Cell::new(method.key.as_deref().unwrap_or_default()),
                    Cell::new(calls),
                ]);
            }
            output.table(&table);
        }
    }

    if !failures.is_empty() {
        bail!("{} entities failed to generate", failures.len());
    }
    Ok(())
}
