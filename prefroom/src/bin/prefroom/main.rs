mod commands;
mod examples;
mod help;
mod output;
mod theme;

use anyhow::Result;
use clap::{FromArgMatches, Parser, Subcommand};

use commands::{
    generate::{GenerateArgs, handle_generate},
    inspect::{InspectArgs, handle_inspect},
};
use output::{GlobalOptions, OutputFormat, OutputManager};

#[derive(Parser)]
#[command(name = "prefroom")]
#[command(version)]
#[command(
    about = "Generate typed preference accessors from entity schemas",
    long_about = r#"Reads *.prefs.toml entity schemas and produces one Preference_<Name> unit per entity.

Each unit wraps a single named store. It gets getInstance(context), get/put for
every field (has/remove where the schema asks for them) and clear().
Units are nested in `pub mod` blocks following each entity's namespace.
"#
)]
#[command(subcommand_required = true, arg_required_else_help = true)]
struct Cli {
    /// Output format for inspect
    #[arg(long, value_enum, default_value = "table", global = true)]
    format: OutputFormat,

    /// Suppress output (only errors will be shown)
    #[arg(short = 'q', long, global = true)]
    quiet: bool,

    /// Enable verbose output and debug logging
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn parse_styled() -> Self {
        let matches = help::command().try_get_matches().unwrap_or_else(|err| help::exit_with(err));
        Cli::from_arg_matches(&matches).unwrap_or_else(|err| err.exit())
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Render preference units as Rust source
    Generate(GenerateArgs),

    /// Show the fields and methods each unit would have
    Inspect(InspectArgs),
}

fn init_logging(verbose: bool, quiet: bool) {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

fn main() {
    let cli = Cli::parse_styled();
    init_logging(cli.verbose, cli.quiet);
    if cli.no_color {
        colored::control::set_override(false);
    }

    let global_options = GlobalOptions {
        output_format: cli.format.clone(),
        quiet: cli.quiet,
        verbose: cli.verbose,
        no_color: cli.no_color,
    };
    let output = OutputManager::new(global_options);

    if let Err(err) = execute(cli.command, &output) {
        output.error(&format!("Error: {err:#}"));
        std::process::exit(1);
    }
}

fn execute(command: Commands, output: &OutputManager) -> Result<()> {
    match command {
        Commands::Generate(args) => handle_generate(args, output),
        Commands::Inspect(args) => handle_inspect(args, output),
    }
}
