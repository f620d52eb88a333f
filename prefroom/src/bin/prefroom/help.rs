//! Styled `--help` output: clap styles from the palette plus per-command example blocks.

use std::fmt::Write;
use std::io::{self, Write as IoWrite};

use clap::builder::styling::Style;
use clap::error::ErrorKind;
use clap::{ColorChoice, Command, CommandFactory};
use colored::Colorize;
use colored::control::ShouldColorize;

use crate::Cli;
use crate::examples::{ExampleGroup, command_examples};
use crate::theme::{GLYPHS, PALETTE, Rgb};

const ENVIRONMENT_VARIABLES: &[(&str, &str)] = &[
    ("RUST_LOG", "Log filter, overrides -v/-q (e.g. prefroom_build=debug)"),
    ("PREFROOM_THEME", "Set to 'light' for terminals with a light background"),
    ("NO_COLOR", "Disable colored output, same as --no-color"),
];

/// The clap command with palette styles, examples and the environment appendix attached.
pub fn command() -> Command {
    let use_color = ShouldColorize::from_env().should_colorize();
    let mut command = Cli::command()
        .styles(styles())
        .color(if use_color { ColorChoice::Auto } else { ColorChoice::Never });

    for example in command_examples() {
        if let Some(sub) = command.find_subcommand_mut(example.name) {
            let text = Paint { use_color }.examples(example.groups);
            *sub = sub.clone().after_long_help(text);
        }
    }

    command.after_long_help(Paint { use_color }.appendix())
}

/// Print a clap error or help page and exit with its code.
///
/// Parse errors are padded with blank lines; help and version exit 0.
pub fn exit_with(err: clap::Error) -> ! {
    let padded = !matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion);
    if padded {
        let _ = blank_line();
    }
    if let Err(print_err) = err.print()
        && print_err.kind() != io::ErrorKind::BrokenPipe
    {
        eprintln!("Failed to print help: {print_err}");
    }
    if padded {
        let _ = blank_line();
    }
    std::process::exit(err.exit_code())
}

fn blank_line() -> io::Result<()> {
    let mut stderr = io::stderr();
    stderr.write_all(b"\n")?;
    stderr.flush()
}

fn styles() -> clap::builder::Styles {
    let fg = |color: Rgb| Style::new().fg_color(Some(color.clap()));
    clap::builder::Styles::styled()
        .usage(fg(PALETTE.heading).bold())
        .header(fg(PALETTE.heading).bold())
        .literal(fg(PALETTE.command))
        .placeholder(fg(PALETTE.dim))
        .valid(fg(PALETTE.ok))
        .invalid(fg(PALETTE.caution))
        .error(fg(PALETTE.failure).bold())
}

struct Paint {
    use_color: bool,
}

impl Paint {
    fn text(&self, text: &str, color: Rgb) -> String {
        if self.use_color {
            text.color(color.term()).to_string()
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str, color: Rgb) -> String {
        if self.use_color {
            text.color(color.term()).bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn examples(&self, groups: &[ExampleGroup]) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.bold("Examples:", PALETTE.heading));
        for (index, group) in groups.iter().enumerate() {
            if index > 0 {
                out.push('\n');
            }
            let _ = writeln!(out, "  {}", self.bold(group.title, PALETTE.unit));
            for line in group.commands {
                let _ = writeln!(
                    out,
                    "    {} {}",
                    self.text(GLYPHS.step, PALETTE.dim),
                    self.text(line, PALETTE.command)
                );
            }
        }
        out
    }

    fn appendix(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.bold("Environment:", PALETTE.heading));
        let width = ENVIRONMENT_VARIABLES.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
        for (name, description) in ENVIRONMENT_VARIABLES {
            let padded = format!("{name:<width$}");
            let _ = writeln!(
                out,
                "  {} {}  {}",
                self.text(GLYPHS.key, PALETTE.dim),
                self.bold(&padded, PALETTE.key),
                self.text(description, PALETTE.value)
            );
        }
        let _ = writeln!(
            out,
            "\n{}",
            self.text("Run 'prefroom <command> --help' for examples.", PALETTE.dim)
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_examples_list_every_command_line() {
        let text = Paint { use_color: false }.examples(crate::commands::inspect::EXAMPLES);
        assert!(text.starts_with("Examples:\n"));
        for group in crate::commands::inspect::EXAMPLES {
            assert!(text.contains(group.title));
            for line in group.commands {
                assert!(text.contains(&format!("$ {line}")));
            }
        }
    }

    #[test]
    fn plain_appendix_aligns_variable_names() {
        let text = Paint { use_color: false }.appendix();
        assert!(text.contains("RUST_LOG       "));
        assert!(text.contains("PREFROOM_THEME  Set to 'light'"));
    }

    #[test]
    fn command_definition_is_consistent() {
        command().debug_assert();
    }
}
