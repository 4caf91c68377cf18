use std::error::Error as _;
use std::io;
use std::path::Path;

use anstream::eprintln;
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use owo_colors::OwoColorize;
use tracing::instrument;

use repodex_simple::{Diagnostic, ParserOptions, RepositoryVersion, SimpleParser};

use crate::env_vars::EnvVars;
use crate::logging::{Level, setup_logging};
use crate::parse_index::ParseIndexArgs;
use crate::parse_links::ParseLinksArgs;
use crate::project_url::ProjectUrlArgs;

mod env_vars;
mod logging;
mod parse_index;
mod parse_links;
mod project_url;

#[derive(Parser)]
#[command(name = "repodex-dev", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    parser: ParserArgs,

    /// Show debug messages.
    #[arg(global = true, short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a repository index page and print the project URLs as JSON.
    ParseIndex(ParseIndexArgs),
    /// Parse a project page and print its archive links.
    ParseLinks(ParseLinksArgs),
    /// Print the index URL of a project.
    ProjectUrl(ProjectUrlArgs),
}

#[derive(Args)]
struct ParserArgs {
    /// The newest repository version to accept without a warning, as `<major>.<minor>`.
    ///
    /// Pages declaring a newer major version are rejected.
    #[arg(
        global = true,
        long,
        env = EnvVars::REPODEX_SUPPORTED_REPOSITORY_VERSION,
        value_name = "VERSION"
    )]
    supported_version: Option<RepositoryVersion>,
}

impl ParserArgs {
    fn parser(&self) -> SimpleParser {
        SimpleParser::new(ParserOptions {
            supported_version: self.supported_version.unwrap_or_default(),
        })
    }
}

#[instrument(skip_all)] // Anchor span to check for overhead
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(if cli.verbose {
        Level::Verbose
    } else {
        Level::Default
    })?;

    let parser = cli.parser.parser();
    match cli.command {
        Command::ParseIndex(args) => parse_index::parse_index(&args, &parser)?,
        Command::ParseLinks(args) => parse_links::parse_links(&args, &parser)?,
        Command::ProjectUrl(args) => project_url::project_url(&args),
    }
    Ok(())
}

/// Read the document at `path`, or from stdin if no path is given.
fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => Ok(fs_err::read_to_string(path)?),
        None => io::read_to_string(io::stdin()).context("Failed to read from stdin"),
    }
}

fn print_diagnostics(diagnostics: &[Diagnostic]) {
    for diagnostic in diagnostics {
        eprintln!("{}{} {diagnostic}", "warning".yellow().bold(), ":".bold());
        let mut source = diagnostic.source();
        while let Some(err) = source {
            eprintln!("  {}: {err}", "Caused by".yellow().bold());
            source = err.source();
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn supported_version_flag() {
        let cli = Cli::try_parse_from([
            "repodex-dev",
            "parse-links",
            "--supported-version",
            "1.0",
            "page.html",
        ])
        .unwrap();
        assert_eq!(
            cli.parser.parser().options().supported_version,
            RepositoryVersion::new(1, 0)
        );
    }

    #[test]
    fn invalid_supported_version() {
        let result = Cli::try_parse_from([
            "repodex-dev",
            "parse-index",
            "--supported-version",
            "latest",
        ]);
        assert!(result.is_err());
    }
}
