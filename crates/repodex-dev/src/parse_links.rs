use std::fmt::Write;
use std::path::PathBuf;

use anstream::println;
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use tracing::info;

use repodex_simple::{ArchiveLink, SimpleParser};

use crate::{print_diagnostics, read_input};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// One JSON array of link records.
    #[default]
    Json,
    /// One `<a>` tag per link, as the link would be written back into a page.
    Html,
}

#[derive(Parser)]
pub(crate) struct ParseLinksArgs {
    /// The project page to parse. Reads from stdin if omitted.
    path: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,
    /// Omit yanked files.
    #[arg(long)]
    skip_yanked: bool,
}

pub(crate) fn parse_links(args: &ParseLinksArgs, parser: &SimpleParser) -> Result<()> {
    let text = read_input(args.path.as_deref())?;
    let parsed = parser
        .parse_archive_links(&text)
        .context("Failed to parse project page")?;
    print_diagnostics(&parsed.diagnostics);

    let mut links = parsed.value;
    if args.skip_yanked {
        links.retain(|link| !link.is_yanked());
    }
    info!("Parsed {} archive links", links.len());
    println!("{}", render(&links, args.format)?);
    Ok(())
}

fn render(links: &[ArchiveLink], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(links)?),
        OutputFormat::Html => {
            let mut output = String::new();
            for link in links {
                writeln!(output, "{link}")?;
            }
            // `println!` adds the final newline.
            output.pop();
            Ok(output)
        }
    }
}
