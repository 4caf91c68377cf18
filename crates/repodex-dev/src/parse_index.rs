use std::path::PathBuf;

use anstream::println;
use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use repodex_simple::{ProjectName, RepositoryIndex, SimpleParser};

use crate::{print_diagnostics, read_input};

#[derive(Parser)]
pub(crate) struct ParseIndexArgs {
    /// The index page to parse. Reads from stdin if omitted.
    path: Option<PathBuf>,
    /// Only print the URL of this project, matched by normalized name.
    #[arg(long)]
    project: Option<ProjectName>,
}

pub(crate) fn parse_index(args: &ParseIndexArgs, parser: &SimpleParser) -> Result<()> {
    let text = read_input(args.path.as_deref())?;
    let parsed = parser
        .parse_repo_index(&text)
        .context("Failed to parse repository index")?;
    print_diagnostics(&parsed.diagnostics);

    let index = parsed.value;
    info!("Parsed {} projects", index.len());
    println!("{}", render(&index, args.project.as_ref())?);
    Ok(())
}

fn render(index: &RepositoryIndex, project: Option<&ProjectName>) -> Result<String> {
    let Some(project) = project else {
        return Ok(serde_json::to_string_pretty(index)?);
    };
    let (_, url) = index
        .find(project)
        .with_context(|| format!("Project `{project}` is not listed in the index"))?;
    Ok(url.to_string())
}
