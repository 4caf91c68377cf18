use anstream::println;
use clap::Parser;

use repodex_simple::{ProjectName, create_project_url};

#[derive(Parser)]
pub(crate) struct ProjectUrlArgs {
    /// The index URL, like `https://pypi.org/simple/`.
    base_url: String,
    /// The project name. Normalized before it's appended.
    name: ProjectName,
}

pub(crate) fn project_url(args: &ProjectUrlArgs) {
    println!("{}", create_project_url(&args.base_url, args.name.as_str()));
}
