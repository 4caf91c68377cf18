use std::process::ExitCode;

use anstream::eprintln;
use owo_colors::OwoColorize;

fn main() -> ExitCode {
    if let Err(err) = repodex_dev::run() {
        eprintln!("{}", "repodex-dev failed".red().bold());
        for err in err.chain() {
            eprintln!("  {}: {}", "Caused by".red().bold(), err);
        }
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
