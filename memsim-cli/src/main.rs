//! ## memsim
//! **Interactive memory management simulator**
//!
//! Allocate and free simulated blocks from a numbered menu, inspect usage,
//! and get a leak report for every block still live at exit.

use clap::Parser;

mod commands;
mod error;
mod menu;
mod prompt;
mod report;

use commands::Cli;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    commands::run_command(cli)?;
    Ok(())
}
