//! sbom-fixtures CLI tool

#![forbid(unsafe_code)]

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use sbom_fixtures_cli::Cli;

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    sbom_fixtures_cli::run(cli)
}
