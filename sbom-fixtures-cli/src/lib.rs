//! sbom-fixtures CLI library

#![forbid(unsafe_code)]

pub mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use sbom_fixtures::config::FixturesConfig;
use sbom_fixtures::observability;

pub use commands::{GenerateCommand, ListCommand, VerifyCommand};

/// Generate Python test projects for SBOM generation
#[derive(Debug, Parser)]
#[command(name = "sbom-fixtures")]
#[command(version)]
#[command(
    about = "Generate Python test projects for exercising SBOM generation",
    long_about = None
)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Subcommand; generates projects when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Generation arguments
    #[command(flatten)]
    pub generate: GenerateArgs,

    /// Options shared by every command
    #[command(flatten)]
    pub global: GlobalArgs,
}

/// Subcommands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List supported tools and the files each project contains
    List,
    /// Check generated content for consistency without writing anything
    Verify {
        /// Tools to check (default: all)
        #[arg(value_name = "TOOL")]
        tools: Vec<String>,
    },
}

/// Arguments for project generation
#[derive(Debug, Default, Args)]
pub struct GenerateArgs {
    /// Tools to create projects for: uv, pdm, poetry, pipenv, pip, pip-tools (default: all)
    #[arg(value_name = "TOOL")]
    pub tools: Vec<String>,

    /// Output directory (default: test-projects)
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Remove existing project directories before writing
    #[arg(long)]
    pub clean: bool,

    /// Exit with a non-zero status if any tool fails
    #[arg(long)]
    pub strict: bool,

    /// Python version written into the pip-tools lock header
    #[arg(long, value_name = "VERSION")]
    pub python_version: Option<String>,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,
}

impl GenerateArgs {
    /// Apply flags on top of file and environment configuration
    pub fn apply(&self, config: &mut FixturesConfig) {
        if let Some(output) = &self.output {
            config.output_dir.clone_from(output);
        }
        if let Some(version) = &self.python_version {
            config.python_version.clone_from(version);
        }
        config.clean |= self.clean;
        config.fail_on_error |= self.strict;
    }
}

/// Options shared by every command
#[derive(Debug, Default, Args)]
pub struct GlobalArgs {
    /// Configuration file (default: ./sbom-fixtures.toml if present)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl GlobalArgs {
    /// Load configuration from `--config` or the default locations
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded.
    pub fn load_config(&self) -> Result<FixturesConfig> {
        let config = match &self.config {
            Some(path) => FixturesConfig::load_from(path),
            None => FixturesConfig::load(),
        };
        config.context("Failed to load configuration")
    }

    /// Verbosity level: -1 quiet, 0 default, positive per `-v`
    #[must_use]
    pub fn verbosity(&self) -> i8 {
        if self.quiet {
            -1
        } else {
            i8::try_from(self.verbose).unwrap_or(i8::MAX)
        }
    }
}

/// Run the parsed command line
///
/// # Errors
///
/// Returns an error for configuration, logging or output failures. Tool
/// failures are reported in the summary and reflected in the exit code only.
pub fn run(cli: Cli) -> Result<ExitCode> {
    let mut config = cli.global.load_config()?;
    cli.generate.apply(&mut config);

    observability::init(
        observability::directive_for_verbosity(cli.global.verbosity()),
        config.log_format,
    )?;

    let success = match cli.command {
        None => GenerateCommand::new(cli.generate.tools, config, cli.generate.json).execute()?,
        Some(Commands::List) => {
            ListCommand::new(config.generator_context()).execute();
            true
        }
        Some(Commands::Verify { tools }) => {
            VerifyCommand::new(tools, config.generator_context()).execute()
        }
    };

    Ok(if success { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
