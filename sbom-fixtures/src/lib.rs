//! sbom-fixtures: synthetic Python project trees for SBOM testing
//!
//! Generates small, internally-consistent fixture projects for each of the
//! Python dependency-management tools the SBOM action supports:
//! uv, PDM, Poetry, Pipenv, pip and pip-tools.
//!
//! # Pipeline
//!
//! 1. [`TemplateRegistry`] maps a [`ToolIdentifier`] to a pure [`Generator`]
//! 2. [`materialize`] writes the generator's files under `root/name`
//! 3. [`batch::run`] repeats that for every requested tool and tallies results
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use sbom_fixtures::batch::{self, BatchOptions};
//!
//! let options = BatchOptions::new("test-projects");
//! let summary = batch::run(&[], &options);
//! println!("{}/{} succeeded", summary.succeeded(), summary.attempted());
//! ```
//!
//! The [`contract`] module checks that every generator's output is a
//! plausible project for its tool: declared dependencies cover every
//! third-party import, and lock-adjacent files point back at their manifest.

#![forbid(unsafe_code)]

pub mod batch;
pub mod config;
pub mod contract;
pub mod error;
pub mod materializer;
pub mod observability;
pub mod registry;
pub mod templates;
pub mod tool;

pub use batch::{BatchOptions, BatchSummary};
pub use config::FixturesConfig;
pub use error::FixtureError;
pub use materializer::{
    materialize, Failure, FailureKind, GenerationResult, MaterializeOptions, ProjectSpec,
    WriteStatus, WrittenFile,
};
pub use registry::{FileRole, GeneratedFile, Generator, GeneratorContext, TemplateRegistry};
pub use tool::ToolIdentifier;
