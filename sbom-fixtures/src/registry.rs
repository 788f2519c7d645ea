//! Template registry
//!
//! Maps each [`ToolIdentifier`] to the generator that produces its fixture
//! files. The registry is built once and never mutated.

use std::path::{Component, Path, PathBuf};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::FixtureError;
use crate::templates;
use crate::tool::ToolIdentifier;

/// Python version written into the pip-tools lock header unless configured
pub const DEFAULT_PYTHON_VERSION: &str = "3.12";

static BUILTIN: Lazy<TemplateRegistry> = Lazy::new(TemplateRegistry::new);

/// Produces the fixture files for one tool
///
/// Generators are pure: the same context always yields the same files.
pub type Generator = fn(&GeneratorContext) -> Vec<GeneratedFile>;

/// Inputs a generator may read
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorContext {
    /// Python version named in the pip-compile header comment
    pub python_version: String,
}

impl Default for GeneratorContext {
    fn default() -> Self {
        Self {
            python_version: DEFAULT_PYTHON_VERSION.to_string(),
        }
    }
}

/// What a generated file is for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileRole {
    /// The tool's dependency declaration file
    Manifest,
    /// Development requirements kept beside the manifest
    DevRequirements,
    /// Pinned output of a lock/compile step
    LockFile,
    /// Packaging script such as `setup.py`
    BuildScript,
    /// Application code importing the declared packages
    Source,
    /// Project documentation
    Readme,
}

/// Represents a generated file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// Relative path from project root
    pub path: PathBuf,
    /// File content
    pub content: String,
    /// Role within the fixture
    pub role: FileRole,
    /// File description for user feedback
    pub description: &'static str,
}

impl GeneratedFile {
    /// Create a generated file from static template text
    #[must_use]
    pub fn new(
        path: &str,
        content: impl Into<String>,
        role: FileRole,
        description: &'static str,
    ) -> Self {
        Self {
            path: PathBuf::from(path),
            content: content.into(),
            role,
            description,
        }
    }

    /// Ensure the path stays inside the project directory
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::InvalidPath`] for absolute paths, `..` components,
    /// or paths that name no file (empty, `.`).
    pub fn validate_path(&self) -> Result<(), FixtureError> {
        if is_contained(&self.path) {
            Ok(())
        } else {
            Err(FixtureError::InvalidPath(self.path.display().to_string()))
        }
    }
}

fn is_contained(path: &Path) -> bool {
    let mut named = false;
    for component in path.components() {
        match component {
            Component::Normal(_) => named = true,
            Component::CurDir => {}
            _ => return false,
        }
    }
    named
}

/// Immutable tool → generator mapping
pub struct TemplateRegistry {
    entries: Vec<(ToolIdentifier, Generator)>,
}

impl TemplateRegistry {
    /// Build the registry of built-in templates
    #[must_use]
    pub fn new() -> Self {
        let entries = ToolIdentifier::ALL
            .into_iter()
            .map(|tool| (tool, builtin_generator(tool)))
            .collect();
        Self { entries }
    }

    /// Process-wide shared registry
    #[must_use]
    pub fn builtin() -> &'static Self {
        &BUILTIN
    }

    /// Find the generator for a tool name as typed by the user
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::UnknownTool`] if the name is not registered.
    pub fn lookup(&self, tool: &str) -> Result<(ToolIdentifier, Generator), FixtureError> {
        self.entries
            .iter()
            .find(|(id, _)| id.as_str() == tool)
            .copied()
            .ok_or_else(|| FixtureError::UnknownTool(tool.to_string()))
    }

    /// Generator for an already-parsed identifier
    #[must_use]
    pub fn generator(&self, tool: ToolIdentifier) -> Generator {
        self.entries
            .iter()
            .find(|(id, _)| *id == tool)
            .map_or_else(|| builtin_generator(tool), |(_, generator)| *generator)
    }

    /// Registered tools in canonical order
    pub fn tools(&self) -> impl Iterator<Item = ToolIdentifier> + '_ {
        self.entries.iter().map(|(id, _)| *id)
    }
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::new()
    }
}

const fn builtin_generator(tool: ToolIdentifier) -> Generator {
    match tool {
        ToolIdentifier::Uv => templates::uv::generate,
        ToolIdentifier::Pdm => templates::pdm::generate,
        ToolIdentifier::Poetry => templates::poetry::generate,
        ToolIdentifier::Pipenv => templates::pipenv::generate,
        ToolIdentifier::Pip => templates::pip::generate,
        ToolIdentifier::PipTools => templates::pip_tools::generate,
    }
}
