//! Supported Python dependency-management tools

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FixtureError;

/// Python dependency-management tool a fixture project targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ToolIdentifier {
    /// Astral's uv (PEP 621 `pyproject.toml`, `uv.lock`)
    #[serde(rename = "uv")]
    Uv,
    /// PDM (PEP 621 `pyproject.toml` with `[tool.pdm]`, `pdm.lock`)
    #[serde(rename = "pdm")]
    Pdm,
    /// Poetry (`[tool.poetry]` tables, `poetry.lock`)
    #[serde(rename = "poetry")]
    Poetry,
    /// Pipenv (`Pipfile`, `Pipfile.lock`)
    #[serde(rename = "pipenv")]
    Pipenv,
    /// Plain pip with requirements files
    #[serde(rename = "pip")]
    Pip,
    /// pip-tools (`requirements.in` compiled to a pinned `requirements.txt`)
    #[serde(rename = "pip-tools")]
    PipTools,
}

impl ToolIdentifier {
    /// Every supported tool, in canonical generation order
    pub const ALL: [Self; 6] = [
        Self::Uv,
        Self::Pdm,
        Self::Poetry,
        Self::Pipenv,
        Self::Pip,
        Self::PipTools,
    ];

    /// Canonical command-line spelling
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Uv => "uv",
            Self::Pdm => "pdm",
            Self::Poetry => "poetry",
            Self::Pipenv => "pipenv",
            Self::Pip => "pip",
            Self::PipTools => "pip-tools",
        }
    }

    /// Project directory name used by batch generation
    #[must_use]
    pub fn project_name(self) -> String {
        project_name_for(self.as_str())
    }

    /// Command the operator runs afterwards to produce a lock file
    ///
    /// `None` for pip and pip-tools: their pinned requirements ship with the fixture.
    #[must_use]
    pub const fn lock_command(self) -> Option<&'static str> {
        match self {
            Self::Uv => Some("uv lock"),
            Self::Pdm => Some("pdm lock"),
            Self::Poetry => Some("poetry lock"),
            Self::Pipenv => Some("pipenv lock"),
            Self::Pip | Self::PipTools => None,
        }
    }

    /// Lock file produced by [`lock_command`](Self::lock_command)
    #[must_use]
    pub const fn lock_file(self) -> Option<&'static str> {
        match self {
            Self::Uv => Some("uv.lock"),
            Self::Pdm => Some("pdm.lock"),
            Self::Poetry => Some("poetry.lock"),
            Self::Pipenv => Some("Pipfile.lock"),
            Self::Pip | Self::PipTools => None,
        }
    }

    /// Canonical filename of the tool's dependency manifest
    #[must_use]
    pub const fn manifest_file(self) -> &'static str {
        match self {
            Self::Uv | Self::Pdm | Self::Poetry => "pyproject.toml",
            Self::Pipenv => "Pipfile",
            Self::Pip => "requirements.txt",
            Self::PipTools => "requirements.in",
        }
    }
}

/// Directory name for a project generated for `tool`
///
/// Works for unrecognized identifiers too, so failures can still be reported
/// against the directory that would have been used.
#[must_use]
pub fn project_name_for(tool: &str) -> String {
    format!("test-{tool}-project")
}

impl fmt::Display for ToolIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolIdentifier {
    type Err = FixtureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tool| tool.as_str() == s)
            .ok_or_else(|| FixtureError::UnknownTool(s.to_string()))
    }
}
