//! Project materializer
//!
//! Turns a [`ProjectSpec`] into files on disk. Re-running against an existing
//! project overwrites its files in place; nothing else in the directory is
//! touched unless a clean run was requested.

use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::error::FixtureError;
use crate::registry::{FileRole, GeneratedFile, GeneratorContext, TemplateRegistry};
use crate::tool::{project_name_for, ToolIdentifier};

/// One project to generate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSpec {
    /// Directory name under `root`
    pub name: String,
    /// Tool identifier exactly as requested
    pub tool: String,
    /// Destination root directory
    pub root: PathBuf,
}

impl ProjectSpec {
    /// Create a project spec
    pub fn new(name: impl Into<String>, tool: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            tool: tool.into(),
            root: root.into(),
        }
    }

    /// Spec using the conventional `test-<tool>-project` name
    pub fn for_tool(tool: &str, root: impl Into<PathBuf>) -> Self {
        Self::new(project_name_for(tool), tool, root)
    }

    /// Target directory (`root/name`)
    #[must_use]
    pub fn project_dir(&self) -> PathBuf {
        self.root.join(&self.name)
    }
}

/// Options applied to every materialization
#[derive(Debug, Clone, Default)]
pub struct MaterializeOptions {
    /// Remove an existing project directory before writing
    pub clean: bool,
    /// Context handed to generators
    pub context: GeneratorContext,
}

/// How a file write related to what was already on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteStatus {
    /// File did not exist
    Created,
    /// File existed with different content
    Updated,
    /// File existed with identical content
    Unchanged,
}

/// A file written into the project directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WrittenFile {
    /// Path relative to the project directory
    pub path: PathBuf,
    /// Role within the fixture
    pub role: FileRole,
    /// Outcome of the write
    pub status: WriteStatus,
    /// Human-readable description
    pub description: &'static str,
}

/// Failure category reported to the operator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Tool not in the registry; nothing was created
    UnknownTool,
    /// Permission, disk or path problem while writing
    Filesystem,
}

/// Why a project could not be generated
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Failure {
    /// Failure category
    pub kind: FailureKind,
    /// Error message
    pub message: String,
}

impl From<&FixtureError> for Failure {
    fn from(err: &FixtureError) -> Self {
        let kind = match err {
            FixtureError::UnknownTool(_) => FailureKind::UnknownTool,
            FixtureError::Io { .. }
            | FixtureError::InvalidPath(_)
            | FixtureError::Manifest { .. }
            | FixtureError::Config(_) => FailureKind::Filesystem,
        };
        Self {
            kind,
            message: err.to_string(),
        }
    }
}

/// Outcome of materializing one project
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationResult {
    /// Tool identifier as requested
    pub tool: String,
    /// Project directory the files went to
    pub project_dir: PathBuf,
    /// Files written, in generator order
    ///
    /// On a filesystem failure this holds the files written before the error.
    pub files: Vec<WrittenFile>,
    /// Set when generation failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<Failure>,
}

impl GenerationResult {
    /// Whether the project was fully written
    #[must_use]
    pub const fn succeeded(&self) -> bool {
        self.failure.is_none()
    }

    /// Parsed tool identifier, if the request named a known tool
    #[must_use]
    pub fn tool_id(&self) -> Option<ToolIdentifier> {
        self.tool.parse().ok()
    }

    /// Relative paths of written files, in order
    pub fn written_paths(&self) -> impl Iterator<Item = &Path> {
        self.files.iter().map(|f| f.path.as_path())
    }

    fn failed(spec: &ProjectSpec, files: Vec<WrittenFile>, err: &FixtureError) -> Self {
        Self {
            tool: spec.tool.clone(),
            project_dir: spec.project_dir(),
            files,
            failure: Some(Failure::from(err)),
        }
    }
}

/// Generate and write the project described by `spec`
///
/// Unknown tools fail before anything touches the disk. I/O errors are
/// captured in the returned result rather than propagated.
#[must_use]
pub fn materialize(
    spec: &ProjectSpec,
    registry: &TemplateRegistry,
    options: &MaterializeOptions,
) -> GenerationResult {
    let generator = match registry.lookup(&spec.tool) {
        Ok((_, generator)) => generator,
        Err(err) => {
            warn!(tool = %spec.tool, "Unknown tool, skipping");
            return GenerationResult::failed(spec, Vec::new(), &err);
        }
    };

    let project_dir = spec.project_dir();
    info!(tool = %spec.tool, dir = %project_dir.display(), "Creating test project");

    let files = generator(&options.context);
    let mut written = Vec::with_capacity(files.len());

    match write_project(spec, &project_dir, &files, options.clean, &mut written) {
        Ok(()) => GenerationResult {
            tool: spec.tool.clone(),
            project_dir,
            files: written,
            failure: None,
        },
        Err(err) => {
            error!(tool = %spec.tool, error = %err, "Failed to write test project");
            GenerationResult::failed(spec, written, &err)
        }
    }
}

fn write_project(
    spec: &ProjectSpec,
    project_dir: &Path,
    files: &[GeneratedFile],
    clean: bool,
    written: &mut Vec<WrittenFile>,
) -> Result<(), FixtureError> {
    validate_project_name(&spec.name)?;

    if clean && project_dir.exists() {
        debug!(dir = %project_dir.display(), "Removing existing project directory");
        fs::remove_dir_all(project_dir).map_err(|e| FixtureError::io(project_dir, e))?;
    }

    fs::create_dir_all(project_dir).map_err(|e| FixtureError::io(project_dir, e))?;

    for file in files {
        let status = write_file(project_dir, file)?;
        debug!(path = %file.path.display(), ?status, "Wrote file");
        written.push(WrittenFile {
            path: file.path.clone(),
            role: file.role,
            status,
            description: file.description,
        });
    }

    Ok(())
}

/// Write a single file, creating parent directories as needed
fn write_file(project_dir: &Path, file: &GeneratedFile) -> Result<WriteStatus, FixtureError> {
    file.validate_path()?;
    let path = project_dir.join(&file.path);

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| FixtureError::io(parent, e))?;
    }

    let status = match fs::read(&path) {
        Ok(existing) if existing == file.content.as_bytes() => WriteStatus::Unchanged,
        Ok(_) => WriteStatus::Updated,
        Err(e) if e.kind() == ErrorKind::NotFound => WriteStatus::Created,
        Err(e) => return Err(FixtureError::io(&path, e)),
    };

    fs::write(&path, &file.content).map_err(|e| FixtureError::io(&path, e))?;

    Ok(status)
}

/// Project names must be a single directory component
fn validate_project_name(name: &str) -> Result<(), FixtureError> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) => Ok(()),
        _ => Err(FixtureError::InvalidPath(name.to_string())),
    }
}
