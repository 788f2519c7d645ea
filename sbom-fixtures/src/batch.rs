//! Batch orchestrator
//!
//! Generates one project per requested tool, sequentially, and collects the
//! results. A failing tool never stops the rest of the batch.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{error, info};

use crate::error::FixtureError;
use crate::materializer::{materialize, GenerationResult, MaterializeOptions, ProjectSpec};
use crate::registry::{GeneratorContext, TemplateRegistry};
use crate::tool::ToolIdentifier;

/// Settings shared by every project in a batch
#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Directory that receives the `test-<tool>-project` directories
    pub root: PathBuf,
    /// Remove existing project directories before writing
    pub clean: bool,
    /// Context handed to generators
    pub context: GeneratorContext,
}

impl BatchOptions {
    /// Options writing under `root` with defaults otherwise
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            clean: false,
            context: GeneratorContext::default(),
        }
    }
}

/// Follow-up the operator performs for one generated project
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NextStep {
    /// Tool the project was generated for
    pub tool: ToolIdentifier,
    /// Project directory
    pub project_dir: PathBuf,
    /// Lock command to run inside the project, if the tool needs one
    pub lock_command: Option<&'static str>,
    /// Lock file the command will create
    pub lock_file: Option<&'static str>,
}

/// Results of a batch run
#[derive(Debug, Clone, Serialize)]
pub struct BatchSummary {
    /// Output root
    pub root: PathBuf,
    /// One result per requested tool, in request order
    pub results: Vec<GenerationResult>,
}

impl BatchSummary {
    /// Number of projects written successfully
    #[must_use]
    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.succeeded()).count()
    }

    /// Number of tools requested
    #[must_use]
    pub fn attempted(&self) -> usize {
        self.results.len()
    }

    /// Whether every requested tool succeeded
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.succeeded() == self.attempted()
    }

    /// Results that failed
    pub fn failures(&self) -> impl Iterator<Item = &GenerationResult> {
        self.results.iter().filter(|r| !r.succeeded())
    }

    /// Manual follow-up for each successfully generated project
    #[must_use]
    pub fn next_steps(&self) -> Vec<NextStep> {
        self.results
            .iter()
            .filter(|r| r.succeeded())
            .filter_map(|r| {
                let tool = r.tool_id()?;
                Some(NextStep {
                    tool,
                    project_dir: r.project_dir.clone(),
                    lock_command: tool.lock_command(),
                    lock_file: tool.lock_file(),
                })
            })
            .collect()
    }
}

/// Tools to generate: the request, or every registered tool when empty
#[must_use]
pub fn requested_tools(tools: &[String], registry: &TemplateRegistry) -> Vec<String> {
    if tools.is_empty() {
        registry.tools().map(|t| t.as_str().to_string()).collect()
    } else {
        tools.to_vec()
    }
}

/// Generate every requested project with the built-in registry
#[must_use]
pub fn run(tools: &[String], options: &BatchOptions) -> BatchSummary {
    run_with(tools, options, TemplateRegistry::builtin())
}

/// Generate every requested project with an explicit registry
#[must_use]
pub fn run_with(
    tools: &[String],
    options: &BatchOptions,
    registry: &TemplateRegistry,
) -> BatchSummary {
    let tools = requested_tools(tools, registry);
    info!(
        root = %options.root.display(),
        tools = %tools.join(", "),
        "Creating test projects"
    );

    if let Err(err) = ensure_root(&options.root) {
        error!(error = %err, "Cannot create output root");
        return BatchSummary {
            root: options.root.clone(),
            results: tools
                .iter()
                .map(|tool| root_failure(tool, &options.root, registry, &err))
                .collect(),
        };
    }

    let materialize_options = MaterializeOptions {
        clean: options.clean,
        context: options.context.clone(),
    };

    let results = tools
        .iter()
        .map(|tool| {
            let spec = ProjectSpec::for_tool(tool, &options.root);
            materialize(&spec, registry, &materialize_options)
        })
        .collect();

    let summary = BatchSummary {
        root: options.root.clone(),
        results,
    };
    info!(
        succeeded = summary.succeeded(),
        attempted = summary.attempted(),
        "Batch complete"
    );
    summary
}

fn ensure_root(root: &Path) -> Result<(), FixtureError> {
    fs::create_dir_all(root).map_err(|e| FixtureError::io(root, e))
}

fn root_failure(
    tool: &str,
    root: &Path,
    registry: &TemplateRegistry,
    err: &FixtureError,
) -> GenerationResult {
    let spec = ProjectSpec::for_tool(tool, root);
    let failure = match registry.lookup(tool) {
        Ok(_) => err.into(),
        Err(unknown) => (&unknown).into(),
    };
    GenerationResult {
        tool: tool.to_string(),
        project_dir: spec.project_dir(),
        files: Vec::new(),
        failure: Some(failure),
    }
}

/// Join file names the way the summary prints them: `a, b, and c`
#[must_use]
pub fn describe_files(result: &GenerationResult) -> String {
    let names: Vec<String> = result
        .written_paths()
        .map(|p| p.display().to_string())
        .collect();

    match names.as_slice() {
        [] => String::new(),
        [only] => only.clone(),
        [first, second] => format!("{first} and {second}"),
        [init @ .., last] => format!("{}, and {last}", init.join(", ")),
    }
}
