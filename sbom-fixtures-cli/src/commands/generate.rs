//! Test project generation command

use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use sbom_fixtures::batch::{self, describe_files, BatchSummary};
use sbom_fixtures::config::FixturesConfig;
use sbom_fixtures::{GenerationResult, TemplateRegistry, ToolIdentifier};

/// Directory name of a local checkout of the action
const LOCAL_ACTION_DIR: &str = "python-sbom-action";

/// Create test projects for the requested tools
pub struct GenerateCommand {
    tools: Vec<String>,
    config: FixturesConfig,
    json: bool,
}

impl GenerateCommand {
    /// Create a new command instance
    ///
    /// # Arguments
    ///
    /// * `tools` - Tool identifiers as typed; empty means every supported tool
    /// * `config` - Resolved configuration
    /// * `json` - Print the summary as JSON instead of styled text
    #[must_use]
    pub const fn new(tools: Vec<String>, config: FixturesConfig, json: bool) -> Self {
        Self { tools, config, json }
    }

    /// Execute the command
    ///
    /// Returns whether the run should exit successfully: always `true`
    /// unless `fail_on_error` is set and a tool failed.
    ///
    /// # Errors
    ///
    /// Returns an error if the progress style or JSON output fails.
    pub fn execute(&self) -> Result<bool> {
        let tools = batch::requested_tools(&self.tools, TemplateRegistry::builtin());

        if !self.json {
            self.print_header(&tools);
        }

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .context("Failed to set progress style")?,
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(100));
        spinner.set_message(format!("Generating {} test projects...", tools.len()));

        let summary = batch::run(&tools, &self.config.batch_options());

        spinner.finish_and_clear();

        if self.json {
            let json = serde_json::to_string_pretty(&summary)
                .context("Failed to serialize summary")?;
            println!("{json}");
        } else {
            print_results(&summary);
            print_next_steps(&summary);
        }

        Ok(exit_success(&summary, self.config.fail_on_error))
    }

    fn print_header(&self, tools: &[String]) {
        let root = &self.config.output_dir;
        let shown = std::path::absolute(root).unwrap_or_else(|_| root.clone());
        println!(
            "{} {}",
            style("Creating test projects in:").bold(),
            style(shown.display()).cyan()
        );
        println!("{} {}", style("Tools to create:").bold(), tools.join(", "));
        println!();
    }
}

/// Exit policy: partial failure only fails the run when requested
#[must_use]
pub fn exit_success(summary: &BatchSummary, fail_on_error: bool) -> bool {
    !fail_on_error || summary.all_succeeded()
}

/// Guidance printed under a successfully generated project
#[must_use]
pub fn follow_up(tool: ToolIdentifier) -> String {
    match (tool.lock_command(), tool.lock_file()) {
        (Some(command), Some(lock_file)) => {
            format!("Run '{command}' in the project directory to create {lock_file}")
        }
        _ if tool == ToolIdentifier::PipTools => {
            "This project uses pip-tools (requirements.txt with pins)".to_string()
        }
        _ => "Requirements files are used directly; no lock step needed".to_string(),
    }
}

fn print_results(summary: &BatchSummary) {
    for result in &summary.results {
        print_result(result);
        println!();
    }

    let tally = format!(
        "Successfully created {}/{} test projects",
        summary.succeeded(),
        summary.attempted()
    );
    if summary.all_succeeded() {
        println!("{} {}", style("✅").green(), style(tally).green().bold());
    } else {
        println!("{} {}", style("⚠").yellow(), style(tally).yellow().bold());
    }
}

fn print_result(result: &GenerationResult) {
    match (&result.failure, result.tool_id()) {
        (None, Some(tool)) => {
            println!(
                "{} {} {}",
                style("Created").green().bold(),
                style(tool).cyan().bold(),
                style(display_relative(&result.project_dir)).dim()
            );
            println!("  {} Created {}", style("✓").green(), describe_files(result));
            println!("  {} {}", style("→").cyan(), follow_up(tool));
        }
        (Some(failure), _) => {
            println!(
                "{} {}: {}",
                style("✗").red().bold(),
                style(&result.tool).red().bold(),
                failure.message
            );
        }
        (None, None) => {}
    }
}

fn print_next_steps(summary: &BatchSummary) {
    let steps = summary.next_steps();
    if steps.is_empty() {
        return;
    }

    println!();
    println!("{}", style("📝 Next steps:").bold());
    println!("  {} Navigate to each test project directory", style("1.").cyan());
    println!("  {} Run the appropriate lock command for each tool:", style("2.").cyan());
    for step in &steps {
        match step.lock_command {
            Some(command) => println!(
                "     - {}: {}",
                step.tool,
                style(format!("'{command}'")).yellow()
            ),
            None => println!("     - {}: lock files already provided", step.tool),
        }
    }
    println!("  {} Test the python-sbom-action in each directory", style("3.").cyan());

    if let Some(first) = steps.first() {
        println!();
        println!("{}", style("🧪 Test the action with:").bold());
        for line in action_hint(&first.project_dir, current_dir().as_deref()) {
            println!("     {} {}", style("$").dim(), style(line).cyan());
        }
    }
}

/// Commands for trying a local checkout of the action against a project
///
/// The action is expected next to the invocation directory, so the second
/// line climbs back out of the project directory.
#[must_use]
pub fn action_hint(project_dir: &Path, cwd: Option<&Path>) -> [String; 2] {
    let relative = cwd.and_then(|cwd| project_dir.strip_prefix(cwd).ok());
    let action = match (relative, cwd) {
        (Some(relative), _) => relative
            .components()
            .filter(|c| matches!(c, Component::Normal(_)))
            .map(|_| Path::new(".."))
            .collect::<PathBuf>()
            .join(LOCAL_ACTION_DIR),
        (None, Some(cwd)) => cwd.join(LOCAL_ACTION_DIR),
        (None, None) => PathBuf::from(LOCAL_ACTION_DIR),
    };
    let shown = relative.unwrap_or(project_dir);

    [
        format!("cd {}", shown.display()),
        format!("{} (if using local action)", action.display()),
    ]
}

fn current_dir() -> Option<PathBuf> {
    std::env::current_dir().ok()
}

fn display_relative(path: &Path) -> String {
    current_dir()
        .and_then(|cwd| path.strip_prefix(cwd).ok().map(Path::to_path_buf))
        .unwrap_or_else(|| path.to_path_buf())
        .display()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sbom_fixtures::batch::BatchOptions;
    use tempfile::TempDir;

    fn summary_for(tools: &[&str]) -> (TempDir, BatchSummary) {
        let temp_dir = TempDir::new().unwrap();
        let tools: Vec<String> = tools.iter().map(|s| (*s).to_string()).collect();
        let summary = batch::run(&tools, &BatchOptions::new(temp_dir.path()));
        (temp_dir, summary)
    }

    #[test]
    fn test_partial_failure_exits_zero_by_default() {
        let (_dir, summary) = summary_for(&["uv", "bogus"]);
        assert!(exit_success(&summary, false));
        assert!(!exit_success(&summary, true));
    }

    #[test]
    fn test_strict_passes_when_everything_succeeds() {
        let (_dir, summary) = summary_for(&["pdm", "pipenv"]);
        assert!(exit_success(&summary, true));
    }

    #[test]
    fn test_follow_up_text() {
        assert_eq!(
            follow_up(ToolIdentifier::Uv),
            "Run 'uv lock' in the project directory to create uv.lock"
        );
        assert_eq!(
            follow_up(ToolIdentifier::Pipenv),
            "Run 'pipenv lock' in the project directory to create Pipfile.lock"
        );
        assert!(follow_up(ToolIdentifier::PipTools).contains("pip-tools"));
        assert!(follow_up(ToolIdentifier::Pip).contains("no lock step"));
    }

    #[test]
    fn test_action_hint_climbs_out_of_project() {
        let [cd, action] = action_hint(
            Path::new("/work/test-projects/test-uv-project"),
            Some(Path::new("/work")),
        );
        assert_eq!(cd, "cd test-projects/test-uv-project");
        assert_eq!(action, "../../python-sbom-action (if using local action)");
    }

    #[test]
    fn test_action_hint_outside_cwd() {
        let [cd, action] = action_hint(
            Path::new("/tmp/fixtures/test-pip-project"),
            Some(Path::new("/work")),
        );
        assert_eq!(cd, "cd /tmp/fixtures/test-pip-project");
        assert_eq!(action, "/work/python-sbom-action (if using local action)");
    }

    #[test]
    fn test_execute_writes_projects() {
        let temp_dir = TempDir::new().unwrap();
        let config = FixturesConfig {
            output_dir: temp_dir.path().join("out"),
            fail_on_error: true,
            ..FixturesConfig::default()
        };

        let tools = vec!["poetry".to_string(), "conda".to_string()];
        let command = GenerateCommand::new(tools, config, true);
        let success = command.execute().unwrap();

        assert!(!success);
        assert!(temp_dir.path().join("out/test-poetry-project/manage.py").exists());
        assert!(!temp_dir.path().join("out/test-conda-project").exists());
    }
}
