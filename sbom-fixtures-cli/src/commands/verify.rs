//! Consistency check command

use console::style;
use sbom_fixtures::contract::{self, Violation};
use sbom_fixtures::{batch, FixtureError, GeneratorContext, TemplateRegistry};
use tracing::warn;

/// Check generator output against the consistency rules
pub struct VerifyCommand {
    tools: Vec<String>,
    context: GeneratorContext,
}

/// Outcome of checking one requested tool
#[derive(Debug)]
pub enum ToolCheck {
    /// Tool is not registered
    Unknown(FixtureError),
    /// Checked; empty when consistent
    Checked(Vec<Violation>),
}

impl ToolCheck {
    /// Whether the tool passed
    #[must_use]
    pub fn passed(&self) -> bool {
        matches!(self, Self::Checked(violations) if violations.is_empty())
    }
}

impl VerifyCommand {
    /// Create a new command instance
    #[must_use]
    pub const fn new(tools: Vec<String>, context: GeneratorContext) -> Self {
        Self { tools, context }
    }

    /// Run the checks for every requested tool
    #[must_use]
    pub fn check(&self) -> Vec<(String, ToolCheck)> {
        let registry = TemplateRegistry::builtin();

        batch::requested_tools(&self.tools, registry)
            .into_iter()
            .map(|name| {
                let outcome = match registry.lookup(&name) {
                    Ok((tool, generator)) => {
                        ToolCheck::Checked(contract::check(tool, &generator(&self.context)))
                    }
                    Err(err) => {
                        warn!(tool = %name, "Unknown tool, skipping");
                        ToolCheck::Unknown(err)
                    }
                };
                (name, outcome)
            })
            .collect()
    }

    /// Execute the command
    ///
    /// Returns `true` when every requested tool is known and consistent.
    #[must_use]
    pub fn execute(&self) -> bool {
        let results = self.check();

        for (name, outcome) in &results {
            match outcome {
                ToolCheck::Checked(violations) if violations.is_empty() => {
                    println!("{} {}", style("✓").green(), style(name).cyan());
                }
                ToolCheck::Checked(violations) => {
                    println!("{} {}", style("✗").red().bold(), style(name).red().bold());
                    for violation in violations {
                        println!(
                            "    {} {}",
                            style(format!("[{}]", violation.clause)).yellow(),
                            violation.message
                        );
                    }
                }
                ToolCheck::Unknown(err) => {
                    println!("{} {}: {err}", style("✗").red().bold(), style(name).red().bold());
                }
            }
        }

        let passed = results.iter().filter(|(_, outcome)| outcome.passed()).count();
        println!();
        println!("{passed}/{} tools consistent", results.len());

        passed == results.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_builtin_tools_pass() {
        let command = VerifyCommand::new(Vec::new(), GeneratorContext::default());
        let results = command.check();

        assert_eq!(results.len(), 6);
        assert!(results.iter().all(|(_, outcome)| outcome.passed()));
    }

    #[test]
    fn test_unknown_tool_fails_verification() {
        let command = VerifyCommand::new(
            vec!["uv".to_string(), "conda".to_string()],
            GeneratorContext::default(),
        );
        let results = command.check();

        assert!(results[0].1.passed());
        assert!(matches!(results[1].1, ToolCheck::Unknown(FixtureError::UnknownTool(_))));
        assert!(!command.execute());
    }
}
