//! List supported tools

use console::style;
use sbom_fixtures::{GeneratorContext, TemplateRegistry};

/// Print every registered tool with its project layout
pub struct ListCommand {
    context: GeneratorContext,
}

impl ListCommand {
    /// Create a new command instance
    #[must_use]
    pub const fn new(context: GeneratorContext) -> Self {
        Self { context }
    }

    /// Execute the command
    pub fn execute(&self) {
        let registry = TemplateRegistry::builtin();

        for tool in registry.tools() {
            let files = registry.generator(tool)(&self.context);

            println!(
                "{} {}",
                style(tool).cyan().bold(),
                style(format!("({})", tool.project_name())).dim()
            );
            for file in &files {
                println!(
                    "  {} {}",
                    style(file.path.display()).bold(),
                    style(format!("- {}", file.description)).dim()
                );
            }
            match tool.lock_command() {
                Some(command) => println!("  {} {}", style("lock:").dim(), style(command).yellow()),
                None => println!("  {} {}", style("lock:").dim(), style("provided").dim()),
            }
            println!();
        }
    }
}
