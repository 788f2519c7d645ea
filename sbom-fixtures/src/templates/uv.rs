//! uv fixture: PEP 621 project built with hatchling

use crate::registry::{FileRole, GeneratedFile, GeneratorContext};

/// pyproject.toml for the uv project
pub const PYPROJECT_TOML: &str = r#"[project]
name = "test-uv-project"
version = "0.1.0"
description = "Test project for uv SBOM generation"
authors = [{name = "Test User", email = "test@example.com"}]
dependencies = [
    "requests>=2.25.0",
    "click>=8.0.0",
    "pydantic>=2.0.0",
    "typer>=0.9.0",
]
requires-python = ">=3.8"

[project.optional-dependencies]
dev = [
    "pytest>=7.0.0",
    "black>=23.0.0",
    "mypy>=1.0.0",
]

[build-system]
requires = ["hatchling"]
build-backend = "hatchling.build"
"#;

/// Click command fetching a JSON document with requests
pub const MAIN_PY: &str = r#"import requests
import click

@click.command()
def hello():
    """Simple program that greets NAME."""
    response = requests.get("https://httpbin.org/json")
    click.echo(f"Response: {response.status_code}")

if __name__ == '__main__':
    hello()
"#;

/// Generate the uv project files
#[must_use]
pub fn generate(_ctx: &GeneratorContext) -> Vec<GeneratedFile> {
    vec![
        GeneratedFile::new(
            "pyproject.toml",
            PYPROJECT_TOML,
            FileRole::Manifest,
            "PEP 621 project with dev extras",
        ),
        GeneratedFile::new("main.py", MAIN_PY, FileRole::Source, "click CLI using requests"),
    ]
}
