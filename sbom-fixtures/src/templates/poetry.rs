//! Poetry fixture: Django project with dev and docs groups

use crate::registry::{FileRole, GeneratedFile, GeneratorContext};

/// pyproject.toml using `[tool.poetry]` tables
pub const PYPROJECT_TOML: &str = r#"[tool.poetry]
name = "test-poetry-project"
version = "0.1.0"
description = "Test project for Poetry SBOM generation"
authors = ["Test User <test@example.com>"]
readme = "README.md"

[tool.poetry.dependencies]
python = "^3.8"
requests = "^2.25.0"
django = "^4.2.0"
psycopg2-binary = "^2.9.0"

[tool.poetry.group.dev.dependencies]
pytest = "^7.0.0"
pytest-django = "^4.5.0"
black = "^23.0.0"
isort = "^5.12.0"

[tool.poetry.group.docs.dependencies]
sphinx = "^7.0.0"
sphinx-rtd-theme = "^1.3.0"

[build-system]
requires = ["poetry-core"]
build-backend = "poetry.core.masonry.api"
"#;

/// README referenced by `tool.poetry.readme`
pub const README_MD: &str = "# Test Poetry Project\n\nTest project for Poetry SBOM generation.\n";

/// Django management entry point
pub const MANAGE_PY: &str = r#"#!/usr/bin/env python
import os
import sys
import requests

def main():
    """Run administrative tasks."""
    os.environ.setdefault('DJANGO_SETTINGS_MODULE', 'myproject.settings')
    try:
        from django.core.management import execute_from_command_line
    except ImportError as exc:
        raise ImportError(
            "Couldn't import Django. Are you sure it's installed and "
            "available on your PYTHONPATH environment variable? Did you "
            "forget to activate a virtual environment?"
        ) from exc
    execute_from_command_line(sys.argv)

if __name__ == '__main__':
    main()
"#;

/// Generate the Poetry project files
#[must_use]
pub fn generate(_ctx: &GeneratorContext) -> Vec<GeneratedFile> {
    vec![
        GeneratedFile::new(
            "pyproject.toml",
            PYPROJECT_TOML,
            FileRole::Manifest,
            "Poetry project with dev/docs groups",
        ),
        GeneratedFile::new("README.md", README_MD, FileRole::Readme, "project readme"),
        GeneratedFile::new(
            "manage.py",
            MANAGE_PY,
            FileRole::Source,
            "Django management script",
        ),
    ]
}
