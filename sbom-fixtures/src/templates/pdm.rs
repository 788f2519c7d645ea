//! PDM fixture: PEP 621 project with PDM dev-dependency groups

use crate::registry::{FileRole, GeneratedFile, GeneratorContext};

/// pyproject.toml for the PDM project
pub const PYPROJECT_TOML: &str = r#"[project]
name = "test-pdm-project"
version = "0.1.0"
description = "Test project for PDM SBOM generation"
authors = [{name = "Test User", email = "test@example.com"}]
dependencies = [
    "requests>=2.25.0",
    "fastapi>=0.100.0",
    "uvicorn>=0.20.0",
]
requires-python = ">=3.8"

[build-system]
requires = ["pdm-backend"]
build-backend = "pdm.backend"

[tool.pdm]
distribution = true

[tool.pdm.dev-dependencies]
test = [
    "pytest>=7.0.0",
    "httpx>=0.24.0",
]
lint = [
    "ruff>=0.1.0",
    "black>=23.0.0",
]
"#;

/// FastAPI application
pub const APP_PY: &str = r#"from fastapi import FastAPI
import requests

app = FastAPI()

@app.get("/")
async def root():
    return {"message": "Hello World"}

@app.get("/fetch")
async def fetch_data():
    response = requests.get("https://httpbin.org/json")
    return {"status": response.status_code, "data": response.json()}
"#;

/// Generate the PDM project files
#[must_use]
pub fn generate(_ctx: &GeneratorContext) -> Vec<GeneratedFile> {
    vec![
        GeneratedFile::new(
            "pyproject.toml",
            PYPROJECT_TOML,
            FileRole::Manifest,
            "PEP 621 project with PDM test/lint groups",
        ),
        GeneratedFile::new("app.py", APP_PY, FileRole::Source, "FastAPI app"),
    ]
}
