//! Consistency checks for generated fixtures
//!
//! A fixture is only useful if the tool's own lock command can run against
//! it and the SBOM it produces lines up with the code. These checks verify:
//!
//! - exactly one manifest, with the tool's canonical filename
//! - every third-party import in a source file is declared in the manifest
//! - production and development dependencies are both present
//! - structured manifests parse (TOML, requirement lines)
//! - `setup.py` `install_requires` entries are declared in the manifest
//! - pinned lock files list every direct requirement with `-r <manifest>`
//!   provenance, and `.in` dev requirements include the manifest
//!
//! Parsing is deliberately shallow: line-based for requirements and Python
//! imports, `toml` for `pyproject.toml` and `Pipfile`.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::Serialize;
use toml::{Table, Value};

use crate::error::FixtureError;
use crate::registry::{FileRole, GeneratedFile, GeneratorContext, TemplateRegistry};
use crate::tool::ToolIdentifier;

/// Modules shipped with CPython that fixtures may import without declaring
const STDLIB_MODULES: &[&str] = &[
    "__future__", "abc", "argparse", "asyncio", "base64", "collections", "contextlib", "copy",
    "csv", "dataclasses", "datetime", "enum", "functools", "hashlib", "http", "io", "itertools",
    "json", "logging", "math", "os", "pathlib", "random", "re", "shutil", "socket", "sqlite3",
    "string", "subprocess", "sys", "tempfile", "textwrap", "threading", "time", "typing",
    "unittest", "urllib", "uuid",
];

/// Import names that differ from their distribution names
const IMPORT_ALIASES: &[(&str, &str)] = &[
    ("dotenv", "python-dotenv"),
    ("jwt", "pyjwt"),
    ("pil", "pillow"),
    ("psycopg2", "psycopg2-binary"),
    ("sklearn", "scikit-learn"),
    ("yaml", "pyyaml"),
];

/// Contract clause a violation breaks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Clause {
    /// Exactly one manifest with the canonical filename
    SingleManifest,
    /// Imported packages are declared
    ImportsDeclared,
    /// Production and development groups are both populated
    DependencyGroups,
    /// Content parses in its declared format
    Syntax,
    /// Build scripts and lock files agree with the manifest
    CrossReference,
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::SingleManifest => "single-manifest",
            Self::ImportsDeclared => "imports-declared",
            Self::DependencyGroups => "dependency-groups",
            Self::Syntax => "syntax",
            Self::CrossReference => "cross-reference",
        };
        f.write_str(name)
    }
}

/// A broken contract clause
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// Tool whose fixture is inconsistent
    pub tool: ToolIdentifier,
    /// Clause broken
    pub clause: Clause,
    /// What is wrong
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.tool, self.clause, self.message)
    }
}

/// Dependencies declared by a manifest, PEP 503 normalized
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeclaredDependencies {
    /// Runtime dependencies
    pub production: BTreeSet<String>,
    /// Test, lint, docs and other non-runtime dependencies
    pub development: BTreeSet<String>,
}

impl DeclaredDependencies {
    /// Whether `name` is declared in either group
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        let name = normalize_name(name);
        self.production.contains(&name) || self.development.contains(&name)
    }
}

/// Check every built-in generator
#[must_use]
pub fn check_all(registry: &TemplateRegistry, ctx: &GeneratorContext) -> Vec<Violation> {
    registry
        .tools()
        .flat_map(|tool| check(tool, &registry.generator(tool)(ctx)))
        .collect()
}

/// Check one generator's output
#[must_use]
pub fn check(tool: ToolIdentifier, files: &[GeneratedFile]) -> Vec<Violation> {
    let mut violations = Vec::new();
    let mut violate = |clause, message: String| {
        violations.push(Violation { tool, clause, message });
    };

    let manifests: Vec<_> = files.iter().filter(|f| f.role == FileRole::Manifest).collect();
    let manifest = match manifests.as_slice() {
        [only] => *only,
        _ => {
            violate(
                Clause::SingleManifest,
                format!("expected exactly one manifest, found {}", manifests.len()),
            );
            return violations;
        }
    };
    if !manifest.path.ends_with(tool.manifest_file()) {
        violate(
            Clause::SingleManifest,
            format!(
                "manifest is {}, expected {}",
                manifest.path.display(),
                tool.manifest_file()
            ),
        );
    }

    let declared = match declared_dependencies(tool, files) {
        Ok(declared) => declared,
        Err(err) => {
            violate(Clause::Syntax, err.to_string());
            return violations;
        }
    };

    if declared.production.is_empty() {
        violate(Clause::DependencyGroups, "no production dependencies".to_string());
    }
    if declared.development.is_empty() {
        violate(Clause::DependencyGroups, "no development dependencies".to_string());
    }

    for source in files.iter().filter(|f| f.role == FileRole::Source) {
        for module in python_imports(&source.content) {
            if is_stdlib(&module) {
                continue;
            }
            let distribution = distribution_for_import(&module);
            if !declared.production.contains(&distribution) {
                violate(
                    Clause::ImportsDeclared,
                    format!(
                        "{} imports {module} but {} does not declare {distribution}",
                        source.path.display(),
                        manifest.path.display()
                    ),
                );
            }
        }
    }

    for script in files.iter().filter(|f| f.role == FileRole::BuildScript) {
        for name in setup_install_requires(&script.content) {
            if !declared.production.contains(&name) {
                violate(
                    Clause::CrossReference,
                    format!(
                        "{} requires {name} which {} does not declare",
                        script.path.display(),
                        manifest.path.display()
                    ),
                );
            }
        }
    }

    let manifest_name = manifest.path.display().to_string();
    for lock in files.iter().filter(|f| f.role == FileRole::LockFile) {
        let pins = lock_provenance(&lock.content, &manifest_name);
        for name in &declared.production {
            match pins.get(name) {
                None => violate(
                    Clause::CrossReference,
                    format!("{} does not pin {name}", lock.path.display()),
                ),
                Some(false) => violate(
                    Clause::CrossReference,
                    format!(
                        "{} pins {name} without `-r {manifest_name}` provenance",
                        lock.path.display()
                    ),
                ),
                Some(true) => {}
            }
        }

        let include = format!("-r {manifest_name}");
        for dev in files.iter().filter(|f| f.role == FileRole::DevRequirements) {
            if !dev.content.lines().any(|line| line.trim() == include) {
                violate(
                    Clause::CrossReference,
                    format!("{} does not include `{include}`", dev.path.display()),
                );
            }
        }
    }

    violations
}

/// Parse the dependencies a tool's manifest (and dev requirement files) declare
///
/// # Errors
///
/// Returns [`FixtureError::Manifest`] naming the file when the manifest is
/// missing or does not parse.
pub fn declared_dependencies(
    tool: ToolIdentifier,
    files: &[GeneratedFile],
) -> Result<DeclaredDependencies, FixtureError> {
    let manifest = files
        .iter()
        .find(|f| f.role == FileRole::Manifest)
        .ok_or_else(|| FixtureError::manifest(tool.manifest_file(), "missing"))?;

    match tool {
        ToolIdentifier::Uv | ToolIdentifier::Pdm => {
            let table = parse_toml(manifest)?;
            Ok(pep621_dependencies(&table))
        }
        ToolIdentifier::Poetry => {
            let table = parse_toml(manifest)?;
            Ok(poetry_dependencies(&table))
        }
        ToolIdentifier::Pipenv => {
            let table = parse_toml(manifest)?;
            Ok(DeclaredDependencies {
                production: table_keys(table.get("packages")),
                development: table_keys(table.get("dev-packages")),
            })
        }
        ToolIdentifier::Pip | ToolIdentifier::PipTools => {
            let production = requirement_names(manifest)?;
            let mut development = BTreeSet::new();
            for dev in files.iter().filter(|f| f.role == FileRole::DevRequirements) {
                development.extend(requirement_names(dev)?);
            }
            Ok(DeclaredDependencies {
                production,
                development,
            })
        }
    }
}

fn parse_toml(file: &GeneratedFile) -> Result<Table, FixtureError> {
    toml::from_str(&file.content)
        .map_err(|e| FixtureError::manifest(&file.path, format!("not valid TOML: {e}")))
}

fn pep621_dependencies(table: &Table) -> DeclaredDependencies {
    let project = table.get("project");
    let production = requirement_array(project.and_then(|p| p.get("dependencies")));

    let mut development = BTreeSet::new();
    let groups = [
        project.and_then(|p| p.get("optional-dependencies")),
        table.get("dependency-groups"),
        table
            .get("tool")
            .and_then(|t| t.get("pdm"))
            .and_then(|p| p.get("dev-dependencies")),
    ];
    for group in groups.into_iter().flatten().filter_map(Value::as_table) {
        for requirements in group.values() {
            development.extend(requirement_array(Some(requirements)));
        }
    }

    DeclaredDependencies {
        production,
        development,
    }
}

fn poetry_dependencies(table: &Table) -> DeclaredDependencies {
    let poetry = table.get("tool").and_then(|t| t.get("poetry"));

    let mut production = table_keys(poetry.and_then(|p| p.get("dependencies")));
    production.remove("python");

    let mut development = table_keys(poetry.and_then(|p| p.get("dev-dependencies")));
    if let Some(groups) = poetry.and_then(|p| p.get("group")).and_then(Value::as_table) {
        for group in groups.values() {
            development.extend(table_keys(group.get("dependencies")));
        }
    }

    DeclaredDependencies {
        production,
        development,
    }
}

fn table_keys(value: Option<&Value>) -> BTreeSet<String> {
    value
        .and_then(Value::as_table)
        .map(|t| t.keys().map(|k| normalize_name(k)).collect())
        .unwrap_or_default()
}

fn requirement_array(value: Option<&Value>) -> BTreeSet<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .filter_map(requirement_name)
                .collect()
        })
        .unwrap_or_default()
}

fn requirement_names(file: &GeneratedFile) -> Result<BTreeSet<String>, FixtureError> {
    let mut names = BTreeSet::new();
    for (number, line) in file.content.lines().enumerate() {
        let line = strip_comment(line).trim();
        if line.is_empty() || line.starts_with('-') {
            continue;
        }
        let name = requirement_name(line).ok_or_else(|| {
            let message = format!("line {}: not a requirement: {line}", number + 1);
            FixtureError::manifest(&file.path, message)
        })?;
        names.insert(name);
    }
    Ok(names)
}

fn strip_comment(line: &str) -> &str {
    line.split_once('#').map_or(line, |(before, _)| before)
}

/// Distribution name of a PEP 508 requirement, normalized
///
/// `uvicorn[standard]>=0.20.0` becomes `uvicorn`.
#[must_use]
pub fn requirement_name(requirement: &str) -> Option<String> {
    let requirement = requirement.trim();
    let end = requirement
        .find(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')))
        .unwrap_or(requirement.len());
    let name = &requirement[..end];
    let valid = name.starts_with(|c: char| c.is_ascii_alphanumeric());
    valid.then(|| normalize_name(name))
}

/// PEP 503 normalization: lowercase, runs of `-`, `_`, `.` become one `-`
#[must_use]
pub fn normalize_name(name: &str) -> String {
    let mut normalized = String::with_capacity(name.len());
    let mut pending_separator = false;
    for c in name.chars() {
        if matches!(c, '-' | '_' | '.') {
            pending_separator = true;
        } else {
            if pending_separator && !normalized.is_empty() {
                normalized.push('-');
            }
            pending_separator = false;
            normalized.push(c.to_ascii_lowercase());
        }
    }
    normalized
}

/// Top-level modules imported by Python source
///
/// Recognizes `import a, b.c as d` and `from a.b import c` at any
/// indentation. Relative imports are ignored.
#[must_use]
pub fn python_imports(source: &str) -> BTreeSet<String> {
    let mut modules = BTreeSet::new();
    for line in source.lines() {
        let line = strip_comment(line).trim();
        if let Some(rest) = line.strip_prefix("import ") {
            for item in rest.split(',') {
                if let Some(module) = item.split_whitespace().next().and_then(top_level_module) {
                    modules.insert(module);
                }
            }
        } else if let Some(rest) = line.strip_prefix("from ") {
            let mut words = rest.split_whitespace();
            if let (Some(module), Some("import")) = (words.next(), words.next()) {
                if let Some(module) = top_level_module(module) {
                    modules.insert(module);
                }
            }
        }
    }
    modules
}

fn top_level_module(dotted: &str) -> Option<String> {
    if dotted.starts_with('.') {
        return None;
    }
    dotted
        .split('.')
        .next()
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

fn is_stdlib(module: &str) -> bool {
    STDLIB_MODULES.contains(&module)
}

/// Distribution expected to provide an import
#[must_use]
pub fn distribution_for_import(module: &str) -> String {
    let module = normalize_name(module);
    IMPORT_ALIASES
        .iter()
        .find(|(import, _)| *import == module)
        .map_or(module, |(_, distribution)| (*distribution).to_string())
}

/// Requirement names listed in a `setup.py` `install_requires=[...]`
fn setup_install_requires(script: &str) -> BTreeSet<String> {
    let Some(start) = script.find("install_requires") else {
        return BTreeSet::new();
    };
    let rest = &script[start..];
    let Some(open) = rest.find('[') else {
        return BTreeSet::new();
    };
    let close = rest[open..].find(']').map_or(rest.len(), |i| open + i);

    rest[open + 1..close]
        .split(',')
        .map(|item| item.trim().trim_matches(|c: char| c == '"' || c == '\''))
        .filter(|item| !item.is_empty())
        .filter_map(requirement_name)
        .collect()
}

/// Pinned packages in a pip-compile lock and whether each cites `-r manifest`
fn lock_provenance(lock: &str, manifest: &str) -> BTreeMap<String, bool> {
    let marker = format!("-r {manifest}");
    let mut pins = BTreeMap::new();
    let mut current: Option<String> = None;

    for line in lock.lines() {
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }
        if line.starts_with(char::is_whitespace) {
            if let Some(name) = &current {
                if line.contains(&marker) {
                    pins.insert(name.clone(), true);
                }
            }
        } else if line.contains("==") {
            current = requirement_name(line);
            if let Some(name) = &current {
                pins.entry(name.clone()).or_insert(false);
            }
        } else {
            current = None;
        }
    }

    pins
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generated(tool: ToolIdentifier) -> Vec<GeneratedFile> {
        TemplateRegistry::builtin().generator(tool)(&GeneratorContext::default())
    }

    fn declared(tool: ToolIdentifier) -> DeclaredDependencies {
        declared_dependencies(tool, &generated(tool)).unwrap()
    }

    fn set(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_builtin_generators_satisfy_contract() {
        let violations = check_all(TemplateRegistry::builtin(), &GeneratorContext::default());
        assert!(violations.is_empty(), "{violations:#?}");
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("Flask_Testing"), "flask-testing");
        assert_eq!(normalize_name("zope.interface"), "zope-interface");
        assert_eq!(normalize_name("a-_.b"), "a-b");
        assert_eq!(normalize_name("Django"), "django");
    }

    #[test]
    fn test_requirement_name() {
        let name = |requirement| requirement_name(requirement);
        assert_eq!(name("uvicorn[standard]>=0.20.0").as_deref(), Some("uvicorn"));
        assert_eq!(
            name("charset-normalizer>=3.3.0").as_deref(),
            Some("charset-normalizer")
        );
        assert_eq!(name("requests==2.31.0").as_deref(), Some("requests"));
        assert_eq!(
            name("typing_extensions ; python_version < '3.8'").as_deref(),
            Some("typing-extensions")
        );
        assert!(requirement_name(">=1.0").is_none());
        assert!(requirement_name("").is_none());
    }

    #[test]
    fn test_python_imports() {
        let source = "import os, sys
import requests as r
from fastapi import FastAPI
    from django.core.management import execute
from . import local
x = 'import nothing'
";
        assert_eq!(
            python_imports(source),
            set(&["django", "fastapi", "os", "requests", "sys"])
        );
    }

    #[test]
    fn test_import_aliases() {
        assert_eq!(distribution_for_import("yaml"), "pyyaml");
        assert_eq!(distribution_for_import("PIL"), "pillow");
        assert_eq!(distribution_for_import("flask"), "flask");
    }

    #[test]
    fn test_declared_dependencies_per_tool() {
        let uv = declared(ToolIdentifier::Uv);
        assert_eq!(uv.production, set(&["click", "pydantic", "requests", "typer"]));
        assert_eq!(uv.development, set(&["black", "mypy", "pytest"]));

        let pdm = declared(ToolIdentifier::Pdm);
        assert!(pdm.development.contains("httpx"));
        assert!(pdm.development.contains("ruff"));

        let poetry = declared(ToolIdentifier::Poetry);
        assert_eq!(poetry.production, set(&["django", "psycopg2-binary", "requests"]));
        assert!(poetry.development.contains("sphinx-rtd-theme"));

        let pipenv = declared(ToolIdentifier::Pipenv);
        assert!(pipenv.production.contains("redis"));
        assert!(pipenv.development.contains("flask-testing"));

        let pip = declared(ToolIdentifier::Pip);
        assert_eq!(pip.production.len(), 12);
        assert!(pip.development.contains("pytest-flask"));

        let pip_tools = declared(ToolIdentifier::PipTools);
        assert!(pip_tools.production.contains("uvicorn"));
        assert!(!pip_tools.development.contains("requirements-in"));
        assert!(pip_tools.contains("pre_commit"));
    }

    #[test]
    fn test_undeclared_import_is_reported() {
        let mut files = generated(ToolIdentifier::Uv);
        files[1].content.push_str("import numpy\n");

        let violations = check(ToolIdentifier::Uv, &files);

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].clause, Clause::ImportsDeclared);
        assert!(violations[0].message.contains("numpy"));
    }

    #[test]
    fn test_missing_manifest_is_reported() {
        let files: Vec<_> = generated(ToolIdentifier::Pipenv)
            .into_iter()
            .filter(|f| f.role != FileRole::Manifest)
            .collect();

        let violations = check(ToolIdentifier::Pipenv, &files);

        assert_eq!(violations[0].clause, Clause::SingleManifest);
    }

    #[test]
    fn test_invalid_toml_is_reported() {
        let mut files = generated(ToolIdentifier::Poetry);
        files[0].content = "[tool.poetry\nname = ".to_string();

        let violations = check(ToolIdentifier::Poetry, &files);

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].clause, Clause::Syntax);
        assert!(violations[0].message.contains("pyproject.toml"));
    }

    #[test]
    fn test_unparseable_requirement_is_typed_error() {
        let mut files = generated(ToolIdentifier::Pip);
        files[1].content.push_str(">=1.0\n");

        let err = declared_dependencies(ToolIdentifier::Pip, &files).unwrap_err();

        match err {
            FixtureError::Manifest { path, message } => {
                assert_eq!(path, files[1].path);
                assert!(message.contains("not a requirement"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_dev_group_is_reported() {
        let files: Vec<_> = generated(ToolIdentifier::Pip)
            .into_iter()
            .filter(|f| f.role != FileRole::DevRequirements)
            .collect();

        let violations = check(ToolIdentifier::Pip, &files);

        assert!(violations
            .iter()
            .any(|v| v.clause == Clause::DependencyGroups && v.message.contains("development")));
    }

    #[test]
    fn test_lock_without_provenance_is_reported() {
        let mut files = generated(ToolIdentifier::PipTools);
        let lock = files.iter_mut().find(|f| f.role == FileRole::LockFile).unwrap();
        lock.content = lock.content.replace("fastapi==0.110.0\n    # via -r requirements.in\n", "");

        let violations = check(ToolIdentifier::PipTools, &files);

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].clause, Clause::CrossReference);
        assert!(violations[0].message.contains("fastapi"));
    }

    #[test]
    fn test_setup_py_must_agree_with_requirements() {
        let mut files = generated(ToolIdentifier::Pip);
        let setup = files.iter_mut().find(|f| f.role == FileRole::BuildScript).unwrap();
        setup.content = setup
            .content
            .replace("\"flask>=2.3.0\",", "\"flask>=2.3.0\",\n        \"numpy\",");

        let violations = check(ToolIdentifier::Pip, &files);

        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("numpy"));
    }

    #[test]
    fn test_setup_install_requires() {
        let names = setup_install_requires(crate::templates::pip::SETUP_PY);
        assert_eq!(names, set(&["flask", "requests"]));
    }
}
