//! Integration tests for fixture project generation

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use sbom_fixtures::batch::{self, BatchOptions};
use sbom_fixtures::contract;
use sbom_fixtures::{
    materialize, FailureKind, GeneratorContext, MaterializeOptions, ProjectSpec, TemplateRegistry,
    ToolIdentifier,
};
use tempfile::TempDir;
use walkdir::WalkDir;

/// Files each tool's project must contain, and nothing else
fn expected_files(tool: ToolIdentifier) -> &'static [&'static str] {
    match tool {
        ToolIdentifier::Uv => &["pyproject.toml", "main.py"],
        ToolIdentifier::Pdm => &["pyproject.toml", "app.py"],
        ToolIdentifier::Poetry => &["pyproject.toml", "README.md", "manage.py"],
        ToolIdentifier::Pipenv => &["Pipfile", "app.py"],
        ToolIdentifier::Pip => &[
            "requirements.txt",
            "requirements-dev.txt",
            "setup.py",
            "server.py",
        ],
        ToolIdentifier::PipTools => &[
            "requirements.in",
            "requirements-dev.in",
            "requirements.txt",
            "api.py",
        ],
    }
}

/// Relative paths of every regular file under `dir`
fn files_on_disk(dir: &Path) -> BTreeSet<String> {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| {
            entry
                .path()
                .strip_prefix(dir)
                .unwrap()
                .to_string_lossy()
                .replace('\\', "/")
        })
        .collect()
}

/// Names of the directories directly under `dir`
fn directories(dir: &Path) -> BTreeSet<String> {
    fs::read_dir(dir)
        .unwrap()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().unwrap().is_dir())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect()
}

fn tools(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| (*s).to_string()).collect()
}

/// Every tool materializes exactly its listed file set
#[test]
fn test_each_tool_writes_exact_file_set() {
    let temp_dir = TempDir::new().unwrap();

    for tool in ToolIdentifier::ALL {
        let spec = ProjectSpec::for_tool(tool.as_str(), temp_dir.path());
        let options = MaterializeOptions::default();
        let result = materialize(&spec, TemplateRegistry::builtin(), &options);

        assert!(result.succeeded(), "{tool}: {:?}", result.failure);

        let reported: Vec<_> = result
            .written_paths()
            .map(|p| p.to_string_lossy().into_owned())
            .collect();
        assert_eq!(reported, expected_files(tool), "{tool} reported files");

        let on_disk = files_on_disk(&spec.project_dir());
        let expected: BTreeSet<String> = expected_files(tool)
            .iter()
            .map(|s| (*s).to_string())
            .collect();
        assert_eq!(on_disk, expected, "{tool} files on disk");
    }
}

/// Materializing twice yields byte-identical trees
#[test]
fn test_rematerialization_is_byte_identical() {
    let temp_dir = TempDir::new().unwrap();
    let options = BatchOptions::new(temp_dir.path());

    batch::run(&[], &options);
    let first: Vec<_> = ToolIdentifier::ALL
        .iter()
        .flat_map(|tool| {
            let dir = temp_dir.path().join(tool.project_name());
            expected_files(*tool)
                .iter()
                .map(move |f| fs::read(dir.join(f)).unwrap())
        })
        .collect();

    let summary = batch::run(&[], &options);
    assert!(summary.all_succeeded());
    assert!(summary
        .results
        .iter()
        .flat_map(|r| &r.files)
        .all(|f| f.status == sbom_fixtures::WriteStatus::Unchanged));

    let second: Vec<_> = ToolIdentifier::ALL
        .iter()
        .flat_map(|tool| {
            let dir = temp_dir.path().join(tool.project_name());
            expected_files(*tool)
                .iter()
                .map(move |f| fs::read(dir.join(f)).unwrap())
        })
        .collect();

    assert_eq!(first, second);
}

/// Changing the Python version only rewrites the pip-tools lock header
#[test]
fn test_python_version_only_touches_lock_header() {
    let temp_dir = TempDir::new().unwrap();
    let mut options = BatchOptions::new(temp_dir.path());

    batch::run(&tools(&["pip-tools"]), &options);
    let lock_path = temp_dir.path().join("test-pip-tools-project/requirements.txt");
    let before = fs::read_to_string(&lock_path).unwrap();

    options.context = GeneratorContext {
        python_version: "3.9".to_string(),
    };
    let summary = batch::run(&tools(&["pip-tools"]), &options);
    let after = fs::read_to_string(&lock_path).unwrap();

    let changed: Vec<_> = before.lines().zip(after.lines()).filter(|(a, b)| a != b).collect();
    assert_eq!(changed.len(), 1);
    assert!(changed[0].1.ends_with("Python 3.9"));

    let updated: Vec<_> = summary.results[0]
        .files
        .iter()
        .filter(|f| f.status == sbom_fixtures::WriteStatus::Updated)
        .map(|f| f.path.to_string_lossy().into_owned())
        .collect();
    assert_eq!(updated, ["requirements.txt"]);
}

/// Imports in the written sources are declared in the written manifests
#[test]
fn test_written_projects_satisfy_contract() {
    let temp_dir = TempDir::new().unwrap();
    let ctx = GeneratorContext::default();
    batch::run(&[], &BatchOptions::new(temp_dir.path()));

    for tool in ToolIdentifier::ALL {
        let dir = temp_dir.path().join(tool.project_name());
        let files: Vec<_> = TemplateRegistry::builtin().generator(tool)(&ctx)
            .into_iter()
            .map(|mut file| {
                file.content = fs::read_to_string(dir.join(&file.path)).unwrap();
                file
            })
            .collect();

        let declared = contract::declared_dependencies(tool, &files).unwrap();
        for source in files.iter().filter(|f| f.role == sbom_fixtures::FileRole::Source) {
            for module in contract::python_imports(&source.content) {
                if ["os", "sys"].contains(&module.as_str()) {
                    continue;
                }
                assert!(
                    declared.production.contains(&contract::distribution_for_import(&module)),
                    "{tool}: {module} imported by {} is undeclared",
                    source.path.display()
                );
            }
        }

        assert!(contract::check(tool, &files).is_empty(), "{tool} violates the contract");
    }
}

/// Unknown tools are reported and leave no directory behind
#[test]
fn test_unknown_tool_is_skipped() {
    let temp_dir = TempDir::new().unwrap();

    let summary = batch::run(&tools(&["conda"]), &BatchOptions::new(temp_dir.path()));

    assert_eq!(summary.succeeded(), 0);
    assert_eq!(summary.attempted(), 1);
    assert_eq!(
        summary.results[0].failure.as_ref().unwrap().kind,
        FailureKind::UnknownTool
    );
    assert!(!temp_dir.path().join("test-conda-project").exists());
    assert!(directories(temp_dir.path()).is_empty());
}

/// A run without arguments creates all six projects
#[test]
fn test_default_batch_creates_six_projects() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("test-projects");

    let summary = batch::run(&[], &BatchOptions::new(&root));

    assert_eq!(summary.succeeded(), 6);
    assert_eq!(summary.attempted(), 6);
    let expected: BTreeSet<String> = [
        "test-uv-project",
        "test-pdm-project",
        "test-poetry-project",
        "test-pipenv-project",
        "test-pip-project",
        "test-pip-tools-project",
    ]
    .iter()
    .map(|s| (*s).to_string())
    .collect();
    assert_eq!(directories(&root), expected);
}

/// A mixed request skips the invalid tool and keeps going
#[test]
fn test_mixed_batch_reports_partial_success() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("test-projects");

    let summary = batch::run(&tools(&["uv", "bogus", "poetry"]), &BatchOptions::new(&root));

    assert_eq!(summary.succeeded(), 2);
    assert_eq!(summary.attempted(), 3);
    let expected: BTreeSet<String> = ["test-uv-project", "test-poetry-project"]
        .iter()
        .map(|s| (*s).to_string())
        .collect();
    assert_eq!(directories(&root), expected);
}

/// The pinned pip-tools lock parses as requirement lines
#[test]
fn test_pip_tools_lock_pins_direct_requirements() {
    let temp_dir = TempDir::new().unwrap();
    batch::run(&tools(&["pip-tools"]), &BatchOptions::new(temp_dir.path()));

    let lock_path = temp_dir.path().join("test-pip-tools-project/requirements.txt");
    let lock = fs::read_to_string(lock_path).unwrap();
    let pinned: BTreeSet<String> = lock
        .lines()
        .filter(|line| line.contains("=="))
        .filter_map(contract::requirement_name)
        .collect();

    for direct in ["alembic", "fastapi", "pydantic", "requests", "sqlalchemy", "uvicorn"] {
        assert!(pinned.contains(direct), "{direct} is not pinned");
    }
}
