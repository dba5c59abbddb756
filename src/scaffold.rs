//! The `new pyproject` workflow: check the target, write the template, hand off
//! to the environment tool.
//!
//! Steps run in a fixed order and each must succeed before the next starts.
//! A failure while writing the template removes what was written. A failure in
//! the environment tool leaves the generated tree in place so the user can fix
//! the tool and rerun it by hand.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use colored::Colorize;
use walkdir::WalkDir;

use crate::config::Config;
use crate::env_tool::{self, ToolRunner};
use crate::error::{Result, ScaffoldError};
use crate::request::ScaffoldRequest;
use crate::templates::{self, TemplateContext, TemplateSet};

/// A project that was scaffolded successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPath {
    pub root: PathBuf,
    /// Template files, relative to `root`, sorted.
    pub files: Vec<PathBuf>,
}

pub fn scaffold(
    request: &ScaffoldRequest,
    config: &Config,
    runner: &dyn ToolRunner,
) -> Result<ProjectPath> {
    request.validate()?;
    let root = request.project_path();
    let reuse = check_target(&root)?;

    let python = locate_python(runner)?;
    tracing::debug!(python = %python.display(), "found python");

    let program = request.env.program();
    let located = runner.locate(program).map_err(|e| match e {
        ScaffoldError::EnvironmentTool { program, message } => ScaffoldError::EnvironmentTool {
            message: format!("{message}; install it from {}", request.env.homepage()),
            program,
        },
        other => other,
    })?;
    tracing::debug!(tool = %located.display(), "found environment tool");

    let set = templates::render(&TemplateContext::new(request, config));
    if !reuse {
        create_root(&root)?;
    }
    if let Err(e) = write_template(&root, &set) {
        rollback(&root, reuse);
        return Err(e);
    }
    let files = list_files(&root);
    println!("{} {}", "Project structure created at".green(), root.display());

    let init = env_tool::init_command(request.env, &root);
    println!("Creating virtual environment with {}...", program.purple());
    run_tool(runner, &init, &root)?;
    println!("Created virtual environment with {}.", program.purple());

    if request.install_tests {
        let dev = env_tool::test_dependency_command(request.env, &root);
        println!("Installing dev dependency {} with {}...", "pytest".yellow(), program.purple());
        run_tool(runner, &dev, &root)?;
        println!("Installed dev dependency {} with {}.", "pytest".yellow(), program.purple());
    }

    Ok(ProjectPath { root, files })
}

/// Interpreters tried in order for the Python preflight.
const PYTHON_PROGRAMS: [&str; 2] = ["python", "python3"];

fn locate_python(runner: &dyn ToolRunner) -> Result<PathBuf> {
    PYTHON_PROGRAMS.iter().find_map(|program| runner.locate(program).ok()).ok_or_else(|| {
        ScaffoldError::EnvironmentTool {
            program: "python".to_string(),
            message: "not found on PATH (tried python, python3); \
                      install it from https://www.python.org/downloads/"
                .to_string(),
        }
    })
}

/// Returns `true` when `root` is an existing empty directory that will be reused.
///
/// Symlinks are not followed: any entry at `root` other than a real empty
/// directory is a conflict, dangling links included.
fn check_target(root: &Path) -> Result<bool> {
    let meta = match fs::symlink_metadata(root) {
        Ok(meta) => meta,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %root.display(), "project path is available");
            return Ok(false);
        }
        Err(e) => {
            return Err(ScaffoldError::io(format!("failed to inspect {}", root.display()), e));
        }
    };
    if !meta.is_dir() {
        return Err(ScaffoldError::PathConflict { path: root.to_path_buf() });
    }
    let mut entries = fs::read_dir(root)
        .map_err(|e| ScaffoldError::io(format!("failed to read {}", root.display()), e))?;
    if entries.next().is_some() {
        return Err(ScaffoldError::PathConflict { path: root.to_path_buf() });
    }
    tracing::debug!(path = %root.display(), "reusing empty directory");
    Ok(true)
}

/// Creates the project directory itself. Only parents may already exist, so
/// whatever is found at `root` afterwards belongs to this run.
fn create_root(root: &Path) -> Result<()> {
    if let Some(parent) = root.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| ScaffoldError::io(format!("failed to create {}", parent.display()), e))?;
    }
    fs::create_dir(root).map_err(|e| match e.kind() {
        io::ErrorKind::AlreadyExists => ScaffoldError::PathConflict { path: root.to_path_buf() },
        _ => ScaffoldError::io(format!("failed to create {}", root.display()), e),
    })
}

fn write_template(root: &Path, set: &TemplateSet) -> Result<()> {
    for dir in &set.dirs {
        let path = root.join(dir);
        fs::create_dir_all(&path)
            .map_err(|e| ScaffoldError::io(format!("failed to create {}", path.display()), e))?;
        tracing::debug!(dir = %dir.display(), "created directory");
    }
    for file in &set.files {
        let path = root.join(&file.path);
        fs::write(&path, &file.contents)
            .map_err(|e| ScaffoldError::io(format!("failed to write {}", path.display()), e))?;
        if file.executable {
            make_executable(&path)?;
        }
        tracing::debug!(file = %file.path.display(), "wrote file");
    }
    Ok(())
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
        .map_err(|e| ScaffoldError::io(format!("failed to make {} executable", path.display()), e))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}

fn rollback(root: &Path, reuse: bool) {
    let result = if reuse {
        fs::read_dir(root).and_then(|entries| {
            entries.filter_map(std::result::Result::ok).try_for_each(|entry| {
                let path = entry.path();
                if path.is_dir() { fs::remove_dir_all(&path) } else { fs::remove_file(&path) }
            })
        })
    } else {
        fs::remove_dir_all(root)
    };
    match result {
        Ok(()) => tracing::debug!(path = %root.display(), "rolled back partial project"),
        Err(e) => tracing::warn!(path = %root.display(), error = %e, "rollback failed"),
    }
}

fn run_tool(
    runner: &dyn ToolRunner,
    invocation: &env_tool::ToolInvocation,
    root: &Path,
) -> Result<()> {
    tracing::debug!(cmd = %invocation.command_line(), "running environment tool");
    match runner.run(invocation) {
        Ok(out) => {
            for line in out.stdout.lines() {
                tracing::debug!(target: "pax::tool", "{line}");
            }
            Ok(())
        }
        Err(ScaffoldError::EnvironmentTool { program, message }) => {
            Err(ScaffoldError::EnvironmentTool {
                program,
                message: format!(
                    "{message}\nthe project files were left in {}; \
                     rerun `{}` there once the problem is fixed",
                    root.display(),
                    invocation.command_line()
                ),
            })
        }
        Err(other) => Err(other),
    }
}

fn list_files(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| e.path().strip_prefix(root).ok().map(Path::to_path_buf))
        .collect();
    files.sort();
    files
}
