use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use clap::ValueEnum;
use regex::Regex;
use serde::Deserialize;

use crate::error::{Result, ScaffoldError};

static PROJECT_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z][a-zA-Z0-9_-]{0,212}[a-z0-9]$").expect("project name pattern is valid")
});

/// Environment manager that owns the generated project's dependencies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvTool {
    #[default]
    Pipenv,
    Poetry,
}

impl EnvTool {
    pub const fn program(self) -> &'static str {
        match self {
            Self::Pipenv => "pipenv",
            Self::Poetry => "poetry",
        }
    }

    pub const fn homepage(self) -> &'static str {
        match self {
            Self::Pipenv => "https://pipenv.pypa.io/en/latest/",
            Self::Poetry => "https://python-poetry.org/",
        }
    }
}

impl fmt::Display for EnvTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.program())
    }
}

/// Inputs for a single `new pyproject` run, already merged with config defaults.
#[derive(Debug, Clone)]
pub struct ScaffoldRequest {
    pub project_name: String,
    pub target_directory: PathBuf,
    pub env: EnvTool,
    pub install_tests: bool,
    pub verbose: bool,
}

impl ScaffoldRequest {
    pub fn new(project_name: impl Into<String>, target_directory: impl Into<PathBuf>) -> Self {
        Self {
            project_name: project_name.into(),
            target_directory: target_directory.into(),
            env: EnvTool::default(),
            install_tests: true,
            verbose: false,
        }
    }

    pub fn project_path(&self) -> PathBuf {
        self.target_directory.join(&self.project_name)
    }

    pub fn package_name(&self) -> String {
        package_name(&self.project_name)
    }

    /// Checks the name and the parent directory. Does not look at the project path itself.
    pub fn validate(&self) -> Result<()> {
        validate_project_name(&self.project_name)?;
        validate_target_directory(&self.target_directory)
    }
}

pub fn validate_project_name(name: &str) -> Result<()> {
    if PROJECT_NAME.is_match(name) {
        Ok(())
    } else {
        Err(ScaffoldError::InvalidArgument(format!(
            "project name '{name}' is not a valid Python package name \
             (letters, digits, '-' and '_', must start with a letter \
             and end with a lower-case letter or digit)"
        )))
    }
}

/// Import-safe form of a project name.
pub fn package_name(name: &str) -> String {
    name.replace('-', "_")
}

fn validate_target_directory(dir: &Path) -> Result<()> {
    if dir.exists() && !dir.is_dir() {
        return Err(ScaffoldError::InvalidArgument(format!(
            "'{}' is not a directory",
            dir.display()
        )));
    }
    Ok(())
}
