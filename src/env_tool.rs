//! Running the external environment manager (pipenv, poetry).

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{Result, ScaffoldError};
use crate::request::EnvTool;

/// One subprocess call: program, arguments, working directory and extra env vars.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    pub envs: Vec<(String, String)>,
}

impl ToolInvocation {
    fn new(program: &str, args: &[&str], cwd: &Path) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|a| (*a).to_string()).collect(),
            cwd: cwd.to_path_buf(),
            envs: Vec::new(),
        }
    }

    fn env(mut self, key: &str, value: &str) -> Self {
        self.envs.push((key.to_string(), value.to_string()));
        self
    }

    /// Shell-style rendering for log lines.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
}

/// Executes environment-tool commands. Tests swap in a recording fake.
pub trait ToolRunner {
    /// Resolves `program` on the search path.
    fn locate(&self, program: &str) -> Result<PathBuf>;

    /// Runs to completion. A non-zero exit status is an error.
    fn run(&self, invocation: &ToolInvocation) -> Result<ToolOutput>;
}

/// Spawns real processes and waits for them. There is no timeout.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl ToolRunner for SystemRunner {
    fn locate(&self, program: &str) -> Result<PathBuf> {
        which::which(program).map_err(|e| ScaffoldError::EnvironmentTool {
            program: program.to_string(),
            message: format!("not found on PATH ({e})"),
        })
    }

    fn run(&self, invocation: &ToolInvocation) -> Result<ToolOutput> {
        let path = self.locate(&invocation.program)?;
        tracing::debug!(
            cmd = %invocation.command_line(),
            cwd = %invocation.cwd.display(),
            "spawning"
        );

        let output = Command::new(&path)
            .args(&invocation.args)
            .current_dir(&invocation.cwd)
            .envs(invocation.envs.iter().map(|(k, v)| (OsString::from(k), OsString::from(v))))
            .output()
            .map_err(|e| ScaffoldError::EnvironmentTool {
                program: invocation.program.clone(),
                message: format!("failed to start: {e}"),
            })?;

        let out = ToolOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        if !output.status.success() {
            let code = output
                .status
                .code()
                .map_or_else(|| "terminated by signal".to_string(), |c| format!("exit code {c}"));
            let detail = out.stderr.trim();
            let message = if detail.is_empty() {
                format!("`{}` failed ({code})", invocation.command_line())
            } else {
                format!("`{}` failed ({code}):\n{detail}", invocation.command_line())
            };
            return Err(ScaffoldError::EnvironmentTool {
                program: invocation.program.clone(),
                message,
            });
        }

        Ok(out)
    }
}

/// Command that creates the environment for a freshly written project.
pub fn init_command(env: EnvTool, project: &Path) -> ToolInvocation {
    match env {
        EnvTool::Pipenv => pipenv(ToolInvocation::new("pipenv", &["install", "build"], project)),
        EnvTool::Poetry => ToolInvocation::new("poetry", &["install"], project),
    }
}

/// Command that adds pytest as a development dependency.
pub fn test_dependency_command(env: EnvTool, project: &Path) -> ToolInvocation {
    match env {
        EnvTool::Pipenv => {
            pipenv(ToolInvocation::new("pipenv", &["install", "--dev", "pytest"], project))
        }
        EnvTool::Poetry => {
            ToolInvocation::new("poetry", &["add", "--group", "test", "pytest"], project)
        }
    }
}

// Keep the virtualenv inside the project and ignore any active one.
fn pipenv(invocation: ToolInvocation) -> ToolInvocation {
    invocation.env("PIPENV_IGNORE_VIRTUALENVS", "1").env("PIPENV_IN_PROJECT", "1")
}
