use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::Config;
use crate::request::{EnvTool, ScaffoldRequest};

#[derive(Debug, Parser)]
#[command(name = "pax", version, about = "Scaffold new projects and set up their environment")]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create a new project
    #[command(subcommand)]
    New(NewCommand),
    /// Add a dependency to an existing project (not implemented yet)
    Add(DependencyArgs),
    /// Remove a dependency from an existing project (not implemented yet)
    Remove(DependencyArgs),
}

#[derive(Debug, Subcommand)]
pub enum NewCommand {
    /// Create a new Python project
    Pyproject(PyprojectArgs),
    /// Create a new VST plugin project (not implemented yet)
    VstPlugin {
        /// Name of the plugin project
        project_name: String,
        /// Directory to create the project in
        directory: Option<PathBuf>,
    },
}

#[derive(Debug, Args)]
pub struct PyprojectArgs {
    /// Name of the Python project
    pub project_name: String,

    /// Directory to create the project in (default: current directory)
    pub directory: Option<PathBuf>,

    /// Build tool and environment manager
    #[arg(long, value_enum, ignore_case = true)]
    pub env: Option<EnvTool>,

    /// Install pytest as a dev dependency and create a tests directory
    #[arg(long, overrides_with = "no_test")]
    pub test: bool,

    /// Skip pytest and the tests directory
    #[arg(long = "no-test", overrides_with = "test")]
    pub no_test: bool,
}

impl PyprojectArgs {
    /// Merges flags over config defaults. `cwd` fills in a missing directory.
    pub fn into_request(self, cwd: PathBuf, config: &Config, verbose: bool) -> ScaffoldRequest {
        let install_tests = match (self.test, self.no_test) {
            (true, _) => true,
            (_, true) => false,
            _ => config.test,
        };
        ScaffoldRequest {
            project_name: self.project_name,
            target_directory: self.directory.unwrap_or(cwd),
            env: self.env.unwrap_or(config.env),
            install_tests,
            verbose,
        }
    }
}

#[derive(Debug, Args)]
pub struct DependencyArgs {
    /// Name of the package
    pub package_name: String,

    /// Directory of the project (default: current directory)
    pub directory: Option<PathBuf>,

    /// Treat the package as a dev dependency
    #[arg(short, long)]
    pub dev: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pyproject(args: &[&str]) -> (PyprojectArgs, bool) {
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Command::New(NewCommand::Pyproject(p)) => (p, cli.verbose),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn defaults_come_from_config() {
        let (args, verbose) = pyproject(&["pax", "new", "pyproject", "demo"]);
        let config = Config { test: false, env: EnvTool::Poetry, ..Config::default() };
        let req = args.into_request(PathBuf::from("/work"), &config, verbose);
        assert_eq!(req.target_directory, PathBuf::from("/work"));
        assert_eq!(req.env, EnvTool::Poetry);
        assert!(!req.install_tests);
        assert!(!req.verbose);
    }

    #[test]
    fn flags_override_config() {
        let (args, verbose) =
            pyproject(&[
                "pax", "new", "pyproject", "demo", "./out", "--env", "PIPENV", "--test", "-v",
            ]);
        let config = Config { test: false, env: EnvTool::Poetry, ..Config::default() };
        let req = args.into_request(PathBuf::from("/work"), &config, verbose);
        assert_eq!(req.target_directory, PathBuf::from("./out"));
        assert_eq!(req.env, EnvTool::Pipenv);
        assert!(req.install_tests);
        assert!(req.verbose);
    }

    #[test]
    fn last_test_flag_wins() {
        let (args, _) = pyproject(&["pax", "new", "pyproject", "demo", "--test", "--no-test"]);
        assert!(!args.into_request(PathBuf::new(), &Config::default(), false).install_tests);
        let (args, _) = pyproject(&["pax", "new", "pyproject", "demo", "--no-test", "--test"]);
        assert!(args.into_request(PathBuf::new(), &Config::default(), false).install_tests);
    }

    #[test]
    fn unknown_env_is_rejected() {
        let parsed = Cli::try_parse_from(["pax", "new", "pyproject", "demo", "--env", "conda"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn stub_commands_parse() {
        let cli = Cli::try_parse_from(["pax", "add", "requests", "--dev"]).unwrap();
        assert!(matches!(cli.command, Command::Add(DependencyArgs { dev: true, .. })));
        let cli = Cli::try_parse_from(["pax", "new", "vst-plugin", "synth"]).unwrap();
        assert!(matches!(cli.command, Command::New(NewCommand::VstPlugin { .. })));
    }
}
