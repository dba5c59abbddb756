pub mod new;
pub mod stubs;

use anyhow::Result;

use crate::cli::{Cli, Command, NewCommand};
use crate::config::Config;
use crate::env_tool::ToolRunner;

/// Dispatches `cli`. The config is only loaded for commands that read it.
pub fn run<F>(cli: Cli, load_config: F, runner: &dyn ToolRunner) -> Result<()>
where
    F: FnOnce() -> crate::Result<Config>,
{
    match cli.command {
        Command::New(NewCommand::Pyproject(args)) => {
            let config = load_config()?;
            new::pyproject(args, &config, runner, cli.verbose)
        }
        Command::New(NewCommand::VstPlugin { .. }) => stubs::run("new vst-plugin"),
        Command::Add(_) => stubs::run("add"),
        Command::Remove(_) => stubs::run("remove"),
    }
}
