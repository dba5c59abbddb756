use std::env;

use anyhow::{Context, Result};
use colored::Colorize;

use crate::cli::PyprojectArgs;
use crate::config::Config;
use crate::env_tool::ToolRunner;
use crate::scaffold;

pub fn pyproject(
    args: PyprojectArgs,
    config: &Config,
    runner: &dyn ToolRunner,
    verbose: bool,
) -> Result<()> {
    let cwd = env::current_dir().context("failed to read the current directory")?;
    let mut request = args.into_request(cwd, config, verbose);
    if let Ok(abs) = std::path::absolute(&request.target_directory) {
        request.target_directory = abs;
    }

    println!("{}", "Creating new Python project...".bold());
    println!("  Project name: {}", request.project_name.blue().bold());
    println!("  Directory:    {}", request.target_directory.display().to_string().yellow());
    println!("  Env:          {}", request.env.to_string().purple());
    println!("  Test:         {}", request.install_tests.to_string().green());
    println!();

    let project = scaffold::scaffold(&request, config, runner)?;

    if request.verbose {
        println!();
        println!("Files:");
        for file in &project.files {
            println!("  {}", file.display());
        }
    }

    println!();
    println!(
        "{} Python project {} created at {}",
        "Success:".green().bold(),
        request.project_name.blue().bold(),
        project.root.display().to_string().yellow()
    );
    println!();
    println!("  cd {}", project.root.display());
    println!("  {} run python -m {}", request.env, request.package_name());

    Ok(())
}
