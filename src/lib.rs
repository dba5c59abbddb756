pub mod cli;
pub mod commands;
pub mod config;
pub mod env_tool;
pub mod error;
pub mod request;
pub mod scaffold;
pub mod templates;

pub use error::{Result, ScaffoldError};
pub use request::{EnvTool, ScaffoldRequest};
pub use scaffold::{ProjectPath, scaffold};
