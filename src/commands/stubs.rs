use anyhow::Result;

use crate::error::ScaffoldError;

/// Commands that are accepted by the parser but do nothing yet.
pub fn run(command: &'static str) -> Result<()> {
    tracing::debug!(command, "stub command invoked");
    Err(ScaffoldError::NotImplemented(command).into())
}
