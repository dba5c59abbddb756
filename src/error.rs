use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Everything that can stop a scaffold run.
#[derive(Debug, Error)]
pub enum ScaffoldError {
    #[error("{0}")]
    InvalidArgument(String),

    #[error(
        "'{}' already exists and is not empty, choose a different name or directory",
        .path.display()
    )]
    PathConflict { path: PathBuf },

    #[error("{program}: {message}")]
    EnvironmentTool { program: String, message: String },

    #[error("`{0}` is not implemented yet")]
    NotImplemented(&'static str),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
}

impl ScaffoldError {
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io { context: context.into(), source }
    }

    /// Process exit status reported for this error.
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Io { .. } => 1,
            Self::InvalidArgument(_) => 2,
            Self::PathConflict { .. } => 3,
            Self::EnvironmentTool { .. } => 4,
            Self::NotImplemented(_) => 5,
        }
    }
}

pub type Result<T, E = ScaffoldError> = std::result::Result<T, E>;
