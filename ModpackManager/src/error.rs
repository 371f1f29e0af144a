//! Error types for the application layer

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Core(#[from] modpack_core::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// A download, update or install is already running.
    #[error("another operation is already in progress; wait for it to finish")]
    Busy,

    #[error("no modpack selected and no default modpack configured")]
    NoModpackSelected,

    #[error("'{0}' is not a selectable mod of this modpack")]
    UnknownMod(String),
}

impl Error {
    /// Whether the underlying failure came from Git.
    pub fn is_git(&self) -> bool {
        matches!(self, Error::Core(e) if e.is_git())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
