//! Error types for `ModpackCore`

use std::path::PathBuf;

use thiserror::Error;

/// The error type for modpack engine operations.
///
/// Every variant renders a message that can be shown to the user as-is.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory traversal error.
    #[error("directory walk error: {0}")]
    WalkDirError(String),

    /// Invalid file path.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    // ==================== Settings Errors ====================
    /// Unknown settings key passed to [`crate::settings::Settings::set`].
    #[error("unknown setting '{key}'")]
    UnknownSetting {
        /// The key that was not recognised.
        key: String,
    },

    /// A settings value could not be parsed for its key.
    #[error("invalid value '{value}' for setting '{key}': {message}")]
    InvalidSetting {
        /// The settings key.
        key: String,
        /// The rejected value.
        value: String,
        /// What was expected.
        message: String,
    },

    /// No platform directory could be determined for the settings folder.
    #[error("could not determine the settings folder for this platform")]
    SettingsDirNotFound,

    // ==================== Registry Errors ====================
    /// The modpack name is not present in the registry.
    #[error("modpack not found in registry: {0}")]
    ModpackNotFound(String),

    /// The registry entry has an empty URL.
    #[error("invalid modpack URL for '{name}'")]
    ModpackUrlMissing {
        /// The modpack name.
        name: String,
    },

    /// The requested branch is not listed for the modpack.
    #[error("branch '{branch}' is not available for {modpack} (available: {available})")]
    BranchNotAvailable {
        /// The modpack name.
        modpack: String,
        /// The requested branch.
        branch: String,
        /// Comma-separated list of known branches.
        available: String,
    },

    // ==================== Selection Errors ====================
    /// No preset with this name exists.
    #[error("preset '{name}' not found")]
    PresetNotFound {
        /// The preset name.
        name: String,
    },

    /// Preset names must contain a visible character.
    #[error("preset name must not be empty")]
    EmptyPresetName,

    // ==================== Fetch Errors ====================
    /// Destination already exists and no forced update was requested.
    #[error("modpack folder '{path}' already exists; enable force update to overwrite")]
    DestinationExists {
        /// The existing destination.
        path: PathBuf,
    },

    /// A Git command exited with a non-zero status.
    #[error("git {command} failed: {message}")]
    Git {
        /// The git subcommand and arguments.
        command: String,
        /// stderr (or stdout) of the failed command.
        message: String,
    },

    /// The `git` executable could not be started.
    #[error("git is not installed or not on PATH")]
    GitNotFound,

    /// The path is not a Git working tree.
    #[error("invalid repository path: {path}")]
    NotARepository {
        /// The offending path.
        path: PathBuf,
    },

    /// The server answered with a non-success status.
    #[error("download failed: HTTP status {status}")]
    HttpStatus {
        /// The HTTP status code.
        status: u16,
    },

    /// Transport-level HTTP error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Fewer bytes arrived than the server announced.
    #[error("file download failed: incomplete file ({downloaded} of {expected} bytes)")]
    IncompleteDownload {
        /// Bytes written.
        downloaded: u64,
        /// Content-Length announced by the server.
        expected: u64,
    },

    /// The fetch reported success but left nothing behind.
    #[error("download succeeded but the folder {path} is empty")]
    EmptyDestination {
        /// The empty destination.
        path: PathBuf,
    },

    /// Zip or tar archive could not be read.
    #[error("archive error: {0}")]
    Archive(String),

    /// An archive entry would be written outside the destination.
    #[error("archive entry escapes destination: {0}")]
    UnsafeArchiveEntry(String),

    /// The operation was cancelled through its cancellation flag.
    #[error("operation cancelled")]
    Cancelled,

    // ==================== Install Errors ====================
    /// The modpack has not been downloaded yet.
    #[error("modpack {path} does not exist; please download it first")]
    ModpackNotDownloaded {
        /// Expected modpack directory.
        path: PathBuf,
    },

    /// The modpack has no `Mods` directory.
    #[error("Mods folder not found in the modpack: {path}; please force download and try again")]
    ModsFolderMissing {
        /// Expected `Mods` directory.
        path: PathBuf,
    },

    /// Nothing is installed at the mods directory.
    #[error("no modpack found to uninstall at {path}")]
    NothingToUninstall {
        /// The configured mods directory.
        path: PathBuf,
    },

    // ==================== Backup Errors ====================
    /// The game save file does not exist.
    #[error("save file not found: {path}")]
    SaveFileMissing {
        /// Expected save path.
        path: PathBuf,
    },

    /// A named backup does not exist.
    #[error("backup not found: {name}")]
    BackupNotFound {
        /// The backup file name.
        name: String,
    },

    // ==================== Time Travel Errors ====================
    /// No commit subject matched the requested version.
    #[error("no commit found with version: {0}")]
    CommitNotFound(String),

    /// The version pattern is not a valid regular expression.
    #[error("invalid version pattern '{pattern}': {message}")]
    InvalidPattern {
        /// The user-supplied pattern.
        pattern: String,
        /// The regex error.
        message: String,
    },

    // ==================== Game Errors ====================
    /// The game executable could not be found.
    #[error("game executable not found: {path}")]
    GameExecutableMissing {
        /// Expected executable path.
        path: PathBuf,
    },

    /// The Lovely injector is not present in the game directory.
    #[error("Lovely Injector is required to play the modded game; install it first")]
    InjectorMissing,

    /// The current OS or architecture is not supported for this operation.
    #[error("unsupported platform: {0}")]
    UnsupportedPlatform(String),

    /// Files expected after extraction are missing.
    #[error("missing files after extraction: {0}")]
    MissingExtractedFiles(String),

    // ==================== Parsing Errors ====================
    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// A version string could not be parsed.
    #[error("invalid version '{0}'")]
    InvalidVersion(String),
}

impl Error {
    /// Whether this error came from a Git command.
    ///
    /// Git failures and generic failures are the two categories front-ends
    /// distinguish when reporting.
    pub fn is_git(&self) -> bool {
        matches!(
            self,
            Error::Git { .. } | Error::GitNotFound | Error::NotARepository { .. }
        )
    }
}

impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Self {
        Error::WalkDirError(err.to_string())
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::Archive(err.to_string())
    }
}

/// A specialized Result type for `ModpackCore` operations.
pub type Result<T> = std::result::Result<T, Error>;
