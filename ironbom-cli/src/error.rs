//! CLI-specific error types and exit code mapping

use ironbom_core::error::IronbomError;
use ironbom_sbom_loader::SbomLoaderError;

/// CLI-specific error type.
///
/// The `exit_code()` method maps errors to process exit codes.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),

    /// A subcommand-specific operation failed.
    #[error("{0}")]
    Command(String),

    /// An explicitly named input, ignore file or suppression file could not be loaded.
    #[error("load error: {0}")]
    Load(String),

    /// JSON serialisation failed during output rendering.
    #[error("json output error: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    /// IO error (stdout write, etc.).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map the error to a process exit code.
    ///
    /// | Code | Meaning                               |
    /// |------|---------------------------------------|
    /// | 0    | Success                               |
    /// | 1    | General / command error               |
    /// | 2    | Configuration error                   |
    /// | 4    | Load failure of an explicit target    |
    /// | 10   | IO error                              |
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            Self::Load(_) => 4,
            Self::Io(_) => 10,
            Self::JsonSerialize(_) | Self::Command(_) => 1,
        }
    }
}

impl From<IronbomError> for CliError {
    fn from(e: IronbomError) -> Self {
        match e {
            IronbomError::Config(_) => Self::Config(e.to_string()),
            IronbomError::Io(io) => Self::Io(io),
            other => Self::Load(other.to_string()),
        }
    }
}

impl From<SbomLoaderError> for CliError {
    fn from(e: SbomLoaderError) -> Self {
        match e {
            SbomLoaderError::Config { .. } => Self::Config(e.to_string()),
            other => Self::Load(other.to_string()),
        }
    }
}
