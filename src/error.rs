use std::path::PathBuf;
use std::process::ExitStatus;

/// A precondition of the session is not met. Always raised before any
/// streaming I/O. Messages never contain the ingest url.
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("secrets file {} is missing or unreadable: {source}", .path.display())]
    SecretsUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("secrets file {} does not define {key}", .path.display())]
    IngestUrlUndefined { path: PathBuf, key: &'static str },
    #[error("engine binary {} not found or not executable", .program.display())]
    EngineNotFound { program: PathBuf },
    #[error("producer binary {program} not found or not executable")]
    ProducerNotFound { program: String },
    #[error("no producer command given")]
    EmptyProducer,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error("reset output directory {}: {source}", .path.display())]
    Reset {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("start {what}: {reason:#}")]
    Spawn {
        what: &'static str,
        reason: anyhow::Error,
    },
    #[error("engine failed: {status}")]
    EngineFailure { status: ExitStatus },
    #[error("producer failed: {status}")]
    ProducerFailure { status: ExitStatus },
    #[error("interrupted")]
    Interrupted,
}

impl SessionError {
    pub fn exit_code(&self) -> i32 {
        match self {
            SessionError::Configuration(_) => 2,
            SessionError::Interrupted => 130,
            _ => 1,
        }
    }
}
