use thiserror::Error;

/// Errors that can occur while serving the memory bank.
#[derive(Error, Debug)]
pub enum MembankError {
    #[error("config error: {message}")]
    Config { message: String },

    #[error("failed to spawn bridge process: {message}")]
    BridgeSpawn { message: String },

    #[error("bridge process failed: {stderr}")]
    BridgeExecution { stderr: String },

    #[error("bridge returned invalid JSON: {output}")]
    BridgeProtocol { output: String },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias for results using `MembankError`.
pub type Result<T> = std::result::Result<T, MembankError>;
