use thiserror::Error;

#[derive(Error, Debug)]
pub enum MomentumError {
    #[error("Momentum system already shut down: {operation} is not allowed")]
    SystemShutDown { operation: &'static str },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MomentumError {
    /// Misuse of the orchestrator lifecycle is a caller bug, everything else
    /// can be fixed by supplying different input.
    pub fn is_programming_error(&self) -> bool {
        matches!(self, MomentumError::SystemShutDown { .. })
    }
}

pub type Result<T> = std::result::Result<T, MomentumError>;
