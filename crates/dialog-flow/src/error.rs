use thiserror::Error;

/// Errors that can occur while turning a log into event streams
#[derive(Debug, Error)]
pub enum FlowError {
    /// An entry breaks a structural invariant of the log
    #[error("Malformed log entry at line {line}: {reason}")]
    MalformedLogEntry { line: usize, reason: String },

    /// An accepted message names an agent that has no timeline lane
    #[error("Unrecognized agent {agent} at line {line}: add it to agents.order")]
    UnrecognizedAgent { agent: String, line: usize },

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Pattern compilation error
    #[error("Regex error: {0}")]
    RegexError(#[from] regex::Error),
}

impl FlowError {
    /// Create a new malformed entry error
    pub fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedLogEntry {
            line,
            reason: reason.into(),
        }
    }

    /// Create a new unrecognized agent error
    pub fn unrecognized_agent(agent: impl Into<String>, line: usize) -> Self {
        Self::UnrecognizedAgent {
            agent: agent.into(),
            line,
        }
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}

/// Result type for flow operations
pub type FlowResult<T> = Result<T, FlowError>;
