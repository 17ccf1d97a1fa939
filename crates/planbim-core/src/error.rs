use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum BuildError {
    /// Nothing usable came out of the reader. Single bad entities never end
    /// up here; they are skipped.
    #[error("empty or unreadable input: {reason}")]
    EmptyOrUnreadableInput { reason: String },

    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl BuildError {
    pub fn empty(reason: impl Into<String>) -> Self {
        BuildError::EmptyOrUnreadableInput {
            reason: reason.into(),
        }
    }

    pub fn invalid_config(reason: impl Into<String>) -> Self {
        BuildError::InvalidConfig {
            reason: reason.into(),
        }
    }
}

pub type BuildResult<T> = Result<T, BuildError>;
