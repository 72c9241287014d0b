use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppError {
    #[error("invalid_input - {0}")]
    InvalidInput(String),
    #[error("invalid_data - {0}")]
    InvalidData(String),
    #[error("io_error - {0}")]
    Io(String),
    #[error("auth_failed - {0}")]
    AuthFailed(String),
    #[error("unauthenticated - {0}")]
    Unauthenticated(String),
    #[error("cancelled - {0}")]
    Cancelled(String),
}

impl AppError {
    pub fn invalid_input<M: Into<String>>(message: M) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn invalid_data<M: Into<String>>(message: M) -> Self {
        Self::InvalidData(message.into())
    }

    pub fn io<M: Into<String>>(message: M) -> Self {
        Self::Io(message.into())
    }

    pub fn auth_failed<M: Into<String>>(message: M) -> Self {
        Self::AuthFailed(message.into())
    }

    pub fn unauthenticated<M: Into<String>>(message: M) -> Self {
        Self::Unauthenticated(message.into())
    }

    pub fn cancelled<M: Into<String>>(message: M) -> Self {
        Self::Cancelled(message.into())
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::InvalidData(_) => "invalid_data",
            Self::Io(_) => "io_error",
            Self::AuthFailed(_) => "auth_failed",
            Self::Unauthenticated(_) => "unauthenticated",
            Self::Cancelled(_) => "cancelled",
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::InvalidInput(message)
            | Self::InvalidData(message)
            | Self::Io(message)
            | Self::AuthFailed(message)
            | Self::Unauthenticated(message)
            | Self::Cancelled(message) => message,
        }
    }
}
