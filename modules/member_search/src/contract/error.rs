use thiserror::Error;

/// Errors that are safe to expose to other modules
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MemberSearchError {
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Backend unavailable: {message}")]
    BackendUnavailable { message: String },

    #[error("Backend rejected query ({context}): {message}")]
    BackendQueryError { context: String, message: String },
}

impl MemberSearchError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }
}

impl From<crate::domain::error::DomainError> for MemberSearchError {
    fn from(domain_error: crate::domain::error::DomainError) -> Self {
        use crate::domain::error::DomainError::*;
        match domain_error {
            InvalidArgument { field, message } => {
                Self::invalid_argument(format!("{field}: {message}"))
            }
            MemberNotFound { id } => Self::not_found(format!("member {id}")),
            TeamNotFound { id } => Self::not_found(format!("team {id}")),
            BackendUnavailable { context, message } => Self::BackendUnavailable {
                message: format!("{context}: {message}"),
            },
            BackendQuery { context, message } => Self::BackendQueryError { context, message },
        }
    }
}
