use paging_core::PageError;
use thiserror::Error;

/// Domain-specific errors using thiserror
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid argument: {field}: {message}")]
    InvalidArgument { field: String, message: String },

    #[error("Member not found: {id}")]
    MemberNotFound { id: i32 },

    #[error("Team not found: {id}")]
    TeamNotFound { id: i32 },

    /// Connectivity or timeout failure. Never retried here.
    #[error("Backend unavailable during {context}: {message}")]
    BackendUnavailable { context: String, message: String },

    /// The backend rejected the statement; `context` names the query that failed.
    #[error("Backend rejected {context}: {message}")]
    BackendQuery { context: String, message: String },
}

impl DomainError {
    pub fn invalid_argument(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn member_not_found(id: i32) -> Self {
        Self::MemberNotFound { id }
    }

    pub fn team_not_found(id: i32) -> Self {
        Self::TeamNotFound { id }
    }

    pub fn backend_unavailable(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BackendUnavailable {
            context: context.into(),
            message: message.into(),
        }
    }

    pub fn backend_query(context: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BackendQuery {
            context: context.into(),
            message: message.into(),
        }
    }
}

impl From<PageError> for DomainError {
    fn from(e: PageError) -> Self {
        Self::invalid_argument("page", e.to_string())
    }
}
