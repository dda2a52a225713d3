//! Error types for portal operations
//!
//! Every failure is shown inline as a notice; none is fatal and none is retried:
//! - Authorization: page visited without the matching logged-in role
//! - Authentication: bad login, session left unchanged
//! - Validation: rejected input, store left unchanged
//! - NotFound: a referenced identity is missing from the store

use serde::Serialize;
use thiserror::Error;

use crate::model::Role;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PortalError {
    #[error("You must login as a {required} to view this page. Go to Login Page.")]
    Authorization { required: Role },

    #[error("Invalid credentials for demo. Use example keys shown in the placeholder text.")]
    Authentication,

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),
}

impl PortalError {
    pub fn validation(message: impl Into<String>) -> Self {
        PortalError::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        PortalError::NotFound(message.into())
    }
}

pub type PortalResult<T> = Result<T, PortalError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

/// A user-facing message shown above the page content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

impl From<&PortalError> for Notice {
    fn from(err: &PortalError) -> Self {
        match err {
            PortalError::Authorization { .. } => Notice::warning(err.to_string()),
            _ => Notice::error(err.to_string()),
        }
    }
}

impl From<PortalError> for Notice {
    fn from(err: PortalError) -> Self {
        Notice::from(&err)
    }
}
