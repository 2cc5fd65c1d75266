//! Error taxonomy for graph operations.

use thiserror::Error;

/// Error type for every graph operation.
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Neo4j unreachable: {0}")]
    Connectivity(String),

    #[error("Statement failed: {0}")]
    Statement(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Graph procedure unavailable: {0}")]
    ProcedureUnavailable(String),

    #[error("Invalid schema identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Unexpected row shape: {0}")]
    Decode(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for graph operations.
pub type GraphResult<T> = Result<T, GraphError>;

impl GraphError {
    /// Create a not-found error.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    /// Create a validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Sort a server failure into the taxonomy by its `Neo.*` status code.
    pub fn from_status(code: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        if code.ends_with("Procedure.ProcedureNotFound") {
            Self::ProcedureUnavailable(message)
        } else if code.starts_with("Neo.ClientError.Security.") {
            Self::Connectivity(message)
        } else {
            Self::Statement(message)
        }
    }

    /// Sort an untyped failure message into the taxonomy.
    ///
    /// A message carrying a `Neo.*` status code is classified by that code
    /// alone. Without one, only transport and authentication wording maps to
    /// `Connectivity`.
    pub fn classify(message: impl Into<String>) -> Self {
        let message = message.into();
        if let Some(code) = status_code(&message) {
            let code = code.to_string();
            return Self::from_status(&code, message);
        }

        let lower = message.to_lowercase();
        if lower.contains("there is no procedure") {
            Self::ProcedureUnavailable(message)
        } else if lower.starts_with("io error")
            || lower.starts_with("an io error")
            || lower.contains("connection refused")
            || lower.contains("connection reset")
            || lower == "connection error"
        {
            Self::Connectivity(message)
        } else {
            Self::Statement(message)
        }
    }
}

/// First `Neo.<Class>.<Category>.<Title>` token in a message.
fn status_code(message: &str) -> Option<&str> {
    message
        .split(|c: char| c.is_whitespace() || matches!(c, '`' | ':' | '\'' | '"' | '(' | ')' | ','))
        .find(|token| token.starts_with("Neo.") && token.split('.').count() == 4)
}
