//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Every variant is a kind the caller can branch on; the payload carries the
/// human-readable detail the presentation layers render. Keep this focused on
/// deterministic business failures plus the single `Persistence` kind the
/// storage layer maps into.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A requested order or product does not exist.
    #[error("not found")]
    NotFound,

    /// A value failed validation (e.g. empty line list, malformed id).
    #[error("validation failed: {0}")]
    Validation(String),

    /// Zero or negative quantity where a positive one is required, or a
    /// negative quantity where a non-negative one is required.
    #[error("invalid quantity: {0}")]
    InvalidQuantity(String),

    /// Applying the requested change would drive stock below zero.
    #[error("insufficient stock (available: {available})")]
    InsufficientStock { available: i64 },

    /// Requested status change is not in the allowed transition table.
    #[error("cannot change status from '{from}' to '{to}'")]
    InvalidTransition { from: String, to: String },

    /// Shipped and delivered orders cannot be cancelled.
    #[error("cannot cancel shipped or delivered orders")]
    CannotCancelShipped,

    /// The order is already cancelled.
    #[error("order is already cancelled")]
    AlreadyCancelled,

    /// A stock adjustment requires a non-blank reason.
    #[error("reason for adjustment is required")]
    MissingReason,

    /// A stock adjustment that would not change the quantity is rejected.
    #[error("no change in quantity")]
    NoChange,

    /// The storage layer failed; the underlying cause is preserved as text.
    #[error("persistence failure: {0}")]
    Persistence(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn invalid_quantity(msg: impl Into<String>) -> Self {
        Self::InvalidQuantity(msg.into())
    }

    pub fn insufficient_stock(available: i64) -> Self {
        Self::InsufficientStock { available }
    }

    pub fn invalid_transition(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::InvalidTransition {
            from: from.into(),
            to: to.into(),
        }
    }

    /// Wrap a storage error, keeping its rendered cause for logging.
    pub fn persistence(cause: impl core::fmt::Display) -> Self {
        Self::Persistence(cause.to_string())
    }
}
