//! Error types for the order pool.

use thiserror::Error;

/// Errors that can occur during order pool operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    /// The requested order was not found.
    #[error("Order not found: {0}")]
    NotFound(String),

    /// The product specified in the order is invalid or does not exist.
    #[error("Invalid product: {0}")]
    InvalidProduct(String),

    /// A scoped operation named a scope that is no longer open.
    #[error("Scope failure: {0}")]
    ScopeFailure(String),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}
