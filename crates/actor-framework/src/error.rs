//! # Framework Errors
//!
//! Errors raised by the actor plumbing itself, as opposed to the domain errors each
//! entity defines. Clients map these into their own error types.

use crate::message::ScopeId;

/// Errors that can occur within the actor framework itself.
#[derive(Debug, thiserror::Error)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
    #[error("Item not found: {0}")]
    NotFound(String),
    /// The request named a scope that is not the one currently open.
    #[error("Scope {requested} is not the active scope")]
    ScopeMismatch { requested: ScopeId },
    #[error("No scope is open")]
    NoActiveScope,
    #[error("Entity error: {0}")]
    EntityError(Box<dyn std::error::Error + Send + Sync>),
}
