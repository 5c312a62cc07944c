//! # Actor Framework
//!
//! Building blocks for type-safe, concurrent resource actors on Tokio, with an
//! all-or-nothing *scope* protocol layered on top of plain CRUD.
//!
//! ## Architecture Overview
//!
//! 1. **Entity Layer** ([`ActorEntity`]) - the domain model and its hooks
//! 2. **Runtime Layer** ([`ResourceActor`]) - one task that owns the store and
//!    processes requests sequentially
//! 3. **Interface Layer** ([`ResourceClient`], [`Scope`]) - cloneable handles that turn
//!    method calls into messages
//!
//! ## Scopes
//!
//! A scope is a unit of work over the whole collection:
//!
//! ```text
//! let scope = client.begin().await?;          // waits for any other scope to close
//! let rows = scope.scan(|o| o.is_open()).await?;
//! scope.stage(ids, Update::Close).await?;     // staged on working copies
//! scope.commit().await?;                      // published together
//! ```
//!
//! The actor grants one scope at a time and holds back competing writes until it
//! closes, so a read-then-write inside one scope cannot interleave with another
//! caller's. Staged writes are invisible outside the scope until commit; a rollback,
//! or simply dropping the [`Scope`] guard, discards them.
//!
//! ## Context Injection
//!
//! Dependencies are injected when the actor is started via `run(context)`, not when it
//! is constructed. An order actor can therefore be handed the client of a product
//! actor that was created just before it.
//!
//! ## Testing
//!
//! [`mock::MockClient`] answers requests from scripted expectations, including every
//! step of the scope protocol, so callers can be tested against failures at any point.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;
pub mod scope;

// Re-export core types for convenience
pub use actor::ResourceActor;
pub use client::ResourceClient;
pub use client_trait::ActorClient;
pub use entity::ActorEntity;
pub use error::FrameworkError;
pub use message::{Filter, ResourceRequest, Response, ScopeId};
pub use scope::Scope;
