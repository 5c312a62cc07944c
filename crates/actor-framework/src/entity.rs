//! # ActorEntity Trait
//!
//! The `ActorEntity` trait is the contract a resource (a catalog product, a shipment
//! order, ...) implements to be managed by the generic [`ResourceActor`](crate::ResourceActor).
//! It names the identifier and DTO types through associated types and exposes async
//! lifecycle hooks that the actor calls while it owns the entity.
//!
//! # Associated Types
//! A `Product` requires a `ProductCreate` payload and an `Order` requires an
//! `OrderCreate`; sending one to the other's actor does not compile.
//!
//! # Hooks
//! - [`ActorEntity::on_create`] runs once after construction, before the entity is stored.
//! - [`ActorEntity::on_update`] runs for direct updates *and* for updates staged inside
//!   a scope. Staged updates are applied to a working copy, so a hook that fails leaves
//!   the committed entity untouched.

use async_trait::async_trait;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait that any resource entity must implement to be managed by ResourceActor.
///
/// # Async & Context
/// The hooks are `#[async_trait]` so they may call other actors. The `Context` type is
/// injected into every hook by `ResourceActor::run`, which allows dependencies to be
/// bound after the actor is constructed (an order actor receives the product client
/// this way).
#[async_trait]
pub trait ActorEntity: Clone + Send + Sync + 'static {
    /// The unique identifier for this entity.
    /// Must be convertible from u32 for automatic ID generation.
    type Id: Eq + Hash + Ord + Clone + Send + Sync + Display + Debug + From<u32>;

    /// The data required to create a new instance.
    type Create: Send + Sync + Debug;

    /// The data required to update an existing instance.
    type Update: Clone + Send + Sync + Debug;

    /// The runtime context (dependencies) injected into the actor.
    /// Use `()` if no dependencies are needed.
    type Context: Send + Sync;

    /// The error type for this entity.
    ///
    /// One error enum per actor rather than one per operation: clients deal with a
    /// single type and match on its variants.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Construct the full entity from the ID and payload.
    /// This is called synchronously before `on_create`.
    fn from_create_params(id: Self::Id, params: Self::Create) -> Result<Self, Self::Error>;

    /// Called after the entity is constructed and before it is stored.
    async fn on_create(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Apply an update to this entity.
    async fn on_update(
        &mut self,
        update: Self::Update,
        _ctx: &Self::Context,
    ) -> Result<(), Self::Error>;
}
