//! # System Lifecycle & Orchestration
//!
//! Starting, wiring and stopping the actors behind the planner.
//!
//! ## Dependency Injection via Context
//!
//! Actors are constructed without dependencies and receive them when started with
//! `run(context)`. The order actor's context is the product client it validates
//! intake against:
//!
//! ```rust,ignore
//! let (product_actor, product_client) = product_actor::new(32);
//! let (order_actor, order_client) = order_actor::new(32);
//!
//! tokio::spawn(product_actor.run(()));
//! tokio::spawn(order_actor.run(product_client.clone()));
//! ```
//!
//! ## Graceful Shutdown
//!
//! 1. **Drop all clients** - closes the sender side of the channels
//! 2. **Actors detect closure** - `receiver.recv()` returns `None`
//! 3. **Await completion** - wait for every actor task to finish
//!
//! The dependency graph is acyclic (orders -> products), so channel closure alone
//! shuts everything down.

pub mod dispatch_system;
pub mod tracing;

pub use dispatch_system::*;
pub use tracing::*;
