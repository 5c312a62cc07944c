//! # Robot Dispatch
//!
//! Assigns delivery robots the most valuable set of pending shipment orders that fits
//! their weight capacity, and guarantees that concurrent planning calls never assign
//! the same order twice.
//!
//! ## Module Tour
//!
//! ### 1. Selection ([`selection`])
//! The 0/1 knapsack at the heart of planning. Pure and synchronous.
//! - **Key items**: [`OrderSelector`](selection::OrderSelector),
//!   [`ExhaustiveSearch`](selection::ExhaustiveSearch),
//!   [`TabulatedDp`](selection::TabulatedDp), [`CancelToken`](selection::CancelToken).
//!
//! ### 2. Coordination ([`coordinator`])
//! One planning call as one transaction: fetch, select, mark `Delivering`, commit,
//! all under a deadline.
//! - **Key items**: [`DeliveryCoordinator`](coordinator::DeliveryCoordinator),
//!   [`PlanningError`](coordinator::PlanningError).
//!
//! ### 3. The Actors ([`product_actor`], [`order_actor`])
//! The product catalog and the order pool, each an
//! [`ActorEntity`](actor_framework::ActorEntity) run by a generic
//! [`ResourceActor`](actor_framework::ResourceActor).
//!
//! ### 4. The Interface ([`clients`])
//! Domain-specific wrappers around `ResourceClient`, including
//! [`OrderScope`](clients::OrderScope), the transaction planning runs in.
//!
//! ### 5. The Orchestrator ([`lifecycle`])
//! Spins up the actors, wires them together and shuts them down.
//! - **Key items**: [`DispatchSystem`](lifecycle::DispatchSystem),
//!   [`setup_tracing`](lifecycle::setup_tracing).
//!
//! ## Running the Demo
//!
//! ```bash
//! RUST_LOG=info cargo run
//! ```

pub mod clients;
pub mod config;
pub mod coordinator;
pub mod lifecycle;
pub mod model;
pub mod order_actor;
pub mod product_actor;
pub mod selection;
