//! # Order Actor
//!
//! The order pool: every shipment order and its status. Planning calls read and write
//! it inside a scope (see [`OrderScope`](crate::clients::OrderScope)) so that two
//! robots never see the same order as pending.
//!
//! The actor depends on the product catalog, which is injected as its context:
//!
//! ```rust,ignore
//! let (order_actor, order_client) = order_actor::new(32);
//! tokio::spawn(order_actor.run(product_client.clone()));
//! ```

pub mod entity;
pub mod error;

pub use error::*;

use crate::clients::OrderPoolClient;
use crate::model::Order;
use actor_framework::ResourceActor;

/// Creates a new Order actor and its client.
pub fn new(buffer_size: usize) -> (ResourceActor<Order>, OrderPoolClient) {
    let (actor, generic_client) = ResourceActor::new(buffer_size);
    (actor, OrderPoolClient::new(generic_client))
}
