use crate::model::ProductId;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for Orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OrderId(pub u32);

impl From<u32> for OrderId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "order_{}", self.0)
    }
}

/// Where an order is in its delivery lifecycle.
///
/// Only `PendingShipment` orders are offered to the planner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    PendingShipment,
    Delivering,
    Delivered,
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            OrderStatus::PendingShipment => "pending_shipment",
            OrderStatus::Delivering => "delivering",
            OrderStatus::Delivered => "delivered",
        };
        f.write_str(name)
    }
}

/// A shipment order waiting in, or taken from, the order pool.
///
/// # Actor Framework
/// This struct implements the [`ActorEntity`](actor_framework::ActorEntity) trait,
/// allowing it to be managed by a [`ResourceActor`](actor_framework::ResourceActor).
///
/// `weight` and `value` are copied from the product when the order is placed, so a
/// later catalog change never alters a plan already computed for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub product_id: ProductId,
    pub weight: u32,
    pub value: u32,
    pub status: OrderStatus,
}

impl Order {
    /// Creates a pending order. Used by the selector tests and by `on_create`.
    pub fn new(id: OrderId, product_id: ProductId, weight: u32, value: u32) -> Self {
        Self {
            id,
            product_id,
            weight,
            value,
            status: OrderStatus::PendingShipment,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == OrderStatus::PendingShipment
    }
}

/// Payload for placing a new order.
#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub product_id: ProductId,
}

/// Payload for moving an order to another status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct OrderUpdate {
    pub status: OrderStatus,
}
