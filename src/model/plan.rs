use crate::model::Order;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Caller-chosen identifier of the robot a plan is made for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RobotId(pub String);

impl RobotId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for RobotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The orders assigned to one robot by a single planning call.
///
/// By the time a plan is returned its orders have been committed as
/// [`Delivering`](crate::model::OrderStatus::Delivering) and belong to no other plan.
/// The orders carry the status they had when they were selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryPlan {
    pub robot_id: RobotId,
    pub orders: Vec<Order>,
    pub total_weight: u64,
    pub total_value: u64,
}

impl DeliveryPlan {
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}
