//! Pure data structures (DTOs). `Order` and `Product` implement
//! [`ActorEntity`](actor_framework::ActorEntity); `DeliveryPlan` is the planner's output.

pub mod order;
pub mod plan;
pub mod product;

pub use order::*;
pub use plan::*;
pub use product::*;
