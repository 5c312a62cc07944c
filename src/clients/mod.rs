//! Type-safe wrappers around [`ResourceClient`](actor_framework::ResourceClient).

pub mod order_pool_client;
pub mod product_client;

pub use actor_framework::ActorClient;
pub use order_pool_client::*;
pub use product_client::*;
