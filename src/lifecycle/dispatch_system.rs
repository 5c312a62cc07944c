use crate::clients::{OrderPoolClient, ProductClient};
use crate::config::PlannerConfig;
use crate::coordinator::DeliveryCoordinator;
use crate::{order_actor, product_actor};
use tracing::{error, info};

/// The runtime orchestrator for robot delivery planning.
///
/// `DispatchSystem` starts the actors, wires them together and hands out the clients
/// and the [`DeliveryCoordinator`]:
///
/// - **Product Actor**: the catalog (Context = `()`)
/// - **Order Actor**: the order pool; snapshots product weight and value on intake
///   (Context = `ProductClient`)
///
/// # Example
///
/// ```rust
/// use robot_dispatch::lifecycle::DispatchSystem;
/// use robot_dispatch::model::{OrderCreate, ProductCreate, RobotId};
/// use std::time::Duration;
/// use tokio::time::Instant;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let system = DispatchSystem::new();
///
///     let product_id = system
///         .product_client
///         .create_product(ProductCreate { name: "Crate".into(), weight: 3, value: 7 })
///         .await?;
///     system.order_client.create_order(OrderCreate { product_id }).await?;
///
///     let deadline = Instant::now() + Duration::from_secs(1);
///     let plan = system
///         .coordinator
///         .generate_plan(RobotId::new("robot-1"), 5, deadline)
///         .await?;
///     assert_eq!(plan.total_value, 7);
///
///     system.shutdown().await?;
///     Ok(())
/// }
/// ```
pub struct DispatchSystem {
    /// Client for the product catalog
    pub product_client: ProductClient,

    /// Client for the order pool
    pub order_client: OrderPoolClient,

    /// Plans deliveries against the order pool
    pub coordinator: DeliveryCoordinator,

    /// Task handles for all running actors (used for graceful shutdown)
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl Default for DispatchSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl DispatchSystem {
    /// Starts a system with [`PlannerConfig::default`]. Must be called inside a
    /// Tokio runtime.
    pub fn new() -> Self {
        Self::with_config(PlannerConfig::default())
    }

    pub fn with_config(config: PlannerConfig) -> Self {
        // 1. Create actors (no dependencies yet)
        let (product_actor, product_client) = product_actor::new(config.channel_buffer);
        let (order_actor, order_client) = order_actor::new(config.channel_buffer);

        // 2. Start actors with injected context
        let product_handle = tokio::spawn(product_actor.run(()));
        let order_handle = tokio::spawn(order_actor.run(product_client.clone()));

        let coordinator = DeliveryCoordinator::new(order_client.clone(), config);
        info!("Dispatch system started");

        Self {
            product_client,
            order_client,
            coordinator,
            handles: vec![product_handle, order_handle],
        }
    }

    /// Gracefully shuts down the entire system.
    ///
    /// Dropping the clients closes the actors' channels; each actor then drains and
    /// exits. The order actor holds a product client in its context, so the product
    /// actor stops only after the order actor has. Clones of the clients held
    /// elsewhere keep their actor alive and make this wait.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down dispatch system...");

        drop(self.coordinator);
        drop(self.order_client);
        drop(self.product_client);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(format!("Actor task failed: {:?}", e));
            }
        }

        info!("Dispatch system shutdown complete.");
        Ok(())
    }
}
