//! # Robot Dispatch Demo
//!
//! Fills a small catalog and order pool, lets three robots plan concurrently, then
//! reports a delivery and shuts down.
//!
//! ```bash
//! RUST_LOG=info cargo run
//! ```

use robot_dispatch::lifecycle::{setup_tracing, DispatchSystem};
use robot_dispatch::model::{OrderCreate, OrderStatus, ProductCreate, RobotId};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{error, info, Instrument};

const CATALOG: [(&str, u32, u32); 5] = [
    ("Toolbox", 4, 30),
    ("Cable drum", 9, 45),
    ("Sensor kit", 2, 25),
    ("Spare wheel", 6, 20),
    ("Manual", 0, 5),
];

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    info!("Starting dispatch demo");
    let system = DispatchSystem::new();

    let span = tracing::info_span!("intake");
    async {
        let mut products = Vec::new();
        for (name, weight, value) in CATALOG {
            let id = system
                .product_client
                .create_product(ProductCreate {
                    name: name.to_string(),
                    weight,
                    value,
                })
                .await
                .map_err(|e| e.to_string())?;
            products.push(id);
        }

        // Three orders per product.
        for product_id in products.iter().cycle().take(products.len() * 3) {
            system
                .order_client
                .create_order(OrderCreate {
                    product_id: *product_id,
                })
                .await
                .map_err(|e| e.to_string())?;
        }
        info!(orders = products.len() * 3, "Order pool filled");
        Ok::<_, String>(())
    }
    .instrument(span)
    .await?;

    let deadline = Instant::now() + Duration::from_secs(2);
    let mut planners = Vec::new();
    for (robot, capacity) in [("robot-1", 12), ("robot-2", 15), ("robot-3", 8)] {
        let coordinator = system.coordinator.clone();
        let span = tracing::info_span!("planning", robot);
        planners.push(tokio::spawn(
            async move {
                coordinator
                    .generate_plan(RobotId::new(robot), capacity, deadline)
                    .await
            }
            .instrument(span),
        ));
    }

    let mut first_assigned = None;
    for planner in planners {
        match planner.await.map_err(|e| e.to_string())? {
            Ok(plan) => {
                let ids: Vec<String> = plan.orders.iter().map(|o| o.id.to_string()).collect();
                info!(
                    robot = %plan.robot_id,
                    orders = ?ids,
                    total_weight = plan.total_weight,
                    total_value = plan.total_value,
                    "Plan ready"
                );
                first_assigned = first_assigned.or(plan.orders.first().map(|o| o.id));
            }
            Err(e) => error!(error = %e, "Planning failed"),
        }
    }

    if let Some(order_id) = first_assigned {
        let deadline = Instant::now() + Duration::from_secs(1);
        system
            .coordinator
            .update_order_status(order_id, OrderStatus::Delivered, deadline)
            .await
            .map_err(|e| e.to_string())?;
    }

    let pending = system
        .order_client
        .list_by_status(OrderStatus::PendingShipment)
        .await
        .map_err(|e| e.to_string())?;
    info!(left = pending.len(), "Orders still pending");

    system.shutdown().await?;

    info!("Demo completed successfully");
    Ok(())
}
