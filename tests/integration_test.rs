use robot_dispatch::clients::ActorClient;
use robot_dispatch::config::PlannerConfig;
use robot_dispatch::coordinator::PlanningError;
use robot_dispatch::lifecycle::DispatchSystem;
use robot_dispatch::model::{OrderCreate, OrderId, OrderStatus, ProductCreate, RobotId};
use robot_dispatch::order_actor::OrderError;
use std::collections::HashSet;
use std::time::Duration;
use tokio::time::Instant;

fn soon() -> Instant {
    Instant::now() + Duration::from_secs(5)
}

/// Places one order per `(weight, value)` pair, each for its own product.
async fn place_orders(system: &DispatchSystem, items: &[(u32, u32)]) -> Vec<OrderId> {
    let mut ids = Vec::new();
    for (i, &(weight, value)) in items.iter().enumerate() {
        let product_id = system
            .product_client
            .create_product(ProductCreate {
                name: format!("item-{i}"),
                weight,
                value,
            })
            .await
            .expect("Failed to create product");
        let order_id = system
            .order_client
            .create_order(OrderCreate { product_id })
            .await
            .expect("Failed to create order");
        ids.push(order_id);
    }
    ids
}

async fn statuses(system: &DispatchSystem, ids: &[OrderId]) -> Vec<OrderStatus> {
    let mut statuses = Vec::new();
    for id in ids {
        let order = system
            .order_client
            .get(*id)
            .await
            .expect("Failed to get order")
            .expect("Order not found");
        statuses.push(order.status);
    }
    statuses
}

/// Full path: intake snapshots the product, planning commits `Delivering`.
#[tokio::test]
async fn test_known_instance_end_to_end() {
    let system = DispatchSystem::new();
    let ids = place_orders(&system, &[(2, 3), (3, 4), (4, 5), (5, 6)]).await;

    let order = system.order_client.get(ids[2]).await.unwrap().unwrap();
    assert_eq!((order.weight, order.value), (4, 5));

    let plan = system
        .coordinator
        .generate_plan(RobotId::new("robot-1"), 5, soon())
        .await
        .expect("Planning failed");

    assert_eq!(plan.robot_id, RobotId::new("robot-1"));
    assert_eq!(plan.total_value, 7);
    assert_eq!(plan.total_weight, 5);
    assert_eq!(
        plan.orders.iter().map(|o| o.id).collect::<Vec<_>>(),
        vec![ids[0], ids[1]]
    );
    assert_eq!(
        statuses(&system, &ids).await,
        vec![
            OrderStatus::Delivering,
            OrderStatus::Delivering,
            OrderStatus::PendingShipment,
            OrderStatus::PendingShipment,
        ]
    );

    system.shutdown().await.unwrap();
}

/// Many robots planning at once never share an order.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_plans_are_disjoint() {
    let system = DispatchSystem::new();
    let items: Vec<(u32, u32)> = (0..40).map(|i| (1 + i % 7, 3 + (i * 5) % 11)).collect();
    let ids = place_orders(&system, &items).await;

    let mut planners = Vec::new();
    for robot in 0..8 {
        let coordinator = system.coordinator.clone();
        planners.push(tokio::spawn(async move {
            coordinator
                .generate_plan(RobotId::new(format!("robot-{robot}")), 10, soon())
                .await
        }));
    }

    let mut assigned = HashSet::new();
    let mut total = 0;
    for planner in planners {
        let plan = planner.await.unwrap().expect("Planning failed");
        for order in &plan.orders {
            assert_eq!(order.status, OrderStatus::PendingShipment);
            assert!(assigned.insert(order.id), "{} assigned twice", order.id);
        }
        assert!(plan.total_weight <= 10);
        total += plan.orders.len();
    }

    let delivering = system
        .order_client
        .list_by_status(OrderStatus::Delivering)
        .await
        .unwrap();
    assert_eq!(delivering.len(), total);
    assert!(delivering.iter().all(|o| assigned.contains(&o.id)));
    assert_eq!(ids.len(), 40);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_expired_deadline_touches_nothing() {
    let system = DispatchSystem::new();
    let items: Vec<(u32, u32)> = (0..200).map(|i| (1 + i % 13, 1 + i % 17)).collect();
    let ids = place_orders(&system, &items).await;

    let result = system
        .coordinator
        .generate_plan(RobotId::new("late"), 1_000, Instant::now())
        .await;

    assert_eq!(result, Err(PlanningError::Cancelled));
    assert!(statuses(&system, &ids)
        .await
        .iter()
        .all(|s| *s == OrderStatus::PendingShipment));

    system.shutdown().await.unwrap();
}

/// A deadline that passes during selection rolls the scope back.
#[tokio::test]
async fn test_deadline_during_selection_rolls_back() {
    // Weightless orders defeat pruning, so the exhaustive search visits 2^31 nodes.
    let config = PlannerConfig::default()
        .with_exhaustive_search_limit(30)
        .with_dfs_check_interval(1_024);
    let system = DispatchSystem::with_config(config);
    let ids = place_orders(&system, &[(0, 1); 30]).await;

    let deadline = Instant::now() + Duration::from_millis(50);
    let result = system
        .coordinator
        .generate_plan(RobotId::new("slow"), 0, deadline)
        .await;
    assert_eq!(result, Err(PlanningError::Cancelled));

    let pending = system
        .order_client
        .list_by_status(OrderStatus::PendingShipment)
        .await
        .unwrap();
    assert_eq!(pending.len(), ids.len());

    // The scope was released.
    let scope = tokio::time::timeout(Duration::from_secs(1), system.order_client.begin())
        .await
        .expect("scope still held")
        .unwrap();
    scope.rollback().await.unwrap();

    system.shutdown().await.unwrap();
}

/// Same, with enough candidates that the tabulated search runs.
#[tokio::test]
async fn test_deadline_during_tabulated_selection_rolls_back() {
    let config = PlannerConfig::default()
        .with_exhaustive_search_limit(2)
        .with_dp_check_interval_rows(10);
    let system = DispatchSystem::with_config(config);
    let items: Vec<(u32, u32)> = (0..500).map(|i| (1 + i % 7, 1 + i % 11)).collect();
    let ids = place_orders(&system, &items).await;

    // 501 rows of 300_001 cells.
    let deadline = Instant::now() + Duration::from_millis(30);
    let result = system
        .coordinator
        .generate_plan(RobotId::new("slow"), 300_000, deadline)
        .await;
    assert_eq!(result, Err(PlanningError::Cancelled));

    let pending = system
        .order_client
        .list_by_status(OrderStatus::PendingShipment)
        .await
        .unwrap();
    assert_eq!(pending.len(), ids.len());

    let scope = tokio::time::timeout(Duration::from_secs(1), system.order_client.begin())
        .await
        .expect("scope still held")
        .unwrap();
    scope.rollback().await.unwrap();

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_update_order_status() {
    let system = DispatchSystem::new();
    let ids = place_orders(&system, &[(1, 10), (1, 1)]).await;

    system
        .coordinator
        .update_order_status(ids[0], OrderStatus::Delivered, soon())
        .await
        .unwrap();

    // Delivered orders are no longer candidates.
    let plan = system
        .coordinator
        .generate_plan(RobotId::new("robot-1"), 10, soon())
        .await
        .unwrap();
    assert_eq!(plan.orders.iter().map(|o| o.id).collect::<Vec<_>>(), vec![ids[1]]);

    let missing = system
        .coordinator
        .update_order_status(OrderId(999), OrderStatus::Delivered, soon())
        .await;
    assert_eq!(
        missing,
        Err(PlanningError::TransactionFailure(OrderError::NotFound(
            "order_999".to_string()
        )))
    );

    let expired = system
        .coordinator
        .update_order_status(ids[1], OrderStatus::Delivered, Instant::now())
        .await;
    assert_eq!(expired, Err(PlanningError::Cancelled));
    assert_eq!(
        statuses(&system, &ids[1..]).await,
        vec![OrderStatus::Delivering]
    );

    system.shutdown().await.unwrap();
}

/// Orders keep the value their product had when they were placed.
#[tokio::test]
async fn test_repricing_leaves_placed_orders_alone() {
    let system = DispatchSystem::new();
    let product_id = system
        .product_client
        .create_product(ProductCreate {
            name: "Sensor kit".to_string(),
            weight: 2,
            value: 25,
        })
        .await
        .unwrap();
    let before = system
        .order_client
        .create_order(OrderCreate { product_id })
        .await
        .unwrap();

    let repriced = system.product_client.reprice(product_id, 40).await.unwrap();
    assert_eq!(repriced.value, 40);

    let after = system
        .order_client
        .create_order(OrderCreate { product_id })
        .await
        .unwrap();

    let plan = system
        .coordinator
        .generate_plan(RobotId::new("robot-1"), 2, soon())
        .await
        .unwrap();
    assert_eq!(plan.orders.iter().map(|o| o.id).collect::<Vec<_>>(), vec![after]);
    assert_eq!(plan.total_value, 40);

    let old = system.order_client.get(before).await.unwrap().unwrap();
    assert_eq!((old.value, old.status), (25, OrderStatus::PendingShipment));

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_empty_pool_gives_empty_plan() {
    let system = DispatchSystem::new();
    let plan = system
        .coordinator
        .generate_plan(RobotId::new("robot-1"), 100, soon())
        .await
        .unwrap();
    assert!(plan.is_empty());
    assert_eq!((plan.total_weight, plan.total_value), (0, 0));
    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_invalid_requests_are_rejected() {
    let config = PlannerConfig::default()
        .with_exhaustive_search_limit(2)
        .with_max_table_cells(1_000);
    let system = DispatchSystem::with_config(config);
    let ids = place_orders(&system, &[(1, 1), (2, 2), (3, 3)]).await;

    let blank = system
        .coordinator
        .generate_plan(RobotId::new(" "), 10, soon())
        .await;
    assert!(matches!(blank, Err(PlanningError::InvalidInput(_))));

    // 4 rows x 1001 columns is over the limit.
    let too_big = system
        .coordinator
        .generate_plan(RobotId::new("robot-1"), 1_000, soon())
        .await;
    assert!(matches!(too_big, Err(PlanningError::InvalidInput(_))));

    // The scope was rolled back and released.
    let plan = system
        .coordinator
        .generate_plan(RobotId::new("robot-1"), 5, soon())
        .await
        .unwrap();
    assert_eq!(plan.total_value, 5);
    assert_eq!(
        statuses(&system, &ids).await,
        vec![
            OrderStatus::PendingShipment,
            OrderStatus::Delivering,
            OrderStatus::Delivering,
        ]
    );

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_order_for_unknown_product_is_rejected() {
    let system = DispatchSystem::new();
    let result = system
        .order_client
        .create_order(OrderCreate {
            product_id: robot_dispatch::model::ProductId(42),
        })
        .await;
    assert!(matches!(result, Err(OrderError::InvalidProduct(_))));

    let all = system.order_client.list(|_| true).await.unwrap();
    assert!(all.is_empty());

    system.shutdown().await.unwrap();
}
