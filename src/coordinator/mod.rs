//! # Delivery Coordinator
//!
//! Turns a robot's capacity into a committed [`DeliveryPlan`]:
//!
//! ```text
//! begin scope -> fetch pending -> select (blocking pool) -> stage Delivering -> commit
//! ```
//!
//! Everything between `begin` and `commit` happens inside one [`OrderScope`], so the
//! candidates a call sees are exactly the orders no concurrent call can take, and the
//! status change becomes visible all at once or not at all.
//!
//! ## Deadlines
//!
//! Each call carries a deadline that bounds the whole operation:
//!
//! - already passed on entry: `Cancelled`, the pool is never touched;
//! - passes while waiting on the pool: the scope is rolled back, then `Cancelled`
//!   (or `TransactionFailure` if even the rollback fails);
//! - passes during selection: the selector notices through its [`CancelToken`] and
//!   the scope is rolled back the same way.
//!
//! The deadline is checked one last time before `commit`. Once the commit is sent it
//! is awaited to completion: abandoning it would leave the caller unable to tell
//! whether the orders were assigned.

pub mod error;

pub use error::*;

use crate::clients::{OrderPoolClient, OrderScope};
use crate::config::PlannerConfig;
use crate::model::{DeliveryPlan, Order, OrderId, OrderStatus, RobotId};
use crate::order_actor::OrderError;
use crate::selection::{CancelToken, OrderSelector, Selection, SelectionError};
use std::future::Future;
use std::time::Duration;
use tokio::time::{timeout, timeout_at, Instant};
use tracing::{info, instrument, warn};

/// How long a rollback may take after the deadline has already passed.
const ROLLBACK_GRACE: Duration = Duration::from_secs(1);

/// Plans deliveries against an order pool.
///
/// Cheap to clone; clones share the pool.
#[derive(Clone)]
pub struct DeliveryCoordinator {
    orders: OrderPoolClient,
    selector: OrderSelector,
    config: PlannerConfig,
}

impl DeliveryCoordinator {
    pub fn new(orders: OrderPoolClient, config: PlannerConfig) -> Self {
        Self {
            orders,
            selector: OrderSelector::new(&config),
            config,
        }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Assigns `robot_id` the most valuable set of pending orders that fits in
    /// `capacity`, and marks them `Delivering`.
    ///
    /// An empty plan is a success: there was nothing pending, or nothing fits.
    #[instrument(skip(self, robot_id), fields(robot = %robot_id))]
    pub async fn generate_plan(
        &self,
        robot_id: RobotId,
        capacity: u32,
        deadline: Instant,
    ) -> Result<DeliveryPlan, PlanningError> {
        if Instant::now() >= deadline {
            return Err(PlanningError::Cancelled);
        }
        if robot_id.as_str().trim().is_empty() {
            return Err(PlanningError::InvalidInput(
                "robot id must not be empty".to_string(),
            ));
        }

        let scope = within(deadline, self.orders.begin()).await?;

        let candidates = match within(deadline, scope.fetch_pending()).await {
            Ok(candidates) => candidates,
            Err(e) => return Err(abort(scope, e).await),
        };

        if let Err(e) = self.check_table_size(candidates.len(), capacity) {
            return Err(abort(scope, e).await);
        }

        let selection = match self.select(candidates, capacity, deadline).await {
            Ok(selection) => selection,
            Err(e) => return Err(abort(scope, e).await),
        };

        let ids: Vec<OrderId> = selection.orders.iter().map(|o| o.id).collect();
        let staged = within(deadline, scope.update_statuses(&ids, OrderStatus::Delivering)).await;
        if let Err(e) = staged {
            return Err(abort(scope, e).await);
        }

        if Instant::now() >= deadline {
            return Err(abort(scope, PlanningError::Cancelled).await);
        }
        scope.commit().await?;

        info!(
            orders = ids.len(),
            total_weight = selection.total_weight,
            total_value = selection.total_value,
            "Delivery plan committed"
        );

        Ok(DeliveryPlan {
            robot_id,
            orders: selection.orders,
            total_weight: selection.total_weight,
            total_value: selection.total_value,
        })
    }

    /// Sets the status of one order, e.g. `Delivered` once the robot is back.
    #[instrument(skip(self))]
    pub async fn update_order_status(
        &self,
        order_id: OrderId,
        status: OrderStatus,
        deadline: Instant,
    ) -> Result<(), PlanningError> {
        if Instant::now() >= deadline {
            return Err(PlanningError::Cancelled);
        }
        within(deadline, self.orders.update_status(order_id, status)).await?;
        info!(%order_id, %status, "Order status updated");
        Ok(())
    }

    /// Rejects inputs whose tabulated search would need an unreasonable table.
    fn check_table_size(&self, candidates: usize, capacity: u32) -> Result<(), PlanningError> {
        if candidates <= self.config.exhaustive_search_limit {
            return Ok(());
        }
        let cells = (candidates as u64 + 1).saturating_mul(u64::from(capacity) + 1);
        if cells > self.config.max_table_cells {
            return Err(PlanningError::InvalidInput(format!(
                "{candidates} candidates at capacity {capacity} need {cells} table cells, limit is {}",
                self.config.max_table_cells
            )));
        }
        Ok(())
    }

    /// Runs the selector on the blocking pool.
    async fn select(
        &self,
        candidates: Vec<Order>,
        capacity: u32,
        deadline: Instant,
    ) -> Result<Selection, PlanningError> {
        let selector = self.selector.clone();
        let cancel = CancelToken::with_deadline(deadline.into_std());
        let result = tokio::task::spawn_blocking(move || {
            selector.select(&candidates, capacity, &cancel)
        })
        .await;

        match result {
            Ok(Ok(selection)) => Ok(selection),
            Ok(Err(SelectionError::Cancelled)) => Err(PlanningError::Cancelled),
            Err(join_error) if join_error.is_panic() => {
                std::panic::resume_unwind(join_error.into_panic())
            }
            // The runtime is shutting down.
            Err(_) => Err(PlanningError::Cancelled),
        }
    }
}

/// Awaits one storage phase, giving up at `deadline`.
async fn within<T>(
    deadline: Instant,
    phase: impl Future<Output = Result<T, OrderError>>,
) -> Result<T, PlanningError> {
    match timeout_at(deadline, phase).await {
        Ok(result) => result.map_err(PlanningError::TransactionFailure),
        Err(_) => Err(PlanningError::Cancelled),
    }
}

/// Rolls `scope` back after `cause` and decides what the caller sees.
async fn abort(scope: OrderScope, cause: PlanningError) -> PlanningError {
    let id = scope.id();
    let rollback = match timeout(ROLLBACK_GRACE, scope.rollback()).await {
        Ok(result) => result,
        Err(_) => Err(OrderError::ScopeFailure(format!(
            "rollback of {id} timed out"
        ))),
    };

    match (cause, rollback) {
        (cause, Ok(())) => {
            warn!(scope = %id, error = %cause, "Planning aborted, scope rolled back");
            cause
        }
        (PlanningError::Cancelled, Err(rollback_error)) => {
            warn!(scope = %id, error = %rollback_error, "Rollback after cancellation failed");
            PlanningError::TransactionFailure(rollback_error)
        }
        (cause, Err(rollback_error)) => {
            warn!(
                scope = %id,
                error = %cause,
                rollback_error = %rollback_error,
                "Planning failed and rollback failed"
            );
            cause
        }
    }
}
