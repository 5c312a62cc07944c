//! # Order Selection
//!
//! Given the pending orders and a robot's weight capacity, pick the subset with the
//! highest total value whose total weight fits (0/1 knapsack). Selection is pure:
//! no I/O, no shared state, so it can run on any thread.
//!
//! Two strategies implement [`SelectionStrategy`]:
//!
//! - [`ExhaustiveSearch`] walks every subset. Cheap for a handful of orders and
//!   independent of the capacity.
//! - [`TabulatedDp`] fills an `orders x capacity` table. Polynomial, but its cost
//!   grows with the capacity.
//!
//! [`OrderSelector`] picks between them by the number of candidates. Both return the
//! same total value for the same input; which optimal subset they return may differ.
//!
//! Long runs are cancelled cooperatively through a [`CancelToken`].

mod cancel;
mod exhaustive;
mod tabulated;

pub use cancel::CancelToken;
pub use exhaustive::ExhaustiveSearch;
pub use tabulated::TabulatedDp;

use crate::config::PlannerConfig;
use crate::model::Order;
use tracing::debug;

/// Candidate counts up to this use [`ExhaustiveSearch`].
pub const EXHAUSTIVE_SEARCH_LIMIT: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SelectionError {
    #[error("Selection cancelled")]
    Cancelled,
}

/// The chosen orders with their totals.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub orders: Vec<Order>,
    pub total_weight: u64,
    pub total_value: u64,
}

impl Selection {
    fn from_indices(orders: &[Order], picked: &[usize]) -> Self {
        let orders: Vec<Order> = picked.iter().map(|&i| orders[i].clone()).collect();
        let total_weight = orders.iter().map(|o| u64::from(o.weight)).sum();
        let total_value = orders.iter().map(|o| u64::from(o.value)).sum();
        Self {
            orders,
            total_weight,
            total_value,
        }
    }
}

/// A way of solving one selection problem.
pub trait SelectionStrategy: Send + Sync {
    /// Short name used in log fields.
    fn name(&self) -> &'static str;

    /// Returns a value-maximal subset of `orders` whose weight is at most `capacity`.
    ///
    /// Each order is taken at most once. Orders are returned in input order.
    fn select(
        &self,
        orders: &[Order],
        capacity: u32,
        cancel: &CancelToken,
    ) -> Result<Selection, SelectionError>;
}

/// Chooses a strategy by input size and runs it.
#[derive(Debug, Clone)]
pub struct OrderSelector {
    exhaustive_limit: usize,
    exhaustive: ExhaustiveSearch,
    tabulated: TabulatedDp,
}

impl Default for OrderSelector {
    fn default() -> Self {
        Self::new(&PlannerConfig::default())
    }
}

impl OrderSelector {
    pub fn new(config: &PlannerConfig) -> Self {
        Self {
            exhaustive_limit: config.exhaustive_search_limit,
            exhaustive: ExhaustiveSearch::new(config.dfs_check_interval),
            tabulated: TabulatedDp::new(config.dp_check_interval_rows),
        }
    }

    /// The strategy used for `candidates` orders.
    pub fn strategy_for(&self, candidates: usize) -> &dyn SelectionStrategy {
        if candidates <= self.exhaustive_limit {
            &self.exhaustive
        } else {
            &self.tabulated
        }
    }

    pub fn select(
        &self,
        orders: &[Order],
        capacity: u32,
        cancel: &CancelToken,
    ) -> Result<Selection, SelectionError> {
        let strategy = self.strategy_for(orders.len());
        debug!(
            strategy = strategy.name(),
            candidates = orders.len(),
            capacity,
            "Selecting orders"
        );
        let selection = strategy.select(orders, capacity, cancel)?;
        debug!(
            strategy = strategy.name(),
            selected = selection.orders.len(),
            total_weight = selection.total_weight,
            total_value = selection.total_value,
            "Selection complete"
        );
        Ok(selection)
    }
}
