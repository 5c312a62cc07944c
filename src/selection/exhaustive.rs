use super::{CancelToken, Selection, SelectionError, SelectionStrategy};
use crate::model::Order;

/// Include/exclude search over every subset, pruned on weight.
///
/// Exponential in the number of candidates; [`OrderSelector`](super::OrderSelector)
/// only hands it small inputs.
#[derive(Debug, Clone)]
pub struct ExhaustiveSearch {
    check_interval: u64,
}

impl ExhaustiveSearch {
    /// `check_interval` is the number of search steps between two polls of the token.
    pub fn new(check_interval: u64) -> Self {
        Self {
            check_interval: check_interval.max(1),
        }
    }
}

impl SelectionStrategy for ExhaustiveSearch {
    fn name(&self) -> &'static str {
        "exhaustive"
    }

    fn select(
        &self,
        orders: &[Order],
        capacity: u32,
        cancel: &CancelToken,
    ) -> Result<Selection, SelectionError> {
        if cancel.is_cancelled() {
            return Err(SelectionError::Cancelled);
        }

        let mut state = SearchState {
            orders,
            capacity: u64::from(capacity),
            cancel,
            check_interval: self.check_interval,
            steps: 0,
            current: Vec::with_capacity(orders.len()),
            best: Vec::new(),
            best_value: 0,
        };
        state.visit(0, 0, 0)?;

        Ok(Selection::from_indices(orders, &state.best))
    }
}

/// Everything one run of the search mutates.
struct SearchState<'a> {
    orders: &'a [Order],
    capacity: u64,
    cancel: &'a CancelToken,
    check_interval: u64,
    steps: u64,
    /// Indices on the current path.
    current: Vec<usize>,
    best: Vec<usize>,
    best_value: u64,
}

impl SearchState<'_> {
    fn visit(&mut self, i: usize, weight: u64, value: u64) -> Result<(), SelectionError> {
        if weight > self.capacity {
            return Ok(());
        }

        self.steps += 1;
        if self.steps % self.check_interval == 0 && self.cancel.is_cancelled() {
            return Err(SelectionError::Cancelled);
        }

        let orders = self.orders;
        let Some(order) = orders.get(i) else {
            if value > self.best_value {
                self.best_value = value;
                self.best.clone_from(&self.current);
            }
            return Ok(());
        };

        // Exclude first, then include.
        self.visit(i + 1, weight, value)?;

        self.current.push(i);
        let included = self.visit(
            i + 1,
            weight + u64::from(order.weight),
            value + u64::from(order.value),
        );
        self.current.pop();
        included
    }
}
