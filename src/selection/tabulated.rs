use super::{CancelToken, Selection, SelectionError, SelectionStrategy};
use crate::model::Order;

/// Dynamic programming over (orders, capacity).
///
/// Runs in `O(n * capacity)` time. Only the current row of best values is kept; each
/// row additionally records, per weight, whether taking the order beat skipping it
/// (`dp[i][w] != dp[i-1][w]`). That one bit per cell is all the backtracking needs.
///
/// Memory grows with `n * capacity`; callers bound it before handing over large
/// capacities (see [`PlannerConfig::max_table_cells`](crate::config::PlannerConfig)).
#[derive(Debug, Clone)]
pub struct TabulatedDp {
    check_interval_rows: usize,
}

impl TabulatedDp {
    /// `check_interval_rows` is the number of rows between two polls of the token.
    pub fn new(check_interval_rows: usize) -> Self {
        Self {
            check_interval_rows: check_interval_rows.max(1),
        }
    }
}

impl SelectionStrategy for TabulatedDp {
    fn name(&self) -> &'static str {
        "tabulated"
    }

    fn select(
        &self,
        orders: &[Order],
        capacity: u32,
        cancel: &CancelToken,
    ) -> Result<Selection, SelectionError> {
        if orders.is_empty() {
            return Ok(Selection::default());
        }

        let width = capacity as usize + 1;
        let mut best = vec![0u64; width];
        let mut taken = BitTable::new(orders.len(), width);

        for (row, order) in orders.iter().enumerate() {
            if row % self.check_interval_rows == 0 && cancel.is_cancelled() {
                return Err(SelectionError::Cancelled);
            }

            let weight = order.weight as usize;
            if weight >= width {
                continue;
            }
            let value = u64::from(order.value);
            // Descending so `best[w - weight]` still holds the previous row.
            for w in (weight..width).rev() {
                let take = best[w - weight] + value;
                if take > best[w] {
                    best[w] = take;
                    taken.set(row, w);
                }
            }
        }

        let mut picked = Vec::new();
        let mut w = width - 1;
        for row in (0..orders.len()).rev() {
            if taken.get(row, w) {
                picked.push(row);
                w -= orders[row].weight as usize;
            }
        }
        picked.reverse();

        let selection = Selection::from_indices(orders, &picked);
        debug_assert_eq!(selection.total_value, best[width - 1]);
        Ok(selection)
    }
}

/// Row-major bitset, one bit per table cell.
struct BitTable {
    width: usize,
    words: Vec<u64>,
}

impl BitTable {
    fn new(rows: usize, width: usize) -> Self {
        let cells = rows * width;
        Self {
            width,
            words: vec![0; cells.div_ceil(64)],
        }
    }

    fn set(&mut self, row: usize, col: usize) {
        let cell = row * self.width + col;
        self.words[cell / 64] |= 1u64 << (cell % 64);
    }

    fn get(&self, row: usize, col: usize) -> bool {
        let cell = row * self.width + col;
        self.words[cell / 64] & (1u64 << (cell % 64)) != 0
    }
}
