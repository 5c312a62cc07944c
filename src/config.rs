//! # Planner Configuration
//!
//! Tunables for order selection and actor wiring. [`PlannerConfig::default`] carries
//! the values the planner is documented and tested with; a host that wants to load
//! them from a file can deserialize the struct (missing fields fall back to the
//! defaults).
//!
//! Log verbosity is not configured here, see [`setup_tracing`](crate::lifecycle::setup_tracing).

use crate::selection::EXHAUSTIVE_SEARCH_LIMIT;
use serde::Deserialize;

/// Search steps between two cancellation checks in the exhaustive search.
pub const DFS_CHECK_INTERVAL: u64 = 16_384;

/// Table rows between two cancellation checks in the tabulated search.
pub const DP_CHECK_INTERVAL_ROWS: usize = 100;

/// Upper bound on `(orders + 1) * (capacity + 1)` for one planning call.
pub const MAX_TABLE_CELLS: u64 = 200_000_000;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Candidate counts up to and including this use the exhaustive search.
    pub exhaustive_search_limit: usize,
    pub dfs_check_interval: u64,
    pub dp_check_interval_rows: usize,
    /// Requests whose tabulated search would need more cells are rejected up front.
    pub max_table_cells: u64,
    /// Capacity of each actor's request channel.
    pub channel_buffer: usize,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            exhaustive_search_limit: EXHAUSTIVE_SEARCH_LIMIT,
            dfs_check_interval: DFS_CHECK_INTERVAL,
            dp_check_interval_rows: DP_CHECK_INTERVAL_ROWS,
            max_table_cells: MAX_TABLE_CELLS,
            channel_buffer: 32,
        }
    }
}

impl PlannerConfig {
    pub fn with_exhaustive_search_limit(mut self, limit: usize) -> Self {
        self.exhaustive_search_limit = limit;
        self
    }

    /// Zero is treated as one: the token is then checked on every step.
    pub fn with_dfs_check_interval(mut self, steps: u64) -> Self {
        self.dfs_check_interval = steps.max(1);
        self
    }

    pub fn with_dp_check_interval_rows(mut self, rows: usize) -> Self {
        self.dp_check_interval_rows = rows.max(1);
        self
    }

    pub fn with_max_table_cells(mut self, cells: u64) -> Self {
        self.max_table_cells = cells;
        self
    }

    pub fn with_channel_buffer(mut self, buffer: usize) -> Self {
        self.channel_buffer = buffer.max(1);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PlannerConfig::default();
        assert_eq!(config.exhaustive_search_limit, 20);
        assert_eq!(config.dfs_check_interval, 16_384);
        assert_eq!(config.dp_check_interval_rows, 100);
    }

    #[test]
    fn test_builders_clamp_zero_intervals() {
        let config = PlannerConfig::default()
            .with_dfs_check_interval(0)
            .with_dp_check_interval_rows(0)
            .with_channel_buffer(0);
        assert_eq!(config.dfs_check_interval, 1);
        assert_eq!(config.dp_check_interval_rows, 1);
        assert_eq!(config.channel_buffer, 1);
    }

    #[test]
    fn test_partial_document_keeps_defaults() {
        let config: PlannerConfig =
            serde_json::from_str(r#"{ "exhaustive_search_limit": 12 }"#).unwrap();
        assert_eq!(config.exhaustive_search_limit, 12);
        assert_eq!(config.max_table_cells, MAX_TABLE_CELLS);
    }
}
