//! Error types for delivery planning.

use crate::order_actor::OrderError;
use thiserror::Error;

/// Why a planning call produced no plan.
///
/// When `generate_plan` fails, whatever the variant, no order changed status.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PlanningError {
    /// The deadline passed, or the caller cancelled, before the plan was committed.
    #[error("Planning cancelled: deadline exceeded")]
    Cancelled,

    /// The order pool failed, or a cancelled transaction could not be rolled back.
    #[error("Transaction failed: {0}")]
    TransactionFailure(#[from] OrderError),

    /// The request can never succeed as given.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
