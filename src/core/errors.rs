use crate::core::models::money::{Currency, Money};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
pub enum LedgerError {
    /// A single expense record is malformed or internally inconsistent
    #[error("Invalid expense: {0}")]
    InvalidExpense(String),

    /// Records of more than one currency were passed to one ledger run
    #[error("Currency mismatch: expected {expected}, found {found} on expense {expense_id}")]
    CurrencyMismatch {
        expected: Currency,
        found: Currency,
        expense_id: String,
    },

    /// Balances did not sum to zero after calculation. Always a defect.
    #[error("Ledger invariant violated: balances sum to {0} instead of zero")]
    InvariantViolation(Money),

    /// The settlement planner was handed a balance map that does not sum to zero
    #[error("Unbalanced settlement input: balances sum to {0}")]
    UnbalancedInput(Money),

    /// The expense store or membership directory failed or timed out
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),
}

impl LedgerError {
    pub fn invalid_expense(expense_id: &str, reason: impl std::fmt::Display) -> Self {
        LedgerError::InvalidExpense(format!("expense {}: {}", expense_id, reason))
    }

    /// Only upstream failures are worth retrying; everything else needs the
    /// underlying expense entries corrected.
    pub fn is_retryable(&self) -> bool {
        matches!(self, LedgerError::UpstreamUnavailable(_))
    }
}
