use crate::core::errors::LedgerError;
use crate::core::models::{ExpenseRecord, UserId};
use async_trait::async_trait;

/// Source of truth for a group's expenses.
///
/// Failures and timeouts are reported as `LedgerError::UpstreamUnavailable`.
#[async_trait]
pub trait ExpenseStore: Send + Sync {
    /// Stores the expense unless the group already holds expenses in another
    /// currency, in which case it returns `LedgerError::CurrencyMismatch`.
    /// The check and the insert must be atomic with respect to other saves
    /// for the same group.
    async fn save_expense(&self, expense: ExpenseRecord) -> Result<(), LedgerError>;

    /// Every expense of the group as of a single point in time. An
    /// implementation must never return a list reflecting a half-applied
    /// concurrent write.
    async fn group_snapshot(&self, group_id: &str) -> Result<Vec<ExpenseRecord>, LedgerError>;
}

#[async_trait]
pub trait MembershipDirectory: Send + Sync {
    /// Member ids of the group, or `None` when the directory does not know it.
    async fn group_members(&self, group_id: &str) -> Result<Option<Vec<UserId>>, LedgerError>;
}

pub mod in_memory;
