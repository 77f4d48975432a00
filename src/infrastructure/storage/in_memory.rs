use crate::core::errors::LedgerError;
use crate::core::models::{ExpenseRecord, UserId};
use crate::infrastructure::storage::{ExpenseStore, MembershipDirectory};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone, Default)]
pub struct InMemoryStorage {
    expenses: Arc<RwLock<HashMap<String, Vec<ExpenseRecord>>>>,
    members: Arc<RwLock<HashMap<String, Vec<UserId>>>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        InMemoryStorage {
            expenses: Arc::new(RwLock::new(HashMap::new())),
            members: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Registers a member of a group. Adding the same user twice is a no-op.
    pub async fn add_member(&self, group_id: &str, user_id: &str) {
        let mut members = self.members.write().await;
        let group = members.entry(group_id.to_string()).or_default();
        if !group.iter().any(|m| m == user_id) {
            group.push(user_id.to_string());
        }
    }
}

#[async_trait]
impl ExpenseStore for InMemoryStorage {
    async fn save_expense(&self, expense: ExpenseRecord) -> Result<(), LedgerError> {
        let mut expenses = self.expenses.write().await;
        let group = expenses.entry(expense.group_id.clone()).or_default();
        if let Some(first) = group.first() {
            if first.currency != expense.currency {
                return Err(LedgerError::CurrencyMismatch {
                    expected: first.currency,
                    found: expense.currency,
                    expense_id: expense.id,
                });
            }
        }
        group.push(expense);
        Ok(())
    }

    async fn group_snapshot(&self, group_id: &str) -> Result<Vec<ExpenseRecord>, LedgerError> {
        // One read guard for the whole group keeps the copy consistent.
        let expenses = self.expenses.read().await;
        Ok(expenses.get(group_id).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl MembershipDirectory for InMemoryStorage {
    async fn group_members(&self, group_id: &str) -> Result<Option<Vec<UserId>>, LedgerError> {
        let members = self.members.read().await;
        Ok(members.get(group_id).cloned())
    }
}
