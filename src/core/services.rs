use crate::core::balance::BalanceCalculator;
use crate::core::constants::{EXPENSE_RECORDED, EXPENSES_LISTED, LEDGER_COMPUTED, SETTLE_UP_COMPUTED};
use crate::core::errors::LedgerError;
use crate::core::models::{ActivityEntry, Currency, ExpenseRecord, GroupLedger, Money, NewExpense, UserId};
use crate::core::settlement::SettlementPlanner;
use crate::infrastructure::logging::ActivityLog;
use crate::infrastructure::storage::{ExpenseStore, MembershipDirectory};
use chrono::Utc;
use serde_json::json;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

pub struct LedgerService<S: ExpenseStore, D: MembershipDirectory, L: ActivityLog> {
    store: S,
    directory: D,
    logging: L,
    store_timeout: Duration,
    default_currency: Currency,
}

impl<S: ExpenseStore, D: MembershipDirectory, L: ActivityLog> LedgerService<S, D, L> {
    pub fn new(store: S, directory: D, logging: L, store_timeout: Duration, default_currency: Currency) -> Self {
        LedgerService {
            store,
            directory,
            logging,
            store_timeout,
            default_currency,
        }
    }

    /// Balances and settlement plan for one group.
    pub async fn compute(&self, group_id: &str) -> Result<GroupLedger, LedgerError> {
        self.compute_logged(group_id, LEDGER_COMPUTED).await
    }

    /// Same computation as [`compute`](Self::compute), recorded as a settle-up
    /// request.
    pub async fn settle_up(&self, group_id: &str) -> Result<GroupLedger, LedgerError> {
        self.compute_logged(group_id, SETTLE_UP_COMPUTED).await
    }

    async fn compute_logged(&self, group_id: &str, action: &str) -> Result<GroupLedger, LedgerError> {
        let (expenses, members) = self
            .with_timeout(async {
                futures::try_join!(
                    self.store.group_snapshot(group_id),
                    self.directory.group_members(group_id)
                )
            })
            .await?;

        let mut balances = BalanceCalculator::calculate(&expenses)?;
        for member in members.into_iter().flatten() {
            balances.entry(member).or_insert(Money::ZERO);
        }

        // The greedy planner bounds the plan at N - 1 transfers but does not
        // promise the fewest possible; see SettlementPlanner.
        let settlements = SettlementPlanner::plan(&balances)?;
        debug_assert!(
            SettlementPlanner::apply_transfers(&balances, &settlements)
                .values()
                .all(|m| m.is_zero())
        );

        let currency = expenses.first().map_or(self.default_currency, |e| e.currency);
        info!(
            group_id,
            expenses = expenses.len(),
            members = balances.len(),
            transfers = settlements.len(),
            "Computed group ledger"
        );

        self.logging
            .log_action(
                action,
                json!({
                    "group_id": group_id,
                    "expense_count": expenses.len(),
                    "transfer_count": settlements.len()
                }),
                Some(group_id),
            )
            .await?;

        Ok(GroupLedger {
            group_id: group_id.to_string(),
            currency,
            balances,
            settlements,
        })
    }

    /// Validates and stores a new expense.
    ///
    /// The payer and every participant must belong to the group when the
    /// directory knows it, and the currency must match the group's existing
    /// expenses so that a later ledger run never sees a mixed batch.
    pub async fn record_expense(&self, new_expense: NewExpense) -> Result<ExpenseRecord, LedgerError> {
        let expense = new_expense.into_record(Uuid::new_v4().to_string(), Utc::now());
        expense.validate_submission()?;

        let (existing, members) = self
            .with_timeout(async {
                futures::try_join!(
                    self.store.group_snapshot(&expense.group_id),
                    self.directory.group_members(&expense.group_id)
                )
            })
            .await?;

        if let Some(members) = members {
            Self::validate_membership(&expense, &members)?;
        }
        if let Some(first) = existing.first() {
            if first.currency != expense.currency {
                return Err(LedgerError::CurrencyMismatch {
                    expected: first.currency,
                    found: expense.currency,
                    expense_id: expense.id.clone(),
                });
            }
        }

        self.with_timeout(self.store.save_expense(expense.clone())).await?;
        info!(
            group_id = %expense.group_id,
            expense_id = %expense.id,
            amount = %expense.amount,
            currency = %expense.currency,
            "Recorded expense"
        );

        self.logging
            .log_action(
                EXPENSE_RECORDED,
                json!({
                    "expense_id": expense.id,
                    "group_id": expense.group_id,
                    "payer_id": expense.payer_id,
                    "amount": expense.amount,
                    "currency": expense.currency,
                    "participant_count": expense.participants.len()
                }),
                Some(&expense.group_id),
            )
            .await?;

        Ok(expense)
    }

    /// The group's expenses, oldest first.
    pub async fn list_expenses(&self, group_id: &str) -> Result<Vec<ExpenseRecord>, LedgerError> {
        let mut expenses = self.with_timeout(self.store.group_snapshot(group_id)).await?;
        expenses.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        debug!(group_id, expenses = expenses.len(), "Listed expenses");

        self.logging
            .log_action(
                EXPENSES_LISTED,
                json!({ "group_id": group_id, "expense_count": expenses.len() }),
                Some(group_id),
            )
            .await?;
        Ok(expenses)
    }

    pub async fn get_activity_logs(&self) -> Result<Vec<ActivityEntry>, LedgerError> {
        self.logging.get_logs().await
    }

    fn validate_membership(expense: &ExpenseRecord, members: &[UserId]) -> Result<(), LedgerError> {
        let is_member = |user_id: &str| members.iter().any(|m| m == user_id);
        if !is_member(expense.payer_id.as_str()) {
            return Err(LedgerError::invalid_expense(
                &expense.id,
                format!("payer {} is not a group member", expense.payer_id),
            ));
        }
        if let Some(outsider) = expense.participants.iter().find(|p| !is_member(p.user_id.as_str())) {
            return Err(LedgerError::invalid_expense(
                &expense.id,
                format!("participant {} is not a group member", outsider.user_id),
            ));
        }
        Ok(())
    }

    /// Runs an upstream call under the configured store timeout. The engine
    /// never retries; callers get a retryable error instead.
    async fn with_timeout<T, F>(&self, call: F) -> Result<T, LedgerError>
    where
        F: Future<Output = Result<T, LedgerError>>,
    {
        match tokio::time::timeout(self.store_timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                warn!(timeout_ms = self.store_timeout.as_millis() as u64, "Expense store timed out");
                Err(LedgerError::UpstreamUnavailable(format!(
                    "expense store did not respond within {} ms",
                    self.store_timeout.as_millis()
                )))
            }
        }
    }
}
