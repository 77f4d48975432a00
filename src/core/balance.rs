use crate::core::errors::LedgerError;
use crate::core::models::{Balances, Currency, ExpenseRecord, Money, UserId};
use std::collections::BTreeMap;
use tracing::debug;

/// Turns a group's expense snapshot into per-user net balances.
pub struct BalanceCalculator;

impl BalanceCalculator {
    /// Computes net balances over every user appearing as payer or participant.
    ///
    /// Every record is validated and the batch is checked for a single
    /// currency before anything is accumulated. Users who net out to zero are
    /// kept in the map with a zero balance.
    pub fn calculate(expenses: &[ExpenseRecord]) -> Result<Balances, LedgerError> {
        Self::single_currency(expenses)?;

        // Accumulated wide so that only the final net positions need to fit.
        let mut totals: BTreeMap<UserId, i128> = BTreeMap::new();
        for expense in expenses {
            *totals.entry(expense.payer_id.clone()).or_insert(0) += i128::from(expense.amount.minor_units());
            for (user_id, share) in Self::resolve_shares(expense)? {
                *totals.entry(user_id).or_insert(0) -= i128::from(share.minor_units());
            }
        }

        let total: i128 = totals.values().sum();
        if total != 0 {
            let drift = i64::try_from(total).unwrap_or(if total > 0 { i64::MAX } else { i64::MIN });
            return Err(LedgerError::InvariantViolation(Money::from_minor(drift)));
        }

        let balances = totals
            .into_iter()
            .map(|(user_id, net)| {
                i64::try_from(net)
                    .map_err(|_| LedgerError::InvalidExpense(format!("balance of {} overflows", user_id)))
                    .map(|units| (user_id, Money::from_minor(units)))
            })
            .collect::<Result<Balances, LedgerError>>()?;

        debug!(
            expenses = expenses.len(),
            users = balances.len(),
            "Calculated group balances"
        );
        Ok(balances)
    }

    /// Validates every record and returns the batch currency, `None` when the
    /// batch is empty.
    pub fn single_currency(expenses: &[ExpenseRecord]) -> Result<Option<Currency>, LedgerError> {
        let mut currency: Option<Currency> = None;
        for expense in expenses {
            expense.validate()?;
            match currency {
                None => currency = Some(expense.currency),
                Some(expected) if expected != expense.currency => {
                    return Err(LedgerError::CurrencyMismatch {
                        expected,
                        found: expense.currency,
                        expense_id: expense.id.clone(),
                    });
                }
                Some(_) => {}
            }
        }
        Ok(currency)
    }

    /// Returns each participant's share of the expense, explicit or equal split.
    pub fn resolve_shares(expense: &ExpenseRecord) -> Result<Vec<(UserId, Money)>, LedgerError> {
        if expense.has_explicit_shares() {
            return expense
                .participants
                .iter()
                .map(|p| {
                    p.share
                        .map(|share| (p.user_id.clone(), share))
                        .ok_or_else(|| LedgerError::invalid_expense(&expense.id, "missing explicit share"))
                })
                .collect();
        }

        let user_ids: Vec<&str> = expense.participants.iter().map(|p| p.user_id.as_str()).collect();
        Self::split_equally(expense.amount, &user_ids)
            .ok_or_else(|| LedgerError::invalid_expense(&expense.id, "amount cannot be split"))
    }

    /// Splits `amount` into equal integer shares. The leftover minor units go
    /// one at a time to participants in ascending user id order, so the result
    /// is the same however the participants were listed.
    ///
    /// The returned shares are ordered by user id.
    pub fn split_equally(amount: Money, user_ids: &[&str]) -> Option<Vec<(UserId, Money)>> {
        let (base, remainder) = amount.split_even(user_ids.len())?;
        let mut ordered: Vec<&str> = user_ids.to_vec();
        ordered.sort_unstable();

        Some(
            ordered
                .into_iter()
                .enumerate()
                .map(|(idx, user_id)| {
                    let share = if idx < remainder { base + Money::from_minor(1) } else { base };
                    (user_id.to_string(), share)
                })
                .collect(),
        )
    }
}
