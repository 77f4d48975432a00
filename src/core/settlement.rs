use crate::core::errors::LedgerError;
use crate::core::models::{Balances, Money, SettlementPlan, Transfer};
use tracing::debug;

/// Builds the list of payments that brings every balance back to zero.
///
/// The planner is a greedy cash-flow matcher, not a minimum-transaction
/// solver. Finding the fewest possible transfers is a set-partition problem
/// and NP-hard in general, so the plan may occasionally use more transfers
/// than an exhaustive search would. What it does guarantee: replaying the plan
/// zeroes every balance, each transfer zeroes at least one party, and there
/// are never more than `N - 1` transfers for `N` users with a non-zero balance.
pub struct SettlementPlanner;

impl SettlementPlanner {
    /// Matches the largest debtor against the largest creditor until both
    /// sides are exhausted.
    ///
    /// Creditors and debtors are ordered once by magnitude descending, ties
    /// broken by ascending user id. A party that is only partly settled stays
    /// at the head of its list until its balance reaches zero.
    pub fn plan(balances: &Balances) -> Result<SettlementPlan, LedgerError> {
        let total: i128 = balances.values().map(|m| i128::from(m.minor_units())).sum();
        if total != 0 {
            let drift = i64::try_from(total).unwrap_or(if total > 0 { i64::MAX } else { i64::MIN });
            return Err(LedgerError::UnbalancedInput(Money::from_minor(drift)));
        }

        let mut creditors: Vec<(&str, Money)> = Vec::new();
        let mut debtors: Vec<(&str, Money)> = Vec::new();
        for (user_id, balance) in balances {
            if balance.is_positive() {
                creditors.push((user_id.as_str(), *balance));
            } else if balance.is_negative() {
                let owed = Money::ZERO
                    .checked_sub(*balance)
                    .ok_or(LedgerError::UnbalancedInput(*balance))?;
                debtors.push((user_id.as_str(), owed));
            }
        }
        Self::order_work_list(&mut creditors);
        Self::order_work_list(&mut debtors);

        let mut plan = SettlementPlan::with_capacity((creditors.len() + debtors.len()).saturating_sub(1));
        let (mut ci, mut di) = (0, 0);
        while ci < creditors.len() && di < debtors.len() {
            let (creditor, credit) = creditors[ci];
            let (debtor, debt) = debtors[di];
            let amount = credit.min(debt);

            plan.push(Transfer::new(debtor, creditor, amount));
            creditors[ci].1 = credit - amount;
            debtors[di].1 = debt - amount;

            if creditors[ci].1.is_zero() {
                ci += 1;
            }
            if debtors[di].1.is_zero() {
                di += 1;
            }
        }

        // Unreachable for a zero-sum input.
        if ci < creditors.len() || di < debtors.len() {
            let leftover: Money = creditors[ci..].iter().map(|(_, m)| *m).sum::<Money>()
                - debtors[di..].iter().map(|(_, m)| *m).sum::<Money>();
            return Err(LedgerError::UnbalancedInput(leftover));
        }

        debug!(
            creditors = creditors.len(),
            debtors = debtors.len(),
            transfers = plan.len(),
            "Planned settlement"
        );
        Ok(plan)
    }

    /// Replays `plan` against `balances`: the payer's balance rises and the
    /// payee's falls by each transfer amount.
    pub fn apply_transfers(balances: &Balances, plan: &[Transfer]) -> Balances {
        let mut result = balances.clone();
        for transfer in plan {
            *result.entry(transfer.from.clone()).or_insert(Money::ZERO) += transfer.amount;
            *result.entry(transfer.to.clone()).or_insert(Money::ZERO) -= transfer.amount;
        }
        result
    }

    fn order_work_list(parties: &mut [(&str, Money)]) {
        parties.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    }
}
