use super::money::{Currency, Money};
use crate::core::constants::MAX_DESCRIPTION_LENGTH;
use crate::core::errors::LedgerError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use utoipa::ToSchema;

pub type UserId = String;
pub type GroupId = String;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Participant {
    pub user_id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<i64>)]
    pub share: Option<Money>,
}

impl Participant {
    pub fn equal(user_id: impl Into<UserId>) -> Self {
        Participant {
            user_id: user_id.into(),
            share: None,
        }
    }

    pub fn with_share(user_id: impl Into<UserId>, share: Money) -> Self {
        Participant {
            user_id: user_id.into(),
            share: Some(share),
        }
    }
}

/// One shared cost. Immutable once stored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ExpenseRecord {
    pub id: String,
    pub group_id: GroupId,
    pub payer_id: UserId,
    #[schema(value_type = i64)]
    pub amount: Money,
    pub currency: Currency,
    pub participants: Vec<Participant>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[schema(value_type = String, example = "2024-06-01T12:34:56Z")]
    pub created_at: DateTime<Utc>,
}

impl ExpenseRecord {
    /// Checks the invariants the balance calculator depends on: a positive
    /// amount, at least one participant, no duplicate participant and
    /// consistent explicit shares.
    pub fn validate(&self) -> Result<(), LedgerError> {
        if !self.amount.is_positive() {
            return Err(LedgerError::invalid_expense(
                &self.id,
                format!("amount must be greater than 0, got {}", self.amount),
            ));
        }
        if self.participants.is_empty() {
            return Err(LedgerError::invalid_expense(&self.id, "no participants"));
        }

        let mut seen = HashSet::with_capacity(self.participants.len());
        for participant in &self.participants {
            if !seen.insert(participant.user_id.as_str()) {
                return Err(LedgerError::invalid_expense(
                    &self.id,
                    format!("duplicate participant {}", participant.user_id),
                ));
            }
        }

        let explicit = self.participants.iter().filter(|p| p.share.is_some()).count();
        if explicit == 0 {
            return Ok(());
        }
        if explicit != self.participants.len() {
            return Err(LedgerError::invalid_expense(
                &self.id,
                "either every participant has an explicit share or none do",
            ));
        }

        let mut total = Money::ZERO;
        for participant in &self.participants {
            let share = participant.share.unwrap_or(Money::ZERO);
            if share.is_negative() {
                return Err(LedgerError::invalid_expense(
                    &self.id,
                    format!("negative share for {}", participant.user_id),
                ));
            }
            total = total
                .checked_add(share)
                .ok_or_else(|| LedgerError::invalid_expense(&self.id, "shares overflow"))?;
        }
        if total != self.amount {
            return Err(LedgerError::invalid_expense(
                &self.id,
                format!("shares ({}) must sum to amount ({})", total, self.amount),
            ));
        }
        Ok(())
    }

    /// Submission rules for a new expense, on top of [`validate`](Self::validate).
    /// Records already in the store are not held to these.
    pub fn validate_submission(&self) -> Result<(), LedgerError> {
        if self.payer_id.trim().is_empty() {
            return Err(LedgerError::invalid_expense(&self.id, "payer id is empty"));
        }
        if self.participants.iter().any(|p| p.user_id.trim().is_empty()) {
            return Err(LedgerError::invalid_expense(&self.id, "participant id is empty"));
        }
        if self
            .description
            .as_ref()
            .is_some_and(|d| d.chars().count() > MAX_DESCRIPTION_LENGTH)
        {
            return Err(LedgerError::invalid_expense(
                &self.id,
                format!("description exceeds {} characters", MAX_DESCRIPTION_LENGTH),
            ));
        }
        self.validate()
    }

    pub fn has_explicit_shares(&self) -> bool {
        self.participants.iter().any(|p| p.share.is_some())
    }
}

/// An expense as submitted for creation, before the store assigns an id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewExpense {
    pub group_id: GroupId,
    pub payer_id: UserId,
    pub amount: Money,
    pub currency: Currency,
    pub description: Option<String>,
    pub split_between: Vec<Participant>,
}

impl NewExpense {
    pub fn into_record(self, id: String, created_at: DateTime<Utc>) -> ExpenseRecord {
        ExpenseRecord {
            id,
            group_id: self.group_id,
            payer_id: self.payer_id,
            amount: self.amount,
            currency: self.currency,
            participants: self.split_between,
            description: self.description.filter(|d| !d.trim().is_empty()),
            created_at,
        }
    }
}
