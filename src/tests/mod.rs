mod api_tests;

use crate::core::models::{Balances, Currency, ExpenseRecord, Money, Participant};
use crate::core::services::LedgerService;
use crate::infrastructure::logging::in_memory::InMemoryActivityLog;
use crate::infrastructure::storage::in_memory::InMemoryStorage;
use chrono::{TimeZone, Utc};
use std::time::Duration;

pub fn create_test_service() -> (
    LedgerService<InMemoryStorage, InMemoryStorage, InMemoryActivityLog>,
    InMemoryStorage,
    InMemoryActivityLog,
) {
    let storage = InMemoryStorage::new();
    let logging = InMemoryActivityLog::new();
    let service = LedgerService::new(
        storage.clone(),
        storage.clone(),
        logging.clone(),
        Duration::from_millis(500),
        Currency::Usd,
    );
    (service, storage, logging)
}

/// USD expense in group `g1` split equally among `participants`.
pub fn equal_expense(id: &str, payer: &str, amount: i64, participants: &[&str]) -> ExpenseRecord {
    ExpenseRecord {
        id: id.to_string(),
        group_id: "g1".to_string(),
        payer_id: payer.to_string(),
        amount: Money::from_minor(amount),
        currency: Currency::Usd,
        participants: participants.iter().map(|p| Participant::equal(*p)).collect(),
        description: None,
        created_at: Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
    }
}

pub fn shared_expense(id: &str, payer: &str, amount: i64, shares: &[(&str, i64)]) -> ExpenseRecord {
    ExpenseRecord {
        participants: shares
            .iter()
            .map(|(user, share)| Participant::with_share(*user, Money::from_minor(*share)))
            .collect(),
        ..equal_expense(id, payer, amount, &[])
    }
}

pub fn balances(entries: &[(&str, i64)]) -> Balances {
    entries
        .iter()
        .map(|(user, amount)| (user.to_string(), Money::from_minor(*amount)))
        .collect()
}
