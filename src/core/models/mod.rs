pub mod activity;
pub mod expense;
pub mod ledger;
pub mod money;

pub use activity::ActivityEntry;
pub use expense::{ExpenseRecord, GroupId, NewExpense, Participant, UserId};
pub use ledger::{Balances, GroupLedger, SettlementPlan, Transfer};
pub use money::{Currency, Money};
