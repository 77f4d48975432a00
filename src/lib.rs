pub mod api;
pub mod config;
pub mod core;
pub mod infrastructure;

pub use crate::core::balance::BalanceCalculator;
pub use crate::core::errors::LedgerError;
pub use crate::core::services::LedgerService;
pub use crate::core::settlement::SettlementPlanner;
pub use infrastructure::logging::in_memory::InMemoryActivityLog;
pub use infrastructure::storage::in_memory::InMemoryStorage;

#[cfg(test)]
mod tests;
