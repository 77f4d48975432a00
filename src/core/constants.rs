pub const EXPENSE_RECORDED: &str = "EXPENSE_RECORDED";
pub const EXPENSES_LISTED: &str = "EXPENSES_LISTED";
pub const LEDGER_COMPUTED: &str = "LEDGER_COMPUTED";
pub const SETTLE_UP_COMPUTED: &str = "SETTLE_UP_COMPUTED";

/// Longest description accepted on an expense.
pub const MAX_DESCRIPTION_LENGTH: usize = 255;
