use utoipa::OpenApi;

use crate::{
    api::models::{AmountInput, CreateExpenseRequest, ErrorResponse, SettleUpResponse, SettleUpTransfer, SplitInput},
    core::models::{ActivityEntry, Currency, ExpenseRecord, GroupLedger, Participant, Transfer},
};

#[derive(OpenApi)]
#[openapi(
    paths(
        super::handlers::create_expense,
        super::handlers::list_group_expenses,
        super::handlers::get_group_ledger,
        super::handlers::settle_up,
        super::handlers::get_activity_logs
    ),
    components(schemas(
        AmountInput,
        SplitInput,
        CreateExpenseRequest,
        ErrorResponse,
        SettleUpResponse,
        SettleUpTransfer,
        Currency,
        Participant,
        ExpenseRecord,
        Transfer,
        GroupLedger,
        ActivityEntry
    )),
    info(
        title = "Trip Ledger API",
        description = "Group expense ledger and settlement planning for shared trips",
        version = "0.1.0"
    )
)]
pub struct ApiDoc;
