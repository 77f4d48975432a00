use crate::{
    api::models::*,
    config::CONFIG,
    core::{
        models::{ActivityEntry, Currency, ExpenseRecord, GroupLedger},
        services::LedgerService,
    },
    infrastructure::{logging::in_memory::InMemoryActivityLog, storage::in_memory::InMemoryStorage},
};
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use std::sync::Arc;
use tracing::info;

pub type AppService = LedgerService<InMemoryStorage, InMemoryStorage, InMemoryActivityLog>;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<AppService>,
    pub default_currency: Currency,
}

impl AppState {
    pub fn new(service: Arc<AppService>) -> Self {
        AppState {
            service,
            default_currency: CONFIG.default_currency,
        }
    }
}

// Define API routes
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/expenses", post(create_expense))
        .route("/groups/{group_id}/expenses", get(list_group_expenses))
        .route("/groups/{group_id}/ledger", get(get_group_ledger))
        .route("/groups/{group_id}/settle-up", get(settle_up))
        .route("/logs", get(get_activity_logs))
        .with_state(state)
}

#[utoipa::path(
    post,
    path = "/api/expenses",
    request_body = CreateExpenseRequest,
    responses(
        (status = 201, description = "Expense recorded", body = ExpenseRecord),
        (status = 400, description = "Malformed or inconsistent expense", body = ErrorResponse),
        (status = 422, description = "Currency differs from the group's expenses", body = ErrorResponse),
        (status = 503, description = "Expense store unavailable, retry later", body = ErrorResponse)
    )
)]
pub async fn create_expense(
    State(state): State<AppState>,
    Json(req): Json<CreateExpenseRequest>,
) -> Result<(StatusCode, Json<ExpenseRecord>), ApiError> {
    let new_expense = req.into_new_expense(state.default_currency)?;
    let expense = state.service.record_expense(new_expense).await?;
    info!(expense_id = %expense.id, "Expense created via API");
    Ok((StatusCode::CREATED, Json(expense)))
}

#[utoipa::path(
    get,
    path = "/api/groups/{group_id}/expenses",
    params(
        ("group_id" = String, Path, description = "ID of the group")
    ),
    responses(
        (status = 200, description = "Expenses of the group, oldest first", body = Vec<ExpenseRecord>),
        (status = 503, description = "Expense store unavailable, retry later", body = ErrorResponse)
    )
)]
pub async fn list_group_expenses(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
) -> Result<Json<Vec<ExpenseRecord>>, ApiError> {
    let expenses = state.service.list_expenses(&group_id).await?;
    Ok(Json(expenses))
}

#[utoipa::path(
    get,
    path = "/api/groups/{group_id}/ledger",
    params(
        ("group_id" = String, Path, description = "ID of the group")
    ),
    responses(
        (status = 200, description = "Balances and settlement plan", body = GroupLedger),
        (status = 400, description = "A stored expense is invalid", body = ErrorResponse),
        (status = 422, description = "Expenses use more than one currency", body = ErrorResponse),
        (status = 500, description = "Ledger invariant violated", body = ErrorResponse),
        (status = 503, description = "Expense store unavailable, retry later", body = ErrorResponse)
    )
)]
pub async fn get_group_ledger(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
) -> Result<Json<GroupLedger>, ApiError> {
    let ledger = state.service.compute(&group_id).await?;
    Ok(Json(ledger))
}

#[utoipa::path(
    get,
    path = "/api/groups/{group_id}/settle-up",
    params(
        ("group_id" = String, Path, description = "ID of the group")
    ),
    responses(
        (status = 200, description = "Transfers that settle the group", body = SettleUpResponse),
        (status = 400, description = "A stored expense is invalid", body = ErrorResponse),
        (status = 422, description = "Expenses use more than one currency", body = ErrorResponse),
        (status = 500, description = "Ledger invariant violated", body = ErrorResponse),
        (status = 503, description = "Expense store unavailable, retry later", body = ErrorResponse)
    )
)]
pub async fn settle_up(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
) -> Result<Json<SettleUpResponse>, ApiError> {
    let ledger = state.service.settle_up(&group_id).await?;
    Ok(Json(SettleUpResponse::from(ledger)))
}

#[utoipa::path(
    get,
    path = "/api/logs",
    responses(
        (status = 200, description = "Ledger activity log", body = Vec<ActivityEntry>)
    )
)]
pub async fn get_activity_logs(State(state): State<AppState>) -> Result<Json<Vec<ActivityEntry>>, ApiError> {
    let logs = state.service.get_activity_logs().await?;
    Ok(Json(logs))
}
