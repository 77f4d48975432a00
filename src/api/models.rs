use axum::{
    Json,
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::errors::LedgerError;
use crate::core::models::{Balances, Currency, GroupLedger, Money, NewExpense, Participant};

/// An amount as sent by a client: an integer number of minor units, or an
/// exact decimal string such as `"12.34"`. JSON floats match neither form and
/// are rejected.
#[derive(Clone, Debug, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum AmountInput {
    MinorUnits(i64),
    Decimal(String),
}

impl AmountInput {
    pub fn to_money(&self, currency: Currency) -> Result<Money, LedgerError> {
        match self {
            AmountInput::MinorUnits(units) => Ok(Money::from_minor(*units)),
            AmountInput::Decimal(text) => Money::parse_decimal(text, currency).map_err(LedgerError::InvalidExpense),
        }
    }
}

#[derive(Clone, Debug, Deserialize, ToSchema)]
pub struct SplitInput {
    pub user_id: String,
    pub share: Option<AmountInput>,
}

#[derive(Clone, Debug, Deserialize, ToSchema)]
pub struct CreateExpenseRequest {
    pub group_id: String,
    pub payer_id: String,
    pub amount: AmountInput,
    pub currency: Option<Currency>,
    pub description: Option<String>,
    pub split_between: Vec<SplitInput>,
}

impl CreateExpenseRequest {
    pub fn into_new_expense(self, default_currency: Currency) -> Result<NewExpense, LedgerError> {
        let currency = self.currency.unwrap_or(default_currency);
        let amount = self.amount.to_money(currency)?;
        let split_between = self
            .split_between
            .into_iter()
            .map(|split| {
                Ok(Participant {
                    share: split.share.map(|s| s.to_money(currency)).transpose()?,
                    user_id: split.user_id,
                })
            })
            .collect::<Result<Vec<_>, LedgerError>>()?;

        Ok(NewExpense {
            group_id: self.group_id,
            payer_id: self.payer_id,
            amount,
            currency,
            description: self.description,
            split_between,
        })
    }
}

#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct SettleUpTransfer {
    pub from: String,
    pub to: String,
    #[schema(value_type = i64)]
    pub amount: Money,
    /// Human-readable amount in major units, e.g. "12.34".
    pub display_amount: String,
}

#[derive(Clone, Debug, Serialize, ToSchema)]
pub struct SettleUpResponse {
    pub group_id: String,
    pub currency: Currency,
    #[schema(value_type = Object)]
    pub balances: Balances,
    pub transfers: Vec<SettleUpTransfer>,
}

impl From<GroupLedger> for SettleUpResponse {
    fn from(ledger: GroupLedger) -> Self {
        let currency = ledger.currency;
        SettleUpResponse {
            group_id: ledger.group_id,
            currency,
            balances: ledger.balances,
            transfers: ledger
                .settlements
                .into_iter()
                .map(|t| SettleUpTransfer {
                    display_amount: t.amount.to_decimal_string(currency),
                    from: t.from,
                    to: t.to,
                    amount: t.amount,
                })
                .collect(),
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub retryable: bool,
}

// Newtype wrapper for LedgerError to implement IntoResponse
pub struct ApiError(pub LedgerError);

impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self.0 {
            LedgerError::InvalidExpense(_) => StatusCode::BAD_REQUEST,
            LedgerError::CurrencyMismatch { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            LedgerError::InvariantViolation(_) | LedgerError::UnbalancedInput(_) => {
                tracing::error!(error = %self.0, "Ledger computation aborted");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            LedgerError::UpstreamUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        };
        let body = Json(ErrorResponse {
            error: self.0.to_string(),
            retryable: self.0.is_retryable(),
        });
        if self.0.is_retryable() {
            (status, [(header::RETRY_AFTER, "5")], body).into_response()
        } else {
            (status, body).into_response()
        }
    }
}
