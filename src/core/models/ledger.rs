use super::expense::{GroupId, UserId};
use super::money::{Currency, Money};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::ToSchema;

/// Net position per user, ordered by user id. Positive means the group owes
/// the user, negative means the user owes the group.
pub type Balances = BTreeMap<UserId, Money>;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Transfer {
    pub from: UserId,
    pub to: UserId,
    #[schema(value_type = i64)]
    pub amount: Money,
}

impl Transfer {
    pub fn new(from: impl Into<UserId>, to: impl Into<UserId>, amount: Money) -> Self {
        Transfer {
            from: from.into(),
            to: to.into(),
            amount,
        }
    }
}

/// Ordered list of transfers; replaying it zeroes every balance.
pub type SettlementPlan = Vec<Transfer>;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct GroupLedger {
    pub group_id: GroupId,
    pub currency: Currency,
    #[schema(value_type = Object, example = json!({"alice": 200, "bob": -100, "carol": -100}))]
    pub balances: Balances,
    pub settlements: SettlementPlan,
}
