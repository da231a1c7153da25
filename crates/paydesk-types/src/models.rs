use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A validated card payment submission, ready to persist. `card_ttl` is
/// already normalized to the first day of the expiry month.
#[derive(Debug, Clone)]
pub struct NewCardPayment {
    pub card_number: String,
    pub amount: i64,
    pub card_ttl: NaiveDate,
    pub cvc: String,
    pub comment: Option<String>,
    pub email: String,
}

/// A validated bank-transfer ("requested") payment submission.
#[derive(Debug, Clone)]
pub struct NewRequestedPayment {
    pub tax: String,
    pub bic: String,
    pub account_number: String,
    pub phone: String,
    pub amount: i64,
    pub comment: Option<String>,
    pub email: String,
}

/// The admin identity bound to a session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminUser {
    pub id: i64,
    pub login: String,
}
