/// Database row types — these map directly to SQLite rows.
/// Distinct from paydesk-types API views to keep the DB layer independent.

#[derive(Debug, Clone)]
pub struct CardPaymentRow {
    pub id: i64,
    pub card_number: Option<String>,
    pub amount: Option<i64>,
    /// ISO date text (`YYYY-MM-01`), rendered back to `MM.YYYY` by the API.
    pub card_ttl: Option<String>,
    pub cvc: Option<String>,
    pub comment: Option<String>,
    pub email: Option<String>,
    pub is_safe: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct RequestedPaymentRow {
    pub id: i64,
    pub tax: Option<String>,
    pub bic: Option<String>,
    pub account_number: Option<String>,
    pub phone: Option<String>,
    pub amount: Option<i64>,
    pub comment: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: i64,
    pub login: String,
    pub password: String,
    pub created_at: String,
}
