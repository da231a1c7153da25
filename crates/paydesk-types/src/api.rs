use serde::{Deserialize, Serialize};

// -- Envelopes --

/// The fixed success envelope: `{"result": "OK"}`.
#[derive(Debug, Serialize)]
pub struct OkEnvelope {
    pub result: &'static str,
}

impl OkEnvelope {
    pub fn ok() -> Self {
        Self { result: "OK" }
    }
}

#[derive(Debug, Serialize)]
pub struct ListEnvelope<T> {
    pub result: Vec<T>,
}

/// The opaque failure envelope. Internal detail never crosses the wire; it
/// goes to the logs instead.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: String,
}

// -- Card payments --

/// Submission fields are deserialized permissively so that validation
/// failures surface as the error envelope rather than a framework rejection.
/// `amount` accepts a JSON integer or a numeric string.
#[derive(Debug, Deserialize)]
pub struct CreateCardPaymentRequest {
    pub card_number: Option<String>,
    pub amount: Option<serde_json::Value>,
    pub card_ttl: Option<String>,
    pub cvc: Option<String>,
    pub comment: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PatchCardPaymentRequest {
    pub payment_id: Option<serde_json::Value>,
    /// Inverted on arrival: absent or falsy means the payment is safe.
    #[serde(rename = "notSafe", default)]
    pub not_safe: Option<serde_json::Value>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CardPaymentView {
    pub id: i64,
    pub card_number: Option<String>,
    pub amount: Option<i64>,
    pub card_ttl: Option<String>,
    pub cvc: Option<String>,
    pub comment: Option<String>,
    pub email: Option<String>,
    pub is_safe: Option<bool>,
}

// -- Requested payments --

#[derive(Debug, Deserialize)]
pub struct CreateRequestedPaymentRequest {
    pub tax: Option<String>,
    pub bic: Option<String>,
    pub account_number: Option<String>,
    pub phone: Option<String>,
    pub comment: Option<String>,
    pub email: Option<String>,
    pub amount: Option<serde_json::Value>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RequestedPaymentView {
    pub id: i64,
    pub tax: Option<String>,
    pub bic: Option<String>,
    pub phone: Option<String>,
    pub account_number: Option<String>,
    pub comment: Option<String>,
    pub email: Option<String>,
    pub amount: Option<i64>,
}

// -- Admin --

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub login: Option<String>,
    pub password: Option<String>,
}

// -- Documents --

/// Fields for the bank payment order document. Rendered into the template
/// as-is; absent fields render empty.
#[derive(Debug, Deserialize)]
pub struct BankPaymentOrderRequest {
    pub payment_from: Option<String>,
    pub bic: Option<String>,
    pub account_number: Option<String>,
    pub comment: Option<String>,
    pub amount: Option<serde_json::Value>,
}
