use thiserror::Error;

use paydesk_types::models::{NewCardPayment, NewRequestedPayment};
use paydesk_types::query::QuerySpec;

use crate::models::{CardPaymentRow, RequestedPaymentRow, UserRow};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage failure: {0}")]
    Persistence(#[from] rusqlite::Error),
    #[error("storage lock poisoned")]
    LockPoisoned,
}

/// Outcome of a safety-flag patch. Patching an id that does not exist is
/// reported as `NotFound`, never as an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatchOutcome {
    Updated,
    NotFound,
}

/// The narrow CRUD contract the handlers consume. Implemented by the
/// SQLite-backed [`Database`](crate::Database); the handlers only ever see
/// this trait.
pub trait PaymentStore: Send + Sync {
    fn create_card_payment(&self, payment: &NewCardPayment) -> Result<i64, StoreError>;

    fn create_requested_payment(&self, payment: &NewRequestedPayment) -> Result<i64, StoreError>;

    /// With a filter set, returns only rows whose field exactly equals the
    /// coerced value; with a sort set, returns all rows ordered by that
    /// field; otherwise all rows in id order.
    fn list_card_payments(&self, query: &QuerySpec) -> Result<Vec<CardPaymentRow>, StoreError>;

    fn list_requested_payments(
        &self,
        query: &QuerySpec,
    ) -> Result<Vec<RequestedPaymentRow>, StoreError>;

    fn patch_card_payment(&self, id: i64, is_safe: bool) -> Result<PatchOutcome, StoreError>;

    fn get_user(&self, login: &str, password_digest: &str) -> Result<Option<UserRow>, StoreError>;

    fn upsert_user(&self, login: &str, password_digest: &str) -> Result<(), StoreError>;
}
