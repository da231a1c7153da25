use rusqlite::Row;

use paydesk_types::models::{NewCardPayment, NewRequestedPayment};
use paydesk_types::query::{FieldValue, QuerySpec};

use crate::models::{CardPaymentRow, RequestedPaymentRow, UserRow};
use crate::store::{PatchOutcome, PaymentStore, StoreError};
use crate::Database;

const ISO_DATE: &str = "%Y-%m-%d";

impl PaymentStore for Database {
    fn create_card_payment(&self, payment: &NewCardPayment) -> Result<i64, StoreError> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO card_payments (card_number, amount, card_ttl, cvc, comment, email)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![
                    payment.card_number,
                    payment.amount,
                    payment.card_ttl.format(ISO_DATE).to_string(),
                    payment.cvc,
                    payment.comment,
                    payment.email,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    fn create_requested_payment(&self, payment: &NewRequestedPayment) -> Result<i64, StoreError> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO requested_payments (tax, bic, account_number, phone, amount, comment, email)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                rusqlite::params![
                    payment.tax,
                    payment.bic,
                    payment.account_number,
                    payment.phone,
                    payment.amount,
                    payment.comment,
                    payment.email,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    fn list_card_payments(&self, query: &QuerySpec) -> Result<Vec<CardPaymentRow>, StoreError> {
        self.with_conn(|conn| {
            let sql = select_sql(
                "SELECT id, card_number, amount, card_ttl, cvc, comment, email, is_safe
                 FROM card_payments",
                query,
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = match query {
                QuerySpec::Filter { value, .. } => stmt
                    .query_map([filter_param(value)], card_payment_row)?
                    .collect::<Result<Vec<_>, _>>()?,
                _ => stmt
                    .query_map([], card_payment_row)?
                    .collect::<Result<Vec<_>, _>>()?,
            };
            Ok(rows)
        })
    }

    fn list_requested_payments(
        &self,
        query: &QuerySpec,
    ) -> Result<Vec<RequestedPaymentRow>, StoreError> {
        self.with_conn(|conn| {
            let sql = select_sql(
                "SELECT id, tax, bic, account_number, phone, amount, comment, email
                 FROM requested_payments",
                query,
            );
            let mut stmt = conn.prepare(&sql)?;
            let rows = match query {
                QuerySpec::Filter { value, .. } => stmt
                    .query_map([filter_param(value)], requested_payment_row)?
                    .collect::<Result<Vec<_>, _>>()?,
                _ => stmt
                    .query_map([], requested_payment_row)?
                    .collect::<Result<Vec<_>, _>>()?,
            };
            Ok(rows)
        })
    }

    fn patch_card_payment(&self, id: i64, is_safe: bool) -> Result<PatchOutcome, StoreError> {
        self.with_conn_mut(|conn| {
            let changed = conn.execute(
                "UPDATE card_payments SET is_safe = ?1 WHERE id = ?2",
                rusqlite::params![is_safe, id],
            )?;
            Ok(if changed == 0 {
                PatchOutcome::NotFound
            } else {
                PatchOutcome::Updated
            })
        })
    }

    fn get_user(&self, login: &str, password_digest: &str) -> Result<Option<UserRow>, StoreError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, login, password, created_at FROM users
                 WHERE login = ?1 AND password = ?2",
            )?;
            let row = stmt
                .query_row([login, password_digest], |row| {
                    Ok(UserRow {
                        id: row.get(0)?,
                        login: row.get(1)?,
                        password: row.get(2)?,
                        created_at: row.get(3)?,
                    })
                })
                .optional()?;
            Ok(row)
        })
    }

    fn upsert_user(&self, login: &str, password_digest: &str) -> Result<(), StoreError> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO users (login, password) VALUES (?1, ?2)
                 ON CONFLICT(login) DO UPDATE SET password = excluded.password",
                [login, password_digest],
            )?;
            Ok(())
        })
    }
}

/// Append the WHERE/ORDER BY tail for a query spec. Field names inside the
/// spec come from the closed descriptor tables, never from raw input, which
/// is what makes them safe to splice into the statement.
fn select_sql(base: &str, query: &QuerySpec) -> String {
    match query {
        QuerySpec::Unfiltered => format!("{base} ORDER BY id"),
        QuerySpec::Sort { field, order } => {
            format!("{base} ORDER BY {field} {}", order.as_sql())
        }
        QuerySpec::Filter { field, .. } => format!("{base} WHERE {field} = ?1 ORDER BY id"),
    }
}

fn filter_param(value: &FieldValue) -> rusqlite::types::Value {
    match value {
        FieldValue::Int(n) => (*n).into(),
        FieldValue::Month(date) => date.format(ISO_DATE).to_string().into(),
        FieldValue::Text(text) => text.clone().into(),
    }
}

fn card_payment_row(row: &Row<'_>) -> rusqlite::Result<CardPaymentRow> {
    Ok(CardPaymentRow {
        id: row.get(0)?,
        card_number: row.get(1)?,
        amount: row.get(2)?,
        card_ttl: row.get(3)?,
        cvc: row.get(4)?,
        comment: row.get(5)?,
        email: row.get(6)?,
        is_safe: row.get(7)?,
    })
}

fn requested_payment_row(row: &Row<'_>) -> rusqlite::Result<RequestedPaymentRow> {
    Ok(RequestedPaymentRow {
        id: row.get(0)?,
        tax: row.get(1)?,
        bic: row.get(2)?,
        account_number: row.get(3)?,
        phone: row.get(4)?,
        amount: row.get(5)?,
        comment: row.get(6)?,
        email: row.get(7)?,
    })
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>, StoreError>;
}

impl<T> OptionalExt<T> for Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>, StoreError> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use paydesk_types::query::{SortOrder, CARD_PAYMENT_FIELDS};

    fn card(amount: i64, ttl: &str, email: &str) -> NewCardPayment {
        NewCardPayment {
            card_number: "4242424242424242".to_string(),
            amount,
            card_ttl: paydesk_types::month::parse_month(ttl).unwrap(),
            cvc: "123".to_string(),
            comment: None,
            email: email.to_string(),
        }
    }

    fn requested(amount: i64) -> NewRequestedPayment {
        NewRequestedPayment {
            tax: "7701234567".to_string(),
            bic: "044525225".to_string(),
            account_number: "40702810900000012345".to_string(),
            phone: "+70000000000".to_string(),
            amount,
            comment: Some("invoice 17".to_string()),
            email: "billing@example.com".to_string(),
        }
    }

    #[test]
    fn create_assigns_sequential_ids() {
        let db = Database::open_in_memory().unwrap();
        let first = db.create_card_payment(&card(100, "01.2026", "a@example.com")).unwrap();
        let second = db.create_card_payment(&card(200, "02.2026", "b@example.com")).unwrap();
        assert!(second > first);
    }

    #[test]
    fn created_payment_round_trips_through_list() {
        let db = Database::open_in_memory().unwrap();
        db.create_card_payment(&card(1500, "09.2027", "a@example.com")).unwrap();

        let rows = db.list_card_payments(&QuerySpec::Unfiltered).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].amount, Some(1500));
        assert_eq!(rows[0].card_ttl.as_deref(), Some("2027-09-01"));
        assert_eq!(rows[0].is_safe, None);
    }

    #[test]
    fn filter_by_id_is_exact() {
        let db = Database::open_in_memory().unwrap();
        for i in 1..=5 {
            db.create_card_payment(&card(i * 100, "01.2026", "a@example.com")).unwrap();
        }

        let spec = QuerySpec::Filter {
            field: "id",
            value: FieldValue::Int(5),
        };
        let rows = db.list_card_payments(&spec).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, 5);

        let spec = QuerySpec::Filter {
            field: "id",
            value: FieldValue::Int(99),
        };
        assert!(db.list_card_payments(&spec).unwrap().is_empty());
    }

    #[test]
    fn filter_by_month_matches_normalized_date() {
        let db = Database::open_in_memory().unwrap();
        db.create_card_payment(&card(100, "09.2027", "a@example.com")).unwrap();
        db.create_card_payment(&card(200, "10.2027", "b@example.com")).unwrap();

        let spec = QuerySpec::Filter {
            field: "card_ttl",
            value: FieldValue::Month(NaiveDate::from_ymd_opt(2027, 9, 1).unwrap()),
        };
        let rows = db.list_card_payments(&spec).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].amount, Some(100));
    }

    #[test]
    fn sort_orders_by_field() {
        let db = Database::open_in_memory().unwrap();
        db.create_card_payment(&card(300, "01.2026", "a@example.com")).unwrap();
        db.create_card_payment(&card(100, "01.2026", "b@example.com")).unwrap();
        db.create_card_payment(&card(200, "01.2026", "c@example.com")).unwrap();

        let spec = QuerySpec::Sort {
            field: "amount",
            order: SortOrder::Desc,
        };
        let amounts: Vec<_> = db
            .list_card_payments(&spec)
            .unwrap()
            .into_iter()
            .map(|r| r.amount.unwrap())
            .collect();
        assert_eq!(amounts, vec![300, 200, 100]);
    }

    #[test]
    fn unfiltered_list_is_in_id_order() {
        let db = Database::open_in_memory().unwrap();
        db.create_card_payment(&card(300, "01.2026", "a@example.com")).unwrap();
        db.create_card_payment(&card(100, "01.2026", "b@example.com")).unwrap();

        let ids: Vec<_> = db
            .list_card_payments(&QuerySpec::Unfiltered)
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn every_descriptor_field_is_a_real_column() {
        let db = Database::open_in_memory().unwrap();
        db.create_card_payment(&card(100, "01.2026", "a@example.com")).unwrap();

        for field in ["id", "card_number", "amount", "card_ttl", "cvc", "comment", "email", "is_safe"] {
            let (field, _) = CARD_PAYMENT_FIELDS.lookup(field).unwrap();
            let spec = QuerySpec::Sort {
                field,
                order: SortOrder::Asc,
            };
            db.list_card_payments(&spec).unwrap();
        }
    }

    #[test]
    fn patch_sets_the_flag_and_reports_updated() {
        let db = Database::open_in_memory().unwrap();
        let id = db.create_card_payment(&card(100, "01.2026", "a@example.com")).unwrap();

        assert_eq!(db.patch_card_payment(id, false).unwrap(), PatchOutcome::Updated);
        let rows = db.list_card_payments(&QuerySpec::Unfiltered).unwrap();
        assert_eq!(rows[0].is_safe, Some(false));

        // re-patching overwrites the verdict
        assert_eq!(db.patch_card_payment(id, true).unwrap(), PatchOutcome::Updated);
        let rows = db.list_card_payments(&QuerySpec::Unfiltered).unwrap();
        assert_eq!(rows[0].is_safe, Some(true));
    }

    #[test]
    fn patch_of_missing_id_reports_not_found() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.patch_card_payment(42, true).unwrap(), PatchOutcome::NotFound);
    }

    #[test]
    fn requested_payments_round_trip() {
        let db = Database::open_in_memory().unwrap();
        db.create_requested_payment(&requested(7500)).unwrap();

        let rows = db.list_requested_payments(&QuerySpec::Unfiltered).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].amount, Some(7500));
        assert_eq!(rows[0].bic.as_deref(), Some("044525225"));
        assert_eq!(rows[0].comment.as_deref(), Some("invoice 17"));
    }

    #[test]
    fn get_user_matches_login_and_digest() {
        let db = Database::open_in_memory().unwrap();
        db.upsert_user("admin", "digest-1").unwrap();

        assert!(db.get_user("admin", "digest-1").unwrap().is_some());
        assert!(db.get_user("admin", "digest-2").unwrap().is_none());
        assert!(db.get_user("nobody", "digest-1").unwrap().is_none());

        // upsert replaces the digest in place
        db.upsert_user("admin", "digest-2").unwrap();
        assert!(db.get_user("admin", "digest-1").unwrap().is_none());
        assert!(db.get_user("admin", "digest-2").unwrap().is_some());
    }
}
