use rusqlite::Connection;
use tracing::info;

use crate::StoreError;

pub fn run(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            login       TEXT NOT NULL UNIQUE,
            password    TEXT NOT NULL,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- AUTOINCREMENT keeps ids monotonic: once assigned, never reused.
        CREATE TABLE IF NOT EXISTS card_payments (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            card_number TEXT,
            amount      INTEGER,
            card_ttl    TEXT,
            cvc         TEXT,
            comment     TEXT,
            email       TEXT,
            is_safe     INTEGER
        );

        CREATE TABLE IF NOT EXISTS requested_payments (
            id             INTEGER PRIMARY KEY AUTOINCREMENT,
            tax            TEXT,
            bic            TEXT,
            account_number TEXT,
            phone          TEXT,
            amount         INTEGER,
            comment        TEXT,
            email          TEXT
        );
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
