use anyhow::Result;
use log::debug;
use rusqlite::{params, Connection, OptionalExtension, Transaction};

use crate::server::db::types::PasswordResetRecord;

const CREATE_TABLE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS password_resets (
    email TEXT PRIMARY KEY NOT NULL,
    token TEXT NOT NULL,
    create_time INTEGER NOT NULL
);
"#;

pub fn create_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(CREATE_TABLE_SQL)?;
    Ok(())
}

pub fn get(tx: &Transaction, email: &str) -> Result<Option<PasswordResetRecord>> {
    let sql = "SELECT email, token, create_time FROM password_resets WHERE email = ?";
    debug!("Database get_password_reset: {sql}, {email}");
    let reset = tx
        .query_row(sql, params![email], |row| {
            Ok(PasswordResetRecord {
                email: row.get(0)?,
                token: row.get(1)?,
                create_time: row.get(2)?,
            })
        })
        .optional()?;
    Ok(reset)
}

pub fn put(tx: &Transaction, reset: &PasswordResetRecord) -> Result<()> {
    let sql = "INSERT OR REPLACE INTO password_resets (email, token, create_time) VALUES (?, ?, ?)";
    debug!("Database put_password_reset: {sql}, {}", reset.email);
    tx.execute(sql, params![reset.email, reset.token, reset.create_time])?;
    Ok(())
}
