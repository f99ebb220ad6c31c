use anyhow::Result;
use log::debug;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction};

use crate::server::db::types::UserRecord;
use crate::types::user::Role;

const CREATE_TABLE_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    names TEXT NOT NULL,
    lastname TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    role TEXT NOT NULL,
    password TEXT NOT NULL,
    remember_token TEXT NOT NULL,
    create_time INTEGER NOT NULL,
    update_time INTEGER NOT NULL
);
"#;

const SELECT_COLUMNS: &str =
    "id, names, lastname, email, role, password, remember_token, create_time, update_time";

pub fn create_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(CREATE_TABLE_SQL)?;
    Ok(())
}

pub fn create(tx: &Transaction, user: &UserRecord) -> Result<u64> {
    let sql = r#"
    INSERT INTO users (names, lastname, email, role, password, remember_token, create_time, update_time)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?)
    "#;
    debug!("Database create_user: {sql}, {}", user.email);
    tx.execute(
        sql,
        params![
            user.names,
            user.lastname,
            user.email,
            user.role,
            user.password,
            user.remember_token,
            user.create_time,
            user.update_time,
        ],
    )?;

    Ok(tx.last_insert_rowid() as u64)
}

pub fn get(tx: &Transaction, id: u64) -> Result<Option<UserRecord>> {
    let sql = format!("SELECT {SELECT_COLUMNS} FROM users WHERE id = ?");
    debug!("Database get_user: {sql}, {id}");
    let user = tx.query_row(&sql, params![id], convert_row).optional()?;
    Ok(user)
}

pub fn get_by_email(tx: &Transaction, email: &str) -> Result<Option<UserRecord>> {
    let sql = format!("SELECT {SELECT_COLUMNS} FROM users WHERE email = ?");
    debug!("Database get_user_by_email: {sql}, {email}");
    let user = tx.query_row(&sql, params![email], convert_row).optional()?;
    Ok(user)
}

pub fn list(tx: &Transaction) -> Result<Vec<UserRecord>> {
    let sql = format!("SELECT {SELECT_COLUMNS} FROM users ORDER BY id ASC");
    debug!("Database list_users: {sql}");

    let mut stmt = tx.prepare(&sql)?;
    let rows = stmt.query_map([], convert_row)?;

    let mut users = Vec::new();
    for row in rows {
        users.push(row?);
    }
    Ok(users)
}

pub fn update(tx: &Transaction, user: &UserRecord) -> Result<()> {
    let sql = r#"
    UPDATE users
    SET names = ?, lastname = ?, email = ?, role = ?, password = ?, remember_token = ?, update_time = ?
    WHERE id = ?
    "#;
    debug!("Database update_user: {sql}, {}", user.id);
    tx.execute(
        sql,
        params![
            user.names,
            user.lastname,
            user.email,
            user.role,
            user.password,
            user.remember_token,
            user.update_time,
            user.id,
        ],
    )?;
    Ok(())
}

pub fn delete(tx: &Transaction, id: u64) -> Result<bool> {
    let sql = "DELETE FROM users WHERE id = ?";
    debug!("Database delete_user: {sql}, {id}");
    let count = tx.execute(sql, params![id])?;
    Ok(count > 0)
}

fn convert_row(row: &Row) -> rusqlite::Result<UserRecord> {
    Ok(UserRecord {
        id: row.get(0)?,
        names: row.get(1)?,
        lastname: row.get(2)?,
        email: row.get(3)?,
        role: row.get(4)?,
        password: row.get(5)?,
        remember_token: row.get(6)?,
        create_time: row.get(7)?,
        update_time: row.get(8)?,
    })
}

impl ToSql for Role {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Role {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e: anyhow::Error| FromSqlError::Other(e.into()))
    }
}
