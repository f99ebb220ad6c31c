mod password_reset;
mod user;

pub mod config;
pub mod factory;

use std::path::Path;

use anyhow::{bail, Result};
use log::debug;
use rusqlite::Connection as RawConnection;
use rusqlite::Transaction as RawTransaction;
use rusqlite::{params, OptionalExtension};

use super::types::{Connection, PasswordResetRecord, Transaction, UserRecord};

/// SQLite backend, file based or in memory. Tables are created on open.
pub struct Sqlite {
    conn: RawConnection,
}

pub struct SqliteTransaction<'a> {
    tx: RawTransaction<'a>,
}

impl Sqlite {
    /// Opens the database file, creating it when missing.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = RawConnection::open(path)?;
        Self::init_tables(&conn)?;
        Ok(Self { conn })
    }

    /// In-memory database, the content is gone when the process exits.
    pub fn memory() -> Result<Self> {
        let conn = RawConnection::open_in_memory()?;
        Self::init_tables(&conn)?;
        Ok(Self { conn })
    }

    fn init_tables(conn: &RawConnection) -> Result<()> {
        user::create_table(conn)?;
        password_reset::create_table(conn)?;
        Ok(())
    }
}

impl<'a> Connection<'a, SqliteTransaction<'a>> for Sqlite {
    fn transaction(&'a mut self) -> Result<SqliteTransaction<'a>> {
        let tx = self.conn.transaction()?;
        Ok(SqliteTransaction { tx })
    }
}

impl Transaction for SqliteTransaction<'_> {
    fn create_user(&self, record: &UserRecord) -> Result<u64> {
        user::create(&self.tx, record)
    }

    fn get_user(&self, id: u64) -> Result<Option<UserRecord>> {
        user::get(&self.tx, id)
    }

    fn get_user_by_email(&self, email: &str) -> Result<Option<UserRecord>> {
        user::get_by_email(&self.tx, email)
    }

    fn list_users(&self) -> Result<Vec<UserRecord>> {
        user::list(&self.tx)
    }

    fn update_user(&self, record: &UserRecord) -> Result<()> {
        user::update(&self.tx, record)
    }

    fn delete_user(&self, id: u64) -> Result<bool> {
        user::delete(&self.tx, id)
    }

    fn has_value(&self, table: &str, column: &str, value: &str) -> Result<bool> {
        has_value(&self.tx, table, column, value)
    }

    fn get_password_reset(&self, email: &str) -> Result<Option<PasswordResetRecord>> {
        password_reset::get(&self.tx, email)
    }

    fn put_password_reset(&self, reset: &PasswordResetRecord) -> Result<()> {
        password_reset::put(&self.tx, reset)
    }

    fn commit(self) -> Result<()> {
        self.tx.commit()?;
        Ok(())
    }

    fn rollback(self) -> Result<()> {
        self.tx.rollback()?;
        Ok(())
    }
}

fn has_value(tx: &RawTransaction, table: &str, column: &str, value: &str) -> Result<bool> {
    // Identifiers cannot be bound as parameters.
    for ident in [table, column] {
        if !is_identifier(ident) {
            bail!("invalid sql identifier '{ident}'");
        }
    }

    let sql = format!("SELECT 1 FROM {table} WHERE {column} = ? LIMIT 1");
    debug!("Database has_value: {sql}, {value:?}");
    let found: Option<i64> = tx
        .query_row(&sql, params![value], |row| row.get(0))
        .optional()?;
    Ok(found.is_some())
}

fn is_identifier(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}
