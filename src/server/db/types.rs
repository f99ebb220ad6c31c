use anyhow::Result;

use crate::types::user::{Role, User};

/// Database connection that can open transactions.
pub trait Connection<'a, T>
where
    T: Transaction + 'a,
{
    fn transaction(&'a mut self) -> Result<T>;
}

/// All storage operations. Every call runs inside the transaction the
/// implementation was created for.
pub trait Transaction {
    /// Inserts a user and returns the generated id. `id` in the record is
    /// ignored.
    fn create_user(&self, user: &UserRecord) -> Result<u64>;
    fn get_user(&self, id: u64) -> Result<Option<UserRecord>>;
    fn get_user_by_email(&self, email: &str) -> Result<Option<UserRecord>>;
    fn list_users(&self) -> Result<Vec<UserRecord>>;
    /// Overwrites every mutable column of the user with `user.id`.
    fn update_user(&self, user: &UserRecord) -> Result<()>;
    /// Returns false when no row matched.
    fn delete_user(&self, id: u64) -> Result<bool>;

    /// Whether any row in `table` has `column` equal to `value`.
    fn has_value(&self, table: &str, column: &str, value: &str) -> Result<bool>;

    fn get_password_reset(&self, email: &str) -> Result<Option<PasswordResetRecord>>;
    /// Inserts the reset, replacing any earlier one for the same email.
    fn put_password_reset(&self, reset: &PasswordResetRecord) -> Result<()>;

    fn commit(self) -> Result<()>;
    fn rollback(self) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserRecord {
    pub id: u64,
    pub names: String,
    pub lastname: String,
    pub email: String,
    pub role: Role,
    /// PBKDF2 hash, see [`crate::secret::password::PasswordHasher`].
    pub password: String,
    pub remember_token: String,
    pub create_time: u64,
    pub update_time: u64,
}

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        User {
            id: record.id,
            names: record.names,
            lastname: record.lastname,
            email: record.email,
            role: record.role,
            create_time: record.create_time,
            update_time: record.update_time,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PasswordResetRecord {
    pub email: String,
    /// SHA-256 hex of the token sent to the user.
    pub token: String,
    pub create_time: u64,
}
