
use anyhow::{bail, Result};

use crate::types::user::Role;

use super::types::UserRecord;
use super::Database;

pub fn run_all_db_tests(db: &Database) {
    user::run_user_tests(db);
    password_reset::run_password_reset_tests(db);

    test_rollback(db);
}

pub fn mock_user(email: &str, role: Role) -> UserRecord {
    UserRecord {
        id: 0,
        names: String::from("Test"),
        lastname: String::from("User"),
        email: String::from(email),
        role,
        password: String::from("hashed"),
        remember_token: String::from("abcdefghij"),
        create_time: 100,
        update_time: 100,
    }
}

fn test_rollback(db: &Database) {
    let result: Result<()> = db.with_transaction(|tx| {
        tx.create_user(&mock_user("rollback@x.com", Role::Admin))
            .unwrap();
        bail!("rollback");
    });
    assert!(result.is_err());

    db.with_transaction(|tx| {
        assert!(tx.get_user_by_email("rollback@x.com")?.is_none());
        assert!(!tx.has_value("users", "email", "rollback@x.com")?);
        Ok(())
    })
    .unwrap();
}
