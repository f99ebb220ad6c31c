use std::sync::Arc;

use anyhow::Result;
use log::info;
use serde_json::{Map, Value};

use crate::secret::password::PasswordHasher;
use crate::secret::random_string;
use crate::server::db::types::{Transaction, UserRecord};
use crate::server::db::Database;
use crate::server::validation::{validate, Rule, RuleSet};
use crate::time::current_timestamp;
use crate::types::user::{Role, User};

use super::{parse_id, ServiceError, ServiceResult};

const REMEMBER_TOKEN_LENGTH: usize = 10;

const UNIQUE_EMAIL: Rule = Rule::Unique {
    table: "users",
    column: "email",
};

#[derive(Debug, PartialEq)]
pub enum UpdateOutcome {
    /// The patch matched the stored record, nothing was written.
    Unchanged,
    Updated(User),
}

pub struct UserService {
    db: Arc<Database>,
}

impl UserService {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub fn create_rules() -> RuleSet {
        RuleSet::new()
            .field("names", vec![Rule::Required, Rule::String])
            .field("lastname", vec![Rule::Required, Rule::String])
            .field("email", vec![Rule::Required, Rule::Email, UNIQUE_EMAIL])
            .field("role", vec![Rule::Required, Rule::In(Role::NAMES)])
            .field("password", vec![Rule::Required, Rule::String])
    }

    pub fn update_rules() -> RuleSet {
        RuleSet::new()
            .field("names", vec![Rule::String])
            .field("lastname", vec![Rule::String])
            .field("role", vec![Rule::In(Role::NAMES)])
    }

    pub fn list(&self) -> ServiceResult<Vec<User>> {
        let records = self.db.with_transaction(|tx| tx.list_users())?;
        Ok(records.into_iter().map(User::from).collect())
    }

    pub fn create(&self, fields: &Map<String, Value>) -> ServiceResult<User> {
        let user = self.db.with_transaction(|tx| {
            let errors = validate(fields, &Self::create_rules(), tx)?;
            if !errors.is_empty() {
                return Err(ServiceError::Validation(errors).into());
            }

            let now = current_timestamp();
            let mut record = UserRecord {
                id: 0,
                names: get_string(fields, "names"),
                lastname: get_string(fields, "lastname"),
                email: get_string(fields, "email"),
                role: get_string(fields, "role").parse()?,
                password: PasswordHasher::hash(&get_string(fields, "password")),
                remember_token: random_string(REMEMBER_TOKEN_LENGTH),
                create_time: now,
                update_time: now,
            };
            record.id = tx.create_user(&record)?;
            Ok(record)
        })?;

        info!("Created user {} ({}) as {}", user.id, user.email, user.role);
        Ok(user.into())
    }

    pub fn show(&self, id: &str) -> ServiceResult<User> {
        let id = parse_id(id)?;
        let record = self.db.with_transaction(|tx| get_record(tx, id))?;
        Ok(record.into())
    }

    /// Applies the present fields of `fields` to the user. The record is only
    /// written, and `update_time` only bumped, when a value actually changes.
    pub fn update(&self, id: &str, fields: &Map<String, Value>) -> ServiceResult<UpdateOutcome> {
        let id = parse_id(id)?;
        let outcome = self.db.with_transaction(|tx| {
            let before = get_record(tx, id)?;

            let errors = validate(fields, &Self::update_rules(), tx)?;
            if !errors.is_empty() {
                return Err(ServiceError::Validation(errors).into());
            }

            let mut after = before.clone();
            if let Some(names) = fields.get("names").and_then(Value::as_str) {
                after.names = String::from(names);
            }
            if let Some(lastname) = fields.get("lastname").and_then(Value::as_str) {
                after.lastname = String::from(lastname);
            }
            if let Some(role) = fields.get("role").and_then(Value::as_str) {
                after.role = role.parse()?;
            }

            if after == before {
                return Ok(UpdateOutcome::Unchanged);
            }

            after.update_time = current_timestamp();
            tx.update_user(&after)?;
            Ok(UpdateOutcome::Updated(after.into()))
        })?;

        if let UpdateOutcome::Updated(ref user) = outcome {
            info!("Updated user {}", user.id);
        }
        Ok(outcome)
    }

    pub fn delete(&self, id: &str) -> ServiceResult<()> {
        let id = parse_id(id)?;
        self.db.with_transaction(|tx| {
            if !tx.delete_user(id)? {
                return Err(ServiceError::NotFound.into());
            }
            Ok(())
        })?;

        info!("Deleted user {id}");
        Ok(())
    }
}

fn get_record(tx: &dyn Transaction, id: u64) -> Result<UserRecord> {
    match tx.get_user(id)? {
        Some(record) => Ok(record),
        None => Err(ServiceError::NotFound.into()),
    }
}

/// Reads a field that validation has already checked to be a string.
fn get_string(fields: &Map<String, Value>, name: &str) -> String {
    fields
        .get(name)
        .and_then(Value::as_str)
        .map(String::from)
        .unwrap_or_default()
}
