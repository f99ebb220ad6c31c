use anyhow::{bail, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::config::{expandenv, CommonConfig, PathSet};
use crate::secret::password::PasswordHasher;
use crate::secret::random_string;
use crate::time::current_timestamp;
use crate::types::user::Role;

use super::db::types::UserRecord;
use super::db::Database;

/// The administrator account seeded on first start.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AdminConfig {
    #[serde(default = "AdminConfig::default_email")]
    pub email: String,

    #[serde(default = "AdminConfig::default_password")]
    pub password: String,
}

impl CommonConfig for AdminConfig {
    fn default() -> Self {
        Self {
            email: Self::default_email(),
            password: Self::default_password(),
        }
    }

    fn complete(&mut self, _ps: &PathSet) -> Result<()> {
        self.email = expandenv("email", &self.email)?;
        self.password = expandenv("password", &self.password)?;
        if self.email.is_empty() {
            bail!("admin email cannot be empty");
        }
        if self.password.is_empty() {
            bail!("admin password cannot be empty");
        }
        Ok(())
    }
}

impl AdminConfig {
    pub fn default_email() -> String {
        String::from("admin@localhost")
    }

    pub fn default_password() -> String {
        String::from("admin")
    }
}

/// Creates the administrator when no user owns `cfg.email`. Returns the new
/// user id, or `None` if the account already exists.
pub fn seed_admin(db: &Database, cfg: &AdminConfig) -> Result<Option<u64>> {
    if cfg.password == AdminConfig::default_password() {
        warn!("Using default admin password IS DANGEROUS, please change it in production");
    }

    let id = db.with_transaction(|tx| {
        if tx.get_user_by_email(&cfg.email)?.is_some() {
            return Ok(None);
        }

        let now = current_timestamp();
        let record = UserRecord {
            id: 0,
            names: String::from("Admin"),
            lastname: String::from("User"),
            email: cfg.email.clone(),
            role: Role::Admin,
            password: PasswordHasher::hash(&cfg.password),
            remember_token: random_string(10),
            create_time: now,
            update_time: now,
        };
        tx.create_user(&record).map(Some)
    })?;

    if let Some(id) = id {
        info!("Seeded admin user {} with id {id}", cfg.email);
    }
    Ok(id)
}
