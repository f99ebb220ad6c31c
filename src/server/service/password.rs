use std::sync::Arc;

use anyhow::{Context, Result};
use log::info;
use serde_json::{Map, Value};
use url::Url;

use crate::secret::{random_string, sha256_hex};
use crate::server::db::types::PasswordResetRecord;
use crate::server::db::Database;
use crate::server::mail::ResetLinkSender;
use crate::server::validation::{validate, Rule, RuleSet};
use crate::time::current_timestamp;
use crate::types::password::ResetLink;

use super::{ServiceError, ServiceResult};

pub struct PasswordResetService {
    db: Arc<Database>,
    sender: Arc<dyn ResetLinkSender>,

    throttle_secs: u64,
    link_base: Url,
}

impl PasswordResetService {
    pub const TOKEN_LENGTH: usize = 64;

    pub const SENT: &'static str = "We have emailed your password reset link!";
    pub const INVALID_USER: &'static str = "We can't find a user with that email address.";
    pub const THROTTLED: &'static str = "Please wait before retrying.";

    pub fn new(
        db: Arc<Database>,
        sender: Arc<dyn ResetLinkSender>,
        throttle_secs: u64,
        link_base: &str,
    ) -> Result<Self> {
        let link_base = Url::parse(link_base).context("parse reset link base")?;
        Ok(Self {
            db,
            sender,
            throttle_secs,
            link_base,
        })
    }

    pub fn rules() -> RuleSet {
        RuleSet::new().field("email", vec![Rule::Required, Rule::Email])
    }

    /// Creates a reset token for the user owning `email` and hands the reset
    /// link to the sender. Only the token's SHA-256 is stored.
    pub fn send_reset_link(&self, fields: &Map<String, Value>) -> ServiceResult<()> {
        let (email, token) = self.db.with_transaction(|tx| {
            let errors = validate(fields, &Self::rules(), tx)?;
            if !errors.is_empty() {
                return Err(ServiceError::Validation(errors).into());
            }
            let email = fields
                .get("email")
                .and_then(Value::as_str)
                .unwrap_or_default();

            let user = match tx.get_user_by_email(email)? {
                Some(user) => user,
                None => return Err(ServiceError::Rejected(String::from(Self::INVALID_USER)).into()),
            };

            let now = current_timestamp();
            if let Some(reset) = tx.get_password_reset(&user.email)? {
                if reset.create_time + self.throttle_secs > now {
                    return Err(ServiceError::Rejected(String::from(Self::THROTTLED)).into());
                }
            }

            let token = random_string(Self::TOKEN_LENGTH);
            tx.put_password_reset(&PasswordResetRecord {
                email: user.email.clone(),
                token: sha256_hex(&token),
                create_time: now,
            })?;
            Ok((user.email, token))
        })?;

        let mut link = self.link_base.clone();
        link.query_pairs_mut()
            .append_pair("token", &token)
            .append_pair("email", &email);

        self.sender
            .send_reset_link(&ResetLink {
                email: email.clone(),
                link: link.to_string(),
            })
            .context("send reset link")?;

        info!("Password reset link sent to {email}");
        Ok(())
    }
}
