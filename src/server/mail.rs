use anyhow::Result;
use log::info;

use crate::types::password::ResetLink;

/// Delivers password reset links. Message templating is left to the
/// implementation.
pub trait ResetLinkSender: Send + Sync {
    fn send_reset_link(&self, link: &ResetLink) -> Result<()>;
}

/// Writes the link to the server log instead of mailing it.
pub struct LogSender;

impl LogSender {
    pub fn new() -> Self {
        Self
    }
}

impl ResetLinkSender for LogSender {
    fn send_reset_link(&self, link: &ResetLink) -> Result<()> {
        info!("Password reset link for {}: {}", link.email, link.link);
        Ok(())
    }
}
