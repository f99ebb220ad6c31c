use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::{expandenv, CommonConfig, PathSet};

/// Password reset settings.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ResetConfig {
    /// Minimum seconds between two reset requests for the same email.
    #[serde(default = "ResetConfig::default_throttle_secs")]
    pub throttle_secs: u64,

    /// Page the reset link points to; `token` and `email` are appended as
    /// query parameters.
    #[serde(default = "ResetConfig::default_link_base")]
    pub link_base: String,
}

impl CommonConfig for ResetConfig {
    fn default() -> Self {
        Self {
            throttle_secs: Self::default_throttle_secs(),
            link_base: Self::default_link_base(),
        }
    }

    fn complete(&mut self, _ps: &PathSet) -> Result<()> {
        self.link_base = expandenv("link_base", &self.link_base)?;
        if let Err(e) = Url::parse(&self.link_base) {
            bail!("invalid link_base '{}': {e}", self.link_base);
        }
        Ok(())
    }
}

impl ResetConfig {
    pub fn default_throttle_secs() -> u64 {
        60
    }

    pub fn default_link_base() -> String {
        String::from("http://127.0.0.1:8080/password/reset")
    }
}
