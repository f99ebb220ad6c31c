use serde::{Deserialize, Serialize};

/// What the reset dispatcher receives: who to notify and the link to send.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResetLink {
    pub email: String,
    pub link: String,
}
