use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Field name to list of human readable validation messages.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Resource envelope: `{ "data": .., "meta": .. }`. The meta part is omitted
/// when absent.
#[derive(Debug, Serialize, Deserialize)]
pub struct ResourceResponse<T, M = ()> {
    pub data: T,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<M>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountMeta {
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultMeta {
    pub success: bool,
    pub message: String,
}

impl ResultMeta {
    pub fn success(message: impl ToString) -> Self {
        Self {
            success: true,
            message: message.to_string(),
        }
    }
}
