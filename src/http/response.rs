//! Response bodies.

use serde::{Deserialize, Serialize};

use crate::store::Reading;

pub const LOG_ADDED: &str = "Log added successfully";
pub const LOG_DELETED: &str = "Log deleted successfully";

/// Body of `POST /log`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub message: String,
    pub log: Reading,
}

impl CreatedResponse {
    pub fn new(log: Reading) -> Self {
        Self {
            message: LOG_ADDED.to_string(),
            log,
        }
    }
}

/// Body carrying only a confirmation message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn deleted() -> Self {
        Self {
            message: LOG_DELETED.to_string(),
        }
    }
}

/// Body of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub readings: usize,
}
