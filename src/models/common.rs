use serde::{Deserialize, Serialize};

// Body returned by the intake endpoints on success
#[derive(Debug, Serialize, Deserialize)]
pub struct IntakeResponse {
    pub success: bool,
}

// Body returned by the intake endpoints on failure
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
