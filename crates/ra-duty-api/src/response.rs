//! Small acknowledgement bodies returned by write endpoints.

use serde::{Deserialize, Serialize};

/// `{"message": "..."}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
  pub message: String,
}

impl Message {
  pub fn new(message: impl Into<String>) -> Self {
    Self { message: message.into() }
  }
}

/// `{"id": 1, "message": "..."}`: returned with 201 by `POST /duties`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Created {
  pub id:      i64,
  pub message: String,
}
