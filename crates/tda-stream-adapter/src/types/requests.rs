/*
[INPUT]:  Streamer protocol schema and serde requirements
[OUTPUT]: Typed Rust request structs with serialization support
[POS]:    Data layer - outbound request definitions
[UPDATE]: When the streamer request envelope changes
*/

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::enums::Command;

/// One control request addressed to a service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamRequest {
    pub service: String,
    pub requestid: u64,
    pub command: Command,
    pub account: String,
    pub source: String,
    pub parameters: Value,
}

/// The outbound wire envelope wrapping one or more requests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestEnvelope {
    pub requests: Vec<StreamRequest>,
}
