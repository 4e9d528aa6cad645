//! Wire schemas for the v2 command API.
//!
//! All structs use `#[serde(rename_all = "camelCase")]` to produce the JSON
//! field names the API contract mandates (`requestId`, `statusCode`, ...).

pub mod batch;
pub mod envelope;
