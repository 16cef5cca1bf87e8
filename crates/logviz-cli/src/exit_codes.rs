//! Exit codes for the logviz binary.
//! These codes are part of the public contract.

use logviz_client::ClientError;

pub const SUCCESS: i32 = 0;
pub const NOT_FOUND: i32 = 1; // Run, page, report or spec absent
pub const CONFIG_ERROR: i32 = 2; // Bad flags, bad URL, unwritable output
pub const TRANSPORT_ERROR: i32 = 3; // Network failure or non-2xx
pub const INVALID_RESPONSE: i32 = 4; // Malformed envelope or query errors

/// Exit code for a failure that reached `main`.
pub fn for_error(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<ClientError>()
        .map(ClientError::exit_code)
        .unwrap_or(CONFIG_ERROR)
}
