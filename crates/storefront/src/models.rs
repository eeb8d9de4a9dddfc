//! Session-stored types.
//!
//! The session carries only small identifiers and wizard state; the
//! durable cart itself lives in its own storage file keyed by cart ID.

use serde::{Deserialize, Serialize};

/// Session keys for storefront data.
pub mod session_keys {
    /// Key for the ID of this session's cart.
    pub const CART_ID: &str = "cart_id";

    /// Key for the in-progress password recovery wizard state.
    pub const RECOVERY: &str = "recovery";

    /// Key for a one-shot flash message shown on the next page load.
    pub const FLASH: &str = "flash";
}

/// Password recovery wizard state, held in the session.
///
/// The wizard is a linear three-step flow; each step only ever advances
/// to the next one. Nothing is persisted beyond the session and no real
/// email is sent - the verification code is written to the server log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum RecoveryState {
    /// Waiting for the verification code sent to `email`.
    AwaitingCode { email: String, code: String },
    /// Code accepted; waiting for the new password.
    AwaitingPassword { email: String },
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_recovery_state_round_trips_through_session_json() {
        let state = RecoveryState::AwaitingCode {
            email: "driver@example.com".to_owned(),
            code: "482913".to_owned(),
        };
        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains("\"step\":\"awaiting_code\""));
        let back: RecoveryState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, state);
    }
}
