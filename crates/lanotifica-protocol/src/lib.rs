//! Request/response types for the lanotifica HTTP relay.
//!
//! # Endpoints
//!
//! - `POST /notification` with a [`NotificationRequest`] shows a notification
//!   and answers [`StatusResponse::sent`].
//! - `DELETE /notification/dismiss` with a [`DismissRequest`] closes it and
//!   answers [`StatusResponse::dismissed`].
//! - `GET /health` answers a [`HealthResponse`].
//!
//! Failures carry an [`ErrorResponse`].
//!
//! # Example
//!
//! ```rust
//! use lanotifica_protocol::{NotificationRequest, decode_body};
//!
//! let req: NotificationRequest = decode_body(br#"{"message":"hi","key":"a"}"#).unwrap();
//! assert!(req.validate().is_ok());
//! assert_eq!(req.key, "a");
//! ```

mod error;
mod types;

use serde::de::DeserializeOwned;

pub use error::{ProtocolError, ProtocolResult};
pub use types::{
    DismissRequest, ErrorCode, ErrorResponse, HealthResponse, NotificationRequest, StatusResponse,
};

/// Path for sending notifications.
pub const NOTIFICATION_PATH: &str = "/notification";

/// Path the Android client uses for dismissals.
pub const DISMISS_PATH: &str = "/notification/dismiss";

/// Health check path.
pub const HEALTH_PATH: &str = "/health";

/// Decodes a JSON request body.
pub fn decode_body<T: DeserializeOwned>(data: &[u8]) -> ProtocolResult<T> {
    Ok(serde_json::from_slice(data)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_rejects_invalid_json() {
        let err = decode_body::<DismissRequest>(b"{not json").unwrap_err();
        assert!(matches!(err, ProtocolError::Serialization(_)));
    }

    #[test]
    fn decode_rejects_wrong_types() {
        let err = decode_body::<NotificationRequest>(br#"{"message":"hi","urgency":"high"}"#)
            .unwrap_err();
        assert!(err.to_string().starts_with("invalid JSON body"));
    }

    #[test]
    fn decode_rejects_out_of_range_timeout() {
        assert!(
            decode_body::<NotificationRequest>(br#"{"message":"hi","timeout_ms":4294967296}"#)
                .is_err()
        );
    }
}
