//! Request and response bodies exchanged with relay clients.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{ProtocolError, ProtocolResult};

/// Decodes `null` as the field's zero value, like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Request to display a notification.
///
/// Every field is optional on the wire and falls back to its zero value,
/// so a missing `urgency` is `0` (low) and a missing `timeout_ms` is `0`
/// (never expire). `null` counts as missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationRequest {
    /// Caller key used to dismiss the notification later. Empty means untracked.
    #[serde(deserialize_with = "null_as_default")]
    pub key: String,
    /// Display name of the originating application.
    #[serde(deserialize_with = "null_as_default")]
    pub app_name: String,
    /// Package identifier of the originating application, used for icon lookup.
    #[serde(deserialize_with = "null_as_default")]
    pub package_name: String,
    /// Summary line.
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    /// Body text. Mandatory.
    #[serde(deserialize_with = "null_as_default")]
    pub message: String,
    /// 0 = low, 1 = normal, 2 = critical. Other values apply no hint.
    #[serde(deserialize_with = "null_as_default")]
    pub urgency: i64,
    /// `> 0` milliseconds, `0` never expire, `< 0` server default.
    #[serde(deserialize_with = "null_as_default")]
    pub timeout_ms: i32,
}

impl NotificationRequest {
    /// Creates a request with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            ..Default::default()
        }
    }

    /// Builder: set the key.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Builder: set the title.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Builder: set the application name and package.
    pub fn app(mut self, app_name: impl Into<String>, package_name: impl Into<String>) -> Self {
        self.app_name = app_name.into();
        self.package_name = package_name.into();
        self
    }

    /// Builder: set the urgency level.
    pub fn urgency(mut self, urgency: i64) -> Self {
        self.urgency = urgency;
        self
    }

    /// Builder: set the timeout.
    pub fn timeout_ms(mut self, timeout_ms: i32) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Returns true if the notification should be tracked for dismissal.
    pub fn is_tracked(&self) -> bool {
        !self.key.is_empty()
    }

    /// Checks mandatory fields.
    pub fn validate(&self) -> ProtocolResult<()> {
        if self.message.is_empty() {
            return Err(ProtocolError::missing_field("message"));
        }
        Ok(())
    }
}

/// Request to dismiss a previously sent notification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DismissRequest {
    /// Key given when the notification was sent.
    #[serde(deserialize_with = "null_as_default")]
    pub key: String,
}

impl DismissRequest {
    /// Creates a dismiss request.
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    /// Checks mandatory fields.
    pub fn validate(&self) -> ProtocolResult<()> {
        if self.key.is_empty() {
            return Err(ProtocolError::missing_field("key"));
        }
        Ok(())
    }
}

/// Success body for send and dismiss.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    /// `{"status":"sent"}`
    pub fn sent() -> Self {
        Self {
            status: "sent".to_string(),
        }
    }

    /// `{"status":"dismissed"}`
    pub fn dismissed() -> Self {
        Self {
            status: "dismissed".to_string(),
        }
    }
}

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always "ok" while the relay answers.
    pub status: String,
    /// Relay version.
    pub version: String,
    /// Seconds since the relay started.
    pub uptime_seconds: u64,
    /// Notifications currently tracked by key.
    pub active_notifications: usize,
}

impl HealthResponse {
    /// Creates a healthy response.
    pub fn ok(version: impl Into<String>, uptime_seconds: u64, active_notifications: usize) -> Self {
        Self {
            status: "ok".to_string(),
            version: version.into(),
            uptime_seconds,
            active_notifications,
        }
    }
}

/// Error codes returned to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Malformed body or missing field.
    InvalidRequest,
    /// The desktop notification service could not be reached.
    BackendUnavailable,
    /// Anything else.
    InternalError,
}

impl ErrorCode {
    /// Returns a human-readable description of the error code.
    pub fn description(&self) -> &'static str {
        match self {
            Self::InvalidRequest => "Invalid request",
            Self::BackendUnavailable => "Notification service unavailable",
            Self::InternalError => "Internal server error",
        }
    }
}

/// Error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: ErrorCode,
    pub message: String,
}

impl ErrorResponse {
    /// Creates an error response.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}
