use std::fmt;
use std::time::SystemTime;

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use super::status::CommandStatus;

/// Error when encoding or decoding a command payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PayloadError {
    pub message: String,
}

impl fmt::Display for PayloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "payload error: {}", self.message)
    }
}

impl std::error::Error for PayloadError {}

/// A command to be delivered to an external receiver after its producing
/// transaction commits.
///
/// Created `Started` inside the business transaction; a dispatch attempt
/// later moves it to `Delivered` or `Failed` in its own transaction. The
/// payload is opaque binary data, rendered as base64 in JSON snapshots.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct OutboundCommand {
    id: String,
    status: CommandStatus,
    source: Option<String>,
    subject: String,
    trace_id: String,
    #[serde(with = "payload_serde")]
    payload: Vec<u8>,
    created_at: SystemTime,
    attempts: u32,
    last_error: Option<String>,
    delivered_at: Option<SystemTime>,
    failed_at: Option<SystemTime>,
    version: u64,
}

mod payload_serde {
    use base64::{engine::general_purpose::STANDARD, Engine};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(payload: &Vec<u8>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        STANDARD.encode(payload).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s: String = String::deserialize(deserializer)?;
        STANDARD.decode(&s).map_err(serde::de::Error::custom)
    }
}

impl OutboundCommand {
    /// Create a new command in `Started` state with a raw bytes payload.
    pub fn new(
        id: impl Into<String>,
        subject: impl Into<String>,
        trace_id: impl Into<String>,
        payload: Vec<u8>,
    ) -> Self {
        OutboundCommand {
            id: id.into(),
            status: CommandStatus::Started,
            source: None,
            subject: subject.into(),
            trace_id: trace_id.into(),
            payload,
            created_at: SystemTime::now(),
            attempts: 0,
            last_error: None,
            delivered_at: None,
            failed_at: None,
            version: 0,
        }
    }

    /// Create a new command with a bitcode-serialized payload.
    pub fn encode<T: Serialize>(
        id: impl Into<String>,
        subject: impl Into<String>,
        trace_id: impl Into<String>,
        payload: &T,
    ) -> Result<Self, PayloadError> {
        let bytes = bitcode::serialize(payload).map_err(|e| PayloadError {
            message: e.to_string(),
        })?;
        Ok(Self::new(id, subject, trace_id, bytes))
    }

    /// Decode the payload from bitcode binary format.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, PayloadError> {
        bitcode::deserialize(&self.payload).map_err(|e| PayloadError {
            message: e.to_string(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn status(&self) -> CommandStatus {
        self.status
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn trace_id(&self) -> &str {
        &self.trace_id
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// The payload as a string, if it is valid UTF-8.
    pub fn payload_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.payload).ok()
    }

    pub fn created_at(&self) -> SystemTime {
        self.created_at
    }

    /// Number of delivery attempts recorded so far.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Description of the most recent transport failure, if any.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn delivered_at(&self) -> Option<SystemTime> {
        self.delivered_at
    }

    pub fn failed_at(&self) -> Option<SystemTime> {
        self.failed_at
    }

    /// Store-managed revision, bumped on every committed save.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub(crate) fn set_version(&mut self, version: u64) {
        self.version = version;
    }

    /// Whether a delivery attempt may run for this command.
    pub fn is_deliverable(&self) -> bool {
        self.status.is_deliverable()
    }

    /// Set the originating service name.
    ///
    /// Resolved from configuration at dispatch time, not at creation, so
    /// configuration changes between the two are honored. Idempotent.
    pub fn set_source(&mut self, source: impl Into<String>) {
        self.source = Some(source.into());
    }

    /// Record a successful transport attempt.
    ///
    /// No-op when the command is not deliverable.
    pub fn mark_delivered(&mut self) {
        if !self.status.is_deliverable() {
            return;
        }
        self.status = self.status.after_attempt(true);
        self.attempts = self.attempts.saturating_add(1);
        self.delivered_at = Some(SystemTime::now());
        self.last_error = None;
    }

    /// Record a failed transport attempt.
    ///
    /// No-op when the command is not deliverable.
    pub fn mark_failed(&mut self, error: Option<&str>) {
        if !self.status.is_deliverable() {
            return;
        }
        self.status = self.status.after_attempt(false);
        self.attempts = self.attempts.saturating_add(1);
        self.failed_at = Some(SystemTime::now());
        self.last_error = error.map(|e| e.to_string());
    }
}
