//! Client configuration.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use skyops_types::EntityKind;

use crate::error::{ClientError, ClientResult};

/// Configuration for [`ClientFactory`](crate::ClientFactory).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Backend root, e.g. `https://api.example.org`.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Path of the schema document, relative to `base_url`.
    pub schema_path: String,
    /// Per-kind endpoint paths overriding the defaults.
    pub endpoints: BTreeMap<EntityKind, String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            timeout_secs: 30,
            user_agent: concat!("skyops-client/", env!("CARGO_PKG_VERSION")).to_string(),
            schema_path: "schemas".to_string(),
            endpoints: BTreeMap::new(),
        }
    }
}

impl ClientConfig {
    /// Config pointing at `base_url` with default settings otherwise.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Endpoint path for `kind`, or `None` for embedded kinds.
    pub fn endpoint(&self, kind: EntityKind) -> Option<String> {
        if kind.is_embedded() {
            return None;
        }
        self.endpoints
            .get(&kind)
            .cloned()
            .or_else(|| default_endpoint(kind).map(str::to_string))
    }

    /// Absolute URL of `kind`'s collection.
    pub fn collection_url(&self, kind: EntityKind) -> ClientResult<String> {
        let path = self.endpoint(kind).ok_or(ClientError::NoEndpoint(kind))?;
        Ok(join_url(&self.base_url, &path))
    }

    pub fn schema_url(&self) -> String {
        join_url(&self.base_url, &self.schema_path)
    }

    pub(crate) fn check(&self) -> ClientResult<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ClientError::Config(format!(
                "base_url must be an http(s) URL, got {:?}",
                self.base_url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(ClientError::Config("timeout_secs must be positive".into()));
        }
        Ok(())
    }
}

/// Backend path of each top-level kind.
pub fn default_endpoint(kind: EntityKind) -> Option<&'static str> {
    match kind {
        EntityKind::User => Some("user"),
        EntityKind::Vehicle => Some("vehicle"),
        EntityKind::Operation => Some("operation"),
        EntityKind::Document => Some("document"),
        EntityKind::RestrictedFlightVolume => Some("restrictedflightvolume"),
        EntityKind::AirspaceReservation => Some("uasvolume"),
        EntityKind::Tracker => Some("trackers"),
        EntityKind::Coordinator => Some("coordinator"),
        EntityKind::FlightRequest => Some("flightrequest"),
        EntityKind::RegularFlight => Some("regularflight"),
        EntityKind::OperationVolume | EntityKind::Segment => None,
    }
}

pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Caller credentials.
#[derive(Clone, Default)]
pub struct Credentials {
    token: Option<String>,
}

impl Credentials {
    /// No authentication header.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
