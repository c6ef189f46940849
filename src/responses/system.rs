//! Status and hello-world responses.

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::params::Payload;
use crate::responses::text;

/// Liveness reply computed without the backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusResponse {
    pub status: &'static str,
    pub service: String,
    pub timestamp: String,
    pub version: &'static str,
}

impl StatusResponse {
    pub fn now(service: &str) -> Self {
        Self {
            status: "ok",
            service: service.to_string(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HelloWorldResponse {
    pub message: String,
    pub from: String,
    pub timestamp: String,
    pub plugin_name: String,
    pub plugin_version: String,
}

impl HelloWorldResponse {
    pub fn from_reply(reply: &Payload) -> Self {
        Self {
            message: text(reply, "message"),
            from: text(reply, "from"),
            timestamp: text(reply, "timestamp"),
            plugin_name: text(reply, "plugin_name"),
            plugin_version: text(reply, "plugin_version"),
        }
    }
}
