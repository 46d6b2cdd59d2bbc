// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use reqwest::StatusCode;
use serde_json::Value;

pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Body fields checked for a human-readable failure, in priority order.
pub const ERROR_FIELDS: &[&str] = &["message", "error", "title", "detail"];

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("cannot reach {url} -- check api.base_url and that the server is running ({source})")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{message}")]
    Status { status: u16, message: String },
    /// The backend answered but refused the operation (`isSuccess: false`).
    #[error("{message}")]
    Rejected {
        code: Option<String>,
        message: String,
    },
    #[error("decode {what}: {message}")]
    Decode { what: String, message: String },
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}

/// JSON message field first, then the status reason phrase.
pub fn extract_error_message(status: Option<u16>, body: &str) -> String {
    if let Ok(Value::Object(fields)) = serde_json::from_str::<Value>(body) {
        for name in ERROR_FIELDS {
            if let Some(message) = fields.get(*name).and_then(message_text) {
                return message;
            }
        }
    }

    status
        .and_then(|code| StatusCode::from_u16(code).ok())
        .and_then(|code| code.canonical_reason())
        .map(str::to_owned)
        .unwrap_or_else(|| UNKNOWN_ERROR.to_owned())
}

fn message_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_owned()),
        Value::Object(inner) => inner.get("message").and_then(message_text),
        _ => None,
    }
}
