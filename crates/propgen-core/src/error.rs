//! Structured error types for the library and JSON API.
//!
//! Per-unit problems never surface here; they are `Diagnostic`s in the run
//! report. These errors are for failures that stop a run before it produces
//! a report.

use serde::{Deserialize, Serialize};
use std::fmt;

use propgen_settings::SettingsError;

/// Error codes for propgen operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Settings failed validation.
    InvalidSettings,
    /// The signature manifest is well-formed JSON with the wrong shape.
    InvalidManifest,
    /// Input is not valid JSON.
    InvalidJson,
    /// An output file could not be written.
    OutputWriteFailure,
    /// Unknown JSON API mode.
    UnknownMode,
    /// I/O error during operation.
    IoError,
    /// Internal error (unexpected state).
    InternalError,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCode::InvalidSettings => write!(f, "invalid_settings"),
            ErrorCode::InvalidManifest => write!(f, "invalid_manifest"),
            ErrorCode::InvalidJson => write!(f, "invalid_json"),
            ErrorCode::OutputWriteFailure => write!(f, "output_write_failure"),
            ErrorCode::UnknownMode => write!(f, "unknown_mode"),
            ErrorCode::IoError => write!(f, "io_error"),
            ErrorCode::InternalError => write!(f, "internal_error"),
        }
    }
}

/// Structured error with a stable code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropgenError {
    /// Error code for programmatic handling.
    pub code: ErrorCode,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl PropgenError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(
        code: ErrorCode,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code,
            message: message.into(),
            details: Some(details.into()),
        }
    }

    pub fn invalid_settings(err: &SettingsError) -> Self {
        Self::with_details(
            ErrorCode::InvalidSettings,
            format!("Invalid settings: {err}"),
            err.field,
        )
    }

    pub fn invalid_manifest(err: impl fmt::Display) -> Self {
        Self::new(
            ErrorCode::InvalidManifest,
            format!("Invalid manifest: {err}"),
        )
    }

    pub fn invalid_json(err: impl fmt::Display) -> Self {
        Self::new(ErrorCode::InvalidJson, format!("Invalid JSON: {err}"))
    }

    pub fn output_write_failure(path: &str, err: impl fmt::Display) -> Self {
        Self::with_details(
            ErrorCode::OutputWriteFailure,
            format!("Cannot write output: {err}"),
            path,
        )
    }

    pub fn unknown_mode(mode: &str) -> Self {
        Self::new(ErrorCode::UnknownMode, format!("Unknown mode: {mode}"))
    }

    pub fn io_error(err: impl fmt::Display) -> Self {
        Self::new(ErrorCode::IoError, format!("I/O error: {err}"))
    }

    pub fn internal(err: impl fmt::Display) -> Self {
        Self::new(ErrorCode::InternalError, format!("Internal error: {err}"))
    }

    /// Convert to JSON string.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(
                r#"{{"code":"{}","message":"{}"}}"#,
                self.code,
                self.message.replace('\\', "\\\\").replace('"', "\\\"")
            )
        })
    }
}

impl fmt::Display for PropgenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(details) = &self.details {
            write!(f, "[{}] {}: {}", self.code, self.message, details)
        } else {
            write!(f, "[{}] {}", self.code, self.message)
        }
    }
}

impl std::error::Error for PropgenError {}

impl From<anyhow::Error> for PropgenError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<PropgenError>() {
            Ok(inner) => inner,
            Err(other) => Self::internal(format!("{other:#}")),
        }
    }
}

impl From<serde_json::Error> for PropgenError {
    fn from(err: serde_json::Error) -> Self {
        if err.is_data() {
            Self::invalid_manifest(err)
        } else {
            Self::invalid_json(err)
        }
    }
}

impl From<std::io::Error> for PropgenError {
    fn from(err: std::io::Error) -> Self {
        Self::io_error(err)
    }
}

impl From<SettingsError> for PropgenError {
    fn from(err: SettingsError) -> Self {
        Self::invalid_settings(&err)
    }
}

/// JSON envelope returned by [`crate::ffi::run_json`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<PropgenError>,
}

impl ResponseEnvelope {
    pub fn success(data: serde_json::Value) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(err: &PropgenError) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(err.clone()),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            r#"{"ok":false,"error":{"code":"internal_error","message":"response serialization failed"}}"#
                .to_string()
        })
    }
}
