//! Application error types and HTTP response mapping.
//!
//! Defines `AppError` enum for all error conditions and implements Axum's
//! `IntoResponse` to automatically convert errors to appropriate HTTP responses
//! with JSON error bodies.
//!
//! Error mappings:
//! - `InvalidArgument`, `UnexpectedObjectType` → 400
//! - `NotFound` → 404
//! - `NotText` → 422
//! - `UpstreamUnavailable`, `InvalidCommitMetadata` → 502
//! - `Git`, `Internal` → 500

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::models::ObjectType;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Failed to retrieve {what}{}: {detail}", status_suffix(.status))]
    UpstreamUnavailable {
        what: String,
        status: Option<u16>,
        detail: String,
    },

    #[error("The commit '{0}' does not contain a valid tree ID")]
    InvalidCommitMetadata(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unexpected {found} '{segment}' in '{path}' at commit '{commit_id}', expected a directory")]
    UnexpectedObjectType {
        commit_id: String,
        path: String,
        segment: String,
        found: ObjectType,
    },

    #[error("File '{path}' at commit '{commit_id}' is not UTF-8 text")]
    NotText { commit_id: String, path: String },

    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn upstream(what: impl Into<String>, status: Option<u16>, detail: impl Into<String>) -> Self {
        AppError::UpstreamUnavailable {
            what: what.into(),
            status,
            detail: detail.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidArgument(_) | AppError::UnexpectedObjectType { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::NotText { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::UpstreamUnavailable { .. } | AppError::InvalidCommitMetadata(_) => StatusCode::BAD_GATEWAY,
            AppError::Git(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::warn!("Request failed: {}", self);
        }

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (status {})", s)).unwrap_or_default()
}

/// Rejects blank identifiers before any request goes out.
pub fn require_non_blank(value: &str, name: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AppError::InvalidArgument(format!("{} cannot be empty", name)));
    }
    Ok(())
}

pub fn require_positive(value: i64, name: &str) -> Result<()> {
    if value <= 0 {
        return Err(AppError::InvalidArgument(format!("{} must be a positive integer", name)));
    }
    Ok(())
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_message_includes_status_when_known() {
        let err = AppError::upstream("commit 'c1'", Some(404), "no such commit");
        assert_eq!(err.to_string(), "Failed to retrieve commit 'c1' (status 404): no such commit");

        let err = AppError::upstream("tree 't0'", None, "connection refused");
        assert_eq!(err.to_string(), "Failed to retrieve tree 't0': connection refused");
    }

    #[test]
    fn status_codes_follow_error_kind() {
        assert_eq!(AppError::InvalidArgument("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::NotFound("x".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::InvalidCommitMetadata("c".into()).status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(AppError::upstream("x", None, "y").status_code(), StatusCode::BAD_GATEWAY);
        let not_text = AppError::NotText {
            commit_id: "c1".into(),
            path: "logo.png".into(),
        };
        assert_eq!(not_text.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn blank_identifiers_are_rejected() {
        assert!(require_non_blank("proj", "Project").is_ok());
        assert!(matches!(require_non_blank("  ", "Project"), Err(AppError::InvalidArgument(msg)) if msg.contains("Project")));
        assert!(matches!(require_positive(0, "Run ID"), Err(AppError::InvalidArgument(_))));
        assert!(require_positive(7, "Run ID").is_ok());
    }
}
