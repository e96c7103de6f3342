use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;
use uuid::Uuid;

/// Errors surfaced by the directory service and its collaborators.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("employee {0} not found")]
    NotFound(Uuid),

    /// Carries the attempted email so callers can log it.
    #[error("no employee registered with email '{0}'")]
    PrincipalNotFound(String),

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("{0}")]
    Validation(String),

    #[error("email '{0}' is already registered")]
    EmailTaken(String),

    #[error("credential error: {0}")]
    Credential(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type DirectoryResult<T> = Result<T, DirectoryError>;

impl DirectoryError {
    pub fn status(&self) -> StatusCode {
        match self {
            DirectoryError::NotFound(_) => StatusCode::NOT_FOUND,
            DirectoryError::PrincipalNotFound(_) | DirectoryError::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }
            DirectoryError::EmailTaken(_) => StatusCode::CONFLICT,
            DirectoryError::Validation(_) => StatusCode::BAD_REQUEST,
            DirectoryError::Credential(_) | DirectoryError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for DirectoryError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        // Login failures never say which half of the credentials was wrong.
        let message = match &self {
            DirectoryError::PrincipalNotFound(_) => "Invalid credentials".to_string(),
            other => other.to_string(),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_errors_to_status_codes() {
        assert_eq!(
            DirectoryError::NotFound(Uuid::new_v4()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            DirectoryError::PrincipalNotFound("a@b.io".into()).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            DirectoryError::InvalidCredentials.status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            DirectoryError::EmailTaken("a@b.io".into()).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            DirectoryError::Validation("bad".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            DirectoryError::Credential("boom".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn principal_not_found_keeps_email_in_message() {
        let err = DirectoryError::PrincipalNotFound("ghost@corp.io".into());
        assert!(err.to_string().contains("ghost@corp.io"));
    }
}
