use actix_web::{error::BlockingError, http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

/// Fehlerarten des Dienstes, jeweils auf einen HTTP-Status abgebildet.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Datenbankfehler")]
    Database(#[source] diesel::result::Error),
    #[error("Keine Datenbankverbindung")]
    Pool(#[source] r2d2::Error),
    #[error("Interner Serverfehler")]
    Canceled,
}

impl From<diesel::result::Error> for ServiceError {
    fn from(err: diesel::result::Error) -> Self {
        use diesel::result::{DatabaseErrorInformation as _, DatabaseErrorKind, Error};
        match err {
            Error::NotFound => ServiceError::NotFound("Nicht gefunden.".to_string()),
            // Unique-Key-Verletzung auf (datum, uhrzeit), falls zwei Schreiber
            // gleichzeitig an der Slot-Vorprüfung vorbeikommen.
            Error::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
                ServiceError::Validation(info.message().to_string())
            }
            other => ServiceError::Database(other),
        }
    }
}

impl From<r2d2::Error> for ServiceError {
    fn from(err: r2d2::Error) -> Self {
        ServiceError::Pool(err)
    }
}

impl From<BlockingError> for ServiceError {
    fn from(_: BlockingError) -> Self {
        ServiceError::Canceled
    }
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
            ServiceError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ServiceError::Forbidden(_) => StatusCode::FORBIDDEN,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Database(_) | ServiceError::Pool(_) | ServiceError::Canceled => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            tracing::error!(error = ?self, "Anfrage fehlgeschlagen");
        }
        HttpResponse::build(self.status_code()).json(json!({ "detail": self.to_string() }))
    }
}
