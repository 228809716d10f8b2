use axum::{http::StatusCode, response::IntoResponse};
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;
use tracing::error;

#[derive(Debug, ThisError)]
pub enum PaygateError {
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Database error: {0}")]
    DatabaseError(#[from] SqlxError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Password hash error: {0}")]
    PasswordHash(String),

    #[error("Invalid cookie secret: {0}")]
    CookieSecret(String),

    #[error("Template error: {0}")]
    Render(minijinja::Error),

    #[error("Receipt template error: {0}")]
    ReceiptRender(minijinja::Error),

    #[error("PDF conversion error: {0}")]
    Pdf(String),

    #[error("Receipt font error: {0}")]
    Font(String),

    #[error("Receipt write error: {0}")]
    ReceiptWrite(std::io::Error),

    #[error("Blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl IntoResponse for PaygateError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match &self {
            PaygateError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Invalid username or password".to_string())
            }
            PaygateError::BadRequest(reason) => (StatusCode::BAD_REQUEST, reason.clone()),
            PaygateError::ReceiptRender(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error generating receipt".to_string(),
            ),
            PaygateError::Pdf(_) | PaygateError::Font(_) | PaygateError::ReceiptWrite(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error generating PDF".to_string(),
            ),
            PaygateError::DatabaseError(_)
            | PaygateError::Io(_)
            | PaygateError::PasswordHash(_)
            | PaygateError::CookieSecret(_)
            | PaygateError::Render(_)
            | PaygateError::Join(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Server Error".to_string(),
            ),
        };
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        (status, body).into_response()
    }
}
