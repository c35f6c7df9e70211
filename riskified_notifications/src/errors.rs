use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use thiserror::Error;

/// Errors in the lifecycle of the receiver itself.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("The notification server is already listening")]
    AlreadyListening,
}

/// Per-request failures. These are answered with an HTTP error and never reach the notification handler.
#[derive(Debug, Clone, Error)]
pub enum NotificationError {
    #[error("Authentication failed. {0}")]
    Unauthenticated(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("Invalid notification. {0}")]
    InvalidNotification(String),
}

impl ResponseError for NotificationError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::InvalidNotification(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": self.to_string() }).to_string())
    }
}
