//! Request-level error type.
//!
//! Every variant maps to a generic 500 response; the cause is logged, never
//! sent to the client.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to read request body: {0}")]
    Body(#[source] axum::Error),

    #[error("error rendering template: {0}")]
    Render(#[from] askama::Error),

    #[error("failed to encode response: {0}")]
    Encode(#[from] serde_json::Error),
}

impl AppError {
    /// Message sent to the client in place of the real cause.
    pub fn public_message(&self) -> &'static str {
        match self {
            AppError::Body(_) => "Error reading request",
            AppError::Render(_) => "Error rendering template",
            AppError::Encode(_) => "Error encoding response",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, self.public_message()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_error_is_a_generic_500() {
        let err: AppError = serde_json::from_str::<u8>("nope").unwrap_err().into();
        assert!(err.to_string().starts_with("failed to encode response"));

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn public_message_hides_cause() {
        let err = AppError::Body(axum::Error::new(std::io::Error::other("connection reset")));
        assert_eq!(err.public_message(), "Error reading request");
        assert!(err.to_string().contains("connection reset"));
    }
}
