//! Unified error handling for the HTTP surface.
//!
//! Provides a unified `AppError` type covering the store's error taxonomy.
//! All route handlers return `Result<T, AppError>`; business errors become
//! `{"error": "..."}` JSON bodies with the matching status code, unexpected
//! repository failures are logged and collapsed into a generic 500.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::db::RepositoryError;
use crate::services::auth::AuthError;

/// Application-level error type for the store API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// No stock left to reserve.
    #[error("Out of stock")]
    OutOfStock,

    /// Account has not completed verification.
    #[error("Please verify your email/phone before purchasing.")]
    Unverified,

    /// A non-cancelled order for this (account, product) pair already exists.
    #[error("You can only buy one item of each type.")]
    AlreadyPurchased,

    /// Checkout on a cart with no lines.
    #[error("Cart is empty")]
    EmptyCart,

    /// No cart line could be converted into an order; carries the aggregated
    /// per-line messages.
    #[error("{0}")]
    CheckoutFailed(String),

    /// No valid session.
    #[error("Not authenticated")]
    Unauthorized,

    /// Valid session, insufficient privilege.
    #[error("Admin access required")]
    Forbidden,

    /// Bad request from client.
    #[error("{0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::UserAlreadyExists => StatusCode::CONFLICT,
                AuthError::WeakPassword(_)
                | AuthError::InvalidEmail(_)
                | AuthError::InvalidUsername(_)
                | AuthError::InvalidCode => StatusCode::BAD_REQUEST,
                AuthError::PasswordHash | AuthError::Repository(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::OutOfStock
            | Self::AlreadyPurchased
            | Self::EmptyCart
            | Self::CheckoutFailed(_)
            | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unverified | Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if matches!(self, Self::Database(_) | Self::Internal(_)) {
            tracing::error!(error = %self, "Request error");
        }

        let status = self.status();

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Database(_)
            | Self::Internal(_)
            | Self::Auth(AuthError::PasswordHash | AuthError::Repository(_)) => {
                "Server error".to_owned()
            }
            Self::Auth(err) => err.to_string(),
            other => other.to_string(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("Product");
        assert_eq!(err.to_string(), "Product not found");

        let err = AppError::EmptyCart;
        assert_eq!(err.to_string(), "Cart is empty");
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            err.into_response().status()
        }

        assert_eq!(
            get_status(AppError::NotFound("Product")),
            StatusCode::NOT_FOUND
        );
        assert_eq!(get_status(AppError::OutOfStock), StatusCode::BAD_REQUEST);
        assert_eq!(get_status(AppError::Unverified), StatusCode::FORBIDDEN);
        assert_eq!(
            get_status(AppError::AlreadyPurchased),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(get_status(AppError::Unauthorized), StatusCode::UNAUTHORIZED);
        assert_eq!(get_status(AppError::Forbidden), StatusCode::FORBIDDEN);
        assert_eq!(
            get_status(AppError::Internal("boom".to_owned())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_details_hidden() {
        let response = AppError::Internal("secret detail".to_owned()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        // Body is the generic message; the detail only goes to the log.
    }
}
