//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::api::ApiError;
use crate::services::{AuthError, ContractError};

/// Application-level error type for the site.
#[derive(Debug, Error)]
pub enum AppError {
    /// Remote Wheels API operation failed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Authentication operation failed.
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Session read or write failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Contract PDF generation failed.
    #[error("Contract error: {0}")]
    Contract(#[from] ContractError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether this error is the server's fault (captured to Sentry) rather
    /// than a client mistake or a missing record.
    fn is_server_class(&self) -> bool {
        match self {
            Self::Api(err) => !err.is_not_found(),
            Self::Session(_) | Self::Contract(_) | Self::Internal(_) => true,
            Self::Auth(_) | Self::NotFound(_) | Self::BadRequest(_) => false,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if self.is_server_class() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Api(err) if err.is_not_found() => StatusCode::NOT_FOUND,
            Self::Api(_) => StatusCode::BAD_GATEWAY,
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::UsernameTaken => StatusCode::CONFLICT,
                AuthError::Store(_) | AuthError::PasswordHash => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            Self::Session(_) | Self::Contract(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Api(err) if err.is_not_found() => "Registro não encontrado.".to_string(),
            Self::Api(_) => "Falha ao comunicar com o servidor de dados.".to_string(),
            Self::Auth(err) => match err {
                AuthError::InvalidCredentials => "Usuário ou senha inválidos.".to_string(),
                AuthError::UsernameTaken => "Nome de usuário já cadastrado.".to_string(),
                _ => "Erro interno de autenticação.".to_string(),
            },
            Self::Session(_) | Self::Contract(_) | Self::Internal(_) => {
                "Erro interno do servidor.".to_string()
            }
            Self::NotFound(_) => "Página não encontrada.".to_string(),
            Self::BadRequest(msg) => msg.clone(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("bike 42".to_string());
        assert_eq!(err.to_string(), "Not found: bike 42");

        let err = AppError::BadRequest("data inválida".to_string());
        assert_eq!(err.to_string(), "Bad request: data inválida");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::NotFound("x".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::BadRequest("x".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Internal("x".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            get_status(AppError::Auth(AuthError::InvalidCredentials)),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Auth(AuthError::UsernameTaken)),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_remote_not_found_is_not_server_class() {
        let not_found = AppError::Api(ApiError::Status {
            status: 404,
            message: "Cliente não encontrado".to_string(),
        });
        assert!(!not_found.is_server_class());

        let upstream = AppError::Api(ApiError::Status {
            status: 500,
            message: "boom".to_string(),
        });
        assert!(upstream.is_server_class());

        assert!(AppError::Internal("x".to_string()).is_server_class());
        assert!(!AppError::BadRequest("x".to_string()).is_server_class());
        assert!(!AppError::Auth(AuthError::InvalidCredentials).is_server_class());
    }

    #[test]
    fn test_api_not_found_maps_to_404() {
        let err = AppError::Api(ApiError::Status {
            status: 404,
            message: "not found".to_string(),
        });
        assert_eq!(get_status(err), StatusCode::NOT_FOUND);

        let err = AppError::Api(ApiError::Status {
            status: 500,
            message: "boom".to_string(),
        });
        assert_eq!(get_status(err), StatusCode::BAD_GATEWAY);
    }
}
