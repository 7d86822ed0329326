//! Authentication and authorization error kinds.

use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Every way an identity or session operation can fail.
///
/// Only [`AuthError::Store`] carries an underlying cause; the rest are raised
/// deliberately by the validation logic.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("password hashing failed: {0}")]
    Hashing(String),

    #[error("missing or malformed credential")]
    MissingOrMalformedCredential,

    #[error("malformed token")]
    MalformedToken,

    #[error("invalid token signature")]
    InvalidSignature,

    #[error("token expired")]
    TokenExpired,

    #[error("token not found")]
    TokenNotFound,

    #[error("token revoked")]
    TokenRevoked,

    #[error("forbidden")]
    Forbidden,

    #[error("unauthorized")]
    Unauthorized,

    #[error("incorrect email or password")]
    InvalidCredentials,

    #[error("token signing failed: {0}")]
    Signing(String),

    #[error("store error: {0}")]
    Store(#[from] sqlx::Error),
}

impl AuthError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingOrMalformedCredential
            | AuthError::MalformedToken
            | AuthError::InvalidSignature
            | AuthError::TokenExpired
            | AuthError::TokenNotFound
            | AuthError::TokenRevoked
            | AuthError::Unauthorized
            | AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden => StatusCode::FORBIDDEN,
            AuthError::Hashing(_) | AuthError::Signing(_) | AuthError::Store(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Stable machine-readable name, so clients can tell an expired token
    /// from a forged one without parsing the message.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::Hashing(_) => "hashing_error",
            AuthError::MissingOrMalformedCredential => "missing_credential",
            AuthError::MalformedToken => "malformed_token",
            AuthError::InvalidSignature => "invalid_signature",
            AuthError::TokenExpired => "token_expired",
            AuthError::TokenNotFound => "token_not_found",
            AuthError::TokenRevoked => "token_revoked",
            AuthError::Forbidden => "forbidden",
            AuthError::Unauthorized => "unauthorized",
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::Signing(_) => "signing_error",
            AuthError::Store(_) => "store_error",
        }
    }

    fn public_message(&self) -> String {
        match self {
            AuthError::Hashing(_) | AuthError::Signing(_) | AuthError::Store(_) => {
                "Internal server error".to_string()
            }
            other => other.to_string(),
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    code: &'static str,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "Authentication backend failure");
        }

        let mut response = (
            status,
            Json(ErrorResponse {
                error: self.public_message(),
                code: self.code(),
            }),
        )
            .into_response();

        if status == StatusCode::UNAUTHORIZED {
            let challenge = format!("Bearer error=\"{}\"", self.code());
            if let Ok(value) = HeaderValue::from_str(&challenge) {
                response
                    .headers_mut()
                    .insert(header::WWW_AUTHENTICATE, value);
            }
        }

        response
    }
}
