use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

/// The typed failures the lifecycle engine surfaces to callers. Every
/// precondition violation maps to one of the first four variants; the rest
/// carry infrastructure failures through to the HTTP layer.
#[derive(Error, Debug)]
pub enum Error {
    #[error("validation error: {0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("missing credentials")]
    MissingCredentials,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("password hash error: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),

    #[error("policy error: {0}")]
    Policy(#[from] oso::OsoError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Conflict(_) => StatusCode::CONFLICT,
            Error::Unauthorized => StatusCode::FORBIDDEN,
            Error::MissingCredentials | Error::InvalidCredentials | Error::Token(_) => {
                StatusCode::UNAUTHORIZED
            }
            Error::PasswordHash(_) | Error::Policy(_) | Error::Database(_) | Error::EnvVar(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        // infrastructure failures are logged, not leaked
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("internal error: {}", self);

            let body = Json(json!({ "error": "internal server error" }));
            return (status, body).into_response();
        }

        let body = Json(json!({ "error": self.to_string() }));

        (status, body).into_response()
    }
}
