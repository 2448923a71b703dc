/// Error taxonomy and HTTP response mapping
///
/// Every handler returns `Result<T, ApiError>`. The enum is the single
/// boundary between internal failures and what clients see: each kind
/// maps to a status code and a `{message, [errors]}` JSON body through
/// one lookup table in [`ApiError::status_and_body`].
///
/// Two pairs of cases are deliberately indistinguishable to clients:
///
/// - `InvalidCredentials` is one shape whether the email was unknown or
///   the password wrong
/// - `Unauthenticated` is one shape whether the token was missing,
///   malformed, tampered or expired
///
/// Keeping those collapses in the lookup table, rather than scattered
/// through handlers, is what makes the property testable.
///
/// Internal detail (storage errors, hashing failures) is logged
/// server-side and never serialized into a response.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;

use tasknest_shared::auth::{
    middleware::AuthError, ownership::OwnershipError, password::PasswordError, token::TokenError,
};

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Malformed input (400), with field-level messages
    ValidationFailed(Vec<String>),

    /// Email already registered (400)
    DuplicateEmail,

    /// Login request without an email or password (400); a bare message,
    /// not the validation-list shape
    MissingCredentials,

    /// Login failed (401); same shape for unknown email and wrong password
    InvalidCredentials,

    /// Request did not pass the authentication gate (401)
    Unauthenticated(String),

    /// Resource exists but the caller does not own it (403)
    Forbidden(String),

    /// Resource does not exist (404)
    NotFound(String),

    /// Anything unanticipated (500); detail is logged, never surfaced
    Internal(String),
}

/// JSON body of every error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable message
    pub message: String,

    /// Field-level validation messages, when applicable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::ValidationFailed(errors) => {
                write!(f, "Validation failed: {} errors", errors.len())
            }
            ApiError::DuplicateEmail => write!(f, "Duplicate email"),
            ApiError::MissingCredentials => write!(f, "Missing credentials"),
            ApiError::InvalidCredentials => write!(f, "Invalid credentials"),
            ApiError::Unauthenticated(msg) => write!(f, "Unauthenticated: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// The response-shape lookup table
    ///
    /// This is the complete, documented mapping from error kind to what
    /// a client observes. Nothing else decides status codes or bodies.
    pub fn status_and_body(self) -> (StatusCode, ErrorBody) {
        match self {
            ApiError::ValidationFailed(errors) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    message: "Validation failed".to_string(),
                    errors: Some(errors),
                },
            ),
            ApiError::DuplicateEmail => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    message: "Email already in use".to_string(),
                    errors: None,
                },
            ),
            ApiError::MissingCredentials => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    message: "Please provide email and password".to_string(),
                    errors: None,
                },
            ),
            ApiError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    message: "Invalid email or password".to_string(),
                    errors: None,
                },
            ),
            ApiError::Unauthenticated(message) => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    message,
                    errors: None,
                },
            ),
            ApiError::Forbidden(message) => (
                StatusCode::FORBIDDEN,
                ErrorBody {
                    message,
                    errors: None,
                },
            ),
            ApiError::NotFound(message) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    message,
                    errors: None,
                },
            ),
            ApiError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        message: "Something went wrong!".to_string(),
                        errors: None,
                    },
                )
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

/// Storage errors: a unique violation on the email index is a duplicate
/// email; everything else is internal and stays internal.
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => ApiError::NotFound("Resource not found".to_string()),
            sqlx::Error::Database(db_err) => {
                if db_err
                    .constraint()
                    .is_some_and(|c| c.contains("email"))
                {
                    return ApiError::DuplicateEmail;
                }
                ApiError::Internal(format!("Database error: {}", db_err))
            }
            _ => ApiError::Internal(format!("Database error: {}", err)),
        }
    }
}

/// Gate rejections: all token-state failures collapse into 401 with the
/// gate's message; only a storage failure is internal.
impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::NoToken | AuthError::TokenFailed | AuthError::UserNotFound => {
                ApiError::Unauthenticated(err.to_string())
            }
            AuthError::Storage(e) => ApiError::Internal(format!("Auth storage error: {}", e)),
        }
    }
}

impl From<OwnershipError> for ApiError {
    fn from(err: OwnershipError) -> Self {
        match err {
            OwnershipError::NotFound => ApiError::NotFound(err.to_string()),
            OwnershipError::Forbidden { .. } => ApiError::Forbidden(err.to_string()),
        }
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        ApiError::Internal(format!("Token issuance failed: {}", err))
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::Internal(format!("Password operation failed: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tasknest_shared::auth::ownership::TaskAction;

    #[test]
    fn test_validation_failed_carries_field_messages() {
        let err = ApiError::ValidationFailed(vec![
            "Name is required".to_string(),
            "Password must be at least 6 characters".to_string(),
        ]);

        let (status, body) = err.status_and_body();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.message, "Validation failed");
        assert_eq!(body.errors.unwrap().len(), 2);
    }

    #[test]
    fn test_missing_credentials_is_a_bare_message() {
        // Unlike the validation list, this body carries no errors array.
        let (status, body) = ApiError::MissingCredentials.status_and_body();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.message, "Please provide email and password");
        assert!(body.errors.is_none());
    }

    #[test]
    fn test_invalid_credentials_is_one_shape() {
        // Unknown email and wrong password both construct the same
        // variant, so the observable response cannot differ.
        let (status_a, body_a) = ApiError::InvalidCredentials.status_and_body();
        let (status_b, body_b) = ApiError::InvalidCredentials.status_and_body();

        assert_eq!(status_a, StatusCode::UNAUTHORIZED);
        assert_eq!(status_a, status_b);
        assert_eq!(body_a.message, body_b.message);
        assert_eq!(body_a.message, "Invalid email or password");
        assert!(body_a.errors.is_none());
    }

    #[test]
    fn test_gate_rejections_all_map_to_401() {
        for err in [
            AuthError::NoToken,
            AuthError::TokenFailed,
            AuthError::UserNotFound,
        ] {
            let (status, _) = ApiError::from(err).status_and_body();
            assert_eq!(status, StatusCode::UNAUTHORIZED);
        }
    }

    #[test]
    fn test_ownership_mapping() {
        let (status, body) = ApiError::from(OwnershipError::NotFound).status_and_body();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.message, "Task not found");

        let (status, body) = ApiError::from(OwnershipError::Forbidden {
            action: TaskAction::View,
        })
        .status_and_body();
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body.message, "Not authorized to view this task");
    }

    #[test]
    fn test_internal_detail_never_reaches_the_body() {
        let err = ApiError::Internal("connection refused to 10.0.0.3:5432".to_string());
        let (status, body) = err.status_and_body();

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.message, "Something went wrong!");
        assert!(body.errors.is_none());
    }

    #[test]
    fn test_error_body_omits_null_errors_field() {
        let body = ErrorBody {
            message: "Task not found".to_string(),
            errors: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("errors").is_none());
    }
}
