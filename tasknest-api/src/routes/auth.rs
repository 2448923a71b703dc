/// Authentication endpoints
///
/// # Endpoints
///
/// - `POST /api/auth/register` - create an account, receive a token
/// - `POST /api/auth/login` - authenticate, receive a token
///
/// Both respond with `{user, token}`; the user object never contains
/// the password hash. Login reports one `Invalid email or password`
/// shape whether the email is unknown or the password wrong, so the
/// response does not reveal which check failed.

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tasknest_shared::{
    auth::{password, token},
    models::user::{CreateUser, PublicUser, User},
};
use validator::{Validate, ValidationErrors};

/// Register request
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name; must be non-blank (checked separately, trimmed)
    #[serde(default)]
    pub name: String,

    /// Email address; shape-checked separately (dotted domain required)
    #[serde(default)]
    pub email: String,

    /// Password, at least 6 characters
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    #[serde(default)]
    pub password: String,
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub password: String,
}

/// Response for both register and login
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    /// Sanitized user record
    pub user: PublicUser,

    /// Signed identity assertion, valid for 7 days
    pub token: String,
}

/// Email shape rule: no whitespace, something before the `@`, and a
/// dot inside the domain part. `user@localhost` does not pass.
fn valid_email(email: &str) -> bool {
    if email.contains(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

/// Flattens validator output into the field-message list clients see
fn collect_messages(errors: &ValidationErrors) -> Vec<String> {
    errors
        .field_errors()
        .values()
        .flat_map(|field_errors| {
            field_errors.iter().map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "Validation failed".to_string())
            })
        })
        .collect()
}

/// Registers a new user
///
/// # Endpoint
///
/// ```text
/// POST /api/auth/register
/// { "name": "Alice", "email": "a@x.com", "password": "secret1" }
/// ```
///
/// # Errors
///
/// - `400` validation failed (blank name, malformed email, short password)
/// - `400` email already in use
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    let mut errors = Vec::new();

    if req.name.trim().is_empty() {
        errors.push("Name is required".to_string());
    }
    if !valid_email(&req.email) {
        errors.push("Valid email is required".to_string());
    }
    if let Err(e) = req.validate() {
        errors.extend(collect_messages(&e));
    }
    if !errors.is_empty() {
        return Err(ApiError::ValidationFailed(errors));
    }

    let password_hash = password::hash_password(&req.password)?;

    // Duplicate email is caught by the unique index, not a pre-check,
    // so two concurrent registrations cannot both slip through.
    let user = User::create(
        &state.db,
        CreateUser {
            name: req.name.trim().to_string(),
            email: req.email,
            password_hash,
        },
    )
    .await?;

    let token = token::issue(user.id, state.jwt_secret())?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: user.into(),
            token,
        }),
    ))
}

/// Authenticates a user by email and password
///
/// # Endpoint
///
/// ```text
/// POST /api/auth/login
/// { "email": "a@x.com", "password": "secret1" }
/// ```
///
/// # Errors
///
/// - `400` missing email or password
/// - `401` invalid credentials (one shape for both failure causes)
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    if req.email.is_empty() || req.password.is_empty() {
        return Err(ApiError::MissingCredentials);
    }

    // Unknown email and wrong password must be indistinguishable, so
    // both paths construct the identical InvalidCredentials value.
    let user = User::find_by_email(&state.db, &req.email)
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    if !password::verify_password(&req.password, &user.password_hash)? {
        return Err(ApiError::InvalidCredentials);
    }

    let token = token::issue(user.id, state.jwt_secret())?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(Json(AuthResponse {
        user: user.into(),
        token,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validate_register(name: &str, email: &str, password: &str) -> Vec<String> {
        let req = RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };

        let mut errors = Vec::new();
        if req.name.trim().is_empty() {
            errors.push("Name is required".to_string());
        }
        if !valid_email(&req.email) {
            errors.push("Valid email is required".to_string());
        }
        if let Err(e) = req.validate() {
            errors.extend(collect_messages(&e));
        }
        errors
    }

    #[test]
    fn test_valid_registration_shape() {
        assert!(validate_register("Alice", "a@x.com", "secret1").is_empty());
    }

    #[test]
    fn test_blank_name_rejected() {
        let errors = validate_register("   ", "a@x.com", "secret1");
        assert!(errors.contains(&"Name is required".to_string()));
    }

    #[test]
    fn test_malformed_email_rejected() {
        let errors = validate_register("Alice", "not-an-email", "secret1");
        assert!(errors.contains(&"Valid email is required".to_string()));
    }

    #[test]
    fn test_email_domain_needs_a_dot() {
        for email in ["user@localhost", "user@", "@x.com", "a b@x.com", "user@x."] {
            let errors = validate_register("Alice", email, "secret1");
            assert!(
                errors.contains(&"Valid email is required".to_string()),
                "'{}' should be rejected",
                email
            );
        }

        assert!(validate_register("Alice", "user@sub.example.com", "secret1").is_empty());
    }

    #[test]
    fn test_short_password_rejected() {
        let errors = validate_register("Alice", "a@x.com", "12345");
        assert!(errors.contains(&"Password must be at least 6 characters".to_string()));
    }

    #[test]
    fn test_all_fields_invalid_reports_each() {
        let errors = validate_register("", "nope", "123");
        assert_eq!(errors.len(), 3);
    }
}
