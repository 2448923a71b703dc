/// Authentication gate middleware
///
/// Intercepts every protected request, converts the bearer token into an
/// authenticated identity, and attaches it to the request. The gate is a
/// pure authorization step: it does no business logic and its only side
/// effect is the extension insertion.
///
/// The contract, in order:
///
/// 1. `Authorization: Bearer <token>` must be present; otherwise the
///    request is rejected ("no token").
/// 2. The token must verify through the codec; otherwise rejected
///    ("token failed"). Expired, tampered and malformed tokens all land
///    here, indistinguishably.
/// 3. The subject must resolve to a live user row, loaded without the
///    password hash; a token for a since-deleted user is rejected
///    ("user not found").
/// 4. The sanitized [`PublicUser`] is inserted into request extensions
///    for the ownership guard and the handlers.
///
/// All three rejections surface as the same 401 response shape at the
/// boundary, so a caller learns only that authentication failed.
///
/// # Example
///
/// ```no_run
/// use axum::{http::StatusCode, middleware, routing::get, Extension, Router};
/// use sqlx::PgPool;
/// use tasknest_shared::auth::middleware::auth_gate;
/// use tasknest_shared::models::user::PublicUser;
///
/// async fn handler(Extension(user): Extension<PublicUser>) -> String {
///     format!("Hello, {}!", user.name)
/// }
///
/// fn router(pool: PgPool, secret: String) -> Router {
///     Router::new()
///         .route("/api/profile", get(handler))
///         .layer(middleware::from_fn(move |req, next| {
///             let pool = pool.clone();
///             let secret = secret.clone();
///             async move {
///                 auth_gate(pool, secret, req, next)
///                     .await
///                     .map_err(|_| StatusCode::UNAUTHORIZED)
///             }
///         }))
/// }
/// ```

use axum::{
    extract::Request,
    http::header,
    middleware::Next,
    response::Response,
};
use sqlx::PgPool;

use super::token;
use crate::models::user::{PublicUser, User};

/// Why the gate rejected a request
///
/// The variants exist for logging and tests; the boundary maps all but
/// `Storage` to the same 401 shape.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No `Authorization: Bearer` header
    #[error("Not authorized, no token")]
    NoToken,

    /// Token did not verify (malformed, tampered or expired)
    #[error("Not authorized, token failed")]
    TokenFailed,

    /// Token verified but the subject no longer exists
    #[error("User not found")]
    UserNotFound,

    /// Credential store unreachable
    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

/// Extracts the bearer token from an `Authorization` header value
fn bearer_token(header_value: &str) -> Option<&str> {
    header_value.strip_prefix("Bearer ")
}

/// The authentication gate
///
/// On success, runs the rest of the stack with the authenticated user
/// attached; on failure, short-circuits with an [`AuthError`].
pub async fn auth_gate(
    pool: PgPool,
    secret: String,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::NoToken)?;

    let token = bearer_token(auth_header).ok_or(AuthError::NoToken)?;

    let user_id = token::verify(token, &secret).ok_or(AuthError::TokenFailed)?;

    // Load the user without its password hash; a stale token whose
    // subject was deleted after issuance dies here.
    let user: PublicUser = User::find_public(&pool, user_id)
        .await?
        .ok_or(AuthError::UserNotFound)?;

    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token_extraction() {
        assert_eq!(bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(bearer_token("bearer abc"), None);
        assert_eq!(bearer_token("Basic dXNlcg=="), None);
        assert_eq!(bearer_token("abc.def.ghi"), None);
        assert_eq!(bearer_token(""), None);
    }

    #[test]
    fn test_rejection_messages() {
        assert_eq!(AuthError::NoToken.to_string(), "Not authorized, no token");
        assert_eq!(
            AuthError::TokenFailed.to_string(),
            "Not authorized, token failed"
        );
        assert_eq!(AuthError::UserNotFound.to_string(), "User not found");
    }
}
