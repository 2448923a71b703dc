/// Authentication and authorization primitives for TaskNest
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`token`]: signed, time-limited identity assertions (JWT, HS256)
/// - [`middleware`]: the authentication gate converting a bearer token
///   into an authenticated user on the request
/// - [`ownership`]: the per-resource ownership check applied after a
///   task is fetched
///
/// # Security Properties
///
/// - Passwords are stored as salted Argon2id hashes, never plaintext
/// - Token verification reports a single "invalid" outcome for
///   malformed, tampered and expired tokens alike
/// - Every task mutation passes the ownership guard before it is applied

pub mod middleware;
pub mod ownership;
pub mod password;
pub mod token;
