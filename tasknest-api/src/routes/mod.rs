/// API route handlers, organized by resource
///
/// - `health`: liveness check
/// - `auth`: registration and login
/// - `profile`: the authenticated user's own record
/// - `tasks`: task CRUD, owner-gated

pub mod auth;
pub mod health;
pub mod profile;
pub mod tasks;
