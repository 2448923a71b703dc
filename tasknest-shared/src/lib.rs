//! # TaskNest Shared Library
//!
//! Shared types and domain logic used by the TaskNest API server.
//!
//! ## Module Organization
//!
//! - `auth`: token codec, password hashing, the authentication gate and
//!   the task ownership guard
//! - `models`: database models (users, tasks)
//! - `db`: connection pool helpers

pub mod auth;
pub mod db;
pub mod models;
