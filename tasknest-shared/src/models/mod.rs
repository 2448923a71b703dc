/// Database models for TaskNest
///
/// # Models
///
/// - `user`: user accounts (credential store)
/// - `task`: personal tasks, each bound to one owner

pub mod task;
pub mod user;
