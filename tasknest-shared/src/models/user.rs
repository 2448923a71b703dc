/// User model and database operations
///
/// The credential store: one row per registered user, with the password
/// stored as an Argon2id hash. Email uniqueness is enforced by the
/// `users_email_key` index, not by a check-then-write in application
/// code, so concurrent registrations cannot race past it. Email matches
/// are case-sensitive.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     email VARCHAR(255) NOT NULL,
///     password_hash VARCHAR(255) NOT NULL,
///     role VARCHAR(32) NOT NULL DEFAULT 'user',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// CREATE UNIQUE INDEX users_email_key ON users (email);
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

/// Full user record, including the password hash
///
/// Deliberately does not derive `Serialize`: the hash must never reach
/// a response body. Convert to [`PublicUser`] before returning anything
/// to a client.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    /// Unique user id
    pub id: Uuid,

    /// Display name
    pub name: String,

    /// Email address, unique, matched case-sensitively
    pub email: String,

    /// Argon2id password hash, never the plaintext
    pub password_hash: String,

    /// Role tag, "user" unless set otherwise
    pub role: String,

    /// When the account was created
    pub created_at: DateTime<Utc>,
}

/// Sanitized user projection safe to serialize into responses
///
/// This is also what the authentication gate attaches to the request:
/// the password hash is excluded at the query level.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PublicUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

/// Input for creating a new user
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub name: String,
    pub email: String,
    /// Argon2id hash, not the plaintext password
    pub password_hash: String,
}

/// Input for a profile update; `None` fields are left unchanged
#[derive(Debug, Clone, Default)]
pub struct UpdateProfile {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl User {
    /// Inserts a new user
    ///
    /// A duplicate email surfaces as a unique-constraint violation from
    /// the database; callers map that to their duplicate-email error.
    pub async fn create(pool: &PgPool, data: CreateUser) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, password_hash, role, created_at
            "#,
        )
        .bind(data.name)
        .bind(data.email)
        .bind(data.password_hash)
        .fetch_one(pool)
        .await
    }

    /// Finds a user by id
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, role, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Finds a user by exact email match
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password_hash, role, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await
    }

    /// Loads the sanitized projection of a user, excluding the password
    /// hash from the query itself
    pub async fn find_public(pool: &PgPool, id: Uuid) -> Result<Option<PublicUser>, sqlx::Error> {
        sqlx::query_as::<_, PublicUser>(
            r#"
            SELECT id, name, email, role, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Applies a profile update (name and/or email)
    ///
    /// Returns the updated row, or `None` if the user no longer exists.
    /// Changing the email to one already in use trips the unique index.
    pub async fn update_profile(
        pool: &PgPool,
        id: Uuid,
        data: UpdateProfile,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET name = COALESCE($2, name),
                email = COALESCE($3, email)
            WHERE id = $1
            RETURNING id, name, email, password_hash, role, created_at
            "#,
        )
        .bind(id)
        .bind(data.name)
        .bind(data.email)
        .fetch_optional(pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_user_excludes_password_hash() {
        let user = User {
            id: Uuid::new_v4(),
            name: "Alice".to_string(),
            email: "a@x.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            role: "user".to_string(),
            created_at: Utc::now(),
        };

        let public: PublicUser = user.clone().into();
        let json = serde_json::to_value(&public).unwrap();

        assert_eq!(json["email"], "a@x.com");
        assert!(json.get("password_hash").is_none());
    }

    #[test]
    fn test_update_profile_default_changes_nothing() {
        let update = UpdateProfile::default();
        assert!(update.name.is_none());
        assert!(update.email.is_none());
    }
}
