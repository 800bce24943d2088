//! Persistent user store collaborator.
//!
//! The store owns the `users` table; its uniqueness constraint on
//! `external_id` is the source of truth for resolving concurrent first
//! logins. A violated constraint surfaces as [`StoreError::Duplicate`]
//! so the reconciler can fall back to a re-read instead of failing the
//! login.

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use wicket_core::UserId;
use wicket_identity::{ExternalIdentity, User};

/// Errors from user store operations.
#[derive(Debug)]
pub enum StoreError {
    /// A row with this external id already exists.
    Duplicate,
    /// The store could not be reached or the query failed.
    Unavailable { details: String },
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Duplicate => write!(f, "user with this external id already exists"),
            Self::Unavailable { details } => write!(f, "user store unavailable: {details}"),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => Self::Duplicate,
            _ => Self::Unavailable {
                details: e.to_string(),
            },
        }
    }
}

/// Capability for reading and creating user records.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Finds a user by the provider's unique identifier.
    async fn find_by_external_id(&self, external_id: &str) -> Result<Option<User>, StoreError>;

    /// Creates a user from the given identity.
    ///
    /// Fails with [`StoreError::Duplicate`] if a row with the same
    /// external id already exists.
    async fn create(&self, identity: &ExternalIdentity) -> Result<User, StoreError>;

    /// Probes store reachability.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Row type for user queries.
#[derive(FromRow)]
struct UserRow {
    user_id: i64,
    external_id: String,
    user_name: String,
    email: String,
    picture: String,
}

impl UserRow {
    fn into_user(self) -> User {
        User::new(
            UserId::from_i64(self.user_id),
            self.external_id,
            self.user_name,
            self.email,
            self.picture,
        )
    }
}

/// PostgreSQL-backed user store.
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    /// Creates a store over the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_external_id(&self, external_id: &str) -> Result<Option<User>, StoreError> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT user_id, external_id, user_name, email, picture
            FROM users
            WHERE external_id = $1
            "#,
        )
        .bind(external_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(UserRow::into_user))
    }

    async fn create(&self, identity: &ExternalIdentity) -> Result<User, StoreError> {
        let row: UserRow = sqlx::query_as(
            r#"
            INSERT INTO users (external_id, user_name, email, picture)
            VALUES ($1, $2, $3, $4)
            RETURNING user_id, external_id, user_name, email, picture
            "#,
        )
        .bind(identity.provider_user_id())
        .bind(identity.display_name())
        .bind(identity.email())
        .bind(identity.avatar_url())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_user())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
