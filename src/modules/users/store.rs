//! Credential store.
//!
//! The rest of the service only sees [`UserStore`]: create, fetch by id,
//! fetch by username, a read-only username projection, and one targeted write
//! per kind of change. Each write touches only its own columns, so a profile or
//! role edit can never carry a stale password digest or reset code back into
//! the record. [`PgUserStore`] backs production; [`MemoryUserStore`] backs
//! tests and local runs without a database.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use codeoj_core::AppError;
use sqlx::PgPool;
use thiserror::Error;
use tokio::sync::RwLock;

use super::model::{NewUser, ProfileChanges, ResetState, RoleChanges, User, UserName};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("username is already used")]
    UsernameTaken,
    #[error("no such user")]
    NotFound,
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UsernameTaken => AppError::bad_request(err),
            StoreError::NotFound => AppError::not_found(err),
            StoreError::Database(e) => AppError::database(e),
        }
    }
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create(&self, new_user: NewUser) -> Result<User, StoreError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// Writes the profile fields present in `changes` and returns the updated
    /// record. Role flags and the reset code are never touched.
    async fn update_profile(&self, id: i64, changes: ProfileChanges) -> Result<User, StoreError>;

    /// Writes the role flags present in `roles` and returns the updated record.
    async fn update_roles(&self, id: i64, roles: RoleChanges) -> Result<User, StoreError>;

    /// Stores a reset code, replacing any code already in flight.
    async fn begin_reset(
        &self,
        id: i64,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    /// Replaces the password digest and clears the reset code, but only while
    /// `code` is still the live, unexpired code at `now`. Returns `false` when
    /// the code was already consumed, replaced or expired.
    async fn complete_reset(
        &self,
        id: i64,
        code: &str,
        now: DateTime<Utc>,
        password_hash: &str,
    ) -> Result<bool, StoreError>;

    /// `(id, username)` pairs for the ids that exist, ordered by id.
    async fn usernames_by_ids(&self, ids: &[i64]) -> Result<Vec<UserName>, StoreError>;

    /// Cheap round trip to the backing store.
    async fn ping(&self) -> Result<(), StoreError>;
}

const USER_COLUMNS: &str = "id, username, password, real_name, email, student_id, avatar, \
     is_admin, is_teacher, verify_code, verify_expires_at, created_at, updated_at";

#[derive(Clone, Debug)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create(&self, new_user: NewUser) -> Result<User, StoreError> {
        let sql = format!(
            "INSERT INTO users (username, password, real_name, email, student_id, avatar)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {USER_COLUMNS}"
        );

        sqlx::query_as::<_, User>(&sql)
            .bind(&new_user.username)
            .bind(&new_user.password_hash)
            .bind(&new_user.real_name)
            .bind(&new_user.email)
            .bind(&new_user.student_id)
            .bind(&new_user.avatar)
            .fetch_one(&self.db)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                    StoreError::UsernameTaken
                }
                _ => StoreError::Database(e),
            })
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");

        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await?)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1");

        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .fetch_optional(&self.db)
            .await?)
    }

    async fn update_profile(&self, id: i64, changes: ProfileChanges) -> Result<User, StoreError> {
        let sql = format!(
            "UPDATE users
             SET real_name = COALESCE($2, real_name),
                 email = COALESCE($3, email),
                 password = COALESCE($4, password),
                 student_id = COALESCE($5, student_id),
                 avatar = COALESCE($6, avatar),
                 updated_at = NOW()
             WHERE id = $1
             RETURNING {USER_COLUMNS}"
        );

        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(changes.real_name)
            .bind(changes.email)
            .bind(changes.password_hash)
            .bind(changes.student_id)
            .bind(changes.avatar)
            .fetch_optional(&self.db)
            .await?
            .ok_or(StoreError::NotFound)
    }

    async fn update_roles(&self, id: i64, roles: RoleChanges) -> Result<User, StoreError> {
        let sql = format!(
            "UPDATE users
             SET is_admin = COALESCE($2, is_admin),
                 is_teacher = COALESCE($3, is_teacher),
                 updated_at = NOW()
             WHERE id = $1
             RETURNING {USER_COLUMNS}"
        );

        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(roles.admin)
            .bind(roles.teacher)
            .fetch_optional(&self.db)
            .await?
            .ok_or(StoreError::NotFound)
    }

    async fn begin_reset(
        &self,
        id: i64,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE users
             SET verify_code = $2, verify_expires_at = $3, updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(code)
        .bind(expires_at)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }

    async fn complete_reset(
        &self,
        id: i64,
        code: &str,
        now: DateTime<Utc>,
        password_hash: &str,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE users
             SET password = $4, verify_code = '', verify_expires_at = NULL, updated_at = NOW()
             WHERE id = $1 AND verify_code <> '' AND verify_code = $2
               AND verify_expires_at >= $3",
        )
        .bind(id)
        .bind(code)
        .bind(now)
        .bind(password_hash)
        .execute(&self.db)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn usernames_by_ids(&self, ids: &[i64]) -> Result<Vec<UserName>, StoreError> {
        Ok(sqlx::query_as::<_, UserName>(
            "SELECT id, username FROM users WHERE id = ANY($1) ORDER BY id",
        )
        .bind(ids.to_vec())
        .fetch_all(&self.db)
        .await?)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.db).await?;
        Ok(())
    }
}

#[derive(Debug, Default)]
struct MemoryInner {
    last_id: i64,
    users: BTreeMap<i64, User>,
}

/// In-process store with the same observable semantics as [`PgUserStore`].
/// Every write happens under one write lock, so each targeted write is atomic
/// like its single-statement Postgres counterpart.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    inner: RwLock<MemoryInner>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, new_user: NewUser) -> Result<User, StoreError> {
        let mut inner = self.inner.write().await;

        if inner
            .users
            .values()
            .any(|user| user.username == new_user.username)
        {
            return Err(StoreError::UsernameTaken);
        }

        inner.last_id += 1;
        let now = Utc::now();
        let user = User {
            id: inner.last_id,
            username: new_user.username,
            password: new_user.password_hash,
            real_name: new_user.real_name,
            email: new_user.email,
            student_id: new_user.student_id,
            avatar: new_user.avatar,
            is_admin: false,
            is_teacher: false,
            verify_code: String::new(),
            verify_expires_at: None,
            created_at: now,
            updated_at: now,
        };
        inner.users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .inner
            .read()
            .await
            .users
            .values()
            .find(|user| user.username == username)
            .cloned())
    }

    async fn update_profile(&self, id: i64, changes: ProfileChanges) -> Result<User, StoreError> {
        let mut inner = self.inner.write().await;
        let stored = inner.users.get_mut(&id).ok_or(StoreError::NotFound)?;

        changes.apply_to(stored);
        stored.updated_at = Utc::now();

        Ok(stored.clone())
    }

    async fn update_roles(&self, id: i64, roles: RoleChanges) -> Result<User, StoreError> {
        let mut inner = self.inner.write().await;
        let stored = inner.users.get_mut(&id).ok_or(StoreError::NotFound)?;

        roles.apply_to(stored);
        stored.updated_at = Utc::now();

        Ok(stored.clone())
    }

    async fn begin_reset(
        &self,
        id: i64,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let stored = inner.users.get_mut(&id).ok_or(StoreError::NotFound)?;

        stored.begin_reset(code.to_string(), expires_at);
        stored.updated_at = Utc::now();

        Ok(())
    }

    async fn complete_reset(
        &self,
        id: i64,
        code: &str,
        now: DateTime<Utc>,
        password_hash: &str,
    ) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        let Some(stored) = inner.users.get_mut(&id) else {
            return Ok(false);
        };

        let live = stored.verify_code == code
            && matches!(stored.reset_state(now), ResetState::Pending { .. });
        if !live {
            return Ok(false);
        }

        stored.complete_reset(password_hash.to_string());
        stored.updated_at = Utc::now();

        Ok(true)
    }

    async fn usernames_by_ids(&self, ids: &[i64]) -> Result<Vec<UserName>, StoreError> {
        let inner = self.inner.read().await;
        let mut names: Vec<UserName> = ids
            .iter()
            .filter_map(|id| inner.users.get(id))
            .map(|user| UserName {
                id: user.id,
                username: user.username.clone(),
            })
            .collect();
        names.sort_by_key(|name| name.id);
        names.dedup_by_key(|name| name.id);

        Ok(names)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
