use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};
use tokio::task;

use crate::config::SecurityConfig;
use crate::db::error::StoreError;
use crate::entities::users;

/// User data returned from the repository (without the password hash)
#[derive(Debug, Clone)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub is_admin: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            is_admin: model.is_admin,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

pub struct UserRepository {
    conn: DatabaseConnection,
}

impl UserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let user = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.conn)
            .await?;

        Ok(user.map(User::from))
    }

    /// Verify a password for a user.
    /// Argon2 verification is CPU-heavy, so it runs on `spawn_blocking`
    /// instead of stalling the async runtime.
    pub async fn verify_password(
        &self,
        username: &str,
        password: &str,
    ) -> Result<bool, StoreError> {
        let user = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.conn)
            .await?;

        let Some(user) = user else {
            return Ok(false);
        };

        let password_hash = user.password_hash;
        let password = password.to_string();

        let is_valid = task::spawn_blocking(move || {
            let Ok(parsed_hash) = PasswordHash::new(&password_hash) else {
                return false;
            };
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed_hash)
                .is_ok()
        })
        .await
        .map_err(|e| StoreError::Internal(format!("password verification task panicked: {e}")))?;

        Ok(is_valid)
    }

    /// Create a user, hashing the password with the configured Argon2 params.
    pub async fn create(
        &self,
        username: &str,
        password: &str,
        is_admin: bool,
        config: &SecurityConfig,
    ) -> Result<User, StoreError> {
        let password = password.to_string();
        let config = config.clone();
        let password_hash = task::spawn_blocking(move || hash_password(&password, Some(&config)))
            .await
            .map_err(|e| StoreError::Internal(format!("password hashing task panicked: {e}")))?
            .map_err(|e| StoreError::Internal(e.to_string()))?;

        let now = chrono::Utc::now().to_rfc3339();

        let active = users::ActiveModel {
            username: Set(username.to_string()),
            password_hash: Set(password_hash),
            is_admin: Set(is_admin),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active.insert(&self.conn).await?;
        Ok(User::from(model))
    }

    pub async fn set_password(
        &self,
        username: &str,
        new_password: &str,
        config: &SecurityConfig,
    ) -> Result<(), StoreError> {
        let user = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.conn)
            .await?
            .ok_or(StoreError::NotFound)?;

        let password = new_password.to_string();
        let config = config.clone();
        let new_hash = task::spawn_blocking(move || hash_password(&password, Some(&config)))
            .await
            .map_err(|e| StoreError::Internal(format!("password hashing task panicked: {e}")))?
            .map_err(|e| StoreError::Internal(e.to_string()))?;

        let now = chrono::Utc::now().to_rfc3339();

        let mut active: users::ActiveModel = user.into();
        active.password_hash = Set(new_hash);
        active.updated_at = Set(now);
        active.update(&self.conn).await?;

        Ok(())
    }
}

/// Hash a password using Argon2id with optional custom params.
/// If config is None, uses the library defaults.
pub fn hash_password(password: &str, config: Option<&SecurityConfig>) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    let argon2 = if let Some(cfg) = config {
        let params = Params::new(
            cfg.argon2_memory_cost_kib,
            cfg.argon2_time_cost,
            cfg.argon2_parallelism,
            None,
        )
        .map_err(|e| anyhow::anyhow!("Invalid Argon2 params: {e}"))?;
        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
    } else {
        Argon2::default()
    };

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}
