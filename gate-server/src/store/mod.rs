//! Persistence seam
//!
//! Users, roles and the license are owned by a [`Store`]. The gateway reads
//! them on every request and writes only through the guarded user/role
//! endpoints and license import.

pub mod memory;

use async_trait::async_trait;
use shared::models::{License, Role, User};
use thiserror::Error;

use crate::AppError;

pub use memory::MemoryStore;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("corrupt record: {0}")]
    Corrupt(String),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::store(err.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Thread-safe storage for users, roles and the license
#[async_trait]
pub trait Store: Send + Sync {
    /// `Ok(None)` when the user does not exist
    async fn get_user(&self, username: &str) -> StoreResult<Option<User>>;

    async fn list_users(&self) -> StoreResult<Vec<User>>;

    async fn get_role(&self, id: &str) -> StoreResult<Option<Role>>;

    async fn list_roles(&self) -> StoreResult<Vec<Role>>;

    async fn create_or_update_user(&self, user: User) -> StoreResult<()>;

    async fn create_or_update_role(&self, role: Role) -> StoreResult<()>;

    /// Returns whether a user was removed
    async fn delete_user(&self, username: &str) -> StoreResult<bool>;

    /// Returns whether a role was removed
    async fn delete_role(&self, id: &str) -> StoreResult<bool>;

    async fn get_license(&self) -> StoreResult<Option<License>>;

    async fn save_license(&self, license: License) -> StoreResult<()>;
}
