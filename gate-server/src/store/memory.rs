//! In-memory store
//!
//! Process-local [`Store`] used by the binary's default wiring and by tests.

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::RwLock;
use shared::models::{License, Role, User};

use super::{Store, StoreResult};

#[derive(Debug, Default)]
pub struct MemoryStore {
    users: DashMap<String, User>,
    roles: DashMap<String, Role>,
    license: RwLock<Option<License>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed helper: insert roles and users in one go
    pub fn with_data(roles: impl IntoIterator<Item = Role>, users: impl IntoIterator<Item = User>) -> Self {
        let store = Self::new();
        for role in roles {
            store.roles.insert(role.id.clone(), role);
        }
        for user in users {
            store.users.insert(user.username.clone(), user);
        }
        store
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get_user(&self, username: &str) -> StoreResult<Option<User>> {
        Ok(self.users.get(username).map(|u| u.value().clone()))
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        let mut users: Vec<User> = self.users.iter().map(|u| u.value().clone()).collect();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(users)
    }

    async fn get_role(&self, id: &str) -> StoreResult<Option<Role>> {
        Ok(self.roles.get(id).map(|r| r.value().clone()))
    }

    async fn list_roles(&self) -> StoreResult<Vec<Role>> {
        let mut roles: Vec<Role> = self.roles.iter().map(|r| r.value().clone()).collect();
        roles.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(roles)
    }

    async fn create_or_update_user(&self, user: User) -> StoreResult<()> {
        self.users.insert(user.username.clone(), user);
        Ok(())
    }

    async fn create_or_update_role(&self, role: Role) -> StoreResult<()> {
        self.roles.insert(role.id.clone(), role);
        Ok(())
    }

    async fn delete_user(&self, username: &str) -> StoreResult<bool> {
        Ok(self.users.remove(username).is_some())
    }

    async fn delete_role(&self, id: &str) -> StoreResult<bool> {
        Ok(self.roles.remove(id).is_some())
    }

    async fn get_license(&self) -> StoreResult<Option<License>> {
        Ok(self.license.read().clone())
    }

    async fn save_license(&self, license: License) -> StoreResult<()> {
        *self.license.write() = Some(license);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::Capability;

    #[tokio::test]
    async fn test_user_roundtrip_and_delete() {
        let store = MemoryStore::new();
        assert!(store.get_user("alice").await.unwrap().is_none());

        store.create_or_update_user(User::new("alice")).await.unwrap();
        assert_eq!(store.get_user("alice").await.unwrap().unwrap().username, "alice");

        assert!(store.delete_user("alice").await.unwrap());
        assert!(!store.delete_user("alice").await.unwrap());
    }

    #[tokio::test]
    async fn test_roles_listed_in_id_order() {
        let store = MemoryStore::with_data(
            [
                Role::new("r2", "ops", Capability::from_bits(2)),
                Role::new("r1", "viewer", Capability::from_bits(1)),
            ],
            [],
        );
        let ids: Vec<String> = store
            .list_roles()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["r1", "r2"]);
    }

    #[tokio::test]
    async fn test_license_replaced_on_save() {
        let store = MemoryStore::new();
        assert!(store.get_license().await.unwrap().is_none());

        store.save_license(License::new("first")).await.unwrap();
        store.save_license(License::new("second")).await.unwrap();
        assert_eq!(store.get_license().await.unwrap().unwrap().content, "second");
    }
}
