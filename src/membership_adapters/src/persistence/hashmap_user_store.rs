use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use membership_core::{
    DisplayName, Email, StoreError, User, UserId, UserKey, UserSearch, UserStore,
    ensure_unique_user,
};

#[derive(Default, Clone)]
pub struct HashMapUserStore {
    users: Arc<RwLock<HashMap<UserId, User>>>,
}

impl HashMapUserStore {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait::async_trait]
impl UserStore for HashMapUserStore {
    async fn add_user(&self, mut user: User) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.id) {
            return Err(StoreError::AlreadyExists("id"));
        }
        ensure_unique_user(users.values(), &user)?;

        user.timestamps.touch(Utc::now());
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn save_user(&self, mut user: User) -> Result<User, StoreError> {
        let mut users = self.users.write().await;
        ensure_unique_user(users.values(), &user)?;
        let stored = users.get_mut(&user.id).ok_or(StoreError::NotFound)?;

        user.timestamps.resave(&stored.timestamps, Utc::now());
        *stored = user.clone();
        Ok(user)
    }

    async fn delete_user(&self, key: &UserKey) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        let id = users
            .values()
            .find(|user| key.matches(user))
            .map(|user| user.id)
            .ok_or(StoreError::NotFound)?;
        users.remove(&id);
        Ok(())
    }

    async fn get_user(&self, id: &UserId) -> Result<User, StoreError> {
        let users = self.users.read().await;
        users.get(id).cloned().ok_or(StoreError::NotFound)
    }

    async fn find_user_by_display_name(
        &self,
        display_name: &DisplayName,
    ) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|user| &user.display_name == display_name)
            .cloned())
    }

    async fn find_user_by_email(&self, email: &Email) -> Result<Option<User>, StoreError> {
        let users = self.users.read().await;
        Ok(users.values().find(|user| &user.email == email).cloned())
    }

    async fn search_users(&self, search: &UserSearch) -> Result<Vec<User>, StoreError> {
        let users = self.users.read().await;
        let mut found: Vec<User> = users
            .values()
            .filter(|user| search.matches(user))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.display_name.cmp(&b.display_name));
        Ok(found)
    }
}
