use membership_core::{DisplayName, Email, StoreError, User, UserId, UserSearch, UserStore};

#[derive(Debug, thiserror::Error)]
pub enum UserQueryError {
    #[error("Could not query users: {0}")]
    UserStoreError(#[from] StoreError),
}

/// Read side for users. A missing user is `Ok(None)`, never an error.
pub struct UserQuery<U>
where
    U: UserStore,
{
    user_store: U,
}

impl<U> UserQuery<U>
where
    U: UserStore,
{
    pub fn new(user_store: U) -> Self {
        Self { user_store }
    }

    #[tracing::instrument(name = "UserQuery::find_user_by_id", skip(self))]
    pub async fn find_user_by_id(&self, id: &UserId) -> Result<Option<User>, UserQueryError> {
        match self.user_store.get_user(id).await {
            Ok(user) => Ok(Some(user)),
            Err(StoreError::NotFound) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    #[tracing::instrument(name = "UserQuery::find_user_by_display_name", skip(self))]
    pub async fn find_user_by_display_name(
        &self,
        display_name: &DisplayName,
    ) -> Result<Option<User>, UserQueryError> {
        Ok(self.user_store.find_user_by_display_name(display_name).await?)
    }

    #[tracing::instrument(name = "UserQuery::find_user_by_email", skip(self))]
    pub async fn find_user_by_email(&self, email: &Email) -> Result<Option<User>, UserQueryError> {
        Ok(self.user_store.find_user_by_email(email).await?)
    }

    #[tracing::instrument(name = "UserQuery::search_users", skip(self))]
    pub async fn search_users(&self, search: &UserSearch) -> Result<Vec<User>, UserQueryError> {
        Ok(self.user_store.search_users(search).await?)
    }
}
