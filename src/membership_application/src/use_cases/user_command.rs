use membership_core::{
    Credentials, DisplayName, Email, ErrorKind, OrganisationStore, Password, PasswordHashError,
    PasswordHasher, StoreError, User, UserKey, UserStatus, UserStore,
};

use super::display_names::DisplayNameRegistry;

/// Fields for a user created outside registration.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub display_name: DisplayName,
    pub email: Email,
    pub password: Option<Password>,
    pub screen_name: Option<String>,
    pub photo: Option<String>,
    pub admin: bool,
}

impl NewUser {
    pub fn new(display_name: DisplayName, email: Email) -> Self {
        Self {
            display_name,
            email,
            password: None,
            screen_name: None,
            photo: None,
            admin: false,
        }
    }

    pub fn with_password(mut self, password: Password) -> Self {
        self.password = Some(password);
        self
    }
}

/// Partial update. The id is never part of a patch.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub display_name: Option<DisplayName>,
    pub email: Option<Email>,
    /// Rehashed with a fresh salt
    pub password: Option<Password>,
    pub screen_name: Option<String>,
    pub photo: Option<String>,
    pub admin: Option<bool>,
    pub status: Option<UserStatus>,
}

#[derive(Debug, thiserror::Error)]
pub enum UserCommandError {
    #[error("User not created")]
    NotCreated(#[source] StoreError),
    #[error("User not updated")]
    NotUpdated(#[source] StoreError),
    #[error("User not deleted")]
    NotDeleted(#[source] StoreError),
    #[error("User to remove not found")]
    NotFound,
    #[error("Could not hash password")]
    Hashing(#[from] PasswordHashError),
}

impl UserCommandError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotCreated(e) | Self::NotUpdated(e) | Self::NotDeleted(e) => e.kind(),
            Self::NotFound => ErrorKind::NotFound,
            Self::Hashing(_) => ErrorKind::Persistence,
        }
    }
}

/// User writes. Display names are checked against users and
/// organisations before they are stored.
pub struct UserCommand<U, O, H>
where
    U: UserStore + Clone,
    O: OrganisationStore,
    H: PasswordHasher,
{
    user_store: U,
    display_names: DisplayNameRegistry<U, O>,
    hasher: H,
}

impl<U, O, H> UserCommand<U, O, H>
where
    U: UserStore + Clone,
    O: OrganisationStore,
    H: PasswordHasher,
{
    pub fn new(user_store: U, organisation_store: O, hasher: H) -> Self {
        Self {
            display_names: DisplayNameRegistry::new(user_store.clone(), organisation_store),
            user_store,
            hasher,
        }
    }

    #[tracing::instrument(name = "UserCommand::create_user", skip_all, fields(display_name = %new_user.display_name))]
    pub async fn create_user(&self, new_user: NewUser) -> Result<User, UserCommandError> {
        self.display_names
            .ensure_available(&new_user.display_name)
            .await
            .map_err(UserCommandError::NotCreated)?;

        let mut user = User::new(new_user.display_name, new_user.email);
        user.screen_name = new_user.screen_name;
        user.photo = new_user.photo;
        user.admin = new_user.admin;
        if let Some(password) = &new_user.password {
            user.credentials = Some(self.credentials_for(password).await?);
        }

        self.user_store
            .add_user(user)
            .await
            .map_err(UserCommandError::NotCreated)
    }

    #[tracing::instrument(name = "UserCommand::update_user", skip(self, patch))]
    pub async fn update_user(&self, key: UserKey, patch: UserPatch) -> Result<User, UserCommandError> {
        let mut user = self.load(&key).await.map_err(UserCommandError::NotUpdated)?;

        if let Some(display_name) = patch.display_name {
            if display_name != user.display_name {
                self.display_names
                    .ensure_available(&display_name)
                    .await
                    .map_err(UserCommandError::NotUpdated)?;
            }
            user.display_name = display_name;
        }
        if let Some(email) = patch.email {
            user.email = email;
        }
        if let Some(password) = &patch.password {
            user.credentials = Some(self.credentials_for(password).await?);
        }
        if patch.screen_name.is_some() {
            user.screen_name = patch.screen_name;
        }
        if patch.photo.is_some() {
            user.photo = patch.photo;
        }
        if let Some(admin) = patch.admin {
            user.admin = admin;
        }
        if let Some(status) = patch.status {
            user.status = status;
        }

        self.user_store
            .save_user(user)
            .await
            .map_err(UserCommandError::NotUpdated)
    }

    #[tracing::instrument(name = "UserCommand::delete_user", skip(self))]
    pub async fn delete_user(&self, key: UserKey) -> Result<(), UserCommandError> {
        match self.user_store.delete_user(&key).await {
            Ok(()) => Ok(()),
            Err(StoreError::NotFound) => Err(UserCommandError::NotFound),
            Err(e) => Err(UserCommandError::NotDeleted(e)),
        }
    }

    async fn load(&self, key: &UserKey) -> Result<User, StoreError> {
        match key {
            UserKey::Id(id) => self.user_store.get_user(id).await,
            UserKey::DisplayName(name) => self
                .user_store
                .find_user_by_display_name(name)
                .await?
                .ok_or(StoreError::NotFound),
        }
    }

    async fn credentials_for(&self, password: &Password) -> Result<Credentials, PasswordHashError> {
        let salt = self.hasher.generate_salt()?;
        let digest = self.hasher.hash(password, &salt).await?;
        Ok(Credentials { salt, digest })
    }
}
