use chrono::Utc;
use membership_core::{
    DisplayName, Email, Password, PasswordHashError, PasswordHasher, StoreError, User, UserStore,
};
use secrecy::Secret;

/// The only message a failed login ever reports.
pub const INVALID_LOGIN_MESSAGE: &str = "Invalid login";
pub const AUTHENTICATED_MESSAGE: &str = "Authenticated";

/// Username is either a display name or an email address.
#[derive(Debug, Clone)]
pub struct LoginCredentials {
    pub username: String,
    pub password: Secret<String>,
}

impl LoginCredentials {
    pub fn new(username: impl Into<String>, password: Secret<String>) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }
}

#[derive(Debug)]
pub struct AuthenticationResult {
    pub success: bool,
    pub message: String,
    pub user: Option<User>,
}

impl AuthenticationResult {
    fn success(user: User) -> Self {
        Self {
            success: true,
            message: AUTHENTICATED_MESSAGE.to_string(),
            user: Some(user),
        }
    }

    fn invalid() -> Self {
        Self {
            success: false,
            message: INVALID_LOGIN_MESSAGE.to_string(),
            user: None,
        }
    }
}

/// Infrastructure failures only. Wrong credentials are an `Ok` result.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("User store error: {0}")]
    UserStoreError(#[from] StoreError),
    #[error("Password hashing error: {0}")]
    HashError(#[from] PasswordHashError),
}

/// Authentication use case - checks a password against the stored salted digest
pub struct AuthenticationUseCase<U, H>
where
    U: UserStore,
    H: PasswordHasher,
{
    user_store: U,
    hasher: H,
}

impl<U, H> AuthenticationUseCase<U, H>
where
    U: UserStore,
    H: PasswordHasher,
{
    pub fn new(user_store: U, hasher: H) -> Self {
        Self { user_store, hasher }
    }

    /// Looks the user up by display name, then by email. On a match the
    /// sign-in statistics are bumped and saved.
    #[tracing::instrument(name = "AuthenticationUseCase::execute", skip_all, fields(username = %credentials.username))]
    pub async fn execute(
        &self,
        credentials: LoginCredentials,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        let Ok(password) = Password::try_from(credentials.password) else {
            return Ok(AuthenticationResult::invalid());
        };
        let username = credentials.username.trim();
        if username.is_empty() {
            return Ok(AuthenticationResult::invalid());
        }

        let Some(mut user) = self.find_user(username).await? else {
            tracing::debug!("unknown username");
            return Ok(AuthenticationResult::invalid());
        };
        let Some(stored) = user.credentials.as_ref() else {
            return Ok(AuthenticationResult::invalid());
        };

        let digest = self.hasher.hash(&password, &stored.salt).await?;
        if digest != stored.digest {
            tracing::debug!("password mismatch");
            return Ok(AuthenticationResult::invalid());
        }

        user.record_sign_in(Utc::now());
        let user = self.user_store.save_user(user).await?;
        Ok(AuthenticationResult::success(user))
    }

    async fn find_user(&self, username: &str) -> Result<Option<User>, StoreError> {
        if let Ok(display_name) = DisplayName::parse(username) {
            if let Some(user) = self.user_store.find_user_by_display_name(&display_name).await? {
                return Ok(Some(user));
            }
        }

        match Email::parse(username) {
            Ok(email) => self.user_store.find_user_by_email(&email).await,
            Err(_) => Ok(None),
        }
    }
}
