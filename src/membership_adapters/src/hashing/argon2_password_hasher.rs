use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHasher as _, SaltString, rand_core},
};
use membership_core::{Password, PasswordDigest, PasswordHashError, PasswordHasher, Salt};

use crate::config::HashingSettings;

/// Argon2id over a per-user salt. The digest is the PHC string, so the
/// parameters travel with the hash.
#[derive(Debug, Clone, Default)]
pub struct Argon2PasswordHasher {
    settings: HashingSettings,
}

impl Argon2PasswordHasher {
    pub fn new(settings: HashingSettings) -> Self {
        Self { settings }
    }

    fn hasher(settings: &HashingSettings) -> Result<Argon2<'static>, PasswordHashError> {
        let params = Params::new(
            settings.memory_kib,
            settings.iterations,
            settings.parallelism,
            None,
        )
        .map_err(|e| PasswordHashError::Hash(e.to_string()))?;

        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

#[async_trait::async_trait]
impl PasswordHasher for Argon2PasswordHasher {
    fn generate_salt(&self) -> Result<Salt, PasswordHashError> {
        let salt = SaltString::generate(rand_core::OsRng);
        Ok(Salt::new(salt.as_str()))
    }

    #[tracing::instrument(name = "Computing password hash", skip_all)]
    async fn hash(
        &self,
        password: &Password,
        salt: &Salt,
    ) -> Result<PasswordDigest, PasswordHashError> {
        let current_span: tracing::Span = tracing::Span::current();
        let settings = self.settings.clone();
        let password = password.clone();
        let salt = salt.as_str().to_string();

        let result = tokio::task::spawn_blocking(move || {
            current_span.in_scope(move || {
                let salt = SaltString::from_b64(&salt)
                    .map_err(|e| PasswordHashError::Salt(e.to_string()))?;
                Self::hasher(&settings)?
                    .hash_password(password.expose().as_bytes(), &salt)
                    .map(|hash| PasswordDigest::new(hash.to_string()))
                    .map_err(|e| PasswordHashError::Hash(e.to_string()))
            })
        })
        .await
        .map_err(|e| PasswordHashError::Hash(e.to_string()))?;

        result
    }
}
