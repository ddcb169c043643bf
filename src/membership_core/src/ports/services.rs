use async_trait::async_trait;
use thiserror::Error;

use crate::domain::password::{Password, PasswordDigest, Salt};

#[derive(Debug, Error)]
pub enum PasswordHashError {
    #[error("Could not generate salt: {0}")]
    Salt(String),
    #[error("Could not hash password: {0}")]
    Hash(String),
}

/// Port trait for the salt-and-hash capability.
///
/// `hash` must be deterministic for a given password and salt: authentication
/// recomputes the digest with the stored salt and compares.
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    fn generate_salt(&self) -> Result<Salt, PasswordHashError>;

    async fn hash(&self, password: &Password, salt: &Salt)
    -> Result<PasswordDigest, PasswordHashError>;
}
