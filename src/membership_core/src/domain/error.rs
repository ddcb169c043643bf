use thiserror::Error;

/// Coarse classification shared by every error surfaced from this library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad input shape, caught before any persistence call
    Validation,
    /// Display name or email already taken
    Conflict,
    /// Update/delete/lookup target missing
    NotFound,
    /// Underlying store failure, including timeouts
    Persistence,
    /// A field combination the domain forbids
    Policy,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("Display name cannot be blank")]
    EmptyDisplayName,
    #[error("Email address is not valid")]
    InvalidEmail,
    #[error("Password cannot be blank")]
    EmptyPassword,
    #[error("{0} is an invalid permission level")]
    InvalidPermissionLevel(String),
    #[error("`inviteType` must be Single or Open but was `{0}`")]
    InvalidInviteType(String),
    #[error("An email must be provided for a Single invite")]
    SingleInviteRequiresEmail,
    #[error("A single invite must have a max times used of 1")]
    SingleInviteMaxTimesUsed,
}

impl DomainError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::SingleInviteRequiresEmail | Self::SingleInviteMaxTimesUsed => ErrorKind::Policy,
            _ => ErrorKind::Validation,
        }
    }
}
