use membership_core::{ErrorKind, PasswordHashError, StoreError};

use super::state::RegistrationState;

/// Why a registration ended `Invalid`.
///
/// `Display` is the message handed back to the caller. Store and hashing
/// failures keep their cause behind `source()` for diagnostics.
#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    #[error("Email, username and password are required")]
    MissingCredentials,
    #[error("Organisation name is required")]
    MissingOrganisationName,
    #[error("Organisation is required")]
    MissingOrganisation,
    #[error("Password do not match")]
    PasswordMismatch,
    #[error("Email address is not valid")]
    InvalidEmail,
    #[error("User already exists")]
    UserAlreadyExists,
    #[error("Organisation already exists")]
    OrganisationAlreadyExists,
    #[error("An error occurred verifying username")]
    UsernameVerification(#[source] StoreError),
    #[error("An error occurred verifying user email")]
    EmailVerification(#[source] StoreError),
    #[error("An error occurred verifying organisation name")]
    OrganisationNameVerification(#[source] StoreError),
    #[error("Could not create user")]
    PasswordHashing(#[source] PasswordHashError),
    #[error("Could not create user")]
    UserNotCreated(#[source] StoreError),
    #[error("Could not find organisation")]
    OrganisationNotFound(#[source] StoreError),
    #[error("Error creating organisation teams")]
    TeamsNotCreated(#[source] StoreError),
    #[error("Could not create organisation")]
    OrganisationNotCreated(#[source] StoreError),
    #[error("Could not save user to organisation")]
    MembersTeamNotSaved(#[source] StoreError),
    #[error("Could not save user with organisation details")]
    UserNotLinked(#[source] StoreError),
    #[error("Registration step ran out of order in state {0:?}")]
    OutOfOrder(RegistrationState),
}

impl RegistrationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingCredentials
            | Self::MissingOrganisationName
            | Self::MissingOrganisation
            | Self::PasswordMismatch
            | Self::InvalidEmail
            | Self::OutOfOrder(_) => ErrorKind::Validation,
            Self::UserAlreadyExists | Self::OrganisationAlreadyExists => ErrorKind::Conflict,
            Self::PasswordHashing(_) => ErrorKind::Persistence,
            Self::UsernameVerification(e)
            | Self::EmailVerification(e)
            | Self::OrganisationNameVerification(e)
            | Self::UserNotCreated(e)
            | Self::OrganisationNotFound(e)
            | Self::TeamsNotCreated(e)
            | Self::OrganisationNotCreated(e)
            | Self::MembersTeamNotSaved(e)
            | Self::UserNotLinked(e) => e.kind(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_store_failures_hide_the_cause_from_the_message() {
        let error =
            RegistrationError::UserNotCreated(StoreError::UnexpectedError("db down".into()));
        assert_eq!(error.to_string(), "Could not create user");
        assert!(error.source().unwrap().to_string().contains("db down"));
        assert_eq!(error.kind(), ErrorKind::Persistence);
    }

    #[test]
    fn test_a_lost_insert_race_classifies_as_conflict() {
        let error = RegistrationError::UserNotCreated(StoreError::AlreadyExists("email"));
        assert_eq!(error.kind(), ErrorKind::Conflict);
    }

    #[test]
    fn test_missing_organisation_classifies_as_not_found() {
        let error = RegistrationError::OrganisationNotFound(StoreError::NotFound);
        assert_eq!(error.kind(), ErrorKind::NotFound);
    }
}
