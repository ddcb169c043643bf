use membership_core::{
    DisplayName, Email, Organisation, OrganisationId, Password, TeamId, User, UserId,
};
use secrecy::{ExposeSecret, Secret};

use super::{error::RegistrationError, state::RegistrationState};

/// Raw sign-up form. Nothing here has been validated.
#[derive(Debug, Clone)]
pub struct RegistrationDetails {
    pub display_name: String,
    pub email: String,
    pub password: Secret<String>,
    pub confirm_password: Secret<String>,
    /// Name for the organisation to create
    pub organisation_name: Option<String>,
    /// Organisation to join when this is an invite
    pub organisation: Option<OrganisationId>,
    pub is_invite: bool,
}

impl RegistrationDetails {
    pub fn new(
        display_name: impl Into<String>,
        email: impl Into<String>,
        password: Secret<String>,
        confirm_password: Secret<String>,
    ) -> Self {
        Self {
            display_name: display_name.into(),
            email: email.into(),
            password,
            confirm_password,
            organisation_name: None,
            organisation: None,
            is_invite: false,
        }
    }

    pub fn creating_organisation(mut self, organisation_name: impl Into<String>) -> Self {
        self.organisation_name = Some(organisation_name.into());
        self.organisation = None;
        self.is_invite = false;
        self
    }

    pub fn invited_to(mut self, organisation: OrganisationId) -> Self {
        self.organisation = Some(organisation);
        self.is_invite = true;
        self
    }
}

/// Where the new user ends up.
#[derive(Debug, Clone)]
pub enum OrganisationTarget {
    Create(DisplayName),
    Join(OrganisationId),
}

/// Input that passed validation, in typed form.
#[derive(Debug, Clone)]
pub struct Applicant {
    pub display_name: DisplayName,
    pub email: Email,
    pub password: Password,
    pub target: OrganisationTarget,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicationStatus {
    Pending,
    Validated,
    Invalid,
}

/// Ids of everything this run wrote, for compensation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Created {
    pub user: Option<UserId>,
    pub organisation: Option<OrganisationId>,
    pub teams: Vec<TeamId>,
    /// Existing team the user was appended to on the invite path
    pub joined_team: Option<TeamId>,
}

impl Created {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Working memory of one registration run. Owned by the saga for the
/// duration of the run and dropped at the end.
#[derive(Debug)]
pub struct Application {
    details: RegistrationDetails,
    status: ApplicationStatus,
    error: Option<RegistrationError>,
    applicant: Option<Applicant>,
    pub(crate) user: Option<User>,
    pub(crate) organisation: Option<Organisation>,
    pub(crate) created: Created,
}

impl Application {
    pub fn new(details: RegistrationDetails) -> Self {
        Self {
            details,
            status: ApplicationStatus::Pending,
            error: None,
            applicant: None,
            user: None,
            organisation: None,
            created: Created::default(),
        }
    }

    pub fn status(&self) -> ApplicationStatus {
        self.status
    }

    pub fn error(&self) -> Option<&RegistrationError> {
        self.error.as_ref()
    }

    pub fn is_invite(&self) -> bool {
        self.details.is_invite
    }

    /// Checks the raw input, in priority order: required fields, then
    /// organisation name or reference, then password confirmation.
    pub fn validate(&mut self) -> Result<&Applicant, RegistrationError> {
        let details = &self.details;

        if details.display_name.trim().is_empty()
            || details.email.trim().is_empty()
            || details.password.expose_secret().is_empty()
        {
            return Err(RegistrationError::MissingCredentials);
        }

        let target = if details.is_invite {
            let organisation = details
                .organisation
                .ok_or(RegistrationError::MissingOrganisation)?;
            OrganisationTarget::Join(organisation)
        } else {
            let name = details
                .organisation_name
                .as_deref()
                .and_then(|name| DisplayName::parse(name).ok())
                .ok_or(RegistrationError::MissingOrganisationName)?;
            OrganisationTarget::Create(name)
        };

        if details.password.expose_secret() != details.confirm_password.expose_secret() {
            return Err(RegistrationError::PasswordMismatch);
        }

        let email =
            Email::parse(details.email.clone()).map_err(|_| RegistrationError::InvalidEmail)?;
        let display_name = DisplayName::parse(details.display_name.clone())
            .map_err(|_| RegistrationError::MissingCredentials)?;
        let password = Password::try_from(details.password.clone())
            .map_err(|_| RegistrationError::MissingCredentials)?;

        self.status = ApplicationStatus::Validated;
        Ok(self.applicant.insert(Applicant {
            display_name,
            email,
            password,
            target,
        }))
    }

    pub fn applicant(&self, state: RegistrationState) -> Result<&Applicant, RegistrationError> {
        self.applicant
            .as_ref()
            .ok_or(RegistrationError::OutOfOrder(state))
    }

    pub fn user_mut(&mut self, state: RegistrationState) -> Result<&mut User, RegistrationError> {
        self.user.as_mut().ok_or(RegistrationError::OutOfOrder(state))
    }

    pub fn set_invalid(&mut self, error: RegistrationError) {
        self.status = ApplicationStatus::Invalid;
        self.error = Some(error);
    }

    pub fn message(&self) -> String {
        self.error
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default()
    }

    pub(crate) fn into_parts(self) -> (Option<User>, Option<Organisation>, Option<RegistrationError>) {
        (self.user, self.organisation, self.error)
    }
}
