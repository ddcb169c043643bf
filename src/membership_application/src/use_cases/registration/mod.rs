//! Registration saga: creates a user, then creates or joins an organisation,
//! over stores that share no transaction.
//!
//! Steps run strictly one after another. Each step maps to one state of
//! [`RegistrationState`]; its [`StepOutcome`] picks the next state through
//! [`RegistrationState::next`]. When a run ends `Invalid`, the ids recorded in
//! [`Created`] drive compensation according to [`RollbackPolicy`].
//!
//! The existence checks and the inserts are not atomic. Two concurrent runs
//! for the same display name or email can both pass the checks; the store's
//! own uniqueness constraint then rejects the slower insert with
//! "Could not create user".

mod application;
mod error;
mod rollback;
mod state;

use chrono::Utc;
use membership_core::{
    Credentials, ErrorKind, Organisation, OrganisationId, OrganisationStore, PasswordHasher, StoreError,
    Team, TeamStore, User, UserStore,
};
use serde::Deserialize;

pub use application::{
    Applicant, Application, ApplicationStatus, Created, OrganisationTarget, RegistrationDetails,
};
pub use error::RegistrationError;
pub use state::{RegistrationState, StepOutcome};

use crate::use_cases::display_names::DisplayNameRegistry;

/// What to do with already written entities when a run ends `Invalid`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RollbackPolicy {
    /// Delete teams, then the organisation, then the user
    #[default]
    Compensate,
    /// Leave partial work in place
    Disabled,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct RegistrationOptions {
    #[serde(default)]
    pub rollback: RollbackPolicy,
}

/// Outcome of [`RegistrationSaga::register`].
#[derive(Debug)]
pub struct RegistrationResult {
    pub success: bool,
    pub message: String,
    pub user: Option<User>,
    pub organisation: Option<Organisation>,
    /// Underlying failure, for diagnostics
    pub error: Option<RegistrationError>,
}

pub const REGISTRATION_SUCCESS_MESSAGE: &str = "Successfully registered";

pub struct RegistrationSaga<U, O, T, H>
where
    U: UserStore + Clone,
    O: OrganisationStore + Clone,
    T: TeamStore,
    H: PasswordHasher,
{
    user_store: U,
    organisation_store: O,
    team_store: T,
    hasher: H,
    display_names: DisplayNameRegistry<U, O>,
    options: RegistrationOptions,
}

impl<U, O, T, H> RegistrationSaga<U, O, T, H>
where
    U: UserStore + Clone,
    O: OrganisationStore + Clone,
    T: TeamStore,
    H: PasswordHasher,
{
    pub fn new(
        user_store: U,
        organisation_store: O,
        team_store: T,
        hasher: H,
        options: RegistrationOptions,
    ) -> Self {
        let display_names = DisplayNameRegistry::new(user_store.clone(), organisation_store.clone());
        Self {
            user_store,
            organisation_store,
            team_store,
            hasher,
            display_names,
            options,
        }
    }

    /// Runs one registration to a terminal state.
    ///
    /// Never fails outright: every failure ends the run `Invalid` and is
    /// reported through the result.
    #[tracing::instrument(
        name = "RegistrationSaga::register",
        skip_all,
        fields(display_name = %details.display_name, is_invite = details.is_invite)
    )]
    pub async fn register(&self, details: RegistrationDetails) -> RegistrationResult {
        let mut app = Application::new(details);
        let mut state = RegistrationState::Received;

        while !state.is_terminal() {
            let outcome = match self.step(state, &mut app).await {
                Ok(outcome) => outcome,
                Err(error) => {
                    tracing::info!(?state, %error, "registration rejected");
                    app.set_invalid(error);
                    StepOutcome::Rejected
                }
            };
            let next = state.next(outcome);
            tracing::debug!(from = ?state, to = ?next, "registration transition");
            state = next;
        }

        match state {
            RegistrationState::Success => self.registration_success(app),
            _ => self.registration_failed(app).await,
        }
    }

    /// True when a user or an organisation already uses `display_name`.
    pub async fn check_display_name_exists(&self, display_name: &str) -> Result<bool, StoreError> {
        self.display_names.exists_raw(display_name).await
    }

    async fn step(
        &self,
        state: RegistrationState,
        app: &mut Application,
    ) -> Result<StepOutcome, RegistrationError> {
        match state {
            RegistrationState::Received => {
                app.validate()?;
                Ok(StepOutcome::Advanced)
            }
            RegistrationState::Validated => self.check_if_user_exists(state, app).await,
            RegistrationState::UserDoesNotExist => self.create_user(state, app).await,
            RegistrationState::UserCreated => self.check_if_organisation_exists(state, app).await,
            RegistrationState::OrganisationDoesNotExist => {
                self.create_organisation(state, app).await
            }
            RegistrationState::AddUserToOrg => self.add_user_to_organisation(state, app).await,
            RegistrationState::OrganisationReady => Ok(StepOutcome::Advanced),
            RegistrationState::Success | RegistrationState::Invalid => {
                Err(RegistrationError::OutOfOrder(state))
            }
        }
    }

    async fn check_if_user_exists(
        &self,
        state: RegistrationState,
        app: &mut Application,
    ) -> Result<StepOutcome, RegistrationError> {
        let applicant = app.applicant(state)?;

        let taken = self
            .display_names
            .exists(&applicant.display_name)
            .await
            .map_err(RegistrationError::UsernameVerification)?;
        if taken {
            return Err(RegistrationError::UserAlreadyExists);
        }

        let existing = self
            .user_store
            .find_user_by_email(&applicant.email)
            .await
            .map_err(RegistrationError::EmailVerification)?;
        if existing.is_some() {
            return Err(RegistrationError::UserAlreadyExists);
        }

        Ok(StepOutcome::Advanced)
    }

    async fn create_user(
        &self,
        state: RegistrationState,
        app: &mut Application,
    ) -> Result<StepOutcome, RegistrationError> {
        let applicant = app.applicant(state)?;

        let mut user = User::new(applicant.display_name.clone(), applicant.email.clone());
        user.sign_in_count = 1;
        user.last_login = Some(Utc::now());

        let salt = self
            .hasher
            .generate_salt()
            .map_err(RegistrationError::PasswordHashing)?;
        let digest = self
            .hasher
            .hash(&applicant.password, &salt)
            .await
            .map_err(RegistrationError::PasswordHashing)?;
        user.credentials = Some(Credentials { salt, digest });

        let user = self
            .user_store
            .add_user(user)
            .await
            .map_err(RegistrationError::UserNotCreated)?;

        app.created.user = Some(user.id);
        app.user = Some(user);
        Ok(StepOutcome::Advanced)
    }

    async fn check_if_organisation_exists(
        &self,
        state: RegistrationState,
        app: &mut Application,
    ) -> Result<StepOutcome, RegistrationError> {
        let target = app.applicant(state)?.target.clone();
        match target {
            OrganisationTarget::Join(organisation) => {
                let organisation = self
                    .organisation_store
                    .get_organisation(&organisation)
                    .await
                    .map_err(RegistrationError::OrganisationNotFound)?;
                app.organisation = Some(organisation);
                Ok(StepOutcome::Invited)
            }
            OrganisationTarget::Create(name) => {
                let taken = self
                    .display_names
                    .exists(&name)
                    .await
                    .map_err(RegistrationError::OrganisationNameVerification)?;
                if taken {
                    return Err(RegistrationError::OrganisationAlreadyExists);
                }
                Ok(StepOutcome::Advanced)
            }
        }
    }

    /// Invite path: the user joins the members team only.
    async fn add_user_to_organisation(
        &self,
        state: RegistrationState,
        app: &mut Application,
    ) -> Result<StepOutcome, RegistrationError> {
        let organisation = app
            .organisation
            .clone()
            .ok_or(RegistrationError::OutOfOrder(state))?;
        let user_id = app.user_mut(state)?.id;

        let mut members = self
            .team_store
            .get_team(&organisation.members)
            .await
            .map_err(RegistrationError::MembersTeamNotSaved)?;
        members.add_member(user_id);
        let members = self
            .team_store
            .save_team(members)
            .await
            .map_err(RegistrationError::MembersTeamNotSaved)?;
        app.created.joined_team = Some(members.id);

        let user = app.user_mut(state)?;
        user.join_team(members.id);
        user.join_organisation(organisation.id);
        let user = self
            .user_store
            .save_user(user.clone())
            .await
            .map_err(RegistrationError::UserNotLinked)?;

        app.user = Some(user);
        Ok(StepOutcome::Advanced)
    }

    /// Create path. Stops at the first failed write; everything written up to
    /// that point is listed in `app.created`.
    async fn create_organisation(
        &self,
        state: RegistrationState,
        app: &mut Application,
    ) -> Result<StepOutcome, RegistrationError> {
        let OrganisationTarget::Create(name) = app.applicant(state)?.target.clone() else {
            return Err(RegistrationError::OutOfOrder(state));
        };
        let (user_id, billing_email) = {
            let user = app.user_mut(state)?;
            (user.id, user.email.clone())
        };
        let organisation_id = OrganisationId::new();

        let mut owners = Team::owners_of(&name, organisation_id);
        owners.add_member(user_id);
        let owners = self
            .team_store
            .add_team(owners)
            .await
            .map_err(RegistrationError::TeamsNotCreated)?;
        app.created.teams.push(owners.id);

        let mut members = Team::members_of(&name, organisation_id);
        members.add_member(user_id);
        let members = self
            .team_store
            .add_team(members)
            .await
            .map_err(RegistrationError::TeamsNotCreated)?;
        app.created.teams.push(members.id);

        let mut organisation =
            Organisation::new(organisation_id, name.clone(), billing_email, owners.id, members.id);
        organisation.title = Some(name.to_string());
        let organisation = self
            .organisation_store
            .add_organisation(organisation)
            .await
            .map_err(RegistrationError::OrganisationNotCreated)?;
        app.created.organisation = Some(organisation.id);

        let user = app.user_mut(state)?;
        user.join_team(owners.id);
        user.join_team(members.id);
        user.join_organisation(organisation.id);
        let user = self
            .user_store
            .save_user(user.clone())
            .await
            .map_err(RegistrationError::UserNotLinked)?;

        app.user = Some(user);
        app.organisation = Some(organisation);
        Ok(StepOutcome::Advanced)
    }

    fn registration_success(&self, app: Application) -> RegistrationResult {
        let (user, organisation, _) = app.into_parts();
        tracing::info!("registration succeeded");
        RegistrationResult {
            success: true,
            message: REGISTRATION_SUCCESS_MESSAGE.to_string(),
            user,
            organisation,
            error: None,
        }
    }

    async fn registration_failed(&self, mut app: Application) -> RegistrationResult {
        if let Some(error) = app.error() {
            if error.kind() == ErrorKind::Persistence {
                tracing::error!(error = ?error, "registration failed on a store operation");
            }
        }

        if self.options.rollback == RollbackPolicy::Compensate {
            self.rollback(&mut app).await;
        }

        let message = app.message();
        let (_, _, error) = app.into_parts();
        RegistrationResult {
            success: false,
            message,
            user: None,
            organisation: None,
            error,
        }
    }
}
