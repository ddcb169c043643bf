use membership_core::{
    DisplayName, Email, ErrorKind, Organisation, OrganisationId, OrganisationKey,
    OrganisationStore, StoreError, Team, TeamStore, UserId, UserStore,
};

use super::display_names::DisplayNameRegistry;
use super::team_command::NewTeam;

#[derive(Debug, Clone)]
pub struct NewOrganisation {
    pub display_name: DisplayName,
    pub billing_email: Email,
    pub title: Option<String>,
    pub domain: Option<String>,
    pub email: Option<Email>,
    pub photo: Option<String>,
}

impl NewOrganisation {
    pub fn new(display_name: DisplayName, billing_email: Email) -> Self {
        Self {
            display_name,
            billing_email,
            title: None,
            domain: None,
            email: None,
            photo: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct OrganisationPatch {
    pub display_name: Option<DisplayName>,
    pub billing_email: Option<Email>,
    pub title: Option<String>,
    pub domain: Option<String>,
    pub email: Option<Email>,
    pub photo: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum OrganisationCommandError {
    #[error("Organisation not created")]
    NotCreated(#[source] StoreError),
    #[error("Error creating organisation teams")]
    TeamsNotCreated(#[source] StoreError),
    #[error("Organisation not updated")]
    NotUpdated(#[source] StoreError),
    #[error("Organisation not deleted")]
    NotDeleted(#[source] StoreError),
    #[error("Organisation to remove not found")]
    NotFound,
    #[error("Team not added to organisation")]
    TeamNotAdded(#[source] StoreError),
}

impl OrganisationCommandError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotCreated(e)
            | Self::TeamsNotCreated(e)
            | Self::NotUpdated(e)
            | Self::NotDeleted(e)
            | Self::TeamNotAdded(e) => e.kind(),
            Self::NotFound => ErrorKind::NotFound,
        }
    }
}

/// Organisation writes. Creating an organisation also provisions its
/// owners and members teams. Display names share one namespace with users.
pub struct OrganisationCommand<O, T, U>
where
    O: OrganisationStore + Clone,
    T: TeamStore,
    U: UserStore,
{
    organisation_store: O,
    team_store: T,
    display_names: DisplayNameRegistry<U, O>,
}

impl<O, T, U> OrganisationCommand<O, T, U>
where
    O: OrganisationStore + Clone,
    T: TeamStore,
    U: UserStore,
{
    pub fn new(organisation_store: O, team_store: T, user_store: U) -> Self {
        Self {
            display_names: DisplayNameRegistry::new(user_store, organisation_store.clone()),
            organisation_store,
            team_store,
        }
    }

    /// Writes the owners team, the members team, then the organisation.
    /// If a later write fails, the teams written so far are deleted again.
    /// A taken display name is rejected before any team is written.
    #[tracing::instrument(
        name = "OrganisationCommand::create_organisation",
        skip(self, new_organisation),
        fields(display_name = %new_organisation.display_name)
    )]
    pub async fn create_organisation(
        &self,
        new_organisation: NewOrganisation,
        founder: Option<UserId>,
    ) -> Result<Organisation, OrganisationCommandError> {
        self.display_names
            .ensure_available(&new_organisation.display_name)
            .await
            .map_err(OrganisationCommandError::NotCreated)?;

        let id = OrganisationId::new();
        let mut owners = Team::owners_of(&new_organisation.display_name, id);
        let mut members = Team::members_of(&new_organisation.display_name, id);
        if let Some(founder) = founder {
            owners.add_member(founder);
            members.add_member(founder);
        }

        let owners = self
            .team_store
            .add_team(owners)
            .await
            .map_err(OrganisationCommandError::TeamsNotCreated)?;
        let members = match self.team_store.add_team(members).await {
            Ok(team) => team,
            Err(e) => {
                self.discard_teams(&[owners]).await;
                return Err(OrganisationCommandError::TeamsNotCreated(e));
            }
        };

        let mut organisation = Organisation::new(
            id,
            new_organisation.display_name,
            new_organisation.billing_email,
            owners.id,
            members.id,
        );
        organisation.title = new_organisation.title;
        organisation.domain = new_organisation.domain;
        organisation.email = new_organisation.email;
        organisation.photo = new_organisation.photo;

        match self.organisation_store.add_organisation(organisation).await {
            Ok(organisation) => Ok(organisation),
            Err(e) => {
                self.discard_teams(&[owners, members]).await;
                Err(OrganisationCommandError::NotCreated(e))
            }
        }
    }

    #[tracing::instrument(name = "OrganisationCommand::update_organisation", skip(self, patch))]
    pub async fn update_organisation(
        &self,
        key: OrganisationKey,
        patch: OrganisationPatch,
    ) -> Result<Organisation, OrganisationCommandError> {
        let mut organisation = self
            .load(&key)
            .await
            .map_err(OrganisationCommandError::NotUpdated)?;

        if let Some(display_name) = patch.display_name {
            if display_name != organisation.display_name {
                self.display_names
                    .ensure_available(&display_name)
                    .await
                    .map_err(OrganisationCommandError::NotUpdated)?;
            }
            organisation.display_name = display_name;
        }
        if let Some(billing_email) = patch.billing_email {
            organisation.billing_email = billing_email;
        }
        if patch.title.is_some() {
            organisation.title = patch.title;
        }
        if patch.domain.is_some() {
            organisation.domain = patch.domain;
        }
        if patch.email.is_some() {
            organisation.email = patch.email;
        }
        if patch.photo.is_some() {
            organisation.photo = patch.photo;
        }

        self.organisation_store
            .save_organisation(organisation)
            .await
            .map_err(OrganisationCommandError::NotUpdated)
    }

    #[tracing::instrument(name = "OrganisationCommand::delete_organisation", skip(self))]
    pub async fn delete_organisation(
        &self,
        key: OrganisationKey,
    ) -> Result<(), OrganisationCommandError> {
        match self.organisation_store.delete_organisation(&key).await {
            Ok(()) => Ok(()),
            Err(StoreError::NotFound) => Err(OrganisationCommandError::NotFound),
            Err(e) => Err(OrganisationCommandError::NotDeleted(e)),
        }
    }

    /// Creates a team owned by the organisation and lists it on the
    /// organisation.
    #[tracing::instrument(name = "OrganisationCommand::add_team", skip(self, new_team))]
    pub async fn add_team(
        &self,
        organisation: OrganisationId,
        mut new_team: NewTeam,
    ) -> Result<(Organisation, Team), OrganisationCommandError> {
        let mut target = self
            .organisation_store
            .get_organisation(&organisation)
            .await
            .map_err(OrganisationCommandError::TeamNotAdded)?;

        new_team.organisation = Some(organisation);
        let team = self
            .team_store
            .add_team(new_team.into_team())
            .await
            .map_err(OrganisationCommandError::TeamNotAdded)?;

        target.add_team(team.id);
        match self.organisation_store.save_organisation(target).await {
            Ok(organisation) => Ok((organisation, team)),
            Err(e) => {
                self.discard_teams(&[team]).await;
                Err(OrganisationCommandError::TeamNotAdded(e))
            }
        }
    }

    async fn load(&self, key: &OrganisationKey) -> Result<Organisation, StoreError> {
        match key {
            OrganisationKey::Id(id) => self.organisation_store.get_organisation(id).await,
            OrganisationKey::DisplayName(name) => self
                .organisation_store
                .find_organisation_by_display_name(name)
                .await?
                .ok_or(StoreError::NotFound),
        }
    }

    async fn discard_teams(&self, teams: &[Team]) {
        for team in teams {
            if let Err(e) = self.team_store.delete_team(&team.id).await {
                tracing::warn!(error = %e, team = %team.id, "could not discard team");
            }
        }
    }
}
