use membership_core::{
    ErrorKind, OrganisationId, PermissionLevel, StoreError, Team, TeamId, TeamStore, UserId,
};

#[derive(Debug, Clone)]
pub struct NewTeam {
    pub name: String,
    pub description: Option<String>,
    pub photo: Option<String>,
    pub organisation: Option<OrganisationId>,
    pub permission_level: PermissionLevel,
    pub members: Vec<UserId>,
}

impl NewTeam {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            photo: None,
            organisation: None,
            permission_level: PermissionLevel::default(),
            members: Vec::new(),
        }
    }

    pub(crate) fn into_team(self) -> Team {
        let mut team = Team::new(self.name, self.organisation);
        team.description = self.description;
        team.photo = self.photo;
        team.permission_level = self.permission_level;
        for member in self.members {
            team.add_member(member);
        }
        team
    }
}

#[derive(Debug, Clone, Default)]
pub struct TeamPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub photo: Option<String>,
    pub permission_level: Option<PermissionLevel>,
}

#[derive(Debug, thiserror::Error)]
pub enum TeamCommandError {
    #[error("Team not created")]
    NotCreated(#[source] StoreError),
    #[error("Team not updated")]
    NotUpdated(#[source] StoreError),
    #[error("Team not deleted")]
    NotDeleted(#[source] StoreError),
    #[error("Team to remove not found")]
    NotFound,
}

impl TeamCommandError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotCreated(e) | Self::NotUpdated(e) | Self::NotDeleted(e) => e.kind(),
            Self::NotFound => ErrorKind::NotFound,
        }
    }
}

pub struct TeamCommand<T>
where
    T: TeamStore,
{
    team_store: T,
}

impl<T> TeamCommand<T>
where
    T: TeamStore,
{
    pub fn new(team_store: T) -> Self {
        Self { team_store }
    }

    #[tracing::instrument(name = "TeamCommand::create_team", skip_all, fields(name = %new_team.name))]
    pub async fn create_team(&self, new_team: NewTeam) -> Result<Team, TeamCommandError> {
        self.team_store
            .add_team(new_team.into_team())
            .await
            .map_err(TeamCommandError::NotCreated)
    }

    #[tracing::instrument(name = "TeamCommand::update_team", skip(self, patch))]
    pub async fn update_team(&self, id: TeamId, patch: TeamPatch) -> Result<Team, TeamCommandError> {
        self.modify(&id, |team| {
            if let Some(name) = patch.name {
                team.name = name;
            }
            if patch.description.is_some() {
                team.description = patch.description;
            }
            if patch.photo.is_some() {
                team.photo = patch.photo;
            }
            if let Some(level) = patch.permission_level {
                team.permission_level = level;
            }
        })
        .await
    }

    /// Marks the team deleted. Soft-deleted teams drop out of searches.
    #[tracing::instrument(name = "TeamCommand::delete_team", skip(self))]
    pub async fn delete_team(&self, id: TeamId) -> Result<Team, TeamCommandError> {
        let mut team = self.load_for_removal(&id).await?;
        team.deleted = true;
        self.team_store
            .save_team(team)
            .await
            .map_err(TeamCommandError::NotDeleted)
    }

    /// Removes the team from the store for good.
    #[tracing::instrument(name = "TeamCommand::purge_team", skip(self))]
    pub async fn purge_team(&self, id: TeamId) -> Result<(), TeamCommandError> {
        match self.team_store.delete_team(&id).await {
            Ok(()) => Ok(()),
            Err(StoreError::NotFound) => Err(TeamCommandError::NotFound),
            Err(e) => Err(TeamCommandError::NotDeleted(e)),
        }
    }

    #[tracing::instrument(name = "TeamCommand::add_member", skip(self))]
    pub async fn add_member(&self, id: TeamId, user: UserId) -> Result<Team, TeamCommandError> {
        self.modify(&id, |team| team.add_member(user)).await
    }

    #[tracing::instrument(name = "TeamCommand::remove_member", skip(self))]
    pub async fn remove_member(&self, id: TeamId, user: UserId) -> Result<Team, TeamCommandError> {
        self.modify(&id, |team| {
            team.remove_member(&user);
        })
        .await
    }

    async fn modify(
        &self,
        id: &TeamId,
        change: impl FnOnce(&mut Team),
    ) -> Result<Team, TeamCommandError> {
        let mut team = self
            .team_store
            .get_team(id)
            .await
            .map_err(TeamCommandError::NotUpdated)?;
        change(&mut team);
        self.team_store
            .save_team(team)
            .await
            .map_err(TeamCommandError::NotUpdated)
    }

    async fn load_for_removal(&self, id: &TeamId) -> Result<Team, TeamCommandError> {
        match self.team_store.get_team(id).await {
            Ok(team) => Ok(team),
            Err(StoreError::NotFound) => Err(TeamCommandError::NotFound),
            Err(e) => Err(TeamCommandError::NotDeleted(e)),
        }
    }
}
