use membership_core::{OrganisationId, StoreError, Team, TeamId, TeamSearch, TeamStore};

#[derive(Debug, thiserror::Error)]
pub enum TeamQueryError {
    #[error("Could not query teams: {0}")]
    TeamStoreError(#[from] StoreError),
}

pub struct TeamQuery<T>
where
    T: TeamStore,
{
    team_store: T,
}

impl<T> TeamQuery<T>
where
    T: TeamStore,
{
    pub fn new(team_store: T) -> Self {
        Self { team_store }
    }

    #[tracing::instrument(name = "TeamQuery::find_team_by_id", skip(self))]
    pub async fn find_team_by_id(&self, id: &TeamId) -> Result<Option<Team>, TeamQueryError> {
        match self.team_store.get_team(id).await {
            Ok(team) => Ok(Some(team)),
            Err(StoreError::NotFound) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    #[tracing::instrument(name = "TeamQuery::find_teams_by_organisation", skip(self))]
    pub async fn find_teams_by_organisation(
        &self,
        organisation: &OrganisationId,
    ) -> Result<Vec<Team>, TeamQueryError> {
        Ok(self.team_store.find_teams_by_organisation(organisation).await?)
    }

    #[tracing::instrument(name = "TeamQuery::search_teams", skip(self))]
    pub async fn search_teams(&self, search: &TeamSearch) -> Result<Vec<Team>, TeamQueryError> {
        Ok(self.team_store.search_teams(search).await?)
    }
}
