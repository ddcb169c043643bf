use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use membership_core::{OrganisationId, StoreError, Team, TeamId, TeamSearch, TeamStore};

#[derive(Default, Clone)]
pub struct HashMapTeamStore {
    teams: Arc<RwLock<HashMap<TeamId, Team>>>,
}

impl HashMapTeamStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl TeamStore for HashMapTeamStore {
    async fn add_team(&self, mut team: Team) -> Result<Team, StoreError> {
        let mut teams = self.teams.write().await;
        if teams.contains_key(&team.id) {
            return Err(StoreError::AlreadyExists("id"));
        }
        team.timestamps.touch(Utc::now());
        teams.insert(team.id, team.clone());
        Ok(team)
    }

    async fn save_team(&self, mut team: Team) -> Result<Team, StoreError> {
        let mut teams = self.teams.write().await;
        let stored = teams.get_mut(&team.id).ok_or(StoreError::NotFound)?;
        team.timestamps.resave(&stored.timestamps, Utc::now());
        *stored = team.clone();
        Ok(team)
    }

    async fn delete_team(&self, id: &TeamId) -> Result<(), StoreError> {
        let mut teams = self.teams.write().await;
        teams.remove(id).ok_or(StoreError::NotFound)?;
        Ok(())
    }

    async fn get_team(&self, id: &TeamId) -> Result<Team, StoreError> {
        let teams = self.teams.read().await;
        teams.get(id).cloned().ok_or(StoreError::NotFound)
    }

    async fn find_teams_by_organisation(
        &self,
        organisation: &OrganisationId,
    ) -> Result<Vec<Team>, StoreError> {
        let search = TeamSearch {
            organisation: Some(*organisation),
            ..TeamSearch::default()
        };
        self.search_teams(&search).await
    }

    async fn search_teams(&self, search: &TeamSearch) -> Result<Vec<Team>, StoreError> {
        let teams = self.teams.read().await;
        let mut found: Vec<Team> = teams
            .values()
            .filter(|team| search.matches(team))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(found)
    }
}
