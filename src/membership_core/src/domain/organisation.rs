use serde::{Deserialize, Serialize};

use super::{
    display_name::DisplayName,
    email::Email,
    ids::{OrganisationId, TeamId},
    timestamps::Timestamps,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organisation {
    pub id: OrganisationId,
    pub display_name: DisplayName,
    pub title: Option<String>,
    pub domain: Option<String>,
    /// Where invoices go
    pub billing_email: Email,
    pub email: Option<Email>,
    pub photo: Option<String>,
    pub owners: TeamId,
    pub members: TeamId,
    pub teams: Vec<TeamId>,
    pub deleted: bool,
    pub timestamps: Timestamps,
}

impl Organisation {
    /// Builds an organisation around an already chosen owners/members pair.
    pub fn new(
        id: OrganisationId,
        display_name: DisplayName,
        billing_email: Email,
        owners: TeamId,
        members: TeamId,
    ) -> Self {
        Self {
            id,
            display_name,
            title: None,
            domain: None,
            billing_email,
            email: None,
            photo: None,
            owners,
            members,
            teams: Vec::new(),
            deleted: false,
            timestamps: Timestamps::default(),
        }
    }

    /// The owners and members teams plus any additional teams.
    pub fn all_teams(&self) -> impl Iterator<Item = TeamId> + '_ {
        [self.owners, self.members]
            .into_iter()
            .chain(self.teams.iter().copied())
    }

    pub fn add_team(&mut self, team: TeamId) {
        if team != self.owners && team != self.members && !self.teams.contains(&team) {
            self.teams.push(team);
        }
    }
}
