use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    display_name::DisplayName,
    email::Email,
    ids::{OrganisationId, TeamId, UserId},
    password::Credentials,
    timestamps::Timestamps,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    #[default]
    Pending,
    Active,
}

impl UserStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "active" => Self::Active,
            _ => Self::Pending,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub display_name: DisplayName,
    pub email: Email,
    pub screen_name: Option<String>,
    pub photo: Option<String>,
    pub admin: bool,
    #[serde(skip)]
    pub credentials: Option<Credentials>,
    pub sign_in_count: u32,
    pub last_login: Option<DateTime<Utc>>,
    pub teams: Vec<TeamId>,
    pub organisations: Vec<OrganisationId>,
    pub status: UserStatus,
    pub deleted: bool,
    pub timestamps: Timestamps,
}

impl User {
    pub fn new(display_name: DisplayName, email: Email) -> Self {
        Self {
            id: UserId::new(),
            display_name,
            email,
            screen_name: None,
            photo: None,
            admin: false,
            credentials: None,
            sign_in_count: 0,
            last_login: None,
            teams: Vec::new(),
            organisations: Vec::new(),
            status: UserStatus::default(),
            deleted: false,
            timestamps: Timestamps::default(),
        }
    }

    /// Bumps the login statistics after a successful sign in.
    pub fn record_sign_in(&mut self, now: DateTime<Utc>) {
        self.sign_in_count += 1;
        self.last_login = Some(now);
    }

    pub fn join_team(&mut self, team: TeamId) {
        if !self.teams.contains(&team) {
            self.teams.push(team);
        }
    }

    pub fn join_organisation(&mut self, organisation: OrganisationId) {
        if !self.organisations.contains(&organisation) {
            self.organisations.push(organisation);
        }
    }

    pub fn leave_team(&mut self, team: &TeamId) {
        self.teams.retain(|t| t != team);
    }
}
