use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::{
    display_name::DisplayName,
    error::DomainError,
    ids::{OrganisationId, TeamId, UserId},
    timestamps::Timestamps,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionLevel {
    #[default]
    Read,
    Write,
    Admin,
}

impl PermissionLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
            Self::Admin => "admin",
        }
    }
}

impl FromStr for PermissionLevel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "read" => Ok(Self::Read),
            "write" => Ok(Self::Write),
            "admin" => Ok(Self::Admin),
            _ => Err(DomainError::InvalidPermissionLevel(s.to_string())),
        }
    }
}

impl fmt::Display for PermissionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub description: Option<String>,
    pub photo: Option<String>,
    pub organisation: Option<OrganisationId>,
    pub members: Vec<UserId>,
    pub permission_level: PermissionLevel,
    pub deleted: bool,
    pub timestamps: Timestamps,
}

impl Team {
    pub fn new(name: impl Into<String>, organisation: Option<OrganisationId>) -> Self {
        Self {
            id: TeamId::new(),
            name: name.into(),
            description: None,
            photo: None,
            organisation,
            members: Vec::new(),
            permission_level: PermissionLevel::default(),
            deleted: false,
            timestamps: Timestamps::default(),
        }
    }

    /// The `<org>-owners` team every new organisation gets.
    pub fn owners_of(organisation_name: &DisplayName, organisation: OrganisationId) -> Self {
        let mut team = Self::new(format!("{organisation_name}-owners"), Some(organisation));
        team.permission_level = PermissionLevel::Admin;
        team
    }

    /// The `<org>-members` team every new organisation gets.
    pub fn members_of(organisation_name: &DisplayName, organisation: OrganisationId) -> Self {
        Self::new(format!("{organisation_name}-members"), Some(organisation))
    }

    pub fn add_member(&mut self, user: UserId) {
        if !self.members.contains(&user) {
            self.members.push(user);
        }
    }

    pub fn remove_member(&mut self, user: &UserId) -> bool {
        let before = self.members.len();
        self.members.retain(|m| m != user);
        self.members.len() != before
    }

    pub fn has_member(&self, user: &UserId) -> bool {
        self.members.contains(user)
    }
}
