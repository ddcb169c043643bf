use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{
    display_name::DisplayName,
    email::Email,
    error::{DomainError, ErrorKind},
    ids::{InviteId, OrganisationId, TeamId, UserId},
    invite::{Invite, InviteType},
    organisation::Organisation,
    team::Team,
    user::User,
};

// Store errors shared by every entity store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} already exists")]
    AlreadyExists(&'static str),
    #[error("Not found")]
    NotFound,
    #[error("Policy violation: {0}")]
    Policy(#[from] DomainError),
    #[error("Unexpected error {0}")]
    UnexpectedError(String),
}

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::AlreadyExists(_) => ErrorKind::Conflict,
            Self::NotFound => ErrorKind::NotFound,
            Self::Policy(e) => e.kind(),
            Self::UnexpectedError(_) => ErrorKind::Persistence,
        }
    }
}

impl PartialEq for StoreError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::AlreadyExists(a), Self::AlreadyExists(b)) => a == b,
            (Self::NotFound, Self::NotFound) => true,
            (Self::Policy(a), Self::Policy(b)) => a == b,
            (Self::UnexpectedError(_), Self::UnexpectedError(_)) => true,
            _ => false,
        }
    }
}

/// Selects a single user for update or removal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserKey {
    Id(UserId),
    DisplayName(DisplayName),
}

impl UserKey {
    pub fn matches(&self, user: &User) -> bool {
        match self {
            Self::Id(id) => &user.id == id,
            Self::DisplayName(name) => &user.display_name == name,
        }
    }
}

/// Selects a single organisation for update or removal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrganisationKey {
    Id(OrganisationId),
    DisplayName(DisplayName),
}

impl OrganisationKey {
    pub fn matches(&self, organisation: &Organisation) -> bool {
        match self {
            Self::Id(id) => &organisation.id == id,
            Self::DisplayName(name) => &organisation.display_name == name,
        }
    }
}

/// Filters for user searches. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserSearch {
    /// Case-insensitive display name prefix
    pub display_name_prefix: Option<String>,
    pub email: Option<Email>,
    pub organisation: Option<OrganisationId>,
}

impl UserSearch {
    pub fn by_email(email: Email) -> Self {
        Self {
            email: Some(email),
            ..Self::default()
        }
    }

    pub fn matches(&self, user: &User) -> bool {
        self.display_name_prefix
            .as_deref()
            .is_none_or(|prefix| user.display_name.starts_with_ignore_case(prefix))
            && self.email.as_ref().is_none_or(|email| &user.email == email)
            && self
                .organisation
                .as_ref()
                .is_none_or(|org| user.organisations.contains(org))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrganisationSearch {
    pub display_name_prefix: Option<String>,
    pub billing_email: Option<Email>,
}

impl OrganisationSearch {
    pub fn matches(&self, organisation: &Organisation) -> bool {
        self.display_name_prefix
            .as_deref()
            .is_none_or(|prefix| organisation.display_name.starts_with_ignore_case(prefix))
            && self
                .billing_email
                .as_ref()
                .is_none_or(|email| &organisation.billing_email == email)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamSearch {
    pub name: Option<String>,
    pub organisation: Option<OrganisationId>,
    pub member: Option<UserId>,
    pub include_deleted: bool,
}

impl TeamSearch {
    pub fn matches(&self, team: &Team) -> bool {
        (self.include_deleted || !team.deleted)
            && self.name.as_ref().is_none_or(|name| &team.name == name)
            && self
                .organisation
                .as_ref()
                .is_none_or(|org| team.organisation.as_ref() == Some(org))
            && self.member.as_ref().is_none_or(|user| team.has_member(user))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InviteSearch {
    pub organisation: Option<OrganisationId>,
    pub email: Option<Email>,
    pub inviter: Option<UserId>,
    pub invite_type: Option<InviteType>,
    pub active: Option<bool>,
}

impl InviteSearch {
    pub fn matches(&self, invite: &Invite) -> bool {
        self.organisation
            .as_ref()
            .is_none_or(|org| &invite.organisation == org)
            && self
                .email
                .as_ref()
                .is_none_or(|email| invite.email.as_ref() == Some(email))
            && self
                .inviter
                .as_ref()
                .is_none_or(|inviter| invite.inviter.as_ref() == Some(inviter))
            && self
                .invite_type
                .is_none_or(|invite_type| invite.invite_type == invite_type)
            && self.active.is_none_or(|active| invite.active == active)
    }
}

/// Rejects `user` when another stored user holds its display name or email.
/// The stored copy of `user` itself is skipped, so a save can recheck.
pub fn ensure_unique_user<'a>(
    stored: impl IntoIterator<Item = &'a User>,
    user: &User,
) -> Result<(), StoreError> {
    for other in stored.into_iter().filter(|other| other.id != user.id) {
        if other.display_name == user.display_name {
            return Err(StoreError::AlreadyExists("displayName"));
        }
        if other.email == user.email {
            return Err(StoreError::AlreadyExists("email"));
        }
    }
    Ok(())
}

pub fn ensure_unique_organisation<'a>(
    stored: impl IntoIterator<Item = &'a Organisation>,
    organisation: &Organisation,
) -> Result<(), StoreError> {
    let taken = stored
        .into_iter()
        .any(|other| other.id != organisation.id && other.display_name == organisation.display_name);
    if taken {
        return Err(StoreError::AlreadyExists("displayName"));
    }
    Ok(())
}

/// Users collection. `display_name` and `email` are unique.
///
/// `add_user` and `save_user` stamp the entity's timestamps and return the
/// stored copy.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn add_user(&self, user: User) -> Result<User, StoreError>;
    async fn save_user(&self, user: User) -> Result<User, StoreError>;
    async fn delete_user(&self, key: &UserKey) -> Result<(), StoreError>;
    async fn get_user(&self, id: &UserId) -> Result<User, StoreError>;
    async fn find_user_by_display_name(
        &self,
        display_name: &DisplayName,
    ) -> Result<Option<User>, StoreError>;
    async fn find_user_by_email(&self, email: &Email) -> Result<Option<User>, StoreError>;
    async fn search_users(&self, search: &UserSearch) -> Result<Vec<User>, StoreError>;
}

/// Organisations collection. `display_name` is unique.
#[async_trait]
pub trait OrganisationStore: Send + Sync {
    async fn add_organisation(&self, organisation: Organisation)
    -> Result<Organisation, StoreError>;
    async fn save_organisation(
        &self,
        organisation: Organisation,
    ) -> Result<Organisation, StoreError>;
    async fn delete_organisation(&self, key: &OrganisationKey) -> Result<(), StoreError>;
    async fn get_organisation(&self, id: &OrganisationId) -> Result<Organisation, StoreError>;
    async fn find_organisation_by_display_name(
        &self,
        display_name: &DisplayName,
    ) -> Result<Option<Organisation>, StoreError>;
    async fn search_organisations(
        &self,
        search: &OrganisationSearch,
    ) -> Result<Vec<Organisation>, StoreError>;
}

#[async_trait]
pub trait TeamStore: Send + Sync {
    async fn add_team(&self, team: Team) -> Result<Team, StoreError>;
    async fn save_team(&self, team: Team) -> Result<Team, StoreError>;
    async fn delete_team(&self, id: &TeamId) -> Result<(), StoreError>;
    async fn get_team(&self, id: &TeamId) -> Result<Team, StoreError>;
    async fn find_teams_by_organisation(
        &self,
        organisation: &OrganisationId,
    ) -> Result<Vec<Team>, StoreError>;
    async fn search_teams(&self, search: &TeamSearch) -> Result<Vec<Team>, StoreError>;
}

/// Invites collection. Implementations must call [`Invite::validate`] before
/// persisting and report a violation as [`StoreError::Policy`].
#[async_trait]
pub trait InviteStore: Send + Sync {
    async fn add_invite(&self, invite: Invite) -> Result<Invite, StoreError>;
    async fn save_invite(&self, invite: Invite) -> Result<Invite, StoreError>;
    async fn delete_invite(&self, id: &InviteId) -> Result<(), StoreError>;
    async fn get_invite(&self, id: &InviteId) -> Result<Invite, StoreError>;
    async fn find_invites_by_organisation(
        &self,
        organisation: &OrganisationId,
    ) -> Result<Vec<Invite>, StoreError>;
    async fn search_invites(&self, search: &InviteSearch) -> Result<Vec<Invite>, StoreError>;
}
