//! In-memory test doubles shared by the use case tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Utc;
use membership_core::{
    DisplayName, Email, Invite, InviteId, InviteSearch, InviteStore, Organisation,
    OrganisationId, OrganisationKey, OrganisationSearch, OrganisationStore, Password,
    PasswordDigest, PasswordHashError, PasswordHasher, Salt, StoreError, Team, TeamId,
    TeamSearch, TeamStore, User, UserId, UserKey, UserSearch, UserStore,
    ensure_unique_organisation, ensure_unique_user,
};
use secrecy::Secret;
use tokio::sync::RwLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    AddUser,
    SaveUser,
    DeleteUser,
    GetUser,
    FindUserByDisplayName,
    FindUserByEmail,
    SearchUsers,
    AddOrganisation,
    SaveOrganisation,
    DeleteOrganisation,
    GetOrganisation,
    FindOrganisationByDisplayName,
    SearchOrganisations,
    AddTeam,
    SaveTeam,
    DeleteTeam,
    GetTeam,
    FindTeamsByOrganisation,
    SearchTeams,
    AddInvite,
    SaveInvite,
    DeleteInvite,
    GetInvite,
    FindInvitesByOrganisation,
    SearchInvites,
}

/// One store backing all four collections, with call recording and
/// per-operation failure injection.
#[derive(Clone, Default)]
pub struct MemoryStores {
    users: Arc<RwLock<HashMap<UserId, User>>>,
    organisations: Arc<RwLock<HashMap<OrganisationId, Organisation>>>,
    teams: Arc<RwLock<HashMap<TeamId, Team>>>,
    invites: Arc<RwLock<HashMap<InviteId, Invite>>>,
    // op -> number of calls that still succeed before failing
    failures: Arc<Mutex<HashMap<Op, usize>>>,
    calls: Arc<Mutex<Vec<Op>>>,
}

impl MemoryStores {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail(&self, op: Op) {
        self.fail_after(op, 0);
    }

    pub fn fail_after(&self, op: Op, successes: usize) {
        self.failures.lock().unwrap().insert(op, successes);
    }

    pub fn calls(&self) -> Vec<Op> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, op: Op) -> usize {
        self.calls().into_iter().filter(|c| *c == op).count()
    }

    pub async fn user_count(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn organisation_count(&self) -> usize {
        self.organisations.read().await.len()
    }

    pub async fn team_count(&self) -> usize {
        self.teams.read().await.len()
    }

    pub async fn team(&self, id: &TeamId) -> Option<Team> {
        self.teams.read().await.get(id).cloned()
    }

    pub async fn user(&self, id: &UserId) -> Option<User> {
        self.users.read().await.get(id).cloned()
    }

    fn enter(&self, op: Op) -> Result<(), StoreError> {
        self.calls.lock().unwrap().push(op);
        let mut failures = self.failures.lock().unwrap();
        match failures.get_mut(&op) {
            Some(0) => Err(StoreError::UnexpectedError(format!("injected {op:?} failure"))),
            Some(remaining) => {
                *remaining -= 1;
                Ok(())
            }
            None => Ok(()),
        }
    }
}

pub fn user(name: &str, email: &str) -> User {
    User::new(
        DisplayName::parse(name).unwrap(),
        Email::parse(email).unwrap(),
    )
}

pub fn secret(value: &str) -> Secret<String> {
    Secret::from(value.to_string())
}

pub fn password(value: &str) -> Password {
    Password::try_from(secret(value)).unwrap()
}

#[async_trait::async_trait]
impl UserStore for MemoryStores {
    async fn add_user(&self, mut user: User) -> Result<User, StoreError> {
        self.enter(Op::AddUser)?;
        let mut users = self.users.write().await;
        ensure_unique_user(users.values(), &user)?;
        user.timestamps.touch(Utc::now());
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn save_user(&self, mut user: User) -> Result<User, StoreError> {
        self.enter(Op::SaveUser)?;
        let mut users = self.users.write().await;
        ensure_unique_user(users.values(), &user)?;
        let stored = users.get_mut(&user.id).ok_or(StoreError::NotFound)?;
        user.timestamps.resave(&stored.timestamps, Utc::now());
        *stored = user.clone();
        Ok(user)
    }

    async fn delete_user(&self, key: &UserKey) -> Result<(), StoreError> {
        self.enter(Op::DeleteUser)?;
        let mut users = self.users.write().await;
        let id = users
            .values()
            .find(|u| key.matches(u))
            .map(|u| u.id)
            .ok_or(StoreError::NotFound)?;
        users.remove(&id);
        Ok(())
    }

    async fn get_user(&self, id: &UserId) -> Result<User, StoreError> {
        self.enter(Op::GetUser)?;
        self.users
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn find_user_by_display_name(
        &self,
        display_name: &DisplayName,
    ) -> Result<Option<User>, StoreError> {
        self.enter(Op::FindUserByDisplayName)?;
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| &u.display_name == display_name)
            .cloned())
    }

    async fn find_user_by_email(&self, email: &Email) -> Result<Option<User>, StoreError> {
        self.enter(Op::FindUserByEmail)?;
        let users = self.users.read().await;
        Ok(users.values().find(|u| &u.email == email).cloned())
    }

    async fn search_users(&self, search: &UserSearch) -> Result<Vec<User>, StoreError> {
        self.enter(Op::SearchUsers)?;
        let users = self.users.read().await;
        Ok(users.values().filter(|u| search.matches(u)).cloned().collect())
    }
}

#[async_trait::async_trait]
impl OrganisationStore for MemoryStores {
    async fn add_organisation(
        &self,
        mut organisation: Organisation,
    ) -> Result<Organisation, StoreError> {
        self.enter(Op::AddOrganisation)?;
        let mut organisations = self.organisations.write().await;
        ensure_unique_organisation(organisations.values(), &organisation)?;
        organisation.timestamps.touch(Utc::now());
        organisations.insert(organisation.id, organisation.clone());
        Ok(organisation)
    }

    async fn save_organisation(
        &self,
        mut organisation: Organisation,
    ) -> Result<Organisation, StoreError> {
        self.enter(Op::SaveOrganisation)?;
        let mut organisations = self.organisations.write().await;
        ensure_unique_organisation(organisations.values(), &organisation)?;
        let stored = organisations
            .get_mut(&organisation.id)
            .ok_or(StoreError::NotFound)?;
        organisation.timestamps.resave(&stored.timestamps, Utc::now());
        *stored = organisation.clone();
        Ok(organisation)
    }

    async fn delete_organisation(&self, key: &OrganisationKey) -> Result<(), StoreError> {
        self.enter(Op::DeleteOrganisation)?;
        let mut organisations = self.organisations.write().await;
        let id = organisations
            .values()
            .find(|o| key.matches(o))
            .map(|o| o.id)
            .ok_or(StoreError::NotFound)?;
        organisations.remove(&id);
        Ok(())
    }

    async fn get_organisation(&self, id: &OrganisationId) -> Result<Organisation, StoreError> {
        self.enter(Op::GetOrganisation)?;
        self.organisations
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn find_organisation_by_display_name(
        &self,
        display_name: &DisplayName,
    ) -> Result<Option<Organisation>, StoreError> {
        self.enter(Op::FindOrganisationByDisplayName)?;
        let organisations = self.organisations.read().await;
        Ok(organisations
            .values()
            .find(|o| &o.display_name == display_name)
            .cloned())
    }

    async fn search_organisations(
        &self,
        search: &OrganisationSearch,
    ) -> Result<Vec<Organisation>, StoreError> {
        self.enter(Op::SearchOrganisations)?;
        let organisations = self.organisations.read().await;
        Ok(organisations
            .values()
            .filter(|o| search.matches(o))
            .cloned()
            .collect())
    }
}

#[async_trait::async_trait]
impl TeamStore for MemoryStores {
    async fn add_team(&self, mut team: Team) -> Result<Team, StoreError> {
        self.enter(Op::AddTeam)?;
        team.timestamps.touch(Utc::now());
        self.teams.write().await.insert(team.id, team.clone());
        Ok(team)
    }

    async fn save_team(&self, mut team: Team) -> Result<Team, StoreError> {
        self.enter(Op::SaveTeam)?;
        let mut teams = self.teams.write().await;
        let stored = teams.get_mut(&team.id).ok_or(StoreError::NotFound)?;
        team.timestamps.resave(&stored.timestamps, Utc::now());
        *stored = team.clone();
        Ok(team)
    }

    async fn delete_team(&self, id: &TeamId) -> Result<(), StoreError> {
        self.enter(Op::DeleteTeam)?;
        self.teams
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }

    async fn get_team(&self, id: &TeamId) -> Result<Team, StoreError> {
        self.enter(Op::GetTeam)?;
        self.teams
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn find_teams_by_organisation(
        &self,
        organisation: &OrganisationId,
    ) -> Result<Vec<Team>, StoreError> {
        self.enter(Op::FindTeamsByOrganisation)?;
        let teams = self.teams.read().await;
        Ok(teams
            .values()
            .filter(|t| t.organisation.as_ref() == Some(organisation))
            .cloned()
            .collect())
    }

    async fn search_teams(&self, search: &TeamSearch) -> Result<Vec<Team>, StoreError> {
        self.enter(Op::SearchTeams)?;
        let teams = self.teams.read().await;
        Ok(teams.values().filter(|t| search.matches(t)).cloned().collect())
    }
}

#[async_trait::async_trait]
impl InviteStore for MemoryStores {
    async fn add_invite(&self, mut invite: Invite) -> Result<Invite, StoreError> {
        self.enter(Op::AddInvite)?;
        invite.validate()?;
        invite.timestamps.touch(Utc::now());
        self.invites.write().await.insert(invite.id, invite.clone());
        Ok(invite)
    }

    async fn save_invite(&self, mut invite: Invite) -> Result<Invite, StoreError> {
        self.enter(Op::SaveInvite)?;
        invite.validate()?;
        let mut invites = self.invites.write().await;
        let stored = invites.get_mut(&invite.id).ok_or(StoreError::NotFound)?;
        invite.timestamps.resave(&stored.timestamps, Utc::now());
        *stored = invite.clone();
        Ok(invite)
    }

    async fn delete_invite(&self, id: &InviteId) -> Result<(), StoreError> {
        self.enter(Op::DeleteInvite)?;
        self.invites
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }

    async fn get_invite(&self, id: &InviteId) -> Result<Invite, StoreError> {
        self.enter(Op::GetInvite)?;
        self.invites
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn find_invites_by_organisation(
        &self,
        organisation: &OrganisationId,
    ) -> Result<Vec<Invite>, StoreError> {
        self.enter(Op::FindInvitesByOrganisation)?;
        let invites = self.invites.read().await;
        Ok(invites
            .values()
            .filter(|i| &i.organisation == organisation)
            .cloned()
            .collect())
    }

    async fn search_invites(&self, search: &InviteSearch) -> Result<Vec<Invite>, StoreError> {
        self.enter(Op::SearchInvites)?;
        let invites = self.invites.read().await;
        Ok(invites
            .values()
            .filter(|i| search.matches(i))
            .cloned()
            .collect())
    }
}

/// Deterministic hasher: numbered salts, digest is the reversed password
/// behind the salt.
#[derive(Clone, Default)]
pub struct MockHasher {
    salts: Arc<AtomicUsize>,
    fail: bool,
}

impl MockHasher {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }
}

#[async_trait::async_trait]
impl PasswordHasher for MockHasher {
    fn generate_salt(&self) -> Result<Salt, PasswordHashError> {
        let n = self.salts.fetch_add(1, Ordering::SeqCst);
        Ok(Salt::new(format!("salt-{n}")))
    }

    async fn hash(
        &self,
        password: &Password,
        salt: &Salt,
    ) -> Result<PasswordDigest, PasswordHashError> {
        if self.fail {
            return Err(PasswordHashError::Hash("injected failure".to_string()));
        }
        let reversed: String = password.expose().chars().rev().collect();
        Ok(PasswordDigest::new(format!("{}${reversed}", salt.as_str())))
    }
}
