use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use membership_core::{Invite, InviteId, InviteSearch, InviteStore, OrganisationId, StoreError};

#[derive(Default, Clone)]
pub struct HashMapInviteStore {
    invites: Arc<RwLock<HashMap<InviteId, Invite>>>,
}

impl HashMapInviteStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl InviteStore for HashMapInviteStore {
    async fn add_invite(&self, mut invite: Invite) -> Result<Invite, StoreError> {
        invite.validate()?;
        let mut invites = self.invites.write().await;
        if invites.contains_key(&invite.id) {
            return Err(StoreError::AlreadyExists("id"));
        }
        invite.timestamps.touch(Utc::now());
        invites.insert(invite.id, invite.clone());
        Ok(invite)
    }

    async fn save_invite(&self, mut invite: Invite) -> Result<Invite, StoreError> {
        invite.validate()?;
        let mut invites = self.invites.write().await;
        let stored = invites.get_mut(&invite.id).ok_or(StoreError::NotFound)?;
        invite.timestamps.resave(&stored.timestamps, Utc::now());
        *stored = invite.clone();
        Ok(invite)
    }

    async fn delete_invite(&self, id: &InviteId) -> Result<(), StoreError> {
        let mut invites = self.invites.write().await;
        invites.remove(id).ok_or(StoreError::NotFound)?;
        Ok(())
    }

    async fn get_invite(&self, id: &InviteId) -> Result<Invite, StoreError> {
        let invites = self.invites.read().await;
        invites.get(id).cloned().ok_or(StoreError::NotFound)
    }

    async fn find_invites_by_organisation(
        &self,
        organisation: &OrganisationId,
    ) -> Result<Vec<Invite>, StoreError> {
        let search = InviteSearch {
            organisation: Some(*organisation),
            ..InviteSearch::default()
        };
        self.search_invites(&search).await
    }

    async fn search_invites(&self, search: &InviteSearch) -> Result<Vec<Invite>, StoreError> {
        let invites = self.invites.read().await;
        let mut found: Vec<Invite> = invites
            .values()
            .filter(|invite| search.matches(invite))
            .cloned()
            .collect();
        found.sort_by_key(|invite| invite.timestamps.created);
        Ok(found)
    }
}
