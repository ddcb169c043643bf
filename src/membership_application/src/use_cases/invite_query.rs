use membership_core::{Invite, InviteId, InviteSearch, InviteStore, OrganisationId, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum InviteQueryError {
    #[error("Could not query invites: {0}")]
    InviteStoreError(#[from] StoreError),
}

pub struct InviteQuery<I>
where
    I: InviteStore,
{
    invite_store: I,
}

impl<I> InviteQuery<I>
where
    I: InviteStore,
{
    pub fn new(invite_store: I) -> Self {
        Self { invite_store }
    }

    #[tracing::instrument(name = "InviteQuery::find_invite_by_id", skip(self))]
    pub async fn find_invite_by_id(&self, id: &InviteId) -> Result<Option<Invite>, InviteQueryError> {
        match self.invite_store.get_invite(id).await {
            Ok(invite) => Ok(Some(invite)),
            Err(StoreError::NotFound) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    #[tracing::instrument(name = "InviteQuery::find_invites_by_organisation", skip(self))]
    pub async fn find_invites_by_organisation(
        &self,
        organisation: &OrganisationId,
    ) -> Result<Vec<Invite>, InviteQueryError> {
        Ok(self
            .invite_store
            .find_invites_by_organisation(organisation)
            .await?)
    }

    #[tracing::instrument(name = "InviteQuery::search_invites", skip(self))]
    pub async fn search_invites(&self, search: &InviteSearch) -> Result<Vec<Invite>, InviteQueryError> {
        Ok(self.invite_store.search_invites(search).await?)
    }
}
