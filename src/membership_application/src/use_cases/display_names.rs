use membership_core::{DisplayName, OrganisationStore, StoreError, UserStore};

/// Uniqueness check over the display namespace users and organisations share.
#[derive(Clone)]
pub struct DisplayNameRegistry<U, O>
where
    U: UserStore,
    O: OrganisationStore,
{
    user_store: U,
    organisation_store: O,
}

impl<U, O> DisplayNameRegistry<U, O>
where
    U: UserStore,
    O: OrganisationStore,
{
    pub fn new(user_store: U, organisation_store: O) -> Self {
        Self {
            user_store,
            organisation_store,
        }
    }

    /// True when a user or an organisation already uses `display_name`.
    /// Users are checked first; organisations are only queried on a miss.
    #[tracing::instrument(name = "DisplayNameRegistry::exists", skip(self))]
    pub async fn exists(&self, display_name: &DisplayName) -> Result<bool, StoreError> {
        if self
            .user_store
            .find_user_by_display_name(display_name)
            .await?
            .is_some()
        {
            return Ok(true);
        }

        Ok(self
            .organisation_store
            .find_organisation_by_display_name(display_name)
            .await?
            .is_some())
    }

    /// Fails with `AlreadyExists("displayName")` when the name is taken.
    pub async fn ensure_available(&self, display_name: &DisplayName) -> Result<(), StoreError> {
        if self.exists(display_name).await? {
            tracing::info!(%display_name, "display name already taken");
            return Err(StoreError::AlreadyExists("displayName"));
        }
        Ok(())
    }

    /// Like [`exists`](Self::exists) for unvalidated input. A blank name is
    /// never taken.
    pub async fn exists_raw(&self, display_name: &str) -> Result<bool, StoreError> {
        match DisplayName::parse(display_name) {
            Ok(name) => self.exists(&name).await,
            Err(_) => Ok(false),
        }
    }
}
