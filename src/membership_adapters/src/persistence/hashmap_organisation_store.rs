use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use membership_core::{
    DisplayName, Organisation, OrganisationId, OrganisationKey, OrganisationSearch,
    OrganisationStore, StoreError, ensure_unique_organisation,
};

#[derive(Default, Clone)]
pub struct HashMapOrganisationStore {
    organisations: Arc<RwLock<HashMap<OrganisationId, Organisation>>>,
}

impl HashMapOrganisationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl OrganisationStore for HashMapOrganisationStore {
    async fn add_organisation(
        &self,
        mut organisation: Organisation,
    ) -> Result<Organisation, StoreError> {
        let mut organisations = self.organisations.write().await;
        if organisations.contains_key(&organisation.id) {
            return Err(StoreError::AlreadyExists("id"));
        }
        ensure_unique_organisation(organisations.values(), &organisation)?;

        organisation.timestamps.touch(Utc::now());
        organisations.insert(organisation.id, organisation.clone());
        Ok(organisation)
    }

    async fn save_organisation(
        &self,
        mut organisation: Organisation,
    ) -> Result<Organisation, StoreError> {
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
        let mut organisations = self.organisations.write().await;
        let id = organisations
            .values()
            .find(|organisation| key.matches(organisation))
            .map(|organisation| organisation.id)
            .ok_or(StoreError::NotFound)?;
        organisations.remove(&id);
        Ok(())
    }

    async fn get_organisation(&self, id: &OrganisationId) -> Result<Organisation, StoreError> {
        let organisations = self.organisations.read().await;
        organisations.get(id).cloned().ok_or(StoreError::NotFound)
    }

    async fn find_organisation_by_display_name(
        &self,
        display_name: &DisplayName,
    ) -> Result<Option<Organisation>, StoreError> {
        let organisations = self.organisations.read().await;
        Ok(organisations
            .values()
            .find(|organisation| &organisation.display_name == display_name)
            .cloned())
    }

    async fn search_organisations(
        &self,
        search: &OrganisationSearch,
    ) -> Result<Vec<Organisation>, StoreError> {
        let organisations = self.organisations.read().await;
        let mut found: Vec<Organisation> = organisations
            .values()
            .filter(|organisation| search.matches(organisation))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.display_name.cmp(&b.display_name));
        Ok(found)
    }
}
