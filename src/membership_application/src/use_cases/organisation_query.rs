use membership_core::{
    DisplayName, Organisation, OrganisationId, OrganisationSearch, OrganisationStore, StoreError,
};

#[derive(Debug, thiserror::Error)]
pub enum OrganisationQueryError {
    #[error("Could not query organisations: {0}")]
    OrganisationStoreError(#[from] StoreError),
}

pub struct OrganisationQuery<O>
where
    O: OrganisationStore,
{
    organisation_store: O,
}

impl<O> OrganisationQuery<O>
where
    O: OrganisationStore,
{
    pub fn new(organisation_store: O) -> Self {
        Self { organisation_store }
    }

    #[tracing::instrument(name = "OrganisationQuery::find_organisation_by_id", skip(self))]
    pub async fn find_organisation_by_id(
        &self,
        id: &OrganisationId,
    ) -> Result<Option<Organisation>, OrganisationQueryError> {
        match self.organisation_store.get_organisation(id).await {
            Ok(organisation) => Ok(Some(organisation)),
            Err(StoreError::NotFound) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    #[tracing::instrument(name = "OrganisationQuery::find_organisation_by_display_name", skip(self))]
    pub async fn find_organisation_by_display_name(
        &self,
        display_name: &DisplayName,
    ) -> Result<Option<Organisation>, OrganisationQueryError> {
        Ok(self
            .organisation_store
            .find_organisation_by_display_name(display_name)
            .await?)
    }

    #[tracing::instrument(name = "OrganisationQuery::search_organisations", skip(self))]
    pub async fn search_organisations(
        &self,
        search: &OrganisationSearch,
    ) -> Result<Vec<Organisation>, OrganisationQueryError> {
        Ok(self.organisation_store.search_organisations(search).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MemoryStores;
    use membership_core::{Email, TeamId};

    fn organisation(name: &str) -> Organisation {
        Organisation::new(
            OrganisationId::new(),
            DisplayName::parse(name).unwrap(),
            Email::parse("billing@test.com").unwrap(),
            TeamId::new(),
            TeamId::new(),
        )
    }

    #[tokio::test]
    async fn test_repeated_lookups_return_equal_data() {
        let stores = MemoryStores::new();
        let created = stores.add_organisation(organisation("myOrg")).await.unwrap();
        let query = OrganisationQuery::new(stores);

        let first = query.find_organisation_by_id(&created.id).await.unwrap();
        let second = query.find_organisation_by_id(&created.id).await.unwrap();
        assert_eq!(first, Some(created));
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_unknown_organisation_is_none() {
        let query = OrganisationQuery::new(MemoryStores::new());
        let name = DisplayName::parse("nothing").unwrap();

        assert_eq!(query.find_organisation_by_id(&OrganisationId::new()).await.unwrap(), None);
        assert_eq!(query.find_organisation_by_display_name(&name).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_search_by_prefix() {
        let stores = MemoryStores::new();
        stores.add_organisation(organisation("acme")).await.unwrap();
        stores.add_organisation(organisation("Acme Labs")).await.unwrap();
        stores.add_organisation(organisation("globex")).await.unwrap();
        let query = OrganisationQuery::new(stores);

        let search = OrganisationSearch {
            display_name_prefix: Some("acme".to_string()),
            ..OrganisationSearch::default()
        };
        assert_eq!(query.search_organisations(&search).await.unwrap().len(), 2);
    }
}
