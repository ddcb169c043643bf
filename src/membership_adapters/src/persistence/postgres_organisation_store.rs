use chrono::{DateTime, Utc};
use sqlx::{PgPool, Pool, Postgres};
use uuid::Uuid;

use membership_core::{
    DisplayName, Email, Organisation, OrganisationId, OrganisationKey, OrganisationSearch,
    OrganisationStore, StoreError, TeamId, Timestamps,
};

use super::postgres_errors::{unexpected, write_error};

const SELECT_ORGANISATION: &str = r#"
    SELECT id, display_name, title, domain, billing_email, email, photo, owners, members,
           teams, deleted, created, last_modified
    FROM organisations
"#;

#[derive(sqlx::FromRow)]
struct OrganisationRow {
    id: Uuid,
    display_name: String,
    title: Option<String>,
    domain: Option<String>,
    billing_email: String,
    email: Option<String>,
    photo: Option<String>,
    owners: Uuid,
    members: Uuid,
    teams: Vec<Uuid>,
    deleted: bool,
    created: DateTime<Utc>,
    last_modified: DateTime<Utc>,
}

impl TryFrom<OrganisationRow> for Organisation {
    type Error = StoreError;

    fn try_from(row: OrganisationRow) -> Result<Self, Self::Error> {
        Ok(Organisation {
            id: OrganisationId::from(row.id),
            display_name: DisplayName::parse(row.display_name).map_err(unexpected)?,
            title: row.title,
            domain: row.domain,
            billing_email: Email::parse(row.billing_email).map_err(unexpected)?,
            email: row.email.map(Email::parse).transpose().map_err(unexpected)?,
            photo: row.photo,
            owners: TeamId::from(row.owners),
            members: TeamId::from(row.members),
            teams: row.teams.into_iter().map(TeamId::from).collect(),
            deleted: row.deleted,
            timestamps: Timestamps::at(row.created, row.last_modified),
        })
    }
}

#[derive(Clone)]
pub struct PostgresOrganisationStore {
    pool: PgPool,
}

impl PostgresOrganisationStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        PostgresOrganisationStore { pool }
    }
}

#[async_trait::async_trait]
impl OrganisationStore for PostgresOrganisationStore {
    #[tracing::instrument(name = "Adding organisation to PostgreSQL", skip_all)]
    async fn add_organisation(
        &self,
        mut organisation: Organisation,
    ) -> Result<Organisation, StoreError> {
        organisation.timestamps = Timestamps::default();
        organisation.timestamps.touch(Utc::now());
        let teams: Vec<Uuid> = organisation.teams.iter().copied().map(Uuid::from).collect();

        sqlx::query(
            r#"
                INSERT INTO organisations (id, display_name, title, domain, billing_email, email,
                    photo, owners, members, teams, deleted, created, last_modified)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(*organisation.id.as_uuid())
        .bind(organisation.display_name.as_str())
        .bind(organisation.title.as_deref())
        .bind(organisation.domain.as_deref())
        .bind(organisation.billing_email.as_str())
        .bind(organisation.email.as_ref().map(Email::as_str))
        .bind(organisation.photo.as_deref())
        .bind(*organisation.owners.as_uuid())
        .bind(*organisation.members.as_uuid())
        .bind(teams)
        .bind(organisation.deleted)
        .bind(organisation.timestamps.created)
        .bind(organisation.timestamps.last_modified)
        .execute(&self.pool)
        .await
        .map_err(write_error)?;

        Ok(organisation)
    }

    #[tracing::instrument(name = "Saving organisation to PostgreSQL", skip_all)]
    async fn save_organisation(
        &self,
        mut organisation: Organisation,
    ) -> Result<Organisation, StoreError> {
        let now = Utc::now();
        let teams: Vec<Uuid> = organisation.teams.iter().copied().map(Uuid::from).collect();

        let created: Option<DateTime<Utc>> = sqlx::query_scalar(
            r#"
                UPDATE organisations
                SET display_name = $2, title = $3, domain = $4, billing_email = $5, email = $6,
                    photo = $7, owners = $8, members = $9, teams = $10, deleted = $11,
                    last_modified = $12
                WHERE id = $1
                RETURNING created
            "#,
        )
        .bind(*organisation.id.as_uuid())
        .bind(organisation.display_name.as_str())
        .bind(organisation.title.as_deref())
        .bind(organisation.domain.as_deref())
        .bind(organisation.billing_email.as_str())
        .bind(organisation.email.as_ref().map(Email::as_str))
        .bind(organisation.photo.as_deref())
        .bind(*organisation.owners.as_uuid())
        .bind(*organisation.members.as_uuid())
        .bind(teams)
        .bind(organisation.deleted)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(write_error)?;

        let created = created.ok_or(StoreError::NotFound)?;
        organisation.timestamps = Timestamps::at(created, now);
        Ok(organisation)
    }

    #[tracing::instrument(name = "Deleting organisation from PostgreSQL", skip_all)]
    async fn delete_organisation(&self, key: &OrganisationKey) -> Result<(), StoreError> {
        let query = match key {
            OrganisationKey::Id(id) => {
                sqlx::query("DELETE FROM organisations WHERE id = $1").bind(*id.as_uuid())
            }
            OrganisationKey::DisplayName(name) => {
                sqlx::query("DELETE FROM organisations WHERE display_name = $1")
                    .bind(name.as_str())
            }
        };

        let result = query.execute(&self.pool).await.map_err(unexpected)?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    #[tracing::instrument(name = "Retrieving organisation from PostgreSQL", skip_all)]
    async fn get_organisation(&self, id: &OrganisationId) -> Result<Organisation, StoreError> {
        let sql = format!("{SELECT_ORGANISATION} WHERE id = $1");
        let row: Option<OrganisationRow> = sqlx::query_as(&sql)
            .bind(*id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(unexpected)?;

        row.ok_or(StoreError::NotFound)?.try_into()
    }

    #[tracing::instrument(name = "Finding organisation by display name in PostgreSQL", skip_all)]
    async fn find_organisation_by_display_name(
        &self,
        display_name: &DisplayName,
    ) -> Result<Option<Organisation>, StoreError> {
        let sql = format!("{SELECT_ORGANISATION} WHERE display_name = $1");
        let row: Option<OrganisationRow> = sqlx::query_as(&sql)
            .bind(display_name.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(unexpected)?;

        row.map(Organisation::try_from).transpose()
    }

    #[tracing::instrument(name = "Searching organisations in PostgreSQL", skip_all)]
    async fn search_organisations(
        &self,
        search: &OrganisationSearch,
    ) -> Result<Vec<Organisation>, StoreError> {
        let sql = format!(
            r#"{SELECT_ORGANISATION}
                WHERE ($1::TEXT IS NULL OR starts_with(lower(display_name), lower($1)))
                  AND ($2::TEXT IS NULL OR billing_email = $2)
                ORDER BY display_name
            "#
        );
        let rows: Vec<OrganisationRow> = sqlx::query_as(&sql)
            .bind(search.display_name_prefix.as_deref())
            .bind(search.billing_email.as_ref().map(Email::as_str))
            .fetch_all(&self.pool)
            .await
            .map_err(unexpected)?;

        rows.into_iter().map(Organisation::try_from).collect()
    }
}
