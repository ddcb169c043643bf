use chrono::{DateTime, Utc};
use sqlx::{PgPool, Pool, Postgres};
use uuid::Uuid;

use membership_core::{
    OrganisationId, PermissionLevel, StoreError, Team, TeamId, TeamSearch, TeamStore, Timestamps,
    UserId,
};

use super::postgres_errors::{unexpected, write_error};

const SELECT_TEAM: &str = r#"
    SELECT id, name, description, photo, organisation, members, permission_level, deleted,
           created, last_modified
    FROM teams
"#;

#[derive(sqlx::FromRow)]
struct TeamRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    photo: Option<String>,
    organisation: Option<Uuid>,
    members: Vec<Uuid>,
    permission_level: String,
    deleted: bool,
    created: DateTime<Utc>,
    last_modified: DateTime<Utc>,
}

impl TryFrom<TeamRow> for Team {
    type Error = StoreError;

    fn try_from(row: TeamRow) -> Result<Self, Self::Error> {
        Ok(Team {
            id: TeamId::from(row.id),
            name: row.name,
            description: row.description,
            photo: row.photo,
            organisation: row.organisation.map(OrganisationId::from),
            members: row.members.into_iter().map(UserId::from).collect(),
            permission_level: row
                .permission_level
                .parse::<PermissionLevel>()
                .map_err(unexpected)?,
            deleted: row.deleted,
            timestamps: Timestamps::at(row.created, row.last_modified),
        })
    }
}

fn member_ids(team: &Team) -> Vec<Uuid> {
    team.members.iter().copied().map(Uuid::from).collect()
}

#[derive(Clone)]
pub struct PostgresTeamStore {
    pool: PgPool,
}

impl PostgresTeamStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        PostgresTeamStore { pool }
    }
}

#[async_trait::async_trait]
impl TeamStore for PostgresTeamStore {
    #[tracing::instrument(name = "Adding team to PostgreSQL", skip_all)]
    async fn add_team(&self, mut team: Team) -> Result<Team, StoreError> {
        team.timestamps = Timestamps::default();
        team.timestamps.touch(Utc::now());

        sqlx::query(
            r#"
                INSERT INTO teams (id, name, description, photo, organisation, members,
                    permission_level, deleted, created, last_modified)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(*team.id.as_uuid())
        .bind(&team.name)
        .bind(team.description.as_deref())
        .bind(team.photo.as_deref())
        .bind(team.organisation.map(Uuid::from))
        .bind(member_ids(&team))
        .bind(team.permission_level.as_str())
        .bind(team.deleted)
        .bind(team.timestamps.created)
        .bind(team.timestamps.last_modified)
        .execute(&self.pool)
        .await
        .map_err(write_error)?;

        Ok(team)
    }

    #[tracing::instrument(name = "Saving team to PostgreSQL", skip_all)]
    async fn save_team(&self, mut team: Team) -> Result<Team, StoreError> {
        let now = Utc::now();

        let created: Option<DateTime<Utc>> = sqlx::query_scalar(
            r#"
                UPDATE teams
                SET name = $2, description = $3, photo = $4, organisation = $5, members = $6,
                    permission_level = $7, deleted = $8, last_modified = $9
                WHERE id = $1
                RETURNING created
            "#,
        )
        .bind(*team.id.as_uuid())
        .bind(&team.name)
        .bind(team.description.as_deref())
        .bind(team.photo.as_deref())
        .bind(team.organisation.map(Uuid::from))
        .bind(member_ids(&team))
        .bind(team.permission_level.as_str())
        .bind(team.deleted)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(write_error)?;

        let created = created.ok_or(StoreError::NotFound)?;
        team.timestamps = Timestamps::at(created, now);
        Ok(team)
    }

    #[tracing::instrument(name = "Deleting team from PostgreSQL", skip_all)]
    async fn delete_team(&self, id: &TeamId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM teams WHERE id = $1")
            .bind(*id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    #[tracing::instrument(name = "Retrieving team from PostgreSQL", skip_all)]
    async fn get_team(&self, id: &TeamId) -> Result<Team, StoreError> {
        let sql = format!("{SELECT_TEAM} WHERE id = $1");
        let row: Option<TeamRow> = sqlx::query_as(&sql)
            .bind(*id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(unexpected)?;

        row.ok_or(StoreError::NotFound)?.try_into()
    }

    async fn find_teams_by_organisation(
        &self,
        organisation: &OrganisationId,
    ) -> Result<Vec<Team>, StoreError> {
        let search = TeamSearch {
            organisation: Some(*organisation),
            ..TeamSearch::default()
        };
        self.search_teams(&search).await
    }

    #[tracing::instrument(name = "Searching teams in PostgreSQL", skip_all)]
    async fn search_teams(&self, search: &TeamSearch) -> Result<Vec<Team>, StoreError> {
        let sql = format!(
            r#"{SELECT_TEAM}
                WHERE ($1 OR NOT deleted)
                  AND ($2::TEXT IS NULL OR name = $2)
                  AND ($3::UUID IS NULL OR organisation = $3)
                  AND ($4::UUID IS NULL OR $4 = ANY(members))
                ORDER BY name
            "#
        );
        let rows: Vec<TeamRow> = sqlx::query_as(&sql)
            .bind(search.include_deleted)
            .bind(search.name.as_deref())
            .bind(search.organisation.map(Uuid::from))
            .bind(search.member.map(Uuid::from))
            .fetch_all(&self.pool)
            .await
            .map_err(unexpected)?;

        rows.into_iter().map(Team::try_from).collect()
    }
}
