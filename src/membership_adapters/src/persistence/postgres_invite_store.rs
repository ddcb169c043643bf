use chrono::{DateTime, Utc};
use sqlx::{PgPool, Pool, Postgres};
use uuid::Uuid;

use membership_core::{
    Email, Invite, InviteId, InviteSearch, InviteStore, InviteType, OrganisationId, StoreError,
    Timestamps, UserId,
};

use super::postgres_errors::{count_from_db, count_to_db, unexpected, write_error};

const SELECT_INVITE: &str = r#"
    SELECT id, organisation, inviter, email, message, status, expires, active, times_used,
           max_times_used, invite_type, created, last_modified
    FROM invites
"#;

#[derive(sqlx::FromRow)]
struct InviteRow {
    id: Uuid,
    organisation: Uuid,
    inviter: Option<Uuid>,
    email: Option<String>,
    message: Option<String>,
    status: Option<String>,
    expires: Option<DateTime<Utc>>,
    active: bool,
    times_used: i64,
    max_times_used: i64,
    invite_type: String,
    created: DateTime<Utc>,
    last_modified: DateTime<Utc>,
}

impl TryFrom<InviteRow> for Invite {
    type Error = StoreError;

    fn try_from(row: InviteRow) -> Result<Self, Self::Error> {
        Ok(Invite {
            id: InviteId::from(row.id),
            organisation: OrganisationId::from(row.organisation),
            inviter: row.inviter.map(UserId::from),
            email: row.email.map(Email::parse).transpose().map_err(unexpected)?,
            message: row.message,
            status: row.status,
            expires: row.expires,
            active: row.active,
            times_used: count_from_db(row.times_used)?,
            max_times_used: count_from_db(row.max_times_used)?,
            invite_type: row.invite_type.parse::<InviteType>().map_err(unexpected)?,
            timestamps: Timestamps::at(row.created, row.last_modified),
        })
    }
}

#[derive(Clone)]
pub struct PostgresInviteStore {
    pool: PgPool,
}

impl PostgresInviteStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        PostgresInviteStore { pool }
    }
}

#[async_trait::async_trait]
impl InviteStore for PostgresInviteStore {
    #[tracing::instrument(name = "Adding invite to PostgreSQL", skip_all)]
    async fn add_invite(&self, mut invite: Invite) -> Result<Invite, StoreError> {
        invite.validate()?;
        invite.timestamps = Timestamps::default();
        invite.timestamps.touch(Utc::now());

        sqlx::query(
            r#"
                INSERT INTO invites (id, organisation, inviter, email, message, status, expires,
                    active, times_used, max_times_used, invite_type, created, last_modified)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(*invite.id.as_uuid())
        .bind(*invite.organisation.as_uuid())
        .bind(invite.inviter.map(Uuid::from))
        .bind(invite.email.as_ref().map(Email::as_str))
        .bind(invite.message.as_deref())
        .bind(invite.status.as_deref())
        .bind(invite.expires)
        .bind(invite.active)
        .bind(count_to_db(invite.times_used))
        .bind(count_to_db(invite.max_times_used))
        .bind(invite.invite_type.as_str())
        .bind(invite.timestamps.created)
        .bind(invite.timestamps.last_modified)
        .execute(&self.pool)
        .await
        .map_err(write_error)?;

        Ok(invite)
    }

    #[tracing::instrument(name = "Saving invite to PostgreSQL", skip_all)]
    async fn save_invite(&self, mut invite: Invite) -> Result<Invite, StoreError> {
        invite.validate()?;
        let now = Utc::now();

        let created: Option<DateTime<Utc>> = sqlx::query_scalar(
            r#"
                UPDATE invites
                SET organisation = $2, inviter = $3, email = $4, message = $5, status = $6,
                    expires = $7, active = $8, times_used = $9, max_times_used = $10,
                    invite_type = $11, last_modified = $12
                WHERE id = $1
                RETURNING created
            "#,
        )
        .bind(*invite.id.as_uuid())
        .bind(*invite.organisation.as_uuid())
        .bind(invite.inviter.map(Uuid::from))
        .bind(invite.email.as_ref().map(Email::as_str))
        .bind(invite.message.as_deref())
        .bind(invite.status.as_deref())
        .bind(invite.expires)
        .bind(invite.active)
        .bind(count_to_db(invite.times_used))
        .bind(count_to_db(invite.max_times_used))
        .bind(invite.invite_type.as_str())
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(write_error)?;

        let created = created.ok_or(StoreError::NotFound)?;
        invite.timestamps = Timestamps::at(created, now);
        Ok(invite)
    }

    #[tracing::instrument(name = "Deleting invite from PostgreSQL", skip_all)]
    async fn delete_invite(&self, id: &InviteId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM invites WHERE id = $1")
            .bind(*id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    #[tracing::instrument(name = "Retrieving invite from PostgreSQL", skip_all)]
    async fn get_invite(&self, id: &InviteId) -> Result<Invite, StoreError> {
        let sql = format!("{SELECT_INVITE} WHERE id = $1");
        let row: Option<InviteRow> = sqlx::query_as(&sql)
            .bind(*id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(unexpected)?;

        row.ok_or(StoreError::NotFound)?.try_into()
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

    #[tracing::instrument(name = "Searching invites in PostgreSQL", skip_all)]
    async fn search_invites(&self, search: &InviteSearch) -> Result<Vec<Invite>, StoreError> {
        let sql = format!(
            r#"{SELECT_INVITE}
                WHERE ($1::UUID IS NULL OR organisation = $1)
                  AND ($2::TEXT IS NULL OR email = $2)
                  AND ($3::UUID IS NULL OR inviter = $3)
                  AND ($4::TEXT IS NULL OR invite_type = $4)
                  AND ($5::BOOLEAN IS NULL OR active = $5)
                ORDER BY created
            "#
        );
        let rows: Vec<InviteRow> = sqlx::query_as(&sql)
            .bind(search.organisation.map(Uuid::from))
            .bind(search.email.as_ref().map(Email::as_str))
            .bind(search.inviter.map(Uuid::from))
            .bind(search.invite_type.map(|t| t.as_str()))
            .bind(search.active)
            .fetch_all(&self.pool)
            .await
            .map_err(unexpected)?;

        rows.into_iter().map(Invite::try_from).collect()
    }
}
