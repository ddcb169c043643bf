use chrono::{DateTime, Utc};
use sqlx::{PgPool, Pool, Postgres};
use uuid::Uuid;

use membership_core::{
    Credentials, DisplayName, Email, PasswordDigest, Salt, StoreError, Timestamps, User, UserId,
    UserKey, UserSearch, UserStatus, UserStore,
};

use super::postgres_errors::{count_from_db, count_to_db, unexpected, write_error};

const SELECT_USER: &str = r#"
    SELECT id, display_name, email, screen_name, photo, admin, salt, password_hash,
           sign_in_count, last_login, teams, organisations, status, deleted,
           created, last_modified
    FROM users
"#;

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    display_name: String,
    email: String,
    screen_name: Option<String>,
    photo: Option<String>,
    admin: bool,
    salt: Option<String>,
    password_hash: Option<String>,
    sign_in_count: i64,
    last_login: Option<DateTime<Utc>>,
    teams: Vec<Uuid>,
    organisations: Vec<Uuid>,
    status: String,
    deleted: bool,
    created: DateTime<Utc>,
    last_modified: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = StoreError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let credentials = match (row.salt, row.password_hash) {
            (Some(salt), Some(hash)) => Some(Credentials {
                salt: Salt::new(salt),
                digest: PasswordDigest::new(hash),
            }),
            _ => None,
        };

        Ok(User {
            id: UserId::from(row.id),
            display_name: DisplayName::parse(row.display_name).map_err(unexpected)?,
            email: Email::parse(row.email).map_err(unexpected)?,
            screen_name: row.screen_name,
            photo: row.photo,
            admin: row.admin,
            credentials,
            sign_in_count: count_from_db(row.sign_in_count)?,
            last_login: row.last_login,
            teams: row.teams.into_iter().map(Into::into).collect(),
            organisations: row.organisations.into_iter().map(Into::into).collect(),
            status: UserStatus::parse(&row.status),
            deleted: row.deleted,
            timestamps: Timestamps::at(row.created, row.last_modified),
        })
    }
}

fn uuids<T: Copy + Into<Uuid>>(ids: &[T]) -> Vec<Uuid> {
    ids.iter().copied().map(Into::into).collect()
}

#[derive(Clone)]
pub struct PostgresUserStore {
    pool: PgPool,
}

impl PostgresUserStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        PostgresUserStore { pool }
    }

    async fn fetch_one_where(
        &self,
        clause: &str,
        bind: impl for<'q> sqlx::Encode<'q, Postgres> + sqlx::Type<Postgres> + Send + 'static,
    ) -> Result<Option<User>, StoreError> {
        let sql = format!("{SELECT_USER} WHERE {clause}");
        let row: Option<UserRow> = sqlx::query_as(&sql)
            .bind(bind)
            .fetch_optional(&self.pool)
            .await
            .map_err(unexpected)?;
        row.map(User::try_from).transpose()
    }
}

#[async_trait::async_trait]
impl UserStore for PostgresUserStore {
    #[tracing::instrument(name = "Adding user to PostgreSQL", skip_all)]
    async fn add_user(&self, mut user: User) -> Result<User, StoreError> {
        user.timestamps = Timestamps::default();
        user.timestamps.touch(Utc::now());

        sqlx::query(
            r#"
                INSERT INTO users (id, display_name, email, screen_name, photo, admin, salt,
                    password_hash, sign_in_count, last_login, teams, organisations, status,
                    deleted, created, last_modified)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            "#,
        )
        .bind(*user.id.as_uuid())
        .bind(user.display_name.as_str())
        .bind(user.email.as_str())
        .bind(user.screen_name.as_deref())
        .bind(user.photo.as_deref())
        .bind(user.admin)
        .bind(user.credentials.as_ref().map(|c| c.salt.as_str()))
        .bind(user.credentials.as_ref().map(|c| c.digest.expose()))
        .bind(count_to_db(user.sign_in_count))
        .bind(user.last_login)
        .bind(uuids(&user.teams))
        .bind(uuids(&user.organisations))
        .bind(user.status.as_str())
        .bind(user.deleted)
        .bind(user.timestamps.created)
        .bind(user.timestamps.last_modified)
        .execute(&self.pool)
        .await
        .map_err(write_error)?;

        Ok(user)
    }

    #[tracing::instrument(name = "Saving user to PostgreSQL", skip_all)]
    async fn save_user(&self, mut user: User) -> Result<User, StoreError> {
        let now = Utc::now();

        let created: Option<DateTime<Utc>> = sqlx::query_scalar(
            r#"
                UPDATE users
                SET display_name = $2, email = $3, screen_name = $4, photo = $5, admin = $6,
                    salt = $7, password_hash = $8, sign_in_count = $9, last_login = $10,
                    teams = $11, organisations = $12, status = $13, deleted = $14,
                    last_modified = $15
                WHERE id = $1
                RETURNING created
            "#,
        )
        .bind(*user.id.as_uuid())
        .bind(user.display_name.as_str())
        .bind(user.email.as_str())
        .bind(user.screen_name.as_deref())
        .bind(user.photo.as_deref())
        .bind(user.admin)
        .bind(user.credentials.as_ref().map(|c| c.salt.as_str()))
        .bind(user.credentials.as_ref().map(|c| c.digest.expose()))
        .bind(count_to_db(user.sign_in_count))
        .bind(user.last_login)
        .bind(uuids(&user.teams))
        .bind(uuids(&user.organisations))
        .bind(user.status.as_str())
        .bind(user.deleted)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(write_error)?;

        let created = created.ok_or(StoreError::NotFound)?;
        user.timestamps = Timestamps::at(created, now);
        Ok(user)
    }

    #[tracing::instrument(name = "Deleting user from PostgreSQL", skip_all)]
    async fn delete_user(&self, key: &UserKey) -> Result<(), StoreError> {
        let query = match key {
            UserKey::Id(id) => sqlx::query("DELETE FROM users WHERE id = $1").bind(*id.as_uuid()),
            UserKey::DisplayName(name) => {
                sqlx::query("DELETE FROM users WHERE display_name = $1").bind(name.as_str())
            }
        };

        let result = query.execute(&self.pool).await.map_err(unexpected)?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    #[tracing::instrument(name = "Retrieving user from PostgreSQL", skip_all)]
    async fn get_user(&self, id: &UserId) -> Result<User, StoreError> {
        self.fetch_one_where("id = $1", *id.as_uuid())
            .await?
            .ok_or(StoreError::NotFound)
    }

    #[tracing::instrument(name = "Finding user by display name in PostgreSQL", skip_all)]
    async fn find_user_by_display_name(
        &self,
        display_name: &DisplayName,
    ) -> Result<Option<User>, StoreError> {
        self.fetch_one_where("display_name = $1", display_name.as_str().to_string())
            .await
    }

    #[tracing::instrument(name = "Finding user by email in PostgreSQL", skip_all)]
    async fn find_user_by_email(&self, email: &Email) -> Result<Option<User>, StoreError> {
        self.fetch_one_where("email = $1", email.as_str().to_string())
            .await
    }

    #[tracing::instrument(name = "Searching users in PostgreSQL", skip_all)]
    async fn search_users(&self, search: &UserSearch) -> Result<Vec<User>, StoreError> {
        let sql = format!(
            r#"{SELECT_USER}
                WHERE ($1::TEXT IS NULL OR starts_with(lower(display_name), lower($1)))
                  AND ($2::TEXT IS NULL OR email = $2)
                  AND ($3::UUID IS NULL OR $3 = ANY(organisations))
                ORDER BY display_name
            "#
        );
        let rows: Vec<UserRow> = sqlx::query_as(&sql)
            .bind(search.display_name_prefix.as_deref())
            .bind(search.email.as_ref().map(Email::as_str))
            .bind(search.organisation.map(Uuid::from))
            .fetch_all(&self.pool)
            .await
            .map_err(unexpected)?;

        rows.into_iter().map(User::try_from).collect()
    }
}
