use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use crate::domain::{
    models::{AssetReference, UserId, UserProfile},
    ports::outbound::ProfileStore,
    ProfileStoreError,
};

pub struct PostgresProfileStore {
    pool: PgPool,
}

impl PostgresProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn exists(&self, user_id: &UserId) -> Result<bool, ProfileStoreError> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)
            "#,
        )
        .bind(user_id.as_i32())
        .fetch_one(&self.pool)
        .await
        .map_err(storage_error)
    }
}

#[derive(FromRow)]
struct ProfileRow {
    id: i32,
    avatar_url: Option<String>,
    avatar_asset_id: Option<String>,
    avatar_version: i64,
}

impl From<ProfileRow> for UserProfile {
    fn from(row: ProfileRow) -> Self {
        let avatar = match (row.avatar_url, row.avatar_asset_id) {
            (Some(url), Some(asset_id)) => Some(AssetReference::new(url, asset_id)),
            // Rows written before asset ids were recorded.
            (Some(url), None) => Some(AssetReference::url_only(url)),
            (None, None) => None,
            (None, Some(_)) => {
                tracing::warn!(user_id = row.id, "avatar asset id without url, ignoring");
                None
            }
        };

        let profile = UserProfile {
            version: row.avatar_version,
            ..UserProfile::new(UserId::new(row.id))
        };

        match avatar {
            Some(avatar) => profile.with_avatar(avatar),
            None => profile,
        }
    }
}

fn storage_error(err: sqlx::Error) -> ProfileStoreError {
    tracing::error!("Database error: {:?}", err);
    ProfileStoreError::Storage(err.to_string())
}

#[async_trait]
impl ProfileStore for PostgresProfileStore {
    async fn find_by_id(&self, user_id: &UserId) -> Result<Option<UserProfile>, ProfileStoreError> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT id, avatar_url, avatar_asset_id, avatar_version
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id.as_i32())
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(row.map(UserProfile::from))
    }

    async fn update_avatar(
        &self,
        user_id: &UserId,
        expected_version: i64,
        avatar: &AssetReference,
    ) -> Result<(), ProfileStoreError> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET avatar_url = $3,
                avatar_asset_id = $4,
                avatar_version = avatar_version + 1,
                avatar_updated_at = now()
            WHERE id = $1 AND avatar_version = $2
            "#,
        )
        .bind(user_id.as_i32())
        .bind(expected_version)
        .bind(&avatar.url)
        .bind(&avatar.asset_id)
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;

        if result.rows_affected() == 1 {
            return Ok(());
        }

        if self.exists(user_id).await? {
            Err(ProfileStoreError::VersionConflict)
        } else {
            Err(ProfileStoreError::NotFound)
        }
    }
}
