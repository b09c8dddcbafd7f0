use async_trait::async_trait;

use crate::domain::{
    models::{AssetReference, UserId, UserProfile},
    ProfileStoreError,
};

#[async_trait]
pub trait ProfileStore: Send + Sync + 'static {
    async fn find_by_id(&self, user_id: &UserId) -> Result<Option<UserProfile>, ProfileStoreError>;

    /// Writes both avatar fields and bumps the version, but only if the
    /// stored version still equals `expected_version`.
    async fn update_avatar(
        &self,
        user_id: &UserId,
        expected_version: i64,
        avatar: &AssetReference,
    ) -> Result<(), ProfileStoreError>;
}
