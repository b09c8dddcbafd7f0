use async_trait::async_trait;

use crate::domain::{
    models::{AssetReference, AvatarFile, UserId},
    AvatarError,
};

#[async_trait]
pub trait AvatarService: Send + Sync + 'static {
    /// Stores the first file as the user's avatar and returns its reference.
    async fn upload_avatar(
        &self,
        user_id: &UserId,
        files: Vec<AvatarFile>,
    ) -> Result<AssetReference, AvatarError>;

    async fn get_avatar(&self, user_id: &UserId) -> Result<Option<AssetReference>, AvatarError>;

    /// Swaps the current avatar for the first file. The previous asset is
    /// deleted only once the new reference is persisted.
    async fn replace_avatar(
        &self,
        user_id: &UserId,
        files: Vec<AvatarFile>,
    ) -> Result<AssetReference, AvatarError>;
}
