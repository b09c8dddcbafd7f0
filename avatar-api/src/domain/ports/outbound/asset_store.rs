use async_trait::async_trait;

use crate::domain::{
    models::{AssetReference, AvatarFile, StoreOptions},
    AssetStoreError,
};

#[async_trait]
pub trait AssetStore: Send + Sync + 'static {
    /// Uploads and publishes a file.
    async fn store(
        &self,
        file: &AvatarFile,
        options: &StoreOptions,
    ) -> Result<AssetReference, AssetStoreError>;

    /// Deletes an asset. Deleting an asset that no longer exists succeeds.
    async fn destroy(&self, asset_id: &str) -> Result<(), AssetStoreError>;
}
