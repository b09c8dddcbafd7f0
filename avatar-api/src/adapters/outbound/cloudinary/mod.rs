//! Asset store backed by Cloudinary.

use async_trait::async_trait;
use cloudinary::{
    CloudinaryClient, CloudinaryError, DestroyOutcome, ResourceType, UploadFile, UploadOptions,
};

use crate::domain::{
    models::{AssetReference, AvatarFile, StoreOptions},
    ports::outbound::AssetStore,
    AssetStoreError,
};

pub struct CloudinaryAssetStore {
    client: CloudinaryClient,
    resource_type: ResourceType,
}

impl CloudinaryAssetStore {
    pub fn new(client: CloudinaryClient) -> Self {
        Self {
            client,
            resource_type: ResourceType::Image,
        }
    }
}

impl From<CloudinaryError> for AssetStoreError {
    fn from(err: CloudinaryError) -> Self {
        match err {
            CloudinaryError::Rejected { status, message } => {
                Self::Rejected(format!("{status}: {message}"))
            }
            other => Self::Unavailable(other.to_string()),
        }
    }
}

#[async_trait]
impl AssetStore for CloudinaryAssetStore {
    async fn store(
        &self,
        file: &AvatarFile,
        options: &StoreOptions,
    ) -> Result<AssetReference, AssetStoreError> {
        let upload = UploadFile {
            bytes: file.bytes.to_vec(),
            file_name: file.file_name.clone(),
            content_type: file.content_type.clone(),
        };
        let options = UploadOptions {
            folder: options.folder.clone(),
            public_id: options.public_id.clone(),
            overwrite: options.overwrite,
            resource_type: self.resource_type,
        };

        let asset = self.client.upload(upload, &options).await?;

        Ok(AssetReference::new(asset.secure_url, asset.public_id))
    }

    async fn destroy(&self, asset_id: &str) -> Result<(), AssetStoreError> {
        match self.client.destroy(asset_id, self.resource_type).await? {
            DestroyOutcome::Deleted => Ok(()),
            DestroyOutcome::NotFound => {
                tracing::debug!(asset_id, "asset already gone");
                Ok(())
            }
        }
    }
}
