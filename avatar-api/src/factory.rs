//! Composition root: the only place that knows the concrete outbound adapters.

use std::{sync::Arc, time::Duration};

use cloudinary::{CloudinaryClient, CloudinaryError, Credentials};
use sqlx::PgPool;

use crate::{
    adapters::outbound::{cloudinary::CloudinaryAssetStore, postgres::PostgresProfileStore},
    config::CloudinarySettings,
    domain::{ports::inbound::AvatarService, services::AvatarServiceImpl},
};

/// Builds the avatar service on Postgres profiles and Cloudinary assets.
pub fn avatar_service(
    pool: PgPool,
    settings: &CloudinarySettings,
) -> Result<Arc<dyn AvatarService>, CloudinaryError> {
    let credentials = Credentials::new(
        settings.cloud_name.clone(),
        settings.api_key.clone(),
        settings.api_secret.clone(),
    );
    let client = CloudinaryClient::new(credentials, Duration::from_secs(settings.timeout_secs))?
        .with_base_url(settings.base_url.clone())
        .with_signature_algorithm(settings.signature_algorithm);

    let service = AvatarServiceImpl::new(
        Arc::new(PostgresProfileStore::new(pool)),
        Arc::new(CloudinaryAssetStore::new(client)),
        settings.folder.clone(),
    );

    Ok(Arc::new(service))
}
