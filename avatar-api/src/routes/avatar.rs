use std::future::Future;

use axum::{
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    routing::get,
    Router,
};
use tracing::instrument;

use crate::{
    adapters::inbound::http::{ApiResponse, AvatarResponse},
    app_state::AppState,
    auth::AuthUser,
    domain::{
        models::{AssetReference, AvatarFile},
        AvatarError,
    },
    routes::ApiError,
};

// Room for multipart framing around a 5 MiB file.
const AVATAR_UPLOAD_BODY_LIMIT: usize = 6 * 1024 * 1024;
const AVATAR_FIELD: &str = "avatar";

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/avatar",
            get(get_avatar).post(upload_avatar).put(replace_avatar),
        )
        .route_layer(DefaultBodyLimit::max(AVATAR_UPLOAD_BODY_LIMIT))
}

#[instrument(name = "GET /avatar", skip_all, fields(user_id = %user.id))]
async fn get_avatar(
    user: AuthUser,
    State(app_state): State<AppState>,
) -> Result<ApiResponse<AvatarResponse>, ApiError> {
    let avatar = app_state.avatar_service.get_avatar(&user.id).await?;

    Ok(ApiResponse::ok("avatar retrieved", avatar.into()))
}

#[instrument(name = "POST /avatar", skip_all, fields(user_id = %user.id))]
async fn upload_avatar(
    user: AuthUser,
    State(app_state): State<AppState>,
    mut multipart: Multipart,
) -> Result<ApiResponse<AvatarResponse>, ApiError> {
    let files = extract_files_from_multipart(&mut multipart).await?;

    let service = app_state.avatar_service.clone();
    let avatar = run_detached(async move { service.upload_avatar(&user.id, files).await }).await?;

    Ok(ApiResponse::ok("avatar uploaded", avatar.into()))
}

#[instrument(name = "PUT /avatar", skip_all, fields(user_id = %user.id))]
async fn replace_avatar(
    user: AuthUser,
    State(app_state): State<AppState>,
    mut multipart: Multipart,
) -> Result<ApiResponse<AvatarResponse>, ApiError> {
    let files = extract_files_from_multipart(&mut multipart).await?;

    let service = app_state.avatar_service.clone();
    let avatar = run_detached(async move { service.replace_avatar(&user.id, files).await }).await?;

    Ok(ApiResponse::ok("avatar updated", avatar.into()))
}

/// Runs a mutation on its own task so a client disconnect cannot abandon it
/// between storing an asset and recording it.
async fn run_detached<F>(operation: F) -> Result<AssetReference, ApiError>
where
    F: Future<Output = Result<AssetReference, AvatarError>> + Send + 'static,
{
    let result = tokio::spawn(operation).await.map_err(|err| {
        tracing::error!("Avatar task failed: {}", err);
        ApiError::internal("avatar operation aborted")
    })?;

    result.map_err(ApiError::from)
}

/// Collects every file part. Parts without a file name are only taken when
/// they use the `avatar` field name.
async fn extract_files_from_multipart(
    multipart: &mut Multipart,
) -> Result<Vec<AvatarFile>, ApiError> {
    let mut files = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let file_name = field.file_name().map(str::to_string);
        if file_name.is_none() && field.name() != Some(AVATAR_FIELD) {
            continue;
        }

        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map_err(multipart_error)?;

        let mut file = AvatarFile::new(bytes);
        if let Some(file_name) = file_name {
            file = file.with_file_name(file_name);
        }
        if let Some(content_type) = content_type {
            file = file.with_content_type(content_type);
        }
        files.push(file);
    }

    Ok(files)
}

fn multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return ApiError::from(AvatarError::PayloadTooLarge);
    }

    tracing::debug!("Rejected multipart body: {}", err.body_text());
    ApiError::bad_request("failed to read multipart body")
}
