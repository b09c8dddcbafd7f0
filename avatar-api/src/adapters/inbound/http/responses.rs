//! JSON envelope returned by the avatar endpoints.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::domain::models::AssetReference;

/// `{ success: true, message, data }`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: message.into(),
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Only the public url leaves the service; the asset id stays internal.
#[derive(Debug, Serialize)]
pub struct AvatarResponse {
    pub avatar: Option<String>,
}

impl From<Option<AssetReference>> for AvatarResponse {
    fn from(avatar: Option<AssetReference>) -> Self {
        Self {
            avatar: avatar.map(|avatar| avatar.url),
        }
    }
}

impl From<AssetReference> for AvatarResponse {
    fn from(avatar: AssetReference) -> Self {
        Self::from(Some(avatar))
    }
}
