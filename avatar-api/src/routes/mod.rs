pub(crate) mod avatar;
pub(crate) mod error;

pub(crate) use error::ApiError;

pub(crate) async fn not_found() -> ApiError {
    ApiError::not_found("API endpoint not found")
}
