use axum::{
    extract::{Request, State},
    http::HeaderName,
    middleware::Next,
    response::Response,
};

use crate::domain::models::UserId;

#[derive(Debug, Clone)]
pub struct IdentityHeader(pub HeaderName);

/// Copies the forwarded user id into the request extensions. Malformed or
/// missing values leave the request anonymous.
pub async fn resolve_identity(
    State(IdentityHeader(header)): State<IdentityHeader>,
    mut request: Request,
    next: Next,
) -> Response {
    let user_id = request
        .headers()
        .get(&header)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<UserId>().ok());

    if let Some(user_id) = user_id {
        request.extensions_mut().insert(user_id);
    }

    next.run(request).await
}
