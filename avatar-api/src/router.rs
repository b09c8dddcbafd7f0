use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    middleware,
    routing::get,
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::{DefaultMakeSpan, TraceLayer},
};

use crate::{
    app_state::AppState,
    auth::{resolve_identity, IdentityHeader},
    config::ApplicationSettings,
    routes,
};

#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    #[error("invalid identity header name: {0}")]
    InvalidIdentityHeader(String),
}

pub fn create(app_state: AppState, settings: &ApplicationSettings) -> Result<Router<()>, RouterError> {
    let identity_header = HeaderName::try_from(settings.identity_header.as_str())
        .map_err(|_| RouterError::InvalidIdentityHeader(settings.identity_header.clone()))?;

    let origins = settings
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect::<Vec<_>>();

    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
        .allow_origin(AllowOrigin::list(origins));

    let app = Router::new()
        .route("/", get(|| async { "Avatar API is running!" }))
        .nest("/api/v1", routes::avatar::router())
        .fallback(routes::not_found)
        .with_state(app_state)
        .layer(middleware::from_fn_with_state(
            IdentityHeader(identity_header),
            resolve_identity,
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()));

    Ok(app)
}
