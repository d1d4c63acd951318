use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new().route("/:slug", get(get_by_slug))
}

/// Resolve a public URL slug to its post.
pub async fn get_by_slug(
    Extension(services): Extension<Arc<AppServices>>,
    Path(slug): Path<String>,
    Query(query): Query<dto::NamespaceQuery>,
) -> axum::response::Response {
    let namespace = match services.namespace(query.namespace.as_deref()) {
        Ok(ns) => ns,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.get_by_slug(&namespace, &slug).await {
        Ok(post) => Json(dto::PostResponse::from(&post)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
