use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};

use inkwell_core::PostId;

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_posts).post(create_post))
        .route("/:id", get(get_post).delete(delete_post))
        .route("/:id/views", get(read_views).post(record_view))
}

pub async fn create_post(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::CreatePostRequest>, JsonRejection>,
) -> axum::response::Response {
    let Json(body) = match body {
        Ok(body) => body,
        Err(e) => return errors::json_error(StatusCode::BAD_REQUEST, "validation_error", e.body_text()),
    };

    let namespace = match services.namespace(body.namespace.as_deref()) {
        Ok(ns) => ns,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.create_post(namespace, body.title).await {
        Ok(post) => (StatusCode::CREATED, Json(dto::PostResponse::from(&post))).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn list_posts(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::NamespaceQuery>,
) -> axum::response::Response {
    let namespace = match services.namespace(query.namespace.as_deref()) {
        Ok(ns) => ns,
        Err(e) => return errors::domain_error_to_response(e),
    };

    match services.list_posts(&namespace).await {
        Ok(posts) => Json(posts.iter().map(dto::PostResponse::from).collect::<Vec<_>>()).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn get_post(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_post_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.get_post(id).await {
        Ok(post) => Json(dto::PostResponse::from(&post)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn delete_post(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_post_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.delete_post(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

pub async fn read_views(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_post_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.read_views(id).await {
        Ok(views) => Json(dto::ViewsResponse::new(id, views)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

/// Called once per page view.
pub async fn record_view(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id = match parse_post_id(&id) {
        Ok(id) => id,
        Err(resp) => return resp,
    };

    match services.record_view(id).await {
        Ok(views) => Json(dto::ViewsResponse::new(id, views)).into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

fn parse_post_id(raw: &str) -> Result<PostId, axum::response::Response> {
    raw.parse::<PostId>()
        .map_err(errors::domain_error_to_response)
}
