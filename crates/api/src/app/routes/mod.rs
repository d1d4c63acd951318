use axum::Router;

pub mod posts;
pub mod slugs;
pub mod system;

/// Router for all post endpoints.
pub fn router() -> Router {
    Router::new()
        .nest("/posts", posts::router())
        .nest("/slugs", slugs::router())
}
