use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use tracing::info;

use inkwell_core::{DomainError, DomainResult, Namespace, NewPost, Post, PostId, ViewCount};
use inkwell_infra::{
    AppConfig, CounterStore, InMemoryCounterStore, InMemoryPostStore, PostService, PostStore,
    PostgresCounterStore, PostgresPostStore, ViewCounter,
};

pub type DynPostStore = Arc<dyn PostStore>;
pub type DynCounterStore = Arc<dyn CounterStore>;

/// Services shared by every handler (behind `Extension<Arc<AppServices>>`).
pub struct AppServices {
    posts: PostService<DynPostStore, DynCounterStore>,
    views: ViewCounter<DynPostStore, DynCounterStore>,
    default_namespace: Namespace,
}

impl AppServices {
    pub fn new(posts: DynPostStore, counters: DynCounterStore, config: &AppConfig) -> Self {
        Self {
            posts: PostService::new(posts.clone(), counters.clone())
                .with_policy(config.slug_policy.clone())
                .with_max_attempts(config.slug_max_attempts),
            views: ViewCounter::new(posts, counters),
            default_namespace: Namespace::posts(),
        }
    }

    /// Fully in-memory wiring (dev runs and tests).
    pub fn in_memory(config: &AppConfig) -> Self {
        Self::new(
            Arc::new(InMemoryPostStore::new()),
            Arc::new(InMemoryCounterStore::new()),
            config,
        )
    }

    /// `namespace` if given and non-blank, otherwise the default posts namespace.
    pub fn namespace(&self, requested: Option<&str>) -> DomainResult<Namespace> {
        match requested.map(str::trim).filter(|n| !n.is_empty()) {
            Some(name) => Namespace::new(name),
            None => Ok(self.default_namespace.clone()),
        }
    }

    pub async fn create_post(&self, namespace: Namespace, title: Option<String>) -> DomainResult<Post> {
        let title = title.ok_or_else(|| DomainError::validation("title is required"))?;
        self.posts.create_post(NewPost::new(namespace, title)?).await
    }

    pub async fn get_post(&self, id: PostId) -> DomainResult<Post> {
        self.posts.get_post(id).await
    }

    pub async fn get_by_slug(&self, namespace: &Namespace, slug: &str) -> DomainResult<Post> {
        self.posts.get_by_slug(namespace, slug).await
    }

    pub async fn list_posts(&self, namespace: &Namespace) -> DomainResult<Vec<Post>> {
        self.posts.list_posts(namespace).await
    }

    pub async fn delete_post(&self, id: PostId) -> DomainResult<()> {
        self.posts.delete_post(id).await
    }

    pub async fn read_views(&self, id: PostId) -> DomainResult<ViewCount> {
        self.views.read_count(id).await
    }

    pub async fn record_view(&self, id: PostId) -> DomainResult<ViewCount> {
        self.views.increment_and_read(id).await
    }
}

/// Pick stores from config: Postgres when `DATABASE_URL` is set, Redis
/// counters when `REDIS_URL` is set (and the `redis` feature is on),
/// in-memory otherwise.
pub async fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    let (posts, mut counters): (DynPostStore, DynCounterStore) = match &config.database_url {
        Some(url) => {
            let pool = PgPoolOptions::new()
                .max_connections(10)
                .acquire_timeout(Duration::from_secs(5))
                .connect(url)
                .await?;
            let posts = PostgresPostStore::new(pool.clone());
            posts.ensure_schema().await?;
            info!("using postgres stores");
            let counters: DynCounterStore = Arc::new(PostgresCounterStore::new(pool));
            (Arc::new(posts) as DynPostStore, counters)
        }
        None => {
            info!("using in-memory stores");
            let counters: DynCounterStore = Arc::new(InMemoryCounterStore::new());
            (Arc::new(InMemoryPostStore::new()) as DynPostStore, counters)
        }
    };

    if let Some(url) = &config.redis_url {
        counters = redis_counters(url, counters).await?;
    }

    Ok(AppServices::new(posts, counters, config))
}

#[cfg(feature = "redis")]
async fn redis_counters(url: &str, _fallback: DynCounterStore) -> anyhow::Result<DynCounterStore> {
    let store = inkwell_infra::RedisCounterStore::connect(url).await?;
    info!("using redis view counters");
    Ok(Arc::new(store))
}

#[cfg(not(feature = "redis"))]
async fn redis_counters(_url: &str, fallback: DynCounterStore) -> anyhow::Result<DynCounterStore> {
    tracing::warn!("REDIS_URL is set but this build lacks the `redis` feature; ignoring it");
    Ok(fallback)
}
