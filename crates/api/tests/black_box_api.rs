use std::collections::HashSet;
use std::sync::Arc;

use inkwell_api::app::{build_app, services::AppServices};
use inkwell_infra::AppConfig;
use reqwest::StatusCode;
use serde_json::json;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        Self::spawn_with(&[]).await
    }

    async fn spawn_with(vars: &[(&str, &str)]) -> Self {
        let vars: Vec<(String, String)> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let config = AppConfig::from_lookup(|key| {
            vars.iter().find(|(k, _)| k == key).map(|(_, v)| v.clone())
        })
        .expect("valid test config");

        // Same router as prod, in-memory stores, ephemeral port.
        let app = build_app(Arc::new(AppServices::in_memory(&config)));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn create(client: &reqwest::Client, base_url: &str, title: &str) -> serde_json::Value {
    let res = client
        .post(format!("{}/posts", base_url))
        .json(&json!({ "title": title }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    res.json().await.unwrap()
}

#[tokio::test]
async fn health_is_ok() {
    let srv = TestServer::spawn().await;

    let res = reqwest::get(format!("{}/health", srv.base_url)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn duplicate_titles_get_suffixed_slugs() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let first = create(&client, &srv.base_url, "Hello World").await;
    let second = create(&client, &srv.base_url, "Hello World").await;
    let third = create(&client, &srv.base_url, "hello   world!!").await;

    assert_eq!(first["slug"], "hello-world");
    assert_eq!(second["slug"], "hello-world-1");
    assert_eq!(third["slug"], "hello-world-2");
    assert_eq!(first["namespace"], "posts");

    let res = client
        .get(format!("{}/slugs/hello-world-1", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let found: serde_json::Value = res.json().await.unwrap();
    assert_eq!(found["id"], second["id"]);
}

#[tokio::test]
async fn blank_or_missing_title_is_rejected() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    for body in [json!({ "title": "   " }), json!({})] {
        let res = client
            .post(format!("{}/posts", srv.base_url))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let err: serde_json::Value = res.json().await.unwrap();
        assert_eq!(err["error"], "validation_error");
    }
}

#[tokio::test]
async fn punctuation_only_title_uses_fallback_slug() {
    let srv = TestServer::spawn_with(&[("INKWELL_SLUG_FALLBACK", "Draft")]).await;
    let client = reqwest::Client::new();

    let first = create(&client, &srv.base_url, "!!!").await;
    let second = create(&client, &srv.base_url, "???").await;

    assert_eq!(first["slug"], "draft");
    assert_eq!(second["slug"], "draft-1");
}

#[tokio::test]
async fn concurrent_creates_never_share_a_slug() {
    let srv = TestServer::spawn_with(&[("INKWELL_SLUG_MAX_ATTEMPTS", "32")]).await;
    let client = reqwest::Client::new();

    let mut tasks = Vec::new();
    for _ in 0..12 {
        let client = client.clone();
        let base_url = srv.base_url.clone();
        tasks.push(tokio::spawn(async move {
            create(&client, &base_url, "Same Title").await["slug"]
                .as_str()
                .unwrap()
                .to_string()
        }));
    }

    let mut slugs = HashSet::new();
    for task in tasks {
        assert!(slugs.insert(task.await.unwrap()));
    }
    assert_eq!(slugs.len(), 12);
}

#[tokio::test]
async fn view_counter_lifecycle() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let post = create(&client, &srv.base_url, "Counted").await;
    let id = post["id"].as_str().unwrap().to_string();
    let views_url = format!("{}/posts/{}/views", srv.base_url, id);

    // Never viewed: zero, not an error.
    let res = client.get(&views_url).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["views"], 0);

    for expected in 1..=3 {
        let res = client.post(&views_url).send().await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body: serde_json::Value = res.json().await.unwrap();
        assert_eq!(body["views"], expected);
    }

    let body: serde_json::Value = client.get(&views_url).send().await.unwrap().json().await.unwrap();
    assert_eq!(body["views"], 3);
    assert_eq!(body["id"], post["id"]);
}

#[tokio::test]
async fn concurrent_views_are_all_counted() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let post = create(&client, &srv.base_url, "Popular").await;
    let views_url = format!("{}/posts/{}/views", srv.base_url, post["id"].as_str().unwrap());

    let mut tasks = Vec::new();
    for _ in 0..10 {
        let client = client.clone();
        let url = views_url.clone();
        tasks.push(tokio::spawn(async move {
            for _ in 0..10 {
                let res = client.post(&url).send().await.unwrap();
                assert_eq!(res.status(), StatusCode::OK);
            }
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    let body: serde_json::Value = client.get(&views_url).send().await.unwrap().json().await.unwrap();
    assert_eq!(body["views"], 100);
}

#[tokio::test]
async fn unknown_and_malformed_ids() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let missing = "0190f5a4-0000-7000-8000-000000000000";
    let res = client
        .post(format!("{}/posts/{}/views", srv.base_url, missing))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .get(format!("{}/posts/{}/views", srv.base_url, missing))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .get(format!("{}/posts/not-a-uuid", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let err: serde_json::Value = res.json().await.unwrap();
    assert_eq!(err["error"], "invalid_id");
}

#[tokio::test]
async fn deleting_a_post_frees_its_slug_and_views() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let post = create(&client, &srv.base_url, "Short Lived").await;
    let id = post["id"].as_str().unwrap().to_string();

    let res = client
        .post(format!("{}/posts/{}/views", srv.base_url, id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .delete(format!("{}/posts/{}", srv.base_url, id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client
        .get(format!("{}/posts/{}/views", srv.base_url, id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .delete(format!("{}/posts/{}", srv.base_url, id))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let again = create(&client, &srv.base_url, "Short Lived").await;
    assert_eq!(again["slug"], "short-lived");
}

#[tokio::test]
async fn namespaces_are_independent() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let in_posts = create(&client, &srv.base_url, "About").await;

    let res = client
        .post(format!("{}/posts", srv.base_url))
        .json(&json!({ "title": "About", "namespace": "pages" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let in_pages: serde_json::Value = res.json().await.unwrap();

    assert_eq!(in_posts["slug"], "about");
    assert_eq!(in_pages["slug"], "about");
    assert_eq!(in_pages["namespace"], "pages");

    let listed: Vec<serde_json::Value> = client
        .get(format!("{}/posts?namespace=pages", srv.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["id"], in_pages["id"]);

    let res = client
        .get(format!("{}/slugs/about?namespace=pages", srv.base_url))
        .send()
        .await
        .unwrap();
    let found: serde_json::Value = res.json().await.unwrap();
    assert_eq!(found["id"], in_pages["id"]);
}
