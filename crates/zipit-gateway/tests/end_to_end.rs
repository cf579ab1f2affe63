//! Gateway, gRPC adapter, engine and in-memory store wired together in one
//! process.

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use tonic::Status;
use tower::ServiceExt;
use zipit_gateway::{App, AppState, ShortenerClient};
use zipit_proto_schema::v1 as proto;
use zipit_proto_schema::v1::shortener_service_server::ShortenerService as ShortenerRpc;
use zipit_shortener::{ShortenerGrpcServer, ShortenerService};
use zipit_storage::InMemoryRepository;

type Server = ShortenerGrpcServer<ShortenerService<InMemoryRepository>>;

/// Calls the gRPC adapter directly instead of going over a socket.
struct InProcessClient {
    server: Server,
}

#[async_trait]
impl ShortenerClient for InProcessClient {
    async fn shorten(&self, long_url: String) -> Result<String, Status> {
        let response = self
            .server
            .shorten(tonic::Request::new(proto::ShortenRequest { long_url }))
            .await?;
        Ok(response.into_inner().short_code)
    }

    async fn resolve(&self, short_code: String) -> Result<String, Status> {
        let response = self
            .server
            .resolve(tonic::Request::new(proto::ResolveRequest { short_code }))
            .await?;
        Ok(response.into_inner().long_url)
    }
}

fn app() -> (Router, Arc<InMemoryRepository>) {
    let repository = Arc::new(InMemoryRepository::new());
    let server = ShortenerGrpcServer::new(ShortenerService::from_arc(repository.clone()));
    let router = App::router(AppState::new(Arc::new(InProcessClient { server })));
    (router, repository)
}

async fn shorten(app: &Router, body: Value) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/shorten")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

async fn get(app: &Router, uri: &str) -> Response {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.clone().oneshot(request).await.unwrap()
}

async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn shorten_resolve_and_redirect() {
    let (app, repository) = app();

    let response = shorten(&app, json!({ "long_url": "https://example.com" })).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let short_code = body_json(response).await["short_code"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(!short_code.is_empty());
    assert_eq!(repository.len(), 1);
    assert!(repository.pending().is_empty());

    let response = get(&app, &format!("/api/{short_code}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "long_url": "https://example.com" })
    );

    let response = get(&app, &format!("/{short_code}")).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()[header::LOCATION], "https://example.com");
}

#[tokio::test]
async fn same_url_same_code() {
    let (app, repository) = app();

    let first = body_json(shorten(&app, json!({ "long_url": "https://dup.example" })).await).await;
    let second = body_json(shorten(&app, json!({ "long_url": "https://dup.example" })).await).await;

    assert_eq!(first, second);
    assert_eq!(repository.len(), 1);
}

#[tokio::test]
async fn invalid_url_is_bad_request_and_stores_nothing() {
    let (app, repository) = app();

    let response = shorten(&app, json!({ "long_url": "not-a-url" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await, json!({ "error": "invalid url" }));
    assert!(repository.is_empty());
}

#[tokio::test]
async fn unknown_field_never_reaches_the_store() {
    let (app, repository) = app();

    let response = shorten(
        &app,
        json!({ "long_url": "https://example.com", "custom_alias": "mine" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "invalid JSON payload" })
    );
    assert!(repository.is_empty());
}

#[tokio::test]
async fn unknown_code_is_not_found() {
    let (app, _) = app();

    let response = get(&app, "/api/doesnotexist").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response).await,
        json!({ "error": "short url not found" })
    );
}

#[tokio::test]
async fn concurrent_duplicates_share_one_record() {
    let (app, repository) = app();

    let mut handles = vec![];
    for _ in 0..16 {
        let app = app.clone();
        handles.push(tokio::spawn(async move {
            body_json(shorten(&app, json!({ "long_url": "https://race.example" })).await).await
        }));
    }

    let mut codes = vec![];
    for handle in handles {
        codes.push(handle.await.unwrap()["short_code"].clone());
    }

    assert!(codes.iter().all(|code| code == &codes[0]));
    assert_eq!(repository.len(), 1);
}
