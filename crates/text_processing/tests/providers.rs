//! Integration tests for the translation providers
//!
//! LibreTranslate and MyMemory are stood in for by local axum servers.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::{json, Value};

use transdesk_config::TranslationServiceConfig;
use transdesk_core::Translator;
use transdesk_text_processing::{
    EnrichmentPipeline, FallbackTranslator, LibreTranslateClient, MyMemoryClient,
};

type Seen = Arc<Mutex<Vec<Value>>>;
type Params = HashMap<String, String>;

/// Serve `router` on an ephemeral port and return its base URL
async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// A base URL nothing is listening on
async fn dead_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

/// LibreTranslate stand-in answering with `reply` and recording request bodies
async fn libre_stub(status: StatusCode, reply: Value, delay: Duration) -> (String, Seen) {
    let seen: Seen = Arc::default();
    let router = Router::new()
        .route(
            "/translate",
            post(
                move |State(seen): State<Seen>, Json(body): Json<Value>| async move {
                    seen.lock().push(body);
                    tokio::time::sleep(delay).await;
                    (status, Json(reply))
                },
            ),
        )
        .with_state(seen.clone());
    (serve(router).await, seen)
}

/// MyMemory stand-in answering with `reply` and recording query strings
async fn mymemory_stub(reply: Value) -> (String, Seen) {
    let seen: Seen = Arc::default();
    let router = Router::new()
        .route(
            "/get",
            get(
                move |State(seen): State<Seen>, Query(params): Query<Params>| async move {
                    seen.lock().push(json!(params));
                    Json(reply)
                },
            ),
        )
        .with_state(seen.clone());
    (serve(router).await, seen)
}

fn http(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder().timeout(timeout).build().unwrap()
}

#[tokio::test]
async fn test_libretranslate_success() {
    let (url, seen) = libre_stub(
        StatusCode::OK,
        json!({ "translatedText": "नमस्ते" }),
        Duration::ZERO,
    )
    .await;
    let client = LibreTranslateClient::new(http(Duration::from_secs(2)), &url, "");

    let result = client.translate("Hello", "hi").await.unwrap();
    assert_eq!(result, "नमस्ते");

    let bodies = seen.lock();
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["q"], "Hello");
    assert_eq!(bodies[0]["source"], "en");
    assert_eq!(bodies[0]["target"], "hi");
    assert_eq!(bodies[0]["format"], "text");
}

#[tokio::test]
async fn test_libretranslate_empty_text_is_failure() {
    let (url, _) =
        libre_stub(StatusCode::OK, json!({ "translatedText": "" }), Duration::ZERO).await;
    let client = LibreTranslateClient::new(http(Duration::from_secs(2)), &url, "");
    assert!(client.translate("Hello", "hi").await.is_err());
}

#[tokio::test]
async fn test_mymemory_uses_langpair_query() {
    let (url, seen) = mymemory_stub(json!({
        "responseData": { "translatedText": "Hola" },
        "responseStatus": 200
    }))
    .await;
    let client = MyMemoryClient::new(http(Duration::from_secs(2)), &url);

    assert_eq!(client.translate("Hello", "es").await.unwrap(), "Hola");

    let queries = seen.lock();
    assert_eq!(queries[0]["q"], "Hello");
    assert_eq!(queries[0]["langpair"], "en|es");
}

#[tokio::test]
async fn test_mymemory_error_status_is_failure() {
    let (url, _) = mymemory_stub(json!({
        "responseData": {
            "translatedText": "MYMEMORY WARNING: YOU USED ALL AVAILABLE FREE TRANSLATIONS"
        },
        "responseStatus": 429
    }))
    .await;
    let client = MyMemoryClient::new(http(Duration::from_secs(2)), &url);
    assert!(client.translate("Hello", "es").await.is_err());
}

#[tokio::test]
async fn test_server_error_falls_back_to_mymemory() {
    let (libre_url, libre_seen) = libre_stub(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "error": "overloaded" }),
        Duration::ZERO,
    )
    .await;
    let (mm_url, mm_seen) = mymemory_stub(json!({
        "responseData": { "translatedText": "হ্যালো" },
        "responseStatus": 200
    }))
    .await;

    let client = http(Duration::from_secs(2));
    let chain = FallbackTranslator::new(
        Arc::new(LibreTranslateClient::new(client.clone(), &libre_url, "")),
        Arc::new(MyMemoryClient::new(client, &mm_url)),
    );
    let pipeline = EnrichmentPipeline::new(Arc::new(chain));

    assert_eq!(pipeline.translate("Hello", "bn").await, "হ্যালো");
    assert_eq!(libre_seen.lock().len(), 1);
    assert_eq!(mm_seen.lock().len(), 1);
}

#[tokio::test]
async fn test_slow_primary_times_out_into_fallback() {
    let (libre_url, _) = libre_stub(
        StatusCode::OK,
        json!({ "translatedText": "too late" }),
        Duration::from_secs(5),
    )
    .await;
    let (mm_url, _) = mymemory_stub(json!({
        "responseData": { "translatedText": "Hola" },
        "responseStatus": 200
    }))
    .await;

    let config = TranslationServiceConfig {
        libretranslate_url: libre_url,
        libretranslate_api_key: String::new(),
        mymemory_url: mm_url,
        timeout_ms: 300,
    };
    let pipeline = EnrichmentPipeline::from_config(&config).unwrap();

    assert_eq!(pipeline.translate("Hello", "es").await, "Hola");
}

#[tokio::test]
async fn test_both_services_down_returns_original() {
    let config = TranslationServiceConfig {
        libretranslate_url: dead_url().await,
        libretranslate_api_key: String::new(),
        mymemory_url: dead_url().await,
        timeout_ms: 1_000,
    };
    let pipeline = EnrichmentPipeline::from_config(&config).unwrap();

    let results = pipeline.translate_all("Hello", ["hi", "bn", "es"]).await;
    for (_, text) in results {
        assert_eq!(text, "Hello");
    }
}
