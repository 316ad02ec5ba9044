//! End-to-end gateway test against a local fake of the upstream indexes.
//!
//! The real adapters, HTTP client and challenge detection run unchanged;
//! only the base URLs point at an axum server on the loopback interface.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::body::{Body, to_bytes};
use axum::extract::Query;
use axum::http::{Request, StatusCode};
use axum::response::Html;
use axum::routing::get;
use axum::{Json, Router};
use magnetar_core::MagnetarConfig;
use magnetar_search::Aggregator;
use magnetar_web::{AppState, router};
use serde_json::{Value, json};
use tower::ServiceExt;

async fn yts_listing() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "status_message": "Query was successful",
        "data": {
            "movie_count": 1,
            "movies": [{
                "title": "Sintel",
                "year": 2010,
                "imdb_code": "tt1727587",
                "torrents": [{
                    "url": "https://yts.example/torrent/download/AAAA",
                    "hash": "08ADA5A7A6183AAE1E09D831DF6748D566095A10",
                    "quality": "1080p",
                    "seeds": 120,
                    "peers": 7,
                    "size": "1.23 GB",
                    "date_uploaded": "2015-11-01 03:27:42"
                }]
            }]
        }
    }))
}

async fn piratebay_challenge() -> (StatusCode, Html<&'static str>) {
    (
        StatusCode::FORBIDDEN,
        Html("<!DOCTYPE html><html><head><title>Just a moment...</title></head></html>"),
    )
}

async fn eztv_listing() -> Json<Value> {
    Json(json!({
        "torrents_count": 2,
        "limit": 100,
        "page": 1,
        "torrents": [
            {
                "title": "Sintel Extras 720p",
                "magnet_url": "magnet:?xt=urn:btih:08ada5a7a6183aae1e09d831df6748d566095a10",
                "torrent_url": "https://eztv.example/sintel.torrent",
                "imdb_id": "1727587",
                "seeds": "N/A",
                "peers": 3,
                "date_released_unix": 1700000000,
                "size_bytes": "1503238553"
            },
            {
                "title": "Some Other Show S01E01",
                "magnet_url": "magnet:?xt=urn:btih:ffff",
                "seeds": 1,
                "peers": 1,
                "date_released_unix": 1700000000,
                "size_bytes": "1000"
            }
        ]
    }))
}

async fn piratebay_no_results() -> Json<Value> {
    Json(json!([{
        "id": "0",
        "name": "No results returned",
        "info_hash": "0000000000000000000000000000000000000000",
        "leechers": "0",
        "seeders": "0",
        "size": "0",
        "added": "0"
    }]))
}

/// EZTV listing that honours the requested page size, with the only
/// "Sintel" release last on the page.
async fn eztv_paged(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let page_size = params
        .get("limit")
        .and_then(|limit| limit.parse::<usize>().ok())
        .unwrap_or(30);
    let titles = [
        "Show A S01E01",
        "Show B S01E01",
        "Show C S01E01",
        "Show D S01E01",
        "Sintel S01E01",
    ];
    let torrents: Vec<Value> = titles
        .iter()
        .take(page_size)
        .enumerate()
        .map(|(i, title)| {
            json!({
                "title": title,
                "magnet_url": format!("magnet:?xt=urn:btih:{i}"),
                "seeds": 5,
                "peers": 1
            })
        })
        .collect();
    Json(json!({ "torrents": torrents }))
}

async fn hanging_listing() -> Json<Value> {
    tokio::time::sleep(Duration::from_secs(30)).await;
    Json(json!({}))
}

fn default_upstreams() -> Router {
    Router::new()
        .route("/api/v2/list_movies.json", get(yts_listing))
        .route("/q.php", get(piratebay_challenge))
        .route("/api/get-torrents", get(eztv_listing))
}

/// Serves `upstream` on the loopback interface and returns its base URL.
async fn spawn_upstreams(upstream: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, upstream).await.unwrap();
    });

    format!("http://{address}")
}

async fn gateway_with(upstream: Router, mut config: MagnetarConfig) -> Router {
    let base_url = spawn_upstreams(upstream).await;
    config.network.yts_base_url = base_url.clone();
    config.network.tpb_base_url = base_url.clone();
    config.network.eztv_base_url = base_url;

    let aggregator = Aggregator::from_config(&config).unwrap();
    router(AppState::new(Arc::new(aggregator), &config.search))
}

async fn gateway() -> Router {
    gateway_with(default_upstreams(), MagnetarConfig::default()).await
}

async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_search_through_real_adapters() {
    let (status, body) = get_json(gateway().await, "/search?query=sintel").await;
    assert_eq!(status, StatusCode::OK);

    let mut keys: Vec<_> = body.as_object().unwrap().keys().cloned().collect();
    keys.sort();
    assert_eq!(keys, vec!["eztv", "thepiratebay", "yts"]);

    let yts = &body["yts"][0];
    assert_eq!(yts["source"], "yts");
    assert_eq!(yts["title"], "Sintel (2010) 1080p");
    assert_eq!(yts["url"], "https://yts.example/torrent/download/AAAA");
    assert_eq!(yts["seeds"], "120");
    assert_eq!(yts["peers"], "7");
    assert_eq!(yts["imdb"], "tt1727587");

    // The challenge page degrades ThePirateBay to an empty list.
    assert_eq!(body["thepiratebay"], json!([]));

    let eztv = body["eztv"].as_array().unwrap();
    assert_eq!(eztv.len(), 1);
    assert_eq!(eztv[0]["title"], "Sintel Extras 720p");
    assert_eq!(eztv[0]["seeds"], "?");
    assert_eq!(eztv[0]["size"], "1.40 GB");
    assert_eq!(eztv[0]["imdb"], "tt1727587");
    assert!(eztv[0]["url"].as_str().unwrap().starts_with("magnet:?"));
}

#[tokio::test]
async fn test_blocked_single_source_is_not_found() {
    let (status, body) =
        get_json(gateway().await, "/search?query=sintel&source=thepiratebay").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "No results found" }));
}

#[tokio::test]
async fn test_piratebay_placeholder_is_not_found() {
    let upstream = Router::new().route("/q.php", get(piratebay_no_results));
    let app = gateway_with(upstream, MagnetarConfig::default()).await;

    let (status, body) = get_json(app, "/search?query=zzqx&source=thepiratebay").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "No results found" }));
}

#[tokio::test]
async fn test_eztv_title_match_beyond_limit_is_found() {
    let upstream = Router::new().route("/api/get-torrents", get(eztv_paged));
    let app = gateway_with(upstream, MagnetarConfig::default()).await;

    let (status, body) = get_json(app, "/search?query=sintel&source=eztv&limit=3").await;
    assert_eq!(status, StatusCode::OK);
    let eztv = body["eztv"].as_array().unwrap();
    assert_eq!(eztv.len(), 1);
    assert_eq!(eztv[0]["title"], "Sintel S01E01");
}

#[tokio::test]
async fn test_hanging_upstream_times_out_without_stalling_others() {
    let upstream = Router::new()
        .route("/api/v2/list_movies.json", get(hanging_listing))
        .route("/q.php", get(hanging_listing))
        .route("/api/get-torrents", get(eztv_listing));
    let mut config = MagnetarConfig::default();
    config.network.request_timeout = Duration::from_secs(1);
    let app = gateway_with(upstream, config).await;

    let started = Instant::now();
    let (status, body) = get_json(app, "/search?query=sintel").await;
    let elapsed = started.elapsed();

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["yts"], json!([]));
    assert_eq!(body["thepiratebay"], json!([]));
    assert_eq!(body["eztv"].as_array().unwrap().len(), 1);
    assert!(elapsed >= Duration::from_millis(900), "{elapsed:?}");
    assert!(elapsed < Duration::from_secs(5), "{elapsed:?}");
}
