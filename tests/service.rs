//! End-to-end tests against a mock blob store.

use std::sync::atomic::Ordering;
use std::time::Duration;

use audio_player::cache::CacheError;
use audio_player::http::HttpServer;
use audio_player::lifecycle::{start_cache, Shutdown, StartupError};
use audio_player::search::SearchQuery;
use serde_json::{json, Value};
use tokio::net::TcpListener;

mod common;

async fn fetch_meta(client: &reqwest::Client, addr: std::net::SocketAddr) -> Value {
    let res = client
        .get(format!("http://{}/api/meta", addr))
        .send()
        .await
        .expect("server unreachable");
    assert_eq!(res.status(), 200);
    assert_eq!(res.headers()["content-type"], "application/json");
    res.json().await.unwrap()
}

fn titles(meta: &Value) -> Vec<&str> {
    meta.as_array()
        .unwrap()
        .iter()
        .map(|r| r["Title"].as_str().unwrap())
        .collect()
}

#[tokio::test]
async fn test_serves_filtered_catalog_and_keeps_stale_on_failure() {
    let (store_addr, store) = common::start_mock_store("OK").await;
    store.set_songs(&[
        ("Song A", "Album", "Artist", "Rock"),
        ("No Album", "", "Artist", "Pop"),
        ("Song B", "Album", "Artist", ""),
    ]);

    let shutdown = Shutdown::new();
    let settings = common::settings_for(store_addr);
    let service = start_cache(&settings, &shutdown).await.unwrap();

    assert_eq!(
        store.registered.lock().unwrap().clone(),
        Some(serde_json::to_value(SearchQuery::audio_files()).unwrap())
    );
    assert_eq!(
        service.config.search_root.as_str(),
        format!("http://{}/my-search/", store_addr)
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = HttpServer::new(service.cache.clone(), settings.assets.as_deref());
    let server_shutdown = shutdown.subscribe();
    let serving = tokio::spawn(async move { server.run(listener, server_shutdown).await });

    let client = reqwest::Client::builder().no_proxy().build().unwrap();
    let meta = fetch_meta(&client, addr).await;
    assert_eq!(
        meta,
        json!([
            {
                "BlobRef": common::blob_ref(1),
                "Artist": "Artist",
                "Title": "Song A",
                "Album": "Album",
                "Genre": "Rock",
                "MediaType": "audio/mpeg"
            },
            {
                "BlobRef": common::blob_ref(3),
                "Artist": "Artist",
                "Title": "Song B",
                "Album": "Album",
                "Genre": "",
                "MediaType": "audio/mpeg"
            }
        ])
    );

    // reading never triggers a search
    let hits = store.query_hits.load(Ordering::SeqCst);
    fetch_meta(&client, addr).await;
    assert_eq!(store.query_hits.load(Ordering::SeqCst), hits);

    store.set_songs(&[("Song C", "Album", "Artist", "Jazz")]);
    service.cache.refresh_once().await.unwrap();
    assert_eq!(titles(&fetch_meta(&client, addr).await), vec!["Song C"]);

    store.fail_queries.store(true, Ordering::SeqCst);
    let err = service.cache.refresh_once().await.unwrap_err();
    assert!(matches!(err, CacheError::Search(_)));
    assert_eq!(titles(&fetch_meta(&client, addr).await), vec!["Song C"]);

    shutdown.trigger();
    serving.await.unwrap().unwrap();
    tokio::time::timeout(Duration::from_secs(5), service.refresher)
        .await
        .expect("refresh loop should stop on shutdown")
        .unwrap();
}

#[tokio::test]
async fn test_rejected_registration_aborts_before_any_refresh() {
    let (store_addr, store) = common::start_mock_store("error setting master query").await;
    store.set_songs(&[("Song A", "Album", "Artist", "Rock")]);

    let shutdown = Shutdown::new();
    let result = start_cache(&common::settings_for(store_addr), &shutdown).await;

    assert!(matches!(
        result,
        Err(StartupError::Registration(CacheError::Registration(_)))
    ));
    assert_eq!(store.query_hits.load(Ordering::SeqCst), 0);
    assert_eq!(shutdown.receiver_count(), 0, "no refresh loop may be scheduled");
}

#[tokio::test]
async fn test_failed_initial_refresh_is_fatal() {
    let (store_addr, store) = common::start_mock_store("OK").await;
    store.fail_queries.store(true, Ordering::SeqCst);

    let shutdown = Shutdown::new();
    let result = start_cache(&common::settings_for(store_addr), &shutdown).await;

    assert!(matches!(result, Err(StartupError::InitialRefresh(_))));
    assert_eq!(store.query_hits.load(Ordering::SeqCst), 1);
    assert_eq!(shutdown.receiver_count(), 0);
}

#[tokio::test]
async fn test_background_loop_picks_up_changes() {
    let (store_addr, store) = common::start_mock_store("OK").await;
    store.set_songs(&[("Before", "Album", "Artist", "")]);

    let shutdown = Shutdown::new();
    let settings = audio_player::config::Settings {
        refresh_interval_secs: 1,
        ..common::settings_for(store_addr)
    };
    let service = start_cache(&settings, &shutdown).await.unwrap();
    assert_eq!(service.cache.snapshot().records[0].title, "Before");

    store.set_songs(&[("After", "Album", "Artist", "")]);
    let mut refreshed = false;
    for _ in 0..30 {
        tokio::time::sleep(Duration::from_millis(100)).await;
        if service.cache.snapshot().generation > 1 {
            refreshed = true;
            break;
        }
    }
    assert!(refreshed, "background loop did not refresh within 3s");
    assert_eq!(service.cache.snapshot().records[0].title, "After");

    shutdown.trigger();
    service.refresher.await.unwrap();
}
