//! Integration tests for the image layer.
//!
//! These tests exercise the real HTTP/file fetcher against images on disk:
//! - Question bank → resolved keys → sequential preload
//! - Partial failure handling (missing files)
//! - Inline base64 images stored in a bank
//! - Offline fast-fail, look-ahead and eviction through `ImageLayer`
//!
//! Run with: `cargo test --test image_layer_integration`

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::{ImageFormat, RgbImage};
use parking_lot::Mutex;

use eoeguess::app::{ImageLayer, LayerConfig};
use eoeguess::bank::QuestionBank;
use eoeguess::preload::{PreloadProgress, ProgressCallback};

// ============================================================================
// Helper Functions
// ============================================================================

/// Write a PNG of the given size under `dir/images/`.
fn write_png(dir: &Path, name: &str, width: u32, height: u32) {
    let images = dir.join("images");
    fs::create_dir_all(&images).unwrap();
    RgbImage::new(width, height)
        .save_with_format(images.join(name), ImageFormat::Png)
        .unwrap();
}

/// Write a bank whose image fields use Windows-style relative paths.
fn write_bank(dir: &Path) -> QuestionBank {
    let json = r#"{
        "id": 1718000000000,
        "name": "Integration",
        "author": "tests",
        "questions": [
            { "image": "images\\q1.png", "question": "first", "answer": "1" },
            { "image": "images\\missing.png", "question": "second", "answer": "2" },
            { "image": "", "question": "no picture", "answer": "3" },
            { "image": "images\\q3.png", "question": "third", "answer": "4" }
        ]
    }"#;
    let path = dir.join("bank.json");
    fs::write(&path, json).unwrap();
    QuestionBank::load(&path).unwrap()
}

/// Config that fails fast: no retries, tiny delay.
fn fast_config() -> LayerConfig {
    LayerConfig::default()
        .with_max_retries(Some(0))
        .with_retry_delay(Duration::from_millis(1))
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_bank_preload_with_partial_failure() {
    let dir = tempfile::tempdir().unwrap();
    write_png(dir.path(), "q1.png", 8, 6);
    write_png(dir.path(), "q3.png", 3, 9);
    let bank = write_bank(dir.path());

    let keys = bank.source_keys(Some(dir.path()));
    assert_eq!(keys.len(), 3);
    assert!(keys.iter().all(|k| !k.contains('\\')));

    let layer = ImageLayer::start_http(fast_config()).await.unwrap();

    let events = Arc::new(Mutex::new(Vec::<PreloadProgress>::new()));
    let sink = Arc::clone(&events);
    let on_progress: ProgressCallback = Box::new(move |p| sink.lock().push(p));

    let summary = layer
        .preloader()
        .preload_sequential(&keys, Some(on_progress.as_ref()))
        .await;

    assert_eq!(summary.total, 3);
    assert_eq!(summary.succeeded, 2);
    assert_eq!(summary.failed, 1);

    let loaded: Vec<usize> = events.lock().iter().map(|p| p.loaded).collect();
    assert_eq!(loaded, vec![1, 2, 3]);

    let first = layer.cache().get(&keys[0]).expect("q1 cached");
    assert_eq!(first.dimensions(), (8, 6));
    assert_eq!(first.format(), Some(ImageFormat::Png));

    let third = layer.cache().get(&keys[2]).expect("q3 cached");
    assert_eq!(third.dimensions(), (3, 9));

    assert!(layer.loader().is_loaded(&keys[0]));
    assert!(!layer.loader().is_loaded(&keys[1]));
    assert!(layer.loader().is_loaded(&keys[2]));

    let snapshot = layer.metrics().snapshot();
    assert_eq!(snapshot.successes, 2);
    assert_eq!(snapshot.failures, 1);

    layer.shutdown().await;
}

#[tokio::test]
async fn test_bank_with_inline_images() {
    let dir = tempfile::tempdir().unwrap();
    write_png(dir.path(), "q1.png", 6, 2);
    let png = fs::read(dir.path().join("images").join("q1.png")).unwrap();
    let encoded = STANDARD.encode(&png);

    let json = format!(
        r#"{{
            "name": "Inline",
            "questions": [
                {{ "image": "data:image/png;base64,{encoded}", "answer": "web" }},
                {{ "image": "{encoded}", "answer": "desktop" }}
            ]
        }}"#
    );
    let path = dir.path().join("inline.json");
    fs::write(&path, json).unwrap();
    let bank = QuestionBank::load(&path).unwrap();

    let keys = bank.source_keys(Some(dir.path()));
    assert_eq!(keys[1], encoded);

    let layer = ImageLayer::start_http(fast_config()).await.unwrap();
    let summary = layer.preloader().preload_sequential(&keys, None).await;
    assert_eq!(summary.succeeded, 2);

    for key in &keys {
        assert_eq!(layer.cache().get(key).expect("inline cached").dimensions(), (6, 2));
    }

    layer.shutdown().await;
}

#[tokio::test]
async fn test_parallel_preload_loads_everything() {
    let dir = tempfile::tempdir().unwrap();
    for i in 0..5 {
        write_png(dir.path(), &format!("p{i}.png"), 4 + i, 4);
    }
    let keys: Vec<String> = (0..5)
        .map(|i| {
            dir.path()
                .join("images")
                .join(format!("p{i}.png"))
                .to_string_lossy()
                .to_string()
        })
        .collect();

    let layer = ImageLayer::start_http(fast_config()).await.unwrap();
    let summary = layer.preloader().preload_parallel(&keys, None).await;

    assert!(summary.all_succeeded());
    assert_eq!(layer.cache().len(), 5);
    assert_eq!(layer.loader().loaded_count(), 5);

    layer.shutdown().await;
}

#[tokio::test]
async fn test_offline_layer_fails_without_fetching() {
    let dir = tempfile::tempdir().unwrap();
    write_png(dir.path(), "q1.png", 2, 2);
    write_png(dir.path(), "q3.png", 2, 2);
    let bank = write_bank(dir.path());
    let keys = bank.source_keys(Some(dir.path()));

    let layer = ImageLayer::start_http(fast_config().with_online(false))
        .await
        .unwrap();
    let summary = layer.preloader().preload_sequential(&keys, None).await;

    assert_eq!(summary.failed, 3);
    let snapshot = layer.metrics().snapshot();
    assert_eq!(snapshot.connectivity_failures, 3);
    assert_eq!(snapshot.attempts, 0);
    assert!(layer.cache().is_empty());

    layer.shutdown().await;
}

#[tokio::test]
async fn test_look_ahead_during_play() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["a.png", "b.png", "c.png", "d.png"] {
        write_png(dir.path(), name, 2, 2);
    }
    let keys: Vec<String> = ["a.png", "b.png", "c.png", "d.png"]
        .iter()
        .map(|name| dir.path().join("images").join(name).to_string_lossy().to_string())
        .collect();

    let layer = ImageLayer::start_http(fast_config().with_look_ahead(2))
        .await
        .unwrap();

    let summary = layer.preloader().look_ahead(&keys, 0).await;
    assert_eq!(summary.succeeded, 2);

    assert!(!layer.cache().has(&keys[0]));
    assert!(layer.cache().has(&keys[1]));
    assert!(layer.cache().has(&keys[2]));
    assert!(!layer.cache().has(&keys[3]));

    layer.shutdown().await;
}

#[tokio::test]
async fn test_eviction_keeps_loaded_history() {
    let dir = tempfile::tempdir().unwrap();
    write_png(dir.path(), "first.png", 2, 2);
    write_png(dir.path(), "second.png", 2, 2);
    let first = dir.path().join("images/first.png").to_string_lossy().to_string();
    let second = dir.path().join("images/second.png").to_string_lossy().to_string();

    let layer = ImageLayer::start_http(fast_config().with_cache_capacity(1))
        .await
        .unwrap();

    layer.loader().load(&first).await.unwrap();
    layer.loader().load(&second).await.unwrap();

    assert_eq!(layer.cache().keys(), vec![second.clone()]);
    assert!(layer.loader().is_loaded(&first));
    assert!(layer.loader().is_loaded(&second));
    assert_eq!(layer.cache().stats().evictions, 1);

    layer.shutdown().await;
}
