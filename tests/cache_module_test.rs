// 缓存模块集成测试
//
// 使用进程内的 axum 服务作为远端媒体源，验证完整的缓存流程和 HTTP 接口

use axum::{
    body::Body,
    http::{Request, StatusCode},
    routing::get,
    Router,
};
use network_media_cache::api::{self, AppState};
use network_media_cache::services::cache::{
    CacheConfig, CacheError, ConfigManager, DirectoryResolver, HttpFetchClient, KeyCodec,
    LottieCache, MediaAsset, MediaCache, MediaCacheEngine, MediaKind, Namespace,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

/// 远端媒体源，记录请求次数
struct Origin {
    base: String,
    hits: Arc<AtomicUsize>,
}

impl Origin {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

async fn spawn_origin() -> Origin {
    let hits = Arc::new(AtomicUsize::new(0));

    let counter = hits.clone();
    let png = move || {
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            vec![1u8, 2, 3]
        }
    };

    let counter = hits.clone();
    let anim = move || {
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            r#"{"v":"5.7.4","layers":[]}"#
        }
    };

    let counter = hits.clone();
    let missing = move || {
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            StatusCode::NOT_FOUND
        }
    };

    let app = Router::new()
        .route("/a.png", get(png))
        .route("/anim.json", get(anim))
        .route("/missing.png", get(missing));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    Origin {
        base: format!("http://{}", addr),
        hits,
    }
}

fn create_engine(temp_dir: &TempDir) -> MediaCacheEngine {
    MediaCacheEngine::new(
        Some(temp_dir.path().to_path_buf()),
        DirectoryResolver::default(),
        Arc::new(HttpFetchClient::new()),
    )
}

#[tokio::test]
async fn test_empty_cache_then_hit_without_network() {
    let origin = spawn_origin().await;
    let temp_dir = TempDir::new().unwrap();
    let engine = create_engine(&temp_dir);
    let url = origin.url("/a.png");

    assert_eq!(engine.fetch_media(&url).await.unwrap(), vec![1, 2, 3]);
    assert_eq!(origin.hits(), 1);

    assert_eq!(engine.fetch_media(&url).await.unwrap(), vec![1, 2, 3]);
    assert_eq!(origin.hits(), 1);

    let key = KeyCodec::derive_key(&url, Namespace::Primary);
    let stored = std::fs::read(temp_dir.path().join(format!("{}.cache", key))).unwrap();
    assert_eq!(stored, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_cache_survives_new_engine_instance() {
    let origin = spawn_origin().await;
    let temp_dir = TempDir::new().unwrap();
    let url = origin.url("/a.png");

    create_engine(&temp_dir).fetch_media(&url).await.unwrap();
    // 新实例（相当于进程重启）直接命中磁盘缓存
    create_engine(&temp_dir).fetch_media(&url).await.unwrap();

    assert_eq!(origin.hits(), 1);
}

#[tokio::test]
async fn test_404_propagates_and_writes_nothing() {
    let origin = spawn_origin().await;
    let temp_dir = TempDir::new().unwrap();
    let engine = create_engine(&temp_dir);

    let err = engine.fetch_media(&origin.url("/missing.png")).await.unwrap_err();

    assert!(matches!(err, CacheError::Fetch(_)));
    assert_eq!(err.status_code(), Some(404));
    assert_eq!(std::fs::read_dir(temp_dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_lottie_file_scenario() {
    let origin = spawn_origin().await;
    let temp_dir = TempDir::new().unwrap();
    let cache = LottieCache::new(
        Some(temp_dir.path().to_path_buf()),
        DirectoryResolver::default(),
        Arc::new(HttpFetchClient::new()),
    );
    let url = origin.url("/anim.json");

    let path = cache.fetch_lottie_file(&url).await.unwrap();

    let expected = temp_dir
        .path()
        .join("lottie")
        .join(format!("{}.json", KeyCodec::sanitize(&url)));
    assert_eq!(path, expected);
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        r#"{"v":"5.7.4","layers":[]}"#
    );

    assert_eq!(cache.fetch_lottie_file(&url).await.unwrap(), path);
    assert_eq!(origin.hits(), 1);
}

#[tokio::test]
async fn test_media_cache_from_config() {
    let origin = spawn_origin().await;
    let temp_dir = TempDir::new().unwrap();
    let config = CacheConfig {
        cache_dir: Some(temp_dir.path().to_path_buf()),
        ..CacheConfig::default()
    };
    let cache = MediaCache::from_config(&config);

    let image = cache.fetch(MediaKind::Image, &origin.url("/a.png")).await.unwrap();
    assert_eq!(image, MediaAsset::Bytes(vec![1, 2, 3]));

    let lottie = cache.fetch(MediaKind::Lottie, &origin.url("/anim.json")).await.unwrap();
    assert!(matches!(lottie, MediaAsset::File(path) if path.is_file()));

    let stats = cache.stats().await.unwrap();
    assert_eq!(stats.primary.entries, 1);
    assert_eq!(stats.lottie.entries, 1);
}

// ---- HTTP 接口 ----

async fn create_app(temp_dir: &TempDir) -> Router {
    let config_manager = ConfigManager::load_with_cache_dir(
        Some(temp_dir.path().join("cache_config.json")),
        Some(temp_dir.path().join("media").to_string_lossy().into_owned()),
    )
    .await
    .unwrap();
    let config = config_manager.get_config().await;

    api::router(AppState {
        media_cache: Arc::new(MediaCache::from_config(&config)),
        config_manager: Arc::new(config_manager),
    })
}

fn encode(url: &str) -> String {
    url::form_urlencoded::byte_serialize(url.as_bytes()).collect()
}

async fn send(app: &Router, method: &str, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body.to_vec())
}

#[tokio::test]
async fn test_api_get_media_bytes() {
    let origin = spawn_origin().await;
    let temp_dir = TempDir::new().unwrap();
    let app = create_app(&temp_dir).await;
    let uri = format!("/api/media?url={}", encode(&origin.url("/a.png")));

    let (status, body) = send(&app, "GET", &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, vec![1, 2, 3]);

    let (status, _) = send(&app, "GET", &uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(origin.hits(), 1);

    let (status, _) = send(&app, "DELETE", &uri).await;
    assert_eq!(status, StatusCode::OK);

    send(&app, "GET", &uri).await;
    assert_eq!(origin.hits(), 2);
}

#[tokio::test]
async fn test_api_get_lottie_path() {
    let origin = spawn_origin().await;
    let temp_dir = TempDir::new().unwrap();
    let app = create_app(&temp_dir).await;
    let uri = format!("/api/lottie?url={}", encode(&origin.url("/anim.json")));

    let (status, body) = send(&app, "GET", &uri).await;
    assert_eq!(status, StatusCode::OK);

    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["success"], true);
    let path = json["data"]["path"].as_str().unwrap();
    assert!(path.ends_with(".json"));
    assert!(std::path::Path::new(path).starts_with(temp_dir.path().join("media").join("lottie")));
}

#[tokio::test]
async fn test_api_upstream_404_is_bad_gateway() {
    let origin = spawn_origin().await;
    let temp_dir = TempDir::new().unwrap();
    let app = create_app(&temp_dir).await;
    let uri = format!("/api/media?url={}", encode(&origin.url("/missing.png")));

    let (status, body) = send(&app, "GET", &uri).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["success"], false);
    assert_eq!(json["error"]["type"], "external_service_error");
}

#[tokio::test]
async fn test_api_rejects_invalid_input() {
    let temp_dir = TempDir::new().unwrap();
    let app = create_app(&temp_dir).await;

    let uri = format!("/api/media?url={}", encode("file:///etc/passwd"));
    let (status, _) = send(&app, "GET", &uri).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let uri = format!("/api/media?url={}&kind=video", encode("https://x/a.png"));
    let (status, _) = send(&app, "GET", &uri).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_api_stats_and_config() {
    let origin = spawn_origin().await;
    let temp_dir = TempDir::new().unwrap();
    let app = create_app(&temp_dir).await;

    send(&app, "GET", &format!("/api/media?url={}", encode(&origin.url("/a.png")))).await;

    let (status, body) = send(&app, "GET", "/api/cache/stats").await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["data"]["primary"]["entries"], 1);
    assert_eq!(json["data"]["primary"]["total_bytes"], 3);

    let (status, body) = send(&app, "GET", "/api/cache/config").await;
    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["data"]["image"]["cache_enabled"], true);

    let (status, _) = send(&app, "GET", "/api/health").await;
    assert_eq!(status, StatusCode::OK);
}
