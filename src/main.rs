use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use network_media_cache::api;
use network_media_cache::services::cache::{ConfigManager, MediaCache};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load environment variables
    dotenv::dotenv().ok();

    // Load cache configuration
    let config_path = std::env::var("CACHE_CONFIG_PATH").ok().map(PathBuf::from);
    let config_manager = Arc::new(ConfigManager::load(config_path).await?);
    let config = config_manager.get_config().await;

    // 缓存目录在第一次请求时才会解析和创建
    let media_cache = Arc::new(MediaCache::from_config(&config));

    let app = api::router(api::AppState {
        media_cache,
        config_manager,
    });

    let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse()
        .unwrap_or(3000);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    tracing::info!("🚀 Media cache listening on {}", addr);
    match &config.cache_dir {
        Some(dir) => tracing::info!("📁 Cache directory: {:?}", dir),
        None => tracing::info!("📁 Cache directory: platform temp dir"),
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
