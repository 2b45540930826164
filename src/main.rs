//! 商品目录服务主入口

use catalog_api::{
    config::AppConfig,
    db,
    handlers::health,
    middleware::AppState,
    repository::{
        InMemoryProductRepository, InMemoryUserRepository, ProductRepository, ProductStore,
        UserRepository, UserStore,
    },
    routes, telemetry,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::signal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ===== CLI 参数处理 =====
    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 {
        match args[1].as_str() {
            "--version" => {
                println!("catalog-api {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "--help" => {
                print_help();
                return Ok(());
            }
            _ => {
                eprintln!("未知参数: {}", args[1]);
                print_help();
                std::process::exit(1);
            }
        }
    }

    // 加载 .env 文件（开发环境）
    // 生产环境应该直接设置环境变量
    if let Ok(env) = std::env::var("CATALOG_ENV") {
        dotenv::from_filename(format!(".env.{}", env)).ok();
    } else {
        dotenv::from_filename(".env.local").ok();
        dotenv::dotenv().ok();
    }

    health::set_start_time();

    // 1. 加载配置
    let config = AppConfig::from_env().map_err(|e| {
        eprintln!("Configuration error: {}", e);
        anyhow::anyhow!("Failed to load configuration: {}", e)
    })?;

    // 2. 初始化日志
    telemetry::init_telemetry(&config.logging)?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Catalog API starting...");

    // 3. 选择存储后端
    let (user_store, product_store): (Arc<dyn UserStore>, Arc<dyn ProductStore>) =
        if config.database.url.is_some() {
            let db_pool = db::connect(&config.database).await?;
            (
                Arc::new(UserRepository::new(db_pool.clone())),
                Arc::new(ProductRepository::new(db_pool)),
            )
        } else {
            tracing::warn!("database.url not set, using in-memory storage; data is lost on exit");
            (
                Arc::new(InMemoryUserRepository::new()),
                Arc::new(InMemoryProductRepository::new()),
            )
        };

    // 4. 构建应用状态与路由
    let app_state = Arc::new(AppState::new(config.clone(), user_store, product_store)?);
    let app = routes::create_router(app_state);

    // 5. 启动服务器
    let addr = &config.server.addr;
    let listener = TcpListener::bind(addr).await?;

    tracing::info!(addr = %addr, "Server listening");

    // 6. 优雅关闭
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(config.server.graceful_shutdown_timeout_secs))
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// 优雅关闭信号处理
/// 收到信号后开始排空连接，超时后强制退出
async fn shutdown_signal(timeout_secs: u64) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Ctrl+C received, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Terminate signal received, starting graceful shutdown");
        },
    }

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(timeout_secs)).await;
        tracing::warn!("Graceful shutdown timeout reached, forcing exit");
        std::process::exit(1);
    });
}

/// 打印帮助信息
fn print_help() {
    println!("catalog-api {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("用法: catalog-api [选项]");
    println!();
    println!("选项:");
    println!("  --version     打印版本信息并退出");
    println!("  --help        打印此帮助信息并退出");
    println!();
    println!("环境变量 (前缀 CATALOG_，层级分隔符 __):");
    println!("  CATALOG_SECURITY__JWT_SECRET   JWT 签名密钥（必填，至少 32 字符）");
    println!("  CATALOG_DATABASE__URL          PostgreSQL 连接串（可选，缺省使用内存存储）");
    println!("  CATALOG_SERVER__ADDR           监听地址（默认 0.0.0.0:3000）");
    println!("  CATALOG_LOGGING__LEVEL         日志级别（默认 info）");
}
