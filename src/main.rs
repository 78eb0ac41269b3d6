//! 网络流量异常监控系统主入口

use netmon_system::{
    auth::password::PasswordHasher,
    config::AppConfig,
    db,
    handlers::health,
    models::user::{CreateUserRequest, Role},
    repository::UserRepository,
    routes, telemetry,
};
use secrecy::ExposeSecret;
use tokio::net::TcpListener;
use tokio::signal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ===== CLI 参数处理 =====
    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 {
        match args[1].as_str() {
            "--version" => {
                println!("netmon-system {}", env!("CARGO_PKG_VERSION"));
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
    // 按优先级加载：.env.local > .env.development > .env
    // 生产环境应该直接设置环境变量，不依赖 .env 文件
    if let Ok(path) = std::env::var("NETMON_ENV") {
        dotenv::from_filename(format!(".env.{}", path)).ok();
    } else {
        dotenv::from_filename(".env.local").ok();
        dotenv::from_filename(".env.development").ok();
        dotenv::dotenv().ok();
    }

    // 设置应用启动时间
    health::set_start_time();

    // 1. 加载配置
    let config = AppConfig::from_env().map_err(|e| {
        eprintln!("Configuration error: {}", e);
        anyhow::anyhow!("Failed to load configuration: {}", e)
    })?;

    // 2. 初始化日志
    telemetry::init_telemetry(&config);

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Netmon System starting...");

    // 3. 数据库连接池 + 迁移
    let db_pool = db::create_pool(&config.database).await?;
    db::run_migrations(&db_pool).await?;

    tracing::info!("Database initialized");

    // 4. 首次启动时创建引导管理员
    seed_bootstrap_admin(&config, &db_pool).await?;

    // 5. 构建应用状态与路由
    let app_state = routes::build_state(config.clone(), db_pool.clone());

    // 定期清理过期会话
    let sessions = app_state.sessions.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(tokio::time::Duration::from_secs(300));
        loop {
            interval.tick().await;
            let purged = sessions.purge_expired();
            if purged > 0 {
                tracing::debug!(purged, "Purged expired sessions");
            }
        }
    });

    let app = routes::create_router(app_state);

    // 6. 启动服务器
    let addr = &config.server.addr;
    let listener = TcpListener::bind(addr).await?;

    tracing::info!(
        addr = %addr,
        "Server listening"
    );

    // 7. 优雅关闭
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(config.server.graceful_shutdown_timeout_secs))
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// 用户表为空时创建引导管理员，之后的管理员由现有管理员创建
async fn seed_bootstrap_admin(config: &AppConfig, db: &sqlx::PgPool) -> anyhow::Result<()> {
    let user_repo = UserRepository::new(db.clone());

    if user_repo.count().await? > 0 {
        return Ok(());
    }

    let Some(password) = &config.bootstrap.admin_password else {
        tracing::warn!(
            "No users exist and NETMON_BOOTSTRAP__ADMIN_PASSWORD is not set; \
             no admin account will be created"
        );
        return Ok(());
    };

    let hasher = PasswordHasher::new();
    let password_hash = hasher.hash(password.expose_secret())?;

    let req = CreateUserRequest {
        username: config.bootstrap.admin_username.clone(),
        password: password.expose_secret().clone(),
        email: None,
        first_name: None,
        last_name: None,
        role: Some(Role::Admin),
    };

    let user = user_repo.create(&req, &password_hash, Role::Admin).await?;

    tracing::info!(
        user_id = %user.id,
        username = %user.username,
        "Bootstrap admin account created"
    );

    Ok(())
}

/// 优雅关闭信号处理
async fn shutdown_signal(timeout_secs: u64) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
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

    // 超时后强制关闭
    tokio::time::sleep(tokio::time::Duration::from_secs(timeout_secs)).await;
    tracing::warn!("Graceful shutdown timeout reached, forcing exit");
}

/// 打印帮助信息
fn print_help() {
    println!("netmon-system {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("用法: netmon-system [选项]");
    println!();
    println!("选项:");
    println!("  --version     打印版本信息并退出");
    println!("  --help        打印此帮助信息并退出");
    println!();
    println!("环境变量:");
    println!("  所有配置通过环境变量完成，前缀为 NETMON_");
    println!("  可用选项请参考 .env.example");
}
