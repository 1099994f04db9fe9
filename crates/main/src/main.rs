//! 主应用程序入口
//!
//! 组装仓储、服务与广播器，启动 Axum Web API 服务。

use std::sync::Arc;

use application::{
    services::{
        MessageService, MessageServiceDependencies, OfficerService, OfficerServiceDependencies,
        QueueService, QueueServiceDependencies,
    },
    Clock, EventBroadcaster, LocalEventBroadcaster, SystemClock,
};
use config::AppConfig;
use infrastructure::{create_pg_pool, PgChatRepository, PgMessageRepository, PgOfficerRepository};
use tracing_subscriber::EnvFilter;
use web_api::{router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = AppConfig::from_env_with_defaults();

    tracing::info!(
        "连接数据库: {}",
        config.database.url.split('@').next_back().unwrap_or("unknown")
    );

    let pg_pool = create_pg_pool(&config.database.url, config.database.max_connections).await?;

    // 运行迁移
    sqlx::migrate!("../../migrations").run(&pg_pool).await?;

    let officer_repository = Arc::new(PgOfficerRepository::new(pg_pool.clone()));
    let chat_repository = Arc::new(PgChatRepository::new(pg_pool.clone()));
    let message_repository = Arc::new(PgMessageRepository::new(pg_pool));

    let clock: Arc<dyn Clock> = Arc::new(SystemClock::default());
    let broadcaster = Arc::new(LocalEventBroadcaster::new(config.broadcast.capacity));

    let officer_service = Arc::new(OfficerService::new(OfficerServiceDependencies {
        officer_repository: officer_repository.clone(),
        clock: clock.clone(),
    }));

    let queue_service = Arc::new(QueueService::new(QueueServiceDependencies {
        chat_repository: chat_repository.clone(),
        officer_repository,
        clock: clock.clone(),
        broadcaster: broadcaster.clone() as Arc<dyn EventBroadcaster>,
    }));

    let message_service = Arc::new(MessageService::new(MessageServiceDependencies {
        chat_repository,
        message_repository,
        clock,
        broadcaster: broadcaster.clone() as Arc<dyn EventBroadcaster>,
    }));

    let state = AppState::new(officer_service, queue_service, message_service, broadcaster);

    let app = router(state);
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("客服系统服务器启动在 http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
