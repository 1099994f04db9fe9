//! 集成测试公共支撑：基于内存仓储组装完整路由，并在随机端口上启动服务。

use std::{net::SocketAddr, sync::Arc, time::Duration};

use application::{
    services::{
        MessageService, MessageServiceDependencies, OfficerService, OfficerServiceDependencies,
        QueueService, QueueServiceDependencies,
    },
    Clock, EventBroadcaster, LocalEventBroadcaster, MemoryChatRepository,
    MemoryMessageRepository, MemoryOfficerRepository, SystemClock,
};
use axum::Router;
use tokio::{net::TcpListener, sync::oneshot, time::sleep};

use web_api::{router, AppState};

pub fn build_router() -> Router {
    let officer_repository = Arc::new(MemoryOfficerRepository::new());
    let chat_repository = Arc::new(MemoryChatRepository::new());
    let message_repository = Arc::new(MemoryMessageRepository::new());

    let clock: Arc<dyn Clock> = Arc::new(SystemClock::default());
    let broadcaster = Arc::new(LocalEventBroadcaster::default());

    let officer_service = Arc::new(OfficerService::new(OfficerServiceDependencies {
        officer_repository: officer_repository.clone(),
        clock: clock.clone(),
    }));

    let queue_service = Arc::new(QueueService::new(QueueServiceDependencies {
        chat_repository: chat_repository.clone(),
        officer_repository: officer_repository.clone(),
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
    router(state)
}

/// 启动一个独立的测试服务实例，返回监听地址与关闭句柄。
pub struct TestServer {
    pub addr: SocketAddr,
    _shutdown: oneshot::Sender<()>,
}

impl TestServer {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }
}

pub async fn spawn_server() -> TestServer {
    let app = build_router();
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        axum::serve(listener, app.into_make_service())
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
            .ok();
    });

    // 等待服务就绪
    sleep(Duration::from_millis(50)).await;

    TestServer {
        addr,
        _shutdown: shutdown_tx,
    }
}
