// 进程内广播器：单协调进程模型下唯一的事件通道实现。
// 组成员关系保存在各连接自己的订阅集合里，进程重启后由
// 客户端重新订阅重建，从不落盘。
use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::broadcaster::{BroadcastError, EventBroadcast, EventBroadcaster};

#[derive(Clone)]
pub struct LocalEventBroadcaster {
    sender: broadcast::Sender<EventBroadcast>,
}

impl LocalEventBroadcaster {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<EventBroadcast> {
        self.sender.subscribe()
    }
}

impl Default for LocalEventBroadcaster {
    fn default() -> Self {
        Self::new(256)
    }
}

#[async_trait]
impl EventBroadcaster for LocalEventBroadcaster {
    async fn publish(&self, broadcast: EventBroadcast) -> Result<(), BroadcastError> {
        // 没有任何订阅者时 send 会失败；对调用方来说这等价于
        // "当前组里没有连接"，由上层按尽力而为语义吞掉。
        self.sender
            .send(broadcast)
            .map_err(|err| BroadcastError::failed(err.to_string()))?;
        Ok(())
    }
}
