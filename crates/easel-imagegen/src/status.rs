use async_trait::async_trait;

/// Receiver of progress updates for one invocation
///
/// Updates are best effort; a sink that cannot deliver simply drops them.
#[async_trait]
pub trait StatusSink: Send + Sync {
    async fn update(&self, description: &str, done: bool);
}

/// Sink that only writes to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogStatus;

#[async_trait]
impl StatusSink for LogStatus {
    async fn update(&self, description: &str, done: bool) {
        tracing::info!(done, "{description}");
    }
}

/// Sink that discards every update
#[derive(Debug, Default, Clone, Copy)]
pub struct NoStatus;

#[async_trait]
impl StatusSink for NoStatus {
    async fn update(&self, _description: &str, _done: bool) {}
}
