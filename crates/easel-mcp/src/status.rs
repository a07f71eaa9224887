use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use easel_imagegen::StatusSink;
use rmcp::{
    Peer, RoleServer,
    model::{LoggingLevel, LoggingMessageNotificationParam},
};

/// Level of every status notification
const STATUS_LEVEL: LoggingLevel = LoggingLevel::Info;

/// Minimum notification level requested by the client via `logging/setLevel`
///
/// Shared between the session's handler and the sinks it hands out.
#[derive(Debug, Clone)]
pub struct ClientLogLevel(Arc<RwLock<LoggingLevel>>);

impl Default for ClientLogLevel {
    fn default() -> Self {
        Self(Arc::new(RwLock::new(LoggingLevel::Info)))
    }
}

impl ClientLogLevel {
    pub fn get(&self) -> LoggingLevel {
        *self.0.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set(&self, level: LoggingLevel) {
        *self.0.write().unwrap_or_else(PoisonError::into_inner) = level;
    }

    /// Whether a notification at `level` should reach the client
    pub fn allows(&self, level: LoggingLevel) -> bool {
        severity(level) >= severity(self.get())
    }
}

/// Syslog ordering, least severe first
const fn severity(level: LoggingLevel) -> u8 {
    match level {
        LoggingLevel::Debug => 0,
        LoggingLevel::Info => 1,
        LoggingLevel::Notice => 2,
        LoggingLevel::Warning => 3,
        LoggingLevel::Error => 4,
        LoggingLevel::Critical => 5,
        LoggingLevel::Alert => 6,
        LoggingLevel::Emergency => 7,
    }
}

/// Forwards progress updates to the MCP client as logging notifications
pub struct PeerStatus {
    peer: Peer<RoleServer>,
    level: ClientLogLevel,
}

impl PeerStatus {
    pub const fn new(peer: Peer<RoleServer>, level: ClientLogLevel) -> Self {
        Self { peer, level }
    }
}

#[async_trait]
impl StatusSink for PeerStatus {
    async fn update(&self, description: &str, done: bool) {
        tracing::info!(done, "{description}");

        if !self.level.allows(STATUS_LEVEL) {
            return;
        }

        let param = LoggingMessageNotificationParam {
            level: STATUS_LEVEL,
            logger: Some("easel".to_string()),
            data: serde_json::json!({ "description": description, "done": done }),
        };

        if let Err(e) = self.peer.notify_logging_message(param).await {
            tracing::warn!(error = %e, "failed to deliver status update");
        }
    }
}
