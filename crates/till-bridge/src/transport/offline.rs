//! Transport for processes without a native host

use super::{CommandTransport, EventHandler, EventTransport, Unlisten};
use crate::error::TransportError;
use async_trait::async_trait;
use serde_json::Value;

/// Rejects every command and subscription with [`TransportError::Unavailable`]
#[derive(Debug, Clone)]
pub struct OfflineTransport {
    reason: String,
}

impl OfflineTransport {
    /// Create with the reason reported in every error
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl CommandTransport for OfflineTransport {
    async fn invoke(&self, command: &str, _payload: Option<Value>) -> Result<Value, TransportError> {
        tracing::debug!(command, "offline transport rejected command");
        Err(TransportError::Unavailable(self.reason.clone()))
    }
}

#[async_trait]
impl EventTransport for OfflineTransport {
    async fn listen(&self, event: &str, _handler: EventHandler) -> Result<Unlisten, TransportError> {
        tracing::debug!(event, "offline transport rejected listen");
        Err(TransportError::Unavailable(self.reason.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn offline_rejects_commands_and_listens() {
        let transport = OfflineTransport::new("headless");
        let err = transport.invoke("order_get_all", None).await.unwrap_err();
        assert_eq!(err, TransportError::Unavailable("headless".to_string()));

        let handler: EventHandler = Arc::new(|_| {});
        assert!(transport.listen("order_created", handler).await.is_err());
    }
}
