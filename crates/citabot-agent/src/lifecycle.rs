// SPDX-FileCopyrightText: 2026 Citabot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bot engine lifecycle.
//!
//! [`BotEngine`] owns webhook registration, the conversation store, and
//! the readiness flag the webhook endpoint consults. It is also the
//! [`EngineControl`] the supervisor drives for recovery.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use citabot_core::{CitabotError, DeliveryEndpoint};
use tracing::{info, warn};

use crate::store::ConversationStore;
use crate::supervisor::EngineControl;

pub struct BotEngine {
    endpoint: Arc<dyn DeliveryEndpoint>,
    store: Arc<ConversationStore>,
    ready: Arc<AtomicBool>,
    /// Full webhook URL; `None` in polling mode.
    webhook_url: Option<String>,
    /// Pause between unregister and register, giving the platform time
    /// to drop the old binding.
    reregister_pause: Duration,
}

impl BotEngine {
    pub fn new(
        endpoint: Arc<dyn DeliveryEndpoint>,
        store: Arc<ConversationStore>,
        ready: Arc<AtomicBool>,
        webhook_url: Option<String>,
        reregister_pause: Duration,
    ) -> Self {
        Self {
            endpoint,
            store,
            ready,
            webhook_url,
            reregister_pause,
        }
    }

    /// Binds the webhook (push mode) and flips the readiness flag.
    pub async fn initialize(&self) -> Result<(), CitabotError> {
        if let Some(url) = self.webhook_url.as_deref() {
            self.endpoint.unregister(false).await?;
            tokio::time::sleep(self.reregister_pause).await;
            self.endpoint.register(url).await?;
            info!(%url, "webhook registered");
        }
        self.ready.store(true, Ordering::SeqCst);
        Ok(())
    }

    /// Stops accepting webhook traffic and unbinds the webhook.
    pub async fn teardown(&self) -> Result<(), CitabotError> {
        self.ready.store(false, Ordering::SeqCst);
        if self.webhook_url.is_some() {
            self.endpoint.unregister(false).await?;
            info!("webhook removed");
        }
        Ok(())
    }
}

#[async_trait]
impl EngineControl for BotEngine {
    async fn re_register(&self) -> Result<(), CitabotError> {
        let Some(url) = self.webhook_url.as_deref() else {
            return Ok(());
        };
        self.endpoint.unregister(false).await?;
        tokio::time::sleep(self.reregister_pause).await;
        self.endpoint.register(url).await?;
        info!(%url, "webhook re-registered");
        Ok(())
    }

    async fn reinitialize(&self) -> Result<(), CitabotError> {
        warn!("reinitializing bot engine");
        self.teardown().await?;
        tokio::time::sleep(self.reregister_pause).await;
        self.store.clear();
        self.initialize().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use citabot_core::ChatId;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingEndpoint {
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl DeliveryEndpoint for RecordingEndpoint {
        async fn register(&self, url: &str) -> Result<(), CitabotError> {
            self.calls
                .lock()
                .expect("lock")
                .push(format!("register {url}"));
            Ok(())
        }

        async fn unregister(&self, drop_pending: bool) -> Result<(), CitabotError> {
            self.calls
                .lock()
                .expect("lock")
                .push(format!("unregister {drop_pending}"));
            Ok(())
        }
    }

    fn engine(webhook_url: Option<&str>) -> (Arc<RecordingEndpoint>, Arc<AtomicBool>, BotEngine) {
        let endpoint = Arc::new(RecordingEndpoint::default());
        let ready = Arc::new(AtomicBool::new(false));
        let engine = BotEngine::new(
            endpoint.clone(),
            Arc::new(ConversationStore::new()),
            ready.clone(),
            webhook_url.map(String::from),
            Duration::from_millis(0),
        );
        (endpoint, ready, engine)
    }

    #[tokio::test]
    async fn initialize_unbinds_then_binds_and_sets_ready() {
        let (endpoint, ready, engine) = engine(Some("https://bot.example.com/webhook"));
        engine.initialize().await.expect("initialize");

        assert!(ready.load(Ordering::SeqCst));
        assert_eq!(
            endpoint.calls.lock().expect("lock").as_slice(),
            [
                "unregister false".to_string(),
                "register https://bot.example.com/webhook".to_string()
            ]
        );
    }

    #[tokio::test]
    async fn polling_mode_touches_no_webhook() {
        let (endpoint, ready, engine) = engine(None);
        engine.initialize().await.expect("initialize");
        engine.teardown().await.expect("teardown");
        engine.re_register().await.expect("re_register");

        assert!(!ready.load(Ordering::SeqCst));
        assert!(endpoint.calls.lock().expect("lock").is_empty());
    }

    #[tokio::test]
    async fn teardown_unsets_ready_before_unbinding() {
        let (_endpoint, ready, engine) = engine(Some("https://bot.example.com/webhook"));
        engine.initialize().await.expect("initialize");
        engine.teardown().await.expect("teardown");
        assert!(!ready.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn reinitialize_clears_conversations() {
        let endpoint = Arc::new(RecordingEndpoint::default());
        let store = Arc::new(ConversationStore::new());
        let engine = BotEngine::new(
            endpoint,
            store.clone(),
            Arc::new(AtomicBool::new(true)),
            Some("https://bot.example.com/webhook".into()),
            Duration::from_millis(0),
        );

        store.get_or_create(ChatId(1));
        store.get_or_create(ChatId(2));
        engine.reinitialize().await.expect("reinitialize");
        assert!(store.is_empty());
    }
}
