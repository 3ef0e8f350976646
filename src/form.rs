use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::threat::ThreatClient;
use crate::types::CheckReply;

type SubmitCallback = Box<dyn Fn(&CheckReply) + Send + Sync>;

/// Last reply written by the form; read by whatever renders it.
///
/// Concurrent submissions are last-completion-wins, not last-submission-wins.
#[derive(Clone, Default)]
pub struct DisplaySlot {
    inner: Arc<RwLock<Option<CheckReply>>>,
}

impl DisplaySlot {
    pub async fn get(&self) -> Option<CheckReply> {
        self.inner.read().await.clone()
    }

    async fn set(&self, reply: CheckReply) {
        *self.inner.write().await = Some(reply);
    }
}

/// The reply for blank input, or `None` when the input needs a lookup.
pub fn prompt_for(url: &str) -> Option<CheckReply> {
    url.trim().is_empty().then(CheckReply::prompt)
}

/// The URL-check form: one input, one submit action, one output slot.
pub struct UrlCheckForm {
    client: ThreatClient,
    slot: DisplaySlot,
    callbacks: Vec<SubmitCallback>,
}

impl UrlCheckForm {
    pub fn new(client: ThreatClient) -> Self {
        Self {
            client,
            slot: DisplaySlot::default(),
            callbacks: Vec::new(),
        }
    }

    /// Register a handler run after every submission, once the slot holds the new reply.
    pub fn on_submit<F>(&mut self, callback: F)
    where
        F: Fn(&CheckReply) + Send + Sync + 'static,
    {
        self.callbacks.push(Box::new(callback));
    }

    pub fn slot(&self) -> DisplaySlot {
        self.slot.clone()
    }

    pub async fn display(&self) -> Option<CheckReply> {
        self.slot.get().await
    }

    pub async fn submit(&self, url: &str) -> CheckReply {
        let url = url.trim();
        let reply = match prompt_for(url) {
            Some(prompt) => prompt,
            None => match self.client.lookup(url).await {
                Ok(resp) => {
                    let outcome = resp.outcome();
                    info!(?outcome, "url checked");
                    CheckReply::verdict(url, outcome, resp.threat_types())
                }
                Err(e) => {
                    warn!(error = %e, "url check failed");
                    CheckReply::failed(url)
                }
            },
        };

        self.slot.set(reply.clone()).await;
        for cb in &self.callbacks {
            cb(&reply);
        }
        reply
    }
}
