#[cfg(test)]
#[path = "remote_test.rs"]
mod tests;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;
use serde_derive::Deserialize;

use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::models::Message;
use crate::domain::models::Thread;
use crate::domain::models::ThreadStore;

/// Stores have returned both a bare message array and an object wrapping
/// it, depending on version. Both shapes are accepted.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ThreadHistoryResponse {
    Wrapped { messages: Vec<Message> },
    Bare(Vec<Message>),
}

pub struct RemoteThreadStore {
    url: String,
}

impl Default for RemoteThreadStore {
    fn default() -> RemoteThreadStore {
        return RemoteThreadStore {
            url: Config::get(ConfigKey::StoreURL),
        };
    }
}

#[async_trait]
impl ThreadStore for RemoteThreadStore {
    #[allow(clippy::implicit_return)]
    async fn list_threads(&self) -> Result<Vec<Thread>> {
        let res = reqwest::Client::new()
            .get(format!("{url}/api/thread", url = self.url))
            .send()
            .await?;

        if !res.status().is_success() {
            tracing::error!(
                status = res.status().as_u16(),
                "Failed to fetch thread list"
            );
            bail!("Failed to fetch thread list");
        }

        let body = res.json::<serde_json::Value>().await?;
        if !body.is_array() {
            tracing::error!(body = ?body, "Thread list response is not an array");
            bail!("Thread list response is not an array");
        }

        let threads: Vec<Thread> = serde_json::from_value(body)?;
        tracing::debug!(count = threads.len(), "Fetched thread list");
        return Ok(threads);
    }

    #[allow(clippy::implicit_return)]
    async fn get_thread(&self, thread_id: &str) -> Result<Vec<Message>> {
        let res = reqwest::Client::new()
            .get(format!("{url}/api/thread/{thread_id}", url = self.url))
            .send()
            .await?;

        if !res.status().is_success() {
            tracing::error!(
                status = res.status().as_u16(),
                thread_id,
                "Failed to fetch thread"
            );
            bail!("Failed to fetch thread");
        }

        let messages = match res.json::<ThreadHistoryResponse>().await? {
            ThreadHistoryResponse::Wrapped { messages } => messages,
            ThreadHistoryResponse::Bare(messages) => messages,
        };

        tracing::debug!(count = messages.len(), thread_id, "Fetched thread");
        return Ok(messages);
    }

    #[allow(clippy::implicit_return)]
    async fn delete_thread(&self, thread_id: &str) -> Result<()> {
        let res = reqwest::Client::new()
            .delete(format!("{url}/api/thread/{thread_id}", url = self.url))
            .send()
            .await?;

        if !res.status().is_success() {
            tracing::error!(
                status = res.status().as_u16(),
                thread_id,
                "Failed to delete thread"
            );
            bail!("Failed to delete thread");
        }

        return Ok(());
    }
}
