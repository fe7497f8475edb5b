use anyhow::Result;
use async_trait::async_trait;

use super::Message;
use super::Thread;

pub type ThreadStoreBox = Box<dyn ThreadStore + Send + Sync>;

#[async_trait]
pub trait ThreadStore {
    /// Returns every thread held by the store, in the order the store
    /// returns them.
    async fn list_threads(&self) -> Result<Vec<Thread>>;

    /// Returns the full message history for a single thread.
    async fn get_thread(&self, thread_id: &str) -> Result<Vec<Message>>;

    /// Deletes a thread. Any 2xx from the store counts as success.
    async fn delete_thread(&self, thread_id: &str) -> Result<()>;
}
