#[cfg(test)]
#[path = "thread_list_test.rs"]
mod tests;

use uuid::Uuid;

use crate::domain::models::Message;
use crate::domain::models::Notice;
use crate::domain::models::Thread;
use crate::domain::models::ThreadStoreBox;

const STORE_DOWN_NOTICE: &str = "Server is waking up, please wait.";
const DELETE_FAILED_NOTICE: &str = "Failed to delete the thread.";

/// Owns the thread list mirrored from the remote store alongside the
/// current thread's id and loaded messages. All mutation happens through
/// the four operations below; consumers read state through accessors.
///
/// Store failures are never propagated. They degrade to "state unchanged,
/// notice surfaced", with one documented exception: a failed message fetch
/// in [`ThreadListController::switch_thread`] does not roll the current
/// thread id back.
pub struct ThreadListController {
    store: ThreadStoreBox,
    surface_errors: bool,
    threads: Vec<Thread>,
    current_thread_id: String,
    prev_chats: Vec<Message>,
    prompt: String,
    reply: Option<Message>,
    new_chat: bool,
    notice: Option<Notice>,
}

impl ThreadListController {
    pub fn new(store: ThreadStoreBox, surface_errors: bool) -> ThreadListController {
        let mut controller = ThreadListController {
            store,
            surface_errors,
            threads: vec![],
            current_thread_id: "".to_string(),
            prev_chats: vec![],
            prompt: "".to_string(),
            reply: None,
            new_chat: false,
            notice: None,
        };

        // Sessions always begin on a fresh, unsaved thread.
        controller.create_new_thread();

        return controller;
    }

    pub fn threads(&self) -> &[Thread] {
        return &self.threads;
    }

    pub fn current_thread_id(&self) -> &str {
        return &self.current_thread_id;
    }

    pub fn previous_chats(&self) -> &[Message] {
        return &self.prev_chats;
    }

    pub fn is_new_chat(&self) -> bool {
        return self.new_chat;
    }

    pub fn prompt(&self) -> &str {
        return &self.prompt;
    }

    pub fn set_prompt(&mut self, prompt: &str) {
        self.prompt = prompt.to_string();
    }

    pub fn reply(&self) -> Option<&Message> {
        return self.reply.as_ref();
    }

    pub fn set_reply(&mut self, reply: Option<Message>) {
        self.reply = reply;
    }

    /// Hands the pending notice to the view, clearing it.
    pub fn take_notice(&mut self) -> Option<Notice> {
        return self.notice.take();
    }

    /// Replaces the local thread list with the store's, preserving server
    /// order. Thread ids appear at most once; the first occurrence wins.
    /// On failure the list is left as-is.
    pub async fn refresh(&mut self) {
        match self.store.list_threads().await {
            Ok(threads) => {
                let mut deduped: Vec<Thread> = vec![];
                for thread in threads {
                    if deduped.iter().any(|e| return e.thread_id == thread.thread_id) {
                        tracing::warn!(
                            thread_id = %thread.thread_id,
                            "Duplicate thread id in list response"
                        );
                        continue;
                    }
                    deduped.push(thread);
                }

                tracing::debug!(count = deduped.len(), "Refreshed thread list");
                self.threads = deduped;
            }
            Err(err) => {
                tracing::error!(error = ?err, "Failed to refresh thread list");
                self.surface(STORE_DOWN_NOTICE);
            }
        }
    }

    /// Starts a fresh, unsaved thread. No network call is made; the thread
    /// only becomes real on the store once a first message is sent. Calling
    /// this twice simply discards the first unsaved thread.
    pub fn create_new_thread(&mut self) {
        self.current_thread_id = Uuid::new_v4().to_string();
        self.prev_chats.clear();
        self.prompt.clear();
        self.reply = None;
        self.new_chat = true;
    }

    /// Moves the view to another thread. The current id advances before the
    /// message fetch completes, and stays advanced even if the fetch fails.
    pub async fn switch_thread(&mut self, target_id: &str) {
        if target_id == self.current_thread_id {
            return;
        }

        self.current_thread_id = target_id.to_string();
        self.prev_chats.clear();

        match self.store.get_thread(target_id).await {
            Ok(messages) => {
                // Last request wins: results apply only while this is still
                // the latest requested thread. The `&mut self` held across
                // the await means switches cannot currently overlap, so this
                // branch only matters if dispatch ever changes.
                if self.current_thread_id != target_id {
                    tracing::debug!(thread_id = target_id, "Discarded stale thread fetch");
                    return;
                }

                self.prev_chats = messages;
                self.new_chat = false;
                self.reply = None;
            }
            Err(err) => {
                tracing::error!(error = ?err, thread_id = target_id, "Failed to fetch thread");
                self.surface(STORE_DOWN_NOTICE);
            }
        }
    }

    /// Deletes a thread on the store, then removes it locally. Confirmed
    /// first, not optimistic: a failed delete leaves the list untouched.
    /// Deleting the current thread lands the user on a fresh one.
    pub async fn delete_thread(&mut self, target_id: &str) {
        if let Err(err) = self.store.delete_thread(target_id).await {
            tracing::error!(error = ?err, thread_id = target_id, "Failed to delete thread");
            self.surface(DELETE_FAILED_NOTICE);
            return;
        }

        self.threads
            .retain(|thread| return thread.thread_id != target_id);

        if target_id == self.current_thread_id {
            self.create_new_thread();
        }
    }

    fn surface(&mut self, text: &str) {
        if self.surface_errors {
            self.notice = Some(Notice::new(text));
        }
    }
}
