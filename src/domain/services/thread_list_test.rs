use std::sync::atomic::AtomicBool;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::sync::Mutex;

use anyhow::bail;
use anyhow::Result;
use async_trait::async_trait;

use super::ThreadListController;
use crate::domain::models::Message;
use crate::domain::models::Thread;
use crate::domain::models::ThreadStore;

#[derive(Default)]
struct StubStore {
    threads: Mutex<Vec<Thread>>,
    messages: Mutex<Vec<Message>>,
    fail_list: AtomicBool,
    fail_get: AtomicBool,
    fail_delete: AtomicBool,
    get_calls: AtomicUsize,
    delete_calls: AtomicUsize,
}

impl StubStore {
    fn with_threads(threads: Vec<Thread>) -> Arc<StubStore> {
        let store = StubStore::default();
        *store.threads.lock().unwrap() = threads;
        return Arc::new(store);
    }

    fn with_messages(messages: Vec<Message>) -> Arc<StubStore> {
        let store = StubStore::default();
        *store.messages.lock().unwrap() = messages;
        return Arc::new(store);
    }
}

#[async_trait]
impl ThreadStore for Arc<StubStore> {
    async fn list_threads(&self) -> Result<Vec<Thread>> {
        if self.fail_list.load(Ordering::SeqCst) {
            bail!("thread list unavailable");
        }
        return Ok(self.threads.lock().unwrap().clone());
    }

    async fn get_thread(&self, _thread_id: &str) -> Result<Vec<Message>> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_get.load(Ordering::SeqCst) {
            bail!("thread unavailable");
        }
        return Ok(self.messages.lock().unwrap().clone());
    }

    async fn delete_thread(&self, thread_id: &str) -> Result<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_delete.load(Ordering::SeqCst) {
            bail!("delete unavailable");
        }

        self.threads
            .lock()
            .unwrap()
            .retain(|thread| return thread.thread_id != thread_id);
        return Ok(());
    }
}

fn controller_for(store: &Arc<StubStore>) -> ThreadListController {
    return ThreadListController::new(Box::new(store.clone()), true);
}

#[tokio::test]
async fn it_refreshes_the_thread_list_in_server_order() {
    let store = StubStore::with_threads(vec![
        Thread::new("a", "First"),
        Thread::new("b", "Second"),
    ]);
    let mut controller = controller_for(&store);

    controller.refresh().await;

    assert_eq!(
        controller.threads(),
        vec![Thread::new("a", "First"), Thread::new("b", "Second")]
    );
    assert!(controller.take_notice().is_none());
}

#[tokio::test]
async fn it_keeps_the_list_on_a_failed_refresh() {
    let store = StubStore::with_threads(vec![Thread::new("a", "First")]);
    let mut controller = controller_for(&store);
    controller.refresh().await;

    store.fail_list.store(true, Ordering::SeqCst);
    controller.refresh().await;

    assert_eq!(controller.threads(), vec![Thread::new("a", "First")]);
    let notice = controller.take_notice().unwrap();
    assert_eq!(notice.text, "Server is waking up, please wait.");
}

#[tokio::test]
async fn it_suppresses_notices_when_disabled() {
    let store = StubStore::default();
    store.fail_list.store(true, Ordering::SeqCst);
    let mut controller = ThreadListController::new(Box::new(Arc::new(store)), false);

    controller.refresh().await;

    assert!(controller.threads().is_empty());
    assert!(controller.take_notice().is_none());
}

#[tokio::test]
async fn it_dedupes_duplicate_thread_ids() {
    let store = StubStore::with_threads(vec![
        Thread::new("a", "First"),
        Thread::new("a", "Duplicate"),
        Thread::new("b", "Second"),
    ]);
    let mut controller = controller_for(&store);

    controller.refresh().await;

    assert_eq!(
        controller.threads(),
        vec![Thread::new("a", "First"), Thread::new("b", "Second")]
    );
}

#[tokio::test]
async fn it_creates_new_threads_with_unused_ids() {
    let store = StubStore::with_threads(vec![Thread::new("a", "First")]);
    let mut controller = controller_for(&store);
    controller.refresh().await;
    controller.set_prompt("half-typed prompt");
    controller.set_reply(Some(Message::new("assistant", "pending")));

    controller.create_new_thread();

    let current = controller.current_thread_id().to_string();
    assert!(!controller
        .threads()
        .iter()
        .any(|thread| return thread.thread_id == current));
    assert!(controller.previous_chats().is_empty());
    assert!(controller.is_new_chat());
    assert_eq!(controller.prompt(), "");
    assert!(controller.reply().is_none());
}

#[tokio::test]
async fn it_generates_a_fresh_id_for_each_new_thread() {
    let store = Arc::new(StubStore::default());
    let mut controller = controller_for(&store);

    let first = controller.current_thread_id().to_string();
    controller.create_new_thread();
    let second = controller.current_thread_id().to_string();

    assert_ne!(first, second);
}

#[tokio::test]
async fn it_ignores_switching_to_the_current_thread() {
    let store = Arc::new(StubStore::default());
    let mut controller = controller_for(&store);
    let current = controller.current_thread_id().to_string();

    controller.switch_thread(&current).await;

    assert_eq!(store.get_calls.load(Ordering::SeqCst), 0);
    assert_eq!(controller.current_thread_id(), current);
    assert!(controller.is_new_chat());
    assert!(controller.take_notice().is_none());
}

#[tokio::test]
async fn it_switches_threads_and_loads_messages() {
    let store = StubStore::with_messages(vec![
        Message::new("user", "Hello"),
        Message::new("assistant", "Hi there"),
    ]);
    let mut controller = controller_for(&store);
    controller.set_reply(Some(Message::new("assistant", "pending")));

    controller.switch_thread("a").await;

    assert_eq!(controller.current_thread_id(), "a");
    assert_eq!(
        controller.previous_chats(),
        vec![
            Message::new("user", "Hello"),
            Message::new("assistant", "Hi there"),
        ]
    );
    assert!(!controller.is_new_chat());
    assert!(controller.reply().is_none());
    assert_eq!(store.get_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn it_keeps_the_current_id_on_a_failed_switch() {
    let store = Arc::new(StubStore::default());
    store.fail_get.store(true, Ordering::SeqCst);
    let mut controller = controller_for(&store);

    controller.switch_thread("a").await;

    assert_eq!(controller.current_thread_id(), "a");
    assert!(controller.previous_chats().is_empty());
    let notice = controller.take_notice().unwrap();
    assert_eq!(notice.text, "Server is waking up, please wait.");
}

#[tokio::test]
async fn it_deletes_threads_preserving_order() {
    let store = StubStore::with_threads(vec![
        Thread::new("a", "First"),
        Thread::new("b", "Second"),
        Thread::new("c", "Third"),
    ]);
    let mut controller = controller_for(&store);
    controller.refresh().await;
    let current = controller.current_thread_id().to_string();

    controller.delete_thread("b").await;

    assert_eq!(
        controller.threads(),
        vec![Thread::new("a", "First"), Thread::new("c", "Third")]
    );
    assert_eq!(controller.current_thread_id(), current);
    assert_eq!(store.delete_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn it_starts_a_new_thread_when_deleting_the_current_one() {
    let store = StubStore::with_threads(vec![Thread::new("a", "First")]);
    let mut controller = controller_for(&store);
    controller.refresh().await;
    controller.switch_thread("a").await;

    controller.delete_thread("a").await;

    assert!(!controller
        .threads()
        .iter()
        .any(|thread| return thread.thread_id == "a"));
    assert_ne!(controller.current_thread_id(), "a");
    assert!(controller.is_new_chat());
    assert!(controller.previous_chats().is_empty());
}

#[tokio::test]
async fn it_keeps_the_list_on_a_failed_delete() {
    let store = StubStore::with_threads(vec![Thread::new("a", "First")]);
    let mut controller = controller_for(&store);
    controller.refresh().await;

    store.fail_delete.store(true, Ordering::SeqCst);
    controller.delete_thread("a").await;

    assert_eq!(controller.threads(), vec![Thread::new("a", "First")]);
    let notice = controller.take_notice().unwrap();
    assert_eq!(notice.text, "Failed to delete the thread.");
}

#[tokio::test]
async fn it_runs_a_refresh_then_delete_session() {
    let store = StubStore::with_threads(vec![Thread::new("a", "Hi")]);
    let mut controller = controller_for(&store);

    controller.refresh().await;
    assert_eq!(controller.threads(), vec![Thread::new("a", "Hi")]);

    controller.switch_thread("a").await;
    controller.delete_thread("a").await;

    assert!(controller.threads().is_empty());
    assert_ne!(controller.current_thread_id(), "a");

    controller.refresh().await;
    assert!(controller.threads().is_empty());
}
