#[cfg(test)]
#[path = "thread_test.rs"]
mod tests;

use serde_derive::Deserialize;
use serde_derive::Serialize;

/// A conversation thread mirrored from the remote store. The server may
/// attach extra fields to each thread; only this projection is kept.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Thread {
    #[serde(rename = "threadId")]
    pub thread_id: String,
    #[serde(default)]
    pub title: String,
}

impl Thread {
    pub fn new(thread_id: &str, title: &str) -> Thread {
        return Thread {
            thread_id: thread_id.to_string(),
            title: title.to_string(),
        };
    }
}
