mod message;
mod notice;
mod store;
mod thread;

pub use message::*;
pub use notice::*;
pub use store::*;
pub use thread::*;
