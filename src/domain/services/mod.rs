mod thread_list;

pub use thread_list::*;
