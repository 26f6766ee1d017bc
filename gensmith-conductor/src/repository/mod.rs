//! Repository layer
//!
//! Repositories abstract communication with the queue service behind
//! traits, so the poller can be exercised against in-memory fakes without
//! a running queue.

mod queue;

pub use queue::{HttpTaskQueue, TaskQueue};
