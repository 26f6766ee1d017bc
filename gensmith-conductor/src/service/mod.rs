//! Service layer
//!
//! Services contain the conductor's business logic: preparing per-task
//! scratch workspaces, dispatching the code-generation CLI, and shipping
//! logs after a task finishes.
//!
//! All services are trait-based to enable testing and dependency injection.

mod dispatch;
mod log_sink;
mod workspace;

// Re-export traits
pub use dispatch::DispatchService;
pub use log_sink::LogSink;
pub use workspace::WorkspaceService;

// Re-export implementations
pub use dispatch::CliDispatchService;
pub use log_sink::RemoteLogSink;
pub use workspace::{ScratchWorkspace, WorkContext};
