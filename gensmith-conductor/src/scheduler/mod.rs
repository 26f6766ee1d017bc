//! Scheduler layer for the conductor
//!
//! This layer polls the queue service for leased tasks and drives each
//! task through its lifecycle: prepare, dispatch, finalize, ship logs,
//! clean up.

pub mod poller;

pub use poller::TaskPoller;
