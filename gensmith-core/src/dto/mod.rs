//! Data Transfer Objects for the queue service API
//!
//! This module contains the request and response bodies exchanged with the
//! task-queue service. Shapes follow the service's camelCase JSON
//! convention.

pub mod log;
pub mod task;
