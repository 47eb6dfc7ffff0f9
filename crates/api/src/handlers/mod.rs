//! Request handlers.
//!
//! Handlers are thin: they extract the request, delegate to the
//! [`WorkflowEngine`](crate::engine::WorkflowEngine) held in state, and wrap
//! the result in a [`DataResponse`](crate::response::DataResponse).

pub mod import;
pub mod project;
pub mod review;
pub mod statistics;
pub mod workflow;
