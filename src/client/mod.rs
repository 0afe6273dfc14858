//! Client-side reporting engine: consumes `AuditReport`s from the service
//! and holds all presentation state around them.

pub mod api;
pub mod context;
pub mod knowledge;
pub mod navigator;
pub mod store;
pub mod tags;
pub mod view;
