//! Aggregations over report lists and the analytics endpoint.
//!
//! `filters` and `aggregation` are pure functions with no I/O; the public
//! listing reuses `filters` to narrow the verified view.

pub mod aggregation;
pub mod dtos;
pub mod filters;
pub mod handlers;
pub mod routes;
pub mod services;

pub use services::AnalyticsService;
