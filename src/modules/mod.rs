//! Modules layer - Infrastructure components
//!
//! Contains adapters for resources outside the request flow, like file storage.

pub mod storage;
