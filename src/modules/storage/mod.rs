//! Storage module for report photos
//!
//! Writes uploaded photos to a local directory that is served statically.

mod local_storage;

pub use local_storage::{PhotoStorage, StoredPhoto};
