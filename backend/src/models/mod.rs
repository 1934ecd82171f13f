//! Domain models for the CocoaApp backend
//!
//! Re-exports models from the shared crate

pub use shared::models::*;
