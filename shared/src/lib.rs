//! Shared types and the aggregation core for the CocoaApp farm monitor
//!
//! This crate contains the domain model for the Farm→Lot→Crop→Tree→Fruit
//! hierarchy, the pure aggregation and counting logic, and the deterministic
//! geo-dispersion resolver. It is shared between the backend service and the
//! WASM bindings used by map clients.

pub mod geo;
pub mod hierarchy;
pub mod models;
pub mod normalize;
pub mod types;

pub use models::*;
pub use types::*;
