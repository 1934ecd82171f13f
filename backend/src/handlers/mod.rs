//! HTTP handlers for the CocoaApp backend

pub mod crop;
pub mod health;
pub mod lot;
pub mod notification;
pub mod stats;
pub mod tree;
pub mod zone_analysis;

pub use crop::*;
pub use health::*;
pub use lot::*;
pub use notification::*;
pub use stats::*;
pub use tree::*;
pub use zone_analysis::*;
