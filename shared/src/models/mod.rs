//! Domain models for the CocoaApp farm monitor
//!
//! Each entity comes in two shapes: a flat `*Record` exactly as fetched from
//! the upstream data API (Spanish column names on the wire), and the
//! assembled node used in the nested hierarchy.

mod crop;
mod farm;
mod fruit;
mod lot;
mod state;
mod tree;

pub use crop::*;
pub use farm::*;
pub use fruit::*;
pub use lot::*;
pub use state::*;
pub use tree::*;
