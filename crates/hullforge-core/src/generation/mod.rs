//! Generation - procedural creation of hulls and ship names

mod names;
mod ship;

pub use names::*;
pub use ship::*;
