//! Systems - logic that operates on components

mod mass;

pub use mass::*;
