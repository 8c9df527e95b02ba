//! Component definitions for the ECS shipyard.
//!
//! Components are pure data structs attached to entities.
//! They have no behavior - that lives in systems and the engine.

mod ship;

pub use ship::*;
