//! Hullforge Core - Shipyard Engine
//!
//! Ships live as entities in an ECS world (via `hecs`). Each ship carries
//! its committed hull, a name, and the mass properties the physics layer
//! reads every step. Editing a ship swaps its hull for an in-progress build
//! session, so physics keeps seeing the last committed values until the
//! session finishes.
//!
//! # Architecture
//!
//! - **Entities**: ships
//! - **Components**: `ShipName`, `Hull`, `Editing`, `MassProperties`
//! - **Systems**: mass-property sync from committed hulls
//! - **Generation**: seeded random hulls and names (RNG passed in explicitly)
//! - **Designs**: stock ship designs embedded as JSON
//!
//! # Example
//!
//! ```rust
//! use hullforge_core::prelude::*;
//! use hullforge_logic::grid::Position;
//! use hullforge_logic::upgrade::BuildKind;
//!
//! let mut yard = Shipyard::new();
//! let ship = yard.spawn_ship("Skiff", Structure::new(0, 0));
//!
//! yard.begin_build(ship).unwrap();
//! assert!(yard.place(ship, Position::new(0, 0), BuildKind::Fuselage).unwrap());
//! yard.finish_build(ship).unwrap();
//!
//! yard.update();
//! assert_eq!(yard.mass_properties(ship).unwrap().mass, 1.0);
//! ```

pub mod components;
pub mod designs;
pub mod engine;
pub mod generation;
pub mod systems;

/// Commonly used types for convenient importing
pub mod prelude {
    pub use crate::components::*;
    pub use crate::engine::{Shipyard, ShipyardError};
    pub use hullforge_logic::structure::Structure;
}
