//! Pure ship-building logic for Hullforge.
//!
//! This crate contains the grid-backed structural model of a player-built
//! ship, independent of any engine, renderer, or physics integration.
//! Functions take plain data and return results, so everything here is
//! unit-testable and usable from the ECS engine, the headless harness, or
//! any future frontend.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`grid`] | Fixed-size, bounds-checked 2D storage of optional cells |
//! | [`connectivity`] | Orthogonal adjacency and BFS connectivity checks |
//! | [`upgrade`] | Fuselage cells, upgrade kinds, stages, stat table, build kinds |
//! | [`structure`] | Ship structure: placement, mass tracking, expand/shrink |
//! | [`session`] | Build-session state machine (pad, place, settle, commit) |
//! | [`design`] | Declarative ship design shape and validated construction |
//!
//! ```
//! use hullforge_logic::session::BuildSession;
//! use hullforge_logic::structure::Structure;
//! use hullforge_logic::upgrade::BuildKind;
//! use hullforge_logic::grid::Position;
//!
//! let mut session = BuildSession::new(Structure::new(1, 1));
//! session.start();
//! assert!(session.place(Position::new(2, 2), BuildKind::Fuselage));
//! let ship = session.into_structure();
//! assert_eq!(ship.cell_count(), 1);
//! ```

pub mod connectivity;
pub mod design;
pub mod grid;
pub mod session;
pub mod structure;
pub mod upgrade;
