//! Interactive build session around a [`Structure`].
//!
//! While editing, the structure is kept padded with extra rows and columns
//! around its current extent so the player can place cells next to any
//! edge. Each successful placement settles the structure (shrink to fit)
//! and pads it again, so candidate positions are always computed against a
//! fresh margin. `finish` commits the minimal footprint.
//!
//! ```
//! use hullforge_logic::grid::Position;
//! use hullforge_logic::session::{BuildSession, SessionState};
//! use hullforge_logic::structure::Structure;
//! use hullforge_logic::upgrade::BuildKind;
//!
//! let mut session = BuildSession::new(Structure::new(0, 0));
//! session.start();
//! assert_eq!(session.state(), SessionState::Expanded);
//! assert!(session.place(Position::new(0, 0), BuildKind::Fuselage));
//! session.finish();
//! assert_eq!(session.structure().width(), 1);
//! ```

use crate::grid::Position;
use crate::structure::Structure;
use crate::upgrade::BuildKind;
use serde::{Deserialize, Serialize};

/// Rows and columns added while a session is expanded, split evenly around
/// the current extent.
pub const BUILD_MARGIN: i32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// Grid is minimal; what gameplay systems see.
    Idle,
    /// Grid is padded by the margin for editing.
    Expanded,
}

/// Expand / place / settle / commit state machine.
#[derive(Debug, Clone)]
pub struct BuildSession {
    structure: Structure,
    state: SessionState,
    margin: i32,
}

impl BuildSession {
    pub fn new(structure: Structure) -> Self {
        Self::with_margin(structure, BUILD_MARGIN)
    }

    pub fn with_margin(structure: Structure, margin: i32) -> Self {
        Self {
            structure,
            state: SessionState::Idle,
            margin: margin.max(0),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn margin(&self) -> i32 {
        self.margin
    }

    pub fn structure(&self) -> &Structure {
        &self.structure
    }

    /// Pad the structure for editing. Does nothing if already expanded.
    pub fn start(&mut self) {
        if self.state == SessionState::Expanded {
            return;
        }
        self.structure = self.structure.expand(self.margin, self.margin, true);
        self.state = SessionState::Expanded;
    }

    pub fn can_place(&self, pos: Position, kind: BuildKind) -> bool {
        self.structure.can_build_at(pos, kind)
    }

    /// Try a placement. On success the structure is settled and re-padded,
    /// so positions handed out before this call are stale afterwards.
    pub fn place(&mut self, pos: Position, kind: BuildKind) -> bool {
        if !self.can_place(pos, kind) {
            return false;
        }
        if !self.structure.build_at(pos, kind) {
            return false;
        }
        self.structure.shrink_to_fit();
        self.state = SessionState::Idle;
        self.start();
        true
    }

    /// Commit: trim to the minimal footprint without re-padding.
    pub fn finish(&mut self) {
        self.structure.shrink_to_fit();
        self.state = SessionState::Idle;
    }

    /// Take the structure out, committing first if still expanded.
    pub fn into_structure(mut self) -> Structure {
        if self.state == SessionState::Expanded {
            self.finish();
        }
        self.structure
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upgrade::UpgradeKind;

    fn p(row: i32, col: i32) -> Position {
        Position::new(row, col)
    }

    fn seeded() -> Structure {
        let mut s = Structure::new(1, 1);
        assert!(s.set_cell(p(0, 0), None));
        s
    }

    #[test]
    fn test_start_pads_once() {
        let mut session = BuildSession::new(seeded());
        session.start();
        assert_eq!(session.structure().width(), 3);
        assert_eq!(session.structure().height(), 3);
        assert!(session.structure().has_cell(p(1, 1)));
        session.start();
        assert_eq!(session.structure().width(), 3);
        assert_eq!(session.state(), SessionState::Expanded);
    }

    #[test]
    fn test_place_resettles_with_margin() {
        let mut session = BuildSession::new(seeded());
        session.start();
        // Left of the seed cell.
        assert!(session.place(p(1, 0), BuildKind::Fuselage));
        let s = session.structure();
        assert_eq!(session.state(), SessionState::Expanded);
        assert_eq!((s.width(), s.height()), (4, 3));
        assert!(s.has_cell(p(1, 1)));
        assert!(s.has_cell(p(1, 2)));
        assert_eq!(s.cell_count(), 2);
    }

    #[test]
    fn test_invalid_place_leaves_state_untouched() {
        let mut session = BuildSession::new(seeded());
        session.start();
        let before = session.structure().clone();
        assert!(!session.place(p(0, 0), BuildKind::Fuselage));
        assert!(!session.place(p(1, 0), BuildKind::Shield));
        assert!(!session.place(p(-1, 1), BuildKind::Fuselage));
        assert_eq!(session.structure(), &before);
    }

    #[test]
    fn test_place_upgrade() {
        let mut session = BuildSession::new(seeded());
        session.start();
        assert!(session.can_place(p(1, 1), BuildKind::Thruster));
        assert!(session.place(p(1, 1), BuildKind::Thruster));
        assert_eq!(
            session.structure().upgrade_kind_at(p(1, 1)),
            Some(UpgradeKind::Thruster)
        );
        assert!(!session.can_place(p(1, 1), BuildKind::Turret));
    }

    #[test]
    fn test_finish_commits_minimal_footprint() {
        let mut session = BuildSession::new(seeded());
        session.start();
        // Stack upward twice; the re-pad keeps row 0 free each time.
        assert!(session.place(p(0, 1), BuildKind::Fuselage));
        assert!(session.place(p(0, 1), BuildKind::Fuselage));
        session.finish();
        assert_eq!(session.state(), SessionState::Idle);
        let s = session.structure();
        assert_eq!((s.width(), s.height()), (1, 3));
        assert_eq!(s.cell_count(), 3);
        assert!(s.is_connected());
    }

    #[test]
    fn test_place_from_idle_starts_expanded() {
        let mut session = BuildSession::new(Structure::new(2, 2));
        assert!(session.place(p(1, 1), BuildKind::Fuselage));
        assert_eq!(session.state(), SessionState::Expanded);
        let s = session.into_structure();
        assert_eq!((s.width(), s.height()), (1, 1));
    }

    #[test]
    fn test_mass_survives_session() {
        let mut session = BuildSession::new(seeded());
        session.start();
        assert!(session.place(p(1, 2), BuildKind::Fuselage));
        assert!(session.place(p(1, 2), BuildKind::Turret));
        let s = session.into_structure();
        let expected = 2.0 + UpgradeKind::Turret.spec(crate::upgrade::Stage::Mk1).mass;
        assert!((s.mass() - expected).abs() < 1e-4);
        assert!((s.center_of_mass().row - 0.0).abs() < 1e-4);
    }
}
