//! Upgrade definitions - the functional modules a fuselage cell can host.
//!
//! Each upgrade kind has a stat table indexed by its progression stage.
//! Mass depends only on the kind, so advancing a stage never disturbs a
//! structure's mass bookkeeping; resource value and the kind's functional
//! rating grow with stage.

use serde::{Deserialize, Serialize};

/// Mass of a bare fuselage cell.
pub const FUSELAGE_MASS: f32 = 1.0;

/// Resource value of a bare fuselage cell.
pub const FUSELAGE_VALUE: u32 = 10;

/// Stats for one upgrade kind at one stage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UpgradeSpec {
    pub name: &'static str,
    /// Mass added to the host cell.
    pub mass: f32,
    /// Resource value (salvage / build cost).
    pub resource_value: u32,
    /// Kind-specific output: thrust (kN), damage per shot, or shield capacity.
    pub rating: f32,
}

/// Progression stage, lowest = base, highest = not further upgradeable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Stage {
    Mk1 = 1,
    Mk2 = 2,
    Mk3 = 3,
}

impl Stage {
    pub const BASE: Stage = Stage::Mk1;
    pub const MAX: Stage = Stage::Mk3;

    pub fn all() -> &'static [Stage] {
        &[Stage::Mk1, Stage::Mk2, Stage::Mk3]
    }

    /// Map a 1-based design level to a stage.
    pub fn from_level(level: u8) -> Option<Stage> {
        match level {
            1 => Some(Stage::Mk1),
            2 => Some(Stage::Mk2),
            3 => Some(Stage::Mk3),
            _ => None,
        }
    }

    pub fn level(self) -> u8 {
        self as u8
    }

    /// The following stage, or `None` at the top.
    pub fn next(self) -> Option<Stage> {
        match self {
            Stage::Mk1 => Some(Stage::Mk2),
            Stage::Mk2 => Some(Stage::Mk3),
            Stage::Mk3 => None,
        }
    }

    pub fn is_max(self) -> bool {
        self == Stage::MAX
    }
}

/// Functional module kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum UpgradeKind {
    Thruster = 0,
    Turret = 1,
    Shield = 2,
}

impl UpgradeKind {
    pub fn all() -> &'static [UpgradeKind] {
        &[UpgradeKind::Thruster, UpgradeKind::Turret, UpgradeKind::Shield]
    }

    pub fn name(self) -> &'static str {
        match self {
            UpgradeKind::Thruster => "Thruster",
            UpgradeKind::Turret => "Turret",
            UpgradeKind::Shield => "Shield",
        }
    }

    pub fn spec(self, stage: Stage) -> UpgradeSpec {
        let tier = stage.level() as f32;
        match self {
            Self::Thruster => UpgradeSpec {
                name: "Thruster",
                mass: 0.5,
                resource_value: 15 * stage.level() as u32,
                rating: 40.0 * tier,
            },
            Self::Turret => UpgradeSpec {
                name: "Turret",
                mass: 0.8,
                resource_value: 20 * stage.level() as u32,
                rating: 5.0 * tier,
            },
            Self::Shield => UpgradeSpec {
                name: "Shield",
                mass: 0.6,
                resource_value: 25 * stage.level() as u32,
                rating: 50.0 * tier,
            },
        }
    }
}

/// An attached module: a kind at a progression stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Upgrade {
    pub kind: UpgradeKind,
    pub stage: Stage,
}

impl Upgrade {
    /// A new upgrade at the base stage.
    pub fn new(kind: UpgradeKind) -> Self {
        Self {
            kind,
            stage: Stage::BASE,
        }
    }

    pub fn with_stage(kind: UpgradeKind, stage: Stage) -> Self {
        Self { kind, stage }
    }

    pub fn spec(&self) -> UpgradeSpec {
        self.kind.spec(self.stage)
    }

    pub fn mass(&self) -> f32 {
        self.spec().mass
    }

    pub fn resource_value(&self) -> u32 {
        self.spec().resource_value
    }

    pub fn can_advance(&self) -> bool {
        !self.stage.is_max()
    }

    /// Move to the next stage. Returns false if already at the top.
    pub fn advance(&mut self) -> bool {
        match self.stage.next() {
            Some(next) => {
                self.stage = next;
                true
            }
            None => false,
        }
    }
}

/// What a placement request wants to build.
///
/// `Fuselage` is the structural-cell tag: it routes to cell placement and is
/// never stored as an upgrade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildKind {
    Fuselage,
    Thruster,
    Turret,
    Shield,
}

impl BuildKind {
    pub fn all() -> &'static [BuildKind] {
        &[
            BuildKind::Fuselage,
            BuildKind::Thruster,
            BuildKind::Turret,
            BuildKind::Shield,
        ]
    }

    pub fn is_structural(self) -> bool {
        self == BuildKind::Fuselage
    }

    /// The upgrade kind this request attaches, `None` for fuselage.
    pub fn upgrade_kind(self) -> Option<UpgradeKind> {
        match self {
            BuildKind::Fuselage => None,
            BuildKind::Thruster => Some(UpgradeKind::Thruster),
            BuildKind::Turret => Some(UpgradeKind::Turret),
            BuildKind::Shield => Some(UpgradeKind::Shield),
        }
    }

    /// Case-insensitive lookup by name ("fuselage", "THRUSTER", ...).
    pub fn from_name(name: &str) -> Option<BuildKind> {
        let name = name.trim();
        BuildKind::all()
            .iter()
            .copied()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
    }

    pub fn name(self) -> &'static str {
        match self {
            BuildKind::Fuselage => "Fuselage",
            BuildKind::Thruster => "Thruster",
            BuildKind::Turret => "Turret",
            BuildKind::Shield => "Shield",
        }
    }
}

impl From<UpgradeKind> for BuildKind {
    fn from(kind: UpgradeKind) -> Self {
        match kind {
            UpgradeKind::Thruster => BuildKind::Thruster,
            UpgradeKind::Turret => BuildKind::Turret,
            UpgradeKind::Shield => BuildKind::Shield,
        }
    }
}

/// A structural grid unit. Owns at most one upgrade.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Cell {
    upgrade: Option<Upgrade>,
}

impl Cell {
    pub fn new() -> Self {
        Self { upgrade: None }
    }

    pub fn with_upgrade(upgrade: Option<Upgrade>) -> Self {
        Self { upgrade }
    }

    pub fn upgrade(&self) -> Option<&Upgrade> {
        self.upgrade.as_ref()
    }

    pub fn upgrade_mut(&mut self) -> Option<&mut Upgrade> {
        self.upgrade.as_mut()
    }

    pub fn has_upgrade(&self) -> bool {
        self.upgrade.is_some()
    }

    /// Attach `upgrade` if the slot is free. Hands it back otherwise.
    pub fn attach(&mut self, upgrade: Upgrade) -> Result<(), Upgrade> {
        if self.upgrade.is_some() {
            return Err(upgrade);
        }
        self.upgrade = Some(upgrade);
        Ok(())
    }

    /// Remove and return the attached upgrade.
    pub fn detach(&mut self) -> Option<Upgrade> {
        self.upgrade.take()
    }

    pub fn base_mass(&self) -> f32 {
        FUSELAGE_MASS
    }

    /// Cell mass plus attached upgrade mass.
    pub fn mass(&self) -> f32 {
        FUSELAGE_MASS + self.upgrade.map_or(0.0, |u| u.mass())
    }

    /// Cell value plus attached upgrade value.
    pub fn resource_value(&self) -> u32 {
        FUSELAGE_VALUE + self.upgrade.map_or(0, |u| u.resource_value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_progression() {
        assert_eq!(Stage::BASE.next(), Some(Stage::Mk2));
        assert_eq!(Stage::Mk2.next(), Some(Stage::Mk3));
        assert_eq!(Stage::MAX.next(), None);
        assert!(Stage::Mk1 < Stage::Mk3);
        assert_eq!(Stage::from_level(2), Some(Stage::Mk2));
        assert_eq!(Stage::from_level(0), None);
        assert_eq!(Stage::from_level(4), None);
    }

    #[test]
    fn test_mass_is_stage_independent() {
        for &kind in UpgradeKind::all() {
            let base = kind.spec(Stage::Mk1);
            for &stage in Stage::all() {
                let spec = kind.spec(stage);
                assert_eq!(spec.mass, base.mass);
                assert!(spec.resource_value >= base.resource_value);
                assert!(spec.mass > 0.0);
            }
        }
    }

    #[test]
    fn test_upgrade_advance_stops_at_max() {
        let mut up = Upgrade::new(UpgradeKind::Turret);
        assert!(up.advance());
        assert!(up.advance());
        assert!(!up.can_advance());
        assert!(!up.advance());
        assert_eq!(up.stage, Stage::Mk3);
    }

    #[test]
    fn test_build_kind_from_name_is_case_insensitive() {
        assert_eq!(BuildKind::from_name("fuselage"), Some(BuildKind::Fuselage));
        assert_eq!(BuildKind::from_name("THRUSTER"), Some(BuildKind::Thruster));
        assert_eq!(BuildKind::from_name("ShIeLd"), Some(BuildKind::Shield));
        assert_eq!(BuildKind::from_name("laser"), None);
        assert!(BuildKind::Fuselage.is_structural());
        assert_eq!(BuildKind::Fuselage.upgrade_kind(), None);
        assert_eq!(BuildKind::Turret.upgrade_kind(), Some(UpgradeKind::Turret));
    }

    #[test]
    fn test_cell_holds_one_upgrade() {
        let mut cell = Cell::new();
        assert!(cell.attach(Upgrade::new(UpgradeKind::Shield)).is_ok());
        let rejected = cell.attach(Upgrade::new(UpgradeKind::Thruster));
        assert_eq!(rejected, Err(Upgrade::new(UpgradeKind::Thruster)));
        assert_eq!(cell.upgrade().map(|u| u.kind), Some(UpgradeKind::Shield));
        assert_eq!(cell.mass(), FUSELAGE_MASS + 0.6);
        assert_eq!(cell.detach().map(|u| u.kind), Some(UpgradeKind::Shield));
        assert_eq!(cell.mass(), FUSELAGE_MASS);
    }

    #[test]
    fn test_cell_resource_value() {
        let cell = Cell::with_upgrade(Some(Upgrade::with_stage(UpgradeKind::Thruster, Stage::Mk2)));
        assert_eq!(cell.resource_value(), FUSELAGE_VALUE + 30);
    }
}
