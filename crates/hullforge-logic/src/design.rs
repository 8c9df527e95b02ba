//! Declarative ship designs.
//!
//! A `ShipDesign` is the in-memory shape an external loader produces:
//! dimensions plus a list of components, each optionally naming an upgrade
//! by type string and level. [`ShipDesign::build`] turns it into a validated
//! [`Structure`], rejecting unknown types, bad levels, and any placement set
//! that is out of bounds, overlapping, or disconnected.
//!
//! ```
//! use hullforge_logic::design::{ComponentSpec, ShipDesign};
//!
//! let design = ShipDesign {
//!     width: 2,
//!     height: 1,
//!     components: vec![
//!         ComponentSpec::new(0, 0),
//!         ComponentSpec::with_upgrade(1, 0, "thruster", 1),
//!     ],
//! };
//! let ship = design.build().unwrap();
//! assert_eq!(ship.cell_count(), 2);
//! ```

use crate::grid::Position;
use crate::structure::{Placement, Structure, StructureError};
use crate::upgrade::{BuildKind, Stage, Upgrade};
use serde::{Deserialize, Serialize};

/// Upgrade entry of a component: `type` is matched case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeEntry {
    #[serde(rename = "type")]
    pub kind: String,
    pub level: u8,
}

/// One component: `x` is the column, `y` the row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentSpec {
    pub x: i32,
    pub y: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upgrade: Option<UpgradeEntry>,
}

impl ComponentSpec {
    pub fn new(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            upgrade: None,
        }
    }

    pub fn with_upgrade(x: i32, y: i32, kind: &str, level: u8) -> Self {
        Self {
            x,
            y,
            upgrade: Some(UpgradeEntry {
                kind: kind.to_string(),
                level,
            }),
        }
    }

    pub fn position(&self) -> Position {
        Position::new(self.y, self.x)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipDesign {
    pub width: i32,
    pub height: i32,
    #[serde(default)]
    pub components: Vec<ComponentSpec>,
}

/// Rejected design.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DesignError {
    /// Upgrade `type` is not Fuselage, Thruster, Turret, or Shield.
    UnknownUpgradeType { x: i32, y: i32, kind: String },
    /// Upgrade `level` is outside the stage range.
    InvalidLevel { x: i32, y: i32, level: u8 },
    /// The placements do not form a valid structure.
    Structure(StructureError),
}

impl From<StructureError> for DesignError {
    fn from(e: StructureError) -> Self {
        DesignError::Structure(e)
    }
}

impl std::fmt::Display for DesignError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DesignError::UnknownUpgradeType { x, y, kind } => write!(
                f,
                "Component at x={}, y={} has unknown upgrade type '{}' (expected Fuselage, Thruster, Turret or Shield)",
                x, y, kind
            ),
            DesignError::InvalidLevel { x, y, level } => write!(
                f,
                "Component at x={}, y={} has invalid upgrade level {} (expected {}..={})",
                x,
                y,
                level,
                Stage::BASE.level(),
                Stage::MAX.level()
            ),
            DesignError::Structure(e) => write!(f, "Invalid structure: {}", e),
        }
    }
}

impl std::error::Error for DesignError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DesignError::Structure(e) => Some(e),
            _ => None,
        }
    }
}

impl ComponentSpec {
    /// Resolve into a placement. A `Fuselage` upgrade entry is a plain cell.
    pub fn to_placement(&self) -> Result<Placement, DesignError> {
        let pos = self.position();
        let Some(spec) = &self.upgrade else {
            return Ok(Placement::cell(pos));
        };
        let kind = BuildKind::from_name(&spec.kind).ok_or_else(|| {
            DesignError::UnknownUpgradeType {
                x: self.x,
                y: self.y,
                kind: spec.kind.clone(),
            }
        })?;
        let Some(upgrade_kind) = kind.upgrade_kind() else {
            return Ok(Placement::cell(pos));
        };
        let stage = Stage::from_level(spec.level).ok_or(DesignError::InvalidLevel {
            x: self.x,
            y: self.y,
            level: spec.level,
        })?;
        Ok(Placement::with_upgrade(
            pos,
            Upgrade::with_stage(upgrade_kind, stage),
        ))
    }
}

impl ShipDesign {
    /// Resolve every component and build a validated structure.
    pub fn build(&self) -> Result<Structure, DesignError> {
        let placements = self
            .components
            .iter()
            .map(ComponentSpec::to_placement)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Structure::new_from_config(
            self.width,
            self.height,
            &placements,
        )?)
    }

    /// Describe an existing structure in design form.
    pub fn from_structure(structure: &Structure) -> Self {
        let components = structure
            .cells()
            .map(|(pos, cell)| ComponentSpec {
                x: pos.col,
                y: pos.row,
                upgrade: cell.upgrade().map(|u| UpgradeEntry {
                    kind: u.kind.name().to_string(),
                    level: u.stage.level(),
                }),
            })
            .collect();
        Self {
            width: structure.width(),
            height: structure.height(),
            components,
        }
    }
}

impl TryFrom<&ShipDesign> for Structure {
    type Error = DesignError;

    fn try_from(design: &ShipDesign) -> Result<Self, Self::Error> {
        design.build()
    }
}
