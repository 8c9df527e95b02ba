//! Ship components: name, committed hull, active build session.

use hullforge_logic::session::BuildSession;
use hullforge_logic::structure::Structure;
use serde::{Deserialize, Serialize};

pub use hullforge_logic::structure::MassProperties;

/// Display name of a ship
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipName(pub String);

impl ShipName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Committed, normalized ship structure.
///
/// Present only while the ship is not being edited; physics-facing systems
/// read this (through `MassProperties`) and never see a padded grid.
#[derive(Debug, Clone)]
pub struct Hull(pub Structure);

impl Hull {
    pub fn structure(&self) -> &Structure {
        &self.0
    }
}

/// In-progress build session. Replaces `Hull` while editing.
#[derive(Debug, Clone)]
pub struct Editing(pub BuildSession);

impl Editing {
    pub fn session(&self) -> &BuildSession {
        &self.0
    }
}
