//! Stock ship designs - loaded from embedded JSON.
//!
//! The catalog lives in `data/stock_designs.json` at the repo root and is
//! compiled in via `include_str!()`. Each entry is a named [`ShipDesign`];
//! entries that fail validation are logged and skipped so one bad design
//! does not take down the whole catalog.

use hullforge_logic::design::{DesignError, ShipDesign};
use hullforge_logic::structure::Structure;
use serde::{Deserialize, Serialize};

const STOCK_DESIGNS_JSON: &str = include_str!("../../../data/stock_designs.json");

/// A named design as it appears in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockDesign {
    pub name: String,
    #[serde(flatten)]
    pub design: ShipDesign,
}

/// A catalog entry that passed validation.
#[derive(Debug, Clone)]
pub struct LoadedDesign {
    pub name: String,
    pub structure: Structure,
}

/// Errors when loading a design catalog
#[derive(Debug)]
pub enum CatalogError {
    /// The catalog is not valid JSON or has the wrong shape
    Parse(serde_json::Error),
    /// A named design failed validation
    Design { name: String, source: DesignError },
}

impl From<serde_json::Error> for CatalogError {
    fn from(e: serde_json::Error) -> Self {
        CatalogError::Parse(e)
    }
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::Parse(e) => write!(f, "Catalog parse error: {}", e),
            CatalogError::Design { name, source } => {
                write!(f, "Design '{}' rejected: {}", name, source)
            }
        }
    }
}

impl std::error::Error for CatalogError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CatalogError::Parse(e) => Some(e),
            CatalogError::Design { source, .. } => Some(source),
        }
    }
}

/// Parse a catalog without validating the designs.
pub fn parse_designs(json: &str) -> Result<Vec<StockDesign>, CatalogError> {
    Ok(serde_json::from_str(json)?)
}

/// Build a single catalog entry.
pub fn build_design(stock: &StockDesign) -> Result<LoadedDesign, CatalogError> {
    let structure = stock.design.build().map_err(|source| CatalogError::Design {
        name: stock.name.clone(),
        source,
    })?;
    Ok(LoadedDesign {
        name: stock.name.clone(),
        structure,
    })
}

/// Parse and build every design in `json`, skipping rejected entries.
pub fn load_designs(json: &str) -> Result<Vec<LoadedDesign>, CatalogError> {
    let stock = parse_designs(json)?;
    let total = stock.len();
    let loaded: Vec<LoadedDesign> = stock
        .iter()
        .filter_map(|entry| match build_design(entry) {
            Ok(design) => Some(design),
            Err(e) => {
                log::warn!("{}", e);
                None
            }
        })
        .collect();
    log::info!("Loaded {} of {} designs", loaded.len(), total);
    Ok(loaded)
}

/// The catalog compiled into the crate.
pub fn load_stock_designs() -> Result<Vec<LoadedDesign>, CatalogError> {
    load_designs(STOCK_DESIGNS_JSON)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hullforge_logic::grid::Position;
    use hullforge_logic::upgrade::{Stage, UpgradeKind};

    #[test]
    fn test_stock_catalog_loads_completely() {
        let stock = parse_designs(STOCK_DESIGNS_JSON).unwrap();
        let loaded = load_stock_designs().unwrap();
        assert!(!loaded.is_empty());
        assert_eq!(loaded.len(), stock.len());
        for design in &loaded {
            assert!(design.structure.is_connected(), "{} is disconnected", design.name);
        }
    }

    #[test]
    fn test_stock_hauler_contents() {
        let loaded = load_stock_designs().unwrap();
        let hauler = loaded.iter().find(|d| d.name == "Hauler").unwrap();
        let s = &hauler.structure;
        assert_eq!((s.width(), s.height()), (4, 2));
        assert_eq!(s.cell_count(), 8);
        assert_eq!(s.upgrade_count(UpgradeKind::Thruster), 2);
        // "Fuselage" entries are plain cells
        assert!(!s.has_upgrade(Position::new(0, 1)));
        let shield = s.upgrade_at(Position::new(1, 3)).unwrap();
        assert_eq!(shield.stage, Stage::Mk3);
    }

    #[test]
    fn test_rejected_design_is_skipped() {
        let json = r#"[
            { "name": "Good", "width": 1, "height": 1, "components": [ { "x": 0, "y": 0 } ] },
            { "name": "Split", "width": 3, "height": 1,
              "components": [ { "x": 0, "y": 0 }, { "x": 2, "y": 0 } ] },
            { "name": "Warp", "width": 1, "height": 1,
              "components": [ { "x": 0, "y": 0, "upgrade": { "type": "Warp", "level": 1 } } ] }
        ]"#;
        let loaded = load_designs(json).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name, "Good");
    }

    #[test]
    fn test_oversize_design_is_skipped_not_fatal() {
        let json = r#"[
            { "name": "Colossus", "width": 50000, "height": 50000,
              "components": [ { "x": 0, "y": 0 } ] },
            { "name": "Good", "width": 1, "height": 1, "components": [ { "x": 0, "y": 0 } ] }
        ]"#;
        let loaded = load_designs(json).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name, "Good");
    }

    #[test]
    fn test_build_design_reports_name() {
        let stock = StockDesign {
            name: "Overlap".to_string(),
            design: ShipDesign {
                width: 1,
                height: 1,
                components: vec![
                    hullforge_logic::design::ComponentSpec::new(0, 0),
                    hullforge_logic::design::ComponentSpec::new(0, 0),
                ],
            },
        };
        match build_design(&stock) {
            Err(CatalogError::Design { name, .. }) => assert_eq!(name, "Overlap"),
            other => panic!("expected design error, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        assert!(matches!(
            load_designs("{ not json"),
            Err(CatalogError::Parse(_))
        ));
    }
}
