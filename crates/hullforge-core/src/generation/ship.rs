//! Ship generation - grows a random connected hull through a build session

use hullforge_logic::grid::Position;
use hullforge_logic::session::BuildSession;
use hullforge_logic::structure::Structure;
use hullforge_logic::upgrade::{BuildKind, Stage, Upgrade, UpgradeKind};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Configuration for hull generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Maximum committed width (columns)
    pub max_width: i32,
    /// Maximum committed height (rows)
    pub max_height: i32,
    /// Target number of cells; capped by the extent limits
    pub cell_count: usize,
    /// Probability that a cell carries an upgrade
    pub upgrade_chance: f64,
    /// Highest stage a generated upgrade may start at (1..=3)
    pub max_stage: u8,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_width: 8,
            max_height: 6,
            cell_count: 20,
            upgrade_chance: 0.35,
            max_stage: 2,
        }
    }
}

/// Bounding box of `positions` plus `extra`, as (rows, cols).
fn extent_with(positions: &[Position], extra: Position) -> (i32, i32) {
    let (mut min_r, mut max_r) = (extra.row, extra.row);
    let (mut min_c, mut max_c) = (extra.col, extra.col);
    for p in positions {
        min_r = min_r.min(p.row);
        max_r = max_r.max(p.row);
        min_c = min_c.min(p.col);
        max_c = max_c.max(p.col);
    }
    (max_r - min_r + 1, max_c - min_c + 1)
}

/// Grow a random hull one placement at a time.
///
/// Every cell goes through `BuildSession::place`, so the result obeys the
/// same adjacency rule as a player-built ship. Growth stops early when no
/// candidate fits within `max_width` x `max_height`.
pub fn generate_structure(config: &GeneratorConfig, rng: &mut impl Rng) -> Structure {
    let max_width = config.max_width.max(1);
    let max_height = config.max_height.max(1);
    let target = config
        .cell_count
        .min((max_width * max_height) as usize);

    let mut session = BuildSession::new(Structure::new(0, 0));
    session.start();

    while session.structure().cell_count() < target {
        let structure = session.structure();
        let occupied = structure.grid().occupied_positions();
        let candidates: Vec<Position> = structure
            .grid()
            .iter_all()
            .map(|(pos, _)| pos)
            .filter(|&pos| session.can_place(pos, BuildKind::Fuselage))
            .filter(|&pos| {
                let (rows, cols) = extent_with(&occupied, pos);
                rows <= max_height && cols <= max_width
            })
            .collect();

        let Some(&pos) = candidates.choose(rng) else {
            break;
        };
        if !session.place(pos, BuildKind::Fuselage) {
            break;
        }
    }

    let mut structure = session.into_structure();
    fit_upgrades(&mut structure, config, rng);
    structure
}

/// Attach random upgrades to a committed hull.
fn fit_upgrades(structure: &mut Structure, config: &GeneratorConfig, rng: &mut impl Rng) {
    let chance = config.upgrade_chance.clamp(0.0, 1.0);
    let max_level = config.max_stage.clamp(Stage::BASE.level(), Stage::MAX.level());
    let positions = structure.grid().occupied_positions();

    for pos in positions {
        if !rng.gen_bool(chance) {
            continue;
        }
        let kinds = UpgradeKind::all();
        let kind = kinds[rng.gen_range(0..kinds.len())];
        let stage = Stage::from_level(rng.gen_range(Stage::BASE.level()..=max_level))
            .unwrap_or(Stage::BASE);
        structure.attach_upgrade(pos, Upgrade::with_stage(kind, stage));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const EPS: f32 = 1e-3;

    #[test]
    fn test_generate_respects_config() {
        let config = GeneratorConfig::default();
        let mut rng = StdRng::seed_from_u64(42);
        let s = generate_structure(&config, &mut rng);

        assert_eq!(s.cell_count(), config.cell_count);
        assert!(s.width() <= config.max_width);
        assert!(s.height() <= config.max_height);
        assert!(s.is_connected());
    }

    #[test]
    fn test_generated_mass_matches_contents() {
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let s = generate_structure(&GeneratorConfig::default(), &mut rng);
            let expected: f32 = s.cells().map(|(_, cell)| cell.mass()).sum();
            assert!((s.mass() - expected).abs() < EPS, "seed {}", seed);
            assert!(s.is_connected(), "seed {}", seed);
        }
    }

    #[test]
    fn test_cell_count_capped_by_extent() {
        let config = GeneratorConfig {
            max_width: 3,
            max_height: 2,
            cell_count: 50,
            ..Default::default()
        };
        let mut rng = StdRng::seed_from_u64(3);
        let s = generate_structure(&config, &mut rng);
        assert_eq!(s.cell_count(), 6);
        assert_eq!((s.width(), s.height()), (3, 2));
    }

    #[test]
    fn test_upgrade_chance_extremes() {
        let mut rng = StdRng::seed_from_u64(5);
        let bare = generate_structure(
            &GeneratorConfig {
                upgrade_chance: 0.0,
                ..Default::default()
            },
            &mut rng,
        );
        assert!(bare.cells().all(|(_, cell)| !cell.has_upgrade()));

        let full = generate_structure(
            &GeneratorConfig {
                upgrade_chance: 1.0,
                max_stage: 1,
                ..Default::default()
            },
            &mut rng,
        );
        assert!(full
            .cells()
            .all(|(_, cell)| cell.upgrade().is_some_and(|u| u.stage == Stage::Mk1)));
    }

    #[test]
    fn test_same_seed_same_hull() {
        let config = GeneratorConfig::default();
        let a = generate_structure(&config, &mut StdRng::seed_from_u64(11));
        let b = generate_structure(&config, &mut StdRng::seed_from_u64(11));
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_cells_is_empty() {
        let config = GeneratorConfig {
            cell_count: 0,
            ..Default::default()
        };
        let s = generate_structure(&config, &mut StdRng::seed_from_u64(0));
        assert!(s.is_empty());
        assert_eq!((s.width(), s.height()), (0, 0));
    }
}
