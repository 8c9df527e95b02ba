//! Ship structure - a grid of fuselage cells with mass bookkeeping.
//!
//! A `Structure` owns its `Grid<Cell>` and keeps three derived values in
//! step with it: total mass, mass-weighted center of mass, and a bounding
//! radius. Placements update mass and center of mass incrementally; resizing
//! (`expand`, `shrink_to_fit`) rebuilds the grid and re-derives them.
//!
//! Outside a build session the occupied cells always form one orthogonally
//! connected shape. Invalid placements are ordinary gameplay outcomes and
//! come back as `false`; only malformed construction input is an error.

use crate::connectivity::{components, orthogonal_neighbors};
use crate::grid::{dimensions_fit, Grid, Position, MAX_DIMENSION};
use crate::upgrade::{BuildKind, Cell, Upgrade, UpgradeKind};
use serde::{Deserialize, Serialize};

/// A fractional grid coordinate (row, col), used for the center of mass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GridPoint {
    pub row: f32,
    pub col: f32,
}

impl GridPoint {
    pub const ORIGIN: Self = Self { row: 0.0, col: 0.0 };

    pub fn new(row: f32, col: f32) -> Self {
        Self { row, col }
    }

    pub fn distance(&self, other: &Self) -> f32 {
        let dr = self.row - other.row;
        let dc = self.col - other.col;
        (dr * dr + dc * dc).sqrt()
    }
}

impl From<Position> for GridPoint {
    fn from(pos: Position) -> Self {
        Self {
            row: pos.row as f32,
            col: pos.col as f32,
        }
    }
}

/// The values a physics integration reads from a structure each step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MassProperties {
    pub mass: f32,
    pub center_of_mass: GridPoint,
    pub radius: f32,
}

/// One entry of a construction list: a cell position and optional upgrade.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub pos: Position,
    pub upgrade: Option<Upgrade>,
}

impl Placement {
    pub fn cell(pos: Position) -> Self {
        Self { pos, upgrade: None }
    }

    pub fn with_upgrade(pos: Position, upgrade: Upgrade) -> Self {
        Self {
            pos,
            upgrade: Some(upgrade),
        }
    }
}

/// Rejected structure construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructureError {
    /// Width or height below zero or above `MAX_DIMENSION`.
    InvalidDimensions { width: i32, height: i32 },
    /// A placement lies outside `[0, width) × [0, height)`.
    OutOfBounds {
        pos: Position,
        width: i32,
        height: i32,
    },
    /// Two placements target the same position.
    Overlap(Position),
    /// Occupied cells split into more than one group.
    Disconnected { components: usize },
}

impl std::fmt::Display for StructureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StructureError::InvalidDimensions { width, height } => {
                write!(f, "Invalid structure dimensions {}x{}", width, height)
            }
            StructureError::OutOfBounds { pos, width, height } => write!(
                f,
                "Component at row {}, col {} lies outside {}x{} structure",
                pos.row, pos.col, width, height
            ),
            StructureError::Overlap(pos) => write!(
                f,
                "Two components placed at row {}, col {}",
                pos.row, pos.col
            ),
            StructureError::Disconnected { components } => write!(
                f,
                "Structure is disconnected ({} separate groups)",
                components
            ),
        }
    }
}

impl std::error::Error for StructureError {}

/// A grid-built ship hull.
#[derive(Debug, Clone, PartialEq)]
pub struct Structure {
    grid: Grid<Cell>,
    mass: f32,
    center_of_mass: GridPoint,
    radius: f32,
    cell_count: usize,
}

fn bounding_radius(width: i32, height: i32) -> f32 {
    let w = width as f32;
    let h = height as f32;
    0.5 * (w * w + h * h).sqrt()
}

impl Structure {
    /// An empty structure with fixed dimensions, each clamped to
    /// `0..=MAX_DIMENSION`.
    pub fn new(width: i32, height: i32) -> Self {
        Self::from_grid(Grid::new(width, height))
    }

    /// Wrap a grid and derive everything from its contents.
    fn from_grid(grid: Grid<Cell>) -> Self {
        let mut structure = Self {
            grid,
            mass: 0.0,
            center_of_mass: GridPoint::ORIGIN,
            radius: 0.0,
            cell_count: 0,
        };
        structure.recompute_mass_properties();
        structure
    }

    /// Build from a placement list, validating the final shape.
    ///
    /// Placement order is irrelevant: cells are inserted without the
    /// one-at-a-time adjacency rule of [`Structure::set_cell`], then the
    /// whole occupied set must be connected.
    pub fn new_from_config(
        width: i32,
        height: i32,
        placements: &[Placement],
    ) -> Result<Self, StructureError> {
        if !dimensions_fit(width, height) {
            return Err(StructureError::InvalidDimensions { width, height });
        }
        let mut structure = Self::new(width, height);

        for placement in placements {
            let pos = placement.pos;
            if !structure.grid.contains(pos) {
                return Err(StructureError::OutOfBounds { pos, width, height });
            }
            // On-grid, so a refused insert means the slot is taken
            if !structure.insert_cell(pos, Cell::with_upgrade(placement.upgrade)) {
                return Err(StructureError::Overlap(pos));
            }
        }

        if structure.cell_count > 1 {
            let groups = components(&structure.grid.occupied_positions());
            if groups.len() > 1 {
                return Err(StructureError::Disconnected {
                    components: groups.len(),
                });
            }
        }
        Ok(structure)
    }

    // ── Queries ─────────────────────────────────────────────────────────

    pub fn width(&self) -> i32 {
        self.grid.width()
    }

    pub fn height(&self) -> i32 {
        self.grid.height()
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn center_of_mass(&self) -> GridPoint {
        self.center_of_mass
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn mass_properties(&self) -> MassProperties {
        MassProperties {
            mass: self.mass,
            center_of_mass: self.center_of_mass,
            radius: self.radius,
        }
    }

    /// Number of occupied cells.
    pub fn cell_count(&self) -> usize {
        self.cell_count
    }

    pub fn is_empty(&self) -> bool {
        self.cell_count == 0
    }

    pub fn grid(&self) -> &Grid<Cell> {
        &self.grid
    }

    /// An independent copy of the grid for external readers.
    pub fn grid_snapshot(&self) -> Grid<Cell> {
        self.grid.copy()
    }

    /// Occupied cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (Position, &Cell)> + '_ {
        self.grid.iter_occupied()
    }

    pub fn cell_at(&self, pos: Position) -> Option<&Cell> {
        self.grid.get(pos).ok().flatten()
    }

    pub fn has_cell(&self, pos: Position) -> bool {
        self.cell_at(pos).is_some()
    }

    pub fn upgrade_at(&self, pos: Position) -> Option<&Upgrade> {
        self.cell_at(pos).and_then(Cell::upgrade)
    }

    pub fn has_upgrade(&self, pos: Position) -> bool {
        self.upgrade_at(pos).is_some()
    }

    pub fn upgrade_kind_at(&self, pos: Position) -> Option<UpgradeKind> {
        self.upgrade_at(pos).map(|u| u.kind)
    }

    /// Sum of cell and upgrade resource values.
    pub fn resource_value(&self) -> u32 {
        self.cells().map(|(_, cell)| cell.resource_value()).sum()
    }

    pub fn upgrade_count(&self, kind: UpgradeKind) -> usize {
        self.cells()
            .filter(|(_, cell)| cell.upgrade().is_some_and(|u| u.kind == kind))
            .count()
    }

    /// Combined functional rating of every upgrade of `kind`.
    pub fn total_rating(&self, kind: UpgradeKind) -> f32 {
        self.cells()
            .filter_map(|(_, cell)| cell.upgrade())
            .filter(|u| u.kind == kind)
            .map(|u| u.spec().rating)
            .sum()
    }

    // ── Placement validity ──────────────────────────────────────────────

    fn touches_occupied(&self, pos: Position) -> bool {
        orthogonal_neighbors(pos)
            .into_iter()
            .any(|n| self.has_cell(n))
    }

    /// On-grid, unoccupied, and (empty structure or next to a cell).
    pub fn is_valid_cell_position(&self, pos: Position) -> bool {
        self.grid.contains(pos)
            && !self.has_cell(pos)
            && (self.cell_count == 0 || self.touches_occupied(pos))
    }

    /// On-grid, occupied, and the cell has a free upgrade slot.
    pub fn is_valid_upgrade_position(&self, pos: Position) -> bool {
        self.cell_at(pos).is_some_and(|cell| !cell.has_upgrade())
    }

    pub fn can_build_at(&self, pos: Position, kind: BuildKind) -> bool {
        if kind.is_structural() {
            self.is_valid_cell_position(pos)
        } else {
            self.is_valid_upgrade_position(pos)
        }
    }

    // ── Mutation ────────────────────────────────────────────────────────

    /// Fold a newly added mass `m` at `pos` into mass and center of mass.
    fn add_mass(&mut self, pos: Position, m: f32) {
        let total = self.mass + m;
        if total <= 0.0 {
            return;
        }
        let c = self.center_of_mass;
        self.center_of_mass = GridPoint {
            row: (self.mass * c.row + m * pos.row as f32) / total,
            col: (self.mass * c.col + m * pos.col as f32) / total,
        };
        self.mass = total;
    }

    /// Store a cell if `pos` is on the grid and empty; false otherwise.
    fn insert_cell(&mut self, pos: Position, cell: Cell) -> bool {
        let m = cell.mass();
        if self.grid.try_insert(pos, cell).is_err() {
            return false;
        }
        self.cell_count += 1;
        self.add_mass(pos, m);
        true
    }

    /// Place a fuselage cell, optionally with an upgrade already attached.
    ///
    /// Returns false without mutating if `pos` is off-grid, occupied, or
    /// (for a non-empty structure) not orthogonally adjacent to a cell.
    pub fn set_cell(&mut self, pos: Position, upgrade: Option<Upgrade>) -> bool {
        if !self.is_valid_cell_position(pos) {
            return false;
        }
        self.insert_cell(pos, Cell::with_upgrade(upgrade))
    }

    /// Attach an upgrade to the cell at `pos`.
    ///
    /// Returns false if there is no cell or it already holds an upgrade.
    pub fn attach_upgrade(&mut self, pos: Position, upgrade: Upgrade) -> bool {
        let Ok(Some(cell)) = self.grid.get_mut(pos) else {
            return false;
        };
        if cell.attach(upgrade).is_err() {
            return false;
        }
        self.add_mass(pos, upgrade.mass());
        true
    }

    /// Perform a placement request. Upgrades start at the base stage.
    pub fn build_at(&mut self, pos: Position, kind: BuildKind) -> bool {
        match kind.upgrade_kind() {
            None => self.set_cell(pos, None),
            Some(upgrade_kind) => self.attach_upgrade(pos, Upgrade::new(upgrade_kind)),
        }
    }

    /// Advance the upgrade at `pos` one stage. Mass is stage-independent, so
    /// the mass bookkeeping is untouched.
    pub fn advance_upgrade(&mut self, pos: Position) -> bool {
        match self.grid.get_mut(pos) {
            Ok(Some(cell)) => cell.upgrade_mut().is_some_and(|u| u.advance()),
            _ => false,
        }
    }

    // ── Resizing ────────────────────────────────────────────────────────

    /// Return a padded copy of this structure.
    ///
    /// With `centered`, cells shift by `(r - r/2, c - c/2)`, so an odd
    /// padding puts the extra row/column on the low-index side. Otherwise
    /// they shift by `(r, c)`. Negative arguments, or both zero, return an
    /// unchanged copy. Padding is capped so neither side grows past
    /// `MAX_DIMENSION`.
    pub fn expand(&self, added_rows: i32, added_cols: i32, centered: bool) -> Structure {
        if added_rows < 0 || added_cols < 0 {
            return self.clone();
        }
        let added_rows = added_rows.min(MAX_DIMENSION - self.height());
        let added_cols = added_cols.min(MAX_DIMENSION - self.width());
        if added_rows == 0 && added_cols == 0 {
            return self.clone();
        }
        let (dr, dc) = if centered {
            (added_rows - added_rows / 2, added_cols - added_cols / 2)
        } else {
            (added_rows, added_cols)
        };

        let grid = self.grid.window(
            Position::new(-dr, -dc),
            self.width() + added_cols,
            self.height() + added_rows,
        );

        let c = self.center_of_mass;
        let center_of_mass = if self.cell_count == 0 {
            GridPoint::ORIGIN
        } else {
            GridPoint::new(c.row + dr as f32, c.col + dc as f32)
        };
        Structure {
            radius: bounding_radius(grid.width(), grid.height()),
            grid,
            mass: self.mass,
            center_of_mass,
            cell_count: self.cell_count,
        }
    }

    /// Trim empty border rows and columns so the grid exactly bounds the
    /// occupied cells, moving the bounding box corner to the origin. An
    /// empty structure becomes 0×0.
    pub fn shrink_to_fit(&mut self) {
        let bounds = self
            .grid
            .iter_occupied()
            .fold(None::<(i32, i32, i32, i32)>, |acc, (pos, _)| {
                Some(match acc {
                    None => (pos.row, pos.col, pos.row, pos.col),
                    Some((r0, c0, r1, c1)) => (
                        r0.min(pos.row),
                        c0.min(pos.col),
                        r1.max(pos.row),
                        c1.max(pos.col),
                    ),
                })
            });

        self.grid = match bounds {
            Some((min_row, min_col, max_row, max_col)) => self.grid.window(
                Position::new(min_row, min_col),
                max_col - min_col + 1,
                max_row - min_row + 1,
            ),
            None => Grid::new(0, 0),
        };
        self.recompute_mass_properties();
    }

    /// Full pass over every cell: mass, center of mass, radius, cell count.
    pub fn recompute_mass_properties(&mut self) {
        let mut mass = 0.0;
        let mut row_moment = 0.0;
        let mut col_moment = 0.0;
        let mut count = 0;
        for (pos, cell) in self.grid.iter_occupied() {
            let m = cell.mass();
            mass += m;
            row_moment += m * pos.row as f32;
            col_moment += m * pos.col as f32;
            count += 1;
        }
        self.mass = mass;
        self.center_of_mass = if mass > 0.0 {
            GridPoint::new(row_moment / mass, col_moment / mass)
        } else {
            GridPoint::ORIGIN
        };
        self.radius = bounding_radius(self.width(), self.height());
        self.cell_count = count;
    }

    /// True if the occupied cells are empty or form one connected group.
    pub fn is_connected(&self) -> bool {
        self.cell_count == 0
            || crate::connectivity::is_connected(&self.grid.occupied_positions())
    }
}
