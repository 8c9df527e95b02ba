//! Fixed-size 2D grid of optional cell values.
//!
//! A `Grid<T>` is a dense row-major array addressed by [`Position`].
//! Out-of-range access is a caller bug, so it is reported as a
//! [`GridError::OutOfRange`] rather than silently clamped. Callers that
//! need to distinguish "off the grid" from "empty" should check
//! [`Grid::contains`] first.

use serde::{Deserialize, Serialize};

/// Largest width or height of any grid.
pub const MAX_DIMENSION: i32 = 1024;

/// Largest number of addressable cells in one grid.
pub const MAX_GRID_CELLS: usize = (MAX_DIMENSION as usize) * (MAX_DIMENSION as usize);

/// True if a `width × height` grid can be allocated: both sides in
/// `0..=MAX_DIMENSION` and the cell count within [`MAX_GRID_CELLS`].
pub fn dimensions_fit(width: i32, height: i32) -> bool {
    let (Ok(w), Ok(h)) = (usize::try_from(width), usize::try_from(height)) else {
        return false;
    };
    width <= MAX_DIMENSION
        && height <= MAX_DIMENSION
        && w.checked_mul(h).is_some_and(|n| n <= MAX_GRID_CELLS)
}

/// A grid cell address: `row` is the vertical index, `col` the horizontal.
///
/// Signed so that candidate positions just off the grid (e.g. row -1 while
/// mapping a click) are representable and can be rejected normally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub const ORIGIN: Self = Self { row: 0, col: 0 };

    pub const fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Shift by a row/column offset. Saturates at the `i32` range.
    pub const fn offset(self, rows: i32, cols: i32) -> Self {
        Self {
            row: self.row.saturating_add(rows),
            col: self.col.saturating_add(cols),
        }
    }
}

impl From<(i32, i32)> for Position {
    fn from((row, col): (i32, i32)) -> Self {
        Self { row, col }
    }
}

/// Grid construction or access failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridError {
    /// Access outside the grid's bounds.
    OutOfRange {
        pos: Position,
        width: i32,
        height: i32,
    },
    /// Requested dimensions are negative or exceed [`MAX_DIMENSION`].
    InvalidDimensions { width: i32, height: i32 },
}

impl std::fmt::Display for GridError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GridError::OutOfRange { pos, width, height } => write!(
                f,
                "Position ({}, {}) outside {}x{} grid",
                pos.row, pos.col, width, height
            ),
            GridError::InvalidDimensions { width, height } => write!(
                f,
                "Grid dimensions {}x{} outside 0..={}",
                width, height, MAX_DIMENSION
            ),
        }
    }
}

impl std::error::Error for GridError {}

/// Dense `width × height` storage of `Option<T>`.
///
/// `Clone` yields a fully independent copy: cells are owned values, so
/// mutating the copy never reaches back into the source grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    width: i32,
    height: i32,
    cells: Vec<Option<T>>,
}

impl<T> Grid<T> {
    /// Create an empty grid. Each side is clamped to `0..=MAX_DIMENSION`.
    pub fn new(width: i32, height: i32) -> Self {
        Self::from_fn(width, height, |_| None)
    }

    /// Create an empty grid, rejecting dimensions that [`Grid::new`] would
    /// have to clamp.
    pub fn try_new(width: i32, height: i32) -> Result<Self, GridError> {
        if !dimensions_fit(width, height) {
            return Err(GridError::InvalidDimensions { width, height });
        }
        Ok(Self::new(width, height))
    }

    /// Build a grid by asking `f` for the value at every position, in
    /// row-major order. Sides are clamped like [`Grid::new`].
    pub fn from_fn(width: i32, height: i32, mut f: impl FnMut(Position) -> Option<T>) -> Self {
        let width = width.clamp(0, MAX_DIMENSION);
        let height = height.clamp(0, MAX_DIMENSION);
        let mut cells = Vec::with_capacity(width as usize * height as usize);
        for row in 0..height {
            for col in 0..width {
                cells.push(f(Position::new(row, col)));
            }
        }
        Self {
            width,
            height,
            cells,
        }
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Total number of addressable cells (occupied or not).
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// True if `pos` lies within `[0, height) × [0, width)`.
    pub fn contains(&self, pos: Position) -> bool {
        pos.row >= 0 && pos.row < self.height && pos.col >= 0 && pos.col < self.width
    }

    /// Same as [`Grid::contains`]; the name callers use when validating input.
    pub fn position_is_on_grid(&self, pos: Position) -> bool {
        self.contains(pos)
    }

    fn slot(&self, pos: Position) -> Option<usize> {
        self.contains(pos)
            .then(|| pos.row as usize * self.width as usize + pos.col as usize)
    }

    fn index(&self, pos: Position) -> Result<usize, GridError> {
        self.slot(pos).ok_or(GridError::OutOfRange {
            pos,
            width: self.width,
            height: self.height,
        })
    }

    fn position_of(&self, index: usize) -> Position {
        let i = index as i32;
        Position::new(i / self.width, i % self.width)
    }

    pub fn get(&self, pos: Position) -> Result<Option<&T>, GridError> {
        let i = self.index(pos)?;
        Ok(self.cells[i].as_ref())
    }

    pub fn get_mut(&mut self, pos: Position) -> Result<Option<&mut T>, GridError> {
        let i = self.index(pos)?;
        Ok(self.cells[i].as_mut())
    }

    /// Store `value` at `pos`, returning whatever was there before.
    pub fn set(&mut self, pos: Position, value: Option<T>) -> Result<Option<T>, GridError> {
        let i = self.index(pos)?;
        Ok(std::mem::replace(&mut self.cells[i], value))
    }

    /// Store `value` at `pos` only if that position is on the grid and
    /// empty. Otherwise the value is handed back untouched.
    pub fn try_insert(&mut self, pos: Position, value: T) -> Result<(), T> {
        match self.slot(pos) {
            Some(i) if self.cells[i].is_none() => {
                self.cells[i] = Some(value);
                Ok(())
            }
            _ => Err(value),
        }
    }

    /// Remove and return the value at `pos`.
    pub fn take(&mut self, pos: Position) -> Result<Option<T>, GridError> {
        self.set(pos, None)
    }

    pub fn is_empty_at(&self, pos: Position) -> Result<bool, GridError> {
        Ok(self.get(pos)?.is_none())
    }

    /// Every cell in row-major order, empty ones included.
    pub fn iter_all(&self) -> impl Iterator<Item = (Position, Option<&T>)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, c)| (self.position_of(i), c.as_ref()))
    }

    /// Occupied cells only, in row-major order.
    pub fn iter_occupied(&self) -> impl Iterator<Item = (Position, &T)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(move |(i, c)| c.as_ref().map(|v| (self.position_of(i), v)))
    }

    pub fn occupied_positions(&self) -> Vec<Position> {
        self.iter_occupied().map(|(pos, _)| pos).collect()
    }

    /// Consume the grid, yielding owned occupied cells in row-major order.
    pub fn into_occupied(self) -> impl Iterator<Item = (Position, T)> {
        let width = self.width;
        self.cells
            .into_iter()
            .enumerate()
            .filter_map(move |(i, c)| {
                let i = i as i32;
                c.map(|v| (Position::new(i / width, i % width), v))
            })
    }
}

impl<T: Clone> Grid<T> {
    /// Independent copy with the same dimensions and cell values.
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// Copy the `width × height` window whose top-left corner sits at
    /// `origin` in this grid. Window positions that fall off this grid come
    /// back empty, so a negative origin pads and a positive one crops.
    pub fn window(&self, origin: Position, width: i32, height: i32) -> Self {
        Self::from_fn(width, height, |pos| {
            self.slot(pos.offset(origin.row, origin.col))
                .and_then(|i| self.cells[i].clone())
        })
    }
}
