//! Board module - manages the 9x9 grid and line/box clearing
//!
//! The board is a 9x9 grid where each cell is either empty or filled.
//! Uses a flat array for better cache locality and zero-allocation.
//! Coordinates: (row, col) where both range 0..8, row 0 at the top.
//!
//! Completed rows, columns and 3x3 boxes are detected together by
//! [`ClearedLines::detect`] and zeroed by [`Board::clear_lines`]. Unlike a
//! falling-block playfield nothing shifts after a clear; cells are simply emptied.

use arrayvec::ArrayVec;

use crate::types::{BOARD_CELLS, BOARD_SIZE, BOXES_PER_SIDE, BOX_SIZE};

/// The game board - 9 columns x 9 rows using flat array storage
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    /// Flat array of cells, row-major order (row * SIZE + col)
    cells: [bool; BOARD_CELLS],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [false; BOARD_CELLS],
        }
    }

    /// Build a board from a 0/1 grid.
    ///
    /// Returns the offending `(row, col, value)` if any cell is not 0 or 1.
    pub fn from_grid(grid: &[[u8; BOARD_SIZE]; BOARD_SIZE]) -> Result<Self, (usize, usize, u8)> {
        let mut board = Self::new();
        for (row, values) in grid.iter().enumerate() {
            for (col, &value) in values.iter().enumerate() {
                match value {
                    0 => {}
                    1 => board.cells[row * BOARD_SIZE + col] = true,
                    other => return Err((row, col, other)),
                }
            }
        }
        Ok(board)
    }

    /// Calculate flat index from (row, col) coordinates
    #[inline(always)]
    fn index(row: i32, col: i32) -> Option<usize> {
        if row < 0 || col < 0 || row >= BOARD_SIZE as i32 || col >= BOARD_SIZE as i32 {
            return None;
        }
        Some(row as usize * BOARD_SIZE + col as usize)
    }

    /// Edge length of the board
    pub fn size(&self) -> usize {
        BOARD_SIZE
    }

    /// Get cell at position (row, col)
    /// Returns None if out of bounds
    pub fn get(&self, row: i32, col: i32) -> Option<bool> {
        Self::index(row, col).map(|idx| self.cells[idx])
    }

    /// Set cell at position (row, col)
    /// Returns false if out of bounds
    pub fn set(&mut self, row: i32, col: i32, filled: bool) -> bool {
        match Self::index(row, col) {
            Some(idx) => {
                self.cells[idx] = filled;
                true
            }
            None => false,
        }
    }

    /// Check if position is within bounds and filled
    pub fn is_filled(&self, row: i32, col: i32) -> bool {
        matches!(self.get(row, col), Some(true))
    }

    /// Check if position is within bounds and empty
    pub fn is_empty_at(&self, row: i32, col: i32) -> bool {
        matches!(self.get(row, col), Some(false))
    }

    pub fn is_out_of_bounds(&self, row: i32, col: i32) -> bool {
        Self::index(row, col).is_none()
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, row: usize) -> bool {
        if row >= BOARD_SIZE {
            return false;
        }
        let start = row * BOARD_SIZE;
        self.cells[start..start + BOARD_SIZE].iter().all(|&c| c)
    }

    /// Check if a column is completely filled
    pub fn is_col_full(&self, col: usize) -> bool {
        if col >= BOARD_SIZE {
            return false;
        }
        (0..BOARD_SIZE).all(|row| self.cells[row * BOARD_SIZE + col])
    }

    /// Check if the 3x3 box at (box_row, box_col) is completely filled
    pub fn is_box_full(&self, box_row: usize, box_col: usize) -> bool {
        if box_row >= BOXES_PER_SIDE || box_col >= BOXES_PER_SIDE {
            return false;
        }
        box_cells(box_row, box_col).all(|idx| self.cells[idx])
    }

    /// Empty every cell named by `cleared`.
    ///
    /// Returns rows + columns + boxes; a cell covered by more than one
    /// completion is emptied once but each completion still counts.
    pub fn clear_lines(&mut self, cleared: &ClearedLines) -> usize {
        for &row in &cleared.rows {
            let start = row as usize * BOARD_SIZE;
            for cell in &mut self.cells[start..start + BOARD_SIZE] {
                *cell = false;
            }
        }

        for &col in &cleared.columns {
            for row in 0..BOARD_SIZE {
                self.cells[row * BOARD_SIZE + col as usize] = false;
            }
        }

        for &(box_row, box_col) in &cleared.squares {
            for idx in box_cells(box_row as usize, box_col as usize) {
                self.cells[idx] = false;
            }
        }

        cleared.count()
    }

    /// Number of filled cells
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|&c| !c)
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    /// Write the board into a 0/1 grid (row-major)
    pub fn write_u8_grid(&self, out: &mut [[u8; BOARD_SIZE]; BOARD_SIZE]) {
        for (row, out_row) in out.iter_mut().enumerate() {
            let start = row * BOARD_SIZE;
            for (col, cell) in out_row.iter_mut().enumerate() {
                *cell = self.cells[start + col] as u8;
            }
        }
    }

    /// Owned 0/1 copy of the grid
    pub fn to_grid(&self) -> [[u8; BOARD_SIZE]; BOARD_SIZE] {
        let mut grid = [[0u8; BOARD_SIZE]; BOARD_SIZE];
        self.write_u8_grid(&mut grid);
        grid
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        for cell in &mut self.cells {
            *cell = false;
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Flat indices of the cells inside one box
fn box_cells(box_row: usize, box_col: usize) -> impl Iterator<Item = usize> {
    let top = box_row * BOX_SIZE;
    let left = box_col * BOX_SIZE;
    (top..top + BOX_SIZE)
        .flat_map(move |row| (left..left + BOX_SIZE).map(move |col| row * BOARD_SIZE + col))
}

/// Completed rows, columns and boxes found on a board
///
/// Each collection is in ascending order. Boxes are `(box_row, box_col)` in
/// the 3x3 grid-of-boxes partition.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClearedLines {
    pub rows: ArrayVec<u8, BOARD_SIZE>,
    pub columns: ArrayVec<u8, BOARD_SIZE>,
    pub squares: ArrayVec<(u8, u8), { BOXES_PER_SIDE * BOXES_PER_SIDE }>,
}

impl ClearedLines {
    /// Scan the board for every completed row, column and box.
    ///
    /// All three categories are checked independently, so one placement can
    /// report any combination of them. Does not modify the board.
    pub fn detect(board: &Board) -> Self {
        let mut cleared = Self::default();

        for row in 0..BOARD_SIZE {
            if board.is_row_full(row) {
                cleared.rows.push(row as u8);
            }
        }

        for col in 0..BOARD_SIZE {
            if board.is_col_full(col) {
                cleared.columns.push(col as u8);
            }
        }

        for box_row in 0..BOXES_PER_SIDE {
            for box_col in 0..BOXES_PER_SIDE {
                if board.is_box_full(box_row, box_col) {
                    cleared.squares.push((box_row as u8, box_col as u8));
                }
            }
        }

        cleared
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.columns.is_empty() && self.squares.is_empty()
    }

    /// Rows + columns + boxes
    pub fn count(&self) -> usize {
        self.rows.len() + self.columns.len() + self.squares.len()
    }

    /// Rows + columns
    pub fn line_count(&self) -> usize {
        self.rows.len() + self.columns.len()
    }

    /// How many of the three categories (rows, columns, boxes) are non-empty
    pub fn category_count(&self) -> usize {
        [
            !self.rows.is_empty(),
            !self.columns.is_empty(),
            !self.squares.is_empty(),
        ]
        .iter()
        .filter(|&&present| present)
        .count()
    }

    /// Whether this clear qualifies as a combo.
    ///
    /// Qualifies when at least two categories complete together, or when at
    /// least `line_threshold` rows (or columns) complete together.
    pub fn is_combo(&self, line_threshold: usize) -> bool {
        let threshold = line_threshold.max(1);
        self.category_count() >= 2
            || self.rows.len() >= threshold
            || self.columns.len() >= threshold
    }
}
