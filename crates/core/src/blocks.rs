//! Blocks module - shape catalog, rotation and block instances
//!
//! Shapes are stored as row bitmasks (bit `c` of `masks[r]` is the cell at
//! row `r`, column `c`) inside a bounding box of at most 5x5. Rotation is a
//! pure transform of that matrix.

use std::fmt;

use crate::types::{BlockTag, Rotation, ShapeKind, MAX_SHAPE_DIM};

/// Occupied footprint of a block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    height: u8,
    width: u8,
    masks: [u8; MAX_SHAPE_DIM],
}

/// Why a raw cell matrix could not become a [`Shape`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeError {
    /// Zero rows or zero columns
    Empty,
    TooLarge { height: usize, width: usize },
    Ragged { row: usize },
    InvalidCell { row: usize, col: usize, value: u8 },
}

impl fmt::Display for ShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeError::Empty => f.write_str("shape has no rows or no columns"),
            ShapeError::TooLarge { height, width } => write!(
                f,
                "shape {}x{} exceeds {}x{}",
                height, width, MAX_SHAPE_DIM, MAX_SHAPE_DIM
            ),
            ShapeError::Ragged { row } => write!(f, "shape row {} has a different width", row),
            ShapeError::InvalidCell { row, col, value } => {
                write!(f, "shape cell ({}, {}) is {}, expected 0 or 1", row, col, value)
            }
        }
    }
}

impl std::error::Error for ShapeError {}

impl Shape {
    /// Build a shape from a 0/1 matrix, validating dimensions and values.
    ///
    /// An all-zero matrix is accepted; a 0-row or 0-column one is not.
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self, ShapeError> {
        let height = rows.len();
        let width = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
        if height == 0 || width == 0 {
            return Err(ShapeError::Empty);
        }
        if height > MAX_SHAPE_DIM || width > MAX_SHAPE_DIM {
            return Err(ShapeError::TooLarge { height, width });
        }

        let mut masks = [0u8; MAX_SHAPE_DIM];
        for (r, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != width {
                return Err(ShapeError::Ragged { row: r });
            }
            for (c, &value) in row.iter().enumerate() {
                match value {
                    0 => {}
                    1 => masks[r] |= 1 << c,
                    other => {
                        return Err(ShapeError::InvalidCell {
                            row: r,
                            col: c,
                            value: other,
                        })
                    }
                }
            }
        }

        Ok(Self {
            height: height as u8,
            width: width as u8,
            masks,
        })
    }

    pub fn height(&self) -> usize {
        self.height as usize
    }

    pub fn width(&self) -> usize {
        self.width as usize
    }

    /// Larger edge of the bounding box
    pub fn size(&self) -> usize {
        self.height().max(self.width())
    }

    /// Whether (row, col) is occupied; false outside the bounding box
    pub fn cell(&self, row: usize, col: usize) -> bool {
        row < self.height() && col < self.width() && self.masks[row] & (1 << col) != 0
    }

    pub fn cell_count(&self) -> u32 {
        self.masks.iter().map(|m| m.count_ones()).sum()
    }

    /// Occupied (row, col) offsets in row-major order
    pub fn offsets(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.height()).flat_map(move |r| {
            (0..self.width()).filter_map(move |c| self.cell(r, c).then_some((r, c)))
        })
    }

    /// The shape as a 0/1 matrix
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        (0..self.height())
            .map(|r| (0..self.width()).map(|c| self.cell(r, c) as u8).collect())
            .collect()
    }

    /// Rotate 90° clockwise
    pub fn rotated_cw(&self) -> Shape {
        let (h, w) = (self.height(), self.width());
        let mut masks = [0u8; MAX_SHAPE_DIM];
        // new[r][c] = old[h - 1 - c][r]
        for (r, mask) in masks.iter_mut().enumerate().take(w) {
            for c in 0..h {
                if self.cell(h - 1 - c, r) {
                    *mask |= 1 << c;
                }
            }
        }
        Shape {
            height: self.width,
            width: self.height,
            masks,
        }
    }

    /// Rotate clockwise by `rotation`
    pub fn rotated(&self, rotation: Rotation) -> Shape {
        let mut shape = *self;
        for _ in 0..rotation.quarter_turns() {
            shape = shape.rotated_cw();
        }
        shape
    }
}

/// Matrix literal to shape, for the static catalog
const fn grid(rows: &[&[u8]]) -> Shape {
    let mut masks = [0u8; MAX_SHAPE_DIM];
    let mut r = 0;
    while r < rows.len() {
        let mut c = 0;
        while c < rows[r].len() {
            if rows[r][c] != 0 {
                masks[r] |= 1 << c;
            }
            c += 1;
        }
        r += 1;
    }
    Shape {
        height: rows.len() as u8,
        width: rows[0].len() as u8,
        masks,
    }
}

const SINGLE: Shape = grid(&[&[1]]);
const DOMINO: Shape = grid(&[&[1, 1]]);
const LINE3: Shape = grid(&[&[1, 1, 1]]);
const LINE4: Shape = grid(&[&[1, 1, 1, 1]]);
const LINE5: Shape = grid(&[&[1, 1, 1, 1, 1]]);
const CORNER: Shape = grid(&[&[1, 0], &[1, 1]]);
const SQUARE: Shape = grid(&[&[1, 1], &[1, 1]]);
const L: Shape = grid(&[&[1, 0], &[1, 0], &[1, 1]]);
const J: Shape = grid(&[&[0, 1], &[0, 1], &[1, 1]]);
const T: Shape = grid(&[&[1, 1, 1], &[0, 1, 0]]);
const S: Shape = grid(&[&[0, 1, 1], &[1, 1, 0]]);
const Z: Shape = grid(&[&[1, 1, 0], &[0, 1, 1]]);
const PLUS: Shape = grid(&[&[0, 1, 0], &[1, 1, 1], &[0, 1, 0]]);
const BIG_CORNER: Shape = grid(&[&[1, 0, 0], &[1, 0, 0], &[1, 1, 1]]);
const U: Shape = grid(&[&[1, 0, 1], &[1, 1, 1]]);
const BIG_SQUARE: Shape = grid(&[&[1, 1, 1], &[1, 1, 1], &[1, 1, 1]]);

/// Base (unrotated) shape of a catalog kind
pub fn catalog_shape(kind: ShapeKind) -> Shape {
    match kind {
        ShapeKind::Single => SINGLE,
        ShapeKind::Domino => DOMINO,
        ShapeKind::Line3 => LINE3,
        ShapeKind::Line4 => LINE4,
        ShapeKind::Line5 => LINE5,
        ShapeKind::Corner => CORNER,
        ShapeKind::Square => SQUARE,
        ShapeKind::L => L,
        ShapeKind::J => J,
        ShapeKind::T => T,
        ShapeKind::S => S,
        ShapeKind::Z => Z,
        ShapeKind::Plus => PLUS,
        ShapeKind::BigCorner => BIG_CORNER,
        ShapeKind::U => U,
        ShapeKind::BigSquare => BIG_SQUARE,
    }
}

/// Display color (hex) of a catalog kind
pub fn catalog_color(kind: ShapeKind) -> &'static str {
    match kind {
        ShapeKind::Single => "#6c5ce7",
        ShapeKind::Domino => "#00b894",
        ShapeKind::Line3 => "#0984e3",
        ShapeKind::Line4 => "#00cec9",
        ShapeKind::Line5 => "#74b9ff",
        ShapeKind::Corner => "#fdcb6e",
        ShapeKind::Square => "#e17055",
        ShapeKind::L => "#fab1a0",
        ShapeKind::J => "#a29bfe",
        ShapeKind::T => "#fd79a8",
        ShapeKind::S => "#55efc4",
        ShapeKind::Z => "#d63031",
        ShapeKind::Plus => "#e84393",
        ShapeKind::BigCorner => "#ffeaa7",
        ShapeKind::U => "#81ecec",
        ShapeKind::BigSquare => "#2d3436",
    }
}

/// Shapes only offered when a difficulty allows creative shapes
pub fn is_creative(kind: ShapeKind) -> bool {
    matches!(
        kind,
        ShapeKind::Plus | ShapeKind::BigCorner | ShapeKind::U | ShapeKind::BigSquare
    )
}

/// Color used for blocks built from a raw matrix
pub const CUSTOM_COLOR: &str = "#b2bec3";

/// Unique id of one block instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockId(pub u32);

/// A placeable block instance
///
/// Immutable once built; rotating yields a new value with the same id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Block {
    id: BlockId,
    kind: Option<ShapeKind>,
    shape: Shape,
    color: &'static str,
    points: u32,
    rotation: Rotation,
    tag: BlockTag,
}

impl Block {
    /// Catalog block in the given orientation
    pub fn new(id: BlockId, kind: ShapeKind, rotation: Rotation, tag: BlockTag) -> Self {
        let shape = catalog_shape(kind).rotated(rotation);
        Self {
            id,
            kind: Some(kind),
            points: shape.cell_count(),
            shape,
            color: catalog_color(kind),
            rotation,
            tag,
        }
    }

    /// Block with an arbitrary footprint (no catalog kind)
    pub fn custom(id: BlockId, shape: Shape) -> Self {
        Self {
            id,
            kind: None,
            points: shape.cell_count(),
            shape,
            color: CUSTOM_COLOR,
            rotation: Rotation::Deg0,
            tag: BlockTag::Standard,
        }
    }

    pub fn id(&self) -> BlockId {
        self.id
    }

    pub fn kind(&self) -> Option<ShapeKind> {
        self.kind
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn color(&self) -> &'static str {
        self.color
    }

    /// Base point value (occupied cell count)
    pub fn points(&self) -> u32 {
        self.points
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn tag(&self) -> BlockTag {
        self.tag
    }

    pub fn cell_count(&self) -> u32 {
        self.shape.cell_count()
    }

    /// Same block turned 90° clockwise
    pub fn rotate_cw(&self) -> Self {
        Self {
            shape: self.shape.rotated_cw(),
            rotation: self.rotation.rotate_cw(),
            ..self.clone()
        }
    }

    /// Same block with a different tag
    pub fn with_tag(&self, tag: BlockTag) -> Self {
        Self {
            tag,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_shapes_are_well_formed() {
        for kind in ShapeKind::ALL {
            let shape = catalog_shape(kind);
            let rebuilt = Shape::from_rows(&shape.to_rows()).unwrap();
            assert_eq!(rebuilt, shape, "{:?}", kind);
            assert!(shape.cell_count() > 0);
            assert!(shape.size() <= MAX_SHAPE_DIM);
        }
    }

    #[test]
    fn test_from_rows_rejects_bad_input() {
        assert_eq!(
            Shape::from_rows(&[vec![1u8, 1], vec![1u8]]),
            Err(ShapeError::Ragged { row: 1 })
        );
        assert_eq!(
            Shape::from_rows(&[[1u8, 2]]),
            Err(ShapeError::InvalidCell {
                row: 0,
                col: 1,
                value: 2
            })
        );
        assert_eq!(
            Shape::from_rows(&[[1u8; 6]]),
            Err(ShapeError::TooLarge {
                height: 1,
                width: 6
            })
        );
    }

    #[test]
    fn test_from_rows_rejects_zero_sized_matrix() {
        assert_eq!(Shape::from_rows::<[u8; 0]>(&[]), Err(ShapeError::Empty));
        assert_eq!(Shape::from_rows(&[[0u8; 0]]), Err(ShapeError::Empty));
        assert_eq!(Shape::from_rows(&[[0u8; 0], [0u8; 0]]), Err(ShapeError::Empty));
        // Real dimensions with no cells are fine.
        let blank = Shape::from_rows(&[[0u8, 0]]).unwrap();
        assert_eq!((blank.height(), blank.width(), blank.cell_count()), (1, 2, 0));
    }

    #[test]
    fn test_rotate_l_clockwise() {
        let rotated = catalog_shape(ShapeKind::L).rotated_cw();
        assert_eq!(rotated.to_rows(), vec![vec![1, 1, 1], vec![1, 0, 0]]);
    }

    #[test]
    fn test_four_rotations_identity() {
        for kind in ShapeKind::ALL {
            let shape = catalog_shape(kind);
            let mut turned = shape;
            for _ in 0..4 {
                turned = turned.rotated_cw();
            }
            assert_eq!(turned, shape);
        }
    }

    #[test]
    fn test_rotation_keeps_cell_count() {
        for kind in ShapeKind::ALL {
            for rotation in Rotation::ALL {
                let block = Block::new(BlockId(1), kind, rotation, BlockTag::Standard);
                assert_eq!(block.cell_count(), catalog_shape(kind).cell_count());
                assert_eq!(block.points(), block.cell_count());
            }
        }
    }

    #[test]
    fn test_block_rotate_keeps_id() {
        let block = Block::new(BlockId(7), ShapeKind::Line3, Rotation::Deg0, BlockTag::Standard);
        let turned = block.rotate_cw();
        assert_eq!(turned.id(), BlockId(7));
        assert_eq!(turned.rotation(), Rotation::Deg90);
        assert_eq!((turned.shape().height(), turned.shape().width()), (3, 1));
    }

    #[test]
    fn test_offsets_row_major() {
        let offsets: Vec<_> = catalog_shape(ShapeKind::T).offsets().collect();
        assert_eq!(offsets, vec![(0, 0), (0, 1), (0, 2), (1, 1)]);
    }
}
