//! Block supply - the pool of blocks currently offered to the player
//!
//! The engine only talks to the [`BlockSupply`] trait. [`BlockGenerator`] is the
//! default seeded implementation; callers can plug in their own (a fixed list
//! for puzzles, a networked dealer, ...).

use crate::blocks::{catalog_shape, is_creative, Block, BlockId};
use crate::rng::SimpleRng;
use crate::types::{BlockTag, Rotation, ShapeKind, WildKind};

/// Filters applied when a new supply is generated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationConstraints {
    pub allowed: Vec<ShapeKind>,
    /// Inclusive range for the larger bounding-box edge
    pub min_size: u8,
    pub max_size: u8,
    pub wild_chance_percent: u8,
}

impl GenerationConstraints {
    pub fn fits(&self, kind: ShapeKind, rotation: Rotation) -> bool {
        let size = catalog_shape(kind).rotated(rotation).size();
        size >= self.min_size as usize && size <= self.max_size as usize
    }

    /// Every allowed (kind, rotation) pair inside the size range
    pub fn candidates(&self) -> Vec<(ShapeKind, Rotation)> {
        self.allowed
            .iter()
            .flat_map(|&kind| Rotation::ALL.iter().map(move |&rotation| (kind, rotation)))
            .filter(|&(kind, rotation)| self.fits(kind, rotation))
            .collect()
    }
}

impl Default for GenerationConstraints {
    fn default() -> Self {
        Self {
            allowed: ShapeKind::ALL.to_vec(),
            min_size: 1,
            max_size: 5,
            wild_chance_percent: 0,
        }
    }
}

/// Source of placeable blocks
pub trait BlockSupply {
    /// Blocks currently available, in offer order
    fn current_blocks(&self) -> &[Block];

    /// Remove a block after it was placed; None if it was not in the pool
    fn remove_block(&mut self, id: BlockId) -> Option<Block>;

    /// Replace the pool with `count` freshly generated blocks
    fn generate_new_blocks(&mut self, count: usize, constraints: &GenerationConstraints);

    /// Replace the pool with exactly these blocks (snapshot restore)
    fn replace_blocks(&mut self, blocks: Vec<Block>);

    /// Restart the random stream; suppliers without randomness ignore it
    fn reseed(&mut self, _seed: u32) {}
}

/// Seeded random supply
#[derive(Debug, Clone)]
pub struct BlockGenerator {
    rng: SimpleRng,
    next_id: u32,
    blocks: Vec<Block>,
}

impl BlockGenerator {
    pub fn new(seed: u32) -> Self {
        Self {
            rng: SimpleRng::new(seed),
            next_id: 1,
            blocks: Vec::new(),
        }
    }

    fn allocate_id(&mut self) -> BlockId {
        let id = BlockId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    /// Draw one block honoring the constraints.
    ///
    /// Falls back to a single cell when nothing in the allowed set fits.
    fn draw(&mut self, candidates: &[(ShapeKind, Rotation)], wild_chance: u8) -> Block {
        let (kind, rotation) = self
            .rng
            .pick(candidates)
            .copied()
            .unwrap_or((ShapeKind::Single, Rotation::Deg0));

        let mut tag = if is_creative(kind) {
            BlockTag::Creative
        } else {
            BlockTag::Standard
        };
        if self.rng.chance(wild_chance) {
            if let Some(&wild) = self.rng.pick(&WildKind::ALL) {
                tag = BlockTag::Wild(wild);
            }
        }

        let id = self.allocate_id();
        Block::new(id, kind, rotation, tag)
    }
}

impl Default for BlockGenerator {
    fn default() -> Self {
        Self::new(1)
    }
}

impl BlockSupply for BlockGenerator {
    fn current_blocks(&self) -> &[Block] {
        &self.blocks
    }

    fn remove_block(&mut self, id: BlockId) -> Option<Block> {
        let idx = self.blocks.iter().position(|b| b.id() == id)?;
        Some(self.blocks.remove(idx))
    }

    fn generate_new_blocks(&mut self, count: usize, constraints: &GenerationConstraints) {
        let candidates = constraints.candidates();
        let blocks = (0..count)
            .map(|_| self.draw(&candidates, constraints.wild_chance_percent))
            .collect();
        self.blocks = blocks;
    }

    fn replace_blocks(&mut self, blocks: Vec<Block>) {
        // Keep ids unique across the restored pool and future draws.
        let max_id = blocks.iter().map(|b| b.id().0).max().unwrap_or(0);
        if max_id >= self.next_id {
            self.next_id = max_id.wrapping_add(1);
        }
        self.blocks = blocks;
    }

    fn reseed(&mut self, seed: u32) {
        self.rng = SimpleRng::new(seed);
    }
}
