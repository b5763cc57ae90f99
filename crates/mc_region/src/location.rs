//! World coordinates at block, chunk and region granularity.
//!
//! A chunk is 16x16 blocks and a region file holds 32x32 chunks. Conversions
//! floor-divide, so block `-1` lives in chunk `-1` and region `-1`.

use derive_more::Display;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Chunks per region along each axis
pub const REGION_CHUNKS: i32 = 32;

/// Blocks per chunk along each axis
pub const CHUNK_BLOCKS: i32 = 16;

/// Location of a region file, as in `r.<x>.<z>.mca`
#[derive(Display, Debug, Default, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[display("r.{x}.{z}")]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AnvilLocation {
    pub x: i32,
    pub z: i32,
}

impl AnvilLocation {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Parse a region file name such as `r.0.-1.mca`
    pub fn from_file_name(name: &str) -> Option<Self> {
        let mut parts = name.strip_prefix("r.")?.strip_suffix(".mca")?.split('.');
        let x = parts.next()?.parse().ok()?;
        let z = parts.next()?.parse().ok()?;
        if parts.next().is_some() {
            return None;
        }
        Some(Self { x, z })
    }

    pub fn file_name(&self) -> String {
        format!("r.{}.{}.mca", self.x, self.z)
    }

    /// The chunk at local coordinates `(cx, cz)` of this region; both are wrapped into `0..32`
    pub fn chunk(&self, cx: i32, cz: i32) -> ChunkLocation {
        ChunkLocation {
            x: self.x * REGION_CHUNKS + cx.rem_euclid(REGION_CHUNKS),
            z: self.z * REGION_CHUNKS + cz.rem_euclid(REGION_CHUNKS),
        }
    }

    /// The chunk stored in header slot `slot` (`0..1024`)
    pub fn chunk_for_slot(&self, slot: usize) -> ChunkLocation {
        let slot = slot as i32;
        self.chunk(slot % REGION_CHUNKS, slot / REGION_CHUNKS)
    }

    pub fn contains(&self, chunk: ChunkLocation) -> bool {
        chunk.anvil() == *self
    }
}

/// Location of a chunk in chunk coordinates
#[derive(Display, Debug, Default, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[display("({x}, {z})")]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ChunkLocation {
    pub x: i32,
    pub z: i32,
}

impl ChunkLocation {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// The region file holding this chunk
    pub fn anvil(&self) -> AnvilLocation {
        AnvilLocation {
            x: self.x.div_euclid(REGION_CHUNKS),
            z: self.z.div_euclid(REGION_CHUNKS),
        }
    }

    /// Coordinates inside the region, both in `0..32`
    pub fn local(&self) -> (usize, usize) {
        (
            self.x.rem_euclid(REGION_CHUNKS) as usize,
            self.z.rem_euclid(REGION_CHUNKS) as usize,
        )
    }

    /// Index of this chunk in the region header tables
    pub fn slot(&self) -> usize {
        let (cx, cz) = self.local();
        cx + cz * REGION_CHUNKS as usize
    }

    /// The block at the north-west corner of this chunk
    pub fn origin(&self) -> BlockLocation {
        BlockLocation {
            x: self.x * CHUNK_BLOCKS,
            z: self.z * CHUNK_BLOCKS,
        }
    }
}

impl From<BlockLocation> for ChunkLocation {
    fn from(value: BlockLocation) -> Self {
        value.chunk()
    }
}

impl From<ChunkLocation> for AnvilLocation {
    fn from(value: ChunkLocation) -> Self {
        value.anvil()
    }
}

/// Location of a block column in block coordinates
#[derive(Display, Debug, Default, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[display("({x}, {z})")]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BlockLocation {
    pub x: i32,
    pub z: i32,
}

impl BlockLocation {
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    pub fn chunk(&self) -> ChunkLocation {
        ChunkLocation {
            x: self.x.div_euclid(CHUNK_BLOCKS),
            z: self.z.div_euclid(CHUNK_BLOCKS),
        }
    }

    pub fn anvil(&self) -> AnvilLocation {
        self.chunk().anvil()
    }
}
