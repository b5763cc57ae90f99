//! Top-down surface of a chunk, the data behind a map preview.
//!
//! For every column the highest block with a map color is kept. Water is see
//! through: a column whose top is water also records how deep the water is,
//! taken from the first solid block under it.

use std::cmp::Reverse;
use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use bon::Builder;
use mc_nbt::Compound;
use mc_region::{load_chunks_with_cancel, AnvilLocation, ChunkLocation, ChunkOutcome};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::colors::{block_color, is_water, Rgba};
use crate::error::{Error, Result};
use crate::section::{sections_from_chunk, ChunkSection};

/// Columns in a chunk
pub const CHUNK_COLUMNS: usize = 256;

/// Height reported for columns without any colored block
pub const EMPTY_Y: i32 = -63;

/// Water floors at or below this height count as deepest
const DEEP_FLOOR_Y: i32 = 53;
/// Water floors at or above this height count as shallowest
const SHALLOW_FLOOR_Y: i32 = 60;

/// The visible block of one column
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SurfaceBlock {
    pub color: Rgba,
    pub y: i32,
    pub is_water: bool,
    /// For water columns, `0` (deep) to `7` (shallow) from the height of the floor
    pub depth: u8,
}

impl SurfaceBlock {
    pub const EMPTY: SurfaceBlock = SurfaceBlock {
        color: [0, 0, 0, 0],
        y: EMPTY_Y,
        is_water: false,
        depth: 0,
    };

    pub fn is_empty(&self) -> bool {
        *self == Self::EMPTY
    }
}

impl Default for SurfaceBlock {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Surface of one chunk
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Surface {
    pub location: ChunkLocation,
    /// One block per column, indexed `z * 16 + x`
    pub blocks: Vec<SurfaceBlock>,
    /// Every height holding a colored block, when requested
    pub valid_y: Option<BTreeSet<i32>>,
}

impl Surface {
    /// The visible block at chunk-local `(x, z)`
    pub fn block(&self, x: usize, z: usize) -> Option<&SurfaceBlock> {
        if x >= 16 || z >= 16 {
            return None;
        }
        self.blocks.get(z * 16 + x)
    }
}

/// Options for scanning the surface of chunks
#[derive(Debug, Clone, Copy, Builder)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RegionScanOptions {
    /// Blocks above this height are ignored when picking the visible block
    #[builder(default = i32::MAX)]
    pub y_limit: i32,

    /// Collect every height holding a colored block
    #[builder(default)]
    pub scan_valid_y: bool,
}

impl Default for RegionScanOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Column {
    Open,
    UnderWater,
    Done,
}

/// Compute the surface of a chunk from its sections.
///
/// Sections are scanned from the top down, each from local height 15 to 0. Sections that
/// hold nothing but air are skipped.
#[instrument(skip(sections), err, fields(sections = sections.len()))]
pub fn extract_surface(
    location: ChunkLocation,
    sections: &[ChunkSection],
    y_limit: i32,
    scan_valid_y: bool,
) -> Result<Surface> {
    let mut ordered: Vec<&ChunkSection> = sections.iter().collect();
    ordered.sort_by_key(|section| Reverse(section.y));

    let mut blocks = vec![SurfaceBlock::EMPTY; CHUNK_COLUMNS];
    let mut columns = [Column::Open; CHUNK_COLUMNS];
    let mut open = CHUNK_COLUMNS;
    let mut valid_y = scan_valid_y.then(BTreeSet::new);

    for section in ordered {
        if open == 0 && valid_y.is_none() {
            break;
        }
        if section.is_air_only() {
            continue;
        }

        let min_y = section.min_block_y()?;
        let indices = section.block_indices()?;
        let colors: Vec<Option<Rgba>> = section.palette.iter().map(|n| block_color(n)).collect();
        let water: Vec<bool> = section.palette.iter().map(|n| is_water(n)).collect();

        for local_y in (0..16).rev() {
            let y = min_y + local_y as i32;
            let layer = &indices[local_y * CHUNK_COLUMNS..(local_y + 1) * CHUNK_COLUMNS];

            // within a layer, i % 16 is x and i / 16 is z
            for (column, &index) in layer.iter().enumerate() {
                let index = index as usize;
                let Some(color) = colors[index] else {
                    continue;
                };
                if let Some(valid_y) = valid_y.as_mut() {
                    valid_y.insert(y);
                }
                if y > y_limit {
                    continue;
                }

                match columns[column] {
                    Column::Open => {
                        blocks[column] = SurfaceBlock {
                            color,
                            y,
                            is_water: water[index],
                            depth: 0,
                        };
                        if water[index] {
                            columns[column] = Column::UnderWater;
                        } else {
                            columns[column] = Column::Done;
                            open -= 1;
                        }
                    }
                    Column::UnderWater if !water[index] => {
                        blocks[column].depth =
                            (y.clamp(DEEP_FLOOR_Y, SHALLOW_FLOOR_Y) - DEEP_FLOOR_Y) as u8;
                        columns[column] = Column::Done;
                        open -= 1;
                    }
                    Column::UnderWater | Column::Done => {}
                }
            }
        }
    }

    Ok(Surface {
        location,
        blocks,
        valid_y,
    })
}

/// Compute the surface of a decoded chunk compound
pub fn extract_chunk_surface(
    location: ChunkLocation,
    chunk: &Compound,
    options: &RegionScanOptions,
) -> Result<Surface> {
    let sections = sections_from_chunk(chunk)?;
    extract_surface(location, &sections, options.y_limit, options.scan_valid_y)
}

/// Merge a set of heights into ordered runs of consecutive values
pub fn y_ranges(valid_y: &BTreeSet<i32>) -> Vec<RangeInclusive<i32>> {
    let mut ranges: Vec<RangeInclusive<i32>> = Vec::new();
    for &y in valid_y {
        match ranges.last_mut() {
            Some(range) if range.end().checked_add(1) == Some(y) => *range = *range.start()..=y,
            _ => ranges.push(y..=y),
        }
    }
    ranges
}

/// Surfaces of every chunk in a region
#[derive(Debug)]
pub struct RegionSurface {
    pub anvil: AnvilLocation,
    /// One outcome per present chunk, in header slot order
    pub chunks: Vec<ChunkOutcome<Surface, Error>>,
    /// Union of the chunks' valid heights, when requested
    pub valid_y: Option<BTreeSet<i32>>,
}

impl RegionSurface {
    pub fn surfaces(&self) -> impl Iterator<Item = &Surface> {
        self.chunks.iter().filter_map(|outcome| outcome.result.as_ref().ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = (ChunkLocation, &Error)> {
        self.chunks
            .iter()
            .filter_map(|outcome| outcome.result.as_ref().err().map(|err| (outcome.location, err)))
    }
}

/// Compute the surface of every chunk in a region file.
///
/// Each chunk is decoded once. A chunk that fails keeps its error in
/// [`RegionSurface::chunks`]; `should_continue` is asked before every chunk and
/// answering `false` stops the scan with a cancellation error.
#[instrument(skip(bytes, should_continue), err, fields(size = bytes.len()))]
pub fn extract_region_surface(
    anvil: AnvilLocation,
    bytes: &[u8],
    options: &RegionScanOptions,
    should_continue: impl Fn() -> bool,
) -> Result<RegionSurface> {
    let chunks = load_chunks_with_cancel(anvil, bytes, should_continue, |location, chunk| {
        extract_chunk_surface(location, &chunk, options)
    })?;

    let valid_y = options.scan_valid_y.then(|| {
        chunks
            .iter()
            .filter_map(|outcome| outcome.result.as_ref().ok())
            .filter_map(|surface| surface.valid_y.as_ref())
            .flatten()
            .copied()
            .collect()
    });

    debug!(
        chunks = chunks.len(),
        failed = chunks.iter().filter(|c| c.result.is_err()).count(),
        "scanned region surface"
    );
    Ok(RegionSurface {
        anvil,
        chunks,
        valid_y,
    })
}
