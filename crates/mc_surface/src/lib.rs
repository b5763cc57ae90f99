//! This library computes the top-down **surface** of *Minecraft* chunks: for every column of
//! blocks, the highest block that shows on a map, its color and height.
//!
//! # Block States
//!
//! A chunk is cut into sections of 16x16x16 blocks, stacked by their `Y` index. Each section
//! holds a palette of block names and one packed palette index per block.
//!
//! | Layout     | Section list     | Palette                 | Packed indices              |
//! |------------|------------------|-------------------------|-----------------------------|
//! | since 1.18 | `sections`       | `block_states.palette`  | `block_states.data`         |
//! | before     | `Level.Sections` | `Palette`               | `BlockStates`               |
//!
//! Blocks are ordered `y, z, x`: block `i` of a section sits at `x = i % 16`,
//! `z = (i / 16) % 16` and `y = section_y * 16 + i / 256`.
//!
//! Indices take `max(4, ceil(log2(palette size)))` bits and never straddle two 64 bit words.
//! A section whose palette has a single entry carries no packed data.
//!
//! # Surface
//!
//! Columns are scanned from the top down. The first block with a map color is the surface;
//! when it is water the scan goes on to the first solid block to grade the water from deep
//! (`0`) to shallow (`7`). Columns without any colored block report a transparent block at
//! height `-63`.

pub mod colors;
pub mod error;
pub mod palette;
pub mod section;
pub mod surface;

pub use colors::{block_color, Rgba};
pub use section::{sections_from_chunk, ChunkSection};
pub use surface::{
    extract_chunk_surface, extract_region_surface, extract_surface, y_ranges, RegionScanOptions,
    RegionSurface, Surface, SurfaceBlock,
};
