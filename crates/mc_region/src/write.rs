//! Types for writing region files
//!

use std::io::{Cursor, Write};

use binrw::BinWrite;
use bon::Builder;
use flate2::Compression;
use indexmap::IndexMap;
use mc_nbt::compression::deflate_with;
use mc_nbt::{write_as_root, Compound};
use tracing::{debug, instrument};

use crate::error::{Error, Result};
use crate::location::{AnvilLocation, ChunkLocation};
use crate::read::RegionFile;
use crate::types::{
    ChunkHeader, CompressionScheme, RegionHeader, SectorLocation, CHUNK_HEADER_SIZE, HEADER_SIZE,
    MAX_CHUNK_SECTORS, SECTOR_SIZE,
};

const MAX_COMPRESSION_LEVEL: u32 = 9;

/// Options for how the region file should be written
#[derive(Debug, Clone, Copy, Builder)]
pub struct RegionWriterOptions {
    /// zlib level (0-9) used for chunks added with [`RegionWriter::set_chunk`]
    #[builder(default = 6)]
    pub compression_level: u32,
}

impl Default for RegionWriterOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[derive(Debug, Clone)]
struct PendingChunk {
    scheme: u8,
    data: Vec<u8>,
    timestamp: u32,
}

fn sectors_for(data_len: usize) -> usize {
    (data_len + CHUNK_HEADER_SIZE).div_ceil(SECTOR_SIZE)
}

/// Region file generator
///
/// Chunks can be added in any order; [`RegionWriter::finish`] lays them out in header
/// slot order, packed back to back from the first sector after the header.
///
/// ```
/// # fn doit() -> mc_region::error::Result<()>
/// # {
/// use mc_nbt::Compound;
/// use mc_region::write::{RegionWriter, RegionWriterOptions};
/// use mc_region::{AnvilLocation, ChunkLocation, RegionFile};
///
/// let anvil = AnvilLocation::new(0, -1);
/// let mut writer = RegionWriter::new(anvil, RegionWriterOptions::builder()
///            .compression_level(9)
///            .build());
///
/// let mut chunk = Compound::new();
/// chunk.push("xPos", 3i32);
/// writer.set_chunk(ChunkLocation::new(3, -27), &chunk, 1_700_000_000)?;
///
/// let bytes = writer.finish()?;
/// let region = RegionFile::new(anvil, &bytes)?;
/// assert_eq!(region.load_chunk(ChunkLocation::new(3, -27))?, Some(chunk));
///
/// # Ok(())
/// # }
/// # doit().unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct RegionWriter {
    anvil: AnvilLocation,
    options: RegionWriterOptions,
    chunks: IndexMap<usize, PendingChunk>,
}

impl RegionWriter {
    pub fn new(anvil: AnvilLocation, options: RegionWriterOptions) -> RegionWriter {
        RegionWriter {
            anvil,
            options,
            chunks: IndexMap::new(),
        }
    }

    /// Start from the chunks of an existing region, keeping their compressed payloads
    #[instrument(skip_all, err, fields(anvil = %region.anvil(), chunks = region.len()))]
    pub fn from_region(region: &RegionFile<'_>, options: RegionWriterOptions) -> Result<Self> {
        let mut writer = Self::new(region.anvil(), options);
        for entry in region.entries() {
            if let Some(raw) = region.raw_chunk(entry.location)? {
                writer.set_raw_chunk(entry.location, raw.scheme, raw.data.to_vec(), entry.timestamp)?;
            }
        }
        Ok(writer)
    }

    pub fn anvil(&self) -> AnvilLocation {
        self.anvil
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn contains(&self, location: ChunkLocation) -> bool {
        self.anvil.contains(location) && self.chunks.contains_key(&location.slot())
    }

    /// Add or replace a chunk, compressing it with zlib
    #[instrument(skip(self, chunk), err)]
    pub fn set_chunk(
        &mut self,
        location: ChunkLocation,
        chunk: &Compound,
        timestamp: u32,
    ) -> Result<()> {
        let level = self.options.compression_level;
        if level > MAX_COMPRESSION_LEVEL {
            return Err(Error::InvalidCompressionLevel(level));
        }

        let mut raw = Vec::new();
        write_as_root(chunk, &mut raw)?;
        let data = deflate_with(&raw, Compression::new(level))?;
        self.set_raw_chunk(location, CompressionScheme::Zlib.id(), data, timestamp)
    }

    /// Add or replace a chunk with an already compressed payload
    pub fn set_raw_chunk(
        &mut self,
        location: ChunkLocation,
        scheme: u8,
        data: Vec<u8>,
        timestamp: u32,
    ) -> Result<()> {
        if !self.anvil.contains(location) {
            return Err(Error::ChunkOutsideRegion {
                chunk: location,
                anvil: self.anvil,
            });
        }
        let sectors = sectors_for(data.len());
        if sectors > MAX_CHUNK_SECTORS {
            return Err(Error::ChunkTooLarge { location, sectors });
        }

        self.chunks.insert(
            location.slot(),
            PendingChunk {
                scheme,
                data,
                timestamp,
            },
        );
        Ok(())
    }

    /// Remove a chunk; returns whether it was present
    pub fn remove_chunk(&mut self, location: ChunkLocation) -> bool {
        self.anvil.contains(location) && self.chunks.shift_remove(&location.slot()).is_some()
    }

    /// Lay out the chunks and produce the bytes of the region file
    #[instrument(skip(self), err, fields(anvil = %self.anvil, chunks = self.chunks.len()))]
    pub fn finish(mut self) -> Result<Vec<u8>> {
        self.chunks.sort_unstable_keys();

        let mut header = RegionHeader::default();
        let mut out = Cursor::new(vec![0u8; HEADER_SIZE]);
        out.set_position(HEADER_SIZE as u64);

        let mut next_sector = HEADER_SIZE / SECTOR_SIZE;
        for (&slot, chunk) in &self.chunks {
            let sectors = sectors_for(chunk.data.len());
            header.locations[slot] = SectorLocation {
                offset: next_sector as u32,
                count: sectors as u8,
            };
            header.timestamps[slot] = chunk.timestamp;

            ChunkHeader {
                length: chunk.data.len() as u32 + 1,
                scheme: chunk.scheme,
            }
            .write(&mut out)?;
            out.write_all(&chunk.data)?;

            let padding = sectors * SECTOR_SIZE - CHUNK_HEADER_SIZE - chunk.data.len();
            out.write_all(&vec![0u8; padding])?;
            next_sector += sectors;
        }

        out.set_position(0);
        header.write(&mut out)?;

        debug!(sectors = next_sector, "finished region");
        Ok(out.into_inner())
    }
}

/// Rewrite a region with one chunk added or replaced; every other chunk is copied as is
#[instrument(skip(chunk, bytes), err, fields(size = bytes.len()))]
pub fn save_chunk(
    location: ChunkLocation,
    chunk: &Compound,
    timestamp: u32,
    bytes: &[u8],
) -> Result<Vec<u8>> {
    let region = RegionFile::new(location.anvil(), bytes)?;
    let mut writer = RegionWriter::from_region(&region, RegionWriterOptions::default())?;
    writer.set_chunk(location, chunk, timestamp)?;
    writer.finish()
}
