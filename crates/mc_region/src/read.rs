//! Types for reading region files
//!

use std::fmt::Display;
use std::io::Cursor;

use binrw::BinRead;
use indexmap::IndexMap;
use mc_nbt::compression::inflate;
use mc_nbt::{Compound, NbtFile};
use tracing::{debug, instrument, trace, warn};

use crate::error::{Error, Result};
use crate::location::{AnvilLocation, ChunkLocation};
use crate::types::{
    ChunkHeader, CompressionScheme, RegionHeader, SectorLocation, CHUNK_HEADER_SIZE, HEADER_SIZE,
    SECTOR_SIZE, SLOTS,
};

/// Header information for one present chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkEntry {
    pub location: ChunkLocation,
    pub sector: SectorLocation,
    /// Last modification, seconds since the unix epoch
    pub timestamp: u32,
}

/// A chunk payload as stored, before decompression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawChunk<'a> {
    /// The compression scheme byte
    pub scheme: u8,
    /// The compressed bytes
    pub data: &'a [u8],
}

impl RawChunk<'_> {
    pub fn compression(&self) -> Result<CompressionScheme> {
        CompressionScheme::try_from(self.scheme)
    }

    /// Decompress and decode the chunk's root compound
    pub fn decode(&self) -> Result<Compound> {
        let inflated = match self.compression()? {
            CompressionScheme::Zlib => inflate(self.data)?,
        };
        Ok(NbtFile::from_bytes(&inflated)?.root)
    }
}

/// Result of processing one chunk during a bulk scan
#[derive(Debug)]
pub struct ChunkOutcome<R, E = Error> {
    pub location: ChunkLocation,
    pub result: std::result::Result<R, E>,
}

/// Region file reader over an in-memory `.mca` buffer
///
/// ```
/// # fn doit() -> mc_region::error::Result<()>
/// # {
/// use mc_region::{AnvilLocation, RegionFile};
///
/// let bytes = std::fs::read(concat!(env!("CARGO_MANIFEST_DIR"), "/resources/r.0.-1.mca"))?;
/// let region = RegionFile::new(AnvilLocation::new(0, -1), &bytes)?;
///
/// for location in region.chunk_locations() {
///     if let Ok(Some(chunk)) = region.load_chunk(location) {
///         println!("{location}: {} entries", chunk.len());
///     }
/// }
/// # Ok(())
/// # }
/// # doit().unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct RegionFile<'a> {
    anvil: AnvilLocation,
    bytes: &'a [u8],
    chunks: IndexMap<ChunkLocation, ChunkEntry>,
}

impl<'a> RegionFile<'a> {
    /// Parse the header of a region file.
    ///
    /// An empty buffer is an empty region; any other buffer must at least hold the
    /// full header.
    #[instrument(skip(bytes), err, fields(size = bytes.len()))]
    pub fn new(anvil: AnvilLocation, bytes: &'a [u8]) -> Result<Self> {
        if bytes.is_empty() {
            return Ok(Self {
                anvil,
                bytes,
                chunks: IndexMap::new(),
            });
        }
        if bytes.len() < HEADER_SIZE {
            return Err(Error::CorruptRegionHeader("file is shorter than the header"));
        }

        let header = RegionHeader::read(&mut Cursor::new(&bytes[..HEADER_SIZE]))?;
        let chunks: IndexMap<_, _> = (0..SLOTS)
            .filter(|&slot| header.locations[slot].is_present())
            .map(|slot| {
                let location = anvil.chunk_for_slot(slot);
                let entry = ChunkEntry {
                    location,
                    sector: header.locations[slot],
                    timestamp: header.timestamps[slot],
                };
                (location, entry)
            })
            .collect();

        debug!(%anvil, chunks = chunks.len(), "parsed region header");
        Ok(Self {
            anvil,
            bytes,
            chunks,
        })
    }

    pub fn anvil(&self) -> AnvilLocation {
        self.anvil
    }

    /// Number of chunks present in this region
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn contains(&self, location: ChunkLocation) -> bool {
        self.chunks.contains_key(&location)
    }

    /// Locations of the present chunks, in header slot order
    pub fn chunk_locations(&self) -> impl Iterator<Item = ChunkLocation> + '_ {
        self.chunks.keys().copied()
    }

    pub fn entries(&self) -> impl Iterator<Item = &ChunkEntry> {
        self.chunks.values()
    }

    pub fn entry(&self, location: ChunkLocation) -> Option<&ChunkEntry> {
        self.chunks.get(&location)
    }

    /// Last modification time of a chunk, seconds since the unix epoch
    pub fn timestamp(&self, location: ChunkLocation) -> Option<u32> {
        self.entry(location).map(|entry| entry.timestamp)
    }

    /// The stored payload of a chunk, without decompressing it
    pub fn raw_chunk(&self, location: ChunkLocation) -> Result<Option<RawChunk<'a>>> {
        let Some(entry) = self.chunks.get(&location) else {
            return Ok(None);
        };
        if (entry.sector.offset as usize) < HEADER_SIZE / SECTOR_SIZE {
            return Err(Error::CorruptRegionHeader("chunk sector points into the header"));
        }

        let start = entry.sector.byte_offset();
        let prefix = self
            .bytes
            .get(start..start + CHUNK_HEADER_SIZE)
            .ok_or(Error::TruncatedBuffer)?;
        let header = ChunkHeader::read(&mut Cursor::new(prefix))?;
        if header.length == 0 {
            return Err(Error::CorruptRegionHeader("chunk has zero length"));
        }

        // length counts the scheme byte
        let data_start = start + CHUNK_HEADER_SIZE;
        let data_end = data_start + header.length as usize - 1;
        let data = self
            .bytes
            .get(data_start..data_end)
            .ok_or(Error::TruncatedBuffer)?;

        trace!(%location, scheme = header.scheme, size = data.len(), "located chunk");
        Ok(Some(RawChunk {
            scheme: header.scheme,
            data,
        }))
    }

    /// Decode one chunk's root compound; `None` when the chunk is absent
    #[instrument(skip(self), level = "debug")]
    pub fn load_chunk(&self, location: ChunkLocation) -> Result<Option<Compound>> {
        match self.raw_chunk(location)? {
            Some(raw) => Ok(Some(raw.decode()?)),
            None => Ok(None),
        }
    }

    /// Decode every present chunk and hand it to `transform`.
    ///
    /// Every chunk gets its own outcome; a chunk that fails to decode or transform
    /// does not stop the others.
    #[instrument(skip_all, fields(anvil = %self.anvil, chunks = self.len()))]
    pub fn load_all_with<R, E, F>(&self, mut transform: F) -> Vec<ChunkOutcome<R, E>>
    where
        E: From<Error> + Display,
        F: FnMut(ChunkLocation, Compound) -> std::result::Result<R, E>,
    {
        self.chunk_locations()
            .filter_map(|location| self.outcome(location, &mut transform))
            .collect()
    }

    /// Like [`RegionFile::load_all_with`], asking `should_continue` before every chunk.
    ///
    /// Returns [`Error::Cancelled`] as soon as `should_continue` answers `false`.
    #[instrument(skip_all, err, fields(anvil = %self.anvil, chunks = self.len()))]
    pub fn load_all_with_cancel<R, E, F>(
        &self,
        should_continue: impl Fn() -> bool,
        mut transform: F,
    ) -> Result<Vec<ChunkOutcome<R, E>>>
    where
        E: From<Error> + Display,
        F: FnMut(ChunkLocation, Compound) -> std::result::Result<R, E>,
    {
        let mut outcomes = Vec::with_capacity(self.len());
        for location in self.chunk_locations() {
            if !should_continue() {
                debug!(done = outcomes.len(), "region scan cancelled");
                return Err(Error::Cancelled);
            }
            outcomes.extend(self.outcome(location, &mut transform));
        }
        Ok(outcomes)
    }

    /// Load one chunk for a bulk scan; `None` when the slot is empty
    fn outcome<R, E, F>(
        &self,
        location: ChunkLocation,
        transform: &mut F,
    ) -> Option<ChunkOutcome<R, E>>
    where
        E: From<Error> + Display,
        F: FnMut(ChunkLocation, Compound) -> std::result::Result<R, E>,
    {
        let result = match self.load_chunk(location) {
            Ok(Some(chunk)) => transform(location, chunk),
            Ok(None) => return None,
            Err(err) => Err(E::from(err)),
        };
        if let Err(err) = &result {
            warn!(%location, "skipping chunk: {err}");
        }
        Some(ChunkOutcome { location, result })
    }
}

/// Absolute locations of every chunk present in a region, in header slot order
pub fn list_chunk_locations(anvil: AnvilLocation, bytes: &[u8]) -> Result<Vec<ChunkLocation>> {
    Ok(RegionFile::new(anvil, bytes)?.chunk_locations().collect())
}

/// Decode a single chunk from the bytes of the region that holds it
pub fn load_chunk(location: ChunkLocation, bytes: &[u8]) -> Result<Option<Compound>> {
    RegionFile::new(location.anvil(), bytes)?.load_chunk(location)
}

/// Decode every chunk of a region and apply `transform` to each
pub fn load_chunks_with<R, E, F>(
    anvil: AnvilLocation,
    bytes: &[u8],
    transform: F,
) -> Result<Vec<ChunkOutcome<R, E>>>
where
    E: From<Error> + Display,
    F: FnMut(ChunkLocation, Compound) -> std::result::Result<R, E>,
{
    Ok(RegionFile::new(anvil, bytes)?.load_all_with(transform))
}

/// [`load_chunks_with`] that checks `should_continue` before every chunk
pub fn load_chunks_with_cancel<R, E, F>(
    anvil: AnvilLocation,
    bytes: &[u8],
    should_continue: impl Fn() -> bool,
    transform: F,
) -> Result<Vec<ChunkOutcome<R, E>>>
where
    E: From<Error> + Display,
    F: FnMut(ChunkLocation, Compound) -> std::result::Result<R, E>,
{
    RegionFile::new(anvil, bytes)?.load_all_with_cancel(should_continue, transform)
}
