//! 16x16x16 block sections as stored in chunk NBT.

use mc_nbt::{Compound, List, Tag};
use tracing::trace;

use crate::error::{Error, Result};
use crate::palette::{pack, unpack, SECTION_VOLUME};

const AIR: &str = "minecraft:air";

/// The block states of one section
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkSection {
    /// Section height; the section covers blocks `y * 16 .. y * 16 + 16`
    pub y: i32,
    /// Block names referenced by the packed data
    pub palette: Vec<String>,
    /// Packed palette indices, absent when the palette has a single entry
    pub data: Option<Vec<i64>>,
}

impl ChunkSection {
    /// Build a section from one palette index per block, in `y, z, x` order
    pub fn from_indices(y: i32, palette: Vec<String>, indices: &[u16]) -> Self {
        let data = (palette.len() > 1).then(|| pack(indices, palette.len()));
        Self { y, palette, data }
    }

    /// Read a section compound; `None` when it carries no block states
    pub fn from_compound(section: &Compound) -> Result<Option<Self>> {
        let y = match section.get("Y") {
            Some(Tag::Byte(y)) => *y as i32,
            Some(Tag::Int(y)) => *y,
            _ => return Err(Error::MissingField("Y")),
        };
        block_y_range(y)?;

        let (palette, data) = match section.get_compound("block_states") {
            Some(states) => (states.get_list("palette"), states.get_long_array("data")),
            None => (section.get_list("Palette"), section.get_long_array("BlockStates")),
        };
        let Some(palette) = palette else {
            trace!(y, "section without block states");
            return Ok(None);
        };

        let palette = palette
            .iter()
            .map(|entry| {
                entry
                    .as_compound()
                    .and_then(|entry| entry.get_str("Name"))
                    .map(str::to_owned)
                    .ok_or(Error::MissingField("Name"))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Some(Self {
            y,
            palette,
            data: data.map(<[i64]>::to_vec),
        }))
    }

    /// Write the section in the layout used since 1.18
    pub fn to_compound(&self) -> Compound {
        let palette: Vec<Compound> = self
            .palette
            .iter()
            .map(|name| [("Name", name.as_str())].into_iter().collect())
            .collect();

        let mut states = Compound::new();
        states.push("palette", List::from(palette));
        if let Some(data) = &self.data {
            states.push("data", data.clone());
        }

        let mut section = Compound::new();
        match i8::try_from(self.y) {
            Ok(y) => section.push("Y", y),
            Err(_) => section.push("Y", self.y),
        }
        section.push("block_states", states);
        section
    }

    /// Height of the lowest block layer of this section
    pub fn min_block_y(&self) -> Result<i32> {
        block_y_range(self.y).map(|(low, _)| low)
    }

    /// Whether every block in this section is plain air
    pub fn is_air_only(&self) -> bool {
        self.palette.len() == 1 && self.palette[0] == AIR
    }

    /// Palette index of every block, checked against the palette
    pub fn block_indices(&self) -> Result<Vec<u16>> {
        let indices = match &self.data {
            Some(data) => unpack(data, self.palette.len()),
            None => vec![0; SECTION_VOLUME],
        };

        if let Some(&index) = indices
            .iter()
            .find(|&&index| index as usize >= self.palette.len())
        {
            return Err(Error::IncompletePalette {
                index,
                palette_size: self.palette.len(),
            });
        }
        Ok(indices)
    }

    /// Name of the block at section-local coordinates
    pub fn block_name(&self, x: usize, y: usize, z: usize) -> Result<Option<&str>> {
        if x >= 16 || y >= 16 || z >= 16 {
            return Ok(None);
        }
        let index = self.block_indices()?[y * 256 + z * 16 + x];
        Ok(self.palette.get(index as usize).map(String::as_str))
    }
}

/// Lowest and highest block height of section `y`
fn block_y_range(y: i32) -> Result<(i32, i32)> {
    y.checked_mul(16)
        .and_then(|low| Some((low, low.checked_add(15)?)))
        .ok_or(Error::InvalidSectionY(y))
}

/// Read the block sections of a chunk compound.
///
/// Chunks written since 1.18 keep them in `sections`, older ones in `Level.Sections`.
/// Sections without block states (light only) are left out.
pub fn sections_from_chunk(chunk: &Compound) -> Result<Vec<ChunkSection>> {
    let sections = chunk
        .get_list("sections")
        .or_else(|| chunk.get_compound("Level")?.get_list("Sections"))
        .ok_or(Error::MissingField("sections"))?;

    let mut out = Vec::with_capacity(sections.len());
    for section in sections {
        let section = section
            .as_compound()
            .ok_or(Error::MissingField("sections"))?;
        if let Some(section) = ChunkSection::from_compound(section)? {
            out.push(section);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod test {
    use mc_nbt::{Compound, List, Tag};
    use pretty_assertions::assert_eq;

    use crate::error::{Error, Result};
    use crate::palette::SECTION_VOLUME;
    use crate::section::{sections_from_chunk, ChunkSection};

    fn names(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[test]
    fn single_entry_palette_needs_no_data() -> Result<()> {
        let section = ChunkSection::from_indices(-4, names(&["minecraft:stone"]), &[]);
        assert_eq!(section.data, None);
        assert_eq!(section.block_indices()?, vec![0; SECTION_VOLUME]);
        assert_eq!(section.block_name(15, 15, 15)?, Some("minecraft:stone"));

        Ok(())
    }

    #[test]
    fn index_past_palette() {
        let mut indices = vec![0u16; SECTION_VOLUME];
        indices[100] = 3;
        let section =
            ChunkSection::from_indices(0, names(&["minecraft:air", "minecraft:dirt"]), &indices);

        assert!(matches!(
            section.block_indices(),
            Err(Error::IncompletePalette {
                index: 3,
                palette_size: 2
            })
        ));
    }

    #[test]
    fn compound_round_trip() -> Result<()> {
        let mut indices = vec![0u16; SECTION_VOLUME];
        indices[256 * 3 + 16 * 2 + 1] = 1;
        let section = ChunkSection::from_indices(
            5,
            names(&["minecraft:air", "minecraft:grass_block"]),
            &indices,
        );

        let read = ChunkSection::from_compound(&section.to_compound())?;
        assert_eq!(read.as_ref(), Some(&section));
        assert_eq!(section.block_name(1, 3, 2)?, Some("minecraft:grass_block"));
        assert_eq!(section.block_name(2, 3, 1)?, Some("minecraft:air"));

        Ok(())
    }

    #[test]
    fn modern_and_legacy_layouts() -> Result<()> {
        let section = ChunkSection::from_indices(
            -1,
            names(&["minecraft:water", "minecraft:sand"]),
            &[1; SECTION_VOLUME],
        );

        let mut modern = Compound::new();
        modern.push("sections", List::from_tags([section.to_compound().into()])?);
        assert_eq!(sections_from_chunk(&modern)?, vec![section.clone()]);

        // pre 1.18: Level.Sections with Palette and BlockStates
        let mut palette = List::new();
        for name in &section.palette {
            let mut entry = Compound::new();
            entry.push("Name", name.as_str());
            palette.push(entry)?;
        }
        let mut legacy_section = Compound::new();
        legacy_section.push("Y", -1i8);
        legacy_section.push("Palette", palette);
        legacy_section.push("BlockStates", section.data.clone().unwrap_or_default());
        let mut light_only = Compound::new();
        light_only.push("Y", -2i8);
        light_only.push("SkyLight", vec![0i8; 2048]);

        let mut level = Compound::new();
        level.push("Sections", List::from_tags([light_only.into(), legacy_section.into()])?);
        let mut legacy = Compound::new();
        legacy.push("Level", level);

        assert_eq!(sections_from_chunk(&legacy)?, vec![section]);

        Ok(())
    }

    #[test]
    fn section_height_out_of_range() {
        let mut section = Compound::new();
        section.push("Y", i32::MAX / 8);
        section.push("block_states", Compound::new());
        assert!(matches!(
            ChunkSection::from_compound(&section),
            Err(Error::InvalidSectionY(y)) if y == i32::MAX / 8
        ));

        let section = ChunkSection::from_indices(i32::MIN / 16, names(&["minecraft:stone"]), &[]);
        assert_eq!(section.min_block_y().ok(), Some(i32::MIN));
        let section = ChunkSection::from_indices(i32::MAX / 16, names(&["minecraft:stone"]), &[]);
        assert_eq!(section.min_block_y().ok(), Some(i32::MAX - 15));
        let section =
            ChunkSection::from_indices(i32::MAX / 16 + 1, names(&["minecraft:stone"]), &[]);
        assert!(matches!(section.min_block_y(), Err(Error::InvalidSectionY(_))));
    }

    #[test]
    fn wide_section_height_keeps_int_tag() -> Result<()> {
        let tall = ChunkSection::from_indices(300, names(&["minecraft:stone"]), &[]);
        let compound = tall.to_compound();
        assert_eq!(compound.get("Y"), Some(&Tag::Int(300)));
        assert_eq!(ChunkSection::from_compound(&compound)?, Some(tall));

        let low = ChunkSection::from_indices(-4, names(&["minecraft:stone"]), &[]);
        assert_eq!(low.to_compound().get("Y"), Some(&Tag::Byte(-4)));

        Ok(())
    }

    #[test]
    fn missing_fields() {
        assert!(matches!(
            sections_from_chunk(&Compound::new()),
            Err(Error::MissingField("sections"))
        ));

        let mut section = Compound::new();
        section.push("block_states", Compound::new());
        assert!(matches!(
            ChunkSection::from_compound(&section),
            Err(Error::MissingField("Y"))
        ));
    }
}
