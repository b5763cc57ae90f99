//! Packed block-state indices.
//!
//! A section stores one palette index per block in an array of 64 bit words.
//! Indices are packed from the low bits up and never straddle two words, so the
//! high bits of a word can be unused.

/// Blocks in a 16x16x16 section
pub const SECTION_VOLUME: usize = 4096;

const MIN_BITS: u32 = 4;

/// Bits used per index for a palette of `palette_size` entries; never fewer than 4
pub fn bits_per_entry(palette_size: usize) -> u32 {
    let mut bits = MIN_BITS;
    let mut threshold = 1usize << MIN_BITS;
    while threshold < palette_size {
        threshold *= 2;
        bits += 1;
    }
    bits
}

/// Unpack the palette indices of a section.
///
/// The result always holds [`SECTION_VOLUME`] entries; missing words read as index 0.
pub fn unpack(data: &[i64], palette_size: usize) -> Vec<u16> {
    let bits = bits_per_entry(palette_size);
    let per_word = (u64::BITS / bits) as usize;
    let mask = (1u64 << bits) - 1;

    let mut indices = Vec::with_capacity(SECTION_VOLUME);
    'words: for &word in data {
        let word = word as u64;
        for slot in 0..per_word {
            if indices.len() == SECTION_VOLUME {
                break 'words;
            }
            indices.push(((word >> (slot as u32 * bits)) & mask) as u16);
        }
    }
    indices.resize(SECTION_VOLUME, 0);
    indices
}

/// Pack palette indices into the word layout read by [`unpack`]
pub fn pack(indices: &[u16], palette_size: usize) -> Vec<i64> {
    let bits = bits_per_entry(palette_size);
    let per_word = (u64::BITS / bits) as usize;
    let mask = (1u64 << bits) - 1;

    let mut words = vec![0u64; SECTION_VOLUME.div_ceil(per_word)];
    for (i, &index) in indices.iter().take(SECTION_VOLUME).enumerate() {
        words[i / per_word] |= (index as u64 & mask) << ((i % per_word) as u32 * bits);
    }
    words.into_iter().map(|word| word as i64).collect()
}
