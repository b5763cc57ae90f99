//! Map colors of block types, loaded from the bundled `block_colors.json`.

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// Red, green, blue and alpha
pub type Rgba = [u8; 4];

const WATER: &str = "minecraft:water";

static BLOCK_COLORS: Lazy<HashMap<String, Rgba>> = Lazy::new(|| {
    serde_json::from_str(include_str!("../resources/block_colors.json"))
        .expect("bundled block color table is valid json")
});

/// Color of a block type, `None` for blocks that do not show on a map (air, glass, ...)
pub fn block_color(name: &str) -> Option<Rgba> {
    BLOCK_COLORS.get(name).copied()
}

pub fn is_water(name: &str) -> bool {
    name == WATER
}

/// Number of block types with a color
pub fn known_blocks() -> usize {
    BLOCK_COLORS.len()
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use crate::colors::{block_color, is_water, known_blocks};

    #[test]
    fn table_loads() {
        assert!(known_blocks() > 50);
        assert_eq!(block_color("minecraft:water"), Some([64, 64, 255, 255]));
        assert_eq!(block_color("minecraft:stone"), Some([125, 125, 125, 255]));
    }

    #[test]
    fn unknown_and_air_have_no_color() {
        assert_eq!(block_color("minecraft:air"), None);
        assert_eq!(block_color("minecraft:cave_air"), None);
        assert_eq!(block_color("stone"), None);
    }

    #[test]
    fn water() {
        assert!(is_water("minecraft:water"));
        assert!(!is_water("minecraft:ice"));
    }
}
