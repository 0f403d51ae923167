use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// An RGB triple, one byte per channel.
pub type Rgb = [u8; 3];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ground {
    Water,
    Land,
    Sand,
    Forest,
    Stone,
    Ice,
    Snow,
}

impl Ground {
    pub const ALL: [Ground; 7] = [
        Ground::Water,
        Ground::Land,
        Ground::Sand,
        Ground::Forest,
        Ground::Stone,
        Ground::Ice,
        Ground::Snow,
    ];

    /// Grounds used when a map asks for neither built-in nor custom grounds.
    pub const DEFAULT: [Ground; 2] = [Ground::Water, Ground::Land];

    pub fn color(self) -> Rgb {
        match self {
            Ground::Water => [51, 153, 255],
            Ground::Land => [125, 200, 100],
            Ground::Sand => [255, 255, 153],
            Ground::Forest => [0, 100, 0],
            Ground::Stone => [160, 160, 160],
            Ground::Ice => [160, 230, 255],
            Ground::Snow => [255, 255, 255],
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Ground::Water => "water",
            Ground::Land => "land",
            Ground::Sand => "sand",
            Ground::Forest => "forest",
            Ground::Stone => "stone",
            Ground::Ice => "ice",
            Ground::Snow => "snow",
        }
    }

    pub fn lookup(name: &str) -> Option<Ground> {
        Ground::ALL.into_iter().find(|ground| ground.name() == name)
    }
}

impl fmt::Display for Ground {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Ground {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ground::lookup(s.trim()).ok_or_else(|| format!("ground '{}' is not available", s.trim()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteEntry {
    pub name: String,
    pub color: Rgb,
}

/// The ordered colour list of one map: built-in grounds first, then custom
/// grounds in the order they were supplied. Entries with equal colours are
/// still separate slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroundPalette {
    entries: Vec<PaletteEntry>,
}

impl GroundPalette {
    pub fn resolve(grounds: &[Ground], custom: &[(String, Rgb)]) -> Self {
        let mut entries: Vec<PaletteEntry> = grounds
            .iter()
            .map(|ground| PaletteEntry {
                name: ground.name().to_string(),
                color: ground.color(),
            })
            .collect();
        entries.extend(custom.iter().map(|(name, color)| PaletteEntry {
            name: name.clone(),
            color: *color,
        }));

        if entries.is_empty() {
            return Self::resolve(&Ground::DEFAULT, &[]);
        }
        GroundPalette { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn color(&self, slot: usize) -> Rgb {
        self.entries[slot].color
    }

    pub fn colors(&self) -> Vec<Rgb> {
        self.entries.iter().map(|entry| entry.color).collect()
    }

    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    pub fn contains(&self, color: Rgb) -> bool {
        self.entries.iter().any(|entry| entry.color == color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_palette_is_water_and_land() {
        let palette = GroundPalette::resolve(&[], &[]);
        assert_eq!(palette.colors(), vec![[51, 153, 255], [125, 200, 100]]);
    }

    #[test]
    fn test_builtin_then_custom_order() {
        let palette = GroundPalette::resolve(
            &[Ground::Water, Ground::Land, Ground::Sand],
            &[("black".to_string(), [0, 0, 0])],
        );
        assert_eq!(
            palette.colors(),
            vec![[51, 153, 255], [125, 200, 100], [255, 255, 153], [0, 0, 0]]
        );
        assert_eq!(palette.entries()[3].name, "black");
    }

    #[test]
    fn test_custom_only_skips_default() {
        let palette = GroundPalette::resolve(&[], &[("red".to_string(), [255, 0, 0])]);
        assert_eq!(palette.colors(), vec![[255, 0, 0]]);
    }

    #[test]
    fn test_duplicate_colors_are_separate_slots() {
        let palette = GroundPalette::resolve(
            &[Ground::Snow],
            &[("white".to_string(), [255, 255, 255])],
        );
        assert_eq!(palette.len(), 2);
        assert_eq!(palette.color(0), palette.color(1));
    }

    #[test]
    fn test_ground_lookup() {
        assert_eq!(Ground::lookup("forest"), Some(Ground::Forest));
        assert_eq!(Ground::lookup("ocean"), None);
        assert_eq!(" ice ".parse::<Ground>(), Ok(Ground::Ice));
        assert!("ocean".parse::<Ground>().is_err());
    }
}
