use std::collections::HashMap;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::error::TileMapError;
use crate::grid::Grid;
use crate::ground::{GroundPalette, Rgb};
use crate::region::fill_regions;
use crate::request::MapRequest;
use crate::seeds::{choose_seed_count, place_seeds, SeedSet};
use crate::validate::{validate, SeedCountBounds};

/// How many cells carry one colour. Palette slots sharing a colour are
/// listed together under `names`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorShare<'a> {
    pub names: Vec<&'a str>,
    pub color: Rgb,
    pub cells: usize,
}

impl ColorShare<'_> {
    pub fn label(&self) -> String {
        self.names.join("/")
    }

    /// Share of a map with `area` cells, in percent.
    pub fn percent(&self, area: usize) -> f64 {
        self.cells as f64 / area as f64 * 100.0
    }
}

/// A finished tile map: every cell holds a palette colour.
///
/// Construction validates the request, places seeds and grows regions from
/// them in one pass. A `TileMap` that exists is always fully filled.
#[derive(Debug, Clone, Serialize)]
pub struct TileMap {
    pub width: usize,
    pub height: usize,
    palette: GroundPalette,
    seeds: SeedSet,
    tiles: Vec<Vec<Rgb>>,
}

impl TileMap {
    /// Builds a map using a generator seeded from the OS.
    pub fn new(request: &MapRequest) -> Result<Self, TileMapError> {
        Self::generate(request, &mut ChaCha8Rng::from_entropy())
    }

    /// Builds a reproducible map: equal requests and seeds give equal maps.
    pub fn with_seed(request: &MapRequest, seed: u64) -> Result<Self, TileMapError> {
        Self::generate(request, &mut ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn generate<R: Rng + ?Sized>(request: &MapRequest, rng: &mut R) -> Result<Self, TileMapError> {
        let validated = validate(request)?;
        let palette = GroundPalette::resolve(&validated.grounds, &validated.custom);

        let bounds = SeedCountBounds::clamped(validated.width, validated.height, palette.len());
        let count = choose_seed_count(validated.limits, bounds, palette.len(), rng);

        let mut grid = Grid::new(validated.width, validated.height);
        let seeds = place_seeds(&mut grid, &palette, count, rng);
        // At least one seed per palette slot, so the fill reaches every cell.
        fill_regions(&mut grid, &seeds, rng);
        let tiles = grid.into_colors();

        tracing::info!(
            target: "tilemap::generate",
            width = validated.width,
            height = validated.height,
            palette = palette.len(),
            seeds = seeds.len(),
            "tilemap.generated"
        );

        Ok(TileMap {
            width: validated.width,
            height: validated.height,
            palette,
            seeds,
            tiles,
        })
    }

    pub fn get_tile(&self, x: usize, y: usize) -> Option<Rgb> {
        if x < self.width && y < self.height {
            Some(self.tiles[y][x])
        } else {
            None
        }
    }

    /// Colours indexed `[row][col]`.
    pub fn tiles(&self) -> &[Vec<Rgb>] {
        &self.tiles
    }

    pub fn palette(&self) -> &GroundPalette {
        &self.palette
    }

    pub fn seeds(&self) -> &SeedSet {
        &self.seeds
    }

    /// Number of cells per distinct palette colour, in palette order.
    pub fn color_counts(&self) -> Vec<ColorShare<'_>> {
        let mut counts: HashMap<Rgb, usize> = HashMap::new();
        for row in &self.tiles {
            for color in row {
                *counts.entry(*color).or_insert(0) += 1;
            }
        }

        let mut shares: Vec<ColorShare<'_>> = Vec::new();
        for entry in self.palette.entries() {
            match shares.iter_mut().find(|share| share.color == entry.color) {
                Some(share) => share.names.push(entry.name.as_str()),
                None => shares.push(ColorShare {
                    names: vec![entry.name.as_str()],
                    color: entry.color,
                    cells: counts.get(&entry.color).copied().unwrap_or(0),
                }),
            }
        }
        shares
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
