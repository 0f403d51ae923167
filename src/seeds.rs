use std::collections::HashSet;
use std::ops::RangeInclusive;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::grid::Grid;
use crate::ground::{GroundPalette, Rgb};
use crate::validate::{SeedCountBounds, SeedLimits};

/// A grid cell pre-assigned a palette colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seed {
    pub row: usize,
    pub col: usize,
    /// Index of the palette entry this seed was drawn from.
    pub slot: usize,
    pub color: Rgb,
}

/// Seeds in placement order. No two seeds share a cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedSet {
    seeds: Vec<Seed>,
}

impl SeedSet {
    pub fn len(&self) -> usize {
        self.seeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seeds.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Seed> {
        self.seeds.iter()
    }

    pub fn as_slice(&self) -> &[Seed] {
        &self.seeds
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&Seed> {
        self.seeds.iter().find(|seed| seed.row == row && seed.col == col)
    }

    pub fn colors_used(&self) -> HashSet<Rgb> {
        self.seeds.iter().map(|seed| seed.color).collect()
    }

    /// True when every palette colour is carried by at least one seed.
    pub fn covers(&self, palette: &GroundPalette) -> bool {
        let used = self.colors_used();
        palette.colors().iter().all(|color| used.contains(color))
    }
}

/// Range the seed count is drawn from, one arm per combination of pinned
/// bounds. `bounds` are the natural bounds already clamped to the palette.
pub fn seed_count_range(
    limits: SeedLimits,
    bounds: SeedCountBounds,
    palette_size: usize,
) -> RangeInclusive<usize> {
    match (limits.min, limits.max) {
        (Some(min), Some(max)) => min..=max,
        (Some(min), None) => min..=bounds.high.max(palette_size),
        (None, Some(max)) => bounds.low.max(palette_size)..=max,
        (None, None) => bounds.low..=bounds.high,
    }
}

pub fn choose_seed_count<R: Rng + ?Sized>(
    limits: SeedLimits,
    bounds: SeedCountBounds,
    palette_size: usize,
    rng: &mut R,
) -> usize {
    let range = seed_count_range(limits, bounds, palette_size);
    let (low, high) = (*range.start(), *range.end());
    let count = rng.gen_range(low..=high.max(low));
    tracing::debug!(
        target: "tilemap::seeds",
        low,
        high,
        count,
        "seeds.count_chosen"
    );
    count
}

/// Places `count` seeds on empty cells of `grid`, marking each cell as
/// assigned. Once the seeds left equal the palette slots not yet used, every
/// remaining seed takes one of those slots, so all slots are covered whenever
/// `count >= palette.len()`.
pub fn place_seeds<R: Rng + ?Sized>(
    grid: &mut Grid,
    palette: &GroundPalette,
    count: usize,
    rng: &mut R,
) -> SeedSet {
    let mut free = grid.empty_cells();
    let mut used = vec![false; palette.len()];
    let mut seeds = Vec::with_capacity(count);
    let mut remaining = count.min(free.len());

    while remaining > 0 {
        let (row, col) = free.swap_remove(rng.gen_range(0..free.len()));

        let unused: Vec<usize> = (0..palette.len()).filter(|slot| !used[*slot]).collect();
        let slot = if !unused.is_empty() && remaining == unused.len() {
            let slot = unused[rng.gen_range(0..unused.len())];
            tracing::trace!(
                target: "tilemap::seeds",
                row,
                col,
                slot,
                remaining,
                "seeds.forced_coverage"
            );
            slot
        } else {
            rng.gen_range(0..palette.len())
        };

        let color = palette.color(slot);
        used[slot] = true;
        grid.assign(row, col, color);
        seeds.push(Seed { row, col, slot, color });
        remaining -= 1;
    }

    SeedSet { seeds }
}
