use rand::seq::SliceRandom;
use rand::Rng;

use crate::grid::Grid;
use crate::ground::Rgb;
use crate::seeds::{Seed, SeedSet};

/// Squared Euclidean distance between two cells. Comparing squares keeps
/// ties exact.
fn distance_sq(row: usize, col: usize, seed: &Seed) -> u64 {
    let dr = row.abs_diff(seed.row) as u64;
    let dc = col.abs_diff(seed.col) as u64;
    dr * dr + dc * dc
}

/// Seeds at minimum distance from `(row, col)`.
pub fn nearest_seeds(row: usize, col: usize, seeds: &SeedSet) -> Vec<&Seed> {
    let mut best = u64::MAX;
    let mut nearest = Vec::new();
    for seed in seeds.iter() {
        let d = distance_sq(row, col, seed);
        if d < best {
            best = d;
            nearest.clear();
            nearest.push(seed);
        } else if d == best {
            nearest.push(seed);
        }
    }
    nearest
}

/// Gives every empty cell the colour of its nearest seed, picking uniformly
/// among equidistant seeds.
///
/// `seeds` must not be empty; every cell is assigned afterwards.
pub fn fill_regions<R: Rng + ?Sized>(grid: &mut Grid, seeds: &SeedSet, rng: &mut R) {
    debug_assert!(!seeds.is_empty(), "region fill needs at least one seed");
    let mut ties = 0usize;
    for (row, col) in grid.empty_cells() {
        let nearest = nearest_seeds(row, col, seeds);
        if nearest.len() > 1 {
            ties += 1;
        }
        let chosen: Option<Rgb> = nearest.choose(rng).map(|seed| seed.color);
        if let Some(color) = chosen {
            grid.assign(row, col, color);
        }
    }
    tracing::debug!(
        target: "tilemap::region",
        seeds = seeds.len(),
        ties,
        "region.filled"
    );
}
