//! Input checks that gate map construction.
//!
//! Every check is a pure function over a [`MapRequest`]; the first failure is
//! reported as [`TileMapError::InvalidInput`] and nothing is allocated.

use std::collections::HashSet;

use crate::error::TileMapError;
use crate::ground::{Ground, Rgb};
use crate::request::MapRequest;

/// Largest number of cells a map may have (a 4096x4096 grid).
pub const MAX_CELLS: u64 = 4096 * 4096;

/// Seed count range implied by the grid dimensions alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedCountBounds {
    pub low: usize,
    pub high: usize,
}

impl SeedCountBounds {
    pub fn natural(width: usize, height: usize) -> Self {
        let short = width.min(height);
        let long = width.max(height);
        if short % 2 == 0 {
            SeedCountBounds {
                low: short / 2,
                high: long / 2,
            }
        } else {
            SeedCountBounds {
                low: (short - 1) / 2,
                high: (long - 1) / 2,
            }
        }
    }

    /// Natural bounds raised so a map never gets fewer seeds than palette slots.
    pub fn clamped(width: usize, height: usize, palette_size: usize) -> Self {
        let natural = Self::natural(width, height);
        let low = natural.low.max(palette_size);
        SeedCountBounds {
            low,
            high: natural.high.max(low),
        }
    }
}

/// Optional user-pinned seed counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeedLimits {
    pub min: Option<usize>,
    pub max: Option<usize>,
}

/// A request that passed every check, converted to checked types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedRequest {
    pub width: usize,
    pub height: usize,
    pub grounds: Vec<Ground>,
    pub custom: Vec<(String, Rgb)>,
    pub limits: SeedLimits,
}

pub fn validate(request: &MapRequest) -> Result<ValidatedRequest, TileMapError> {
    verify_dimensions(request)?;
    verify_grounds(request)?;
    verify_seed_bounds(request)?;

    let grounds = request
        .grounds
        .iter()
        .map(|name| name.parse::<Ground>().map_err(TileMapError::invalid))
        .collect::<Result<Vec<_>, _>>()?;
    let custom = request
        .custom_grounds
        .iter()
        .map(|ground| {
            let rgb = [0, 1, 2].map(|i| ground.rgb[i] as u8);
            (ground.name.clone(), rgb)
        })
        .collect();

    let (width, height) = checked_sides(request)?;
    Ok(ValidatedRequest {
        width,
        height,
        grounds,
        custom,
        limits: SeedLimits {
            min: request.min_seeds.map(|value| value as usize),
            max: request.max_seeds.map(|value| value as usize),
        },
    })
}

/// Smallest side allowed for the given numbers of built-in and custom grounds.
pub fn minimum_side(builtin: usize, custom: usize) -> usize {
    match (builtin, custom) {
        (0, 0) => 4,
        (b, 0) => 2 * b,
        (0, c) => 2 * c,
        (b, c) => 2 * b + c,
    }
}

pub fn verify_dimensions(request: &MapRequest) -> Result<(), TileMapError> {
    if request.width <= 0 || request.height <= 0 {
        return Err(TileMapError::invalid(format!(
            "wrong dimensions {}x{}: width and height must be positive",
            request.width, request.height
        )));
    }
    if !cell_count(request).is_some_and(|area| area <= MAX_CELLS) {
        return Err(TileMapError::invalid(format!(
            "dimensions {}x{} are too big: a map holds at most {} cells",
            request.width, request.height, MAX_CELLS
        )));
    }

    let side = minimum_side(request.grounds.len(), request.custom_grounds.len()) as i64;
    if request.width < side || request.height < side {
        return Err(TileMapError::invalid(format!(
            "dimensions {}x{} are too small: each side must be at least {}",
            request.width, request.height, side
        )));
    }
    Ok(())
}

pub fn verify_grounds(request: &MapRequest) -> Result<(), TileMapError> {
    let area = cell_count(request).unwrap_or(u64::MAX);
    let requested = (request.grounds.len() + request.custom_grounds.len()) as u64;
    if requested > area {
        return Err(TileMapError::invalid(format!(
            "amount of grounds ({requested}) is bigger than the number of cells ({area})"
        )));
    }

    for name in &request.grounds {
        if Ground::lookup(name.trim()).is_none() {
            return Err(TileMapError::invalid(format!(
                "ground '{}' is not available, try to type in your own ground",
                name.trim()
            )));
        }
    }

    let mut names = HashSet::new();
    for ground in &request.custom_grounds {
        if !names.insert(ground.name.as_str()) {
            return Err(TileMapError::invalid(format!(
                "custom ground '{}' is given more than once",
                ground.name
            )));
        }
        if ground.rgb.len() != 3 {
            return Err(TileMapError::invalid(format!(
                "wrong given colour of ground '{}': expected 3 components, got {}",
                ground.name,
                ground.rgb.len()
            )));
        }
        if let Some(component) = ground.rgb.iter().find(|c| !(0..=255).contains(*c)) {
            return Err(TileMapError::invalid(format!(
                "wrong given colour of ground '{}': component {} is outside 0..=255",
                ground.name, component
            )));
        }
    }
    Ok(())
}

pub fn verify_seed_bounds(request: &MapRequest) -> Result<(), TileMapError> {
    let palette = requested_palette_size(request) as i64;
    let (width, height) = checked_sides(request)?;
    let natural = SeedCountBounds::natural(width, height);
    let low = i64::try_from(natural.low).unwrap_or(i64::MAX);
    let high = i64::try_from(natural.high).unwrap_or(i64::MAX);
    let area = cell_count(request).unwrap_or(u64::MAX);

    for (label, value) in [("min_seeds", request.min_seeds), ("max_seeds", request.max_seeds)] {
        let Some(value) = value else { continue };
        if value < 0 {
            return Err(TileMapError::invalid(format!(
                "{label} must be a non-negative integer, got {value}"
            )));
        }
        if value < palette {
            return Err(TileMapError::invalid(format!(
                "{label} is {value} but {palette} grounds need at least {palette} seeds"
            )));
        }
        if value.unsigned_abs() > area {
            return Err(TileMapError::invalid(format!(
                "{label} is {value} but the map only has {area} cells"
            )));
        }
    }

    match (request.min_seeds, request.max_seeds) {
        (Some(min), None) if min > high.max(palette) => Err(TileMapError::invalid(format!(
            "min_seeds {min} is too big: at most {} seeds can be chosen",
            high.max(palette)
        ))),
        (None, Some(max)) if max < low.max(palette) => Err(TileMapError::invalid(format!(
            "max_seeds {max} is too small: at least {} seeds are chosen",
            low.max(palette)
        ))),
        (Some(min), Some(max)) if min > max => Err(TileMapError::invalid(format!(
            "min_seeds {min} is bigger than max_seeds {max}"
        ))),
        _ => Ok(()),
    }
}

/// Palette length the request will resolve to, counting the water/land
/// default when no grounds are given.
pub fn requested_palette_size(request: &MapRequest) -> usize {
    match request.grounds.len() + request.custom_grounds.len() {
        0 => Ground::DEFAULT.len(),
        n => n,
    }
}

/// Number of cells, or `None` when the area does not fit in a `u64`.
fn cell_count(request: &MapRequest) -> Option<u64> {
    let width = u64::try_from(request.width.max(0)).ok()?;
    let height = u64::try_from(request.height.max(0)).ok()?;
    width.checked_mul(height)
}

fn checked_sides(request: &MapRequest) -> Result<(usize, usize), TileMapError> {
    let side = |value: i64| {
        usize::try_from(value.max(0)).map_err(|_| {
            TileMapError::invalid(format!(
                "dimensions {}x{} do not fit on this platform",
                request.width, request.height
            ))
        })
    };
    Ok((side(request.width)?, side(request.height)?))
}
