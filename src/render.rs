use std::io::{self, Write};
use std::path::Path;

use image::{ImageBuffer, ImageFormat, Rgb, RgbImage};
use imageproc::drawing::draw_line_segment_mut;

use crate::error::RenderError;
use crate::tilemap::TileMap;

/// Pixels per cell used when nothing else is asked for.
pub const DEFAULT_SCALE: u32 = 16;

/// Largest image, in pixels, the renderer will allocate.
pub const MAX_PIXELS: u64 = 1 << 30;

const GRID_COLOR: Rgb<u8> = Rgb([0, 0, 0]);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub scale: u32,
    pub grid: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            scale: DEFAULT_SCALE,
            grid: true,
        }
    }
}

pub struct MapRenderer;

impl MapRenderer {
    /// One pixel per cell.
    pub fn render_to_image(map: &TileMap) -> Result<RgbImage, RenderError> {
        let (width, height) = image_size(map, 1)?;
        Ok(ImageBuffer::from_fn(width, height, |x, y| {
            Rgb(map.tiles()[y as usize][x as usize])
        }))
    }

    /// Every cell becomes a `scale x scale` block.
    pub fn expand(map: &TileMap, scale: u32) -> Result<RgbImage, RenderError> {
        let scale = scale.max(1);
        let (width, height) = image_size(map, scale)?;
        Ok(ImageBuffer::from_fn(width, height, |x, y| {
            Rgb(map.tiles()[(y / scale) as usize][(x / scale) as usize])
        }))
    }

    /// Expanded image with a black line along the top and left edge of
    /// every cell.
    pub fn with_grid(map: &TileMap, scale: u32) -> Result<RgbImage, RenderError> {
        let scale = scale.max(1);
        let mut img = Self::expand(map, scale)?;
        let (width, height) = img.dimensions();

        for x in (0..width).step_by(scale as usize) {
            draw_line_segment_mut(&mut img, (x as f32, 0.0), (x as f32, (height - 1) as f32), GRID_COLOR);
        }
        for y in (0..height).step_by(scale as usize) {
            draw_line_segment_mut(&mut img, (0.0, y as f32), ((width - 1) as f32, y as f32), GRID_COLOR);
        }
        Ok(img)
    }

    pub fn render(map: &TileMap, options: RenderOptions) -> Result<RgbImage, RenderError> {
        if options.grid {
            Self::with_grid(map, options.scale)
        } else {
            Self::expand(map, options.scale)
        }
    }

    /// Writes the rendered map; the format follows the file extension.
    pub fn save(map: &TileMap, path: &Path, options: RenderOptions) -> Result<(), RenderError> {
        let format = ImageFormat::from_path(path)
            .ok()
            .filter(|format| format.can_write())
            .ok_or_else(|| RenderError::UnsupportedFormat(path.to_path_buf()))?;

        let img = Self::render(map, options)?;
        img.save_with_format(path, format)?;
        tracing::info!(
            target: "tilemap::render",
            path = %path.display(),
            width = img.width(),
            height = img.height(),
            "render.saved"
        );
        Ok(())
    }

    /// Prints the map to a terminal with 24-bit colour blocks.
    pub fn display<W: Write>(map: &TileMap, out: &mut W) -> io::Result<()> {
        write_ansi(out, map.width, map.height, |x, y| map.tiles()[y][x])
    }
}

/// Pixel dimensions of `map` at `scale`, refusing sizes that overflow `u32`
/// sides or exceed [`MAX_PIXELS`].
fn image_size(map: &TileMap, scale: u32) -> Result<(u32, u32), RenderError> {
    let too_large = || RenderError::TooLarge {
        width: map.width,
        height: map.height,
        scale,
    };
    let side = |cells: usize| {
        u32::try_from(cells)
            .ok()
            .and_then(|cells| cells.checked_mul(scale))
            .ok_or_else(too_large)
    };
    let (width, height) = (side(map.width)?, side(map.height)?);
    if u64::from(width) * u64::from(height) > MAX_PIXELS {
        return Err(too_large());
    }
    Ok((width, height))
}

/// Writes a colour field as ANSI background blocks, two characters per
/// sample. Large fields are sampled down to about 40 columns by 30 rows.
pub fn write_ansi<W, F>(out: &mut W, width: usize, height: usize, color_at: F) -> io::Result<()>
where
    W: Write,
    F: Fn(usize, usize) -> [u8; 3],
{
    let sample_x = width.div_ceil(40).max(1);
    let sample_y = height.div_ceil(30).max(1);

    for y in (0..height).step_by(sample_y) {
        for x in (0..width).step_by(sample_x) {
            let [r, g, b] = color_at(x, y);
            write!(out, "\x1b[48;2;{};{};{}m  ", r, g, b)?;
        }
        writeln!(out, "\x1b[0m")?;
    }
    out.flush()
}
