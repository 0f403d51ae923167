use std::io::{self, Write};
use std::path::Path;

use image::{ImageError, RgbImage};

use crate::error::LoadError;
use crate::render::write_ansi;

/// Loads a previously saved map image.
pub fn load(path: &Path) -> Result<RgbImage, LoadError> {
    if !path.is_file() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }
    match image::open(path) {
        Ok(img) => Ok(img.to_rgb8()),
        Err(ImageError::IoError(err)) if err.kind() == io::ErrorKind::NotFound => {
            Err(LoadError::NotFound(path.to_path_buf()))
        }
        Err(source) => Err(LoadError::Unreadable {
            path: path.to_path_buf(),
            source,
        }),
    }
}

pub fn show<W: Write>(img: &RgbImage, out: &mut W) -> io::Result<()> {
    write_ansi(out, img.width() as usize, img.height() as usize, |x, y| {
        img.get_pixel(x as u32, y as u32).0
    })
}
