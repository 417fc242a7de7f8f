// src/raster/codec.rs

//! Loading and saving ordinary picture files.

use super::bitmap::Bitmap;
use crate::utils::error::Result;
use image::{GrayImage, ImageFormat};
use log::debug;
use std::path::Path;

/// Decodes common image formats to one gray channel and writes PNGs.
pub trait ImageCodec {
    fn load(&self, path: &Path) -> Result<Bitmap>;
    fn save(&self, path: &Path, bitmap: &Bitmap) -> Result<()>;
}

/// [`ImageCodec`] backed by the `image` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageCrateCodec;

impl ImageCodec for ImageCrateCodec {
    fn load(&self, path: &Path) -> Result<Bitmap> {
        let img: GrayImage = image::open(path)?.to_luma8();
        debug!(
            "Loaded '{}' as {}x{} gray",
            path.display(),
            img.width(),
            img.height()
        );
        Ok(Bitmap::from(img))
    }

    fn save(&self, path: &Path, bitmap: &Bitmap) -> Result<()> {
        let img = GrayImage::try_from(bitmap.clone())?;
        img.save_with_format(path, ImageFormat::Png)?;
        debug!("Saved {}x{} PNG to '{}'", img.width(), img.height(), path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_png_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gray.png");
        let px: Vec<u8> = (0..6 * 4).map(|i| (i * 10) as u8).collect();
        let bmp = Bitmap::new(6, 4, px).unwrap();

        ImageCrateCodec.save(&path, &bmp).unwrap();
        let loaded = ImageCrateCodec.load(&path).unwrap();
        assert_eq!(loaded, bmp);
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ImageCrateCodec.load(&dir.path().join("nope.png")).is_err());
    }
}
