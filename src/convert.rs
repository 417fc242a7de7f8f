// src/convert.rs

//! File-level operations: BMX/BM files to and from ordinary images, and
//! numbered BM frame sequences.

use crate::container::{bmx, legacy, ContainerHeader, FrameSequenceMeta};
use crate::container::meta::META_FILE_NAME;
use crate::raster::bitmap::Bitmap;
use crate::raster::codec::ImageCodec;
use crate::utils::error::Result;
use crate::utils::fs::{read_file, write_file};
use log::info;
use std::path::{Path, PathBuf};

#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Reads and decodes a BMX file.
pub fn load_bmx(path: &Path) -> Result<(Bitmap, ContainerHeader)> {
    let data = read_file(path)?;
    bmx::decode(&data)
}

/// Encodes `bitmap` and writes it as a BMX file.
pub fn write_bmx(path: &Path, bitmap: &Bitmap) -> Result<ContainerHeader> {
    let data = bmx::encode(bitmap)?;
    let header = ContainerHeader::parse(&data)?;
    write_file(path, &data)?;
    Ok(header)
}

/// Reads a BM file and returns its packed rows.
pub fn load_bm(path: &Path) -> Result<Vec<u8>> {
    legacy::decode(&read_file(path)?)
}

/// Reads a frame-sequence `meta` record.
pub fn read_bm_meta(path: &Path) -> Result<FrameSequenceMeta> {
    FrameSequenceMeta::parse(&read_file(path)?)
}

/// Converts a BMX file to a PNG.
pub fn bmx_to_png(input: &Path, output: &Path, codec: &dyn ImageCodec) -> Result<ContainerHeader> {
    let (bitmap, header) = load_bmx(input)?;
    codec.save(output, &bitmap)?;
    info!(
        "Converted '{}' ({}x{}, compressed={}) to '{}'",
        input.display(),
        header.width(),
        header.height(),
        header.is_compressed(),
        output.display()
    );
    Ok(header)
}

/// Converts any image the codec can read to a BMX file.
pub fn png_to_bmx(input: &Path, output: &Path, codec: &dyn ImageCodec) -> Result<ContainerHeader> {
    let bitmap = codec.load(input)?;
    let header = write_bmx(output, &bitmap)?;
    info!(
        "Converted '{}' to '{}' ({}x{}, compressed={})",
        input.display(),
        output.display(),
        header.width(),
        header.height(),
        header.is_compressed()
    );
    Ok(header)
}

/// A directory of `frame_NN.bm` files described by a `meta` record.
#[derive(Debug, Clone)]
pub struct FrameSequence {
    pub meta: FrameSequenceMeta,
    pub frames: Vec<Bitmap>,
}

impl FrameSequence {
    /// Reads `dir/meta` and decodes every frame it lists.
    pub fn load(dir: &Path) -> Result<Self> {
        let meta = read_bm_meta(&dir.join(META_FILE_NAME))?;
        info!(
            "BM meta - width: {}, height: {}, frame rate: {}, frame count: {}",
            meta.width, meta.height, meta.frame_rate, meta.frame_count
        );

        let load_frame = |index: u32| -> Result<Bitmap> {
            let path = dir.join(FrameSequenceMeta::frame_file_name(index));
            let data = read_file(&path)?;
            legacy::decode_bitmap(&data, meta.width, meta.height)
        };

        #[cfg(feature = "rayon")]
        let frames = (0..meta.frame_count)
            .into_par_iter()
            .map(load_frame)
            .collect::<Result<Vec<_>>>()?;

        #[cfg(not(feature = "rayon"))]
        let frames = (0..meta.frame_count)
            .map(load_frame)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { meta, frames })
    }

    /// Writes the sequence as `frame_NN.bm` files plus `meta` into `dir`.
    pub fn save(&self, dir: &Path) -> Result<()> {
        write_file(&dir.join(META_FILE_NAME), &self.meta.to_bytes())?;
        for (index, frame) in (0u32..).zip(&self.frames) {
            let path = dir.join(FrameSequenceMeta::frame_file_name(index));
            write_file(&path, &legacy::encode_bitmap(frame)?)?;
        }
        Ok(())
    }

    /// Writes each frame as `frame_NN.png` into `out_dir`.
    pub fn save_png(&self, out_dir: &Path, codec: &dyn ImageCodec) -> Result<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(self.frames.len());
        for (index, frame) in self.frames.iter().enumerate() {
            let path = out_dir.join(format!("frame_{:02}.png", index));
            codec.save(&path, frame)?;
            info!("Saved PNG as '{}'", path.display());
            written.push(path);
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::codec::ImageCrateCodec;
    use crate::utils::error::BmxError;

    #[test]
    fn test_write_and_load_bmx() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("solid.bmx");
        let bmp = Bitmap::filled(30, 30, 0);
        let header = write_bmx(&path, &bmp).unwrap();
        assert!(header.is_compressed());

        let (loaded, loaded_header) = load_bmx(&path).unwrap();
        assert_eq!(loaded, bmp);
        assert_eq!(loaded_header, header);
    }

    #[test]
    fn test_png_bmx_png() {
        let dir = tempfile::tempdir().unwrap();
        let png = dir.path().join("in.png");
        let bmx_path = dir.path().join("in.bmx");
        let out = dir.path().join("out.png");

        let px: Vec<u8> = (0..17 * 9).map(|i| ((i * 29) % 256) as u8).collect();
        let bmp = Bitmap::new(17, 9, px).unwrap();
        ImageCrateCodec.save(&png, &bmp).unwrap();

        png_to_bmx(&png, &bmx_path, &ImageCrateCodec).unwrap();
        let header = bmx_to_png(&bmx_path, &out, &ImageCrateCodec).unwrap();
        assert_eq!((header.width(), header.height()), (17, 9));
        assert_eq!(ImageCrateCodec.load(&out).unwrap(), bmp.thresholded());
    }

    #[test]
    fn test_frame_sequence_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let frames: Vec<Bitmap> = (0..3u32)
            .map(|n| {
                let px = (0..24 * 10).map(|i| if (i + n) % 5 == 0 { 0 } else { 255 }).collect();
                Bitmap::new(24, 10, px).unwrap()
            })
            .collect();
        let seq = FrameSequence {
            meta: FrameSequenceMeta {
                width: 24,
                height: 10,
                frame_rate: 12,
                frame_count: 3,
            },
            frames: frames.clone(),
        };
        seq.save(dir.path()).unwrap();

        let loaded = FrameSequence::load(dir.path()).unwrap();
        assert_eq!(loaded.meta, seq.meta);
        assert_eq!(loaded.frames, frames);

        let pngs = loaded.save_png(dir.path(), &ImageCrateCodec).unwrap();
        assert_eq!(pngs.len(), 3);
        assert!(pngs[2].ends_with("frame_02.png"));
    }

    #[test]
    fn test_missing_frame_fails() {
        let dir = tempfile::tempdir().unwrap();
        let meta = FrameSequenceMeta {
            width: 8,
            height: 8,
            frame_rate: 1,
            frame_count: 2,
        };
        write_file(&dir.path().join(META_FILE_NAME), &meta.to_bytes()).unwrap();
        write_file(&dir.path().join("frame_00.bm"), &[0x00, 0xFF]).unwrap();
        assert!(matches!(
            FrameSequence::load(dir.path()),
            Err(BmxError::Io(_))
        ));
    }
}
