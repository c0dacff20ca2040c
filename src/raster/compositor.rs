use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::{imageops, ImageFormat, Rgb, RgbImage};
use tempfile::NamedTempFile;
use tracing::info;

use crate::error::{GoreError, Result};

/// One rendered gore.
#[derive(Clone, Debug)]
pub struct RasterTile {
    pub index: usize,
    pub image: RgbImage,
}

impl RasterTile {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// The finished globe unwrap.
#[derive(Debug)]
pub struct GlobeImage {
    pub image: RgbImage,
}

impl GlobeImage {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Write the image to `path`, format chosen by extension (PNG when
    /// unknown). The file only appears once fully written.
    pub fn save(&self, path: &Path) -> Result<()> {
        let format = ImageFormat::from_path(path).unwrap_or(ImageFormat::Png);
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let output_err = |source| GoreError::Output {
            path: path.to_path_buf(),
            source,
        };

        fs::create_dir_all(dir).map_err(output_err)?;
        let mut tmp = NamedTempFile::new_in(dir).map_err(output_err)?;
        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            self.image
                .write_to(&mut writer, format)
                .map_err(|source| GoreError::Encode {
                    path: path.to_path_buf(),
                    source,
                })?;
            writer.flush().map_err(output_err)?;
        }
        tmp.persist(path).map_err(|e| output_err(e.error))?;

        info!(path = %path.display(), width = self.width(), height = self.height(), "globe written");
        Ok(())
    }
}

/// Places equally sized tiles left to right into one image.
#[derive(Debug)]
pub struct GlobeCompositor {
    tile_width: u32,
    tile_height: u32,
    count: usize,
    image: RgbImage,
}

impl GlobeCompositor {
    /// Blank globe canvas for `count` tiles of `tile_width` x `tile_height`.
    pub fn new(tile_width: u32, tile_height: u32, count: usize) -> Result<Self> {
        let width = u32::try_from(count)
            .ok()
            .and_then(|count| tile_width.checked_mul(count))
            .ok_or_else(|| GoreError::Frame {
                reason: format!(
                    "{count} gores of {tile_width} px exceed the maximum image width of {} px",
                    u32::MAX
                ),
            })?;
        Ok(Self {
            tile_width,
            tile_height,
            count,
            image: RgbImage::from_pixel(width, tile_height, Rgb([255, 255, 255])),
        })
    }

    /// Copy a tile verbatim to horizontal offset `tile_width * tile.index`.
    pub fn place(&mut self, tile: &RasterTile) -> Result<()> {
        if tile.index >= self.count {
            return Err(GoreError::Render {
                gore: tile.index,
                reason: format!("tile index out of range for {} gores", self.count),
            });
        }
        if tile.width() != self.tile_width || tile.height() != self.tile_height {
            return Err(GoreError::Render {
                gore: tile.index,
                reason: format!(
                    "tile is {}x{}, expected {}x{}",
                    tile.width(),
                    tile.height(),
                    self.tile_width,
                    self.tile_height
                ),
            });
        }
        let x = self.tile_width as i64 * tile.index as i64;
        imageops::replace(&mut self.image, &tile.image, x, 0);
        Ok(())
    }

    pub fn finish(self) -> GlobeImage {
        GlobeImage { image: self.image }
    }
}
