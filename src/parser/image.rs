//! Raster image media decoding.

use image::imageops::{self, FilterType};
use image::{ImageFormat, Limits, RgbaImage};
use kurbo::{Point, Rect};

use crate::container::NoteArchive;
use crate::error::{Error, Result};
use crate::model::{ImageObject, PageSpan, PlacedImage};

/// Decodes image media objects from the container.
#[derive(Debug, Clone, Copy)]
pub struct ImageDecoder<'a> {
    archive: &'a NoteArchive,
}

impl<'a> ImageDecoder<'a> {
    /// Create a decoder reading from an archive.
    pub fn new(archive: &'a NoteArchive) -> Self {
        Self { archive }
    }

    /// Decode and place an image on a page.
    ///
    /// Returns `Ok(None)` for objects whose backing file is flagged missing.
    pub fn decode(&self, object: &ImageObject, span: PageSpan) -> Result<Option<PlacedImage>> {
        if object.is_missing {
            log::debug!("Image object {} is flagged missing", object.index);
            return Ok(None);
        }

        let width = logical_pixels(object.size.width);
        let height = logical_pixels(object.size.height);
        check_pixel_budget(width, height)?;

        let bytes = self.archive.read_entry(&object.archive_path)?;
        let decoded = decode_image(&bytes, object.is_jpeg)?;

        let resized = if decoded.dimensions() == (width, height) {
            decoded
        } else {
            imageops::resize(&decoded, width, height, FilterType::Triangle)
        };

        let mut rgba8_premul = resized.into_raw();
        premultiply_rgba8_in_place(&mut rgba8_premul);

        let origin = Point::new(object.origin.x, span.to_local(object.origin.y));
        Ok(Some(PlacedImage {
            rect: Rect::from_origin_size(origin, object.size),
            width,
            height,
            rgba8_premul,
        }))
    }
}

/// Decode JPEG or PNG bytes into straight-alpha RGBA8.
pub fn decode_image(bytes: &[u8], is_jpeg: bool) -> Result<RgbaImage> {
    let format = if is_jpeg {
        ImageFormat::Jpeg
    } else {
        ImageFormat::Png
    };
    let decoded = image::load_from_memory_with_format(bytes, format)?;
    Ok(decoded.to_rgba8())
}

fn logical_pixels(extent: f64) -> u32 {
    if extent.is_finite() && extent >= 1.0 {
        extent.round() as u32
    } else {
        1
    }
}

/// Reject target sizes whose RGBA8 buffer exceeds the decoder's allocation limit.
fn check_pixel_budget(width: u32, height: u32) -> Result<()> {
    let budget = Limits::default().max_alloc.unwrap_or(u64::MAX);
    let needed = u64::from(width)
        .saturating_mul(u64::from(height))
        .saturating_mul(4);
    if needed > budget {
        return Err(Error::Codec(format!(
            "image size {}x{} needs {} bytes, limit is {}",
            width, height, needed, budget
        )));
    }
    Ok(())
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}
