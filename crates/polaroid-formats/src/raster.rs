//! Adapter between image files and raw back-face rasters
//!
//! Decoding and encoding of real image files is delegated to the `image`
//! crate; this module only maps between its buffers and [`BackImage`].

use std::io::Cursor;

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};
use thiserror::Error;

use crate::back::{BackError, BackImage};

/// Raster adapter error type
#[derive(Debug, Error)]
pub enum RasterError {
    /// The image codec failed to decode or encode
    #[error("image codec error: {0}")]
    Image(#[from] image::ImageError),

    /// Image too large for the 16-bit back-face dimensions
    #[error("image is {width}x{height}, back faces are limited to 65535x65535")]
    DimensionTooLarge {
        /// Width in pixels
        width: u32,
        /// Height in pixels
        height: u32,
    },

    /// Raster layout has no PNG color type
    #[error("cannot encode {channels} channels at {bits_per_channel} bits as PNG")]
    UnsupportedLayout {
        /// Channel count
        channels: u8,
        /// Bits per channel
        bits_per_channel: u8,
    },

    /// Raster failed geometry validation
    #[error(transparent)]
    Back(#[from] BackError),
}

/// Result type for raster operations
pub type RasterResult<T> = Result<T, RasterError>;

/// Decode any supported image file into 8-bit RGBA pixels
pub fn decode_rgba(file: &[u8]) -> RasterResult<BackImage> {
    let rgba = image::load_from_memory(file)?.to_rgba8();
    let (width, height) = rgba.dimensions();
    let (Ok(w), Ok(h)) = (u16::try_from(width), u16::try_from(height)) else {
        return Err(RasterError::DimensionTooLarge { width, height });
    };
    Ok(BackImage::rgba8(w, h, rgba.into_raw())?)
}

/// Re-encode any supported image file as an RGBA PNG
///
/// Used for the front face, which has no 16-bit dimension limit.
pub fn normalize_png(file: &[u8]) -> RasterResult<Vec<u8>> {
    let rgba = image::load_from_memory(file)?.to_rgba8();
    let (width, height) = rgba.dimensions();
    let mut out = Cursor::new(Vec::new());
    PngEncoder::new(&mut out).write_image(rgba.as_raw(), width, height, ExtendedColorType::Rgba8)?;
    Ok(out.into_inner())
}

/// Encode an 8-bit raster as a PNG file (L, LA, RGB or RGBA by channel count)
pub fn encode_png(raster: &BackImage) -> RasterResult<Vec<u8>> {
    raster.validate()?;
    let color = match (raster.channels, raster.bits_per_channel) {
        (1, 8) => ExtendedColorType::L8,
        (2, 8) => ExtendedColorType::La8,
        (3, 8) => ExtendedColorType::Rgb8,
        (4, 8) => ExtendedColorType::Rgba8,
        (channels, bits_per_channel) => {
            return Err(RasterError::UnsupportedLayout {
                channels,
                bits_per_channel,
            });
        }
    };

    let mut out = Cursor::new(Vec::new());
    PngEncoder::new(&mut out).write_image(
        &raster.pixels,
        u32::from(raster.width),
        u32::from(raster.height),
        color,
    )?;
    Ok(out.into_inner())
}
