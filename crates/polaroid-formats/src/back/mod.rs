//! `pOLR` back payload codec
//!
//! The back face travels in a `pOLR` chunk in one of two generations:
//!
//! - **v2**: a fixed [`BackHeader`] followed by the pixel buffer compressed
//!   with one of the [`Compression`] strategies; a CRC-32 over the
//!   uncompressed pixels guards the round trip
//! - **v1 (legacy)**: a complete PNG file embedded as-is, recognised by its
//!   signature; read-only
//!
//! # Example
//!
//! ```
//! use polaroid_formats::back::{self, BackImage, BackPayload, Compression};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let image = BackImage::rgba8(4, 4, vec![7; 64])?;
//! let packed = back::pack(&image, Compression::Rle)?;
//!
//! match back::unpack(&packed)? {
//!     BackPayload::Pixels { image: unpacked, .. } => assert_eq!(unpacked, image),
//!     BackPayload::Legacy(_) => unreachable!(),
//! }
//! # Ok(())
//! # }
//! ```

mod compression;
mod error;
mod header;

pub use compression::{Compression, compress, decompress};
pub use error::{BackError, BackResult};
pub use header::{BACK_VERSION, BackHeader, HEADER_SIZE, LEGACY_VERSION};

use tracing::debug;

use crate::checksum::crc32;
use crate::png;

/// Maximum uncompressed pixel buffer (1 GB)
///
/// Checked before any decompression buffer is allocated.
pub const MAX_PIXEL_BYTES: usize = 1024 * 1024 * 1024;

/// Raw raster carried as the back face
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackImage {
    /// Width in pixels
    pub width: u16,
    /// Height in pixels
    pub height: u16,
    /// Channels per pixel (1 = L, 2 = LA, 3 = RGB, 4 = RGBA)
    pub channels: u8,
    /// Bits per channel
    pub bits_per_channel: u8,
    /// Row-major, tightly packed pixel bytes
    pub pixels: Vec<u8>,
}

impl BackImage {
    /// Create an image, checking the buffer length against the geometry
    pub fn new(
        width: u16,
        height: u16,
        channels: u8,
        bits_per_channel: u8,
        pixels: Vec<u8>,
    ) -> BackResult<Self> {
        let image = Self {
            width,
            height,
            channels,
            bits_per_channel,
            pixels,
        };
        image.validate()?;
        Ok(image)
    }

    /// 8-bit RGBA image
    pub fn rgba8(width: u16, height: u16, pixels: Vec<u8>) -> BackResult<Self> {
        Self::new(width, height, 4, 8, pixels)
    }

    /// Bytes the geometry calls for
    pub fn expected_len(&self) -> usize {
        geometry_len(self.width, self.height, self.channels, self.bits_per_channel)
    }

    /// Check layout and buffer length
    pub fn validate(&self) -> BackResult<()> {
        if !is_supported_layout(self.channels, self.bits_per_channel) {
            return Err(BackError::UnsupportedLayout {
                channels: self.channels,
                bits_per_channel: self.bits_per_channel,
            });
        }
        let expected = self.expected_len();
        if self.pixels.len() != expected {
            return Err(BackError::PixelSizeMismatch {
                expected,
                actual: self.pixels.len(),
            });
        }
        Ok(())
    }
}

fn is_supported_layout(channels: u8, bits_per_channel: u8) -> bool {
    (1..=4).contains(&channels) && matches!(bits_per_channel, 8 | 16)
}

fn geometry_len(width: u16, height: u16, channels: u8, bits_per_channel: u8) -> usize {
    usize::from(width)
        * usize::from(height)
        * usize::from(channels)
        * usize::from(bits_per_channel / 8)
}

/// Unpacked `pOLR` payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackPayload {
    /// v1: an embedded PNG file, byte-identical to what was stored
    Legacy(Vec<u8>),
    /// v2: verified pixels plus the strategy they were stored with
    Pixels {
        /// Recovered raster
        image: BackImage,
        /// Strategy recorded in the header
        compression: Compression,
    },
}

impl BackPayload {
    /// Payload generation (1 or 2)
    pub fn version(&self) -> u8 {
        match self {
            Self::Legacy(_) => LEGACY_VERSION,
            Self::Pixels { .. } => BACK_VERSION,
        }
    }

    /// The raster, if this is a v2 payload
    pub fn image(&self) -> Option<&BackImage> {
        match self {
            Self::Legacy(_) => None,
            Self::Pixels { image, .. } => Some(image),
        }
    }
}

/// Pack a back image into a v2 `pOLR` payload
pub fn pack(image: &BackImage, compression: Compression) -> BackResult<Vec<u8>> {
    let uncompressed_size = image.pixels.len();
    if uncompressed_size > MAX_PIXEL_BYTES {
        return Err(BackError::PayloadTooLarge {
            size: uncompressed_size,
            max: MAX_PIXEL_BYTES,
        });
    }

    let compressed = compress(&image.pixels, compression)?;
    let compressed_size = u32::try_from(compressed.len()).map_err(|_| BackError::PayloadTooLarge {
        size: compressed.len(),
        max: u32::MAX as usize,
    })?;

    let header = BackHeader {
        version: BACK_VERSION,
        channels: image.channels,
        bits_per_channel: image.bits_per_channel,
        compression: compression.as_byte(),
        width: image.width,
        height: image.height,
        uncompressed_size: uncompressed_size as u32,
        compressed_size,
        crc32: crc32(&image.pixels),
    };

    debug!(
        "Packed {}x{} back face with {}: {} -> {} bytes",
        image.width, image.height, compression, uncompressed_size, compressed_size
    );

    let mut out = header.build()?;
    out.extend_from_slice(&compressed);
    Ok(out)
}

/// Unpack a `pOLR` payload of either generation
///
/// Anything starting with the PNG signature is a legacy payload and is
/// returned untouched. Everything else must be a valid v2 payload whose
/// pixels decompress to exactly the declared size and CRC.
pub fn unpack(data: &[u8]) -> BackResult<BackPayload> {
    if png::has_signature(data) {
        debug!("Legacy back payload: {} byte embedded PNG", data.len());
        return Ok(BackPayload::Legacy(data.to_vec()));
    }

    let header = BackHeader::parse(data)?;
    if header.version != BACK_VERSION {
        return Err(BackError::UnsupportedVersion(header.version));
    }
    let compression = Compression::try_from(header.compression)?;

    let expected = header.uncompressed_size as usize;
    if expected > MAX_PIXEL_BYTES {
        return Err(BackError::PayloadTooLarge {
            size: expected,
            max: MAX_PIXEL_BYTES,
        });
    }
    if !is_supported_layout(header.channels, header.bits_per_channel)
        || geometry_len(
            header.width,
            header.height,
            header.channels,
            header.bits_per_channel,
        ) != expected
    {
        return Err(BackError::InvalidGeometry {
            width: header.width,
            height: header.height,
            channels: header.channels,
            bits_per_channel: header.bits_per_channel,
            uncompressed_size: header.uncompressed_size,
        });
    }

    let body = &data[HEADER_SIZE..];
    let compressed_size = header.compressed_size as usize;
    if body.len() < compressed_size {
        return Err(BackError::TruncatedPayload {
            expected: compressed_size,
            available: body.len(),
        });
    }

    let pixels = decompress(&body[..compressed_size], compression, expected)?;
    if pixels.len() != expected {
        return Err(BackError::SizeMismatch {
            expected,
            actual: pixels.len(),
        });
    }
    let actual = crc32(&pixels);
    if actual != header.crc32 {
        return Err(BackError::ChecksumMismatch {
            expected: header.crc32,
            actual,
        });
    }

    Ok(BackPayload::Pixels {
        image: BackImage {
            width: header.width,
            height: header.height,
            channels: header.channels,
            bits_per_channel: header.bits_per_channel,
            pixels,
        },
        compression,
    })
}
