//! Fixed v2 header of the `pOLR` payload
//!
//! 20 bytes, big-endian:
//! - version (u8, always 2)
//! - channels, bits per channel, compression tag (u8 each)
//! - width, height (u16 each)
//! - uncompressed size, compressed size (u32 each)
//! - CRC-32 of the uncompressed pixels (u32)

use binrw::io::Cursor;
use binrw::{BinRead, BinWrite};

use super::error::{BackError, BackResult};

/// Current payload version
pub const BACK_VERSION: u8 = 2;

/// Legacy payload version (embedded PNG file)
pub const LEGACY_VERSION: u8 = 1;

/// Encoded header size in bytes
pub const HEADER_SIZE: usize = 20;

/// `pOLR` v2 header
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead, BinWrite)]
#[br(big)]
#[bw(big)]
pub struct BackHeader {
    /// Format version
    pub version: u8,
    /// Channel count
    pub channels: u8,
    /// Bits per channel
    pub bits_per_channel: u8,
    /// Compression tag, kept raw so unknown tags surface as their own error
    pub compression: u8,
    /// Image width
    pub width: u16,
    /// Image height
    pub height: u16,
    /// Length of the pixel buffer before compression
    pub uncompressed_size: u32,
    /// Length of the bytes following the header
    pub compressed_size: u32,
    /// CRC-32 of the uncompressed pixel buffer
    pub crc32: u32,
}

impl BackHeader {
    /// Read the header from the start of a payload
    pub fn parse(data: &[u8]) -> BackResult<Self> {
        if data.len() < HEADER_SIZE {
            return Err(BackError::TruncatedHeader {
                needed: HEADER_SIZE,
                actual: data.len(),
            });
        }
        Ok(Self::read(&mut Cursor::new(data))?)
    }

    /// Serialize to exactly `HEADER_SIZE` bytes
    pub fn build(&self) -> BackResult<Vec<u8>> {
        let mut cursor = Cursor::new(Vec::with_capacity(HEADER_SIZE));
        self.write(&mut cursor)?;
        Ok(cursor.into_inner())
    }
}
