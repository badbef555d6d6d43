//! Back payload error types

use thiserror::Error;

use crate::rle::RleError;

/// `pOLR` payload error type
#[derive(Debug, Error)]
pub enum BackError {
    /// Payload shorter than the fixed v2 header
    #[error("back payload header truncated: need {needed} bytes, got {actual}")]
    TruncatedHeader {
        /// Header size
        needed: usize,
        /// Payload size
        actual: usize,
    },

    /// Version byte other than 2 (and no embedded PNG signature)
    #[error("unsupported back payload version: {0}")]
    UnsupportedVersion(u8),

    /// Compression tag outside the known set
    #[error("unsupported compression strategy: {0}")]
    UnsupportedCompression(u8),

    /// Fewer compressed bytes than the header declares
    #[error("compressed data truncated: header declares {expected} bytes, {available} present")]
    TruncatedPayload {
        /// Declared compressed size
        expected: usize,
        /// Bytes after the header
        available: usize,
    },

    /// Decompressed length differs from the declared uncompressed size
    #[error("decompressed size mismatch: expected {expected} bytes, got {actual} bytes")]
    SizeMismatch {
        /// Declared uncompressed size
        expected: usize,
        /// Actual decompressed size
        actual: usize,
    },

    /// CRC of the decompressed pixels differs from the stored CRC
    #[error("pixel checksum mismatch: expected {expected:08X}, got {actual:08X}")]
    ChecksumMismatch {
        /// Stored CRC
        expected: u32,
        /// Computed CRC
        actual: u32,
    },

    /// RLE stream is malformed
    #[error("RLE decode failed: {0}")]
    Rle(#[from] RleError),

    /// DEFLATE stream is malformed
    #[error("decompression failed: {0}")]
    Decompression(std::io::Error),

    /// DEFLATE compression failed
    #[error("compression failed: {0}")]
    Compression(std::io::Error),

    /// Pixel buffer length disagrees with the image geometry
    #[error("pixel buffer is {actual} bytes, geometry needs {expected}")]
    PixelSizeMismatch {
        /// Bytes implied by width, height, channels and bit depth
        expected: usize,
        /// Bytes supplied
        actual: usize,
    },

    /// Channel count or bit depth outside what the format stores
    #[error("unsupported pixel layout: {channels} channels at {bits_per_channel} bits")]
    UnsupportedLayout {
        /// Channel count
        channels: u8,
        /// Bits per channel
        bits_per_channel: u8,
    },

    /// Header geometry does not describe `uncompressed_size` bytes of pixels
    #[error(
        "header geometry {width}x{height}, {channels} channels at {bits_per_channel} bits does not match {uncompressed_size} pixel bytes"
    )]
    InvalidGeometry {
        /// Declared width
        width: u16,
        /// Declared height
        height: u16,
        /// Declared channel count
        channels: u8,
        /// Declared bit depth
        bits_per_channel: u8,
        /// Declared uncompressed size
        uncompressed_size: u32,
    },

    /// Payload larger than the configured ceiling
    #[error("payload size {size} exceeds maximum of {max} bytes")]
    PayloadTooLarge {
        /// Requested size
        size: usize,
        /// Ceiling
        max: usize,
    },

    /// Binary parsing error
    #[error("binary parsing error: {0}")]
    BinRw(#[from] binrw::Error),
}

/// Result type for back payload operations
pub type BackResult<T> = Result<T, BackError>;
