//! `pMET` metadata payload codec
//!
//! Layout (big-endian): `format: u32 | length: u32 | length bytes`.
//! Format `1` is UTF-8 JSON, the only format currently written or read.
//!
//! The payload carries no checksum of its own; integrity rests on the
//! container and on the JSON parser.

use binrw::io::Cursor;
use binrw::{BinRead, BinWrite};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Format tag for JSON metadata
pub const METADATA_FORMAT_JSON: u32 = 1;

/// Encoded header size in bytes
pub const METADATA_HEADER_SIZE: usize = 8;

/// Metadata payload error type
#[derive(Debug, Error)]
pub enum MetadataError {
    /// Payload shorter than the 8-byte header
    #[error("metadata header truncated: need 8 bytes, got {0}")]
    TruncatedHeader(usize),

    /// Format tag other than JSON
    #[error("unsupported metadata format: {0}")]
    UnsupportedFormat(u32),

    /// Declared length disagrees with the bytes present
    #[error("metadata length mismatch: header declares {declared} bytes, {actual} present")]
    LengthMismatch {
        /// Length from the header
        declared: usize,
        /// Bytes after the header
        actual: usize,
    },

    /// Blob too large for the 32-bit length field
    #[error("metadata blob of {0} bytes does not fit a 32-bit length")]
    TooLarge(usize),

    /// JSON (de)serialization failed
    #[error("invalid JSON metadata: {0}")]
    Json(#[from] serde_json::Error),

    /// Binary parsing error
    #[error("binary parsing error: {0}")]
    BinRw(#[from] binrw::Error),
}

/// Result type for metadata operations
pub type MetadataResult<T> = Result<T, MetadataError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead, BinWrite)]
#[br(big)]
#[bw(big)]
struct MetadataHeader {
    format: u32,
    length: u32,
}

/// Parsed `pMET` payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataPayload {
    /// Format tag
    pub format: u32,
    /// Serialized metadata
    pub data: Vec<u8>,
}

impl MetadataPayload {
    /// JSON payload around already serialized bytes
    pub fn json(data: Vec<u8>) -> Self {
        Self {
            format: METADATA_FORMAT_JSON,
            data,
        }
    }

    /// Parse a payload; the declared length must cover the rest exactly
    pub fn parse(data: &[u8]) -> MetadataResult<Self> {
        if data.len() < METADATA_HEADER_SIZE {
            return Err(MetadataError::TruncatedHeader(data.len()));
        }
        let header = MetadataHeader::read(&mut Cursor::new(data))?;
        if header.format != METADATA_FORMAT_JSON {
            return Err(MetadataError::UnsupportedFormat(header.format));
        }

        let body = &data[METADATA_HEADER_SIZE..];
        let declared = header.length as usize;
        if body.len() != declared {
            return Err(MetadataError::LengthMismatch {
                declared,
                actual: body.len(),
            });
        }

        Ok(Self {
            format: header.format,
            data: body.to_vec(),
        })
    }

    /// Serialize header and blob
    pub fn build(&self) -> MetadataResult<Vec<u8>> {
        let length =
            u32::try_from(self.data.len()).map_err(|_| MetadataError::TooLarge(self.data.len()))?;
        let mut cursor = Cursor::new(Vec::with_capacity(METADATA_HEADER_SIZE + self.data.len()));
        MetadataHeader {
            format: self.format,
            length,
        }
        .write(&mut cursor)?;
        let mut out = cursor.into_inner();
        out.extend_from_slice(&self.data);
        Ok(out)
    }
}

impl crate::PolaroidFormat for MetadataPayload {
    type Error = MetadataError;

    fn parse(data: &[u8]) -> Result<Self, MetadataError> {
        MetadataPayload::parse(data)
    }

    fn build(&self) -> Result<Vec<u8>, MetadataError> {
        MetadataPayload::build(self)
    }
}

/// Wrap serialized JSON bytes into a `pMET` payload
pub fn pack(serialized: &[u8]) -> MetadataResult<Vec<u8>> {
    MetadataPayload::json(serialized.to_vec()).build()
}

/// Extract the serialized bytes from a `pMET` payload
pub fn unpack(data: &[u8]) -> MetadataResult<Vec<u8>> {
    Ok(MetadataPayload::parse(data)?.data)
}

/// Serialize a value as UTF-8 JSON (non-ASCII characters are not escaped)
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> MetadataResult<Vec<u8>> {
    Ok(serde_json::to_vec(value)?)
}

/// Deserialize JSON bytes
pub fn from_json<T: DeserializeOwned>(data: &[u8]) -> MetadataResult<T> {
    Ok(serde_json::from_slice(data)?)
}
