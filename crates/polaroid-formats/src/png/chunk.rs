//! PNG chunk data structures

use std::fmt;

use binrw::{BinRead, BinWrite};

use super::error::{PngError, PngResult};
use crate::checksum::chunk_crc;

/// Four-byte chunk type tag
#[derive(Clone, Copy, PartialEq, Eq, Hash, BinRead, BinWrite)]
pub struct ChunkType(pub [u8; 4]);

impl ChunkType {
    /// Image header, always first
    pub const IHDR: Self = Self(*b"IHDR");
    /// Image data
    pub const IDAT: Self = Self(*b"IDAT");
    /// Terminal marker, always last
    pub const IEND: Self = Self(*b"IEND");
    /// Hidden back face
    pub const POLR: Self = Self(*b"pOLR");
    /// Polaroid metadata
    pub const PMET: Self = Self(*b"pMET");

    /// Create a chunk type, rejecting anything but ASCII letters
    pub fn new(bytes: [u8; 4]) -> PngResult<Self> {
        if bytes.iter().all(u8::is_ascii_alphabetic) {
            Ok(Self(bytes))
        } else {
            Err(PngError::InvalidChunkType(bytes))
        }
    }

    /// Raw tag bytes
    pub fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }

    /// Critical chunks have an uppercase first letter
    pub fn is_critical(&self) -> bool {
        self.0[0].is_ascii_uppercase()
    }

    /// Public chunks have an uppercase second letter
    pub fn is_public(&self) -> bool {
        self.0[1].is_ascii_uppercase()
    }

    /// Safe-to-copy chunks have a lowercase fourth letter
    pub fn is_safe_to_copy(&self) -> bool {
        self.0[3].is_ascii_lowercase()
    }
}

impl fmt::Display for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            write!(f, "{}", char::from(b))?;
        }
        Ok(())
    }
}

impl fmt::Debug for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChunkType({self})")
    }
}

/// Length and type prefix of every chunk (big-endian)
#[derive(Debug, Clone, Copy, PartialEq, Eq, BinRead, BinWrite)]
#[br(big)]
#[bw(big)]
pub(crate) struct ChunkHeader {
    pub length: u32,
    pub chunk_type: ChunkType,
}

/// A chunk as it appears in the container: type tag plus payload
///
/// The CRC is not stored; it is derived from the type and data whenever
/// the chunk is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Chunk type tag
    pub chunk_type: ChunkType,
    /// Chunk payload
    pub data: Vec<u8>,
}

impl Chunk {
    /// Create a chunk
    pub fn new(chunk_type: ChunkType, data: Vec<u8>) -> Self {
        Self { chunk_type, data }
    }

    /// CRC-32 over type and data
    pub fn crc(&self) -> u32 {
        chunk_crc(self.chunk_type.as_bytes(), &self.data)
    }

    /// Size on disk: length, type, data and CRC
    pub fn encoded_len(&self) -> usize {
        12 + self.data.len()
    }
}

/// A chunk as framed in an input buffer, including the CRC stored there
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawChunk {
    /// Offset of the length field within the file
    pub offset: usize,
    /// Chunk type tag
    pub chunk_type: ChunkType,
    /// Chunk payload
    pub data: Vec<u8>,
    /// CRC read from the file
    pub stored_crc: u32,
}

impl RawChunk {
    /// CRC recomputed from type and data
    pub fn computed_crc(&self) -> u32 {
        chunk_crc(self.chunk_type.as_bytes(), &self.data)
    }

    /// Whether the stored CRC matches the content
    pub fn crc_ok(&self) -> bool {
        self.stored_crc == self.computed_crc()
    }
}

impl From<RawChunk> for Chunk {
    fn from(raw: RawChunk) -> Self {
        Self {
            chunk_type: raw.chunk_type,
            data: raw.data,
        }
    }
}
