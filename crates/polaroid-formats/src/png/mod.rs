//! PNG chunk container
//!
//! Parses a PNG byte stream into its ordered chunk list and rebuilds it,
//! recomputing every CRC. Unknown chunk types pass through untouched, and
//! [`ParseLimits`] bounds the work done on untrusted input.

mod chunk;
mod error;

pub use chunk::{Chunk, ChunkType, RawChunk};
pub use error::{PngError, PngResult};

use binrw::io::{Cursor, Write};
use binrw::{BinRead, BinWrite};
use tracing::{debug, warn};

use chunk::ChunkHeader;

/// PNG file signature
pub const PNG_SIGNATURE: [u8; 8] = *b"\x89PNG\r\n\x1a\n";

/// Largest chunk length PNG allows (2^31 - 1)
pub const MAX_CHUNK_LENGTH: usize = 0x7FFF_FFFF;

/// Default maximum input size (256 MB)
pub const DEFAULT_MAX_FILE_SIZE: usize = 256 * 1024 * 1024;

/// Default maximum chunk count
pub const DEFAULT_MAX_CHUNK_COUNT: usize = 65_536;

/// Bounds applied before any allocation while parsing untrusted input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseLimits {
    /// Maximum total input length
    pub max_file_size: usize,
    /// Maximum number of chunks
    pub max_chunk_count: usize,
    /// Maximum declared length of a single chunk
    pub max_chunk_length: usize,
}

impl Default for ParseLimits {
    fn default() -> Self {
        Self {
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            max_chunk_count: DEFAULT_MAX_CHUNK_COUNT,
            max_chunk_length: MAX_CHUNK_LENGTH,
        }
    }
}

impl ParseLimits {
    /// Limits that only enforce the PNG format's own ceilings
    pub fn unbounded() -> Self {
        Self {
            max_file_size: usize::MAX,
            max_chunk_count: usize::MAX,
            max_chunk_length: MAX_CHUNK_LENGTH,
        }
    }
}

/// Whether `data` starts with the PNG signature
pub fn has_signature(data: &[u8]) -> bool {
    data.starts_with(&PNG_SIGNATURE)
}

/// Frame every chunk in `data`, keeping the stored CRCs
///
/// Reading stops after `IEND` or when the buffer is exhausted. Stored CRCs
/// are returned as-is and never checked here.
pub fn scan(data: &[u8], limits: &ParseLimits) -> PngResult<Vec<RawChunk>> {
    if data.len() > limits.max_file_size {
        return Err(PngError::FileTooLarge {
            size: data.len(),
            max: limits.max_file_size,
        });
    }
    if !has_signature(data) {
        let prefix = data[..data.len().min(PNG_SIGNATURE.len())].to_vec();
        return Err(PngError::InvalidSignature(prefix));
    }

    let mut cursor = Cursor::new(data);
    cursor.set_position(PNG_SIGNATURE.len() as u64);
    let mut chunks = Vec::new();

    loop {
        let offset = cursor.position() as usize;
        if offset >= data.len() {
            break;
        }
        if chunks.len() >= limits.max_chunk_count {
            return Err(PngError::TooManyChunks(limits.max_chunk_count));
        }

        let available = data.len() - offset;
        if available < 8 {
            return Err(PngError::TruncatedChunk {
                offset,
                needed: 8,
                available,
            });
        }
        let header = ChunkHeader::read_be(&mut cursor)?;
        let length = header.length as usize;
        if length > limits.max_chunk_length {
            return Err(PngError::ChunkTooLarge {
                length,
                max: limits.max_chunk_length,
            });
        }
        if !header.chunk_type.as_bytes().iter().all(u8::is_ascii_alphabetic) {
            return Err(PngError::InvalidChunkType(header.chunk_type.0));
        }

        let body_start = offset + 8;
        let needed = length + 4;
        if data.len() - body_start < needed {
            return Err(PngError::TruncatedChunk {
                offset,
                needed: 8 + needed,
                available,
            });
        }
        let body = data[body_start..body_start + length].to_vec();
        cursor.set_position((body_start + length) as u64);
        let stored_crc = u32::read_be(&mut cursor)?;

        let is_end = header.chunk_type == ChunkType::IEND;
        chunks.push(RawChunk {
            offset,
            chunk_type: header.chunk_type,
            data: body,
            stored_crc,
        });
        if is_end {
            let trailing = data.len() - cursor.position() as usize;
            if trailing > 0 {
                debug!("Ignoring {} bytes after IEND", trailing);
            }
            break;
        }
    }

    debug!("Scanned {} chunks from {} bytes", chunks.len(), data.len());
    Ok(chunks)
}

/// A PNG file as an ordered list of chunks
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PngFile {
    /// Chunks in file order
    pub chunks: Vec<Chunk>,
}

impl PngFile {
    /// Create a file from chunks
    pub fn new(chunks: Vec<Chunk>) -> Self {
        Self { chunks }
    }

    /// Parse with default limits
    pub fn parse(data: &[u8]) -> PngResult<Self> {
        Self::parse_with_limits(data, &ParseLimits::default())
    }

    /// Parse with explicit limits
    ///
    /// Stale CRCs are logged and otherwise ignored; payload codecs carry
    /// their own integrity checks.
    pub fn parse_with_limits(data: &[u8], limits: &ParseLimits) -> PngResult<Self> {
        let raw = scan(data, limits)?;
        let chunks = raw
            .into_iter()
            .map(|chunk| {
                if !chunk.crc_ok() {
                    warn!(
                        "CRC mismatch in {} chunk at offset {}: stored {:08X}, computed {:08X}",
                        chunk.chunk_type,
                        chunk.offset,
                        chunk.stored_crc,
                        chunk.computed_crc()
                    );
                }
                Chunk::from(chunk)
            })
            .collect();
        Ok(Self { chunks })
    }

    /// Serialize: signature then every chunk with a freshly computed CRC
    pub fn build(&self) -> PngResult<Vec<u8>> {
        let capacity =
            PNG_SIGNATURE.len() + self.chunks.iter().map(Chunk::encoded_len).sum::<usize>();
        let mut cursor = Cursor::new(Vec::with_capacity(capacity));
        cursor.write_all(&PNG_SIGNATURE)?;

        for chunk in &self.chunks {
            if chunk.data.len() > MAX_CHUNK_LENGTH {
                return Err(PngError::ChunkTooLarge {
                    length: chunk.data.len(),
                    max: MAX_CHUNK_LENGTH,
                });
            }
            ChunkHeader {
                length: chunk.data.len() as u32,
                chunk_type: chunk.chunk_type,
            }
            .write_be(&mut cursor)?;
            cursor.write_all(&chunk.data)?;
            chunk.crc().write_be(&mut cursor)?;
        }

        Ok(cursor.into_inner())
    }

    /// Index of the first IEND chunk
    pub fn iend_index(&self) -> Option<usize> {
        self.chunks
            .iter()
            .position(|c| c.chunk_type == ChunkType::IEND)
    }

    /// Insert chunks immediately before IEND, keeping their order
    pub fn insert_before_iend(&mut self, chunks: impl IntoIterator<Item = Chunk>) -> PngResult<()> {
        let index = self.iend_index().ok_or(PngError::MissingIend)?;
        let tail = self.chunks.split_off(index);
        self.chunks.extend(chunks);
        self.chunks.extend(tail);
        Ok(())
    }

    /// All chunks of a given type, in file order
    pub fn chunks_of_type(&self, chunk_type: ChunkType) -> impl Iterator<Item = &Chunk> {
        self.chunks
            .iter()
            .filter(move |c| c.chunk_type == chunk_type)
    }
}

impl crate::PolaroidFormat for PngFile {
    type Error = PngError;

    fn parse(data: &[u8]) -> Result<Self, PngError> {
        PngFile::parse(data)
    }

    fn build(&self) -> Result<Vec<u8>, PngError> {
        PngFile::build(self)
    }
}
