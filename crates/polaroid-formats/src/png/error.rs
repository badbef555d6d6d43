//! PNG container error types

use thiserror::Error;

/// PNG container error type
#[derive(Debug, Error)]
pub enum PngError {
    /// The buffer does not start with the 8-byte PNG signature
    #[error("invalid PNG signature: expected [89 50 4E 47 0D 0A 1A 0A], got {0:02X?}")]
    InvalidSignature(Vec<u8>),

    /// A chunk header or body runs past the end of the buffer
    #[error("truncated chunk at offset {offset}: need {needed} bytes, {available} available")]
    TruncatedChunk {
        /// Offset of the chunk's length field
        offset: usize,
        /// Bytes required to finish the chunk
        needed: usize,
        /// Bytes left in the buffer
        available: usize,
    },

    /// Chunk type bytes are not ASCII letters
    #[error("invalid chunk type: {0:02X?}")]
    InvalidChunkType([u8; 4]),

    /// Declared chunk length exceeds the configured maximum
    #[error("chunk length {length} exceeds maximum of {max} bytes")]
    ChunkTooLarge {
        /// Declared length
        length: usize,
        /// Configured maximum
        max: usize,
    },

    /// Whole buffer exceeds the configured maximum
    #[error("file size {size} exceeds maximum of {max} bytes")]
    FileTooLarge {
        /// Buffer length
        size: usize,
        /// Configured maximum
        max: usize,
    },

    /// More chunks than the configured maximum
    #[error("more than {0} chunks in file")]
    TooManyChunks(usize),

    /// No terminal IEND chunk to insert before
    #[error("PNG has no IEND chunk")]
    MissingIend,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Binary parsing error
    #[error("binary parsing error: {0}")]
    BinRw(#[from] binrw::Error),
}

/// Result type for PNG container operations
pub type PngResult<T> = Result<T, PngError>;
