//! Crate-level error type

use thiserror::Error;

use crate::back::BackError;
use crate::metadata::MetadataError;
use crate::png::PngError;
use crate::raster::RasterError;
use crate::rle::RleError;

/// Coarse classification of every failure the crate can report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad signature, unknown version or malformed framing
    Format,
    /// Checksum, length or packet-level corruption inside a payload
    CorruptPayload,
    /// Unknown compression strategy tag
    UnsupportedStrategy,
    /// The image codec or JSON serializer rejected its input
    Codec,
    /// Caller-supplied data that cannot be composed
    InvalidInput,
}

/// Error type for compose and extract
#[derive(Debug, Error)]
pub enum PolaroidError {
    /// PNG container error
    #[error("PNG container: {0}")]
    Png(#[from] PngError),

    /// Back payload error
    #[error("back payload: {0}")]
    Back(#[from] BackError),

    /// Metadata payload error
    #[error("metadata: {0}")]
    Metadata(#[from] MetadataError),

    /// Image codec error
    #[error("raster: {0}")]
    Raster(#[from] RasterError),
}

/// Result type for compose and extract
pub type PolaroidResult<T> = Result<T, PolaroidError>;

impl PolaroidError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Png(_) => ErrorKind::Format,
            Self::Back(err) => back_kind(err),
            Self::Metadata(err) => match err {
                MetadataError::LengthMismatch { .. } => ErrorKind::CorruptPayload,
                MetadataError::Json(_) => ErrorKind::Codec,
                MetadataError::TruncatedHeader(_)
                | MetadataError::UnsupportedFormat(_)
                | MetadataError::TooLarge(_)
                | MetadataError::BinRw(_) => ErrorKind::Format,
            },
            Self::Raster(err) => match err {
                RasterError::Back(err) => back_kind(err),
                RasterError::Image(_)
                | RasterError::DimensionTooLarge { .. }
                | RasterError::UnsupportedLayout { .. } => ErrorKind::Codec,
            },
        }
    }

    /// Whether the input was recognised but its payload is damaged
    pub fn is_corruption(&self) -> bool {
        self.kind() == ErrorKind::CorruptPayload
    }
}

impl From<RleError> for PolaroidError {
    fn from(err: RleError) -> Self {
        Self::Back(BackError::Rle(err))
    }
}

fn back_kind(err: &BackError) -> ErrorKind {
    match err {
        BackError::UnsupportedCompression(_) => ErrorKind::UnsupportedStrategy,
        BackError::TruncatedPayload { .. }
        | BackError::SizeMismatch { .. }
        | BackError::ChecksumMismatch { .. }
        | BackError::Rle(_)
        | BackError::Decompression(_) => ErrorKind::CorruptPayload,
        BackError::TruncatedHeader { .. }
        | BackError::UnsupportedVersion(_)
        | BackError::InvalidGeometry { .. }
        | BackError::PayloadTooLarge { .. }
        | BackError::BinRw(_) => ErrorKind::Format,
        BackError::Compression(_)
        | BackError::PixelSizeMismatch { .. }
        | BackError::UnsupportedLayout { .. } => ErrorKind::InvalidInput,
    }
}
