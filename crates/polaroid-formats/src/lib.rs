//! Parser and builder for Polaroid PNG files
//!
#![allow(clippy::cast_possible_truncation)] // Intentional for binary format parsing
#![allow(clippy::cast_lossless)] // Sometimes clearer than From
#![allow(clippy::uninlined_format_args)] // Backwards compatibility
#![allow(clippy::doc_markdown)] // PNG chunk names don't need backticks
#![allow(clippy::module_name_repetitions)] // Clear naming is preferred
#![allow(clippy::similar_names)] // Domain-specific naming patterns
#![allow(clippy::redundant_closure_for_method_calls)] // Iterator chains
#![allow(clippy::return_self_not_must_use)] // Builder patterns
#![allow(clippy::use_self)] // Type clarity
//! A Polaroid PNG is an ordinary PNG file that every viewer renders as its
//! front face. Two private ancillary chunks ride along just before `IEND`:
//!
//! - **`pOLR`**: the back face, either raw pixels behind a versioned header
//!   (v2) or a complete embedded PNG file (legacy v1)
//! - **`pMET`**: a length-prefixed JSON blob with caller metadata
//!
//! # Layers
//!
//! - [`checksum`]: CRC-32 as used by PNG chunks and the back payload
//! - [`png`]: signature check plus chunk framing, parse and build
//! - [`rle`]: the two-mode (literal/run) packet codec
//! - [`back`]: `pOLR` payload packing with RAW, RLE and DEFLATE strategies
//! - [`metadata`]: `pMET` payload packing and JSON helpers
//! - [`polaroid`]: compose and extract over whole files
//! - [`raster`]: adapter to the `image` crate for decoding and re-encoding faces
//!
//! # Design Principles
//!
//! - **Symmetric Operations**: every payload has a pack and an unpack side
//! - **Fresh Checksums**: chunk CRCs are always recomputed on build
//! - **Fail Loudly**: corrupted payloads are errors, never truncated or padded
//! - **Round-Trip Guarantee**: unpack(pack(pixels)) == pixels for every strategy
//!
//! # Example
//!
//! ```
//! use polaroid_formats::back::{BackImage, Compression};
//! use polaroid_formats::polaroid::{PolaroidBuilder, extract};
//! use polaroid_formats::raster;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let front = raster::encode_png(&BackImage::rgba8(2, 2, vec![255; 16])?)?;
//! let back = BackImage::rgba8(2, 2, vec![0, 255, 0, 255].repeat(4))?;
//!
//! let card = PolaroidBuilder::new(&front, back.clone())
//!     .with_metadata(br#"{"a":1}"#.to_vec())
//!     .with_compression(Compression::Rle)
//!     .build()?;
//!
//! let extracted = extract(&card)?;
//! assert_eq!(extracted.back.as_ref().and_then(|b| b.image()), Some(&back));
//! assert_eq!(extracted.metadata.as_deref(), Some(&br#"{"a":1}"#[..]));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod back;
pub mod checksum;
mod error;
pub mod metadata;
pub mod png;
pub mod polaroid;
pub mod raster;
pub mod rle;

// Test utilities module
#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
pub(crate) mod test_utils;

pub use error::{ErrorKind, PolaroidError, PolaroidResult};

/// A payload with a byte-exact, symmetric encoding
///
/// Implemented by the container ([`png::PngFile`]) and the metadata payload
/// ([`metadata::MetadataPayload`]), whose encodings carry no slack: a
/// well-formed input rebuilds to the same bytes.
pub trait PolaroidFormat: Sized {
    /// Error raised by [`parse`](Self::parse) and [`build`](Self::build)
    type Error: std::error::Error;

    /// Parse from bytes
    fn parse(data: &[u8]) -> Result<Self, Self::Error>;

    /// Build to bytes
    fn build(&self) -> Result<Vec<u8>, Self::Error>;

    /// Whether `data` rebuilds to exactly the same bytes
    ///
    /// A PNG with a stale chunk CRC parses but is not canonical.
    fn is_canonical(data: &[u8]) -> Result<bool, Self::Error> {
        Ok(Self::parse(data)?.build()? == data)
    }
}
