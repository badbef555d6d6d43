//! Compose and extract Polaroid PNG files
//!
//! Composing injects `pOLR` (and optionally `pMET`) immediately before
//! `IEND`, so the file stays a valid PNG for any reader that skips unknown
//! ancillary chunks. Extraction scans the chunk list and unpacks whichever
//! private chunks it finds; a missing `pOLR` is not an error.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::back::{self, BackImage, BackPayload, Compression};
use crate::error::PolaroidResult;
use crate::metadata;
use crate::png::{Chunk, ChunkType, ParseLimits, PngFile};
use crate::raster;

/// Which chunk to use when a private chunk type appears more than once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// The chunk closest to IEND wins
    #[default]
    LastWins,
    /// The chunk closest to the signature wins
    FirstWins,
}

/// Extraction settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExtractOptions {
    /// Bounds applied to the container parse
    pub limits: ParseLimits,
    /// Selection among duplicate private chunks
    pub duplicates: DuplicatePolicy,
}

/// Builder for Polaroid PNG files
#[derive(Debug, Clone)]
pub struct PolaroidBuilder<'a> {
    front: &'a [u8],
    back: BackImage,
    metadata: Option<Vec<u8>>,
    compression: Compression,
    limits: ParseLimits,
}

impl<'a> PolaroidBuilder<'a> {
    /// Start from an encoded front PNG and the back raster
    pub fn new(front: &'a [u8], back: BackImage) -> Self {
        Self {
            front,
            back,
            metadata: None,
            compression: Compression::default(),
            limits: ParseLimits::default(),
        }
    }

    /// Set the back-face compression strategy
    #[must_use]
    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Attach already serialized metadata
    #[must_use]
    pub fn with_metadata(mut self, serialized: Vec<u8>) -> Self {
        self.metadata = Some(serialized);
        self
    }

    /// Attach metadata serialized as JSON
    pub fn with_json_metadata<T: Serialize + ?Sized>(mut self, value: &T) -> PolaroidResult<Self> {
        self.metadata = Some(metadata::to_json(value)?);
        Ok(self)
    }

    /// Set the limits used when parsing the front PNG
    #[must_use]
    pub fn with_limits(mut self, limits: ParseLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Produce the Polaroid PNG bytes
    pub fn build(&self) -> PolaroidResult<Vec<u8>> {
        self.back.validate()?;
        let mut png = PngFile::parse_with_limits(self.front, &self.limits)?;

        let mut private = vec![Chunk::new(
            ChunkType::POLR,
            back::pack(&self.back, self.compression)?,
        )];
        if let Some(serialized) = &self.metadata {
            private.push(Chunk::new(ChunkType::PMET, metadata::pack(serialized)?));
        }

        debug!(
            "Injecting {} private chunks before IEND of {}-chunk front",
            private.len(),
            png.chunks.len()
        );
        png.insert_before_iend(private)?;
        Ok(png.build()?)
    }
}

/// Compose a Polaroid PNG from an encoded front PNG and a back raster
pub fn compose(
    front: &[u8],
    back: &BackImage,
    metadata: Option<&[u8]>,
    compression: Compression,
) -> PolaroidResult<Vec<u8>> {
    let mut builder = PolaroidBuilder::new(front, back.clone()).with_compression(compression);
    if let Some(serialized) = metadata {
        builder = builder.with_metadata(serialized.to_vec());
    }
    builder.build()
}

/// What a Polaroid PNG carried
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Extracted {
    /// Back payload, `None` when the file has no `pOLR` chunk
    pub back: Option<BackPayload>,
    /// Serialized metadata, `None` when the file has no `pMET` chunk
    pub metadata: Option<Vec<u8>>,
}

impl Extracted {
    /// Deserialize the metadata as JSON
    pub fn metadata_json<T: DeserializeOwned>(&self) -> PolaroidResult<Option<T>> {
        self.metadata
            .as_deref()
            .map(metadata::from_json)
            .transpose()
            .map_err(Into::into)
    }
}

/// Extract with default options
pub fn extract(data: &[u8]) -> PolaroidResult<Extracted> {
    extract_with(data, &ExtractOptions::default())
}

/// Extract the back payload and metadata from a PNG
pub fn extract_with(data: &[u8], options: &ExtractOptions) -> PolaroidResult<Extracted> {
    let png = PngFile::parse_with_limits(data, &options.limits)?;

    let back = select(&png, ChunkType::POLR, options.duplicates)
        .map(|chunk| back::unpack(&chunk.data))
        .transpose()?;
    let metadata = select(&png, ChunkType::PMET, options.duplicates)
        .map(|chunk| metadata::unpack(&chunk.data))
        .transpose()?;

    debug!(
        "Extracted back={:?} metadata={:?}",
        back.as_ref().map(BackPayload::version),
        metadata.as_ref().map(Vec::len)
    );
    Ok(Extracted { back, metadata })
}

fn select(png: &PngFile, chunk_type: ChunkType, policy: DuplicatePolicy) -> Option<&Chunk> {
    let count = png.chunks_of_type(chunk_type).count();
    if count > 1 {
        warn!(
            "Found {} {} chunks, using the {} one",
            count,
            chunk_type,
            match policy {
                DuplicatePolicy::LastWins => "last",
                DuplicatePolicy::FirstWins => "first",
            }
        );
    }
    match policy {
        DuplicatePolicy::LastWins => png.chunks_of_type(chunk_type).last(),
        DuplicatePolicy::FirstWins => png.chunks_of_type(chunk_type).next(),
    }
}

/// Compose from encoded image files (any format the codec reads)
///
/// The front is re-encoded as RGBA PNG; the back is stored as raw RGBA.
pub fn compose_images<T: Serialize + ?Sized>(
    front_file: &[u8],
    back_file: &[u8],
    metadata: Option<&T>,
    compression: Compression,
) -> PolaroidResult<Vec<u8>> {
    let front = raster::normalize_png(front_file)?;
    let back = raster::decode_rgba(back_file)?;

    let mut builder = PolaroidBuilder::new(&front, back).with_compression(compression);
    if let Some(value) = metadata {
        builder = builder.with_json_metadata(value)?;
    }
    let out = builder.build()?;
    info!(
        "Composed {} byte Polaroid PNG using {} compression",
        out.len(),
        compression
    );
    Ok(out)
}

/// Back face and metadata recovered as ready-to-save files
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedImages {
    /// Payload generation, `None` when no back face is present
    pub version: Option<u8>,
    /// Back face as a PNG file (verbatim for legacy payloads)
    pub back_png: Option<Vec<u8>>,
    /// Metadata parsed as JSON
    pub metadata: Option<serde_json::Value>,
}

/// Extract and re-encode the back face as a PNG file
pub fn extract_images(data: &[u8], options: &ExtractOptions) -> PolaroidResult<ExtractedImages> {
    let extracted = extract_with(data, options)?;
    let metadata = extracted.metadata_json()?;

    let (version, back_png) = match extracted.back {
        None => (None, None),
        Some(BackPayload::Legacy(png)) => (Some(back::LEGACY_VERSION), Some(png)),
        Some(BackPayload::Pixels { image, .. }) => {
            (Some(back::BACK_VERSION), Some(raster::encode_png(&image)?))
        }
    };

    Ok(ExtractedImages {
        version,
        back_png,
        metadata,
    })
}
