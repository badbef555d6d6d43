//! Back payload compression strategies

use std::fmt;
use std::io::Read;
use std::str::FromStr;

use flate2::Compression as Level;
use flate2::read::{ZlibDecoder, ZlibEncoder};

use super::error::{BackError, BackResult};
use crate::rle;

/// Compression strategy applied to the back-face pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Compression {
    /// Pixels stored as-is (tag 0)
    Raw = 0,
    /// Run-length packets (tag 1)
    #[default]
    Rle = 1,
    /// zlib stream at the best ratio (tag 2)
    Deflate = 2,
}

impl Compression {
    /// All strategies, in tag order
    pub const ALL: [Self; 3] = [Self::Raw, Self::Rle, Self::Deflate];

    /// Parse a strategy tag
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(Self::Raw),
            1 => Some(Self::Rle),
            2 => Some(Self::Deflate),
            _ => None,
        }
    }

    /// Get the tag byte
    pub fn as_byte(self) -> u8 {
        self as u8
    }

    /// Lowercase name used on the command line
    pub fn name(self) -> &'static str {
        match self {
            Self::Raw => "raw",
            Self::Rle => "rle",
            Self::Deflate => "deflate",
        }
    }
}

impl TryFrom<u8> for Compression {
    type Error = BackError;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        Self::from_byte(byte).ok_or(BackError::UnsupportedCompression(byte))
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Compression {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "raw" | "none" => Ok(Self::Raw),
            "rle" => Ok(Self::Rle),
            "deflate" | "zlib" => Ok(Self::Deflate),
            other => Err(format!(
                "unknown compression '{other}', expected raw, rle or deflate"
            )),
        }
    }
}

/// Compress pixels with the given strategy
pub fn compress(data: &[u8], compression: Compression) -> BackResult<Vec<u8>> {
    match compression {
        Compression::Raw => Ok(data.to_vec()),
        Compression::Rle => Ok(rle::encode(data)),
        Compression::Deflate => {
            let mut encoder = ZlibEncoder::new(data, Level::best());
            let mut compressed = Vec::new();
            encoder
                .read_to_end(&mut compressed)
                .map_err(BackError::Compression)?;
            Ok(compressed)
        }
    }
}

/// Decompress pixels, producing at most `expected_size + 1` bytes
///
/// The extra byte lets callers detect oversized output without inflating
/// an unbounded stream.
pub fn decompress(
    data: &[u8],
    compression: Compression,
    expected_size: usize,
) -> BackResult<Vec<u8>> {
    match compression {
        Compression::Raw => Ok(data.to_vec()),
        Compression::Rle => Ok(rle::decode(data, expected_size)?),
        Compression::Deflate => {
            let limit = expected_size as u64 + 1;
            let mut decoder = ZlibDecoder::new(data).take(limit);
            let mut decompressed = Vec::with_capacity(expected_size);
            decoder
                .read_to_end(&mut decompressed)
                .map_err(BackError::Decompression)?;
            Ok(decompressed)
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_conversion() {
        for compression in Compression::ALL {
            assert_eq!(Compression::from_byte(compression.as_byte()), Some(compression));
        }
        assert_eq!(Compression::Raw.as_byte(), 0);
        assert_eq!(Compression::Rle.as_byte(), 1);
        assert_eq!(Compression::Deflate.as_byte(), 2);
        assert_eq!(Compression::from_byte(3), None);
        assert!(matches!(
            Compression::try_from(0xFF),
            Err(BackError::UnsupportedCompression(0xFF))
        ));
    }

    #[test]
    fn test_names() {
        for compression in Compression::ALL {
            assert_eq!(compression.to_string().parse::<Compression>(), Ok(compression));
        }
        assert_eq!("ZLIB".parse::<Compression>(), Ok(Compression::Deflate));
        assert!("lz4".parse::<Compression>().is_err());
        assert_eq!(Compression::default(), Compression::Rle);
    }

    #[test]
    fn test_deflate_is_zlib_stream() {
        let data = vec![42u8; 4096];
        let compressed = compress(&data, Compression::Deflate).unwrap();
        // zlib header: deflate method, 32K window
        assert_eq!(compressed[0], 0x78);
        assert!(compressed.len() < 100);
        assert_eq!(
            decompress(&compressed, Compression::Deflate, data.len()).unwrap(),
            data
        );
    }

    #[test]
    fn test_deflate_output_is_capped() {
        let data = vec![0u8; 10_000];
        let compressed = compress(&data, Compression::Deflate).unwrap();
        let out = decompress(&compressed, Compression::Deflate, 100).unwrap();
        assert_eq!(out.len(), 101);
    }

    #[test]
    fn test_deflate_garbage_fails() {
        assert!(matches!(
            decompress(b"not a zlib stream", Compression::Deflate, 16),
            Err(BackError::Decompression(_))
        ));
    }
}
