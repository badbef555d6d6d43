//! Fixtures and assertions shared by the unit tests

use crate::PolaroidFormat;
use std::fmt::Debug;
use std::io::Write;

/// Build `value`, parse it back, and require an equal value and canonical bytes
pub fn assert_round_trip<T>(value: &T)
where
    T: PolaroidFormat + PartialEq + Debug,
    T::Error: Debug,
{
    let bytes = value.build().expect("Build should succeed");
    let parsed = T::parse(&bytes).expect("Built bytes should parse");
    assert_eq!(&parsed, value, "value changed across build/parse");
    assert!(
        T::is_canonical(&bytes).expect("Built bytes should parse"),
        "rebuilding {value:?} changed its bytes"
    );
}

/// Require existing bytes to parse and rebuild identically
pub fn assert_canonical<T>(data: &[u8])
where
    T: PolaroidFormat,
    T::Error: Debug,
{
    assert!(
        T::is_canonical(data).expect("Input should parse"),
        "rebuild differs from the {} input bytes",
        data.len()
    );
}

/// Hand-assembled 1x1 opaque red RGBA PNG with valid CRCs
pub fn minimal_png() -> Vec<u8> {
    fn push_chunk(out: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
        out.extend_from_slice(&(data.len() as u32).to_be_bytes());
        out.extend_from_slice(chunk_type);
        out.extend_from_slice(data);
        let mut hasher = crc32fast::Hasher::new();
        hasher.update(chunk_type);
        hasher.update(data);
        out.extend_from_slice(&hasher.finalize().to_be_bytes());
    }

    let mut ihdr = Vec::new();
    ihdr.extend_from_slice(&1u32.to_be_bytes());
    ihdr.extend_from_slice(&1u32.to_be_bytes());
    // bit depth 8, color type 6 (RGBA), compression, filter, interlace
    ihdr.extend_from_slice(&[8, 6, 0, 0, 0]);

    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
    encoder
        .write_all(&[0, 255, 0, 0, 255])
        .expect("Compressing scanline should succeed");
    let idat = encoder.finish().expect("Compressing scanline should succeed");

    let mut out = crate::png::PNG_SIGNATURE.to_vec();
    push_chunk(&mut out, b"IHDR", &ihdr);
    push_chunk(&mut out, b"IDAT", &idat);
    push_chunk(&mut out, b"IEND", &[]);
    out
}
