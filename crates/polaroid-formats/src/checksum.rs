//! CRC-32 checksums
//!
//! PNG chunks checksum the chunk type followed by the chunk data, while the
//! back payload checksums only the uncompressed pixel bytes. Both use the
//! standard IEEE polynomial.

/// CRC-32 over an arbitrary byte sequence
pub fn crc32(data: &[u8]) -> u32 {
    crc32fast::hash(data)
}

/// CRC-32 over `chunk_type || data`, the PNG chunk convention
pub fn chunk_crc(chunk_type: &[u8; 4], data: &[u8]) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(data);
    hasher.finalize()
}
