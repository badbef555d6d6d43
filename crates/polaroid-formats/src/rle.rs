//! Two-mode run-length codec for back-face pixels
//!
//! The stream is a sequence of packets, each starting with one header byte:
//!
//! - **Run** (`0x80 | (len - 1)`): one value byte follows, repeated `len` times
//! - **Literal** (`len - 1`): `len` raw bytes follow
//!
//! Both lengths span 1..=128. The encoder only emits runs of three or more,
//! so packet boundaries are fully determined by the input.

use thiserror::Error;

/// High bit of a packet header marks a run
pub const RUN_FLAG: u8 = 0x80;

/// Longest run or literal a single packet can carry
pub const MAX_PACKET_LEN: usize = 128;

/// Shortest repetition worth a run packet
pub const MIN_RUN_LEN: usize = 3;

/// RLE decode error type
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RleError {
    /// Run header at the end of input with no value byte
    #[error("run packet at offset {offset} is missing its value byte")]
    MissingRunValue {
        /// Offset of the run header
        offset: usize,
    },

    /// Literal packet declares more bytes than remain
    #[error("literal packet at offset {offset} needs {needed} bytes, {available} available")]
    TruncatedLiteral {
        /// Offset of the literal header
        offset: usize,
        /// Declared literal length
        needed: usize,
        /// Bytes left after the header
        available: usize,
    },

    /// Decoded output length differs from the expected size
    #[error("decoded size mismatch: expected {expected} bytes, got {actual} bytes")]
    SizeMismatch {
        /// Expected size
        expected: usize,
        /// Actual size
        actual: usize,
    },
}

/// Result type for RLE operations
pub type RleResult<T> = Result<T, RleError>;

/// One decoded packet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Packet<'a> {
    /// `value` repeated `len` times
    Run {
        /// Repeated byte
        value: u8,
        /// Repeat count (1..=128)
        len: usize,
    },
    /// Raw bytes copied through
    Literal(&'a [u8]),
}

impl Packet<'_> {
    /// Number of output bytes this packet expands to
    pub fn output_len(&self) -> usize {
        match self {
            Self::Run { len, .. } => *len,
            Self::Literal(bytes) => bytes.len(),
        }
    }
}

/// Iterator over the packets of an encoded stream
#[derive(Debug, Clone)]
pub struct PacketReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> PacketReader<'a> {
    /// Start reading packets from `data`
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Bytes consumed so far
    pub fn position(&self) -> usize {
        self.pos
    }
}

impl<'a> Iterator for PacketReader<'a> {
    type Item = RleResult<Packet<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        let offset = self.pos;
        let header = *self.data.get(offset)?;
        let len = usize::from(header & 0x7F) + 1;
        let body = offset + 1;

        if header & RUN_FLAG != 0 {
            let Some(&value) = self.data.get(body) else {
                self.pos = self.data.len();
                return Some(Err(RleError::MissingRunValue { offset }));
            };
            self.pos = body + 1;
            Some(Ok(Packet::Run { value, len }))
        } else {
            let available = self.data.len() - body;
            if len > available {
                self.pos = self.data.len();
                return Some(Err(RleError::TruncatedLiteral {
                    offset,
                    needed: len,
                    available,
                }));
            }
            self.pos = body + len;
            Some(Ok(Packet::Literal(&self.data[body..body + len])))
        }
    }
}

/// Length of the run of `data[start]` beginning at `start`, capped at 128
fn run_length(data: &[u8], start: usize) -> usize {
    let value = data[start];
    data[start..]
        .iter()
        .take(MAX_PACKET_LEN)
        .take_while(|&&b| b == value)
        .count()
}

/// Encode bytes into run and literal packets
///
/// Greedy and single-pass: a run of three or more is emitted as soon as it
/// starts; otherwise literals accumulate until 128 are collected or a run
/// of three or more begins. Output is byte-for-byte stable.
pub fn encode(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() + data.len() / MAX_PACKET_LEN + 1);
    let mut i = 0;

    while i < data.len() {
        let run = run_length(data, i);
        if run >= MIN_RUN_LEN {
            out.push(RUN_FLAG | (run - 1) as u8);
            out.push(data[i]);
            i += run;
            continue;
        }

        let start = i;
        while i < data.len() && i - start < MAX_PACKET_LEN {
            if run_length(data, i) >= MIN_RUN_LEN {
                break;
            }
            i += 1;
        }
        out.push((i - start - 1) as u8);
        out.extend_from_slice(&data[start..i]);
    }

    out
}

/// Decode packets until `expected_size` bytes are produced
///
/// Trailing bytes after the last needed packet are ignored. Fails if a
/// packet is cut short or the output length is not exactly `expected_size`.
pub fn decode(data: &[u8], expected_size: usize) -> RleResult<Vec<u8>> {
    // A packet expands to at most 64x its encoded size
    let mut out = Vec::with_capacity(expected_size.min(data.len().saturating_mul(64)));

    for packet in PacketReader::new(data) {
        if out.len() >= expected_size {
            break;
        }
        match packet? {
            Packet::Run { value, len } => out.resize(out.len() + len, value),
            Packet::Literal(bytes) => out.extend_from_slice(bytes),
        }
    }

    if out.len() != expected_size {
        return Err(RleError::SizeMismatch {
            expected: expected_size,
            actual: out.len(),
        });
    }
    Ok(out)
}
