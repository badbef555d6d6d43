//! Subcommand implementations.
//!
//! Each command reads its inputs, calls into `polaroid-formats`, writes its
//! outputs and reports progress on the supplied writer.

use std::fs;
use std::io::Write;
use std::path::Path;

use polaroid_formats::back::{BackHeader, Compression};
use polaroid_formats::png::{self, ChunkType, RawChunk};
use polaroid_formats::polaroid;
use serde_json::Value;
use tracing::{debug, info};

use crate::config::{Cli, Command, DecodeArgs, EncodeArgs, InspectArgs};
use crate::error::CommandError;

/// Run the selected subcommand, reporting on `out`.
///
/// # Errors
///
/// Returns `CommandError` if an input cannot be read, an output cannot be
/// written, or the container rejects the data.
pub fn run<W: Write>(cli: &Cli, out: &mut W) -> Result<(), CommandError> {
    match &cli.command {
        Command::Encode(args) => encode(cli, args, out),
        Command::Decode(args) => decode(cli, args, out),
        Command::Inspect(args) => inspect(cli, args, out),
    }
}

fn encode<W: Write>(cli: &Cli, args: &EncodeArgs, out: &mut W) -> Result<(), CommandError> {
    let front = read_input(&args.front, cli.max_file_size)?;
    let back = read_input(&args.back, cli.max_file_size)?;

    let metadata: Option<Value> = match (&args.meta, &args.meta_file) {
        (Some(text), _) => Some(serde_json::from_str(text)?),
        (None, Some(path)) => Some(serde_json::from_slice(&read_input(
            path,
            cli.max_file_size,
        )?)?),
        (None, None) => None,
    };

    let compression = args.effective_compression();
    debug!(
        "Encoding front={} back={} compression={}",
        args.front.display(),
        args.back.display(),
        compression
    );

    let card = polaroid::compose_images(&front, &back, metadata.as_ref(), compression)?;
    write_output(&args.out, &card)?;

    writeln!(out, "Wrote {}", args.out.display())?;
    Ok(())
}

fn decode<W: Write>(cli: &Cli, args: &DecodeArgs, out: &mut W) -> Result<(), CommandError> {
    let data = read_input(&args.input, cli.max_file_size)?;
    let extracted = polaroid::extract_images(&data, &cli.extract_options())?;

    match (&extracted.back_png, extracted.version) {
        (Some(back_png), Some(version)) => {
            write_output(&args.back_out, back_png)?;
            info!("Recovered v{} back face", version);
            writeln!(out, "Back written to {}", args.back_out.display())?;
            writeln!(out, "Back version: {version}")?;
        }
        _ => writeln!(out, "Back version: (none)")?,
    }

    match &extracted.metadata {
        Some(meta) => {
            let pretty = serde_json::to_string_pretty(meta)?;
            if let Some(path) = &args.meta_out {
                write_output(path, pretty.as_bytes())?;
            }
            writeln!(out, "Meta: {pretty}")?;
        }
        None => writeln!(out, "Meta: (none)")?,
    }

    Ok(())
}

fn inspect<W: Write>(cli: &Cli, args: &InspectArgs, out: &mut W) -> Result<(), CommandError> {
    let data = read_input(&args.input, cli.max_file_size)?;
    let chunks = png::scan(&data, &cli.limits()).map_err(polaroid_formats::PolaroidError::from)?;

    writeln!(out, "{}: {} chunks", args.input.display(), chunks.len())?;
    writeln!(out, "{:>10}  {:<4}  {:>10}  CRC", "OFFSET", "TYPE", "LENGTH")?;
    for chunk in &chunks {
        writeln!(
            out,
            "{:>10}  {:<4}  {:>10}  {}",
            chunk.offset,
            chunk.chunk_type,
            chunk.data.len(),
            if chunk.crc_ok() { "ok" } else { "BAD" }
        )?;
    }

    for chunk in &chunks {
        if chunk.chunk_type == ChunkType::POLR {
            writeln!(out, "pOLR: {}", describe_back(chunk))?;
        } else if chunk.chunk_type == ChunkType::PMET {
            writeln!(out, "pMET: {} bytes", chunk.data.len())?;
        }
    }

    Ok(())
}

/// One-line summary of a `pOLR` chunk body.
fn describe_back(chunk: &RawChunk) -> String {
    if png::has_signature(&chunk.data) {
        return format!("v1 embedded PNG, {} bytes", chunk.data.len());
    }

    match BackHeader::parse(&chunk.data) {
        Ok(header) => {
            let strategy = Compression::from_byte(header.compression)
                .map_or_else(|| format!("unknown({})", header.compression), |c| {
                    c.name().to_string()
                });
            format!(
                "v{} {}x{} channels={} bits={} {} {} -> {} bytes crc32={:08x}",
                header.version,
                header.width,
                header.height,
                header.channels,
                header.bits_per_channel,
                strategy,
                header.compressed_size,
                header.uncompressed_size,
                header.crc32
            )
        }
        Err(err) => format!("unreadable header ({err})"),
    }
}

fn read_input(path: &Path, max: usize) -> Result<Vec<u8>, CommandError> {
    let read_failed = |source| CommandError::ReadFailed {
        path: path.to_path_buf(),
        source,
    };

    let size = fs::metadata(path).map_err(read_failed)?.len();
    if usize::try_from(size).map_or(true, |size| size > max) {
        return Err(CommandError::FileTooLarge {
            path: path.to_path_buf(),
            size,
            max,
        });
    }

    fs::read(path).map_err(read_failed)
}

fn write_output(path: &Path, data: &[u8]) -> Result<(), CommandError> {
    fs::write(path, data).map_err(|source| CommandError::WriteFailed {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Wrote {} bytes to {}", data.len(), path.display());
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use polaroid_formats::back::{self, BackImage};
    use polaroid_formats::png::{Chunk, PngFile};

    fn raw(data: Vec<u8>) -> RawChunk {
        let chunk = Chunk::new(ChunkType::POLR, data);
        RawChunk {
            offset: 33,
            chunk_type: chunk.chunk_type,
            stored_crc: chunk.crc(),
            data: chunk.data,
        }
    }

    #[test]
    fn test_describe_v2_back() {
        let image = BackImage::rgba8(3, 2, vec![7; 24]).unwrap();
        let payload = back::pack(&image, Compression::Raw).unwrap();
        let text = describe_back(&raw(payload));
        assert!(text.starts_with("v2 3x2 channels=4 bits=8 raw 24 -> 24 bytes"));
    }

    #[test]
    fn test_describe_legacy_and_garbage() {
        let legacy = PngFile::new(vec![Chunk::new(ChunkType::IEND, Vec::new())])
            .build()
            .unwrap();
        assert!(describe_back(&raw(legacy)).starts_with("v1 embedded PNG"));
        assert!(describe_back(&raw(vec![2, 4])).starts_with("unreadable header"));
    }

    #[test]
    fn test_describe_unknown_strategy() {
        let image = BackImage::rgba8(1, 1, vec![1, 2, 3, 4]).unwrap();
        let mut payload = back::pack(&image, Compression::Raw).unwrap();
        payload[3] = 9;
        assert!(describe_back(&raw(payload)).contains("unknown(9)"));
    }
}
