//! Command-line configuration.
//!
//! Arguments can also be supplied through environment variables
//! (`POLAROID_COMPRESSION`, `POLAROID_BACK_OUT`, `POLAROID_MAX_FILE_SIZE`).
//!
//! # Example
//!
//! ```
//! use polaroid_cli::{Cli, Command};
//!
//! let cli = Cli::try_parse_from(["polaroid", "decode", "card.png"]).unwrap();
//! assert!(matches!(cli.command, Command::Decode(_)));
//! ```

use clap::{Args, Parser, Subcommand};
use polaroid_formats::back::Compression;
use polaroid_formats::png::ParseLimits;
use polaroid_formats::polaroid::{DuplicatePolicy, ExtractOptions};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Polaroid PNG command-line tool.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "polaroid",
    about = "Hide a back face and metadata inside an ordinary PNG",
    version
)]
pub struct Cli {
    /// Refuse input files larger than this many bytes
    #[arg(
        long,
        global = true,
        env = "POLAROID_MAX_FILE_SIZE",
        default_value_t = polaroid_formats::png::DEFAULT_MAX_FILE_SIZE
    )]
    pub max_file_size: usize,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Compose a Polaroid PNG from a front and a back image
    Encode(EncodeArgs),
    /// Recover the back face and metadata from a Polaroid PNG
    Decode(DecodeArgs),
    /// List the chunks of a PNG and describe any back payload
    Inspect(InspectArgs),
}

/// Arguments for `encode`.
#[derive(Debug, Clone, Args)]
pub struct EncodeArgs {
    /// Front image (shown by every viewer)
    pub front: PathBuf,

    /// Back image (hidden)
    pub back: PathBuf,

    /// Output PNG path
    #[arg(short, long)]
    pub out: PathBuf,

    /// Metadata as a JSON string
    #[arg(long, conflicts_with = "meta_file")]
    pub meta: Option<String>,

    /// Metadata read from a JSON file
    #[arg(long)]
    pub meta_file: Option<PathBuf>,

    /// Back-face compression: raw, rle or deflate
    #[arg(long, env = "POLAROID_COMPRESSION", default_value = "rle")]
    pub compression: Compression,

    /// Shortcut for `--compression raw`
    #[arg(long, conflicts_with = "deflate")]
    pub raw: bool,

    /// Shortcut for `--compression deflate`
    #[arg(long)]
    pub deflate: bool,
}

impl EncodeArgs {
    /// Strategy after applying the shortcut flags.
    #[must_use]
    pub fn effective_compression(&self) -> Compression {
        if self.deflate {
            Compression::Deflate
        } else if self.raw {
            Compression::Raw
        } else {
            self.compression
        }
    }
}

/// Arguments for `decode`.
#[derive(Debug, Clone, Args)]
pub struct DecodeArgs {
    /// Polaroid PNG to read
    pub input: PathBuf,

    /// Where to write the recovered back face
    #[arg(long, env = "POLAROID_BACK_OUT", default_value = "back.png")]
    pub back_out: PathBuf,

    /// Also write the metadata as JSON to this path
    #[arg(long)]
    pub meta_out: Option<PathBuf>,

    /// Use the first pOLR/pMET chunk instead of the last when duplicated
    #[arg(long)]
    pub first_wins: bool,
}

/// Arguments for `inspect`.
#[derive(Debug, Clone, Args)]
pub struct InspectArgs {
    /// PNG file to inspect
    pub input: PathBuf,
}

impl Cli {
    /// Parse configuration from command-line arguments.
    #[must_use]
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Parse from an explicit argument list.
    pub fn try_parse_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(args)
    }

    /// Container limits derived from the arguments.
    #[must_use]
    pub fn limits(&self) -> ParseLimits {
        ParseLimits {
            max_file_size: self.max_file_size,
            ..ParseLimits::default()
        }
    }

    /// Extraction options derived from the arguments.
    #[must_use]
    pub fn extract_options(&self) -> ExtractOptions {
        let duplicates = match &self.command {
            Command::Decode(args) if args.first_wins => DuplicatePolicy::FirstWins,
            _ => DuplicatePolicy::LastWins,
        };
        ExtractOptions {
            limits: self.limits(),
            duplicates,
        }
    }

    /// Validate configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - An input file doesn't exist
    /// - An output path would overwrite an input
    /// - The size limit is zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_file_size == 0 {
            return Err(ConfigError::InvalidLimit(
                "max file size must be greater than zero".to_string(),
            ));
        }

        match &self.command {
            Command::Encode(args) => {
                require_file(&args.front)?;
                require_file(&args.back)?;
                if let Some(meta_file) = &args.meta_file {
                    require_file(meta_file)?;
                }
                if args.out == args.front || args.out == args.back {
                    return Err(ConfigError::OutputOverwritesInput(args.out.clone()));
                }
            }
            Command::Decode(args) => {
                require_file(&args.input)?;
                if args.back_out == args.input {
                    return Err(ConfigError::OutputOverwritesInput(args.back_out.clone()));
                }
            }
            Command::Inspect(args) => require_file(&args.input)?,
        }

        Ok(())
    }
}

fn require_file(path: &Path) -> Result<(), ConfigError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(ConfigError::MissingInput(path.to_path_buf()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    fn encode_args(cli: &Cli) -> &EncodeArgs {
        match &cli.command {
            Command::Encode(args) => args,
            other => panic!("expected encode, got {other:?}"),
        }
    }

    #[test]
    fn test_encode_defaults() {
        let cli = Cli::try_parse_from(["polaroid", "encode", "f.png", "b.png", "-o", "out.png"])
            .unwrap();
        let args = encode_args(&cli);
        assert_eq!(args.effective_compression(), Compression::Rle);
        assert_eq!(args.meta, None);
        assert_eq!(cli.max_file_size, polaroid_formats::png::DEFAULT_MAX_FILE_SIZE);
    }

    #[test]
    fn test_compression_flags() {
        let cli = Cli::try_parse_from([
            "polaroid", "encode", "f.png", "b.png", "-o", "o.png", "--raw",
        ])
        .unwrap();
        assert_eq!(encode_args(&cli).effective_compression(), Compression::Raw);

        let cli = Cli::try_parse_from([
            "polaroid",
            "encode",
            "f.png",
            "b.png",
            "-o",
            "o.png",
            "--compression",
            "deflate",
        ])
        .unwrap();
        assert_eq!(encode_args(&cli).effective_compression(), Compression::Deflate);

        assert!(
            Cli::try_parse_from([
                "polaroid", "encode", "f.png", "b.png", "-o", "o.png", "--raw", "--deflate",
            ])
            .is_err()
        );
        assert!(
            Cli::try_parse_from([
                "polaroid",
                "encode",
                "f.png",
                "b.png",
                "-o",
                "o.png",
                "--compression",
                "lz4",
            ])
            .is_err()
        );
    }

    #[test]
    fn test_out_is_required() {
        assert!(Cli::try_parse_from(["polaroid", "encode", "f.png", "b.png"]).is_err());
    }

    #[test]
    fn test_decode_options() {
        let cli = Cli::try_parse_from(["polaroid", "decode", "in.png", "--first-wins"]).unwrap();
        assert_eq!(cli.extract_options().duplicates, DuplicatePolicy::FirstWins);

        let cli = Cli::try_parse_from(["polaroid", "decode", "in.png"]).unwrap();
        assert_eq!(cli.extract_options().duplicates, DuplicatePolicy::LastWins);
        match cli.command {
            Command::Decode(args) => assert_eq!(args.back_out, PathBuf::from("back.png")),
            other => panic!("expected decode, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_missing_input() {
        let cli = Cli::try_parse_from(["polaroid", "inspect", "/nonexistent/card.png"]).unwrap();
        assert!(matches!(cli.validate(), Err(ConfigError::MissingInput(_))));
    }

    #[test]
    fn test_validate_zero_limit() {
        let cli = Cli::try_parse_from([
            "polaroid",
            "--max-file-size",
            "0",
            "inspect",
            "card.png",
        ])
        .unwrap();
        assert!(matches!(cli.validate(), Err(ConfigError::InvalidLimit(_))));
    }
}
