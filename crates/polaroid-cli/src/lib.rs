//! Command-line front end for Polaroid PNG files.
//!
//! Three subcommands wrap the `polaroid-formats` library:
//! - `encode`: compose a front and a back image, with optional JSON metadata
//! - `decode`: recover the back face as a PNG and print the metadata
//! - `inspect`: list the chunks of any PNG and describe a `pOLR` payload
//!
//! # Architecture
//!
//! - `config`: clap argument parsing and validation
//! - `commands`: subcommand implementations
//! - `error`: error types
//!
//! # Example
//!
//! ```no_run
//! use polaroid_cli::{Cli, run};
//!
//! fn main() -> anyhow::Result<()> {
//!     tracing_subscriber::fmt::init();
//!
//!     let cli = Cli::from_args();
//!     cli.validate()?;
//!     run(&cli, &mut std::io::stdout())?;
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

pub mod commands;
pub mod config;
pub mod error;

pub use commands::run;
pub use config::{Cli, Command, DecodeArgs, EncodeArgs, InspectArgs};
pub use error::{CommandError, ConfigError};
