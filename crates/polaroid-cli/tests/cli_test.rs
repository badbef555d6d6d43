//! Integration tests for the encode, decode and inspect commands.
//!
//! These tests write real image files to a temporary directory and run the
//! commands against them, both through the library and the built binary.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use polaroid_cli::{Cli, CommandError, ConfigError, run};
use polaroid_formats::back::BackImage;
use polaroid_formats::raster;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Write a solid RGBA PNG and return its path.
fn write_solid(dir: &Path, name: &str, size: u16, color: [u8; 4]) -> PathBuf {
    let pixels = color.repeat(usize::from(size) * usize::from(size));
    let image = BackImage::rgba8(size, size, pixels).expect("Valid test raster");
    let path = dir.join(name);
    fs::write(&path, raster::encode_png(&image).expect("Encoding should succeed"))
        .expect("Failed to write test image");
    path
}

fn run_args(args: &[&str]) -> Result<String, CommandError> {
    let cli = Cli::try_parse_from(args).expect("Arguments should parse");
    cli.validate().expect("Configuration should be valid");
    let mut out = Vec::new();
    run(&cli, &mut out)?;
    Ok(String::from_utf8(out).expect("Report is UTF-8"))
}

struct Fixture {
    dir: TempDir,
    front: PathBuf,
    back: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temporary directory");
        let front = write_solid(dir.path(), "front.png", 16, [255, 0, 0, 255]);
        let back = write_solid(dir.path(), "back.png", 16, [0, 255, 0, 255]);
        Self { dir, front, back }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn encode(&self, extra: &[&str]) -> PathBuf {
        let card = self.path("card.png");
        let mut args = vec![
            "polaroid",
            "encode",
            self.front.to_str().unwrap(),
            self.back.to_str().unwrap(),
            "-o",
            card.to_str().unwrap(),
        ];
        args.extend_from_slice(extra);
        let report = run_args(&args).expect("Encode should succeed");
        assert_eq!(report, format!("Wrote {}\n", card.display()));
        card
    }
}

#[test]
fn encode_then_decode_recovers_back_and_metadata() {
    let fx = Fixture::new();
    let card = fx.encode(&["--meta", r#"{"a":1,"b":"hi"}"#]);
    let back_out = fx.path("recovered.png");
    let meta_out = fx.path("meta.json");

    let report = run_args(&[
        "polaroid",
        "decode",
        card.to_str().unwrap(),
        "--back-out",
        back_out.to_str().unwrap(),
        "--meta-out",
        meta_out.to_str().unwrap(),
    ])
    .expect("Decode should succeed");

    assert!(report.contains(&format!("Back written to {}", back_out.display())));
    assert!(report.contains("Back version: 2"));
    assert!(report.contains("\"b\": \"hi\""));

    let recovered = raster::decode_rgba(&fs::read(&back_out).unwrap()).unwrap();
    assert_eq!((recovered.width, recovered.height), (16, 16));
    assert!(recovered.pixels.chunks(4).all(|px| px == [0, 255, 0, 255]));

    let meta: serde_json::Value =
        serde_json::from_slice(&fs::read(&meta_out).unwrap()).unwrap();
    assert_eq!(meta, serde_json::json!({"a": 1, "b": "hi"}));
}

#[test]
fn every_compression_flag_decodes() {
    for flags in [&["--raw"][..], &["--deflate"], &["--compression", "rle"]] {
        let fx = Fixture::new();
        let card = fx.encode(flags);
        let back_out = fx.path("out.png");
        let report = run_args(&[
            "polaroid",
            "decode",
            card.to_str().unwrap(),
            "--back-out",
            back_out.to_str().unwrap(),
        ])
        .unwrap();
        assert!(report.contains("Back version: 2"), "{flags:?}");
        assert!(report.contains("Meta: (none)"), "{flags:?}");
    }
}

#[test]
fn decode_plain_png_reports_none() {
    let fx = Fixture::new();
    let back_out = fx.path("never.png");
    let report = run_args(&[
        "polaroid",
        "decode",
        fx.front.to_str().unwrap(),
        "--back-out",
        back_out.to_str().unwrap(),
    ])
    .unwrap();

    assert_eq!(report, "Back version: (none)\nMeta: (none)\n");
    assert!(!back_out.exists());
}

#[test]
fn inspect_lists_private_chunks() {
    let fx = Fixture::new();
    let card = fx.encode(&["--meta", "[1,2,3]"]);

    let report = run_args(&["polaroid", "inspect", card.to_str().unwrap()]).unwrap();
    let lines: Vec<&str> = report.lines().collect();

    assert!(lines[0].ends_with("chunks"));
    assert!(lines.iter().any(|l| l.contains("IHDR") && l.ends_with("ok")));
    assert!(!report.contains("BAD"));
    assert!(report.contains("pOLR: v2 16x16 channels=4 bits=8 rle"));
    assert!(report.contains("pMET: 15 bytes"));
}

#[test]
fn invalid_metadata_is_rejected() {
    let fx = Fixture::new();
    let card = fx.path("card.png");
    let err = run_args(&[
        "polaroid",
        "encode",
        fx.front.to_str().unwrap(),
        fx.back.to_str().unwrap(),
        "-o",
        card.to_str().unwrap(),
        "--meta",
        "{not json",
    ])
    .unwrap_err();

    assert!(matches!(err, CommandError::InvalidMetadata(_)));
    assert!(!card.exists());
}

#[test]
fn size_limit_is_enforced() {
    let fx = Fixture::new();
    let err = run_args(&[
        "polaroid",
        "--max-file-size",
        "16",
        "inspect",
        fx.front.to_str().unwrap(),
    ])
    .unwrap_err();
    assert!(matches!(err, CommandError::FileTooLarge { max: 16, .. }));
}

#[test]
fn validate_rejects_overwriting_input() {
    let fx = Fixture::new();
    let front = fx.front.to_str().unwrap();
    let cli = Cli::try_parse_from([
        "polaroid",
        "encode",
        front,
        fx.back.to_str().unwrap(),
        "-o",
        front,
    ])
    .unwrap();
    assert!(matches!(
        cli.validate(),
        Err(ConfigError::OutputOverwritesInput(_))
    ));
}

#[test]
fn binary_round_trip() {
    let fx = Fixture::new();
    let card = fx.path("card.png");
    let back_out = fx.path("bin-back.png");
    let bin = env!("CARGO_BIN_EXE_polaroid");

    let status = Command::new(bin)
        .args(["encode", "--meta", r#"{"k":"v"}"#, "-o"])
        .arg(&card)
        .arg(&fx.front)
        .arg(&fx.back)
        .status()
        .expect("Failed to spawn binary");
    assert!(status.success());

    let output = Command::new(bin)
        .arg("decode")
        .arg(&card)
        .arg("--back-out")
        .arg(&back_out)
        .output()
        .expect("Failed to spawn binary");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Back version: 2"));
    assert!(stdout.contains("\"k\": \"v\""));
    assert!(back_out.exists());

    let output = Command::new(bin)
        .arg("inspect")
        .arg(fx.path("missing.png"))
        .output()
        .expect("Failed to spawn binary");
    assert!(!output.status.success());
}
