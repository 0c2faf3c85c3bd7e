//! Shared application-level helpers for the CLI.
//!
//! These functions wire up I/O (load image, JSON config and output, logging)
//! around the validated extraction APIs so the binary and downstream tools
//! behave the same way.

use crate::extract::{column_major_view, descriptor_len, validate_params};
use crate::image::column_major_samples;
use anyhow::{Context, Result};
use hog_core::{compute_hog_with_trace, HogParams};
use image::ImageReader;
use serde::{Deserialize, Serialize};
use std::{fs::File, io::Write, path::Path, path::PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

pub use crate::image::ColorMode;

pub const USAGE: &str = "usage: hog-dump <image|config.json> [--mode gray|rgb] [--rgb] \
                         [--bins N] [--cell W] [--block N] [--signed] [--clip V] [--out PATH]";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ExtractionConfig {
    pub image: PathBuf,
    pub mode: Option<ColorMode>,
    pub nb_bins: Option<usize>,
    pub cell_width: Option<f64>,
    pub block_size: Option<usize>,
    pub unsigned_dirs: Option<bool>,
    pub clip_val: Option<f64>,
    pub output_json: Option<PathBuf>,
    pub log_level: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DescriptorDump {
    pub image: String,
    pub width: u32,
    pub height: u32,
    pub mode: ColorMode,
    pub nb_bins: usize,
    pub cell_width: f64,
    pub block_size: usize,
    pub unsigned_dirs: bool,
    pub clip_val: f64,
    pub gradient_ms: f64,
    pub histogram_ms: f64,
    pub normalize_ms: f64,
    pub features: Vec<f64>,
}

/// Load the configured image, compute its descriptor and write the JSON dump.
pub fn run_extraction(cfg: ExtractionConfig) -> Result<DescriptorDump> {
    let mode = cfg.mode.unwrap_or_default();
    let mut params = HogParams::default();
    apply_params_overrides(&mut params, &cfg);
    validate_params(&params)?;

    let img = ImageReader::open(&cfg.image)
        .with_context(|| format!("opening image {}", cfg.image.display()))?
        .decode()
        .with_context(|| format!("decoding image {}", cfg.image.display()))?;

    let (data, shape) = column_major_samples(&img, mode);
    let len = descriptor_len(&shape, &params)?;
    let view = column_major_view(&data, &shape)?;

    let res = compute_hog_with_trace(&view, &params);
    info!(
        width = img.width(),
        height = img.height(),
        ?mode,
        len,
        "computed descriptor"
    );
    info!(
        gradient_ms = res.gradient_ms,
        histogram_ms = res.histogram_ms,
        normalize_ms = res.normalize_ms,
        "phase timings"
    );

    let json_out = cfg
        .output_json
        .clone()
        .unwrap_or_else(|| cfg.image.with_extension("hog.json"));
    let dump = DescriptorDump {
        image: cfg.image.to_string_lossy().into_owned(),
        width: img.width(),
        height: img.height(),
        mode,
        nb_bins: params.nb_bins,
        cell_width: params.cell_width,
        block_size: params.block_size,
        unsigned_dirs: params.unsigned_dirs,
        clip_val: params.clip_val,
        gradient_ms: res.gradient_ms,
        histogram_ms: res.histogram_ms,
        normalize_ms: res.normalize_ms,
        features: res.features,
    };
    write_json(&json_out, &dump)?;
    info!("saved descriptor to {}", json_out.display());

    Ok(dump)
}

/// Build a config from command-line arguments (program name excluded).
///
/// The first argument is an image, or a JSON config when it ends in `.json`;
/// the remaining flags override whatever the config file set.
pub fn config_from_args(args: impl IntoIterator<Item = String>) -> Result<ExtractionConfig> {
    let mut args = args.into_iter();
    let input: PathBuf = args.next().context(USAGE)?.into();

    let mut cfg = if input.extension().and_then(|s| s.to_str()) == Some("json") {
        load_config(&input)?
    } else {
        ExtractionConfig {
            image: input,
            ..Default::default()
        }
    };

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--mode" => {
                let v = args.next().context("expected gray|rgb after --mode")?;
                cfg.mode = Some(v.parse::<ColorMode>().map_err(anyhow::Error::msg)?);
            }
            "--rgb" => cfg.mode = Some(ColorMode::Rgb),
            "--signed" => cfg.unsigned_dirs = Some(false),
            "--bins" => {
                let v = args.next().context("expected an integer after --bins")?;
                cfg.nb_bins = Some(v.parse().context("could not parse bin count")?);
            }
            "--cell" => {
                let v = args.next().context("expected a number after --cell")?;
                cfg.cell_width = Some(v.parse().context("could not parse cell width")?);
            }
            "--block" => {
                let v = args.next().context("expected an integer after --block")?;
                cfg.block_size = Some(v.parse().context("could not parse block size")?);
            }
            "--clip" => {
                let v = args.next().context("expected a number after --clip")?;
                cfg.clip_val = Some(v.parse().context("could not parse clip value")?);
            }
            "--out" => {
                let v = args.next().context("expected a path after --out")?;
                cfg.output_json = Some(v.into());
            }
            other => anyhow::bail!("unknown argument: {other}\n{USAGE}"),
        }
    }
    Ok(cfg)
}

pub fn apply_params_overrides(params: &mut HogParams, cfg: &ExtractionConfig) {
    if let Some(n) = cfg.nb_bins {
        params.nb_bins = n;
    }
    if let Some(w) = cfg.cell_width {
        params.cell_width = w;
    }
    if let Some(b) = cfg.block_size {
        params.block_size = b;
    }
    if let Some(u) = cfg.unsigned_dirs {
        params.unsigned_dirs = u;
    }
    if let Some(c) = cfg.clip_val {
        params.clip_val = c;
    }
}

fn write_json(path: &Path, value: &impl Serialize) -> Result<()> {
    let mut json_file =
        File::create(path).with_context(|| format!("creating {}", path.display()))?;
    serde_json::to_writer_pretty(&mut json_file, value)?;
    json_file.write_all(b"\n")?;
    Ok(())
}

pub fn load_config(path: &Path) -> Result<ExtractionConfig> {
    let file = File::open(path).with_context(|| format!("opening config {}", path.display()))?;
    let cfg: ExtractionConfig = serde_json::from_reader(file)
        .with_context(|| format!("parsing config {}", path.display()))?;
    Ok(cfg)
}

/// Install a `fmt` subscriber. An explicit `level` wins over `RUST_LOG`;
/// without either, `info` is used.
pub fn init_tracing(level: Option<&str>) -> Result<()> {
    let filter = match level {
        Some(level) => EnvFilter::try_new(level)
            .with_context(|| format!("invalid log level '{level}'"))?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("installing tracing subscriber: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_mode_parses_aliases() {
        assert_eq!("Gray".parse::<ColorMode>(), Ok(ColorMode::Gray));
        assert_eq!("grey".parse::<ColorMode>(), Ok(ColorMode::Gray));
        assert_eq!("COLOUR".parse::<ColorMode>(), Ok(ColorMode::Rgb));
        assert!("cmyk".parse::<ColorMode>().is_err());
    }

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn command_line_mode_goes_through_color_mode_parser() {
        let cfg = config_from_args(args(&["scene.png", "--mode", "Colour", "--bins", "12"])).unwrap();
        assert_eq!(cfg.image, PathBuf::from("scene.png"));
        assert_eq!(cfg.mode, Some(ColorMode::Rgb));
        assert_eq!(cfg.nb_bins, Some(12));

        let cfg = config_from_args(args(&["scene.png", "--mode", "luma", "--signed"])).unwrap();
        assert_eq!(cfg.mode, Some(ColorMode::Gray));
        assert_eq!(cfg.unsigned_dirs, Some(false));

        let err = config_from_args(args(&["scene.png", "--mode", "cmyk"])).unwrap_err();
        assert!(err.to_string().contains("invalid color mode"), "{err}");
    }

    #[test]
    fn command_line_rejects_unknown_and_incomplete_flags() {
        assert!(config_from_args(args(&[])).is_err());
        assert!(config_from_args(args(&["a.png", "--bins"])).is_err());
        assert!(config_from_args(args(&["a.png", "--cell", "wide"])).is_err());
        let err = config_from_args(args(&["a.png", "--fast"])).unwrap_err();
        assert!(err.to_string().contains("unknown argument: --fast"), "{err}");
    }

    #[test]
    fn config_overrides_only_given_fields() {
        let cfg: ExtractionConfig = serde_json::from_str(
            r#"{ "image": "in.png", "mode": "rgb", "cell_width": 6.0, "unsigned_dirs": false }"#,
        )
        .unwrap();
        assert_eq!(cfg.mode, Some(ColorMode::Rgb));

        let mut params = HogParams::default();
        apply_params_overrides(&mut params, &cfg);
        assert_eq!(
            params,
            HogParams::default()
                .with_cell_width(6.0)
                .with_unsigned_dirs(false)
        );
    }

    #[test]
    fn invalid_overrides_fail_before_loading_the_image() {
        let cfg = ExtractionConfig {
            image: PathBuf::from("does/not/exist.png"),
            block_size: Some(0),
            ..Default::default()
        };
        let err = run_extraction(cfg).unwrap_err();
        assert!(err.to_string().contains("block size"), "{err}");
    }
}
