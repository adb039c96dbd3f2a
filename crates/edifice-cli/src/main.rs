/// Command-line front end for the edifice analyses.
///
/// Reads an elevation grid (serialised `ElevationGrid` JSON or a single-band
/// GeoTIFF), runs the volume or terrain workflow and prints the results.
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::ops::Range;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::de::DeserializeOwned;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::tags::Tag;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use edifice_core::fields::FIELD_CATALOG;
use edifice_core::synthetic::SyntheticCone;
use edifice_core::{
    analyze_all_models, analyze_volume, BaseShape, CalderaModel, ElevationGrid, FieldKind,
    FieldStats, TerrainParams, TerrainSuite, VolumeParams,
};

// ── Constants ────────────────────────────────────────────────────────────────

/// TIFF tag carrying the GDAL no-data value as ASCII.
const GDAL_NODATA_TAG: u16 = 42113;

// ── CLI ──────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "edifice", about = "Volcanic edifice morphometry from elevation grids")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Args, Debug)]
struct GridArgs {
    /// Elevation grid: `.tif`/`.tiff` GeoTIFF, anything else is read as JSON.
    input: PathBuf,

    /// Ground distance per cell in metres (GeoTIFF input; overrides JSON).
    #[arg(long)]
    pixel_size: Option<f64>,

    /// Elevation value to treat as no-data. GeoTIFF inputs fall back to
    /// their GDAL no-data tag.
    #[arg(long, allow_hyphen_values = true)]
    nodata: Option<f32>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Estimate edifice, caldera and effective volume.
    Volume {
        #[command(flatten)]
        grid: GridArgs,

        /// JSON file with `VolumeParams`; missing keys take defaults.
        #[arg(long)]
        params: Option<PathBuf>,

        #[arg(long, value_enum)]
        base_shape: Option<ShapeArg>,

        #[arg(long, value_enum)]
        caldera_model: Option<CalderaArg>,

        /// Report every volume model instead of one.
        #[arg(long)]
        all_models: bool,

        /// Print the full analysis as JSON instead of the text report.
        #[arg(long)]
        json: bool,
    },
    /// Compute the terrain field battery and its statistics.
    Terrain {
        #[command(flatten)]
        grid: GridArgs,

        /// JSON file with `TerrainParams`; missing keys take defaults.
        #[arg(long)]
        params: Option<PathBuf>,

        /// Write the curvature statistics as JSON to this path.
        #[arg(long)]
        stats_out: Option<PathBuf>,
    },
    /// Statistics of one field, optionally over a rectangular window.
    Stats {
        #[command(flatten)]
        grid: GridArgs,

        /// Field kind, e.g. `SlopeScaled` or `GaussianCurvatureLog`.
        #[arg(long, default_value = "Elevation")]
        field: String,

        /// Row range `start..end` (half-open).
        #[arg(long, value_parser = parse_range)]
        rows: Option<Range<usize>>,

        /// Column range `start..end` (half-open).
        #[arg(long, value_parser = parse_range)]
        cols: Option<Range<usize>>,
    },
    /// Write an analytic cone grid as JSON.
    Synthetic {
        #[arg(long, value_enum, default_value = "gaussian")]
        kind: ConeArg,

        /// Grid edge length in cells.
        #[arg(long, default_value = "100")]
        size: usize,

        #[arg(long, default_value = "30")]
        pixel_size: f64,

        /// Summit elevation in metres.
        #[arg(long, default_value = "1000")]
        peak: f64,

        /// Gaussian length scale, cells.
        #[arg(long, default_value = "30")]
        scale: f64,

        /// Flat-topped cone footprint radius, cells.
        #[arg(long, default_value = "40")]
        base_radius: f64,

        /// Flat-topped cone summit radius, cells.
        #[arg(long, default_value = "10")]
        rim_radius: f64,

        #[arg(short, long)]
        output: PathBuf,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ShapeArg {
    Circular,
    Elliptical,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum CalderaArg {
    Hemispheroid,
    Cylinder,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ConeArg {
    Gaussian,
    FlatTopped,
}

impl From<ShapeArg> for BaseShape {
    fn from(arg: ShapeArg) -> Self {
        match arg {
            ShapeArg::Circular => BaseShape::Circular,
            ShapeArg::Elliptical => BaseShape::Elliptical,
        }
    }
}

impl From<CalderaArg> for CalderaModel {
    fn from(arg: CalderaArg) -> Self {
        match arg {
            CalderaArg::Hemispheroid => CalderaModel::Hemispheroid,
            CalderaArg::Cylinder => CalderaModel::Cylinder,
        }
    }
}

fn parse_range(s: &str) -> std::result::Result<Range<usize>, String> {
    let (a, b) = s.split_once("..").ok_or_else(|| format!("expected start..end, got {s:?}"))?;
    let start = a.trim().parse::<usize>().map_err(|e| format!("bad start {a:?}: {e}"))?;
    let end = b.trim().parse::<usize>().map_err(|e| format!("bad end {b:?}: {e}"))?;
    Ok(start..end)
}

// ── Input ────────────────────────────────────────────────────────────────────

fn is_tiff(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("tif") || e.eq_ignore_ascii_case("tiff"))
        .unwrap_or(false)
}

/// Widen any supported sample type to f32.
fn samples_to_f32(img: DecodingResult) -> Result<Vec<f32>> {
    Ok(match img {
        DecodingResult::F32(v) => v,
        DecodingResult::F64(v) => v.into_iter().map(|x| x as f32).collect(),
        DecodingResult::I16(v) => v.into_iter().map(f32::from).collect(),
        DecodingResult::U16(v) => v.into_iter().map(f32::from).collect(),
        DecodingResult::I32(v) => v.into_iter().map(|x| x as f32).collect(),
        DecodingResult::U8(v) => v.into_iter().map(f32::from).collect(),
        _ => bail!("unsupported TIFF sample type"),
    })
}

/// Read a single-band GeoTIFF. Returns the grid and the GDAL no-data value
/// if the file declares one.
fn read_tiff(path: &Path, pixel_size: f64) -> Result<(ElevationGrid, Option<f32>)> {
    let file = fs::File::open(path).with_context(|| format!("Cannot open {}", path.display()))?;
    let mut decoder = Decoder::new(io::BufReader::new(file))
        .with_context(|| format!("Not a valid TIFF: {}", path.display()))?;
    let (width, height) = decoder.dimensions().context("Cannot read TIFF dimensions")?;

    let nodata = decoder
        .find_tag(Tag::from_u16_exhaustive(GDAL_NODATA_TAG))
        .ok()
        .flatten()
        .and_then(|v| v.into_string().ok())
        .and_then(|s| s.trim_matches(|c: char| c == '\0' || c.is_whitespace()).parse::<f32>().ok());

    let img = decoder
        .read_image()
        .with_context(|| format!("Cannot decode {}", path.display()))?;
    let data = samples_to_f32(img).with_context(|| format!("In {}", path.display()))?;
    if data.len() != width as usize * height as usize {
        bail!(
            "{}: expected a single band of {}x{} samples, got {}",
            path.display(),
            width,
            height,
            data.len()
        );
    }
    let grid = ElevationGrid::new(data, width as usize, height as usize, pixel_size)?;
    Ok((grid, nodata))
}

fn load_grid(args: &GridArgs) -> Result<ElevationGrid> {
    let (mut grid, file_nodata) = if is_tiff(&args.input) {
        let pixel_size = args.pixel_size.unwrap_or(edifice_core::grid::DEFAULT_PIXEL_SIZE);
        read_tiff(&args.input, pixel_size)?
    } else {
        let text = fs::read_to_string(&args.input)
            .with_context(|| format!("Cannot read {}", args.input.display()))?;
        let grid: ElevationGrid = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse grid JSON {}", args.input.display()))?;
        (grid, None)
    };
    if let Some(px) = args.pixel_size {
        grid.pixel_size = px;
    }
    grid.validate().with_context(|| format!("Invalid grid {}", args.input.display()))?;

    if let Some(sentinel) = args.nodata.or(file_nodata) {
        grid = grid.mask_nodata(sentinel);
    }
    let n_nan = grid.data.iter().filter(|v| v.is_nan()).count();
    if n_nan > 0 {
        warn!(n_nan, "grid contains no-data cells");
    }
    info!(
        width = grid.width,
        height = grid.height,
        pixel_size = grid.pixel_size,
        "loaded {}",
        args.input.display()
    );
    Ok(grid)
}

fn load_params<T: DeserializeOwned + Default>(path: Option<&Path>) -> Result<T> {
    match path {
        Some(p) => {
            let text =
                fs::read_to_string(p).with_context(|| format!("Cannot read {}", p.display()))?;
            serde_json::from_str(&text).with_context(|| format!("Failed to parse {}", p.display()))
        }
        None => Ok(T::default()),
    }
}

// ── Commands ─────────────────────────────────────────────────────────────────

fn run_volume(grid: &ElevationGrid, params: &VolumeParams, all_models: bool, json: bool) -> Result<()> {
    let runs = if all_models {
        analyze_all_models(grid, params).context("Volume analysis failed")?
    } else {
        vec![analyze_volume(grid, params).context("Volume analysis failed")?]
    };
    if json {
        println!("{}", serde_json::to_string_pretty(&runs)?);
        return Ok(());
    }
    for run in &runs {
        println!("{}", run.report());
    }
    Ok(())
}

fn run_terrain(grid: &ElevationGrid, params: &TerrainParams, stats_out: Option<&Path>) -> Result<()> {
    let suite = TerrainSuite::compute(grid, params).context("Terrain analysis failed")?;

    for (i, panel) in suite.panels().iter().enumerate() {
        println!("Panel {}", i + 1);
        for (desc, field) in panel {
            let s = FieldStats::of(field);
            println!(
                "  {:<42} [{}] min {:.3} max {:.3} mean {:.3} median {:.3} std {:.3}",
                desc.title, desc.unit, s.min, s.max, s.mean, s.median, s.std
            );
        }
    }

    if let Some(path) = stats_out {
        let stats = suite.curvature_statistics();
        fs::write(path, serde_json::to_string_pretty(&stats)?)
            .with_context(|| format!("Write failed: {}", path.display()))?;
        info!("statistics written to {}", path.display());
    }
    Ok(())
}

fn run_stats(
    grid: &ElevationGrid,
    field: &str,
    rows: Option<Range<usize>>,
    cols: Option<Range<usize>>,
) -> Result<()> {
    let kind: FieldKind = serde_json::from_value(serde_json::Value::String(field.to_string()))
        .with_context(|| format!("Unknown field kind {field:?}"))?;
    let suite = TerrainSuite::compute(grid, &TerrainParams::default())
        .context("Terrain analysis failed")?;
    let Some(data) = suite.field(kind) else {
        bail!("field {kind:?} is not produced by the terrain battery");
    };
    let rows = rows.unwrap_or(0..grid.height);
    let cols = cols.unwrap_or(0..grid.width);
    let stats = FieldStats::of_window(data, rows.clone(), cols.clone())?;

    let title = FIELD_CATALOG
        .iter()
        .find(|d| d.kind == kind)
        .map(|d| d.title.to_string())
        .unwrap_or_else(|| format!("{kind:?}"));
    let mut out = BTreeMap::new();
    out.insert(format!("{title} rows {rows:?} cols {cols:?}"), stats);
    println!("{}", serde_json::to_string_pretty(&out)?);
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn run_synthetic(
    kind: ConeArg,
    size: usize,
    pixel_size: f64,
    peak: f64,
    scale: f64,
    base_radius: f64,
    rim_radius: f64,
    output: &Path,
) -> Result<()> {
    let cone = match kind {
        ConeArg::Gaussian => SyntheticCone::Gaussian { peak, scale },
        ConeArg::FlatTopped => SyntheticCone::FlatTopped { peak, base_radius, rim_radius },
    };
    let grid = cone.build(size, pixel_size)?;
    let json = serde_json::to_string(&grid)?;
    fs::write(output, json).with_context(|| format!("Write failed: {}", output.display()))?;
    info!(size, "synthetic grid written to {}", output.display());
    Ok(())
}

// ── Main ─────────────────────────────────────────────────────────────────────

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_target(false).with_writer(io::stderr).init();
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Command::Volume { grid, params, base_shape, caldera_model, all_models, json } => {
            let mut p: VolumeParams = load_params(params.as_deref())?;
            if let Some(shape) = base_shape {
                p.model.base_shape = shape.into();
            }
            if let Some(model) = caldera_model {
                p.model.caldera_model = model.into();
            }
            let grid = load_grid(&grid)?;
            run_volume(&grid, &p, all_models, json)
        }
        Command::Terrain { grid, params, stats_out } => {
            let p: TerrainParams = load_params(params.as_deref())?;
            let grid = load_grid(&grid)?;
            run_terrain(&grid, &p, stats_out.as_deref())
        }
        Command::Stats { grid, field, rows, cols } => {
            let grid = load_grid(&grid)?;
            run_stats(&grid, &field, rows, cols)
        }
        Command::Synthetic {
            kind,
            size,
            pixel_size,
            peak,
            scale,
            base_radius,
            rim_radius,
            output,
        } => run_synthetic(kind, size, pixel_size, peak, scale, base_radius, rim_radius, &output),
    }
}
