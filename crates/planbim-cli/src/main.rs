use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use planbim_algo::{build_model, BuildOutput};
use planbim_core::building::{BuildingModel, OpeningKind};
use planbim_core::config::{BuildConfig, FaceTracing, RoomSource};
use planbim_core::geom::BBox2;
use planbim_core::model::Document;
use planbim_core::report::BuildReport;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "planbim")]
#[command(about = "Rebuilds walls, rooms and openings from 2D floor-plan DXF drawings.")]
struct Cli {
    /// Default log level `debug` instead of `info` (RUST_LOG still wins).
    #[arg(long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the reconstruction and emit the building model as JSON.
    Build {
        input: PathBuf,
        #[arg(long)]
        out: Option<PathBuf>,
        #[arg(long)]
        report: Option<PathBuf>,
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        snap_grid: Option<f64>,
        #[arg(long)]
        opening_tolerance: Option<f64>,
        #[arg(long, value_enum)]
        room_source: Option<RoomSourceArg>,
        #[arg(long, value_enum)]
        face_tracing: Option<FaceTracingArg>,
    },
    /// Print what the reader found, without reconstructing anything.
    Inspect { input: PathBuf },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RoomSourceArg {
    Collected,
    WallAxes,
    AllLinework,
}

impl From<RoomSourceArg> for RoomSource {
    fn from(value: RoomSourceArg) -> Self {
        match value {
            RoomSourceArg::Collected => RoomSource::CollectedSegments,
            RoomSourceArg::WallAxes => RoomSource::WallAxes,
            RoomSourceArg::AllLinework => RoomSource::AllLinework,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FaceTracingArg {
    SingleUse,
    HalfEdge,
}

impl From<FaceTracingArg> for FaceTracing {
    fn from(value: FaceTracingArg) -> Self {
        match value {
            FaceTracingArg::SingleUse => FaceTracing::SingleUse,
            FaceTracingArg::HalfEdge => FaceTracing::HalfEdge,
        }
    }
}

#[derive(Debug, Serialize)]
struct Summary {
    rooms: usize,
    walls: usize,
    windows: usize,
    doors: usize,
}

impl Summary {
    fn of(model: &BuildingModel) -> Self {
        Self {
            rooms: model.rooms.len(),
            walls: model.walls.len(),
            windows: model.count_openings(OpeningKind::Window),
            doors: model.count_openings(OpeningKind::Door),
        }
    }
}

#[derive(Debug, Serialize)]
struct Envelope<'a> {
    file_name: String,
    processed_at: String,
    summary: Summary,
    model: &'a BuildingModel,
    report: &'a BuildReport,
}

#[derive(Debug, Serialize)]
struct Inspection {
    file_name: String,
    units: planbim_core::model::Units,
    extents: Option<BBox2>,
    primitives: BTreeMap<&'static str, usize>,
    layers: Vec<String>,
    blocks: Vec<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Build {
            input,
            out,
            report,
            config,
            snap_grid,
            opening_tolerance,
            room_source,
            face_tracing,
        } => {
            let mut cfg = load_config(config.as_deref())?;
            if let Some(k) = snap_grid {
                cfg.graph.snap_grid = k;
            }
            if let Some(d) = opening_tolerance {
                cfg.openings.tolerance = d;
            }
            if let Some(s) = room_source {
                cfg.rooms.source = s.into();
            }
            if let Some(t) = face_tracing {
                cfg.rooms.tracing = t.into();
            }
            build(&input, out.as_deref(), report.as_deref(), &cfg)
        }
        Command::Inspect { input } => inspect(&input),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<BuildConfig> {
    let Some(path) = path else {
        return Ok(BuildConfig::default());
    };
    let text = std::fs::read_to_string(path).with_context(|| format!("read config: {path:?}"))?;
    let cfg: BuildConfig =
        serde_json::from_str(&text).with_context(|| format!("parse config: {path:?}"))?;
    Ok(cfg)
}

fn read_document(input: &Path) -> Result<Document> {
    ensure_input_file(input)?;

    let ext = input
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "dxf" => planbim_import_dxf::import_dxf(input),
        "dwg" => bail!("DWG is not read directly; convert it to DXF first."),
        _ => bail!("Unsupported input extension: .{ext}"),
    }
}

fn file_name(input: &Path) -> String {
    input
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("drawing")
        .to_string()
}

fn build(input: &Path, out: Option<&Path>, report: Option<&Path>, cfg: &BuildConfig) -> Result<()> {
    let doc = read_document(input)?;
    let BuildOutput {
        model,
        report: build_report,
    } = build_model(&doc, cfg).with_context(|| format!("build model: {input:?}"))?;

    let summary = Summary::of(&model);
    info!(
        rooms = summary.rooms,
        walls = summary.walls,
        windows = summary.windows,
        doors = summary.doors,
        warnings = build_report.warnings.len(),
        "model built"
    );

    let envelope = Envelope {
        file_name: file_name(input),
        processed_at: chrono::Local::now().format("%Y-%m-%dT%H:%M:%S").to_string(),
        summary,
        model: &model,
        report: &build_report,
    };
    let json = serde_json::to_string_pretty(&envelope).context("serialize model")?;

    if let Some(path) = report {
        let report_json =
            serde_json::to_string_pretty(&build_report).context("serialize report")?;
        write_output(path, &report_json).with_context(|| format!("write report: {path:?}"))?;
    }

    if let Some(path) = out {
        write_output(path, &json).with_context(|| format!("write model: {path:?}"))?;
    } else {
        println!("{json}");
    }

    Ok(())
}

fn inspect(input: &Path) -> Result<()> {
    let doc = read_document(input)?;

    let mut primitives = BTreeMap::new();
    let mut layers = Vec::new();
    let mut blocks = Vec::new();
    for p in &doc.primitives {
        *primitives.entry(p.kind_name()).or_insert(0) += 1;
        if let Some(layer) = p.layer() {
            layers.push(layer.to_string());
        }
    }
    for def in doc.block_definitions() {
        blocks.push(def.name.clone());
    }
    layers.sort();
    layers.dedup();
    blocks.sort();

    let inspection = Inspection {
        file_name: file_name(input),
        units: doc.units,
        extents: doc.extents(),
        primitives,
        layers,
        blocks,
    };
    let json = serde_json::to_string_pretty(&inspection).context("serialize inspection")?;
    println!("{json}");
    Ok(())
}

fn write_output(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).ok();
    }
    std::fs::write(path, contents)?;
    Ok(())
}

fn ensure_input_file(input: &Path) -> Result<()> {
    match std::fs::metadata(input) {
        Ok(meta) => {
            if meta.is_file() {
                Ok(())
            } else {
                bail!("input is not a file: {input:?}");
            }
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
            if let Some(root) = find_workspace_root(&cwd) {
                bail!(
                    "input not found: {input:?} (cwd: {cwd:?}).\nHint: run from the workspace root {root:?} or pass an absolute path."
                );
            }
            bail!("input not found: {input:?} (cwd: {cwd:?}).");
        }
        Err(err) => Err(err).with_context(|| format!("stat input: {input:?}")),
    }
}

fn find_workspace_root(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join("Cargo.lock").is_file())
        .map(|dir| dir.to_path_buf())
}
