//! CLI binary for svg-halftone.
//!
//! Feeds one file through the orchestrator exactly the way a form would:
//! the flags become control values, the input becomes a file selection.

use anyhow::{Context, Result};
use clap::Parser;
use halftone_engine::HalftoneEngine;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use svg_halftone::pipeline::publish;
use svg_halftone::{
    ConversionObserver, CycleOutcome, FormControls, HalftoneRenderer, Orchestrator,
    OrchestratorConfig, PathSource, Presentation, Publication, SkipReason, Trigger,
};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── Busy indicator using indicatif ───────────────────────────────────────────

/// Shows a spinner while a cycle is busy and a one-line verdict afterwards.
struct SpinnerObserver {
    bar: ProgressBar,
    started: Instant,
}

impl SpinnerObserver {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        bar.set_prefix("Halftone");
        Arc::new(Self {
            bar,
            started: Instant::now(),
        })
    }

    fn elapsed(&self) -> String {
        dim(&format!("{:.1}s", self.started.elapsed().as_secs_f64()))
    }
}

impl ConversionObserver for SpinnerObserver {
    fn on_file_selected(&self, name: &str) {
        self.bar.set_message(name.to_string());
    }

    fn on_busy(&self, _sequence: u64) {
        self.bar.enable_steady_tick(Duration::from_millis(80));
    }

    fn on_published(&self, _sequence: u64, publication: &Publication) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} {}  {}  {}",
            green("✔"),
            bold(&publication.download.file_name),
            dim(&format!("{} bytes", publication.preview.len())),
            self.elapsed()
        );
    }

    fn on_failed(&self, _sequence: u64, _placeholder: &str, reason: &str) {
        self.bar.finish_and_clear();
        eprintln!("{} {}  {}", red("✘"), red(reason), self.elapsed());
    }

    fn on_skipped(&self, _reason: &SkipReason) {
        self.bar.finish_and_clear();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Halftone to stdout (standalone SVG)
  halftone portrait.jpg > portrait.svg

  # Write atomically to a file, hex dots on a hex grid
  halftone portrait.jpg --shape hex --grid hex -o portrait.svg

  # Keep the light background (black dots on white)
  halftone logo.png --light-background --spacing 1.5

  # Plotter-friendly output with cutting paths and a reproducible poisson grid
  halftone photo.png --grid poisson --seed 7 --cut-paths -o photo.svg

  # Print the download link instead of the document
  halftone photo.png --data-uri

SHAPES / GRIDS:
  Shapes: circle, hex, diamond.  Grids: rect, hex, diamond, poisson.
  An unknown name is completed from the other one (shape hex → grid hex,
  grid poisson → shape circle). Both unknown means circle on rect.

ENVIRONMENT:
  Every flag can also be set through its HALFTONE_* variable.
  RUST_LOG overrides the log filter chosen by -v / -q.
"#;

/// Convert raster images to halftone SVG drawings.
#[derive(Parser, Debug)]
#[command(
    name = "halftone",
    version,
    about = "Convert raster images to halftone SVG drawings",
    long_about = "Convert a PNG/JPEG image into a halftone SVG: one dot per grid cell, \
sized by the image brightness under it. Output goes to stdout, a file, or a base64 \
data: URI.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Source image file.
    input: PathBuf,

    /// Width of the drawing in millimetres.
    #[arg(long, env = "HALFTONE_OUTPUT_WIDTH", default_value = "100")]
    output_width: String,

    /// Dot spacing in millimetres.
    #[arg(long, env = "HALFTONE_SPACING", default_value = "2")]
    spacing: String,

    /// Dot shape (circle, hex, diamond).
    #[arg(long, env = "HALFTONE_SHAPE", default_value = "circle")]
    shape: String,

    /// Grid layout (rect, hex, diamond, poisson).
    #[arg(long, env = "HALFTONE_GRID", default_value = "rect")]
    grid: String,

    /// Keep the light background: black dots on white.
    #[arg(long, env = "HALFTONE_LIGHT_BACKGROUND")]
    light_background: bool,

    /// Add cutting paths around the dots.
    #[arg(long, env = "HALFTONE_CUT_PATHS")]
    cut_paths: bool,

    /// Write the standalone SVG to this file instead of stdout.
    #[arg(short, long, env = "HALFTONE_OUTPUT")]
    output: Option<PathBuf>,

    /// Print the base64 data: URI download link instead of the document.
    #[arg(long, env = "HALFTONE_DATA_URI", conflicts_with = "json")]
    data_uri: bool,

    /// Output the outcome and presentation as JSON.
    #[arg(long, env = "HALFTONE_JSON")]
    json: bool,

    /// Seed for the poisson grid.
    #[arg(long, env = "HALFTONE_SEED")]
    seed: Option<u64>,

    /// Contrast adjustment applied before sampling.
    #[arg(long, env = "HALFTONE_CONTRAST", allow_negative_numbers = true)]
    contrast: Option<f32>,

    /// Sample one pixel per dot instead of averaging five.
    #[arg(long, env = "HALFTONE_SINGLE_SAMPLE")]
    single_sample: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "HALFTONE_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "HALFTONE_QUIET")]
    quiet: bool,

    /// Disable the spinner.
    #[arg(long, env = "HALFTONE_NO_PROGRESS")]
    no_progress: bool,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    outcome: &'a CycleOutcome,
    presentation: &'a Presentation,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner gives all the feedback a user needs; keep INFO out of it.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build orchestrator ───────────────────────────────────────────────
    let config = build_config(&cli)?;
    let engine = match cli.seed {
        Some(seed) => HalftoneEngine::seeded(seed),
        None => HalftoneEngine::default(),
    };
    let renderer = HalftoneRenderer::new(engine)
        .contrast(cli.contrast)
        .single_sample(cli.single_sample);

    let orchestrator = if show_progress {
        Orchestrator::with_observer(renderer, config, SpinnerObserver::new())
    } else {
        Orchestrator::new(renderer, config)
    };

    // ── Run one cycle ────────────────────────────────────────────────────
    let outcome = orchestrator
        .handle(Trigger::file(PathSource::new(&cli.input)))
        .await;
    let presentation = orchestrator.presentation();

    if cli.json {
        let report = JsonReport {
            outcome: &outcome,
            presentation: &presentation,
        };
        let json = serde_json::to_string_pretty(&report).context("Failed to serialise output")?;
        println!("{json}");
    }

    match &outcome {
        CycleOutcome::Published { .. } => {}
        CycleOutcome::Skipped(reason) => anyhow::bail!("Nothing converted: {reason}"),
        CycleOutcome::Failed { reason, .. } => anyhow::bail!("Conversion failed: {reason}"),
        CycleOutcome::Superseded { sequence } => {
            anyhow::bail!("Cycle {sequence} was superseded before it could publish")
        }
    }
    if cli.json {
        return Ok(());
    }

    let doc = presentation
        .state
        .document()
        .context("Published cycle left no document")?;

    // ── Emit ─────────────────────────────────────────────────────────────
    if let Some(ref output_path) = cli.output {
        publish::write_standalone(doc, output_path)
            .await
            .context("Failed to write drawing")?;
        if !cli.quiet {
            eprintln!("{}  →  {}", green("✔"), bold(&output_path.display().to_string()));
        }
    } else if cli.data_uri {
        let download = presentation
            .download
            .as_ref()
            .context("Published cycle left no download link")?;
        println!("{}", download.href);
    } else {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(publish::standalone_document(doc).as_bytes())
            .context("Failed to write to stdout")?;
        handle.write_all(b"\n").ok();
    }

    Ok(())
}

/// Map CLI args to `OrchestratorConfig`.
fn build_config(cli: &Cli) -> Result<OrchestratorConfig> {
    let controls = FormControls {
        output_width: cli.output_width.clone(),
        spacing: cli.spacing.clone(),
        shape: cli.shape.clone(),
        grid: cli.grid.clone(),
        light_background: cli.light_background,
        cut_paths: cli.cut_paths,
    };

    OrchestratorConfig::builder()
        .controls(controls)
        .build()
        .context("Invalid configuration")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_map_onto_controls() {
        let cli = Cli::parse_from([
            "halftone",
            "in.png",
            "--output-width",
            "80",
            "--spacing",
            "1.5",
            "--shape",
            "hex",
            "--light-background",
        ]);
        let config = build_config(&cli).unwrap();
        assert_eq!(config.controls.output_width, "80");
        assert_eq!(config.controls.spacing, "1.5");
        assert_eq!(config.controls.shape, "hex");
        assert_eq!(config.controls.grid, "rect");
        assert!(config.controls.light_background);
        assert!(!config.controls.cut_paths);
    }

    #[test]
    fn data_uri_conflicts_with_json() {
        assert!(Cli::try_parse_from(["halftone", "in.png", "--data-uri", "--json"]).is_err());
    }
}
