//! Pigment - replay recorded gestures through the ambient painter

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;
mod replay;
mod script;

use script::ReplayScript;

#[derive(Parser, Debug)]
#[command(name = "pigment", version)]
struct Cli {
    /// Replay script JSON (viewport, events, frame times).
    script: PathBuf,

    /// Painter config JSON. Falls back to $PIGMENT_CONFIG, then defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for the PNG frames.
    #[arg(long, default_value = "frames")]
    out: PathBuf,

    /// Seed for paint jitter. Random when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Also write a JSON summary of every frame.
    #[arg(long)]
    report: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let json = std::fs::read_to_string(&cli.script)
        .with_context(|| format!("read script '{}'", cli.script.display()))?;
    let script = ReplayScript::from_json(&json)
        .with_context(|| format!("parse script '{}'", cli.script.display()))?;
    let painter_config = config::load_painter_config(cli.config.as_deref())?;

    info!(
        "Replaying {} events into {} frames at {}x{} @ {}x",
        script.events.len(),
        script.frames.len(),
        script.viewport.width,
        script.viewport.height,
        script.viewport.clamped_scale()
    );

    std::fs::create_dir_all(&cli.out)
        .with_context(|| format!("create output dir '{}'", cli.out.display()))?;

    let mut renderer = replay::build_renderer(painter_config, cli.seed)?;
    let records = replay::run(&mut renderer, &script, |record, surface| {
        let path = frame_path(&cli.out, record.index);
        image::save_buffer_with_format(
            &path,
            &surface.to_rgba8(),
            surface.width,
            surface.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .with_context(|| format!("write png '{}'", path.display()))?;
        info!(
            "frame {} @ {}ms: {} marks -> {}",
            record.index,
            record.time_ms,
            record.marks,
            path.display()
        );
        Ok(())
    })?;

    if let Some(report) = &cli.report {
        let file = std::fs::File::create(report)
            .with_context(|| format!("create report '{}'", report.display()))?;
        serde_json::to_writer_pretty(file, &records)
            .with_context(|| format!("write report '{}'", report.display()))?;
    }

    eprintln!("wrote {} frames to {}", records.len(), cli.out.display());
    Ok(())
}

fn frame_path(dir: &Path, index: usize) -> PathBuf {
    dir.join(format!("frame_{:04}.png", index))
}
