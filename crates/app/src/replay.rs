//! Drive a renderer through a replay script

use painting::{
    AmbientRenderer, CpuSurface, FrameReport, PainterError, PointerOutcome, XorShift64,
};
use pigment_config::PainterConfig;
use serde::Serialize;
use tracing::{debug, info};

use crate::script::{EventType, ReplayScript, ScriptEvent, Step};

/// Summary of one rendered frame
#[derive(Debug, Clone, Serialize)]
pub struct FrameRecord {
    pub index: usize,
    pub time_ms: f64,
    pub marks: usize,
    pub painted_pixels: usize,
    #[serde(flatten)]
    pub report: FrameReport,
}

/// Build a CPU-backed renderer. A fixed `seed` makes the output reproducible.
pub fn build_renderer(
    config: PainterConfig,
    seed: Option<u64>,
) -> Result<AmbientRenderer<CpuSurface>, PainterError> {
    let rng = match seed {
        Some(seed) => XorShift64::new(seed),
        None => XorShift64::from_entropy(),
    };
    AmbientRenderer::from_config_with_rng(Some(CpuSurface::new(0, 0)), config, Box::new(rng))
}

/// Feed one script event to the renderer
pub fn apply_event(renderer: &mut AmbientRenderer<CpuSurface>, event: &ScriptEvent) {
    match event.event_type {
        EventType::Down => {
            let outcome = renderer.pointer_down(event.sample(), event.kind, &event.target_path());
            if outcome != PointerOutcome::Started {
                debug!("t={}: pointer down {:?}", event.t, outcome);
            }
        }
        EventType::Move => {
            renderer.pointer_move(event.sample());
        }
        EventType::Up => renderer.pointer_up(event.t),
        EventType::Cancel => renderer.pointer_cancel(event.t),
        EventType::Blur => renderer.interrupt(),
        EventType::Unlock => {
            renderer.unlock(event.t);
        }
        EventType::Relock => {
            renderer.relock();
        }
    }
}

/// Play `script` and hand every rendered frame to `sink`
pub fn run<F>(
    renderer: &mut AmbientRenderer<CpuSurface>,
    script: &ReplayScript,
    mut sink: F,
) -> anyhow::Result<Vec<FrameRecord>>
where
    F: FnMut(&FrameRecord, &CpuSurface) -> anyhow::Result<()>,
{
    renderer.resize(script.viewport);
    let mut records = Vec::with_capacity(script.frames.len());

    for step in script.timeline() {
        match step {
            Step::Event(event) => apply_event(renderer, event),
            Step::Frame { index, time } => {
                let report = renderer.render_frame(time);
                if let Some(state) = report.lock_change {
                    info!("t={}: painter {:?}", time, state);
                }

                let Some(surface) = renderer.surface() else {
                    continue;
                };
                let record = FrameRecord {
                    index,
                    time_ms: time,
                    marks: renderer.mark_count(),
                    painted_pixels: surface.painted_pixel_count(),
                    report,
                };
                sink(&record, surface)?;
                records.push(record);
            }
        }
    }

    records.sort_by_key(|r| r.index);
    Ok(records)
}
