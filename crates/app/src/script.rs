//! Replay script format
//!
//! ```json
//! {
//!   "viewport": { "width": 640, "height": 360, "scale": 2.0 },
//!   "events": [
//!     { "t": 0,  "type": "down", "x": 100, "y": 100, "pressure": 0.5, "kind": "pen" },
//!     { "t": 16, "type": "move", "x": 140, "y": 104 },
//!     { "t": 32, "type": "up" }
//!   ],
//!   "frames": [0, 500, 1000]
//! }
//! ```

use std::collections::BTreeMap;

use painting::{ElementInfo, PointerKind, PointerSample, TargetPath};
use pigment_config::DisplayConfig;
use serde::Deserialize;

/// A recorded session: viewport, input events and the frame times to render
#[derive(Debug, Clone, Deserialize)]
pub struct ReplayScript {
    #[serde(default)]
    pub viewport: DisplayConfig,
    #[serde(default)]
    pub events: Vec<ScriptEvent>,
    /// Frame times in milliseconds
    pub frames: Vec<f64>,
}

impl ReplayScript {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Events and frames merged in time order. Events at the same time as a
    /// frame are applied before it is drawn.
    pub fn timeline(&self) -> Vec<Step<'_>> {
        let mut events: Vec<&ScriptEvent> = self.events.iter().collect();
        events.sort_by(|a, b| a.t.total_cmp(&b.t));
        let mut frames: Vec<(usize, f64)> = self.frames.iter().copied().enumerate().collect();
        frames.sort_by(|a, b| a.1.total_cmp(&b.1));

        let mut steps = Vec::with_capacity(events.len() + frames.len());
        let mut pending = events.into_iter().peekable();
        for (index, time) in frames {
            while let Some(event) = pending.next_if(|e| e.t <= time) {
                steps.push(Step::Event(event));
            }
            steps.push(Step::Frame { index, time });
        }
        steps.extend(pending.map(Step::Event));
        steps
    }
}

/// One step of a replay
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step<'a> {
    Event(&'a ScriptEvent),
    /// Render the `index`-th requested frame at `time`
    Frame { index: usize, time: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Down,
    Move,
    Up,
    Cancel,
    /// Window lost focus
    Blur,
    Unlock,
    Relock,
}

/// One recorded input event
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScriptEvent {
    /// Timestamp in milliseconds
    pub t: f64,
    #[serde(rename = "type")]
    pub event_type: EventType,
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    /// 0 means "no pressure reported"
    #[serde(default)]
    pub pressure: f32,
    #[serde(default)]
    pub kind: PointerKind,
    /// Element under the pointer, innermost first
    #[serde(default)]
    pub target: Vec<ScriptElement>,
}

impl ScriptEvent {
    pub fn sample(&self) -> PointerSample {
        PointerSample::new(self.x, self.y, self.pressure, self.t)
    }

    pub fn target_path(&self) -> TargetPath {
        TargetPath::new(self.target.iter().map(ScriptElement::to_info).collect())
    }
}

/// Minimal description of a DOM element for exclusion checks
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScriptElement {
    pub tag: String,
    #[serde(default)]
    pub id: Option<String>,
    /// Space separated, as in the `class` attribute
    #[serde(default)]
    pub class: String,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl ScriptElement {
    fn to_info(&self) -> ElementInfo {
        let mut info = ElementInfo::new(self.tag.as_str()).with_class_list(&self.class);
        if let Some(id) = &self.id {
            info = info.with_id(id.as_str());
        }
        for (name, value) in &self.attributes {
            info = info.with_attribute(name.as_str(), value.as_str());
        }
        info
    }
}
