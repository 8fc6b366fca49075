//! Shared fixtures and capability doubles for dialog-anim tests

#![allow(dead_code)]

use dialog_anim::{
    AnimError, AnimResult, EdgePath, GraphLayout, GraphLayoutResult, NodePlacement, Point,
    RasterCanvas, Scene,
};
use dialog_flow::{
    Classification, ClassifiedEntry, DiscardReason, EventStreamBuilder, EventStreams,
    InteractionGraph, ScanStats,
};
use dialog_types::{DialogConfig, Message, SpeakerRole, Speech};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub fn config() -> DialogConfig {
    DialogConfig::default()
}

/// Streams for `messages` and `speeches`, with the session ending at `tfinal`.
pub fn streams(
    messages: &[(&str, &str, f64)],
    speeches: &[(SpeakerRole, &str, f64)],
    tfinal: f64,
) -> EventStreams {
    let mut entries: Vec<ClassifiedEntry> = messages
        .iter()
        .map(|&(sender, receiver, t)| ClassifiedEntry {
            t,
            line: 1,
            classification: Classification::Message(Message {
                sender: sender.into(),
                receiver: receiver.into(),
                t,
            }),
        })
        .chain(speeches.iter().map(|&(role, text, t)| ClassifiedEntry {
            t,
            line: 1,
            classification: Classification::Speech(Speech::new(role, text, t)),
        }))
        .collect();
    entries.sort_by(|a, b| a.t.total_cmp(&b.t));
    entries.push(ClassifiedEntry {
        t: tfinal,
        line: 1,
        classification: Classification::Discard(DiscardReason::Unaddressed),
    });

    let config = config();
    let mut builder = EventStreamBuilder::new(&config);
    for entry in entries {
        builder.push(entry).unwrap();
    }
    builder.finish(ScanStats::default())
}

/// A short exchange between three agents with two captions.
pub fn sample_streams() -> EventStreams {
    streams(
        &[
            ("PARSER", "IM", 100.0),
            ("IM", "DAGENT", 103.0),
            ("DAGENT", "IM", 103.5),
            ("IM", "DAGENT", 110.0),
        ],
        &[
            (SpeakerRole::User, "hello", 101.0),
            (SpeakerRole::Computer, "hi there", 104.0),
        ],
        120.0,
    )
}

/// Layout double returning a fixed result.
pub struct FixedLayout(pub GraphLayoutResult);

impl GraphLayout for FixedLayout {
    fn layout(&self, _graph: &InteractionGraph) -> AnimResult<GraphLayoutResult> {
        Ok(self.0.clone())
    }
}

/// Two-node layout with edges in both directions.
pub fn fixed_layout() -> GraphLayoutResult {
    let node = |id: &str, x: f64| NodePlacement {
        id: id.into(),
        center: Point::new(x, 50.0),
        width: 60.0,
        height: 30.0,
    };
    let edge = |from: &str, to: &str, x1: f64, x2: f64| EdgePath {
        sender: from.into(),
        receiver: to.into(),
        points: vec![Point::new(x1, 50.0), Point::new(x2, 50.0)],
    };
    GraphLayoutResult {
        width: 300.0,
        height: 100.0,
        nodes: vec![node("IM", 50.0), node("DAGENT", 250.0)],
        edges: vec![edge("IM", "DAGENT", 80.0, 220.0), edge("DAGENT", "IM", 220.0, 80.0)],
    }
}

/// Canvas double that records scenes and writes a marker file.
#[derive(Default)]
pub struct RecordingCanvas {
    pub rendered: Mutex<Vec<(PathBuf, Scene)>>,
    /// Fail when asked to write a file whose name contains this
    pub fail_on: Option<String>,
}

impl RecordingCanvas {
    pub fn failing_on(name: &str) -> Self {
        Self {
            fail_on: Some(name.to_string()),
            ..Default::default()
        }
    }

    pub fn count(&self) -> usize {
        self.rendered.lock().unwrap().len()
    }
}

impl RasterCanvas for RecordingCanvas {
    fn render(&self, scene: &Scene, path: &Path) -> AnimResult<()> {
        fs::write(path, b"frame")?;
        if let Some(pattern) = &self.fail_on {
            let name = path.file_name().unwrap().to_string_lossy();
            if name.contains(pattern.as_str()) {
                return Err(AnimError::raster(format!("refusing {name}")));
            }
        }
        self.rendered
            .lock()
            .unwrap()
            .push((path.to_path_buf(), scene.clone()));
        Ok(())
    }
}
