//! Pipeline configuration
//!
//! One [`DialogConfig`] value carries every tunable of the pipeline: the tag
//! vocabulary of the log, the agent blacklist, group map and lane order, and
//! the timeline/animation geometry. Every section falls back to the values the
//! facilitator logs were originally visualized with, so an empty YAML document
//! is a valid configuration.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use strum::{Display, EnumString};

/// Complete configuration for parsing and animating a log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DialogConfig {
    pub agents: AgentConfig,
    pub log: LogConfig,
    pub timeline: TimelineConfig,
    pub animation: AnimationConfig,
    pub output: OutputConfig,
    /// Worker pool size; `None` means one worker per available core
    pub workers: Option<usize>,
}

/// Agent identity rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Names that never appear as sender or receiver
    pub blacklist: Vec<String>,
    /// Many-to-one map from sub-component names to the visible agent
    pub groups: BTreeMap<String, String>,
    /// Visible agents, top lane first. Every agent of an accepted message
    /// must be listed here.
    pub order: Vec<String>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        let blacklist = [
            "CHANNELKB",
            "DUMMY",
            "SPEECH-OUT",
            "GRAPHVIZ",
            "KEYBOARD",
            "CONCEPTUALIZER",
            "INIT",
            "FACILITATOR",
        ];
        let groups = [
            ("TEXTTAGGER", "PARSER"),
            ("DEEPSEMLEX", "PARSER"),
            ("LEXICONMANAGER", "PARSER"),
        ];
        let order = [
            "SPG-AGENT", "PARSER", "IM", "DAGENT", "CSM", "MRA", "DTDA", "TRA",
        ];
        Self {
            blacklist: blacklist.iter().map(|s| s.to_string()).collect(),
            groups: groups
                .iter()
                .map(|(from, to)| (from.to_string(), to.to_string()))
                .collect(),
            order: order.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl AgentConfig {
    /// Canonical name for `name` according to the group map.
    pub fn canonical<'a>(&'a self, name: &'a str) -> &'a str {
        self.groups.get(name).map(String::as_str).unwrap_or(name)
    }

    pub fn is_blacklisted(&self, name: &str) -> bool {
        self.blacklist.iter().any(|b| b == name)
    }

    /// Zero-based lane of a visible agent.
    pub fn lane(&self, name: &str) -> Option<usize> {
        self.order.iter().position(|a| a == name)
    }
}

/// How the hour field of a `T=` timestamp is turned into seconds.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum HourConvention {
    /// `((hours * 24) + minutes) * 60 + seconds`, the facilitator's own encoding
    #[default]
    Facilitator,
    /// `((hours * 60) + minutes) * 60 + seconds`
    Clock,
}

impl HourConvention {
    pub fn minutes_per_hour(self) -> f64 {
        match self {
            HourConvention::Facilitator => 24.0,
            HourConvention::Clock => 60.0,
        }
    }

    pub fn to_seconds(self, hours: u32, minutes: u32, seconds: f64) -> f64 {
        (f64::from(hours) * self.minutes_per_hour() + f64::from(minutes)) * 60.0 + seconds
    }
}

/// Tag vocabulary of the log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Declared other party that carries typed and spoken utterances
    pub keyboard_channel: String,
    /// Entry kind that is dropped without inspection
    pub error_kind: String,
    pub hour_convention: HourConvention,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            keyboard_channel: "KEYBOARD".to_string(),
            error_kind: "ERROR".to_string(),
            hour_convention: HourConvention::Facilitator,
        }
    }
}

/// Timeline strip geometry, in pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    pub width: f64,
    pub height: f64,
    pub margin_x: f64,
    pub gutter_width: f64,
    /// Pixels per second of session time
    pub x_scale: f64,
    pub arrowhead_size: f64,
    pub xtick_offset_y: f64,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 200.0,
            margin_x: 10.0,
            gutter_width: 90.0,
            x_scale: 9.5,
            arrowhead_size: 5.0,
            xtick_offset_y: 8.0,
        }
    }
}

impl TimelineConfig {
    /// Vertical distance between lanes for `lanes` visible agents.
    pub fn ytick_spacing(&self, lanes: usize) -> f64 {
        self.height / (lanes as f64 + 1.0)
    }

    /// Y coordinate of lane `lane`.
    pub fn lane_y(&self, lane: usize, lanes: usize) -> f64 {
        (lane as f64 + 1.0) * self.ytick_spacing(lanes)
    }
}

/// Animation frame geometry and timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub width: u32,
    pub height: u32,
    pub timeline_x: f64,
    pub timeline_y: f64,
    pub graph_x: f64,
    pub graph_y: f64,
    /// Animation seconds per session second
    pub time_scale: f64,
    /// Wall-clock seconds a message stays highlighted
    pub persistence: f64,
    pub fps: f64,
    /// Extra frames after the last event
    pub frame_padding: usize,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 750,
            timeline_x: 0.0,
            timeline_y: 550.0,
            graph_x: 190.0,
            graph_y: 100.0,
            time_scale: 0.1,
            persistence: 0.1,
            fps: 60.0,
            frame_padding: 10,
        }
    }
}

impl AnimationConfig {
    /// Persistence window expressed in session seconds.
    pub fn persistence_window(&self) -> f64 {
        self.persistence / self.time_scale
    }
}

/// Where artifacts are written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub frames_dir: String,
    pub video: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            frames_dir: "frames".to_string(),
            video: "dialog.mp4".to_string(),
        }
    }
}

impl DialogConfig {
    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), String> {
        if !self.animation.fps.is_finite() || self.animation.fps <= 0.0 {
            return Err(format!(
                "animation.fps must be a positive finite number, got {}",
                self.animation.fps
            ));
        }
        if !self.animation.time_scale.is_finite() || self.animation.time_scale <= 0.0 {
            return Err(format!(
                "animation.time_scale must be a positive finite number, got {}",
                self.animation.time_scale
            ));
        }
        if !self.animation.persistence.is_finite() || self.animation.persistence < 0.0 {
            return Err(format!(
                "animation.persistence must be a finite, non-negative number, got {}",
                self.animation.persistence
            ));
        }
        if self.workers == Some(0) {
            return Err("workers must be at least 1".to_string());
        }
        if self.agents.order.is_empty() {
            return Err("agents.order must list at least one agent".to_string());
        }

        let mut seen = HashSet::new();
        for agent in &self.agents.order {
            if !seen.insert(agent.as_str()) {
                return Err(format!("agent {agent} appears twice in agents.order"));
            }
        }
        for (from, to) in &self.agents.groups {
            if self.agents.is_blacklisted(to) {
                return Err(format!("group {from} -> {to} maps onto a blacklisted agent"));
            }
        }
        Ok(())
    }
}
