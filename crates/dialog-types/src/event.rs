//! Classified events and the geometry derived from them.

use crate::agent::AgentId;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// A resolved communication between two distinct agents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub sender: AgentId,
    pub receiver: AgentId,
    /// Absolute session time in seconds
    pub t: f64,
}

impl Message {
    /// Whether the message glows at `t_abs` given a persistence window.
    ///
    /// Both ends of the interval are inclusive.
    pub fn is_active_at(&self, t_abs: f64, window: f64) -> bool {
        self.t <= t_abs && t_abs <= self.t + window
    }

    pub fn edge(&self) -> (AgentId, AgentId) {
        (self.sender.clone(), self.receiver.clone())
    }
}

/// Who produced an utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
pub enum SpeakerRole {
    User,
    Computer,
}

/// A typed or spoken utterance shown as the frame caption.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Speech {
    pub role: SpeakerRole,
    /// Caption text, already prefixed with the role (`User: hello`)
    pub text: String,
    pub t: f64,
}

impl Speech {
    pub fn new(role: SpeakerRole, utterance: &str, t: f64) -> Self {
        Self {
            role,
            text: format!("{role}: {utterance}"),
            t,
        }
    }
}

/// Timeline arrow for one message, in timeline-local pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimelineArrow {
    pub x: f64,
    pub y1: f64,
    pub y2: f64,
    /// 0 when the arrow points down the lanes, 180 when it points up
    pub angle: f64,
}

/// First and last timestamps of a session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionBounds {
    /// Timestamp of the first accepted message
    pub t0: f64,
    /// Timestamp of the last entry that reached the classifier
    pub tfinal: f64,
}

impl SessionBounds {
    pub fn elapsed(&self) -> f64 {
        (self.tfinal - self.t0).max(0.0)
    }
}
