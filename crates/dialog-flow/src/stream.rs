//! Event stream construction
//!
//! Accumulates classified entries into the ordered message and speech streams,
//! derives one timeline arrow per message and records the session bounds.
//!
//! Every agent of an accepted message must be pre-registered in
//! `agents.order`: the timeline has one lane per listed agent and an unknown
//! agent is reported as [`FlowError::UnrecognizedAgent`] instead of being
//! dropped.

use crate::classifier::{Classification, ClassifiedEntry, DiscardReason};
use crate::error::{FlowError, FlowResult};
use crate::scanner::ScanStats;
use dialog_types::{DialogConfig, Message, SessionBounds, Speech, TimelineArrow};
use serde::Serialize;

/// Counters for classified entries that produced no event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiscardStats {
    pub no_utterance: usize,
    pub unaddressed: usize,
    pub blacklisted: usize,
    pub self_addressed: usize,
    /// Second log line of a message the facilitator already recorded
    pub duplicates: usize,
}

impl DiscardStats {
    pub fn total(&self) -> usize {
        self.no_utterance + self.unaddressed + self.blacklisted + self.self_addressed + self.duplicates
    }

    fn record(&mut self, reason: DiscardReason) {
        match reason {
            DiscardReason::NoUtterance => self.no_utterance += 1,
            DiscardReason::Unaddressed => self.unaddressed += 1,
            DiscardReason::Blacklisted => self.blacklisted += 1,
            DiscardReason::SelfAddressed => self.self_addressed += 1,
        }
    }
}

/// The parsed session: read-only input of graph building and animation.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EventStreams {
    pub messages: Vec<Message>,
    pub speeches: Vec<Speech>,
    /// One arrow per message, same order
    pub arrows: Vec<TimelineArrow>,
    /// `None` when no message was accepted
    pub bounds: Option<SessionBounds>,
    pub scan: ScanStats,
    pub discards: DiscardStats,
}

/// Single-writer builder for [`EventStreams`].
pub struct EventStreamBuilder<'a> {
    config: &'a DialogConfig,
    messages: Vec<Message>,
    speeches: Vec<Speech>,
    arrows: Vec<TimelineArrow>,
    t0: Option<f64>,
    tfinal: Option<f64>,
    discards: DiscardStats,
}

impl<'a> EventStreamBuilder<'a> {
    pub fn new(config: &'a DialogConfig) -> Self {
        Self {
            config,
            messages: Vec::new(),
            speeches: Vec::new(),
            arrows: Vec::new(),
            t0: None,
            tfinal: None,
            discards: DiscardStats::default(),
        }
    }

    pub fn t0(&self) -> Option<f64> {
        self.t0
    }

    pub fn tfinal(&self) -> Option<f64> {
        self.tfinal
    }

    pub fn push(&mut self, entry: ClassifiedEntry) -> FlowResult<()> {
        self.tfinal = Some(entry.t);

        match entry.classification {
            Classification::Discard(reason) => self.discards.record(reason),
            Classification::Speech(speech) => self.speeches.push(speech),
            Classification::Message(message) => self.push_message(message, entry.line)?,
        }
        Ok(())
    }

    fn push_message(&mut self, message: Message, line: usize) -> FlowResult<()> {
        if self.is_duplicate(&message) {
            self.discards.duplicates += 1;
            return Ok(());
        }

        let agents = &self.config.agents;
        let lanes = agents.order.len();
        let sender_lane = agents
            .lane(message.sender.as_str())
            .ok_or_else(|| FlowError::unrecognized_agent(message.sender.as_str(), line))?;
        let receiver_lane = agents
            .lane(message.receiver.as_str())
            .ok_or_else(|| FlowError::unrecognized_agent(message.receiver.as_str(), line))?;

        let t0 = *self.t0.get_or_insert(message.t);
        let timeline = &self.config.timeline;
        let y1 = timeline.lane_y(sender_lane, lanes);
        let y2 = timeline.lane_y(receiver_lane, lanes);
        self.arrows.push(TimelineArrow {
            x: timeline.gutter_width + (message.t - t0) * timeline.x_scale,
            y1,
            y2,
            angle: if y1 < y2 { 0.0 } else { 180.0 },
        });
        self.messages.push(message);
        Ok(())
    }

    /// The facilitator logs a routed message twice, once on receipt and
    /// once on delivery, with the same timestamp.
    fn is_duplicate(&self, message: &Message) -> bool {
        self.messages
            .iter()
            .rev()
            .take_while(|m| m.t == message.t)
            .any(|m| m.sender == message.sender && m.receiver == message.receiver)
    }

    pub fn finish(self, scan: ScanStats) -> EventStreams {
        let bounds = match (self.t0, self.tfinal) {
            (Some(t0), Some(tfinal)) => Some(SessionBounds { t0, tfinal }),
            _ => None,
        };
        EventStreams {
            messages: self.messages,
            speeches: self.speeches,
            arrows: self.arrows,
            bounds,
            scan,
            discards: self.discards,
        }
    }
}
