//! Entry classification
//!
//! Decides whether an entry is noise, a caption-worthy utterance on the
//! keyboard channel, or a message between two visible agents, and resolves
//! the sender/receiver pair for messages.

use crate::error::{FlowError, FlowResult};
use dialog_types::{
    AgentConfig, AgentId, DialogConfig, Entry, HourConvention, Message, Relation, SpeakerRole,
    Speech,
};
use regex::{Regex, RegexBuilder};
use serde::Serialize;

/// Why an entry produced no event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DiscardReason {
    /// Keyboard-channel entry that is neither typed nor spoken text
    NoUtterance,
    /// Sender or receiver could not be resolved
    Unaddressed,
    /// Sender or receiver is blacklisted after normalization
    Blacklisted,
    /// Sender and receiver normalize to the same agent
    SelfAddressed,
}

/// Outcome of classifying one entry.
#[derive(Debug, Clone, PartialEq)]
pub enum Classification {
    Discard(DiscardReason),
    Speech(Speech),
    Message(Message),
}

/// A classified entry together with its timestamp in seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedEntry {
    pub t: f64,
    pub line: usize,
    pub classification: Classification,
}

/// Stateless classifier; build once per configuration.
pub struct EntryClassifier {
    agents: AgentConfig,
    keyboard_channel: String,
    hour_convention: HourConvention,
    timestamp_re: Regex,
    sender_re: Regex,
    receiver_re: Regex,
    user_speech_re: Regex,
    computer_speech_re: Regex,
    markup_re: Regex,
}

impl EntryClassifier {
    pub fn new(config: &DialogConfig) -> FlowResult<Self> {
        let keyboard = regex::escape(&config.log.keyboard_channel);
        Ok(Self {
            agents: config.agents.clone(),
            keyboard_channel: config.log.keyboard_channel.clone(),
            hour_convention: config.log.hour_convention,
            timestamp_re: Regex::new(r"(\d\d):(\d\d):(\d\d(?:\.\d*)?)")?,
            sender_re: RegexBuilder::new(r":sender ([^ )]+)")
                .case_insensitive(true)
                .build()?,
            receiver_re: RegexBuilder::new(r":receiver ([^ )]+)")
                .case_insensitive(true)
                .build()?,
            user_speech_re: Regex::new(&format!(r#":RECEIVER {keyboard}.*:TEXT "([^<]+)""#))?,
            computer_speech_re: Regex::new(r#"TELL :CONTENT \(SPOKEN :WHAT "([^"]+)"\)"#)?,
            markup_re: Regex::new(r"</?\w+>")?,
        })
    }

    /// Convert a `T=` attribute to absolute seconds.
    pub fn parse_timestamp(&self, timestamp: &str, line: usize) -> FlowResult<f64> {
        let invalid = || FlowError::malformed(line, format!("unparsable timestamp {timestamp:?}"));
        let caps = self.timestamp_re.captures(timestamp).ok_or_else(invalid)?;
        let hours: u32 = caps[1].parse().map_err(|_| invalid())?;
        let minutes: u32 = caps[2].parse().map_err(|_| invalid())?;
        let seconds: f64 = caps[3].parse().map_err(|_| invalid())?;
        Ok(self.hour_convention.to_seconds(hours, minutes, seconds))
    }

    pub fn classify(&self, entry: &Entry) -> FlowResult<ClassifiedEntry> {
        let expected_relation = match entry.kind.as_str() {
            "S" => Relation::Received,
            "R" => Relation::Sent,
            other => {
                return Err(FlowError::malformed(
                    entry.line,
                    format!("unknown entry kind <{other}>"),
                ))
            }
        };
        if entry.relation != expected_relation {
            return Err(FlowError::malformed(
                entry.line,
                format!(
                    "<{}> entry cannot carry a {}= party",
                    entry.kind, entry.relation
                ),
            ));
        }

        let t = self.parse_timestamp(&entry.timestamp, entry.line)?;
        let classification = if entry.other == self.keyboard_channel {
            self.classify_keyboard(&entry.body, t)
        } else {
            self.classify_message(entry, t)?
        };

        Ok(ClassifiedEntry {
            t,
            line: entry.line,
            classification,
        })
    }

    fn classify_keyboard(&self, body: &str, t: f64) -> Classification {
        let utterance = if let Some(caps) = self.user_speech_re.captures(body) {
            Some((SpeakerRole::User, caps[1].to_string()))
        } else {
            self.computer_speech_re
                .captures(body)
                .map(|caps| (SpeakerRole::Computer, caps[1].to_string()))
        };

        match utterance {
            Some((role, text)) => {
                let text = self.markup_re.replace_all(&text, "");
                Classification::Speech(Speech::new(role, &text, t))
            }
            None => Classification::Discard(DiscardReason::NoUtterance),
        }
    }

    fn classify_message(&self, entry: &Entry, t: f64) -> FlowResult<Classification> {
        let stated_sender = self
            .sender_re
            .captures(&entry.body)
            .map(|caps| caps[1].to_uppercase());
        let stated_receiver = self
            .receiver_re
            .captures(&entry.body)
            .map(|caps| caps[1].to_uppercase());

        let sender = resolve_party(
            stated_sender,
            &entry.other,
            entry.relation == Relation::Sent,
            entry.line,
            "sender",
        )?;
        let receiver = resolve_party(
            stated_receiver,
            &entry.other,
            entry.relation == Relation::Received,
            entry.line,
            "receiver",
        )?;

        let (Some(sender), Some(receiver)) = (sender, receiver) else {
            return Ok(Classification::Discard(DiscardReason::Unaddressed));
        };

        let sender = self.agents.canonical(&sender);
        let receiver = self.agents.canonical(&receiver);
        if self.agents.is_blacklisted(sender) || self.agents.is_blacklisted(receiver) {
            return Ok(Classification::Discard(DiscardReason::Blacklisted));
        }
        if sender == receiver {
            return Ok(Classification::Discard(DiscardReason::SelfAddressed));
        }

        Ok(Classification::Message(Message {
            sender: AgentId::new(sender),
            receiver: AgentId::new(receiver),
            t,
        }))
    }
}

/// Reconcile a party stated in the body with the entry's declared party.
///
/// When the entry declares this side (`declared_side`), a stated name (already
/// upper-cased) must equal the declared party exactly and a missing one is
/// taken from it.
fn resolve_party(
    stated: Option<String>,
    other: &str,
    declared_side: bool,
    line: usize,
    role: &str,
) -> FlowResult<Option<String>> {
    match (stated, declared_side) {
        (Some(name), true) if name != other => Err(FlowError::malformed(
            line,
            format!("body names {role} {name} but the entry declares {other}"),
        )),
        (Some(name), _) => Ok(Some(name)),
        (None, true) => Ok(Some(other.to_uppercase())),
        (None, false) => Ok(None),
    }
}
