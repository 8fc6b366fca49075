//! Tests for event stream construction

mod common;

use dialog_flow::{
    Classification, ClassifiedEntry, DiscardReason, EventStreamBuilder, FlowError, ScanStats,
};
use dialog_types::{DialogConfig, Message, SpeakerRole, Speech};

fn message(sender: &str, receiver: &str, t: f64) -> ClassifiedEntry {
    ClassifiedEntry {
        t,
        line: 1,
        classification: Classification::Message(Message {
            sender: sender.into(),
            receiver: receiver.into(),
            t,
        }),
    }
}

fn discard(t: f64) -> ClassifiedEntry {
    ClassifiedEntry {
        t,
        line: 1,
        classification: Classification::Discard(DiscardReason::Unaddressed),
    }
}

fn speech(text: &str, t: f64) -> ClassifiedEntry {
    ClassifiedEntry {
        t,
        line: 1,
        classification: Classification::Speech(Speech::new(SpeakerRole::User, text, t)),
    }
}

#[test]
fn test_t0_is_first_message_and_tfinal_tracks_every_entry() {
    let config = common::config();
    let mut builder = EventStreamBuilder::new(&config);

    builder.push(discard(1.0)).unwrap();
    builder.push(speech("hi", 2.0)).unwrap();
    assert_eq!(builder.t0(), None);
    assert_eq!(builder.tfinal(), Some(2.0));

    builder.push(message("IM", "DAGENT", 3.0)).unwrap();
    builder.push(message("DAGENT", "IM", 4.0)).unwrap();
    builder.push(discard(9.0)).unwrap();
    assert_eq!(builder.t0(), Some(3.0));

    let streams = builder.finish(ScanStats::default());
    let bounds = streams.bounds.unwrap();
    assert_eq!(bounds.t0, 3.0);
    assert_eq!(bounds.tfinal, 9.0);
    assert_eq!(streams.messages.len(), 2);
    assert_eq!(streams.speeches.len(), 1);
    assert_eq!(streams.discards.unaddressed, 2);
    assert!(streams.messages.iter().all(|m| m.t >= bounds.t0));
}

#[test]
fn test_no_messages_means_no_bounds() {
    let config = common::config();
    let mut builder = EventStreamBuilder::new(&config);
    builder.push(speech("hi", 2.0)).unwrap();
    let streams = builder.finish(ScanStats::default());
    assert!(streams.bounds.is_none());
    assert_eq!(streams.speeches.len(), 1);
}

#[test]
fn test_arrows_follow_lane_order() {
    let config = common::config();
    let timeline = &config.timeline;
    let lanes = config.agents.order.len();
    let mut builder = EventStreamBuilder::new(&config);

    // PARSER is lane 1, DAGENT lane 3
    builder.push(message("PARSER", "DAGENT", 10.0)).unwrap();
    builder.push(message("DAGENT", "PARSER", 12.0)).unwrap();
    let streams = builder.finish(ScanStats::default());

    let down = streams.arrows[0];
    assert_eq!(down.x, timeline.gutter_width);
    assert_eq!(down.y1, timeline.lane_y(1, lanes));
    assert_eq!(down.y2, timeline.lane_y(3, lanes));
    assert_eq!(down.angle, 0.0);

    let up = streams.arrows[1];
    assert_eq!(up.x, timeline.gutter_width + 2.0 * timeline.x_scale);
    assert_eq!(up.angle, 180.0);
    assert_eq!(streams.arrows.len(), streams.messages.len());
}

#[test]
fn test_unregistered_agent_is_a_configuration_error() {
    let config = common::config();
    let mut builder = EventStreamBuilder::new(&config);
    let mut entry = message("IM", "NEWAGENT", 1.0);
    entry.line = 42;
    match builder.push(entry) {
        Err(FlowError::UnrecognizedAgent { agent, line }) => {
            assert_eq!(agent, "NEWAGENT");
            assert_eq!(line, 42);
        }
        other => panic!("expected UnrecognizedAgent, got {other:?}"),
    }
}

#[test]
fn test_registering_the_agent_fixes_the_error() {
    let mut config = DialogConfig::default();
    config.agents.order.push("NEWAGENT".to_string());
    let mut builder = EventStreamBuilder::new(&config);
    builder.push(message("IM", "NEWAGENT", 1.0)).unwrap();
    assert_eq!(builder.finish(ScanStats::default()).messages.len(), 1);
}

#[test]
fn test_double_logged_message_is_collapsed() {
    let config = common::config();
    let mut builder = EventStreamBuilder::new(&config);
    builder.push(message("IM", "DAGENT", 1.0)).unwrap();
    builder.push(message("IM", "DAGENT", 1.0)).unwrap();
    builder.push(message("DAGENT", "IM", 1.0)).unwrap();
    builder.push(message("IM", "DAGENT", 2.0)).unwrap();
    let streams = builder.finish(ScanStats::default());

    assert_eq!(streams.messages.len(), 3);
    assert_eq!(streams.arrows.len(), 3);
    assert_eq!(streams.discards.duplicates, 1);
}
