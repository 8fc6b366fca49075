//! # Dialog Flow
//!
//! Turns a facilitator log into the event streams the animation is built from.
//!
//! The pipeline runs in one front-to-back pass:
//! 1. [`scanner::LogEntryScanner`] splits the log into entries
//! 2. [`classifier::EntryClassifier`] turns each entry into a message, a caption or nothing
//! 3. [`stream::EventStreamBuilder`] collects the ordered streams and session bounds
//! 4. [`graph::InteractionGraphBuilder`] collapses the messages into a directed graph

pub mod classifier;
pub mod config;
pub mod error;
pub mod graph;
pub mod pipeline;
pub mod renderer;
pub mod scanner;
pub mod stream;

pub use classifier::{Classification, ClassifiedEntry, DiscardReason, EntryClassifier};
pub use config::{apply_env_overrides, load_config};
pub use error::{FlowError, FlowResult};
pub use graph::{InteractionEdge, InteractionGraph, InteractionGraphBuilder};
pub use pipeline::{parse_log, parse_log_file};
pub use renderer::{format_clock, SessionRenderer};
pub use scanner::{LogEntryScanner, ScanStats};
pub use stream::{DiscardStats, EventStreamBuilder, EventStreams};
