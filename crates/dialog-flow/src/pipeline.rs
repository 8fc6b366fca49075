//! Log-to-streams pipeline: scanner, classifier and stream builder wired
//! together in one front-to-back pass.

use crate::classifier::EntryClassifier;
use crate::error::FlowResult;
use crate::scanner::LogEntryScanner;
use crate::stream::{EventStreamBuilder, EventStreams};
use dialog_types::DialogConfig;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::info;

/// Parse a whole log held by `reader`.
pub fn parse_log<R: BufRead>(reader: R, config: &DialogConfig) -> FlowResult<EventStreams> {
    let classifier = EntryClassifier::new(config)?;
    let mut scanner = LogEntryScanner::new(reader, &config.log)?;
    let mut builder = EventStreamBuilder::new(config);

    for entry in scanner.by_ref() {
        let entry = entry?;
        builder.push(classifier.classify(&entry)?)?;
    }

    let streams = builder.finish(scanner.stats().clone());
    info!(
        "[Pipeline] Parsed {} entries into {} messages and {} captions ({} discarded)",
        streams.scan.entries,
        streams.messages.len(),
        streams.speeches.len(),
        streams.discards.total()
    );
    Ok(streams)
}

/// Parse the log file at `path`.
pub fn parse_log_file(path: &Path, config: &DialogConfig) -> FlowResult<EventStreams> {
    info!("[Pipeline] Reading log {}", path.display());
    let file = File::open(path)?;
    parse_log(BufReader::new(file), config)
}
