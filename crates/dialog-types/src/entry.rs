//! Raw log entries produced by the scanner.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Direction of the `R=`/`S=` attribute on an entry's open tag.
///
/// `Sent` means the declared other party sent the logged message
/// (`S="PARSER"`), `Received` means it is the recipient (`R="PARSER"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
pub enum Relation {
    #[strum(serialize = "S")]
    Sent,
    #[strum(serialize = "R")]
    Received,
}

/// One open/body/close unit of the log.
///
/// Entries live only between the scanner and the classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Tag name of the open line (`S`, `R`, `ERROR`, ...)
    pub kind: String,
    /// Raw value of the `T=` attribute
    pub timestamp: String,
    /// Which side the declared other party is on
    pub relation: Relation,
    /// Declared other party, verbatim
    pub other: String,
    /// Body lines joined with `\n`, without the open and close tags
    pub body: String,
    /// 1-based line number of the open tag
    pub line: usize,
}
