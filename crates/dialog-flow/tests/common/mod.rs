//! Shared fixtures for dialog-flow integration tests

#![allow(dead_code)]

use dialog_types::{DialogConfig, Entry, Relation};

/// `10:00:00.00` under the facilitator hour convention
pub const T_BASE: f64 = (10.0 * 24.0) * 60.0;

/// A short facilitator session exercising every classification path.
pub const SAMPLE_LOG: &str = r#"<LOG T="10:00:00.00" FILE="facilitator.log">

<R T="10:00:01.00" S="TEXTTAGGER">
(TELL :RECEIVER IM :CONTENT (WORDS "hello"))
</R>
<S T="10:00:01.00" R="IM">
(TELL :SENDER PARSER :CONTENT (WORDS "hello"))
</S>
<R T="10:00:02.50" S="KEYBOARD">
(REQUEST :RECEIVER KEYBOARD :CONTENT (INPUT :TEXT "hello world"))
</R>
<S T="10:00:03.00" R="KEYBOARD">
(TELL :CONTENT (SPOKEN :WHAT "I <emph>see</emph>"))
</S>
<ERROR T="10:00:04.00" S="IM">
(TELL :SENDER IM :RECEIVER DAGENT)
</ERROR>
<R T="10:00:05.00" S="DAGENT">
(SORRY :CONTENT (TELL :RECEIVER IM))
</R>
<R T="10:00:06.00" S="IM">
(TELL :RECEIVER DAGENT :CONTENT (UPDATE))
</R>
<R T="10:00:07.00" S="IM">
(TELL :RECEIVER FACILITATOR :CONTENT (REGISTER))
</R>
<R T="10:00:08.00" S="DEEPSEMLEX">
(TELL :RECEIVER PARSER :CONTENT (LOOKUP))
</R>
<S T="10:00:09.00" R="CSM">
(ASK-IF :CONTENT (READY))
</S>
<R T="10:00:10.00" S="DAGENT">
(tell :receiver parser :content (REPLY))
</R>
<R T="10:00:12.00" S="KEYBOARD">
(TELL :RECEIVER IM :CONTENT (START))
</R>
<EXIT T="10:00:13.00">
"#;

pub fn config() -> DialogConfig {
    DialogConfig::default()
}

pub fn entry(kind: &str, relation: Relation, other: &str, timestamp: &str, body: &str) -> Entry {
    Entry {
        kind: kind.to_string(),
        timestamp: timestamp.to_string(),
        relation,
        other: other.to_string(),
        body: body.to_string(),
        line: 1,
    }
}
