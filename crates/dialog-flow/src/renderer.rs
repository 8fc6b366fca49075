//! ASCII tree rendering for parsed sessions
//!
//! Gives a quick terminal overview of what the parser extracted: the session
//! bounds, each sender with its outgoing edges, the captions, and what was
//! discarded along the way.

use crate::graph::InteractionGraph;
use crate::stream::EventStreams;
use ascii_tree::Tree;

/// Format session seconds the way the timeline labels them (`H:MM:SS`).
///
/// Fractional seconds are kept with microsecond precision, whole days are
/// spelled out.
pub fn format_clock(seconds: f64) -> String {
    let micros = (seconds.max(0.0) * 1_000_000.0).round() as u64;
    let whole = micros / 1_000_000;
    let fraction = micros % 1_000_000;
    let days = whole / 86_400;
    let rem = whole % 86_400;
    let clock = format!("{}:{:02}:{:02}", rem / 3600, (rem % 3600) / 60, rem % 60);
    let clock = if fraction > 0 {
        format!("{clock}.{fraction:06}")
    } else {
        clock
    };
    match days {
        0 => clock,
        1 => format!("1 day, {clock}"),
        n => format!("{n} days, {clock}"),
    }
}

/// Trait for rendering a parsed session as an ASCII tree
pub trait SessionRenderer {
    fn render_as_ascii_tree(&self, graph: &InteractionGraph) -> String;
}

impl SessionRenderer for EventStreams {
    fn render_as_ascii_tree(&self, graph: &InteractionGraph) -> String {
        let span = match self.bounds {
            Some(b) => format!(
                "{} -> {} ({:.1}s)",
                format_clock(b.t0),
                format_clock(b.tfinal),
                b.elapsed()
            ),
            None => "no messages".to_string(),
        };
        let root_label = format!(
            "🌊 Session {} | {} messages | {} captions | {} agents",
            span,
            self.messages.len(),
            self.speeches.len(),
            graph.nodes.len()
        );

        let mut children = Vec::new();

        for node in &graph.nodes {
            let outgoing: Vec<Tree> = graph
                .edges
                .iter()
                .filter(|e| &e.sender == node)
                .map(|e| Tree::Leaf(vec![format!("→ {} ({} msgs)", e.receiver, e.messages)]))
                .collect();
            if !outgoing.is_empty() {
                children.push(Tree::Node(format!("🤖 {node}"), outgoing));
            }
        }

        if !self.speeches.is_empty() {
            let captions = self
                .speeches
                .iter()
                .map(|s| {
                    let preview = if s.text.chars().count() > 80 {
                        format!("{}...", s.text.chars().take(80).collect::<String>())
                    } else {
                        s.text.clone()
                    };
                    Tree::Leaf(vec![format!("[{}] {}", format_clock(s.t), preview)])
                })
                .collect();
            children.push(Tree::Node("💬 Captions".to_string(), captions));
        }

        let scan = &self.scan;
        let discards = &self.discards;
        children.push(Tree::Leaf(vec![format!(
            "🗑️  Dropped: {} error, {} rejected, {} stray lines | discarded: {} unaddressed, {} blacklisted, {} self, {} keyboard, {} duplicate",
            scan.error_entries,
            scan.rejected_entries,
            scan.stray_lines,
            discards.unaddressed,
            discards.blacklisted,
            discards.self_addressed,
            discards.no_utterance,
            discards.duplicates
        )]));

        let tree = Tree::Node(root_label, children);
        let mut buffer = String::new();
        let _ = ascii_tree::write_tree(&mut buffer, &tree);
        buffer
    }
}
