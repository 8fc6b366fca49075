//! Interaction graph
//!
//! Collapses the message stream into a directed graph: one node per agent that
//! sends or receives a message, one edge per distinct (sender, receiver) pair.
//! The graph is built once and handed read-only to the layout capability.

use dialog_types::{AgentId, Message};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt::Write;

/// Font the graph is laid out and labelled with.
pub const GRAPH_FONT: &str = "lato semibold";
pub const GRAPH_FONT_SIZE: u32 = 11;

/// A distinct directed edge with the number of messages it carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InteractionEdge {
    pub sender: AgentId,
    pub receiver: AgentId,
    pub messages: usize,
}

/// Directed agent graph; nodes and edges keep first-appearance order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InteractionGraph {
    pub nodes: Vec<AgentId>,
    pub edges: Vec<InteractionEdge>,
}

impl InteractionGraph {
    pub fn contains_edge(&self, sender: &AgentId, receiver: &AgentId) -> bool {
        self.edges
            .iter()
            .any(|e| &e.sender == sender && &e.receiver == receiver)
    }

    /// Graphviz source for the graph.
    pub fn to_dot(&self) -> String {
        let mut dot = String::from("digraph {\n");
        let _ = writeln!(
            dot,
            "    node [fontname=\"{GRAPH_FONT}\", fontsize={GRAPH_FONT_SIZE}];"
        );
        for node in &self.nodes {
            let _ = writeln!(dot, "    \"{}\";", escape(node.as_str()));
        }
        for edge in &self.edges {
            let _ = writeln!(
                dot,
                "    \"{}\" -> \"{}\";",
                escape(edge.sender.as_str()),
                escape(edge.receiver.as_str())
            );
        }
        dot.push_str("}\n");
        dot
    }
}

fn escape(name: &str) -> String {
    name.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Builds an [`InteractionGraph`] from a message stream.
#[derive(Debug, Default)]
pub struct InteractionGraphBuilder {
    graph: InteractionGraph,
    edge_index: HashMap<(AgentId, AgentId), usize>,
}

impl InteractionGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_messages(messages: &[Message]) -> InteractionGraph {
        let mut builder = Self::new();
        for message in messages {
            builder.add_message(message);
        }
        builder.build()
    }

    pub fn add_message(&mut self, message: &Message) {
        for agent in [&message.sender, &message.receiver] {
            if !self.graph.nodes.contains(agent) {
                self.graph.nodes.push(agent.clone());
            }
        }

        let key = message.edge();
        if let Some(&index) = self.edge_index.get(&key) {
            self.graph.edges[index].messages += 1;
        } else {
            self.edge_index.insert(key, self.graph.edges.len());
            self.graph.edges.push(InteractionEdge {
                sender: message.sender.clone(),
                receiver: message.receiver.clone(),
                messages: 1,
            });
        }
    }

    pub fn build(self) -> InteractionGraph {
        self.graph
    }
}
