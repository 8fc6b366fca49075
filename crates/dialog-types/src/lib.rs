//! # Dialog Types
//!
//! Shared data model for the dialog visualizer.
//!
//! Every stage of the pipeline (scanner, classifier, stream builder, graph
//! builder, scheduler, compositor) exchanges the types defined here, and all
//! of them receive the same explicit [`DialogConfig`] value.

pub mod agent;
pub mod config;
pub mod entry;
pub mod event;
pub mod frame;

pub use agent::*;
pub use config::*;
pub use entry::*;
pub use event::*;
pub use frame::*;
