use serde::{Deserialize, Serialize};

/// One animation frame. Purely derived from its index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub index: usize,
    /// Seconds of session time since `t0`
    pub t_rel: f64,
    /// Absolute session time in seconds
    pub t_abs: f64,
}

impl Frame {
    /// File name of the rendered frame (`00042.png`).
    pub fn file_name(&self) -> String {
        format!("{:05}.png", self.index)
    }
}
