//! Per-component transform-copy shaping parameters.

use serde::{Deserialize, Serialize};

/// Shaping parameters for one transform component (location, rotation or
/// scale) of a bone mapping: a master enable, per-axis enables, and per-axis
/// influence / multiply / offset applied in that order.
///
/// `influence` is clamped to [0, 1]; a disabled axis contributes zero no
/// matter what the other fields hold.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransformChannel {
    pub enabled: bool,
    pub axis: [bool; 3],
    pub influence: [f32; 3],
    pub multiply: [f32; 3],
    pub offset: [f32; 3],
}

impl TransformChannel {
    /// Clamp `influence` into [0, 1] on every axis. Called after
    /// deserialization and by builders that accept raw user values.
    pub fn clamp_influence(&mut self) {
        for v in &mut self.influence {
            *v = v.clamp(0.0, 1.0);
        }
    }

    #[inline]
    pub fn axis_active(&self, axis: usize) -> bool {
        self.enabled && self.axis[axis]
    }
}

impl Default for TransformChannel {
    fn default() -> Self {
        Self {
            enabled: true,
            axis: [true; 3],
            influence: [1.0; 3],
            multiply: [1.0; 3],
            offset: [0.0; 3],
        }
    }
}
