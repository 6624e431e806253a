use std::collections::HashSet;

use super::types::SInput;

/// Per-frame input deltas.
///
/// `InputState` provides the current state (active contacts, hover position).
/// `InputFrame` provides the samples accepted this frame and the contact
/// transitions they caused.
#[derive(Debug, Default)]
pub struct InputFrame {
    /// Accepted samples in arrival order.
    pub inputs: Vec<SInput>,

    /// Contact ids that went down this frame.
    pub downs: HashSet<u32>,

    /// Contact ids that went up this frame.
    pub ups: HashSet<u32>,

    /// Wheel samples this frame.
    pub wheel: Vec<SInput>,

    /// Set when the platform cancelled all contacts this frame.
    pub cancelled: bool,
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.inputs.clear();
        self.downs.clear();
        self.ups.clear();
        self.wheel.clear();
        self.cancelled = false;
    }

    pub fn push_input(&mut self, input: SInput) {
        self.inputs.push(input);
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty() && !self.cancelled
    }
}
