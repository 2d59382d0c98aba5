use uplift_core::{NodeId, Rect};

/// The focused field and the geometry saved the moment it gained focus.
///
/// Created on focus-gained, dropped on focus-lost. The initial frame is
/// the undo point for the in-place editor resize.
#[derive(Clone, Debug)]
pub struct FocusTarget {
    pub field: NodeId,
    /// Frame in the immediate container's coordinate space at focus gain.
    pub initial_frame: Rect,
    /// Set once the coordinator has resized the field in place.
    pub frame_changed: bool,
    /// Per-field override of the keyboard distance margin.
    pub keyboard_distance: Option<f32>,
}

impl FocusTarget {
    pub fn new(field: NodeId, initial_frame: Rect, keyboard_distance: Option<f32>) -> Self {
        Self {
            field,
            initial_frame,
            frame_changed: false,
            keyboard_distance,
        }
    }

    /// Per-field override if present, else the global distance; never
    /// negative.
    pub fn effective_distance(&self, default_distance: f32) -> f32 {
        self.keyboard_distance.unwrap_or(default_distance).max(0.0)
    }
}
