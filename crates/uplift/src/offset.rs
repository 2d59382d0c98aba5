use uplift_core::{GuideAnchor, Rect};

/// Clearance kept between the top safe-area inset and the field's top edge.
pub(crate) const TOP_CLEARANCE: f32 = 5.0;
/// Margin kept below a fixed top landmark when bounding oversized editors.
pub(crate) const LANDMARK_CLEARANCE: f32 = 10.0;

/// Signed vertical displacement needed to bring `field` (window
/// coordinates) clear of the keyboard.
///
/// Positive: the field is obscured and the viewport must shift up by this
/// much. Zero or negative: the field is visible; a prior shift may be
/// partially reverted.
///
/// With a bottom-anchored layout guide only the bottom edge matters.
/// Otherwise the result is the smaller of "keep the top edge below the
/// safe area" and "keep the bottom edge above the keyboard", so the
/// viewport never moves further than necessary and never pushes the top
/// edge off screen when both constraints can hold.
pub fn required_move(
    field: Rect,
    window_height: f32,
    top_inset: f32,
    effective_keyboard: f32,
    guide: Option<GuideAnchor>,
) -> f32 {
    let keyboard_top = window_height - effective_keyboard;
    if guide == Some(GuideAnchor::Bottom) {
        return field.max_y() - keyboard_top;
    }
    (field.min_y() - (top_inset + TOP_CLEARANCE)).min(field.max_y() - keyboard_top)
}
