use uplift_core::{AnimationCurve, Rect, Size};

/// Keyboard viewport state, normalized from raw platform frames.
///
/// `visible` is true between will-show and will-hide. A raw frame that
/// does not intersect the window counts as height zero, never as an
/// error.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct KeyboardState {
    pub height: f32,
    pub duration: f32,
    pub curve: AnimationCurve,
    pub visible: bool,
}

impl KeyboardState {
    pub fn apply_will_show(
        &mut self,
        raw: Rect,
        window: Size,
        duration: f32,
        curve: AnimationCurve,
    ) {
        let bounds = Rect::new(0.0, 0.0, window.width, window.height);
        self.height = bounds.intersect(raw).h.max(0.0);
        self.duration = duration.max(0.0);
        self.curve = curve;
        self.visible = true;
    }

    pub fn apply_will_hide(&mut self, duration: f32) {
        self.height = 0.0;
        self.duration = duration.max(0.0);
        self.visible = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> Size {
        Size {
            width: 390.0,
            height: 844.0,
        }
    }

    #[test]
    fn test_will_show_uses_window_overlap() {
        let mut kb = KeyboardState::default();
        kb.apply_will_show(
            Rect::new(0.0, 544.0, 390.0, 300.0),
            window(),
            0.25,
            AnimationCurve::EaseOut,
        );
        assert_eq!(kb.height, 300.0);
        assert!(kb.visible);
    }

    #[test]
    fn test_offscreen_frame_is_zero_height() {
        let mut kb = KeyboardState::default();
        kb.apply_will_show(
            Rect::new(0.0, 900.0, 390.0, 300.0),
            window(),
            0.25,
            AnimationCurve::EaseOut,
        );
        assert_eq!(kb.height, 0.0);
        assert!(kb.visible);
    }

    #[test]
    fn test_degenerate_frame_is_zero_height() {
        let mut kb = KeyboardState::default();
        kb.apply_will_show(Rect::default(), window(), 0.25, AnimationCurve::EaseOut);
        assert_eq!(kb.height, 0.0);
    }

    #[test]
    fn test_will_hide_clears_height() {
        let mut kb = KeyboardState::default();
        kb.apply_will_show(
            Rect::new(0.0, 544.0, 390.0, 300.0),
            window(),
            0.25,
            AnimationCurve::EaseOut,
        );
        kb.apply_will_hide(0.25);
        assert_eq!(kb.height, 0.0);
        assert!(!kb.visible);
    }
}
