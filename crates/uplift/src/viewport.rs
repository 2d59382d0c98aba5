//! # Viewport adjustment
//!
//! Whatever displacement the scroll chain could not absorb lands here:
//! either on the layout-guide constraint when the root is anchored to a
//! system boundary, or on the root frame's vertical origin. Both paths
//! are fully undone from captured begin-state when the keyboard goes
//! away, and upward shifts are clamped so no blank space opens under the
//! content.

use uplift_core::{
    AnimationCurve, Command, CommandSink, Config, FieldKind, GuideAnchor, PresentationStyle, Rect,
    ViewTree,
};

use crate::EPS;
use crate::focus::FocusTarget;
use crate::keyboard::KeyboardState;
use crate::offset::TOP_CLEARANCE;

/// Root geometry captured for the current show/hide cycle.
#[derive(Clone, Copy, Debug, Default)]
pub struct RootViewportState {
    /// Root frame at the first keyboard appearance since the last full
    /// hide.
    pub begin_frame: Option<Rect>,
    /// Layout-guide constant at focus gain; the adjustment never moves
    /// past it.
    pub guide_pristine: Option<f32>,
}

#[derive(Default)]
pub struct ViewportAdjuster {
    state: RootViewportState,
}

impl ViewportAdjuster {
    pub fn state(&self) -> &RootViewportState {
        &self.state
    }

    /// Capture the root frame once per show/hide cycle.
    pub fn capture_begin_frame(&mut self, tree: &ViewTree) {
        if self.state.begin_frame.is_none()
            && let Some(root) = tree.root()
            && let Some(node) = tree.get(root)
        {
            self.state.begin_frame = Some(node.frame);
        }
    }

    /// Capture the layout-guide constant once per focus/show cycle.
    pub fn capture_guide_pristine(&mut self, tree: &ViewTree) {
        if self.state.guide_pristine.is_none()
            && let Some(guide) = tree.layout_guide()
        {
            self.state.guide_pristine = Some(guide.constant);
        }
    }

    /// Forget the captured begin-state. Only on keyboard-did-hide; the
    /// next show cycle starts fresh.
    pub fn clear_cycle(&mut self) {
        self.state = RootViewportState::default();
    }

    /// Apply residual displacement to the layout guide or the root frame.
    pub fn apply(
        &mut self,
        tree: &mut ViewTree,
        sink: &dyn CommandSink,
        wanted: f32,
        keyboard: &KeyboardState,
        config: &Config,
        curve: AnimationCurve,
    ) {
        let Some(root) = tree.root() else {
            return;
        };

        if let Some(guide) = tree.layout_guide() {
            let pristine = self.state.guide_pristine.unwrap_or(guide.constant);
            let value = match guide.anchor {
                GuideAnchor::Top => (guide.constant - wanted).min(pristine),
                GuideAnchor::Bottom => (guide.constant + wanted).max(pristine),
            };
            if (value - guide.constant).abs() > EPS {
                let constraint = guide.constraint;
                if let Some(g) = tree.layout_guide_mut() {
                    g.constant = value;
                }
                sink.submit(Command::SetLayoutGuideConstant {
                    constraint,
                    value,
                    duration: keyboard.duration,
                });
            }
            return;
        }

        self.capture_begin_frame(tree);
        let Some(begin) = self.state.begin_frame else {
            return;
        };
        let Some(node) = tree.get(root) else {
            return;
        };
        let current = node.frame;
        let presentation = tree.presentation().unwrap_or(PresentationStyle::FullScreen);

        let new_y = if wanted >= 0.0 {
            let mut shift = wanted;
            if config.prevent_blank_space {
                // Total disturbance from the begin frame stays within the
                // keyboard's occlusion height.
                let disturbed = begin.y - current.y;
                shift = shift.min((keyboard.height - disturbed).max(0.0));
            }
            if presentation == PresentationStyle::Sheet {
                // Keep the sheet centered in the keyboard-free region.
                let visible = tree.window().height - keyboard.height;
                let slack = (visible - current.h).max(0.0);
                shift = shift.min((current.y - slack * 0.5).max(0.0));
            }
            current.y - shift
        } else {
            // Reversal, but never past the captured begin position.
            let disturb = current.y - begin.y;
            if disturb < 0.0 {
                current.y + (-wanted).min(-disturb)
            } else {
                current.y
            }
        };

        if (new_y - current.y).abs() > EPS {
            let mut frame = current;
            frame.y = new_y;
            if let Some(node) = tree.get_mut(root) {
                node.frame = frame;
            }
            sink.submit(Command::SetRootFrame {
                frame,
                duration: keyboard.duration,
                curve,
            });
        }
    }

    /// Shrink an oversized single-field editor in place, once per focus
    /// session. Applies only when no scroll-chain container is active.
    pub fn maybe_resize_editor(
        &mut self,
        tree: &mut ViewTree,
        sink: &dyn CommandSink,
        target: &mut FocusTarget,
        keyboard: &KeyboardState,
        config: &Config,
        distance: f32,
        chain_active: bool,
    ) {
        if !config.allow_editor_resize || chain_active || target.frame_changed || !keyboard.visible
        {
            return;
        }
        if !tree
            .field(target.field)
            .is_some_and(|f| f.kind == FieldKind::MultilineEditor)
        {
            return;
        }
        let window_h = tree.window().height;
        let top_inset = tree.safe_area().top;
        let fit_h = window_h - (keyboard.height + distance) - (top_inset + TOP_CLEARANCE);
        let Some(node) = tree.get(target.field) else {
            return;
        };
        if fit_h <= 0.0 || node.frame.h <= fit_h + EPS {
            return;
        }
        let mut frame = node.frame;
        frame.h = fit_h;
        if let Some(node) = tree.get_mut(target.field) {
            node.frame = frame;
        }
        target.frame_changed = true;
        sink.submit(Command::SetFieldFrame {
            field: target.field,
            frame,
            duration: keyboard.duration,
        });
    }

    /// Put the editor frame back exactly as captured at focus gain.
    pub fn restore_editor(
        &self,
        tree: &mut ViewTree,
        sink: &dyn CommandSink,
        target: &mut FocusTarget,
        duration: f32,
    ) {
        if !target.frame_changed {
            return;
        }
        if let Some(node) = tree.get_mut(target.field) {
            node.frame = target.initial_frame;
        }
        target.frame_changed = false;
        sink.submit(Command::SetFieldFrame {
            field: target.field,
            frame: target.initial_frame,
            duration,
        });
    }

    /// Undo the root shift / guide offset when the keyboard goes away.
    pub fn restore_on_hide(
        &mut self,
        tree: &mut ViewTree,
        sink: &dyn CommandSink,
        duration: f32,
        curve: AnimationCurve,
    ) {
        if let Some(pristine) = self.state.guide_pristine
            && let Some(guide) = tree.layout_guide()
            && (guide.constant - pristine).abs() > EPS
        {
            let constraint = guide.constraint;
            if let Some(g) = tree.layout_guide_mut() {
                g.constant = pristine;
            }
            sink.submit(Command::SetLayoutGuideConstant {
                constraint,
                value: pristine,
                duration,
            });
        }

        let Some(begin) = self.state.begin_frame else {
            return;
        };
        let Some(root) = tree.root() else {
            return;
        };
        let Some(node) = tree.get(root) else {
            return;
        };
        if (node.frame.y - begin.y).abs() > EPS || (node.frame.h - begin.h).abs() > EPS {
            if let Some(node) = tree.get_mut(root) {
                node.frame = begin;
            }
            sink.submit(Command::SetRootFrame {
                frame: begin,
                duration,
                curve,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uplift_core::{FieldNode, LayoutGuide, PresentationStyle, RecordingSink, Size};

    fn keyboard(height: f32) -> KeyboardState {
        KeyboardState {
            height,
            duration: 0.25,
            curve: AnimationCurve::EaseInOut,
            visible: true,
        }
    }

    fn bare_tree(presentation: PresentationStyle) -> ViewTree {
        let mut tree = ViewTree::new(Size {
            width: 390.0,
            height: 812.0,
        });
        tree.set_safe_area(uplift_core::EdgeInsets::top(44.0));
        tree.set_root(Rect::new(0.0, 0.0, 390.0, 812.0), presentation, None);
        tree
    }

    #[test]
    fn test_shift_up_and_exact_reversal() {
        let mut tree = bare_tree(PresentationStyle::FullScreen);
        let root = tree.root().unwrap();
        let sink = RecordingSink::new();
        let mut adjuster = ViewportAdjuster::default();
        let kb = keyboard(300.0);

        adjuster.apply(&mut tree, &sink, 238.0, &kb, &Config::default(), kb.curve);
        assert_eq!(tree.get(root).unwrap().frame.y, -238.0);

        // Over-asking the reversal never overshoots the begin frame.
        adjuster.apply(&mut tree, &sink, -500.0, &kb, &Config::default(), kb.curve);
        assert_eq!(tree.get(root).unwrap().frame.y, 0.0);

        // No disturbance left: another reversal is a no-op.
        let before = sink.len();
        adjuster.apply(&mut tree, &sink, -50.0, &kb, &Config::default(), kb.curve);
        assert_eq!(sink.len(), before);
    }

    #[test]
    fn test_prevent_blank_space_caps_shift_at_keyboard_height() {
        let mut tree = bare_tree(PresentationStyle::FullScreen);
        let root = tree.root().unwrap();
        let sink = RecordingSink::new();
        let mut adjuster = ViewportAdjuster::default();
        let kb = keyboard(300.0);

        adjuster.apply(&mut tree, &sink, 450.0, &kb, &Config::default(), kb.curve);
        assert_eq!(tree.get(root).unwrap().frame.y, -300.0);
    }

    #[test]
    fn test_blank_space_clamp_can_be_disabled() {
        let mut tree = bare_tree(PresentationStyle::FullScreen);
        let root = tree.root().unwrap();
        let sink = RecordingSink::new();
        let mut adjuster = ViewportAdjuster::default();
        let kb = keyboard(300.0);
        let config = Config {
            prevent_blank_space: false,
            ..Config::default()
        };

        adjuster.apply(&mut tree, &sink, 450.0, &kb, &config, kb.curve);
        assert_eq!(tree.get(root).unwrap().frame.y, -450.0);
    }

    #[test]
    fn test_sheet_shift_keeps_root_centered_in_slack() {
        let mut tree = ViewTree::new(Size {
            width: 390.0,
            height: 812.0,
        });
        // A 400pt sheet sitting at y=300.
        tree.set_root(
            Rect::new(0.0, 300.0, 390.0, 400.0),
            PresentationStyle::Sheet,
            None,
        );
        let root = tree.root().unwrap();
        let sink = RecordingSink::new();
        let mut adjuster = ViewportAdjuster::default();
        let kb = keyboard(300.0);

        // Visible region 512, slack 112: the sheet may rise to y=56 at
        // most, even though 280 was requested.
        adjuster.apply(&mut tree, &sink, 280.0, &kb, &Config::default(), kb.curve);
        assert_eq!(tree.get(root).unwrap().frame.y, 56.0);
    }

    #[test]
    fn test_guide_constant_clamped_to_pristine() {
        let mut tree = ViewTree::new(Size {
            width: 390.0,
            height: 812.0,
        });
        tree.set_root(
            Rect::new(0.0, 0.0, 390.0, 812.0),
            PresentationStyle::FullScreen,
            Some(LayoutGuide {
                anchor: GuideAnchor::Bottom,
                constraint: 7,
                constant: 0.0,
            }),
        );
        let sink = RecordingSink::new();
        let mut adjuster = ViewportAdjuster::default();
        adjuster.capture_guide_pristine(&tree);
        let kb = keyboard(300.0);

        adjuster.apply(&mut tree, &sink, 120.0, &kb, &Config::default(), kb.curve);
        assert_eq!(tree.layout_guide().unwrap().constant, 120.0);
        // The root frame is untouched on the guide path.
        let root = tree.root().unwrap();
        assert_eq!(tree.get(root).unwrap().frame.y, 0.0);

        // Reversal beyond the pristine constant is clamped.
        adjuster.apply(&mut tree, &sink, -500.0, &kb, &Config::default(), kb.curve);
        assert_eq!(tree.layout_guide().unwrap().constant, 0.0);
    }

    #[test]
    fn test_editor_resized_once_and_restored_verbatim() {
        let mut tree = bare_tree(PresentationStyle::FullScreen);
        let root = tree.root().unwrap();
        let field = tree
            .add_field(root, Rect::new(0.0, 100.0, 390.0, 900.0), FieldNode::editor())
            .unwrap();
        let sink = RecordingSink::new();
        let mut adjuster = ViewportAdjuster::default();
        let kb = keyboard(300.0);
        let mut target = FocusTarget::new(field, Rect::new(0.0, 100.0, 390.0, 900.0), None);

        adjuster.maybe_resize_editor(
            &mut tree,
            &sink,
            &mut target,
            &kb,
            &Config::default(),
            10.0,
            false,
        );
        // 812 - 310 - 49 = 453.
        assert_eq!(tree.get(field).unwrap().frame.h, 453.0);
        assert!(target.frame_changed);

        let emitted = sink.take().len();
        adjuster.maybe_resize_editor(
            &mut tree,
            &sink,
            &mut target,
            &kb,
            &Config::default(),
            10.0,
            false,
        );
        assert_eq!(emitted, 1);
        assert!(sink.is_empty());

        adjuster.restore_editor(&mut tree, &sink, &mut target, 0.25);
        assert_eq!(tree.get(field).unwrap().frame, Rect::new(0.0, 100.0, 390.0, 900.0));
        assert!(!target.frame_changed);
    }

    #[test]
    fn test_hide_restores_begin_frame_and_did_hide_clears_it() {
        let mut tree = bare_tree(PresentationStyle::FullScreen);
        let root = tree.root().unwrap();
        let sink = RecordingSink::new();
        let mut adjuster = ViewportAdjuster::default();
        let kb = keyboard(300.0);

        adjuster.apply(&mut tree, &sink, 238.0, &kb, &Config::default(), kb.curve);
        adjuster.restore_on_hide(&mut tree, &sink, 0.25, kb.curve);
        assert_eq!(tree.get(root).unwrap().frame.y, 0.0);

        adjuster.clear_cycle();
        assert!(adjuster.state().begin_frame.is_none());
    }
}
