//! # Scroll-chain distribution
//!
//! Displacement computed for the focused field is absorbed by the chain
//! of scrollable ancestors before anything touches the root frame: each
//! container consumes as much of the requested motion as its offset
//! allows and passes the leftover outward, innermost first.
//!
//! The resolver also owns the restore lifecycle: the pristine insets and
//! offset of the active container are captured before the first mutation
//! and put back when the keyboard hides or focus moves to a field under a
//! different container. At most one container is active at a time.

use uplift_core::{Command, CommandSink, EdgeInsets, FieldKind, NodeId, Vec2, ViewTree};

use crate::EPS;
use crate::focus::FocusTarget;
use crate::offset::LANDMARK_CLEARANCE;

/// Pristine geometry of the active scrollable container, captured before
/// the coordinator mutates it.
#[derive(Clone, Debug)]
pub struct ScrollRestoreState {
    pub container: NodeId,
    pub content_inset: EdgeInsets,
    pub indicator_inset: EdgeInsets,
    pub content_offset: Vec2,
    pub restore_offset: bool,
}

#[derive(Default)]
pub struct ScrollChainResolver {
    active: Option<ScrollRestoreState>,
}

impl ScrollChainResolver {
    pub fn active(&self) -> Option<&ScrollRestoreState> {
        self.active.as_ref()
    }

    /// Distribute `wanted` across the scrollable ancestors of the focused
    /// field and return the residual the viewport adjuster must absorb.
    ///
    /// Without a scrollable ancestor the displacement passes through
    /// unchanged.
    pub fn distribute(
        &mut self,
        tree: &mut ViewTree,
        sink: &dyn CommandSink,
        target: &FocusTarget,
        mut wanted: f32,
        keyboard_height: f32,
        distance: f32,
        duration: f32,
    ) -> f32 {
        self.retarget(tree, sink, target.field, duration);
        if self.active.is_none() {
            return wanted;
        }

        let chain = tree.scrollable_ancestors(target.field);
        let is_editor = tree
            .field(target.field)
            .is_some_and(|f| f.kind == FieldKind::MultilineEditor);

        let mut child = target.field;
        for (idx, &container) in chain.iter().enumerate() {
            let Some(info) = tree.scroll_info(container) else {
                break;
            };
            let offset_y = info.content_offset.y;
            let top_inset = info.content_inset.top;
            let proceed = if wanted > 0.0 {
                wanted > -(offset_y + top_inset)
            } else {
                offset_y > 0.0
            };
            if !proceed {
                break;
            }

            let mut should = offset_y - offset_y.min(-wanted);
            // A container never scrolls its own child above its content top.
            if let Some(child_rect) = tree.frame_in(child, container) {
                should = should.min(child_rect.y);
            }

            let outermost = idx + 1 == chain.len();
            if is_editor && outermost && should >= 0.0 {
                // The whole editor cannot fit; keep it just below the
                // nearest fixed top landmark and leave nothing for the
                // viewport adjuster.
                let landmark = tree
                    .top_landmark_bottom(target.field)
                    .unwrap_or(tree.safe_area().top);
                if let Some(visible) = tree.frame_in_window(target.field) {
                    let fix = visible.y - (landmark + LANDMARK_CLEARANCE);
                    should = should.min(offset_y + fix);
                }
                wanted = 0.0;
            } else {
                wanted -= should - offset_y;
            }

            if (should - offset_y).abs() > EPS
                && let Some(info) = tree.scroll_info_mut(container)
            {
                info.content_offset.y = should;
                let state = Command::SetScrollContainerState {
                    container,
                    content_inset: info.content_inset,
                    indicator_inset: info.indicator_inset,
                    content_offset: Some(info.content_offset),
                    duration,
                };
                sink.submit(state);
            }

            child = container;
        }

        self.grow_bottom_inset(tree, sink, keyboard_height, distance, duration);
        wanted
    }

    /// Keyboard-hide restore: insets unconditionally, offset per the
    /// container's policy, then re-clamp every ancestor in the chain so no
    /// offset exceeds its scrollable range.
    pub fn restore_on_hide(
        &mut self,
        tree: &mut ViewTree,
        sink: &dyn CommandSink,
        field: Option<NodeId>,
        duration: f32,
    ) {
        self.restore_active(tree, sink, duration);
        let Some(field) = field else {
            return;
        };
        for container in tree.scrollable_ancestors(field) {
            let Some(node) = tree.get(container) else {
                continue;
            };
            let frame_h = node.frame.h;
            let Some(info) = tree.scroll_info(container) else {
                continue;
            };
            let max_off = (info.content_size.height - frame_h).max(0.0);
            if info.content_offset.y > max_off + EPS
                && let Some(info) = tree.scroll_info_mut(container)
            {
                info.content_offset.y = max_off;
                let state = Command::SetScrollContainerState {
                    container,
                    content_inset: info.content_inset,
                    indicator_inset: info.indicator_inset,
                    content_offset: Some(info.content_offset),
                    duration,
                };
                sink.submit(state);
            }
        }
    }

    /// Point the active slot at the scrollable ancestor of `field`,
    /// restoring whichever container was active before.
    fn retarget(
        &mut self,
        tree: &mut ViewTree,
        sink: &dyn CommandSink,
        field: NodeId,
        duration: f32,
    ) {
        let nearest = tree.nearest_scrollable_ancestor(field);
        match (&self.active, nearest) {
            (Some(state), Some(next)) if state.container == next => {}
            (Some(_), next) => {
                self.restore_active(tree, sink, duration);
                if let Some(next) = next {
                    self.capture(tree, next);
                }
            }
            (None, Some(next)) => self.capture(tree, next),
            (None, None) => {}
        }
    }

    fn capture(&mut self, tree: &ViewTree, container: NodeId) {
        if let Some(info) = tree.scroll_info(container) {
            self.active = Some(ScrollRestoreState {
                container,
                content_inset: info.content_inset,
                indicator_inset: info.indicator_inset,
                content_offset: info.content_offset,
                restore_offset: info.restore_offset,
            });
        }
    }

    fn restore_active(&mut self, tree: &mut ViewTree, sink: &dyn CommandSink, duration: f32) {
        let Some(state) = self.active.take() else {
            return;
        };
        let Some(info) = tree.scroll_info_mut(state.container) else {
            return;
        };
        let offset = state.restore_offset.then_some(state.content_offset);
        let changed = info.content_inset != state.content_inset
            || info.indicator_inset != state.indicator_inset
            || offset.is_some_and(|o| o != info.content_offset);
        info.content_inset = state.content_inset;
        info.indicator_inset = state.indicator_inset;
        if let Some(offset) = offset {
            info.content_offset = offset;
        }
        if changed {
            sink.submit(Command::SetScrollContainerState {
                container: state.container,
                content_inset: state.content_inset,
                indicator_inset: state.indicator_inset,
                content_offset: offset,
                duration,
            });
        }
    }

    /// Grow the active container's bottom inset so content above the
    /// keyboard stays reachable, mirrored onto the indicator inset.
    fn grow_bottom_inset(
        &self,
        tree: &mut ViewTree,
        sink: &dyn CommandSink,
        keyboard_height: f32,
        distance: f32,
        duration: f32,
    ) {
        if keyboard_height <= 0.0 {
            return;
        }
        let Some(state) = &self.active else {
            return;
        };
        let container = state.container;
        let Some(frame) = tree.frame_in_window(container) else {
            return;
        };
        let window_h = tree.window().height;
        let needed = keyboard_height - distance - (window_h - frame.max_y());
        let bottom = needed.max(state.content_inset.bottom);
        if let Some(info) = tree.scroll_info_mut(container)
            && (info.content_inset.bottom - bottom).abs() > EPS
        {
            info.content_inset.bottom = bottom;
            info.indicator_inset.bottom = bottom;
            let state = Command::SetScrollContainerState {
                container,
                content_inset: info.content_inset,
                indicator_inset: info.indicator_inset,
                content_offset: None,
                duration,
            };
            sink.submit(state);
        }
    }
}
