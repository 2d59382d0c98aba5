//! # Coordinator
//!
//! Owns the focus/keyboard/restore state and turns platform events into
//! rendering commands. Everything runs to completion on the delivering
//! thread, strictly in event order; commands are fire-and-forget and a
//! newer computation supersedes whatever animation is still playing.
//!
//! Per geometry-affecting event the pipeline is: compute the required
//! displacement, let the scroll chain absorb what it can, hand the
//! residual to the viewport adjuster. The toolbar state machine is
//! refreshed independently on every focus change.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use uplift_core::{
    AnimationCurve, CommandSink, Config, Event, EventBus, NavError, NodeId, Rect, Subscription,
    ViewTree,
};

use crate::focus::FocusTarget;
use crate::keyboard::KeyboardState;
use crate::offset;
use crate::order;
use crate::scroll_chain::ScrollChainResolver;
use crate::toolbar::{NavCallbacks, ToolbarManager, ToolbarPhase};
use crate::viewport::ViewportAdjuster;

pub struct Coordinator {
    tree: Rc<RefCell<ViewTree>>,
    sink: Rc<dyn CommandSink>,
    config: Config,
    enabled: bool,
    focus: Option<FocusTarget>,
    keyboard: KeyboardState,
    scroll_chain: ScrollChainResolver,
    viewport: ViewportAdjuster,
    toolbar: ToolbarManager,
    callbacks: NavCallbacks,
}

impl Coordinator {
    pub fn new(tree: Rc<RefCell<ViewTree>>, sink: Rc<dyn CommandSink>, config: Config) -> Self {
        Self {
            tree,
            sink,
            config,
            enabled: true,
            focus: None,
            keyboard: KeyboardState::default(),
            scroll_chain: ScrollChainResolver::default(),
            viewport: ViewportAdjuster::default(),
            toolbar: ToolbarManager::default(),
            callbacks: NavCallbacks::default(),
        }
    }

    /// Subscribe a shared coordinator to the platform event bus. Dropping
    /// the returned guard stops delivery.
    pub fn attach(coordinator: &Rc<RefCell<Coordinator>>, bus: &Rc<EventBus>) -> Subscription {
        let weak: Weak<RefCell<Coordinator>> = Rc::downgrade(coordinator);
        bus.subscribe(move |event| {
            if let Some(coordinator) = weak.upgrade() {
                coordinator.borrow_mut().handle_event(event);
            }
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn set_config(&mut self, config: Config) {
        self.config = config;
    }

    pub fn keyboard(&self) -> &KeyboardState {
        &self.keyboard
    }

    pub fn focused_field(&self) -> Option<NodeId> {
        self.focus.as_ref().map(|t| t.field)
    }

    pub fn toolbar_phase(&self) -> ToolbarPhase {
        self.toolbar.phase()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Master switch. Disabling while adjusted performs a full restore and
    /// detaches every toolbar this coordinator attached.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled == enabled {
            return;
        }
        self.enabled = enabled;
        if !enabled {
            self.restore_everything();
        }
    }

    pub fn on_previous(&mut self, callback: impl Fn(NodeId) + 'static) {
        self.callbacks.on_previous = Some(Rc::new(callback));
    }

    pub fn on_next(&mut self, callback: impl Fn(NodeId) + 'static) {
        self.callbacks.on_next = Some(Rc::new(callback));
    }

    pub fn on_done(&mut self, callback: impl Fn(NodeId) + 'static) {
        self.callbacks.on_done = Some(Rc::new(callback));
    }

    pub fn handle_event(&mut self, event: &Event) {
        if !self.enabled {
            return;
        }
        log::debug!("coordinator: {event:?}");
        match event {
            Event::FocusGained { field, frame } => self.focus_gained(*field, *frame),
            Event::FocusLost { field } => self.focus_lost(*field),
            Event::KeyboardWillShow {
                frame,
                duration,
                curve,
            } => self.keyboard_will_show(*frame, *duration, *curve),
            Event::KeyboardWillHide { duration } => self.keyboard_will_hide(*duration),
            Event::KeyboardDidHide => self.keyboard_did_hide(),
            Event::OrientationWillChange => self.orientation_will_change(),
        }
    }

    fn focus_gained(&mut self, field: NodeId, frame: Rect) {
        // A focus switch without an intervening focus-lost still restores
        // a resized editor; re-focusing the same field keeps its saved
        // state (and the resize-once flag).
        let retained = match self.focus.take() {
            Some(previous) if previous.field == field => Some(previous),
            Some(mut previous) => {
                if previous.frame_changed {
                    let mut tree = self.tree.borrow_mut();
                    self.viewport.restore_editor(
                        &mut tree,
                        self.sink.as_ref(),
                        &mut previous,
                        self.keyboard.duration,
                    );
                }
                None
            }
            None => None,
        };

        let distance = {
            let tree = self.tree.borrow();
            let Some(node) = tree.field(field) else {
                log::warn!("focus: {field:?} is not a field in the tree");
                return;
            };
            node.keyboard_distance
        };

        self.tree.borrow_mut().set_focused(Some(field));
        self.focus = Some(retained.unwrap_or_else(|| FocusTarget::new(field, frame, distance)));
        {
            let tree = self.tree.borrow();
            self.viewport.capture_guide_pristine(&tree);
        }

        if self.keyboard.visible {
            self.adjust();
        }
        self.refresh_toolbar();
    }

    fn focus_lost(&mut self, field: NodeId) {
        let Some(mut target) = self.focus.take() else {
            return;
        };
        if target.field != field {
            // Stale notification for a field that already lost focus.
            self.focus = Some(target);
            return;
        }
        if target.frame_changed {
            let mut tree = self.tree.borrow_mut();
            self.viewport.restore_editor(
                &mut tree,
                self.sink.as_ref(),
                &mut target,
                self.keyboard.duration,
            );
        }
        self.tree.borrow_mut().set_focused(None);
        self.toolbar.blur();
    }

    fn keyboard_will_show(&mut self, frame: Rect, duration: f32, curve: AnimationCurve) {
        let window = self.tree.borrow().window();
        self.keyboard.apply_will_show(frame, window, duration, curve);
        {
            let tree = self.tree.borrow();
            self.viewport.capture_begin_frame(&tree);
            self.viewport.capture_guide_pristine(&tree);
        }
        if self.focus.is_some() {
            self.adjust();
        }
    }

    fn keyboard_will_hide(&mut self, duration: f32) {
        self.keyboard.apply_will_hide(duration);
        let curve = self.animation_curve();
        let field = self.focused_field();
        let mut tree_ref = self.tree.borrow_mut();
        let tree = &mut *tree_ref;
        self.scroll_chain
            .restore_on_hide(tree, self.sink.as_ref(), field, duration);
        self.viewport
            .restore_on_hide(tree, self.sink.as_ref(), duration, curve);
    }

    fn keyboard_did_hide(&mut self) {
        self.keyboard.height = 0.0;
        self.keyboard.visible = false;
        self.viewport.clear_cycle();
    }

    fn orientation_will_change(&mut self) {
        if let Some(mut target) = self.focus.take() {
            if target.frame_changed {
                let mut tree = self.tree.borrow_mut();
                self.viewport.restore_editor(
                    &mut tree,
                    self.sink.as_ref(),
                    &mut target,
                    self.keyboard.duration,
                );
            }
            self.focus = Some(target);
        }
    }

    /// The full geometry pipeline for the current focus target.
    fn adjust(&mut self) {
        let Some(mut target) = self.focus.clone() else {
            return;
        };
        let mut tree_ref = self.tree.borrow_mut();
        let tree = &mut *tree_ref;
        if tree.root().is_none() {
            log::warn!("avoidance: no root container, adjustment abandoned");
            return;
        }
        if !(self.config.avoidance_scope)(tree.ancestor_caps(target.field)) {
            log::debug!("avoidance: field {:?} is out of scope", target.field);
            return;
        }
        let Some(field_rect) = tree.frame_in_window(target.field) else {
            log::warn!("avoidance: focused field left the tree, adjustment abandoned");
            return;
        };

        let distance = target.effective_distance(self.config.keyboard_distance);
        let effective = self.keyboard.height + distance;
        let guide = tree.layout_guide().map(|g| g.anchor);
        let window_h = tree.window().height;
        let top_inset = tree.safe_area().top;
        let wanted = offset::required_move(field_rect, window_h, top_inset, effective, guide);
        log::debug!(
            "avoidance: move {wanted:.1} for field {:?} (keyboard {:.0})",
            target.field,
            self.keyboard.height
        );

        let duration = self.keyboard.duration;
        let residual = self.scroll_chain.distribute(
            tree,
            self.sink.as_ref(),
            &target,
            wanted,
            self.keyboard.height,
            distance,
            duration,
        );
        let curve = self.animation_curve();
        self.viewport.apply(
            tree,
            self.sink.as_ref(),
            residual,
            &self.keyboard,
            &self.config,
            curve,
        );
        self.viewport.maybe_resize_editor(
            tree,
            self.sink.as_ref(),
            &mut target,
            &self.keyboard,
            &self.config,
            distance,
            self.scroll_chain.active().is_some(),
        );
        drop(tree_ref);
        self.focus = Some(target);
    }

    fn refresh_toolbar(&mut self) {
        let Some(field) = self.focused_field() else {
            return;
        };
        let tree = self.tree.borrow();
        if !(self.config.toolbar_scope)(tree.ancestor_caps(field)) {
            log::debug!("toolbar: field {field:?} is out of scope");
            return;
        }
        self.toolbar
            .refresh(&tree, self.sink.as_ref(), &self.config, field);
    }

    fn animation_curve(&self) -> AnimationCurve {
        if self.config.adopt_keyboard_curve {
            self.keyboard.curve
        } else {
            AnimationCurve::default()
        }
    }

    pub fn can_go_previous(&self) -> bool {
        self.neighbor(-1).is_some()
    }

    pub fn can_go_next(&self) -> bool {
        self.neighbor(1).is_some()
    }

    fn neighbor(&self, delta: isize) -> Option<NodeId> {
        let current = self.focused_field()?;
        let tree = self.tree.borrow();
        let order = order::resolve(&tree, current, &self.config);
        let index = order.iter().position(|&id| id == current)? as isize;
        let target = index + delta;
        if target < 0 {
            return None;
        }
        order.get(target as usize).copied()
    }

    pub fn go_previous(&mut self) -> Result<NodeId, NavError> {
        let moved = self.step(-1)?;
        if let Some(callback) = self.callbacks.on_previous.clone() {
            callback(moved);
        }
        Ok(moved)
    }

    pub fn go_next(&mut self) -> Result<NodeId, NavError> {
        let moved = self.step(1)?;
        if let Some(callback) = self.callbacks.on_next.clone() {
            callback(moved);
        }
        Ok(moved)
    }

    /// Transfer focus to the neighbor at `delta` in the resolved order.
    /// On any refusal focus stays with the original field.
    fn step(&mut self, delta: isize) -> Result<NodeId, NavError> {
        let current = self.focused_field().ok_or(NavError::NothingFocused)?;
        let (candidate, frame) = {
            let tree = self.tree.borrow();
            let order = order::resolve(&tree, current, &self.config);
            let index = order
                .iter()
                .position(|&id| id == current)
                .ok_or(NavError::NotInOrder)? as isize;
            let target = index + delta;
            if target < 0 || target as usize >= order.len() {
                return Err(NavError::AtBoundary);
            }
            let candidate = order[target as usize];
            if tree.field(current).is_some_and(|f| f.holds_focus) {
                return Err(NavError::ResignRefused);
            }
            if tree.field(candidate).is_none_or(|f| f.refuses_focus) {
                return Err(NavError::FocusRefused);
            }
            (
                candidate,
                tree.get(candidate).map(|n| n.frame).unwrap_or_default(),
            )
        };
        self.focus_lost(current);
        self.focus_gained(candidate, frame);
        Ok(candidate)
    }

    /// Yield focus entirely. On refusal focus snaps back to the same
    /// field and the action reports failure.
    pub fn done(&mut self) -> Result<(), NavError> {
        let current = self.focused_field().ok_or(NavError::NothingFocused)?;
        if self
            .tree
            .borrow()
            .field(current)
            .is_some_and(|f| f.holds_focus)
        {
            return Err(NavError::ResignRefused);
        }
        self.focus_lost(current);
        if let Some(callback) = self.callbacks.on_done.clone() {
            callback(current);
        }
        Ok(())
    }

    /// Issue a detach for every toolbar this coordinator attached.
    pub fn detach_toolbars(&mut self) {
        self.toolbar.detach_all(self.sink.as_ref());
    }

    fn restore_everything(&mut self) {
        let duration = self.keyboard.duration;
        let curve = self.animation_curve();
        if let Some(mut target) = self.focus.take() {
            if target.frame_changed {
                let mut tree = self.tree.borrow_mut();
                self.viewport.restore_editor(
                    &mut tree,
                    self.sink.as_ref(),
                    &mut target,
                    duration,
                );
            }
            self.focus = Some(target);
        }
        let field = self.focused_field();
        {
            let mut tree_ref = self.tree.borrow_mut();
            let tree = &mut *tree_ref;
            self.scroll_chain
                .restore_on_hide(tree, self.sink.as_ref(), field, duration);
            self.viewport
                .restore_on_hide(tree, self.sink.as_ref(), duration, curve);
        }
        self.viewport.clear_cycle();
        self.toolbar.detach_all(self.sink.as_ref());
    }
}
