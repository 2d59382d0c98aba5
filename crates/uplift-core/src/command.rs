//! Outbound commands to the rendering collaborator.
//!
//! Commands are plain data and fire-and-forget: the coordinator records
//! their logical effect in the view tree immediately and never waits for
//! the animation to finish. A newer command supersedes whatever is still
//! in flight.

use std::cell::RefCell;

use crate::anim::AnimationCurve;
use crate::geometry::{EdgeInsets, Rect, Vec2};
use crate::tree::NodeId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToolbarVariant {
    DoneOnly,
    PrevNextDone,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    SetRootFrame {
        frame: Rect,
        duration: f32,
        curve: AnimationCurve,
    },
    SetLayoutGuideConstant {
        constraint: u64,
        value: f32,
        duration: f32,
    },
    SetScrollContainerState {
        container: NodeId,
        content_inset: EdgeInsets,
        indicator_inset: EdgeInsets,
        content_offset: Option<Vec2>,
        duration: f32,
    },
    SetFieldFrame {
        field: NodeId,
        frame: Rect,
        duration: f32,
    },
    AttachToolbar {
        field: NodeId,
        variant: ToolbarVariant,
        enable_prev: bool,
        enable_next: bool,
    },
    DetachToolbar {
        field: NodeId,
    },
}

pub trait CommandSink {
    fn submit(&self, command: Command);
}

/// Sink that keeps every submitted command, for tests and replay tooling.
#[derive(Default)]
pub struct RecordingSink {
    commands: RefCell<Vec<Command>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain everything recorded so far.
    pub fn take(&self) -> Vec<Command> {
        self.commands.borrow_mut().drain(..).collect()
    }

    pub fn commands(&self) -> Vec<Command> {
        self.commands.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.commands.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.borrow().is_empty()
    }
}

impl CommandSink for RecordingSink {
    fn submit(&self, command: Command) {
        self.commands.borrow_mut().push(command);
    }
}
