//! # Toolbar state machine
//!
//! Drives which navigation controls exist per focused field:
//!
//! - `Idle` — no field focused, nothing attached.
//! - `SingleField` — one candidate in the resolved order: done-only.
//! - `MultiField` — two or more candidates: previous/next/done.
//!
//! Every focus gain re-resolves the candidate set and transitions. An
//! existing attachment whose variant matches the target state is reused
//! (button enablement refreshed in place); a mismatched one is detached
//! and replaced. Attachments this manager did not create are never
//! touched.

use std::collections::HashMap;
use std::rc::Rc;

use uplift_core::{Command, CommandSink, Config, NodeId, ToolbarVariant, ViewTree};

use crate::order;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ToolbarPhase {
    #[default]
    Idle,
    SingleField,
    MultiField,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Attachment {
    variant: ToolbarVariant,
    enable_prev: bool,
    enable_next: bool,
}

/// Navigation callbacks, invoked synchronously after a successful action.
#[derive(Clone, Default)]
pub struct NavCallbacks {
    pub on_previous: Option<Rc<dyn Fn(NodeId)>>,
    pub on_next: Option<Rc<dyn Fn(NodeId)>>,
    pub on_done: Option<Rc<dyn Fn(NodeId)>>,
}

#[derive(Default)]
pub struct ToolbarManager {
    phase: ToolbarPhase,
    attachments: HashMap<NodeId, Attachment>,
}

impl ToolbarManager {
    pub fn phase(&self) -> ToolbarPhase {
        self.phase
    }

    /// Re-resolve the candidate set for a freshly focused field and drive
    /// the state machine.
    pub fn refresh(
        &mut self,
        tree: &ViewTree,
        sink: &dyn CommandSink,
        config: &Config,
        field: NodeId,
    ) {
        if tree.field(field).is_none_or(|f| f.foreign_accessory) {
            log::debug!("toolbar: field {field:?} carries a foreign accessory, leaving it alone");
            return;
        }

        let order = order::resolve(tree, field, config);
        let index = order.iter().position(|&id| id == field);
        let (phase, desired) = match index {
            Some(i) if order.len() >= 2 => (
                ToolbarPhase::MultiField,
                Attachment {
                    variant: ToolbarVariant::PrevNextDone,
                    enable_prev: i > 0,
                    enable_next: i + 1 < order.len(),
                },
            ),
            _ => (
                ToolbarPhase::SingleField,
                Attachment {
                    variant: ToolbarVariant::DoneOnly,
                    enable_prev: false,
                    enable_next: false,
                },
            ),
        };
        self.phase = phase;

        match self.attachments.get(&field) {
            Some(existing) if *existing == desired => {}
            Some(existing) if existing.variant == desired.variant => {
                // Same variant tag: reuse the attachment, refresh buttons.
                self.attachments.insert(field, desired);
                sink.submit(Command::AttachToolbar {
                    field,
                    variant: desired.variant,
                    enable_prev: desired.enable_prev,
                    enable_next: desired.enable_next,
                });
            }
            Some(_) => {
                sink.submit(Command::DetachToolbar { field });
                self.attachments.insert(field, desired);
                sink.submit(Command::AttachToolbar {
                    field,
                    variant: desired.variant,
                    enable_prev: desired.enable_prev,
                    enable_next: desired.enable_next,
                });
            }
            None => {
                self.attachments.insert(field, desired);
                sink.submit(Command::AttachToolbar {
                    field,
                    variant: desired.variant,
                    enable_prev: desired.enable_prev,
                    enable_next: desired.enable_next,
                });
            }
        }
    }

    pub fn blur(&mut self) {
        self.phase = ToolbarPhase::Idle;
    }

    /// Detach every toolbar this manager attached.
    pub fn detach_all(&mut self, sink: &dyn CommandSink) {
        for &field in self.attachments.keys() {
            sink.submit(Command::DetachToolbar { field });
        }
        self.attachments.clear();
        self.phase = ToolbarPhase::Idle;
    }
}
