//! Configuration surface read by the coordinator.
//!
//! Plain numeric/boolean knobs round-trip through [`ConfigSnapshot`] as
//! JSON so hosts can persist them. Scope predicates are runtime-only
//! closures over container capability flags and are not serialized.

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::tree::ContainerCaps;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderMode {
    #[default]
    TreeOrder,
    ByTag,
    ByPosition,
}

/// Capability predicate evaluated against the union of a field's ancestor
/// container flags.
pub type ScopePredicate = Rc<dyn Fn(ContainerCaps) -> bool>;

#[derive(Clone)]
pub struct Config {
    /// Distance margin between field and keyboard; floored at zero
    /// wherever it is consumed.
    pub keyboard_distance: f32,
    pub prevent_blank_space: bool,
    pub adopt_keyboard_curve: bool,
    pub allow_editor_resize: bool,
    pub order_mode: OrderMode,
    /// Whether avoidance geometry runs for a field in this context.
    pub avoidance_scope: ScopePredicate,
    /// Whether a toolbar is synthesized for a field in this context.
    pub toolbar_scope: ScopePredicate,
    /// Which containers define navigation order over their descendants.
    pub navigation_scope: ScopePredicate,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            keyboard_distance: 10.0,
            prevent_blank_space: true,
            adopt_keyboard_curve: true,
            allow_editor_resize: true,
            order_mode: OrderMode::TreeOrder,
            avoidance_scope: Rc::new(|caps| !caps.contains(ContainerCaps::AVOIDANCE_EXEMPT)),
            toolbar_scope: Rc::new(|caps| !caps.contains(ContainerCaps::TOOLBAR_EXEMPT)),
            navigation_scope: Rc::new(|caps| caps.contains(ContainerCaps::NAVIGATION_ORDER)),
        }
    }
}

impl Config {
    pub fn snapshot(&self) -> ConfigSnapshot {
        ConfigSnapshot {
            keyboard_distance: self.keyboard_distance.max(0.0),
            prevent_blank_space: self.prevent_blank_space,
            adopt_keyboard_curve: self.adopt_keyboard_curve,
            allow_editor_resize: self.allow_editor_resize,
            order_mode: self.order_mode,
        }
    }

    pub fn apply_snapshot(&mut self, snapshot: ConfigSnapshot) {
        self.keyboard_distance = snapshot.keyboard_distance.max(0.0);
        self.prevent_blank_space = snapshot.prevent_blank_space;
        self.adopt_keyboard_curve = snapshot.adopt_keyboard_curve;
        self.allow_editor_resize = snapshot.allow_editor_resize;
        self.order_mode = snapshot.order_mode;
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.snapshot()).unwrap_or_else(|_| "{}".into())
    }

    pub fn from_json(&mut self, json: &str) {
        match serde_json::from_str::<ConfigSnapshot>(json) {
            Ok(snapshot) => self.apply_snapshot(snapshot),
            Err(err) => log::warn!("config: ignoring malformed snapshot: {err}"),
        }
    }
}

/// Serializable part of [`Config`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    pub keyboard_distance: f32,
    pub prevent_blank_space: bool,
    pub adopt_keyboard_curve: bool,
    pub allow_editor_resize: bool,
    pub order_mode: OrderMode,
}
