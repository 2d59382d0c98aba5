//! # uplift
//!
//! Keeps the focused input field visible above a software keyboard by
//! repositioning scrollable ancestors and the root viewport, and keeps a
//! synthesized previous/next/done toolbar in step with focus.
//!
//! The [`Coordinator`] is the single entry point. It is constructed with
//! its collaborators — the shared view tree, a [`CommandSink`] the
//! renderer implements, and a [`Config`] — and subscribes to an
//! [`EventBus`] for platform events:
//!
//! ```rust
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use uplift::Coordinator;
//! use uplift_core::*;
//!
//! let mut tree = ViewTree::new(Size { width: 390.0, height: 844.0 });
//! tree.set_root(
//!     Rect::new(0.0, 0.0, 390.0, 844.0),
//!     PresentationStyle::FullScreen,
//!     None,
//! );
//!
//! let tree = Rc::new(RefCell::new(tree));
//! let sink = Rc::new(RecordingSink::new());
//! let coordinator = Rc::new(RefCell::new(Coordinator::new(
//!     tree,
//!     sink,
//!     Config::default(),
//! )));
//!
//! let bus = EventBus::new();
//! let _subscription = Coordinator::attach(&coordinator, &bus);
//! bus.publish(&Event::KeyboardDidHide);
//! ```
//!
//! Per geometry-affecting event the displacement pipeline runs in three
//! stages, each consuming what it can and passing the rest on:
//!
//! 1. [`required_move`] computes the signed displacement from field,
//!    window, and keyboard geometry.
//! 2. The scroll-chain resolver walks scrollable ancestors innermost
//!    first, converting displacement into content-offset changes.
//! 3. The viewport adjuster applies the residual to the root frame or a
//!    layout-guide constraint, with clamps and full undo on hide.
//!
//! Everything is single-threaded and deterministic: commands are plain
//! data, the coordinator never waits for animations, and replaying the
//! same event sequence produces the same command log.

pub mod coordinator;
pub mod focus;
pub mod keyboard;
pub mod offset;
pub mod order;
pub mod scroll_chain;
pub mod toolbar;
pub mod viewport;

pub use coordinator::Coordinator;
pub use focus::FocusTarget;
pub use keyboard::KeyboardState;
pub use offset::required_move;
pub use order::Order;
pub use scroll_chain::{ScrollChainResolver, ScrollRestoreState};
pub use toolbar::{NavCallbacks, ToolbarManager, ToolbarPhase};
pub use viewport::{RootViewportState, ViewportAdjuster};

/// Below this delta a geometry change is treated as noise and no command
/// is issued.
pub(crate) const EPS: f32 = 0.001;
