//! # uplift-core
//!
//! Value types and collaborator interfaces for the `uplift` keyboard
//! avoidance coordinator:
//!
//! - [`geometry`] — rects, sizes, and edge insets.
//! - [`tree`] — the mutable view tree of containers and fields, with
//!   window-coordinate conversion across scrollable ancestors.
//! - [`event`] — inbound platform events and the subscription-scoped
//!   [`EventBus`].
//! - [`command`] — outbound fire-and-forget commands and the
//!   [`CommandSink`] the renderer implements.
//! - [`config`] — the knobs and scope predicates the coordinator reads.
//!
//! The crate holds no coordination logic itself; everything here is the
//! shared vocabulary between the platform glue, the renderer, and the
//! coordinator in the `uplift` crate.

pub mod anim;
pub mod command;
pub mod config;
pub mod error;
pub mod event;
pub mod geometry;
pub mod tree;

pub use anim::*;
pub use command::*;
pub use config::*;
pub use error::*;
pub use event::*;
pub use geometry::*;
pub use tree::*;
