//! # View tree
//!
//! The mutable tree of containers and fields the coordinator operates on.
//! Platform glue builds it and keeps it in sync with the real view
//! hierarchy; the coordinator reads geometry from it and records the
//! logical effect of every command it issues, so repeated computations see
//! the state they already produced.
//!
//! Node frames are expressed in the parent's coordinate space (window space
//! for the root). Children of a scrollable container live in its content
//! coordinate space; the container's current content offset shifts them on
//! screen. `frame_in_window` folds both rules.
//!
//! Field and container kinds are closed variant sets decided at
//! construction time. Behavior scoping goes through `ContainerCaps`
//! capability flags rather than type lookups.

use bitflags::bitflags;
use slotmap::{SlotMap, new_key_type};
use smallvec::SmallVec;

use crate::geometry::{EdgeInsets, Rect, Size, Vec2};

new_key_type! {
    /// Stable handle to a node in the view tree.
    pub struct NodeId;
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct ContainerCaps: u32 {
        /// The container defines next/previous order over its focusable
        /// descendants; no re-sorting is applied inside it.
        const NAVIGATION_ORDER = 1 << 0;
        /// Fixed top bar; oversized editors are kept below its bottom edge.
        const TOP_LANDMARK = 1 << 1;
        /// Fields under this container are exempt from avoidance geometry.
        const AVOIDANCE_EXEMPT = 1 << 2;
        /// Fields under this container never get a synthesized toolbar.
        const TOOLBAR_EXEMPT = 1 << 3;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    TextLine,
    MultilineEditor,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PresentationStyle {
    FullScreen,
    Sheet,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuideAnchor {
    Top,
    Bottom,
}

/// Constraint tying the root's top or bottom edge to a system boundary.
/// When present, displacement is applied to its constant instead of the
/// root frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutGuide {
    pub anchor: GuideAnchor,
    pub constraint: u64,
    pub constant: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScrollInfo {
    pub content_size: Size,
    pub content_offset: Vec2,
    pub content_inset: EdgeInsets,
    pub indicator_inset: EdgeInsets,
    pub scroll_enabled: bool,
    /// Whether the saved content offset is put back when the keyboard hides.
    pub restore_offset: bool,
}

impl Default for ScrollInfo {
    fn default() -> Self {
        Self {
            content_size: Size::default(),
            content_offset: Vec2::default(),
            content_inset: EdgeInsets::default(),
            indicator_inset: EdgeInsets::default(),
            scroll_enabled: true,
            restore_offset: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ContainerKind {
    Scrollable(ScrollInfo),
    Fixed,
}

#[derive(Clone, Debug)]
pub struct FieldNode {
    pub kind: FieldKind,
    pub tag: i32,
    pub enabled: bool,
    pub hidden: bool,
    /// Dynamic veto: the field rejects incoming focus transfers.
    pub refuses_focus: bool,
    /// Dynamic veto: the field rejects giving up focus.
    pub holds_focus: bool,
    pub keyboard_distance: Option<f32>,
    /// An accessory attached by someone else; toolbar management leaves
    /// the field alone.
    pub foreign_accessory: bool,
}

impl Default for FieldNode {
    fn default() -> Self {
        Self {
            kind: FieldKind::TextLine,
            tag: 0,
            enabled: true,
            hidden: false,
            refuses_focus: false,
            holds_focus: false,
            keyboard_distance: None,
            foreign_accessory: false,
        }
    }
}

impl FieldNode {
    pub fn text_line() -> Self {
        Self::default()
    }

    pub fn editor() -> Self {
        Self {
            kind: FieldKind::MultilineEditor,
            ..Self::default()
        }
    }

    pub fn with_tag(mut self, tag: i32) -> Self {
        self.tag = tag;
        self
    }

    pub fn with_keyboard_distance(mut self, distance: f32) -> Self {
        self.keyboard_distance = Some(distance.max(0.0));
        self
    }
}

#[derive(Clone, Debug)]
pub enum NodeKind {
    Root {
        presentation: PresentationStyle,
        layout_guide: Option<LayoutGuide>,
    },
    Container {
        kind: ContainerKind,
        caps: ContainerCaps,
    },
    Field(FieldNode),
}

#[derive(Clone, Debug)]
pub struct Node {
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Frame in the parent's coordinate space (window space for the root).
    pub frame: Rect,
    pub kind: NodeKind,
}

pub struct ViewTree {
    nodes: SlotMap<NodeId, Node>,
    root: Option<NodeId>,
    window: Size,
    safe_area: EdgeInsets,
    focused: Option<NodeId>,
}

impl ViewTree {
    pub fn new(window: Size) -> Self {
        Self {
            nodes: SlotMap::with_key(),
            root: None,
            window,
            safe_area: EdgeInsets::default(),
            focused: None,
        }
    }

    pub fn window(&self) -> Size {
        self.window
    }

    pub fn set_window(&mut self, window: Size) {
        self.window = window;
    }

    pub fn safe_area(&self) -> EdgeInsets {
        self.safe_area
    }

    pub fn set_safe_area(&mut self, insets: EdgeInsets) {
        self.safe_area = insets;
    }

    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    pub fn set_focused(&mut self, field: Option<NodeId>) {
        self.focused = field;
    }

    /// Install the root node, discarding any previous tree.
    pub fn set_root(
        &mut self,
        frame: Rect,
        presentation: PresentationStyle,
        layout_guide: Option<LayoutGuide>,
    ) -> NodeId {
        self.nodes.clear();
        self.focused = None;
        let id = self.nodes.insert(Node {
            parent: None,
            children: vec![],
            frame,
            kind: NodeKind::Root {
                presentation,
                layout_guide,
            },
        });
        self.root = Some(id);
        id
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn presentation(&self) -> Option<PresentationStyle> {
        let node = self.nodes.get(self.root?)?;
        match node.kind {
            NodeKind::Root { presentation, .. } => Some(presentation),
            _ => None,
        }
    }

    pub fn layout_guide(&self) -> Option<LayoutGuide> {
        let node = self.nodes.get(self.root?)?;
        match node.kind {
            NodeKind::Root { layout_guide, .. } => layout_guide,
            _ => None,
        }
    }

    pub fn layout_guide_mut(&mut self) -> Option<&mut LayoutGuide> {
        let root = self.root?;
        let node = self.nodes.get_mut(root)?;
        match &mut node.kind {
            NodeKind::Root { layout_guide, .. } => layout_guide.as_mut(),
            _ => None,
        }
    }

    pub fn add_container(
        &mut self,
        parent: NodeId,
        frame: Rect,
        kind: ContainerKind,
        caps: ContainerCaps,
    ) -> Option<NodeId> {
        self.add_node(
            parent,
            Node {
                parent: Some(parent),
                children: vec![],
                frame,
                kind: NodeKind::Container { kind, caps },
            },
        )
    }

    pub fn add_field(&mut self, parent: NodeId, frame: Rect, field: FieldNode) -> Option<NodeId> {
        self.add_node(
            parent,
            Node {
                parent: Some(parent),
                children: vec![],
                frame,
                kind: NodeKind::Field(field),
            },
        )
    }

    fn add_node(&mut self, parent: NodeId, node: Node) -> Option<NodeId> {
        if !self.nodes.contains_key(parent) {
            log::warn!("add_node: parent {parent:?} is not in the tree");
            return None;
        }
        let id = self.nodes.insert(node);
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(id);
        }
        Some(id)
    }

    /// Remove a node and its subtree. Clears focus if it pointed inside.
    pub fn remove(&mut self, id: NodeId) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        if let Some(parent) = node.parent
            && let Some(p) = self.nodes.get_mut(parent)
        {
            p.children.retain(|&c| c != id);
        }
        let mut stack: SmallVec<[NodeId; 16]> = SmallVec::new();
        stack.push(id);
        while let Some(cur) = stack.pop() {
            if let Some(node) = self.nodes.remove(cur) {
                if self.focused == Some(cur) {
                    self.focused = None;
                }
                stack.extend(node.children);
            }
        }
        if self.root == Some(id) {
            self.root = None;
        }
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id)?.parent
    }

    pub fn field(&self, id: NodeId) -> Option<&FieldNode> {
        match &self.nodes.get(id)?.kind {
            NodeKind::Field(field) => Some(field),
            _ => None,
        }
    }

    pub fn field_mut(&mut self, id: NodeId) -> Option<&mut FieldNode> {
        match &mut self.nodes.get_mut(id)?.kind {
            NodeKind::Field(field) => Some(field),
            _ => None,
        }
    }

    pub fn scroll_info(&self, id: NodeId) -> Option<&ScrollInfo> {
        match &self.nodes.get(id)?.kind {
            NodeKind::Container {
                kind: ContainerKind::Scrollable(info),
                ..
            } => Some(info),
            _ => None,
        }
    }

    pub fn scroll_info_mut(&mut self, id: NodeId) -> Option<&mut ScrollInfo> {
        match &mut self.nodes.get_mut(id)?.kind {
            NodeKind::Container {
                kind: ContainerKind::Scrollable(info),
                ..
            } => Some(info),
            _ => None,
        }
    }

    /// Node frame in window coordinates, folding ancestor origins and
    /// scrollable ancestors' content offsets.
    pub fn frame_in_window(&self, id: NodeId) -> Option<Rect> {
        let node = self.nodes.get(id)?;
        let mut rect = node.frame;
        let mut cursor = node.parent;
        while let Some(pid) = cursor {
            let parent = self.nodes.get(pid)?;
            rect.x += parent.frame.x;
            rect.y += parent.frame.y;
            if let Some(info) = self.scroll_info(pid) {
                rect.x -= info.content_offset.x;
                rect.y -= info.content_offset.y;
            }
            cursor = parent.parent;
        }
        Some(rect)
    }

    /// Node frame in `ancestor`'s content coordinate space (the ancestor's
    /// own content offset is not applied). None if `ancestor` is not above
    /// `id`.
    pub fn frame_in(&self, id: NodeId, ancestor: NodeId) -> Option<Rect> {
        let node = self.nodes.get(id)?;
        let mut rect = node.frame;
        let mut cursor = node.parent;
        while let Some(pid) = cursor {
            if pid == ancestor {
                return Some(rect);
            }
            let parent = self.nodes.get(pid)?;
            rect.x += parent.frame.x;
            rect.y += parent.frame.y;
            if let Some(info) = self.scroll_info(pid) {
                rect.x -= info.content_offset.x;
                rect.y -= info.content_offset.y;
            }
            cursor = parent.parent;
        }
        None
    }

    pub fn nearest_scrollable_ancestor(&self, id: NodeId) -> Option<NodeId> {
        self.scrollable_ancestors(id).first().copied()
    }

    /// Scroll-enabled scrollable ancestors of `id`, innermost first.
    pub fn scrollable_ancestors(&self, id: NodeId) -> SmallVec<[NodeId; 4]> {
        let mut out = SmallVec::new();
        let mut cursor = self.parent_of(id);
        while let Some(pid) = cursor {
            let Some(node) = self.nodes.get(pid) else {
                break;
            };
            if let Some(info) = self.scroll_info(pid)
                && info.scroll_enabled
            {
                out.push(pid);
            }
            cursor = node.parent;
        }
        out
    }

    /// Nearest ancestor container whose capability flags satisfy `pred`.
    pub fn nearest_ancestor_with(
        &self,
        id: NodeId,
        pred: impl Fn(ContainerCaps) -> bool,
    ) -> Option<NodeId> {
        let mut cursor = self.parent_of(id);
        while let Some(pid) = cursor {
            let node = self.nodes.get(pid)?;
            if let NodeKind::Container { caps, .. } = &node.kind
                && pred(*caps)
            {
                return Some(pid);
            }
            cursor = node.parent;
        }
        None
    }

    /// Union of all ancestor container capability flags.
    pub fn ancestor_caps(&self, id: NodeId) -> ContainerCaps {
        let mut caps = ContainerCaps::empty();
        let mut cursor = self.parent_of(id);
        while let Some(pid) = cursor {
            let Some(node) = self.nodes.get(pid) else {
                break;
            };
            if let NodeKind::Container { caps: c, .. } = &node.kind {
                caps |= *c;
            }
            cursor = node.parent;
        }
        caps
    }

    /// Bottom edge (window coords) of the nearest fixed top landmark,
    /// searched among the children of each ancestor in turn.
    pub fn top_landmark_bottom(&self, id: NodeId) -> Option<f32> {
        let mut cursor = self.parent_of(id);
        while let Some(pid) = cursor {
            let node = self.nodes.get(pid)?;
            for &child in &node.children {
                if let Some(c) = self.nodes.get(child)
                    && let NodeKind::Container { caps, .. } = &c.kind
                    && caps.contains(ContainerCaps::TOP_LANDMARK)
                {
                    return self.frame_in_window(child).map(|r| r.max_y());
                }
            }
            cursor = node.parent;
        }
        None
    }

    /// Focusable fields under `id` in depth-first tree order.
    pub fn focusable_fields_under(&self, id: NodeId) -> SmallVec<[NodeId; 8]> {
        let mut out = SmallVec::new();
        let mut stack: SmallVec<[NodeId; 16]> = SmallVec::new();
        stack.push(id);
        while let Some(cur) = stack.pop() {
            let Some(node) = self.nodes.get(cur) else {
                continue;
            };
            if matches!(node.kind, NodeKind::Field(_)) && self.is_focusable(cur) {
                out.push(cur);
            }
            for &child in node.children.iter().rev() {
                stack.push(child);
            }
        }
        out
    }

    pub fn is_focusable(&self, id: NodeId) -> bool {
        self.field(id).is_some_and(|f| f.enabled && !f.hidden)
    }
}
