use std::borrow::Cow;
use std::fmt;

use glam::Affine3A;

use crate::scene::NodeKey;
use crate::scene::graphic::Graphic;
use crate::scene::hook::FrameHook;
use crate::scene::light::Light;
use crate::scene::transform::Transform;

/// What a node contributes to a frame.
pub enum NodeRole {
    /// Pure container
    Group,
    Graphic(Graphic),
    Light(Light),
    Hook(Box<dyn FrameHook>),
}

impl fmt::Debug for NodeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Group => f.write_str("Group"),
            Self::Graphic(g) => f.debug_tuple("Graphic").field(g).finish(),
            Self::Light(l) => f.debug_tuple("Light").field(l).finish(),
            Self::Hook(_) => f.write_str("Hook(..)"),
        }
    }
}

/// A scene node.
///
/// # Hierarchy
///
/// Nodes form a tree through parent-child relationships kept in sync by
/// [`Scene`](super::Scene). Visibility gates the node and its whole subtree.
#[derive(Debug)]
pub struct Node {
    pub name: Cow<'static, str>,

    pub(crate) parent: Option<NodeKey>,
    pub(crate) children: Vec<NodeKey>,

    pub transform: Transform,
    pub visible: bool,
    pub role: NodeRole,
}

impl Node {
    /// A visible group node with identity transform.
    #[must_use]
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self::with_role(name, NodeRole::Group)
    }

    #[must_use]
    pub fn with_role(name: impl Into<Cow<'static, str>>, role: NodeRole) -> Self {
        Self {
            name: name.into(),
            parent: None,
            children: Vec::new(),
            transform: Transform::new(),
            visible: true,
            role,
        }
    }

    #[must_use]
    pub fn graphic(name: impl Into<Cow<'static, str>>, graphic: Graphic) -> Self {
        Self::with_role(name, NodeRole::Graphic(graphic))
    }

    #[must_use]
    pub fn light(name: impl Into<Cow<'static, str>>, light: Light) -> Self {
        Self::with_role(name, NodeRole::Light(light))
    }

    #[must_use]
    pub fn hook(name: impl Into<Cow<'static, str>>, hook: impl FrameHook + 'static) -> Self {
        Self::with_role(name, NodeRole::Hook(Box::new(hook)))
    }

    #[must_use]
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    #[must_use]
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeKey> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeKey] {
        &self.children
    }

    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Affine3A {
        &self.transform.world_matrix
    }

    #[must_use]
    pub fn as_graphic(&self) -> Option<&Graphic> {
        match &self.role {
            NodeRole::Graphic(g) => Some(g),
            _ => None,
        }
    }

    pub fn as_graphic_mut(&mut self) -> Option<&mut Graphic> {
        match &mut self.role {
            NodeRole::Graphic(g) => Some(g),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_light(&self) -> Option<&Light> {
        match &self.role {
            NodeRole::Light(l) => Some(l),
            _ => None,
        }
    }
}
