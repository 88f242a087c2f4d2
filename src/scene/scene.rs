//! Scene graph arena.
//!
//! Nodes live in a [`SlotMap`] and reference each other by [`NodeKey`]. A
//! scene always has a root group node; every other node hangs below it.

use glam::Affine3A;
use log::warn;
use slotmap::SlotMap;

use crate::scene::NodeKey;
use crate::scene::node::Node;

pub struct Scene {
    nodes: SlotMap<NodeKey, Node>,
    root: NodeKey,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(Node::new("Scene"));
        Self { nodes, root }
    }

    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeKey {
        self.root
    }

    /// Number of nodes, root included.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when only the root is left.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Adds `node` under the root.
    pub fn add(&mut self, node: Node) -> NodeKey {
        self.add_child(self.root, node)
    }

    /// Adds `node` under `parent`, or under the root when `parent` is gone.
    pub fn add_child(&mut self, parent: NodeKey, mut node: Node) -> NodeKey {
        let parent = if self.nodes.contains_key(parent) {
            parent
        } else {
            warn!("add_child: parent not found, attaching to root");
            self.root
        };
        node.parent = Some(parent);
        node.children.clear();
        let key = self.nodes.insert(node);
        self.nodes[parent].children.push(key);
        key
    }

    /// Moves `child` (with its subtree) under `parent`.
    ///
    /// Moving the root, moving a node below itself or its own descendants,
    /// and unknown keys are refused with a warning.
    pub fn attach(&mut self, child: NodeKey, parent: NodeKey) {
        if child == self.root {
            warn!("Cannot attach the scene root");
            return;
        }
        if !self.nodes.contains_key(child) || !self.nodes.contains_key(parent) {
            warn!("attach: node not found");
            return;
        }
        if self.is_ancestor_or_self(child, parent) {
            warn!("Cannot attach node below itself");
            return;
        }

        self.detach_from_parent(child);
        self.nodes[parent].children.push(child);
        let node = &mut self.nodes[child];
        node.parent = Some(parent);
        node.transform.mark_dirty();
    }

    /// Removes `key` and its whole subtree. The root cannot be removed.
    pub fn remove(&mut self, key: NodeKey) -> bool {
        if key == self.root || !self.nodes.contains_key(key) {
            return false;
        }
        self.detach_from_parent(key);

        let mut stack = vec![key];
        while let Some(k) = stack.pop() {
            if let Some(node) = self.nodes.remove(k) {
                stack.extend(node.children);
            }
        }
        true
    }

    #[inline]
    #[must_use]
    pub fn node(&self, key: NodeKey) -> Option<&Node> {
        self.nodes.get(key)
    }

    #[inline]
    pub fn node_mut(&mut self, key: NodeKey) -> Option<&mut Node> {
        self.nodes.get_mut(key)
    }

    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<NodeKey> {
        self.nodes
            .iter()
            .find_map(|(k, n)| (n.name == name).then_some(k))
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeKey, &Node)> {
        self.nodes.iter()
    }

    /// Recomputes world matrices depth-first from the root, rebuilding only
    /// the branches whose local transform (or an ancestor's) changed.
    pub fn update_matrix_world(&mut self) {
        let mut stack: Vec<(NodeKey, Affine3A, bool)> = Vec::with_capacity(64);
        stack.push((self.root, Affine3A::IDENTITY, false));

        while let Some((key, parent_world, parent_changed)) = stack.pop() {
            let Some(node) = self.nodes.get_mut(key) else {
                continue;
            };

            let local_changed = node.transform.update_local_matrix();
            let world_changed = local_changed || parent_changed;
            if world_changed {
                let world = parent_world * *node.transform.local_matrix();
                node.transform.set_world_matrix(world);
            }

            let world = node.transform.world_matrix;
            for &child in node.children.iter().rev() {
                stack.push((child, world, world_changed));
            }
        }
    }

    fn detach_from_parent(&mut self, key: NodeKey) {
        let parent = self.nodes.get(key).and_then(|n| n.parent);
        if let Some(p) = parent
            && let Some(parent) = self.nodes.get_mut(p)
            && let Some(i) = parent.children.iter().position(|&x| x == key)
        {
            parent.children.remove(i);
        }
    }

    fn is_ancestor_or_self(&self, ancestor: NodeKey, mut key: NodeKey) -> bool {
        loop {
            if key == ancestor {
                return true;
            }
            match self.nodes.get(key).and_then(|n| n.parent) {
                Some(p) => key = p,
                None => return false,
            }
        }
    }
}
