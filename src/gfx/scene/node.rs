//! # Scene Graph
//!
//! [`SceneGraph`] is an arena that owns every [`Node`] of a scene. Nodes refer
//! to their parent and children through [`NodeId`] handles, so the
//! parent/child relation is stored in exactly one place and cannot dangle.
//!
//! A node has at most one parent. [`SceneGraph::add_child`] detaches the
//! child from its previous parent before appending it, which keeps every
//! parent's child list consistent with its children's parent handles.

use std::any::Any;

use thiserror::Error;

use super::component::Components;

/// Generational handle to a node stored in a [`SceneGraph`].
///
/// A handle stays invalid after its node is destroyed, even if the slot is reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SceneError {
    #[error("node {0:?} does not exist in this scene graph")]
    UnknownNode(NodeId),
    #[error("node {0:?} cannot be attached to itself")]
    SelfParent(NodeId),
    #[error("node {child:?} is an ancestor of {parent:?}, attaching it would create a cycle")]
    Cycle { parent: NodeId, child: NodeId },
}

/// A node of the objects-tree of a scene.
///
/// Outside of a [`SceneGraph`] a node is a plain component container; this is
/// how the camera rigs and [`Model`](crate::gfx::geometry::Model) use it.
#[derive(Debug, Default)]
pub struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    components: Components,
}

impl Node {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn add_component<T: Any>(&mut self, component: T) {
        self.components.add(component);
    }

    /// Builder-style [`Node::add_component`].
    pub fn with_component<T: Any>(mut self, component: T) -> Self {
        self.add_component(component);
        self
    }

    /// First component of kind `T`, if any.
    pub fn component<T: Any>(&self) -> Option<&T> {
        self.components.get::<T>()
    }

    pub fn component_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.components.get_mut::<T>()
    }

    /// All components of kind `T` in insertion order.
    pub fn components<T: Any>(&self) -> impl Iterator<Item = &T> + '_ {
        self.components.iter::<T>()
    }

    pub fn components_mut<T: Any>(&mut self) -> impl Iterator<Item = &mut T> + '_ {
        self.components.iter_mut::<T>()
    }

    pub fn has_component<T: Any>(&self) -> bool {
        self.components.contains::<T>()
    }

    /// Removes and returns the first component of kind `T`.
    pub fn take_component<T: Any>(&mut self) -> Option<T> {
        self.components.take::<T>()
    }

    pub fn remove_components_of_type<T: Any>(&mut self) -> Vec<T> {
        self.components.remove_all::<T>()
    }

    /// Removes the components of kind `T` rejected by `keep`.
    pub fn retain_components<T: Any>(&mut self, keep: impl FnMut(&T) -> bool) {
        self.components.retain::<T>(keep);
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Arena owning a forest of [`Node`]s.
#[derive(Debug, Default)]
pub struct SceneGraph {
    slots: Vec<Slot>,
    free: Vec<u32>,
    len: usize,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a detached, component-less node.
    pub fn create_node(&mut self) -> NodeId {
        self.insert(Node::new())
    }

    /// Adopts a standalone node as a new root.
    ///
    /// Any parent or child handles the node carries are cleared; they could
    /// only refer to another graph.
    pub fn insert(&mut self, mut node: Node) -> NodeId {
        node.parent = None;
        node.children.clear();
        self.len += 1;

        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            return NodeId {
                index,
                generation: slot.generation,
            };
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });
        NodeId {
            index,
            generation: 0,
        }
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.slots
            .get(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_ref())
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots
            .get_mut(id.index as usize)
            .filter(|slot| slot.generation == id.generation)
            .and_then(|slot| slot.node.as_mut())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(Node::parent)
    }

    /// Children of `id`, or an empty slice for an unknown id.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(Node::children).unwrap_or(&[])
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Appends `child` as the last child of `parent`, detaching it from its
    /// current parent first.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), SceneError> {
        if !self.contains(parent) {
            return Err(SceneError::UnknownNode(parent));
        }
        if !self.contains(child) {
            return Err(SceneError::UnknownNode(child));
        }
        if parent == child {
            return Err(SceneError::SelfParent(child));
        }
        if self.is_ancestor(child, parent) {
            return Err(SceneError::Cycle { parent, child });
        }

        if let Some(previous) = self.parent(child) {
            self.remove_child(previous, child);
        }

        if let Some(node) = self.node_mut(parent) {
            node.children.push(child);
        }
        if let Some(node) = self.node_mut(child) {
            node.parent = Some(parent);
        }
        log::debug!("attached {child:?} to {parent:?}");
        Ok(())
    }

    /// Detaches `child` from `parent`. Does nothing if it is not a child of `parent`.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) {
        let Some(node) = self.node_mut(parent) else {
            return;
        };
        let Some(position) = node.children.iter().position(|&id| id == child) else {
            return;
        };
        node.children.remove(position);
        if let Some(node) = self.node_mut(child) {
            node.parent = None;
        }
    }

    /// Detaches `id` from its parent and drops it together with its whole subtree.
    ///
    /// Returns the number of nodes destroyed.
    pub fn destroy(&mut self, id: NodeId) -> usize {
        if !self.contains(id) {
            return 0;
        }
        if let Some(parent) = self.parent(id) {
            self.remove_child(parent, id);
        }

        let doomed = self.linearize(id);
        for &node_id in &doomed {
            let slot = &mut self.slots[node_id.index as usize];
            slot.node = None;
            slot.generation = slot.generation.wrapping_add(1);
            self.free.push(node_id.index);
        }
        self.len -= doomed.len();
        doomed.len()
    }

    /// Depth-first walk of the subtree rooted at `root`.
    ///
    /// `before` runs on a node before any of its children are visited and
    /// `after` runs once all of them have been. Pass `|_, _| {}` for a hook you
    /// don't need.
    pub fn traverse<B, A>(&self, root: NodeId, mut before: B, mut after: A)
    where
        B: FnMut(NodeId, &Node),
        A: FnMut(NodeId, &Node),
    {
        self.visit(root, &mut before, &mut after);
    }

    fn visit<B, A>(&self, id: NodeId, before: &mut B, after: &mut A)
    where
        B: FnMut(NodeId, &Node),
        A: FnMut(NodeId, &Node),
    {
        let Some(node) = self.node(id) else {
            return;
        };
        before(id, node);
        for &child in &node.children {
            self.visit(child, before, after);
        }
        after(id, node);
    }

    /// Pre-order list of the subtree rooted at `root`.
    pub fn linearize(&self, root: NodeId) -> Vec<NodeId> {
        let mut ids = Vec::new();
        self.traverse(root, |id, _| ids.push(id), |_, _| {});
        ids
    }

    pub fn filter(&self, root: NodeId, mut predicate: impl FnMut(&Node) -> bool) -> Vec<NodeId> {
        let mut ids = Vec::new();
        self.traverse(
            root,
            |id, node| {
                if predicate(node) {
                    ids.push(id);
                }
            },
            |_, _| {},
        );
        ids
    }

    /// First node of the subtree, in pre-order, that satisfies `predicate`.
    pub fn find(&self, root: NodeId, mut predicate: impl FnMut(&Node) -> bool) -> Option<NodeId> {
        self.linearize(root)
            .into_iter()
            .find(|&id| self.node(id).is_some_and(&mut predicate))
    }

    pub fn map<T>(&self, root: NodeId, mut transform: impl FnMut(NodeId, &Node) -> T) -> Vec<T> {
        let mut values = Vec::new();
        self.traverse(root, |id, node| values.push(transform(id, node)), |_, _| {});
        values
    }

    /// Whether `ancestor` lies on the parent chain of `id`.
    fn is_ancestor(&self, ancestor: NodeId, id: NodeId) -> bool {
        let mut current = self.parent(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent(node);
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::scene::Transform;

    #[test]
    fn test_add_child_sets_parent() {
        let mut graph = SceneGraph::new();
        let a = graph.create_node();
        let b = graph.create_node();

        graph.add_child(a, b).unwrap();

        assert_eq!(graph.parent(b), Some(a));
        assert_eq!(graph.children(a), &[b]);
    }

    #[test]
    fn test_reparent_detaches_from_previous_parent() {
        let mut graph = SceneGraph::new();
        let a = graph.create_node();
        let b = graph.create_node();
        let c = graph.create_node();

        graph.add_child(c, b).unwrap();
        graph.add_child(a, b).unwrap();

        assert_eq!(graph.parent(b), Some(a));
        assert_eq!(graph.children(a), &[b]);
        assert!(graph.children(c).is_empty());
    }

    #[test]
    fn test_re_adding_same_child_keeps_it_once() {
        let mut graph = SceneGraph::new();
        let a = graph.create_node();
        let b = graph.create_node();
        let c = graph.create_node();

        graph.add_child(a, b).unwrap();
        graph.add_child(a, c).unwrap();
        graph.add_child(a, b).unwrap();

        // moved to the end, not duplicated
        assert_eq!(graph.children(a), &[c, b]);
    }

    #[test]
    fn test_cycles_are_rejected() {
        let mut graph = SceneGraph::new();
        let a = graph.create_node();
        let b = graph.create_node();
        let c = graph.create_node();
        graph.add_child(a, b).unwrap();
        graph.add_child(b, c).unwrap();

        assert_eq!(graph.add_child(c, a), Err(SceneError::Cycle { parent: c, child: a }));
        assert_eq!(graph.add_child(a, a), Err(SceneError::SelfParent(a)));
        assert_eq!(graph.parent(a), None);
    }

    #[test]
    fn test_remove_absent_child_is_noop() {
        let mut graph = SceneGraph::new();
        let a = graph.create_node();
        let b = graph.create_node();
        let c = graph.create_node();
        graph.add_child(c, b).unwrap();

        graph.remove_child(a, b);

        assert_eq!(graph.parent(b), Some(c));
        assert_eq!(graph.children(c), &[b]);
    }

    #[test]
    fn test_remove_child_clears_parent() {
        let mut graph = SceneGraph::new();
        let a = graph.create_node();
        let b = graph.create_node();
        graph.add_child(a, b).unwrap();

        graph.remove_child(a, b);

        assert_eq!(graph.parent(b), None);
        assert!(graph.children(a).is_empty());
    }

    #[test]
    fn test_traverse_orders_before_and_after() {
        //      root
        //     /    \
        //    l      r
        //    |
        //    ll
        let mut graph = SceneGraph::new();
        let root = graph.create_node();
        let l = graph.create_node();
        let r = graph.create_node();
        let ll = graph.create_node();
        graph.add_child(root, l).unwrap();
        graph.add_child(root, r).unwrap();
        graph.add_child(l, ll).unwrap();

        let mut before = Vec::new();
        let mut after = Vec::new();
        graph.traverse(root, |id, _| before.push(id), |id, _| after.push(id));

        assert_eq!(before, vec![root, l, ll, r]);
        assert_eq!(after, vec![ll, l, r, root]);
    }

    #[test]
    fn test_traverse_visits_every_node_once() {
        let mut graph = SceneGraph::new();
        let root = graph.create_node();
        let mut parent = root;
        for i in 0..20 {
            let node = graph.create_node();
            graph.add_child(parent, node).unwrap();
            if i % 3 == 0 {
                parent = node;
            }
        }

        let mut before = Vec::new();
        let mut after = Vec::new();
        graph.traverse(root, |id, _| before.push(id), |id, _| after.push(id));

        assert_eq!(before.len(), 21);
        assert_eq!(after.len(), 21);
        for &id in &before {
            assert_eq!(before.iter().filter(|&&x| x == id).count(), 1);
            if let Some(parent) = graph.parent(id) {
                let pos = |list: &[NodeId], id| list.iter().position(|&x| x == id).unwrap();
                assert!(pos(&before, parent) < pos(&before, id));
                assert!(pos(&after, id) < pos(&after, parent));
            }
        }
    }

    #[test]
    fn test_filter_find_and_map() {
        let mut graph = SceneGraph::new();
        let root = graph.create_node();
        let moved = graph.insert(Node::new().with_component(Transform::default()));
        let plain = graph.create_node();
        graph.add_child(root, moved).unwrap();
        graph.add_child(root, plain).unwrap();

        assert_eq!(graph.filter(root, |node| node.has_component::<Transform>()), vec![moved]);
        assert_eq!(graph.find(root, |node| node.has_component::<Transform>()), Some(moved));
        assert_eq!(graph.find(root, |node| node.component_count() > 5), None);
        assert_eq!(graph.map(root, |_, node| node.component_count()), vec![0, 1, 0]);
    }

    #[test]
    fn test_destroy_drops_subtree_and_invalidates_ids() {
        let mut graph = SceneGraph::new();
        let root = graph.create_node();
        let a = graph.create_node();
        let b = graph.create_node();
        graph.add_child(root, a).unwrap();
        graph.add_child(a, b).unwrap();

        assert_eq!(graph.destroy(a), 2);
        assert_eq!(graph.len(), 1);
        assert!(graph.children(root).is_empty());
        assert!(!graph.contains(b));

        // slot reuse must not resurrect old handles
        let fresh = graph.create_node();
        assert!(graph.contains(fresh));
        assert!(!graph.contains(a));
        assert_eq!(graph.add_child(root, a), Err(SceneError::UnknownNode(a)));
    }

    #[test]
    fn test_node_component_queries() {
        let mut node = Node::new();
        assert!(node.component::<Transform>().is_none());
        assert_eq!(node.components::<Transform>().count(), 0);

        node.add_component(Transform::default());
        if let Some(transform) = node.component_mut::<Transform>() {
            transform.scale.x = 4.0;
        }
        assert_eq!(node.component::<Transform>().map(|t| t.scale.x), Some(4.0));

        node.retain_components::<Transform>(|t| t.scale.x < 1.0);
        assert!(!node.has_component::<Transform>());
    }
}
