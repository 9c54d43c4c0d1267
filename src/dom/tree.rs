//! The node arena
//!
//! A [`Dom`] owns every node of one tree in a flat arena addressed by
//! [`NodeId`]. Parent links are back-references (ids), never ownership;
//! ownership is membership in a parent's slot. Detached nodes stay in the
//! arena until they are attached again.

use super::annotation::PublicAnnotation;
use super::data::NodeData;
use super::kind::{NodeKind, Slot};
use super::report::LoadReport;
use crate::error::{DomError, Result};
use crate::parser::SyntaxNode;
use crate::semantic::Symbol;
use std::ops::Index;
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::error;

static NEXT_TREE: AtomicU32 = AtomicU32::new(1);

/// Identity of a node: the tree it belongs to and its arena slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    tree: u32,
    index: u32,
}

impl NodeId {
    fn index(self) -> usize {
        self.index as usize
    }
}

/// One DOM node
#[derive(Debug, Clone)]
pub struct Node {
    pub(super) data: NodeData,
    pub(super) parent: Option<(NodeId, Slot)>,
    pub(super) slots: Vec<(Slot, Vec<NodeId>)>,
    pub(super) raw: Option<SyntaxNode>,
    pub(super) symbol: Option<Symbol>,
    pub(super) annotations: Vec<PublicAnnotation>,
    /// Changed since it was loaded or copied
    pub(super) dirty: bool,
}

impl Node {
    fn new(data: NodeData) -> Self {
        let slots = data
            .kind()
            .slots()
            .iter()
            .map(|slot| (*slot, Vec::new()))
            .collect();
        Self {
            data,
            parent: None,
            slots,
            raw: None,
            symbol: None,
            annotations: Vec::new(),
            dirty: false,
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.data.kind()
    }

    pub fn data(&self) -> &NodeData {
        &self.data
    }

    pub fn name(&self) -> Option<&str> {
        self.data.name()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent.map(|(id, _)| id)
    }

    /// Slot of the parent this node lives in
    pub fn parent_slot(&self) -> Option<Slot> {
        self.parent.map(|(_, slot)| slot)
    }

    /// Raw syntax the node was created from, if any
    pub fn raw(&self) -> Option<&SyntaxNode> {
        self.raw.as_ref()
    }

    pub fn symbol(&self) -> Option<&Symbol> {
        self.symbol.as_ref()
    }

    pub fn annotations(&self) -> &[PublicAnnotation] {
        &self.annotations
    }

    /// Children in `slot`; empty for slots this kind does not have
    pub fn children(&self, slot: Slot) -> &[NodeId] {
        self.slots
            .iter()
            .find(|(s, _)| *s == slot)
            .map(|(_, ids)| ids.as_slice())
            .unwrap_or(&[])
    }

    pub(super) fn slot_mut(&mut self, slot: Slot) -> Option<&mut Vec<NodeId>> {
        self.slots.iter_mut().find(|(s, _)| *s == slot).map(|(_, ids)| ids)
    }

    /// All children, slot by slot in source order
    pub fn all_children(&self) -> impl Iterator<Item = (Slot, NodeId)> + '_ {
        self.slots
            .iter()
            .flat_map(|(slot, ids)| ids.iter().map(move |id| (*slot, *id)))
    }
}

/// A mutable document: a root node and everything reachable from it
#[derive(Debug)]
pub struct Dom {
    tree: u32,
    pub(super) nodes: Vec<Node>,
    root: NodeId,
    report: LoadReport,
    newline: String,
}

impl Default for Dom {
    fn default() -> Self {
        Self::new()
    }
}

impl Dom {
    /// An empty document holding only its root
    pub fn new() -> Self {
        let tree = NEXT_TREE.fetch_add(1, Ordering::Relaxed);
        Self {
            tree,
            nodes: vec![Node::new(NodeData::Root(Default::default()))],
            root: NodeId { tree, index: 0 },
            report: LoadReport::default(),
            newline: "\n".to_string(),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Create a detached node
    pub fn create(&mut self, data: NodeData) -> NodeId {
        let id = NodeId {
            tree: self.tree,
            index: self.nodes.len() as u32,
        };
        self.nodes.push(Node::new(data));
        id
    }

    /// Whether `id` addresses a node of this document
    pub fn contains(&self, id: NodeId) -> bool {
        id.tree == self.tree && id.index() < self.nodes.len()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        if id.tree != self.tree {
            return None;
        }
        self.nodes.get(id.index())
    }

    /// The node for `id`, or an error for ids of other documents
    pub fn node(&self, id: NodeId) -> Result<&Node> {
        self.get(id).ok_or_else(|| self.unknown(id))
    }

    pub(super) fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        if id.tree != self.tree {
            return Err(self.unknown(id));
        }
        let len = self.nodes.len();
        self.nodes
            .get_mut(id.index())
            .ok_or_else(|| DomError::UnknownNode(format!("{id:?} (arena holds {len} nodes)")))
    }

    fn unknown(&self, id: NodeId) -> DomError {
        let err = if id.tree != self.tree {
            DomError::UnknownNode(format!("{id:?} belongs to another document"))
        } else {
            DomError::UnknownNode(format!("{id:?}"))
        };
        error!("{err}");
        err
    }

    /// Number of nodes in the arena, detached ones included
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.get(id).map(Node::kind)
    }

    pub fn data(&self, id: NodeId) -> Option<&NodeData> {
        self.get(id).map(Node::data)
    }

    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(Node::name)
    }

    /// The name without qualification: the last segment of a dotted
    /// namespace, the plain name of anything else
    pub fn simple_name(&self, id: NodeId) -> Option<&str> {
        match self.data(id)? {
            NodeData::Namespace(ns) => Some(ns.simple_name()),
            data => data.name(),
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(Node::parent)
    }

    pub fn children(&self, id: NodeId, slot: Slot) -> &[NodeId] {
        self.get(id).map(|n| n.children(slot)).unwrap_or(&[])
    }

    /// The child of a single-valued slot
    pub fn child(&self, id: NodeId, slot: Slot) -> Option<NodeId> {
        self.children(id, slot).first().copied()
    }

    /// Parent, grandparent, ... up to the root or a detached ancestor
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |current| self.parent(*current))
    }

    /// Whether `ancestor` is `id` or one of its ancestors
    pub fn is_ancestor_or_self(&self, ancestor: NodeId, id: NodeId) -> bool {
        ancestor == id || self.ancestors(id).any(|a| a == ancestor)
    }

    /// Whether the node hangs off this document's root
    pub fn is_attached(&self, id: NodeId) -> bool {
        self.is_ancestor_or_self(self.root, id)
    }

    /// All nodes below `id`, pre-order over slots in source order
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self
            .get(id)
            .map(|n| n.all_children().map(|(_, c)| c).collect())
            .unwrap_or_default();
        stack.reverse();
        while let Some(current) = stack.pop() {
            out.push(current);
            if let Some(node) = self.get(current) {
                let children: Vec<_> = node.all_children().map(|(_, c)| c).collect();
                stack.extend(children.into_iter().rev());
            }
        }
        out
    }

    /// Mutate a node's scalar state.
    ///
    /// The kind is fixed for a node's lifetime; a closure that replaces the
    /// payload with another kind is rolled back and reported.
    pub fn update<R>(&mut self, id: NodeId, f: impl FnOnce(&mut NodeData) -> R) -> Result<R> {
        let node = self.node_mut(id)?;
        let kind = node.kind();
        let before = node.data.clone();
        let result = f(&mut node.data);
        if node.kind() != kind {
            let changed_to = node.kind();
            node.data = before;
            let err = DomError::ownership(
                kind,
                format!("a node cannot change kind (attempted {changed_to:?})"),
            );
            error!("{err}");
            return Err(err);
        }
        if node.data != before {
            node.dirty = true;
        }
        Ok(result)
    }

    /// Rename a node; an error for kinds without a name.
    ///
    /// Names derived from this one follow: accessors of a property become
    /// `get_{name}`/`set_{name}`, and constructors of a type take its name.
    pub fn set_name(&mut self, id: NodeId, name: &str) -> Result<()> {
        if !self.update(id, |data| data.set_name(name))? {
            return Err(DomError::Unnamed(self.node(id)?.kind()));
        }
        let node = self.node(id)?;
        let dependents: Vec<NodeId> = match node.kind() {
            NodeKind::Property => node.children(Slot::Accessors).to_vec(),
            kind if kind.is_type_container() => node
                .children(Slot::Members)
                .iter()
                .copied()
                .filter(|m| self.kind(*m) == Some(NodeKind::Constructor))
                .collect(),
            _ => Vec::new(),
        };
        for dependent in dependents {
            self.update(dependent, |data| match data {
                NodeData::Accessor(accessor) => {
                    accessor.decl.name = accessor.kind.accessor_name(name);
                }
                NodeData::Constructor(ctor) => ctor.decl.name = name.into(),
                _ => {}
            })?;
        }
        Ok(())
    }

    pub fn annotations(&self, id: NodeId) -> &[PublicAnnotation] {
        self.get(id).map(Node::annotations).unwrap_or(&[])
    }

    pub fn add_annotation(&mut self, id: NodeId, annotation: PublicAnnotation) -> Result<()> {
        let node = self.node_mut(id)?;
        node.annotations.push(annotation);
        node.dirty = true;
        Ok(())
    }

    /// Remove every annotation named `name`; returns how many were removed
    pub fn remove_annotation(&mut self, id: NodeId, name: &str) -> Result<usize> {
        let node = self.node_mut(id)?;
        let before = node.annotations.len();
        node.annotations.retain(|a| a.name != name);
        let removed = before - node.annotations.len();
        node.dirty |= removed > 0;
        Ok(removed)
    }

    /// Diagnostics and passthrough constructs recorded while loading
    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    pub(crate) fn report_mut(&mut self) -> &mut LoadReport {
        &mut self.report
    }

    /// Line break used by the loaded source
    pub fn newline(&self) -> &str {
        &self.newline
    }

    pub(crate) fn set_newline(&mut self, newline: impl Into<String>) {
        self.newline = newline.into();
    }

    /// Attach the raw handles a factory resolved for a node
    pub(crate) fn initialize(
        &mut self,
        id: NodeId,
        raw: Option<SyntaxNode>,
        symbol: Option<Symbol>,
        annotations: Vec<PublicAnnotation>,
    ) -> Result<()> {
        let node = self.node_mut(id)?;
        node.raw = raw;
        node.symbol = symbol;
        node.annotations = annotations;
        Ok(())
    }

    /// Whether the node's own state or child list changed since loading
    pub fn is_dirty(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(|n| n.dirty)
    }

    pub(super) fn set_dirty(&mut self, id: NodeId, dirty: bool) -> Result<()> {
        self.node_mut(id)?.dirty = dirty;
        Ok(())
    }

    /// Forget all changes; the loader calls this once the tree is built
    pub(crate) fn mark_clean(&mut self) {
        for node in &mut self.nodes {
            node.dirty = false;
        }
    }

    /// Flag every node as edited so the next build patches each one
    #[cfg(test)]
    pub(crate) fn touch_all(&mut self) {
        for node in &mut self.nodes {
            node.dirty = true;
        }
    }

    /// Whether the subtree still matches its raw syntax exactly: every node
    /// has a raw handle and nothing below changed
    pub fn is_pristine(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(|node| {
            node.raw.is_some()
                && !node.dirty
                && node.all_children().all(|(_, child)| self.is_pristine(child))
        })
    }
}

impl Index<NodeId> for Dom {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        match self.get(id) {
            Some(node) => node,
            None => panic!("{id:?} does not belong to this document"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_dom_has_root() {
        let dom = Dom::new();
        assert_eq!(dom[dom.root()].kind(), NodeKind::Root);
        assert_eq!(dom.name(dom.root()), Some("<root>"));
        assert_eq!(dom.node_count(), 1);
    }

    #[test]
    fn test_created_nodes_are_detached() {
        let mut dom = Dom::new();
        let class = dom.create(NodeData::class("Foo"));
        assert_eq!(dom.parent(class), None);
        assert!(!dom.is_attached(class));
        assert!(dom[class].children(Slot::Members).is_empty());
        assert!(dom[class].children(Slot::Statements).is_empty());
    }

    #[test]
    fn test_ids_from_other_documents_are_rejected() {
        let mut a = Dom::new();
        let b = Dom::new();
        let class = a.create(NodeData::class("Foo"));
        assert!(!b.contains(class));
        assert!(matches!(b.node(class), Err(DomError::UnknownNode(_))));
    }

    #[test]
    fn test_update_cannot_change_kind() {
        let mut dom = Dom::new();
        let class = dom.create(NodeData::class("Foo"));
        let result = dom.update(class, |data| *data = NodeData::structure("Foo"));
        assert!(matches!(result, Err(DomError::OwnershipViolation { .. })));
        assert_eq!(dom[class].kind(), NodeKind::Class);

        dom.update(class, |data| data.set_name("Bar")).unwrap();
        assert_eq!(dom.name(class), Some("Bar"));
    }

    #[test]
    fn test_renaming_propagates_to_derived_names() {
        use crate::dom::AccessorKind;

        let mut dom = Dom::new();
        let property = dom.create(NodeData::property("Count"));
        let getter = dom.create(NodeData::accessor(AccessorKind::Get, "Count"));
        dom.add_or_move(property, Slot::Accessors, getter).unwrap();
        dom.set_name(property, "Total").unwrap();
        assert_eq!(dom.name(getter), Some("get_Total"));

        let class = dom.create(NodeData::class("Foo"));
        let ctor = dom.create(NodeData::constructor("Foo"));
        dom.add_or_move(class, Slot::Members, ctor).unwrap();
        dom.set_name(class, "Bar").unwrap();
        assert_eq!(dom.name(ctor), Some("Bar"));
    }

    #[test]
    fn test_changes_mark_nodes_dirty() {
        let mut dom = Dom::new();
        let class = dom.create(NodeData::class("Foo"));
        dom.update(class, |data| data.set_name("Foo")).unwrap();
        assert!(!dom.is_dirty(class));
        dom.set_name(class, "Bar").unwrap();
        assert!(dom.is_dirty(class));
        dom.mark_clean();
        assert!(!dom.is_dirty(class));
        dom.add_annotation(class, PublicAnnotation::new("Tag")).unwrap();
        assert!(dom.is_dirty(class));
        // no raw handle, so never pristine
        assert!(!dom.is_pristine(class));
    }

    #[test]
    fn test_set_name_on_unnamed_kind_fails() {
        let mut dom = Dom::new();
        let block = dom.create(NodeData::Block);
        assert!(dom.set_name(block, "x").is_err());
    }
}
