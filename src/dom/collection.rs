//! Ownership collections: ordered child slots with move semantics
//!
//! Every child of a node lives in exactly one slot of exactly one parent.
//! Attaching a node that already has a parent moves it: it is detached from
//! its old slot first, so it is never shared. These operations are the only
//! code that writes a node's parent link.

use super::kind::{NodeKind, Slot};
use super::tree::{Dom, NodeId};
use crate::error::{DomError, Result};
use crate::semantic::{
    Accessibility, DeclarationContext, Symbol, SymbolKind, default_accessibility,
};
use tracing::{error, trace};

impl Dom {
    // ========================================================================
    // Validation
    // ========================================================================

    /// Check that `item` may be attached to `slot` of `owner`
    fn check_attach(&self, owner: NodeId, slot: Slot, item: NodeId) -> Result<()> {
        let owner_kind = self.node(owner)?.kind();
        let Some(item_node) = self.get(item) else {
            return Err(logged(DomError::ownership(
                owner_kind,
                format!("{item:?} belongs to another document; copy it instead of moving it"),
            )));
        };
        let item_kind = item_node.kind();
        if item == self.root() {
            return Err(logged(DomError::ownership(
                owner_kind,
                "the document root cannot be attached",
            )));
        }
        if !owner_kind.has_slot(slot) {
            return Err(logged(DomError::incompatible(
                owner_kind,
                slot,
                item_kind,
                "the owner has no such slot",
            )));
        }
        if !slot.accepts(item_kind) {
            return Err(logged(DomError::incompatible(
                owner_kind,
                slot,
                item_kind,
                "the slot does not accept this kind",
            )));
        }
        if self.is_ancestor_or_self(item, owner) {
            return Err(logged(DomError::ownership(
                owner_kind,
                format!("attaching {item_kind:?} under {owner_kind:?} would create a cycle at {}", self.path(owner)),
            )));
        }
        Ok(())
    }

    /// Check `index` against the slot as it is without `item`
    fn check_index(&self, owner: NodeId, slot: Slot, item: NodeId, index: usize) -> Result<()> {
        let owner_kind = self.node(owner)?.kind();
        let children = self.children(owner, slot);
        let already_here = children.contains(&item);
        let len = children.len() - usize::from(already_here);
        if slot.is_single() && len > 0 {
            return Err(logged(DomError::incompatible(
                owner_kind,
                slot,
                self.node(item)?.kind(),
                "the single-valued slot is occupied",
            )));
        }
        if index > len {
            return Err(logged(DomError::InvalidIndex { slot, index, len }));
        }
        Ok(())
    }

    /// Human-readable path from the root to `id`, for error messages
    pub fn path(&self, id: NodeId) -> String {
        let mut segments: Vec<String> = std::iter::once(id)
            .chain(self.ancestors(id))
            .map(|n| match (self.kind(n), self.name(n)) {
                (Some(kind), Some(name)) => format!("{kind:?}({name})"),
                (Some(kind), None) => format!("{kind:?}"),
                (None, _) => "?".to_string(),
            })
            .collect();
        segments.reverse();
        segments.join("/")
    }

    // ========================================================================
    // Attach and detach
    // ========================================================================

    /// Unlink `item` from its parent; returns the slot and position it had
    pub fn detach(&mut self, item: NodeId) -> Result<Option<(NodeId, Slot, usize)>> {
        let Some((parent, slot)) = self.node(item)?.parent else {
            return Ok(None);
        };
        let parent_kind = self.node(parent)?.kind();
        let index = self
            .node_mut(parent)?
            .slot_mut(slot)
            .and_then(|siblings| {
                let index = siblings.iter().position(|c| *c == item)?;
                siblings.remove(index);
                Some(index)
            })
            .ok_or_else(|| {
                logged(DomError::ownership(
                    parent_kind,
                    format!("{item:?} is not a member of the {slot:?} slot its parent link names"),
                ))
            })?;
        self.node_mut(item)?.parent = None;
        self.set_dirty(parent, true)?;
        trace!("detached {:?} from {:?}.{:?}[{}]", item, parent, slot, index);
        Ok(Some((parent, slot, index)))
    }

    /// Attach without validation; callers have checked the slot and index
    fn attach(&mut self, owner: NodeId, slot: Slot, index: usize, item: NodeId) -> Result<()> {
        let owner_kind = self.node(owner)?.kind();
        let children = self.node_mut(owner)?.slot_mut(slot).ok_or_else(|| {
            logged(DomError::ownership(
                owner_kind,
                format!("{owner:?} has no {slot:?} slot"),
            ))
        })?;
        let index = index.min(children.len());
        children.insert(index, item);
        self.node_mut(item)?.parent = Some((owner, slot));
        self.settle_access(owner_kind, item)?;
        self.set_dirty(owner, true)?;
        trace!("attached {:?} to {:?}.{:?}[{}]", item, owner, slot, index);
        Ok(())
    }

    /// A declaration built in code takes the implicit access of the first
    /// place it is attached to, as it would when loaded from source there
    fn settle_access(&mut self, owner_kind: NodeKind, item: NodeId) -> Result<()> {
        let node = self.node(item)?;
        if node.raw().is_some() || node.symbol().is_some() {
            return Ok(());
        }
        let Some(decl) = node.data().decl() else {
            return Ok(());
        };
        let Some(kind) = symbol_kind(node.kind()) else {
            return Ok(());
        };
        if decl.access != Accessibility::NotApplicable {
            return Ok(());
        }
        let context = match owner_kind {
            NodeKind::Root | NodeKind::Namespace => DeclarationContext::TopLevel,
            NodeKind::Class | NodeKind::Structure => DeclarationContext::Type,
            NodeKind::Interface => DeclarationContext::Interface,
            NodeKind::Enum => DeclarationContext::Enum,
            _ => DeclarationContext::Member,
        };
        let access = default_accessibility(kind, context);
        if access == Accessibility::NotApplicable {
            return Ok(());
        }
        let name = decl.name.clone();
        let node = self.node_mut(item)?;
        if let Some(decl) = node.data.decl_mut() {
            decl.access = access;
        }
        node.symbol = Some(Symbol::new(name, kind).with_accessibility(access));
        Ok(())
    }

    // ========================================================================
    // Collection operations
    // ========================================================================

    /// Insert `item` at `index` of `owner`'s slot, moving it from wherever
    /// it currently lives.
    ///
    /// `index` counts positions in the slot without `item` itself.
    pub fn insert_or_move(&mut self, owner: NodeId, slot: Slot, index: usize, item: NodeId) -> Result<()> {
        self.check_attach(owner, slot, item)?;
        self.check_index(owner, slot, item, index)?;
        self.detach(item)?;
        self.attach(owner, slot, index, item)
    }

    /// Append `item` to `owner`'s slot, moving it if it has a parent
    pub fn add_or_move(&mut self, owner: NodeId, slot: Slot, item: NodeId) -> Result<()> {
        let children = self.children(owner, slot);
        let len = children.len() - usize::from(children.contains(&item));
        self.insert_or_move(owner, slot, len, item)
    }

    /// Insert `item` right before `anchor` in the anchor's slot
    pub fn insert_before(&mut self, anchor: NodeId, item: NodeId) -> Result<()> {
        self.insert_next_to(anchor, item, 0)
    }

    /// Insert `item` right after `anchor` in the anchor's slot
    pub fn insert_after(&mut self, anchor: NodeId, item: NodeId) -> Result<()> {
        self.insert_next_to(anchor, item, 1)
    }

    fn insert_next_to(&mut self, anchor: NodeId, item: NodeId, offset: usize) -> Result<()> {
        if anchor == item {
            return Ok(());
        }
        let anchor_node = self.node(anchor)?;
        let Some((owner, slot)) = anchor_node.parent else {
            return Err(logged(DomError::ownership(
                anchor_node.kind(),
                "the anchor is not a member of any collection",
            )));
        };
        let index = self
            .children(owner, slot)
            .iter()
            .filter(|c| **c != item)
            .position(|c| *c == anchor)
            .unwrap_or_default();
        self.insert_or_move(owner, slot, index + offset, item)
    }

    /// Remove `item` from `owner`'s slot; `false` if it is not a member
    pub fn remove(&mut self, owner: NodeId, slot: Slot, item: NodeId) -> Result<bool> {
        self.node(owner)?;
        if self.get(item).and_then(|n| n.parent) != Some((owner, slot)) {
            return Ok(false);
        }
        Ok(self.detach(item)?.is_some())
    }

    /// Put `new` where `old` is and detach `old`
    pub fn replace(&mut self, old: NodeId, new: NodeId) -> Result<()> {
        if old == new {
            return Ok(());
        }
        let old_node = self.node(old)?;
        let Some((owner, slot)) = old_node.parent else {
            return Err(logged(DomError::ownership(
                old_node.kind(),
                "only a member of a collection can be replaced",
            )));
        };
        self.check_attach(owner, slot, new)?;
        self.detach(new)?;
        let Some((_, _, index)) = self.detach(old)? else {
            return Ok(());
        };
        self.attach(owner, slot, index, new)
    }

    /// Detach every member of `owner`'s slot; returns the detached nodes
    pub fn clear(&mut self, owner: NodeId, slot: Slot) -> Result<Vec<NodeId>> {
        let removed = self
            .node_mut(owner)?
            .slot_mut(slot)
            .map(std::mem::take)
            .unwrap_or_default();
        for item in &removed {
            self.node_mut(*item)?.parent = None;
        }
        if !removed.is_empty() {
            self.set_dirty(owner, true)?;
        }
        trace!("cleared {} nodes from {:?}.{:?}", removed.len(), owner, slot);
        Ok(removed)
    }

    /// Set or empty a single-valued slot; returns the node it held before
    pub fn set_single(&mut self, owner: NodeId, slot: Slot, item: Option<NodeId>) -> Result<Option<NodeId>> {
        let previous = self.child(owner, slot);
        if previous.is_some() && previous == item {
            return Ok(previous);
        }
        if let Some(item) = item {
            self.check_attach(owner, slot, item)?;
        }
        self.clear(owner, slot)?;
        if let Some(item) = item {
            self.detach(item)?;
            self.attach(owner, slot, 0, item)?;
        }
        Ok(previous)
    }

    // ========================================================================
    // Views
    // ========================================================================

    /// Read view of one slot
    pub fn collection(&self, owner: NodeId, slot: Slot) -> Collection<'_> {
        Collection {
            items: self.children(owner, slot),
        }
    }

    /// Mutable view of one slot
    pub fn collection_mut(&mut self, owner: NodeId, slot: Slot) -> CollectionMut<'_> {
        CollectionMut {
            dom: self,
            owner,
            slot,
        }
    }
}

/// Symbol kind of the declarations whose access has a language default
fn symbol_kind(kind: NodeKind) -> Option<SymbolKind> {
    Some(match kind {
        NodeKind::Class => SymbolKind::Class,
        NodeKind::Structure => SymbolKind::Struct,
        NodeKind::Interface => SymbolKind::Interface,
        NodeKind::Enum => SymbolKind::Enum,
        NodeKind::Field => SymbolKind::Field,
        NodeKind::Event => SymbolKind::Event,
        NodeKind::Property => SymbolKind::Property,
        NodeKind::Method => SymbolKind::Method,
        NodeKind::Constructor => SymbolKind::Constructor,
        _ => return None,
    })
}

fn logged(err: DomError) -> DomError {
    error!("{err}");
    err
}

/// Read view over the members of one slot
#[derive(Debug, Clone, Copy)]
pub struct Collection<'a> {
    items: &'a [NodeId],
}

impl<'a> Collection<'a> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn first(&self) -> Option<NodeId> {
        self.items.first().copied()
    }

    pub fn last(&self) -> Option<NodeId> {
        self.items.last().copied()
    }

    pub fn get(&self, index: usize) -> Option<NodeId> {
        self.items.get(index).copied()
    }

    pub fn contains(&self, item: NodeId) -> bool {
        self.items.contains(&item)
    }

    pub fn index_of(&self, item: NodeId) -> Option<usize> {
        self.items.iter().position(|c| *c == item)
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeId> + 'a {
        self.items.iter().copied()
    }

    pub fn as_slice(&self) -> &'a [NodeId] {
        self.items
    }
}

/// Mutable view over one slot, bound to its owner
pub struct CollectionMut<'a> {
    dom: &'a mut Dom,
    owner: NodeId,
    slot: Slot,
}

impl CollectionMut<'_> {
    pub fn owner(&self) -> NodeId {
        self.owner
    }

    pub fn view(&self) -> Collection<'_> {
        self.dom.collection(self.owner, self.slot)
    }

    pub fn len(&self) -> usize {
        self.view().len()
    }

    pub fn is_empty(&self) -> bool {
        self.view().is_empty()
    }

    pub fn add_or_move(&mut self, item: NodeId) -> Result<()> {
        self.dom.add_or_move(self.owner, self.slot, item)
    }

    pub fn insert_or_move(&mut self, index: usize, item: NodeId) -> Result<()> {
        self.dom.insert_or_move(self.owner, self.slot, index, item)
    }

    pub fn insert_before(&mut self, anchor: NodeId, item: NodeId) -> Result<()> {
        self.check_member(anchor)?;
        self.dom.insert_before(anchor, item)
    }

    pub fn insert_after(&mut self, anchor: NodeId, item: NodeId) -> Result<()> {
        self.check_member(anchor)?;
        self.dom.insert_after(anchor, item)
    }

    pub fn remove(&mut self, item: NodeId) -> Result<bool> {
        self.dom.remove(self.owner, self.slot, item)
    }

    pub fn replace(&mut self, old: NodeId, new: NodeId) -> Result<()> {
        self.check_member(old)?;
        self.dom.replace(old, new)
    }

    pub fn clear(&mut self) -> Result<Vec<NodeId>> {
        self.dom.clear(self.owner, self.slot)
    }

    fn check_member(&self, item: NodeId) -> Result<()> {
        if self.view().contains(item) {
            return Ok(());
        }
        Err(logged(DomError::ownership(
            self.dom.node(self.owner)?.kind(),
            format!("{item:?} is not a member of {:?}", self.slot),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{NodeData, NodeKind};
    use rstest::rstest;

    fn class_with_methods(dom: &mut Dom, names: &[&str]) -> (NodeId, Vec<NodeId>) {
        let class = dom.create(NodeData::class("C"));
        let methods = names
            .iter()
            .map(|name| {
                let method = dom.create(NodeData::method(*name));
                dom.add_or_move(class, Slot::Members, method).unwrap();
                method
            })
            .collect();
        (class, methods)
    }

    fn names(dom: &Dom, owner: NodeId, slot: Slot) -> Vec<String> {
        dom.children(owner, slot)
            .iter()
            .map(|id| dom.name(*id).unwrap_or_default().to_string())
            .collect()
    }

    #[test]
    fn test_add_sets_parent() {
        let mut dom = Dom::new();
        let (class, methods) = class_with_methods(&mut dom, &["A", "B"]);
        assert_eq!(dom.parent(methods[0]), Some(class));
        assert_eq!(dom[methods[1]].parent_slot(), Some(Slot::Members));
        assert_eq!(dom.collection(class, Slot::Members).len(), 2);
    }

    #[test]
    fn test_move_between_collections() {
        let mut dom = Dom::new();
        let (a, methods) = class_with_methods(&mut dom, &["M1", "M2"]);
        let (b, _) = class_with_methods(&mut dom, &["N1"]);

        dom.add_or_move(b, Slot::Members, methods[0]).unwrap();

        assert_eq!(dom.collection(a, Slot::Members).len(), 1);
        assert_eq!(dom.collection(b, Slot::Members).len(), 2);
        assert_eq!(dom.parent(methods[0]), Some(b));
        assert_eq!(names(&dom, b, Slot::Members), ["N1", "M1"]);
    }

    #[rstest]
    #[case(0, &["C", "A", "B"])]
    #[case(1, &["A", "C", "B"])]
    #[case(2, &["A", "B", "C"])]
    fn test_reorder_within_collection(#[case] index: usize, #[case] expected: &[&str]) {
        let mut dom = Dom::new();
        let (class, methods) = class_with_methods(&mut dom, &["A", "B", "C"]);
        dom.insert_or_move(class, Slot::Members, index, methods[2]).unwrap();
        assert_eq!(names(&dom, class, Slot::Members), expected);
    }

    #[test]
    fn test_insert_before_and_after() {
        let mut dom = Dom::new();
        let (class, methods) = class_with_methods(&mut dom, &["A", "B"]);
        let x = dom.create(NodeData::method("X"));
        let y = dom.create(NodeData::method("Y"));
        dom.insert_before(methods[1], x).unwrap();
        dom.insert_after(methods[1], y).unwrap();
        assert_eq!(names(&dom, class, Slot::Members), ["A", "X", "B", "Y"]);
    }

    #[test]
    fn test_remove_detaches() {
        let mut dom = Dom::new();
        let (class, methods) = class_with_methods(&mut dom, &["A", "B"]);
        assert!(dom.remove(class, Slot::Members, methods[0]).unwrap());
        assert_eq!(dom.parent(methods[0]), None);
        assert!(!dom.remove(class, Slot::Members, methods[0]).unwrap());
        assert_eq!(names(&dom, class, Slot::Members), ["B"]);
    }

    #[test]
    fn test_clear_detaches_every_member() {
        let mut dom = Dom::new();
        let (class, methods) = class_with_methods(&mut dom, &["A", "B", "C"]);
        let removed = dom.clear(class, Slot::Members).unwrap();
        assert_eq!(removed, methods);
        assert!(methods.iter().all(|m| dom.parent(*m).is_none()));
        assert!(dom.collection(class, Slot::Members).is_empty());
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut dom = Dom::new();
        let (class, methods) = class_with_methods(&mut dom, &["A", "B", "C"]);
        let x = dom.create(NodeData::method("X"));
        dom.replace(methods[1], x).unwrap();
        assert_eq!(names(&dom, class, Slot::Members), ["A", "X", "C"]);
        assert_eq!(dom.parent(methods[1]), None);
        assert_eq!(dom.parent(x), Some(class));
    }

    #[test]
    fn test_wrong_kind_is_rejected() {
        let mut dom = Dom::new();
        let class = dom.create(NodeData::class("C"));
        let param = dom.create(NodeData::parameter("p"));
        let err = dom.add_or_move(class, Slot::Members, param).unwrap_err();
        assert!(matches!(err, DomError::IncompatibleChild { child: NodeKind::Parameter, .. }));
        let err = dom.add_or_move(class, Slot::Statements, param).unwrap_err();
        assert!(matches!(err, DomError::IncompatibleChild { .. }));
    }

    #[test]
    fn test_cycles_are_rejected() {
        let mut dom = Dom::new();
        let outer = dom.create(NodeData::class("Outer"));
        let inner = dom.create(NodeData::class("Inner"));
        dom.add_or_move(outer, Slot::Members, inner).unwrap();
        let err = dom.add_or_move(inner, Slot::Members, outer).unwrap_err();
        assert!(matches!(err, DomError::OwnershipViolation { .. }));
        let err = dom.add_or_move(outer, Slot::Members, outer).unwrap_err();
        assert!(matches!(err, DomError::OwnershipViolation { .. }));
    }

    #[test]
    fn test_foreign_nodes_are_rejected() {
        let mut a = Dom::new();
        let mut b = Dom::new();
        let class = a.create(NodeData::class("C"));
        let root = b.root();
        let err = b.add_or_move(root, Slot::StemMembers, class).unwrap_err();
        assert!(matches!(err, DomError::OwnershipViolation { .. }));
    }

    #[test]
    fn test_index_past_end() {
        let mut dom = Dom::new();
        let (class, _) = class_with_methods(&mut dom, &["A"]);
        let x = dom.create(NodeData::method("X"));
        let err = dom.insert_or_move(class, Slot::Members, 3, x).unwrap_err();
        assert!(matches!(err, DomError::InvalidIndex { index: 3, len: 1, .. }));
        assert_eq!(dom.parent(x), None);
    }

    #[test]
    fn test_single_slot() {
        let mut dom = Dom::new();
        let field = dom.create(NodeData::field("f"));
        let int = dom.create(NodeData::referenced_type("int"));
        let long = dom.create(NodeData::referenced_type("long"));
        dom.add_or_move(field, Slot::Type, int).unwrap();
        let err = dom.add_or_move(field, Slot::Type, long).unwrap_err();
        assert!(matches!(err, DomError::IncompatibleChild { .. }));

        let previous = dom.set_single(field, Slot::Type, Some(long)).unwrap();
        assert_eq!(previous, Some(int));
        assert_eq!(dom.child(field, Slot::Type), Some(long));
        assert_eq!(dom.parent(int), None);
    }

    #[test]
    fn test_collection_mut_view() {
        let mut dom = Dom::new();
        let method = dom.create(NodeData::method("M"));
        let params: Vec<_> = ["a", "b", "c"]
            .iter()
            .map(|n| dom.create(NodeData::parameter(*n)))
            .collect();
        let mut collection = dom.collection_mut(method, Slot::Parameters);
        for p in &params {
            collection.add_or_move(*p).unwrap();
        }
        assert!(collection.remove(params[1]).unwrap());
        assert_eq!(collection.len(), 2);
        let err = collection.insert_before(params[1], params[0]).unwrap_err();
        assert!(matches!(err, DomError::OwnershipViolation { .. }));

        let view = dom.collection(method, Slot::Parameters);
        assert_eq!(view.first(), Some(params[0]));
        assert_eq!(view.last(), Some(params[2]));
    }

    #[test]
    fn test_path_names_ancestors() {
        let mut dom = Dom::new();
        let (class, methods) = class_with_methods(&mut dom, &["Run"]);
        let root = dom.root();
        dom.add_or_move(root, Slot::StemMembers, class).unwrap();
        assert_eq!(dom.path(methods[0]), "Root(<root>)/Class(C)/Method(Run)");
    }
}
