//! Deep copies of subtrees
//!
//! A copy duplicates payloads, annotations and raw handles, then rebuilds
//! every owned slot from copies of the children. The result is detached and
//! shares no mutable state with the original. Raw handles are immutable, so
//! sharing them is safe; an unchanged copy builds to the original text.

use super::annotation::PublicAnnotation;
use super::data::NodeData;
use super::kind::Slot;
use super::tree::{Dom, NodeId};
use crate::error::Result;
use crate::parser::SyntaxNode;
use crate::semantic::Symbol;
use tracing::trace;

/// A detached, document-independent image of a subtree
#[derive(Debug, Clone)]
struct Snapshot {
    data: NodeData,
    raw: Option<SyntaxNode>,
    symbol: Option<Symbol>,
    annotations: Vec<PublicAnnotation>,
    dirty: bool,
    slots: Vec<(Slot, Vec<Snapshot>)>,
}

impl Snapshot {
    fn take(dom: &Dom, id: NodeId) -> Result<Self> {
        let node = dom.node(id)?;
        let mut slots = Vec::new();
        for (slot, children) in &node.slots {
            let copies = children
                .iter()
                .map(|child| Snapshot::take(dom, *child))
                .collect::<Result<Vec<_>>>()?;
            slots.push((*slot, copies));
        }
        Ok(Self {
            data: node.data.clone(),
            raw: node.raw.clone(),
            symbol: node.symbol.clone(),
            annotations: node.annotations.clone(),
            dirty: node.dirty,
            slots,
        })
    }

    fn graft(self, dom: &mut Dom) -> Result<NodeId> {
        let id = dom.create(self.data);
        dom.initialize(id, self.raw, self.symbol, self.annotations)?;
        for (slot, children) in self.slots {
            for child in children {
                let child = child.graft(dom)?;
                dom.add_or_move(id, slot, child)?;
            }
        }
        dom.set_dirty(id, self.dirty)?;
        Ok(id)
    }
}

impl Dom {
    /// Deep-copy a subtree of this document; the copy starts detached
    pub fn copy(&mut self, id: NodeId) -> Result<NodeId> {
        let snapshot = Snapshot::take(self, id)?;
        let copy = snapshot.graft(self)?;
        trace!("copied {:?} to {:?}", id, copy);
        Ok(copy)
    }

    /// Deep-copy a subtree of `other` into this document
    pub fn copy_from(&mut self, other: &Dom, id: NodeId) -> Result<NodeId> {
        let snapshot = Snapshot::take(other, id)?;
        let copy = snapshot.graft(self)?;
        trace!("copied {:?} from another document to {:?}", id, copy);
        Ok(copy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{AnnotationValue, NodeKind};

    fn class_with_members(dom: &mut Dom) -> NodeId {
        let class = dom.create(NodeData::class("Widget"));
        for name in ["Open", "Close"] {
            let method = dom.create(NodeData::method(name));
            dom.add_or_move(class, Slot::Members, method).unwrap();
        }
        let tp = dom.create(NodeData::type_parameter("T"));
        dom.add_or_move(class, Slot::TypeParameters, tp).unwrap();
        dom.add_annotation(
            class,
            PublicAnnotation::new("Tag").with_value("level", AnnotationValue::Integer(2)),
        )
        .unwrap();
        class
    }

    #[test]
    fn test_copy_is_detached_and_complete() {
        let mut dom = Dom::new();
        let class = class_with_members(&mut dom);
        let root = dom.root();
        dom.add_or_move(root, Slot::StemMembers, class).unwrap();

        let copy = dom.copy(class).unwrap();
        assert_ne!(copy, class);
        assert_eq!(dom.parent(copy), None);
        assert_eq!(dom.kind(copy), Some(NodeKind::Class));
        assert_eq!(dom.methods(copy).len(), 2);
        assert_eq!(dom.annotations(copy), dom.annotations(class));
        for method in dom.methods(copy) {
            assert_eq!(dom.parent(method), Some(copy));
        }
    }

    #[test]
    fn test_copy_is_independent() {
        let mut dom = Dom::new();
        let class = class_with_members(&mut dom);
        let copy = dom.copy(class).unwrap();

        dom.set_name(copy, "Gadget").unwrap();
        let first = dom.methods(copy)[0];
        dom.remove(copy, Slot::Members, first).unwrap();

        assert_eq!(dom.name(class), Some("Widget"));
        assert_eq!(dom.methods(class).len(), 2);
        assert_eq!(dom.methods(copy).len(), 1);
    }

    #[test]
    fn test_copy_across_documents() {
        let mut source = Dom::new();
        let class = class_with_members(&mut source);
        let mut target = Dom::new();
        let copy = target.copy_from(&source, class).unwrap();
        let root = target.root();
        target.add_or_move(root, Slot::StemMembers, copy).unwrap();
        assert_eq!(target.root_classes(), vec![copy]);
        assert_eq!(target.type_parameters(copy).len(), 1);
    }
}
