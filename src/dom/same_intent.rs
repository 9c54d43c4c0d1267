//! Structural equivalence ("same intent")
//!
//! Two subtrees have the same intent when their kinds and scalars agree and
//! their children match slot by slot. Formatting, documentation and raw
//! handles never matter; annotations matter unless skipped. Members,
//! attributes and accessors match by kind and name in any order; every other
//! slot matches position by position.

use super::kind::Slot;
use super::tree::{Dom, NodeId};

/// Compare `a` in `left` with `b` in `right`
pub fn same_intent(left: &Dom, a: NodeId, right: &Dom, b: NodeId, skip_annotations: bool) -> bool {
    let (Some(l), Some(r)) = (left.get(a), right.get(b)) else {
        return false;
    };
    if l.kind() != r.kind() || !l.data().same_intent(r.data()) {
        return false;
    }
    if !skip_annotations && !same_annotations(left, a, right, b) {
        return false;
    }
    l.kind().slots().iter().all(|slot| {
        let lc = l.children(*slot);
        let rc = r.children(*slot);
        if lc.len() != rc.len() {
            return false;
        }
        if is_unordered(*slot) {
            match_by_name(left, lc, right, rc, skip_annotations)
        } else {
            lc.iter()
                .zip(rc)
                .all(|(x, y)| same_intent(left, *x, right, *y, skip_annotations))
        }
    })
}

fn is_unordered(slot: Slot) -> bool {
    matches!(
        slot,
        Slot::StemMembers | Slot::Members | Slot::Attributes | Slot::Accessors
    )
}

/// Pair each left child with the first unused right child of the same kind
/// and name; unnamed children pair with the child at the same position
fn match_by_name(left: &Dom, lc: &[NodeId], right: &Dom, rc: &[NodeId], skip: bool) -> bool {
    let mut used = vec![false; rc.len()];
    for (i, l) in lc.iter().enumerate() {
        let kind = left.kind(*l);
        let name = left.name(*l);
        let found = if name.is_some() {
            rc.iter().enumerate().position(|(j, r)| {
                !used[j]
                    && right.kind(*r) == kind
                    && right.name(*r) == name
                    && same_intent(left, *l, right, *r, skip)
            })
        } else {
            (!used[i] && same_intent(left, *l, right, rc[i], skip)).then_some(i)
        };
        match found {
            Some(j) => used[j] = true,
            None => return false,
        }
    }
    true
}

fn same_annotations(left: &Dom, a: NodeId, right: &Dom, b: NodeId) -> bool {
    let la = left.annotations(a);
    let ra = right.annotations(b);
    la.len() == ra.len() && la.iter().all(|x| ra.contains(x)) && ra.iter().all(|x| la.contains(x))
}

impl Dom {
    /// Whether two nodes of this document have the same intent
    pub fn same_intent(&self, a: NodeId, b: NodeId, skip_annotations: bool) -> bool {
        same_intent(self, a, self, b, skip_annotations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{NodeData, PublicAnnotation};

    fn class(dom: &mut Dom, name: &str, members: &[&str]) -> NodeId {
        let class = dom.create(NodeData::class(name));
        for m in members {
            let method = dom.create(NodeData::method(*m));
            dom.add_or_move(class, Slot::Members, method).unwrap();
        }
        class
    }

    #[test]
    fn test_reflexive_and_copy() {
        let mut dom = Dom::new();
        let a = class(&mut dom, "A", &["M", "N"]);
        assert!(dom.same_intent(a, a, false));
        let copy = dom.copy(a).unwrap();
        assert!(dom.same_intent(a, copy, false));
    }

    #[test]
    fn test_rename_breaks_and_revert_restores() {
        let mut dom = Dom::new();
        let a = class(&mut dom, "A", &["M"]);
        let copy = dom.copy(a).unwrap();
        let method = dom.methods(copy)[0];
        dom.set_name(method, "Other").unwrap();
        assert!(!dom.same_intent(a, copy, false));
        dom.set_name(method, "M").unwrap();
        assert!(dom.same_intent(a, copy, false));
    }

    #[test]
    fn test_member_order_does_not_matter() {
        let mut dom = Dom::new();
        let a = class(&mut dom, "A", &["M", "N"]);
        let b = class(&mut dom, "A", &["N", "M"]);
        assert!(dom.same_intent(a, b, false));
    }

    #[test]
    fn test_statement_order_matters() {
        let mut dom = Dom::new();
        let make = |dom: &mut Dom, first: &str, second: &str| {
            let block = dom.create(NodeData::Block);
            for text in [first, second] {
                let stmt = dom.create(NodeData::ExpressionStatement);
                let expr = dom.create(NodeData::expression(text));
                dom.add_or_move(stmt, Slot::Expression, expr).unwrap();
                dom.add_or_move(block, Slot::Statements, stmt).unwrap();
            }
            block
        };
        let a = make(&mut dom, "x++", "y++");
        let b = make(&mut dom, "y++", "x++");
        let c = make(&mut dom, "x ++", "y++");
        assert!(!dom.same_intent(a, b, false));
        assert!(dom.same_intent(a, c, false));
    }

    #[test]
    fn test_annotations_can_be_skipped() {
        let mut dom = Dom::new();
        let a = class(&mut dom, "A", &[]);
        let b = class(&mut dom, "A", &[]);
        dom.add_annotation(b, PublicAnnotation::new("Generated")).unwrap();
        assert!(!dom.same_intent(a, b, false));
        assert!(dom.same_intent(a, b, true));
    }

    #[test]
    fn test_different_kinds_are_not_same() {
        let mut dom = Dom::new();
        let a = dom.create(NodeData::class("A"));
        let b = dom.create(NodeData::structure("A"));
        assert!(!dom.same_intent(a, b, false));
    }

    #[test]
    fn test_child_count_mismatch() {
        let mut dom = Dom::new();
        let a = class(&mut dom, "A", &["M"]);
        let b = class(&mut dom, "A", &["M", "N"]);
        assert!(!dom.same_intent(a, b, false));
    }

    #[test]
    fn test_across_documents() {
        let mut left = Dom::new();
        let mut right = Dom::new();
        let a = class(&mut left, "A", &["M"]);
        let b = class(&mut right, "A", &["M"]);
        assert!(same_intent(&left, a, &right, b, false));
    }
}
