//! Structural containers: kind-filtered views and qualified names
//!
//! Views are computed from the slots on every call and never cached, so they
//! always reflect the current tree.

use super::data::NodeData;
use super::kind::{KindGroup, NodeKind, Slot};
use super::tree::{Dom, NodeId};
use crate::error::Result;
use crate::semantic::metadata_name;

impl Dom {
    // ========================================================================
    // Filtered views
    // ========================================================================

    /// Children of `slot` with the given kind
    pub fn children_of_kind(&self, id: NodeId, slot: Slot, kind: NodeKind) -> Vec<NodeId> {
        self.children(id, slot)
            .iter()
            .copied()
            .filter(|c| self.kind(*c) == Some(kind))
            .collect()
    }

    /// Namespaces, types and usings of a root or namespace
    pub fn stem_members(&self, id: NodeId) -> &[NodeId] {
        self.children(id, Slot::StemMembers)
    }

    pub fn usings(&self, id: NodeId) -> Vec<NodeId> {
        self.children_of_kind(id, Slot::StemMembers, NodeKind::Using)
    }

    /// Namespaces declared directly in a root or namespace
    pub fn child_namespaces(&self, id: NodeId) -> Vec<NodeId> {
        self.children_of_kind(id, Slot::StemMembers, NodeKind::Namespace)
    }

    /// All namespaces below a root or namespace, pre-order
    pub fn descendant_namespaces(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        for ns in self.child_namespaces(id) {
            out.push(ns);
            out.extend(self.descendant_namespaces(ns));
        }
        out
    }

    /// Namespaces below `id` holding at least one non-namespace member
    pub fn non_empty_namespaces(&self, id: NodeId) -> Vec<NodeId> {
        self.descendant_namespaces(id)
            .into_iter()
            .filter(|ns| {
                self.stem_members(*ns)
                    .iter()
                    .any(|m| self.kind(*m) != Some(NodeKind::Namespace))
            })
            .collect()
    }

    /// Detach every stem member of a root or namespace
    pub fn clear_stem_members(&mut self, id: NodeId) -> Result<Vec<NodeId>> {
        self.clear(id, Slot::StemMembers)
    }

    /// Type members, or stem members for roots and namespaces
    pub fn members(&self, id: NodeId) -> &[NodeId] {
        match self.kind(id) {
            Some(kind) if kind.is_stem_container() => self.stem_members(id),
            _ => self.children(id, Slot::Members),
        }
    }

    fn members_of_kind(&self, id: NodeId, kind: NodeKind) -> Vec<NodeId> {
        self.members(id)
            .iter()
            .copied()
            .filter(|c| self.kind(*c) == Some(kind))
            .collect()
    }

    pub fn classes(&self, id: NodeId) -> Vec<NodeId> {
        self.members_of_kind(id, NodeKind::Class)
    }

    pub fn structures(&self, id: NodeId) -> Vec<NodeId> {
        self.members_of_kind(id, NodeKind::Structure)
    }

    pub fn interfaces(&self, id: NodeId) -> Vec<NodeId> {
        self.members_of_kind(id, NodeKind::Interface)
    }

    pub fn enums(&self, id: NodeId) -> Vec<NodeId> {
        self.members_of_kind(id, NodeKind::Enum)
    }

    /// Classes, structs, interfaces and enums declared directly in `id`
    pub fn types(&self, id: NodeId) -> Vec<NodeId> {
        self.members(id)
            .iter()
            .copied()
            .filter(|c| self.kind(*c).is_some_and(NodeKind::is_type))
            .collect()
    }

    pub fn methods(&self, id: NodeId) -> Vec<NodeId> {
        self.members_of_kind(id, NodeKind::Method)
    }

    pub fn properties(&self, id: NodeId) -> Vec<NodeId> {
        self.members_of_kind(id, NodeKind::Property)
    }

    pub fn fields(&self, id: NodeId) -> Vec<NodeId> {
        self.members_of_kind(id, NodeKind::Field)
    }

    pub fn events(&self, id: NodeId) -> Vec<NodeId> {
        self.members_of_kind(id, NodeKind::Event)
    }

    pub fn constructors(&self, id: NodeId) -> Vec<NodeId> {
        self.members_of_kind(id, NodeKind::Constructor)
    }

    pub fn type_parameters(&self, id: NodeId) -> &[NodeId] {
        self.children(id, Slot::TypeParameters)
    }

    pub fn base_types(&self, id: NodeId) -> &[NodeId] {
        self.children(id, Slot::BaseTypes)
    }

    pub fn parameters(&self, id: NodeId) -> &[NodeId] {
        self.children(id, Slot::Parameters)
    }

    pub fn attributes(&self, id: NodeId) -> &[NodeId] {
        self.children(id, Slot::Attributes)
    }

    pub fn statements(&self, id: NodeId) -> &[NodeId] {
        self.children(id, Slot::Statements)
    }

    // ------------------------------------------------------------------------
    // Root aggregates: the root plus every namespace below it
    // ------------------------------------------------------------------------

    fn stem_scopes(&self) -> Vec<NodeId> {
        let root = self.root();
        std::iter::once(root)
            .chain(self.descendant_namespaces(root))
            .collect()
    }

    fn root_types_of_kind(&self, kind: NodeKind) -> Vec<NodeId> {
        self.stem_scopes()
            .into_iter()
            .flat_map(|scope| self.children_of_kind(scope, Slot::StemMembers, kind))
            .collect()
    }

    pub fn root_classes(&self) -> Vec<NodeId> {
        self.root_types_of_kind(NodeKind::Class)
    }

    pub fn root_structures(&self) -> Vec<NodeId> {
        self.root_types_of_kind(NodeKind::Structure)
    }

    pub fn root_interfaces(&self) -> Vec<NodeId> {
        self.root_types_of_kind(NodeKind::Interface)
    }

    pub fn root_enums(&self) -> Vec<NodeId> {
        self.root_types_of_kind(NodeKind::Enum)
    }

    /// Top-level types of every kind, in scope order
    pub fn root_types(&self) -> Vec<NodeId> {
        self.stem_scopes()
            .into_iter()
            .flat_map(|scope| self.types(scope))
            .collect()
    }

    // ========================================================================
    // Names
    // ========================================================================

    /// Nearest ancestor class, struct, interface or enum
    pub fn containing_type(&self, id: NodeId) -> Option<NodeId> {
        self.ancestors(id)
            .find(|a| self.kind(*a).is_some_and(NodeKind::is_type))
    }

    /// Nearest ancestor namespace
    pub fn containing_namespace(&self, id: NodeId) -> Option<NodeId> {
        self.ancestors(id)
            .find(|a| self.kind(*a) == Some(NodeKind::Namespace))
    }

    /// Dotted name from the outermost namespace down to the node.
    ///
    /// Defined for namespaces, types, type members, accessors and enum
    /// values; `None` for anything else.
    pub fn qualified_name(&self, id: NodeId) -> Option<String> {
        let kind = self.kind(id)?;
        if !has_qualified_name(kind) {
            return None;
        }
        let name = self.name(id)?;
        let parent = self
            .ancestors(id)
            .find(|a| self.kind(*a).is_some_and(has_qualified_name));
        Some(match parent.and_then(|p| self.qualified_name(p)) {
            Some(prefix) => format!("{prefix}.{name}"),
            None => name.to_string(),
        })
    }

    /// Names of the enclosing types and the node itself, without the
    /// namespace: nested types are joined with `+`, a member hangs off its
    /// type with `.` (`Outer+Inner.field`)
    pub fn outer_name(&self, id: NodeId) -> Option<String> {
        let kind = self.kind(id)?;
        if !has_qualified_name(kind) {
            return None;
        }
        let name = self.name(id)?;
        if kind == NodeKind::Namespace {
            return Some(name.to_string());
        }
        let separator = if kind.is_type() { '+' } else { '.' };
        Some(match self.containing_type(id).and_then(|t| self.outer_name(t)) {
            Some(prefix) => format!("{prefix}{separator}{name}"),
            None => name.to_string(),
        })
    }

    /// Qualified name of the namespace the node lives in; empty at top level.
    ///
    /// For a namespace declared with a dotted name, the leading segments
    /// count as its namespace.
    pub fn namespace(&self, id: NodeId) -> String {
        if self.kind(id) == Some(NodeKind::Namespace) {
            return self
                .qualified_name(id)
                .and_then(|q| q.rsplit_once('.').map(|(ns, _)| ns.to_string()))
                .unwrap_or_default();
        }
        self.containing_namespace(id)
            .and_then(|ns| self.qualified_name(ns))
            .unwrap_or_default()
    }

    /// Name as emitted in metadata: ``Name`N`` for generic types and
    /// methods, `.ctor`/`.cctor` for constructors
    pub fn metadata_name(&self, id: NodeId) -> Option<String> {
        let node = self.get(id)?;
        match node.data() {
            NodeData::Constructor(ctor) => Some(
                if ctor.decl.modifiers.is_static { ".cctor" } else { ".ctor" }.to_string(),
            ),
            data if node.kind().has_slot(Slot::TypeParameters) => Some(
                metadata_name(data.name()?, self.type_parameters(id).len()).to_string(),
            ),
            data => data.name().map(str::to_string),
        }
    }

    /// CLR-style full name: namespace, then types joined with `+`, e.g.
    /// ``A.B.Outer`1+Inner``
    pub fn metadata_qualified_name(&self, id: NodeId) -> Option<String> {
        let kind = self.kind(id)?;
        if !has_qualified_name(kind) {
            return None;
        }
        let own = self.metadata_name(id)?;
        if kind == NodeKind::Namespace {
            return self.qualified_name(id);
        }
        let (prefix, separator) = match self.containing_type(id) {
            Some(outer) if kind.is_type() => (self.metadata_qualified_name(outer), "+"),
            Some(outer) => (self.metadata_qualified_name(outer), "."),
            None => {
                let ns = self.namespace(id);
                ((!ns.is_empty()).then_some(ns), ".")
            }
        };
        Some(match prefix {
            Some(prefix) => format!("{prefix}{separator}{own}"),
            None => own,
        })
    }
}

fn has_qualified_name(kind: NodeKind) -> bool {
    kind == NodeKind::Namespace
        || kind.is_type()
        || kind.group() == KindGroup::TypeMember
        || kind == NodeKind::EnumValue
}

#[cfg(test)]
mod tests {
    use super::*;

    /// `namespace Namespace1 { class MyClass { class MyNestedClass { class MyNestedNestedClass {} } } }`
    fn nested_dom() -> (Dom, Vec<NodeId>) {
        let mut dom = Dom::new();
        let root = dom.root();
        let ns = dom.create(NodeData::namespace("Namespace1"));
        dom.add_or_move(root, Slot::StemMembers, ns).unwrap();
        let mut ids = vec![ns];
        let mut owner = ns;
        for name in ["MyClass", "MyNestedClass", "MyNestedNestedClass"] {
            let class = dom.create(NodeData::class(name));
            let slot = if owner == ns { Slot::StemMembers } else { Slot::Members };
            dom.add_or_move(owner, slot, class).unwrap();
            ids.push(class);
            owner = class;
        }
        (dom, ids)
    }

    #[test]
    fn test_nested_qualified_name() {
        let (dom, ids) = nested_dom();
        assert_eq!(
            dom.qualified_name(ids[3]).as_deref(),
            Some("Namespace1.MyClass.MyNestedClass.MyNestedNestedClass")
        );
        assert_eq!(
            dom.outer_name(ids[3]).as_deref(),
            Some("MyClass+MyNestedClass+MyNestedNestedClass")
        );
        assert_eq!(dom.namespace(ids[3]), "Namespace1");
        assert_eq!(
            dom.metadata_qualified_name(ids[3]).as_deref(),
            Some("Namespace1.MyClass+MyNestedClass+MyNestedNestedClass")
        );
    }

    #[test]
    fn test_dotted_namespace_segments() {
        let mut dom = Dom::new();
        let root = dom.root();
        let outer = dom.create(NodeData::namespace("Company"));
        let inner = dom.create(NodeData::namespace("Product.Core"));
        let class = dom.create(NodeData::class("Widget"));
        dom.add_or_move(root, Slot::StemMembers, outer).unwrap();
        dom.add_or_move(outer, Slot::StemMembers, inner).unwrap();
        dom.add_or_move(inner, Slot::StemMembers, class).unwrap();

        assert_eq!(dom.qualified_name(inner).as_deref(), Some("Company.Product.Core"));
        assert_eq!(dom.namespace(inner), "Company.Product");
        assert_eq!(dom.namespace(class), "Company.Product.Core");
        assert_eq!(dom.namespace(outer), "");
    }

    #[test]
    fn test_generic_metadata_names() {
        let mut dom = Dom::new();
        let class = dom.create(NodeData::class("Repo"));
        for t in ["TKey", "TValue"] {
            let tp = dom.create(NodeData::type_parameter(t));
            dom.add_or_move(class, Slot::TypeParameters, tp).unwrap();
        }
        let ctor = dom.create(NodeData::constructor("Repo"));
        dom.add_or_move(class, Slot::Members, ctor).unwrap();

        assert_eq!(dom.metadata_name(class).as_deref(), Some("Repo`2"));
        assert_eq!(dom.metadata_name(ctor).as_deref(), Some(".ctor"));
        assert_eq!(dom.metadata_qualified_name(ctor).as_deref(), Some("Repo`2..ctor"));
    }

    #[test]
    fn test_root_aggregates() {
        let mut dom = Dom::new();
        let root = dom.root();
        let ns = dom.create(NodeData::namespace("N"));
        dom.add_or_move(root, Slot::StemMembers, ns).unwrap();
        let kinds = [
            NodeData::class("C"),
            NodeData::structure("S"),
            NodeData::enumeration("E"),
            NodeData::interface("I"),
        ];
        for data in kinds {
            let id = dom.create(data);
            dom.add_or_move(ns, Slot::StemMembers, id).unwrap();
        }
        let top = dom.create(NodeData::class("Top"));
        dom.add_or_move(root, Slot::StemMembers, top).unwrap();

        assert_eq!(dom.root_classes().len(), 2);
        assert_eq!(dom.root_structures().len(), 1);
        assert_eq!(dom.root_enums().len(), 1);
        assert_eq!(dom.root_interfaces().len(), 1);
        assert_eq!(dom.stem_members(ns).len(), 4);
        assert_eq!(dom.non_empty_namespaces(root), vec![ns]);

        dom.clear_stem_members(ns).unwrap();
        assert!(dom.stem_members(ns).is_empty());
        assert!(dom.non_empty_namespaces(root).is_empty());
    }

    #[test]
    fn test_type_views_filter_members() {
        let mut dom = Dom::new();
        let class = dom.create(NodeData::class("C"));
        let members = [
            NodeData::field("a"),
            NodeData::method("M"),
            NodeData::property("P"),
            NodeData::field("b"),
            NodeData::class("Nested"),
        ];
        for data in members {
            let id = dom.create(data);
            dom.add_or_move(class, Slot::Members, id).unwrap();
        }
        assert_eq!(dom.fields(class).len(), 2);
        assert_eq!(dom.methods(class).len(), 1);
        assert_eq!(dom.properties(class).len(), 1);
        assert_eq!(dom.classes(class).len(), 1);
        assert_eq!(dom.members(class).len(), 5);
    }

    #[test]
    fn test_statements_have_no_qualified_name() {
        let mut dom = Dom::new();
        let block = dom.create(NodeData::Block);
        assert_eq!(dom.qualified_name(block), None);
        assert_eq!(dom.namespace(block), "");
    }
}
