//! Capability traits shared across node payloads
//!
//! Payloads implement the small interfaces that apply to them; the [`Dom`]
//! helpers at the bottom dispatch to them by id.

use super::data::{DeclData, EnumValueData, Modifiers, NodeData};
use super::kind::Slot;
use super::tree::{Dom, NodeId};
use crate::error::{DomError, Result};
use crate::semantic::Accessibility;

pub trait HasAccessModifier {
    fn access(&self) -> Accessibility;
    fn set_access(&mut self, access: Accessibility);
}

pub trait HasModifiers {
    fn modifiers(&self) -> &Modifiers;
    fn modifiers_mut(&mut self) -> &mut Modifiers;
}

/// The `///` documentation attached to a declaration
pub trait HasAttachedDocumentation {
    fn documentation(&self) -> Option<&str>;
    fn set_documentation(&mut self, text: Option<String>);
}

impl HasAccessModifier for DeclData {
    fn access(&self) -> Accessibility {
        self.access
    }

    fn set_access(&mut self, access: Accessibility) {
        self.access = access;
    }
}

impl HasModifiers for DeclData {
    fn modifiers(&self) -> &Modifiers {
        &self.modifiers
    }

    fn modifiers_mut(&mut self) -> &mut Modifiers {
        &mut self.modifiers
    }
}

impl HasAttachedDocumentation for DeclData {
    fn documentation(&self) -> Option<&str> {
        self.documentation.as_deref()
    }

    fn set_documentation(&mut self, text: Option<String>) {
        self.documentation = text;
    }
}

impl HasAttachedDocumentation for EnumValueData {
    fn documentation(&self) -> Option<&str> {
        self.documentation.as_deref()
    }

    fn set_documentation(&mut self, text: Option<String>) {
        self.documentation = text;
    }
}

impl NodeData {
    pub fn as_access(&self) -> Option<&dyn HasAccessModifier> {
        self.decl().map(|d| d as &dyn HasAccessModifier)
    }

    pub fn as_access_mut(&mut self) -> Option<&mut dyn HasAccessModifier> {
        self.decl_mut().map(|d| d as &mut dyn HasAccessModifier)
    }

    pub fn as_modifiers_mut(&mut self) -> Option<&mut dyn HasModifiers> {
        self.decl_mut().map(|d| d as &mut dyn HasModifiers)
    }

    pub fn as_documented_mut(&mut self) -> Option<&mut dyn HasAttachedDocumentation> {
        match self {
            NodeData::EnumValue(v) => Some(v as &mut dyn HasAttachedDocumentation),
            _ => self.decl_mut().map(|d| d as &mut dyn HasAttachedDocumentation),
        }
    }
}

impl Dom {
    pub fn access(&self, id: NodeId) -> Option<Accessibility> {
        self.data(id)?.as_access().map(|a| a.access())
    }

    pub fn set_access(&mut self, id: NodeId, access: Accessibility) -> Result<()> {
        let kind = self.node(id)?.kind();
        self.update(id, |data| data.as_access_mut().map(|a| a.set_access(access)))?
            .ok_or_else(|| DomError::missing_capability(kind, "access modifier"))
    }

    pub fn modifiers(&self, id: NodeId) -> Option<Modifiers> {
        self.data(id)?.decl().map(|d| d.modifiers)
    }

    /// Edit the non-access modifiers of a declaration
    pub fn update_modifiers(&mut self, id: NodeId, f: impl FnOnce(&mut Modifiers)) -> Result<()> {
        let kind = self.node(id)?.kind();
        self.update(id, |data| data.as_modifiers_mut().map(|m| f(m.modifiers_mut())))?
            .ok_or_else(|| DomError::missing_capability(kind, "modifiers"))
    }

    pub fn documentation(&self, id: NodeId) -> Option<&str> {
        self.data(id)?.documentation()
    }

    pub fn set_documentation(&mut self, id: NodeId, text: Option<String>) -> Result<()> {
        let kind = self.node(id)?.kind();
        self.update(id, |data| data.as_documented_mut().map(|d| d.set_documentation(text)))?
            .ok_or_else(|| DomError::missing_capability(kind, "attached documentation"))
    }

    /// Whether the node can carry attributes
    pub fn has_attributes(&self, id: NodeId) -> bool {
        self.kind(id).is_some_and(|k| k.has_slot(Slot::Attributes))
    }

    pub fn is_loop(&self, id: NodeId) -> bool {
        self.kind(id).is_some_and(|k| k.is_loop())
    }

    pub fn is_statement_container(&self, id: NodeId) -> bool {
        self.kind(id).is_some_and(|k| k.is_statement_container())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_through_dom() {
        let mut dom = Dom::new();
        let method = dom.create(NodeData::method("Run"));
        assert_eq!(dom.access(method), Some(Accessibility::NotApplicable));
        dom.set_access(method, Accessibility::Public).unwrap();
        assert_eq!(dom.access(method), Some(Accessibility::Public));

        let block = dom.create(NodeData::Block);
        assert_eq!(dom.access(block), None);
        assert!(dom.set_access(block, Accessibility::Public).is_err());
    }

    #[test]
    fn test_modifiers_and_documentation() {
        let mut dom = Dom::new();
        let field = dom.create(NodeData::field("count"));
        dom.update_modifiers(field, |m| m.is_static = true).unwrap();
        assert!(dom.modifiers(field).is_some_and(|m| m.is_static));

        dom.set_documentation(field, Some("The count".into())).unwrap();
        assert_eq!(dom.documentation(field), Some("The count"));

        let value = dom.create(NodeData::enum_value("Red"));
        dom.set_documentation(value, Some("Warm".into())).unwrap();
        assert_eq!(dom.documentation(value), Some("Warm"));
    }

    #[test]
    fn test_capability_predicates() {
        let mut dom = Dom::new();
        let for_loop = dom.create(NodeData::For(Default::default()));
        let class = dom.create(NodeData::class("C"));
        assert!(dom.is_loop(for_loop));
        assert!(dom.is_statement_container(for_loop));
        assert!(dom.has_attributes(class));
        assert!(!dom.is_statement_container(class));
    }
}
