//! # Factory registry
//!
//! The [`Corporation`] maps raw syntax to DOM nodes and DOM nodes back to raw
//! syntax. Every [`NodeFactory`] belongs to one [`KindGroup`] and declares
//! what it accepts in both directions.
//!
//! ## Parse direction
//!
//! A raw child is created for a slot by the factories of the slot's group
//! (members also consult the stem-member factories, for nested types). The
//! first factory whose [`NodeFactory::can_create_from`] accepts the raw node
//! creates it. A construct no factory accepts becomes an opaque passthrough
//! node or an [`UnsupportedConstruct`](crate::DomError::UnsupportedConstruct)
//! error, depending on [`UnsupportedPolicy`].
//!
//! ## Build direction
//!
//! Groups are tried in [`KindGroup::BUILD_ORDER`]; the first factory whose
//! [`NodeFactory::can_build`] accepts the node's kind rebuilds it. Subtrees
//! that did not change since loading reuse their raw green node unchanged,
//! which is what makes `build(load(text)) == text` hold.
//!
//! ## Structure
//!
//! - `context` - parse and build state handed to factories
//! - `green` - green-tree splicing helpers
//! - `parts` - declaration parts shared by several builders
//! - `stem`, `members`, `statements`, `expressions`, `misc` - the factories

mod context;
mod expressions;
mod green;
mod members;
mod misc;
mod parts;
mod statements;
mod stem;

#[cfg(test)]
mod tests;

pub use context::{BuildContext, ParseContext};
pub use green::Built;

use crate::dom::{KindGroup, NodeData, NodeId, NodeKind, OpaqueData, Passthrough, Slot};
use crate::error::{DomError, Result};
use crate::options::UnsupportedPolicy;
use crate::parser::{GreenNode, SyntaxNode};
use tracing::{error, trace, warn};

/// Creates DOM nodes from raw syntax and rebuilds raw syntax from them
pub trait NodeFactory {
    /// The capability group this factory is registered under
    fn group(&self) -> KindGroup;

    /// Whether this factory models the raw node
    fn can_create_from(&self, raw: &SyntaxNode) -> bool;

    /// Create the DOM node(s) for a raw node, children included.
    ///
    /// Multi-declarator fields and locals create one node per declarator.
    fn create(&self, raw: &SyntaxNode, ctx: &mut ParseContext<'_>) -> Result<Vec<NodeId>>;

    /// Whether this factory rebuilds nodes of `kind`
    fn can_build(&self, kind: NodeKind) -> bool;

    /// Rebuild the raw node for a DOM node from its current state
    fn build(&self, id: NodeId, ctx: &BuildContext<'_>) -> Result<GreenNode>;

    /// Rebuild one raw node standing for several sibling DOM nodes, such as
    /// the fields of `int a, b;`
    fn build_group(&self, ids: &[NodeId], ctx: &BuildContext<'_>) -> Result<GreenNode> {
        match ids {
            [id] => self.build(*id, ctx),
            _ => Err(DomError::unsupported_node(
                self.group(),
                ids.first()
                    .and_then(|id| ctx.dom.kind(*id))
                    .unwrap_or(NodeKind::Opaque),
            )),
        }
    }
}

/// The registry of factories
pub struct Corporation {
    factories: Vec<Box<dyn NodeFactory>>,
}

impl Default for Corporation {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl std::fmt::Debug for Corporation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Corporation")
            .field("factories", &self.factories.len())
            .finish()
    }
}

impl Corporation {
    /// A registry without factories
    pub fn empty() -> Self {
        Self {
            factories: Vec::new(),
        }
    }

    /// A registry with a factory for every modeled construct
    pub fn with_defaults() -> Self {
        let mut corp = Self::empty();
        corp.register(stem::RootFactory);
        corp.register(stem::NamespaceFactory);
        corp.register(stem::UsingFactory);
        corp.register(stem::TypeFactory);
        corp.register(stem::EnumFactory);
        corp.register(members::VariableFactory);
        corp.register(members::PropertyFactory);
        corp.register(members::AccessorFactory);
        corp.register(members::MethodFactory);
        corp.register(members::ConstructorFactory);
        corp.register(statements::BlockFactory);
        corp.register(statements::LocalFactory);
        corp.register(statements::ExpressionStatementFactory);
        corp.register(statements::JumpFactory);
        corp.register(statements::ConditionalFactory);
        corp.register(statements::LoopFactory);
        corp.register(statements::TryFactory);
        corp.register(expressions::ExpressionFactory);
        corp.register(misc::TypeReferenceFactory);
        corp.register(misc::ParameterFactory);
        corp.register(misc::TypeParameterFactory);
        corp.register(misc::AttributeFactory);
        corp.register(misc::AttributeValueFactory);
        corp.register(misc::EnumValueFactory);
        corp.register(misc::OpaqueFactory);
        corp
    }

    /// Add a factory; earlier registrations win within a group
    pub fn register(&mut self, factory: impl NodeFactory + 'static) {
        self.factories.push(Box::new(factory));
    }

    fn in_group(&self, group: KindGroup) -> impl Iterator<Item = &dyn NodeFactory> {
        self.factories
            .iter()
            .map(|f| f.as_ref())
            .filter(move |f| f.group() == group)
    }

    /// Groups consulted for the raw children of a slot
    fn groups_for(slot: Slot) -> &'static [KindGroup] {
        match slot {
            Slot::Members => &[KindGroup::TypeMember, KindGroup::StemMember],
            Slot::StemMembers => &[KindGroup::StemMember],
            Slot::Accessors => &[KindGroup::TypeMember],
            Slot::Statements | Slot::Else | Slot::Variable | Slot::Catches | Slot::Finally => {
                &[KindGroup::Statement]
            }
            Slot::Initializer
            | Slot::Expression
            | Slot::Left
            | Slot::Condition
            | Slot::Incrementors => &[KindGroup::Expression],
            _ => &[KindGroup::Misc],
        }
    }

    // ------------------------------------------------------------------------
    // Parse direction
    // ------------------------------------------------------------------------

    /// Create the DOM node(s) a raw child of `slot` stands for
    pub fn create(&self, slot: Slot, raw: &SyntaxNode, ctx: &mut ParseContext<'_>) -> Result<Vec<NodeId>> {
        for group in Self::groups_for(slot) {
            let Some(factory) = self.in_group(*group).find(|f| f.can_create_from(raw)) else {
                continue;
            };
            let ids = factory.create(raw, ctx)?;
            if !ids.is_empty()
                && ids
                    .iter()
                    .all(|id| ctx.dom.kind(*id).is_some_and(|kind| slot.accepts(kind)))
            {
                return Ok(ids);
            }
        }
        self.passthrough(slot, raw, ctx)
    }

    /// Fill the document root from a parsed compilation unit
    pub fn create_root(&self, raw: &SyntaxNode, ctx: &mut ParseContext<'_>) -> Result<NodeId> {
        let Some(factory) = self.in_group(KindGroup::Root).find(|f| f.can_create_from(raw)) else {
            let err = DomError::unsupported_syntax(KindGroup::Root, raw.kind(), "");
            error!("{err}");
            return Err(err);
        };
        factory
            .create(raw, ctx)?
            .into_iter()
            .next()
            .ok_or_else(|| DomError::unsupported_syntax(KindGroup::Root, raw.kind(), ""))
    }

    /// Keep a construct no factory models as an opaque node, or fail
    fn passthrough(&self, slot: Slot, raw: &SyntaxNode, ctx: &mut ParseContext<'_>) -> Result<Vec<NodeId>> {
        let group = slot.group();
        if !slot.accepts(NodeKind::Opaque) || ctx.options().unsupported == UnsupportedPolicy::Fail {
            let err = DomError::unsupported_syntax(group, raw.kind(), raw.to_string().trim());
            error!("{err}");
            return Err(err);
        }
        warn!(
            "keeping unsupported {:?} at {:?} as an opaque {:?} node",
            raw.kind(),
            raw.text_range(),
            group
        );
        let data = NodeData::Opaque(OpaqueData {
            group,
            syntax: raw.kind(),
            text: raw.to_string(),
        });
        let id = ctx.node(data, raw, None, None)?;
        ctx.dom.report_mut().unsupported.push(Passthrough {
            group,
            syntax: raw.kind(),
            range: raw.text_range(),
        });
        Ok(vec![id])
    }

    // ------------------------------------------------------------------------
    // Build direction
    // ------------------------------------------------------------------------

    fn builder_for(&self, kind: NodeKind) -> Result<&dyn NodeFactory> {
        KindGroup::BUILD_ORDER
            .iter()
            .find_map(|group| self.in_group(*group).find(|f| f.can_build(kind)))
            .ok_or_else(|| {
                let err = DomError::unsupported_node(kind.group(), kind);
                error!("{err}");
                err
            })
    }

    /// Rebuild the raw node of a DOM node with the first accepting builder
    pub fn build(&self, id: NodeId, ctx: &BuildContext<'_>) -> Result<GreenNode> {
        let kind = ctx.dom.node(id)?.kind();
        let green = self.builder_for(kind)?.build(id, ctx)?;
        trace!("built {:?} {:?}", kind, id);
        Ok(green)
    }

    /// Rebuild one raw node for a run of sibling declarators
    pub fn build_group(&self, ids: &[NodeId], ctx: &BuildContext<'_>) -> Result<GreenNode> {
        let Some(first) = ids.first() else {
            return Err(DomError::syntax("empty declarator group"));
        };
        let kind = ctx.dom.node(*first)?.kind();
        self.builder_for(kind)?.build_group(ids, ctx)
    }
}
