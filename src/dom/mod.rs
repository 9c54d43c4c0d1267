//! # The document object model
//!
//! A mutable tree of C# program elements layered over the raw syntax tree.
//!
//! ## Structure
//!
//! - [`Dom`] - the arena owning every node of one document
//! - [`NodeKind`] / [`Slot`] - the closed node taxonomy and the child slots
//!   each kind owns
//! - [`NodeData`] - per-kind scalar payloads
//! - collections - ownership operations with move semantics
//! - containers - kind-filtered views and qualified names
//! - [`same_intent`] - structural equivalence
//! - copy - detached deep copies
//!
//! ## Ownership
//!
//! A node belongs to at most one slot of one parent. Attaching a node that
//! already has a parent moves it; nothing but the collection operations
//! writes a parent link.

mod annotation;
mod collection;
mod containers;
mod copy;
mod data;
mod kind;
mod report;
mod same_intent;
mod traits;
mod tree;

pub use annotation::{AnnotationValue, PublicAnnotation};
pub use collection::{Collection, CollectionMut};
pub use data::{
    AccessorData, AccessorKind, AssignmentData, AssignmentOperator, AttributeData,
    AttributeValueData, AttributeValueStyle, BodyData, CatchData, ConstructorData, DeclData,
    DeclarationData, EnumValueData, ExpressionData, ExpressionKind, LiteralKind, MethodData,
    Modifiers, NamespaceData, NodeData, OpaqueData, ParameterData, ParameterModifier,
    ReferencedTypeData, RootData, TypeParameterData, UsingData, Variance,
};
pub use kind::{KindGroup, NodeKind, Slot};
pub use report::{LoadReport, Passthrough};
pub use same_intent::same_intent;
pub use traits::{HasAccessModifier, HasAttachedDocumentation, HasModifiers};
pub use tree::{Dom, Node, NodeId};
