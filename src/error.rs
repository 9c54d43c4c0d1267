//! Error types for DOM operations.

use crate::dom::{KindGroup, NodeKind, Slot};
use crate::parser::SyntaxKind;
use thiserror::Error;

/// Errors that can occur while loading, mutating or building a DOM.
#[derive(Debug, Error)]
pub enum DomError {
    /// A mutation would break the single-parent invariant or the tree shape.
    #[error("Ownership violation on {kind:?}: {message}")]
    OwnershipViolation { kind: NodeKind, message: String },

    /// A node cannot live in the requested slot.
    #[error("{child:?} cannot be placed in {slot:?} of {owner:?}: {message}")]
    IncompatibleChild {
        owner: NodeKind,
        slot: Slot,
        child: NodeKind,
        message: String,
    },

    /// The id does not belong to this DOM.
    #[error("Unknown node: {0}")]
    UnknownNode(String),

    /// A rename of a node kind that has no name.
    #[error("{0:?} nodes have no name")]
    Unnamed(NodeKind),

    /// An edit of a capability the node kind does not have.
    #[error("{kind:?} nodes have no {capability}")]
    MissingCapability {
        kind: NodeKind,
        capability: &'static str,
    },

    /// An insertion position past the end of a collection.
    #[error("Index {index} out of range for {slot:?} of length {len}")]
    InvalidIndex { slot: Slot, index: usize, len: usize },

    /// No factory accepts a raw node, or no builder accepts a DOM node.
    #[error("Unsupported {group:?} construct {kind}: {text}")]
    UnsupportedConstruct {
        group: KindGroup,
        kind: String,
        text: String,
    },

    /// A builder ran against a node missing a required child.
    #[error("{kind:?} is missing its {missing} at {path}")]
    StructuralIncompleteness {
        kind: NodeKind,
        missing: &'static str,
        path: String,
    },

    /// Source text that does not parse.
    #[error("Syntax error: {0}")]
    Syntax(String),

    /// IO error during load or save.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DomError {
    /// Create an ownership violation error.
    pub fn ownership(kind: NodeKind, message: impl Into<String>) -> Self {
        Self::OwnershipViolation {
            kind,
            message: message.into(),
        }
    }

    /// Create an incompatible child error.
    pub fn incompatible(owner: NodeKind, slot: Slot, child: NodeKind, message: impl Into<String>) -> Self {
        Self::IncompatibleChild {
            owner,
            slot,
            child,
            message: message.into(),
        }
    }

    /// Create a missing capability error.
    pub fn missing_capability(kind: NodeKind, capability: &'static str) -> Self {
        Self::MissingCapability { kind, capability }
    }

    /// Create an unsupported construct error for a raw node.
    pub fn unsupported_syntax(group: KindGroup, kind: SyntaxKind, text: impl Into<String>) -> Self {
        Self::UnsupportedConstruct {
            group,
            kind: format!("{kind:?}"),
            text: text.into(),
        }
    }

    /// Create an unsupported construct error for a DOM node.
    pub fn unsupported_node(group: KindGroup, kind: NodeKind) -> Self {
        Self::UnsupportedConstruct {
            group,
            kind: format!("{kind:?}"),
            text: String::new(),
        }
    }

    /// Create a structural incompleteness error.
    pub fn incomplete(kind: NodeKind, missing: &'static str, path: impl Into<String>) -> Self {
        Self::StructuralIncompleteness {
            kind,
            missing,
            path: path.into(),
        }
    }

    /// Create a syntax error.
    pub fn syntax(message: impl Into<String>) -> Self {
        Self::Syntax(message.into())
    }
}

/// Result alias for DOM operations.
pub type Result<T> = std::result::Result<T, DomError>;
