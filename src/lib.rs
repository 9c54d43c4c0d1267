//! # cs-dom
//!
//! A mutable, structurally comparable object model over a lossless C#
//! syntax tree.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! host      → Load/build facade
//!   ↓
//! factory   → Factory registry: raw syntax ⇄ DOM nodes
//!   ↓
//! dom       → Node arena, ownership collections, containers, same-intent
//!   ↓
//! semantic  → Symbol resolution: names, accessibility, metadata names
//!   ↓
//! parser    → Logos lexer, rowan CST, typed AST
//! ```
//!
//! ## Example
//!
//! ```
//! let text = "namespace N { class C { } }";
//! let dom = csdom::load(text).unwrap();
//! assert_eq!(csdom::build(&dom).unwrap(), text);
//! ```

// ============================================================================
// MODULES (dependency order: parser → semantic → dom → factory → host)
// ============================================================================

/// Parser: Logos lexer, rowan CST, typed AST wrappers
pub mod parser;

/// Semantic: declaration symbols and accessibility defaults
pub mod semantic;

/// The document object model
pub mod dom;

/// Factories mapping raw syntax to DOM nodes and back
pub mod factory;

/// Load/build facade
pub mod host;

pub mod error;
pub mod options;

// Re-export commonly needed items
pub use dom::{Dom, KindGroup, Node, NodeData, NodeId, NodeKind, Slot, same_intent};
pub use error::{DomError, Result};
pub use factory::{Corporation, NodeFactory};
pub use host::{DomHost, build, load};
pub use options::{DomOptions, UnsupportedPolicy};
