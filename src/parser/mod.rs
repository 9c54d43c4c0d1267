//! Rowan-based lossless parser for a C# subset
//!
//! This module provides the raw syntax layer the DOM is built on, using:
//! - **logos** for fast lexing
//! - **rowan** for the CST (Concrete Syntax Tree)
//!
//! The CST preserves all whitespace and comments, so `parse(text)` always
//! serializes back to `text`. A typed AST layer sits on top of it.
//!
//! ## Architecture
//!
//! ```text
//! Source Text
//!     ↓
//! Lexer (logos) → Tokens with SyntaxKind
//!     ↓
//! Parser → GreenNode tree (immutable, cheap to clone)
//!     ↓
//! SyntaxNode (rowan) → CST with parent pointers
//!     ↓
//! AST layer → Typed wrappers over SyntaxNode
//!     ↓
//! DOM → Mutable object model
//! ```
//!
//! ## Fragments
//!
//! The build direction materialises syntax for nodes that were created in
//! memory by parsing small fragments (`parse_fragment`) and splicing the
//! resulting green nodes into the tree being rebuilt.

#[allow(clippy::module_inception)]
mod parser;

pub mod ast;
mod grammar;
mod lexer;
mod syntax_kind;

pub use ast::*;
pub use lexer::{Lexer, Token, tokenize};
pub use parser::{FragmentKind, Parse, SyntaxError, parse, parse_fragment};
pub use syntax_kind::{CSharpLanguage, SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken};

/// Re-export rowan types for convenience
pub use rowan::{GreenNode, GreenToken, NodeOrToken, TextRange, TextSize};
