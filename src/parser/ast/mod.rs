//! Typed AST wrappers over the untyped rowan CST.
//!
//! This module provides strongly-typed accessors for C# syntax nodes.
//! Each struct wraps a SyntaxNode and provides methods to access children.
//! Wrappers never allocate trees of their own; they are views.

use super::syntax_kind::SyntaxKind;
use super::{SyntaxNode, SyntaxToken};

// ============================================================================
// Helper utilities for reducing code duplication
// ============================================================================

/// Check if a syntax node has a direct child token of the specified kind.
#[inline]
fn has_token(node: &SyntaxNode, kind: SyntaxKind) -> bool {
    node.children_with_tokens()
        .filter_map(|e| e.into_token())
        .any(|t| t.kind() == kind)
}

/// Find the first direct child token of the specified kind.
#[inline]
fn find_token(node: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
    node.children_with_tokens()
        .filter_map(|e| e.into_token())
        .find(|t| t.kind() == kind)
}

/// Find the last direct IDENT token, which names most declarations.
///
/// The last one is taken so that explicit interface members such as
/// `IFoo.Bar` resolve to `Bar`.
#[inline]
fn name_token(node: &SyntaxNode) -> Option<SyntaxToken> {
    node.children_with_tokens()
        .filter_map(|e| e.into_token())
        .filter(|t| t.kind() == SyntaxKind::IDENT)
        .last()
}

/// Significant tokens of a node joined by single spaces, used to compare
/// expressions and types regardless of their formatting.
pub fn canonical_text(node: &SyntaxNode) -> String {
    canonical_tokens(
        node.descendants_with_tokens()
            .filter_map(|e| e.into_token())
            .filter(|t| !t.kind().is_trivia())
            .map(|t| t.text().to_string()),
    )
}

/// Significant tokens of a source snippet joined by single spaces
pub fn canonical_source(text: &str) -> String {
    canonical_tokens(
        super::lexer::Lexer::new(text)
            .filter(|t| !t.kind.is_trivia())
            .map(|t| t.text.to_string()),
    )
}

fn canonical_tokens(tokens: impl Iterator<Item = String>) -> String {
    tokens.collect::<Vec<_>>().join(" ")
}

/// First expression child of a node
#[inline]
fn first_expression(node: &SyntaxNode) -> Option<SyntaxNode> {
    node.children().find(|n| n.kind().is_expression())
}

/// Macro to generate boolean property methods that check for a specific token kind.
///
/// Usage:
/// ```ignore
/// impl MyStruct {
///     has_token_method!(is_static, STATIC_KW, "using static System.Math;");
/// }
/// ```
macro_rules! has_token_method {
    ($name:ident, $kind:ident) => {
        #[doc = concat!("Check if this node has the `", stringify!($kind), "` token.")]
        pub fn $name(&self) -> bool {
            has_token(&self.0, SyntaxKind::$kind)
        }
    };
    ($name:ident, $kind:ident, $example:literal) => {
        #[doc = concat!("Check if this node has the `", stringify!($kind), "` token (e.g., `", $example, "`).")]
        pub fn $name(&self) -> bool {
            has_token(&self.0, SyntaxKind::$kind)
        }
    };
}

/// Macro to generate a method that finds the first child of a specific AST type.
macro_rules! first_child_method {
    ($name:ident, $type:ident) => {
        #[doc = concat!("Get the first `", stringify!($type), "` child of this node.")]
        pub fn $name(&self) -> Option<$type> {
            self.0.children().find_map($type::cast)
        }
    };
}

/// Macro to generate a method that returns an iterator over children of a specific AST type.
macro_rules! children_method {
    ($name:ident, $type:ident) => {
        #[doc = concat!("Get all `", stringify!($type), "` children of this node.")]
        pub fn $name(&self) -> impl Iterator<Item = $type> + '_ {
            self.0.children().filter_map($type::cast)
        }
    };
}

/// Macro to generate the name token accessor shared by declarations.
macro_rules! name_token_method {
    () => {
        /// The identifier token naming this declaration
        pub fn name_token(&self) -> Option<SyntaxToken> {
            name_token(&self.0)
        }

        /// The declared name
        pub fn name(&self) -> Option<String> {
            self.name_token().map(|t| t.text().to_string())
        }
    };
}

/// Trait for AST nodes that wrap a SyntaxNode
pub trait AstNode: Sized {
    fn can_cast(kind: SyntaxKind) -> bool;
    fn cast(node: SyntaxNode) -> Option<Self>;
    fn syntax(&self) -> &SyntaxNode;

    /// Find all descendant nodes of a specific AST type
    fn descendants<T: AstNode>(&self) -> impl Iterator<Item = T> {
        self.syntax().descendants().filter_map(T::cast)
    }
}

macro_rules! ast_node {
    ($name:ident, $kind:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(pub(crate) SyntaxNode);

        impl AstNode for $name {
            fn can_cast(kind: SyntaxKind) -> bool {
                kind == SyntaxKind::$kind
            }

            fn cast(node: SyntaxNode) -> Option<Self> {
                if Self::can_cast(node.kind()) {
                    Some(Self(node))
                } else {
                    None
                }
            }

            fn syntax(&self) -> &SyntaxNode {
                &self.0
            }
        }
    };
}

// Submodules, declared after the macros so they are in scope
mod declarations;
mod statements;
mod trivia;
mod types;

// Re-export all public types so external code sees a flat namespace
pub use self::declarations::*;
pub use self::statements::*;
pub use self::trivia::*;
pub use self::types::*;

#[cfg(test)]
mod tests;
