//! # Semantic layer
//!
//! Resolves raw declarations to [`Symbol`]s: names, metadata names,
//! accessibility (explicit or defaulted) and static-ness. The DOM reads these
//! once while loading; it never writes back to them.

mod resolver;
mod symbol;

pub use resolver::{SymbolResolver, SyntacticResolver, declaration_context};
pub use symbol::{
    Accessibility, DeclarationContext, Symbol, SymbolKind, default_accessibility, metadata_name,
};
