//! What a load saw besides the tree itself

use super::kind::KindGroup;
use crate::parser::{SyntaxError, SyntaxKind};
use text_size::TextRange;

/// A raw construct kept as an opaque passthrough node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Passthrough {
    pub group: KindGroup,
    pub syntax: SyntaxKind,
    pub range: TextRange,
}

/// Parse diagnostics and passthrough constructs of one load
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub diagnostics: Vec<SyntaxError>,
    pub unsupported: Vec<Passthrough>,
}

impl LoadReport {
    pub fn has_syntax_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    /// No diagnostics and every construct modeled
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty() && self.unsupported.is_empty()
    }
}
