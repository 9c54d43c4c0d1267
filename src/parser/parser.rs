//! Recursive descent parser for the C# subset
//!
//! Builds a rowan GreenNode tree from tokens.
//! Supports error recovery and produces a lossless CST.
//!
//! Trivia placement follows one rule: declaration-level nodes (members,
//! statements, accessors, enum values, clauses) start *before* the trivia
//! that precedes them and so own it; every other node starts after it and
//! leaves the spacing to its parent. Trailing trivia is never pulled into a
//! node.

use super::lexer::{Lexer, Token};
use super::syntax_kind::SyntaxKind;
use rowan::{Checkpoint, GreenNode, GreenNodeBuilder, TextRange, TextSize};

/// Parse result containing the green tree and any errors
#[derive(Debug, Clone)]
pub struct Parse {
    pub green: GreenNode,
    pub errors: Vec<SyntaxError>,
}

impl Parse {
    /// Get the root syntax node
    pub fn syntax(&self) -> super::SyntaxNode {
        super::SyntaxNode::new_root(self.green.clone())
    }

    /// Check if parsing succeeded without errors
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A syntax error with location and message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    pub range: TextRange,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, range: TextRange) -> Self {
        Self {
            message: message.into(),
            range,
        }
    }
}

impl std::fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} at {}..{}",
            self.message,
            u32::from(self.range.start()),
            u32::from(self.range.end())
        )
    }
}

/// What a fragment of source text is expected to contain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FragmentKind {
    /// A namespace, type, or using directive
    StemMember,
    /// A member of a type body
    Member,
    Statement,
    Expression,
    Type,
    Parameter,
    /// A single `[...]` attribute list
    AttributeList,
}

/// Parse C# source code into a CST
pub fn parse(input: &str) -> Parse {
    let tokens: Vec<_> = Lexer::new(input).collect();
    let mut parser = Parser::new(&tokens);
    parser.parse_source_file();
    parser.finish()
}

/// Parse a standalone fragment of source text
///
/// The resulting tree is rooted at a SOURCE_FILE node whose first child node
/// is the parsed fragment. Any unconsumed input is wrapped in an ERROR node
/// and reported.
pub fn parse_fragment(kind: FragmentKind, input: &str) -> Parse {
    let tokens: Vec<_> = Lexer::new(input).collect();
    let mut parser = Parser::new(&tokens);
    parser.start_node_raw(SyntaxKind::SOURCE_FILE);
    match kind {
        FragmentKind::StemMember => parser.parse_stem_member(),
        FragmentKind::Member => parser.parse_member(),
        FragmentKind::Statement => parser.parse_statement(),
        FragmentKind::Expression => parser.parse_expression(),
        FragmentKind::Type => parser.parse_type(),
        FragmentKind::Parameter => parser.parse_param(),
        FragmentKind::AttributeList => parser.parse_attribute_list(),
    }
    if parser.peek() != SyntaxKind::__LAST {
        parser.error_recover("unexpected input after fragment", &[]);
    }
    parser.skip_trivia();
    parser.finish_node();
    parser.finish()
}

/// The parser state
pub(super) struct Parser<'a> {
    tokens: &'a [Token<'a>],
    pos: usize,
    builder: GreenNodeBuilder<'static>,
    errors: Vec<SyntaxError>,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token<'a>]) -> Self {
        Self {
            tokens,
            pos: 0,
            builder: GreenNodeBuilder::new(),
            errors: Vec::new(),
        }
    }

    fn finish(self) -> Parse {
        Parse {
            green: self.builder.finish(),
            errors: self.errors,
        }
    }

    // =========================================================================
    // Token inspection
    // =========================================================================

    fn current(&self) -> Option<&Token<'a>> {
        self.tokens.get(self.pos)
    }

    /// Index of the n-th non-trivia token at or after the cursor
    fn nth_index(&self, n: usize) -> Option<usize> {
        let mut count = 0;
        for idx in self.pos..self.tokens.len() {
            if !self.tokens[idx].kind.is_trivia() {
                if count == n {
                    return Some(idx);
                }
                count += 1;
            }
        }
        None
    }

    /// Kind of the n-th non-trivia token, `__LAST` at end of input
    pub(super) fn nth(&self, n: usize) -> SyntaxKind {
        self.nth_index(n)
            .map(|idx| self.tokens[idx].kind)
            .unwrap_or(SyntaxKind::__LAST)
    }

    /// Text of the n-th non-trivia token
    pub(super) fn nth_text(&self, n: usize) -> &str {
        self.nth_index(n).map(|idx| self.tokens[idx].text).unwrap_or("")
    }

    pub(super) fn peek(&self) -> SyntaxKind {
        self.nth(0)
    }

    pub(super) fn at(&self, kind: SyntaxKind) -> bool {
        self.peek() == kind
    }

    pub(super) fn at_any(&self, kinds: &[SyntaxKind]) -> bool {
        kinds.contains(&self.peek())
    }

    /// Check for a contextual keyword such as `where`, `get` or `var`
    pub(super) fn at_contextual(&self, word: &str) -> bool {
        self.at(SyntaxKind::IDENT) && self.nth_text(0) == word
    }

    pub(super) fn at_eof(&self) -> bool {
        self.nth_index(0).is_none()
    }

    /// Kind of the token at an absolute index (trivia included)
    pub(super) fn kind_at(&self, idx: usize) -> SyntaxKind {
        self.tokens.get(idx).map(|t| t.kind).unwrap_or(SyntaxKind::__LAST)
    }

    /// Absolute index of the next non-trivia token
    pub(super) fn next_index(&self) -> usize {
        self.nth_index(0).unwrap_or(self.tokens.len())
    }

    /// Absolute index of the first non-trivia token after `idx`
    pub(super) fn skip_trivia_from(&self, mut idx: usize) -> usize {
        while idx < self.tokens.len() && self.tokens[idx].kind.is_trivia() {
            idx += 1;
        }
        idx
    }

    /// Check that the two next significant tokens touch with no trivia between
    /// them, e.g. the two halves of `>>`.
    pub(super) fn at_joined(&self, first: SyntaxKind, second: SyntaxKind) -> bool {
        match self.nth_index(0) {
            Some(idx) => self.kind_at(idx) == first && self.kind_at(idx + 1) == second,
            None => false,
        }
    }

    // =========================================================================
    // Token consumption
    // =========================================================================

    /// Consume the next significant token, attaching preceding trivia to the
    /// currently open node.
    pub(super) fn bump(&mut self) {
        self.skip_trivia();
        if let Some(token) = self.current() {
            self.builder.token(token.kind.into(), token.text);
            self.pos += 1;
        }
    }

    pub(super) fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    pub(super) fn expect(&mut self, kind: SyntaxKind) -> bool {
        if self.eat(kind) {
            true
        } else {
            self.error(format!("expected {:?}", kind));
            false
        }
    }

    pub(super) fn skip_trivia(&mut self) {
        while self.current().map(|t| t.kind.is_trivia()).unwrap_or(false) {
            if let Some(token) = self.current() {
                self.builder.token(token.kind.into(), token.text);
            }
            self.pos += 1;
        }
    }

    /// Consume a balanced `open ... close` run, nested pairs included
    pub(super) fn bump_balanced(&mut self, open: SyntaxKind, close: SyntaxKind) {
        if !self.at(open) {
            self.error(format!("expected {:?}", open));
            return;
        }
        let mut depth = 0usize;
        while !self.at_eof() {
            let kind = self.peek();
            self.bump();
            if kind == open {
                depth += 1;
            } else if kind == close {
                depth -= 1;
                if depth == 0 {
                    return;
                }
            }
        }
        self.error(format!("unterminated {:?}", open));
    }

    // =========================================================================
    // Error handling
    // =========================================================================

    pub(super) fn error(&mut self, message: impl Into<String>) {
        let range = self
            .nth_index(0)
            .map(|idx| {
                let t = &self.tokens[idx];
                TextRange::at(t.offset, TextSize::of(t.text))
            })
            .unwrap_or_else(|| {
                let end = self
                    .tokens
                    .last()
                    .map(|t| t.offset + TextSize::of(t.text))
                    .unwrap_or_default();
                TextRange::empty(end)
            });
        self.errors.push(SyntaxError::new(message, range));
    }

    pub(super) fn error_recover(&mut self, message: impl Into<String>, recovery: &[SyntaxKind]) {
        self.error(message);
        self.skip_trivia();
        self.builder.start_node(SyntaxKind::ERROR.into());
        // Always consume at least one token to make progress
        let mut consumed = false;
        while !self.at_eof() && !self.at_any(recovery) {
            let kind = self.peek();
            if kind == SyntaxKind::L_BRACE {
                self.bump_balanced(SyntaxKind::L_BRACE, SyntaxKind::R_BRACE);
            } else {
                self.bump();
            }
            consumed = true;
            if kind == SyntaxKind::SEMICOLON {
                break;
            }
        }
        if !consumed && !self.at_eof() {
            self.bump();
        }
        self.builder.finish_node();
    }

    // =========================================================================
    // Node building helpers
    // =========================================================================

    /// Start a node that owns the trivia before it
    pub(super) fn start_decl(&mut self, kind: SyntaxKind) {
        self.builder.start_node(kind.into());
    }

    /// Start a node after attaching pending trivia to the parent
    pub(super) fn start_node(&mut self, kind: SyntaxKind) {
        self.skip_trivia();
        self.builder.start_node(kind.into());
    }

    fn start_node_raw(&mut self, kind: SyntaxKind) {
        self.builder.start_node(kind.into());
    }

    pub(super) fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    /// Checkpoint positioned before pending trivia, for declarations whose
    /// kind is only known after their attributes and modifiers
    pub(super) fn decl_checkpoint(&mut self) -> Checkpoint {
        self.builder.checkpoint()
    }

    /// Checkpoint positioned after pending trivia
    pub(super) fn checkpoint(&mut self) -> Checkpoint {
        self.skip_trivia();
        self.builder.checkpoint()
    }

    pub(super) fn start_node_at(&mut self, checkpoint: Checkpoint, kind: SyntaxKind) {
        self.builder.start_node_at(checkpoint, kind.into());
    }

    // =========================================================================
    // Compilation unit
    // =========================================================================

    fn parse_source_file(&mut self) {
        self.start_node_raw(SyntaxKind::SOURCE_FILE);
        while !self.at_eof() {
            let before = self.next_index();
            self.parse_stem_member();
            if self.next_index() == before {
                self.error_recover("expected declaration", &[]);
            }
        }
        self.skip_trivia();
        self.finish_node();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_preserves_text() {
        let source = "using System;\n\nnamespace A.B\n{\n    public class C { }\n}\n";
        let parse = parse(source);
        assert!(parse.ok(), "{:?}", parse.errors);
        assert_eq!(parse.syntax().to_string(), source);
    }

    #[test]
    fn test_parse_error_still_lossless() {
        let source = "class A { int x = ; } $$ }";
        let parse = parse(source);
        assert!(!parse.ok());
        assert_eq!(parse.syntax().to_string(), source);
    }

    #[test]
    fn test_parse_fragment_expression() {
        let parse = parse_fragment(FragmentKind::Expression, "a + b * 2");
        assert!(parse.ok(), "{:?}", parse.errors);
        let node = parse.syntax().first_child().unwrap();
        assert_eq!(node.kind(), SyntaxKind::BINARY_EXPR);
    }

    #[test]
    fn test_parse_fragment_reports_leftovers() {
        let parse = parse_fragment(FragmentKind::Type, "int x");
        assert!(!parse.ok());
        assert_eq!(parse.syntax().to_string(), "int x");
    }
}
