//! Type references and speculative type scanning
//!
//! C# needs lookahead to tell `List<int> x` from `a < b`, or `(int)x` from
//! `(a)`. The `scan_*` helpers walk the token stream without building
//! anything and report where a type would end.

use crate::parser::parser::Parser;
use crate::parser::syntax_kind::SyntaxKind;

impl Parser<'_> {
    /// Parse a type reference into a TYPE node
    pub(in crate::parser) fn parse_type(&mut self) {
        self.start_node(SyntaxKind::TYPE);
        let kind = self.peek();
        if kind.is_predefined_type() {
            self.bump();
        } else if kind == SyntaxKind::IDENT {
            self.bump();
            if self.at(SyntaxKind::COLON_COLON) && self.nth(1) == SyntaxKind::IDENT {
                self.bump();
                self.bump();
            }
            if self.at(SyntaxKind::LT) {
                self.parse_type_arg_list();
            }
            while self.at(SyntaxKind::DOT) && self.nth(1) == SyntaxKind::IDENT {
                self.bump();
                self.bump();
                if self.at(SyntaxKind::LT) {
                    self.parse_type_arg_list();
                }
            }
        } else if kind == SyntaxKind::L_PAREN {
            // Tuple type
            self.bump_balanced(SyntaxKind::L_PAREN, SyntaxKind::R_PAREN);
        } else {
            self.error("expected type");
        }
        self.parse_type_suffixes();
        self.finish_node();
    }

    fn parse_type_suffixes(&mut self) {
        loop {
            if self.at(SyntaxKind::QUESTION) {
                self.bump();
            } else if self.at(SyntaxKind::L_BRACKET)
                && matches!(self.nth(1), SyntaxKind::R_BRACKET | SyntaxKind::COMMA)
            {
                self.bump();
                while self.eat(SyntaxKind::COMMA) {}
                self.expect(SyntaxKind::R_BRACKET);
            } else {
                break;
            }
        }
    }

    pub(in crate::parser) fn parse_type_arg_list(&mut self) {
        self.start_node(SyntaxKind::TYPE_ARG_LIST);
        self.expect(SyntaxKind::LT);
        loop {
            self.parse_type();
            if !self.eat(SyntaxKind::COMMA) {
                break;
            }
        }
        self.expect(SyntaxKind::GT);
        self.finish_node();
    }

    // =========================================================================
    // Speculative scanning
    // =========================================================================

    /// Index just past a type starting at the first significant token at or
    /// after `idx`, or `None` if no type starts there.
    pub(in crate::parser) fn scan_type(&self, idx: usize) -> Option<usize> {
        let mut i = self.skip_trivia_from(idx);
        let kind = self.kind_at(i);
        if kind.is_predefined_type() {
            i += 1;
        } else if kind == SyntaxKind::IDENT {
            i += 1;
            loop {
                let j = self.skip_trivia_from(i);
                if self.kind_at(j) == SyntaxKind::LT {
                    i = self.scan_type_args(j)?;
                    continue;
                }
                let after = self.skip_trivia_from(j + 1);
                if matches!(self.kind_at(j), SyntaxKind::DOT | SyntaxKind::COLON_COLON)
                    && self.kind_at(after) == SyntaxKind::IDENT
                {
                    i = after + 1;
                    continue;
                }
                break;
            }
        } else {
            return None;
        }
        loop {
            let j = self.skip_trivia_from(i);
            match self.kind_at(j) {
                SyntaxKind::QUESTION => i = j + 1,
                SyntaxKind::L_BRACKET => {
                    let mut k = self.skip_trivia_from(j + 1);
                    while self.kind_at(k) == SyntaxKind::COMMA {
                        k = self.skip_trivia_from(k + 1);
                    }
                    if self.kind_at(k) != SyntaxKind::R_BRACKET {
                        break;
                    }
                    i = k + 1;
                }
                _ => break,
            }
        }
        Some(i)
    }

    /// Index just past `<...>` starting at `idx` (which must be `<`)
    pub(in crate::parser) fn scan_type_args(&self, idx: usize) -> Option<usize> {
        let mut i = idx + 1;
        loop {
            i = self.scan_type(i)?;
            let k = self.skip_trivia_from(i);
            match self.kind_at(k) {
                SyntaxKind::COMMA => i = k + 1,
                SyntaxKind::GT => return Some(k + 1),
                _ => return None,
            }
        }
    }

    /// Whether the `<` at the cursor opens type arguments of a generic name
    /// in expression context, e.g. `Foo<int>(x)`.
    pub(in crate::parser) fn at_generic_args(&self) -> bool {
        if !self.at(SyntaxKind::LT) {
            return false;
        }
        let idx = self.next_index();
        match self.scan_type_args(idx) {
            Some(end) => matches!(
                self.kind_at(self.skip_trivia_from(end)),
                SyntaxKind::L_PAREN
                    | SyntaxKind::R_PAREN
                    | SyntaxKind::DOT
                    | SyntaxKind::QUESTION_DOT
                    | SyntaxKind::COMMA
                    | SyntaxKind::SEMICOLON
            ),
            None => false,
        }
    }

    /// Whether the `(` at the cursor starts a cast such as `(int)x`
    pub(in crate::parser) fn at_cast(&self) -> bool {
        if !self.at(SyntaxKind::L_PAREN) {
            return false;
        }
        let open = self.next_index();
        let first = self.kind_at(self.skip_trivia_from(open + 1));
        let Some(end) = self.scan_type(open + 1) else {
            return false;
        };
        let close = self.skip_trivia_from(end);
        if self.kind_at(close) != SyntaxKind::R_PAREN {
            return false;
        }
        let next = self.kind_at(self.skip_trivia_from(close + 1));
        if first.is_predefined_type() {
            return !matches!(next, SyntaxKind::DOT | SyntaxKind::SEMICOLON | SyntaxKind::R_PAREN);
        }
        next.is_literal()
            || next.is_predefined_type()
            || matches!(
                next,
                SyntaxKind::IDENT
                    | SyntaxKind::L_PAREN
                    | SyntaxKind::THIS_KW
                    | SyntaxKind::BASE_KW
                    | SyntaxKind::NEW_KW
                    | SyntaxKind::TYPEOF_KW
                    | SyntaxKind::DEFAULT_KW
                    | SyntaxKind::BANG
                    | SyntaxKind::TILDE
            )
    }

    /// Whether the cursor is at `Type name` followed by `=`, `;` or `,`
    pub(in crate::parser) fn at_local_declaration(&self) -> bool {
        let start = self.next_index();
        let Some(end) = self.scan_type(start) else {
            return false;
        };
        let name = self.skip_trivia_from(end);
        if self.kind_at(name) != SyntaxKind::IDENT {
            return false;
        }
        matches!(
            self.kind_at(self.skip_trivia_from(name + 1)),
            SyntaxKind::EQ | SyntaxKind::SEMICOLON | SyntaxKind::COMMA
        )
    }
}
