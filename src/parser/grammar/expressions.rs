//! Expressions: a Pratt parser over the C# operator table
//!
//! Expression nodes never own leading or trailing trivia; every node is
//! opened from a checkpoint taken after pending trivia.

use crate::parser::parser::Parser;
use crate::parser::syntax_kind::SyntaxKind;

/// Binding power of `??`, which is right associative
const COALESCE_BP: u8 = 1;

impl Parser<'_> {
    /// Whether the next token can start an expression
    pub(in crate::parser) fn at_expression_start(&self) -> bool {
        let kind = self.peek();
        kind.is_literal()
            || kind.is_predefined_type()
            || matches!(
                kind,
                SyntaxKind::IDENT
                    | SyntaxKind::THIS_KW
                    | SyntaxKind::BASE_KW
                    | SyntaxKind::NEW_KW
                    | SyntaxKind::TYPEOF_KW
                    | SyntaxKind::DEFAULT_KW
                    | SyntaxKind::L_PAREN
                    | SyntaxKind::L_BRACE
                    | SyntaxKind::PLUS
                    | SyntaxKind::MINUS
                    | SyntaxKind::BANG
                    | SyntaxKind::TILDE
                    | SyntaxKind::PLUS_PLUS
                    | SyntaxKind::MINUS_MINUS
            )
    }

    /// Parse a full expression, assignments included
    pub(in crate::parser) fn parse_expression(&mut self) {
        if self.at_lambda() {
            self.parse_lambda();
            return;
        }
        let cp = self.checkpoint();
        self.parse_conditional();
        if self.peek().is_assignment_op() {
            self.start_node_at(cp, SyntaxKind::ASSIGN_EXPR);
            self.bump();
            self.parse_expression();
            self.finish_node();
        } else if self.at_joined(SyntaxKind::GT, SyntaxKind::GT_EQ) {
            // `>>=` arrives as `>` followed by `>=`
            self.start_node_at(cp, SyntaxKind::ASSIGN_EXPR);
            self.bump();
            self.bump();
            self.parse_expression();
            self.finish_node();
        }
    }

    fn at_lambda(&self) -> bool {
        let n = usize::from(self.at(SyntaxKind::ASYNC_KW));
        match self.nth(n) {
            SyntaxKind::IDENT => self.nth(n + 1) == SyntaxKind::FAT_ARROW,
            SyntaxKind::L_PAREN => {
                // Scan to the matching `)` and look for `=>`
                let mut depth = 0usize;
                let mut k = n;
                loop {
                    match self.nth(k) {
                        SyntaxKind::L_PAREN => depth += 1,
                        SyntaxKind::R_PAREN => {
                            depth -= 1;
                            if depth == 0 {
                                return self.nth(k + 1) == SyntaxKind::FAT_ARROW;
                            }
                        }
                        SyntaxKind::__LAST | SyntaxKind::SEMICOLON | SyntaxKind::L_BRACE => {
                            return false;
                        }
                        _ => {}
                    }
                    k += 1;
                }
            }
            _ => false,
        }
    }

    fn parse_lambda(&mut self) {
        self.start_node(SyntaxKind::LAMBDA_EXPR);
        self.eat(SyntaxKind::ASYNC_KW);
        if self.at(SyntaxKind::L_PAREN) {
            self.bump_balanced(SyntaxKind::L_PAREN, SyntaxKind::R_PAREN);
        } else {
            self.bump();
        }
        self.expect(SyntaxKind::FAT_ARROW);
        if self.at(SyntaxKind::L_BRACE) {
            self.parse_block();
        } else {
            self.parse_expression();
        }
        self.finish_node();
    }

    fn parse_conditional(&mut self) {
        let cp = self.checkpoint();
        self.parse_binary(COALESCE_BP);
        if self.at(SyntaxKind::QUESTION) {
            self.start_node_at(cp, SyntaxKind::CONDITIONAL_EXPR);
            self.bump();
            self.parse_expression();
            self.expect(SyntaxKind::COLON);
            self.parse_expression();
            self.finish_node();
        }
    }

    /// Binding power and token count of the binary operator at the cursor
    fn binary_op(&self) -> Option<(u8, usize)> {
        let bp = match self.peek() {
            SyntaxKind::QUESTION_QUESTION => COALESCE_BP,
            SyntaxKind::PIPE_PIPE => 2,
            SyntaxKind::AMP_AMP => 3,
            SyntaxKind::PIPE => 4,
            SyntaxKind::CARET => 5,
            SyntaxKind::AMP => 6,
            SyntaxKind::EQ_EQ | SyntaxKind::BANG_EQ => 7,
            SyntaxKind::GT if self.at_joined(SyntaxKind::GT, SyntaxKind::GT) => return Some((9, 2)),
            SyntaxKind::GT if self.at_joined(SyntaxKind::GT, SyntaxKind::GT_EQ) => return None,
            SyntaxKind::LT
            | SyntaxKind::GT
            | SyntaxKind::LT_EQ
            | SyntaxKind::GT_EQ
            | SyntaxKind::IS_KW
            | SyntaxKind::AS_KW => 8,
            SyntaxKind::LT_LT => 9,
            SyntaxKind::PLUS | SyntaxKind::MINUS => 10,
            SyntaxKind::STAR | SyntaxKind::SLASH | SyntaxKind::PERCENT => 11,
            _ => return None,
        };
        Some((bp, 1))
    }

    fn parse_binary(&mut self, min_bp: u8) {
        let cp = self.checkpoint();
        self.parse_unary();
        while let Some((bp, tokens)) = self.binary_op() {
            if bp < min_bp {
                break;
            }
            let op = self.peek();
            self.start_node_at(cp, SyntaxKind::BINARY_EXPR);
            for _ in 0..tokens {
                self.bump();
            }
            if matches!(op, SyntaxKind::IS_KW | SyntaxKind::AS_KW) {
                self.parse_type();
                // Declaration pattern: `x is Foo foo`
                if op == SyntaxKind::IS_KW && self.at(SyntaxKind::IDENT) {
                    self.bump();
                }
            } else if bp == COALESCE_BP {
                self.parse_binary(bp);
            } else {
                self.parse_binary(bp + 1);
            }
            self.finish_node();
        }
    }

    fn parse_unary(&mut self) {
        match self.peek() {
            SyntaxKind::PLUS
            | SyntaxKind::MINUS
            | SyntaxKind::BANG
            | SyntaxKind::TILDE
            | SyntaxKind::PLUS_PLUS
            | SyntaxKind::MINUS_MINUS => {
                self.start_node(SyntaxKind::PREFIX_EXPR);
                self.bump();
                self.parse_unary();
                self.finish_node();
            }
            SyntaxKind::IDENT
                if self.at_contextual("await") && !self.operand_ends_at(1) =>
            {
                self.start_node(SyntaxKind::PREFIX_EXPR);
                self.bump();
                self.parse_unary();
                self.finish_node();
            }
            SyntaxKind::L_PAREN if self.at_cast() => {
                self.start_node(SyntaxKind::CAST_EXPR);
                self.bump();
                self.parse_type();
                self.expect(SyntaxKind::R_PAREN);
                self.parse_unary();
                self.finish_node();
            }
            _ => self.parse_postfix(),
        }
    }

    /// Whether the n-th token continues or ends an operand, meaning a
    /// preceding `await` is an ordinary identifier
    fn operand_ends_at(&self, n: usize) -> bool {
        matches!(
            self.nth(n),
            SyntaxKind::DOT
                | SyntaxKind::L_PAREN
                | SyntaxKind::L_BRACKET
                | SyntaxKind::EQ
                | SyntaxKind::PLUS
                | SyntaxKind::MINUS
                | SyntaxKind::STAR
                | SyntaxKind::SLASH
                | SyntaxKind::R_PAREN
                | SyntaxKind::COMMA
                | SyntaxKind::SEMICOLON
        )
    }

    fn parse_postfix(&mut self) {
        let cp = self.checkpoint();
        if !self.parse_primary() {
            return;
        }
        loop {
            match self.peek() {
                SyntaxKind::DOT | SyntaxKind::QUESTION_DOT => {
                    self.start_node_at(cp, SyntaxKind::MEMBER_ACCESS);
                    self.bump();
                    self.expect(SyntaxKind::IDENT);
                    if self.at_generic_args() {
                        self.parse_type_arg_list();
                    }
                    self.finish_node();
                }
                SyntaxKind::L_PAREN => {
                    self.start_node_at(cp, SyntaxKind::CALL_EXPR);
                    self.parse_arg_list();
                    self.finish_node();
                }
                SyntaxKind::L_BRACKET => {
                    self.start_node_at(cp, SyntaxKind::INDEX_EXPR);
                    self.parse_arg_list();
                    self.finish_node();
                }
                SyntaxKind::PLUS_PLUS | SyntaxKind::MINUS_MINUS => {
                    self.start_node_at(cp, SyntaxKind::POSTFIX_EXPR);
                    self.bump();
                    self.finish_node();
                }
                _ => break,
            }
        }
    }

    /// Parse a primary expression; false if nothing could be parsed
    fn parse_primary(&mut self) -> bool {
        let kind = self.peek();
        match kind {
            _ if kind.is_literal() => {
                self.start_node(SyntaxKind::LITERAL);
                self.bump();
                self.finish_node();
            }
            SyntaxKind::IDENT => {
                self.start_node(SyntaxKind::NAME_REF);
                self.bump();
                if self.at_generic_args() {
                    self.parse_type_arg_list();
                }
                self.finish_node();
            }
            _ if kind.is_predefined_type() => {
                self.start_node(SyntaxKind::PREDEFINED_TYPE_REF);
                self.bump();
                self.finish_node();
            }
            SyntaxKind::THIS_KW => {
                self.start_node(SyntaxKind::THIS_EXPR);
                self.bump();
                self.finish_node();
            }
            SyntaxKind::BASE_KW => {
                self.start_node(SyntaxKind::BASE_EXPR);
                self.bump();
                self.finish_node();
            }
            SyntaxKind::L_PAREN => {
                self.start_node(SyntaxKind::PAREN_EXPR);
                self.bump();
                self.parse_expression();
                // Tuple literal `(a, b)`
                while self.eat(SyntaxKind::COMMA) {
                    self.parse_expression();
                }
                self.expect(SyntaxKind::R_PAREN);
                self.finish_node();
            }
            SyntaxKind::NEW_KW => self.parse_new(),
            SyntaxKind::TYPEOF_KW => {
                self.start_node(SyntaxKind::TYPEOF_EXPR);
                self.bump();
                self.expect(SyntaxKind::L_PAREN);
                self.parse_type();
                self.expect(SyntaxKind::R_PAREN);
                self.finish_node();
            }
            SyntaxKind::DEFAULT_KW => {
                self.start_node(SyntaxKind::DEFAULT_EXPR);
                self.bump();
                if self.eat(SyntaxKind::L_PAREN) {
                    self.parse_type();
                    self.expect(SyntaxKind::R_PAREN);
                }
                self.finish_node();
            }
            SyntaxKind::L_BRACE => self.parse_initializer(),
            _ => {
                self.error("expected expression");
                return false;
            }
        }
        true
    }

    fn parse_new(&mut self) {
        self.start_node(SyntaxKind::NEW_EXPR);
        self.bump();
        if self.at(SyntaxKind::IDENT) || self.peek().is_predefined_type() {
            self.parse_type();
        }
        if self.at(SyntaxKind::L_BRACKET) {
            self.bump_balanced(SyntaxKind::L_BRACKET, SyntaxKind::R_BRACKET);
        }
        if self.at(SyntaxKind::L_PAREN) {
            self.parse_arg_list();
        }
        if self.at(SyntaxKind::L_BRACE) {
            self.parse_initializer();
        }
        self.finish_node();
    }

    /// `{ a, b }` collection or object initializer
    fn parse_initializer(&mut self) {
        self.start_node(SyntaxKind::INITIALIZER_EXPR);
        self.expect(SyntaxKind::L_BRACE);
        while !self.at_eof() && !self.at(SyntaxKind::R_BRACE) {
            let before = self.next_index();
            self.parse_expression();
            if self.next_index() == before {
                break;
            }
            if !self.eat(SyntaxKind::COMMA) {
                break;
            }
        }
        self.expect(SyntaxKind::R_BRACE);
        self.finish_node();
    }

    /// `( args )` or `[ args ]`
    pub(in crate::parser) fn parse_arg_list(&mut self) {
        self.start_node(SyntaxKind::ARG_LIST);
        let close = if self.eat(SyntaxKind::L_BRACKET) {
            SyntaxKind::R_BRACKET
        } else {
            self.expect(SyntaxKind::L_PAREN);
            SyntaxKind::R_PAREN
        };
        if !self.at(close) {
            loop {
                self.parse_arg();
                if !self.eat(SyntaxKind::COMMA) {
                    break;
                }
            }
        }
        self.expect(close);
        self.finish_node();
    }

    fn parse_arg(&mut self) {
        self.start_node(SyntaxKind::ARG);
        if self.at(SyntaxKind::IDENT) && self.nth(1) == SyntaxKind::COLON {
            self.bump();
            self.bump();
        }
        if self.at_any(&[SyntaxKind::REF_KW, SyntaxKind::OUT_KW, SyntaxKind::IN_KW]) {
            self.bump();
            // `out var x` / `out int x`
            if self.at_local_declaration_target() {
                self.parse_type();
                self.bump();
                self.finish_node();
                return;
            }
        }
        self.parse_expression();
        self.finish_node();
    }

    fn at_local_declaration_target(&self) -> bool {
        let start = self.next_index();
        match self.scan_type(start) {
            Some(end) => {
                let name = self.skip_trivia_from(end);
                self.kind_at(name) == SyntaxKind::IDENT
                    && matches!(
                        self.kind_at(self.skip_trivia_from(name + 1)),
                        SyntaxKind::COMMA | SyntaxKind::R_PAREN
                    )
            }
            None => false,
        }
    }
}
