//! Statements
//!
//! Every statement node owns its leading trivia, including the embedded
//! statement of an `if`/`while`/`for` and the `else`, `catch` and `finally`
//! clauses.

use crate::parser::parser::Parser;
use crate::parser::syntax_kind::SyntaxKind;

const STATEMENT_RECOVERY: &[SyntaxKind] = &[SyntaxKind::SEMICOLON, SyntaxKind::R_BRACE];

impl Parser<'_> {
    /// Parse a `{ ... }` body that does not own its leading trivia
    pub(in crate::parser) fn parse_block(&mut self) {
        self.start_node(SyntaxKind::BLOCK);
        self.parse_block_contents();
        self.finish_node();
    }

    fn parse_block_contents(&mut self) {
        self.expect(SyntaxKind::L_BRACE);
        while !self.at_eof() && !self.at(SyntaxKind::R_BRACE) {
            let before = self.next_index();
            self.parse_statement();
            if self.next_index() == before {
                self.error_recover("expected statement", STATEMENT_RECOVERY);
            }
        }
        self.expect(SyntaxKind::R_BRACE);
    }

    /// Parse one statement, including the trivia before it
    pub(in crate::parser) fn parse_statement(&mut self) {
        match self.peek() {
            SyntaxKind::L_BRACE => {
                self.start_decl(SyntaxKind::BLOCK);
                self.parse_block_contents();
                self.finish_node();
            }
            SyntaxKind::SEMICOLON => self.simple_statement(SyntaxKind::EMPTY_STMT),
            SyntaxKind::BREAK_KW => self.simple_statement(SyntaxKind::BREAK_STMT),
            SyntaxKind::CONTINUE_KW => self.simple_statement(SyntaxKind::CONTINUE_STMT),
            SyntaxKind::RETURN_KW => self.keyword_expression_statement(SyntaxKind::RETURN_STMT),
            SyntaxKind::THROW_KW => self.keyword_expression_statement(SyntaxKind::THROW_STMT),
            SyntaxKind::IF_KW => self.parse_if(),
            SyntaxKind::WHILE_KW => {
                self.start_decl(SyntaxKind::WHILE_STMT);
                self.bump();
                self.parse_parenthesized_condition();
                self.parse_embedded_statement();
                self.finish_node();
            }
            SyntaxKind::DO_KW => {
                self.start_decl(SyntaxKind::DO_STMT);
                self.bump();
                self.parse_embedded_statement();
                self.expect(SyntaxKind::WHILE_KW);
                self.parse_parenthesized_condition();
                self.expect(SyntaxKind::SEMICOLON);
                self.finish_node();
            }
            SyntaxKind::FOR_KW => self.parse_for(),
            SyntaxKind::FOREACH_KW => self.parse_foreach(),
            SyntaxKind::TRY_KW => self.parse_try(),
            SyntaxKind::LOCK_KW => {
                self.start_decl(SyntaxKind::LOCK_STMT);
                self.bump();
                self.parse_parenthesized_condition();
                self.parse_embedded_statement();
                self.finish_node();
            }
            SyntaxKind::SWITCH_KW => {
                self.start_decl(SyntaxKind::SWITCH_STMT);
                self.bump();
                self.parse_parenthesized_condition();
                self.bump_balanced(SyntaxKind::L_BRACE, SyntaxKind::R_BRACE);
                self.finish_node();
            }
            SyntaxKind::GOTO_KW => {
                self.start_decl(SyntaxKind::GOTO_STMT);
                self.bump_until_semicolon();
                self.finish_node();
            }
            SyntaxKind::USING_KW => {
                self.start_decl(SyntaxKind::USING_STMT);
                self.bump();
                if self.at(SyntaxKind::L_PAREN) {
                    self.bump_balanced(SyntaxKind::L_PAREN, SyntaxKind::R_PAREN);
                    self.parse_embedded_statement();
                } else {
                    self.bump_until_semicolon();
                }
                self.finish_node();
            }
            SyntaxKind::CONST_KW => self.parse_local_declaration(),
            kind if (kind == SyntaxKind::IDENT || kind.is_predefined_type())
                && self.at_local_declaration() =>
            {
                self.parse_local_declaration()
            }
            _ => self.parse_expression_statement(),
        }
    }

    fn simple_statement(&mut self, kind: SyntaxKind) {
        self.start_decl(kind);
        self.bump();
        if kind != SyntaxKind::EMPTY_STMT {
            self.expect(SyntaxKind::SEMICOLON);
        }
        self.finish_node();
    }

    /// `return expr?;` and `throw expr?;`
    fn keyword_expression_statement(&mut self, kind: SyntaxKind) {
        self.start_decl(kind);
        self.bump();
        if !self.at(SyntaxKind::SEMICOLON) {
            self.parse_expression();
        }
        self.expect(SyntaxKind::SEMICOLON);
        self.finish_node();
    }

    fn parse_parenthesized_condition(&mut self) {
        self.expect(SyntaxKind::L_PAREN);
        self.parse_expression();
        self.expect(SyntaxKind::R_PAREN);
    }

    /// The body of `if`, `while`, `for`, ...: a block or a single statement
    fn parse_embedded_statement(&mut self) {
        if self.at_eof() || self.at(SyntaxKind::R_BRACE) {
            self.error("expected statement");
            return;
        }
        self.parse_statement();
    }

    fn parse_if(&mut self) {
        self.start_decl(SyntaxKind::IF_STMT);
        self.bump();
        self.parse_parenthesized_condition();
        self.parse_embedded_statement();
        if self.at(SyntaxKind::ELSE_KW) {
            self.start_decl(SyntaxKind::ELSE_CLAUSE);
            self.bump();
            self.parse_embedded_statement();
            self.finish_node();
        }
        self.finish_node();
    }

    fn parse_for(&mut self) {
        self.start_decl(SyntaxKind::FOR_STMT);
        self.bump();
        self.expect(SyntaxKind::L_PAREN);
        if !self.at(SyntaxKind::SEMICOLON) {
            if self.at_local_declaration() {
                self.parse_variable_declaration();
            } else {
                loop {
                    self.parse_expression();
                    if !self.eat(SyntaxKind::COMMA) {
                        break;
                    }
                }
            }
        }
        self.expect(SyntaxKind::SEMICOLON);
        if !self.at(SyntaxKind::SEMICOLON) {
            self.parse_expression();
        }
        self.expect(SyntaxKind::SEMICOLON);
        self.start_node(SyntaxKind::FOR_INCREMENTORS);
        if !self.at(SyntaxKind::R_PAREN) {
            loop {
                self.parse_expression();
                if !self.eat(SyntaxKind::COMMA) {
                    break;
                }
            }
        }
        self.finish_node();
        self.expect(SyntaxKind::R_PAREN);
        self.parse_embedded_statement();
        self.finish_node();
    }

    fn parse_foreach(&mut self) {
        self.start_decl(SyntaxKind::FOREACH_STMT);
        self.bump();
        self.expect(SyntaxKind::L_PAREN);
        self.start_node(SyntaxKind::FOREACH_VARIABLE);
        self.parse_type();
        self.expect(SyntaxKind::IDENT);
        self.finish_node();
        self.expect(SyntaxKind::IN_KW);
        self.parse_expression();
        self.expect(SyntaxKind::R_PAREN);
        self.parse_embedded_statement();
        self.finish_node();
    }

    fn parse_try(&mut self) {
        self.start_decl(SyntaxKind::TRY_STMT);
        self.bump();
        self.parse_block();
        while self.at(SyntaxKind::CATCH_KW) {
            self.start_decl(SyntaxKind::CATCH_CLAUSE);
            self.bump();
            if self.at(SyntaxKind::L_PAREN) {
                self.start_node(SyntaxKind::CATCH_DECL);
                self.bump();
                self.parse_type();
                self.eat(SyntaxKind::IDENT);
                self.expect(SyntaxKind::R_PAREN);
                self.finish_node();
            }
            if self.at_contextual("when") {
                self.start_node(SyntaxKind::CATCH_FILTER);
                self.bump();
                self.parse_parenthesized_condition();
                self.finish_node();
            }
            self.parse_block();
            self.finish_node();
        }
        if self.at(SyntaxKind::FINALLY_KW) {
            self.start_decl(SyntaxKind::FINALLY_CLAUSE);
            self.bump();
            self.parse_block();
            self.finish_node();
        }
        self.finish_node();
    }

    fn parse_local_declaration(&mut self) {
        self.start_decl(SyntaxKind::LOCAL_DECL_STMT);
        self.eat(SyntaxKind::CONST_KW);
        self.parse_variable_declaration();
        self.expect(SyntaxKind::SEMICOLON);
        self.finish_node();
    }

    /// `Type a = 1, b` as used by locals and `for` initializers
    fn parse_variable_declaration(&mut self) {
        self.start_node(SyntaxKind::VARIABLE_DECLARATION);
        self.parse_type();
        self.parse_variable_declarators();
        self.finish_node();
    }

    fn parse_expression_statement(&mut self) {
        // Only open the node once something expression-like is ahead, so an
        // unexpected token is left to the caller's recovery.
        if !self.at_expression_start() {
            return;
        }
        self.start_decl(SyntaxKind::EXPR_STMT);
        self.parse_expression();
        self.expect(SyntaxKind::SEMICOLON);
        self.finish_node();
    }
}
