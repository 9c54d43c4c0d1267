//! Declarations: using directives, namespaces, types and their members

use crate::parser::parser::Parser;
use crate::parser::syntax_kind::SyntaxKind;

/// Tokens that start a member declaration, used as an error recovery set
const MEMBER_RECOVERY: &[SyntaxKind] = &[
    SyntaxKind::R_BRACE,
    SyntaxKind::L_BRACKET,
    SyntaxKind::PUBLIC_KW,
    SyntaxKind::PRIVATE_KW,
    SyntaxKind::PROTECTED_KW,
    SyntaxKind::INTERNAL_KW,
    SyntaxKind::CLASS_KW,
    SyntaxKind::STRUCT_KW,
    SyntaxKind::INTERFACE_KW,
    SyntaxKind::ENUM_KW,
    SyntaxKind::NAMESPACE_KW,
];

impl Parser<'_> {
    // =========================================================================
    // Stem members
    // =========================================================================

    /// Parse a using directive, namespace, or type at namespace level
    pub(in crate::parser) fn parse_stem_member(&mut self) {
        match self.peek() {
            SyntaxKind::USING_KW => self.parse_using_directive(),
            SyntaxKind::NAMESPACE_KW => self.parse_namespace(),
            SyntaxKind::L_BRACKET if self.at_global_attribute_target() => {
                self.start_decl(SyntaxKind::ATTRIBUTE_LIST);
                self.parse_attribute_list_body();
                self.finish_node();
            }
            _ => self.parse_member(),
        }
    }

    fn at_global_attribute_target(&self) -> bool {
        self.nth(1) == SyntaxKind::IDENT
            && matches!(self.nth_text(1), "assembly" | "module")
            && self.nth(2) == SyntaxKind::COLON
    }

    fn parse_using_directive(&mut self) {
        self.start_decl(SyntaxKind::USING_DIRECTIVE);
        self.expect(SyntaxKind::USING_KW);
        self.eat(SyntaxKind::STATIC_KW);
        if self.at(SyntaxKind::IDENT) && self.nth(1) == SyntaxKind::EQ {
            self.start_node(SyntaxKind::USING_ALIAS);
            self.bump();
            self.bump();
            self.finish_node();
            self.parse_type();
        } else {
            self.parse_qualified_name();
        }
        self.expect(SyntaxKind::SEMICOLON);
        self.finish_node();
    }

    fn parse_namespace(&mut self) {
        self.start_decl(SyntaxKind::NAMESPACE_DECL);
        self.expect(SyntaxKind::NAMESPACE_KW);
        self.parse_qualified_name();
        if self.eat(SyntaxKind::SEMICOLON) {
            // File-scoped: the rest of the file is the body, without braces
            self.start_decl(SyntaxKind::MEMBER_LIST);
            while !self.at_eof() {
                let before = self.next_index();
                self.parse_stem_member();
                if self.next_index() == before {
                    self.error_recover("expected declaration", MEMBER_RECOVERY);
                }
            }
            self.finish_node();
        } else {
            self.parse_member_list(true);
        }
        self.finish_node();
    }

    /// Parse `A.B.C` (also `global::A.B`)
    pub(in crate::parser) fn parse_qualified_name(&mut self) {
        self.start_node(SyntaxKind::QUALIFIED_NAME);
        self.expect(SyntaxKind::IDENT);
        while self.at_any(&[SyntaxKind::DOT, SyntaxKind::COLON_COLON])
            && self.nth(1) == SyntaxKind::IDENT
        {
            self.bump();
            self.bump();
        }
        self.finish_node();
    }

    /// Parse `{ members }`; stem bodies also accept namespaces and usings
    fn parse_member_list(&mut self, stem: bool) {
        self.start_node(SyntaxKind::MEMBER_LIST);
        self.expect(SyntaxKind::L_BRACE);
        while !self.at_eof() && !self.at(SyntaxKind::R_BRACE) {
            let before = self.next_index();
            if stem {
                self.parse_stem_member();
            } else {
                self.parse_member();
            }
            if self.next_index() == before {
                self.error_recover("expected member declaration", MEMBER_RECOVERY);
            }
        }
        self.expect(SyntaxKind::R_BRACE);
        self.finish_node();
    }

    // =========================================================================
    // Members
    // =========================================================================

    /// Parse a type or member declaration with its attributes and modifiers
    pub(in crate::parser) fn parse_member(&mut self) {
        let next = self.peek();
        let starts_member = next.is_modifier()
            || next.is_predefined_type()
            || matches!(
                next,
                SyntaxKind::L_BRACKET
                    | SyntaxKind::CLASS_KW
                    | SyntaxKind::STRUCT_KW
                    | SyntaxKind::INTERFACE_KW
                    | SyntaxKind::ENUM_KW
                    | SyntaxKind::DELEGATE_KW
                    | SyntaxKind::EVENT_KW
                    | SyntaxKind::TILDE
                    | SyntaxKind::IDENT
                    | SyntaxKind::L_PAREN
            );
        if !starts_member {
            return;
        }
        // Taken before the leading trivia so the declaration owns it
        let cp = self.decl_checkpoint();
        let first = self.next_index();
        while self.at(SyntaxKind::L_BRACKET) {
            self.parse_attribute_list();
        }
        self.parse_modifier_list();

        match self.peek() {
            SyntaxKind::CLASS_KW => self.parse_type_declaration(cp, SyntaxKind::CLASS_DECL),
            SyntaxKind::STRUCT_KW => self.parse_type_declaration(cp, SyntaxKind::STRUCT_DECL),
            SyntaxKind::INTERFACE_KW => {
                self.parse_type_declaration(cp, SyntaxKind::INTERFACE_DECL)
            }
            SyntaxKind::ENUM_KW => self.parse_enum(cp),
            SyntaxKind::DELEGATE_KW => {
                self.start_node_at(cp, SyntaxKind::DELEGATE_DECL);
                self.bump_until_semicolon();
                self.finish_node();
            }
            SyntaxKind::EVENT_KW => self.parse_event(cp),
            SyntaxKind::TILDE => {
                self.start_node_at(cp, SyntaxKind::DESTRUCTOR_DECL);
                self.bump();
                self.expect(SyntaxKind::IDENT);
                self.parse_param_list();
                self.parse_body();
                self.finish_node();
            }
            SyntaxKind::IDENT if self.nth(1) == SyntaxKind::L_PAREN => self.parse_constructor(cp),
            SyntaxKind::IDENT if self.at_contextual("implicit") || self.at_contextual("explicit") => {
                self.parse_operator(cp)
            }
            kind if kind == SyntaxKind::IDENT || kind.is_predefined_type() || kind == SyntaxKind::L_PAREN => {
                let type_cp = self.checkpoint();
                self.parse_type();
                if self.at_contextual("operator") {
                    self.parse_operator(cp);
                } else if self.at(SyntaxKind::THIS_KW) {
                    self.start_node_at(cp, SyntaxKind::INDEXER_DECL);
                    self.bump();
                    self.bump_balanced(SyntaxKind::L_BRACKET, SyntaxKind::R_BRACKET);
                    self.parse_property_body();
                    self.finish_node();
                } else {
                    self.parse_member_after_type(cp, type_cp);
                }
            }
            _ if self.next_index() != first => {
                // Attributes or modifiers with nothing to apply them to
                self.start_node_at(cp, SyntaxKind::ERROR);
                self.error("expected member declaration");
                self.finish_node();
            }
            _ => {}
        }
    }

    fn parse_member_after_type(&mut self, cp: rowan::Checkpoint, type_cp: rowan::Checkpoint) {
        // The name may be an explicit interface member, `IFoo.Bar`
        let mut lookahead = 1;
        while self.nth(lookahead) == SyntaxKind::DOT && self.nth(lookahead + 1) == SyntaxKind::IDENT {
            lookahead += 2;
        }
        match self.nth(lookahead) {
            SyntaxKind::L_PAREN | SyntaxKind::LT => {
                self.start_node_at(cp, SyntaxKind::METHOD_DECL);
                self.parse_member_name();
                if self.at(SyntaxKind::LT) {
                    self.parse_type_param_list();
                }
                self.parse_param_list();
                while self.at_contextual("where") {
                    self.parse_constraint_clause();
                }
                self.parse_body();
                self.finish_node();
            }
            SyntaxKind::L_BRACE | SyntaxKind::FAT_ARROW => {
                self.start_node_at(cp, SyntaxKind::PROPERTY_DECL);
                self.parse_member_name();
                self.parse_property_body();
                self.finish_node();
            }
            _ => {
                self.start_node_at(cp, SyntaxKind::FIELD_DECL);
                self.start_node_at(type_cp, SyntaxKind::VARIABLE_DECLARATION);
                self.parse_variable_declarators();
                self.finish_node();
                self.expect(SyntaxKind::SEMICOLON);
                self.finish_node();
            }
        }
    }

    fn parse_member_name(&mut self) {
        self.expect(SyntaxKind::IDENT);
        while self.at(SyntaxKind::DOT) && self.nth(1) == SyntaxKind::IDENT {
            self.bump();
            self.bump();
        }
    }

    /// Modifier keywords, always wrapped in a (possibly empty) MODIFIER_LIST
    fn parse_modifier_list(&mut self) {
        self.start_node(SyntaxKind::MODIFIER_LIST);
        while self.peek().is_modifier() && !self.at_new_expression_statement() {
            self.bump();
        }
        self.finish_node();
    }

    fn at_new_expression_statement(&self) -> bool {
        self.at(SyntaxKind::NEW_KW) && self.nth(1) == SyntaxKind::L_PAREN
    }

    fn parse_type_declaration(&mut self, cp: rowan::Checkpoint, kind: SyntaxKind) {
        self.start_node_at(cp, kind);
        self.bump();
        self.expect(SyntaxKind::IDENT);
        if self.at(SyntaxKind::LT) {
            self.parse_type_param_list();
        }
        if self.at(SyntaxKind::COLON) {
            self.parse_base_list();
        }
        while self.at_contextual("where") {
            self.parse_constraint_clause();
        }
        self.parse_member_list(false);
        self.eat(SyntaxKind::SEMICOLON);
        self.finish_node();
    }

    fn parse_enum(&mut self, cp: rowan::Checkpoint) {
        self.start_node_at(cp, SyntaxKind::ENUM_DECL);
        self.bump();
        self.expect(SyntaxKind::IDENT);
        if self.at(SyntaxKind::COLON) {
            self.parse_base_list();
        }
        self.start_node(SyntaxKind::ENUM_MEMBER_LIST);
        self.expect(SyntaxKind::L_BRACE);
        while !self.at_eof() && !self.at(SyntaxKind::R_BRACE) {
            self.start_decl(SyntaxKind::ENUM_MEMBER);
            while self.at(SyntaxKind::L_BRACKET) {
                self.parse_attribute_list();
            }
            self.expect(SyntaxKind::IDENT);
            if self.eat(SyntaxKind::EQ) {
                self.parse_expression();
            }
            self.finish_node();
            if !self.eat(SyntaxKind::COMMA) {
                break;
            }
        }
        self.expect(SyntaxKind::R_BRACE);
        self.finish_node();
        self.eat(SyntaxKind::SEMICOLON);
        self.finish_node();
    }

    fn parse_event(&mut self, cp: rowan::Checkpoint) {
        self.start_node_at(cp, SyntaxKind::EVENT_DECL);
        self.bump();
        self.start_node(SyntaxKind::VARIABLE_DECLARATION);
        self.parse_type();
        self.parse_variable_declarators();
        self.finish_node();
        if self.at(SyntaxKind::L_BRACE) {
            self.parse_accessor_list();
        } else {
            self.expect(SyntaxKind::SEMICOLON);
        }
        self.finish_node();
    }

    fn parse_constructor(&mut self, cp: rowan::Checkpoint) {
        self.start_node_at(cp, SyntaxKind::CONSTRUCTOR_DECL);
        self.bump();
        self.parse_param_list();
        if self.at(SyntaxKind::COLON) {
            self.start_node(SyntaxKind::CONSTRUCTOR_INITIALIZER);
            self.bump();
            if !self.eat(SyntaxKind::BASE_KW) && !self.eat(SyntaxKind::THIS_KW) {
                self.error("expected `base` or `this`");
            }
            self.parse_arg_list();
            self.finish_node();
        }
        self.parse_body();
        self.finish_node();
    }

    fn parse_operator(&mut self, cp: rowan::Checkpoint) {
        self.start_node_at(cp, SyntaxKind::OPERATOR_DECL);
        while !self.at_eof() && !self.at(SyntaxKind::L_PAREN) && !self.at(SyntaxKind::L_BRACE) {
            self.bump();
        }
        self.parse_param_list();
        self.parse_body();
        self.finish_node();
    }

    /// `;`, a block, or `=> expr;`
    pub(in crate::parser) fn parse_body(&mut self) {
        match self.peek() {
            SyntaxKind::L_BRACE => self.parse_block(),
            SyntaxKind::FAT_ARROW => {
                self.parse_expression_body();
                self.expect(SyntaxKind::SEMICOLON);
            }
            _ => {
                self.expect(SyntaxKind::SEMICOLON);
            }
        }
    }

    fn parse_expression_body(&mut self) {
        self.start_node(SyntaxKind::EXPRESSION_BODY);
        self.bump();
        self.parse_expression();
        self.finish_node();
    }

    fn parse_property_body(&mut self) {
        if self.at(SyntaxKind::FAT_ARROW) {
            self.parse_expression_body();
            self.expect(SyntaxKind::SEMICOLON);
            return;
        }
        self.parse_accessor_list();
        if self.eat(SyntaxKind::EQ) {
            self.parse_expression();
            self.expect(SyntaxKind::SEMICOLON);
        }
    }

    fn parse_accessor_list(&mut self) {
        self.start_node(SyntaxKind::ACCESSOR_LIST);
        self.expect(SyntaxKind::L_BRACE);
        while !self.at_eof() && !self.at(SyntaxKind::R_BRACE) {
            let before = self.next_index();
            self.parse_accessor();
            if self.next_index() == before {
                self.error_recover("expected accessor", &[SyntaxKind::R_BRACE]);
            }
        }
        self.expect(SyntaxKind::R_BRACE);
        self.finish_node();
    }

    fn parse_accessor(&mut self) {
        let cp = self.decl_checkpoint();
        let first = self.next_index();
        while self.at(SyntaxKind::L_BRACKET) {
            self.parse_attribute_list();
        }
        self.parse_modifier_list();
        if !matches!(self.nth_text(0), "get" | "set" | "init" | "add" | "remove") {
            if self.next_index() != first {
                self.start_node_at(cp, SyntaxKind::ERROR);
                self.error("expected `get`, `set`, `init`, `add` or `remove`");
                self.finish_node();
            }
            return;
        }
        self.start_node_at(cp, SyntaxKind::ACCESSOR);
        self.bump();
        self.parse_body();
        self.finish_node();
    }

    /// Declarators of a field, event, or local: `a = 1, b`
    pub(in crate::parser) fn parse_variable_declarators(&mut self) {
        loop {
            self.start_node(SyntaxKind::VARIABLE_DECLARATOR);
            self.expect(SyntaxKind::IDENT);
            if self.eat(SyntaxKind::EQ) {
                self.parse_expression();
            }
            self.finish_node();
            if !self.eat(SyntaxKind::COMMA) {
                break;
            }
        }
    }

    // =========================================================================
    // Type parameters, base lists, constraints
    // =========================================================================

    fn parse_type_param_list(&mut self) {
        self.start_node(SyntaxKind::TYPE_PARAM_LIST);
        self.expect(SyntaxKind::LT);
        loop {
            self.start_node(SyntaxKind::TYPE_PARAM);
            while self.at(SyntaxKind::L_BRACKET) {
                self.parse_attribute_list();
            }
            if !self.eat(SyntaxKind::IN_KW) {
                self.eat(SyntaxKind::OUT_KW);
            }
            self.expect(SyntaxKind::IDENT);
            self.finish_node();
            if !self.eat(SyntaxKind::COMMA) {
                break;
            }
        }
        self.expect(SyntaxKind::GT);
        self.finish_node();
    }

    fn parse_base_list(&mut self) {
        self.start_node(SyntaxKind::BASE_LIST);
        self.bump();
        loop {
            self.parse_type();
            if !self.eat(SyntaxKind::COMMA) {
                break;
            }
        }
        self.finish_node();
    }

    fn parse_constraint_clause(&mut self) {
        self.start_node(SyntaxKind::CONSTRAINT_CLAUSE);
        self.bump();
        self.expect(SyntaxKind::IDENT);
        self.expect(SyntaxKind::COLON);
        loop {
            match self.peek() {
                SyntaxKind::CLASS_KW | SyntaxKind::STRUCT_KW => {
                    self.bump();
                    self.eat(SyntaxKind::QUESTION);
                }
                SyntaxKind::NEW_KW => {
                    self.bump();
                    self.expect(SyntaxKind::L_PAREN);
                    self.expect(SyntaxKind::R_PAREN);
                }
                _ => self.parse_type(),
            }
            if !self.eat(SyntaxKind::COMMA) {
                break;
            }
        }
        self.finish_node();
    }

    // =========================================================================
    // Parameters
    // =========================================================================

    pub(in crate::parser) fn parse_param_list(&mut self) {
        self.start_node(SyntaxKind::PARAM_LIST);
        self.expect(SyntaxKind::L_PAREN);
        if !self.at(SyntaxKind::R_PAREN) {
            loop {
                self.parse_param();
                if !self.eat(SyntaxKind::COMMA) {
                    break;
                }
            }
        }
        self.expect(SyntaxKind::R_PAREN);
        self.finish_node();
    }

    pub(in crate::parser) fn parse_param(&mut self) {
        self.start_node(SyntaxKind::PARAM);
        while self.at(SyntaxKind::L_BRACKET) {
            self.parse_attribute_list();
        }
        while self.at_any(&[
            SyntaxKind::REF_KW,
            SyntaxKind::OUT_KW,
            SyntaxKind::IN_KW,
            SyntaxKind::PARAMS_KW,
            SyntaxKind::THIS_KW,
        ]) {
            self.bump();
        }
        self.parse_type();
        self.expect(SyntaxKind::IDENT);
        if self.eat(SyntaxKind::EQ) {
            self.parse_expression();
        }
        self.finish_node();
    }

    // =========================================================================
    // Attributes
    // =========================================================================

    pub(in crate::parser) fn parse_attribute_list(&mut self) {
        self.start_node(SyntaxKind::ATTRIBUTE_LIST);
        self.parse_attribute_list_body();
        self.finish_node();
    }

    fn parse_attribute_list_body(&mut self) {
        self.expect(SyntaxKind::L_BRACKET);
        // Optional target such as `return:` or `assembly:`
        if (self.at(SyntaxKind::IDENT) || self.at(SyntaxKind::RETURN_KW))
            && self.nth(1) == SyntaxKind::COLON
        {
            self.bump();
            self.bump();
        }
        loop {
            self.parse_attribute();
            if !self.eat(SyntaxKind::COMMA) || self.at(SyntaxKind::R_BRACKET) {
                break;
            }
        }
        self.expect(SyntaxKind::R_BRACKET);
    }

    fn parse_attribute(&mut self) {
        self.start_node(SyntaxKind::ATTRIBUTE);
        self.parse_qualified_name();
        if self.at(SyntaxKind::L_PAREN) {
            self.start_node(SyntaxKind::ATTRIBUTE_ARG_LIST);
            self.bump();
            if !self.at(SyntaxKind::R_PAREN) {
                loop {
                    self.start_node(SyntaxKind::ATTRIBUTE_ARG);
                    if self.at(SyntaxKind::IDENT)
                        && matches!(self.nth(1), SyntaxKind::EQ | SyntaxKind::COLON)
                    {
                        self.bump();
                        self.bump();
                    }
                    self.parse_expression();
                    self.finish_node();
                    if !self.eat(SyntaxKind::COMMA) {
                        break;
                    }
                }
            }
            self.expect(SyntaxKind::R_PAREN);
            self.finish_node();
        }
        self.finish_node();
    }

    /// Consume tokens up to and including the next `;`, skipping nested braces
    pub(in crate::parser) fn bump_until_semicolon(&mut self) {
        while !self.at_eof() && !self.at(SyntaxKind::SEMICOLON) {
            match self.peek() {
                SyntaxKind::L_BRACE => self.bump_balanced(SyntaxKind::L_BRACE, SyntaxKind::R_BRACE),
                SyntaxKind::R_BRACE => break,
                _ => self.bump(),
            }
        }
        self.expect(SyntaxKind::SEMICOLON);
    }
}
