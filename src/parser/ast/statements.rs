//! Statements

use super::*;

ast_node!(Block, BLOCK);

impl Block {
    /// Statement nodes between the braces
    pub fn statements(&self) -> impl Iterator<Item = SyntaxNode> + '_ {
        self.0.children()
    }
}

/// The embedded statement of `if`/`while`/`for`/`foreach`/`do`/`else`
fn embedded_statement(node: &SyntaxNode) -> Option<SyntaxNode> {
    node.children().find(|n| n.kind().is_statement())
}

ast_node!(LocalDeclStmt, LOCAL_DECL_STMT);

impl LocalDeclStmt {
    has_token_method!(is_const, CONST_KW, "const int x = 1;");
    first_child_method!(declaration, VariableDeclaration);
}

ast_node!(ExprStmt, EXPR_STMT);

impl ExprStmt {
    pub fn expression(&self) -> Option<SyntaxNode> {
        first_expression(&self.0)
    }
}

ast_node!(ReturnStmt, RETURN_STMT);

impl ReturnStmt {
    pub fn expression(&self) -> Option<SyntaxNode> {
        first_expression(&self.0)
    }
}

ast_node!(ThrowStmt, THROW_STMT);

impl ThrowStmt {
    pub fn expression(&self) -> Option<SyntaxNode> {
        first_expression(&self.0)
    }
}

ast_node!(IfStmt, IF_STMT);

impl IfStmt {
    first_child_method!(else_clause, ElseClause);

    pub fn condition(&self) -> Option<SyntaxNode> {
        first_expression(&self.0)
    }

    pub fn body(&self) -> Option<SyntaxNode> {
        embedded_statement(&self.0)
    }
}

ast_node!(ElseClause, ELSE_CLAUSE);

impl ElseClause {
    pub fn body(&self) -> Option<SyntaxNode> {
        embedded_statement(&self.0)
    }
}

ast_node!(WhileStmt, WHILE_STMT);

impl WhileStmt {
    pub fn condition(&self) -> Option<SyntaxNode> {
        first_expression(&self.0)
    }

    pub fn body(&self) -> Option<SyntaxNode> {
        embedded_statement(&self.0)
    }
}

ast_node!(DoStmt, DO_STMT);

impl DoStmt {
    pub fn condition(&self) -> Option<SyntaxNode> {
        first_expression(&self.0)
    }

    pub fn body(&self) -> Option<SyntaxNode> {
        embedded_statement(&self.0)
    }
}

ast_node!(ForStmt, FOR_STMT);

impl ForStmt {
    first_child_method!(declaration, VariableDeclaration);
    first_child_method!(incrementors, ForIncrementors);

    /// Initializer expressions of `for (i = 0, j = 1; ...)`
    pub fn initializer_expressions(&self) -> Vec<SyntaxNode> {
        self.sections().0
    }

    pub fn condition(&self) -> Option<SyntaxNode> {
        self.sections().1
    }

    pub fn body(&self) -> Option<SyntaxNode> {
        embedded_statement(&self.0)
    }

    /// Expressions before the first `;` and the one between the two `;`
    fn sections(&self) -> (Vec<SyntaxNode>, Option<SyntaxNode>) {
        let mut semicolons = 0;
        let mut initializers = Vec::new();
        let mut condition = None;
        for element in self.0.children_with_tokens() {
            match element {
                rowan::NodeOrToken::Token(t) if t.kind() == SyntaxKind::SEMICOLON => semicolons += 1,
                rowan::NodeOrToken::Node(n) if n.kind().is_expression() => match semicolons {
                    0 => initializers.push(n),
                    1 => condition = Some(n),
                    _ => {}
                },
                _ => {}
            }
        }
        (initializers, condition)
    }
}

ast_node!(ForIncrementors, FOR_INCREMENTORS);

impl ForIncrementors {
    pub fn expressions(&self) -> impl Iterator<Item = SyntaxNode> + '_ {
        self.0.children().filter(|n| n.kind().is_expression())
    }
}

ast_node!(ForeachStmt, FOREACH_STMT);

impl ForeachStmt {
    first_child_method!(variable, ForeachVariable);

    /// The iterated collection
    pub fn expression(&self) -> Option<SyntaxNode> {
        first_expression(&self.0)
    }

    pub fn body(&self) -> Option<SyntaxNode> {
        embedded_statement(&self.0)
    }
}

ast_node!(ForeachVariable, FOREACH_VARIABLE);

impl ForeachVariable {
    name_token_method!();
    first_child_method!(ty, TypeRef);
}

ast_node!(TryStmt, TRY_STMT);

impl TryStmt {
    first_child_method!(block, Block);
    children_method!(catches, CatchClause);
    first_child_method!(finally_clause, FinallyClause);
}

ast_node!(CatchClause, CATCH_CLAUSE);

impl CatchClause {
    first_child_method!(declaration, CatchDecl);
    first_child_method!(filter, CatchFilter);
    first_child_method!(block, Block);
}

ast_node!(CatchDecl, CATCH_DECL);

impl CatchDecl {
    first_child_method!(ty, TypeRef);

    pub fn name(&self) -> Option<String> {
        find_token(&self.0, SyntaxKind::IDENT).map(|t| t.text().to_string())
    }
}

ast_node!(CatchFilter, CATCH_FILTER);

impl CatchFilter {
    pub fn condition(&self) -> Option<SyntaxNode> {
        first_expression(&self.0)
    }
}

ast_node!(FinallyClause, FINALLY_CLAUSE);

impl FinallyClause {
    first_child_method!(block, Block);
}
