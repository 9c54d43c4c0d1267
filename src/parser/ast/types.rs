//! Type references and expression helpers

use super::*;

ast_node!(TypeRef, TYPE);

impl TypeRef {
    /// The type as written (type nodes never carry outer trivia)
    pub fn text(&self) -> String {
        self.0.to_string()
    }

    /// Whether this is a keyword type such as `int` or `string`
    pub fn is_predefined(&self) -> bool {
        self.0
            .first_token()
            .map(|t| t.kind().is_predefined_type())
            .unwrap_or(false)
    }

    /// Whether this is the implicit `var` type
    pub fn is_var(&self) -> bool {
        self.text() == "var"
    }

    /// Generic arguments of the outermost name, e.g. `[int, string]`
    pub fn type_args(&self) -> Vec<TypeRef> {
        self.0
            .children()
            .filter(|n| n.kind() == SyntaxKind::TYPE_ARG_LIST)
            .flat_map(|l| l.children().filter_map(TypeRef::cast).collect::<Vec<_>>())
            .collect()
    }
}

/// Whether a node is an expression node
pub fn is_expression(node: &SyntaxNode) -> bool {
    node.kind().is_expression()
}

/// The operator token of an ASSIGN_EXPR, joining `>` `>=` into `>>=`
pub fn assignment_operator(node: &SyntaxNode) -> Option<String> {
    let mut text = String::new();
    for token in node
        .children_with_tokens()
        .filter_map(|e| e.into_token())
        .filter(|t| !t.kind().is_trivia())
    {
        text.push_str(token.text());
    }
    (!text.is_empty()).then_some(text)
}

/// Left and right operands of an ASSIGN_EXPR
pub fn assignment_operands(node: &SyntaxNode) -> (Option<SyntaxNode>, Option<SyntaxNode>) {
    let mut operands = node.children().filter(|n| n.kind().is_expression());
    (operands.next(), operands.next())
}
