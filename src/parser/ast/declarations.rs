//! Declarations: compilation unit, namespaces, types, members, parameters,
//! attributes

use super::*;

// ============================================================================
// Compilation unit and namespaces
// ============================================================================

ast_node!(SourceFile, SOURCE_FILE);

impl SourceFile {
    /// Top-level declaration nodes, in order (usings, namespaces, types, and
    /// anything else the parser produced)
    pub fn members(&self) -> impl Iterator<Item = SyntaxNode> + '_ {
        self.0.children()
    }
}

ast_node!(UsingDirective, USING_DIRECTIVE);

impl UsingDirective {
    has_token_method!(is_static, STATIC_KW, "using static System.Math;");
    first_child_method!(qualified_name, QualifiedName);
    first_child_method!(target_type, TypeRef);

    /// Alias name in `using Alias = Target;`
    pub fn alias(&self) -> Option<String> {
        self.0
            .children()
            .find(|n| n.kind() == SyntaxKind::USING_ALIAS)
            .and_then(|n| find_token(&n, SyntaxKind::IDENT))
            .map(|t| t.text().to_string())
    }

    /// The imported namespace or aliased type, as written without trivia
    pub fn target(&self) -> Option<String> {
        self.qualified_name()
            .map(|n| n.text())
            .or_else(|| self.target_type().map(|t| t.text()))
    }
}

ast_node!(QualifiedName, QUALIFIED_NAME);

impl QualifiedName {
    /// The dotted name without trivia
    pub fn text(&self) -> String {
        self.0
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .filter(|t| !t.kind().is_trivia())
            .map(|t| t.text().to_string())
            .collect()
    }

    pub fn segments(&self) -> Vec<String> {
        self.0
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .filter(|t| t.kind() == SyntaxKind::IDENT)
            .map(|t| t.text().to_string())
            .collect()
    }
}

ast_node!(NamespaceDecl, NAMESPACE_DECL);

impl NamespaceDecl {
    first_child_method!(qualified_name, QualifiedName);
    first_child_method!(body, MemberList);

    pub fn name(&self) -> Option<String> {
        self.qualified_name().map(|n| n.text())
    }

    /// Whether this is a file-scoped `namespace X;` declaration
    pub fn is_file_scoped(&self) -> bool {
        has_token(&self.0, SyntaxKind::SEMICOLON)
    }
}

ast_node!(MemberList, MEMBER_LIST);

impl MemberList {
    /// Member declaration nodes between the braces
    pub fn members(&self) -> impl Iterator<Item = SyntaxNode> + '_ {
        self.0.children()
    }
}

// ============================================================================
// Shared declaration parts
// ============================================================================

ast_node!(ModifierList, MODIFIER_LIST);

impl ModifierList {
    /// Modifier keyword kinds in source order
    pub fn kinds(&self) -> Vec<SyntaxKind> {
        self.0
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .map(|t| t.kind())
            .filter(|k| k.is_modifier())
            .collect()
    }

    pub fn has(&self, kind: SyntaxKind) -> bool {
        has_token(&self.0, kind)
    }

    pub fn is_empty(&self) -> bool {
        self.kinds().is_empty()
    }
}

ast_node!(AttributeList, ATTRIBUTE_LIST);

impl AttributeList {
    children_method!(attributes, Attribute);

    /// Target of the list, e.g. `return` in `[return: NotNull]`
    pub fn target(&self) -> Option<String> {
        let mut tokens = self
            .0
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .filter(|t| !t.kind().is_trivia());
        let _open = tokens.next()?;
        let target = tokens.next()?;
        let colon = tokens.next()?;
        (colon.kind() == SyntaxKind::COLON).then(|| target.text().to_string())
    }
}

ast_node!(Attribute, ATTRIBUTE);

impl Attribute {
    first_child_method!(qualified_name, QualifiedName);
    first_child_method!(arg_list, AttributeArgList);

    pub fn name(&self) -> Option<String> {
        self.qualified_name().map(|n| n.text())
    }

    pub fn args(&self) -> Vec<AttributeArg> {
        self.arg_list()
            .map(|l| l.args().collect())
            .unwrap_or_default()
    }
}

ast_node!(AttributeArgList, ATTRIBUTE_ARG_LIST);

impl AttributeArgList {
    children_method!(args, AttributeArg);
}

ast_node!(AttributeArg, ATTRIBUTE_ARG);

impl AttributeArg {
    /// Name and separator (`=` or `:`) of a named argument
    pub fn name(&self) -> Option<(String, SyntaxKind)> {
        let mut tokens = self
            .0
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .filter(|t| !t.kind().is_trivia());
        let name = tokens.next()?;
        let sep = tokens.next()?;
        (name.kind() == SyntaxKind::IDENT && matches!(sep.kind(), SyntaxKind::EQ | SyntaxKind::COLON))
            .then(|| (name.text().to_string(), sep.kind()))
    }

    pub fn value(&self) -> Option<SyntaxNode> {
        first_expression(&self.0)
    }
}

ast_node!(TypeParamList, TYPE_PARAM_LIST);

impl TypeParamList {
    children_method!(params, TypeParam);
}

ast_node!(TypeParam, TYPE_PARAM);

impl TypeParam {
    name_token_method!();
    has_token_method!(is_in, IN_KW, "interface I<in T>");
    has_token_method!(is_out, OUT_KW, "interface I<out T>");
    children_method!(attribute_lists, AttributeList);
}

ast_node!(BaseList, BASE_LIST);

impl BaseList {
    children_method!(types, TypeRef);
}

ast_node!(ConstraintClause, CONSTRAINT_CLAUSE);

impl ConstraintClause {
    /// The constrained type parameter
    pub fn target(&self) -> Option<String> {
        self.0
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .filter(|t| t.kind() == SyntaxKind::IDENT)
            .nth(1)
            .map(|t| t.text().to_string())
    }

    /// Each constraint after the colon, as canonical text
    /// (`class`, `struct`, `new()`, or a type)
    pub fn constraints(&self) -> Vec<String> {
        let mut out = Vec::new();
        let mut after_colon = false;
        let mut current: Vec<String> = Vec::new();
        for element in self.0.children_with_tokens() {
            match element {
                rowan::NodeOrToken::Token(t) if t.kind().is_trivia() => {}
                rowan::NodeOrToken::Token(t) if t.kind() == SyntaxKind::COLON && !after_colon => {
                    after_colon = true;
                }
                rowan::NodeOrToken::Token(t) if t.kind() == SyntaxKind::COMMA => {
                    out.push(current.concat());
                    current.clear();
                }
                rowan::NodeOrToken::Token(t) if after_colon => current.push(t.text().to_string()),
                rowan::NodeOrToken::Node(n) if after_colon => current.push(canonical_text(&n)),
                _ => {}
            }
        }
        if !current.is_empty() {
            out.push(current.concat());
        }
        out
    }
}

// ============================================================================
// Type declarations
// ============================================================================

/// A class, struct, interface or enum declaration
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeDecl(pub(crate) SyntaxNode);

impl AstNode for TypeDecl {
    fn can_cast(kind: SyntaxKind) -> bool {
        kind.is_type_declaration()
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

impl TypeDecl {
    children_method!(attribute_lists, AttributeList);
    first_child_method!(modifier_list, ModifierList);
    first_child_method!(type_param_list, TypeParamList);
    first_child_method!(base_list, BaseList);
    children_method!(constraint_clauses, ConstraintClause);
    first_child_method!(member_list, MemberList);
    first_child_method!(enum_member_list, EnumMemberList);

    /// The identifier right after the `class`/`struct`/... keyword
    pub fn name_token(&self) -> Option<SyntaxToken> {
        self.0
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .find(|t| t.kind() == SyntaxKind::IDENT)
    }

    pub fn name(&self) -> Option<String> {
        self.name_token().map(|t| t.text().to_string())
    }

    pub fn type_params(&self) -> Vec<TypeParam> {
        self.type_param_list()
            .map(|l| l.params().collect())
            .unwrap_or_default()
    }
}

ast_node!(EnumMemberList, ENUM_MEMBER_LIST);

impl EnumMemberList {
    children_method!(members, EnumMember);
}

ast_node!(EnumMember, ENUM_MEMBER);

impl EnumMember {
    name_token_method!();
    children_method!(attribute_lists, AttributeList);

    pub fn value(&self) -> Option<SyntaxNode> {
        first_expression(&self.0)
    }
}

// ============================================================================
// Members
// ============================================================================

ast_node!(VariableDeclaration, VARIABLE_DECLARATION);

impl VariableDeclaration {
    first_child_method!(ty, TypeRef);
    children_method!(declarators, VariableDeclarator);
}

ast_node!(VariableDeclarator, VARIABLE_DECLARATOR);

impl VariableDeclarator {
    name_token_method!();

    pub fn initializer(&self) -> Option<SyntaxNode> {
        first_expression(&self.0)
    }
}

ast_node!(FieldDecl, FIELD_DECL);

impl FieldDecl {
    children_method!(attribute_lists, AttributeList);
    first_child_method!(modifier_list, ModifierList);
    first_child_method!(declaration, VariableDeclaration);
}

ast_node!(EventDecl, EVENT_DECL);

impl EventDecl {
    children_method!(attribute_lists, AttributeList);
    first_child_method!(modifier_list, ModifierList);
    first_child_method!(declaration, VariableDeclaration);
    first_child_method!(accessor_list, AccessorList);
}

ast_node!(PropertyDecl, PROPERTY_DECL);

impl PropertyDecl {
    name_token_method!();
    children_method!(attribute_lists, AttributeList);
    first_child_method!(modifier_list, ModifierList);
    first_child_method!(ty, TypeRef);
    first_child_method!(accessor_list, AccessorList);
    first_child_method!(expression_body, ExpressionBody);

    /// Initializer in `int P { get; } = 5;`
    pub fn initializer(&self) -> Option<SyntaxNode> {
        first_expression(&self.0)
    }

    pub fn accessors(&self) -> Vec<Accessor> {
        self.accessor_list()
            .map(|l| l.accessors().collect())
            .unwrap_or_default()
    }
}

ast_node!(AccessorList, ACCESSOR_LIST);

impl AccessorList {
    children_method!(accessors, Accessor);
}

ast_node!(Accessor, ACCESSOR);

impl Accessor {
    children_method!(attribute_lists, AttributeList);
    first_child_method!(modifier_list, ModifierList);
    first_child_method!(body, Block);
    first_child_method!(expression_body, ExpressionBody);

    /// The `get`/`set`/`init`/`add`/`remove` keyword
    pub fn keyword(&self) -> Option<SyntaxToken> {
        find_token(&self.0, SyntaxKind::IDENT)
    }
}

ast_node!(ExpressionBody, EXPRESSION_BODY);

impl ExpressionBody {
    pub fn expression(&self) -> Option<SyntaxNode> {
        first_expression(&self.0)
    }
}

ast_node!(MethodDecl, METHOD_DECL);

impl MethodDecl {
    name_token_method!();
    children_method!(attribute_lists, AttributeList);
    first_child_method!(modifier_list, ModifierList);
    first_child_method!(return_type, TypeRef);
    first_child_method!(type_param_list, TypeParamList);
    first_child_method!(param_list, ParamList);
    children_method!(constraint_clauses, ConstraintClause);
    first_child_method!(body, Block);
    first_child_method!(expression_body, ExpressionBody);

    /// Whether the name is qualified by an interface (`void IFoo.Bar()`)
    pub fn is_explicit_implementation(&self) -> bool {
        has_token(&self.0, SyntaxKind::DOT)
    }

    pub fn params(&self) -> Vec<Param> {
        self.param_list()
            .map(|l| l.params().collect())
            .unwrap_or_default()
    }

    pub fn type_params(&self) -> Vec<TypeParam> {
        self.type_param_list()
            .map(|l| l.params().collect())
            .unwrap_or_default()
    }
}

ast_node!(ConstructorDecl, CONSTRUCTOR_DECL);

impl ConstructorDecl {
    name_token_method!();
    children_method!(attribute_lists, AttributeList);
    first_child_method!(modifier_list, ModifierList);
    first_child_method!(param_list, ParamList);
    first_child_method!(initializer, ConstructorInitializer);
    first_child_method!(body, Block);
    first_child_method!(expression_body, ExpressionBody);

    pub fn params(&self) -> Vec<Param> {
        self.param_list()
            .map(|l| l.params().collect())
            .unwrap_or_default()
    }
}

ast_node!(ConstructorInitializer, CONSTRUCTOR_INITIALIZER);

impl ConstructorInitializer {
    /// `base(...)` or `this(...)` without the colon, canonical form
    pub fn text(&self) -> String {
        let mut text = String::new();
        for element in self.0.children_with_tokens() {
            match element {
                rowan::NodeOrToken::Token(t)
                    if t.kind() == SyntaxKind::BASE_KW || t.kind() == SyntaxKind::THIS_KW =>
                {
                    text.push_str(t.text())
                }
                rowan::NodeOrToken::Node(n) => text.push_str(&n.to_string()),
                _ => {}
            }
        }
        text
    }
}

// ============================================================================
// Parameters
// ============================================================================

ast_node!(ParamList, PARAM_LIST);

impl ParamList {
    children_method!(params, Param);
}

ast_node!(Param, PARAM);

impl Param {
    name_token_method!();
    children_method!(attribute_lists, AttributeList);
    first_child_method!(ty, TypeRef);
    has_token_method!(is_ref, REF_KW);
    has_token_method!(is_out, OUT_KW);
    has_token_method!(is_in, IN_KW);
    has_token_method!(is_params, PARAMS_KW, "params int[] values");
    has_token_method!(is_this, THIS_KW, "this string self");

    pub fn default_value(&self) -> Option<SyntaxNode> {
        first_expression(&self.0)
    }
}
