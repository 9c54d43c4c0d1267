//! Syntax kinds for the Rowan-based CST
//!
//! This enum defines all possible node and token kinds in the syntax tree
//! for the supported C# subset.

/// All syntax kinds (tokens and nodes) of the C# subset
///
/// Tokens are leaf nodes (identifiers, keywords, punctuation).
/// Nodes are composite (declarations, statements, expressions).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // =========================================================================
    // TRIVIA (whitespace and comments - preserved but not semantically meaningful)
    // =========================================================================
    WHITESPACE = 0,
    LINE_COMMENT,
    DOC_COMMENT,
    BLOCK_COMMENT,

    // =========================================================================
    // LITERALS
    // =========================================================================
    IDENT,          // identifier, including @verbatim identifiers
    INT_NUMBER,     // 42, 0xFF, 10UL
    REAL_NUMBER,    // 3.14, 1e5, 2.0f
    STRING,         // "hello"
    VERBATIM_STRING, // @"c:\temp"
    INTERPOLATED_STRING, // $"{x}"
    CHAR,           // 'c'

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    L_BRACE,        // {
    R_BRACE,        // }
    L_BRACKET,      // [
    R_BRACKET,      // ]
    L_PAREN,        // (
    R_PAREN,        // )
    SEMICOLON,      // ;
    COLON,          // :
    COLON_COLON,    // ::
    COMMA,          // ,
    DOT,            // .
    QUESTION,       // ?
    QUESTION_DOT,   // ?.
    QUESTION_QUESTION, // ??
    QUESTION_QUESTION_EQ, // ??=
    EQ,             // =
    EQ_EQ,          // ==
    BANG,           // !
    BANG_EQ,        // !=
    LT,             // <
    GT,             // >
    LT_EQ,          // <=
    GT_EQ,          // >=
    LT_LT,          // <<
    LT_LT_EQ,       // <<=
    PLUS,           // +
    MINUS,          // -
    STAR,           // *
    SLASH,          // /
    PERCENT,        // %
    AMP,            // &
    PIPE,           // |
    CARET,          // ^
    TILDE,          // ~
    AMP_AMP,        // &&
    PIPE_PIPE,      // ||
    PLUS_PLUS,      // ++
    MINUS_MINUS,    // --
    PLUS_EQ,        // +=
    MINUS_EQ,       // -=
    STAR_EQ,        // *=
    SLASH_EQ,       // /=
    PERCENT_EQ,     // %=
    AMP_EQ,         // &=
    PIPE_EQ,        // |=
    CARET_EQ,       // ^=
    FAT_ARROW,      // =>

    // =========================================================================
    // KEYWORDS
    // =========================================================================
    // Declarations
    USING_KW,
    NAMESPACE_KW,
    CLASS_KW,
    STRUCT_KW,
    INTERFACE_KW,
    ENUM_KW,
    DELEGATE_KW,
    EVENT_KW,

    // Modifiers
    PUBLIC_KW,
    PRIVATE_KW,
    PROTECTED_KW,
    INTERNAL_KW,
    STATIC_KW,
    ABSTRACT_KW,
    VIRTUAL_KW,
    OVERRIDE_KW,
    SEALED_KW,
    READONLY_KW,
    CONST_KW,
    NEW_KW,
    PARTIAL_KW,
    ASYNC_KW,
    EXTERN_KW,
    UNSAFE_KW,
    VOLATILE_KW,

    // Parameters
    REF_KW,
    OUT_KW,
    IN_KW,
    PARAMS_KW,
    THIS_KW,
    BASE_KW,

    // Statements
    RETURN_KW,
    IF_KW,
    ELSE_KW,
    WHILE_KW,
    DO_KW,
    FOR_KW,
    FOREACH_KW,
    TRY_KW,
    CATCH_KW,
    FINALLY_KW,
    THROW_KW,
    BREAK_KW,
    CONTINUE_KW,
    LOCK_KW,
    SWITCH_KW,
    CASE_KW,
    GOTO_KW,

    // Expressions
    TRUE_KW,
    FALSE_KW,
    NULL_KW,
    TYPEOF_KW,
    DEFAULT_KW,
    IS_KW,
    AS_KW,

    // Predefined types
    VOID_KW,
    BOOL_KW,
    BYTE_KW,
    SBYTE_KW,
    CHAR_KW,
    DECIMAL_KW,
    DOUBLE_KW,
    FLOAT_KW,
    INT_KW,
    LONG_KW,
    OBJECT_KW,
    SHORT_KW,
    STRING_KW,
    UINT_KW,
    ULONG_KW,
    USHORT_KW,

    // =========================================================================
    // NODES
    // =========================================================================
    SOURCE_FILE,
    USING_DIRECTIVE,
    USING_ALIAS,
    NAMESPACE_DECL,
    QUALIFIED_NAME,
    MEMBER_LIST,
    CLASS_DECL,
    STRUCT_DECL,
    INTERFACE_DECL,
    ENUM_DECL,
    ENUM_MEMBER_LIST,
    ENUM_MEMBER,
    DELEGATE_DECL,
    ATTRIBUTE_LIST,
    ATTRIBUTE,
    ATTRIBUTE_ARG_LIST,
    ATTRIBUTE_ARG,
    MODIFIER_LIST,
    TYPE_PARAM_LIST,
    TYPE_PARAM,
    BASE_LIST,
    CONSTRAINT_CLAUSE,
    FIELD_DECL,
    VARIABLE_DECLARATION,
    VARIABLE_DECLARATOR,
    EVENT_DECL,
    PROPERTY_DECL,
    ACCESSOR_LIST,
    ACCESSOR,
    METHOD_DECL,
    CONSTRUCTOR_DECL,
    CONSTRUCTOR_INITIALIZER,
    DESTRUCTOR_DECL,
    INDEXER_DECL,
    OPERATOR_DECL,
    PARAM_LIST,
    PARAM,
    EXPRESSION_BODY,
    TYPE,
    TYPE_ARG_LIST,

    // Statements
    BLOCK,
    LOCAL_DECL_STMT,
    EXPR_STMT,
    RETURN_STMT,
    IF_STMT,
    ELSE_CLAUSE,
    WHILE_STMT,
    DO_STMT,
    FOR_STMT,
    FOR_INCREMENTORS,
    FOREACH_STMT,
    FOREACH_VARIABLE,
    TRY_STMT,
    CATCH_CLAUSE,
    CATCH_DECL,
    CATCH_FILTER,
    FINALLY_CLAUSE,
    THROW_STMT,
    BREAK_STMT,
    CONTINUE_STMT,
    EMPTY_STMT,
    LOCK_STMT,
    SWITCH_STMT,
    GOTO_STMT,
    USING_STMT,

    // Expressions
    LITERAL,
    NAME_REF,
    PREDEFINED_TYPE_REF,
    THIS_EXPR,
    BASE_EXPR,
    MEMBER_ACCESS,
    CALL_EXPR,
    ARG_LIST,
    ARG,
    INDEX_EXPR,
    NEW_EXPR,
    INITIALIZER_EXPR,
    PAREN_EXPR,
    TYPEOF_EXPR,
    CAST_EXPR,
    LAMBDA_EXPR,
    DEFAULT_EXPR,
    PREFIX_EXPR,
    POSTFIX_EXPR,
    BINARY_EXPR,
    ASSIGN_EXPR,
    CONDITIONAL_EXPR,

    // Special
    ERROR,

    #[doc(hidden)]
    __LAST,
}

impl SyntaxKind {
    /// Fixed text of a keyword or punctuation token
    pub fn text(self) -> Option<&'static str> {
        let text = match self {
            Self::L_BRACE => "{",
            Self::R_BRACE => "}",
            Self::L_BRACKET => "[",
            Self::R_BRACKET => "]",
            Self::L_PAREN => "(",
            Self::R_PAREN => ")",
            Self::SEMICOLON => ";",
            Self::COLON => ":",
            Self::COLON_COLON => "::",
            Self::COMMA => ",",
            Self::DOT => ".",
            Self::QUESTION => "?",
            Self::QUESTION_DOT => "?.",
            Self::QUESTION_QUESTION => "??",
            Self::QUESTION_QUESTION_EQ => "??=",
            Self::EQ => "=",
            Self::EQ_EQ => "==",
            Self::BANG => "!",
            Self::BANG_EQ => "!=",
            Self::LT => "<",
            Self::GT => ">",
            Self::LT_EQ => "<=",
            Self::GT_EQ => ">=",
            Self::LT_LT => "<<",
            Self::LT_LT_EQ => "<<=",
            Self::PLUS => "+",
            Self::MINUS => "-",
            Self::STAR => "*",
            Self::SLASH => "/",
            Self::PERCENT => "%",
            Self::AMP => "&",
            Self::PIPE => "|",
            Self::CARET => "^",
            Self::TILDE => "~",
            Self::AMP_AMP => "&&",
            Self::PIPE_PIPE => "||",
            Self::PLUS_PLUS => "++",
            Self::MINUS_MINUS => "--",
            Self::PLUS_EQ => "+=",
            Self::MINUS_EQ => "-=",
            Self::STAR_EQ => "*=",
            Self::SLASH_EQ => "/=",
            Self::PERCENT_EQ => "%=",
            Self::AMP_EQ => "&=",
            Self::PIPE_EQ => "|=",
            Self::CARET_EQ => "^=",
            Self::FAT_ARROW => "=>",
            Self::USING_KW => "using",
            Self::NAMESPACE_KW => "namespace",
            Self::CLASS_KW => "class",
            Self::STRUCT_KW => "struct",
            Self::INTERFACE_KW => "interface",
            Self::ENUM_KW => "enum",
            Self::DELEGATE_KW => "delegate",
            Self::EVENT_KW => "event",
            Self::PUBLIC_KW => "public",
            Self::PRIVATE_KW => "private",
            Self::PROTECTED_KW => "protected",
            Self::INTERNAL_KW => "internal",
            Self::STATIC_KW => "static",
            Self::ABSTRACT_KW => "abstract",
            Self::VIRTUAL_KW => "virtual",
            Self::OVERRIDE_KW => "override",
            Self::SEALED_KW => "sealed",
            Self::READONLY_KW => "readonly",
            Self::CONST_KW => "const",
            Self::NEW_KW => "new",
            Self::PARTIAL_KW => "partial",
            Self::ASYNC_KW => "async",
            Self::EXTERN_KW => "extern",
            Self::UNSAFE_KW => "unsafe",
            Self::VOLATILE_KW => "volatile",
            Self::REF_KW => "ref",
            Self::OUT_KW => "out",
            Self::IN_KW => "in",
            Self::PARAMS_KW => "params",
            Self::THIS_KW => "this",
            Self::BASE_KW => "base",
            Self::RETURN_KW => "return",
            Self::IF_KW => "if",
            Self::ELSE_KW => "else",
            Self::WHILE_KW => "while",
            Self::DO_KW => "do",
            Self::FOR_KW => "for",
            Self::FOREACH_KW => "foreach",
            Self::TRY_KW => "try",
            Self::CATCH_KW => "catch",
            Self::FINALLY_KW => "finally",
            Self::THROW_KW => "throw",
            Self::BREAK_KW => "break",
            Self::CONTINUE_KW => "continue",
            Self::LOCK_KW => "lock",
            Self::SWITCH_KW => "switch",
            Self::CASE_KW => "case",
            Self::GOTO_KW => "goto",
            Self::TRUE_KW => "true",
            Self::FALSE_KW => "false",
            Self::NULL_KW => "null",
            Self::TYPEOF_KW => "typeof",
            Self::DEFAULT_KW => "default",
            Self::IS_KW => "is",
            Self::AS_KW => "as",
            Self::VOID_KW => "void",
            Self::BOOL_KW => "bool",
            Self::BYTE_KW => "byte",
            Self::SBYTE_KW => "sbyte",
            Self::CHAR_KW => "char",
            Self::DECIMAL_KW => "decimal",
            Self::DOUBLE_KW => "double",
            Self::FLOAT_KW => "float",
            Self::INT_KW => "int",
            Self::LONG_KW => "long",
            Self::OBJECT_KW => "object",
            Self::SHORT_KW => "short",
            Self::STRING_KW => "string",
            Self::UINT_KW => "uint",
            Self::ULONG_KW => "ulong",
            Self::USHORT_KW => "ushort",
            _ => return None,
        };
        Some(text)
    }

    /// Check if this is a trivia token (whitespace or comment)
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            Self::WHITESPACE | Self::LINE_COMMENT | Self::DOC_COMMENT | Self::BLOCK_COMMENT
        )
    }

    /// Check if this is a keyword
    pub fn is_keyword(self) -> bool {
        (self as u16) >= (Self::USING_KW as u16) && (self as u16) <= (Self::USHORT_KW as u16)
    }

    /// Check if this is a punctuation token
    pub fn is_punct(self) -> bool {
        (self as u16) >= (Self::L_BRACE as u16) && (self as u16) <= (Self::FAT_ARROW as u16)
    }

    /// Check if this is a literal
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            Self::INT_NUMBER
                | Self::REAL_NUMBER
                | Self::STRING
                | Self::VERBATIM_STRING
                | Self::INTERPOLATED_STRING
                | Self::CHAR
                | Self::TRUE_KW
                | Self::FALSE_KW
                | Self::NULL_KW
        )
    }

    /// Check if this is a declaration modifier keyword
    pub fn is_modifier(self) -> bool {
        (self as u16) >= (Self::PUBLIC_KW as u16) && (self as u16) <= (Self::VOLATILE_KW as u16)
    }

    /// Check if this is an access modifier keyword
    pub fn is_access_modifier(self) -> bool {
        matches!(
            self,
            Self::PUBLIC_KW | Self::PRIVATE_KW | Self::PROTECTED_KW | Self::INTERNAL_KW
        )
    }

    /// Check if this is a predefined type keyword (`int`, `string`, `void`, ...)
    pub fn is_predefined_type(self) -> bool {
        (self as u16) >= (Self::VOID_KW as u16) && (self as u16) <= (Self::USHORT_KW as u16)
    }

    /// Check if this is a compound or simple assignment operator
    pub fn is_assignment_op(self) -> bool {
        matches!(
            self,
            Self::EQ
                | Self::PLUS_EQ
                | Self::MINUS_EQ
                | Self::STAR_EQ
                | Self::SLASH_EQ
                | Self::PERCENT_EQ
                | Self::AMP_EQ
                | Self::PIPE_EQ
                | Self::CARET_EQ
                | Self::LT_LT_EQ
                | Self::QUESTION_QUESTION_EQ
        )
    }

    /// Check if this node kind is an expression
    pub fn is_expression(self) -> bool {
        (self as u16) >= (Self::LITERAL as u16) && (self as u16) <= (Self::CONDITIONAL_EXPR as u16)
            && self != Self::ARG_LIST
            && self != Self::ARG
    }

    /// Check if this node kind is a statement
    pub fn is_statement(self) -> bool {
        (self as u16) >= (Self::BLOCK as u16)
            && (self as u16) <= (Self::USING_STMT as u16)
            && !matches!(
                self,
                Self::ELSE_CLAUSE
                    | Self::FOR_INCREMENTORS
                    | Self::FOREACH_VARIABLE
                    | Self::CATCH_CLAUSE
                    | Self::CATCH_DECL
                    | Self::CATCH_FILTER
                    | Self::FINALLY_CLAUSE
            )
    }

    /// Check if this node kind declares a type (class, struct, interface, enum)
    pub fn is_type_declaration(self) -> bool {
        matches!(
            self,
            Self::CLASS_DECL | Self::STRUCT_DECL | Self::INTERFACE_DECL | Self::ENUM_DECL
        )
    }

    /// Check if this node kind can appear inside a type's member list
    pub fn is_member_declaration(self) -> bool {
        self.is_type_declaration()
            || matches!(
                self,
                Self::FIELD_DECL
                    | Self::EVENT_DECL
                    | Self::PROPERTY_DECL
                    | Self::METHOD_DECL
                    | Self::CONSTRUCTOR_DECL
                    | Self::DELEGATE_DECL
                    | Self::DESTRUCTOR_DECL
                    | Self::INDEXER_DECL
                    | Self::OPERATOR_DECL
            )
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

impl From<rowan::SyntaxKind> for SyntaxKind {
    fn from(raw: rowan::SyntaxKind) -> Self {
        assert!(raw.0 < SyntaxKind::__LAST as u16);
        // Safety: we control all syntax kinds and check bounds above
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }
}

/// Language definition for Rowan
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CSharpLanguage {}

impl rowan::Language for CSharpLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        raw.into()
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type aliases for convenience
pub type SyntaxNode = rowan::SyntaxNode<CSharpLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<CSharpLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<CSharpLanguage>;
