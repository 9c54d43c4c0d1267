//! Node payloads: the scalar state of each node kind
//!
//! [`NodeData`] is a closed enum with one variant per [`NodeKind`]. Payloads
//! hold only scalars (names, modifiers, expression text); child nodes live in
//! the node's slots.

use super::kind::{KindGroup, NodeKind};
use crate::parser::{
    FragmentKind, SyntaxKind, SyntaxNode, canonical_source, parse_fragment,
};
use crate::semantic::Accessibility;
use smol_str::SmolStr;
use std::path::PathBuf;

// ============================================================================
// Modifiers
// ============================================================================

/// Non-access modifier keywords of a declaration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
    pub is_new: bool,
    pub is_static: bool,
    pub is_abstract: bool,
    pub is_virtual: bool,
    pub is_sealed: bool,
    pub is_override: bool,
    pub is_readonly: bool,
    pub is_const: bool,
    pub is_extern: bool,
    pub is_unsafe: bool,
    pub is_volatile: bool,
    pub is_async: bool,
    pub is_partial: bool,
}

impl Modifiers {
    /// Read modifiers from keyword kinds; access keywords are ignored
    pub fn from_kinds(kinds: &[SyntaxKind]) -> Self {
        let has = |kind| kinds.contains(&kind);
        Self {
            is_new: has(SyntaxKind::NEW_KW),
            is_static: has(SyntaxKind::STATIC_KW),
            is_abstract: has(SyntaxKind::ABSTRACT_KW),
            is_virtual: has(SyntaxKind::VIRTUAL_KW),
            is_sealed: has(SyntaxKind::SEALED_KW),
            is_override: has(SyntaxKind::OVERRIDE_KW),
            is_readonly: has(SyntaxKind::READONLY_KW),
            is_const: has(SyntaxKind::CONST_KW),
            is_extern: has(SyntaxKind::EXTERN_KW),
            is_unsafe: has(SyntaxKind::UNSAFE_KW),
            is_volatile: has(SyntaxKind::VOLATILE_KW),
            is_async: has(SyntaxKind::ASYNC_KW),
            is_partial: has(SyntaxKind::PARTIAL_KW),
        }
    }

    /// Keywords in canonical order, after any access keywords
    pub fn keywords(&self) -> Vec<SyntaxKind> {
        [
            (self.is_new, SyntaxKind::NEW_KW),
            (self.is_static, SyntaxKind::STATIC_KW),
            (self.is_abstract, SyntaxKind::ABSTRACT_KW),
            (self.is_virtual, SyntaxKind::VIRTUAL_KW),
            (self.is_sealed, SyntaxKind::SEALED_KW),
            (self.is_override, SyntaxKind::OVERRIDE_KW),
            (self.is_readonly, SyntaxKind::READONLY_KW),
            (self.is_const, SyntaxKind::CONST_KW),
            (self.is_extern, SyntaxKind::EXTERN_KW),
            (self.is_unsafe, SyntaxKind::UNSAFE_KW),
            (self.is_volatile, SyntaxKind::VOLATILE_KW),
            (self.is_async, SyntaxKind::ASYNC_KW),
            (self.is_partial, SyntaxKind::PARTIAL_KW),
        ]
        .into_iter()
        .filter_map(|(on, kind)| on.then_some(kind))
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords().is_empty()
    }
}

// ============================================================================
// Declarations
// ============================================================================

/// Shared state of named declarations that carry modifiers and documentation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclData {
    pub name: SmolStr,
    pub access: Accessibility,
    pub modifiers: Modifiers,
    /// Text of the attached `///` comment, markers stripped
    pub documentation: Option<String>,
}

impl DeclData {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_access(mut self, access: Accessibility) -> Self {
        self.access = access;
        self
    }

    fn same_intent(&self, other: &Self) -> bool {
        self.name == other.name && self.access == other.access && self.modifiers == other.modifiers
    }
}

/// Which accessor an accessor declaration is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessorKind {
    Get,
    Set,
    Init,
    Add,
    Remove,
}

impl AccessorKind {
    pub fn from_keyword(text: &str) -> Option<Self> {
        match text {
            "get" => Some(Self::Get),
            "set" => Some(Self::Set),
            "init" => Some(Self::Init),
            "add" => Some(Self::Add),
            "remove" => Some(Self::Remove),
            _ => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Set => "set",
            Self::Init => "init",
            Self::Add => "add",
            Self::Remove => "remove",
        }
    }

    /// Accessor name for a property or event, e.g. `get_Count`
    pub fn accessor_name(self, owner: &str) -> SmolStr {
        SmolStr::new(format!("{}_{}", self.keyword(), owner))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessorData {
    pub decl: DeclData,
    pub kind: AccessorKind,
    /// `get { ... }` rather than `get;`
    pub has_body: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodData {
    pub decl: DeclData,
    /// A block body rather than `;`
    pub has_body: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructorData {
    pub decl: DeclData,
    /// `base(...)` or `this(...)` chained call, canonical text
    pub initializer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceData {
    /// Possibly dotted name as declared, e.g. `Company.Product`
    pub name: SmolStr,
    /// `namespace X;` rather than `namespace X { }`
    pub file_scoped: bool,
}

impl NamespaceData {
    /// Last segment of the declared name
    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsingData {
    /// Imported namespace or aliased type
    pub name: SmolStr,
    pub alias: Option<SmolStr>,
    pub is_static: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValueData {
    pub name: SmolStr,
    pub documentation: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ParameterModifier {
    #[default]
    None,
    Ref,
    Out,
    In,
    Params,
    /// Receiver of an extension method
    This,
}

impl ParameterModifier {
    pub fn keyword(self) -> Option<SyntaxKind> {
        match self {
            Self::None => None,
            Self::Ref => Some(SyntaxKind::REF_KW),
            Self::Out => Some(SyntaxKind::OUT_KW),
            Self::In => Some(SyntaxKind::IN_KW),
            Self::Params => Some(SyntaxKind::PARAMS_KW),
            Self::This => Some(SyntaxKind::THIS_KW),
        }
    }

    pub fn from_keyword(kind: SyntaxKind) -> Option<Self> {
        match kind {
            SyntaxKind::REF_KW => Some(Self::Ref),
            SyntaxKind::OUT_KW => Some(Self::Out),
            SyntaxKind::IN_KW => Some(Self::In),
            SyntaxKind::PARAMS_KW => Some(Self::Params),
            SyntaxKind::THIS_KW => Some(Self::This),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterData {
    pub name: SmolStr,
    pub modifier: ParameterModifier,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Variance {
    #[default]
    None,
    In,
    Out,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeParameterData {
    pub name: SmolStr,
    pub variance: Variance,
    /// `where` constraints in declaration order: `class`, `struct`, `new()`
    /// or a type
    pub constraints: Vec<SmolStr>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeData {
    pub name: SmolStr,
}

/// How an attribute argument names its target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AttributeValueStyle {
    #[default]
    Positional,
    /// `Name = value`, a property or field
    Equals,
    /// `name: value`, a constructor parameter
    Colon,
}

/// Shape of a literal-like value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LiteralKind {
    #[default]
    Unknown,
    String,
    Character,
    Numeric,
    Boolean,
    Null,
    /// `typeof(T)`
    Type,
    Default,
    MemberAccess,
    Identifier,
}

impl LiteralKind {
    pub fn from_syntax(node: &SyntaxNode) -> Self {
        match node.kind() {
            SyntaxKind::LITERAL => match node.first_token().map(|t| t.kind()) {
                Some(
                    SyntaxKind::STRING | SyntaxKind::VERBATIM_STRING | SyntaxKind::INTERPOLATED_STRING,
                ) => Self::String,
                Some(SyntaxKind::CHAR) => Self::Character,
                Some(SyntaxKind::INT_NUMBER | SyntaxKind::REAL_NUMBER) => Self::Numeric,
                Some(SyntaxKind::TRUE_KW | SyntaxKind::FALSE_KW) => Self::Boolean,
                Some(SyntaxKind::NULL_KW) => Self::Null,
                _ => Self::Unknown,
            },
            SyntaxKind::PREFIX_EXPR => match node.children().next() {
                Some(operand) if Self::from_syntax(&operand) == Self::Numeric => Self::Numeric,
                _ => Self::Unknown,
            },
            SyntaxKind::TYPEOF_EXPR => Self::Type,
            SyntaxKind::DEFAULT_EXPR => Self::Default,
            SyntaxKind::MEMBER_ACCESS => Self::MemberAccess,
            SyntaxKind::NAME_REF => Self::Identifier,
            _ => Self::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeValueData {
    pub name: Option<SmolStr>,
    pub style: AttributeValueStyle,
    /// Value expression as written
    pub value: String,
    pub literal: LiteralKind,
}

impl AttributeValueData {
    pub fn positional(value: impl Into<String>) -> Self {
        let value = value.into().trim().to_string();
        Self {
            name: None,
            style: AttributeValueStyle::Positional,
            literal: classify_expression(&value).1,
            value,
        }
    }

    pub fn named(name: impl Into<SmolStr>, value: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            style: AttributeValueStyle::Equals,
            ..Self::positional(value)
        }
    }
}

/// A type as written, e.g. `Dictionary<string, int>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferencedTypeData {
    pub text: String,
}

impl ReferencedTypeData {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into().trim().to_string(),
        }
    }

    /// The implicit `var` type of a local
    pub fn is_implicit(&self) -> bool {
        self.text == "var"
    }
}

/// Broad shape of an expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExpressionKind {
    #[default]
    Unknown,
    Literal,
    Name,
    This,
    Base,
    MemberAccess,
    Invocation,
    ElementAccess,
    ObjectCreation,
    Initializer,
    Parenthesized,
    TypeOf,
    Cast,
    Lambda,
    Default,
    Unary,
    Binary,
    Assignment,
    Conditional,
}

impl ExpressionKind {
    pub fn from_syntax(kind: SyntaxKind) -> Self {
        match kind {
            SyntaxKind::LITERAL => Self::Literal,
            SyntaxKind::NAME_REF | SyntaxKind::PREDEFINED_TYPE_REF => Self::Name,
            SyntaxKind::THIS_EXPR => Self::This,
            SyntaxKind::BASE_EXPR => Self::Base,
            SyntaxKind::MEMBER_ACCESS => Self::MemberAccess,
            SyntaxKind::CALL_EXPR => Self::Invocation,
            SyntaxKind::INDEX_EXPR => Self::ElementAccess,
            SyntaxKind::NEW_EXPR => Self::ObjectCreation,
            SyntaxKind::INITIALIZER_EXPR => Self::Initializer,
            SyntaxKind::PAREN_EXPR => Self::Parenthesized,
            SyntaxKind::TYPEOF_EXPR => Self::TypeOf,
            SyntaxKind::CAST_EXPR => Self::Cast,
            SyntaxKind::LAMBDA_EXPR => Self::Lambda,
            SyntaxKind::DEFAULT_EXPR => Self::Default,
            SyntaxKind::PREFIX_EXPR | SyntaxKind::POSTFIX_EXPR => Self::Unary,
            SyntaxKind::BINARY_EXPR => Self::Binary,
            SyntaxKind::ASSIGN_EXPR => Self::Assignment,
            SyntaxKind::CONDITIONAL_EXPR => Self::Conditional,
            _ => Self::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpressionData {
    /// Expression text as written, inner trivia included
    pub text: String,
    pub kind: ExpressionKind,
    pub literal: LiteralKind,
}

impl ExpressionData {
    /// Expression from source text, classified by parsing it
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into().trim().to_string();
        let (kind, literal) = classify_expression(&text);
        Self { text, kind, literal }
    }

    pub fn from_syntax(node: &SyntaxNode) -> Self {
        Self {
            text: node.to_string(),
            kind: ExpressionKind::from_syntax(node.kind()),
            literal: LiteralKind::from_syntax(node),
        }
    }
}

fn classify_expression(text: &str) -> (ExpressionKind, LiteralKind) {
    parse_fragment(FragmentKind::Expression, text)
        .syntax()
        .first_child()
        .map(|node| {
            (
                ExpressionKind::from_syntax(node.kind()),
                LiteralKind::from_syntax(&node),
            )
        })
        .unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationData {
    pub name: SmolStr,
    pub is_const: bool,
}

/// Simple and compound assignment operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AssignmentOperator {
    #[default]
    Assign,
    AddAssign,
    SubtractAssign,
    MultiplyAssign,
    DivideAssign,
    ModuloAssign,
    AndAssign,
    OrAssign,
    XorAssign,
    LeftShiftAssign,
    RightShiftAssign,
    CoalesceAssign,
}

impl AssignmentOperator {
    pub const ALL: [AssignmentOperator; 12] = [
        Self::Assign,
        Self::AddAssign,
        Self::SubtractAssign,
        Self::MultiplyAssign,
        Self::DivideAssign,
        Self::ModuloAssign,
        Self::AndAssign,
        Self::OrAssign,
        Self::XorAssign,
        Self::LeftShiftAssign,
        Self::RightShiftAssign,
        Self::CoalesceAssign,
    ];

    pub fn text(self) -> &'static str {
        match self {
            Self::Assign => "=",
            Self::AddAssign => "+=",
            Self::SubtractAssign => "-=",
            Self::MultiplyAssign => "*=",
            Self::DivideAssign => "/=",
            Self::ModuloAssign => "%=",
            Self::AndAssign => "&=",
            Self::OrAssign => "|=",
            Self::XorAssign => "^=",
            Self::LeftShiftAssign => "<<=",
            Self::RightShiftAssign => ">>=",
            Self::CoalesceAssign => "??=",
        }
    }

    pub fn from_text(text: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.text() == text)
    }

    /// Token kinds spelling the operator; `>>=` lexes as `>` then `>=`
    pub fn tokens(self) -> &'static [SyntaxKind] {
        match self {
            Self::Assign => &[SyntaxKind::EQ],
            Self::AddAssign => &[SyntaxKind::PLUS_EQ],
            Self::SubtractAssign => &[SyntaxKind::MINUS_EQ],
            Self::MultiplyAssign => &[SyntaxKind::STAR_EQ],
            Self::DivideAssign => &[SyntaxKind::SLASH_EQ],
            Self::ModuloAssign => &[SyntaxKind::PERCENT_EQ],
            Self::AndAssign => &[SyntaxKind::AMP_EQ],
            Self::OrAssign => &[SyntaxKind::PIPE_EQ],
            Self::XorAssign => &[SyntaxKind::CARET_EQ],
            Self::LeftShiftAssign => &[SyntaxKind::LT_LT_EQ],
            Self::RightShiftAssign => &[SyntaxKind::GT, SyntaxKind::GT_EQ],
            Self::CoalesceAssign => &[SyntaxKind::QUESTION_QUESTION_EQ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AssignmentData {
    pub operator: AssignmentOperator,
}

/// Body shape of `if`, `else` and loop statements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyData {
    /// Braced body rather than a single embedded statement
    pub has_block: bool,
}

impl Default for BodyData {
    fn default() -> Self {
        Self { has_block: true }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CatchData {
    /// Name bound to the caught exception, if any
    pub variable: Option<SmolStr>,
}

/// A construct kept verbatim because no factory models it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpaqueData {
    /// Group of the slot it was found in
    pub group: KindGroup,
    pub syntax: SyntaxKind,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootData {
    pub name: SmolStr,
    pub file_path: Option<PathBuf>,
}

impl Default for RootData {
    fn default() -> Self {
        Self {
            name: SmolStr::new_static("<root>"),
            file_path: None,
        }
    }
}

// ============================================================================
// NodeData
// ============================================================================

/// Scalar state of a node, one variant per kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    Root(RootData),
    Namespace(NamespaceData),
    Using(UsingData),
    Class(DeclData),
    Structure(DeclData),
    Interface(DeclData),
    Enum(DeclData),
    Field(DeclData),
    Event(DeclData),
    Property(DeclData),
    Accessor(AccessorData),
    Method(MethodData),
    Constructor(ConstructorData),
    EnumValue(EnumValueData),
    Parameter(ParameterData),
    TypeParameter(TypeParameterData),
    Attribute(AttributeData),
    AttributeValue(AttributeValueData),
    ReferencedType(ReferencedTypeData),
    Expression(ExpressionData),
    Block,
    Declaration(DeclarationData),
    Assignment(AssignmentData),
    Invocation,
    ExpressionStatement,
    Return,
    Throw,
    If(BodyData),
    Else(BodyData),
    While(BodyData),
    Do(BodyData),
    For(BodyData),
    ForEach(BodyData),
    Try,
    Catch(CatchData),
    Finally,
    Break,
    Continue,
    Empty,
    Opaque(OpaqueData),
}

impl NodeData {
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Root(_) => NodeKind::Root,
            Self::Namespace(_) => NodeKind::Namespace,
            Self::Using(_) => NodeKind::Using,
            Self::Class(_) => NodeKind::Class,
            Self::Structure(_) => NodeKind::Structure,
            Self::Interface(_) => NodeKind::Interface,
            Self::Enum(_) => NodeKind::Enum,
            Self::Field(_) => NodeKind::Field,
            Self::Event(_) => NodeKind::Event,
            Self::Property(_) => NodeKind::Property,
            Self::Accessor(_) => NodeKind::Accessor,
            Self::Method(_) => NodeKind::Method,
            Self::Constructor(_) => NodeKind::Constructor,
            Self::EnumValue(_) => NodeKind::EnumValue,
            Self::Parameter(_) => NodeKind::Parameter,
            Self::TypeParameter(_) => NodeKind::TypeParameter,
            Self::Attribute(_) => NodeKind::Attribute,
            Self::AttributeValue(_) => NodeKind::AttributeValue,
            Self::ReferencedType(_) => NodeKind::ReferencedType,
            Self::Expression(_) => NodeKind::Expression,
            Self::Block => NodeKind::Block,
            Self::Declaration(_) => NodeKind::Declaration,
            Self::Assignment(_) => NodeKind::Assignment,
            Self::Invocation => NodeKind::Invocation,
            Self::ExpressionStatement => NodeKind::ExpressionStatement,
            Self::Return => NodeKind::Return,
            Self::Throw => NodeKind::Throw,
            Self::If(_) => NodeKind::If,
            Self::Else(_) => NodeKind::Else,
            Self::While(_) => NodeKind::While,
            Self::Do(_) => NodeKind::Do,
            Self::For(_) => NodeKind::For,
            Self::ForEach(_) => NodeKind::ForEach,
            Self::Try => NodeKind::Try,
            Self::Catch(_) => NodeKind::Catch,
            Self::Finally => NodeKind::Finally,
            Self::Break => NodeKind::Break,
            Self::Continue => NodeKind::Continue,
            Self::Empty => NodeKind::Empty,
            Self::Opaque(_) => NodeKind::Opaque,
        }
    }

    // ------------------------------------------------------------------------
    // Constructors for detached nodes
    // ------------------------------------------------------------------------

    pub fn namespace(name: impl Into<SmolStr>) -> Self {
        Self::Namespace(NamespaceData {
            name: name.into(),
            file_scoped: false,
        })
    }

    pub fn using(name: impl Into<SmolStr>) -> Self {
        Self::Using(UsingData {
            name: name.into(),
            alias: None,
            is_static: false,
        })
    }

    pub fn class(name: impl Into<SmolStr>) -> Self {
        Self::Class(DeclData::new(name))
    }

    pub fn structure(name: impl Into<SmolStr>) -> Self {
        Self::Structure(DeclData::new(name))
    }

    pub fn interface(name: impl Into<SmolStr>) -> Self {
        Self::Interface(DeclData::new(name))
    }

    pub fn enumeration(name: impl Into<SmolStr>) -> Self {
        Self::Enum(DeclData::new(name))
    }

    pub fn field(name: impl Into<SmolStr>) -> Self {
        Self::Field(DeclData::new(name))
    }

    pub fn event(name: impl Into<SmolStr>) -> Self {
        Self::Event(DeclData::new(name))
    }

    pub fn property(name: impl Into<SmolStr>) -> Self {
        Self::Property(DeclData::new(name))
    }

    pub fn accessor(kind: AccessorKind, owner: &str) -> Self {
        Self::Accessor(AccessorData {
            decl: DeclData::new(kind.accessor_name(owner)),
            kind,
            has_body: false,
        })
    }

    pub fn method(name: impl Into<SmolStr>) -> Self {
        Self::Method(MethodData {
            decl: DeclData::new(name),
            has_body: true,
        })
    }

    pub fn constructor(name: impl Into<SmolStr>) -> Self {
        Self::Constructor(ConstructorData {
            decl: DeclData::new(name),
            initializer: None,
        })
    }

    pub fn enum_value(name: impl Into<SmolStr>) -> Self {
        Self::EnumValue(EnumValueData {
            name: name.into(),
            documentation: None,
        })
    }

    pub fn parameter(name: impl Into<SmolStr>) -> Self {
        Self::Parameter(ParameterData {
            name: name.into(),
            modifier: ParameterModifier::None,
        })
    }

    pub fn type_parameter(name: impl Into<SmolStr>) -> Self {
        Self::TypeParameter(TypeParameterData {
            name: name.into(),
            variance: Variance::None,
            constraints: Vec::new(),
        })
    }

    pub fn attribute(name: impl Into<SmolStr>) -> Self {
        Self::Attribute(AttributeData { name: name.into() })
    }

    pub fn referenced_type(text: impl Into<String>) -> Self {
        Self::ReferencedType(ReferencedTypeData::new(text))
    }

    pub fn expression(text: impl Into<String>) -> Self {
        Self::Expression(ExpressionData::new(text))
    }

    pub fn declaration(name: impl Into<SmolStr>) -> Self {
        Self::Declaration(DeclarationData {
            name: name.into(),
            is_const: false,
        })
    }

    pub fn assignment(operator: AssignmentOperator) -> Self {
        Self::Assignment(AssignmentData { operator })
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    /// The node's own name, for kinds that have one
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::Root(d) => Some(&d.name),
            Self::Namespace(d) => Some(&d.name),
            Self::Using(d) => Some(&d.name),
            Self::EnumValue(d) => Some(&d.name),
            Self::Parameter(d) => Some(&d.name),
            Self::TypeParameter(d) => Some(&d.name),
            Self::Attribute(d) => Some(&d.name),
            Self::Declaration(d) => Some(&d.name),
            Self::AttributeValue(d) => d.name.as_deref(),
            _ => self.decl().map(|d| d.name.as_str()),
        }
    }

    /// Rename the node; returns false for kinds without a name
    pub fn set_name(&mut self, name: impl Into<SmolStr>) -> bool {
        let name = name.into();
        if let Some(decl) = self.decl_mut() {
            decl.name = name;
            return true;
        }
        let slot = match self {
            Self::Root(d) => &mut d.name,
            Self::Namespace(d) => &mut d.name,
            Self::Using(d) => &mut d.name,
            Self::EnumValue(d) => &mut d.name,
            Self::Parameter(d) => &mut d.name,
            Self::TypeParameter(d) => &mut d.name,
            Self::Attribute(d) => &mut d.name,
            Self::Declaration(d) => &mut d.name,
            _ => return false,
        };
        *slot = name;
        true
    }

    /// Declaration state shared by types and members
    pub fn decl(&self) -> Option<&DeclData> {
        match self {
            Self::Class(d)
            | Self::Structure(d)
            | Self::Interface(d)
            | Self::Enum(d)
            | Self::Field(d)
            | Self::Event(d)
            | Self::Property(d) => Some(d),
            Self::Accessor(d) => Some(&d.decl),
            Self::Method(d) => Some(&d.decl),
            Self::Constructor(d) => Some(&d.decl),
            _ => None,
        }
    }

    pub fn decl_mut(&mut self) -> Option<&mut DeclData> {
        match self {
            Self::Class(d)
            | Self::Structure(d)
            | Self::Interface(d)
            | Self::Enum(d)
            | Self::Field(d)
            | Self::Event(d)
            | Self::Property(d) => Some(d),
            Self::Accessor(d) => Some(&mut d.decl),
            Self::Method(d) => Some(&mut d.decl),
            Self::Constructor(d) => Some(&mut d.decl),
            _ => None,
        }
    }

    pub fn documentation(&self) -> Option<&str> {
        match self {
            Self::EnumValue(d) => d.documentation.as_deref(),
            _ => self.decl().and_then(|d| d.documentation.as_deref()),
        }
    }

    /// Body shape of `if`, `else` and loops
    pub fn body(&self) -> Option<BodyData> {
        match self {
            Self::If(b) | Self::Else(b) | Self::While(b) | Self::Do(b) | Self::For(b) | Self::ForEach(b) => {
                Some(*b)
            }
            _ => None,
        }
    }

    /// Compare the node's own scalars, ignoring formatting, documentation
    /// and body shape
    pub fn same_intent(&self, other: &Self) -> bool {
        use NodeData::*;
        match (self, other) {
            (Root(_), Root(_)) => true,
            (Namespace(a), Namespace(b)) => a.name == b.name,
            (Using(a), Using(b)) => a.name == b.name && a.alias == b.alias && a.is_static == b.is_static,
            (Class(a), Class(b))
            | (Structure(a), Structure(b))
            | (Interface(a), Interface(b))
            | (Enum(a), Enum(b))
            | (Field(a), Field(b))
            | (Event(a), Event(b))
            | (Property(a), Property(b)) => a.same_intent(b),
            (Accessor(a), Accessor(b)) => a.kind == b.kind && a.decl.same_intent(&b.decl),
            (Method(a), Method(b)) => a.decl.same_intent(&b.decl),
            (Constructor(a), Constructor(b)) => {
                a.decl.same_intent(&b.decl)
                    && a.initializer.as_deref().map(canonical_source)
                        == b.initializer.as_deref().map(canonical_source)
            }
            (EnumValue(a), EnumValue(b)) => a.name == b.name,
            (Parameter(a), Parameter(b)) => a == b,
            (TypeParameter(a), TypeParameter(b)) => {
                a.name == b.name
                    && a.variance == b.variance
                    && canonical_list(&a.constraints) == canonical_list(&b.constraints)
            }
            (Attribute(a), Attribute(b)) => a.name == b.name,
            (AttributeValue(a), AttributeValue(b)) => {
                a.name == b.name
                    && a.style == b.style
                    && a.literal == b.literal
                    && canonical_source(&a.value) == canonical_source(&b.value)
            }
            (ReferencedType(a), ReferencedType(b)) => {
                canonical_source(&a.text) == canonical_source(&b.text)
            }
            (Expression(a), Expression(b)) => {
                a.kind == b.kind && canonical_source(&a.text) == canonical_source(&b.text)
            }
            (Declaration(a), Declaration(b)) => a == b,
            (Assignment(a), Assignment(b)) => a == b,
            (Catch(a), Catch(b)) => a == b,
            (Opaque(a), Opaque(b)) => {
                a.syntax == b.syntax && canonical_source(&a.text) == canonical_source(&b.text)
            }
            (If(_), If(_))
            | (Else(_), Else(_))
            | (While(_), While(_))
            | (Do(_), Do(_))
            | (For(_), For(_))
            | (ForEach(_), ForEach(_))
            | (Block, Block)
            | (Invocation, Invocation)
            | (ExpressionStatement, ExpressionStatement)
            | (Return, Return)
            | (Throw, Throw)
            | (Try, Try)
            | (Finally, Finally)
            | (Break, Break)
            | (Continue, Continue)
            | (Empty, Empty) => true,
            _ => false,
        }
    }
}

fn canonical_list(items: &[SmolStr]) -> Vec<String> {
    items.iter().map(|c| canonical_source(c)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_modifier_keywords_are_canonical() {
        let modifiers = Modifiers::from_kinds(&[
            SyntaxKind::OVERRIDE_KW,
            SyntaxKind::PUBLIC_KW,
            SyntaxKind::STATIC_KW,
        ]);
        assert!(modifiers.is_static && modifiers.is_override);
        assert_eq!(
            modifiers.keywords(),
            vec![SyntaxKind::STATIC_KW, SyntaxKind::OVERRIDE_KW]
        );
    }

    #[rstest]
    #[case("42", ExpressionKind::Literal, LiteralKind::Numeric)]
    #[case("\"a\"", ExpressionKind::Literal, LiteralKind::String)]
    #[case("-1", ExpressionKind::Unary, LiteralKind::Numeric)]
    #[case("typeof(int)", ExpressionKind::TypeOf, LiteralKind::Type)]
    #[case("Color.Red", ExpressionKind::MemberAccess, LiteralKind::MemberAccess)]
    #[case("Run(1)", ExpressionKind::Invocation, LiteralKind::Unknown)]
    #[case("a + b", ExpressionKind::Binary, LiteralKind::Unknown)]
    #[case("new List<int>()", ExpressionKind::ObjectCreation, LiteralKind::Unknown)]
    fn test_expression_classification(
        #[case] text: &str,
        #[case] kind: ExpressionKind,
        #[case] literal: LiteralKind,
    ) {
        let data = ExpressionData::new(text);
        assert_eq!(data.kind, kind);
        assert_eq!(data.literal, literal);
    }

    #[test]
    fn test_assignment_operator_text_roundtrips() {
        for op in AssignmentOperator::ALL {
            assert_eq!(AssignmentOperator::from_text(op.text()), Some(op));
        }
        assert_eq!(
            AssignmentOperator::RightShiftAssign.tokens(),
            &[SyntaxKind::GT, SyntaxKind::GT_EQ]
        );
    }

    #[test]
    fn test_set_name() {
        let mut data = NodeData::method("Run");
        assert!(data.set_name("Walk"));
        assert_eq!(data.name(), Some("Walk"));

        let mut block = NodeData::Block;
        assert!(!block.set_name("x"));
        assert_eq!(block.name(), None);
    }

    #[test]
    fn test_same_intent_ignores_documentation_and_formatting() {
        let mut a = DeclData::new("Foo");
        a.documentation = Some("old".into());
        let b = DeclData::new("Foo");
        assert!(NodeData::Class(a).same_intent(&NodeData::Class(b)));

        let x = NodeData::expression("a+b");
        let y = NodeData::expression("a  +  b");
        assert!(x.same_intent(&y));
        assert!(!x.same_intent(&NodeData::expression("a - b")));
    }

    #[test]
    fn test_different_kinds_never_same() {
        assert!(!NodeData::class("A").same_intent(&NodeData::structure("A")));
    }

    #[test]
    fn test_namespace_simple_name() {
        let NodeData::Namespace(ns) = NodeData::namespace("Company.Product") else {
            unreachable!()
        };
        assert_eq!(ns.simple_name(), "Product");
    }
}
