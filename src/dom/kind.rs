//! Node kinds, capability groups and child slots
//!
//! Every DOM node has exactly one [`NodeKind`]. The kind decides which
//! [`Slot`]s the node owns and which kinds each slot accepts; the tables here
//! are the single source of truth for that shape.

/// Capability group of a node kind.
///
/// The factory registry tries groups in [`KindGroup::BUILD_ORDER`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KindGroup {
    Root,
    /// Namespaces, types and using directives
    StemMember,
    /// Members of a type body and property accessors
    TypeMember,
    Statement,
    Expression,
    /// Parameters, attributes, type parameters, enum values, type references
    Misc,
}

impl KindGroup {
    pub const BUILD_ORDER: [KindGroup; 6] = [
        KindGroup::Root,
        KindGroup::StemMember,
        KindGroup::TypeMember,
        KindGroup::Statement,
        KindGroup::Expression,
        KindGroup::Misc,
    ];
}

/// The closed set of DOM node kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Root,

    // Stem members
    Namespace,
    Using,
    Class,
    Structure,
    Interface,
    Enum,

    // Type members
    Field,
    Event,
    Property,
    Accessor,
    Method,
    Constructor,

    // Misc
    EnumValue,
    Parameter,
    TypeParameter,
    Attribute,
    AttributeValue,
    ReferencedType,

    Expression,

    // Statements
    Block,
    Declaration,
    Assignment,
    Invocation,
    ExpressionStatement,
    Return,
    Throw,
    If,
    Else,
    While,
    Do,
    For,
    ForEach,
    Try,
    Catch,
    Finally,
    Break,
    Continue,
    Empty,

    /// A construct no factory understands, kept verbatim
    Opaque,
}

/// A named child collection of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    StemMembers,
    Members,
    Attributes,
    TypeParameters,
    BaseTypes,
    UnderlyingType,
    Values,
    Type,
    ReturnType,
    Parameters,
    Accessors,
    Initializer,
    Statements,
    Expression,
    Left,
    Condition,
    Else,
    Variable,
    Incrementors,
    Catches,
    Finally,
    ExceptionType,
    AttributeValues,
}

impl Slot {
    /// Whether the slot holds at most one child
    pub fn is_single(self) -> bool {
        matches!(
            self,
            Slot::UnderlyingType
                | Slot::Type
                | Slot::ReturnType
                | Slot::Initializer
                | Slot::Expression
                | Slot::Left
                | Slot::Condition
                | Slot::Else
                | Slot::Variable
                | Slot::Finally
                | Slot::ExceptionType
        )
    }

    /// Whether a node of `kind` may live in this slot
    pub fn accepts(self, kind: NodeKind) -> bool {
        match self {
            Slot::StemMembers => {
                matches!(kind, NodeKind::Namespace | NodeKind::Using | NodeKind::Opaque)
                    || kind.is_type()
            }
            Slot::Members => {
                kind.is_type()
                    || matches!(
                        kind,
                        NodeKind::Field
                            | NodeKind::Event
                            | NodeKind::Property
                            | NodeKind::Method
                            | NodeKind::Constructor
                            | NodeKind::Opaque
                    )
            }
            Slot::Accessors => matches!(kind, NodeKind::Accessor | NodeKind::Opaque),
            Slot::Statements => kind.is_statement() || kind == NodeKind::Opaque,
            Slot::Attributes => kind == NodeKind::Attribute,
            Slot::TypeParameters => kind == NodeKind::TypeParameter,
            Slot::BaseTypes
            | Slot::UnderlyingType
            | Slot::Type
            | Slot::ReturnType
            | Slot::ExceptionType => kind == NodeKind::ReferencedType,
            Slot::Values => kind == NodeKind::EnumValue,
            Slot::Parameters => kind == NodeKind::Parameter,
            Slot::Initializer
            | Slot::Expression
            | Slot::Left
            | Slot::Condition
            | Slot::Incrementors => kind == NodeKind::Expression,
            Slot::Else => kind == NodeKind::Else,
            Slot::Variable => kind == NodeKind::Declaration,
            Slot::Catches => kind == NodeKind::Catch,
            Slot::Finally => kind == NodeKind::Finally,
            Slot::AttributeValues => kind == NodeKind::AttributeValue,
        }
    }

    /// Group whose factories create the raw children of this slot
    pub fn group(self) -> KindGroup {
        match self {
            Slot::StemMembers => KindGroup::StemMember,
            Slot::Members | Slot::Accessors => KindGroup::TypeMember,
            Slot::Statements | Slot::Else | Slot::Variable | Slot::Catches | Slot::Finally => {
                KindGroup::Statement
            }
            Slot::Initializer
            | Slot::Expression
            | Slot::Left
            | Slot::Condition
            | Slot::Incrementors => KindGroup::Expression,
            _ => KindGroup::Misc,
        }
    }
}

impl NodeKind {
    /// Capability group of this kind
    pub fn group(self) -> KindGroup {
        use NodeKind::*;
        match self {
            Root => KindGroup::Root,
            Namespace | Using | Class | Structure | Interface | Enum => KindGroup::StemMember,
            Field | Event | Property | Accessor | Method | Constructor => KindGroup::TypeMember,
            Expression => KindGroup::Expression,
            EnumValue | Parameter | TypeParameter | Attribute | AttributeValue | ReferencedType
            | Opaque => KindGroup::Misc,
            _ => KindGroup::Statement,
        }
    }

    /// Child slots owned by this kind, in source order
    pub fn slots(self) -> &'static [Slot] {
        use NodeKind::*;
        match self {
            Root | Namespace => &[Slot::StemMembers],
            Class | Structure | Interface => &[
                Slot::Attributes,
                Slot::TypeParameters,
                Slot::BaseTypes,
                Slot::Members,
            ],
            Enum => &[Slot::Attributes, Slot::UnderlyingType, Slot::Values],
            Field => &[Slot::Attributes, Slot::Type, Slot::Initializer],
            Event => &[Slot::Attributes, Slot::Type],
            Property => &[
                Slot::Attributes,
                Slot::Type,
                Slot::Accessors,
                Slot::Expression,
                Slot::Initializer,
            ],
            Accessor => &[Slot::Attributes, Slot::Statements, Slot::Expression],
            Method => &[
                Slot::Attributes,
                Slot::ReturnType,
                Slot::TypeParameters,
                Slot::Parameters,
                Slot::Statements,
                Slot::Expression,
            ],
            Constructor => &[
                Slot::Attributes,
                Slot::Parameters,
                Slot::Statements,
                Slot::Expression,
            ],
            EnumValue => &[Slot::Attributes, Slot::Expression],
            Parameter => &[Slot::Attributes, Slot::Type, Slot::Initializer],
            TypeParameter => &[Slot::Attributes],
            Attribute => &[Slot::AttributeValues],
            Block => &[Slot::Statements],
            Declaration => &[Slot::Type, Slot::Initializer],
            Assignment => &[Slot::Left, Slot::Expression],
            Invocation | ExpressionStatement | Return | Throw => &[Slot::Expression],
            If => &[Slot::Condition, Slot::Statements, Slot::Else],
            Else => &[Slot::Statements],
            While | Do => &[Slot::Condition, Slot::Statements],
            For => &[
                Slot::Variable,
                Slot::Condition,
                Slot::Incrementors,
                Slot::Statements,
            ],
            ForEach => &[Slot::Variable, Slot::Expression, Slot::Statements],
            Try => &[Slot::Statements, Slot::Catches, Slot::Finally],
            Catch => &[Slot::ExceptionType, Slot::Condition, Slot::Statements],
            Finally => &[Slot::Statements],
            AttributeValue | ReferencedType | Expression | Using | Break | Continue | Empty
            | Opaque => &[],
        }
    }

    pub fn has_slot(self, slot: Slot) -> bool {
        self.slots().contains(&slot)
    }

    /// Class, struct, interface or enum
    pub fn is_type(self) -> bool {
        matches!(
            self,
            NodeKind::Class | NodeKind::Structure | NodeKind::Interface | NodeKind::Enum
        )
    }

    /// Kinds that hold members: classes, structs and interfaces
    pub fn is_type_container(self) -> bool {
        self.has_slot(Slot::Members)
    }

    /// Kinds that hold namespaces, types and using directives
    pub fn is_stem_container(self) -> bool {
        self.has_slot(Slot::StemMembers)
    }

    /// Kinds whose body is a statement list
    pub fn is_statement_container(self) -> bool {
        self.has_slot(Slot::Statements)
    }

    /// Statement kinds that can stand in a statement list
    pub fn is_statement(self) -> bool {
        self.group() == KindGroup::Statement
            && !matches!(self, NodeKind::Else | NodeKind::Catch | NodeKind::Finally)
    }

    pub fn is_loop(self) -> bool {
        matches!(
            self,
            NodeKind::While | NodeKind::Do | NodeKind::For | NodeKind::ForEach
        )
    }

    /// Kinds that carry a name of their own
    pub fn is_named(self) -> bool {
        use NodeKind::*;
        matches!(
            self,
            Root | Namespace
                | Using
                | Class
                | Structure
                | Interface
                | Enum
                | Field
                | Event
                | Property
                | Accessor
                | Method
                | Constructor
                | EnumValue
                | Parameter
                | TypeParameter
                | Attribute
                | Declaration
        )
    }

    /// Kinds that may carry modifiers and attached documentation
    pub fn is_declaration(self) -> bool {
        self.is_type()
            || matches!(
                self,
                NodeKind::Field
                    | NodeKind::Event
                    | NodeKind::Property
                    | NodeKind::Accessor
                    | NodeKind::Method
                    | NodeKind::Constructor
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(NodeKind::Class, KindGroup::StemMember)]
    #[case(NodeKind::Accessor, KindGroup::TypeMember)]
    #[case(NodeKind::Catch, KindGroup::Statement)]
    #[case(NodeKind::Parameter, KindGroup::Misc)]
    #[case(NodeKind::Expression, KindGroup::Expression)]
    #[case(NodeKind::Opaque, KindGroup::Misc)]
    fn test_kind_groups(#[case] kind: NodeKind, #[case] group: KindGroup) {
        assert_eq!(kind.group(), group);
    }

    #[rstest]
    #[case(Slot::Members, NodeKind::Class, true)]
    #[case(Slot::Members, NodeKind::Namespace, false)]
    #[case(Slot::StemMembers, NodeKind::Namespace, true)]
    #[case(Slot::Statements, NodeKind::If, true)]
    #[case(Slot::Statements, NodeKind::Else, false)]
    #[case(Slot::Else, NodeKind::Else, true)]
    #[case(Slot::TypeParameters, NodeKind::Parameter, false)]
    #[case(Slot::Condition, NodeKind::Expression, true)]
    fn test_slot_accepts(#[case] slot: Slot, #[case] kind: NodeKind, #[case] expected: bool) {
        assert_eq!(slot.accepts(kind), expected);
    }

    #[test]
    fn test_container_kinds_have_slots() {
        use NodeKind::*;
        let kinds = [
            Root, Namespace, Class, Enum, Field, Property, Method, Constructor, If, For, Try,
            Catch, Attribute,
        ];
        for kind in kinds {
            assert!(!kind.slots().is_empty(), "{kind:?} has no slots");
        }
        assert!(Slot::Finally.is_single());
        assert!(!Slot::Catches.is_single());
    }

    #[test]
    fn test_container_predicates() {
        assert!(NodeKind::Namespace.is_stem_container());
        assert!(NodeKind::Interface.is_type_container());
        assert!(!NodeKind::Enum.is_type_container());
        assert!(NodeKind::Accessor.is_statement_container());
        assert!(NodeKind::ForEach.is_loop());
        assert!(!NodeKind::If.is_loop());
    }
}
