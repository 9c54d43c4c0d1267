//! Symbols: what a declaration means, independent of how it is written

use crate::parser::SyntaxKind;
use smol_str::SmolStr;

/// Declared accessibility of a symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Accessibility {
    /// Namespaces, locals, parameters and accessors without their own modifier
    #[default]
    NotApplicable,
    Private,
    /// `private protected`
    ProtectedAndInternal,
    Protected,
    Internal,
    /// `protected internal`
    ProtectedOrInternal,
    Public,
}

impl Accessibility {
    /// Accessibility spelled by the access keywords in a modifier list, if any
    pub fn from_modifiers(kinds: &[SyntaxKind]) -> Option<Self> {
        let has = |kind| kinds.contains(&kind);
        let access = match (
            has(SyntaxKind::PUBLIC_KW),
            has(SyntaxKind::PROTECTED_KW),
            has(SyntaxKind::INTERNAL_KW),
            has(SyntaxKind::PRIVATE_KW),
        ) {
            (true, _, _, _) => Self::Public,
            (_, true, true, _) => Self::ProtectedOrInternal,
            (_, true, _, true) => Self::ProtectedAndInternal,
            (_, true, _, _) => Self::Protected,
            (_, _, true, _) => Self::Internal,
            (_, _, _, true) => Self::Private,
            _ => return None,
        };
        Some(access)
    }

    /// Keywords that spell this accessibility, in conventional order
    pub fn keywords(self) -> &'static [SyntaxKind] {
        match self {
            Self::NotApplicable => &[],
            Self::Private => &[SyntaxKind::PRIVATE_KW],
            Self::ProtectedAndInternal => &[SyntaxKind::PRIVATE_KW, SyntaxKind::PROTECTED_KW],
            Self::Protected => &[SyntaxKind::PROTECTED_KW],
            Self::Internal => &[SyntaxKind::INTERNAL_KW],
            Self::ProtectedOrInternal => &[SyntaxKind::PROTECTED_KW, SyntaxKind::INTERNAL_KW],
            Self::Public => &[SyntaxKind::PUBLIC_KW],
        }
    }
}

/// What kind of entity a symbol denotes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Namespace,
    Class,
    Struct,
    Interface,
    Enum,
    EnumMember,
    Field,
    Event,
    Property,
    Accessor,
    Method,
    Constructor,
    Parameter,
    TypeParameter,
    Local,
}

/// Where a declaration sits, which decides its default accessibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclarationContext {
    /// Directly in a compilation unit or namespace
    TopLevel,
    /// In a class or struct body
    Type,
    Interface,
    Enum,
    /// Inside a member (accessors, parameters, locals)
    Member,
}

/// Accessibility of a declaration that spells no access modifier
pub fn default_accessibility(kind: SymbolKind, context: DeclarationContext) -> Accessibility {
    match kind {
        SymbolKind::Namespace
        | SymbolKind::Accessor
        | SymbolKind::Parameter
        | SymbolKind::TypeParameter
        | SymbolKind::Local => Accessibility::NotApplicable,
        SymbolKind::EnumMember => Accessibility::Public,
        _ => match context {
            DeclarationContext::TopLevel => Accessibility::Internal,
            DeclarationContext::Type => Accessibility::Private,
            DeclarationContext::Interface | DeclarationContext::Enum => Accessibility::Public,
            DeclarationContext::Member => Accessibility::NotApplicable,
        },
    }
}

/// A resolved declaration
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Symbol {
    pub name: SmolStr,
    /// Name as emitted in metadata, e.g. ``Repository`2`` for generics
    pub metadata_name: SmolStr,
    pub kind: SymbolKind,
    pub accessibility: Accessibility,
    pub is_static: bool,
}

impl Symbol {
    pub fn new(name: impl Into<SmolStr>, kind: SymbolKind) -> Self {
        let name = name.into();
        Self {
            metadata_name: name.clone(),
            name,
            kind,
            accessibility: Accessibility::NotApplicable,
            is_static: false,
        }
    }

    pub fn with_accessibility(mut self, accessibility: Accessibility) -> Self {
        self.accessibility = accessibility;
        self
    }

    pub fn with_static(mut self, is_static: bool) -> Self {
        self.is_static = is_static;
        self
    }

    /// Set the generic arity, which suffixes the metadata name with `` `N``
    pub fn with_arity(mut self, arity: usize) -> Self {
        self.metadata_name = metadata_name(&self.name, arity);
        self
    }
}

/// Metadata name for a declaration with `arity` type parameters
pub fn metadata_name(name: &str, arity: usize) -> SmolStr {
    if arity == 0 {
        SmolStr::new(name)
    } else {
        SmolStr::new(format!("{name}`{arity}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(&[SyntaxKind::PUBLIC_KW], Some(Accessibility::Public))]
    #[case(&[SyntaxKind::PROTECTED_KW, SyntaxKind::INTERNAL_KW], Some(Accessibility::ProtectedOrInternal))]
    #[case(&[SyntaxKind::PRIVATE_KW, SyntaxKind::PROTECTED_KW], Some(Accessibility::ProtectedAndInternal))]
    #[case(&[SyntaxKind::STATIC_KW], None)]
    fn test_accessibility_from_modifiers(
        #[case] kinds: &[SyntaxKind],
        #[case] expected: Option<Accessibility>,
    ) {
        assert_eq!(Accessibility::from_modifiers(kinds), expected);
    }

    #[rstest]
    #[case(SymbolKind::Class, DeclarationContext::TopLevel, Accessibility::Internal)]
    #[case(SymbolKind::Class, DeclarationContext::Type, Accessibility::Private)]
    #[case(SymbolKind::Method, DeclarationContext::Interface, Accessibility::Public)]
    #[case(SymbolKind::EnumMember, DeclarationContext::Enum, Accessibility::Public)]
    #[case(SymbolKind::Accessor, DeclarationContext::Member, Accessibility::NotApplicable)]
    fn test_default_accessibility(
        #[case] kind: SymbolKind,
        #[case] context: DeclarationContext,
        #[case] expected: Accessibility,
    ) {
        assert_eq!(default_accessibility(kind, context), expected);
    }

    #[test]
    fn test_metadata_name_arity() {
        assert_eq!(metadata_name("Bar", 0), "Bar");
        assert_eq!(metadata_name("Bar", 2), "Bar`2");
    }
}
