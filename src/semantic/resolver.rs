//! Symbol resolution for raw declarations
//!
//! The DOM never inspects modifiers to decide accessibility itself; it asks a
//! [`SymbolResolver`] while loading. [`SyntacticResolver`] answers from the
//! declaration syntax alone, applying the language defaults where no access
//! modifier is written.

use super::symbol::{
    Accessibility, DeclarationContext, Symbol, SymbolKind, default_accessibility,
};
use crate::parser::{
    Accessor, AstNode, ConstructorDecl, EnumMember, MethodDecl, ModifierList, NamespaceDecl,
    Param, PropertyDecl, SyntaxKind, SyntaxNode, TypeDecl, TypeParam, VariableDeclarator,
};
use tracing::trace;

/// Semantic lookup for raw nodes
///
/// Returns `None` for constructs without a semantic binding (statements,
/// expressions, using directives).
pub trait SymbolResolver {
    fn resolve(&self, node: &SyntaxNode) -> Option<Symbol>;
}

/// Resolver that reads declarations only and does no type inference
#[derive(Debug, Default, Clone, Copy)]
pub struct SyntacticResolver;

impl SyntacticResolver {
    pub fn new() -> Self {
        Self
    }
}

impl SymbolResolver for SyntacticResolver {
    fn resolve(&self, node: &SyntaxNode) -> Option<Symbol> {
        let symbol = match node.kind() {
            SyntaxKind::NAMESPACE_DECL => {
                let name = NamespaceDecl::cast(node.clone())?.name()?;
                Symbol::new(name, SymbolKind::Namespace)
            }
            kind if kind.is_type_declaration() => resolve_type(node, kind)?,
            SyntaxKind::VARIABLE_DECLARATOR => resolve_declarator(node)?,
            SyntaxKind::PROPERTY_DECL => {
                let prop = PropertyDecl::cast(node.clone())?;
                member_symbol(node, prop.name()?, SymbolKind::Property, prop.modifier_list())
            }
            SyntaxKind::METHOD_DECL => {
                let method = MethodDecl::cast(node.clone())?;
                let arity = method.type_params().len();
                let mut symbol =
                    member_symbol(node, method.name()?, SymbolKind::Method, method.modifier_list())
                        .with_arity(arity);
                // Explicit interface implementations are private to the type
                if method.is_explicit_implementation() {
                    symbol.accessibility = Accessibility::Private;
                }
                symbol
            }
            SyntaxKind::CONSTRUCTOR_DECL => {
                let ctor = ConstructorDecl::cast(node.clone())?;
                let symbol =
                    member_symbol(node, ctor.name()?, SymbolKind::Constructor, ctor.modifier_list());
                let metadata = if symbol.is_static { ".cctor" } else { ".ctor" };
                Symbol {
                    metadata_name: metadata.into(),
                    ..symbol
                }
            }
            SyntaxKind::ACCESSOR => resolve_accessor(node)?,
            SyntaxKind::ENUM_MEMBER => {
                let member = EnumMember::cast(node.clone())?;
                Symbol::new(member.name()?, SymbolKind::EnumMember)
                    .with_accessibility(Accessibility::Public)
                    .with_static(true)
            }
            SyntaxKind::PARAM => Symbol::new(Param::cast(node.clone())?.name()?, SymbolKind::Parameter),
            SyntaxKind::TYPE_PARAM => {
                Symbol::new(TypeParam::cast(node.clone())?.name()?, SymbolKind::TypeParameter)
            }
            SyntaxKind::FOREACH_VARIABLE => {
                let name = node
                    .children_with_tokens()
                    .filter_map(|e| e.into_token())
                    .filter(|t| t.kind() == SyntaxKind::IDENT)
                    .last()?;
                Symbol::new(name.text(), SymbolKind::Local)
            }
            _ => return None,
        };
        trace!("resolved {:?} {} as {:?}", node.kind(), symbol.name, symbol.accessibility);
        Some(symbol)
    }
}

fn resolve_type(node: &SyntaxNode, kind: SyntaxKind) -> Option<Symbol> {
    let decl = TypeDecl::cast(node.clone())?;
    let symbol_kind = match kind {
        SyntaxKind::CLASS_DECL => SymbolKind::Class,
        SyntaxKind::STRUCT_DECL => SymbolKind::Struct,
        SyntaxKind::INTERFACE_DECL => SymbolKind::Interface,
        _ => SymbolKind::Enum,
    };
    let arity = decl.type_params().len();
    Some(member_symbol(node, decl.name()?, symbol_kind, decl.modifier_list()).with_arity(arity))
}

/// Fields, field-like events and locals all name themselves in a declarator
fn resolve_declarator(node: &SyntaxNode) -> Option<Symbol> {
    let name = VariableDeclarator::cast(node.clone())?.name()?;
    let declaration = node.parent()?;
    let owner = declaration.parent()?;
    let modifiers = owner.children().find_map(ModifierList::cast);
    match owner.kind() {
        SyntaxKind::FIELD_DECL => Some(member_symbol(&owner, name, SymbolKind::Field, modifiers)),
        SyntaxKind::EVENT_DECL => Some(member_symbol(&owner, name, SymbolKind::Event, modifiers)),
        _ => Some(Symbol::new(name, SymbolKind::Local)),
    }
}

fn resolve_accessor(node: &SyntaxNode) -> Option<Symbol> {
    let accessor = Accessor::cast(node.clone())?;
    let keyword = accessor.keyword()?;
    let owner = node.parent()?.parent()?;
    let owner_name = match owner.kind() {
        SyntaxKind::PROPERTY_DECL => PropertyDecl::cast(owner.clone())?.name()?,
        _ => owner
            .descendants()
            .find_map(VariableDeclarator::cast)
            .and_then(|d| d.name())?,
    };
    let explicit = accessor
        .modifier_list()
        .and_then(|m| Accessibility::from_modifiers(&m.kinds()));
    Some(
        Symbol::new(format!("{}_{}", keyword.text(), owner_name), SymbolKind::Accessor)
            .with_accessibility(explicit.unwrap_or_default()),
    )
}

/// Symbol for a declaration that may carry access and `static` modifiers
fn member_symbol(
    node: &SyntaxNode,
    name: String,
    kind: SymbolKind,
    modifiers: Option<ModifierList>,
) -> Symbol {
    let kinds = modifiers.map(|m| m.kinds()).unwrap_or_default();
    let accessibility = Accessibility::from_modifiers(&kinds)
        .unwrap_or_else(|| default_accessibility(kind, declaration_context(node)));
    let is_static = kinds.contains(&SyntaxKind::STATIC_KW) || kinds.contains(&SyntaxKind::CONST_KW);
    Symbol::new(name, kind)
        .with_accessibility(accessibility)
        .with_static(is_static)
}

/// Context of a declaration from its enclosing raw nodes
pub fn declaration_context(node: &SyntaxNode) -> DeclarationContext {
    let mut current = node.parent();
    while let Some(parent) = current {
        match parent.kind() {
            SyntaxKind::CLASS_DECL | SyntaxKind::STRUCT_DECL => return DeclarationContext::Type,
            SyntaxKind::INTERFACE_DECL => return DeclarationContext::Interface,
            SyntaxKind::ENUM_DECL => return DeclarationContext::Enum,
            SyntaxKind::NAMESPACE_DECL | SyntaxKind::SOURCE_FILE => {
                return DeclarationContext::TopLevel;
            }
            kind if kind.is_member_declaration() => return DeclarationContext::Member,
            _ => current = parent.parent(),
        }
    }
    DeclarationContext::TopLevel
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use smol_str::SmolStr;

    fn resolve_first(source: &str, kind: SyntaxKind) -> Symbol {
        let root = parse(source).syntax();
        let node = root.descendants().find(|n| n.kind() == kind).unwrap();
        SyntacticResolver.resolve(&node).unwrap()
    }

    #[test]
    fn test_top_level_type_defaults_to_internal() {
        let symbol = resolve_first("class Foo { }", SyntaxKind::CLASS_DECL);
        assert_eq!(symbol.kind, SymbolKind::Class);
        assert_eq!(symbol.accessibility, Accessibility::Internal);
    }

    #[test]
    fn test_nested_type_defaults_to_private() {
        let root = parse("public class Outer { class Inner { } }").syntax();
        let inner = root
            .descendants()
            .filter(|n| n.kind() == SyntaxKind::CLASS_DECL)
            .nth(1)
            .unwrap();
        let symbol = SyntacticResolver.resolve(&inner).unwrap();
        assert_eq!(symbol.name, "Inner");
        assert_eq!(symbol.accessibility, Accessibility::Private);
    }

    #[test]
    fn test_interface_members_are_public() {
        let symbol = resolve_first("interface I { void Run(); }", SyntaxKind::METHOD_DECL);
        assert_eq!(symbol.accessibility, Accessibility::Public);
    }

    #[test]
    fn test_generic_metadata_name() {
        let symbol = resolve_first("public class Repo<TKey, TValue> { }", SyntaxKind::CLASS_DECL);
        assert_eq!(symbol.metadata_name, "Repo`2");
        assert_eq!(symbol.accessibility, Accessibility::Public);
    }

    #[test]
    fn test_const_field_is_static() {
        let symbol = resolve_first("class C { protected const int Max = 3; }", SyntaxKind::VARIABLE_DECLARATOR);
        assert_eq!(symbol.kind, SymbolKind::Field);
        assert!(symbol.is_static);
        assert_eq!(symbol.accessibility, Accessibility::Protected);
    }

    #[test]
    fn test_accessor_names() {
        let root = parse("class C { int P { get; private set; } }").syntax();
        let names: Vec<_> = root
            .descendants()
            .filter(|n| n.kind() == SyntaxKind::ACCESSOR)
            .map(|n| SyntacticResolver.resolve(&n).unwrap())
            .map(|s| (s.name, s.accessibility))
            .collect();
        assert_eq!(
            names,
            vec![
                (SmolStr::new("get_P"), Accessibility::NotApplicable),
                (SmolStr::new("set_P"), Accessibility::Private)
            ]
        );
    }

    #[test]
    fn test_statements_have_no_symbol() {
        let root = parse("class C { void M() { return; } }").syntax();
        let ret = root.descendants().find(|n| n.kind() == SyntaxKind::RETURN_STMT).unwrap();
        assert!(SyntacticResolver.resolve(&ret).is_none());
    }
}
