//! Stem members: the compilation unit, namespaces, using directives and
//! type declarations

use super::context::{BuildContext, ParseContext};
use super::green::{
    Template, leading_elements, parse_descendant, parse_node, punct, qualified_name,
    rebuild_list, rebuild_separated, without_leading_trivia,
};
use super::{NodeFactory, parts};
use crate::dom::{KindGroup, NamespaceData, NodeData, NodeId, NodeKind, Slot, UsingData};
use crate::error::Result;
use crate::parser::{
    AstNode, FragmentKind, GreenNode, NamespaceDecl, QualifiedName, SyntaxKind,
    SyntaxNode, TypeDecl, UsingDirective, parse,
};
use tracing::debug;

/// Raw children of a compilation unit or namespace body
pub(super) fn is_stem_item(kind: SyntaxKind) -> bool {
    kind.is_member_declaration()
        || matches!(
            kind,
            SyntaxKind::USING_DIRECTIVE
                | SyntaxKind::NAMESPACE_DECL
                | SyntaxKind::ATTRIBUTE_LIST
                | SyntaxKind::ERROR
        )
}

/// Raw children of a type body
pub(super) fn is_member_item(kind: SyntaxKind) -> bool {
    kind.is_member_declaration() || kind == SyntaxKind::ERROR
}

// ============================================================================
// Root
// ============================================================================

/// The compilation unit
pub struct RootFactory;

impl NodeFactory for RootFactory {
    fn group(&self) -> KindGroup {
        KindGroup::Root
    }

    fn can_create_from(&self, raw: &SyntaxNode) -> bool {
        raw.kind() == SyntaxKind::SOURCE_FILE
    }

    fn create(&self, raw: &SyntaxNode, ctx: &mut ParseContext<'_>) -> Result<Vec<NodeId>> {
        let root = ctx.dom.root();
        ctx.dom.initialize(root, Some(raw.clone()), None, Vec::new())?;
        for child in raw.children() {
            ctx.create_into(root, Slot::StemMembers, &child)?;
        }
        debug!("loaded {} top-level nodes", ctx.dom.children(root, Slot::StemMembers).len());
        Ok(vec![root])
    }

    fn can_build(&self, kind: NodeKind) -> bool {
        kind == NodeKind::Root
    }

    fn build(&self, id: NodeId, ctx: &BuildContext<'_>) -> Result<GreenNode> {
        let (base, _) = ctx.base(id, &[SyntaxKind::SOURCE_FILE], || Ok(parse("").green))?;
        let built = ctx.build_all(id, Slot::StemMembers)?;
        Ok(rebuild_list(&base, None, None, &is_stem_item, built, None))
    }
}

// ============================================================================
// Namespaces
// ============================================================================

pub struct NamespaceFactory;

impl NodeFactory for NamespaceFactory {
    fn group(&self) -> KindGroup {
        KindGroup::StemMember
    }

    fn can_create_from(&self, raw: &SyntaxNode) -> bool {
        raw.kind() == SyntaxKind::NAMESPACE_DECL
    }

    fn create(&self, raw: &SyntaxNode, ctx: &mut ParseContext<'_>) -> Result<Vec<NodeId>> {
        let Some(decl) = NamespaceDecl::cast(raw.clone()) else {
            return Ok(Vec::new());
        };
        let data = NodeData::Namespace(NamespaceData {
            name: decl.name().unwrap_or_default().into(),
            file_scoped: decl.is_file_scoped(),
        });
        let symbol = ctx.resolve(raw);
        let id = ctx.node(data, raw, symbol, None)?;
        if let Some(body) = decl.body() {
            for member in body.members() {
                ctx.create_into(id, Slot::StemMembers, &member)?;
            }
        }
        Ok(vec![id])
    }

    fn can_build(&self, kind: NodeKind) -> bool {
        kind == NodeKind::Namespace
    }

    fn build(&self, id: NodeId, ctx: &BuildContext<'_>) -> Result<GreenNode> {
        let Some(NodeData::Namespace(data)) = ctx.dom.data(id) else {
            return Err(ctx.incomplete(id, "namespace data"));
        };
        let name = ctx.required_name(id)?;
        let written_scope = ctx
            .dom
            .get(id)
            .and_then(|n| n.raw())
            .and_then(|raw| NamespaceDecl::cast(raw.clone()))
            .map(|ns| ns.is_file_scoped());
        let kinds: &[SyntaxKind] = if written_scope == Some(data.file_scoped) {
            &[SyntaxKind::NAMESPACE_DECL]
        } else {
            &[]
        };
        let (base, fresh) = ctx.base(id, kinds, || {
            let text = if data.file_scoped {
                "namespace __N;".to_string()
            } else {
                format!("namespace __N{}", ctx.block_text(id))
            };
            parse_node(FragmentKind::StemMember, &text)
        })?;
        let mut t = Template::from_raw(&base);

        if let Some(list) = base.children().find(|n| n.kind() == SyntaxKind::MEMBER_LIST) {
            let built = ctx.build_all(id, Slot::StemMembers)?;
            let green = if data.file_scoped {
                rebuild_list(&list, None, None, &is_stem_item, built, None)
            } else {
                let close = format!("{}{}", ctx.newline(), ctx.indent(id));
                rebuild_list(
                    &list,
                    Some(SyntaxKind::L_BRACE),
                    Some(SyntaxKind::R_BRACE),
                    &is_stem_item,
                    built,
                    Some(&close),
                )
            };
            parts::set_node(&mut t, SyntaxKind::MEMBER_LIST, green);
        }

        let written = base
            .children()
            .find_map(QualifiedName::cast)
            .map(|q| q.text());
        if written.as_deref() != Some(name.as_str()) {
            parts::set_node(&mut t, SyntaxKind::QUALIFIED_NAME, qualified_name(&name));
        }
        parts::leading(&mut t, ctx, id, (!fresh).then_some(&base));
        Ok(t.finish())
    }
}

// ============================================================================
// Using directives
// ============================================================================

pub struct UsingFactory;

fn using_data(raw: &SyntaxNode) -> Option<UsingData> {
    let using = UsingDirective::cast(raw.clone())?;
    Some(UsingData {
        name: using.target()?.into(),
        alias: using.alias().map(Into::into),
        is_static: using.is_static(),
    })
}

impl NodeFactory for UsingFactory {
    fn group(&self) -> KindGroup {
        KindGroup::StemMember
    }

    fn can_create_from(&self, raw: &SyntaxNode) -> bool {
        raw.kind() == SyntaxKind::USING_DIRECTIVE && using_data(raw).is_some()
    }

    fn create(&self, raw: &SyntaxNode, ctx: &mut ParseContext<'_>) -> Result<Vec<NodeId>> {
        let Some(data) = using_data(raw) else {
            return Ok(Vec::new());
        };
        Ok(vec![ctx.node(NodeData::Using(data), raw, None, None)?])
    }

    fn can_build(&self, kind: NodeKind) -> bool {
        kind == NodeKind::Using
    }

    fn build(&self, id: NodeId, ctx: &BuildContext<'_>) -> Result<GreenNode> {
        let Some(NodeData::Using(data)) = ctx.dom.data(id) else {
            return Err(ctx.incomplete(id, "using data"));
        };
        ctx.required_name(id)?;
        let raw = ctx
            .dom
            .get(id)
            .and_then(|n| n.raw())
            .filter(|raw| raw.kind() == SyntaxKind::USING_DIRECTIVE);

        let mut t = match raw {
            Some(raw) if using_data(raw).as_ref() == Some(data) => Template::from_raw(raw),
            _ => {
                let mut text = String::from("using ");
                if data.is_static {
                    text.push_str("static ");
                }
                if let Some(alias) = &data.alias {
                    text.push_str(&format!("{alias} = "));
                }
                text.push_str(&format!("{};", data.name));
                let green = without_leading_trivia(parse_node(FragmentKind::StemMember, &text)?);
                let mut t = Template::from_green(&green);
                if let Some(raw) = raw {
                    t.insert(0, leading_elements(raw));
                }
                t
            }
        };
        parts::leading(&mut t, ctx, id, raw);
        Ok(t.finish())
    }
}

// ============================================================================
// Classes, structs and interfaces
// ============================================================================

pub struct TypeFactory;

fn type_syntax(kind: NodeKind) -> Option<(SyntaxKind, &'static str)> {
    match kind {
        NodeKind::Class => Some((SyntaxKind::CLASS_DECL, "class")),
        NodeKind::Structure => Some((SyntaxKind::STRUCT_DECL, "struct")),
        NodeKind::Interface => Some((SyntaxKind::INTERFACE_DECL, "interface")),
        _ => None,
    }
}

impl NodeFactory for TypeFactory {
    fn group(&self) -> KindGroup {
        KindGroup::StemMember
    }

    fn can_create_from(&self, raw: &SyntaxNode) -> bool {
        matches!(
            raw.kind(),
            SyntaxKind::CLASS_DECL | SyntaxKind::STRUCT_DECL | SyntaxKind::INTERFACE_DECL
        )
    }

    fn create(&self, raw: &SyntaxNode, ctx: &mut ParseContext<'_>) -> Result<Vec<NodeId>> {
        let Some(ty) = TypeDecl::cast(raw.clone()) else {
            return Ok(Vec::new());
        };
        let symbol = ctx.resolve(raw);
        let decl = ctx.decl(symbol.as_ref(), ty.name(), raw);
        let data = match raw.kind() {
            SyntaxKind::STRUCT_DECL => NodeData::Structure(decl),
            SyntaxKind::INTERFACE_DECL => NodeData::Interface(decl),
            _ => NodeData::Class(decl),
        };
        let id = ctx.node(data, raw, symbol, None)?;
        ctx.create_attributes(id, raw)?;
        for param in ty.type_params() {
            ctx.create_into(id, Slot::TypeParameters, param.syntax())?;
        }
        if let Some(bases) = ty.base_list() {
            for base in bases.types() {
                ctx.create_into(id, Slot::BaseTypes, base.syntax())?;
            }
        }
        if let Some(body) = ty.member_list() {
            for member in body.members() {
                ctx.create_into(id, Slot::Members, &member)?;
            }
        }
        Ok(vec![id])
    }

    fn can_build(&self, kind: NodeKind) -> bool {
        type_syntax(kind).is_some()
    }

    fn build(&self, id: NodeId, ctx: &BuildContext<'_>) -> Result<GreenNode> {
        let kind = ctx.dom.node(id)?.kind();
        let Some((syntax, keyword)) = type_syntax(kind) else {
            return Err(ctx.incomplete(id, "type keyword"));
        };
        let name = ctx.required_name(id)?;
        let (base, fresh) = ctx.base(id, &[syntax], || {
            parse_node(
                FragmentKind::StemMember,
                &format!("{keyword} __name{}", ctx.block_text(id)),
            )
        })?;
        let mut t = Template::from_raw(&base);

        if let Some(list) = base.children().find(|n| n.kind() == SyntaxKind::MEMBER_LIST) {
            let built = ctx.build_all(id, Slot::Members)?;
            let close = format!("{}{}", ctx.newline(), ctx.indent(id));
            let green = rebuild_list(
                &list,
                Some(SyntaxKind::L_BRACE),
                Some(SyntaxKind::R_BRACE),
                &is_member_item,
                built,
                Some(&close),
            );
            parts::set_node(&mut t, SyntaxKind::MEMBER_LIST, green);
        }
        let Some(name_at) = t.find(SyntaxKind::IDENT) else {
            return Err(ctx.incomplete(id, "name token"));
        };
        parts::type_parameters(&mut t, ctx, id, &base, name_at)?;
        parts::base_types(&mut t, ctx, id, Slot::BaseTypes, &base, name_at)?;
        parts::constraints(&mut t, ctx, id, &base, name_at)?;
        t.retext(name_at, &name);
        parts::modifiers(&mut t, ctx, id);
        parts::attributes(&mut t, ctx, id, &base, &format!("{}{}", ctx.newline(), ctx.indent(id)))?;
        parts::leading(&mut t, ctx, id, (!fresh).then_some(&base));
        Ok(t.finish())
    }
}

// ============================================================================
// Enums
// ============================================================================

pub struct EnumFactory;

impl NodeFactory for EnumFactory {
    fn group(&self) -> KindGroup {
        KindGroup::StemMember
    }

    fn can_create_from(&self, raw: &SyntaxNode) -> bool {
        raw.kind() == SyntaxKind::ENUM_DECL
    }

    fn create(&self, raw: &SyntaxNode, ctx: &mut ParseContext<'_>) -> Result<Vec<NodeId>> {
        let Some(ty) = TypeDecl::cast(raw.clone()) else {
            return Ok(Vec::new());
        };
        let symbol = ctx.resolve(raw);
        let decl = ctx.decl(symbol.as_ref(), ty.name(), raw);
        let id = ctx.node(NodeData::Enum(decl), raw, symbol, None)?;
        ctx.create_attributes(id, raw)?;
        if let Some(underlying) = ty.base_list().and_then(|b| b.types().next()) {
            ctx.create_into(id, Slot::UnderlyingType, underlying.syntax())?;
        }
        if let Some(values) = ty.enum_member_list() {
            for value in values.members() {
                ctx.create_into(id, Slot::Values, value.syntax())?;
            }
        }
        Ok(vec![id])
    }

    fn can_build(&self, kind: NodeKind) -> bool {
        kind == NodeKind::Enum
    }

    fn build(&self, id: NodeId, ctx: &BuildContext<'_>) -> Result<GreenNode> {
        let name = ctx.required_name(id)?;
        let (base, fresh) = ctx.base(id, &[SyntaxKind::ENUM_DECL], || {
            parse_node(
                FragmentKind::StemMember,
                &format!("enum __name{}", ctx.block_text(id)),
            )
        })?;
        let mut t = Template::from_raw(&base);

        if let Some(list) = base
            .children()
            .find(|n| n.kind() == SyntaxKind::ENUM_MEMBER_LIST)
        {
            let built = ctx.build_all(id, Slot::Values)?;
            let close = format!("{}{}", ctx.newline(), ctx.indent(id));
            let green = rebuild_separated(
                &list,
                Some(SyntaxKind::L_BRACE),
                Some(SyntaxKind::R_BRACE),
                &|k| k == SyntaxKind::ENUM_MEMBER,
                built,
                &[punct(SyntaxKind::COMMA)],
                Some(&close),
            );
            parts::set_node(&mut t, SyntaxKind::ENUM_MEMBER_LIST, green);
        }
        let Some(name_at) = t.find(SyntaxKind::IDENT) else {
            return Err(ctx.incomplete(id, "name token"));
        };
        parts::base_types(&mut t, ctx, id, Slot::UnderlyingType, &base, name_at)?;
        t.retext(name_at, &name);
        parts::modifiers(&mut t, ctx, id);
        parts::attributes(&mut t, ctx, id, &base, &format!("{}{}", ctx.newline(), ctx.indent(id)))?;
        parts::leading(&mut t, ctx, id, (!fresh).then_some(&base));
        Ok(t.finish())
    }
}

/// The ENUM_MEMBER skeleton for a new enum value
pub(super) fn enum_member_skeleton(name: &str) -> Result<GreenNode> {
    let text = format!("enum __E {{ {name} }}");
    let member = parse_descendant(FragmentKind::StemMember, &text, SyntaxKind::ENUM_MEMBER)?;
    Ok(without_leading_trivia(member))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_predicates() {
        assert!(is_stem_item(SyntaxKind::NAMESPACE_DECL));
        assert!(is_stem_item(SyntaxKind::CLASS_DECL));
        assert!(!is_member_item(SyntaxKind::USING_DIRECTIVE));
        assert!(is_member_item(SyntaxKind::METHOD_DECL));
    }

    #[test]
    fn test_enum_member_skeleton() {
        let green = enum_member_skeleton("Red").unwrap();
        assert_eq!(green.to_string(), "Red");
    }

    #[test]
    fn test_using_data_reads_alias_and_static() {
        let parse = parse("using static System.Math;\nusing IO = System.IO;");
        let usings: Vec<_> = parse
            .syntax()
            .children()
            .filter_map(|n| using_data(&n))
            .collect();
        assert_eq!(usings.len(), 2);
        assert!(usings[0].is_static);
        assert_eq!(usings[0].name, "System.Math");
        assert_eq!(usings[1].alias.as_deref(), Some("IO"));
        assert_eq!(usings[1].name, "System.IO");
    }
}
