//! Declaration parts: type references, parameters, type parameters,
//! attributes and their values, enum values and opaque passthrough nodes

use super::context::{BuildContext, ParseContext};
use super::green::{
    Template, comma_space, green_of, new_node, node, parse_descendant, parse_node, punct,
    qualified_name, rebuild_separated, separated_node, ws,
};
use super::{NodeFactory, parts, stem};
use crate::dom::{
    AttributeData, AttributeValueData, AttributeValueStyle, EnumValueData, KindGroup,
    LiteralKind, NodeData, NodeId, NodeKind, ParameterData, ParameterModifier,
    ReferencedTypeData, Slot, TypeParameterData, Variance,
};
use crate::error::{DomError, Result};
use crate::parser::{
    AstNode, Attribute, AttributeArg, ConstraintClause, EnumMember, FragmentKind, GreenNode,
    Param, SyntaxKind, SyntaxNode, TypeParam, TypeRef, canonical_source, canonical_text,
    documentation,
};

/// Replace, add or drop the `= value` tail of a parameter or enum value
fn default_value(t: &mut Template, ctx: &BuildContext<'_>, id: NodeId, slot: Slot) -> Result<()> {
    let written = t.position(|k| k.is_expression());
    match (ctx.dom.child(id, slot), written) {
        (Some(value), Some(at)) => t.set(at, node(ctx.build(value)?)),
        (Some(value), None) => {
            let green = ctx.build(value)?;
            let end = t.len();
            t.insert(end, vec![ws(" "), punct(SyntaxKind::EQ), ws(" "), node(green)]);
        }
        (None, Some(at)) => {
            let eq = t.find(SyntaxKind::EQ).unwrap_or(at);
            let start = match eq.checked_sub(1) {
                Some(before) if t.kind_at(before) == Some(SyntaxKind::WHITESPACE) => before,
                _ => eq,
            };
            t.splice(start..at + 1, Vec::new());
        }
        (None, None) => {}
    }
    Ok(())
}

/// Swap a single keyword token among `kinds` for `wanted`, inserting it
/// in front of the element at `before` when none is written
fn swap_keyword(
    t: &mut Template,
    kinds: &[SyntaxKind],
    wanted: Option<SyntaxKind>,
    before: usize,
) {
    let written = t.position(|k| kinds.contains(&k));
    match (written, wanted) {
        (Some(at), Some(kind)) if t.kind_at(at) != Some(kind) => t.set(at, punct(kind)),
        (Some(at), None) => {
            t.remove(at);
            if t.kind_at(at) == Some(SyntaxKind::WHITESPACE) {
                t.remove(at);
            }
        }
        (None, Some(kind)) => t.insert(before, vec![punct(kind), ws(" ")]),
        _ => {}
    }
}

// ============================================================================
// Type references
// ============================================================================

pub struct TypeReferenceFactory;

impl NodeFactory for TypeReferenceFactory {
    fn group(&self) -> KindGroup {
        KindGroup::Misc
    }

    fn can_create_from(&self, raw: &SyntaxNode) -> bool {
        raw.kind() == SyntaxKind::TYPE
    }

    fn create(&self, raw: &SyntaxNode, ctx: &mut ParseContext<'_>) -> Result<Vec<NodeId>> {
        let Some(ty) = TypeRef::cast(raw.clone()) else {
            return Ok(Vec::new());
        };
        let data = NodeData::ReferencedType(ReferencedTypeData::new(ty.text()));
        let symbol = ctx.resolve(raw);
        Ok(vec![ctx.node(data, raw, symbol, None)?])
    }

    fn can_build(&self, kind: NodeKind) -> bool {
        kind == NodeKind::ReferencedType
    }

    fn build(&self, id: NodeId, ctx: &BuildContext<'_>) -> Result<GreenNode> {
        let node_ref = ctx.dom.node(id)?;
        let NodeData::ReferencedType(data) = node_ref.data() else {
            return Err(ctx.incomplete(id, "type data"));
        };
        if let Some(raw) = node_ref.raw().filter(|r| r.kind() == SyntaxKind::TYPE) {
            if canonical_text(raw) == canonical_source(&data.text) {
                return Ok(green_of(raw));
            }
        }
        if data.text.is_empty() {
            return Err(ctx.incomplete(id, "type text"));
        }
        parse_node(FragmentKind::Type, &data.text)
    }
}

// ============================================================================
// Parameters
// ============================================================================

pub struct ParameterFactory;

const PARAMETER_MODIFIERS: &[SyntaxKind] = &[
    SyntaxKind::REF_KW,
    SyntaxKind::OUT_KW,
    SyntaxKind::IN_KW,
    SyntaxKind::PARAMS_KW,
    SyntaxKind::THIS_KW,
];

impl NodeFactory for ParameterFactory {
    fn group(&self) -> KindGroup {
        KindGroup::Misc
    }

    fn can_create_from(&self, raw: &SyntaxNode) -> bool {
        raw.kind() == SyntaxKind::PARAM
    }

    fn create(&self, raw: &SyntaxNode, ctx: &mut ParseContext<'_>) -> Result<Vec<NodeId>> {
        let Some(param) = Param::cast(raw.clone()) else {
            return Ok(Vec::new());
        };
        let modifier = raw
            .children_with_tokens()
            .filter_map(|e| e.into_token())
            .find_map(|t| ParameterModifier::from_keyword(t.kind()))
            .unwrap_or_default();
        let symbol = ctx.resolve(raw);
        let name = symbol
            .as_ref()
            .map(|s| s.name.clone())
            .or_else(|| param.name().map(Into::into))
            .unwrap_or_default();
        let data = NodeData::Parameter(ParameterData { name, modifier });
        let id = ctx.node(data, raw, symbol, None)?;
        ctx.create_attributes(id, raw)?;
        ctx.create_optional(id, Slot::Type, param.ty().map(|t| t.syntax().clone()))?;
        ctx.create_optional(id, Slot::Initializer, param.default_value())?;
        Ok(vec![id])
    }

    fn can_build(&self, kind: NodeKind) -> bool {
        kind == NodeKind::Parameter
    }

    fn build(&self, id: NodeId, ctx: &BuildContext<'_>) -> Result<GreenNode> {
        let Some(NodeData::Parameter(data)) = ctx.dom.data(id) else {
            return Err(ctx.incomplete(id, "parameter data"));
        };
        let name = ctx.required_name(id)?;
        let (base, _) = ctx.base(id, &[SyntaxKind::PARAM], || {
            parse_node(FragmentKind::Parameter, "object __name")
        })?;
        let mut t = Template::from_raw(&base);
        default_value(&mut t, ctx, id, Slot::Initializer)?;
        if let Some(name_at) = t.rfind(SyntaxKind::IDENT) {
            t.retext(name_at, &name);
        }
        parts::type_ref(&mut t, ctx, id, Slot::Type)?;
        if let Some(ty) = t.find(SyntaxKind::TYPE) {
            swap_keyword(&mut t, PARAMETER_MODIFIERS, data.modifier.keyword(), ty);
        }
        parts::attributes(&mut t, ctx, id, &base, " ")?;
        Ok(t.finish())
    }
}

// ============================================================================
// Type parameters
// ============================================================================

pub struct TypeParameterFactory;

/// Constraints written for `name` in the `where` clauses of the
/// declaration owning a type parameter list
fn written_constraints(param: &SyntaxNode, name: &str) -> Vec<String> {
    let Some(decl) = param.parent().and_then(|list| list.parent()) else {
        return Vec::new();
    };
    decl.children()
        .filter_map(ConstraintClause::cast)
        .filter(|c| c.target().as_deref() == Some(name))
        .flat_map(|c| parts::clause_constraints(c.syntax()))
        .collect()
}

impl NodeFactory for TypeParameterFactory {
    fn group(&self) -> KindGroup {
        KindGroup::Misc
    }

    fn can_create_from(&self, raw: &SyntaxNode) -> bool {
        raw.kind() == SyntaxKind::TYPE_PARAM
    }

    fn create(&self, raw: &SyntaxNode, ctx: &mut ParseContext<'_>) -> Result<Vec<NodeId>> {
        let Some(param) = TypeParam::cast(raw.clone()) else {
            return Ok(Vec::new());
        };
        let name = param.name().unwrap_or_default();
        let variance = if param.is_in() {
            Variance::In
        } else if param.is_out() {
            Variance::Out
        } else {
            Variance::None
        };
        let data = NodeData::TypeParameter(TypeParameterData {
            constraints: written_constraints(raw, &name)
                .into_iter()
                .map(Into::into)
                .collect(),
            name: name.into(),
            variance,
        });
        let symbol = ctx.resolve(raw);
        let id = ctx.node(data, raw, symbol, None)?;
        ctx.create_attributes(id, raw)?;
        Ok(vec![id])
    }

    fn can_build(&self, kind: NodeKind) -> bool {
        kind == NodeKind::TypeParameter
    }

    fn build(&self, id: NodeId, ctx: &BuildContext<'_>) -> Result<GreenNode> {
        let Some(NodeData::TypeParameter(data)) = ctx.dom.data(id) else {
            return Err(ctx.incomplete(id, "type parameter data"));
        };
        let name = ctx.required_name(id)?;
        let (base, _) = ctx.base(id, &[SyntaxKind::TYPE_PARAM], || {
            parse_descendant(FragmentKind::StemMember, "class __C<__T> { }", SyntaxKind::TYPE_PARAM)
        })?;
        let mut t = Template::from_raw(&base);
        let Some(name_at) = t.rfind(SyntaxKind::IDENT) else {
            return Err(ctx.incomplete(id, "name token"));
        };
        t.retext(name_at, &name);
        let wanted = match data.variance {
            Variance::None => None,
            Variance::In => Some(SyntaxKind::IN_KW),
            Variance::Out => Some(SyntaxKind::OUT_KW),
        };
        swap_keyword(&mut t, &[SyntaxKind::IN_KW, SyntaxKind::OUT_KW], wanted, name_at);
        parts::attributes(&mut t, ctx, id, &base, " ")?;
        Ok(t.finish())
    }
}

// ============================================================================
// Attributes
// ============================================================================

pub struct AttributeFactory;

impl NodeFactory for AttributeFactory {
    fn group(&self) -> KindGroup {
        KindGroup::Misc
    }

    fn can_create_from(&self, raw: &SyntaxNode) -> bool {
        raw.kind() == SyntaxKind::ATTRIBUTE
    }

    fn create(&self, raw: &SyntaxNode, ctx: &mut ParseContext<'_>) -> Result<Vec<NodeId>> {
        let Some(attribute) = Attribute::cast(raw.clone()) else {
            return Ok(Vec::new());
        };
        let data = NodeData::Attribute(AttributeData {
            name: attribute.name().unwrap_or_default().into(),
        });
        let symbol = ctx.resolve(raw);
        let id = ctx.node(data, raw, symbol, None)?;
        for arg in attribute.args() {
            ctx.create_into(id, Slot::AttributeValues, arg.syntax())?;
        }
        Ok(vec![id])
    }

    fn can_build(&self, kind: NodeKind) -> bool {
        kind == NodeKind::Attribute
    }

    fn build(&self, id: NodeId, ctx: &BuildContext<'_>) -> Result<GreenNode> {
        let name = ctx.required_name(id)?;
        let (base, _) = ctx.base(id, &[SyntaxKind::ATTRIBUTE], || {
            Ok(new_node(SyntaxKind::ATTRIBUTE, vec![node(qualified_name(&name))]))
        })?;
        let mut t = Template::from_raw(&base);
        let written = Attribute::cast(base.clone()).and_then(|a| a.name());
        if written.as_deref().map(canonical_source) != Some(canonical_source(&name)) {
            parts::set_node(&mut t, SyntaxKind::QUALIFIED_NAME, qualified_name(&name));
        }

        let built = ctx.build_all(id, Slot::AttributeValues)?;
        match parts::child_of(&base, SyntaxKind::ATTRIBUTE_ARG_LIST) {
            Some(list) => {
                let green = rebuild_separated(
                    &list,
                    Some(SyntaxKind::L_PAREN),
                    Some(SyntaxKind::R_PAREN),
                    &|k| k == SyntaxKind::ATTRIBUTE_ARG,
                    built,
                    &comma_space(),
                    None,
                );
                parts::set_node(&mut t, SyntaxKind::ATTRIBUTE_ARG_LIST, green);
            }
            None if !built.is_empty() => {
                let list = separated_node(
                    SyntaxKind::ATTRIBUTE_ARG_LIST,
                    Some(SyntaxKind::L_PAREN),
                    built.into_iter().map(|b| b.green).collect(),
                    Some(SyntaxKind::R_PAREN),
                );
                let end = t.len();
                t.insert(end, vec![node(list)]);
            }
            None => {}
        }
        Ok(t.finish())
    }
}

pub struct AttributeValueFactory;

/// The value state of a raw attribute argument
fn attribute_value(arg: &AttributeArg) -> Option<AttributeValueData> {
    let value = arg.value()?;
    let (name, style) = match arg.name() {
        Some((name, SyntaxKind::COLON)) => (Some(name.into()), AttributeValueStyle::Colon),
        Some((name, _)) => (Some(name.into()), AttributeValueStyle::Equals),
        None => (None, AttributeValueStyle::Positional),
    };
    Some(AttributeValueData {
        name,
        style,
        value: value.to_string(),
        literal: LiteralKind::from_syntax(&value),
    })
}

impl NodeFactory for AttributeValueFactory {
    fn group(&self) -> KindGroup {
        KindGroup::Misc
    }

    fn can_create_from(&self, raw: &SyntaxNode) -> bool {
        AttributeArg::cast(raw.clone()).is_some_and(|a| a.value().is_some())
    }

    fn create(&self, raw: &SyntaxNode, ctx: &mut ParseContext<'_>) -> Result<Vec<NodeId>> {
        let Some(data) = AttributeArg::cast(raw.clone()).as_ref().and_then(attribute_value) else {
            return Ok(Vec::new());
        };
        Ok(vec![ctx.node(NodeData::AttributeValue(data), raw, None, None)?])
    }

    fn can_build(&self, kind: NodeKind) -> bool {
        kind == NodeKind::AttributeValue
    }

    fn build(&self, id: NodeId, ctx: &BuildContext<'_>) -> Result<GreenNode> {
        let node_ref = ctx.dom.node(id)?;
        let NodeData::AttributeValue(data) = node_ref.data() else {
            return Err(ctx.incomplete(id, "attribute value data"));
        };
        if let Some(raw) = node_ref.raw() {
            let written = AttributeArg::cast(raw.clone()).as_ref().and_then(attribute_value);
            let same = written.is_some_and(|w| {
                w.name == data.name
                    && w.style == data.style
                    && canonical_source(&w.value) == canonical_source(&data.value)
            });
            if same {
                return Ok(green_of(raw));
            }
        }
        if data.value.trim().is_empty() {
            return Err(ctx.incomplete(id, "attribute value"));
        }
        let text = match (&data.name, data.style) {
            (Some(name), AttributeValueStyle::Colon) => format!("{name}: {}", data.value),
            (Some(name), _) => format!("{name} = {}", data.value),
            (None, _) => data.value.clone(),
        };
        parse_descendant(
            FragmentKind::AttributeList,
            &format!("[__A({text})]"),
            SyntaxKind::ATTRIBUTE_ARG,
        )
    }
}

// ============================================================================
// Enum values
// ============================================================================

pub struct EnumValueFactory;

impl NodeFactory for EnumValueFactory {
    fn group(&self) -> KindGroup {
        KindGroup::Misc
    }

    fn can_create_from(&self, raw: &SyntaxNode) -> bool {
        raw.kind() == SyntaxKind::ENUM_MEMBER
    }

    fn create(&self, raw: &SyntaxNode, ctx: &mut ParseContext<'_>) -> Result<Vec<NodeId>> {
        let Some(member) = EnumMember::cast(raw.clone()) else {
            return Ok(Vec::new());
        };
        let symbol = ctx.resolve(raw);
        let name = symbol
            .as_ref()
            .map(|s| s.name.clone())
            .or_else(|| member.name().map(Into::into))
            .unwrap_or_default();
        let data = NodeData::EnumValue(EnumValueData {
            name,
            documentation: documentation(raw),
        });
        let id = ctx.node(data, raw, symbol, None)?;
        ctx.create_attributes(id, raw)?;
        ctx.create_optional(id, Slot::Expression, member.value())?;
        Ok(vec![id])
    }

    fn can_build(&self, kind: NodeKind) -> bool {
        kind == NodeKind::EnumValue
    }

    fn build(&self, id: NodeId, ctx: &BuildContext<'_>) -> Result<GreenNode> {
        let name = ctx.required_name(id)?;
        let (base, fresh) = ctx.base(id, &[SyntaxKind::ENUM_MEMBER], || {
            stem::enum_member_skeleton(&name)
        })?;
        let mut t = Template::from_raw(&base);
        default_value(&mut t, ctx, id, Slot::Expression)?;
        if let Some(name_at) = t.rfind(SyntaxKind::IDENT) {
            t.retext(name_at, &name);
        }
        parts::attributes(&mut t, ctx, id, &base, " ")?;
        parts::leading(&mut t, ctx, id, (!fresh).then_some(&base));
        Ok(t.finish())
    }
}

// ============================================================================
// Passthrough
// ============================================================================

/// Rebuilds constructs no other factory models, from their raw syntax or
/// their (edited) text. It never claims raw syntax itself; the registry
/// routes unclaimed constructs here.
pub struct OpaqueFactory;

impl NodeFactory for OpaqueFactory {
    fn group(&self) -> KindGroup {
        KindGroup::Misc
    }

    fn can_create_from(&self, _raw: &SyntaxNode) -> bool {
        false
    }

    fn create(&self, _raw: &SyntaxNode, _ctx: &mut ParseContext<'_>) -> Result<Vec<NodeId>> {
        Ok(Vec::new())
    }

    fn can_build(&self, kind: NodeKind) -> bool {
        kind == NodeKind::Opaque
    }

    fn build(&self, id: NodeId, ctx: &BuildContext<'_>) -> Result<GreenNode> {
        let node_ref = ctx.dom.node(id)?;
        let NodeData::Opaque(data) = node_ref.data() else {
            return Err(ctx.incomplete(id, "opaque data"));
        };
        if let Some(raw) = node_ref.raw() {
            if raw.to_string() == data.text {
                return Ok(green_of(raw));
            }
        }
        let fragment = match data.group {
            KindGroup::StemMember | KindGroup::Root => FragmentKind::StemMember,
            KindGroup::TypeMember => FragmentKind::Member,
            KindGroup::Statement => FragmentKind::Statement,
            KindGroup::Expression => FragmentKind::Expression,
            KindGroup::Misc => match data.syntax {
                SyntaxKind::TYPE => FragmentKind::Type,
                SyntaxKind::PARAM => FragmentKind::Parameter,
                SyntaxKind::ATTRIBUTE_LIST => FragmentKind::AttributeList,
                other => {
                    return Err(DomError::unsupported_syntax(KindGroup::Misc, other, &data.text));
                }
            },
        };
        parse_node(fragment, &data.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_fragment;

    fn first_of(kind: FragmentKind, text: &str, wanted: SyntaxKind) -> SyntaxNode {
        parse_fragment(kind, text)
            .syntax()
            .descendants()
            .find(|n| n.kind() == wanted)
            .unwrap()
    }

    #[test]
    fn test_attribute_value_reads_named_styles() {
        let arg = first_of(FragmentKind::AttributeList, "[A(Name = \"x\")]", SyntaxKind::ATTRIBUTE_ARG);
        let data = attribute_value(&AttributeArg::cast(arg).unwrap()).unwrap();
        assert_eq!(data.name.as_deref(), Some("Name"));
        assert_eq!(data.style, AttributeValueStyle::Equals);
        assert_eq!(data.value, "\"x\"");
        assert_eq!(data.literal, LiteralKind::String);

        let arg = first_of(FragmentKind::AttributeList, "[A(order: 2)]", SyntaxKind::ATTRIBUTE_ARG);
        let data = attribute_value(&AttributeArg::cast(arg).unwrap()).unwrap();
        assert_eq!(data.style, AttributeValueStyle::Colon);
        assert_eq!(data.literal, LiteralKind::Numeric);
    }

    #[test]
    fn test_written_constraints_follow_the_target() {
        let param = first_of(
            FragmentKind::StemMember,
            "class C<T, U> where U : class where T : IComparable<T>, new() { }",
            SyntaxKind::TYPE_PARAM,
        );
        assert_eq!(written_constraints(&param, "T"), vec!["IComparable<T>", "new()"]);
    }

    #[test]
    fn test_swap_keyword_inserts_and_removes() {
        let param = first_of(FragmentKind::Parameter, "int value", SyntaxKind::PARAM);
        let mut t = Template::from_raw(&param);
        let ty = t.find(SyntaxKind::TYPE).unwrap();
        swap_keyword(&mut t, PARAMETER_MODIFIERS, Some(SyntaxKind::REF_KW), ty);
        let green = t.finish();
        assert_eq!(SyntaxNode::new_root(green.clone()).to_string(), "ref int value");

        let mut t = Template::from_green(&green);
        swap_keyword(&mut t, PARAMETER_MODIFIERS, None, 0);
        assert_eq!(SyntaxNode::new_root(t.finish()).to_string(), "int value");
    }
}
