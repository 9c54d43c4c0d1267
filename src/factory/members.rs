//! Type members: fields, events, properties, accessors, methods and
//! constructors

use super::context::{BuildContext, ParseContext};
use super::green::{
    Built, Template, comma_space, node, parse_descendant, parse_node, punct, rebuild_list,
    rebuild_separated, without_leading_trivia, ws,
};
use super::{NodeFactory, parts};
use crate::dom::{
    AccessorData, AccessorKind, ConstructorData, KindGroup, MethodData, NodeData, NodeId,
    NodeKind, Slot,
};
use crate::error::{DomError, Result};
use crate::parser::{
    Accessor, AstNode, ConstructorDecl, ConstructorInitializer, EventDecl, FieldDecl,
    FragmentKind, GreenNode, MethodDecl, PropertyDecl, SyntaxKind, SyntaxNode, canonical_source,
};

/// Line break plus indentation in front of a declaration's own lines
fn decl_sep(ctx: &BuildContext<'_>, id: NodeId) -> String {
    format!("{}{}", ctx.newline(), ctx.indent(id))
}

// ============================================================================
// Declarators
// ============================================================================

/// Build one `name = initializer` declarator of a field, event or local
pub(super) fn declarator(ctx: &BuildContext<'_>, id: NodeId) -> Result<GreenNode> {
    let name = ctx.required_name(id)?;
    let (base, _) = ctx.base(id, &[SyntaxKind::VARIABLE_DECLARATOR], || {
        parse_descendant(
            FragmentKind::Member,
            "object __name;",
            SyntaxKind::VARIABLE_DECLARATOR,
        )
    })?;
    declarator_in(ctx, id, &base, &name)
}

/// Patch the declarator `base` to carry the node's name and initializer
pub(super) fn declarator_in(
    ctx: &BuildContext<'_>,
    id: NodeId,
    base: &SyntaxNode,
    name: &str,
) -> Result<GreenNode> {
    let mut t = Template::from_raw(base);
    if let Some(name_at) = t.find(SyntaxKind::IDENT) {
        t.retext(name_at, name);
    }
    let kind = ctx.dom.node(id)?.kind();
    if !kind.has_slot(Slot::Initializer) {
        return Ok(t.finish());
    }
    let written = t.position(|k| k.is_expression());
    match (ctx.dom.child(id, Slot::Initializer), written) {
        (Some(init), Some(at)) => t.set(at, node(ctx.build(init)?)),
        (Some(init), None) => {
            let green = ctx.build(init)?;
            let end = t.len();
            t.insert(end, vec![ws(" "), punct(SyntaxKind::EQ), ws(" "), node(green)]);
        }
        (None, Some(_)) => {
            if let Some(eq) = t.find(SyntaxKind::EQ) {
                let start = match eq.checked_sub(1) {
                    Some(before) if t.kind_at(before) == Some(SyntaxKind::WHITESPACE) => before,
                    _ => eq,
                };
                let end = t.len();
                t.splice(start..end, Vec::new());
            }
        }
        (None, None) => {}
    }
    Ok(t.finish())
}

/// Rebuild the VARIABLE_DECLARATION of a declaration group: the type of
/// the first node and one declarator per node
pub(super) fn variable_declaration(
    ctx: &BuildContext<'_>,
    ids: &[NodeId],
    declaration: &SyntaxNode,
) -> Result<GreenNode> {
    let Some(lead) = ids.first().copied() else {
        return Err(DomError::syntax("empty declarator group"));
    };
    let mut built = Vec::with_capacity(ids.len());
    for id in ids {
        let anchor = ctx
            .dom
            .get(*id)
            .and_then(|n| n.raw())
            .filter(|raw| raw.parent().as_ref() == Some(declaration))
            .cloned();
        built.push(Built {
            anchor,
            green: declarator(ctx, *id)?,
        });
    }
    let green = rebuild_separated(
        declaration,
        None,
        None,
        &|k| k == SyntaxKind::VARIABLE_DECLARATOR,
        built,
        &comma_space(),
        None,
    );
    let Some(ty) = ctx.dom.child(lead, Slot::Type) else {
        return Err(ctx.incomplete(lead, "type"));
    };
    let mut t = Template::from_green(&green);
    parts::set_node(&mut t, SyntaxKind::TYPE, ctx.build(ty)?);
    Ok(t.finish())
}

// ============================================================================
// Fields and events
// ============================================================================

/// Fields and events, one node per declarator
pub struct VariableFactory;

impl NodeFactory for VariableFactory {
    fn group(&self) -> KindGroup {
        KindGroup::TypeMember
    }

    fn can_create_from(&self, raw: &SyntaxNode) -> bool {
        match raw.kind() {
            SyntaxKind::FIELD_DECL => true,
            SyntaxKind::EVENT_DECL => EventDecl::cast(raw.clone())
                .is_some_and(|e| e.accessor_list().is_none()),
            _ => false,
        }
    }

    fn create(&self, raw: &SyntaxNode, ctx: &mut ParseContext<'_>) -> Result<Vec<NodeId>> {
        let is_event = raw.kind() == SyntaxKind::EVENT_DECL;
        let declaration = if is_event {
            EventDecl::cast(raw.clone()).and_then(|e| e.declaration())
        } else {
            FieldDecl::cast(raw.clone()).and_then(|f| f.declaration())
        };
        let Some(declaration) = declaration else {
            return Ok(Vec::new());
        };
        let mut ids = Vec::new();
        for declarator in declaration.declarators() {
            let symbol = ctx.resolve(declarator.syntax());
            let decl = ctx.decl(symbol.as_ref(), declarator.name(), raw);
            let data = if is_event {
                NodeData::Event(decl)
            } else {
                NodeData::Field(decl)
            };
            let id = ctx.node(data, declarator.syntax(), symbol, Some(raw))?;
            ctx.create_attributes(id, raw)?;
            ctx.create_optional(id, Slot::Type, declaration.ty().map(|t| t.syntax().clone()))?;
            if !is_event {
                ctx.create_optional(id, Slot::Initializer, declarator.initializer())?;
            }
            ids.push(id);
        }
        Ok(ids)
    }

    fn can_build(&self, kind: NodeKind) -> bool {
        matches!(kind, NodeKind::Field | NodeKind::Event)
    }

    fn build(&self, id: NodeId, ctx: &BuildContext<'_>) -> Result<GreenNode> {
        self.build_group(&[id], ctx)
    }

    fn build_group(&self, ids: &[NodeId], ctx: &BuildContext<'_>) -> Result<GreenNode> {
        let Some(lead) = ids.first().copied() else {
            return Err(DomError::syntax("empty declarator group"));
        };
        let is_event = ctx.dom.kind(lead) == Some(NodeKind::Event);
        let (syntax, skeleton) = if is_event {
            (SyntaxKind::EVENT_DECL, "event object __name;")
        } else {
            (SyntaxKind::FIELD_DECL, "object __name;")
        };
        let group = ctx
            .group_raw(lead)
            .filter(|g| g.kind() == syntax && ctx.claims_group(lead));
        let (base, fresh) = match group {
            Some(group) => (group, false),
            None => (
                SyntaxNode::new_root(parse_node(FragmentKind::Member, skeleton)?),
                true,
            ),
        };
        let mut t = Template::from_raw(&base);
        if let Some(declaration) = base
            .children()
            .find(|n| n.kind() == SyntaxKind::VARIABLE_DECLARATION)
        {
            let green = variable_declaration(ctx, ids, &declaration)?;
            parts::set_node(&mut t, SyntaxKind::VARIABLE_DECLARATION, green);
        }
        parts::modifiers(&mut t, ctx, lead);
        parts::attributes(&mut t, ctx, lead, &base, &decl_sep(ctx, lead))?;
        parts::leading(&mut t, ctx, lead, (!fresh).then_some(&base));
        Ok(t.finish())
    }
}

// ============================================================================
// Properties and accessors
// ============================================================================

pub struct PropertyFactory;

impl NodeFactory for PropertyFactory {
    fn group(&self) -> KindGroup {
        KindGroup::TypeMember
    }

    fn can_create_from(&self, raw: &SyntaxNode) -> bool {
        PropertyDecl::cast(raw.clone())
            .is_some_and(|p| p.accessor_list().is_some() || p.expression_body().is_some())
    }

    fn create(&self, raw: &SyntaxNode, ctx: &mut ParseContext<'_>) -> Result<Vec<NodeId>> {
        let Some(property) = PropertyDecl::cast(raw.clone()) else {
            return Ok(Vec::new());
        };
        let symbol = ctx.resolve(raw);
        let decl = ctx.decl(symbol.as_ref(), property.name(), raw);
        let id = ctx.node(NodeData::Property(decl), raw, symbol, None)?;
        ctx.create_attributes(id, raw)?;
        ctx.create_optional(id, Slot::Type, property.ty().map(|t| t.syntax().clone()))?;
        if let Some(list) = property.accessor_list() {
            for accessor in list.syntax().children() {
                ctx.create_into(id, Slot::Accessors, &accessor)?;
            }
        }
        ctx.create_optional(
            id,
            Slot::Expression,
            property.expression_body().and_then(|b| b.expression()),
        )?;
        ctx.create_optional(id, Slot::Initializer, property.initializer())?;
        Ok(vec![id])
    }

    fn can_build(&self, kind: NodeKind) -> bool {
        kind == NodeKind::Property
    }

    fn build(&self, id: NodeId, ctx: &BuildContext<'_>) -> Result<GreenNode> {
        let name = ctx.required_name(id)?;
        let (base, fresh) = ctx.base(id, &[SyntaxKind::PROPERTY_DECL], || {
            parse_node(FragmentKind::Member, "object __name { }")
        })?;
        let mut t = Template::from_raw(&base);
        let arrow = parts::expression_body(&mut t, ctx, id, &base, &[SyntaxKind::ACCESSOR_LIST])?;

        if !arrow {
            let list = match parts::child_of(&base, SyntaxKind::ACCESSOR_LIST) {
                Some(list) => list,
                None => SyntaxNode::new_root(parse_descendant(
                    FragmentKind::Member,
                    "object __name { }",
                    SyntaxKind::ACCESSOR_LIST,
                )?),
            };
            let built = ctx.build_all(id, Slot::Accessors)?;
            let green = rebuild_list(
                &list,
                Some(SyntaxKind::L_BRACE),
                Some(SyntaxKind::R_BRACE),
                &|k| k == SyntaxKind::ACCESSOR || k == SyntaxKind::ERROR,
                built,
                Some(" "),
            );
            if !parts::set_node(&mut t, SyntaxKind::ACCESSOR_LIST, green.clone()) {
                // The arrow clause went away; its `;` gives way to the list
                match t.rfind(SyntaxKind::SEMICOLON) {
                    Some(semicolon) => t.splice(semicolon..semicolon + 1, vec![ws(" "), node(green)]),
                    None => {
                        let end = t.len();
                        t.insert(end, vec![ws(" "), node(green)]);
                    }
                }
            }
        }

        let written = t.position(|k| k.is_expression());
        match (ctx.dom.child(id, Slot::Initializer), written) {
            (Some(init), Some(at)) => t.set(at, node(ctx.build(init)?)),
            (Some(init), None) => {
                let green = ctx.build(init)?;
                let after = t.find(SyntaxKind::ACCESSOR_LIST).unwrap_or(t.len());
                t.insert(
                    after + 1,
                    vec![
                        ws(" "),
                        punct(SyntaxKind::EQ),
                        ws(" "),
                        node(green),
                        punct(SyntaxKind::SEMICOLON),
                    ],
                );
            }
            (None, Some(_)) => {
                if let (Some(eq), Some(semicolon)) =
                    (t.find(SyntaxKind::EQ), t.rfind(SyntaxKind::SEMICOLON))
                {
                    let start = match eq.checked_sub(1) {
                        Some(before) if t.kind_at(before) == Some(SyntaxKind::WHITESPACE) => before,
                        _ => eq,
                    };
                    t.splice(start..semicolon + 1, Vec::new());
                }
            }
            (None, None) => {}
        }

        parts::type_ref(&mut t, ctx, id, Slot::Type)?;
        if let Some(name_at) = t.rfind(SyntaxKind::IDENT) {
            t.retext(name_at, &name);
        }
        parts::modifiers(&mut t, ctx, id);
        parts::attributes(&mut t, ctx, id, &base, &decl_sep(ctx, id))?;
        parts::leading(&mut t, ctx, id, (!fresh).then_some(&base));
        Ok(t.finish())
    }
}

pub struct AccessorFactory;

/// Name of the property or event an accessor belongs to
fn accessor_owner(raw: &SyntaxNode) -> Option<String> {
    let owner = raw.parent()?.parent()?;
    match owner.kind() {
        SyntaxKind::PROPERTY_DECL => PropertyDecl::cast(owner)?.name(),
        SyntaxKind::EVENT_DECL => EventDecl::cast(owner)?
            .declaration()?
            .declarators()
            .next()?
            .name(),
        _ => None,
    }
}

impl NodeFactory for AccessorFactory {
    fn group(&self) -> KindGroup {
        KindGroup::TypeMember
    }

    fn can_create_from(&self, raw: &SyntaxNode) -> bool {
        Accessor::cast(raw.clone()).is_some()
    }

    fn create(&self, raw: &SyntaxNode, ctx: &mut ParseContext<'_>) -> Result<Vec<NodeId>> {
        let Some(accessor) = Accessor::cast(raw.clone()) else {
            return Ok(Vec::new());
        };
        let Some(kind) = accessor
            .keyword()
            .and_then(|k| AccessorKind::from_keyword(k.text()))
        else {
            return Ok(Vec::new());
        };
        let owner = accessor_owner(raw).unwrap_or_default();
        let symbol = ctx.resolve(raw);
        let decl = ctx.decl(symbol.as_ref(), Some(kind.accessor_name(&owner).to_string()), raw);
        let data = NodeData::Accessor(AccessorData {
            decl,
            kind,
            has_body: accessor.body().is_some(),
        });
        let id = ctx.node(data, raw, symbol, None)?;
        ctx.create_attributes(id, raw)?;
        if let Some(body) = accessor.body() {
            for statement in body.statements() {
                ctx.create_into(id, Slot::Statements, &statement)?;
            }
        }
        ctx.create_optional(
            id,
            Slot::Expression,
            accessor.expression_body().and_then(|b| b.expression()),
        )?;
        Ok(vec![id])
    }

    fn can_build(&self, kind: NodeKind) -> bool {
        kind == NodeKind::Accessor
    }

    fn build(&self, id: NodeId, ctx: &BuildContext<'_>) -> Result<GreenNode> {
        let Some(NodeData::Accessor(data)) = ctx.dom.data(id) else {
            return Err(ctx.incomplete(id, "accessor data"));
        };
        let (base, fresh) = ctx.base(id, &[SyntaxKind::ACCESSOR], || {
            parse_descendant(FragmentKind::Member, "object __P { get; }", SyntaxKind::ACCESSOR)
                .map(without_leading_trivia)
        })?;
        let mut t = Template::from_raw(&base);
        if !parts::expression_body(&mut t, ctx, id, &base, &[SyntaxKind::BLOCK])? {
            parts::statement_body(&mut t, ctx, id, &base, data.has_body, true)?;
        }
        if let Some(keyword) = t.find(SyntaxKind::IDENT) {
            t.retext(keyword, data.kind.keyword());
        }
        parts::modifiers(&mut t, ctx, id);
        parts::attributes(&mut t, ctx, id, &base, " ")?;
        parts::leading(&mut t, ctx, id, (!fresh).then_some(&base));
        Ok(t.finish())
    }
}

// ============================================================================
// Methods and constructors
// ============================================================================

pub struct MethodFactory;

impl NodeFactory for MethodFactory {
    fn group(&self) -> KindGroup {
        KindGroup::TypeMember
    }

    fn can_create_from(&self, raw: &SyntaxNode) -> bool {
        MethodDecl::cast(raw.clone()).is_some()
    }

    fn create(&self, raw: &SyntaxNode, ctx: &mut ParseContext<'_>) -> Result<Vec<NodeId>> {
        let Some(method) = MethodDecl::cast(raw.clone()) else {
            return Ok(Vec::new());
        };
        let symbol = ctx.resolve(raw);
        let decl = ctx.decl(symbol.as_ref(), method.name(), raw);
        let data = NodeData::Method(MethodData {
            decl,
            has_body: method.body().is_some(),
        });
        let id = ctx.node(data, raw, symbol, None)?;
        ctx.create_attributes(id, raw)?;
        ctx.create_optional(id, Slot::ReturnType, method.return_type().map(|t| t.syntax().clone()))?;
        for param in method.type_params() {
            ctx.create_into(id, Slot::TypeParameters, param.syntax())?;
        }
        for param in method.params() {
            ctx.create_into(id, Slot::Parameters, param.syntax())?;
        }
        if let Some(body) = method.body() {
            for statement in body.statements() {
                ctx.create_into(id, Slot::Statements, &statement)?;
            }
        }
        ctx.create_optional(
            id,
            Slot::Expression,
            method.expression_body().and_then(|b| b.expression()),
        )?;
        Ok(vec![id])
    }

    fn can_build(&self, kind: NodeKind) -> bool {
        kind == NodeKind::Method
    }

    fn build(&self, id: NodeId, ctx: &BuildContext<'_>) -> Result<GreenNode> {
        let Some(NodeData::Method(data)) = ctx.dom.data(id) else {
            return Err(ctx.incomplete(id, "method data"));
        };
        let name = ctx.required_name(id)?;
        let (base, fresh) = ctx.base(id, &[SyntaxKind::METHOD_DECL], || {
            parse_node(FragmentKind::Member, "void __name();")
        })?;
        let mut t = Template::from_raw(&base);
        if !parts::expression_body(&mut t, ctx, id, &base, &[SyntaxKind::BLOCK])? {
            parts::statement_body(&mut t, ctx, id, &base, data.has_body, false)?;
        }
        parts::parameters(&mut t, ctx, id, &base)?;
        let Some(name_at) = t.rfind(SyntaxKind::IDENT) else {
            return Err(ctx.incomplete(id, "name token"));
        };
        parts::constraints(&mut t, ctx, id, &base, name_at)?;
        parts::type_parameters(&mut t, ctx, id, &base, name_at)?;
        parts::type_ref(&mut t, ctx, id, Slot::ReturnType)?;
        t.retext(name_at, &name);
        parts::modifiers(&mut t, ctx, id);
        parts::attributes(&mut t, ctx, id, &base, &decl_sep(ctx, id))?;
        parts::leading(&mut t, ctx, id, (!fresh).then_some(&base));
        Ok(t.finish())
    }
}

pub struct ConstructorFactory;

impl NodeFactory for ConstructorFactory {
    fn group(&self) -> KindGroup {
        KindGroup::TypeMember
    }

    fn can_create_from(&self, raw: &SyntaxNode) -> bool {
        ConstructorDecl::cast(raw.clone()).is_some()
    }

    fn create(&self, raw: &SyntaxNode, ctx: &mut ParseContext<'_>) -> Result<Vec<NodeId>> {
        let Some(ctor) = ConstructorDecl::cast(raw.clone()) else {
            return Ok(Vec::new());
        };
        let symbol = ctx.resolve(raw);
        let decl = ctx.decl(symbol.as_ref(), ctor.name(), raw);
        let data = NodeData::Constructor(ConstructorData {
            decl,
            initializer: ctor.initializer().map(|i| i.text()),
        });
        let id = ctx.node(data, raw, symbol, None)?;
        ctx.create_attributes(id, raw)?;
        for param in ctor.params() {
            ctx.create_into(id, Slot::Parameters, param.syntax())?;
        }
        if let Some(body) = ctor.body() {
            for statement in body.statements() {
                ctx.create_into(id, Slot::Statements, &statement)?;
            }
        }
        ctx.create_optional(
            id,
            Slot::Expression,
            ctor.expression_body().and_then(|b| b.expression()),
        )?;
        Ok(vec![id])
    }

    fn can_build(&self, kind: NodeKind) -> bool {
        kind == NodeKind::Constructor
    }

    fn build(&self, id: NodeId, ctx: &BuildContext<'_>) -> Result<GreenNode> {
        let Some(NodeData::Constructor(data)) = ctx.dom.data(id) else {
            return Err(ctx.incomplete(id, "constructor data"));
        };
        let name = ctx.required_name(id)?;
        let (base, fresh) = ctx.base(id, &[SyntaxKind::CONSTRUCTOR_DECL], || {
            parse_node(
                FragmentKind::Member,
                &format!("__name(){}", ctx.block_text(id)),
            )
        })?;
        let mut t = Template::from_raw(&base);
        if !parts::expression_body(&mut t, ctx, id, &base, &[SyntaxKind::BLOCK])? {
            parts::statement_body(&mut t, ctx, id, &base, true, false)?;
        }

        let written = base
            .children()
            .find_map(ConstructorInitializer::cast)
            .map(|i| i.text());
        let canonical = |text: &Option<String>| text.as_deref().map(canonical_source);
        if canonical(&written) != canonical(&data.initializer) {
            if let Some(at) = t.find(SyntaxKind::CONSTRUCTOR_INITIALIZER) {
                t.remove_with_space_before(at);
            }
            if let Some(init) = &data.initializer {
                let green = parse_descendant(
                    FragmentKind::Member,
                    &format!("__C() : {init} {{ }}"),
                    SyntaxKind::CONSTRUCTOR_INITIALIZER,
                )?;
                if let Some(params) = t.find(SyntaxKind::PARAM_LIST) {
                    t.insert(params + 1, vec![ws(" "), node(green)]);
                }
            }
        }

        parts::parameters(&mut t, ctx, id, &base)?;
        if let Some(name_at) = t.find(SyntaxKind::IDENT) {
            t.retext(name_at, &name);
        }
        parts::modifiers(&mut t, ctx, id);
        parts::attributes(&mut t, ctx, id, &base, &decl_sep(ctx, id))?;
        parts::leading(&mut t, ctx, id, (!fresh).then_some(&base));
        Ok(t.finish())
    }
}
