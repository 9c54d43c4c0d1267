//! Declaration parts shared by several builders
//!
//! Each function patches one part of a node under reconstruction in place:
//! attributes, modifiers, documentation and annotation comments, type
//! parameters, constraints, base types, parameters and bodies. A part that
//! still matches the node's state is left untouched, token for token.

use super::context::BuildContext;
use super::green::{
    Built, GreenElement, Template, comma_space, kind_of, new_node, node, parse_descendant,
    punct, rebuild_list, rebuild_separated, separated_node, token, ws,
};
use crate::dom::{Modifiers, NodeData, NodeId, NodeKind, PublicAnnotation, Slot};
use crate::error::{DomError, Result};
use crate::parser::{
    FragmentKind, GreenNode, NodeOrToken, SyntaxKind, SyntaxNode, annotation_comments,
    canonical_source, documentation, is_annotation_comment,
};
use crate::semantic::Accessibility;

// ============================================================================
// Shared helpers
// ============================================================================

/// Significant token kinds directly under a green node
pub fn token_kinds(green: &GreenNode) -> Vec<SyntaxKind> {
    green
        .children()
        .filter_map(|e| e.into_token())
        .map(|t| SyntaxKind::from(t.kind()))
        .filter(|k| !k.is_trivia())
        .collect()
}

/// The first child node of `kind` under a red node
pub fn child_of(raw: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxNode> {
    raw.children().find(|n| n.kind() == kind)
}

/// Replace the first element of `kind` with `green`
pub fn set_node(t: &mut Template, kind: SyntaxKind, green: GreenNode) -> bool {
    match t.find(kind) {
        Some(index) => {
            t.set(index, node(green));
            true
        }
        None => false,
    }
}

/// Constraints of a `where` clause as written, one per comma-separated part
pub fn clause_constraints(clause: &SyntaxNode) -> Vec<String> {
    let text = clause.to_string();
    let Some((_, list)) = text.split_once(':') else {
        return Vec::new();
    };
    split_top_level(list)
        .into_iter()
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .collect()
}

/// Split on commas outside of `<>` and `()`
fn split_top_level(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        match c {
            '<' | '(' => depth += 1,
            '>' | ')' => depth -= 1,
            ',' if depth == 0 => {
                parts.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&text[start..]);
    parts
}

/// Annotations written in a node's leading trivia
fn written_annotations(ctx: &BuildContext<'_>, raw: &SyntaxNode) -> Vec<PublicAnnotation> {
    if !ctx.options().parse_public_annotations {
        return Vec::new();
    }
    annotation_comments(raw)
        .iter()
        .filter_map(|t| PublicAnnotation::from_comment(t.text()))
        .collect()
}

// ============================================================================
// Leading trivia
// ============================================================================

/// Rewrite the `///` documentation and `//[[ ]]` annotation comments in
/// front of a node.
///
/// `owner` is the raw node the template came from, or `None` for nodes
/// built from a skeleton; those get fresh leading whitespace first.
pub fn leading(t: &mut Template, ctx: &BuildContext<'_>, id: NodeId, owner: Option<&SyntaxNode>) {
    let Some(data) = ctx.dom.data(id) else {
        return;
    };
    let docs = data.documentation().map(str::to_string);
    let annotations = ctx.dom.annotations(id).to_vec();
    if let Some(owner) = owner {
        if documentation(owner) == docs && written_annotations(ctx, owner) == annotations {
            return;
        }
    }

    let managed_annotations = ctx.options().parse_public_annotations;
    let is_managed = |e: &GreenElement| match e {
        NodeOrToken::Token(t) => {
            let kind = SyntaxKind::from(t.kind());
            kind == SyntaxKind::DOC_COMMENT
                || (managed_annotations
                    && kind == SyntaxKind::LINE_COMMENT
                    && is_annotation_comment(t.text()))
        }
        NodeOrToken::Node(_) => false,
    };

    let len = t.leading_len();
    let trivia = t.elements()[..len].to_vec();
    let first_managed = trivia.iter().position(|e| is_managed(e)).unwrap_or(len);
    let mut elements: Vec<GreenElement> = match owner {
        Some(_) => trivia[..first_managed].to_vec(),
        None => {
            let fresh = ctx.fresh_leading(id);
            if fresh.is_empty() { Vec::new() } else { vec![ws(&fresh)] }
        }
    };

    let line = format!("{}{}", ctx.newline(), ctx.indent(id));
    if let Some(docs) = &docs {
        for doc_line in docs.split('\n') {
            let text = if doc_line.is_empty() {
                "///".to_string()
            } else {
                format!("/// {doc_line}")
            };
            elements.push(token(SyntaxKind::DOC_COMMENT, &text));
            elements.push(ws(&line));
        }
    }
    for annotation in &annotations {
        elements.push(token(SyntaxKind::LINE_COMMENT, &annotation.to_comment()));
        elements.push(ws(&line));
    }

    let mut skip_space = false;
    for element in &trivia[first_managed.min(len)..] {
        if is_managed(element) {
            skip_space = true;
            continue;
        }
        if skip_space && kind_of(element) == SyntaxKind::WHITESPACE {
            skip_space = false;
            continue;
        }
        skip_space = false;
        elements.push(element.clone());
    }
    t.splice(0..len, elements);
}

// ============================================================================
// Attributes
// ============================================================================

/// Rebuild the attribute lists of a declaration.
///
/// Kept attributes stay in the list they were written in; new ones get a
/// list of their own, separated from their neighbours by `sep`.
pub fn attributes(
    t: &mut Template,
    ctx: &BuildContext<'_>,
    id: NodeId,
    base: &SyntaxNode,
    sep: &str,
) -> Result<()> {
    let built = ctx.build_all(id, Slot::Attributes)?;
    let lists: Vec<SyntaxNode> = base
        .children()
        .filter(|n| n.kind() == SyntaxKind::ATTRIBUTE_LIST)
        .collect();
    if lists.is_empty() && built.is_empty() {
        return Ok(());
    }

    let positions = t.all(SyntaxKind::ATTRIBUTE_LIST);
    let mut fresh = Vec::new();
    let mut per_list: Vec<Vec<Built>> = vec![Vec::new(); lists.len()];
    for item in built {
        let list = item
            .anchor
            .as_ref()
            .and_then(|a| a.parent())
            .and_then(|parent| lists.iter().position(|l| *l == parent));
        match list {
            Some(index) => per_list[index].push(item),
            None => fresh.push(item.green),
        }
    }

    // Rebuild back to front so earlier positions stay valid
    for (index, (list, items)) in lists.iter().zip(per_list).enumerate().rev() {
        let Some(&at) = positions.get(index) else {
            continue;
        };
        if items.is_empty() {
            t.remove(at);
            if t.kind_at(at) == Some(SyntaxKind::WHITESPACE) {
                t.remove(at);
            }
            continue;
        }
        let green = rebuild_separated(
            list,
            Some(SyntaxKind::L_BRACKET),
            Some(SyntaxKind::R_BRACKET),
            &|k| k == SyntaxKind::ATTRIBUTE,
            items,
            &comma_space(),
            None,
        );
        t.set(at, node(green));
    }

    if fresh.is_empty() {
        return Ok(());
    }
    let last_kept = t.rfind(SyntaxKind::ATTRIBUTE_LIST);
    let mut insert = Vec::new();
    for (i, green) in fresh.into_iter().enumerate() {
        let list = new_node(
            SyntaxKind::ATTRIBUTE_LIST,
            vec![punct(SyntaxKind::L_BRACKET), node(green), punct(SyntaxKind::R_BRACKET)],
        );
        if last_kept.is_some() || i > 0 {
            insert.push(ws(sep));
        }
        insert.push(node(list));
    }
    match last_kept {
        Some(at) => t.insert(at + 1, insert),
        None => {
            insert.push(ws(sep));
            let at = t.leading_len();
            t.insert(at, insert);
        }
    }
    Ok(())
}

// ============================================================================
// Modifiers
// ============================================================================

/// Regenerate the modifier list when the access or modifiers changed.
///
/// Unchanged halves keep their written keywords. An access that was never
/// written stays implicit while it equals the resolved default.
pub fn modifiers(t: &mut Template, ctx: &BuildContext<'_>, id: NodeId) {
    let Some(node_ref) = ctx.dom.get(id) else {
        return;
    };
    let Some(decl) = node_ref.data().decl() else {
        return;
    };
    let Some(index) = t.find(SyntaxKind::MODIFIER_LIST) else {
        return;
    };
    let written = t.node_at(index).map(|g| token_kinds(&g)).unwrap_or_default();
    let keep_access = match Accessibility::from_modifiers(&written) {
        Some(access) => access == decl.access,
        None => decl.access == node_ref.symbol().map(|s| s.accessibility).unwrap_or_default(),
    };
    let keep_other = Modifiers::from_kinds(&written) == decl.modifiers;
    if keep_access && keep_other {
        return;
    }

    let mut wanted: Vec<SyntaxKind> = if keep_access {
        written.iter().copied().filter(|k| k.is_access_modifier()).collect()
    } else {
        decl.access.keywords().to_vec()
    };
    if keep_other {
        wanted.extend(written.iter().copied().filter(|k| !k.is_access_modifier()));
    } else {
        wanted.extend(decl.modifiers.keywords());
    }
    replace_modifiers(t, index, &written, &wanted);
}

/// Swap the keywords of the MODIFIER_LIST at `index`, fixing up the space
/// between the list and the rest of the declaration
pub fn replace_modifiers(t: &mut Template, index: usize, written: &[SyntaxKind], wanted: &[SyntaxKind]) {
    if written == wanted {
        return;
    }
    let mut elements = Vec::new();
    for (i, kind) in wanted.iter().enumerate() {
        if i > 0 {
            elements.push(ws(" "));
        }
        elements.push(punct(*kind));
    }
    t.set(index, node(new_node(SyntaxKind::MODIFIER_LIST, elements)));
    match (written.is_empty(), wanted.is_empty()) {
        (true, false) => t.insert(index + 1, vec![ws(" ")]),
        (false, true) => {
            if t.kind_at(index + 1) == Some(SyntaxKind::WHITESPACE) {
                t.remove(index + 1);
            }
        }
        _ => {}
    }
}

// ============================================================================
// Generic parts
// ============================================================================

/// Rebuild or add the `<T, U>` list after the token at `name`
pub fn type_parameters(
    t: &mut Template,
    ctx: &BuildContext<'_>,
    id: NodeId,
    base: &SyntaxNode,
    name: usize,
) -> Result<()> {
    let built = ctx.build_all(id, Slot::TypeParameters)?;
    let index = t.find(SyntaxKind::TYPE_PARAM_LIST);
    match (index, child_of(base, SyntaxKind::TYPE_PARAM_LIST)) {
        (Some(index), _) if built.is_empty() => t.remove(index),
        (Some(index), Some(list)) => {
            let green = rebuild_separated(
                &list,
                Some(SyntaxKind::LT),
                Some(SyntaxKind::GT),
                &|k| k == SyntaxKind::TYPE_PARAM,
                built,
                &comma_space(),
                None,
            );
            t.set(index, node(green));
        }
        (None, _) if !built.is_empty() => {
            let items = built.into_iter().map(|b| b.green).collect();
            let list = separated_node(
                SyntaxKind::TYPE_PARAM_LIST,
                Some(SyntaxKind::LT),
                items,
                Some(SyntaxKind::GT),
            );
            t.insert(name + 1, vec![node(list)]);
        }
        _ => {}
    }
    Ok(())
}

/// Regenerate the `where` clauses when the constraints of any type
/// parameter changed
pub fn constraints(t: &mut Template, ctx: &BuildContext<'_>, id: NodeId, base: &SyntaxNode, name: usize) -> Result<()> {
    let wanted: Vec<(String, Vec<String>)> = ctx
        .dom
        .children(id, Slot::TypeParameters)
        .iter()
        .filter_map(|tp| match ctx.dom.data(*tp) {
            Some(NodeData::TypeParameter(data)) if !data.constraints.is_empty() => Some((
                data.name.to_string(),
                data.constraints.iter().map(|c| c.to_string()).collect(),
            )),
            _ => None,
        })
        .collect();
    let written: Vec<(String, Vec<String>)> = base
        .children()
        .filter(|n| n.kind() == SyntaxKind::CONSTRAINT_CLAUSE)
        .map(|clause| {
            let target = clause
                .children_with_tokens()
                .filter_map(|e| e.into_token())
                .filter(|t| t.kind() == SyntaxKind::IDENT)
                .nth(1)
                .map(|t| t.text().to_string())
                .unwrap_or_default();
            (target, clause_constraints(&clause))
        })
        .collect();
    let canonical = |clauses: &[(String, Vec<String>)]| {
        let mut out = clauses
            .iter()
            .map(|(target, list)| {
                (
                    target.clone(),
                    list.iter().map(|c| canonical_source(c)).collect::<Vec<_>>(),
                )
            })
            .collect::<Vec<_>>();
        out.sort();
        out
    };
    if canonical(&wanted) == canonical(&written) {
        return Ok(());
    }

    for index in t.all(SyntaxKind::CONSTRAINT_CLAUSE).into_iter().rev() {
        t.remove_with_space_before(index);
    }
    let after = [
        SyntaxKind::PARAM_LIST,
        SyntaxKind::BASE_LIST,
        SyntaxKind::TYPE_PARAM_LIST,
    ]
    .iter()
    .filter_map(|k| t.rfind(*k))
    .max()
    .unwrap_or(name);
    let mut insert = Vec::new();
    for (target, list) in wanted {
        let text = format!("class __C<{target}> where {target} : {} {{ }}", list.join(", "));
        let clause = parse_descendant(FragmentKind::StemMember, &text, SyntaxKind::CONSTRAINT_CLAUSE)?;
        insert.push(ws(" "));
        insert.push(node(clause));
    }
    t.insert(after + 1, insert);
    Ok(())
}

/// Rebuild, add or drop the `: Base, IFace` list after the token at `name`
pub fn base_types(
    t: &mut Template,
    ctx: &BuildContext<'_>,
    id: NodeId,
    slot: Slot,
    base: &SyntaxNode,
    name: usize,
) -> Result<()> {
    let built = ctx.build_all(id, slot)?;
    let index = t.find(SyntaxKind::BASE_LIST);
    match (index, child_of(base, SyntaxKind::BASE_LIST)) {
        (Some(index), _) if built.is_empty() => t.remove_with_space_before(index),
        (Some(index), Some(list)) => {
            let green = rebuild_separated(
                &list,
                Some(SyntaxKind::COLON),
                None,
                &|k| k == SyntaxKind::TYPE,
                built,
                &comma_space(),
                None,
            );
            t.set(index, node(green));
        }
        (None, _) if !built.is_empty() => {
            let mut elements = vec![punct(SyntaxKind::COLON), ws(" ")];
            for (i, item) in built.into_iter().enumerate() {
                if i > 0 {
                    elements.extend(comma_space());
                }
                elements.push(node(item.green));
            }
            let after = t.find(SyntaxKind::TYPE_PARAM_LIST).unwrap_or(name);
            t.insert(
                after + 1,
                vec![ws(" "), node(new_node(SyntaxKind::BASE_LIST, elements))],
            );
        }
        _ => {}
    }
    Ok(())
}

/// Rebuild the `(...)` parameter list
pub fn parameters(t: &mut Template, ctx: &BuildContext<'_>, id: NodeId, base: &SyntaxNode) -> Result<()> {
    let built = ctx.build_all(id, Slot::Parameters)?;
    let (Some(index), Some(list)) = (
        t.find(SyntaxKind::PARAM_LIST),
        child_of(base, SyntaxKind::PARAM_LIST),
    ) else {
        return Ok(());
    };
    let green = rebuild_separated(
        &list,
        Some(SyntaxKind::L_PAREN),
        Some(SyntaxKind::R_PAREN),
        &|k| k == SyntaxKind::PARAM,
        built,
        &comma_space(),
        None,
    );
    t.set(index, node(green));
    Ok(())
}

/// Replace the single TYPE child with the built type of `slot`
pub fn type_ref(t: &mut Template, ctx: &BuildContext<'_>, id: NodeId, slot: Slot) -> Result<()> {
    if let Some(ty) = ctx.dom.child(id, slot) {
        let green = ctx.build(ty)?;
        set_node(t, SyntaxKind::TYPE, green);
    }
    Ok(())
}

// ============================================================================
// Bodies
// ============================================================================

fn is_statement_item(kind: SyntaxKind) -> bool {
    kind.is_statement() || kind == SyntaxKind::ERROR
}

/// A new `{ ... }` holding already built statements
pub fn fresh_block(ctx: &BuildContext<'_>, id: NodeId, built: Vec<Built>) -> GreenNode {
    let mut elements = vec![punct(SyntaxKind::L_BRACE)];
    let empty = built.is_empty();
    elements.extend(built.into_iter().map(|b| node(b.green)));
    if empty {
        elements.push(ws(" "));
    } else {
        elements.push(ctx.line_break(id));
    }
    elements.push(punct(SyntaxKind::R_BRACE));
    new_node(SyntaxKind::BLOCK, elements)
}

/// Rebuild an existing statement block of `id`
pub fn rebuilt_block(ctx: &BuildContext<'_>, id: NodeId, block: &SyntaxNode) -> Result<GreenNode> {
    let built = ctx.build_all(id, Slot::Statements)?;
    let close = format!("{}{}", ctx.newline(), ctx.indent(id));
    Ok(rebuild_list(
        block,
        Some(SyntaxKind::L_BRACE),
        Some(SyntaxKind::R_BRACE),
        &is_statement_item,
        built,
        Some(&close),
    ))
}

/// The `{ ... }` or `;` body of a method, constructor or accessor.
///
/// A block is kept while the member has a body or statements; `inline`
/// puts a new block on the same line, as accessors have it.
pub fn statement_body(
    t: &mut Template,
    ctx: &BuildContext<'_>,
    id: NodeId,
    base: &SyntaxNode,
    has_body: bool,
    inline: bool,
) -> Result<()> {
    let wants_block = has_body || !ctx.dom.children(id, Slot::Statements).is_empty();
    let index = t.find(SyntaxKind::BLOCK);
    match (index, child_of(base, SyntaxKind::BLOCK)) {
        (Some(index), Some(block)) if wants_block => {
            let green = rebuilt_block(ctx, id, &block)?;
            t.set(index, node(green));
        }
        (Some(index), _) if !wants_block => {
            let start = match index.checked_sub(1) {
                Some(before) if t.kind_at(before) == Some(SyntaxKind::WHITESPACE) => before,
                _ => index,
            };
            t.splice(start..index + 1, vec![punct(SyntaxKind::SEMICOLON)]);
        }
        (None, _) if wants_block => {
            let built = ctx.build_all(id, Slot::Statements)?;
            let block = fresh_block(ctx, id, built);
            let sep = if inline {
                ws(" ")
            } else {
                ctx.line_break(id)
            };
            match t.rfind(SyntaxKind::SEMICOLON) {
                Some(semicolon) => t.splice(semicolon..semicolon + 1, vec![sep, node(block)]),
                None => {
                    let end = t.len();
                    t.insert(end, vec![sep, node(block)]);
                }
            }
        }
        _ => {}
    }
    Ok(())
}

/// `=> expr` for members whose body lives in [`Slot::Expression`].
///
/// The arrow clause takes the place of whatever body the template holds
/// from the first of `body_kinds` (a block or an accessor list) to the end,
/// or sits before the closing `;`. Without an expression a written arrow
/// clause is dropped and `false` comes back, so the caller lays out the
/// other body shape.
pub fn expression_body(
    t: &mut Template,
    ctx: &BuildContext<'_>,
    id: NodeId,
    base: &SyntaxNode,
    body_kinds: &[SyntaxKind],
) -> Result<bool> {
    let Some(expression) = ctx.dom.child(id, Slot::Expression) else {
        if let Some(at) = t.find(SyntaxKind::EXPRESSION_BODY) {
            t.remove_with_space_before(at);
        }
        return Ok(false);
    };
    let conflicting = [Slot::Statements, Slot::Accessors, Slot::Initializer]
        .iter()
        .any(|slot| !ctx.dom.children(id, *slot).is_empty());
    if conflicting {
        let kind = ctx.dom.kind(id).unwrap_or(NodeKind::Method);
        return Err(DomError::incompatible(
            kind,
            Slot::Expression,
            NodeKind::Expression,
            "an expression body excludes a block, accessors and an initializer",
        ));
    }

    let green = ctx.build(expression)?;
    let clause = match child_of(base, SyntaxKind::EXPRESSION_BODY) {
        Some(written) => {
            let mut clause = Template::from_raw(&written);
            match clause.position(|k| k.is_expression()) {
                Some(at) => clause.set(at, node(green)),
                None => {
                    let end = clause.len();
                    clause.insert(end, vec![ws(" "), node(green)]);
                }
            }
            clause.finish()
        }
        None => new_node(
            SyntaxKind::EXPRESSION_BODY,
            vec![punct(SyntaxKind::FAT_ARROW), ws(" "), node(green)],
        ),
    };

    if let Some(at) = t.find(SyntaxKind::EXPRESSION_BODY) {
        t.set(at, node(clause));
    } else if let Some(at) = t.position(|k| body_kinds.contains(&k)) {
        let start = match at.checked_sub(1) {
            Some(before) if t.kind_at(before) == Some(SyntaxKind::WHITESPACE) => before,
            _ => at,
        };
        let end = t.len();
        t.splice(
            start..end,
            vec![ws(" "), node(clause), punct(SyntaxKind::SEMICOLON)],
        );
    } else if let Some(semicolon) = t.rfind(SyntaxKind::SEMICOLON) {
        t.insert(semicolon, vec![ws(" "), node(clause)]);
    } else {
        let end = t.len();
        t.insert(end, vec![ws(" "), node(clause), punct(SyntaxKind::SEMICOLON)]);
    }
    Ok(true)
}

/// The embedded statement of `if`, `else` and loops: a block, or a single
/// statement on its own line
pub fn embedded(t: &mut Template, ctx: &BuildContext<'_>, id: NodeId, base: &SyntaxNode) -> Result<()> {
    let has_block = ctx
        .dom
        .data(id)
        .and_then(NodeData::body)
        .is_some_and(|b| b.has_block);
    let statements = ctx.dom.children(id, Slot::Statements);
    let Some(index) = t.position(|k| k.is_statement()) else {
        return Err(ctx.incomplete(id, "embedded statement"));
    };
    let current = base.children().find(|n| n.kind().is_statement());

    if has_block || statements.len() != 1 {
        let green = match current.filter(|c| c.kind() == SyntaxKind::BLOCK) {
            Some(block) => rebuilt_block(ctx, id, &block)?,
            None => {
                let built = ctx.build_all(id, Slot::Statements)?;
                let block = fresh_block(ctx, id, built);
                let mut template = Template::from_green(&block);
                template.insert(0, vec![ctx.line_break(id)]);
                template.finish()
            }
        };
        t.set(index, node(green));
        return Ok(());
    }

    let built = ctx.build_all(id, Slot::Statements)?;
    if let Some(single) = built.into_iter().next() {
        t.set(index, node(single.green));
    }
    Ok(())
}
