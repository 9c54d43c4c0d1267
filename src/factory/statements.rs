//! Statements: blocks, locals, expression statements, jumps, conditionals,
//! loops and `try`
//!
//! Statement nodes own their leading trivia, so a statement keeps its line
//! and indentation wherever the enclosing list moves it.

use super::context::{BuildContext, ParseContext};
use super::green::{
    Template, comma_space, new_node, node, parse_descendant, parse_node, punct,
    rebuild_separated, token, without_leading_trivia, ws,
};
use super::members::{declarator_in, variable_declaration};
use super::{NodeFactory, parts};
use crate::dom::{
    AssignmentData, AssignmentOperator, BodyData, CatchData, DeclarationData, KindGroup,
    NodeData, NodeId, NodeKind, Slot,
};
use crate::error::{DomError, Result};
use crate::parser::{
    AstNode, Block, CatchClause, DoStmt, ElseClause, ExprStmt, FinallyClause, ForStmt, ForeachStmt,
    ForeachVariable, FragmentKind, GreenNode, IfStmt, LocalDeclStmt, ReturnStmt, SyntaxKind,
    SyntaxNode, ThrowStmt, TryStmt, VariableDeclaration, WhileStmt, assignment_operands,
    assignment_operator,
};

/// Shape of an embedded body as written
fn body_shape(body: Option<&SyntaxNode>) -> BodyData {
    BodyData {
        has_block: body.is_none_or(|b| b.kind() == SyntaxKind::BLOCK),
    }
}

/// Create the statements of an embedded body: the contents of a block, or
/// the single statement itself
fn create_body(ctx: &mut ParseContext<'_>, id: NodeId, body: Option<SyntaxNode>) -> Result<()> {
    match body {
        Some(block) if block.kind() == SyntaxKind::BLOCK => {
            for statement in block.children() {
                ctx.create_into(id, Slot::Statements, &statement)?;
            }
        }
        Some(single) => ctx.create_into(id, Slot::Statements, &single)?,
        None => {}
    }
    Ok(())
}

/// Create the statements of a `{ ... }` block
fn create_block(ctx: &mut ParseContext<'_>, id: NodeId, block: Option<Block>) -> Result<()> {
    if let Some(block) = block {
        for statement in block.statements() {
            ctx.create_into(id, Slot::Statements, &statement)?;
        }
    }
    Ok(())
}

/// The raw node when it is one of `kinds`, else a skeleton parsed as a
/// statement
fn statement_base(
    ctx: &BuildContext<'_>,
    id: NodeId,
    kinds: &[SyntaxKind],
    skeleton: &str,
) -> Result<(SyntaxNode, bool)> {
    ctx.base(id, kinds, || parse_node(FragmentKind::Statement, skeleton))
}

/// Replace, add or drop the single expression of a slot. New expressions
/// go before the token at `before` with a space in front.
fn upsert_expression(
    t: &mut Template,
    ctx: &BuildContext<'_>,
    id: NodeId,
    slot: Slot,
    before: Option<usize>,
) -> Result<()> {
    let written = t.position(|k| k.is_expression());
    match (ctx.dom.child(id, slot), written) {
        (Some(expr), Some(at)) => t.set(at, node(ctx.build(expr)?)),
        (Some(expr), None) => {
            let green = ctx.build(expr)?;
            let at = before.unwrap_or(t.len());
            t.insert(at, vec![ws(" "), node(green)]);
        }
        (None, Some(at)) => t.remove_with_space_before(at),
        (None, None) => {}
    }
    Ok(())
}

/// Set the first expression of the template to the required child of `slot`
fn required_expression(
    t: &mut Template,
    ctx: &BuildContext<'_>,
    id: NodeId,
    slot: Slot,
    what: &'static str,
) -> Result<()> {
    let Some(expr) = ctx.dom.child(id, slot) else {
        return Err(ctx.incomplete(id, what));
    };
    let green = ctx.build(expr)?;
    match t.position(|k| k.is_expression()) {
        Some(at) => t.set(at, node(green)),
        None => return Err(ctx.incomplete(id, what)),
    }
    Ok(())
}

// ============================================================================
// Blocks
// ============================================================================

/// A nested `{ ... }` statement
pub struct BlockFactory;

impl NodeFactory for BlockFactory {
    fn group(&self) -> KindGroup {
        KindGroup::Statement
    }

    fn can_create_from(&self, raw: &SyntaxNode) -> bool {
        raw.kind() == SyntaxKind::BLOCK
    }

    fn create(&self, raw: &SyntaxNode, ctx: &mut ParseContext<'_>) -> Result<Vec<NodeId>> {
        let id = ctx.node(NodeData::Block, raw, None, None)?;
        create_block(ctx, id, Block::cast(raw.clone()))?;
        Ok(vec![id])
    }

    fn can_build(&self, kind: NodeKind) -> bool {
        kind == NodeKind::Block
    }

    fn build(&self, id: NodeId, ctx: &BuildContext<'_>) -> Result<GreenNode> {
        let raw = ctx.dom.node(id)?.raw().filter(|r| r.kind() == SyntaxKind::BLOCK).cloned();
        let (green, owner) = match raw {
            Some(raw) => (parts::rebuilt_block(ctx, id, &raw)?, Some(raw)),
            None => (parts::fresh_block(ctx, id, ctx.build_all(id, Slot::Statements)?), None),
        };
        let mut t = Template::from_green(&green);
        parts::leading(&mut t, ctx, id, owner.as_ref());
        Ok(t.finish())
    }
}

// ============================================================================
// Local declarations
// ============================================================================

/// Locals, one node per declarator, and the loop variables of `for` and
/// `foreach`
pub struct LocalFactory;

impl LocalFactory {
    fn declaration_data(name: Option<String>, is_const: bool) -> NodeData {
        NodeData::Declaration(DeclarationData {
            name: name.unwrap_or_default().into(),
            is_const,
        })
    }

    fn is_const(ctx: &BuildContext<'_>, id: NodeId) -> bool {
        matches!(ctx.dom.data(id), Some(NodeData::Declaration(d)) if d.is_const)
    }

    /// `int i = 0` in a `for` header
    fn build_for_variable(&self, id: NodeId, ctx: &BuildContext<'_>) -> Result<GreenNode> {
        let name = ctx.required_name(id)?;
        let (base, _) = ctx.base(id, &[SyntaxKind::VARIABLE_DECLARATION], || {
            parse_descendant(
                FragmentKind::Statement,
                "for (object __name;;) ;",
                SyntaxKind::VARIABLE_DECLARATION,
            )
        })?;
        let mut t = Template::from_raw(&base);
        if let Some(declarator) = parts::child_of(&base, SyntaxKind::VARIABLE_DECLARATOR) {
            let green = declarator_in(ctx, id, &declarator, &name)?;
            parts::set_node(&mut t, SyntaxKind::VARIABLE_DECLARATOR, green);
        }
        parts::type_ref(&mut t, ctx, id, Slot::Type)?;
        Ok(t.finish())
    }

    /// `var item` in a `foreach` header
    fn build_foreach_variable(&self, id: NodeId, ctx: &BuildContext<'_>) -> Result<GreenNode> {
        let name = ctx.required_name(id)?;
        let (base, _) = ctx.base(id, &[SyntaxKind::FOREACH_VARIABLE], || {
            parse_descendant(
                FragmentKind::Statement,
                "foreach (object __name in __items) ;",
                SyntaxKind::FOREACH_VARIABLE,
            )
        })?;
        let mut t = Template::from_raw(&base);
        if let Some(name_at) = t.rfind(SyntaxKind::IDENT) {
            t.retext(name_at, &name);
        }
        parts::type_ref(&mut t, ctx, id, Slot::Type)?;
        Ok(t.finish())
    }
}

impl NodeFactory for LocalFactory {
    fn group(&self) -> KindGroup {
        KindGroup::Statement
    }

    fn can_create_from(&self, raw: &SyntaxNode) -> bool {
        match raw.kind() {
            SyntaxKind::LOCAL_DECL_STMT | SyntaxKind::FOREACH_VARIABLE => true,
            SyntaxKind::VARIABLE_DECLARATION => {
                raw.parent().is_some_and(|p| p.kind() == SyntaxKind::FOR_STMT)
            }
            _ => false,
        }
    }

    fn create(&self, raw: &SyntaxNode, ctx: &mut ParseContext<'_>) -> Result<Vec<NodeId>> {
        match raw.kind() {
            SyntaxKind::LOCAL_DECL_STMT => {
                let Some(local) = LocalDeclStmt::cast(raw.clone()) else {
                    return Ok(Vec::new());
                };
                let Some(declaration) = local.declaration() else {
                    return Ok(Vec::new());
                };
                let mut ids = Vec::new();
                for declarator in declaration.declarators() {
                    let symbol = ctx.resolve(declarator.syntax());
                    let data = Self::declaration_data(declarator.name(), local.is_const());
                    let id = ctx.node(data, declarator.syntax(), symbol, Some(raw))?;
                    ctx.create_optional(id, Slot::Type, declaration.ty().map(|t| t.syntax().clone()))?;
                    ctx.create_optional(id, Slot::Initializer, declarator.initializer())?;
                    ids.push(id);
                }
                Ok(ids)
            }
            SyntaxKind::VARIABLE_DECLARATION => {
                let Some(declaration) = VariableDeclaration::cast(raw.clone()) else {
                    return Ok(Vec::new());
                };
                let declarators: Vec<_> = declaration.declarators().collect();
                let [declarator] = declarators.as_slice() else {
                    return Ok(Vec::new());
                };
                let symbol = ctx.resolve(declarator.syntax());
                let id = ctx.node(Self::declaration_data(declarator.name(), false), raw, symbol, None)?;
                ctx.create_optional(id, Slot::Type, declaration.ty().map(|t| t.syntax().clone()))?;
                ctx.create_optional(id, Slot::Initializer, declarator.initializer())?;
                Ok(vec![id])
            }
            SyntaxKind::FOREACH_VARIABLE => {
                let Some(variable) = ForeachVariable::cast(raw.clone()) else {
                    return Ok(Vec::new());
                };
                let symbol = ctx.resolve(raw);
                let id = ctx.node(Self::declaration_data(variable.name(), false), raw, symbol, None)?;
                ctx.create_optional(id, Slot::Type, variable.ty().map(|t| t.syntax().clone()))?;
                Ok(vec![id])
            }
            _ => Ok(Vec::new()),
        }
    }

    fn can_build(&self, kind: NodeKind) -> bool {
        kind == NodeKind::Declaration
    }

    fn build(&self, id: NodeId, ctx: &BuildContext<'_>) -> Result<GreenNode> {
        match ctx.dom.parent(id).and_then(|p| ctx.dom.kind(p)) {
            Some(NodeKind::For) if ctx.dom.node(id)?.parent_slot() == Some(Slot::Variable) => {
                self.build_for_variable(id, ctx)
            }
            Some(NodeKind::ForEach) if ctx.dom.node(id)?.parent_slot() == Some(Slot::Variable) => {
                self.build_foreach_variable(id, ctx)
            }
            _ => self.build_group(&[id], ctx),
        }
    }

    fn build_group(&self, ids: &[NodeId], ctx: &BuildContext<'_>) -> Result<GreenNode> {
        let Some(lead) = ids.first().copied() else {
            return Err(DomError::syntax("empty declarator group"));
        };
        let group = ctx
            .group_raw(lead)
            .filter(|g| g.kind() == SyntaxKind::LOCAL_DECL_STMT && ctx.claims_group(lead));
        let (base, fresh) = match group {
            Some(group) => (group, false),
            None => (
                SyntaxNode::new_root(parse_node(FragmentKind::Statement, "object __name;")?),
                true,
            ),
        };
        let mut t = Template::from_raw(&base);
        if let Some(declaration) = parts::child_of(&base, SyntaxKind::VARIABLE_DECLARATION) {
            let green = variable_declaration(ctx, ids, &declaration)?;
            parts::set_node(&mut t, SyntaxKind::VARIABLE_DECLARATION, green);
        }
        match (t.find(SyntaxKind::CONST_KW), Self::is_const(ctx, lead)) {
            (None, true) => {
                let at = t.leading_len();
                t.insert(at, vec![punct(SyntaxKind::CONST_KW), ws(" ")]);
            }
            (Some(at), false) => {
                t.remove(at);
                if t.kind_at(at) == Some(SyntaxKind::WHITESPACE) {
                    t.remove(at);
                }
            }
            _ => {}
        }
        parts::leading(&mut t, ctx, lead, (!fresh).then_some(&base));
        Ok(t.finish())
    }
}

// ============================================================================
// Expression statements
// ============================================================================

/// `x = y;`, `Call();` and other expression statements
pub struct ExpressionStatementFactory;

impl ExpressionStatementFactory {
    /// The assignment expression for an Assignment node, patching the
    /// written one when the operator still matches
    fn assignment(&self, id: NodeId, ctx: &BuildContext<'_>, written: Option<SyntaxNode>) -> Result<GreenNode> {
        let Some(NodeData::Assignment(data)) = ctx.dom.data(id) else {
            return Err(ctx.incomplete(id, "assignment data"));
        };
        let (Some(left), Some(right)) = (
            ctx.dom.child(id, Slot::Left),
            ctx.dom.child(id, Slot::Expression),
        ) else {
            return Err(ctx.incomplete(id, "assignment operand"));
        };
        let (left, right) = (ctx.build(left)?, ctx.build(right)?);
        let same_operator = written
            .as_ref()
            .and_then(assignment_operator)
            .and_then(|op| AssignmentOperator::from_text(&op))
            == Some(data.operator);
        if let (Some(written), true) = (written, same_operator) {
            let mut t = Template::from_raw(&written);
            let operands: Vec<usize> = (0..t.len())
                .filter(|i| t.kind_at(*i).is_some_and(|k| k.is_expression()))
                .collect();
            if let [l, r] = operands.as_slice() {
                t.set(*r, node(right));
                t.set(*l, node(left));
                return Ok(t.finish());
            }
        }
        let mut elements = vec![node(left), ws(" ")];
        elements.extend(data.operator.tokens().iter().map(|k| punct(*k)));
        elements.push(ws(" "));
        elements.push(node(right));
        Ok(new_node(SyntaxKind::ASSIGN_EXPR, elements))
    }
}

impl NodeFactory for ExpressionStatementFactory {
    fn group(&self) -> KindGroup {
        KindGroup::Statement
    }

    fn can_create_from(&self, raw: &SyntaxNode) -> bool {
        ExprStmt::cast(raw.clone()).is_some_and(|s| s.expression().is_some())
    }

    fn create(&self, raw: &SyntaxNode, ctx: &mut ParseContext<'_>) -> Result<Vec<NodeId>> {
        let Some(expr) = ExprStmt::cast(raw.clone()).and_then(|s| s.expression()) else {
            return Ok(Vec::new());
        };
        let id = match expr.kind() {
            SyntaxKind::ASSIGN_EXPR => {
                let (left, right) = assignment_operands(&expr);
                let operator = assignment_operator(&expr)
                    .and_then(|op| AssignmentOperator::from_text(&op))
                    .unwrap_or_default();
                let id = ctx.node(NodeData::Assignment(AssignmentData { operator }), raw, None, None)?;
                ctx.create_optional(id, Slot::Left, left)?;
                ctx.create_optional(id, Slot::Expression, right)?;
                id
            }
            SyntaxKind::CALL_EXPR => {
                let id = ctx.node(NodeData::Invocation, raw, None, None)?;
                ctx.create_into(id, Slot::Expression, &expr)?;
                id
            }
            _ => {
                let id = ctx.node(NodeData::ExpressionStatement, raw, None, None)?;
                ctx.create_into(id, Slot::Expression, &expr)?;
                id
            }
        };
        Ok(vec![id])
    }

    fn can_build(&self, kind: NodeKind) -> bool {
        matches!(
            kind,
            NodeKind::Assignment | NodeKind::Invocation | NodeKind::ExpressionStatement
        )
    }

    fn build(&self, id: NodeId, ctx: &BuildContext<'_>) -> Result<GreenNode> {
        let kind = ctx.dom.node(id)?.kind();
        let skeleton = match kind {
            NodeKind::Assignment => "__x = __y;",
            _ => "__x();",
        };
        let (base, fresh) = statement_base(ctx, id, &[SyntaxKind::EXPR_STMT], skeleton)?;
        let mut t = Template::from_raw(&base);
        if kind == NodeKind::Assignment {
            let written = base
                .children()
                .find(|n| n.kind() == SyntaxKind::ASSIGN_EXPR);
            let green = self.assignment(id, ctx, written)?;
            match t.position(|k| k.is_expression()) {
                Some(at) => t.set(at, node(green)),
                None => return Err(ctx.incomplete(id, "expression")),
            }
        } else {
            required_expression(&mut t, ctx, id, Slot::Expression, "expression")?;
        }
        parts::leading(&mut t, ctx, id, (!fresh).then_some(&base));
        Ok(t.finish())
    }
}

// ============================================================================
// Jumps
// ============================================================================

/// `return`, `throw`, `break`, `continue` and the empty statement
pub struct JumpFactory;

impl NodeFactory for JumpFactory {
    fn group(&self) -> KindGroup {
        KindGroup::Statement
    }

    fn can_create_from(&self, raw: &SyntaxNode) -> bool {
        matches!(
            raw.kind(),
            SyntaxKind::RETURN_STMT
                | SyntaxKind::THROW_STMT
                | SyntaxKind::BREAK_STMT
                | SyntaxKind::CONTINUE_STMT
                | SyntaxKind::EMPTY_STMT
        )
    }

    fn create(&self, raw: &SyntaxNode, ctx: &mut ParseContext<'_>) -> Result<Vec<NodeId>> {
        let (data, expression) = match raw.kind() {
            SyntaxKind::RETURN_STMT => (
                NodeData::Return,
                ReturnStmt::cast(raw.clone()).and_then(|s| s.expression()),
            ),
            SyntaxKind::THROW_STMT => (
                NodeData::Throw,
                ThrowStmt::cast(raw.clone()).and_then(|s| s.expression()),
            ),
            SyntaxKind::BREAK_STMT => (NodeData::Break, None),
            SyntaxKind::CONTINUE_STMT => (NodeData::Continue, None),
            _ => (NodeData::Empty, None),
        };
        let id = ctx.node(data, raw, None, None)?;
        ctx.create_optional(id, Slot::Expression, expression)?;
        Ok(vec![id])
    }

    fn can_build(&self, kind: NodeKind) -> bool {
        matches!(
            kind,
            NodeKind::Return | NodeKind::Throw | NodeKind::Break | NodeKind::Continue | NodeKind::Empty
        )
    }

    fn build(&self, id: NodeId, ctx: &BuildContext<'_>) -> Result<GreenNode> {
        let kind = ctx.dom.node(id)?.kind();
        let (syntax, skeleton) = match kind {
            NodeKind::Return => (SyntaxKind::RETURN_STMT, "return;"),
            NodeKind::Throw => (SyntaxKind::THROW_STMT, "throw;"),
            NodeKind::Break => (SyntaxKind::BREAK_STMT, "break;"),
            NodeKind::Continue => (SyntaxKind::CONTINUE_STMT, "continue;"),
            _ => (SyntaxKind::EMPTY_STMT, ";"),
        };
        let (base, fresh) = statement_base(ctx, id, &[syntax], skeleton)?;
        let mut t = Template::from_raw(&base);
        if kind.has_slot(Slot::Expression) {
            let semicolon = t.rfind(SyntaxKind::SEMICOLON);
            upsert_expression(&mut t, ctx, id, Slot::Expression, semicolon)?;
        }
        parts::leading(&mut t, ctx, id, (!fresh).then_some(&base));
        Ok(t.finish())
    }
}

// ============================================================================
// Conditionals
// ============================================================================

/// `if` statements and their `else` clauses
pub struct ConditionalFactory;

impl ConditionalFactory {
    fn build_if(&self, id: NodeId, ctx: &BuildContext<'_>) -> Result<GreenNode> {
        let (base, fresh) = statement_base(ctx, id, &[SyntaxKind::IF_STMT], "if (__c) ;")?;
        let mut t = Template::from_raw(&base);
        parts::embedded(&mut t, ctx, id, &base)?;
        required_expression(&mut t, ctx, id, Slot::Condition, "condition")?;

        let written = t.find(SyntaxKind::ELSE_CLAUSE);
        match (ctx.dom.child(id, Slot::Else), written) {
            (Some(clause), Some(at)) => t.set(at, node(ctx.build(clause)?)),
            (Some(clause), None) => {
                let green = ctx.build(clause)?;
                let end = t.len();
                t.insert(end, vec![node(green)]);
            }
            (None, Some(at)) => t.remove(at),
            (None, None) => {}
        }
        parts::leading(&mut t, ctx, id, (!fresh).then_some(&base));
        Ok(t.finish())
    }

    fn build_else(&self, id: NodeId, ctx: &BuildContext<'_>) -> Result<GreenNode> {
        let (base, fresh) = ctx.base(id, &[SyntaxKind::ELSE_CLAUSE], || {
            parse_descendant(FragmentKind::Statement, "if (__c) ; else ;", SyntaxKind::ELSE_CLAUSE)
                .map(without_leading_trivia)
        })?;
        let mut t = Template::from_raw(&base);
        parts::embedded(&mut t, ctx, id, &base)?;
        parts::leading(&mut t, ctx, id, (!fresh).then_some(&base));
        Ok(t.finish())
    }
}

impl NodeFactory for ConditionalFactory {
    fn group(&self) -> KindGroup {
        KindGroup::Statement
    }

    fn can_create_from(&self, raw: &SyntaxNode) -> bool {
        matches!(raw.kind(), SyntaxKind::IF_STMT | SyntaxKind::ELSE_CLAUSE)
    }

    fn create(&self, raw: &SyntaxNode, ctx: &mut ParseContext<'_>) -> Result<Vec<NodeId>> {
        if let Some(clause) = ElseClause::cast(raw.clone()) {
            let body = clause.body();
            let id = ctx.node(NodeData::Else(body_shape(body.as_ref())), raw, None, None)?;
            create_body(ctx, id, body)?;
            return Ok(vec![id]);
        }
        let Some(stmt) = IfStmt::cast(raw.clone()) else {
            return Ok(Vec::new());
        };
        let body = stmt.body();
        let id = ctx.node(NodeData::If(body_shape(body.as_ref())), raw, None, None)?;
        ctx.create_optional(id, Slot::Condition, stmt.condition())?;
        create_body(ctx, id, body)?;
        if let Some(clause) = stmt.else_clause() {
            ctx.create_into(id, Slot::Else, clause.syntax())?;
        }
        Ok(vec![id])
    }

    fn can_build(&self, kind: NodeKind) -> bool {
        matches!(kind, NodeKind::If | NodeKind::Else)
    }

    fn build(&self, id: NodeId, ctx: &BuildContext<'_>) -> Result<GreenNode> {
        match ctx.dom.node(id)?.kind() {
            NodeKind::Else => self.build_else(id, ctx),
            _ => self.build_if(id, ctx),
        }
    }
}

// ============================================================================
// Loops
// ============================================================================

/// `while`, `do`, `for` and `foreach`
pub struct LoopFactory;

impl LoopFactory {
    fn build_for(&self, id: NodeId, ctx: &BuildContext<'_>) -> Result<GreenNode> {
        let (base, fresh) = statement_base(ctx, id, &[SyntaxKind::FOR_STMT], "for (;;) ;")?;
        let mut t = Template::from_raw(&base);
        parts::embedded(&mut t, ctx, id, &base)?;

        // Incrementors, after the second `;`
        if let Some(at) = t.find(SyntaxKind::FOR_INCREMENTORS) {
            let built = ctx.build_all(id, Slot::Incrementors)?;
            let has_items = !built.is_empty();
            if let Some(list) = parts::child_of(&base, SyntaxKind::FOR_INCREMENTORS) {
                let green = rebuild_separated(
                    &list,
                    None,
                    None,
                    &|k| k.is_expression(),
                    built,
                    &comma_space(),
                    None,
                );
                t.set(at, node(green));
            }
            let spaced = at > 0 && t.kind_at(at - 1) == Some(SyntaxKind::WHITESPACE);
            if has_items && !spaced {
                t.insert(at, vec![ws(" ")]);
            } else if !has_items && spaced {
                t.remove(at - 1);
            }
        }

        // Condition, between the two `;`
        let first = t.find(SyntaxKind::SEMICOLON);
        let second = first.and_then(|s| t.find_from(s + 1, SyntaxKind::SEMICOLON));
        if let (Some(first), Some(second)) = (first, second) {
            let written = (first + 1..second).find(|i| t.kind_at(*i).is_some_and(|k| k.is_expression()));
            match (ctx.dom.child(id, Slot::Condition), written) {
                (Some(cond), Some(at)) => t.set(at, node(ctx.build(cond)?)),
                (Some(cond), None) => {
                    let green = ctx.build(cond)?;
                    t.insert(first + 1, vec![ws(" "), node(green)]);
                }
                (None, Some(at)) => t.remove_with_space_before(at),
                (None, None) => {}
            }
        }

        // Loop variable, right after `(`
        let written = t.find(SyntaxKind::VARIABLE_DECLARATION);
        match (ctx.dom.child(id, Slot::Variable), written) {
            (Some(var), Some(at)) => t.set(at, node(ctx.build(var)?)),
            (Some(var), None) => {
                let green = ctx.build(var)?;
                if let Some(open) = t.find(SyntaxKind::L_PAREN) {
                    t.insert(open + 1, vec![node(green)]);
                }
            }
            (None, Some(at)) => t.remove(at),
            (None, None) => {}
        }

        parts::leading(&mut t, ctx, id, (!fresh).then_some(&base));
        Ok(t.finish())
    }

    fn build_foreach(&self, id: NodeId, ctx: &BuildContext<'_>) -> Result<GreenNode> {
        let (base, fresh) = statement_base(
            ctx,
            id,
            &[SyntaxKind::FOREACH_STMT],
            "foreach (object __item in __items) ;",
        )?;
        let mut t = Template::from_raw(&base);
        parts::embedded(&mut t, ctx, id, &base)?;
        required_expression(&mut t, ctx, id, Slot::Expression, "collection")?;
        let Some(var) = ctx.dom.child(id, Slot::Variable) else {
            return Err(ctx.incomplete(id, "loop variable"));
        };
        parts::set_node(&mut t, SyntaxKind::FOREACH_VARIABLE, ctx.build(var)?);
        parts::leading(&mut t, ctx, id, (!fresh).then_some(&base));
        Ok(t.finish())
    }
}

impl NodeFactory for LoopFactory {
    fn group(&self) -> KindGroup {
        KindGroup::Statement
    }

    fn can_create_from(&self, raw: &SyntaxNode) -> bool {
        match raw.kind() {
            SyntaxKind::WHILE_STMT | SyntaxKind::DO_STMT | SyntaxKind::FOREACH_STMT => true,
            // Comma-separated initializers have no DOM shape
            SyntaxKind::FOR_STMT => ForStmt::cast(raw.clone()).is_some_and(|f| {
                f.initializer_expressions().is_empty()
                    && f.declaration().is_none_or(|d| d.declarators().count() == 1)
            }),
            _ => false,
        }
    }

    fn create(&self, raw: &SyntaxNode, ctx: &mut ParseContext<'_>) -> Result<Vec<NodeId>> {
        let id = match raw.kind() {
            SyntaxKind::WHILE_STMT => {
                let Some(stmt) = WhileStmt::cast(raw.clone()) else {
                    return Ok(Vec::new());
                };
                let body = stmt.body();
                let id = ctx.node(NodeData::While(body_shape(body.as_ref())), raw, None, None)?;
                ctx.create_optional(id, Slot::Condition, stmt.condition())?;
                create_body(ctx, id, body)?;
                id
            }
            SyntaxKind::DO_STMT => {
                let Some(stmt) = DoStmt::cast(raw.clone()) else {
                    return Ok(Vec::new());
                };
                let body = stmt.body();
                let id = ctx.node(NodeData::Do(body_shape(body.as_ref())), raw, None, None)?;
                ctx.create_optional(id, Slot::Condition, stmt.condition())?;
                create_body(ctx, id, body)?;
                id
            }
            SyntaxKind::FOR_STMT => {
                let Some(stmt) = ForStmt::cast(raw.clone()) else {
                    return Ok(Vec::new());
                };
                let body = stmt.body();
                let id = ctx.node(NodeData::For(body_shape(body.as_ref())), raw, None, None)?;
                ctx.create_optional(id, Slot::Variable, stmt.declaration().map(|d| d.syntax().clone()))?;
                ctx.create_optional(id, Slot::Condition, stmt.condition())?;
                if let Some(incrementors) = stmt.incrementors() {
                    for expr in incrementors.expressions() {
                        ctx.create_into(id, Slot::Incrementors, &expr)?;
                    }
                }
                create_body(ctx, id, body)?;
                id
            }
            SyntaxKind::FOREACH_STMT => {
                let Some(stmt) = ForeachStmt::cast(raw.clone()) else {
                    return Ok(Vec::new());
                };
                let body = stmt.body();
                let id = ctx.node(NodeData::ForEach(body_shape(body.as_ref())), raw, None, None)?;
                ctx.create_optional(id, Slot::Variable, stmt.variable().map(|v| v.syntax().clone()))?;
                ctx.create_optional(id, Slot::Expression, stmt.expression())?;
                create_body(ctx, id, body)?;
                id
            }
            _ => return Ok(Vec::new()),
        };
        Ok(vec![id])
    }

    fn can_build(&self, kind: NodeKind) -> bool {
        matches!(
            kind,
            NodeKind::While | NodeKind::Do | NodeKind::For | NodeKind::ForEach
        )
    }

    fn build(&self, id: NodeId, ctx: &BuildContext<'_>) -> Result<GreenNode> {
        let (syntax, skeleton) = match ctx.dom.node(id)?.kind() {
            NodeKind::For => return self.build_for(id, ctx),
            NodeKind::ForEach => return self.build_foreach(id, ctx),
            NodeKind::Do => (SyntaxKind::DO_STMT, "do ; while (__c);"),
            _ => (SyntaxKind::WHILE_STMT, "while (__c) ;"),
        };
        let (base, fresh) = statement_base(ctx, id, &[syntax], skeleton)?;
        let mut t = Template::from_raw(&base);
        parts::embedded(&mut t, ctx, id, &base)?;
        required_expression(&mut t, ctx, id, Slot::Condition, "condition")?;
        parts::leading(&mut t, ctx, id, (!fresh).then_some(&base));
        Ok(t.finish())
    }
}

// ============================================================================
// Exception handling
// ============================================================================

/// `try` statements with their `catch` and `finally` clauses
pub struct TryFactory;

impl TryFactory {
    /// Rebuild the `{ ... }` of a try statement or clause in place
    fn block(t: &mut Template, ctx: &BuildContext<'_>, id: NodeId, base: &SyntaxNode) -> Result<()> {
        let (Some(at), Some(block)) = (
            t.find(SyntaxKind::BLOCK),
            parts::child_of(base, SyntaxKind::BLOCK),
        ) else {
            return Err(ctx.incomplete(id, "block"));
        };
        let green = parts::rebuilt_block(ctx, id, &block)?;
        t.set(at, node(green));
        Ok(())
    }

    fn build_try(&self, id: NodeId, ctx: &BuildContext<'_>) -> Result<GreenNode> {
        let (base, fresh) = statement_base(
            ctx,
            id,
            &[SyntaxKind::TRY_STMT],
            &format!("try{}", ctx.block_text(id)),
        )?;
        let mut t = Template::from_raw(&base);
        Self::block(&mut t, ctx, id, &base)?;

        // Clauses own their leading trivia and close the statement
        let mut clauses = Vec::new();
        for &catch in ctx.dom.children(id, Slot::Catches) {
            clauses.push(node(ctx.build(catch)?));
        }
        if let Some(finally) = ctx.dom.child(id, Slot::Finally) {
            clauses.push(node(ctx.build(finally)?));
        }
        let start = t
            .position(|k| matches!(k, SyntaxKind::CATCH_CLAUSE | SyntaxKind::FINALLY_CLAUSE))
            .unwrap_or(t.len());
        let end = t.len();
        t.splice(start..end, clauses);

        parts::leading(&mut t, ctx, id, (!fresh).then_some(&base));
        Ok(t.finish())
    }

    fn build_catch(&self, id: NodeId, ctx: &BuildContext<'_>) -> Result<GreenNode> {
        let Some(NodeData::Catch(data)) = ctx.dom.data(id) else {
            return Err(ctx.incomplete(id, "catch data"));
        };
        let (base, fresh) = ctx.base(id, &[SyntaxKind::CATCH_CLAUSE], || {
            let text = format!("try {{ }} catch{}", ctx.block_text(id));
            parse_descendant(FragmentKind::Statement, &text, SyntaxKind::CATCH_CLAUSE)
                .map(without_leading_trivia)
        })?;
        let mut t = Template::from_raw(&base);
        Self::block(&mut t, ctx, id, &base)?;

        // `when (...)` filter
        let written = t.find(SyntaxKind::CATCH_FILTER);
        match (ctx.dom.child(id, Slot::Condition), written) {
            (Some(cond), written) => {
                let filter = match written.and_then(|at| t.node_at(at)) {
                    Some(green) => green,
                    None => parse_descendant(
                        FragmentKind::Statement,
                        "try { } catch when (__c) { }",
                        SyntaxKind::CATCH_FILTER,
                    )?,
                };
                let mut f = Template::from_green(&filter);
                if let Some(at) = f.position(|k| k.is_expression()) {
                    f.set(at, node(ctx.build(cond)?));
                }
                match written {
                    Some(at) => t.set(at, node(f.finish())),
                    None => {
                        let after = t
                            .find(SyntaxKind::CATCH_DECL)
                            .or_else(|| t.find(SyntaxKind::CATCH_KW))
                            .unwrap_or(0);
                        t.insert(after + 1, vec![ws(" "), node(f.finish())]);
                    }
                }
            }
            (None, Some(at)) => t.remove_with_space_before(at),
            (None, None) => {}
        }

        // `(Type name)` declaration
        let written = t.find(SyntaxKind::CATCH_DECL);
        match (ctx.dom.child(id, Slot::ExceptionType), written) {
            (Some(ty), written) => {
                let ty = ctx.build(ty)?;
                let mut d = match written.and_then(|at| t.node_at(at)) {
                    Some(green) => Template::from_green(&green),
                    None => Template::new(
                        SyntaxKind::CATCH_DECL,
                        vec![punct(SyntaxKind::L_PAREN), punct(SyntaxKind::R_PAREN)],
                    ),
                };
                match d.find(SyntaxKind::TYPE) {
                    Some(at) => d.set(at, node(ty)),
                    None => d.insert(1, vec![node(ty)]),
                }
                match (d.find(SyntaxKind::IDENT), &data.variable) {
                    (Some(at), Some(name)) => d.retext(at, name),
                    (Some(at), None) => d.remove_with_space_before(at),
                    (None, Some(name)) => {
                        let close = d.rfind(SyntaxKind::R_PAREN).unwrap_or(d.len());
                        d.insert(close, vec![ws(" "), token(SyntaxKind::IDENT, name)]);
                    }
                    (None, None) => {}
                }
                match written {
                    Some(at) => t.set(at, node(d.finish())),
                    None => {
                        let after = t.find(SyntaxKind::CATCH_KW).unwrap_or(0);
                        t.insert(after + 1, vec![ws(" "), node(d.finish())]);
                    }
                }
            }
            (None, Some(at)) => t.remove_with_space_before(at),
            (None, None) => {}
        }

        parts::leading(&mut t, ctx, id, (!fresh).then_some(&base));
        Ok(t.finish())
    }

    fn build_finally(&self, id: NodeId, ctx: &BuildContext<'_>) -> Result<GreenNode> {
        let (base, fresh) = ctx.base(id, &[SyntaxKind::FINALLY_CLAUSE], || {
            let text = format!("try {{ }} finally{}", ctx.block_text(id));
            parse_descendant(FragmentKind::Statement, &text, SyntaxKind::FINALLY_CLAUSE)
                .map(without_leading_trivia)
        })?;
        let mut t = Template::from_raw(&base);
        Self::block(&mut t, ctx, id, &base)?;
        parts::leading(&mut t, ctx, id, (!fresh).then_some(&base));
        Ok(t.finish())
    }
}

impl NodeFactory for TryFactory {
    fn group(&self) -> KindGroup {
        KindGroup::Statement
    }

    fn can_create_from(&self, raw: &SyntaxNode) -> bool {
        matches!(
            raw.kind(),
            SyntaxKind::TRY_STMT | SyntaxKind::CATCH_CLAUSE | SyntaxKind::FINALLY_CLAUSE
        )
    }

    fn create(&self, raw: &SyntaxNode, ctx: &mut ParseContext<'_>) -> Result<Vec<NodeId>> {
        let id = match raw.kind() {
            SyntaxKind::TRY_STMT => {
                let Some(stmt) = TryStmt::cast(raw.clone()) else {
                    return Ok(Vec::new());
                };
                let id = ctx.node(NodeData::Try, raw, None, None)?;
                create_block(ctx, id, stmt.block())?;
                for catch in stmt.catches() {
                    ctx.create_into(id, Slot::Catches, catch.syntax())?;
                }
                ctx.create_optional(id, Slot::Finally, stmt.finally_clause().map(|f| f.syntax().clone()))?;
                id
            }
            SyntaxKind::CATCH_CLAUSE => {
                let Some(clause) = CatchClause::cast(raw.clone()) else {
                    return Ok(Vec::new());
                };
                let declaration = clause.declaration();
                let data = CatchData {
                    variable: declaration.as_ref().and_then(|d| d.name()).map(Into::into),
                };
                let id = ctx.node(NodeData::Catch(data), raw, None, None)?;
                ctx.create_optional(
                    id,
                    Slot::ExceptionType,
                    declaration.and_then(|d| d.ty()).map(|t| t.syntax().clone()),
                )?;
                ctx.create_optional(id, Slot::Condition, clause.filter().and_then(|f| f.condition()))?;
                create_block(ctx, id, clause.block())?;
                id
            }
            SyntaxKind::FINALLY_CLAUSE => {
                let Some(clause) = FinallyClause::cast(raw.clone()) else {
                    return Ok(Vec::new());
                };
                let id = ctx.node(NodeData::Finally, raw, None, None)?;
                create_block(ctx, id, clause.block())?;
                id
            }
            _ => return Ok(Vec::new()),
        };
        Ok(vec![id])
    }

    fn can_build(&self, kind: NodeKind) -> bool {
        matches!(kind, NodeKind::Try | NodeKind::Catch | NodeKind::Finally)
    }

    fn build(&self, id: NodeId, ctx: &BuildContext<'_>) -> Result<GreenNode> {
        match ctx.dom.node(id)?.kind() {
            NodeKind::Catch => self.build_catch(id, ctx),
            NodeKind::Finally => self.build_finally(id, ctx),
            _ => self.build_try(id, ctx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statement_skeletons_parse_to_their_kinds() {
        let cases = [
            ("if (__c) ;", SyntaxKind::IF_STMT),
            ("while (__c) ;", SyntaxKind::WHILE_STMT),
            ("do ; while (__c);", SyntaxKind::DO_STMT),
            ("for (;;) ;", SyntaxKind::FOR_STMT),
            ("foreach (object __item in __items) ;", SyntaxKind::FOREACH_STMT),
            ("object __name;", SyntaxKind::LOCAL_DECL_STMT),
            ("__x = __y;", SyntaxKind::EXPR_STMT),
            ("return;", SyntaxKind::RETURN_STMT),
            (";", SyntaxKind::EMPTY_STMT),
        ];
        for (text, kind) in cases {
            let green = parse_node(FragmentKind::Statement, text).unwrap();
            assert_eq!(SyntaxKind::from(green.kind()), kind, "{text}");
            assert_eq!(SyntaxNode::new_root(green).to_string(), text);
        }
    }

    #[test]
    fn clause_skeletons_have_no_leading_trivia() {
        let green = parse_descendant(
            FragmentKind::Statement,
            "if (__c) ; else ;",
            SyntaxKind::ELSE_CLAUSE,
        )
        .map(without_leading_trivia)
        .unwrap();
        assert_eq!(SyntaxNode::new_root(green).to_string(), "else ;");
    }
}
