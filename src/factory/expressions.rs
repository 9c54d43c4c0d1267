//! Expressions, kept as written
//!
//! An expression node carries its source text. Building reuses the raw
//! expression while the text is unchanged and reparses it otherwise.

use super::NodeFactory;
use super::context::{BuildContext, ParseContext};
use super::green::{green_of, parse_node};
use crate::dom::{ExpressionData, KindGroup, NodeData, NodeId, NodeKind};
use crate::error::Result;
use crate::parser::{FragmentKind, GreenNode, SyntaxKind, SyntaxNode};
use tracing::trace;

pub struct ExpressionFactory;

impl NodeFactory for ExpressionFactory {
    fn group(&self) -> KindGroup {
        KindGroup::Expression
    }

    fn can_create_from(&self, raw: &SyntaxNode) -> bool {
        raw.kind().is_expression() || raw.kind() == SyntaxKind::ERROR
    }

    fn create(&self, raw: &SyntaxNode, ctx: &mut ParseContext<'_>) -> Result<Vec<NodeId>> {
        let symbol = ctx.resolve(raw);
        let id = ctx.node(NodeData::Expression(ExpressionData::from_syntax(raw)), raw, symbol, None)?;
        Ok(vec![id])
    }

    fn can_build(&self, kind: NodeKind) -> bool {
        kind == NodeKind::Expression
    }

    fn build(&self, id: NodeId, ctx: &BuildContext<'_>) -> Result<GreenNode> {
        let node = ctx.dom.node(id)?;
        let NodeData::Expression(data) = node.data() else {
            return Err(ctx.incomplete(id, "expression data"));
        };
        if let Some(raw) = node.raw() {
            if raw.to_string() == data.text {
                return Ok(green_of(raw));
            }
        }
        if data.text.trim().is_empty() {
            return Err(ctx.incomplete(id, "expression text"));
        }
        trace!("reparsing expression `{}`", data.text);
        parse_node(FragmentKind::Expression, data.text.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Dom, ExpressionKind, LiteralKind};
    use crate::factory::Corporation;
    use crate::options::DomOptions;

    #[test]
    fn test_changed_text_is_reparsed() {
        let mut dom = Dom::new();
        let id = dom.create(NodeData::expression("a + 1"));
        let corporation = Corporation::with_defaults();
        let options = DomOptions::default();
        let ctx = BuildContext::new(&dom, &corporation, &options);
        let green = ExpressionFactory.build(id, &ctx).unwrap();
        assert_eq!(SyntaxKind::from(green.kind()), SyntaxKind::BINARY_EXPR);
        assert_eq!(SyntaxNode::new_root(green).to_string(), "a + 1");
    }

    #[test]
    fn test_expression_data_classifies_literals() {
        let data = ExpressionData::new("\"text\"");
        assert_eq!(data.kind, ExpressionKind::Literal);
        assert_eq!(data.literal, LiteralKind::String);
    }
}
