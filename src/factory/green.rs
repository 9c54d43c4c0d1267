//! Green-tree surgery shared by the builders
//!
//! Builders start from the green node a DOM node was loaded from (or from a
//! parsed skeleton) and splice in the parts that changed. Everything here
//! works on owned [`GreenElement`] vectors; red nodes are only used to find
//! where the original children were.

use crate::error::{DomError, Result};
use crate::parser::{
    FragmentKind, GreenNode, GreenToken, NodeOrToken, SyntaxElement, SyntaxKind, SyntaxNode,
    SyntaxToken, leading_trivia, parse_fragment,
};

pub type GreenElement = NodeOrToken<GreenNode, GreenToken>;

// ============================================================================
// Elements
// ============================================================================

/// The green node behind a red node
pub fn green_of(raw: &SyntaxNode) -> GreenNode {
    raw.green().into_owned()
}

pub fn token(kind: SyntaxKind, text: &str) -> GreenElement {
    NodeOrToken::Token(GreenToken::new(kind.into(), text))
}

/// A keyword or punctuation token spelled the canonical way
pub fn punct(kind: SyntaxKind) -> GreenElement {
    token(kind, kind.text().unwrap_or_default())
}

pub fn ws(text: &str) -> GreenElement {
    token(SyntaxKind::WHITESPACE, text)
}

pub fn node(green: GreenNode) -> GreenElement {
    NodeOrToken::Node(green)
}

pub fn new_node(kind: SyntaxKind, elements: Vec<GreenElement>) -> GreenNode {
    GreenNode::new(kind.into(), elements)
}

pub fn kind_of(element: &GreenElement) -> SyntaxKind {
    match element {
        NodeOrToken::Node(n) => n.kind().into(),
        NodeOrToken::Token(t) => t.kind().into(),
    }
}

pub fn is_trivia(element: &GreenElement) -> bool {
    matches!(element, NodeOrToken::Token(t) if SyntaxKind::from(t.kind()).is_trivia())
}

fn red_children(raw: &SyntaxNode) -> Vec<GreenElement> {
    raw.children_with_tokens()
        .map(|e| match e {
            NodeOrToken::Node(n) => node(green_of(&n)),
            NodeOrToken::Token(t) => NodeOrToken::Token(t.green().to_owned()),
        })
        .collect()
}

fn green_children(green: &GreenNode) -> Vec<GreenElement> {
    green
        .children()
        .map(|e| match e {
            NodeOrToken::Node(n) => NodeOrToken::Node(n.to_owned()),
            NodeOrToken::Token(t) => NodeOrToken::Token(t.to_owned()),
        })
        .collect()
}

/// Text of a run of elements
pub fn text_of(elements: &[GreenElement]) -> String {
    elements
        .iter()
        .map(|e| match e {
            NodeOrToken::Node(n) => n.to_string(),
            NodeOrToken::Token(t) => t.text().to_string(),
        })
        .collect()
}

// ============================================================================
// Template
// ============================================================================

/// The direct children of a node under reconstruction
#[derive(Debug, Clone)]
pub struct Template {
    kind: SyntaxKind,
    elements: Vec<GreenElement>,
}

impl Template {
    pub fn from_raw(raw: &SyntaxNode) -> Self {
        Self {
            kind: raw.kind(),
            elements: red_children(raw),
        }
    }

    pub fn from_green(green: &GreenNode) -> Self {
        Self {
            kind: green.kind().into(),
            elements: green_children(green),
        }
    }

    pub fn new(kind: SyntaxKind, elements: Vec<GreenElement>) -> Self {
        Self { kind, elements }
    }

    pub fn elements(&self) -> &[GreenElement] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn kind_at(&self, index: usize) -> Option<SyntaxKind> {
        self.elements.get(index).map(kind_of)
    }

    pub fn find(&self, kind: SyntaxKind) -> Option<usize> {
        self.position(|k| k == kind)
    }

    pub fn position(&self, pred: impl Fn(SyntaxKind) -> bool) -> Option<usize> {
        self.elements.iter().position(|e| pred(kind_of(e)))
    }

    pub fn find_from(&self, start: usize, kind: SyntaxKind) -> Option<usize> {
        self.elements
            .iter()
            .skip(start)
            .position(|e| kind_of(e) == kind)
            .map(|i| i + start)
    }

    pub fn rfind(&self, kind: SyntaxKind) -> Option<usize> {
        self.elements.iter().rposition(|e| kind_of(e) == kind)
    }

    /// Positions of every element of `kind`
    pub fn all(&self, kind: SyntaxKind) -> Vec<usize> {
        self.elements
            .iter()
            .enumerate()
            .filter(|(_, e)| kind_of(e) == kind)
            .map(|(i, _)| i)
            .collect()
    }

    /// The child node at `index`, if it is a node
    pub fn node_at(&self, index: usize) -> Option<GreenNode> {
        match self.elements.get(index)? {
            NodeOrToken::Node(n) => Some(n.clone()),
            NodeOrToken::Token(_) => None,
        }
    }

    /// Number of trivia tokens the node starts with
    pub fn leading_len(&self) -> usize {
        self.elements.iter().take_while(|e| is_trivia(e)).count()
    }

    pub fn set(&mut self, index: usize, element: GreenElement) {
        if let Some(slot) = self.elements.get_mut(index) {
            *slot = element;
        }
    }

    pub fn insert(&mut self, index: usize, elements: Vec<GreenElement>) {
        let index = index.min(self.elements.len());
        self.elements.splice(index..index, elements);
    }

    pub fn splice(&mut self, range: std::ops::Range<usize>, elements: Vec<GreenElement>) {
        let end = range.end.min(self.elements.len());
        let start = range.start.min(end);
        self.elements.splice(start..end, elements);
    }

    pub fn remove(&mut self, index: usize) {
        if index < self.elements.len() {
            self.elements.remove(index);
        }
    }

    /// Remove the element at `index` and the whitespace right before it
    pub fn remove_with_space_before(&mut self, index: usize) {
        self.remove(index);
        if index > 0 && self.kind_at(index - 1) == Some(SyntaxKind::WHITESPACE) {
            self.remove(index - 1);
        }
    }

    /// Replace the token at `index` if its text differs
    pub fn retext(&mut self, index: usize, text: &str) {
        let kind = match self.elements.get(index) {
            Some(NodeOrToken::Token(t)) if t.text() != text => SyntaxKind::from(t.kind()),
            _ => return,
        };
        self.elements[index] = token(kind, text);
    }

    pub fn finish(self) -> GreenNode {
        new_node(self.kind, self.elements)
    }
}

// ============================================================================
// Fragments
// ============================================================================

/// Parse `text` as a fragment and take its first node
pub fn parse_node(kind: FragmentKind, text: &str) -> Result<GreenNode> {
    let parse = parse_fragment(kind, text);
    if let Some(err) = parse.errors.first() {
        return Err(DomError::syntax(format!("{kind:?} `{text}`: {}", err.message)));
    }
    parse
        .syntax()
        .first_child()
        .map(|n| green_of(&n))
        .ok_or_else(|| DomError::syntax(format!("{kind:?} `{text}` is empty")))
}

/// Parse `text` as a fragment and take the first descendant of `wanted`
pub fn parse_descendant(kind: FragmentKind, text: &str, wanted: SyntaxKind) -> Result<GreenNode> {
    let parse = parse_fragment(kind, text);
    if let Some(err) = parse.errors.first() {
        return Err(DomError::syntax(format!("{kind:?} `{text}`: {}", err.message)));
    }
    parse
        .syntax()
        .descendants()
        .find(|n| n.kind() == wanted)
        .map(|n| green_of(&n))
        .ok_or_else(|| DomError::syntax(format!("`{text}` holds no {wanted:?}")))
}

/// Strip the leading trivia tokens off a parsed node
pub fn without_leading_trivia(green: GreenNode) -> GreenNode {
    let mut template = Template::from_green(&green);
    let n = template.leading_len();
    template.splice(0..n, Vec::new());
    template.finish()
}

// ============================================================================
// Lines and indentation
// ============================================================================

/// Indentation of the line on which the node's first significant token sits,
/// and whether that token starts the line
pub fn line_of(raw: &SyntaxNode) -> (bool, String) {
    let first = raw
        .descendants_with_tokens()
        .filter_map(|e| e.into_token())
        .find(|t| !t.kind().is_trivia());
    let Some(first) = first else {
        return (false, String::new());
    };
    let mut parts = Vec::new();
    let mut at_file_start = true;
    let mut current = preceding_token(&first);
    while let Some(t) = current {
        let text = t.text();
        if let Some(idx) = text.rfind('\n') {
            parts.push(text[idx + 1..].to_string());
            at_file_start = false;
            break;
        }
        parts.push(text.to_string());
        current = preceding_token(&t);
    }
    parts.reverse();
    let prefix = parts.concat();
    let indent: String = prefix.chars().take_while(|c| *c == ' ' || *c == '\t').collect();
    let starts_line = indent.len() == prefix.len();
    (starts_line || (at_file_start && prefix.trim().is_empty()), indent)
}

/// The token before `token` in source order.
///
/// Unlike `SyntaxToken::prev_token` this steps over empty nodes such as a
/// modifier list with nothing in it.
fn preceding_token(token: &SyntaxToken) -> Option<SyntaxToken> {
    let mut element = SyntaxElement::Token(token.clone());
    loop {
        let mut sibling = element.prev_sibling_or_token();
        while let Some(current) = sibling {
            let last = match &current {
                NodeOrToken::Token(t) => Some(t.clone()),
                NodeOrToken::Node(n) => n
                    .descendants_with_tokens()
                    .filter_map(|e| e.into_token())
                    .last(),
            };
            if last.is_some() {
                return last;
            }
            sibling = current.prev_sibling_or_token();
        }
        element = SyntaxElement::Node(element.parent()?);
    }
}

/// Leading trivia of a raw node as green tokens
pub fn leading_elements(raw: &SyntaxNode) -> Vec<GreenElement> {
    leading_trivia(raw)
        .iter()
        .map(|t| NodeOrToken::Token(t.green().to_owned()))
        .collect()
}

// ============================================================================
// Regions
// ============================================================================

/// A built child together with the raw node it stands for in its container
#[derive(Debug, Clone)]
pub struct Built {
    pub anchor: Option<SyntaxNode>,
    pub green: GreenNode,
}

/// A container's children split around a run of item nodes
#[derive(Debug)]
struct Split {
    head: Vec<GreenElement>,
    /// Loose elements before each item, and the item
    items: Vec<(Vec<GreenElement>, SyntaxNode)>,
    tail: Vec<GreenElement>,
}

impl Split {
    /// Items are the child nodes accepted by `is_item`. Without items the
    /// split falls between `open` (inclusive) and `close`.
    fn of(
        container: &SyntaxNode,
        open: Option<SyntaxKind>,
        close: Option<SyntaxKind>,
        is_item: &dyn Fn(SyntaxKind) -> bool,
    ) -> Self {
        let children: Vec<_> = container.children_with_tokens().collect();
        let open_at = open.and_then(|k| children.iter().position(|e| e.kind() == k));
        let close_at = close.and_then(|k| children.iter().rposition(|e| e.kind() == k));
        let start = open_at.map(|i| i + 1).unwrap_or(0);
        let end = close_at.unwrap_or(children.len()).max(start);

        let to_green = |e: &crate::parser::SyntaxElement| match e {
            NodeOrToken::Node(n) => node(green_of(n)),
            NodeOrToken::Token(t) => NodeOrToken::Token(t.green().to_owned()),
        };
        let mut split = Split {
            head: children[..start].iter().map(to_green).collect(),
            items: Vec::new(),
            tail: Vec::new(),
        };
        let mut pending = Vec::new();
        for element in &children[start..end] {
            match element {
                NodeOrToken::Node(n) if is_item(n.kind()) => {
                    split.items.push((std::mem::take(&mut pending), n.clone()));
                }
                other => pending.push(to_green(other)),
            }
        }
        split.tail = pending;
        split.tail.extend(children[end..].iter().map(to_green));
        split
    }

    fn in_place(&self, built: &[Built]) -> bool {
        built.len() == self.items.len()
            && built
                .iter()
                .zip(&self.items)
                .all(|(b, (_, raw))| b.anchor.as_ref() == Some(raw))
    }
}

/// Rebuild a braced (or unbraced) list whose items own their leading
/// trivia: members, statements, accessors.
///
/// Unchanged item sequences keep every loose token in place. Otherwise kept
/// items bring the loose trivia that preceded them and new items rely on
/// their own. With `close_line` set, an empty body that gains items moves
/// its closing token to a line of its own, indented by that string.
pub fn rebuild_list(
    container: &SyntaxNode,
    open: Option<SyntaxKind>,
    close: Option<SyntaxKind>,
    is_item: &dyn Fn(SyntaxKind) -> bool,
    built: Vec<Built>,
    close_line: Option<&str>,
) -> GreenNode {
    let split = Split::of(container, open, close, is_item);
    let mut elements = split.head.clone();
    if split.in_place(&built) {
        for ((loose, _), item) in split.items.into_iter().zip(built) {
            elements.extend(loose);
            elements.push(node(item.green));
        }
        elements.extend(split.tail);
        return new_node(container.kind(), elements);
    }

    let was_empty = split.items.is_empty();
    let has_items = !built.is_empty();
    for item in built {
        let loose = item
            .anchor
            .as_ref()
            .and_then(|a| split.items.iter().find(|(_, raw)| raw == a))
            .map(|(loose, _)| loose.clone())
            .unwrap_or_default();
        elements.extend(loose);
        elements.push(node(item.green));
    }
    let mut tail = split.tail;
    if was_empty && has_items {
        break_before_close(&mut tail, close_line);
    }
    elements.extend(tail);
    new_node(container.kind(), elements)
}

/// Put the closing token of a list that just gained items on its own line,
/// or drop the inline spacing before it
fn break_before_close(tail: &mut Vec<GreenElement>, close_line: Option<&str>) {
    let trivia = tail.iter().take_while(|e| is_trivia(e)).count();
    if text_of(&tail[..trivia]).contains('\n') {
        return;
    }
    match close_line {
        Some(line) => {
            tail.splice(0..trivia, [ws(line)]);
        }
        None => {
            tail.splice(0..trivia, []);
        }
    }
}

/// Rebuild a comma-separated list: parameters, type parameters, base types,
/// attribute arguments, declarators, enum values.
///
/// The separator for new positions is the first original comma with the
/// trivia after it, or `fallback`. A trailing comma survives while the list
/// has items. `close_line` works as in [`rebuild_list`].
pub fn rebuild_separated(
    container: &SyntaxNode,
    open: Option<SyntaxKind>,
    close: Option<SyntaxKind>,
    is_item: &dyn Fn(SyntaxKind) -> bool,
    built: Vec<Built>,
    fallback: &[GreenElement],
    close_line: Option<&str>,
) -> GreenNode {
    let split = Split::of(container, open, close, is_item);
    let mut elements = split.head.clone();
    if split.in_place(&built) {
        for ((loose, _), item) in split.items.into_iter().zip(built) {
            elements.extend(loose);
            elements.push(node(item.green));
        }
        elements.extend(split.tail);
        return new_node(container.kind(), elements);
    }

    let separator = split
        .items
        .iter()
        .skip(1)
        .map(|(loose, _)| loose.clone())
        .find(|loose| loose.iter().any(|e| kind_of(e) == SyntaxKind::COMMA))
        .unwrap_or_else(|| fallback.to_vec());
    let lead = split
        .items
        .first()
        .map(|(loose, _)| loose.clone())
        .unwrap_or_default();

    let mut tail = split.tail;
    if built.is_empty() {
        tail.retain(|e| kind_of(e) != SyntaxKind::COMMA);
    } else if split.items.is_empty() {
        break_before_close(&mut tail, close_line);
    }

    for (i, item) in built.into_iter().enumerate() {
        if i == 0 {
            elements.extend(lead.clone());
        } else {
            elements.extend(separator.clone());
        }
        elements.push(node(item.green));
    }
    elements.extend(tail);
    new_node(container.kind(), elements)
}

/// The usual separator of parameter-like lists
pub fn comma_space() -> Vec<GreenElement> {
    vec![punct(SyntaxKind::COMMA), ws(" ")]
}

/// A new separated list node: `open item, item close`
pub fn separated_node(
    kind: SyntaxKind,
    open: Option<SyntaxKind>,
    items: Vec<GreenNode>,
    close: Option<SyntaxKind>,
) -> GreenNode {
    let mut elements = Vec::new();
    if let Some(open) = open {
        elements.push(punct(open));
    }
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            elements.push(punct(SyntaxKind::COMMA));
            elements.push(ws(" "));
        }
        elements.push(node(item));
    }
    if let Some(close) = close {
        elements.push(punct(close));
    }
    new_node(kind, elements)
}

/// A QUALIFIED_NAME node for a dotted name
pub fn qualified_name(name: &str) -> GreenNode {
    let mut elements = Vec::new();
    for (i, segment) in name.split('.').enumerate() {
        if i > 0 {
            elements.push(punct(SyntaxKind::DOT));
        }
        elements.push(token(SyntaxKind::IDENT, segment.trim()));
    }
    new_node(SyntaxKind::QUALIFIED_NAME, elements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn first(text: &str, kind: SyntaxKind) -> SyntaxNode {
        parse(text)
            .syntax()
            .descendants()
            .find(|n| n.kind() == kind)
            .unwrap()
    }

    #[test]
    fn test_template_roundtrip() {
        let raw = first("class C { int x; }", SyntaxKind::CLASS_DECL);
        let green = Template::from_raw(&raw).finish();
        assert_eq!(green.to_string(), raw.to_string());
    }

    #[test]
    fn test_retext_replaces_only_changed_tokens() {
        let raw = first("class C { }", SyntaxKind::CLASS_DECL);
        let mut template = Template::from_raw(&raw);
        let name = template.find(SyntaxKind::IDENT).unwrap();
        template.retext(name, "D");
        assert_eq!(template.finish().to_string(), "class D { }");
    }

    #[test]
    fn test_line_of() {
        let text = "namespace N\n{\n    class C { int x; }\n}";
        let class = first(text, SyntaxKind::CLASS_DECL);
        assert_eq!(line_of(&class), (true, "    ".to_string()));
        let field = first(text, SyntaxKind::FIELD_DECL);
        assert_eq!(line_of(&field), (false, "    ".to_string()));
    }

    #[test]
    fn test_line_of_steps_over_empty_nodes() {
        let text = "namespace N\n{\n    class C\n    {\n        void M() { }\n    }\n}";
        let method = first(text, SyntaxKind::METHOD_DECL);
        assert_eq!(line_of(&method), (true, "        ".to_string()));
        let top = first("class Top { }", SyntaxKind::CLASS_DECL);
        assert_eq!(line_of(&top), (true, String::new()));
    }

    #[test]
    fn test_rebuild_list_in_place_is_exact() {
        let text = "class C\n{\n    int a;\n    int b;\n}";
        let list = first(text, SyntaxKind::MEMBER_LIST);
        let built: Vec<Built> = list
            .children()
            .map(|n| Built {
                anchor: Some(n.clone()),
                green: green_of(&n),
            })
            .collect();
        let green = rebuild_list(
            &list,
            Some(SyntaxKind::L_BRACE),
            Some(SyntaxKind::R_BRACE),
            &|k| k.is_member_declaration(),
            built,
            Some("\n"),
        );
        assert_eq!(green.to_string(), list.to_string());
    }

    #[test]
    fn test_rebuild_list_drops_removed_items() {
        let text = "class C\n{\n    int a;\n    int b;\n}";
        let list = first(text, SyntaxKind::MEMBER_LIST);
        let last = list.children().last().unwrap();
        let built = vec![Built {
            anchor: Some(last.clone()),
            green: green_of(&last),
        }];
        let green = rebuild_list(
            &list,
            Some(SyntaxKind::L_BRACE),
            Some(SyntaxKind::R_BRACE),
            &|k| k.is_member_declaration(),
            built,
            Some("\n"),
        );
        assert_eq!(green.to_string(), "{\n    int b;\n}");
    }

    #[test]
    fn test_rebuild_separated_reuses_separator() {
        let text = "class C { void M(int a,  int b, int c) { } }";
        let list = first(text, SyntaxKind::PARAM_LIST);
        let params: Vec<_> = list.children().collect();
        let built = [&params[0], &params[2]]
            .into_iter()
            .map(|n| Built {
                anchor: Some(n.clone()),
                green: green_of(n),
            })
            .collect();
        let green = rebuild_separated(
            &list,
            Some(SyntaxKind::L_PAREN),
            Some(SyntaxKind::R_PAREN),
            &|k| k == SyntaxKind::PARAM,
            built,
            &comma_space(),
            None,
        );
        assert_eq!(green.to_string(), "(int a,  int c)");
    }

    #[test]
    fn test_qualified_name() {
        assert_eq!(qualified_name("A.B.C").to_string(), "A.B.C");
    }
}
