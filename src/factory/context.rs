//! State handed to factories while loading and building

use super::Corporation;
use super::green::{Built, GreenElement, green_of, line_of, ws};
use crate::dom::{
    DeclData, Dom, Modifiers, NodeData, NodeId, NodeKind, PublicAnnotation, Slot,
};
use crate::error::{DomError, Result};
use crate::options::DomOptions;
use crate::parser::{
    AstNode, GreenNode, ModifierList, SyntaxKind, SyntaxNode, annotation_comments, documentation,
};
use crate::semantic::{Symbol, SymbolResolver};
use tracing::{error, trace};

// ============================================================================
// Parse direction
// ============================================================================

/// Mutable load state: the document being filled and the services the
/// factories consult
pub struct ParseContext<'a> {
    pub dom: &'a mut Dom,
    corporation: &'a Corporation,
    resolver: &'a dyn SymbolResolver,
    options: &'a DomOptions,
}

impl<'a> ParseContext<'a> {
    pub fn new(
        dom: &'a mut Dom,
        corporation: &'a Corporation,
        resolver: &'a dyn SymbolResolver,
        options: &'a DomOptions,
    ) -> Self {
        Self {
            dom,
            corporation,
            resolver,
            options,
        }
    }

    pub fn options(&self) -> &DomOptions {
        self.options
    }

    pub fn resolve(&self, raw: &SyntaxNode) -> Option<Symbol> {
        self.resolver.resolve(raw)
    }

    /// Create a node for `raw` and attach its handles.
    ///
    /// Annotations come from the leading trivia of `trivia`, which defaults
    /// to `raw`; declarators read them from their enclosing declaration.
    pub fn node(
        &mut self,
        data: NodeData,
        raw: &SyntaxNode,
        symbol: Option<Symbol>,
        trivia: Option<&SyntaxNode>,
    ) -> Result<NodeId> {
        let owner = trivia.unwrap_or(raw);
        let annotations = if self.options.parse_public_annotations {
            annotation_comments(owner)
                .iter()
                .filter_map(|t| PublicAnnotation::from_comment(t.text()))
                .collect()
        } else {
            Vec::new()
        };
        let kind = data.kind();
        let id = self.dom.create(data);
        self.dom.initialize(id, Some(raw.clone()), symbol, annotations)?;
        trace!("created {:?} from {:?}", kind, raw.kind());
        Ok(id)
    }

    /// Declaration state of a raw declaration: the resolved name and
    /// accessibility, the modifier keywords and the `///` documentation of
    /// `owner`
    pub fn decl(&self, symbol: Option<&Symbol>, fallback_name: Option<String>, owner: &SyntaxNode) -> DeclData {
        let name = symbol
            .map(|s| s.name.clone())
            .or_else(|| fallback_name.map(Into::into))
            .unwrap_or_default();
        let kinds = owner
            .children()
            .find_map(ModifierList::cast)
            .map(|m| m.kinds())
            .unwrap_or_default();
        DeclData {
            name,
            access: symbol.map(|s| s.accessibility).unwrap_or_default(),
            modifiers: Modifiers::from_kinds(&kinds),
            documentation: documentation(owner),
        }
    }

    /// Create the node(s) for a raw child and append them to `slot`
    pub fn create_into(&mut self, owner: NodeId, slot: Slot, raw: &SyntaxNode) -> Result<()> {
        let corporation = self.corporation;
        for id in corporation.create(slot, raw, self)? {
            self.dom.add_or_move(owner, slot, id)?;
        }
        Ok(())
    }

    /// Create an attribute node for every attribute of every list of a
    /// raw declaration
    pub fn create_attributes(&mut self, owner: NodeId, decl: &SyntaxNode) -> Result<()> {
        let attributes: Vec<_> = decl
            .children()
            .filter(|n| n.kind() == SyntaxKind::ATTRIBUTE_LIST)
            .flat_map(|list| list.children().filter(|n| n.kind() == SyntaxKind::ATTRIBUTE))
            .collect();
        for attribute in attributes {
            self.create_into(owner, Slot::Attributes, &attribute)?;
        }
        Ok(())
    }

    /// Create the single child of a slot, if the raw part is present
    pub fn create_optional(&mut self, owner: NodeId, slot: Slot, raw: Option<SyntaxNode>) -> Result<()> {
        match raw {
            Some(raw) => self.create_into(owner, slot, &raw),
            None => Ok(()),
        }
    }
}

// ============================================================================
// Build direction
// ============================================================================

/// Read-only build state
pub struct BuildContext<'a> {
    pub dom: &'a Dom,
    corporation: &'a Corporation,
    options: &'a DomOptions,
}

impl<'a> BuildContext<'a> {
    pub fn new(dom: &'a Dom, corporation: &'a Corporation, options: &'a DomOptions) -> Self {
        Self {
            dom,
            corporation,
            options,
        }
    }

    pub fn options(&self) -> &DomOptions {
        self.options
    }

    pub fn newline(&self) -> &str {
        self.dom.newline()
    }

    /// Build a node, reusing its raw syntax when nothing below it changed
    pub fn build(&self, id: NodeId) -> Result<GreenNode> {
        let node = self.dom.node(id)?;
        if let Some(raw) = node.raw() {
            if self.reusable(id, raw) && self.dom.is_pristine(id) {
                trace!("reusing raw {:?} for {:?}", raw.kind(), node.kind());
                return Ok(green_of(raw));
            }
        }
        self.corporation.build(id, self)
    }

    /// Whether the raw node stands for exactly this DOM node where it is now
    fn reusable(&self, id: NodeId, raw: &SyntaxNode) -> bool {
        if raw.kind() == SyntaxKind::VARIABLE_DECLARATOR {
            return false;
        }
        if self.dom.kind(id) != Some(NodeKind::Declaration) {
            return true;
        }
        match self.dom.parent(id).and_then(|p| self.dom.kind(p)) {
            Some(NodeKind::For) => raw.kind() == SyntaxKind::VARIABLE_DECLARATION,
            Some(NodeKind::ForEach) => raw.kind() == SyntaxKind::FOREACH_VARIABLE,
            _ => false,
        }
    }

    /// Build the children of a list slot, one unit per raw declaration.
    ///
    /// Consecutive fields, events or locals that came from the same
    /// declaration and still agree on everything but their names and
    /// initializers build back into one declaration.
    pub fn build_all(&self, owner: NodeId, slot: Slot) -> Result<Vec<Built>> {
        let children = self.dom.children(owner, slot);
        let mut built = Vec::with_capacity(children.len());
        let mut i = 0;
        while i < children.len() {
            let id = children[i];
            let mut end = i + 1;
            let Some(group) = self.group_raw(id) else {
                built.push(Built {
                    anchor: self.anchor(id),
                    green: self.build(id)?,
                });
                i = end;
                continue;
            };
            while end < children.len()
                && self.group_raw(children[end]).as_ref() == Some(&group)
                && self.same_head(id, children[end])
            {
                end += 1;
            }
            let ids = &children[i..end];
            built.push(Built {
                anchor: self.claims_group(id).then_some(group),
                green: self.build_variables(ids)?,
            });
            i = end;
        }
        Ok(built)
    }

    /// Build one declaration for a run of declarator nodes
    pub fn build_variables(&self, ids: &[NodeId]) -> Result<GreenNode> {
        let Some(first) = ids.first() else {
            return Err(DomError::syntax("empty declarator group"));
        };
        if let Some(group) = self.group_raw(*first) {
            let declarators: Vec<SyntaxNode> = group
                .descendants()
                .filter(|n| n.kind() == SyntaxKind::VARIABLE_DECLARATOR)
                .collect();
            let same_declarators = declarators.len() == ids.len()
                && ids
                    .iter()
                    .zip(&declarators)
                    .all(|(id, d)| self.dom.get(*id).and_then(|n| n.raw()) == Some(d));
            if same_declarators
                && self.claims_group(*first)
                && ids.iter().all(|id| self.dom.is_pristine(*id))
            {
                return Ok(green_of(&group));
            }
        }
        self.corporation.build_group(ids, self)
    }

    /// The raw declaration a declarator node shares with its siblings:
    /// FIELD_DECL, EVENT_DECL or LOCAL_DECL_STMT
    pub fn group_raw(&self, id: NodeId) -> Option<SyntaxNode> {
        let node = self.dom.get(id)?;
        if !matches!(
            node.kind(),
            NodeKind::Field | NodeKind::Event | NodeKind::Declaration
        ) {
            return None;
        }
        let raw = node.raw()?;
        if raw.kind() != SyntaxKind::VARIABLE_DECLARATOR {
            return None;
        }
        let group = raw.parent()?.parent()?;
        matches!(
            group.kind(),
            SyntaxKind::FIELD_DECL | SyntaxKind::EVENT_DECL | SyntaxKind::LOCAL_DECL_STMT
        )
        .then_some(group)
    }

    /// Whether `id` leads the first unit built from its raw declaration;
    /// later units split off the same declaration are generated afresh
    pub fn claims_group(&self, id: NodeId) -> bool {
        let Some(group) = self.group_raw(id) else {
            return false;
        };
        let Some((parent, slot)) = self.dom.get(id).and_then(|n| Some((n.parent()?, n.parent_slot()?)))
        else {
            return true;
        };
        !self
            .dom
            .children(parent, slot)
            .iter()
            .take_while(|c| **c != id)
            .any(|c| self.group_raw(*c).as_ref() == Some(&group))
    }

    /// Whether two declarator nodes can share one declaration
    fn same_head(&self, a: NodeId, b: NodeId) -> bool {
        let (Some(x), Some(y)) = (self.dom.get(a), self.dom.get(b)) else {
            return false;
        };
        let data_agrees = match (x.data(), y.data()) {
            (NodeData::Field(p), NodeData::Field(q)) | (NodeData::Event(p), NodeData::Event(q)) => {
                p.access == q.access
                    && p.modifiers == q.modifiers
                    && p.documentation == q.documentation
            }
            (NodeData::Declaration(p), NodeData::Declaration(q)) => p.is_const == q.is_const,
            _ => false,
        };
        let type_text = |id: NodeId| match self.dom.child(id, Slot::Type).and_then(|t| self.dom.data(t)) {
            Some(NodeData::ReferencedType(t)) => Some(t.text.clone()),
            _ => None,
        };
        let attributes = |id: NodeId| {
            self.dom
                .children(id, Slot::Attributes)
                .iter()
                .map(|attr| {
                    let values: Vec<_> = self
                        .dom
                        .children(*attr, Slot::AttributeValues)
                        .iter()
                        .filter_map(|v| self.dom.data(*v).cloned())
                        .collect();
                    (self.dom.data(*attr).cloned(), values)
                })
                .collect::<Vec<_>>()
        };
        data_agrees
            && x.annotations() == y.annotations()
            && type_text(a) == type_text(b)
            && attributes(a) == attributes(b)
    }

    /// The raw node a DOM node occupies in its container
    pub fn anchor(&self, id: NodeId) -> Option<SyntaxNode> {
        if let Some(group) = self.group_raw(id) {
            return Some(group);
        }
        self.dom.get(id)?.raw().cloned()
    }

    // ------------------------------------------------------------------------
    // Layout
    // ------------------------------------------------------------------------

    /// Indentation of the line a node starts on, inferred for new nodes
    pub fn indent(&self, id: NodeId) -> String {
        if let Some(anchor) = self.anchor(id) {
            return line_of(&anchor).1;
        }
        let Some(node) = self.dom.get(id) else {
            return String::new();
        };
        if let (Some(parent), Some(slot)) = (node.parent(), node.parent_slot()) {
            let sibling = self
                .dom
                .children(parent, slot)
                .iter()
                .filter(|s| **s != id)
                .filter_map(|s| self.anchor(*s))
                .map(|a| line_of(&a))
                .find(|(starts_line, _)| *starts_line);
            if let Some((_, indent)) = sibling {
                return indent;
            }
        }
        self.nested_indent(id)
    }

    /// Indentation one level below the parent's, or level with it for
    /// clauses and the members of a file-scoped namespace
    fn nested_indent(&self, id: NodeId) -> String {
        let Some(parent) = self.dom.parent(id) else {
            return String::new();
        };
        let level = self.indent(parent);
        let same_level = matches!(
            self.dom.kind(id),
            Some(NodeKind::Else | NodeKind::Catch | NodeKind::Finally)
        ) || matches!(
            self.dom.data(parent),
            Some(NodeData::Namespace(ns)) if ns.file_scoped
        );
        match self.dom.kind(parent) {
            Some(NodeKind::Root) => String::new(),
            _ if same_level => level,
            _ => level + &self.options.indent_unit(),
        }
    }

    /// Trivia in front of a node that has none of its own yet: a line break
    /// when its neighbours sit on lines of their own, a space otherwise
    pub fn fresh_leading(&self, id: NodeId) -> String {
        let line = format!("{}{}", self.newline(), self.indent(id));
        let Some(node) = self.dom.get(id) else {
            return String::new();
        };
        let (Some(parent), Some(slot)) = (node.parent(), node.parent_slot()) else {
            return String::new();
        };
        let siblings = self.dom.children(parent, slot);
        let pos = siblings.iter().position(|s| *s == id).unwrap_or(0);
        if self.dom.kind(parent) == Some(NodeKind::Root) && pos == 0 {
            return String::new();
        }
        let neighbour = siblings[..pos]
            .iter()
            .rev()
            .chain(siblings[pos + 1..].iter())
            .find_map(|s| self.anchor(*s));
        match neighbour {
            Some(anchor) if line_of(&anchor).0 => line,
            Some(_) => " ".to_string(),
            None if slot == Slot::Accessors => " ".to_string(),
            None => line,
        }
    }

    /// `{ }` on lines of their own, for new type and member skeletons
    pub fn block_text(&self, id: NodeId) -> String {
        let nl = self.newline();
        let indent = self.indent(id);
        format!("{nl}{indent}{{{nl}{indent}}}")
    }

    /// Whitespace that puts the next token on a new line at the node's
    /// indentation
    pub fn line_break(&self, id: NodeId) -> GreenElement {
        ws(&format!("{}{}", self.newline(), self.indent(id)))
    }

    /// The raw node to patch when it is one of `kinds`, else a parsed
    /// skeleton; the flag is set for skeletons
    pub fn base(
        &self,
        id: NodeId,
        kinds: &[SyntaxKind],
        skeleton: impl FnOnce() -> Result<GreenNode>,
    ) -> Result<(SyntaxNode, bool)> {
        match self.dom.get(id).and_then(|n| n.raw()) {
            Some(raw) if kinds.contains(&raw.kind()) => Ok((raw.clone(), false)),
            _ => Ok((SyntaxNode::new_root(skeleton()?), true)),
        }
    }

    /// The node's name, which every named declaration needs to build
    pub fn required_name(&self, id: NodeId) -> Result<String> {
        match self.dom.name(id) {
            Some(name) if !name.is_empty() => Ok(name.to_string()),
            _ => Err(self.incomplete(id, "name")),
        }
    }

    /// Report a node whose required child is missing
    pub fn incomplete(&self, id: NodeId, missing: &'static str) -> DomError {
        let kind = self.dom.kind(id).unwrap_or(NodeKind::Opaque);
        let err = DomError::incomplete(kind, missing, self.dom.path(id));
        error!("{err}");
        err
    }
}
