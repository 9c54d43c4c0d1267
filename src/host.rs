//! # Load/build facade
//!
//! [`DomHost`] owns a factory registry, a symbol resolver and the options,
//! and turns source text into a [`Dom`] and back:
//!
//! ```text
//! text ── parse ── resolve ── Corporation::create_root ──▶ Dom
//! Dom  ── Corporation::build ── green tree ── to_string ──▶ text
//! ```
//!
//! Building a document nobody edited reproduces the loaded text exactly.

use std::fs;
use std::path::Path;

use crate::dom::{Dom, NodeData, NodeId};
use crate::error::{DomError, Result};
use crate::factory::{BuildContext, Corporation, ParseContext};
use crate::options::DomOptions;
use crate::parser::{SyntaxNode, parse};
use crate::semantic::{SymbolResolver, SyntacticResolver};
use tracing::{debug, info, warn};

/// Entry point for loading and building documents
pub struct DomHost {
    corporation: Corporation,
    resolver: Box<dyn SymbolResolver>,
    options: DomOptions,
}

impl Default for DomHost {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for DomHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DomHost")
            .field("corporation", &self.corporation)
            .field("options", &self.options)
            .finish()
    }
}

impl DomHost {
    /// A host with every factory registered, the syntactic resolver and
    /// default options
    pub fn new() -> Self {
        Self::with_options(DomOptions::default())
    }

    pub fn with_options(options: DomOptions) -> Self {
        Self {
            corporation: Corporation::with_defaults(),
            resolver: Box::new(SyntacticResolver::new()),
            options,
        }
    }

    pub fn with_resolver(mut self, resolver: impl SymbolResolver + 'static) -> Self {
        self.resolver = Box::new(resolver);
        self
    }

    pub fn with_corporation(mut self, corporation: Corporation) -> Self {
        self.corporation = corporation;
        self
    }

    pub fn options(&self) -> &DomOptions {
        &self.options
    }

    pub fn corporation(&self) -> &Corporation {
        &self.corporation
    }

    /// Parse source text into a document.
    ///
    /// Syntax errors are recorded in the document's load report, or fail the
    /// load when `fail_on_syntax_errors` is set.
    pub fn load(&self, text: &str) -> Result<Dom> {
        let parsed = parse(text);
        if !parsed.errors.is_empty() {
            if self.options.fail_on_syntax_errors {
                let first = &parsed.errors[0];
                return Err(DomError::syntax(format!(
                    "{} at {:?}",
                    first.message, first.range
                )));
            }
            warn!("loading source with {} syntax errors", parsed.errors.len());
        }

        let mut dom = Dom::new();
        dom.set_newline(self.options.newline_for(text));
        dom.report_mut().diagnostics = parsed.errors.clone();

        let raw = parsed.syntax();
        let mut ctx = ParseContext::new(
            &mut dom,
            &self.corporation,
            self.resolver.as_ref(),
            &self.options,
        );
        self.corporation.create_root(&raw, &mut ctx)?;
        dom.mark_clean();

        debug!(
            "loaded {} nodes, {} unsupported constructs",
            dom.node_count(),
            dom.report().unsupported.len()
        );
        Ok(dom)
    }

    /// Load a source file; the root remembers where it came from
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<Dom> {
        let path = path.as_ref();
        info!("loading {}", path.display());
        let text = fs::read_to_string(path)?;
        let mut dom = self.load(&text)?;
        let root = dom.root();
        dom.update(root, |data| {
            if let NodeData::Root(root) = data {
                root.file_path = Some(path.to_path_buf());
            }
        })?;
        dom.mark_clean();
        Ok(dom)
    }

    /// Build the source text of a node and everything below it
    pub fn build(&self, dom: &Dom, id: NodeId) -> Result<String> {
        let ctx = BuildContext::new(dom, &self.corporation, &self.options);
        let green = if ctx.group_raw(id).is_some() {
            ctx.build_variables(&[id])?
        } else {
            ctx.build(id)?
        };
        Ok(SyntaxNode::new_root(green).to_string())
    }

    /// Build the whole document
    pub fn build_text(&self, dom: &Dom) -> Result<String> {
        self.build(dom, dom.root())
    }

    /// Build a node (usually the root) and write its text to `path`
    pub fn save(&self, dom: &Dom, id: NodeId, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let text = self.build(dom, id)?;
        fs::write(path, text)?;
        info!("saved {}", path.display());
        Ok(())
    }
}

/// Load `text` with a default host
pub fn load(text: &str) -> Result<Dom> {
    DomHost::new().load(text)
}

/// Build a document with a default host
pub fn build(dom: &Dom) -> Result<String> {
    DomHost::new().build_text(dom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::NodeKind;

    #[test]
    fn test_round_trip_keeps_text() {
        let text = "namespace N\n{\n    class C { int a, b; }\n}\n";
        let dom = load(text).unwrap();
        assert_eq!(build(&dom).unwrap(), text);
    }

    #[test]
    fn test_strict_mode_rejects_syntax_errors() {
        let host = DomHost::with_options(DomOptions::default().with_fail_on_syntax_errors(true));
        assert!(matches!(host.load("class C {"), Err(DomError::Syntax(_))));
    }

    #[test]
    fn test_lenient_mode_reports_syntax_errors() {
        let dom = load("class C {").unwrap();
        assert!(dom.report().has_syntax_errors());
    }

    #[test]
    fn test_single_field_builds_alone() {
        let dom = load("class C\n{\n    int a, b;\n}\n").unwrap();
        let class = dom.root_classes()[0];
        let fields = dom.fields(class);
        assert_eq!(dom.kind(fields[0]), Some(NodeKind::Field));
        let host = DomHost::new();
        assert_eq!(host.build(&dom, fields[0]).unwrap().trim(), "int a;");
    }
}
