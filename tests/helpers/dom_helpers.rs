//! Test helpers for loading documents and finding nodes in them.

use csdom::{Dom, DomHost, NodeId, NodeKind};

/// Load a source string, asserting it parses cleanly.
pub fn load_clean(source: &str) -> Dom {
    let dom = DomHost::new().load(source).expect("source should load");
    assert!(
        !dom.report().has_syntax_errors(),
        "Syntax errors: {:?}",
        dom.report().diagnostics
    );
    dom
}

/// Build a whole document back to text.
pub fn build_text(dom: &Dom) -> String {
    DomHost::new().build_text(dom).expect("document should build")
}

/// First node of `kind` anywhere in the document, in pre-order.
pub fn find_kind(dom: &Dom, kind: NodeKind) -> NodeId {
    dom.descendants(dom.root())
        .into_iter()
        .find(|id| dom.kind(*id) == Some(kind))
        .unwrap_or_else(|| panic!("no {kind:?} node"))
}

/// First node with the given name anywhere in the document.
pub fn find_named(dom: &Dom, name: &str) -> NodeId {
    dom.descendants(dom.root())
        .into_iter()
        .find(|id| dom.name(*id) == Some(name))
        .unwrap_or_else(|| panic!("no node named {name}"))
}
