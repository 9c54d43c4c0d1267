//! Leading trivia of declaration-level nodes: documentation comments,
//! annotation comments, and indentation.

use super::*;

/// Trivia tokens at the start of a node, before its first significant token
pub fn leading_trivia(node: &SyntaxNode) -> Vec<SyntaxToken> {
    node.children_with_tokens()
        .map_while(|e| e.into_token().filter(|t| t.kind().is_trivia()))
        .collect()
}

/// Documentation text from `///` lines in the leading trivia.
///
/// Each line loses its `///` marker and one following space; lines are
/// joined with `\n`.
pub fn documentation(node: &SyntaxNode) -> Option<String> {
    let lines: Vec<String> = leading_trivia(node)
        .iter()
        .filter(|t| t.kind() == SyntaxKind::DOC_COMMENT)
        .map(|t| doc_line(t.text()))
        .collect();
    (!lines.is_empty()).then(|| lines.join("\n"))
}

fn doc_line(text: &str) -> String {
    let body = text.trim_end_matches('\r');
    let body = body.strip_prefix("///").unwrap_or(body);
    body.strip_prefix(' ').unwrap_or(body).to_string()
}

/// Whether a line comment has the `//[[ ... ]]` annotation shape
pub fn is_annotation_comment(text: &str) -> bool {
    annotation_body(text).is_some()
}

/// Content between `//[[` and `]]`, trimmed
pub fn annotation_body(text: &str) -> Option<&str> {
    let text = text.trim_end_matches('\r').trim_end();
    let inner = text.strip_prefix("//")?.trim_start();
    let inner = inner.strip_prefix("[[")?.strip_suffix("]]")?;
    Some(inner.trim())
}

/// Annotation comments in the leading trivia, in order
pub fn annotation_comments(node: &SyntaxNode) -> Vec<SyntaxToken> {
    leading_trivia(node)
        .into_iter()
        .filter(|t| t.kind() == SyntaxKind::LINE_COMMENT && is_annotation_comment(t.text()))
        .collect()
}

/// Indentation of the line the node starts on: the whitespace after the
/// last line break of its leading trivia.
///
/// Returns `None` when the leading trivia holds no line break, i.e. the
/// node shares its line with whatever precedes it.
pub fn indentation(node: &SyntaxNode) -> Option<String> {
    let trivia: String = leading_trivia(node).iter().map(|t| t.text()).collect();
    let idx = trivia.rfind('\n')?;
    Some(
        trivia[idx + 1..]
            .chars()
            .take_while(|c| *c == ' ' || *c == '\t')
            .collect(),
    )
}
