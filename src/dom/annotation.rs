//! Public annotations: metadata tags carried by nodes
//!
//! In source, an annotation is a line comment of the form
//! `//[[ name(key: value, ...) ]]` in a declaration's leading trivia. A lone
//! positional value is stored under the annotation's own name.

use crate::parser::{Lexer, SyntaxKind, annotation_body};
use indexmap::IndexMap;
use smol_str::SmolStr;
use std::fmt;

/// A value attached to an annotation key
#[derive(Debug, Clone, PartialEq)]
pub enum AnnotationValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    /// A bare or dotted name, e.g. `Visibility.Public`
    Identifier(SmolStr),
}

impl fmt::Display for AnnotationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\"")),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x:?}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Identifier(name) => write!(f, "{name}"),
        }
    }
}

/// A named annotation with ordered key/value pairs
#[derive(Debug, Clone, PartialEq)]
pub struct PublicAnnotation {
    pub name: SmolStr,
    pub values: IndexMap<SmolStr, AnnotationValue>,
}

impl PublicAnnotation {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            values: IndexMap::new(),
        }
    }

    pub fn with_value(mut self, key: impl Into<SmolStr>, value: AnnotationValue) -> Self {
        self.values.insert(key.into(), value);
        self
    }

    pub fn value(&self, key: &str) -> Option<&AnnotationValue> {
        self.values.get(key)
    }

    /// Parse a `//[[ ... ]]` comment; `None` if it is not a well-formed
    /// annotation
    pub fn from_comment(comment: &str) -> Option<Self> {
        Self::parse(annotation_body(comment)?)
    }

    /// Parse `name`, `name(value)` or `name(key: value, ...)`
    pub fn parse(body: &str) -> Option<Self> {
        let tokens: Vec<(SyntaxKind, &str)> = Lexer::new(body)
            .filter(|t| !t.kind.is_trivia())
            .map(|t| (t.kind, t.text))
            .collect();
        let mut cursor = TokenCursor { tokens: &tokens, pos: 0 };

        let name = cursor.dotted_name()?;
        let mut annotation = Self::new(name.clone());
        if cursor.eat(SyntaxKind::L_PAREN) {
            while !cursor.eat(SyntaxKind::R_PAREN) {
                let is_keyed = cursor.peek_kind(0) == Some(SyntaxKind::IDENT)
                    && matches!(
                        cursor.peek_kind(1),
                        Some(SyntaxKind::COLON | SyntaxKind::EQ)
                    );
                let key = if is_keyed {
                    let key = cursor.next()?.1;
                    cursor.next()?;
                    SmolStr::new(key)
                } else {
                    name.clone()
                };
                let value = cursor.value()?;
                annotation.values.insert(key, value);
                if !cursor.eat(SyntaxKind::COMMA) && cursor.peek_kind(0) != Some(SyntaxKind::R_PAREN) {
                    return None;
                }
            }
        }
        cursor.at_end().then_some(annotation)
    }

    /// Render as the comment text that declares it
    pub fn to_comment(&self) -> String {
        format!("//[[ {self} ]]")
    }
}

impl fmt::Display for PublicAnnotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if self.values.is_empty() {
            return Ok(());
        }
        write!(f, "(")?;
        for (i, (key, value)) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            if *key == self.name && self.values.len() == 1 {
                write!(f, "{value}")?;
            } else {
                write!(f, "{key}: {value}")?;
            }
        }
        write!(f, ")")
    }
}

struct TokenCursor<'t, 'a> {
    tokens: &'t [(SyntaxKind, &'a str)],
    pos: usize,
}

impl<'a> TokenCursor<'_, 'a> {
    fn peek_kind(&self, n: usize) -> Option<SyntaxKind> {
        self.tokens.get(self.pos + n).map(|t| t.0)
    }

    fn next(&mut self) -> Option<(SyntaxKind, &'a str)> {
        let token = *self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(token)
    }

    fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.peek_kind(0) == Some(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn at_end(&self) -> bool {
        self.pos == self.tokens.len()
    }

    fn dotted_name(&mut self) -> Option<SmolStr> {
        let (kind, first) = self.next()?;
        if kind != SyntaxKind::IDENT {
            return None;
        }
        let mut name = first.to_string();
        while self.peek_kind(0) == Some(SyntaxKind::DOT) && self.peek_kind(1) == Some(SyntaxKind::IDENT) {
            self.pos += 1;
            name.push('.');
            name.push_str(self.next()?.1);
        }
        Some(SmolStr::new(name))
    }

    fn value(&mut self) -> Option<AnnotationValue> {
        let negative = self.eat(SyntaxKind::MINUS);
        let value = match self.peek_kind(0)? {
            SyntaxKind::STRING => {
                let text = self.next()?.1;
                AnnotationValue::String(unescape(&text[1..text.len() - 1]))
            }
            SyntaxKind::VERBATIM_STRING => {
                let text = self.next()?.1;
                AnnotationValue::String(text[2..text.len() - 1].replace("\"\"", "\""))
            }
            SyntaxKind::INT_NUMBER => {
                let text = self.next()?.1;
                let value: i64 = text
                    .trim_end_matches(['u', 'U', 'l', 'L'])
                    .replace('_', "")
                    .parse()
                    .ok()?;
                AnnotationValue::Integer(if negative { -value } else { value })
            }
            SyntaxKind::REAL_NUMBER => {
                let text = self.next()?.1;
                let value: f64 = text
                    .trim_end_matches(['f', 'F', 'd', 'D', 'm', 'M'])
                    .replace('_', "")
                    .parse()
                    .ok()?;
                AnnotationValue::Float(if negative { -value } else { value })
            }
            SyntaxKind::TRUE_KW => {
                self.pos += 1;
                AnnotationValue::Bool(true)
            }
            SyntaxKind::FALSE_KW => {
                self.pos += 1;
                AnnotationValue::Bool(false)
            }
            SyntaxKind::IDENT => AnnotationValue::Identifier(self.dotted_name()?),
            _ => return None,
        };
        if negative && !matches!(value, AnnotationValue::Integer(_) | AnnotationValue::Float(_)) {
            return None;
        }
        Some(value)
    }
}

fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_keyed_values() {
        let annotation =
            PublicAnnotation::from_comment("//[[ Kad_Generated(file: \"a.cs\", line: 12, strict: true) ]]")
                .unwrap();
        assert_eq!(annotation.name, "Kad_Generated");
        assert_eq!(annotation.value("file"), Some(&AnnotationValue::String("a.cs".into())));
        assert_eq!(annotation.value("line"), Some(&AnnotationValue::Integer(12)));
        assert_eq!(annotation.value("strict"), Some(&AnnotationValue::Bool(true)));
        let keys: Vec<_> = annotation.values.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, ["file", "line", "strict"]);
    }

    #[test]
    fn test_positional_value_is_keyed_by_name() {
        let annotation = PublicAnnotation::from_comment("//[[ Category(Visibility.Public) ]]").unwrap();
        assert_eq!(
            annotation.value("Category"),
            Some(&AnnotationValue::Identifier("Visibility.Public".into()))
        );
    }

    #[rstest]
    #[case("//[[ Marker ]]")]
    #[case("//[[ Weight(w: -2.5) ]]")]
    #[case("//[[ Note(text: \"say \\\"hi\\\"\") ]]")]
    fn test_comment_rendering_reparses(#[case] comment: &str) {
        let annotation = PublicAnnotation::from_comment(comment).unwrap();
        let rendered = annotation.to_comment();
        assert_eq!(PublicAnnotation::from_comment(&rendered), Some(annotation));
    }

    #[rstest]
    #[case("// just a comment")]
    #[case("//[[ ]]")]
    #[case("//[[ Broken(key: ) ]]")]
    #[case("//[[ Two Names ]]")]
    fn test_rejects_malformed(#[case] comment: &str) {
        assert!(PublicAnnotation::from_comment(comment).is_none());
    }
}
