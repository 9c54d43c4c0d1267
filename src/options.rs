//! Options controlling how sources are loaded and how syntax is generated

/// What to do with a raw construct that no factory accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnsupportedPolicy {
    /// Keep the construct as an opaque node that rebuilds verbatim, and
    /// record it in the load report
    #[default]
    Passthrough,
    /// Fail the load with an unsupported-construct error
    Fail,
}

/// Load and build options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomOptions {
    pub unsupported: UnsupportedPolicy,
    /// Refuse to load sources with syntax errors
    pub fail_on_syntax_errors: bool,
    /// Number of spaces per indentation level (or tab width if using tabs)
    pub indent_size: usize,
    /// Use spaces for indentation (false = use tabs)
    pub insert_spaces: bool,
    /// Line break for generated syntax; `None` detects it from the source
    pub newline: Option<String>,
    /// Read `//[[ name(key: value) ]]` comments into public annotations
    pub parse_public_annotations: bool,
}

impl Default for DomOptions {
    fn default() -> Self {
        Self {
            unsupported: UnsupportedPolicy::Passthrough,
            fail_on_syntax_errors: false,
            indent_size: 4,
            insert_spaces: true,
            newline: None,
            parse_public_annotations: true,
        }
    }
}

impl DomOptions {
    pub fn with_unsupported(mut self, policy: UnsupportedPolicy) -> Self {
        self.unsupported = policy;
        self
    }

    pub fn with_fail_on_syntax_errors(mut self, fail: bool) -> Self {
        self.fail_on_syntax_errors = fail;
        self
    }

    pub fn with_indent(mut self, size: usize, insert_spaces: bool) -> Self {
        self.indent_size = size;
        self.insert_spaces = insert_spaces;
        self
    }

    pub fn with_newline(mut self, newline: impl Into<String>) -> Self {
        self.newline = Some(newline.into());
        self
    }

    pub fn with_public_annotations(mut self, parse: bool) -> Self {
        self.parse_public_annotations = parse;
        self
    }

    /// One indentation unit
    pub fn indent_unit(&self) -> String {
        if self.insert_spaces {
            " ".repeat(self.indent_size)
        } else {
            "\t".to_string()
        }
    }

    /// Line break to use for generated syntax in `source`
    pub fn newline_for(&self, source: &str) -> String {
        match &self.newline {
            Some(newline) => newline.clone(),
            None if source.contains("\r\n") => "\r\n".to_string(),
            None => "\n".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indent_unit() {
        assert_eq!(DomOptions::default().indent_unit(), "    ");
        assert_eq!(DomOptions::default().with_indent(4, false).indent_unit(), "\t");
    }

    #[test]
    fn test_newline_detection() {
        let options = DomOptions::default();
        assert_eq!(options.newline_for("a\r\nb"), "\r\n");
        assert_eq!(options.newline_for("a\nb"), "\n");
        assert_eq!(options.with_newline("\r\n").newline_for("a\nb"), "\r\n");
    }
}
