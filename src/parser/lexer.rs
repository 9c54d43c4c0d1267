//! Logos-based lexer for the C# subset
//!
//! Fast tokenization using the logos crate. Every byte of the input ends up
//! in exactly one token, so the token stream always concatenates back to
//! the source text.

use super::syntax_kind::SyntaxKind;
use logos::Logos;
use rowan::TextSize;

/// A token with its kind, text, and position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
    pub offset: TextSize,
}

/// Lexer wrapping the logos-generated tokenizer
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, LogosToken>,
    offset: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: LogosToken::lexer(input),
            offset: 0,
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let logos_token = self.inner.next()?;
        let text = self.inner.slice();
        let offset = TextSize::new(self.offset);
        self.offset += text.len() as u32;

        let kind = match logos_token {
            Ok(t) => t.into(),
            Err(()) => SyntaxKind::ERROR,
        };

        Some(Token { kind, text, offset })
    }
}

/// Tokenize an entire string into a Vec
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input).collect()
}

/// Consume up to and including the closing `*/`; an unterminated comment
/// swallows the rest of the input as an error token
fn block_comment(lex: &mut logos::Lexer<'_, LogosToken>) -> bool {
    match lex.remainder().find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            true
        }
        None => {
            lex.bump(lex.remainder().len());
            false
        }
    }
}

/// Identifiers follow UAX #31, so the ASCII fast path is extended with any
/// trailing `XID_Continue` characters
fn identifier(lex: &mut logos::Lexer<'_, LogosToken>) -> bool {
    let Some(first) = lex.slice().trim_start_matches('@').chars().next() else {
        return false;
    };
    if first != '_' && !unicode_ident::is_xid_start(first) {
        return false;
    }
    let tail: usize = lex
        .remainder()
        .chars()
        .take_while(|&c| unicode_ident::is_xid_continue(c))
        .map(char::len_utf8)
        .sum();
    lex.bump(tail);
    true
}

/// Logos token enum - maps to SyntaxKind
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
pub enum LogosToken {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    #[regex(r"[ \t\r\n\f]+")]
    Whitespace,

    #[regex(r"//[^\n]*")]
    LineComment,

    #[regex(r"///[^\n]*")]
    DocComment,

    #[token("/*", block_comment)]
    BlockComment,

    // =========================================================================
    // LITERALS
    // =========================================================================
    #[regex(r"@?[a-zA-Z_][a-zA-Z0-9_]*", identifier)]
    #[regex(r"@?[^\x00-\x7F]", identifier)]
    Ident,

    #[regex(r"[0-9][0-9_]*[uUlL]*")]
    #[regex(r"0[xX][0-9a-fA-F_]+[uUlL]*")]
    IntNumber,

    #[regex(r"[0-9][0-9_]*\.[0-9][0-9_]*([eE][+-]?[0-9]+)?[fFdDmM]?")]
    #[regex(r"\.[0-9][0-9_]*([eE][+-]?[0-9]+)?[fFdDmM]?")]
    #[regex(r"[0-9][0-9_]*[eE][+-]?[0-9]+[fFdDmM]?")]
    #[regex(r"[0-9][0-9_]*[fFdDmM]")]
    RealNumber,

    #[regex(r#""([^"\\\n]|\\.)*""#)]
    String,

    #[regex(r#"@"([^"]|"")*""#)]
    VerbatimString,

    #[regex(r#"\$"([^"\\\n]|\\.)*""#)]
    #[regex(r#"\$@"([^"]|"")*""#)]
    #[regex(r#"@\$"([^"]|"")*""#)]
    InterpolatedString,

    #[regex(r"'([^'\\\n]|\\.)+'")]
    Char,

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,
    #[token("::")]
    ColonColon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token("?")]
    Question,
    #[token("?.")]
    QuestionDot,
    #[token("??")]
    QuestionQuestion,
    #[token("??=")]
    QuestionQuestionEq,
    #[token("=")]
    Eq,
    #[token("==")]
    EqEq,
    #[token("!")]
    Bang,
    #[token("!=")]
    BangEq,
    #[token("<")]
    Lt,
    // `>>` and `>>=` are assembled by the parser so that nested generic
    // argument lists close correctly.
    #[token(">")]
    Gt,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("<<")]
    LtLt,
    #[token("<<=")]
    LtLtEq,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("~")]
    Tilde,
    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,
    #[token("++")]
    PlusPlus,
    #[token("--")]
    MinusMinus,
    #[token("+=")]
    PlusEq,
    #[token("-=")]
    MinusEq,
    #[token("*=")]
    StarEq,
    #[token("/=")]
    SlashEq,
    #[token("%=")]
    PercentEq,
    #[token("&=")]
    AmpEq,
    #[token("|=")]
    PipeEq,
    #[token("^=")]
    CaretEq,
    #[token("=>")]
    FatArrow,

    // =========================================================================
    // KEYWORDS
    // =========================================================================
    #[token("using")]
    UsingKw,
    #[token("namespace")]
    NamespaceKw,
    #[token("class")]
    ClassKw,
    #[token("struct")]
    StructKw,
    #[token("interface")]
    InterfaceKw,
    #[token("enum")]
    EnumKw,
    #[token("delegate")]
    DelegateKw,
    #[token("event")]
    EventKw,
    #[token("public")]
    PublicKw,
    #[token("private")]
    PrivateKw,
    #[token("protected")]
    ProtectedKw,
    #[token("internal")]
    InternalKw,
    #[token("static")]
    StaticKw,
    #[token("abstract")]
    AbstractKw,
    #[token("virtual")]
    VirtualKw,
    #[token("override")]
    OverrideKw,
    #[token("sealed")]
    SealedKw,
    #[token("readonly")]
    ReadonlyKw,
    #[token("const")]
    ConstKw,
    #[token("new")]
    NewKw,
    #[token("partial")]
    PartialKw,
    #[token("async")]
    AsyncKw,
    #[token("extern")]
    ExternKw,
    #[token("unsafe")]
    UnsafeKw,
    #[token("volatile")]
    VolatileKw,
    #[token("ref")]
    RefKw,
    #[token("out")]
    OutKw,
    #[token("in")]
    InKw,
    #[token("params")]
    ParamsKw,
    #[token("this")]
    ThisKw,
    #[token("base")]
    BaseKw,
    #[token("return")]
    ReturnKw,
    #[token("if")]
    IfKw,
    #[token("else")]
    ElseKw,
    #[token("while")]
    WhileKw,
    #[token("do")]
    DoKw,
    #[token("for")]
    ForKw,
    #[token("foreach")]
    ForeachKw,
    #[token("try")]
    TryKw,
    #[token("catch")]
    CatchKw,
    #[token("finally")]
    FinallyKw,
    #[token("throw")]
    ThrowKw,
    #[token("break")]
    BreakKw,
    #[token("continue")]
    ContinueKw,
    #[token("lock")]
    LockKw,
    #[token("switch")]
    SwitchKw,
    #[token("case")]
    CaseKw,
    #[token("goto")]
    GotoKw,
    #[token("true")]
    TrueKw,
    #[token("false")]
    FalseKw,
    #[token("null")]
    NullKw,
    #[token("typeof")]
    TypeofKw,
    #[token("default")]
    DefaultKw,
    #[token("is")]
    IsKw,
    #[token("as")]
    AsKw,
    #[token("void")]
    VoidKw,
    #[token("bool")]
    BoolKw,
    #[token("byte")]
    ByteKw,
    #[token("sbyte")]
    SbyteKw,
    #[token("char")]
    CharKw,
    #[token("decimal")]
    DecimalKw,
    #[token("double")]
    DoubleKw,
    #[token("float")]
    FloatKw,
    #[token("int")]
    IntKw,
    #[token("long")]
    LongKw,
    #[token("object")]
    ObjectKw,
    #[token("short")]
    ShortKw,
    #[token("string")]
    StringKw,
    #[token("uint")]
    UintKw,
    #[token("ulong")]
    UlongKw,
    #[token("ushort")]
    UshortKw,
}

impl From<LogosToken> for SyntaxKind {
    fn from(token: LogosToken) -> Self {
        use LogosToken::*;
        match token {
            Whitespace => SyntaxKind::WHITESPACE,
            LineComment => SyntaxKind::LINE_COMMENT,
            DocComment => SyntaxKind::DOC_COMMENT,
            BlockComment => SyntaxKind::BLOCK_COMMENT,
            Ident => SyntaxKind::IDENT,
            IntNumber => SyntaxKind::INT_NUMBER,
            RealNumber => SyntaxKind::REAL_NUMBER,
            String => SyntaxKind::STRING,
            VerbatimString => SyntaxKind::VERBATIM_STRING,
            InterpolatedString => SyntaxKind::INTERPOLATED_STRING,
            Char => SyntaxKind::CHAR,
            LBrace => SyntaxKind::L_BRACE,
            RBrace => SyntaxKind::R_BRACE,
            LBracket => SyntaxKind::L_BRACKET,
            RBracket => SyntaxKind::R_BRACKET,
            LParen => SyntaxKind::L_PAREN,
            RParen => SyntaxKind::R_PAREN,
            Semicolon => SyntaxKind::SEMICOLON,
            Colon => SyntaxKind::COLON,
            ColonColon => SyntaxKind::COLON_COLON,
            Comma => SyntaxKind::COMMA,
            Dot => SyntaxKind::DOT,
            Question => SyntaxKind::QUESTION,
            QuestionDot => SyntaxKind::QUESTION_DOT,
            QuestionQuestion => SyntaxKind::QUESTION_QUESTION,
            QuestionQuestionEq => SyntaxKind::QUESTION_QUESTION_EQ,
            Eq => SyntaxKind::EQ,
            EqEq => SyntaxKind::EQ_EQ,
            Bang => SyntaxKind::BANG,
            BangEq => SyntaxKind::BANG_EQ,
            Lt => SyntaxKind::LT,
            Gt => SyntaxKind::GT,
            LtEq => SyntaxKind::LT_EQ,
            GtEq => SyntaxKind::GT_EQ,
            LtLt => SyntaxKind::LT_LT,
            LtLtEq => SyntaxKind::LT_LT_EQ,
            Plus => SyntaxKind::PLUS,
            Minus => SyntaxKind::MINUS,
            Star => SyntaxKind::STAR,
            Slash => SyntaxKind::SLASH,
            Percent => SyntaxKind::PERCENT,
            Amp => SyntaxKind::AMP,
            Pipe => SyntaxKind::PIPE,
            Caret => SyntaxKind::CARET,
            Tilde => SyntaxKind::TILDE,
            AmpAmp => SyntaxKind::AMP_AMP,
            PipePipe => SyntaxKind::PIPE_PIPE,
            PlusPlus => SyntaxKind::PLUS_PLUS,
            MinusMinus => SyntaxKind::MINUS_MINUS,
            PlusEq => SyntaxKind::PLUS_EQ,
            MinusEq => SyntaxKind::MINUS_EQ,
            StarEq => SyntaxKind::STAR_EQ,
            SlashEq => SyntaxKind::SLASH_EQ,
            PercentEq => SyntaxKind::PERCENT_EQ,
            AmpEq => SyntaxKind::AMP_EQ,
            PipeEq => SyntaxKind::PIPE_EQ,
            CaretEq => SyntaxKind::CARET_EQ,
            FatArrow => SyntaxKind::FAT_ARROW,
            UsingKw => SyntaxKind::USING_KW,
            NamespaceKw => SyntaxKind::NAMESPACE_KW,
            ClassKw => SyntaxKind::CLASS_KW,
            StructKw => SyntaxKind::STRUCT_KW,
            InterfaceKw => SyntaxKind::INTERFACE_KW,
            EnumKw => SyntaxKind::ENUM_KW,
            DelegateKw => SyntaxKind::DELEGATE_KW,
            EventKw => SyntaxKind::EVENT_KW,
            PublicKw => SyntaxKind::PUBLIC_KW,
            PrivateKw => SyntaxKind::PRIVATE_KW,
            ProtectedKw => SyntaxKind::PROTECTED_KW,
            InternalKw => SyntaxKind::INTERNAL_KW,
            StaticKw => SyntaxKind::STATIC_KW,
            AbstractKw => SyntaxKind::ABSTRACT_KW,
            VirtualKw => SyntaxKind::VIRTUAL_KW,
            OverrideKw => SyntaxKind::OVERRIDE_KW,
            SealedKw => SyntaxKind::SEALED_KW,
            ReadonlyKw => SyntaxKind::READONLY_KW,
            ConstKw => SyntaxKind::CONST_KW,
            NewKw => SyntaxKind::NEW_KW,
            PartialKw => SyntaxKind::PARTIAL_KW,
            AsyncKw => SyntaxKind::ASYNC_KW,
            ExternKw => SyntaxKind::EXTERN_KW,
            UnsafeKw => SyntaxKind::UNSAFE_KW,
            VolatileKw => SyntaxKind::VOLATILE_KW,
            RefKw => SyntaxKind::REF_KW,
            OutKw => SyntaxKind::OUT_KW,
            InKw => SyntaxKind::IN_KW,
            ParamsKw => SyntaxKind::PARAMS_KW,
            ThisKw => SyntaxKind::THIS_KW,
            BaseKw => SyntaxKind::BASE_KW,
            ReturnKw => SyntaxKind::RETURN_KW,
            IfKw => SyntaxKind::IF_KW,
            ElseKw => SyntaxKind::ELSE_KW,
            WhileKw => SyntaxKind::WHILE_KW,
            DoKw => SyntaxKind::DO_KW,
            ForKw => SyntaxKind::FOR_KW,
            ForeachKw => SyntaxKind::FOREACH_KW,
            TryKw => SyntaxKind::TRY_KW,
            CatchKw => SyntaxKind::CATCH_KW,
            FinallyKw => SyntaxKind::FINALLY_KW,
            ThrowKw => SyntaxKind::THROW_KW,
            BreakKw => SyntaxKind::BREAK_KW,
            ContinueKw => SyntaxKind::CONTINUE_KW,
            LockKw => SyntaxKind::LOCK_KW,
            SwitchKw => SyntaxKind::SWITCH_KW,
            CaseKw => SyntaxKind::CASE_KW,
            GotoKw => SyntaxKind::GOTO_KW,
            TrueKw => SyntaxKind::TRUE_KW,
            FalseKw => SyntaxKind::FALSE_KW,
            NullKw => SyntaxKind::NULL_KW,
            TypeofKw => SyntaxKind::TYPEOF_KW,
            DefaultKw => SyntaxKind::DEFAULT_KW,
            IsKw => SyntaxKind::IS_KW,
            AsKw => SyntaxKind::AS_KW,
            VoidKw => SyntaxKind::VOID_KW,
            BoolKw => SyntaxKind::BOOL_KW,
            ByteKw => SyntaxKind::BYTE_KW,
            SbyteKw => SyntaxKind::SBYTE_KW,
            CharKw => SyntaxKind::CHAR_KW,
            DecimalKw => SyntaxKind::DECIMAL_KW,
            DoubleKw => SyntaxKind::DOUBLE_KW,
            FloatKw => SyntaxKind::FLOAT_KW,
            IntKw => SyntaxKind::INT_KW,
            LongKw => SyntaxKind::LONG_KW,
            ObjectKw => SyntaxKind::OBJECT_KW,
            ShortKw => SyntaxKind::SHORT_KW,
            StringKw => SyntaxKind::STRING_KW,
            UintKw => SyntaxKind::UINT_KW,
            UlongKw => SyntaxKind::ULONG_KW,
            UshortKw => SyntaxKind::USHORT_KW,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lex_class_header() {
        let tokens: Vec<_> = Lexer::new("public class Foo").collect();
        assert_eq!(tokens.len(), 5);
        assert_eq!(tokens[0].kind, SyntaxKind::PUBLIC_KW);
        assert_eq!(tokens[1].kind, SyntaxKind::WHITESPACE);
        assert_eq!(tokens[2].kind, SyntaxKind::CLASS_KW);
        assert_eq!(tokens[4].kind, SyntaxKind::IDENT);
    }

    #[test]
    fn test_lex_doc_comment_before_line_comment() {
        let tokens: Vec<_> = Lexer::new("/// doc\n// plain\n").collect();
        assert_eq!(tokens[0].kind, SyntaxKind::DOC_COMMENT);
        assert_eq!(tokens[2].kind, SyntaxKind::LINE_COMMENT);
    }

    #[test]
    fn test_lex_generic_closing_is_split() {
        let kinds: Vec<_> = Lexer::new("A<B<int>>").map(|t| t.kind).collect();
        assert_eq!(&kinds[kinds.len() - 2..], &[SyntaxKind::GT, SyntaxKind::GT]);
    }

    #[test]
    fn test_lex_literals() {
        let kinds: Vec<_> = Lexer::new(r#"42 3.5f "s\"x" @"a""b" 'c' 0xFFu"#)
            .filter(|t| !t.kind.is_trivia())
            .map(|t| t.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                SyntaxKind::INT_NUMBER,
                SyntaxKind::REAL_NUMBER,
                SyntaxKind::STRING,
                SyntaxKind::VERBATIM_STRING,
                SyntaxKind::CHAR,
                SyntaxKind::INT_NUMBER,
            ]
        );
    }

    #[test]
    fn test_lex_block_comment_with_stars() {
        let tokens: Vec<_> = Lexer::new("/** a **/x").collect();
        assert_eq!(tokens[0].kind, SyntaxKind::BLOCK_COMMENT);
        assert_eq!(tokens[0].text, "/** a **/");
        assert_eq!(tokens[1].kind, SyntaxKind::IDENT);
    }

    #[test]
    fn test_lex_block_comment_spanning_lines() {
        let kinds: Vec<_> = Lexer::new("a /* one\n * two */ + /**/b").map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SyntaxKind::IDENT,
                SyntaxKind::WHITESPACE,
                SyntaxKind::BLOCK_COMMENT,
                SyntaxKind::WHITESPACE,
                SyntaxKind::PLUS,
                SyntaxKind::WHITESPACE,
                SyntaxKind::BLOCK_COMMENT,
                SyntaxKind::IDENT,
            ]
        );
    }

    #[test]
    fn test_lex_unterminated_block_comment() {
        let tokens: Vec<_> = Lexer::new("x /* open").collect();
        assert_eq!(tokens.last().map(|t| (t.kind, t.text)), Some((SyntaxKind::ERROR, "/* open")));
    }

    #[test]
    fn test_lex_unicode_identifiers() {
        let tokens: Vec<_> = Lexer::new("Ü café _ñ @été")
            .filter(|t| !t.kind.is_trivia())
            .collect();
        let texts: Vec<_> = tokens.iter().map(|t| t.text).collect();
        assert_eq!(texts, vec!["Ü", "café", "_ñ", "@été"]);
        assert!(tokens.iter().all(|t| t.kind == SyntaxKind::IDENT));
    }

    #[test]
    fn test_lex_non_identifier_symbol_is_error() {
        let kinds: Vec<_> = Lexer::new("€").map(|t| t.kind).collect();
        assert_eq!(kinds, vec![SyntaxKind::ERROR]);
    }

    #[test]
    fn test_tokens_cover_input() {
        let input = "class A { int x = 1 >> 2; } # $";
        let joined: String = tokenize(input).iter().map(|t| t.text).collect();
        assert_eq!(joined, input);
    }
}
