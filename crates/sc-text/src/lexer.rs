use logos::Logos;
use std::fmt;
use std::ops::Range;

/// Token type for one line of chapter text.
///
/// The lexer only separates the structural markers a choice line is built
/// from; everything else is a `Word`. The choice recognizer slices option
/// text straight out of the source using token spans, so whitespace is
/// skipped here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineToken {
    /// Choice arrow: `→`, `->` or `=>`.
    Arrow,
    /// Markdown bold marker `**`.
    Bold,
    /// Opening bracket `[` or `【`.
    Open,
    /// Closing bracket `]` or `】`.
    Close,
    /// Colon `:` or `：`.
    Colon,
    /// Any other run of non-space characters.
    Word,
    /// A stray character no other token accepts (`*`, `-`, `=`).
    Other,
}

impl fmt::Display for LineToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineToken::Arrow => write!(f, "arrow"),
            LineToken::Bold => write!(f, "**"),
            LineToken::Open => write!(f, "["),
            LineToken::Close => write!(f, "]"),
            LineToken::Colon => write!(f, ":"),
            LineToken::Word => write!(f, "word"),
            LineToken::Other => write!(f, "symbol"),
        }
    }
}

/// Internal logos token for lines.
#[derive(Logos, Debug)]
#[logos(skip r"[ \t\r\n\f\x{3000}]+")]
enum RawLineToken {
    #[token("→")]
    #[token("->")]
    #[token("=>")]
    Arrow,

    #[token("**")]
    Bold,

    #[token("[")]
    #[token("【")]
    Open,

    #[token("]")]
    #[token("】")]
    Close,

    #[token(":")]
    #[token("：")]
    Colon,

    #[regex(r"[^ \t\r\n\f\x{3000}\[\]【】:：*→=\-][^ \t\r\n\f\x{3000}\[\]【】:：*→]*")]
    Word,
}

/// Lex one line into `(LineToken, Span)` pairs. Never fails: characters no
/// token accepts come out as [`LineToken::Other`].
pub fn lex_line(line: &str) -> Vec<(LineToken, Range<usize>)> {
    let mut tokens = Vec::new();
    let mut lexer = RawLineToken::lexer(line);

    while let Some(result) = lexer.next() {
        let token = match result {
            Ok(RawLineToken::Arrow) => LineToken::Arrow,
            Ok(RawLineToken::Bold) => LineToken::Bold,
            Ok(RawLineToken::Open) => LineToken::Open,
            Ok(RawLineToken::Close) => LineToken::Close,
            Ok(RawLineToken::Colon) => LineToken::Colon,
            Ok(RawLineToken::Word) => LineToken::Word,
            Err(()) => LineToken::Other,
        };
        tokens.push((token, lexer.span()));
    }

    tokens
}

/// Token type for the body of an effect annotation (`courage+1, wisdom-2`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeltaToken {
    /// Attribute name.
    Name,
    /// Signed integer such as `+3` or `-12`.
    Signed,
    /// Separator: comma, `、`, `;`, `/` or `|`.
    Separator,
    /// Anything else (a dangling sign, a bare number, a colon).
    Other,
}

/// Internal logos token for effect annotations.
#[derive(Logos, Debug)]
#[logos(skip r"[ \t\r\n\f\x{3000}]+")]
enum RawDeltaToken {
    #[regex(r"[+\-＋－][0-9]+")]
    Signed,

    #[regex(r"[,，、;；/|]")]
    Separator,

    #[regex(
        r"[^ \t\r\n\f\x{3000},，、;；/|:：+\-＋－\[\]【】0-9][^ \t\r\n\f\x{3000},，、;；/|:：+\-＋－\[\]【】]*"
    )]
    Name,
}

/// Lex the body of an effect annotation into `(DeltaToken, Span)` pairs.
pub fn lex_deltas(text: &str) -> Vec<(DeltaToken, Range<usize>)> {
    let mut tokens = Vec::new();
    let mut lexer = RawDeltaToken::lexer(text);

    while let Some(result) = lexer.next() {
        let token = match result {
            Ok(RawDeltaToken::Signed) => DeltaToken::Signed,
            Ok(RawDeltaToken::Separator) => DeltaToken::Separator,
            Ok(RawDeltaToken::Name) => DeltaToken::Name,
            Err(()) => DeltaToken::Other,
        };
        tokens.push((token, lexer.span()));
    }

    tokens
}
