//! Sentence segmentation over normalised narrative text.

use std::ops::Range;

/// Default buffer length (in `char`s) past which a sentence is forced out.
pub const DEFAULT_SENTENCE_CAP: usize = 80;

/// Normalise a block of text: drop carriage returns, fold every run of
/// spaces, tabs and newlines into one space, and trim.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;

    for c in text.chars() {
        match c {
            '\r' => {}
            ' ' | '\t' | '\n' => pending_space = true,
            _ => {
                if pending_space && !out.is_empty() {
                    out.push(' ');
                }
                pending_space = false;
                out.push(c);
            }
        }
    }

    out
}

/// Splits a text block into sentences.
///
/// The text is normalised once on construction; [`spans`](Self::spans) and
/// [`iter`](Self::iter) can then be called any number of times.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentenceSplitter {
    text: String,
    cap: usize,
}

impl SentenceSplitter {
    /// Normalise `text` and prepare to split it with the default cap.
    pub fn new(text: &str) -> Self {
        Self {
            text: normalize(text),
            cap: DEFAULT_SENTENCE_CAP,
        }
    }

    /// Set the forced-split length (at least 1).
    pub fn with_cap(mut self, cap: usize) -> Self {
        self.cap = cap.max(1);
        self
    }

    /// The normalised text the spans refer to.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Byte spans of each sentence in [`text`](Self::text). The spans tile the
    /// text; trailing whitespace belongs to the sentence before it.
    pub fn spans(&self) -> SentenceSpans<'_> {
        SentenceSpans::new(&self.text, self.cap)
    }

    /// Trimmed sentences.
    pub fn iter(&self) -> Sentences<'_> {
        Sentences {
            spans: self.spans(),
        }
    }
}

impl<'a> IntoIterator for &'a SentenceSplitter {
    type Item = &'a str;
    type IntoIter = Sentences<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Split `text` into trimmed sentences with the default cap.
pub fn split_sentences(text: &str) -> Vec<String> {
    SentenceSplitter::new(text)
        .iter()
        .map(str::to_string)
        .collect()
}

/// Iterator over trimmed sentences. See [`SentenceSplitter::iter`].
#[derive(Debug, Clone)]
pub struct Sentences<'a> {
    spans: SentenceSpans<'a>,
}

impl<'a> Iterator for Sentences<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let text = self.spans.text;
        self.spans.next().map(|span| text[span].trim())
    }
}

/// Iterator over sentence byte spans of a text.
///
/// Works on any text, normalised or not; leading whitespace ends up at the
/// start of the first span.
#[derive(Debug, Clone)]
pub struct SentenceSpans<'a> {
    text: &'a str,
    pos: usize,
    cap: usize,
}

impl<'a> SentenceSpans<'a> {
    /// Iterate over the sentence spans of `text` as-is.
    pub fn new(text: &'a str, cap: usize) -> Self {
        Self {
            text,
            pos: 0,
            cap: cap.max(1),
        }
    }
}

impl Iterator for SentenceSpans<'_> {
    type Item = Range<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        let text = self.text;
        let start = self.pos;
        if start >= text.len() || text[start..].trim().is_empty() {
            self.pos = text.len();
            return None;
        }

        let mut quotes = 0usize;
        let mut len = 0usize;
        let mut i = start;

        while let Some(c) = char_at(text, i) {
            i += c.len_utf8();
            len += 1;
            if is_counted_quote(c) {
                quotes += 1;
            }

            let ends_with_colon = is_colon(c);
            if !ends_with_colon && !is_terminal(text, i, c) {
                continue;
            }

            if !ends_with_colon {
                // Absorb the rest of a terminal run and any closers.
                while let Some(next) = char_at(text, i) {
                    if is_terminal(text, i + next.len_utf8(), next) {
                        i += next.len_utf8();
                        len += 1;
                    } else if is_closer(next, quotes, text, i) {
                        i += next.len_utf8();
                        len += 1;
                        if is_counted_quote(next) {
                            quotes += 1;
                        }
                    } else {
                        break;
                    }
                }
            }

            let balanced = quotes % 2 == 0;
            if len > self.cap || (balanced && !ends_with_colon) {
                while let Some(next) = char_at(text, i) {
                    if !next.is_whitespace() {
                        break;
                    }
                    i += next.len_utf8();
                }
                self.pos = i;
                return Some(start..i);
            }
        }

        self.pos = text.len();
        Some(start..text.len())
    }
}

fn char_at(text: &str, i: usize) -> Option<char> {
    text.get(i..).and_then(|rest| rest.chars().next())
}

/// Quotation marks that must balance before a sentence may end.
fn is_counted_quote(c: char) -> bool {
    matches!(c, '"' | '“' | '”')
}

fn is_colon(c: char) -> bool {
    matches!(c, ':' | '：')
}

/// Whether `c`, which ends just before byte `after`, is sentence-terminal.
///
/// An ASCII `.` only counts when it is not glued to ASCII letters or digits
/// (`3.14`, `e.g` stay whole).
fn is_terminal(text: &str, after: usize, c: char) -> bool {
    match c {
        '!' | '?' | '…' | '。' | '！' | '？' => true,
        '.' => match char_at(text, after) {
            None => true,
            Some(next) => next.is_whitespace() || !next.is_ascii_alphanumeric(),
        },
        _ => false,
    }
}

/// Closing quotes and brackets absorbed into the sentence they end.
fn is_closer(c: char, quotes: usize, text: &str, at: usize) -> bool {
    match c {
        '”' | '’' | '」' | '』' | '）' | ')' | ']' | '】' => true,
        '"' => quotes % 2 == 1,
        '\'' => match char_at(text, at + 1) {
            None => true,
            Some(next) => next.is_whitespace(),
        },
        _ => false,
    }
}
