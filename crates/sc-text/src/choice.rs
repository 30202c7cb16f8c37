//! Choice-line recognition and the choice-group scanner.
//!
//! A choice line looks like
//!
//! ```text
//! → A. go north [effect: courage+1]
//! **→ B、前往南方【属性影响：智慧+1，勇气-2】**
//! ```
//!
//! Lines are tokenized with [`lex_line`] and recognized by a small
//! recursive-descent pass. The scanner then walks logical lines with an
//! explicit state machine to cluster choices into groups, attaching the line
//! right after each choice as its reaction.

use std::collections::BTreeMap;
use std::ops::Range;

use sc_core::{Choice, ChoiceGroup};

use crate::chunker::NarrationChunker;
use crate::config::ParseConfig;
use crate::effect::parse_deltas;
use crate::lexer::{LineToken, lex_line};
use crate::sentence::SentenceSpans;

/// Keywords that open an effect annotation, compared case-insensitively.
const ANNOTATION_KEYWORDS: &[&str] = &[
    "effect",
    "effects",
    "attribute",
    "attributes",
    "attribute effect",
    "attribute effects",
    "impact",
    "属性影响",
    "影响属性",
    "属性",
];

/// One recognized choice line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceLine {
    /// Option label as written (`A`, `2`).
    pub label: String,
    /// Option text with surrounding brackets and bold markers removed.
    pub text: String,
    /// Parsed attribute deltas. Empty when the annotation had none.
    pub deltas: BTreeMap<String, i64>,
    /// Byte span of the whole annotation, brackets included.
    pub annotation: Range<usize>,
    /// Byte offset just past the annotation (and any closing `**`).
    pub end: usize,
}

impl ChoiceLine {
    fn shifted(mut self, base: usize) -> Self {
        self.annotation = self.annotation.start + base..self.annotation.end + base;
        self.end += base;
        self
    }
}

/// Parse `line` as a choice line starting at its first token.
///
/// Returns `None` unless the line has an arrow, a label, non-empty option text
/// and an effect annotation, in that order. Text after the annotation is left
/// for the caller (see [`ChoiceLine::end`]).
pub fn parse_choice_line(line: &str) -> Option<ChoiceLine> {
    let tokens = lex_line(line);
    let mut i = skip_bold(&tokens, 0);

    let Some((LineToken::Arrow, _)) = tokens.get(i) else {
        return None;
    };
    i = skip_bold(&tokens, i + 1);

    let Some((LineToken::Word, label_span)) = tokens.get(i) else {
        return None;
    };
    let (label, consumed) = split_label(&line[label_span.clone()])?;
    let text_start = label_span.start + consumed;

    let annotation = find_annotation(line, &tokens, i + 1)?;
    let text = clean_option_text(&line[text_start..annotation.span.start]);
    if text.is_empty() {
        return None;
    }

    Some(ChoiceLine {
        label,
        text: text.to_string(),
        deltas: parse_deltas(&line[annotation.body]),
        annotation: annotation.span.clone(),
        end: annotation.span.end,
    })
}

fn skip_bold(tokens: &[(LineToken, Range<usize>)], mut i: usize) -> usize {
    while matches!(tokens.get(i), Some((LineToken::Bold, _))) {
        i += 1;
    }
    i
}

/// Split an option label off the front of a word.
///
/// Returns the label and the number of bytes it (and its separator) takes.
fn split_label(word: &str) -> Option<(String, usize)> {
    let first = word.chars().next()?;
    let label_len = if first.is_ascii_uppercase() {
        1
    } else if first.is_ascii_digit() {
        word.find(|c: char| !c.is_ascii_digit()).unwrap_or(word.len())
    } else {
        return None;
    };

    let label = word[..label_len].to_string();
    match word[label_len..].chars().next() {
        None => Some((label, label_len)),
        Some(sep @ ('.' | '、' | ')' | '．' | '）')) => Some((label, label_len + sep.len_utf8())),
        Some(c) if c.is_ascii_alphanumeric() => None,
        Some(_) => Some((label, label_len)),
    }
}

fn clean_option_text(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_whitespace() || matches!(c, '[' | ']' | '【' | '】' | '*'))
}

fn is_annotation_keyword(phrase: &str) -> bool {
    let phrase = phrase
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    ANNOTATION_KEYWORDS.contains(&phrase.as_str())
}

struct Annotation {
    span: Range<usize>,
    body: Range<usize>,
}

/// Find the first `[keyword: ...]` annotation at or after token `from`.
///
/// The brackets are optional. The search stops at the next arrow, so one
/// option never borrows the annotation of the option after it.
fn find_annotation(
    line: &str,
    tokens: &[(LineToken, Range<usize>)],
    from: usize,
) -> Option<Annotation> {
    for j in from..tokens.len() {
        match tokens[j].0 {
            LineToken::Arrow => return None,
            LineToken::Colon => {}
            _ => continue,
        }

        for m in [2, 1] {
            if j < from + m {
                continue;
            }
            let words = &tokens[j - m..j];
            if !words.iter().all(|(t, _)| *t == LineToken::Word) {
                continue;
            }
            let phrase = &line[words[0].1.start..words[m - 1].1.end];
            if !is_annotation_keyword(phrase) {
                continue;
            }

            let keyword = j - m;
            let bracketed = keyword > from && tokens[keyword - 1].0 == LineToken::Open;
            let start = if bracketed {
                tokens[keyword - 1].1.start
            } else {
                words[0].1.start
            };
            let body_start = tokens[j].1.end;

            let close = bracketed
                .then(|| {
                    tokens[j + 1..]
                        .iter()
                        .position(|(t, _)| *t == LineToken::Close)
                        .map(|k| j + 1 + k)
                })
                .flatten();

            let (body_end, end) = match close {
                Some(k) => {
                    let mut end = tokens[k].1.end;
                    let mut next = k + 1;
                    while let Some((LineToken::Bold, span)) = tokens.get(next) {
                        end = span.end;
                        next += 1;
                    }
                    (tokens[k].1.start, end)
                }
                None => (line.len(), line.len()),
            };

            return Some(Annotation {
                span: start..end,
                body: body_start..body_end,
            });
        }
    }
    None
}

/// Kind of a logical line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// A physical line holding only whitespace.
    Blank,
    /// A recognized choice line. Offsets are relative to the scanned text.
    Choice(ChoiceLine),
    /// Anything else.
    Text,
}

/// A unit of input the scanner walks over.
///
/// Logical lines are physical lines, further split before an arrow that starts
/// a valid choice mid-line and after the annotation of an inline choice. Text
/// trailing an inline choice is split once more: its first sentence becomes
/// its own line (the reaction) and the remainder another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalLine {
    /// Byte span in the scanned text, trimmed for non-blank lines.
    pub span: Range<usize>,
    /// What the line holds.
    pub kind: LineKind,
}

/// Break `text` into logical lines.
pub fn logical_lines(text: &str, sentence_cap: usize) -> Vec<LogicalLine> {
    let mut out = Vec::new();
    let mut start = 0;

    for piece in text.split_inclusive('\n') {
        let content = piece.trim_end_matches(['\n', '\r']);
        let line = start..start + content.len();
        if content.trim().is_empty() {
            out.push(LogicalLine {
                span: line,
                kind: LineKind::Blank,
            });
        } else {
            push_physical_line(text, line, sentence_cap, &mut out);
        }
        start += piece.len();
    }

    out
}

fn push_physical_line(
    text: &str,
    line: Range<usize>,
    sentence_cap: usize,
    out: &mut Vec<LogicalLine>,
) {
    let mut pos = line.start;

    while pos < line.end {
        let slice = &text[pos..line.end];
        if slice.trim().is_empty() {
            break;
        }
        let lead = slice.len() - slice.trim_start().len();

        match find_choice_start(slice) {
            Some((offset, choice)) if offset == lead => {
                let start = pos + offset;
                let end = start + choice.end;
                out.push(LogicalLine {
                    span: start..end,
                    kind: LineKind::Choice(choice.shifted(start)),
                });

                let rest = &text[end..line.end];
                let tail_end = find_choice_start(rest).map_or(line.end, |(q, _)| end + q);
                push_tail(text, end..tail_end, sentence_cap, out);
                pos = tail_end;
            }
            Some((offset, _)) => {
                push_text(text, pos..pos + offset, out);
                pos += offset;
            }
            None => {
                push_text(text, pos..line.end, out);
                pos = line.end;
            }
        }
    }
}

/// Find the first offset in `slice` where a valid choice line starts.
fn find_choice_start(slice: &str) -> Option<(usize, ChoiceLine)> {
    let tokens = lex_line(slice);
    tokens
        .iter()
        .enumerate()
        .filter(|(i, (token, _))| match token {
            LineToken::Arrow => true,
            LineToken::Bold => matches!(tokens.get(i + 1), Some((LineToken::Arrow, _))),
            _ => false,
        })
        .find_map(|(_, (_, span))| parse_choice_line(&slice[span.start..]).map(|c| (span.start, c)))
}

/// Text after an inline choice: first sentence, then the remainder.
fn push_tail(text: &str, tail: Range<usize>, sentence_cap: usize, out: &mut Vec<LogicalLine>) {
    let slice = &text[tail.clone()];
    if slice.trim().is_empty() {
        return;
    }
    let first_end = SentenceSpans::new(slice, sentence_cap)
        .next()
        .map_or(tail.end, |first| tail.start + first.end);
    push_text(text, tail.start..first_end, out);
    push_text(text, first_end..tail.end, out);
}

fn push_text(text: &str, range: Range<usize>, out: &mut Vec<LogicalLine>) {
    let slice = &text[range.clone()];
    let trimmed = slice.trim_start();
    let start = range.start + (slice.len() - trimmed.len());
    let end = start + trimmed.trim_end().len();
    if start < end {
        out.push(LogicalLine {
            span: start..end,
            kind: LineKind::Text,
        });
    }
}

/// A group under construction.
#[derive(Debug)]
struct OpenGroup {
    start: usize,
    choices: Vec<Choice>,
}

impl OpenGroup {
    fn push(&mut self, line: &ChoiceLine) {
        let id = self.choices.len() as u32 + 1;
        let mut choice = Choice::new(id, line.label.clone(), line.text.clone());
        choice.attributes_delta = line.deltas.clone();
        self.choices.push(choice);
    }

    fn set_reaction(&mut self, chunks: Vec<String>) {
        if let Some(last) = self.choices.last_mut() {
            last.subsequent_dialogues = chunks;
        }
    }

    fn close(self, end: usize) -> ChoiceGroup {
        ChoiceGroup {
            span: self.start..end,
            choices: self.choices,
        }
    }
}

/// Scanner state between logical lines.
#[derive(Debug)]
enum ScanState {
    /// Outside any group.
    SeekingGroup,
    /// Just read a choice line; the next text line is its reaction.
    InGroupChoice(OpenGroup),
    /// Reaction taken (or skipped by a blank line); waiting for another choice.
    InGroupReaction(OpenGroup),
}

/// Clusters choice lines into groups and captures their reactions.
#[derive(Debug, Clone, Copy)]
pub struct ChoiceGroupScanner {
    reaction: NarrationChunker,
    sentence_cap: usize,
}

impl Default for ChoiceGroupScanner {
    fn default() -> Self {
        Self::new(&ParseConfig::default())
    }
}

impl ChoiceGroupScanner {
    /// Build a scanner from the parse configuration.
    pub fn new(config: &ParseConfig) -> Self {
        Self {
            reaction: NarrationChunker::new(config.reaction).with_sentence_cap(config.sentence_cap),
            sentence_cap: config.sentence_cap,
        }
    }

    /// Scan `text` for choice groups. Group spans are byte offsets into `text`.
    pub fn scan(&self, text: &str) -> Vec<ChoiceGroup> {
        let mut groups = Vec::new();
        let mut state = ScanState::SeekingGroup;

        for line in logical_lines(text, self.sentence_cap) {
            state = match (state, &line.kind) {
                (ScanState::SeekingGroup, LineKind::Choice(choice)) => {
                    let mut group = OpenGroup {
                        start: line.span.start,
                        choices: Vec::new(),
                    };
                    group.push(choice);
                    ScanState::InGroupChoice(group)
                }
                (ScanState::SeekingGroup, _) => ScanState::SeekingGroup,
                (
                    ScanState::InGroupChoice(mut group) | ScanState::InGroupReaction(mut group),
                    LineKind::Choice(choice),
                ) => {
                    group.push(choice);
                    ScanState::InGroupChoice(group)
                }
                (ScanState::InGroupChoice(group), LineKind::Blank) => {
                    ScanState::InGroupReaction(group)
                }
                (ScanState::InGroupChoice(mut group), LineKind::Text) => {
                    group.set_reaction(self.reaction.chunk(&text[line.span.clone()]));
                    ScanState::InGroupReaction(group)
                }
                (ScanState::InGroupReaction(group), LineKind::Blank) => {
                    ScanState::InGroupReaction(group)
                }
                (ScanState::InGroupReaction(group), LineKind::Text) => {
                    groups.push(group.close(line.span.start));
                    ScanState::SeekingGroup
                }
            };
        }

        if let ScanState::InGroupChoice(group) | ScanState::InGroupReaction(group) = state {
            groups.push(group.close(text.len()));
        }

        groups
    }
}

/// Scan `text` for choice groups with the default configuration.
pub fn scan_choice_groups(text: &str) -> Vec<ChoiceGroup> {
    ChoiceGroupScanner::default().scan(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    const INLINE: &str = "intro text. → A. go north [effect: courage+1] you feel brave. \
                          → B. go south [effect: wisdom+1] you feel calm. closing text.";

    const MULTILINE: &str = "intro text.\n\
                             → A. go north [effect: courage+1]\n\
                             you feel brave.\n\
                             → B. go south [effect: wisdom+1]\n\
                             you feel calm.\n\
                             closing text.\n";

    #[test]
    fn parse_basic_choice_line() {
        let line = "→ A. go north [effect: courage+1]";
        let choice = parse_choice_line(line).unwrap();
        assert_eq!(choice.label, "A");
        assert_eq!(choice.text, "go north");
        assert_eq!(choice.deltas.get("courage"), Some(&1));
        assert_eq!(choice.end, line.len());
        assert_eq!(&line[choice.annotation.clone()], "[effect: courage+1]");
    }

    #[test]
    fn parse_cjk_bold_choice_line() {
        let line = "**→ B、前往南方【属性影响：智慧+1，勇气-2】**";
        let choice = parse_choice_line(line).unwrap();
        assert_eq!(choice.label, "B");
        assert_eq!(choice.text, "前往南方");
        assert_eq!(choice.deltas.get("智慧"), Some(&1));
        assert_eq!(choice.deltas.get("勇气"), Some(&-2));
        assert_eq!(choice.end, line.len());
    }

    #[test]
    fn parse_numeric_label_and_two_word_keyword() {
        let choice = parse_choice_line("-> 2) Accept the offer [Attribute Effects: trust +2]").unwrap();
        assert_eq!(choice.label, "2");
        assert_eq!(choice.text, "Accept the offer");
        assert_eq!(choice.deltas.get("trust"), Some(&2));
    }

    #[test]
    fn parse_bracketless_annotation() {
        let choice = parse_choice_line("=> A. run away effect: courage-1").unwrap();
        assert_eq!(choice.text, "run away");
        assert_eq!(choice.deltas.get("courage"), Some(&-1));
    }

    #[test]
    fn bracketed_option_text_is_stripped() {
        let choice = parse_choice_line("→ A. [Open the door] [effect: courage+1]").unwrap();
        assert_eq!(choice.text, "Open the door");
    }

    #[test]
    fn annotation_without_deltas_still_parses() {
        let choice = parse_choice_line("→ A. wait [effect: none]").unwrap();
        assert!(choice.deltas.is_empty());
    }

    #[test]
    fn rejects_non_choice_lines() {
        assert!(parse_choice_line("go north [effect: courage+1]").is_none());
        assert!(parse_choice_line("→ go north [effect: courage+1]").is_none());
        assert!(parse_choice_line("→ Apple pie [effect: courage+1]").is_none());
        assert!(parse_choice_line("→ A. go north").is_none());
        assert!(parse_choice_line("→ A. [effect: courage+1]").is_none());
        assert!(parse_choice_line("→ A. go north → B. go south [effect: x+1]").is_none());
    }

    #[test]
    fn label_glued_to_cjk_text() {
        let choice = parse_choice_line("→ A前往北方【属性：勇气+1】").unwrap();
        assert_eq!(choice.label, "A");
        assert_eq!(choice.text, "前往北方");
    }

    #[test]
    fn logical_lines_split_inline_choices() {
        let lines = logical_lines(INLINE, 80);
        let kinds: Vec<_> = lines
            .iter()
            .map(|l| match &l.kind {
                LineKind::Choice(_) => "choice",
                LineKind::Text => "text",
                LineKind::Blank => "blank",
            })
            .collect();
        assert_eq!(
            kinds,
            vec!["text", "choice", "text", "choice", "text", "text"]
        );
        assert_eq!(&INLINE[lines[0].span.clone()], "intro text.");
        assert_eq!(&INLINE[lines[2].span.clone()], "you feel brave.");
        assert_eq!(&INLINE[lines[5].span.clone()], "closing text.");
    }

    #[test]
    fn scans_inline_group() {
        let groups = scan_choice_groups(INLINE);
        assert_eq!(groups.len(), 1);
        let group = &groups[0];
        assert_eq!(group.choices.len(), 2);
        assert_eq!(group.choices[0].choice_id, 1);
        assert_eq!(group.choices[1].choice_id, 2);
        assert_eq!(group.choices[0].subsequent_dialogues, vec!["you feel brave."]);
        assert_eq!(group.choices[1].subsequent_dialogues, vec!["you feel calm."]);
        assert_eq!(group.span.start, INLINE.find('→').unwrap());
        assert_eq!(group.span.end, INLINE.find("closing").unwrap());
    }

    #[test]
    fn scans_multiline_group() {
        let groups = scan_choice_groups(MULTILINE);
        assert_eq!(groups.len(), 1);
        let group = &groups[0];
        assert_eq!(group.choices[0].label, "A");
        assert_eq!(group.choices[0].delta("courage"), 1);
        assert_eq!(group.choices[1].delta("wisdom"), 1);
        assert_eq!(group.choices[1].subsequent_dialogues, vec!["you feel calm."]);
        assert_eq!(group.span.start, MULTILINE.find('→').unwrap());
        assert_eq!(group.span.end, MULTILINE.find("closing").unwrap());
    }

    #[test]
    fn blank_line_means_no_reaction() {
        let text = "→ A. stay [effect: calm+1]\n\n→ B. leave [effect: calm-1]\nYou go.\n\nAfter.";
        let groups = scan_choice_groups(text);
        assert_eq!(groups.len(), 1);
        assert!(groups[0].choices[0].subsequent_dialogues.is_empty());
        assert_eq!(groups[0].choices[1].subsequent_dialogues, vec!["You go."]);
        assert_eq!(groups[0].span.end, text.find("After").unwrap());
    }

    #[test]
    fn narration_between_groups_splits_them() {
        let text = "→ A. a [effect: x+1]\nok.\nMore story.\n→ A. b [effect: y+1]\n";
        let groups = scan_choice_groups(text);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].span.end, text.find("More").unwrap());
        assert_eq!(groups[1].span.end, text.len());
    }

    #[test]
    fn group_at_end_of_text_closes() {
        let text = "Story.\n→ A. go [effect: x+1]";
        let groups = scan_choice_groups(text);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].span.end, text.len());
    }

    #[test]
    fn no_choices_no_groups() {
        assert!(scan_choice_groups("Just a story. Nothing to pick.").is_empty());
        assert!(scan_choice_groups("").is_empty());
    }
}
