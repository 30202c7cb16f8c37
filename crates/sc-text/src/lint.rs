//! Diagnostics for chapter text the parser tolerated but probably misread.

use crate::assemble::ChapterAssembler;
use crate::choice::{ChoiceGroupScanner, LineKind, logical_lines};
use crate::config::ParseConfig;
use crate::diagnostics::Diagnostic;
use crate::header::{body_range, find_header};
use crate::lexer::{LineToken, lex_line};

/// Lint `raw` as it would be parsed with `percentages` and `config`.
///
/// Spans refer to `raw`. Diagnostics come out in source order.
pub fn lint_chapter(raw: &str, percentages: &[u32], config: &ParseConfig) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    if find_header(raw).is_none() {
        let first_line = raw.find('\n').unwrap_or(raw.len());
        diagnostics.push(
            Diagnostic::warning(0..first_line, "missing chapter header")
                .with_label("expected `Chapter <N> - <Title>`; using chapter 0, \"untitled\""),
        );
    }

    let body = body_range(raw);
    if body.is_empty() {
        diagnostics.push(Diagnostic::error(body, "chapter has no body text"));
        return diagnostics;
    }
    let base = body.start;
    let text = &raw[body];

    for line in logical_lines(text, config.sentence_cap) {
        let span = line.span.start + base..line.span.end + base;
        match &line.kind {
            LineKind::Choice(choice) if choice.deltas.is_empty() => {
                diagnostics.push(
                    Diagnostic::warning(
                        choice.annotation.start + base..choice.annotation.end + base,
                        "annotation has no attribute delta",
                    )
                    .with_label("expected something like `courage+1`"),
                );
            }
            LineKind::Text if starts_with_arrow(&text[line.span.clone()]) => {
                diagnostics.push(
                    Diagnostic::warning(span, "line starts with an arrow but is not a choice")
                        .with_label("expected `→ A. text [effect: name+1]`"),
                );
            }
            _ => {}
        }
    }

    for group in ChoiceGroupScanner::new(config).scan(text) {
        if group.choices.len() == 1 {
            diagnostics.push(Diagnostic::warning(
                group.span.start + base..group.span.end + base,
                "choice group has a single option",
            ));
        }
    }

    let chapter = ChapterAssembler::new(config).assemble(raw, percentages);
    for scene in chapter.scenes.iter().filter(|s| s.dialogues.is_empty()) {
        let at = scene.span.start + base;
        diagnostics.push(
            Diagnostic::warning(at..at, format!("scene {} is empty", scene.id))
                .with_label("two scene cuts landed on the same position"),
        );
    }

    diagnostics.sort_by_key(|d| d.span.start);
    diagnostics
}

fn starts_with_arrow(line: &str) -> bool {
    lex_line(line)
        .iter()
        .find(|(token, _)| *token != LineToken::Bold)
        .is_some_and(|(token, _)| *token == LineToken::Arrow)
}
