use std::collections::BTreeMap;

use crate::lexer::{DeltaToken, lex_deltas};

/// Parse the body of an effect annotation into attribute deltas.
///
/// A pair is an attribute name immediately followed by a signed integer,
/// whitespace allowed in between (`courage +2`). Anything else is skipped.
/// A later mention of the same attribute overrides an earlier one.
pub fn parse_deltas(text: &str) -> BTreeMap<String, i64> {
    let tokens = lex_deltas(text);
    let mut deltas = BTreeMap::new();

    for pair in tokens.windows(2) {
        let [(DeltaToken::Name, name), (DeltaToken::Signed, value)] = pair else {
            continue;
        };
        if let Some(delta) = parse_signed(&text[value.clone()]) {
            deltas.insert(text[name.clone()].to_string(), delta);
        }
    }

    deltas
}

/// Parse `+3`, `-12`, `＋3` or `－12`. Values that overflow `i64` are dropped.
fn parse_signed(token: &str) -> Option<i64> {
    let mut chars = token.chars();
    let negative = match chars.next()? {
        '+' | '＋' => false,
        '-' | '－' => true,
        _ => return None,
    };
    let magnitude: i64 = chars.as_str().parse().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deltas(pairs: &[(&str, i64)]) -> BTreeMap<String, i64> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn single_delta() {
        assert_eq!(parse_deltas("courage+1"), deltas(&[("courage", 1)]));
    }

    #[test]
    fn separators_and_spacing() {
        assert_eq!(
            parse_deltas("courage +2, wisdom-1; charm +3 / luck -4"),
            deltas(&[("courage", 2), ("wisdom", -1), ("charm", 3), ("luck", -4)])
        );
    }

    #[test]
    fn cjk_deltas() {
        assert_eq!(
            parse_deltas("勇气+2，智慧-1、魅力 +3"),
            deltas(&[("勇气", 2), ("智慧", -1), ("魅力", 3)])
        );
    }

    #[test]
    fn fullwidth_signs() {
        assert_eq!(parse_deltas("勇气＋2 智慧－1"), deltas(&[("勇气", 2), ("智慧", -1)]));
    }

    #[test]
    fn later_mention_overrides() {
        assert_eq!(parse_deltas("courage+1 courage-3"), deltas(&[("courage", -3)]));
    }

    #[test]
    fn detached_sign_is_ignored() {
        assert!(parse_deltas("courage+ 5").is_empty());
        assert!(parse_deltas("none").is_empty());
        assert!(parse_deltas("").is_empty());
    }

    #[test]
    fn overflow_is_dropped() {
        assert_eq!(
            parse_deltas("huge+99999999999999999999 small+1"),
            deltas(&[("small", 1)])
        );
    }
}
