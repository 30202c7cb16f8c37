//! Title and description of a core story seed.

use serde::{Deserialize, Serialize};

use crate::field::field;

/// Title used when the seed names none.
pub const UNTITLED: &str = "untitled";
/// Description used when the seed gives none.
pub const NO_DESCRIPTION: &str = "no description";

const TITLE_LABELS: &[&str] = &["title", "标题", "作品名"];
const DESCRIPTION_LABELS: &[&str] = &["description", "synopsis", "summary", "剧情简介", "简介"];

/// The headline facts of a story seed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreSeed {
    /// Story title, emphasis removed.
    pub title: String,
    /// One-paragraph description.
    pub description: String,
}

/// Read the title and description fields of a seed.
///
/// Labels may be bracketed or bold (`[Title]:`, `**标题**：`).
pub fn parse_core_seed(text: &str) -> CoreSeed {
    CoreSeed {
        title: field(text, TITLE_LABELS)
            .map(|title| title.replace("**", ""))
            .unwrap_or_else(|| UNTITLED.to_string()),
        description: field(text, DESCRIPTION_LABELS)
            .unwrap_or(NO_DESCRIPTION)
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_seed() {
        let seed = parse_core_seed("[Title]: The **Drowned** City\n[Synopsis]: A diver returns home.");
        assert_eq!(seed.title, "The Drowned City");
        assert_eq!(seed.description, "A diver returns home.");
    }

    #[test]
    fn cjk_seed() {
        let seed = parse_core_seed("**标题**：沉没之城\n**剧情简介**：潜水员回到故乡。");
        assert_eq!(seed.title, "沉没之城");
        assert_eq!(seed.description, "潜水员回到故乡。");
    }

    #[test]
    fn fallbacks() {
        assert_eq!(
            parse_core_seed("nothing useful"),
            CoreSeed {
                title: UNTITLED.to_string(),
                description: NO_DESCRIPTION.to_string(),
            }
        );
    }
}
