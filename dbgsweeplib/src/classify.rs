//! Line classification.
//!
//! [`classify`] is a pure two-stage decision over a [`PatternCatalog`]:
//! keep patterns are tested first and short-circuit, then remove patterns.
//! A line matching neither is kept. Classification of one line never looks
//! at its neighbours.

use serde::{Deserialize, Serialize};

use crate::catalog::PatternCatalog;

/// What happens to a line during a rewrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Keep,
    Remove,
}

impl Verdict {
    pub fn is_remove(self) -> bool {
        self == Verdict::Remove
    }
}

/// A line together with its verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedLine<'a> {
    /// Original text, including its line terminator if it had one
    pub text: &'a str,
    pub verdict: Verdict,
}

/// Classify a single line.
///
/// The line may still carry its terminator (`\n` or `\r\n`); it is stripped
/// before matching so anchored patterns see only the statement text.
pub fn classify(line: &str, catalog: &PatternCatalog) -> Verdict {
    let text = line.trim_end_matches(['\n', '\r']);

    if catalog.is_protected(text) {
        return Verdict::Keep;
    }
    if catalog.is_debug(text) {
        return Verdict::Remove;
    }
    Verdict::Keep
}

/// Split content into lines (terminators preserved) and classify each one.
pub fn classify_lines<'a>(content: &'a str, catalog: &PatternCatalog) -> Vec<ClassifiedLine<'a>> {
    content
        .split_inclusive('\n')
        .map(|text| ClassifiedLine {
            text,
            verdict: classify(text, catalog),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Preset;

    fn catalog() -> PatternCatalog {
        PatternCatalog::new()
            .remove_messages(&["debug"])
            .unwrap()
            .keep_messages(&["critical", "exception"])
            .unwrap()
    }

    #[test]
    fn test_remove_debug_line() {
        assert_eq!(classify("print('Debug: x');\n", &catalog()), Verdict::Remove);
    }

    #[test]
    fn test_keep_wins_over_remove() {
        let catalog = catalog();
        let line = "print('debug: unexpected exception');";

        assert!(catalog.is_debug(line));
        assert!(catalog.is_protected(line));
        assert_eq!(classify(line, &catalog), Verdict::Keep);
    }

    #[test]
    fn test_raw_pattern_ignores_partial_matches() {
        let catalog = PatternCatalog::new().remove("debug").unwrap();

        assert_eq!(
            classify("let debugMode = compute(); // real code\n", &catalog),
            Verdict::Keep
        );
        assert_eq!(classify("debug\r\n", &catalog), Verdict::Remove);
    }

    #[test]
    fn test_no_match_is_keep() {
        assert_eq!(classify("a();\n", &catalog()), Verdict::Keep);
        assert_eq!(classify("", &catalog()), Verdict::Keep);
        assert_eq!(classify("\n", &catalog()), Verdict::Keep);
    }

    #[test]
    fn test_crlf_terminator() {
        assert_eq!(
            classify("  print(\"debug\");\r\n", &catalog()),
            Verdict::Remove
        );
    }

    #[test]
    fn test_multiline_statement_passes_through() {
        let content = "print(\n  'debug: split'\n);\n";
        let lines = classify_lines(content, &catalog());

        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|l| l.verdict == Verdict::Keep));
    }

    #[test]
    fn test_classify_lines_preserves_text() {
        let content = "a();\nprint('Debug: x');\nprint('Critical failure');\nb();";
        let lines = classify_lines(content, &catalog());

        let verdicts: Vec<Verdict> = lines.iter().map(|l| l.verdict).collect();
        assert_eq!(
            verdicts,
            vec![Verdict::Keep, Verdict::Remove, Verdict::Keep, Verdict::Keep]
        );
        let rejoined: String = lines.iter().map(|l| l.text).collect();
        assert_eq!(rejoined, content);
    }

    #[test]
    fn test_remove_verdicts_never_match_keep() {
        let catalog = PatternCatalog::preset(Preset::Advanced).unwrap();
        let samples = [
            "print('Debug - Headers');",
            "print('Fatal: debug mode');",
            "print('Search results');",
            "print('Unexpected ?');",
            "let x = 1;",
        ];

        for line in samples {
            match classify(line, &catalog) {
                Verdict::Remove => {
                    assert!(catalog.is_debug(line));
                    assert!(!catalog.is_protected(line));
                }
                Verdict::Keep => {
                    assert!(catalog.is_protected(line) || !catalog.is_debug(line));
                }
            }
        }
    }
}
