//! Response Structurer
//!
//! Re-parses the model's free-text answer into the four fields of an
//! [`AnalysisResult`]. A single linear scan over the non-blank lines with a
//! four-state section pointer:
//!
//! - a line containing a section keyword is a header and switches the section
//! - in the summary section, the first content line becomes the summary
//! - in the list sections, only bulleted or numbered lines are kept, with the
//!   marker stripped
//!
//! Lists are then capped and empty fields backfilled with fixed defaults, so
//! every field of the result is non-empty.

use crate::models::AnalysisResult;

pub const MAX_KEY_CLAUSES: usize = 5;
pub const MAX_RISKS: usize = 4;
pub const MAX_NEXT_STEPS: usize = 4;

/// Length of the raw-text fallback summary, in characters.
pub const SUMMARY_FALLBACK_CHARS: usize = 200;

pub const DEFAULT_KEY_CLAUSE: &str = "Document analysis completed successfully";
pub const DEFAULT_RISK: &str = "Please review the document carefully";
pub const DEFAULT_NEXT_STEPS: [&str; 2] = [
    "Review the analysis",
    "Consider professional consultation if needed",
];

// Checked in this order; the first group with a hit wins.
const SUMMARY_KEYWORDS: [&str; 2] = ["summary", "overview"];
const CLAUSE_KEYWORDS: [&str; 4] = ["key", "clause", "point", "important"];
const RISK_KEYWORDS: [&str; 3] = ["risk", "concern", "issue"];
const STEP_KEYWORDS: [&str; 4] = ["next", "step", "recommend", "action"];

/// "•" as it reads after a UTF-8 -> Windows-1252 round trip.
const MOJIBAKE_BULLET: &str = "\u{e2}\u{20ac}\u{a2}";

const BULLET_CHARS: [char; 6] = ['-', '*', '•', '\u{e2}', '\u{20ac}', '\u{a2}'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Summary,
    Clauses,
    Risks,
    Steps,
}

impl Section {
    /// Classify `line` as a section header, if it is one.
    pub fn from_header(line: &str) -> Option<Self> {
        let lower = line.to_lowercase();
        let hit = |keywords: &[&str]| keywords.iter().any(|k| lower.contains(k));

        if hit(&SUMMARY_KEYWORDS) {
            Some(Section::Summary)
        } else if hit(&CLAUSE_KEYWORDS) {
            Some(Section::Clauses)
        } else if hit(&RISK_KEYWORDS) {
            Some(Section::Risks)
        } else if hit(&STEP_KEYWORDS) {
            Some(Section::Steps)
        } else {
            None
        }
    }
}

pub fn is_bullet(line: &str) -> bool {
    line.starts_with(['-', '*', '•'])
        || line.starts_with(MOJIBAKE_BULLET)
        || line.starts_with(char::is_numeric)
}

/// Strip the leading run of bullet glyphs, ASCII digits, periods and spaces.
pub fn strip_bullet(line: &str) -> &str {
    line.trim_start_matches(|c: char| {
        BULLET_CHARS.contains(&c) || c.is_ascii_digit() || c == '.' || c == ' '
    })
}

fn fallback_summary(raw: &str) -> String {
    match raw.char_indices().nth(SUMMARY_FALLBACK_CHARS) {
        Some((idx, _)) => format!("{}...", &raw[..idx]),
        None => raw.to_string(),
    }
}

pub fn structure(raw: &str) -> AnalysisResult {
    let mut summary: Option<String> = None;
    let mut key_clauses = Vec::new();
    let mut risks = Vec::new();
    let mut next_steps = Vec::new();
    let mut current: Option<Section> = None;

    for line in raw.split('\n').map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(section) = Section::from_header(line) {
            current = Some(section);
            continue;
        }

        match current {
            Some(Section::Summary) => {
                if summary.is_none() {
                    summary = Some(line.to_string());
                }
            }
            Some(Section::Clauses) if is_bullet(line) => {
                key_clauses.push(strip_bullet(line).to_string())
            }
            Some(Section::Risks) if is_bullet(line) => risks.push(strip_bullet(line).to_string()),
            Some(Section::Steps) if is_bullet(line) => {
                next_steps.push(strip_bullet(line).to_string())
            }
            _ => {}
        }
    }

    key_clauses.truncate(MAX_KEY_CLAUSES);
    risks.truncate(MAX_RISKS);
    next_steps.truncate(MAX_NEXT_STEPS);

    if key_clauses.is_empty() {
        key_clauses.push(DEFAULT_KEY_CLAUSE.to_string());
    }
    if risks.is_empty() {
        risks.push(DEFAULT_RISK.to_string());
    }
    if next_steps.is_empty() {
        next_steps = DEFAULT_NEXT_STEPS.iter().map(|s| s.to_string()).collect();
    }

    AnalysisResult {
        summary: summary.unwrap_or_else(|| fallback_summary(raw)),
        key_clauses,
        risks,
        next_steps,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
**Summary**
This is a residential lease between Acme Properties and Jane Doe.
It runs for twelve months.

**Key Clauses**
1. Rent of $1,500 due on the first of each month
2. Security deposit of $3,000
- Tenant pays utilities

**Potential Risks**
* Late fees compound daily
* Landlord may enter without notice

**Next Steps**
- Negotiate the entry terms
- Have a lawyer review the deposit terms
";

    #[test]
    fn test_structure_sample_response() {
        let result = structure(SAMPLE);

        assert_eq!(
            result.summary,
            "This is a residential lease between Acme Properties and Jane Doe."
        );
        assert_eq!(
            result.key_clauses,
            vec![
                "Rent of $1,500 due on the first of each month",
                "Security deposit of $3,000",
                "Tenant pays utilities",
            ]
        );
        assert_eq!(
            result.risks,
            vec!["Late fees compound daily", "Landlord may enter without notice"]
        );
        assert_eq!(
            result.next_steps,
            vec!["Negotiate the entry terms", "Have a lawyer review the deposit terms"]
        );
    }

    #[test]
    fn test_only_first_summary_line_kept() {
        let result = structure("Overview\nFirst sentence.\nSecond sentence.");
        assert_eq!(result.summary, "First sentence.");
    }

    #[test]
    fn test_only_bulleted_lines_are_list_items() {
        let result = structure("Risks\n- A\n* B\n3. C\nD");
        assert_eq!(result.risks, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_unicode_and_mojibake_bullets() {
        let raw = format!("Concerns\n• Unicode bullet\n{} Mangled bullet", MOJIBAKE_BULLET);
        let result = structure(&raw);
        assert_eq!(result.risks, vec!["Unicode bullet", "Mangled bullet"]);
    }

    #[test]
    fn test_lists_are_capped() {
        let mut raw = String::from("Key clauses\n");
        for i in 1..=8 {
            raw.push_str(&format!("{}. term {}\n", i, i));
        }
        raw.push_str("Risks\n");
        for i in 1..=8 {
            raw.push_str(&format!("- danger {}\n", i));
        }
        raw.push_str("Next steps\n");
        for i in 1..=8 {
            raw.push_str(&format!("* todo {}\n", i));
        }

        let result = structure(&raw);
        assert_eq!(result.key_clauses.len(), MAX_KEY_CLAUSES);
        assert_eq!(result.risks.len(), MAX_RISKS);
        assert_eq!(result.next_steps.len(), MAX_NEXT_STEPS);
        assert_eq!(result.key_clauses[0], "term 1");
        assert_eq!(result.risks[3], "danger 4");
    }

    #[test]
    fn test_no_headers_uses_defaults() {
        let raw = "x".repeat(250);
        let result = structure(&raw);

        assert_eq!(result.summary, format!("{}...", "x".repeat(200)));
        assert_eq!(result.key_clauses, vec![DEFAULT_KEY_CLAUSE]);
        assert_eq!(result.risks, vec![DEFAULT_RISK]);
        assert_eq!(result.next_steps, DEFAULT_NEXT_STEPS.to_vec());
    }

    #[test]
    fn test_short_raw_text_is_full_fallback_summary() {
        let result = structure("Looks fine to me.");
        assert_eq!(result.summary, "Looks fine to me.");
    }

    #[test]
    fn test_exactly_200_chars_has_no_ellipsis() {
        let raw = "y".repeat(200);
        assert_eq!(structure(&raw).summary, raw);
    }

    #[test]
    fn test_header_keyword_precedence() {
        // "summary" beats "key", "risk" beats "next"
        assert_eq!(Section::from_header("Key summary"), Some(Section::Summary));
        assert_eq!(Section::from_header("Risks and next steps"), Some(Section::Risks));
        assert_eq!(Section::from_header("IMPORTANT POINTS"), Some(Section::Clauses));
        assert_eq!(Section::from_header("Recommended actions"), Some(Section::Steps));
        assert_eq!(Section::from_header("The tenant pays rent."), None);
    }

    #[test]
    fn test_bulleted_header_is_not_content() {
        // The bullet also names a keyword, so it switches section instead
        let result = structure("Risks\n- Major issue with payment terms\n- Deposit is high");
        assert_eq!(result.risks, vec!["Deposit is high"]);
    }

    #[test]
    fn test_content_before_any_header_ignored() {
        let result = structure("- stray bullet\nSummary\nReal content.");
        assert_eq!(result.summary, "Real content.");
        assert_eq!(result.key_clauses, vec![DEFAULT_KEY_CLAUSE]);
    }

    #[test]
    fn test_non_ascii_digit_lines_are_bullets() {
        // Detected as numbered, but only ASCII digits are stripped
        let result = structure("Risks\n\u{663} foo\n\u{b2} bar");
        assert_eq!(result.risks, vec!["\u{663} foo", "\u{b2} bar"]);
        assert!(is_bullet("\u{661}. first"));
        assert_eq!(strip_bullet("\u{661}. first"), "\u{661}. first");
    }

    #[test]
    fn test_strip_bullet() {
        assert_eq!(strip_bullet("12. Twelfth"), "Twelfth");
        assert_eq!(strip_bullet("- * mixed"), "mixed");
        assert_eq!(strip_bullet("plain"), "plain");
    }
}
