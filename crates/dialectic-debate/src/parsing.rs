//! Best-effort extraction of scores and verdicts from judge output
//!
//! Judges write free-form text, so every function here is total: malformed
//! input degrades to zero scores or a sentinel verdict instead of an error.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

pub use dialectic_llm::extract_text;

/// Sentinel text when the judge gave no verdict line
pub const NO_VERDICT_FOUND: &str = "No verdict found";
/// Sentinel text when verdict extraction itself failed
pub const VERDICT_PARSE_ERROR: &str = "Error parsing verdict";

const MAX_SCORE: u8 = 10;

/// A scored dimension of the default rubric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Criterion {
    EvidenceQuality,
    LogicalConsistency,
    CounterargumentHandling,
    Clarity,
}

impl Criterion {
    pub const ALL: [Criterion; 4] = [
        Criterion::EvidenceQuality,
        Criterion::LogicalConsistency,
        Criterion::CounterargumentHandling,
        Criterion::Clarity,
    ];

    /// Label the judge writes
    pub fn label(&self) -> &'static str {
        match self {
            Criterion::EvidenceQuality => "Evidence Quality",
            Criterion::LogicalConsistency => "Logical Consistency",
            Criterion::CounterargumentHandling => "Counterargument Handling",
            Criterion::Clarity => "Clarity",
        }
    }

    /// Key used in transcripts
    pub fn key(&self) -> &'static str {
        match self {
            Criterion::EvidenceQuality => "evidence_quality",
            Criterion::LogicalConsistency => "logical_consistency",
            Criterion::CounterargumentHandling => "counterargument_handling",
            Criterion::Clarity => "clarity",
        }
    }
}

/// Scores per criterion, each in `0..=10`; 0 means "not found"
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriteriaScores {
    pub evidence_quality: u8,
    pub logical_consistency: u8,
    pub counterargument_handling: u8,
    pub clarity: u8,
}

impl CriteriaScores {
    pub fn get(&self, criterion: Criterion) -> u8 {
        match criterion {
            Criterion::EvidenceQuality => self.evidence_quality,
            Criterion::LogicalConsistency => self.logical_consistency,
            Criterion::CounterargumentHandling => self.counterargument_handling,
            Criterion::Clarity => self.clarity,
        }
    }

    fn set(&mut self, criterion: Criterion, score: u8) {
        let slot = match criterion {
            Criterion::EvidenceQuality => &mut self.evidence_quality,
            Criterion::LogicalConsistency => &mut self.logical_consistency,
            Criterion::CounterargumentHandling => &mut self.counterargument_handling,
            Criterion::Clarity => &mut self.clarity,
        };
        *slot = score;
    }

    pub fn total(&self) -> u32 {
        Criterion::ALL.iter().map(|c| self.get(*c) as u32).sum()
    }

    /// True when no criterion was found
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

/// Outcome of verdict extraction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Verdict {
    /// Text following the verdict label
    Found { verdict: String },
    /// No verdict line in the judgment
    NotFound,
    /// Extraction failed internally
    ParseError { message: String },
}

impl Verdict {
    pub fn is_found(&self) -> bool {
        matches!(self, Verdict::Found { .. })
    }

    /// Verdict text, or the matching sentinel
    pub fn as_text(&self) -> &str {
        match self {
            Verdict::Found { verdict } => verdict,
            Verdict::NotFound => NO_VERDICT_FOUND,
            Verdict::ParseError { .. } => VERDICT_PARSE_ERROR,
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_text())
    }
}

/// Parsed judge output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgmentResult {
    pub final_judgment: Verdict,
    pub criteria_scores: CriteriaScores,
    /// Unmodified judge response
    pub raw_judgment: String,
    pub judged_at: DateTime<Utc>,
}

fn score_patterns() -> &'static [(Criterion, Option<Regex>); 4] {
    static PATTERNS: OnceLock<[(Criterion, Option<Regex>); 4]> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        Criterion::ALL.map(|criterion| {
            // label, optional bold markers, then `:` or `-` directly before the number
            let pattern = format!(
                r"(?i){}\**[ \t]*[:\-][ \t]*\**[ \t]*(\d+)",
                regex::escape(criterion.label())
            );
            (criterion, Regex::new(&pattern).ok())
        })
    })
}

fn verdict_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"(?im)^[ \t]*(?:VERDICT|Final Verdict)[ \t]*:[ \t]*(.*)$").ok())
        .as_ref()
}

/// Pull the four criterion scores out of judge text.
///
/// Missing criteria stay 0, values above 10 are clamped.
pub fn extract_scores(judgment_text: &str) -> CriteriaScores {
    let mut scores = CriteriaScores::default();

    for (criterion, pattern) in score_patterns() {
        let Some(pattern) = pattern else {
            tracing::warn!(criterion = criterion.label(), "Score pattern unavailable");
            return CriteriaScores::default();
        };

        let score = pattern
            .captures(judgment_text)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<u64>().ok())
            .map(|value| value.min(MAX_SCORE as u64) as u8);

        if let Some(score) = score {
            scores.set(*criterion, score);
        }
    }

    scores
}

/// Find the first `VERDICT:` or `Final Verdict:` line and return the rest of it
pub fn extract_verdict(judgment_text: &str) -> Verdict {
    let Some(pattern) = verdict_pattern() else {
        return Verdict::ParseError {
            message: "verdict pattern unavailable".to_string(),
        };
    };

    pattern
        .captures_iter(judgment_text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .find(|text| !text.is_empty())
        .map(|text| Verdict::Found {
            verdict: text.to_string(),
        })
        .unwrap_or(Verdict::NotFound)
}

/// Parse a full judge response
pub fn parse_judgment(judgment_text: &str) -> JudgmentResult {
    JudgmentResult {
        final_judgment: extract_verdict(judgment_text),
        criteria_scores: extract_scores(judgment_text),
        raw_judgment: judgment_text.to_string(),
        judged_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_scores_partial() {
        let scores = extract_scores("Evidence Quality: 7/10\nClarity: 9");
        assert_eq!(
            scores,
            CriteriaScores {
                evidence_quality: 7,
                logical_consistency: 0,
                counterargument_handling: 0,
                clarity: 9,
            }
        );
    }

    #[test]
    fn test_extract_scores_full_format() {
        let text = "SCORES:\n\
                    Evidence Quality: 8/10\n\
                    Logical Consistency: 6/10\n\
                    Counterargument Handling: 5/10\n\
                    Clarity: 7/10\n";
        let scores = extract_scores(text);
        assert_eq!(scores.evidence_quality, 8);
        assert_eq!(scores.logical_consistency, 6);
        assert_eq!(scores.counterargument_handling, 5);
        assert_eq!(scores.clarity, 7);
        assert_eq!(scores.total(), 26);
    }

    #[test]
    fn test_extract_scores_tolerates_markdown_and_case() {
        let scores = extract_scores("**evidence quality**: 6 / 10\n- CLARITY - 4");
        assert_eq!(scores.evidence_quality, 6);
        assert_eq!(scores.clarity, 4);
    }

    #[test]
    fn test_extract_scores_skips_label_without_number() {
        let text = "Evidence Quality: strong overall\nEvidence Quality: 5/10";
        assert_eq!(extract_scores(text).evidence_quality, 5);
    }

    #[test]
    fn test_extract_scores_ignores_numbers_in_prose() {
        let text = "Agent A showed more clarity in round 2.\nClarity: 8/10";
        assert_eq!(extract_scores(text).clarity, 8);
        assert_eq!(extract_scores("Clarity improved by round 3").clarity, 0);
    }

    #[test]
    fn test_extract_scores_clamps() {
        assert_eq!(extract_scores("Clarity: 12/10").clarity, 10);
        assert_eq!(extract_scores("Clarity: 99999999999999999999999").clarity, 0);
    }

    #[test]
    fn test_extract_scores_garbage() {
        assert!(extract_scores("").is_empty());
        assert!(extract_scores("no scores at all \u{1F600}").is_empty());
    }

    #[test]
    fn test_extract_verdict() {
        let text = "SCORES: ...\nVERDICT: Agent A wins on evidence.\nMore analysis.";
        assert_eq!(
            extract_verdict(text),
            Verdict::Found {
                verdict: "Agent A wins on evidence.".to_string()
            }
        );
    }

    #[test]
    fn test_extract_verdict_final_verdict_case_insensitive() {
        let verdict = extract_verdict("final verdict:   Agent B, opposing  ");
        assert_eq!(verdict.as_text(), "Agent B, opposing");
    }

    #[test]
    fn test_extract_verdict_missing() {
        assert_eq!(extract_verdict("no verdict here"), Verdict::NotFound);
        assert_eq!(extract_verdict("no verdict here").as_text(), NO_VERDICT_FOUND);
    }

    #[test]
    fn test_extract_verdict_requires_line_start() {
        assert_eq!(
            extract_verdict("The judge's VERDICT: hidden mid-line"),
            Verdict::NotFound
        );
    }

    #[test]
    fn test_extract_verdict_skips_empty_label() {
        let text = "VERDICT:\nVERDICT: Agent B (opposing)";
        assert_eq!(extract_verdict(text).as_text(), "Agent B (opposing)");
    }

    #[test]
    fn test_sentinels_distinct() {
        let parse_error = Verdict::ParseError {
            message: "x".to_string(),
        };
        assert_ne!(parse_error.as_text(), Verdict::NotFound.as_text());
        assert_ne!(parse_error, Verdict::NotFound);
    }

    #[test]
    fn test_verdict_serialization() {
        let found = Verdict::Found {
            verdict: "Agent A".to_string(),
        };
        assert_eq!(
            serde_json::to_string(&found).unwrap(),
            r#"{"status":"found","verdict":"Agent A"}"#
        );
        assert_eq!(
            serde_json::to_string(&Verdict::NotFound).unwrap(),
            r#"{"status":"not_found"}"#
        );
    }

    #[test]
    fn test_parse_judgment_keeps_raw() {
        let result = parse_judgment("Clarity: 3\nVERDICT: tie");
        assert_eq!(result.criteria_scores.clarity, 3);
        assert_eq!(result.final_judgment.as_text(), "tie");
        assert_eq!(result.raw_judgment, "Clarity: 3\nVERDICT: tie");
    }

    #[test]
    fn test_parsers_are_total_over_arbitrary_text() {
        let samples = [
            "",
            "\n\n\n",
            "VERDICT",
            ":::: / 10",
            "Evidence Quality: -3/10",
            "Clarity: /10",
            "Logical Consistency:\n7",
            "\u{0}\u{FFFF}VERDICT:\u{200B}",
        ];
        for sample in samples {
            let result = parse_judgment(sample);
            assert!(Criterion::ALL
                .iter()
                .all(|c| result.criteria_scores.get(*c) <= MAX_SCORE));
            assert!(!matches!(result.final_judgment, Verdict::ParseError { .. }));
        }
    }
}
