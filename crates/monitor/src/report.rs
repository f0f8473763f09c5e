use tracing::info;
use crate::{
    catalog::{
        FALLBACK_CONDITION, FALLBACK_PATHOGEN, FALLBACK_RECOMMENDATIONS, FALLBACK_RISK_FACTORS,
        REPORT_CATALOG, ReportKeywordEntry,
    },
    random::RandomSource,
    types::{ReportResult, Severity},
};

pub const DEFAULT_PREVIEW_CHARS: usize = 300;
/// Confidence of the generic result when no keyword matched
pub const FALLBACK_CONFIDENCE: f64 = 0.65;

fn to_owned_list(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}

/// First `limit` characters of `text`, with an ellipsis when cut
pub fn text_preview(text: &str, limit: usize) -> String {
    let mut chars = text.char_indices();
    match chars.nth(limit) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// First catalog entry with a keyword contained in `lowercase_text`
pub fn match_condition(lowercase_text: &str) -> Option<&'static ReportKeywordEntry> {
    REPORT_CATALOG.iter().find(|entry| {
        entry
            .keywords
            .iter()
            .any(|keyword| lowercase_text.contains(keyword))
    })
}

/// Keyword classifier for free-text medical reports
#[derive(Debug, Clone)]
pub struct ReportTextClassifier {
    pub preview_chars: usize,
}

impl Default for ReportTextClassifier {
    fn default() -> Self {
        Self {
            preview_chars: DEFAULT_PREVIEW_CHARS,
        }
    }
}

impl ReportTextClassifier {
    pub fn new(preview_chars: usize) -> Self {
        Self { preview_chars }
    }

    /// Classify extracted report text. Draws once, only on a match.
    pub fn classify(&self, text: &str, rng: &mut dyn RandomSource) -> ReportResult {
        let preview = text_preview(text, self.preview_chars);
        let lowercase = text.to_lowercase();

        match match_condition(&lowercase) {
            Some(entry) => {
                info!("📄 Report matched {}", entry.condition);
                ReportResult {
                    primary_condition: entry.condition.to_string(),
                    confidence: 0.85 + rng.next_f64() * 0.1,
                    suspected_pathogen: entry.pathogen.to_string(),
                    severity: entry.severity,
                    risk_factors: to_owned_list(entry.risk_factors),
                    recommendations: to_owned_list(entry.recommendations),
                    extracted_text_preview: preview,
                }
            }
            None => {
                info!("📄 No known condition in report, using general result");
                ReportResult {
                    primary_condition: FALLBACK_CONDITION.to_string(),
                    confidence: FALLBACK_CONFIDENCE,
                    suspected_pathogen: FALLBACK_PATHOGEN.to_string(),
                    severity: Severity::Unknown,
                    risk_factors: to_owned_list(FALLBACK_RISK_FACTORS),
                    recommendations: to_owned_list(FALLBACK_RECOMMENDATIONS),
                    extracted_text_preview: preview,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::ScriptedRandom;

    fn classify(text: &str) -> ReportResult {
        ReportTextClassifier::default().classify(text, &mut ScriptedRandom::constant(0.5))
    }

    #[test]
    fn test_catalog_order_beats_text_order() {
        let result = classify("Findings: Pneumonia suspected, with gastroenteritis on admission.");
        assert_eq!(result.primary_condition, "Gastroenteritis");
        assert_eq!(result.suspected_pathogen, "Norovirus");
        assert_eq!(result.severity, Severity::Moderate);
        assert!((result.confidence - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let result = classify("PATIENT PRESENTS WITH CELLULITIS OF THE LEFT LEG");
        assert_eq!(result.primary_condition, "Skin Infection");
        assert_eq!(result.risk_factors.len(), 4);
    }

    #[test]
    fn test_keywords_match_inside_words() {
        // "routine" contains "uti"
        let result = classify("Routine check");
        assert_eq!(result.primary_condition, "Urinary Tract Infection");
    }

    #[test]
    fn test_empty_text_falls_back() {
        let mut rng = ScriptedRandom::constant(0.5);
        let result = ReportTextClassifier::default().classify("", &mut rng);
        assert_eq!(result.primary_condition, "General Medical Condition");
        assert_eq!(result.confidence, 0.65);
        assert_eq!(result.suspected_pathogen, "Unknown");
        assert_eq!(result.severity, Severity::Unknown);
        assert_eq!(result.risk_factors, vec!["Medical evaluation needed"]);
        assert_eq!(result.extracted_text_preview, "");
        assert_eq!(rng.draws(), 0);
    }

    #[test]
    fn test_preview_is_truncated_on_char_boundaries() {
        assert_eq!(text_preview("abcdef", 3), "abc...");
        assert_eq!(text_preview("abc", 3), "abc");
        assert_eq!(text_preview("ééééé", 2), "éé...");

        let long = "x".repeat(400);
        let result = classify(&long);
        assert_eq!(result.extracted_text_preview.chars().count(), 303);
    }
}
