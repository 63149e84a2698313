//! Filename-based domain classification.
//!
//! The pipeline does not report which domain a file landed in, so the
//! monitor infers it from the filename alone: a case-insensitive substring
//! test against per-domain keyword tables, checked in a fixed priority
//! order. Classification always resolves; anything that matches nothing
//! falls back to [`Domain::Mind`] with reduced confidence. The function is
//! deterministic and has no side effects.

use crate::models::Domain;

/// Confidence assigned when no keyword matched and the Mind fallback applies.
pub const FALLBACK_CONFIDENCE: f64 = 0.75;

// Keyword tables, checked in priority order: governance wins over
// operational, operational over personal, personal over technical. A
// filename like "security_log.md" is Soul, not Body.
const SOUL_KEYWORDS: &[&str] = &["security", "audit", "compliance", "policy", "governance", "soul"];
const BODY_KEYWORDS: &[&str] = &["log", "telemetry", "metric", "system", "performance", "body"];
const HEART_KEYWORDS: &[&str] = &["user", "persona", "preference", "feedback", "heart"];
const MIND_KEYWORDS: &[&str] = &["spec", "api", "config", "manual", "guide", "mind", "tech", "code"];

/// Result of classifying one filename.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    pub domain: Domain,
    pub confidence: f64,
}

/// Classify a bare filename into a knowledge domain.
///
/// # Arguments
/// * `file_name` - Basename of the file (callers strip any path first)
///
/// # Returns
/// The matched domain and the confidence of the match. Always resolves;
/// unmatched names default to `(Mind, 0.75)`.
///
/// # Examples
/// ```
/// use ingestwatch::models::Domain;
/// use ingestwatch::services::classification::classify_file;
///
/// let c = classify_file("Security_Audit.md");
/// assert_eq!(c.domain, Domain::Soul);
/// ```
pub fn classify_file(file_name: &str) -> Classification {
    let name = file_name.to_lowercase();

    let tables: [(&[&str], Domain, f64); 4] = [
        (SOUL_KEYWORDS, Domain::Soul, 0.95),
        (BODY_KEYWORDS, Domain::Body, 0.92),
        (HEART_KEYWORDS, Domain::Heart, 0.90),
        (MIND_KEYWORDS, Domain::Mind, 0.93),
    ];

    for (keywords, domain, confidence) in tables {
        if keywords.iter().any(|keyword| name.contains(keyword)) {
            return Classification { domain, confidence };
        }
    }

    Classification {
        domain: Domain::Mind,
        confidence: FALLBACK_CONFIDENCE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_soul_keywords() {
        for name in [
            "security_scan.md",
            "Q3_AUDIT_report.pdf",
            "compliance-checklist.txt",
            "data_policy.yaml",
            "governance_notes.md",
        ] {
            let c = classify_file(name);
            assert_eq!(c.domain, Domain::Soul, "{name}");
            assert_eq!(c.confidence, 0.95);
        }
    }

    #[test]
    fn test_body_keywords() {
        for name in ["access_log.txt", "telemetry_dump.json", "system_metrics.csv"] {
            let c = classify_file(name);
            assert_eq!(c.domain, Domain::Body, "{name}");
            assert_eq!(c.confidence, 0.92);
        }
    }

    #[test]
    fn test_heart_keywords() {
        for name in ["user_interview.md", "persona_sketches.txt", "feedback_2024.csv"] {
            let c = classify_file(name);
            assert_eq!(c.domain, Domain::Heart, "{name}");
            assert_eq!(c.confidence, 0.90);
        }
    }

    #[test]
    fn test_mind_keywords() {
        for name in ["api_reference.md", "install_guide.txt", "protocol_spec.rst"] {
            let c = classify_file(name);
            assert_eq!(c.domain, Domain::Mind, "{name}");
            assert_eq!(c.confidence, 0.93);
        }
    }

    #[test]
    fn test_fallback_to_mind() {
        let c = classify_file("notes.md");
        assert_eq!(c.domain, Domain::Mind);
        assert_eq!(c.confidence, FALLBACK_CONFIDENCE);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(classify_file("SECURITY.md").domain, Domain::Soul);
        assert_eq!(classify_file("Telemetry.json").domain, Domain::Body);
    }

    #[test]
    fn test_priority_soul_beats_body() {
        // "security_log" matches both Soul ("security") and Body ("log").
        let c = classify_file("security_log.md");
        assert_eq!(c.domain, Domain::Soul);
        assert_eq!(c.confidence, 0.95);
    }

    #[test]
    fn test_priority_body_beats_heart() {
        // "user" (Heart) and "log" (Body) both match; Body is checked first.
        let c = classify_file("user_log.txt");
        assert_eq!(c.domain, Domain::Body);
    }

    #[test]
    fn test_idempotent_classification() {
        let first = classify_file("Security_Audit.md");
        let second = classify_file("Security_Audit.md");
        assert_eq!(first, second);
        assert_eq!(first.domain, Domain::Soul);
        assert_eq!(first.confidence, 0.95);
    }

    proptest! {
        #[test]
        fn prop_total_and_bounded(name in ".*") {
            let c = classify_file(&name);
            prop_assert!((0.0..=1.0).contains(&c.confidence));
        }

        #[test]
        fn prop_deterministic(name in ".*") {
            prop_assert_eq!(classify_file(&name), classify_file(&name));
        }

        #[test]
        fn prop_security_is_always_soul(prefix in "[a-z]{0,8}", suffix in "[a-z]{0,8}") {
            let name = format!("{prefix}security{suffix}");
            let c = classify_file(&name);
            prop_assert_eq!(c.domain, Domain::Soul);
            prop_assert_eq!(c.confidence, 0.95);
        }
    }
}
