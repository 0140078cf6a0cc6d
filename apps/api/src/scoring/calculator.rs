//! Score Calculator — blends keyword coverage and content quality into a 0–100 fit score.
//!
//! Sub-scores (each 0–100):
//! - `keyword_match`: weighted share of job keywords found in the resume
//!   (primary keywords count double). `None` when there is no keyword context.
//! - `completeness`: required sections present (contact, summary, experience, education, skills)
//! - `impact`: share of experience bullets carrying a quantified outcome
//! - `action_verbs`: share of experience bullets opening with a strong verb
//!
//! The calculator is pure; identical inputs always produce an identical breakdown.

use serde::{Deserialize, Serialize};

use crate::models::resume::ResumeData;
use crate::scoring::keywords::{extract_keywords, MISSING_CAP};

// ────────────────────────────────────────────────────────────────────────────
// Weights
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub keywords: f64,
    pub completeness: f64,
    pub impact: f64,
    pub action_verbs: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            keywords: 0.40,
            completeness: 0.30,
            impact: 0.20,
            action_verbs: 0.10,
        }
    }
}

const PRIMARY_KEYWORD_WEIGHT: f64 = 2.0;
const SECONDARY_KEYWORD_WEIGHT: f64 = 1.0;

/// Minimum summary length (chars) that counts as a real summary.
pub const SUMMARY_MIN_CHARS: usize = 20;

/// (section, points) — points sum to 100.
const COMPLETENESS_POINTS: &[(Section, u32)] = &[
    (Section::Contact, 15),
    (Section::Summary, 20),
    (Section::Experience, 30),
    (Section::Education, 15),
    (Section::Skills, 20),
];

pub const STRONG_VERBS: &[&str] = &[
    "architected", "automated", "built", "created", "cut", "delivered", "designed", "developed",
    "drove", "engineered", "established", "implemented", "improved", "increased", "launched",
    "led", "managed", "mentored", "migrated", "optimized", "owned", "reduced", "refactored",
    "scaled", "shipped", "spearheaded", "streamlined", "grew", "negotiated", "resolved",
];

// ────────────────────────────────────────────────────────────────────────────
// Output models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Contact,
    Summary,
    Experience,
    Education,
    Skills,
}

impl Section {
    pub fn label(&self) -> &'static str {
        match self {
            Section::Contact => "contact details (name and email)",
            Section::Summary => "a professional summary",
            Section::Experience => "experience with described responsibilities",
            Section::Education => "education",
            Section::Skills => "a skills list",
        }
    }
}

/// Where the keywords used for `keyword_match` came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordSource {
    Provided,
    JobDescription,
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub overall: u32,
    pub keyword_match: Option<u32>,
    pub completeness: u32,
    pub impact: u32,
    pub action_verbs: u32,
    pub matched_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
    /// Missing keywords flagged as must-haves, in keyword order.
    pub missing_primary: Vec<String>,
    pub missing_sections: Vec<Section>,
    pub keyword_source: KeywordSource,
}

// ────────────────────────────────────────────────────────────────────────────
// Keyword context
// ────────────────────────────────────────────────────────────────────────────

/// The keyword list a resume is scored against, with must-haves marked.
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordContext {
    pub keywords: Vec<String>,
    pub primary: Vec<String>,
    pub source: KeywordSource,
}

fn normalize_keywords(raw: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for kw in raw {
        let kw = kw.trim().to_lowercase();
        if !kw.is_empty() && !out.contains(&kw) {
            out.push(kw);
        }
    }
    out
}

/// Strips sentence punctuation the tokenizer keeps (`rust.` → `rust`) so mined
/// terms can match the resume. Dedupes after trimming and caps at `MISSING_CAP`.
fn mined_terms(ranked: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for term in ranked {
        let term = term.trim_matches(|c: char| matches!(c, '.' | '/' | '-'));
        if !term.is_empty() && !out.iter().any(|t| t == term) {
            out.push(term.to_string());
        }
        if out.len() == MISSING_CAP {
            break;
        }
    }
    out
}

impl KeywordContext {
    /// Supplied keywords win; otherwise keywords are mined from the job
    /// description; otherwise there is no keyword context.
    pub fn resolve(
        job_description: Option<&str>,
        extracted_keywords: Option<&[String]>,
        primary_keywords: Option<&[String]>,
    ) -> Self {
        let provided = extracted_keywords.map(normalize_keywords).unwrap_or_default();

        let (keywords, source) = if !provided.is_empty() {
            (provided, KeywordSource::Provided)
        } else {
            match job_description.filter(|jd| !jd.trim().is_empty()) {
                Some(jd) => {
                    let mined = mined_terms(extract_keywords("", jd).jd_keywords);
                    if mined.is_empty() {
                        (mined, KeywordSource::None)
                    } else {
                        (mined, KeywordSource::JobDescription)
                    }
                }
                None => (Vec::new(), KeywordSource::None),
            }
        };

        let primary = primary_keywords
            .map(normalize_keywords)
            .unwrap_or_default()
            .into_iter()
            .filter(|p| keywords.contains(p))
            .collect();

        Self {
            keywords,
            primary,
            source,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    pub fn is_primary(&self, keyword: &str) -> bool {
        self.primary.iter().any(|p| p == keyword)
    }
}

/// Case-insensitive term match: `needle` must occur in `haystack` (already
/// lowercase) with no alphanumeric character directly on either side.
pub fn contains_term(haystack: &str, needle: &str) -> bool {
    let needle = needle.trim().to_lowercase();
    if needle.is_empty() {
        return false;
    }
    haystack.match_indices(needle.as_str()).any(|(start, m)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + m.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Sub-scores
// ────────────────────────────────────────────────────────────────────────────

struct KeywordCoverage {
    score: u32,
    matched: Vec<String>,
    missing: Vec<String>,
    missing_primary: Vec<String>,
}

fn score_keywords(haystack: &str, ctx: &KeywordContext) -> KeywordCoverage {
    let mut matched = Vec::new();
    let mut missing = Vec::new();
    let mut missing_primary = Vec::new();
    let mut total_weight = 0.0_f64;
    let mut matched_weight = 0.0_f64;

    for kw in &ctx.keywords {
        let weight = if ctx.is_primary(kw) {
            PRIMARY_KEYWORD_WEIGHT
        } else {
            SECONDARY_KEYWORD_WEIGHT
        };
        total_weight += weight;

        if contains_term(haystack, kw) {
            matched_weight += weight;
            matched.push(kw.clone());
        } else {
            if ctx.is_primary(kw) {
                missing_primary.push(kw.clone());
            }
            missing.push(kw.clone());
        }
    }

    KeywordCoverage {
        score: to_percent(matched_weight, total_weight),
        matched,
        missing,
        missing_primary,
    }
}

fn section_present(resume: &ResumeData, section: Section) -> bool {
    match section {
        Section::Contact => resume.has_contact(),
        Section::Summary => resume.has_summary(SUMMARY_MIN_CHARS),
        Section::Experience => resume.has_described_experience(),
        Section::Education => resume
            .education
            .iter()
            .any(|e| !e.institution.trim().is_empty() || !e.degree.trim().is_empty()),
        Section::Skills => resume.has_skills(),
    }
}

fn score_completeness(resume: &ResumeData) -> (u32, Vec<Section>) {
    let mut score = 0;
    let mut missing = Vec::new();
    for (section, points) in COMPLETENESS_POINTS {
        if section_present(resume, *section) {
            score += points;
        } else {
            missing.push(*section);
        }
    }
    (score.min(100), missing)
}

/// True when a bullet states a measurable outcome.
pub fn is_quantified(bullet: &str) -> bool {
    bullet.chars().any(|c| c.is_ascii_digit() || matches!(c, '%' | '$' | '€' | '£'))
}

/// True when the bullet's first word is a strong action verb.
pub fn starts_with_strong_verb(bullet: &str) -> bool {
    bullet
        .trim_start_matches(|c: char| !c.is_alphanumeric())
        .split_whitespace()
        .next()
        .map(|w| {
            w.trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .is_some_and(|w| STRONG_VERBS.contains(&w.as_str()))
}

fn bullet_share(resume: &ResumeData, predicate: fn(&str) -> bool) -> u32 {
    let (hits, total) = resume
        .bullets()
        .fold((0usize, 0usize), |(hits, total), b| {
            (hits + usize::from(predicate(b)), total + 1)
        });
    to_percent(hits as f64, total as f64)
}

fn to_percent(part: f64, whole: f64) -> u32 {
    if whole <= 0.0 {
        return 0;
    }
    ((part / whole) * 100.0).round().clamp(0.0, 100.0) as u32
}

// ────────────────────────────────────────────────────────────────────────────
// Entry point
// ────────────────────────────────────────────────────────────────────────────

/// Scores a resume against optional job context with the default weights.
pub fn calculate_resume_score(
    resume: &ResumeData,
    job_description: Option<&str>,
    extracted_keywords: Option<&[String]>,
    primary_keywords: Option<&[String]>,
) -> ScoreBreakdown {
    let ctx = KeywordContext::resolve(job_description, extracted_keywords, primary_keywords);
    score_with_context(resume, &ctx, &ScoreWeights::default())
}

pub fn score_with_context(
    resume: &ResumeData,
    ctx: &KeywordContext,
    weights: &ScoreWeights,
) -> ScoreBreakdown {
    let (completeness, missing_sections) = score_completeness(resume);
    let impact = bullet_share(resume, is_quantified);
    let action_verbs = bullet_share(resume, starts_with_strong_verb);

    let coverage = if ctx.is_empty() {
        None
    } else {
        Some(score_keywords(&resume.searchable_text(), ctx))
    };

    let mut weighted = weights.completeness * completeness as f64
        + weights.impact * impact as f64
        + weights.action_verbs * action_verbs as f64;
    let mut total_weight = weights.completeness + weights.impact + weights.action_verbs;
    if let Some(coverage) = &coverage {
        weighted += weights.keywords * coverage.score as f64;
        total_weight += weights.keywords;
    }

    let overall = if total_weight > 0.0 {
        (weighted / total_weight).round().clamp(0.0, 100.0) as u32
    } else {
        0
    };

    tracing::debug!(
        overall,
        completeness,
        impact,
        action_verbs,
        keyword_source = ?ctx.source,
        "Resume scored"
    );

    let (keyword_match, matched_keywords, missing_keywords, missing_primary) = match coverage {
        Some(c) => (Some(c.score), c.matched, c.missing, c.missing_primary),
        None => (None, Vec::new(), Vec::new(), Vec::new()),
    };

    ScoreBreakdown {
        overall,
        keyword_match,
        completeness,
        impact,
        action_verbs,
        matched_keywords,
        missing_keywords,
        missing_primary,
        missing_sections,
        keyword_source: ctx.source,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{EducationEntry, ExperienceEntry, PersonalInfo};

    const KEYWORDS: [&str; 10] = [
        "rust", "kubernetes", "kafka", "postgresql", "grpc", "terraform", "prometheus", "redis",
        "docker", "graphql",
    ];

    fn keywords() -> Vec<String> {
        KEYWORDS.iter().map(|s| s.to_string()).collect()
    }

    fn primary() -> Vec<String> {
        vec!["rust".to_string(), "kubernetes".to_string()]
    }

    fn full_resume(skills: Vec<String>) -> ResumeData {
        ResumeData {
            personal_info: PersonalInfo {
                full_name: "Ada Lovelace".to_string(),
                email: "ada@example.com".to_string(),
                ..Default::default()
            },
            summary: Some("Backend engineer focused on reliable data platforms.".to_string()),
            experience: vec![ExperienceEntry {
                company: "Analytical Engines".to_string(),
                title: "Senior Engineer".to_string(),
                descriptions: vec![
                    "Built ingestion services handling 2M events/day".to_string(),
                    "Reduced p99 latency by 40%".to_string(),
                    "Worked on internal tooling".to_string(),
                ],
                ..Default::default()
            }],
            education: vec![EducationEntry {
                institution: "University of London".to_string(),
                degree: "BSc Mathematics".to_string(),
                ..Default::default()
            }],
            skills,
            ..Default::default()
        }
    }

    #[test]
    fn test_score_is_pure() {
        let resume = full_resume(keywords());
        let jd = "Rust engineer with Kafka";
        let (kws, primary) = (keywords(), primary());
        let a = calculate_resume_score(&resume, Some(jd), Some(&kws[..]), Some(&primary[..]));
        let b = calculate_resume_score(&resume, Some(jd), Some(&kws[..]), Some(&primary[..]));
        assert_eq!(a, b);
    }

    #[test]
    fn test_present_keywords_beat_absent_keywords() {
        let jd = "Rust, Kubernetes and Kafka platform role";
        let with = full_resume(keywords());
        let without = full_resume(vec!["Excel".to_string()]);

        let (kws, must_have) = (keywords(), primary());

        let hi = calculate_resume_score(&with, Some(jd), Some(&kws[..]), Some(&must_have[..]));
        let lo = calculate_resume_score(&without, Some(jd), Some(&kws[..]), Some(&must_have[..]));
        assert_eq!(hi.keyword_match, Some(100));
        assert_eq!(lo.keyword_match, Some(0));
        assert!(hi.overall > lo.overall, "{} vs {}", hi.overall, lo.overall);
        assert_eq!(lo.missing_primary, primary());
    }

    #[test]
    fn test_primary_keywords_weigh_double() {
        let resume = full_resume(vec!["rust".to_string()]);
        let kws = vec!["rust".to_string(), "kafka".to_string()];
        let flat = calculate_resume_score(&resume, None, Some(kws.as_slice()), None);
        let primary = vec!["rust".to_string()];
        let tiered =
            calculate_resume_score(&resume, None, Some(kws.as_slice()), Some(primary.as_slice()));
        assert_eq!(flat.keyword_match, Some(50));
        // 2 / (2 + 1)
        assert_eq!(tiered.keyword_match, Some(67));
    }

    #[test]
    fn test_no_keyword_context_falls_back_to_content_scoring() {
        let resume = full_resume(vec!["Rust".to_string()]);
        let breakdown = calculate_resume_score(&resume, None, None, None);
        assert_eq!(breakdown.keyword_match, None);
        assert_eq!(breakdown.keyword_source, KeywordSource::None);
        assert!(breakdown.missing_keywords.is_empty());

        assert_eq!(breakdown.completeness, 100);
        assert_eq!(breakdown.impact, 67);
        assert_eq!(breakdown.action_verbs, 67);
        let expected =
            ((0.30_f64 * 100.0 + 0.20 * 67.0 + 0.10 * 67.0) / (0.30 + 0.20 + 0.10)).round();
        assert_eq!(breakdown.overall, expected as u32);
    }

    #[test]
    fn test_blank_job_description_and_empty_lists_mean_no_context() {
        let resume = full_resume(vec![]);
        let empty: Vec<String> = vec![];
        let breakdown =
            calculate_resume_score(&resume, Some("   "), Some(&empty[..]), Some(&empty[..]));
        assert_eq!(breakdown.keyword_source, KeywordSource::None);
        assert_eq!(breakdown.keyword_match, None);
    }

    #[test]
    fn test_keywords_mined_from_job_description() {
        let resume = full_resume(vec!["Kafka".to_string()]);
        let breakdown = calculate_resume_score(
            &resume,
            Some("Kafka Kafka Terraform"),
            None,
            None,
        );
        assert_eq!(breakdown.keyword_source, KeywordSource::JobDescription);
        assert_eq!(breakdown.matched_keywords, vec!["kafka".to_string()]);
        assert_eq!(breakdown.missing_keywords, vec!["terraform".to_string()]);
        assert_eq!(breakdown.keyword_match, Some(50));
    }

    #[test]
    fn test_sentence_ending_job_keywords_still_match() {
        let resume = ResumeData {
            skills: vec!["Rust".to_string(), "Kafka".to_string()],
            ..Default::default()
        };
        let breakdown =
            calculate_resume_score(&resume, Some("We need Rust. Must know Kafka."), None, None);
        assert_eq!(breakdown.keyword_source, KeywordSource::JobDescription);
        assert_eq!(
            breakdown.matched_keywords,
            vec!["rust".to_string(), "kafka".to_string()]
        );
        assert!(breakdown.missing_keywords.is_empty());
        assert_eq!(breakdown.keyword_match, Some(100));
    }

    #[test]
    fn test_mined_terms_trim_and_dedupe() {
        let ranked = ["rust.", "rust", "ci/cd", "-", "node.js", "front-end/"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(
            mined_terms(ranked),
            vec!["rust", "ci/cd", "node.js", "front-end"]
        );
    }

    #[test]
    fn test_empty_resume_scores_zero() {
        let breakdown = calculate_resume_score(&ResumeData::default(), None, None, None);
        assert_eq!(breakdown.overall, 0);
        assert_eq!(breakdown.missing_sections.len(), COMPLETENESS_POINTS.len());
    }

    #[test]
    fn test_overall_bounded() {
        let resume = full_resume(keywords());
        let breakdown = calculate_resume_score(&resume, None, Some(keywords().as_slice()), None);
        assert!(breakdown.overall <= 100);
    }

    #[test]
    fn test_primary_outside_keywords_is_ignored() {
        let ctx = KeywordContext::resolve(
            None,
            Some(&["Rust".to_string(), " SQL ".to_string(), "rust".to_string()][..]),
            Some(&["go".to_string(), "RUST".to_string()][..]),
        );
        assert_eq!(ctx.keywords, vec!["rust".to_string(), "sql".to_string()]);
        assert_eq!(ctx.primary, vec!["rust".to_string()]);
        assert_eq!(ctx.source, KeywordSource::Provided);
    }

    #[test]
    fn test_contains_term_respects_boundaries() {
        assert!(contains_term("rust, go and c++", "Rust"));
        assert!(contains_term("rust, go and c++", "c++"));
        assert!(contains_term("ci/cd pipelines", "ci/cd"));
        assert!(!contains_term("good engineer", "go"));
        assert!(!contains_term("trusted", "rust"));
        assert!(!contains_term("anything", ""));
    }

    #[test]
    fn test_bullet_predicates() {
        assert!(is_quantified("Cut costs by $20k"));
        assert!(is_quantified("Grew revenue 3x"));
        assert!(!is_quantified("Helped the team"));
        assert!(starts_with_strong_verb("Led a migration"));
        assert!(starts_with_strong_verb("• Shipped v2"));
        assert!(!starts_with_strong_verb("Responsible for on-call"));
        assert!(!starts_with_strong_verb(""));
    }
}
