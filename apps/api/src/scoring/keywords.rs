//! Keyword extraction — frequency-ranked keyword sets for a resume and a job description.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::scoring::tokenizer::tokenize;

/// Maximum number of keywords kept per ranked list.
pub const KEYWORD_CAP: usize = 40;
/// Maximum number of job-description keywords reported as missing.
pub const MISSING_CAP: usize = 25;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeywordExtraction {
    pub resume_keywords: Vec<String>,
    pub jd_keywords: Vec<String>,
    pub missing_in_resume: Vec<String>,
}

/// Ranks the distinct tokens of `text` by descending frequency.
/// Ties keep first-occurrence order, so identical input always ranks identically.
pub fn rank_keywords(text: &str, cap: usize) -> Vec<String> {
    let tokens = tokenize(text);

    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();
    for token in &tokens {
        let count = counts.entry(token.as_str()).or_insert(0);
        if *count == 0 {
            order.push(token.as_str());
        }
        *count += 1;
    }

    // `sort_by` is stable: equal counts stay in first-seen order.
    order.sort_by(|a, b| counts[b].cmp(&counts[a]));
    order.into_iter().take(cap).map(str::to_string).collect()
}

/// Extracts ranked keywords from both texts and the job-description keywords
/// the resume does not contain.
pub fn extract_keywords(resume_text: &str, jd_text: &str) -> KeywordExtraction {
    let resume_keywords = rank_keywords(resume_text, KEYWORD_CAP);
    let jd_keywords = rank_keywords(jd_text, KEYWORD_CAP);

    let in_resume: HashSet<&str> = resume_keywords.iter().map(String::as_str).collect();
    let missing_in_resume = jd_keywords
        .iter()
        .filter(|k| !in_resume.contains(k.as_str()))
        .take(MISSING_CAP)
        .cloned()
        .collect();

    KeywordExtraction {
        resume_keywords,
        jd_keywords,
        missing_in_resume,
    }
}
