//! Checklist — turns scoring gaps into ordered, actionable suggestions.

use serde::{Deserialize, Serialize};

use crate::models::resume::ResumeData;
use crate::scoring::calculator::{
    is_quantified, starts_with_strong_verb, KeywordContext, ScoreBreakdown, Section,
};

const KEYWORD_TARGET: u32 = 70;
const COMPLETENESS_TARGET: u32 = 100;
const IMPACT_TARGET: u32 = 60;
const ACTION_VERB_TARGET: u32 = 60;

/// How many missing terms are named in a single item.
const NAMED_TERMS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Keywords,
    Completeness,
    Impact,
    ActionVerbs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    fn for_gap(score: u32, target: u32) -> Self {
        if score * 2 < target {
            Priority::High
        } else if (score as f64) < target as f64 * 0.85 {
            Priority::Medium
        } else {
            Priority::Low
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: String,
    pub dimension: Dimension,
    pub title: String,
    pub detail: String,
    pub score: u32,
    pub target: u32,
    pub priority: Priority,
}

/// Builds the checklist for a scored resume. One item per dimension below its
/// target, lowest score first; ties follow dimension order.
pub fn generate_checklist(
    resume: &ResumeData,
    scores: &ScoreBreakdown,
    job_description: Option<&str>,
    extracted_keywords: Option<&[String]>,
    primary_keywords: Option<&[String]>,
) -> Vec<ChecklistItem> {
    let ctx = KeywordContext::resolve(job_description, extracted_keywords, primary_keywords);
    let mut items = Vec::new();

    if let Some(item) = keyword_item(scores, &ctx) {
        items.push(item);
    }
    if scores.completeness < COMPLETENESS_TARGET {
        items.push(completeness_item(scores));
    }
    if scores.impact < IMPACT_TARGET {
        items.push(impact_item(resume, scores.impact));
    }
    if scores.action_verbs < ACTION_VERB_TARGET {
        items.push(action_verb_item(resume, scores.action_verbs));
    }

    items.sort_by_key(|item| (item.score, item.dimension));
    items
}

fn keyword_item(scores: &ScoreBreakdown, ctx: &KeywordContext) -> Option<ChecklistItem> {
    let score = scores.keyword_match?;
    if score >= KEYWORD_TARGET || ctx.is_empty() {
        return None;
    }

    let total = ctx.keywords.len();
    let target_matches = (total * KEYWORD_TARGET as usize).div_ceil(100);
    let needed = target_matches
        .saturating_sub(scores.matched_keywords.len())
        .max(1);

    // must-haves first, then the rest in keyword order
    let named: Vec<&str> = scores
        .missing_primary
        .iter()
        .chain(
            scores
                .missing_keywords
                .iter()
                .filter(|k| !scores.missing_primary.contains(k)),
        )
        .take(NAMED_TERMS)
        .map(String::as_str)
        .collect();

    let mut detail = format!(
        "Your resume matches {} of {} job keywords. Work in terms such as: {}.",
        scores.matched_keywords.len(),
        total,
        named.join(", ")
    );
    if !scores.missing_primary.is_empty() {
        detail.push_str(&format!(
            " {} must-have keyword(s) are missing.",
            scores.missing_primary.len()
        ));
    }

    Some(ChecklistItem {
        id: "keywords".to_string(),
        dimension: Dimension::Keywords,
        title: format!("Include {needed} more matched keywords from the job description"),
        detail,
        score,
        target: KEYWORD_TARGET,
        priority: Priority::for_gap(score, KEYWORD_TARGET),
    })
}

fn completeness_item(scores: &ScoreBreakdown) -> ChecklistItem {
    let labels: Vec<&str> = scores.missing_sections.iter().map(Section::label).collect();
    let title = match scores.missing_sections.as_slice() {
        [only] => format!("Add {}", only.label()),
        _ => format!("Fill in {} missing resume sections", scores.missing_sections.len()),
    };

    ChecklistItem {
        id: "completeness".to_string(),
        dimension: Dimension::Completeness,
        title,
        detail: format!("Missing: {}.", labels.join("; ")),
        score: scores.completeness,
        target: COMPLETENESS_TARGET,
        priority: Priority::for_gap(scores.completeness, COMPLETENESS_TARGET),
    }
}

fn impact_item(resume: &ResumeData, score: u32) -> ChecklistItem {
    let total = resume.bullets().count();
    let unquantified = resume.bullets().filter(|b| !is_quantified(b)).count();
    let detail = if total == 0 {
        "Add experience bullets that state measurable outcomes (numbers, %, $, time saved)."
            .to_string()
    } else {
        format!(
            "{unquantified} of {total} experience bullets have no measurable outcome. \
             Add numbers, percentages, or time saved."
        )
    };

    ChecklistItem {
        id: "impact".to_string(),
        dimension: Dimension::Impact,
        title: "Add metrics to experience bullets".to_string(),
        detail,
        score,
        target: IMPACT_TARGET,
        priority: Priority::for_gap(score, IMPACT_TARGET),
    }
}

fn action_verb_item(resume: &ResumeData, score: u32) -> ChecklistItem {
    let weak: Vec<&str> = resume
        .bullets()
        .filter(|b| !starts_with_strong_verb(b))
        .take(2)
        .collect();
    let detail = if weak.is_empty() {
        "Open each experience bullet with a strong action verb (Built, Led, Reduced, Shipped)."
            .to_string()
    } else {
        format!(
            "Rewrite bullets such as \"{}\" to open with a strong action verb \
             (Built, Led, Reduced, Shipped).",
            weak.join("\", \"")
        )
    };

    ChecklistItem {
        id: "action_verbs".to_string(),
        dimension: Dimension::ActionVerbs,
        title: "Start bullets with strong action verbs".to_string(),
        detail,
        score,
        target: ACTION_VERB_TARGET,
        priority: Priority::for_gap(score, ACTION_VERB_TARGET),
    }
}
