//! ATS rubric scorer — scores a resume's keywords, format, sections, and
//! content against a fixed weighted rubric, emulating automated resume
//! screeners. Pure and deterministic; no collaborator calls.

pub mod handlers;

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::skills;
use crate::skills::vocab;

pub const KEYWORDS_WEIGHT: f64 = 0.40;
pub const FORMAT_WEIGHT: f64 = 0.25;
pub const SECTIONS_WEIGHT: f64 = 0.20;
pub const CONTENT_WEIGHT: f64 = 0.15;

/// Share of the vocabulary a role-less resume must cover for a full keyword
/// score. Matching 10% of all known skills is already an unusually broad
/// resume.
const GENERAL_COVERAGE_TARGET: f64 = 0.10;

/// Resume data accepted by the scorer. Every field except one of
/// `text`/`skills` is optional; absent data scores its component 0.
#[derive(Debug, Clone, Deserialize)]
pub struct ResumeInput {
    pub text: Option<String>,
    pub skills: Option<Vec<String>>,
    /// Explicit section names when the caller already segmented the document.
    /// When absent, sections are detected from cue words in the text.
    pub sections_present: Option<Vec<String>>,
    pub target_role: Option<String>,
}

/// One weighted rubric component. All four weights sum to 1.0.
#[derive(Debug, Clone, Serialize)]
pub struct RubricComponent {
    pub name: &'static str,
    pub weight: f64,
    pub score: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct KeywordAnalysis {
    pub found: Vec<String>,
    pub missing: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AtsReport {
    pub overall: f64,
    pub status: &'static str,
    pub breakdown: Vec<RubricComponent>,
    pub keywords: KeywordAnalysis,
    pub flagged_phrases: Vec<String>,
}

const ACTION_VERBS: &[&str] = &[
    "led",
    "developed",
    "achieved",
    "managed",
    "created",
    "implemented",
    "designed",
    "launched",
    "improved",
    "increased",
    "reduced",
    "built",
    "delivered",
    "automated",
    "optimized",
    "spearheaded",
];

const GENERIC_PHRASES: &[&str] = &[
    "team player",
    "hard worker",
    "go-getter",
    "think outside the box",
    "self-starter",
    "detail oriented",
    "results driven",
    "synergy",
    "dynamic individual",
    "proactive attitude",
];

const SECTION_CUES: &[(&str, &[&str])] = &[
    (
        "contact",
        &["email", "phone", "@", "linkedin", "github", "contact"],
    ),
    ("experience", &["experience", "work history", "employment"]),
    (
        "education",
        &[
            "education",
            "degree",
            "university",
            "college",
            "bachelor",
            "master",
        ],
    ),
    (
        "skills",
        &["skills", "technologies", "competencies", "expertise"],
    ),
];

const HEADER_CUES: &[&str] = &[
    "summary",
    "objective",
    "profile",
    "experience",
    "work history",
    "employment",
    "education",
    "skills",
    "projects",
    "certifications",
    "contact",
];

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\w.+-]+@[\w-]+\.[\w.-]+").expect("email pattern must compile"));
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\+?\d[\d\s().-]{8,}\d").expect("phone pattern must compile"));

static METRIC_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\d+(\.\d+)?%",
        r"[$€£₹][\d,]+",
        r"(?i)\d+\+?\s*(years?|yrs?)",
        r"(?i)\d+\s*(projects?|clients?|users?|customers?|members?)",
        r"(?i)(increased|reduced|grew|cut)\s+(\w+\s+)?by\s+\d+",
        r"(?i)\d+x\s*(faster|improvement|increase)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("metric pattern must compile"))
    .collect()
});

static VERB_RE: Lazy<Regex> = Lazy::new(|| {
    let alternation = ACTION_VERBS.join("|");
    Regex::new(&format!(r"(?i)\b({alternation})\b")).expect("verb pattern must compile")
});

/// Scores a resume against the fixed rubric.
///
/// Total over well-formed input: any resume with at least some text or an
/// explicit skill list scores; low-signal input produces low scores, not
/// errors.
pub fn score(input: &ResumeInput) -> Result<AtsReport, AppError> {
    let text = input
        .text
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty());
    let explicit_skills = input.skills.as_deref().unwrap_or(&[]);

    if text.is_none() && explicit_skills.is_empty() {
        return Err(AppError::Validation(
            "Either resume text or a skill list must be provided".to_string(),
        ));
    }

    let mut detected = skills::normalize_skills(explicit_skills);
    if let Some(t) = text {
        detected.extend(skills::extract(t));
    }

    let (keyword_score, keywords) = score_keywords(&detected, input.target_role.as_deref());
    let format_score = text.map(score_format).unwrap_or(0.0);
    let sections_score = score_sections(text, input.sections_present.as_deref());
    let (content_score, flagged_phrases) = text.map(score_content).unwrap_or((0.0, Vec::new()));

    let breakdown = vec![
        RubricComponent {
            name: "keywords",
            weight: KEYWORDS_WEIGHT,
            score: keyword_score,
        },
        RubricComponent {
            name: "format",
            weight: FORMAT_WEIGHT,
            score: format_score,
        },
        RubricComponent {
            name: "sections",
            weight: SECTIONS_WEIGHT,
            score: sections_score,
        },
        RubricComponent {
            name: "content",
            weight: CONTENT_WEIGHT,
            score: content_score,
        },
    ];

    let overall = breakdown
        .iter()
        .map(|c| c.weight * c.score)
        .sum::<f64>()
        .clamp(0.0, 100.0);

    Ok(AtsReport {
        overall,
        status: status_label(overall),
        breakdown,
        keywords,
        flagged_phrases,
    })
}

/// Keyword sub-score. With a known target role: proportion of the role's
/// reference skills detected. Without one: proportion of the overall
/// vocabulary covered, capped at full marks once the coverage target is met.
fn score_keywords(detected: &BTreeSet<String>, target_role: Option<&str>) -> (f64, KeywordAnalysis) {
    if let Some(reference) = target_role.and_then(vocab::reference_skills) {
        let found: Vec<String> = reference
            .iter()
            .filter(|s| detected.contains(**s))
            .map(|s| s.to_string())
            .collect();
        let missing: Vec<String> = reference
            .iter()
            .filter(|s| !detected.contains(**s))
            .map(|s| s.to_string())
            .collect();
        let score = (found.len() as f64 / reference.len().max(1) as f64 * 100.0).min(100.0);
        return (score, KeywordAnalysis { found, missing });
    }

    let vocab_len = vocab::vocabulary().len() as f64;
    let score = (detected.len() as f64 / (vocab_len * GENERAL_COVERAGE_TARGET) * 100.0).min(100.0);
    let found: Vec<String> = detected.iter().cloned().collect();
    (
        score,
        KeywordAnalysis {
            found,
            missing: Vec::new(),
        },
    )
}

/// Format sub-score: rewards ATS-friendly plain structure (reachable contact
/// info, section headers, bullet points) and penalizes walls of text and
/// excessive length.
fn score_format(text: &str) -> f64 {
    let mut score: f64 = 0.0;

    if EMAIL_RE.is_match(text) {
        score += 25.0;
    }
    if PHONE_RE.is_match(text) {
        score += 25.0;
    }

    let lines: Vec<&str> = text.lines().collect();
    let bullet_lines = lines
        .iter()
        .filter(|l| {
            let t = l.trim_start();
            t.starts_with('-') || t.starts_with('*') || t.starts_with('•')
        })
        .count();
    if bullet_lines >= 3 {
        score += 20.0;
    }

    let header_lines = lines
        .iter()
        .filter(|l| {
            let t = l.trim().to_lowercase();
            !t.is_empty() && t.len() <= 40 && HEADER_CUES.iter().any(|cue| t.starts_with(cue))
        })
        .count();
    if header_lines >= 2 {
        score += 30.0;
    }

    let word_count = text.split_whitespace().count();
    if word_count > 1500 {
        score -= 20.0;
    }
    let long_paragraphs = lines.iter().filter(|l| l.len() > 200).count();
    if long_paragraphs > 3 {
        score -= 15.0;
    }

    score.clamp(0.0, 100.0)
}

/// Sections sub-score: binary presence over {contact, experience, education,
/// skills}, each missing section costing an equal fraction.
fn score_sections(text: Option<&str>, sections_present: Option<&[String]>) -> f64 {
    let per_section = 100.0 / SECTION_CUES.len() as f64;

    if let Some(names) = sections_present {
        let provided: BTreeSet<String> = names.iter().map(|s| s.trim().to_lowercase()).collect();
        return SECTION_CUES
            .iter()
            .filter(|(name, _)| provided.contains(*name))
            .count() as f64
            * per_section;
    }

    let Some(text) = text else { return 0.0 };
    let lower = text.to_lowercase();
    SECTION_CUES
        .iter()
        .filter(|(_, cues)| cues.iter().any(|cue| lower.contains(cue)))
        .count() as f64
        * per_section
}

/// Content sub-score: rewards quantifiable achievements and action verbs;
/// banned generic phrases cost a fixed penalty each, capped.
fn score_content(text: &str) -> (f64, Vec<String>) {
    let metric_count: usize = METRIC_PATTERNS
        .iter()
        .map(|p| p.find_iter(text).count())
        .sum();
    let metric_score = (metric_count as f64 * 15.0).min(55.0);

    let distinct_verbs: BTreeSet<String> = VERB_RE
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .collect();
    let verb_score = (distinct_verbs.len() as f64 * 9.0).min(45.0);

    let lower = text.to_lowercase();
    let flagged: Vec<String> = GENERIC_PHRASES
        .iter()
        .filter(|p| lower.contains(**p))
        .map(|p| p.to_string())
        .collect();
    let penalty = (flagged.len() as f64 * 10.0).min(30.0);

    let score = (metric_score + verb_score - penalty).clamp(0.0, 100.0);
    (score, flagged)
}

fn status_label(overall: f64) -> &'static str {
    if overall >= 80.0 {
        "Excellent"
    } else if overall >= 60.0 {
        "Good"
    } else if overall >= 40.0 {
        "Needs Work"
    } else {
        "Poor"
    }
}
