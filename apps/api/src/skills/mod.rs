// Skill extraction: free text -> normalized set of known skills.
// Pure dictionary matching against the fixed vocabulary — no model calls here.

pub mod handlers;
pub mod vocab;

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;

/// Compiled vocabulary matcher. Alternatives are sorted longest-first so that
/// "javascript" wins over "java" at the same position (the regex crate picks
/// the first matching branch), and every alternative is bounded by word edges
/// so "java" never matches inside "javascript".
static SKILL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    let mut terms = vocab::vocabulary();
    terms.sort_by(|a, b| b.len().cmp(&a.len()).then(a.cmp(b)));
    let alternation = terms
        .iter()
        .map(|t| regex::escape(t))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b({alternation})\b")).expect("vocabulary pattern must compile")
});

/// Extracts the set of known skills mentioned in `text`.
///
/// Case-insensitive and tolerant of commas, slashes, and pipes between terms
/// (word boundaries absorb the separators). Unmatched text yields an empty
/// set, never an error. Deterministic: the result is an ordered set.
pub fn extract(text: &str) -> BTreeSet<String> {
    SKILL_PATTERN
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

/// Parses an explicit user-entered skill list: comma-separated when a comma is
/// present, whitespace-separated otherwise. Entries are lowercased, trimmed,
/// and deduplicated; they are NOT restricted to the vocabulary — job postings
/// legitimately require skills the extractor does not know.
pub fn parse_skill_list(input: &str) -> BTreeSet<String> {
    let parts: Vec<&str> = if input.contains(',') {
        input.split(',').collect()
    } else {
        input.split_whitespace().collect()
    };
    parts
        .into_iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| s.len() > 1)
        .collect()
}

/// Normalizes an already-split skill list (API input) into a canonical set.
pub fn normalize_skills(skills: &[String]) -> BTreeSet<String> {
    skills
        .iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_is_case_insensitive() {
        let skills = extract("Experienced in PYTHON and Docker");
        assert!(skills.contains("python"));
        assert!(skills.contains("docker"));
    }

    #[test]
    fn test_extract_tolerates_separators() {
        let skills = extract("python,sql/docker|kubernetes");
        assert_eq!(skills.len(), 4);
        assert!(skills.contains("kubernetes"));
    }

    #[test]
    fn test_javascript_is_not_shadowed_by_java() {
        let skills = extract("I write JavaScript daily");
        assert!(skills.contains("javascript"));
        assert!(!skills.contains("java"));
    }

    #[test]
    fn test_java_and_javascript_are_distinct_tokens() {
        let skills = extract("java and javascript");
        assert!(skills.contains("java"));
        assert!(skills.contains("javascript"));
    }

    #[test]
    fn test_multiword_skills_match() {
        let skills = extract("5 years of machine learning and data visualization work");
        assert!(skills.contains("machine learning"));
        assert!(skills.contains("data visualization"));
    }

    #[test]
    fn test_empty_and_unmatched_text_yield_empty_set() {
        assert!(extract("").is_empty());
        assert!(extract("lorem ipsum dolor sit amet").is_empty());
    }

    #[test]
    fn test_extract_is_deterministic() {
        let text = "python, sql, react, python";
        assert_eq!(extract(text), extract(text));
    }

    #[test]
    fn test_extract_deduplicates() {
        let skills = extract("python python PYTHON");
        assert_eq!(skills.len(), 1);
    }

    #[test]
    fn test_parse_skill_list_comma_separated() {
        let skills = parse_skill_list("Python, SQL , docker");
        assert_eq!(
            skills.into_iter().collect::<Vec<_>>(),
            vec!["docker", "python", "sql"]
        );
    }

    #[test]
    fn test_parse_skill_list_space_separated_drops_single_chars() {
        let skills = parse_skill_list("python r sql");
        assert!(skills.contains("python"));
        assert!(skills.contains("sql"));
        assert!(!skills.contains("r"));
    }

    #[test]
    fn test_normalize_skills_trims_and_lowercases() {
        let input = vec!["  Python ".to_string(), "SQL".to_string(), "".to_string()];
        let skills = normalize_skills(&input);
        assert_eq!(
            skills.into_iter().collect::<Vec<_>>(),
            vec!["python", "sql"]
        );
    }
}
