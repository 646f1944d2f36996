//! Experience, skill and qualification extraction

use crate::error::{Result, ResumeRankerError};
use crate::processing::fallback::ExperienceFallback;
use crate::processing::roles::RoleProfile;
use aho_corasick::AhoCorasick;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// `<n> year(s)` or `<n> yr(s)`, optionally `+`, optionally followed by
/// `[of] experience`.
const EXPERIENCE_PATTERN: &str = r"(?i)(\d+)\+?\s*(?:years?|yrs?)\b(?:\s+(?:of\s+)?experience)?";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experience {
    pub years: u32,
    /// True when no experience statement was found and the fallback was used.
    pub inferred: bool,
}

pub struct ExperienceExtractor {
    pattern: Regex,
    fallback: Arc<dyn ExperienceFallback>,
}

impl ExperienceExtractor {
    pub fn new(fallback: Arc<dyn ExperienceFallback>) -> Result<Self> {
        let pattern = Regex::new(EXPERIENCE_PATTERN).map_err(|e| {
            ResumeRankerError::Processing(format!("Invalid experience pattern: {}", e))
        })?;
        Ok(Self { pattern, fallback })
    }

    /// First stated number of years in the raw text, if any.
    pub fn find_years(&self, text: &str) -> Option<u32> {
        self.pattern
            .captures_iter(text)
            .find_map(|caps| caps.get(1).and_then(|m| m.as_str().parse::<u32>().ok()))
    }

    pub fn extract(&self, text: &str) -> Experience {
        match self.find_years(text) {
            Some(years) => Experience {
                years,
                inferred: false,
            },
            None => Experience {
                years: self.fallback.fallback_years(text),
                inferred: true,
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordMatches {
    pub matched: Vec<String>,
}

impl KeywordMatches {
    pub fn count(&self) -> usize {
        self.matched.len()
    }
}

/// Case-insensitive exact substring matcher over a fixed keyword list.
///
/// Matches are reported in keyword-list order, each keyword at most once.
pub struct KeywordMatcher {
    keywords: Vec<String>,
    automaton: Option<AhoCorasick>,
}

impl KeywordMatcher {
    pub fn new(keywords: &[String]) -> Result<Self> {
        let keywords: Vec<String> = keywords.iter().map(|k| k.to_lowercase()).collect();
        let automaton = if keywords.is_empty() {
            None
        } else {
            Some(AhoCorasick::new(&keywords).map_err(|e| {
                ResumeRankerError::Processing(format!("Failed to build keyword matcher: {}", e))
            })?)
        };
        Ok(Self { keywords, automaton })
    }

    pub fn find(&self, text: &str) -> KeywordMatches {
        let automaton = match &self.automaton {
            Some(automaton) => automaton,
            None => return KeywordMatches::default(),
        };

        let haystack = text.to_lowercase();
        let mut seen = vec![false; self.keywords.len()];
        for mat in automaton.find_overlapping_iter(&haystack) {
            seen[mat.pattern().as_usize()] = true;
        }

        KeywordMatches {
            matched: self
                .keywords
                .iter()
                .zip(seen)
                .filter(|(_, found)| *found)
                .map(|(keyword, _)| keyword.clone())
                .collect(),
        }
    }
}

/// Skill and degree matchers for one role, built once per run.
pub struct RoleMatcher {
    skills: KeywordMatcher,
    degrees: KeywordMatcher,
}

impl RoleMatcher {
    pub fn new(profile: &RoleProfile) -> Result<Self> {
        Ok(Self {
            skills: KeywordMatcher::new(&profile.skills)?,
            degrees: KeywordMatcher::new(&profile.degrees)?,
        })
    }

    pub fn skills(&self, text: &str) -> KeywordMatches {
        self.skills.find(text)
    }

    pub fn qualifications(&self, text: &str) -> KeywordMatches {
        self.degrees.find(text)
    }
}

pub fn extract_skills(text: &str, profile: &RoleProfile) -> Result<KeywordMatches> {
    Ok(KeywordMatcher::new(&profile.skills)?.find(text))
}

pub fn extract_qualifications(text: &str, profile: &RoleProfile) -> Result<KeywordMatches> {
    Ok(KeywordMatcher::new(&profile.degrees)?.find(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::fallback::FixedFallback;
    use crate::processing::roles::RoleCatalog;

    fn extractor() -> ExperienceExtractor {
        ExperienceExtractor::new(Arc::new(FixedFallback::new(2))).unwrap()
    }

    #[test]
    fn test_experience_patterns() {
        let extractor = extractor();
        assert_eq!(extractor.find_years("Engineer with 5 years of experience"), Some(5));
        assert_eq!(extractor.find_years("10+ yrs experience in sales"), Some(10));
        assert_eq!(extractor.find_years("Experience: 3yrs"), Some(3));
        assert_eq!(extractor.find_years("1 Year EXPERIENCE"), Some(1));
        assert_eq!(extractor.find_years("worked 7 years abroad"), Some(7));
    }

    #[test]
    fn test_first_match_wins() {
        let extractor = extractor();
        let text = "2 years at Acme, then 6 years of experience at Initech";
        assert_eq!(extractor.find_years(text), Some(2));
    }

    #[test]
    fn test_overflowing_number_skipped() {
        let extractor = extractor();
        let text = "99999999999999 years ago; 4 years experience";
        assert_eq!(extractor.find_years(text), Some(4));
    }

    #[test]
    fn test_fallback_when_missing() {
        let extractor = extractor();
        let experience = extractor.extract("Enthusiastic and reliable team player");
        assert_eq!(experience, Experience { years: 2, inferred: true });

        let stated = extractor.extract("3 years experience");
        assert_eq!(stated, Experience { years: 3, inferred: false });
    }

    #[test]
    fn test_skill_matching_in_role_order() {
        let profile = RoleCatalog::builtin().lookup("Software Engineer");
        let matches = extract_skills("Knows C++, Python and some Java.", &profile).unwrap();
        assert_eq!(matches.matched, vec!["python", "java", "c++"]);
        assert_eq!(matches.count(), 3);
    }

    #[test]
    fn test_overlapping_keywords_both_match() {
        let profile = RoleProfile::new(Vec::<String>::new(), ["java", "javascript"]);
        let matches = extract_skills("Senior JavaScript developer", &profile).unwrap();
        assert_eq!(matches.matched, vec!["java", "javascript"]);
    }

    #[test]
    fn test_qualification_matching() {
        let profile = RoleCatalog::builtin().lookup("Data Scientist");
        let matches = extract_qualifications("PhD in physics, Master's in statistics", &profile).unwrap();
        assert_eq!(matches.matched, vec!["master", "phd"]);
    }

    #[test]
    fn test_empty_profile_matches_nothing() {
        let profile = RoleProfile::default();
        let text = "bachelor master phd python java c++";
        assert_eq!(extract_skills(text, &profile).unwrap(), KeywordMatches::default());
        assert_eq!(extract_qualifications(text, &profile).unwrap().count(), 0);
    }

    #[test]
    fn test_no_partial_word_fuzzing() {
        let profile = RoleProfile::new(["bachelor"], ["python"]);
        let matcher = RoleMatcher::new(&profile).unwrap();
        assert!(matcher.skills("pythn and pyton").matched.is_empty());
        assert_eq!(matcher.qualifications("bachelors").matched, vec!["bachelor"]);
    }
}
