//! Role catalog: required degrees and skills per job role

use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Required degrees and skills for one job role.
///
/// Entries are stored lower-cased and trimmed, in the order they were
/// declared; extractors report matches in that same order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleProfile {
    pub degrees: Vec<String>,
    pub skills: Vec<String>,
}

impl RoleProfile {
    pub fn new<D, S>(degrees: D, skills: S) -> Self
    where
        D: IntoIterator,
        D::Item: AsRef<str>,
        S: IntoIterator,
        S::Item: AsRef<str>,
    {
        Self {
            degrees: normalize_entries(degrees),
            skills: normalize_entries(skills),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.degrees.is_empty() && self.skills.is_empty()
    }

    fn normalized(self) -> Self {
        Self::new(self.degrees, self.skills)
    }
}

fn normalize_entries<I>(entries: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for entry in entries {
        let entry = entry.as_ref().trim().to_lowercase();
        if !entry.is_empty() && !out.contains(&entry) {
            out.push(entry);
        }
    }
    out
}

/// Immutable mapping from role name to its [`RoleProfile`].
///
/// Lookups are by exact role name. An unknown role yields an empty profile,
/// which callers treat as "no requirements known".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleCatalog {
    roles: BTreeMap<String, RoleProfile>,
}

impl Default for RoleCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl RoleCatalog {
    pub fn empty() -> Self {
        Self {
            roles: BTreeMap::new(),
        }
    }

    /// The built-in role table.
    pub fn builtin() -> Self {
        let table: [(&str, &[&str], &[&str]); 14] = [
            ("Graphic Designer", &["bachelor", "diploma"], &["photoshop", "illustrator", "typography"]),
            ("UI/UX Designer", &["bachelor", "diploma"], &["figma", "adobe xd", "wireframing"]),
            ("Interior Designer", &["bachelor", "diploma"], &["autocad", "3ds max", "rendering"]),
            ("Fashion Designer", &["bachelor", "diploma"], &["textile", "pattern making", "fashion illustration"]),
            ("Business Analyst", &["bachelor", "mba"], &["sql", "excel", "data visualization"]),
            ("Marketing Manager", &["bachelor", "mba"], &["seo", "social media", "branding"]),
            ("Software Engineer", &["bachelor", "master"], &["python", "java", "c++"]),
            ("Data Scientist", &["bachelor", "master", "phd"], &["machine learning", "deep learning", "nlp"]),
            ("AI Engineer", &["bachelor", "master"], &["tensorflow", "pytorch", "computer vision"]),
            ("Cloud Engineer", &["bachelor", "master"], &["aws", "azure", "gcp"]),
            ("Musician", &["diploma", "bachelor"], &["composition", "instrument", "music production"]),
            ("Film Director", &["bachelor", "master"], &["screenwriting", "cinematography", "storytelling"]),
            ("Football Coach", &["diploma", "bachelor"], &["strategy", "fitness training", "team management"]),
            ("Mathematics Teacher", &["bachelor", "master"], &["calculus", "algebra", "geometry"]),
        ];

        let mut catalog = Self::empty();
        for (name, degrees, skills) in table {
            catalog.insert(name, RoleProfile::new(degrees.iter(), skills.iter()));
        }
        catalog
    }

    pub fn insert(&mut self, name: impl Into<String>, profile: RoleProfile) {
        self.roles.insert(name.into(), profile.normalized());
    }

    /// Look up a role by exact name. Unknown roles return an empty profile.
    pub fn lookup(&self, role: &str) -> RoleProfile {
        match self.roles.get(role) {
            Some(profile) => profile.clone(),
            None => {
                warn!("Unknown job role '{}', scoring without role requirements", role);
                RoleProfile::default()
            }
        }
    }

    pub fn contains(&self, role: &str) -> bool {
        self.roles.contains_key(role)
    }

    pub fn role_names(&self) -> Vec<&str> {
        self.roles.keys().map(|k| k.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RoleProfile)> {
        self.roles.iter().map(|(name, profile)| (name.as_str(), profile))
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }

    /// Re-apply entry normalization, e.g. after deserializing a hand-edited config.
    pub fn normalized(self) -> Self {
        Self {
            roles: self
                .roles
                .into_iter()
                .map(|(name, profile)| (name, profile.normalized()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog() {
        let catalog = RoleCatalog::builtin();
        assert_eq!(catalog.len(), 14);

        let profile = catalog.lookup("Software Engineer");
        assert_eq!(profile.degrees, vec!["bachelor", "master"]);
        assert_eq!(profile.skills, vec!["python", "java", "c++"]);
    }

    #[test]
    fn test_unknown_role_is_empty() {
        let catalog = RoleCatalog::builtin();
        let profile = catalog.lookup("Astronaut");
        assert!(profile.is_empty());
        assert!(!catalog.contains("Astronaut"));

        // lookup is by exact name
        assert!(catalog.lookup("software engineer").is_empty());
    }

    #[test]
    fn test_entries_are_normalized() {
        let profile = RoleProfile::new(["  Bachelor ", "", "MASTER", "bachelor"], ["Rust", " "]);
        assert_eq!(profile.degrees, vec!["bachelor", "master"]);
        assert_eq!(profile.skills, vec!["rust"]);
    }

    #[test]
    fn test_role_names_sorted() {
        let catalog = RoleCatalog::builtin();
        let names = catalog.role_names();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert!(names.contains(&"UI/UX Designer"));
    }
}
