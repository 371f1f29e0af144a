//! Remote manifest document

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::resolver::DependencyMap;

/// Branch used when an entry lists none.
pub const DEFAULT_BRANCH: &str = "main";

lazy_static! {
    static ref GITHUB_REPO: Regex =
        Regex::new(r"^https?://github\.com/([^/]+)/([^/.]+)").expect("valid GitHub URL pattern");
}

/// The manifest published alongside the manager.
///
/// ```json
/// {
///   "modpack_categories": [{"category": "...", "modpacks": [{"name": "...", "url": "...", "description": "...", "branches": ["main"]}]}],
///   "latest_version": "1.8.0",
///   "download_url": "https://...",
///   "changelog": "...",
///   "dependencies": {"Cryptid": ["Talisman"]}
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub modpack_categories: Vec<ModpackCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
    /// Free-form changelog (a string or a list of lines).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub changelog: Option<serde_json::Value>,
    /// Dependency map overriding the built-in one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependencies: Option<DependencyMap>,
}

impl Manifest {
    /// Changelog rendered as plain text.
    pub fn changelog_text(&self) -> Option<String> {
        match self.changelog.as_ref()? {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Array(lines) => Some(
                lines
                    .iter()
                    .map(|line| line.as_str().map_or_else(|| line.to_string(), str::to_string))
                    .collect::<Vec<_>>()
                    .join("\n"),
            ),
            other => Some(other.to_string()),
        }
    }

    /// Every modpack entry across categories, in manifest order.
    pub fn modpacks(&self) -> impl Iterator<Item = &ModpackEntry> {
        self.modpack_categories.iter().flat_map(|c| c.modpacks.iter())
    }
}

/// A named group of modpacks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModpackCategory {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub modpacks: Vec<ModpackEntry>,
}

/// A downloadable modpack.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModpackEntry {
    pub name: String,
    /// Git clone URL or direct archive URL.
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branches: Option<Vec<String>>,
}

impl ModpackEntry {
    /// Available branches (`main` when none are listed).
    pub fn branches(&self) -> Vec<&str> {
        match &self.branches {
            Some(branches) if !branches.is_empty() => branches.iter().map(String::as_str).collect(),
            _ => vec![DEFAULT_BRANCH],
        }
    }

    /// Whether the URL is a Git clone URL (`.git`); anything else is
    /// downloaded as a zip archive.
    pub fn is_git(&self) -> bool {
        is_git_url(&self.url)
    }

    /// `(owner, repo)` for GitHub URLs.
    pub fn github_repo(&self) -> Option<(String, String)> {
        let captures = GITHUB_REPO.captures(&self.url)?;
        Some((captures[1].to_string(), captures[2].to_string()))
    }
}

/// Whether a URL names a Git repository rather than a downloadable archive.
pub fn is_git_url(url: &str) -> bool {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    path.trim_end_matches('/').ends_with(".git")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"{
        "modpack_categories": [
            {"category": "Dimserene", "modpacks": [
                {"name": "Dimserenes-Modpack", "url": "https://github.com/Dimserene/Dimserenes-Modpack.git", "description": "Full pack", "branches": ["main", "dev"]},
                {"name": "Zipped", "url": "https://example.com/pack.zip?dl=1"}
            ]}
        ],
        "latest_version": "1.8.0",
        "changelog": ["Fixed a thing", "Added another"],
        "dependencies": {"Cryptid": ["Talisman"]}
    }"#;

    #[test]
    fn test_parse_manifest() {
        let manifest: Manifest = serde_json::from_str(SAMPLE).unwrap();
        let entries: Vec<_> = manifest.modpacks().collect();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].branches(), ["main", "dev"]);
        assert_eq!(entries[1].branches(), ["main"]);
        assert_eq!(manifest.changelog_text().unwrap(), "Fixed a thing\nAdded another");
        assert_eq!(
            manifest.dependencies.unwrap()["Cryptid"],
            vec!["Talisman".to_string()]
        );
    }

    #[test]
    fn test_archive_and_github_detection() {
        let manifest: Manifest = serde_json::from_str(SAMPLE).unwrap();
        let entries: Vec<_> = manifest.modpacks().collect();

        assert!(entries[0].is_git());
        assert!(!entries[1].is_git());
        assert_eq!(
            entries[0].github_repo(),
            Some(("Dimserene".to_string(), "Dimserenes-Modpack".to_string()))
        );
        assert_eq!(entries[1].github_repo(), None);
    }
}
