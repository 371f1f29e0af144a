//! Remote version lookups and the manager self-update check

use rayon::prelude::*;
use semver::Version;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::fetch::HttpClient;
use crate::registry::{Manifest, ModpackRegistry};

/// GitHub REST API root.
pub const GITHUB_API: &str = "https://api.github.com";

#[derive(Debug, Deserialize)]
struct CommitEntry {
    commit: CommitDetail,
}

#[derive(Debug, Deserialize)]
struct CommitDetail {
    message: String,
}

#[derive(Debug, Deserialize)]
struct TagEntry {
    name: String,
}

/// Message of the newest commit on the default branch, if any.
pub fn latest_commit_message(http: &HttpClient, owner: &str, repo: &str) -> Result<Option<String>> {
    let commits: Vec<CommitEntry> = http.get_json(&format!("{GITHUB_API}/repos/{owner}/{repo}/commits"))?;
    Ok(commits.into_iter().next().map(|c| c.commit.message))
}

/// Name of the newest tag, if any.
pub fn latest_tag(http: &HttpClient, owner: &str, repo: &str) -> Result<Option<String>> {
    let tags: Vec<TagEntry> = http.get_json(&format!("{GITHUB_API}/repos/{owner}/{repo}/tags"))?;
    Ok(tags.into_iter().next().map(|t| t.name))
}

/// Latest published version of one registry modpack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteVersion {
    pub name: String,
    /// First line of the latest commit message.
    pub version: Option<String>,
    /// Why the lookup failed, if it did.
    pub error: Option<String>,
}

impl RemoteVersion {
    /// Text shown next to the modpack name.
    pub fn display(&self) -> &str {
        match (&self.version, &self.error) {
            (Some(v), _) => v,
            (None, Some(_)) => "Failed to fetch commits.",
            (None, None) => "No commits found.",
        }
    }
}

/// Latest commit subject of every Git modpack hosted on GitHub.
///
/// Lookups run in parallel; failures are reported per modpack. Results keep
/// registry order.
pub fn registry_versions(http: &HttpClient, registry: &ModpackRegistry) -> Vec<RemoteVersion> {
    let repos: Vec<(String, String, String)> = registry
        .manifest()
        .modpacks()
        .filter(|entry| entry.is_git())
        .filter_map(|entry| {
            let (owner, repo) = entry.github_repo()?;
            Some((entry.name.clone(), owner, repo))
        })
        .collect();

    repos
        .par_iter()
        .map(|(name, owner, repo)| match latest_commit_message(http, owner, repo) {
            Ok(message) => RemoteVersion {
                name: name.clone(),
                version: message.and_then(|m| m.lines().next().map(str::to_string)),
                error: None,
            },
            Err(e) => {
                tracing::warn!("Version lookup for {name} failed: {e}");
                RemoteVersion {
                    name: name.clone(),
                    version: None,
                    error: Some(e.to_string()),
                }
            }
        })
        .collect()
}

// ============================================================================
// Manager self-update
// ============================================================================

/// Outcome of comparing the running manager with the manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateStatus {
    UpToDate {
        current: Version,
    },
    Available {
        current: Version,
        latest: Version,
        download_url: Option<String>,
        changelog: Option<String>,
    },
    /// The manifest does not announce a version.
    Unknown,
}

/// Compare `current` with the manifest's `latest_version`.
pub fn check_manager_update(manifest: &Manifest, current: &str) -> Result<UpdateStatus> {
    let Some(latest) = manifest.latest_version.as_deref() else {
        return Ok(UpdateStatus::Unknown);
    };
    let current = parse_version(current)?;
    let latest = parse_version(latest)?;

    if current < latest {
        Ok(UpdateStatus::Available {
            current,
            latest,
            download_url: manifest.download_url.clone(),
            changelog: manifest.changelog_text(),
        })
    } else {
        Ok(UpdateStatus::UpToDate { current })
    }
}

/// Parse a version, accepting a leading `v` and missing minor/patch parts
/// (`1.8` reads as `1.8.0`).
pub fn parse_version(raw: &str) -> Result<Version> {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix(['v', 'V']).unwrap_or(trimmed);

    // Pad only the numeric core, leaving pre-release and build metadata alone
    let split = trimmed.find(['-', '+']).unwrap_or(trimmed.len());
    let (core, rest) = trimmed.split_at(split);
    let padded = match core.split('.').count() {
        1 => format!("{core}.0.0{rest}"),
        2 => format!("{core}.0{rest}"),
        _ => trimmed.to_string(),
    };
    Version::parse(&padded).map_err(|_| Error::InvalidVersion(raw.to_string()))
}
