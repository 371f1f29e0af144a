//! Moving a Git modpack checkout to an older version and back
//!
//! Modpack versions are commit subjects (for example `1.4.2`). A version is
//! looked up by regular expression against the first line of each commit
//! message, newest first, and must match the whole line.

use std::path::Path;

use regex::Regex;

use crate::error::{Error, Result};
use crate::fetch::GitClient;
use crate::fetch::git::CommitInfo;
use crate::registry::DEFAULT_BRANCH;

/// Commits of a downloaded modpack, newest first.
pub fn list_versions(git: &GitClient, repo: &Path) -> Result<Vec<CommitInfo>> {
    check_repository(repo)?;
    git.log(repo)
}

/// Find the newest commit whose subject fully matches `pattern`.
pub fn find_version(git: &GitClient, repo: &Path, pattern: &str) -> Result<CommitInfo> {
    let commits = list_versions(git, repo)?;
    match_version(&commits, pattern)?
        .cloned()
        .ok_or_else(|| Error::CommitNotFound(pattern.to_string()))
}

/// First commit in `commits` whose subject matches `pattern` from start to end.
pub fn match_version<'a>(commits: &'a [CommitInfo], pattern: &str) -> Result<Option<&'a CommitInfo>> {
    let regex = Regex::new(&format!("^(?:{pattern})$")).map_err(|e| Error::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })?;
    Ok(commits.iter().find(|c| regex.is_match(&c.subject)))
}

/// Detach HEAD at `hash` and reset the working tree to it.
///
/// The mods need to be installed again afterwards.
pub fn travel_to(git: &GitClient, repo: &Path, hash: &str) -> Result<()> {
    check_repository(repo)?;
    git.checkout_detached(repo, hash)?;
    tracing::info!("Time traveled {} to {hash}", repo.display());
    Ok(())
}

/// Switch back to the main branch.
pub fn travel_back(git: &GitClient, repo: &Path) -> Result<()> {
    check_repository(repo)?;
    git.switch(repo, DEFAULT_BRANCH)?;
    tracing::info!("Time traveled back to {DEFAULT_BRANCH} in {}", repo.display());
    Ok(())
}

fn check_repository(repo: &Path) -> Result<()> {
    if !repo.exists() {
        return Err(Error::ModpackNotDownloaded {
            path: repo.to_path_buf(),
        });
    }
    if !GitClient::is_repository(repo) {
        return Err(Error::NotARepository {
            path: repo.to_path_buf(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn commits() -> Vec<CommitInfo> {
        ["1.4.2", "1.4.1 hotfix", "1.4.1", "1.4.0"]
            .iter()
            .enumerate()
            .map(|(i, s)| CommitInfo {
                hash: format!("{i:040}"),
                subject: (*s).to_string(),
            })
            .collect()
    }

    #[test]
    fn test_full_match_only() {
        let commits = commits();
        let found = match_version(&commits, "1.4.1").unwrap().unwrap();
        assert_eq!(found.subject, "1.4.1");
    }

    #[test]
    fn test_regex_pattern_newest_first() {
        let commits = commits();
        let found = match_version(&commits, r"1\.4\.\d").unwrap().unwrap();
        assert_eq!(found.subject, "1.4.2");
    }

    #[test]
    fn test_no_match() {
        assert!(match_version(&commits(), "1.3").unwrap().is_none());
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(matches!(
            match_version(&commits(), "1.4("),
            Err(Error::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_missing_repository() {
        let temp = tempfile::TempDir::new().unwrap();
        let git = GitClient::default();
        assert!(matches!(
            list_versions(&git, &temp.path().join("Nope")),
            Err(Error::ModpackNotDownloaded { .. })
        ));
        assert!(matches!(
            travel_back(&git, temp.path()),
            Err(Error::NotARepository { .. })
        ));
    }
}
