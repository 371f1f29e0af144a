//! Excluded-mods list persistence

use std::fs;
use std::path::Path;

use crate::error::Result;

/// Read the excluded-mods list.
///
/// Accepts a JSON array of names or the older newline-delimited format.
/// A missing or blank file means nothing is excluded.
pub fn load_excluded(path: &Path) -> Result<Vec<String>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    Ok(parse_excluded(&content))
}

/// Parse excluded-mods file contents in either supported format.
pub fn parse_excluded(content: &str) -> Vec<String> {
    let trimmed = content.trim();
    if trimmed.starts_with('[')
        && let Ok(names) = serde_json::from_str::<Vec<String>>(trimmed)
    {
        return names;
    }

    trimmed
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Write the excluded-mods list as a pretty JSON array.
pub fn save_excluded(path: &Path, excluded: &[String]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(excluded)?)?;
    tracing::info!("Excluded mods saved: {}", excluded.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_json_array() {
        assert_eq!(parse_excluded(r#"["Talisman", "Cryptid"]"#), ["Talisman", "Cryptid"]);
    }

    #[test]
    fn test_legacy_newline_list() {
        assert_eq!(parse_excluded("Talisman\r\n\nCryptid\n"), ["Talisman", "Cryptid"]);
    }

    #[test]
    fn test_missing_file_is_empty() {
        let temp = TempDir::new().unwrap();
        assert!(load_excluded(&temp.path().join("excluded_mods.json")).unwrap().is_empty());
    }

    #[test]
    fn test_save_writes_json() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("excluded_mods.json");
        save_excluded(&path, &["Talisman".to_string()]).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.trim_start().starts_with('['));
        assert_eq!(load_excluded(&path).unwrap(), ["Talisman"]);
    }
}
