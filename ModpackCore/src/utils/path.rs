//! Path utilities

use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// Expand a settings path into a concrete filesystem path.
///
/// Handles Windows-style `%VAR%` references first, then `~` and `$VAR`.
/// References to unset variables are left untouched; `~` is still expanded.
pub fn expand_path(raw: &str) -> PathBuf {
    let windows_expanded = expand_percent_vars(raw);
    let expanded = shellexpand::full(&windows_expanded)
        .map_or_else(|_| shellexpand::tilde(&windows_expanded).into_owned(), Cow::into_owned);
    PathBuf::from(expanded)
}

/// Replace `%NAME%` tokens with the value of the environment variable `NAME`.
pub fn expand_percent_vars(raw: &str) -> Cow<'_, str> {
    if !raw.contains('%') {
        return Cow::Borrowed(raw);
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(start) = rest.find('%') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match after.find('%') {
            Some(end) if end > 0 => {
                let name = &after[..end];
                match std::env::var(name) {
                    Ok(value) => out.push_str(&value),
                    Err(_) => {
                        out.push('%');
                        out.push_str(name);
                        out.push('%');
                    }
                }
                rest = &after[end + 1..];
            }
            _ => {
                out.push('%');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

/// File name of a path as an owned string (empty when there is none).
pub fn file_name_string<P: AsRef<Path>>(path: P) -> String {
    path.as_ref()
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_path_untouched() {
        assert_eq!(expand_path("/opt/games/Balatro"), PathBuf::from("/opt/games/Balatro"));
    }

    #[test]
    fn test_unknown_percent_var_kept() {
        let raw = r"%MODPACK_SURELY_UNSET_VAR%\Balatro\Mods";
        assert_eq!(expand_percent_vars(raw), raw);
    }

    #[test]
    fn test_lone_percent_kept() {
        assert_eq!(expand_percent_vars("100% done"), "100% done");
    }

    #[test]
    fn test_percent_var_expanded() {
        // PATH is set on every platform the tests run on
        let path = std::env::var("PATH").unwrap();
        assert_eq!(expand_percent_vars("%PATH%/x"), format!("{path}/x"));
    }

    #[test]
    fn test_tilde_expanded() {
        let expanded = expand_path("~/Balatro");
        assert!(!expanded.to_string_lossy().starts_with('~'));
        assert!(expanded.ends_with("Balatro"));
    }

    #[test]
    fn test_tilde_expanded_with_unset_var() {
        let expanded = expand_path("~/$MODPACK_SURELY_UNSET_VAR/Mods");
        let text = expanded.to_string_lossy();
        assert!(!text.starts_with('~'));
        assert!(text.ends_with("$MODPACK_SURELY_UNSET_VAR/Mods"));
    }
}
