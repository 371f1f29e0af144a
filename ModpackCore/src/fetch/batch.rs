//! Downloading several modpacks in one go

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use super::{FetchProgressCallback, FetchRequest, Fetcher};

/// One entry of a batch download.
#[derive(Debug, Clone)]
pub struct BatchFetchItem {
    /// Display name (usually the modpack name).
    pub name: String,
    pub request: FetchRequest,
}

/// Result of a batch fetch
#[derive(Debug, Clone, Default)]
pub struct BatchFetchResult {
    /// Number of successful downloads
    pub success_count: usize,
    /// Number of failed downloads
    pub fail_count: usize,
    /// Whether the batch stopped early because it was cancelled
    pub cancelled: bool,
    /// Messages for each modpack processed
    pub results: Vec<String>,
    /// Destinations of the successful downloads
    pub downloaded: Vec<PathBuf>,
}

/// Fetch modpacks one after another.
///
/// `cancel` is checked before each modpack; a fetcher built with the same
/// flag also checks it between download chunks. Failures do not stop the
/// batch.
///
/// # Arguments
/// * `fetcher` - Fetch implementation
/// * `items` - Modpacks to download
/// * `cancel` - Cooperative cancellation flag
/// * `on_item` - Called with `(index, total, name)` before each modpack
/// * `progress` - Per-download progress
pub fn batch_fetch(
    fetcher: &dyn Fetcher,
    items: &[BatchFetchItem],
    cancel: &AtomicBool,
    on_item: &dyn Fn(usize, usize, &str),
    progress: FetchProgressCallback,
) -> BatchFetchResult {
    let total = items.len();
    let mut result = BatchFetchResult::default();

    for (index, item) in items.iter().enumerate() {
        if cancel.load(Ordering::SeqCst) {
            tracing::info!("Batch download cancelled after {index} of {total}");
            result.cancelled = true;
            break;
        }

        on_item(index + 1, total, &item.name);
        match fetcher.fetch(&item.request, progress) {
            Ok(path) => {
                result.success_count += 1;
                result.results.push(format!("Downloaded {}", item.name));
                result.downloaded.push(path);
            }
            Err(e) => {
                result.fail_count += 1;
                result.results.push(format!("Failed {}: {e}", item.name));
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, Result};
    use crate::fetch::{FetchProgress, FetchSource};
    use std::sync::Mutex;

    /// Records requests; fails the ones whose URL contains "bad" and raises
    /// the cancel flag after the first call when asked to.
    struct FakeFetcher<'a> {
        seen: Mutex<Vec<String>>,
        cancel_after_first: Option<&'a AtomicBool>,
    }

    impl Fetcher for FakeFetcher<'_> {
        fn fetch(&self, request: &FetchRequest, _: FetchProgressCallback) -> Result<PathBuf> {
            self.seen.lock().unwrap().push(request.source.url().to_string());
            if let Some(flag) = self.cancel_after_first {
                flag.store(true, Ordering::SeqCst);
            }
            if request.source.url().contains("bad") {
                Err(Error::HttpStatus { status: 404 })
            } else {
                Ok(request.destination.clone())
            }
        }
    }

    fn item(name: &str, url: &str) -> BatchFetchItem {
        BatchFetchItem {
            name: name.to_string(),
            request: FetchRequest::new(FetchSource::from_url(url, "main"), format!("/tmp/{name}")),
        }
    }

    fn no_progress(_: &FetchProgress) {}

    #[test]
    fn test_failures_do_not_stop_batch() {
        let fetcher = FakeFetcher {
            seen: Mutex::new(Vec::new()),
            cancel_after_first: None,
        };
        let cancel = AtomicBool::new(false);
        let items = [
            item("A", "https://example.com/a.zip"),
            item("B", "https://example.com/bad.zip"),
            item("C", "https://example.com/c.zip"),
        ];

        let result = batch_fetch(&fetcher, &items, &cancel, &|_, _, _| {}, &no_progress);
        assert_eq!(result.success_count, 2);
        assert_eq!(result.fail_count, 1);
        assert!(!result.cancelled);
        assert!(result.results[1].starts_with("Failed B"));
    }

    #[test]
    fn test_cancel_between_items() {
        let cancel = AtomicBool::new(false);
        let fetcher = FakeFetcher {
            seen: Mutex::new(Vec::new()),
            cancel_after_first: Some(&cancel),
        };
        let items = [
            item("A", "https://example.com/a.zip"),
            item("B", "https://example.com/b.zip"),
        ];

        let result = batch_fetch(&fetcher, &items, &cancel, &|_, _, _| {}, &no_progress);
        assert_eq!(result.success_count, 1);
        assert!(result.cancelled);
        assert_eq!(fetcher.seen.lock().unwrap().len(), 1);
    }
}
