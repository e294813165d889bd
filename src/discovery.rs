use anyhow::Result;
use futures::stream::{self, Stream, StreamExt};
use glob::{glob, Pattern};
use ignore::{WalkBuilder, WalkState};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Default file name pattern for discovery
pub const DEFAULT_PATTERN: &str = "*.txt";

/// Configuration for file discovery behavior
///
/// Both discovery strategies follow symlinks, hand every entry whose name
/// matches `pattern` to validation, and so report the same set: matching
/// directories and dangling links come back flagged with an error, or abort
/// discovery under `fail_fast`.
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Whether to fail fast on first error or continue processing
    pub fail_fast: bool,
    /// Glob matched against file names (not full paths)
    pub pattern: String,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            fail_fast: false,
            pattern: DEFAULT_PATTERN.to_string(),
        }
    }
}

/// Result of file discovery validation
#[derive(Debug, Clone)]
pub struct FileValidation {
    pub path: PathBuf,
    pub error: Option<String>,
}

/// Discovers files whose name matches `config.pattern`, recursively under
/// `root`. If `root` is itself a file, only that file is produced.
///
/// Results come out in glob order as an async stream.
pub fn discover_files(
    root: impl AsRef<Path>,
    config: DiscoveryConfig,
) -> impl Stream<Item = Result<FileValidation>> {
    let root_path = root.as_ref().to_path_buf();

    stream::unfold(
        DiscoveryState::new(root_path, config),
        |mut state| async move {
            state.next_file().await.map(|result| (result, state))
        },
    )
}

/// Parallel directory traversal with `ignore::WalkBuilder`.
///
/// Files stream out as the walker finds them, so order is not stable.
pub fn discover_files_parallel(
    root: impl AsRef<Path>,
    config: DiscoveryConfig,
) -> impl Stream<Item = Result<FileValidation>> {
    let root_path = root.as_ref().to_path_buf();
    let config = Arc::new(config);

    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        let pattern = match Pattern::new(&config.pattern) {
            Ok(pattern) => pattern,
            Err(e) => {
                let _ = tx.send(Err(anyhow::anyhow!("Invalid file pattern {}: {}", config.pattern, e)));
                return;
            }
        };

        info!("Starting directory traversal in: {}", root_path.display());
        let traversal_start = std::time::Instant::now();

        let walker = WalkBuilder::new(&root_path)
            .threads((num_cpus::get() / 2).max(1))
            .follow_links(true)
            .hidden(false)
            .ignore(false)
            .git_ignore(false)
            .build_parallel();

        let (found_tx, mut found_rx) = mpsc::unbounded_channel::<Result<PathBuf, ignore::Error>>();

        // The walker blocks, so it runs on its own thread and only sends
        let walk_pattern = pattern.clone();
        std::thread::spawn(move || {
            walker.run(|| {
                let found_tx = found_tx.clone();
                let pattern = walk_pattern.clone();
                Box::new(move |result| {
                    let found = match result {
                        Ok(entry) => {
                            let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
                            // an explicit root is taken whatever its name, deeper
                            // entries of any type go to validation when the name matches
                            let wanted = if entry.depth() == 0 {
                                !is_dir
                            } else {
                                name_matches(&pattern, entry.path())
                            };
                            if !wanted {
                                return WalkState::Continue;
                            }
                            debug!("Found matching entry: {}", entry.path().display());
                            Ok(entry.into_path())
                        }
                        Err(e) => Err(e),
                    };

                    match found_tx.send(found) {
                        Ok(()) => WalkState::Continue,
                        Err(_) => WalkState::Quit,
                    }
                })
            });
        });

        let mut file_count = 0;
        while let Some(found) = found_rx.recv().await {
            let outcome = match found {
                Ok(path) => {
                    file_count += 1;
                    validate_file(path, &config).await
                }
                Err(e) => {
                    let error_msg = format!("Directory walk error: {e}");
                    warn!("{}", error_msg);
                    if config.fail_fast {
                        Err(anyhow::anyhow!(error_msg))
                    } else {
                        // flag unreadable entries the glob walk would also have listed
                        match error_path(&e).filter(|path| name_matches(&pattern, path)) {
                            Some(path) => Ok(FileValidation {
                                path: path.to_path_buf(),
                                error: Some(error_msg),
                            }),
                            None => continue,
                        }
                    }
                }
            };

            let is_err = outcome.is_err();
            if tx.send(outcome).is_err() {
                debug!("Receiver dropped, stopping discovery");
                break;
            }
            if is_err {
                break;
            }
        }
        // closing the channel makes the walker quit on its next send
        drop(found_rx);

        info!(
            "Discovery completed in {}ms, streamed {} files",
            traversal_start.elapsed().as_millis(),
            file_count
        );
    });

    stream::unfold(rx, |mut receiver| async move {
        receiver.recv().await.map(|result| (result, receiver))
    })
}

/// Path a walk error refers to, if it carries one
fn error_path(err: &ignore::Error) -> Option<&Path> {
    match err {
        ignore::Error::WithPath { path, .. } => Some(path),
        ignore::Error::WithDepth { err, .. } | ignore::Error::WithLineNumber { err, .. } => error_path(err),
        ignore::Error::Loop { child, .. } => Some(child),
        _ => None,
    }
}

fn name_matches(pattern: &Pattern, path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| pattern.matches(name))
}

/// Check a discovered path is an accessible regular file.
///
/// Problems are recorded on the `FileValidation` unless `fail_fast` is set,
/// in which case they become errors.
async fn validate_file(path: PathBuf, config: &DiscoveryConfig) -> Result<FileValidation> {
    debug!("Validating file: {}", path.display());

    match fs::metadata(&path).await {
        Ok(metadata) if metadata.is_file() => Ok(FileValidation { path, error: None }),
        Ok(_) => {
            let error = format!("Path is not a file: {}", path.display());
            warn!("{}", error);
            Ok(FileValidation { path, error: Some(error) })
        }
        Err(e) => {
            let error = format!("Cannot access file {}: {}", path.display(), e);
            warn!("{}", error);

            if config.fail_fast {
                Err(anyhow::anyhow!(error))
            } else {
                Ok(FileValidation { path, error: Some(error) })
            }
        }
    }
}

/// Internal state for sequential discovery
struct DiscoveryState {
    root_dir: PathBuf,
    config: DiscoveryConfig,
    glob_iter: Option<glob::Paths>,
    finished: bool,
}

impl DiscoveryState {
    fn new(root_dir: PathBuf, config: DiscoveryConfig) -> Self {
        Self {
            root_dir,
            config,
            glob_iter: None,
            finished: false,
        }
    }

    async fn next_file(&mut self) -> Option<Result<FileValidation>> {
        if self.finished {
            return None;
        }

        if self.glob_iter.is_none() {
            if fs::metadata(&self.root_dir).await.is_ok_and(|m| m.is_file()) {
                self.finished = true;
                return Some(validate_file(self.root_dir.clone(), &self.config).await);
            }

            let root = Pattern::escape(&self.root_dir.to_string_lossy());
            let pattern = format!("{}/**/{}", root, self.config.pattern);
            debug!("Starting file discovery with pattern: {}", pattern);

            match glob(&pattern) {
                Ok(paths) => {
                    self.glob_iter = Some(paths);
                    info!("File discovery initialized for root: {}", self.root_dir.display());
                }
                Err(e) => {
                    self.finished = true;
                    return Some(Err(anyhow::anyhow!("Failed to create glob pattern: {}", e)));
                }
            }
        }

        let glob_iter = self.glob_iter.as_mut()?;
        loop {
            match glob_iter.next() {
                Some(Ok(path)) => {
                    debug!("Found file: {}", path.display());
                    return Some(validate_file(path, &self.config).await);
                }
                Some(Err(e)) => {
                    let error_msg = format!("Glob iteration error: {e}");
                    warn!("{}", error_msg);

                    if self.config.fail_fast {
                        self.finished = true;
                        return Some(Err(anyhow::anyhow!(error_msg)));
                    }
                }
                None => {
                    info!("File discovery completed");
                    self.finished = true;
                    return None;
                }
            }
        }
    }
}

async fn collect_stream(
    stream: impl Stream<Item = Result<FileValidation>>,
) -> Result<Vec<FileValidation>> {
    let mut files = Vec::new();
    let mut stream = Box::pin(stream);

    while let Some(result) = stream.next().await {
        files.push(result?);
    }

    let valid_count = files.iter().filter(|f| f.error.is_none()).count();
    let invalid_count = files.len() - valid_count;

    if invalid_count > 0 {
        warn!("Found {} files with validation issues", invalid_count);
    }

    info!("File discovery summary: {} valid, {} invalid", valid_count, invalid_count);

    Ok(files)
}

/// Collect all discovered files into a Vec for easier processing
pub async fn collect_discovered_files(
    root: impl AsRef<Path>,
    config: DiscoveryConfig,
) -> Result<Vec<FileValidation>> {
    collect_stream(discover_files(root, config)).await
}

/// Collect all discovered files using parallel directory traversal
pub async fn collect_discovered_files_parallel(
    root: impl AsRef<Path>,
    config: DiscoveryConfig,
) -> Result<Vec<FileValidation>> {
    collect_stream(discover_files_parallel(root, config)).await
}

/// Paths of every accessible file matching `pattern` under `root`
pub async fn find_files<P: AsRef<Path>>(root: P, pattern: &str) -> Result<Vec<PathBuf>> {
    let config = DiscoveryConfig {
        pattern: pattern.to_string(),
        ..Default::default()
    };
    let validations = collect_discovered_files(root, config).await?;

    Ok(validations
        .into_iter()
        .filter(|v| v.error.is_none())
        .map(|v| v.path)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn create_test_file(dir: &Path, name: &str, content: &[u8]) -> Result<PathBuf> {
        let file_path = dir.join(name);
        if let Some(parent) = file_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&file_path, content).await?;
        Ok(file_path)
    }

    fn file_names(files: &[FileValidation]) -> Vec<String> {
        let mut names: Vec<String> = files
            .iter()
            .map(|f| f.path.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn test_discover_files_empty_directory() {
        let temp_dir = TempDir::new().unwrap();

        let files = collect_discovered_files(temp_dir.path(), DiscoveryConfig::default()).await.unwrap();
        assert_eq!(files.len(), 0);
    }

    #[tokio::test]
    async fn test_discover_files_matching_pattern() {
        let temp_dir = TempDir::new().unwrap();

        create_test_file(temp_dir.path(), "ascii.txt", b"plain").await.unwrap();
        create_test_file(temp_dir.path(), "nested/utf-16le.txt", &[0xFF, 0xFE, 0x41, 0x00]).await.unwrap();
        create_test_file(temp_dir.path(), "notes.md", b"not matched").await.unwrap();

        let files = collect_discovered_files(temp_dir.path(), DiscoveryConfig::default()).await.unwrap();
        assert_eq!(file_names(&files), ["ascii.txt", "utf-16le.txt"]);
        assert!(files.iter().all(|f| f.error.is_none()));
    }

    #[tokio::test]
    async fn test_custom_pattern() {
        let temp_dir = TempDir::new().unwrap();

        create_test_file(temp_dir.path(), "a.log", b"x").await.unwrap();
        create_test_file(temp_dir.path(), "b.txt", b"x").await.unwrap();

        let config = DiscoveryConfig { pattern: "*.log".to_string(), ..Default::default() };
        let files = collect_discovered_files(temp_dir.path(), config).await.unwrap();
        assert_eq!(file_names(&files), ["a.log"]);
    }

    #[tokio::test]
    async fn test_root_is_a_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = create_test_file(temp_dir.path(), "single.dat", b"x").await.unwrap();

        let files = collect_discovered_files(&path, DiscoveryConfig::default()).await.unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, path);

        let files = collect_discovered_files_parallel(&path, DiscoveryConfig::default()).await.unwrap();
        assert_eq!(files.len(), 1);
    }

    #[tokio::test]
    async fn test_directory_matching_pattern_is_flagged() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::create_dir(temp_dir.path().join("folder.txt")).unwrap();

        let files = collect_discovered_files(temp_dir.path(), DiscoveryConfig::default()).await.unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].error.as_deref().unwrap().contains("not a file"));

        let files = collect_discovered_files_parallel(temp_dir.path(), DiscoveryConfig::default()).await.unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].path, temp_dir.path().join("folder.txt"));
        assert!(files[0].error.as_deref().unwrap().contains("not a file"));
    }

    #[tokio::test]
    async fn test_find_files_skips_flagged_entries() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::create_dir(temp_dir.path().join("folder.txt")).unwrap();
        create_test_file(temp_dir.path(), "real.txt", b"x").await.unwrap();

        let paths = find_files(temp_dir.path(), "*.txt").await.unwrap();
        assert_eq!(paths, vec![temp_dir.path().join("real.txt")]);
    }

    #[tokio::test]
    async fn test_parallel_vs_serial_discovery() {
        let temp_dir = TempDir::new().unwrap();

        for i in 0..5 {
            create_test_file(temp_dir.path(), &format!("sub{}/file{i}.txt", i % 2), b"content").await.unwrap();
        }
        create_test_file(temp_dir.path(), "skip.bin", b"content").await.unwrap();

        let serial = collect_discovered_files(temp_dir.path(), DiscoveryConfig::default()).await.unwrap();
        let parallel = collect_discovered_files_parallel(temp_dir.path(), DiscoveryConfig::default()).await.unwrap();

        let mut serial_paths: Vec<_> = serial.iter().map(|f| &f.path).collect();
        let mut parallel_paths: Vec<_> = parallel.iter().map(|f| &f.path).collect();
        serial_paths.sort();
        parallel_paths.sort();

        assert_eq!(serial_paths.len(), 5);
        assert_eq!(serial_paths, parallel_paths);
    }

    #[tokio::test]
    async fn test_parallel_invalid_pattern() {
        let temp_dir = TempDir::new().unwrap();
        let config = DiscoveryConfig { pattern: "[".to_string(), ..Default::default() };

        let result = collect_discovered_files_parallel(temp_dir.path(), config).await;
        assert!(result.is_err());
    }

    fn flagged(files: &[FileValidation]) -> Vec<(PathBuf, bool)> {
        let mut flagged: Vec<_> = files.iter().map(|f| (f.path.clone(), f.error.is_some())).collect();
        flagged.sort();
        flagged
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlinks_agree_across_strategies() {
        let temp_dir = TempDir::new().unwrap();
        let target = create_test_file(temp_dir.path(), "data/real.bin", b"content").await.unwrap();
        create_test_file(temp_dir.path(), "plain.txt", b"content").await.unwrap();
        std::os::unix::fs::symlink(&target, temp_dir.path().join("linked.txt")).unwrap();
        std::os::unix::fs::symlink(temp_dir.path().join("missing"), temp_dir.path().join("dangling.txt")).unwrap();

        let serial = collect_discovered_files(temp_dir.path(), DiscoveryConfig::default()).await.unwrap();
        let parallel = collect_discovered_files_parallel(temp_dir.path(), DiscoveryConfig::default()).await.unwrap();

        let expected = vec![
            (temp_dir.path().join("dangling.txt"), true),
            (temp_dir.path().join("linked.txt"), false),
            (temp_dir.path().join("plain.txt"), false),
        ];
        assert_eq!(flagged(&serial), expected);
        assert_eq!(flagged(&parallel), expected);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_parallel_fail_fast_on_dangling_link() {
        let temp_dir = TempDir::new().unwrap();
        create_test_file(temp_dir.path(), "ok.txt", b"content").await.unwrap();
        std::os::unix::fs::symlink(temp_dir.path().join("missing"), temp_dir.path().join("dangling.txt")).unwrap();

        let config = DiscoveryConfig { fail_fast: true, ..Default::default() };
        assert!(collect_discovered_files_parallel(temp_dir.path(), config.clone()).await.is_err());
        assert!(collect_discovered_files(temp_dir.path(), config).await.is_err());
    }

    #[tokio::test]
    async fn test_parallel_walk_leaves_runtime_free() {
        let temp_dir = TempDir::new().unwrap();
        for i in 0..2000 {
            std::fs::write(temp_dir.path().join(format!("skip{i}.bin")), b"x").unwrap();
        }
        std::fs::write(temp_dir.path().join("keep.txt"), b"x").unwrap();

        // the default test runtime has a single thread, so a blocked
        // discovery task would starve this counter until the walk ends
        let ticks = Arc::new(std::sync::atomic::AtomicUsize::new(0));
        let done = Arc::new(std::sync::atomic::AtomicBool::new(false));
        let ticker = {
            let ticks = Arc::clone(&ticks);
            let done = Arc::clone(&done);
            tokio::spawn(async move {
                while !done.load(std::sync::atomic::Ordering::Relaxed) {
                    ticks.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
                    tokio::task::yield_now().await;
                }
            })
        };

        let before = ticks.load(std::sync::atomic::Ordering::Relaxed);
        let files = collect_discovered_files_parallel(temp_dir.path(), DiscoveryConfig::default()).await.unwrap();
        let during = ticks.load(std::sync::atomic::Ordering::Relaxed) - before;
        done.store(true, std::sync::atomic::Ordering::Relaxed);
        ticker.await.unwrap();

        assert_eq!(files.len(), 1);
        assert!(during > 10, "runtime only progressed {during} times during the walk");
    }
}
