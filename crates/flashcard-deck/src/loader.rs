//! Pairs problem and solution images found under a data folder.
//!
//! The folder must contain a `front` and a `back` directory. A file in
//! `front` and a file in `back` form a pair when the first run of digits in
//! their names is the same number, so `f12.png` pairs with `b12.jpg`.

use crate::error::{LoaderError, LoaderResult};
use crate::models::Pair;
use regex::Regex;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tracing::{debug, info};

/// Image extensions accepted when none are configured.
pub const DEFAULT_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

pub const FRONT_DIR: &str = "front";
pub const BACK_DIR: &str = "back";

static DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]+").expect("valid regex"));

/// Loader settings.
#[derive(Debug, Clone)]
pub struct LoaderOptions {
    /// Lowercase extensions without the dot.
    pub extensions: Vec<String>,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }
}

impl LoaderOptions {
    pub fn with_extensions<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            extensions: extensions
                .into_iter()
                .map(|e| e.as_ref().trim_start_matches('.').to_lowercase())
                .collect(),
        }
    }

    fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| self.extensions.iter().any(|x| x.eq_ignore_ascii_case(e)))
            .unwrap_or(false)
    }
}

/// Numeric id of a file name: its first run of ASCII digits.
pub fn extract_id(file_name: &str) -> Option<u64> {
    DIGITS.find(file_name).and_then(|m| m.as_str().parse().ok())
}

/// Load every problem/solution pair under `root`, sorted by id.
pub fn load_pairs(root: &Path, options: &LoaderOptions) -> LoaderResult<Vec<Pair>> {
    let front_dir = root.join(FRONT_DIR);
    let back_dir = root.join(BACK_DIR);

    for dir in [&front_dir, &back_dir] {
        if !dir.is_dir() {
            return Err(LoaderError::MissingDirectory(dir.clone()));
        }
    }

    let front = scan_dir(&front_dir, options)?;
    let mut back = scan_dir(&back_dir, options)?;
    debug!(front = front.len(), back = back.len(), "scanned image directories");

    let mut pairs = Vec::with_capacity(front.len().min(back.len()));
    let mut unmatched = 0usize;
    for (id, problem) in front {
        match back.remove(&id) {
            Some(solution) => pairs.push(Pair::new(id, problem, solution)),
            None => unmatched += 1,
        }
    }
    unmatched += back.len();
    if unmatched > 0 {
        debug!(unmatched, "skipped ids without a matching image");
    }

    if pairs.is_empty() {
        return Err(LoaderError::NoPairs(root.to_path_buf()));
    }

    info!(pairs = pairs.len(), root = %root.display(), "loaded image pairs");
    Ok(pairs)
}

fn scan_dir(dir: &Path, options: &LoaderOptions) -> LoaderResult<BTreeMap<u64, PathBuf>> {
    let io_err = |source| LoaderError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.is_file() && options.accepts(&path) {
            files.push(path);
        }
    }
    files.sort();

    let mut by_id = BTreeMap::new();
    for path in files {
        let id = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(extract_id);
        if let Some(id) = id {
            by_id.entry(id).or_insert(path);
        }
    }
    Ok(by_id)
}
