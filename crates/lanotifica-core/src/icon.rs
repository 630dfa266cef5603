//! Application icon lookup.
//!
//! Icons live in a flat directory named after the sending application's
//! package, e.g. `com.example.chat.png`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use tracing::debug;

/// Extensions tried, in order, for each package.
const ICON_EXTENSIONS: &[&str] = &["png", "svg", "jpg"];

/// Resolves a package identifier to a local icon file.
pub trait IconResolver: Send + Sync {
    /// Returns the icon path for `package`, or `None` when there is none.
    fn resolve(&self, package: &str) -> Option<PathBuf>;
}

/// Resolver that never finds an icon.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoIcons;

impl IconResolver for NoIcons {
    fn resolve(&self, _package: &str) -> Option<PathBuf> {
        None
    }
}

/// Directory-backed resolver that remembers every icon it has found.
///
/// Misses are not remembered so that icons dropped into the directory
/// while the relay runs are picked up.
#[derive(Debug)]
pub struct IconCache {
    dir: PathBuf,
    found: RwLock<HashMap<String, PathBuf>>,
}

impl IconCache {
    /// Creates a cache over `dir`. The directory does not need to exist.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            found: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the icon directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[cfg(test)]
    fn cached(&self) -> usize {
        self.found.read().len()
    }

    fn lookup(&self, package: &str) -> Option<PathBuf> {
        ICON_EXTENSIONS
            .iter()
            .map(|ext| self.dir.join(format!("{package}.{ext}")))
            .find(|candidate| candidate.is_file())
    }
}

impl IconResolver for IconCache {
    fn resolve(&self, package: &str) -> Option<PathBuf> {
        if !is_valid_package(package) {
            return None;
        }

        if let Some(path) = self.found.read().get(package) {
            return Some(path.clone());
        }

        let path = self.lookup(package)?;
        debug!(package, path = %path.display(), "Resolved app icon");
        self.found.write().insert(package.to_string(), path.clone());
        Some(path)
    }
}

/// Package names are used as file names, so only plain identifiers pass.
fn is_valid_package(package: &str) -> bool {
    !package.is_empty()
        && !package.starts_with('.')
        && package
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}

/// Returns the default icon directory (`<data dir>/lanotifica/icons`).
pub fn default_icon_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("lanotifica")
        .join("icons")
}
