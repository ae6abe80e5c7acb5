//! Ordered executable search path.

use std::fmt;
use std::path::{Path, PathBuf};

/// Separator between search-path entries on this platform.
pub const SEPARATOR: char = if cfg!(windows) { ';' } else { ':' };

/// An ordered list of directories consulted to locate executables.
///
/// # Example
///
/// ```
/// use gifstudio_setup::environment::SearchPath;
///
/// let machine = SearchPath::parse_with("C:\\Windows;C:\\Python312", ';');
/// let user = SearchPath::parse_with("C:\\Users\\me\\bin;;C:\\Windows", ';');
/// let merged = machine.merged(&user);
///
/// assert_eq!(merged.len(), 3);
/// assert!(merged.contains("C:\\Python312"));
/// assert_eq!(merged.join_with(';'), "C:\\Windows;C:\\Python312;C:\\Users\\me\\bin");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPath {
    entries: Vec<String>,
}

impl SearchPath {
    /// Create an empty search path.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a raw value using the platform separator.
    pub fn parse(value: &str) -> Self {
        Self::parse_with(value, SEPARATOR)
    }

    /// Parse a raw value with an explicit separator, dropping empty segments.
    pub fn parse_with(value: &str, separator: char) -> Self {
        let mut path = Self::new();
        for segment in value.split(separator) {
            path.push(segment);
        }
        path
    }

    /// Build from the current process `PATH`.
    pub fn from_process() -> Self {
        Self::parse(&std::env::var("PATH").unwrap_or_default())
    }

    /// Append an entry unless it is blank or already present.
    pub fn push(&mut self, entry: impl AsRef<str>) {
        let entry = entry.as_ref().trim();
        if entry.is_empty() || self.contains(entry) {
            return;
        }
        self.entries.push(entry.to_string());
    }

    /// Concatenate `other` after `self`, keeping the first occurrence of duplicates.
    pub fn merged(&self, other: &SearchPath) -> SearchPath {
        let mut result = self.clone();
        for entry in &other.entries {
            result.push(entry);
        }
        result
    }

    /// Whether an equivalent entry is present.
    ///
    /// Comparison ignores trailing separators, and ignores case on Windows.
    pub fn contains(&self, entry: &str) -> bool {
        self.entries.iter().any(|e| same_entry(e, entry))
    }

    /// Entries in order.
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Entries as directory paths.
    pub fn dirs(&self) -> impl Iterator<Item = &Path> {
        self.entries.iter().map(Path::new)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Join with an explicit separator.
    pub fn join_with(&self, separator: char) -> String {
        self.entries.join(&separator.to_string())
    }

    /// Locate `program` in these directories.
    ///
    /// `extensions` are tried in order after the bare name (PATHEXT on Windows).
    pub fn find_program(&self, program: &str, extensions: &[String]) -> Option<PathBuf> {
        let direct = Path::new(program);
        if direct.components().count() > 1 {
            return candidates(direct, extensions).find(|c| is_runnable(c));
        }

        self.dirs()
            .flat_map(|dir| candidates(&dir.join(program), extensions).collect::<Vec<_>>())
            .find(|c| is_runnable(c))
    }
}

impl fmt::Display for SearchPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.join_with(SEPARATOR))
    }
}

fn normalize(entry: &str) -> &str {
    entry.trim().trim_end_matches(['/', '\\'])
}

fn same_entry(a: &str, b: &str) -> bool {
    let (a, b) = (normalize(a), normalize(b));
    if cfg!(windows) {
        a.eq_ignore_ascii_case(b)
    } else {
        a == b
    }
}

fn candidates<'a>(base: &'a Path, extensions: &'a [String]) -> impl Iterator<Item = PathBuf> + 'a {
    std::iter::once(base.to_path_buf()).chain(extensions.iter().map(move |ext| {
        let mut name = base.as_os_str().to_os_string();
        name.push(ext);
        PathBuf::from(name)
    }))
}

/// Check whether a file has executable permission bits set.
#[cfg(unix)]
pub fn is_runnable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.is_file()
        && path
            .metadata()
            .map(|m| m.permissions().mode() & 0o111 != 0)
            .unwrap_or(false)
}

/// On Windows, executability is determined by file extension, not permission bits.
#[cfg(not(unix))]
pub fn is_runnable(path: &Path) -> bool {
    path.is_file()
}
