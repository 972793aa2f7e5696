//! Document handles.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// A real file backing a page.
///
/// The path is the page identity; basename and extension are derived
/// from it once so link resolution doesn't re-split paths on every lookup.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Document {
    /// Vault-relative path, e.g. `notes/topic.md`.
    pub path: String,

    /// File stem, e.g. `topic`.
    pub basename: String,

    /// Extension without the dot. Empty when the path has none.
    pub extension: String,
}

impl Document {
    /// Creates a handle for the file at `path`.
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        let (basename, extension) = {
            let p = Path::new(&path);
            let stem = p
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            let ext = p
                .extension()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            (stem, ext)
        };

        Self {
            path,
            basename,
            extension,
        }
    }

    /// Whether this is a markdown note (as opposed to an attachment).
    pub fn is_markdown(&self) -> bool {
        self.extension.eq_ignore_ascii_case("md")
    }
}

impl std::fmt::Display for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path)
    }
}
