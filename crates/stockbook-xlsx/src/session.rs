use std::path::{Path, PathBuf};

/// The file a running inventory session loads from and persists to.
///
/// Owned by the application shell and passed into ledger operations; there is no global
/// "current file".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    active_file: Option<PathBuf>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(path: impl Into<PathBuf>) -> Self {
        Self {
            active_file: Some(path.into()),
        }
    }

    pub fn active_file(&self) -> Option<&Path> {
        self.active_file.as_deref()
    }

    pub fn is_active(&self) -> bool {
        self.active_file.is_some()
    }

    pub fn associate(&mut self, path: impl Into<PathBuf>) {
        self.active_file = Some(path.into());
    }

    pub fn clear(&mut self) {
        self.active_file = None;
    }
}
