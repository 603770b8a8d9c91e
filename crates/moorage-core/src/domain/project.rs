//! Compose project domain types.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::{COMPOSE_FILE_NAME, ENV_FILE_NAME};
use crate::domain::ContainerCounts;
use crate::ports::CoreError;

/// Marker prefix for directories that are never treated as projects.
pub const HIDDEN_PREFIX: char = '.';

/// A project directory name that is safe to join onto the project root.
///
/// Rejects empty names, hidden names (which covers `.` and `..`) and path
/// separators. Symlinks that leave the root are caught when the directory
/// is resolved.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProjectName(String);

impl ProjectName {
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        if raw.is_empty() || raw.starts_with(HIDDEN_PREFIX) {
            return Err(CoreError::Validation("invalid project".to_string()));
        }
        if raw.contains(['/', '\\', '\0']) {
            return Err(CoreError::Validation("invalid project".to_string()));
        }
        Ok(Self(raw.to_string()))
    }

    /// Whether a directory entry name is hidden from discovery.
    pub fn is_hidden(raw: &str) -> bool {
        raw.starts_with(HIDDEN_PREFIX)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Project directory under `root`.
    pub fn dir_in(&self, root: &Path) -> PathBuf {
        root.join(&self.0)
    }
}

impl fmt::Display for ProjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A discovered compose project with its container counts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRecord {
    pub name: String,
    pub path: PathBuf,
    pub has_env: bool,
    pub counts: ContainerCounts,
}

/// Which project file to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectFileKind {
    Compose,
    Env,
}

impl ProjectFileKind {
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Compose => COMPOSE_FILE_NAME,
            Self::Env => ENV_FILE_NAME,
        }
    }

    /// Short label used in error messages.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Compose => "compose file",
            Self::Env => ".env",
        }
    }
}

/// Raw contents of a project file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectFile {
    pub name: String,
    pub path: PathBuf,
    pub text: String,
}
