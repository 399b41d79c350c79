//! Config directory lookup and the one-shot legacy directory migration.
//!
//! The config file lives in the platform config directory
//! (`~/.config/{tool}/config.yaml` on Linux). Older releases kept it under
//! `~/.config/{tool}` on every platform, so on macOS and Windows the legacy
//! directory is moved once into the platform location before flags resolve.

use std::path::{Path, PathBuf};

use crate::error::FlagError;

/// File name of the config file inside the tool's config directory.
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// Where a tool keeps its configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPaths {
    pub config_dir: PathBuf,
    pub legacy_dir: Option<PathBuf>,
}

impl ToolPaths {
    /// Resolve the platform config directory for `tool`.
    ///
    /// Returns `None` when no home directory can be determined.
    pub fn for_tool(tool: &str) -> Option<Self> {
        let proj = directories::ProjectDirs::from("", "", tool)?;
        let legacy_dir = directories::BaseDirs::new()
            .map(|base| base.home_dir().join(".config").join(tool));
        Some(Self {
            config_dir: proj.config_dir().to_path_buf(),
            legacy_dir,
        })
    }

    /// Paths rooted at an explicit directory, with no legacy location.
    pub fn in_dir(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
            legacy_dir: None,
        }
    }

    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE_NAME)
    }
}

/// Moves a directory to a new location.
pub trait DirMover: std::fmt::Debug {
    /// Move `from` to `to` if `from` exists and `to` does not.
    fn move_if_exists(&self, from: &Path, to: &Path) -> Result<(), FlagError>;
}

/// [`DirMover`] backed by `std::fs::rename`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsDirMover;

impl DirMover for FsDirMover {
    fn move_if_exists(&self, from: &Path, to: &Path) -> Result<(), FlagError> {
        if from == to || !from.is_dir() || to.exists() {
            return Ok(());
        }
        if let Some(parent) = to.parent() {
            std::fs::create_dir_all(parent).map_err(|e| FlagError::Migration {
                from: from.to_path_buf(),
                to: to.to_path_buf(),
                source: e,
            })?;
        }
        std::fs::rename(from, to).map_err(|e| FlagError::Migration {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
            source: e,
        })?;
        tracing::debug!(from = %from.display(), to = %to.display(), "migrated config directory");
        Ok(())
    }
}
