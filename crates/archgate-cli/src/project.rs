//! Locates the project a run belongs to.
//!
//! The given path does not have to be the project root. `archgate check
//! src/domain` walks up from `src/domain` to the nearest directory holding
//! `archgate.toml` (or `.archgate.toml`); that directory becomes the root that
//! file ids, the baseline and the scan cache are relative to. The whole project
//! is still analysed, and `check` reports only violations in files under the
//! given directory. The upward search stops at the first directory containing
//! `.git`.
//!
//! Without a project config the scanned directory is the root, and
//! `$ARCHGATE_CONFIG_DIR/config.toml` (else `~/.archgate/config.toml`) is used
//! if present. `--config` skips the search and also anchors the root at the
//! scanned directory.

use anyhow::{bail, Context, Result};
use archgate_core::utils::relative_to;
use std::path::{Path, PathBuf};

/// Project-level config file names, checked in order in each directory.
const PROJECT_CONFIG_NAMES: &[&str] = &["archgate.toml", ".archgate.toml"];

/// Config file name within the global config directory.
const GLOBAL_CONFIG_NAME: &str = "config.toml";

/// Where the configuration comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Given with `--config` or `ARCHGATE_CONFIG`.
    Explicit(PathBuf),
    /// Found in the project root.
    Project(PathBuf),
    /// The user-wide fallback.
    Global(PathBuf),
    /// No config anywhere.
    Missing,
}

impl ConfigSource {
    /// Config file path, if one was found.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Project(p) | Self::Global(p) => Some(p),
            Self::Missing => None,
        }
    }
}

/// The anchor of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLocation {
    /// Directory that file ids, the baseline and the cache are relative to.
    pub root: PathBuf,
    /// Directory whose files are reported: `root` itself or a directory below it.
    pub scope: PathBuf,
    /// Configuration to load.
    pub config: ConfigSource,
}

impl ProjectLocation {
    /// Locates the project containing `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` is not an accessible directory.
    pub fn locate(path: &Path, explicit: Option<&Path>) -> Result<Self> {
        Self::locate_with(path, explicit, global_config_dir())
    }

    fn locate_with(path: &Path, explicit: Option<&Path>, global_dir: Option<PathBuf>) -> Result<Self> {
        let scope = path
            .canonicalize()
            .with_context(|| format!("Cannot access {}", path.display()))?;
        if !scope.is_dir() {
            bail!("{} is not a directory", path.display());
        }

        if let Some(config) = explicit {
            return Ok(Self {
                root: scope.clone(),
                scope,
                config: ConfigSource::Explicit(config.to_path_buf()),
            });
        }

        if let Some(config) = find_project_config(&scope) {
            let root = config.parent().map_or_else(|| scope.clone(), Path::to_path_buf);
            if root != scope {
                tracing::info!("Using project root {}", root.display());
            }
            return Ok(Self {
                root,
                scope,
                config: ConfigSource::Project(config),
            });
        }

        let config = global_dir
            .map(|dir| dir.join(GLOBAL_CONFIG_NAME))
            .filter(|p| p.is_file())
            .map_or(ConfigSource::Missing, |p| {
                tracing::info!("Using global config: {}", p.display());
                ConfigSource::Global(p)
            });
        Ok(Self {
            root: scope.clone(),
            scope,
            config,
        })
    }

    /// True when only part of the project is reported.
    #[must_use]
    pub fn is_partial(&self) -> bool {
        self.scope != self.root
    }

    /// True if the project-relative `file` lies inside `scope`.
    #[must_use]
    pub fn in_scope(&self, file: &str) -> bool {
        match relative_to(&self.root, &self.scope) {
            Some(prefix) if !prefix.is_empty() => file
                .strip_prefix(prefix.as_str())
                .is_some_and(|rest| rest.starts_with('/')),
            _ => true,
        }
    }
}

/// Nearest `archgate.toml` at or above `start`, not crossing a repository root.
fn find_project_config(start: &Path) -> Option<PathBuf> {
    for dir in start.ancestors() {
        for name in PROJECT_CONFIG_NAMES {
            let candidate = dir.join(name);
            if candidate.is_file() {
                tracing::debug!("Found project config: {}", candidate.display());
                return Some(candidate);
            }
        }
        if dir.join(".git").exists() {
            tracing::debug!("No project config below repository root {}", dir.display());
            break;
        }
    }
    None
}

/// `$ARCHGATE_CONFIG_DIR` if set, else `~/.archgate`.
fn global_config_dir() -> Option<PathBuf> {
    if let Some(dir) = std::env::var_os("ARCHGATE_CONFIG_DIR") {
        return Some(PathBuf::from(dir));
    }
    home::home_dir().map(|h| h.join(".archgate"))
}
