//! Writes generated files into the public directory
//!
//! Outputs are staged in memory first and only written once the whole
//! build has rendered, so a failing build leaves the public dir alone.

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::BuildError;

/// Summary of one generation pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub posts: usize,
    /// Files whose contents changed (or were new)
    pub written: usize,
    /// Files already up to date
    pub unchanged: usize,
    /// Stale files removed from a previous build
    pub removed: usize,
}

/// Collects every file a build produces, keyed by path under the public dir
pub struct OutputWriter {
    public_dir: PathBuf,
    staged: BTreeMap<PathBuf, Vec<u8>>,
}

impl OutputWriter {
    pub fn new(public_dir: &Path) -> Self {
        Self {
            public_dir: public_dir.to_path_buf(),
            staged: BTreeMap::new(),
        }
    }

    /// Stage `contents` for `relative`. Each path may only be produced once.
    pub fn stage(&mut self, relative: &Path, contents: impl Into<Vec<u8>>) -> Result<()> {
        if self.staged.contains_key(relative) {
            return Err(BuildError::OutputCollision(relative.to_path_buf()).into());
        }
        self.staged.insert(relative.to_path_buf(), contents.into());
        Ok(())
    }

    /// Stage a copy of a file from outside the public dir
    pub fn stage_copy(&mut self, source: &Path, relative: &Path) -> Result<()> {
        let contents = fs::read(source).with_context(|| format!("Failed to read {:?}", source))?;
        self.stage(relative, contents)
    }

    /// Write every staged file, then delete files this build did not produce
    pub fn commit(self, posts: usize) -> Result<BuildReport> {
        fs::create_dir_all(&self.public_dir)
            .with_context(|| format!("Failed to create {:?}", self.public_dir))?;

        let mut report = BuildReport {
            posts,
            ..BuildReport::default()
        };

        for (relative, contents) in &self.staged {
            let path = self.public_dir.join(relative);
            if write_if_changed(&path, contents)? {
                report.written += 1;
                tracing::debug!("Generated: {:?}", path);
            } else {
                report.unchanged += 1;
            }
        }

        report.removed = self.prune_stale()?;
        Ok(report)
    }

    fn prune_stale(&self) -> Result<usize> {
        let mut stale = Vec::new();
        for entry in WalkDir::new(&self.public_dir) {
            let entry = entry?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry.path().strip_prefix(&self.public_dir)?;
            if !self.staged.contains_key(relative) {
                stale.push(entry.path().to_path_buf());
            }
        }

        for path in &stale {
            fs::remove_file(path).with_context(|| format!("Failed to remove {:?}", path))?;
            tracing::debug!("Removed stale: {:?}", path);
            remove_empty_parents(path, &self.public_dir);
        }

        Ok(stale.len())
    }
}

/// Write a file only when its contents differ. Returns whether it wrote.
pub fn write_if_changed(path: &Path, contents: &[u8]) -> Result<bool> {
    if let Ok(existing) = fs::read(path) {
        if existing == contents {
            return Ok(false);
        }
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("Failed to create dir {:?}", parent))?;
    }
    fs::write(path, contents).with_context(|| format!("Failed to write {:?}", path))?;
    Ok(true)
}

fn remove_empty_parents(path: &Path, stop: &Path) {
    let mut dir = path.parent();
    while let Some(d) = dir {
        if d == stop || fs::remove_dir(d).is_err() {
            break;
        }
        dir = d.parent();
    }
}
