//! Password store layout.
//!
//! Maps entry names to ciphertext paths and enumerates the entries of a
//! subtree in walk order.

use std::fs;
use std::path::{Component, Path, PathBuf};

use tracing::trace;

use crate::core::constants;
use crate::core::types::EntryName;
use crate::error::{Error, Result};

/// A password store rooted at a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Store {
    root: PathBuf,
}

impl Store {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Check that `name` is a plain store-relative path.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidEntry` for empty, absolute or `..` names.
    pub fn validate_name(name: &str) -> Result<()> {
        let invalid = |reason| {
            Err(Error::InvalidEntry {
                name: name.to_string(),
                reason,
            })
        };
        if name.trim().is_empty() {
            return invalid("name is empty");
        }
        let path = Path::new(name);
        let mut named = false;
        for component in path.components() {
            match component {
                Component::Normal(_) => named = true,
                Component::CurDir => {}
                Component::ParentDir => return invalid("must not contain '..'"),
                Component::RootDir | Component::Prefix(_) => {
                    return invalid("must be relative to the store")
                }
            }
        }
        if !named {
            return invalid("name is empty");
        }
        Ok(())
    }

    /// Ciphertext path of entry `name` (`<root>/<name>.gpg`).
    pub fn ciphertext_path(&self, name: &str) -> Result<PathBuf> {
        Self::validate_name(name)?;
        Ok(self
            .root
            .join(format!("{}.{}", name, constants::CIPHERTEXT_EXT)))
    }

    /// Path of the store directory `name`.
    pub fn dir_path(&self, name: &str) -> Result<PathBuf> {
        Self::validate_name(name)?;
        Ok(self.root.join(name))
    }

    /// Resolve a directory argument: relative paths are taken from the root
    /// and an empty path is the root itself.
    pub fn resolve_dir(&self, dir: &Path) -> PathBuf {
        if dir.as_os_str().is_empty() {
            self.root.clone()
        } else if dir.is_absolute() {
            dir.to_path_buf()
        } else {
            self.root.join(dir)
        }
    }

    /// Store-relative path with `/` separators; paths outside the store are
    /// returned unchanged.
    pub fn relative(&self, path: &Path) -> String {
        match path.strip_prefix(&self.root) {
            Ok(rel) => rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/"),
            Err(_) => path.display().to_string(),
        }
    }

    /// Entry name for a ciphertext path: relative, `.gpg` suffix stripped.
    pub fn entry_name(&self, path: &Path) -> EntryName {
        let rel = self.relative(path);
        let suffix = format!(".{}", constants::CIPHERTEXT_EXT);
        match rel.strip_suffix(&suffix) {
            Some(stripped) => stripped.to_string(),
            None => rel,
        }
    }

    /// Ciphertext files beneath `dir`, subdirectories included.
    ///
    /// Hidden files and directories are skipped. The result is sorted by
    /// parent directory, then file name, so the entries of one directory are
    /// always contiguous.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if a directory cannot be read.
    pub fn entries(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut found = Vec::new();
        if dir.is_dir() {
            collect(dir, &mut found)?;
        }
        found.sort_by(|a, b| {
            a.parent()
                .cmp(&b.parent())
                .then_with(|| a.file_name().cmp(&b.file_name()))
        });
        trace!(dir = %dir.display(), count = found.len(), "enumerated entries");
        Ok(found)
    }
}

fn collect(dir: &Path, found: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        let path = entry.path();
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            collect(&path, found)?;
        } else if path.extension().is_some_and(|e| e == constants::CIPHERTEXT_EXT) && path.is_file()
        {
            found.push(path);
        }
    }
    Ok(())
}
