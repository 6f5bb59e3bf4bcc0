//! Thin directory helper: list children, create subdirectories, build file paths.

use anyhow::{Context, Result, bail};
use std::fmt;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Directory {
    path: PathBuf,
}

/// A child of a [`Directory`]: either a nested directory or a file path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Child {
    Dir(Directory),
    File(PathBuf),
}

impl Directory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Open an existing directory; errors if `path` is missing or not a directory.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.is_dir() {
            bail!("Directory {} does not exist", path.display());
        }
        Ok(Self { path })
    }

    /// Open `path`, creating it (and parents) when missing.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        std::fs::create_dir_all(&path)
            .with_context(|| format!("create directory {}", path.display()))?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn names_where(&self, pred: impl Fn(&Path) -> bool) -> Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.path)
            .with_context(|| format!("read directory {}", self.path.display()))?
        {
            let entry = entry?;
            if pred(&entry.path()) {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Names of immediate subdirectories, sorted.
    pub fn subdirs(&self) -> Result<Vec<String>> {
        self.names_where(|p| p.is_dir())
    }

    /// Names of immediate files, sorted.
    pub fn files(&self) -> Result<Vec<String>> {
        self.names_where(|p| p.is_file())
    }

    /// Names of all immediate children, sorted.
    pub fn children(&self) -> Result<Vec<String>> {
        self.names_where(|_| true)
    }

    /// Create (if needed) and return the subdirectory `name`.
    pub fn new_subdir(&self, name: &str) -> Result<Directory> {
        Directory::create(self.path.join(name))
    }

    /// Path for a file `name[.ext]` in this directory. Does not touch the filesystem.
    pub fn new_file(&self, name: &str, ext: Option<&str>) -> PathBuf {
        match ext {
            Some(ext) => self.path.join(format!("{name}.{ext}")),
            None => self.path.join(name),
        }
    }

    /// Existing child `name`; errors if it does not exist.
    pub fn get(&self, name: &str) -> Result<Child> {
        let child = self.path.join(name);
        if !child.exists() {
            bail!("{} not in {}", name, self);
        }
        Ok(if child.is_dir() {
            Child::Dir(Directory::new(child))
        } else {
            Child::File(child)
        })
    }

    /// All files below this directory (recursive), sorted. Unreadable entries are skipped with a warning.
    pub fn walk_files(&self, follow_links: bool) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = WalkDir::new(&self.path)
            .follow_links(follow_links)
            .into_iter()
            .filter_map(|r| match r {
                Ok(entry) => Some(entry),
                Err(err) => {
                    log::warn!("Skipping unreadable path: {}", err);
                    None
                }
            })
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .collect();
        files.sort();
        files
    }
}

impl fmt::Display for Directory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Directory({})", self.path.display())
    }
}
