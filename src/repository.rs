//! Repository handle (spec §9: an explicit handle, not ambient process state).

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, UgitError};
use crate::hash::Hash;
use crate::ignore::Ignore;
use crate::refs::{self, HeadState, DEFAULT_BRANCH};
use crate::store::FileStore;

pub const METADATA_DIR: &str = ".ugit";

pub struct Repository {
    pub root: PathBuf,
    pub ignore: Ignore,
}

impl Repository {
    fn ugit_dir(root: &Path) -> PathBuf {
        root.join(METADATA_DIR)
    }

    #[must_use]
    pub fn ugit_path(&self) -> PathBuf {
        Self::ugit_dir(&self.root)
    }

    #[must_use]
    pub fn objects_dir(&self) -> PathBuf {
        self.ugit_path().join("objects")
    }

    #[must_use]
    pub fn index_path(&self) -> PathBuf {
        self.ugit_path().join("index")
    }

    #[must_use]
    pub fn config_path(&self) -> PathBuf {
        self.ugit_path().join("config")
    }

    pub fn object_store(&self) -> Result<FileStore> {
        FileStore::new(self.objects_dir())
    }

    /// Creates `.ugit` scaffolding and the default branch state. Idempotent:
    /// calling `init` on an already-initialized directory does not clear data.
    pub fn init(path: &Path) -> Result<Self> {
        let ugit_dir = Self::ugit_dir(path);

        fs::create_dir_all(ugit_dir.join("objects")).map_err(|source| UgitError::WriteError {
            path: ugit_dir.join("objects"),
            source,
        })?;
        fs::create_dir_all(ugit_dir.join("refs").join("heads")).map_err(|source| {
            UgitError::WriteError {
                path: ugit_dir.join("refs/heads"),
                source,
            }
        })?;

        let head_path = ugit_dir.join("HEAD");
        if !head_path.exists() {
            refs::set_head_symbolic(&ugit_dir, DEFAULT_BRANCH)?;
        }

        let root = path
            .canonicalize()
            .map_err(|source| UgitError::ReadError {
                path: path.to_path_buf(),
                source,
            })?;

        Ignore::ensure_ignore_file(&root)?;

        Ok(Self {
            ignore: Ignore::load(&root)?,
            root,
        })
    }

    /// Opens an existing repository, walking upward from `path` to find `.ugit`.
    pub fn open(path: &Path) -> Result<Self> {
        let root = Self::find_root(path)?;
        Ok(Self {
            ignore: Ignore::load(&root)?,
            root,
        })
    }

    fn find_root(start: &Path) -> Result<PathBuf> {
        let mut current = start
            .canonicalize()
            .map_err(|source| UgitError::ReadError {
                path: start.to_path_buf(),
                source,
            })?;

        loop {
            if current.join(METADATA_DIR).is_dir() {
                return Ok(current);
            }
            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => return Err(UgitError::NotARepository(start.to_path_buf())),
            }
        }
    }

    #[must_use]
    pub fn read_head(&self) -> Result<HeadState> {
        refs::read_head(&self.ugit_path())
    }

    pub fn resolve_head(&self) -> Result<Option<Hash>> {
        refs::resolve_head(&self.ugit_path())
    }

    pub fn current_branch(&self) -> Result<Option<String>> {
        match self.read_head()? {
            HeadState::Symbolic(name) => Ok(Some(name)),
            _ => Ok(None),
        }
    }
}
