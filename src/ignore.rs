//! Ignore matching (spec §4.4): exact-prefix directory ignores and simple
//! glob patterns, loaded from `.ugitignore`. Always filters the metadata
//! directory regardless of what the ignore file says.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, UgitError};
use crate::repository::METADATA_DIR;

const IGNORE_FILE: &str = ".ugitignore";

/// Ignore matcher loaded from `.ugitignore`. Rules are repo-root-relative
/// and use `/` separators.
pub struct Ignore {
    root: PathBuf,
    exact: Vec<Vec<u8>>,
    prefixes: Vec<Vec<u8>>,
    globs: Vec<SimpleGlob>,
}

impl Ignore {
    pub fn load(repo_root: &Path) -> Result<Self> {
        let root = repo_root
            .canonicalize()
            .map_err(|source| UgitError::ReadError {
                path: repo_root.to_path_buf(),
                source,
            })?;

        let mut exact = Vec::new();
        let mut prefixes = Vec::new();
        let mut globs = Vec::new();

        prefixes.push(format!("{METADATA_DIR}/").into_bytes());
        exact.push(METADATA_DIR.as_bytes().to_vec());

        let path = root.join(IGNORE_FILE);
        if let Ok(content) = fs::read_to_string(&path) {
            for raw in content.lines() {
                let line = raw.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }

                let mut p = line.replace('\\', "/");
                while p.starts_with('/') {
                    p.remove(0);
                }

                if p.is_empty() {
                    continue;
                }

                if p.ends_with('/') {
                    prefixes.push(p.into_bytes());
                    continue;
                }

                if p.as_bytes().iter().any(|&b| matches!(b, b'*' | b'?')) {
                    globs.push(SimpleGlob::new(&p));
                    continue;
                }

                exact.push(p.as_bytes().into());
                let mut dir = p.into_bytes();
                dir.push(b'/');
                prefixes.push(dir);
            }
        }

        exact.sort_unstable();
        exact.dedup();
        prefixes.sort_unstable();
        prefixes.dedup();

        Ok(Self {
            root,
            exact,
            prefixes,
            globs,
        })
    }

    #[must_use]
    pub fn empty() -> Self {
        Self {
            root: PathBuf::new(),
            exact: vec![METADATA_DIR.as_bytes().to_vec()],
            prefixes: vec![format!("{METADATA_DIR}/").into_bytes()],
            globs: Vec::new(),
        }
    }

    pub(crate) fn ensure_ignore_file(root: &Path) -> Result<()> {
        let path = root.join(IGNORE_FILE);
        if path.exists() {
            return Ok(());
        }
        fs::write(
            &path,
            "# .ugitignore: ignore rules (repo-root-relative)\n\
# Lines ending with / ignore a directory prefix.\n\
# * and ? are supported.\n",
        )
        .map_err(|source| UgitError::WriteError { path, source })
    }

    #[must_use]
    pub fn is_ignored_abs(&self, abs: &Path) -> bool {
        let Ok(rel) = abs.strip_prefix(&self.root) else {
            return false;
        };
        if rel.as_os_str().is_empty() {
            return false;
        }
        let rel_str = rel.to_string_lossy().replace('\\', "/");
        self.is_ignored_rel(&rel_str)
    }

    #[must_use]
    pub fn is_ignored_rel(&self, rel: &str) -> bool {
        let rel = rel.trim_start_matches('/');
        if rel.is_empty() {
            return false;
        }

        let bytes = rel.as_bytes();

        if self
            .exact
            .binary_search_by(|e| e.as_slice().cmp(bytes))
            .is_ok()
        {
            return true;
        }

        for p in &self.prefixes {
            if bytes.starts_with(p.as_slice()) {
                return true;
            }
        }

        for g in &self.globs {
            if g.is_match(bytes) {
                return true;
            }
        }

        false
    }
}

/// Minimal glob matcher for `*` and `?`. Matches across `/` as well, since
/// patterns are applied to full repo-relative path strings.
pub struct SimpleGlob {
    pat: Vec<u8>,
}

impl SimpleGlob {
    #[must_use]
    pub fn new(pat: &str) -> Self {
        Self {
            pat: pat.as_bytes().to_vec(),
        }
    }

    #[must_use]
    pub fn is_match(&self, text: &[u8]) -> bool {
        let pat = &self.pat;

        let (mut pi, mut ti) = (0usize, 0usize);
        let (mut star, mut star_text) = (None::<usize>, 0usize);

        while ti < text.len() {
            if pi < pat.len() && (pat[pi] == text[ti] || pat[pi] == b'?') {
                pi += 1;
                ti += 1;
                continue;
            }

            if pi < pat.len() && pat[pi] == b'*' {
                star = Some(pi);
                pi += 1;
                star_text = ti;
                continue;
            }

            if let Some(star_pi) = star {
                pi = star_pi + 1;
                star_text += 1;
                ti = star_text;
                continue;
            }

            return false;
        }

        while pi < pat.len() && pat[pi] == b'*' {
            pi += 1;
        }

        pi == pat.len()
    }
}
