//! Script sources.
//!
//! A [`ScriptSource`] yields the full ordered list of migration scripts.
//! The migrator never reorders what a source returns, so sources that read
//! files sort by file name; zero-pad names (`001_init.sql`) to keep that
//! order numeric.

use std::borrow::Cow;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use rust_embed::RustEmbed;

use crate::error::{MigrateError, MigrateResult};

/// Ordered list of migration scripts.
pub trait ScriptSource {
    /// Return every script, in application order.
    fn list(&self) -> MigrateResult<Vec<String>>;
}

impl<T: ScriptSource + ?Sized> ScriptSource for &T {
    fn list(&self) -> MigrateResult<Vec<String>> {
        (**self).list()
    }
}

impl ScriptSource for [&str] {
    fn list(&self) -> MigrateResult<Vec<String>> {
        Ok(self.iter().map(|s| s.to_string()).collect())
    }
}

impl<const N: usize> ScriptSource for [&str; N] {
    fn list(&self) -> MigrateResult<Vec<String>> {
        self.as_slice().list()
    }
}

impl ScriptSource for [String] {
    fn list(&self) -> MigrateResult<Vec<String>> {
        Ok(self.to_vec())
    }
}

impl ScriptSource for Vec<String> {
    fn list(&self) -> MigrateResult<Vec<String>> {
        Ok(self.clone())
    }
}

impl ScriptSource for Vec<&str> {
    fn list(&self) -> MigrateResult<Vec<String>> {
        self.as_slice().list()
    }
}

/// A fixed in-memory list of scripts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticScripts(Vec<String>);

impl StaticScripts {
    /// Wrap `scripts` as a source.
    pub fn new(scripts: Vec<String>) -> Self {
        Self(scripts)
    }

    /// Append a script.
    pub fn push(&mut self, script: impl Into<String>) {
        self.0.push(script.into());
    }

    /// Number of scripts.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `true` when there are no scripts.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl ScriptSource for StaticScripts {
    fn list(&self) -> MigrateResult<Vec<String>> {
        Ok(self.0.clone())
    }
}

impl From<Vec<String>> for StaticScripts {
    fn from(scripts: Vec<String>) -> Self {
        Self(scripts)
    }
}

impl From<&[&str]> for StaticScripts {
    fn from(scripts: &[&str]) -> Self {
        scripts.iter().copied().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for StaticScripts {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Scripts compiled into the binary with `rust-embed`.
///
/// Lists the files directly inside `dir` (relative to the embed folder;
/// empty for the folder root), sorted by file name. Nested directories are
/// not descended into.
///
/// ```ignore
/// #[derive(rust_embed::RustEmbed)]
/// #[folder = "migrations/"]
/// struct Migrations;
///
/// let source = EmbeddedScripts::<Migrations>::new("");
/// ```
pub struct EmbeddedScripts<E: RustEmbed> {
    dir: String,
    _embed: PhantomData<fn() -> E>,
}

impl<E: RustEmbed> EmbeddedScripts<E> {
    /// List scripts under `dir` inside the embedded folder.
    pub fn new(dir: impl Into<String>) -> Self {
        Self {
            dir: dir.into().trim_matches('/').to_string(),
            _embed: PhantomData,
        }
    }

    /// Embedded paths of the scripts that will be listed, in order.
    pub fn file_names(&self) -> Vec<String> {
        let prefix = if self.dir.is_empty() {
            String::new()
        } else {
            format!("{}/", self.dir)
        };

        let mut names: Vec<String> = E::iter()
            .filter_map(|path| {
                let rest = path.strip_prefix(prefix.as_str())?;
                (!rest.is_empty() && !rest.contains('/')).then(|| path.to_string())
            })
            .collect();
        names.sort();
        names
    }
}

impl<E: RustEmbed> ScriptSource for EmbeddedScripts<E> {
    fn list(&self) -> MigrateResult<Vec<String>> {
        let names = self.file_names();
        if names.is_empty() {
            return Err(MigrateError::Source(format!(
                "no embedded scripts under '{}'",
                self.dir
            )));
        }

        names
            .iter()
            .map(|name| {
                let file = E::get(name).ok_or_else(|| {
                    MigrateError::Source(format!("embedded script '{}' disappeared", name))
                })?;
                decode_utf8(name, file.data)
            })
            .collect()
    }
}

fn decode_utf8(name: &str, data: Cow<'static, [u8]>) -> MigrateResult<String> {
    String::from_utf8(data.into_owned())
        .map_err(|_| MigrateError::Source(format!("script '{}' is not valid UTF-8", name)))
}

/// Scripts read from a directory on disk.
///
/// Only regular files directly inside the directory are read, sorted by
/// file name. An optional extension filter (without the dot) narrows the
/// listing, e.g. to `sql`.
#[derive(Debug, Clone)]
pub struct DirectoryScripts {
    path: PathBuf,
    extension: Option<String>,
}

impl DirectoryScripts {
    /// Read scripts from `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            extension: None,
        }
    }

    /// Only read files with this extension.
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = Some(extension.into().trim_start_matches('.').to_string());
        self
    }

    /// The directory being read.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Paths of the scripts that will be listed, in order.
    pub fn files(&self) -> MigrateResult<Vec<PathBuf>> {
        let entries = std::fs::read_dir(&self.path).map_err(|e| {
            MigrateError::Source(format!("cannot read {}: {}", self.path.display(), e))
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                MigrateError::Source(format!("cannot read {}: {}", self.path.display(), e))
            })?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if let Some(ext) = &self.extension {
                if !path.extension().is_some_and(|e| e == ext.as_str()) {
                    continue;
                }
            }
            files.push(path);
        }

        files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        Ok(files)
    }
}

impl ScriptSource for DirectoryScripts {
    fn list(&self) -> MigrateResult<Vec<String>> {
        self.files()?
            .iter()
            .map(|path| {
                std::fs::read_to_string(path).map_err(|e| {
                    MigrateError::Source(format!("cannot read {}: {}", path.display(), e))
                })
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "source_test.rs"]
mod tests;
