//! The environment record: a flat `KEY=VALUE` file used to hand configuration from one setup
//! stage to the next.
//!
//! The file is only ever appended to during a session. The in-memory copy keeps entries in the
//! order they first appeared so the file can be inspected and compared line by line.

use anyhow::{bail, Context, Result};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Keys whose values are never printed in full.
const SECRET_MARKERS: [&str; 3] = ["SECRET", "PASSWORD", "DATABASE_URL"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnvRecord {
    path: PathBuf,
    entries: Vec<(String, String)>,
}

impl EnvRecord {
    /// A record bound to `path` that has not been read yet.
    pub fn unloaded(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: Vec::new(),
        }
    }

    /// Removes any existing record at `path` and replaces it with a copy of `template`.
    pub fn reset(path: impl AsRef<Path>, template: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let template = template.as_ref();

        if !template.is_file() {
            bail!("Environment template {:?} does not exist", template);
        }

        match fs::remove_file(path) {
            Ok(()) => debug!("Removed existing environment file {:?}", path),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => {
                return Err(err).with_context(|| format!("Failed to remove {:?}", path));
            }
        }

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory {:?}", parent))?;
            }
        }

        fs::copy(template, path)
            .with_context(|| format!("Failed to copy {:?} to {:?}", template, path))?;
        info!("Environment file {:?} reset from {:?}", path, template);

        Self::load(path)
    }

    /// Reads the record at `path`. Later duplicates of a key are ignored.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let iter = dotenvy::from_path_iter(path)
            .with_context(|| format!("Failed to open environment file {:?}", path))?;

        let mut record = Self::unloaded(path);
        for item in iter {
            let (key, value) =
                item.with_context(|| format!("Failed to parse environment file {:?}", path))?;
            if record.get(&key).is_none() {
                record.entries.push((key, value));
            }
        }

        debug!("Loaded {} entries from {:?}", record.entries.len(), path);
        Ok(record)
    }

    /// Re-reads the file this record is bound to.
    pub fn refresh(&mut self) -> Result<()> {
        *self = Self::load(&self.path)?;
        Ok(())
    }

    /// Appends `key=value` to the file and to the in-memory view.
    ///
    /// Keys are never rewritten: appending a key that is already present is an error.
    pub fn append(&mut self, key: &str, value: &str) -> Result<()> {
        if !is_valid_key(key) {
            bail!("'{}' is not a valid environment variable name", key);
        }
        if value.contains('\n') {
            bail!("Value for '{}' must be a single line", key);
        }
        if self.get(key).is_some() {
            bail!(
                "Environment file {:?} already defines '{}'; reset it before running setup again",
                self.path,
                key
            );
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open {:?} for appending", self.path))?;

        // the template may not end with a newline
        let needs_newline = fs::read(&self.path)
            .map(|bytes| bytes.last().is_some_and(|last| *last != b'\n'))
            .unwrap_or(false);
        if needs_newline {
            writeln!(file)?;
        }
        writeln!(file, "{}={}", key, value)
            .with_context(|| format!("Failed to write '{}' to {:?}", key, self.path))?;

        self.entries.push((key.to_string(), value.to_string()));
        info!("Appended {} to {:?}", key, self.path);
        Ok(())
    }

    /// Loads the file into the process environment.
    ///
    /// Variables that are already set are left as they are, and nothing absent from the file is
    /// removed, so calling this repeatedly is safe.
    pub fn reload_into_process(&self) -> Result<()> {
        dotenvy::from_path(&self.path)
            .with_context(|| format!("Failed to load {:?} into the environment", self.path))?;
        debug!("Reloaded {:?} into the process environment", self.path);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn keys(&self) -> Vec<&str> {
        self.entries.iter().map(|(k, _)| k.as_str()).collect()
    }

    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries with secret-looking values replaced, suitable for printing.
    pub fn masked_entries(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .map(|(k, v)| {
                let value = if is_secret_key(k) {
                    mask(v)
                } else {
                    v.clone()
                };
                (k.clone(), value)
            })
            .collect()
    }
}

fn is_valid_key(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn is_secret_key(key: &str) -> bool {
    let upper = key.to_ascii_uppercase();
    SECRET_MARKERS.iter().any(|marker| upper.contains(marker))
}

/// Keeps the last four characters of long values.
pub fn mask(value: &str) -> String {
    let count = value.chars().count();
    if count <= 8 {
        return "********".to_string();
    }
    let tail: String = value.chars().skip(count - 4).collect();
    format!("********{}", tail)
}
