//! Writes settings into the shared AWS credentials and config files, the same way
//! `aws configure set <key> <value>` does.
//!
//! Credential keys go to the credentials file under `[<profile>]`. Everything else goes to the
//! config file under `[default]` or `[profile <name>]`. Unrelated sections, keys and comments are
//! kept as they are.

use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

const CREDENTIALS_FILE_ENV_VAR: &str = "AWS_SHARED_CREDENTIALS_FILE";
const CONFIG_FILE_ENV_VAR: &str = "AWS_CONFIG_FILE";
const CREDENTIAL_KEYS: [&str; 3] = [
    "aws_access_key_id",
    "aws_secret_access_key",
    "aws_session_token",
];

#[derive(Clone, Debug)]
pub struct ProfileStore {
    credentials_file: PathBuf,
    config_file: PathBuf,
    profile: String,
}

impl ProfileStore {
    pub fn new(
        credentials_file: impl Into<PathBuf>,
        config_file: impl Into<PathBuf>,
        profile: impl Into<String>,
    ) -> Self {
        Self {
            credentials_file: credentials_file.into(),
            config_file: config_file.into(),
            profile: profile.into(),
        }
    }

    /// Uses the same file locations the AWS CLI and SDK resolve.
    pub fn from_env(profile: impl Into<String>) -> Result<Self> {
        let aws_dir = || -> Result<PathBuf> {
            dirs::home_dir()
                .map(|home| home.join(".aws"))
                .ok_or_else(|| anyhow!("Could not determine the home directory"))
        };

        let credentials_file = match std::env::var_os(CREDENTIALS_FILE_ENV_VAR) {
            Some(path) => PathBuf::from(path),
            None => aws_dir()?.join("credentials"),
        };
        let config_file = match std::env::var_os(CONFIG_FILE_ENV_VAR) {
            Some(path) => PathBuf::from(path),
            None => aws_dir()?.join("config"),
        };

        Ok(Self::new(credentials_file, config_file, profile))
    }

    pub fn profile(&self) -> &str {
        &self.profile
    }

    pub fn credentials_file(&self) -> &Path {
        &self.credentials_file
    }

    pub fn config_file(&self) -> &Path {
        &self.config_file
    }

    fn target(&self, key: &str) -> (&Path, String) {
        if CREDENTIAL_KEYS.contains(&key) {
            (self.credentials_file.as_path(), self.profile.clone())
        } else if self.profile == "default" {
            (self.config_file.as_path(), "default".to_string())
        } else {
            (self.config_file.as_path(), format!("profile {}", self.profile))
        }
    }

    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let (path, section) = self.target(key);

        let existing = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(err) => return Err(err).with_context(|| format!("Failed to read {:?}", path)),
        };

        let updated = set_in_section(&existing, &section, key, value);

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create directory {:?}", parent))?;
            }
        }
        fs::write(path, updated).with_context(|| format!("Failed to write {:?}", path))?;
        restrict_permissions(path)?;

        tracing::debug!("Set {} in [{}] of {:?}", key, section, path);
        Ok(())
    }

    /// Reads a value back, looking in the file `set` would write it to.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let (path, section) = self.target(key);

        match fs::read_to_string(path) {
            Ok(content) => Ok(get_in_section(&content, &section, key)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err).with_context(|| format!("Failed to read {:?}", path)),
        }
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
        .with_context(|| format!("Failed to set permissions on {:?}", path))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

fn section_header(line: &str) -> Option<&str> {
    let line = line.trim();
    line.strip_prefix('[')?.strip_suffix(']').map(str::trim)
}

fn line_key(line: &str) -> Option<&str> {
    let line = line.trim();
    if line.starts_with('#') || line.starts_with(';') {
        return None;
    }
    line.split_once('=').map(|(k, _)| k.trim())
}

fn set_in_section(content: &str, section: &str, key: &str, value: &str) -> String {
    let mut lines: Vec<String> = content.lines().map(str::to_string).collect();
    let assignment = format!("{} = {}", key, value);

    let start = lines
        .iter()
        .position(|line| section_header(line) == Some(section));

    match start {
        Some(start) => {
            let end = lines[start + 1..]
                .iter()
                .position(|line| section_header(line).is_some())
                .map(|offset| start + 1 + offset)
                .unwrap_or(lines.len());

            match (start + 1..end).find(|i| line_key(&lines[*i]) == Some(key)) {
                Some(i) => lines[i] = assignment,
                None => {
                    // insert after the last non-blank line of the section
                    let mut insert_at = end;
                    while insert_at > start + 1 && lines[insert_at - 1].trim().is_empty() {
                        insert_at -= 1;
                    }
                    lines.insert(insert_at, assignment);
                }
            }
        }
        None => {
            if lines.last().is_some_and(|line| !line.trim().is_empty()) {
                lines.push(String::new());
            }
            lines.push(format!("[{}]", section));
            lines.push(assignment);
        }
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn get_in_section(content: &str, section: &str, key: &str) -> Option<String> {
    let mut in_section = false;
    for line in content.lines() {
        if let Some(header) = section_header(line) {
            in_section = header == section;
            continue;
        }
        if in_section && line_key(line) == Some(key) {
            return line.split_once('=').map(|(_, v)| v.trim().to_string());
        }
    }
    None
}
