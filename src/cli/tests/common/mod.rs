use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const ACCESS_KEY: &str = "AKIAEXAMPLE0001";
pub const SECRET_KEY: &str = "wJalrXUtnFEMIexampleKEY";

/// A throwaway home directory with a template to reset from.
pub struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        fs::write(
            dir.path().join("template.env"),
            format!(
                "AWS_ACCESS_KEY_ID={}\nAWS_SECRET_ACCESS_KEY={}\n",
                ACCESS_KEY, SECRET_KEY
            ),
        )
        .expect("failed to write template");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn env_file(&self) -> PathBuf {
        self.path().join(".env")
    }

    pub fn template(&self) -> PathBuf {
        self.path().join("template.env")
    }

    pub fn read_env_file(&self) -> String {
        fs::read_to_string(self.env_file()).expect("failed to read env file")
    }

    pub fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::cargo_bin("workshop-setup").expect("binary not built");
        cmd.env("HOME", self.path())
            .env("AWS_SHARED_CREDENTIALS_FILE", self.path().join("aws/credentials"))
            .env("AWS_CONFIG_FILE", self.path().join("aws/config"))
            .env_remove("AWS_ACCESS_KEY_ID")
            .env_remove("AWS_SECRET_ACCESS_KEY")
            .env_remove("BUCKETNAME")
            .env_remove("DATABASE_URL")
            .arg("--env-file")
            .arg(self.env_file())
            .arg("--template")
            .arg(self.template())
            .arg("--login")
            .arg("alice")
            .args(args);
        cmd
    }
}
