use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::LazyLock;
use workshop_common::constants::{LOG_FILE_NAME, WORKING_DIR};

pub static WORKSHOP_WORK_DIR: LazyLock<WorkshopWorkDir> = LazyLock::new(|| {
    let path = PathBuf::from(WORKING_DIR);
    WorkshopWorkDir {
        log_file: path.join(LOG_FILE_NAME),
        path,
    }
});

pub struct WorkshopWorkDir {
    pub path: PathBuf,
    pub log_file: PathBuf,
}

impl WorkshopWorkDir {
    pub fn init(&self) -> Result<()> {
        if !self.path.exists() {
            std::fs::create_dir_all(&self.path)
                .with_context(|| format!("Failed to create working directory {:?}", self.path))?;
        }
        Ok(())
    }
}
