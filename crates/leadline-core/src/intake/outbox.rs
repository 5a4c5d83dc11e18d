use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

use super::{Intake, IntakeError, LeadRecord};

/// Outbox file name in the data directory
const OUTBOX_FILE: &str = "leads.jsonl";

/// Intake that appends each lead as one JSON line to a local file.
pub struct OutboxIntake {
    dir: PathBuf,
}

impl OutboxIntake {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(OUTBOX_FILE)
    }

    /// Read every lead recorded so far, oldest first.
    /// Lines that fail to parse are skipped and logged.
    pub async fn read_all(&self) -> Result<Vec<LeadRecord>, IntakeError> {
        let path = self.path();
        if !path_exists(&path).await {
            return Ok(Vec::new());
        }

        let contents = fs::read_to_string(&path).await?;
        let mut leads = Vec::new();
        for (index, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str(line) {
                Ok(lead) => leads.push(lead),
                Err(e) => warn!(line = index + 1, error = %e, "Skipping unreadable outbox line"),
            }
        }
        Ok(leads)
    }
}

async fn path_exists(path: &Path) -> bool {
    fs::metadata(path).await.is_ok()
}

#[async_trait]
impl Intake for OutboxIntake {
    async fn deliver(&self, lead: &LeadRecord) -> Result<(), IntakeError> {
        fs::create_dir_all(&self.dir).await?;

        let mut line = serde_json::to_string(lead)?;
        line.push('\n');

        let path = self.path();
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        debug!(?path, "Lead appended to outbox");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "outbox"
    }
}
