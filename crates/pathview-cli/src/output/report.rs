use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::errors::Result;

/// Outcome of one batch run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub generated_at: String,
    pub sessions: Vec<SessionOutcome>,
}

/// What happened to one session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionOutcome {
    pub id: usize,
    pub session: String,
    /// Thumbnail written, when rendering succeeded
    pub output: Option<PathBuf>,
    pub error: Option<String>,
}

impl BatchReport {
    pub fn new(input_dir: PathBuf, output_dir: PathBuf) -> Self {
        Self {
            input_dir,
            output_dir,
            generated_at: chrono::Utc::now().to_rfc3339(),
            sessions: Vec::new(),
        }
    }

    pub fn record_success(&mut self, id: usize, session: &str, output: PathBuf) {
        self.sessions.push(SessionOutcome {
            id,
            session: session.to_string(),
            output: Some(output),
            error: None,
        });
    }

    pub fn record_failure(&mut self, id: usize, session: &str, error: String) {
        self.sessions.push(SessionOutcome {
            id,
            session: session.to_string(),
            output: None,
            error: Some(error),
        });
    }

    pub fn written(&self) -> usize {
        self.sessions.iter().filter(|s| s.output.is_some()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = &SessionOutcome> {
        self.sessions.iter().filter(|s| s.error.is_some())
    }

    pub fn passed(&self) -> bool {
        self.failures().next().is_none()
    }

    /// Write the report as pretty JSON.
    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
