//! Execution hosts: turn a fixture page into measured layouts and backend
//! records.
//!
//! `ChromeHost` measures in a real browser. `ReplayHost` reads layouts a
//! previous Chrome run recorded, so generation can run without a browser.

use gentest_core::layout::MeasuredPage;
use gentest_core::{Execution, FixturePage, TraceError, execute_page};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("browser: {0}")]
    Browser(String),

    #[error("timed out measuring `{fixture}`")]
    Timeout { fixture: String },

    #[error("measurement script returned no layout for `{fixture}`")]
    MissingLayout { fixture: String },

    #[error("invalid measured layout: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Trace(#[from] TraceError),
}

impl HostError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Runs every backend for one fixture.
///
/// Hosts are driven sequentially; each `execute` completes before the next
/// fixture is submitted.
#[allow(async_fn_in_trait)]
pub trait ExecutionHost {
    async fn execute(&mut self, page: &FixturePage) -> Result<Execution, HostError>;

    /// Release the host's session. Called once after the batch.
    async fn shutdown(self) -> Result<(), HostError>
    where
        Self: Sized;
}

/// Replay file for a fixture inside `dir`.
#[must_use]
pub fn replay_path(dir: &Path, fixture: &str) -> PathBuf {
    dir.join(format!("{fixture}.json"))
}

// ─── Replay ──────────────────────────────────────────────────────────────

/// Serves layouts from `<dir>/<fixture>.json`.
#[derive(Debug, Clone)]
pub struct ReplayHost {
    dir: PathBuf,
}

impl ReplayHost {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ExecutionHost for ReplayHost {
    async fn execute(&mut self, page: &FixturePage) -> Result<Execution, HostError> {
        let path = replay_path(&self.dir, &page.name);
        let json = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| HostError::io(&path, e))?;
        let layouts = MeasuredPage::from_json(&json)?;
        log::debug!("{}: replaying layouts from {}", page.name, path.display());
        Ok(execute_page(page, &layouts)?)
    }

    async fn shutdown(self) -> Result<(), HostError> {
        Ok(())
    }
}

/// Save measured layouts for later replay.
pub(crate) async fn record_layouts(
    dir: &Path,
    fixture: &str,
    layouts: &MeasuredPage,
) -> Result<(), HostError> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| HostError::io(dir, e))?;
    let path = replay_path(dir, fixture);
    tokio::fs::write(&path, layouts.to_json()?)
        .await
        .map_err(|e| HostError::io(&path, e))
}
