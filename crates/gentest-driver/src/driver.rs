//! Trace capture driver: walks fixtures through
//! `Loaded → Transformed → Executed → Captured → Written → (Paused)`.
//!
//! Fixtures run strictly one after another. Every output for a fixture is
//! prepared in memory before the first write, so an aborted fixture leaves
//! no partial files. A failing fixture is reported and the batch continues.

use crate::config::DriverConfig;
use crate::host::{ExecutionHost, HostError};
use gentest_core::backends::CLASS_PLACEHOLDER;
use gentest_core::sign::SignError;
use gentest_core::{
    BackendKind, BackendRecord, Execution, FixturePage, LintSeverity, lint_fixture, sign,
};
use std::fmt;
use std::path::{Path, PathBuf};
use tokio::io::AsyncBufReadExt;

// ─── States & errors ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixtureState {
    Loaded,
    Transformed,
    Executed,
    Captured,
    Written,
    Paused,
}

#[derive(Debug, thiserror::Error)]
pub enum DriverError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Host(#[from] HostError),

    #[error("duplicate {backend} record")]
    DuplicateRecord { backend: BackendKind },

    #[error("{backend} record arrived out of order")]
    OutOfOrderRecord { backend: BackendKind },

    #[error(transparent)]
    Sign(#[from] SignError),
}

impl DriverError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

// ─── Run summary ─────────────────────────────────────────────────────────

/// One problem found while processing a fixture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub fixture: String,
    /// `None` when the whole fixture was aborted.
    pub backend: Option<BackendKind>,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.backend {
            Some(backend) => write!(f, "{} [{backend}]: {}", self.fixture, self.message),
            None => write!(f, "{}: {}", self.fixture, self.message),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Fixtures processed, in order.
    pub fixtures: Vec<String>,
    /// Every file written.
    pub written: Vec<PathBuf>,
    pub diagnostics: Vec<Diagnostic>,
}

impl RunSummary {
    /// Fixtures with at least one diagnostic, in processing order.
    pub fn failed(&self) -> Vec<&str> {
        let mut failed: Vec<&str> = Vec::new();
        for diag in &self.diagnostics {
            if !failed.contains(&diag.fixture.as_str()) {
                failed.push(&diag.fixture);
            }
        }
        failed
    }

    pub fn is_success(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn log(&self) {
        log::info!(
            "generated {} fixture(s), wrote {} file(s)",
            self.fixtures.len(),
            self.written.len()
        );
        for diag in &self.diagnostics {
            log::warn!("{diag}");
        }
    }
}

// ─── Capture ─────────────────────────────────────────────────────────────

/// Records slotted by backend, in fixed backend order.
pub type CapturedRecords<'a> = [Option<&'a BackendRecord>; BackendKind::ALL.len()];

/// Match records to backends. Records must arrive at most once each and in
/// `BackendKind::ALL` order; empty slots are allowed.
///
/// # Errors
/// A duplicate or out-of-order record.
pub fn capture(execution: &Execution) -> Result<CapturedRecords<'_>, DriverError> {
    let mut slots: CapturedRecords<'_> = [None; BackendKind::ALL.len()];
    let mut last: Option<usize> = None;
    for record in &execution.records {
        let slot = record.backend.slot();
        if slots[slot].is_some() {
            return Err(DriverError::DuplicateRecord {
                backend: record.backend,
            });
        }
        if last.is_some_and(|l| l > slot) {
            return Err(DriverError::OutOfOrderRecord {
                backend: record.backend,
            });
        }
        slots[slot] = Some(record);
        last = Some(slot);
    }
    Ok(slots)
}

/// Java's placeholder class takes the fixture's name.
fn finalize_source(backend: BackendKind, fixture: &str, source: &str) -> String {
    match backend {
        BackendKind::Java => source.replacen(CLASS_PLACEHOLDER, fixture, 1),
        _ => source.to_string(),
    }
}

// ─── Driver ──────────────────────────────────────────────────────────────

pub struct Driver<H> {
    host: H,
    config: DriverConfig,
}

impl<H: ExecutionHost> Driver<H> {
    pub fn new(host: H, config: DriverConfig) -> Self {
        Self { host, config }
    }

    /// Process every selected fixture, then shut the host down.
    ///
    /// # Errors
    /// The fixture directory cannot be listed, or the host fails to shut
    /// down. Per-fixture failures end up in the summary instead.
    pub async fn run(mut self) -> Result<RunSummary, DriverError> {
        let paths = self
            .config
            .fixture_paths()
            .map_err(|e| DriverError::io(&self.config.fixtures_dir, e))?;

        let mut summary = RunSummary::default();
        for path in &paths {
            let name = fixture_name(path);
            log::info!("Generate {name}");
            summary.fixtures.push(name.clone());

            if let Err(e) = self.process(path, &name, &mut summary).await {
                log::error!("{name}: {e}");
                summary.diagnostics.push(Diagnostic {
                    fixture: name.clone(),
                    backend: None,
                    message: e.to_string(),
                });
            }

            if self.config.suspend {
                enter(&name, FixtureState::Paused);
                wait_for_enter(&name).await?;
            }
        }

        self.host.shutdown().await?;
        Ok(summary)
    }

    async fn process(
        &mut self,
        path: &Path,
        name: &str,
        summary: &mut RunSummary,
    ) -> Result<(), DriverError> {
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| DriverError::io(path, e))?;
        enter(name, FixtureState::Loaded);

        for diag in lint_fixture(&text) {
            let test = diag.test.as_deref().unwrap_or("-");
            let line = diag.line.map(|l| format!(":{l}")).unwrap_or_default();
            match diag.severity {
                LintSeverity::Warning => {
                    log::warn!("{name}{line} [{}] {test}: {}", diag.rule, diag.message)
                }
                LintSeverity::Info => {
                    log::info!("{name}{line} [{}] {test}: {}", diag.rule, diag.message)
                }
            }
        }

        let page = FixturePage::new(name, &text);
        enter(name, FixtureState::Transformed);

        let execution = self.host.execute(&page).await?;
        enter(name, FixtureState::Executed);

        let slots = capture(&execution)?;
        enter(name, FixtureState::Captured);

        let mut outputs = Vec::new();
        for (backend, slot) in BackendKind::ALL.into_iter().zip(slots) {
            let Some(record) = slot else {
                let message = execution
                    .failures
                    .iter()
                    .find(|f| f.backend == backend)
                    .map_or_else(|| "no record produced".to_string(), |f| f.error.to_string());
                summary.diagnostics.push(Diagnostic {
                    fixture: name.to_string(),
                    backend: Some(backend),
                    message,
                });
                continue;
            };
            let source = sign(&finalize_source(backend, name, &record.source))?;
            outputs.push((self.config.output.path_for(backend, name), source));
        }

        for (path, source) in outputs {
            write_output(&path, &source).await?;
            log::debug!("{name}: wrote {}", path.display());
            summary.written.push(path);
        }
        enter(name, FixtureState::Written);
        Ok(())
    }
}

fn enter(fixture: &str, state: FixtureState) {
    log::debug!("{fixture}: {state:?}");
}

fn fixture_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

async fn write_output(path: &Path, source: &str) -> Result<(), DriverError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| DriverError::io(parent, e))?;
    }
    tokio::fs::write(path, source)
        .await
        .map_err(|e| DriverError::io(path, e))
}

async fn wait_for_enter(fixture: &str) -> Result<(), DriverError> {
    log::info!("{fixture}: paused, press Enter to continue");
    let mut line = String::new();
    tokio::io::BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await
        .map_err(|e| DriverError::io(Path::new("<stdin>"), e))?;
    Ok(())
}
