//! Driver configuration.

use crate::output::OutputLayout;
use std::path::PathBuf;

/// Where the measured layouts come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostChoice {
    /// Lay fixtures out in Chromium.
    Chrome {
        headless: bool,
        /// Save every measured page here for later replay.
        record: Option<PathBuf>,
    },
    /// Read `<dir>/<fixture>.json` recorded by an earlier run.
    Replay(PathBuf),
}

impl Default for HostChoice {
    fn default() -> Self {
        Self::Chrome {
            headless: false,
            record: None,
        }
    }
}

/// Settings for one batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverConfig {
    /// Directory holding `*.html` fixtures.
    pub fixtures_dir: PathBuf,
    /// Restrict the batch to one fixture stem, e.g. `YGMarginTest`.
    pub fixture: Option<String>,
    /// Wait for Enter after each fixture.
    pub suspend: bool,
    pub host: HostChoice,
    pub output: OutputLayout,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            fixtures_dir: PathBuf::from("gentest/fixtures"),
            fixture: None,
            suspend: false,
            host: HostChoice::default(),
            output: OutputLayout::default(),
        }
    }
}

impl DriverConfig {
    /// Fixture files to process, sorted by file name.
    ///
    /// A requested fixture that does not exist logs a warning and falls back
    /// to every fixture in the directory.
    pub fn fixture_paths(&self) -> std::io::Result<Vec<PathBuf>> {
        if let Some(name) = &self.fixture {
            let path = self.fixtures_dir.join(format!("{name}.html"));
            if path.is_file() {
                return Ok(vec![path]);
            }
            log::warn!(
                "{} does not exist; running every fixture instead",
                path.display()
            );
        }

        let mut paths: Vec<PathBuf> = std::fs::read_dir(&self.fixtures_dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "html"))
            .collect();
        paths.sort();
        Ok(paths)
    }
}
