//! `gentest`: generate C++, Java, JavaScript and Go layout tests from HTML
//! fixtures.

use clap::Parser;
use gentest_driver::chrome::ChromeHost;
use gentest_driver::{Driver, DriverConfig, HostChoice, OutputLayout, ReplayHost, RunSummary};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "gentest",
    about = "Generate layout tests for every backend from HTML fixtures"
)]
struct Args {
    /// Only run this fixture (file stem, e.g. YGMarginTest).
    #[arg(short, long)]
    fixture: Option<String>,

    /// Run Chromium without a window.
    #[arg(long)]
    headless: bool,

    /// Pause after each fixture until Enter is pressed.
    #[arg(short, long)]
    suspend: bool,

    /// Directory holding the *.html fixtures.
    #[arg(long, default_value = "gentest/fixtures")]
    fixtures_dir: PathBuf,

    /// Checkout root that receives generated files.
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Use layouts recorded in DIR instead of launching a browser.
    #[arg(long, value_name = "DIR", conflicts_with_all = ["record", "headless"])]
    replay: Option<PathBuf>,

    /// Save measured layouts to DIR for later --replay runs.
    #[arg(long, value_name = "DIR")]
    record: Option<PathBuf>,
}

impl Args {
    fn into_config(self) -> DriverConfig {
        let host = match self.replay {
            Some(dir) => HostChoice::Replay(dir),
            None => HostChoice::Chrome {
                headless: self.headless,
                record: self.record,
            },
        };
        DriverConfig {
            fixtures_dir: self.fixtures_dir,
            fixture: self.fixture,
            suspend: self.suspend,
            host,
            output: OutputLayout::new(self.root),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Args::parse().into_config();
    let summary: RunSummary = match config.host.clone() {
        HostChoice::Chrome { headless, record } => {
            let host = ChromeHost::launch(headless, record).await?;
            Driver::new(host, config).run().await?
        }
        HostChoice::Replay(dir) => Driver::new(ReplayHost::new(dir), config).run().await?,
    };

    summary.log();
    if !summary.is_success() {
        anyhow::bail!(
            "{} fixture(s) failed: {}",
            summary.failed().len(),
            summary.failed().join(", ")
        );
    }
    Ok(())
}
