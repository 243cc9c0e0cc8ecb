//! Chromium execution host over the DevTools protocol.
//!
//! One browser session serves the whole batch. Each fixture gets a fresh
//! tab, is loaded with `set_content`, and measured with `MEASURE_SCRIPT`.

use crate::document::{MEASURE_SCRIPT, document};
use crate::host::{ExecutionHost, HostError, record_layouts};
use chromiumoxide::browser::{Browser, BrowserConfig};
use futures::StreamExt;
use gentest_core::layout::MeasuredPage;
use gentest_core::{Execution, FixturePage, execute_page};
use std::path::PathBuf;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::timeout;

const WINDOW_WIDTH: u32 = 800;
const WINDOW_HEIGHT: u32 = 600;
const MEASURE_TIMEOUT: Duration = Duration::from_secs(10);

fn browser_error(e: impl std::fmt::Display) -> HostError {
    HostError::Browser(e.to_string())
}

pub struct ChromeHost {
    browser: Browser,
    handler: JoinHandle<()>,
    record: Option<PathBuf>,
}

impl ChromeHost {
    /// Launch Chromium. `CHROME_BIN` overrides executable discovery.
    ///
    /// # Errors
    /// The browser cannot be configured or started.
    pub async fn launch(headless: bool, record: Option<PathBuf>) -> Result<Self, HostError> {
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .window_size(WINDOW_WIDTH, WINDOW_HEIGHT)
            .arg("--force-device-scale-factor=1")
            .arg("--window-position=0,0")
            .arg("--hide-scrollbars");
        if !headless {
            builder = builder.with_head();
        }
        if let Some(bin) = std::env::var_os("CHROME_BIN") {
            builder = builder.chrome_executable(PathBuf::from(bin));
        }

        let config = builder.build().map_err(HostError::Browser)?;
        let (browser, mut handler) = Browser::launch(config).await.map_err(browser_error)?;

        let handler = tokio::task::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    log::debug!("browser event error: {e}");
                }
            }
        });

        log::info!("launched chromium (headless: {headless})");
        Ok(Self {
            browser,
            handler,
            record,
        })
    }

    async fn measure(&self, fixture: &FixturePage) -> Result<MeasuredPage, HostError> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(browser_error)?;
        page.set_content(document(fixture))
            .await
            .map_err(browser_error)?;

        let result = timeout(MEASURE_TIMEOUT, page.evaluate(MEASURE_SCRIPT))
            .await
            .map_err(|_| HostError::Timeout {
                fixture: fixture.name.clone(),
            })?
            .map_err(browser_error)?;
        let layouts = match result.value().and_then(|v| v.as_str()) {
            Some(json) => MeasuredPage::from_json(json)?,
            None => {
                return Err(HostError::MissingLayout {
                    fixture: fixture.name.clone(),
                });
            }
        };

        if let Err(e) = page.close().await {
            log::debug!("{}: closing tab failed: {e}", fixture.name);
        }
        Ok(layouts)
    }
}

impl ExecutionHost for ChromeHost {
    async fn execute(&mut self, page: &FixturePage) -> Result<Execution, HostError> {
        let layouts = self.measure(page).await?;
        if let Some(dir) = &self.record {
            record_layouts(dir, &page.name, &layouts).await?;
            log::debug!("{}: recorded layouts in {}", page.name, dir.display());
        }
        Ok(execute_page(page, &layouts)?)
    }

    async fn shutdown(mut self) -> Result<(), HostError> {
        self.browser.close().await.map_err(browser_error)?;
        if let Err(e) = self.browser.wait().await {
            log::debug!("waiting for chromium to exit: {e}");
        }
        self.handler.abort();
        Ok(())
    }
}
