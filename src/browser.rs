use std::future::Future;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser as Chromium, BrowserConfig};
use chromiumoxide::Page;
use futures::StreamExt;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::config::Config;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("timed out after {waited:?} waiting for {selector}")]
    Timeout { selector: String, waited: Duration },

    #[error("none of {0:?} appeared")]
    NoMarker(Vec<String>),
}

/// The slice of a browser session the scraper needs: navigate, ask whether an
/// element is present, read the rendered DOM.
#[async_trait(?Send)]
pub trait Browser {
    async fn goto(&self, url: &str) -> Result<()>;
    async fn has_element(&self, selector: &str) -> Result<bool>;
    async fn content(&self) -> Result<String>;
}

/// Poll `ready` until it yields true or `timeout` elapses. Checked at least once.
pub async fn poll_until<F, Fut>(mut ready: F, timeout: Duration, interval: Duration) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let deadline = Instant::now() + timeout;
    loop {
        if ready().await {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(interval).await;
    }
}

pub async fn wait_for<B: Browser + ?Sized>(
    browser: &B,
    selector: &str,
    timeout: Duration,
    interval: Duration,
) -> Result<(), BrowserError> {
    let found = poll_until(
        move || async move { browser.has_element(selector).await.unwrap_or(false) },
        timeout,
        interval,
    )
    .await;
    if found {
        Ok(())
    } else {
        Err(BrowserError::Timeout {
            selector: selector.to_string(),
            waited: timeout,
        })
    }
}

/// Try each marker in order, each with its own bounded wait. Returns the one that appeared.
pub async fn wait_for_any<'s, B: Browser + ?Sized>(
    browser: &B,
    selectors: &[&'s str],
    timeout: Duration,
    interval: Duration,
) -> Result<&'s str, BrowserError> {
    for selector in selectors {
        match wait_for(browser, selector, timeout, interval).await {
            Ok(()) => return Ok(*selector),
            Err(e) => debug!(error = %e, "marker not found, trying next"),
        }
    }
    Err(BrowserError::NoMarker(
        selectors.iter().map(|s| s.to_string()).collect(),
    ))
}

// ── Chromium ──

/// One headless Chromium with a single reused tab.
pub struct ChromeSession {
    browser: Chromium,
    page: Page,
    handler: JoinHandle<()>,
}

impl ChromeSession {
    pub async fn launch(cfg: &Config) -> Result<Self> {
        let mut builder = BrowserConfig::builder()
            .window_size(1920, 1080)
            .arg("--no-sandbox")
            .arg("--disable-gpu")
            .arg("--disable-dev-shm-usage")
            .arg(format!("--user-agent={}", USER_AGENT));
        if !cfg.headless {
            builder = builder.with_head();
        }
        let config = builder
            .build()
            .map_err(|e| anyhow!("invalid browser config: {}", e))?;

        let (browser, mut events) = Chromium::launch(config)
            .await
            .context("failed to launch Chromium")?;

        // The CDP event loop must be driven for any page call to resolve.
        let handler = tokio::spawn(async move {
            while let Some(event) = events.next().await {
                if let Err(e) = event {
                    debug!(error = %e, "browser event error");
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .context("failed to open browser tab")?;

        info!(headless = cfg.headless, "browser session started");
        Ok(Self {
            browser,
            page,
            handler,
        })
    }

    pub async fn close(mut self) -> Result<()> {
        self.browser.close().await.context("failed to close browser")?;
        self.handler.abort();
        Ok(())
    }
}

#[async_trait(?Send)]
impl Browser for ChromeSession {
    async fn goto(&self, url: &str) -> Result<()> {
        self.page
            .goto(url)
            .await
            .with_context(|| format!("navigation to {} failed", url))?;
        Ok(())
    }

    async fn has_element(&self, selector: &str) -> Result<bool> {
        Ok(self.page.find_element(selector).await.is_ok())
    }

    async fn content(&self) -> Result<String> {
        Ok(self.page.content().await?)
    }
}

// ── In-memory browser for tests ──

#[cfg(test)]
pub mod fake {
    use std::cell::RefCell;
    use std::collections::HashMap;

    use anyhow::{bail, Result};
    use async_trait::async_trait;
    use scraper::{Html, Selector};

    use super::Browser;

    /// Serves canned HTML by URL and records every navigation.
    #[derive(Default)]
    pub struct FakeBrowser {
        pages: HashMap<String, String>,
        current: RefCell<Option<String>>,
        pub visits: RefCell<Vec<String>>,
    }

    impl FakeBrowser {
        pub fn with_page(mut self, url: &str, html: &str) -> Self {
            self.pages.insert(url.to_string(), html.to_string());
            self
        }
    }

    #[async_trait(?Send)]
    impl Browser for FakeBrowser {
        async fn goto(&self, url: &str) -> Result<()> {
            self.visits.borrow_mut().push(url.to_string());
            match self.pages.get(url) {
                Some(html) => {
                    *self.current.borrow_mut() = Some(html.clone());
                    Ok(())
                }
                None => bail!("no such page: {}", url),
            }
        }

        async fn has_element(&self, selector: &str) -> Result<bool> {
            let sel = Selector::parse(selector).map_err(|e| anyhow::anyhow!("{:?}", e))?;
            let current = self.current.borrow();
            Ok(current
                .as_deref()
                .is_some_and(|html| Html::parse_document(html).select(&sel).next().is_some()))
        }

        async fn content(&self) -> Result<String> {
            Ok(self.current.borrow().clone().unwrap_or_default())
        }
    }
}
