//! Chrome browsing context over the DevTools protocol

use crate::browser::{BrowserError, BrowserResult, Page};
use crate::config::BrowserConfig;
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig as LaunchConfig};
use futures::StreamExt;
use serde_json::Value;
use tokio::task::JoinHandle;

/// A launched browser process plus the task pumping its protocol events
///
/// One session lives for one attempt of one task. `close` must be called on
/// every exit path; the retry envelope in the binary takes care of that.
pub struct ChromeSession {
    browser: Browser,
    handler: JoinHandle<()>,
    user_agent: String,
}

impl ChromeSession {
    /// Launches Chrome with the configured window size and headless mode
    pub async fn launch(config: &BrowserConfig) -> BrowserResult<Self> {
        let mut builder =
            LaunchConfig::builder().window_size(config.window_width, config.window_height);
        if !config.headless {
            builder = builder.with_head();
        }
        if let Some(path) = &config.executable {
            builder = builder.chrome_executable(path);
        }
        let launch_config = builder.build().map_err(BrowserError::Launch)?;

        let (browser, mut events) = Browser::launch(launch_config).await?;
        let handler = tokio::spawn(async move {
            while let Some(event) = events.next().await {
                if let Err(e) = event {
                    tracing::debug!("Browser event error: {}", e);
                }
            }
        });

        tracing::info!(
            "Browser launched ({}x{}, headless: {})",
            config.window_width,
            config.window_height,
            config.headless
        );

        Ok(Self {
            browser,
            handler,
            user_agent: config.user_agent.clone(),
        })
    }

    /// Opens a blank tab with the configured user agent
    pub async fn new_page(&self) -> BrowserResult<ChromePage> {
        let page = self.browser.new_page("about:blank").await?;
        page.set_user_agent(self.user_agent.as_str()).await?;
        Ok(ChromePage { page })
    }

    /// Shuts the browser down; failures are logged, never raised
    pub async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            tracing::warn!("Failed to close browser: {}", e);
        }
        if let Err(e) = self.browser.wait().await {
            tracing::warn!("Failed to wait for browser exit: {}", e);
        }
        self.handler.abort();
        tracing::debug!("Browser closed");
    }
}

/// A single Chrome tab
pub struct ChromePage {
    page: chromiumoxide::Page,
}

#[async_trait]
impl Page for ChromePage {
    async fn goto(&self, url: &str) -> BrowserResult<()> {
        self.page
            .goto(url)
            .await
            .map_err(|e| BrowserError::Navigation {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    async fn current_url(&self) -> BrowserResult<Option<String>> {
        Ok(self.page.url().await?)
    }

    async fn content(&self) -> BrowserResult<String> {
        Ok(self.page.content().await?)
    }

    async fn exists(&self, selector: &str) -> BrowserResult<bool> {
        Ok(self.page.find_element(selector).await.is_ok())
    }

    async fn click(&self, selector: &str) -> BrowserResult<()> {
        let element = self
            .page
            .find_element(selector)
            .await
            .map_err(|_| BrowserError::ElementNotFound(selector.to_string()))?;
        element.click().await?;
        Ok(())
    }

    async fn evaluate(&self, script: &str) -> BrowserResult<Value> {
        let result = self.page.evaluate(script).await?;
        Ok(result.value().cloned().unwrap_or(Value::Null))
    }
}
