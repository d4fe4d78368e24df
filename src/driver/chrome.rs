//! Chromium-backed implementation of [`PageDriver`].
//!
//! Owns one launched browser and one page. Form interaction goes through
//! injected scripts rather than CDP input events so that the exact same
//! snippets drive real pages and fixtures.

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::Page;
use futures::StreamExt;
use serde_json::Value;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::debug;

use super::{js_quote, DriverError, PageDriver};

/// How often `wait_for` re-checks the document.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// A headless Chromium session holding a single page cursor.
pub struct ChromeDriver {
    browser: Browser,
    page: Page,
    events: JoinHandle<()>,
}

fn transport<E>(err: E) -> DriverError
where
    E: std::error::Error + Send + Sync + 'static,
{
    DriverError::Transport(anyhow::Error::new(err))
}

impl ChromeDriver {
    /// Launch a headless browser and open a blank page.
    pub async fn launch() -> Result<Self, DriverError> {
        let config = BrowserConfig::builder()
            .build()
            .map_err(|e| DriverError::Transport(anyhow::anyhow!(e)))?;

        let (browser, mut handler) = Browser::launch(config).await.map_err(transport)?;

        // The CDP event stream must be pumped for the connection to stay alive.
        let events = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        let page = browser.new_page("about:blank").await.map_err(transport)?;
        Ok(Self {
            browser,
            page,
            events,
        })
    }

    /// Close the page and shut the browser down.
    pub async fn close(mut self) -> Result<(), DriverError> {
        self.browser.close().await.map_err(transport)?;
        self.events.abort();
        Ok(())
    }

    async fn run(&self, script: &str) -> Result<Value, DriverError> {
        let result = self.page.evaluate(script).await.map_err(transport)?;
        result.into_value::<Value>().map_err(transport)
    }

    /// Run an interaction snippet that reports `{ found: bool }`.
    async fn interact(&self, script: &str, selector: &str) -> Result<(), DriverError> {
        let result = self.run(script).await?;
        let found = result
            .get("found")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        if !found {
            return Err(DriverError::Transport(anyhow::anyhow!(
                "no element matched `{selector}`"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl PageDriver for ChromeDriver {
    async fn navigate(&mut self, url: &str) -> Result<(), DriverError> {
        debug!(url, "navigating");
        self.page.goto(url).await.map_err(transport)?;
        self.page.wait_for_navigation().await.map_err(transport)?;
        Ok(())
    }

    async fn wait_for(&mut self, selector: &str, timeout: Duration) -> Result<(), DriverError> {
        let deadline = Instant::now() + timeout;
        loop {
            if self.element_exists(selector).await? {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(DriverError::Timeout {
                    selector: selector.to_string(),
                    waited: timeout,
                });
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    async fn fill_field(&mut self, selector: &str, value: &str) -> Result<(), DriverError> {
        let script = format!(
            r#"(() => {{
                const el = document.querySelector('{}');
                if (!el) return {{ found: false }};
                el.value = '{}';
                el.dispatchEvent(new Event('input', {{ bubbles: true }}));
                return {{ found: true }};
            }})()"#,
            js_quote(selector),
            js_quote(value),
        );
        self.interact(&script, selector).await
    }

    async fn click(&mut self, selector: &str) -> Result<(), DriverError> {
        let script = format!(
            r#"(() => {{
                const el = document.querySelector('{}');
                if (!el) return {{ found: false }};
                el.click();
                return {{ found: true }};
            }})()"#,
            js_quote(selector),
        );
        self.interact(&script, selector).await
    }

    async fn click_nav(&mut self, selector: &str) -> Result<(), DriverError> {
        self.click(selector).await?;
        self.page.wait_for_navigation().await.map_err(transport)?;
        Ok(())
    }

    async fn select_option(&mut self, selector: &str, value: &str) -> Result<(), DriverError> {
        let script = format!(
            r#"(() => {{
                const el = document.querySelector('{}');
                if (!el) return {{ found: false }};
                el.value = '{}';
                el.dispatchEvent(new Event('change', {{ bubbles: true }}));
                return {{ found: true }};
            }})()"#,
            js_quote(selector),
            js_quote(value),
        );
        self.interact(&script, selector).await
    }

    async fn evaluate(&mut self, script: &str) -> Result<Value, DriverError> {
        self.run(script).await
    }

    async fn element_exists(&mut self, selector: &str) -> Result<bool, DriverError> {
        let script = format!(
            "!!document.querySelector('{}')",
            js_quote(selector)
        );
        let result = self.run(&script).await?;
        Ok(result.as_bool().unwrap_or(false))
    }
}
