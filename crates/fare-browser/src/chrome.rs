//! Headless Chrome implementation of the session contract
//!
//! The CDP client is blocking, so every call runs under
//! `tokio::task::spawn_blocking`; one agent's waits never stall a
//! sibling's task.

use std::ffi::OsStr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use headless_chrome::protocol::cdp::Network::CookieParam;
use headless_chrome::{Browser, LaunchOptionsBuilder, Tab};
use tracing::{debug, info, warn};

use fare_core::SessionCookie;

use crate::error::{BrowserError, Result};
use crate::session::{BrowserConfig, BrowserLauncher, BrowserSession, NavWait};

/// Launches one headless Chrome process per agent invocation
pub struct ChromeLauncher {
    config: BrowserConfig,
}

impl ChromeLauncher {
    pub fn new(config: BrowserConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl BrowserLauncher for ChromeLauncher {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>> {
        let config = self.config.clone();
        let session = tokio::task::spawn_blocking(move || ChromeSession::launch(config))
            .await
            .map_err(|e| BrowserError::Initialization(format!("launch task failed: {}", e)))??;
        Ok(Box::new(session))
    }
}

/// One managed Chrome session (browser process + active tab)
pub struct ChromeSession {
    // Held to keep the browser process alive for the tab's lifetime;
    // dropping it terminates Chrome.
    _browser: Browser,
    tab: Arc<Tab>,
    config: BrowserConfig,
}

impl ChromeSession {
    /// Launch a browser and grab its initial tab. Blocking.
    fn launch(config: BrowserConfig) -> Result<Self> {
        info!("Creating browser session (headless: {})", config.headless);

        let mut args: Vec<String> = vec![
            format!("--window-size={},{}", config.width, config.height),
            "--no-sandbox".to_string(),
            "--disable-setuid-sandbox".to_string(),
            "--disable-dev-shm-usage".to_string(),
            "--disable-gpu".to_string(),
        ];

        if let Some(ref ua) = config.user_agent {
            args.push(format!("--user-agent={}", ua));
        }

        let os_args: Vec<&OsStr> = args.iter().map(OsStr::new).collect();

        let launch_options = LaunchOptionsBuilder::default()
            .headless(config.headless)
            .args(os_args)
            .idle_browser_timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| {
                BrowserError::Initialization(format!("Failed to build launch options: {}", e))
            })?;

        let browser = Browser::new(launch_options)
            .map_err(|e| BrowserError::Initialization(format!("Failed to launch browser: {}", e)))?;

        let tabs = browser.get_tabs();
        let tab = {
            let tabs_guard = tabs
                .lock()
                .map_err(|e| BrowserError::TabError(format!("Failed to lock tabs: {}", e)))?;
            tabs_guard
                .first()
                .cloned()
                .ok_or_else(|| BrowserError::TabError("No active tab available".to_string()))?
        };

        info!("Browser session created successfully");

        Ok(Self {
            _browser: browser,
            tab,
            config,
        })
    }

    /// Run a blocking CDP operation without stalling the runtime
    async fn blocking<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(Arc<Tab>) -> Result<T> + Send + 'static,
    {
        let tab = Arc::clone(&self.tab);
        tokio::task::spawn_blocking(move || op(tab))
            .await
            .map_err(|e| BrowserError::TabError(format!("browser task failed: {}", e)))?
    }
}

#[async_trait]
impl BrowserSession for ChromeSession {
    async fn navigate(&self, url: &str, wait: NavWait, timeout: Duration) -> Result<()> {
        let url = url.to_string();
        let settle = match wait {
            NavWait::Load => Duration::ZERO,
            NavWait::NetworkIdle => self.config.page_settle,
        };

        info!("Navigating to: {}", url);

        self.blocking(move |tab| {
            tab.set_default_timeout(timeout);
            tab.navigate_to(&url)
                .map_err(|e| BrowserError::Navigation(format!("Failed to navigate to {}: {}", url, e)))?;
            tab.wait_until_navigated()
                .map_err(|e| BrowserError::Timeout(format!("Navigation timeout: {}", e)))?;
            if !settle.is_zero() {
                std::thread::sleep(settle);
            }
            Ok(())
        })
        .await
    }

    async fn set_cookies(&self, cookies: &[SessionCookie]) -> Result<()> {
        let mut params = Vec::with_capacity(cookies.len());
        for cookie in cookies {
            if cookie.domain.is_none() {
                warn!("Skipping cookie without domain: {}", cookie.name);
                continue;
            }
            params.push(cookie_param(cookie)?);
        }
        if params.is_empty() {
            return Ok(());
        }

        debug!("Seeding {} cookies", params.len());

        self.blocking(move |tab| {
            tab.set_cookies(params)
                .map_err(|e| BrowserError::Cookie(format!("Failed to set cookies: {}", e)))
        })
        .await
    }

    async fn find_first(&self, selectors: &[&str], timeout: Duration) -> Result<String> {
        let selectors: Vec<String> = selectors.iter().map(|s| s.to_string()).collect();
        let poll = self.config.poll_interval;
        self.blocking(move |tab| first_match(&tab, &selectors, timeout, poll))
            .await
    }

    async fn type_into(
        &self,
        selector: &str,
        text: &str,
        per_char_delay: Option<Duration>,
    ) -> Result<()> {
        let selector = selector.to_string();
        let text = text.to_string();

        debug!("Typing into element: {} ({} chars)", selector, text.len());

        self.blocking(move |tab| {
            let element = tab.find_element(&selector).map_err(|e| {
                BrowserError::ElementNotFound(format!("Element '{}' not found: {}", selector, e))
            })?;
            element.click().map_err(|e| {
                BrowserError::Interaction(format!("Failed to focus '{}': {}", selector, e))
            })?;

            match per_char_delay {
                Some(delay) => {
                    for c in text.chars() {
                        tab.type_str(&c.to_string()).map_err(|e| {
                            BrowserError::Interaction(format!("Failed to type character: {}", e))
                        })?;
                        std::thread::sleep(delay);
                    }
                }
                None => {
                    tab.type_str(&text).map_err(|e| {
                        BrowserError::Interaction(format!("Failed to type text: {}", e))
                    })?;
                }
            }
            Ok(())
        })
        .await
    }

    async fn press_key(&self, key: &str) -> Result<()> {
        let key = key.to_string();
        self.blocking(move |tab| {
            tab.press_key(&key)
                .map(|_| ())
                .map_err(|e| BrowserError::Interaction(format!("Failed to press '{}': {}", key, e)))
        })
        .await
    }

    async fn wait_for_any(&self, selectors: &[&str], timeout: Duration) -> Result<String> {
        let selectors: Vec<String> = selectors.iter().map(|s| s.to_string()).collect();
        let poll = self.config.poll_interval;
        self.blocking(move |tab| first_match(&tab, &selectors, timeout, poll))
            .await
    }

    async fn evaluate(&self, script: &str) -> Result<serde_json::Value> {
        let script = script.to_string();
        self.blocking(move |tab| {
            let result = tab
                .evaluate(&script, false)
                .map_err(|e| BrowserError::Extraction(format!("Script evaluation failed: {}", e)))?;
            Ok(result.value.unwrap_or(serde_json::Value::Null))
        })
        .await
    }

    async fn close(&self) -> Result<()> {
        info!("Closing browser session");
        self.blocking(move |tab| {
            tab.close(true)
                .map(|_| ())
                .map_err(|e| BrowserError::TabError(format!("Failed to close tab: {}", e)))
        })
        .await
        // The browser process itself is reaped when the session drops.
    }
}

/// Poll the page until one selector matches; priority order within each
/// round, so an early pattern appearing late still beats a later one.
fn first_match(
    tab: &Tab,
    selectors: &[String],
    timeout: Duration,
    poll: Duration,
) -> Result<String> {
    let deadline = Instant::now() + timeout;
    loop {
        for selector in selectors {
            // Probe errors during a page transition count as "not yet".
            if selector_exists(tab, selector).unwrap_or(false) {
                debug!("Selector matched: {}", selector);
                return Ok(selector.clone());
            }
        }
        if Instant::now() >= deadline {
            return Err(BrowserError::Timeout(format!(
                "no selector matched within {:?}: {}",
                timeout,
                selectors.join(", ")
            )));
        }
        std::thread::sleep(poll);
    }
}

fn selector_exists(tab: &Tab, selector: &str) -> Result<bool> {
    let quoted = serde_json::to_string(selector)
        .map_err(|e| BrowserError::Extraction(format!("unencodable selector: {}", e)))?;
    let script = format!("document.querySelector({}) !== null", quoted);
    let result = tab
        .evaluate(&script, false)
        .map_err(|e| BrowserError::Extraction(format!("Selector probe failed: {}", e)))?;
    Ok(result.value == Some(serde_json::Value::Bool(true)))
}

fn cookie_param(cookie: &SessionCookie) -> Result<CookieParam> {
    // Built through serde: absent optional protocol fields default to None.
    serde_json::from_value(serde_json::json!({
        "name": cookie.name,
        "value": cookie.value,
        "domain": cookie.domain,
        "path": cookie.path,
    }))
    .map_err(|e| BrowserError::Cookie(format!("invalid cookie '{}': {}", cookie.name, e)))
}
