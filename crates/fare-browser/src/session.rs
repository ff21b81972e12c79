//! Browser session contract
//!
//! The trait the scraping agents program against. One session maps to one
//! agent invocation: launch, drive, close. Selector arguments are
//! prioritized lists; the first pattern with a match wins and is returned
//! as the handle for follow-up interactions.

use std::time::Duration;

use async_trait::async_trait;

use fare_core::SessionCookie;

use crate::error::Result;

/// Wait policy applied after navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavWait {
    /// Return as soon as the navigation commits
    Load,
    /// Give the page an extra settle window for late XHR-rendered content
    NetworkIdle,
}

/// One automated browser session, exclusively owned by one agent
#[async_trait]
pub trait BrowserSession: Send + Sync {
    /// Navigate to a URL and wait per the given policy
    async fn navigate(&self, url: &str, wait: NavWait, timeout: Duration) -> Result<()>;

    /// Seed cookies captured from a logged-in session
    async fn set_cookies(&self, cookies: &[SessionCookie]) -> Result<()>;

    /// Wait until one of the selectors matches; returns the winning
    /// selector. Patterns are tried in priority order on every poll round.
    async fn find_first(&self, selectors: &[&str], timeout: Duration) -> Result<String>;

    /// Focus the element behind `selector` and type text into it
    async fn type_into(
        &self,
        selector: &str,
        text: &str,
        per_char_delay: Option<Duration>,
    ) -> Result<()>;

    /// Press a named key (e.g. "ArrowDown", "Enter") in the focused context
    async fn press_key(&self, key: &str) -> Result<()>;

    /// Wait until any of the selectors matches; returns the winning
    /// selector. Same polling discipline as [`find_first`], kept separate
    /// because callers use it for passive surfaces rather than
    /// interactive elements.
    ///
    /// [`find_first`]: BrowserSession::find_first
    async fn wait_for_any(&self, selectors: &[&str], timeout: Duration) -> Result<String>;

    /// Evaluate a script in the page and return its JSON value
    async fn evaluate(&self, script: &str) -> Result<serde_json::Value>;

    /// Release the session. Called exactly once per agent invocation, on
    /// every exit path.
    async fn close(&self) -> Result<()>;
}

/// Launches one fresh session per agent invocation
#[async_trait]
pub trait BrowserLauncher: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn BrowserSession>>;
}

/// Browser session configuration
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    /// Whether to run in headless mode
    pub headless: bool,
    /// Window width in pixels
    pub width: u32,
    /// Window height in pixels
    pub height: u32,
    /// Settle window applied after navigation under [`NavWait::NetworkIdle`]
    pub page_settle: Duration,
    /// Interval between selector poll rounds
    pub poll_interval: Duration,
    /// Custom user agent
    pub user_agent: Option<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            width: 1920,
            height: 1080,
            page_settle: Duration::from_secs(2),
            poll_interval: Duration::from_millis(250),
            user_agent: None,
        }
    }
}

impl BrowserConfig {
    /// Create a new configuration builder
    pub fn builder() -> BrowserConfigBuilder {
        BrowserConfigBuilder::default()
    }
}

/// Builder for BrowserConfig
#[derive(Default)]
pub struct BrowserConfigBuilder {
    config: BrowserConfig,
}

impl BrowserConfigBuilder {
    pub fn headless(mut self, headless: bool) -> Self {
        self.config.headless = headless;
        self
    }

    pub fn window_size(mut self, width: u32, height: u32) -> Self {
        self.config.width = width;
        self.config.height = height;
        self
    }

    pub fn page_settle(mut self, settle: Duration) -> Self {
        self.config.page_settle = settle;
        self
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.config.poll_interval = interval;
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = Some(user_agent.into());
        self
    }

    pub fn build(self) -> BrowserConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_browser_config_default() {
        let config = BrowserConfig::default();
        assert!(config.headless);
        assert_eq!(config.width, 1920);
        assert_eq!(config.height, 1080);
    }

    #[test]
    fn test_browser_config_builder() {
        let config = BrowserConfig::builder()
            .headless(false)
            .window_size(1280, 720)
            .page_settle(Duration::from_millis(500))
            .user_agent("FareBot/1.0")
            .build();

        assert!(!config.headless);
        assert_eq!(config.width, 1280);
        assert_eq!(config.height, 720);
        assert_eq!(config.page_settle, Duration::from_millis(500));
        assert_eq!(config.user_agent.as_deref(), Some("FareBot/1.0"));
    }
}
