//! Scripted browser doubles for agent and orchestrator tests

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use fare_browser::{BrowserError, BrowserLauncher, BrowserSession, NavWait};
use fare_core::SessionCookie;

type BrowserResult<T> = fare_browser::Result<T>;

/// How one scripted session behaves
#[derive(Clone)]
pub struct MockBehavior {
    /// Artificial delay applied to navigation
    pub delay: Duration,
    pub fail_navigation: bool,
    /// Login probes report a login wall
    pub login_wall: bool,
    /// Interactive fields never appear
    pub missing_fields: bool,
    /// JSON payloads returned to successive scan evaluations
    pub scan_payloads: Vec<String>,
}

impl MockBehavior {
    pub fn with_scans(scan_payloads: Vec<String>) -> Self {
        Self {
            delay: Duration::ZERO,
            fail_navigation: false,
            login_wall: false,
            missing_fields: false,
            scan_payloads,
        }
    }

    pub fn failing_navigation() -> Self {
        Self {
            fail_navigation: true,
            ..Self::with_scans(Vec::new())
        }
    }
}

/// Observable per-session counters
#[derive(Default)]
pub struct SessionRecorder {
    pub cookies_seeded: AtomicUsize,
    pub closes: AtomicUsize,
}

/// Launcher handing out scripted sessions and recording their lifecycle
pub struct MockLauncher {
    behaviors: HashMap<&'static str, MockBehavior>,
    default: MockBehavior,
    fail_launch: bool,
    launches: AtomicUsize,
    sessions: Mutex<Vec<Arc<SessionRecorder>>>,
}

impl MockLauncher {
    /// Every session behaves the same
    pub fn single(behavior: MockBehavior) -> Self {
        Self {
            behaviors: HashMap::new(),
            default: behavior,
            fail_launch: false,
            launches: AtomicUsize::new(0),
            sessions: Mutex::new(Vec::new()),
        }
    }

    /// Behavior picked by URL marker at navigation time
    pub fn routed(behaviors: HashMap<&'static str, MockBehavior>) -> Self {
        Self {
            behaviors,
            default: MockBehavior::with_scans(Vec::new()),
            fail_launch: false,
            launches: AtomicUsize::new(0),
            sessions: Mutex::new(Vec::new()),
        }
    }

    /// Launching itself fails
    pub fn failing() -> Self {
        Self {
            fail_launch: true,
            ..Self::single(MockBehavior::with_scans(Vec::new()))
        }
    }

    pub fn launch_count(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }

    pub fn sessions(&self) -> Vec<Arc<SessionRecorder>> {
        self.sessions.lock().unwrap().clone()
    }

    /// Close count per acquired session, in launch order
    pub fn close_counts(&self) -> Vec<usize> {
        self.sessions()
            .iter()
            .map(|s| s.closes.load(Ordering::SeqCst))
            .collect()
    }
}

#[async_trait]
impl BrowserLauncher for MockLauncher {
    async fn launch(&self) -> BrowserResult<Box<dyn BrowserSession>> {
        self.launches.fetch_add(1, Ordering::SeqCst);
        if self.fail_launch {
            return Err(BrowserError::Initialization(
                "no browser available".to_string(),
            ));
        }
        let recorder = Arc::new(SessionRecorder::default());
        self.sessions.lock().unwrap().push(Arc::clone(&recorder));
        Ok(Box::new(MockSession {
            behaviors: self.behaviors.clone(),
            active: Mutex::new(self.default.clone()),
            scans: Mutex::new(VecDeque::new()),
            recorder,
        }))
    }
}

struct MockSession {
    behaviors: HashMap<&'static str, MockBehavior>,
    active: Mutex<MockBehavior>,
    scans: Mutex<VecDeque<String>>,
    recorder: Arc<SessionRecorder>,
}

impl MockSession {
    fn current(&self) -> MockBehavior {
        self.active.lock().unwrap().clone()
    }
}

#[async_trait]
impl BrowserSession for MockSession {
    async fn navigate(&self, url: &str, _wait: NavWait, _timeout: Duration) -> BrowserResult<()> {
        let behavior = self
            .behaviors
            .iter()
            .find(|(marker, _)| url.contains(*marker))
            .map(|(_, b)| b.clone())
            .unwrap_or_else(|| self.current());

        *self.scans.lock().unwrap() = behavior.scan_payloads.iter().cloned().collect();
        *self.active.lock().unwrap() = behavior.clone();

        if !behavior.delay.is_zero() {
            tokio::time::sleep(behavior.delay).await;
        }
        if behavior.fail_navigation {
            return Err(BrowserError::Navigation(format!(
                "could not reach {}",
                url
            )));
        }
        Ok(())
    }

    async fn set_cookies(&self, cookies: &[SessionCookie]) -> BrowserResult<()> {
        self.recorder
            .cookies_seeded
            .fetch_add(cookies.len(), Ordering::SeqCst);
        Ok(())
    }

    async fn find_first(&self, selectors: &[&str], _timeout: Duration) -> BrowserResult<String> {
        if self.current().missing_fields {
            return Err(BrowserError::Timeout(
                "element never appeared".to_string(),
            ));
        }
        Ok(selectors.first().copied().unwrap_or_default().to_string())
    }

    async fn type_into(
        &self,
        _selector: &str,
        _text: &str,
        _per_char_delay: Option<Duration>,
    ) -> BrowserResult<()> {
        Ok(())
    }

    async fn press_key(&self, _key: &str) -> BrowserResult<()> {
        Ok(())
    }

    async fn wait_for_any(&self, selectors: &[&str], _timeout: Duration) -> BrowserResult<String> {
        Ok(selectors.first().copied().unwrap_or_default().to_string())
    }

    async fn evaluate(&self, script: &str) -> BrowserResult<serde_json::Value> {
        if script.starts_with("JSON.stringify") {
            let payload = self
                .scans
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| "[]".to_string());
            return Ok(serde_json::Value::String(payload));
        }
        if script.contains(".click()") {
            return Ok(serde_json::Value::Bool(true));
        }
        // Anything else is a login probe.
        Ok(serde_json::Value::Bool(self.current().login_wall))
    }

    async fn close(&self) -> BrowserResult<()> {
        self.recorder.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
