use crate::config::RenderConfig;
use crate::error::{RenderError, SetupError};
use crate::renderers::Renderer;
use crate::utils::backoff_delay;
use async_trait::async_trait;
use fantoccini::error::{CmdError, NewSessionError};
use fantoccini::wd::Capabilities;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::json;
use tokio::time::{sleep, timeout};

/// Common local WebDriver endpoints tried when the configured one refuses
const FALLBACK_WEBDRIVER_URLS: [&str; 3] = [
    "http://localhost:9515", // ChromeDriver default
    "http://127.0.0.1:4444", // Try with IP instead of localhost
    "http://127.0.0.1:9515",
];

/// Renders pages in a single long-lived WebDriver browser session
pub struct WebDriverRenderer {
    client: Option<Client>,
    endpoint: String,
    config: RenderConfig,
}

impl WebDriverRenderer {
    /// Opens a browser session.
    ///
    /// The `WEBDRIVER_URL` environment variable overrides the configured
    /// endpoint. Falls back to the usual local driver ports before giving up.
    pub async fn connect(config: &RenderConfig) -> Result<Self, SetupError> {
        let primary = std::env::var("WEBDRIVER_URL")
            .ok()
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| config.webdriver_url.clone());

        let mut tried: Vec<String> = Vec::new();
        let mut last_error = None;

        for endpoint in std::iter::once(primary.as_str()).chain(FALLBACK_WEBDRIVER_URLS) {
            if tried.iter().any(|t| t == endpoint) {
                continue; // Skip if it's the same as the one we already tried
            }
            tried.push(endpoint.to_string());

            match open_session(endpoint, config).await {
                Ok(client) => {
                    ::log::info!("Connected to WebDriver at {}", endpoint);
                    return Ok(Self {
                        client: Some(client),
                        endpoint: endpoint.to_string(),
                        config: config.clone(),
                    });
                }
                Err(e) => {
                    if endpoint == primary {
                        ::log::warn!("Failed to connect to WebDriver at {}: {}", endpoint, e);
                    } else {
                        ::log::debug!("Fallback WebDriver {} refused: {}", endpoint, e);
                    }
                    last_error = Some(e);
                }
            }
        }

        ::log::error!(
            "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
        );
        Err(SetupError {
            tried,
            source: last_error,
        })
    }

    /// One navigation attempt: load, wait for the document, let scripts settle, read source
    async fn render_once(&self, url: &str) -> Result<String, RenderError> {
        let client = self.client.as_ref().ok_or_else(|| RenderError::Navigation {
            url: url.to_string(),
            reason: "browser session is closed".to_string(),
        })?;

        let limit = self.config.page_load_timeout();
        match timeout(limit, client.goto(url)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(navigation_error(url, e)),
            Err(_) => {
                return Err(RenderError::Timeout {
                    url: url.to_string(),
                    after: limit,
                });
            }
        }

        client
            .wait()
            .at_most(limit)
            .for_element(Locator::Css("body"))
            .await
            .map_err(|e| match e {
                CmdError::WaitTimeout => RenderError::Timeout {
                    url: url.to_string(),
                    after: limit,
                },
                other => navigation_error(url, other),
            })?;

        // Listings are filled in by client-side scripts after the document loads
        sleep(self.config.settle()).await;

        client.source().await.map_err(|e| navigation_error(url, e))
    }

    /// Replaces a dead session with a fresh one on the same endpoint
    async fn reconnect(&mut self) -> bool {
        ::log::warn!("Attempting to reconnect WebDriver session at {}", self.endpoint);
        match open_session(&self.endpoint, &self.config).await {
            Ok(client) => {
                self.client = Some(client);
                ::log::info!("Reconnected to WebDriver");
                true
            }
            Err(e) => {
                ::log::error!("Failed to reconnect to WebDriver: {}", e);
                false
            }
        }
    }
}

#[async_trait]
impl Renderer for WebDriverRenderer {
    async fn render(&mut self, url: &str) -> Result<String, RenderError> {
        let attempts = self.config.max_retries.max(1);
        let mut attempt = 1;

        loop {
            let started = std::time::Instant::now();
            let error = match self.render_once(url).await {
                Ok(html) => {
                    ::log::debug!(
                        "Rendered {} ({} bytes) in {:.2} seconds",
                        url,
                        html.len(),
                        started.elapsed().as_secs_f64()
                    );
                    return Ok(html);
                }
                Err(e) => e,
            };

            if attempt >= attempts || self.client.is_none() {
                return Err(error);
            }

            let wait = backoff_delay(self.config.backoff_base_secs, attempt);
            ::log::warn!(
                "Attempt {}/{} failed, retrying in {}s: {}",
                attempt,
                attempts,
                wait.as_secs(),
                error
            );

            if is_session_lost(&error) && !self.reconnect().await {
                return Err(error);
            }

            sleep(wait).await;
            attempt += 1;
        }
    }

    async fn close(&mut self) {
        if let Some(client) = self.client.take() {
            ::log::info!("Closing WebDriver session");
            if let Err(e) = client.close().await {
                ::log::warn!("Failed to close WebDriver session: {}", e);
            }
        }
    }
}

impl Drop for WebDriverRenderer {
    fn drop(&mut self) {
        if self.client.is_some() {
            ::log::warn!("WebDriver session dropped without close; the browser may linger");
        }
    }
}

async fn open_session(endpoint: &str, config: &RenderConfig) -> Result<Client, NewSessionError> {
    let mut builder = ClientBuilder::native();
    builder.capabilities(capabilities(config));
    builder.connect(endpoint).await
}

/// Browser capabilities for Chrome and Firefox drivers alike
pub fn capabilities(config: &RenderConfig) -> Capabilities {
    let mut chrome_args = vec![
        format!("--user-agent={}", config.user_agent),
        "--window-size=1366,900".to_string(),
    ];
    let mut firefox_args = Vec::new();
    if config.headless {
        chrome_args.push("--headless=new".to_string());
        chrome_args.push("--disable-gpu".to_string());
        firefox_args.push("-headless".to_string());
    }

    let mut caps = Capabilities::new();
    caps.insert("goog:chromeOptions".to_string(), json!({ "args": chrome_args }));
    caps.insert(
        "moz:firefoxOptions".to_string(),
        json!({
            "args": firefox_args,
            "prefs": { "general.useragent.override": config.user_agent },
        }),
    );
    caps
}

fn navigation_error(url: &str, error: CmdError) -> RenderError {
    RenderError::Navigation {
        url: url.to_string(),
        reason: error.to_string(),
    }
}

/// Whether the driver reported that our session no longer exists
fn is_session_lost(error: &RenderError) -> bool {
    match error {
        RenderError::Navigation { reason, .. } => {
            reason.contains("Unable to find session") || reason.contains("invalid session id")
        }
        RenderError::Timeout { .. } => false,
    }
}
