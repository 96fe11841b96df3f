use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// A top-level grouping on the directory site whose index page lists products
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Display name, copied into every record collected from this category
    pub name: String,

    /// First page of the category listing index
    pub index_url: String,
}

impl Category {
    pub fn new(name: &str, index_url: &str) -> Self {
        Self {
            name: name.to_string(),
            index_url: index_url.to_string(),
        }
    }
}

/// Top-level configuration for a collection run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// Categories to traverse, in order
    #[serde(default = "default_categories")]
    pub categories: Vec<Category>,

    /// Stop after this many unique listings across all categories
    #[serde(default)]
    pub max_listings: Option<usize>,

    /// Maximum index pages rendered per category (0 or absent means unlimited)
    #[serde(default)]
    pub max_pages: Option<usize>,

    /// Pause between categories, in milliseconds
    #[serde(default = "default_category_delay_ms")]
    pub category_delay_ms: u64,

    /// Where the CSV is written
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,

    /// Browser session settings
    #[serde(default)]
    pub render: RenderConfig,

    /// Site-specific link rules
    #[serde(default)]
    pub site: SiteConfig,
}

/// Configuration for the WebDriver-backed renderer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Per-attempt navigation timeout
    #[serde(default = "default_page_load_timeout_secs")]
    pub page_load_timeout_secs: u64,

    /// Time given to client-side scripts to render listings after load
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,

    /// Attempts per page before giving up
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Backoff before retry n is `backoff_base_secs^n` seconds
    #[serde(default = "default_backoff_base_secs")]
    pub backoff_base_secs: u64,

    #[serde(default = "default_headless")]
    pub headless: bool,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Rules describing how listing and supplier links look on the target site
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Base for root-relative product and supplier hrefs
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Registrable domain supplier pages live under
    #[serde(default = "default_domain")]
    pub domain: String,

    /// Regex an href must match to count as a product link
    #[serde(default = "default_product_link_pattern")]
    pub product_link_pattern: String,

    /// First path segments that never identify a supplier page
    #[serde(default = "default_excluded_segments")]
    pub non_supplier_segments: Vec<String>,
}

impl ScraperConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| Error::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn category_delay(&self) -> Duration {
        Duration::from_millis(self.category_delay_ms)
    }
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            categories: default_categories(),
            max_listings: None,
            max_pages: None,
            category_delay_ms: default_category_delay_ms(),
            output_path: default_output_path(),
            render: RenderConfig::default(),
            site: SiteConfig::default(),
        }
    }
}

impl RenderConfig {
    pub fn page_load_timeout(&self) -> Duration {
        Duration::from_secs(self.page_load_timeout_secs)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            webdriver_url: default_webdriver_url(),
            page_load_timeout_secs: default_page_load_timeout_secs(),
            settle_ms: default_settle_ms(),
            max_retries: default_max_retries(),
            backoff_base_secs: default_backoff_base_secs(),
            headless: default_headless(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            domain: default_domain(),
            product_link_pattern: default_product_link_pattern(),
            non_supplier_segments: default_excluded_segments(),
        }
    }
}

fn default_categories() -> Vec<Category> {
    vec![
        Category::new(
            "Industrial Machinery",
            "https://dir.indiamart.com/impcat/industrial-machinery.html",
        ),
        Category::new(
            "Electronics",
            "https://dir.indiamart.com/impcat/electronic-gadgets.html",
        ),
    ]
}

fn default_category_delay_ms() -> u64 {
    2500
}

fn default_output_path() -> PathBuf {
    PathBuf::from("output/listings.csv")
}

/// Default value for webdriver_url
fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_page_load_timeout_secs() -> u64 {
    30
}

fn default_settle_ms() -> u64 {
    3000
}

fn default_max_retries() -> u32 {
    4
}

fn default_backoff_base_secs() -> u64 {
    2
}

fn default_headless() -> bool {
    true
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string()
}

fn default_base_url() -> String {
    "https://www.indiamart.com/".to_string()
}

fn default_domain() -> String {
    "indiamart.com".to_string()
}

fn default_product_link_pattern() -> String {
    r"/proddetail/".to_string()
}

fn default_excluded_segments() -> Vec<String> {
    ["proddetail", "impcat", "search"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}
