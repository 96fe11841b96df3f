// Re-export modules
pub mod config;
pub mod error;
pub mod filter;
pub mod output;
pub mod paginator;
pub mod parsers;
pub mod pipeline;
pub mod renderers;
pub mod results;
pub mod utils;

// Re-export commonly used types for convenience
pub use config::{Category, ScraperConfig};
pub use error::{Error, RenderError, Result, SetupError, Unparseable};
pub use pipeline::{Pipeline, RunLimits, RunReport, RunStats};
pub use renderers::{MemoryRenderer, Renderer, WebDriverRenderer};
pub use results::{ListingFragment, ListingRecord, ResultSet};

use filter::LinkRules;
use std::path::Path;

/// Main builder for a collection run
pub struct Collector {
    config: ScraperConfig,
}

impl Collector {
    /// Create a new Collector with the given configuration
    pub fn new(config: ScraperConfig) -> Self {
        Self { config }
    }

    /// Load configuration from a file
    pub fn with_config_file(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(ScraperConfig::from_file(path)?))
    }

    /// Stop after this many unique listings across all categories
    pub fn with_max_listings(mut self, max_listings: usize) -> Self {
        self.config.max_listings = Some(max_listings);
        self
    }

    /// Render at most this many index pages per category
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.config.max_pages = Some(max_pages);
        self
    }

    /// The configuration the run will use
    pub fn config(&self) -> &ScraperConfig {
        &self.config
    }

    /// Start a browser session, collect every category, close the session and
    /// write the CSV.
    ///
    /// Fails only if the browser cannot be started or the output cannot be
    /// written. Per-page problems are logged and reflected in the stats.
    pub async fn run(self) -> Result<RunReport> {
        let rules = LinkRules::new(self.config.site.clone())?;
        let mut renderer = WebDriverRenderer::connect(&self.config.render).await?;
        self.run_with(&mut renderer, rules).await
    }

    /// Same as [`Collector::run`] with a caller-supplied renderer.
    ///
    /// The renderer is closed before the output is written, whatever happened
    /// during the run.
    pub async fn run_with_renderer<R: Renderer + ?Sized>(
        self,
        renderer: &mut R,
    ) -> Result<RunReport> {
        let rules = match LinkRules::new(self.config.site.clone()) {
            Ok(rules) => rules,
            Err(e) => {
                renderer.close().await;
                return Err(e);
            }
        };
        self.run_with(renderer, rules).await
    }

    async fn run_with<R: Renderer + ?Sized>(
        self,
        renderer: &mut R,
        rules: LinkRules,
    ) -> Result<RunReport> {
        let scraped_at = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string();
        let pipeline =
            Pipeline::new(RunLimits::from(&self.config), rules).with_scraped_at(scraped_at);

        let report = pipeline.run(renderer, &self.config.categories).await;
        renderer.close().await;

        output::save_csv(&report.results, &self.config.output_path)?;
        Ok(report)
    }
}
