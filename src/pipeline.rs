use crate::config::{Category, ScraperConfig};
use crate::filter::LinkRules;
use crate::paginator::{Paginator, StopReason};
use crate::parsers::extract;
use crate::renderers::Renderer;
use crate::results::ResultSet;
use std::time::Duration;

/// Caps and pacing for one collection run
#[derive(Debug, Clone)]
pub struct RunLimits {
    /// Stop the whole run once this many unique listings are collected
    pub max_listings: Option<usize>,

    /// Index pages rendered per category (0 or `None` means unlimited)
    pub max_pages: Option<usize>,

    /// Pause between categories
    pub category_delay: Duration,
}

impl Default for RunLimits {
    fn default() -> Self {
        Self {
            max_listings: None,
            max_pages: None,
            category_delay: Duration::from_millis(2500),
        }
    }
}

impl From<&ScraperConfig> for RunLimits {
    fn from(config: &ScraperConfig) -> Self {
        Self {
            max_listings: config.max_listings,
            max_pages: config.max_pages,
            category_delay: config.category_delay(),
        }
    }
}

/// Counters describing what a run did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    pub categories_visited: usize,
    pub pages_rendered: usize,
    pub fragments_seen: usize,
    pub records_kept: usize,
    pub duplicates_dropped: usize,
    pub unparseable: usize,
    pub category_failures: usize,
    pub hit_listing_cap: bool,
}

/// Result of a collection run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub results: ResultSet,
    pub stats: RunStats,
}

/// Sequential category → page → listing collection
pub struct Pipeline {
    limits: RunLimits,
    rules: LinkRules,
    scraped_at: Option<String>,
}

impl Pipeline {
    pub fn new(limits: RunLimits, rules: LinkRules) -> Self {
        Self {
            limits,
            rules,
            scraped_at: None,
        }
    }

    /// Stamp every kept record with this timestamp
    pub fn with_scraped_at(mut self, scraped_at: impl Into<String>) -> Self {
        self.scraped_at = Some(scraped_at.into());
        self
    }

    /// Collect listings from every category in order.
    ///
    /// Render failures end the affected category only. The listing cap is
    /// checked after every page and stops all remaining categories.
    pub async fn run<R: Renderer + ?Sized>(
        &self,
        renderer: &mut R,
        categories: &[Category],
    ) -> RunReport {
        let mut results = ResultSet::new();
        let mut stats = RunStats::default();

        for (idx, category) in categories.iter().enumerate() {
            if self.cap_reached(&results) {
                stats.hit_listing_cap = true;
                break;
            }
            ::log::info!("Scraping: {} - {}", category.name, category.index_url);
            stats.categories_visited += 1;
            let before = results.len();

            let mut pages =
                Paginator::new(&mut *renderer, category, self.limits.max_pages, &self.rules);

            while let Some(page) = pages.next_page().await {
                for fragment in &page.fragments {
                    if self.cap_reached(&results) {
                        break;
                    }
                    stats.fragments_seen += 1;

                    match extract(fragment, &self.rules) {
                        Ok(mut record) => {
                            record.scraped_at = self.scraped_at.clone();
                            if !results.insert(record) {
                                stats.duplicates_dropped += 1;
                            }
                        }
                        Err(e) => {
                            stats.unparseable += 1;
                            ::log::debug!(
                                "[{}] skipping listing on {}: {}",
                                category.name,
                                page.url,
                                e
                            );
                        }
                    }
                }

                if self.cap_reached(&results) {
                    stats.hit_listing_cap = true;
                    break;
                }
            }

            stats.pages_rendered += pages.pages_rendered();
            if let Some(StopReason::RenderFailed(url)) = pages.stop_reason() {
                stats.category_failures += 1;
                ::log::warn!("[{}] stopped early, could not render {}", category.name, url);
            }

            ::log::info!("  -> {} listings", results.len() - before);

            if stats.hit_listing_cap {
                ::log::info!(
                    "Reached max listings ({}), skipping remaining categories",
                    results.len()
                );
                break;
            }

            let is_last = idx + 1 == categories.len();
            if !is_last && !self.limits.category_delay.is_zero() {
                ::log::debug!("Waiting {:?} before next category", self.limits.category_delay);
                tokio::time::sleep(self.limits.category_delay).await;
            }
        }

        stats.records_kept = results.len();
        ::log::info!(
            "Collected {} unique listings from {} pages ({} duplicates, {} unparseable, {} failed categories)",
            stats.records_kept,
            stats.pages_rendered,
            stats.duplicates_dropped,
            stats.unparseable,
            stats.category_failures
        );

        RunReport { results, stats }
    }

    fn cap_reached(&self, results: &ResultSet) -> bool {
        self.limits
            .max_listings
            .is_some_and(|cap| results.len() >= cap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderers::MemoryRenderer;

    fn card(id: u32) -> String {
        format!(
            r#"<li><a href="https://www.indiamart.com/proddetail/item-{id}.html">Item number {id}</a><span>₹ 1,{id:03}</span></li>"#
        )
    }

    fn page(cards: &[String]) -> String {
        format!("<html><body><ul>{}</ul></body></html>", cards.concat())
    }

    fn limits() -> RunLimits {
        RunLimits {
            category_delay: Duration::ZERO,
            ..RunLimits::default()
        }
    }

    #[tokio::test]
    async fn test_unparseable_fragment_is_skipped() {
        // A card whose only product link cannot be resolved to an http URL
        let broken = r#"<li><a href="javascript:/proddetail/x">Broken listing</a></li>"#.to_string();
        let mut renderer = MemoryRenderer::new().with_page(
            "https://dir.example.com/a",
            page(&[card(1), broken, card(2)]),
        );
        let categories = vec![Category::new("A", "https://dir.example.com/a")];

        let report = Pipeline::new(limits(), LinkRules::default())
            .run(&mut renderer, &categories)
            .await;

        assert_eq!(report.results.len(), 2);
        assert_eq!(report.stats.unparseable, 1);
        assert_eq!(report.stats.fragments_seen, 3);
        assert!(report.results.iter().all(|r| !r.url.is_empty()));
    }

    #[tokio::test]
    async fn test_records_are_stamped() {
        let mut renderer =
            MemoryRenderer::new().with_page("https://dir.example.com/a", page(&[card(1)]));
        let categories = vec![Category::new("A", "https://dir.example.com/a")];

        let report = Pipeline::new(limits(), LinkRules::default())
            .with_scraped_at("2026-10-16 08:00:00")
            .run(&mut renderer, &categories)
            .await;

        let record = &report.results.records()[0];
        assert_eq!(record.scraped_at.as_deref(), Some("2026-10-16 08:00:00"));
        assert_eq!(record.category, "A");
        assert_eq!(record.price.as_deref(), Some("₹ 1,001"));
    }

    #[tokio::test]
    async fn test_duplicates_within_category_are_counted() {
        let mut renderer = MemoryRenderer::new()
            .with_page("https://dir.example.com/a", page(&[card(1), card(2)]))
            .with_page("https://dir.example.com/b", page(&[card(2), card(3)]));
        let categories = vec![
            Category::new("A", "https://dir.example.com/a"),
            Category::new("B", "https://dir.example.com/b"),
        ];

        let report = Pipeline::new(limits(), LinkRules::default())
            .run(&mut renderer, &categories)
            .await;

        assert_eq!(report.results.len(), 3);
        assert_eq!(report.stats.duplicates_dropped, 1);
        // The first copy, from category A, is kept
        let shared = report
            .results
            .iter()
            .find(|r| r.url.ends_with("item-2.html"))
            .unwrap();
        assert_eq!(shared.category, "A");
    }

    #[tokio::test]
    async fn test_unreachable_category_does_not_stop_run() {
        let mut renderer =
            MemoryRenderer::new().with_page("https://dir.example.com/b", page(&[card(7)]));
        let categories = vec![
            Category::new("A", "https://dir.example.com/missing"),
            Category::new("B", "https://dir.example.com/b"),
        ];

        let report = Pipeline::new(limits(), LinkRules::default())
            .run(&mut renderer, &categories)
            .await;

        assert_eq!(report.results.len(), 1);
        assert_eq!(report.stats.category_failures, 1);
        assert_eq!(report.stats.categories_visited, 2);
    }

    #[tokio::test]
    async fn test_unpriced_cards_are_kept() {
        let card = |id: u32, price: &str| {
            format!(
                r#"<li><a href="/proddetail/p-{id}.html"><img alt="Product {id}"></a><a href="/proddetail/p-{id}.html">Product {id}</a><span>{price}</span></li>"#
            )
        };
        let html = page(&[
            card(1, "₹ 500"),
            card(2, "Get Latest Price"),
            card(3, "Get Latest Price"),
        ]);
        let mut renderer = MemoryRenderer::new().with_page("https://dir.example.com/a", html);
        let categories = vec![Category::new("A", "https://dir.example.com/a")];

        let report = Pipeline::new(limits(), LinkRules::default())
            .run(&mut renderer, &categories)
            .await;

        let names: Vec<&str> = report.results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Product 1", "Product 2", "Product 3"]);
        assert_eq!(report.stats.duplicates_dropped, 0);
        assert_eq!(report.results.records()[0].price.as_deref(), Some("₹ 500"));
        assert_eq!(report.results.records()[1].price, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_between_categories_only() {
        let mut renderer = MemoryRenderer::new()
            .with_page("https://dir.example.com/a", page(&[card(1)]))
            .with_page("https://dir.example.com/b", page(&[card(2)]))
            .with_page("https://dir.example.com/c", page(&[card(3)]));
        let categories = vec![
            Category::new("A", "https://dir.example.com/a"),
            Category::new("B", "https://dir.example.com/b"),
            Category::new("C", "https://dir.example.com/c"),
        ];
        let limits = RunLimits {
            category_delay: Duration::from_secs(5),
            ..RunLimits::default()
        };

        let started = tokio::time::Instant::now();
        let report = Pipeline::new(limits, LinkRules::default())
            .run(&mut renderer, &categories)
            .await;

        assert_eq!(report.results.len(), 3);
        // Two gaps between three categories, none after the last
        assert_eq!(started.elapsed(), Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_delay_after_listing_cap() {
        let mut renderer = MemoryRenderer::new()
            .with_page("https://dir.example.com/a", page(&[card(1), card(2)]))
            .with_page("https://dir.example.com/b", page(&[card(3)]));
        let categories = vec![
            Category::new("A", "https://dir.example.com/a"),
            Category::new("B", "https://dir.example.com/b"),
        ];
        let limits = RunLimits {
            max_listings: Some(2),
            category_delay: Duration::from_secs(5),
            ..RunLimits::default()
        };

        let started = tokio::time::Instant::now();
        let report = Pipeline::new(limits, LinkRules::default())
            .run(&mut renderer, &categories)
            .await;

        assert!(report.stats.hit_listing_cap);
        assert_eq!(report.stats.categories_visited, 1);
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test]
    async fn test_no_categories() {
        let mut renderer = MemoryRenderer::new();
        let report = Pipeline::new(limits(), LinkRules::default())
            .run(&mut renderer, &[])
            .await;
        assert!(report.results.is_empty());
        assert_eq!(report.stats, RunStats::default());
    }
}
