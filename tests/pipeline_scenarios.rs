use listing_harvest::filter::LinkRules;
use listing_harvest::{
    Category, Collector, MemoryRenderer, Pipeline, RenderError, RunLimits, ScraperConfig,
};
use std::collections::HashSet;
use std::time::Duration;

const A: &str = "https://dir.indiamart.com/impcat/industrial-machinery.html";
const B: &str = "https://dir.indiamart.com/impcat/electronic-gadgets.html";

/// An index page with one card per product slug and an optional "Next" link
fn index_page(slugs: &[String], next: Option<&str>) -> String {
    let mut html = String::from("<html><body><div class=\"grid\">");
    for slug in slugs {
        html.push_str(&format!(
            r#"<div class="card">
                 <a href="https://www.indiamart.com/proddetail/{slug}.html"><img alt="{slug}"></a>
                 <a class="title" href="https://www.indiamart.com/proddetail/{slug}.html">Product {slug}</a>
                 <span>₹ 2,500 / Unit</span>
                 <a href="https://www.indiamart.com/company/seller-{slug}/">Seller of {slug}</a>
                 <span>Contact Supplier</span><span>Surat, Gujarat</span>
               </div>"#
        ));
    }
    html.push_str("</div>");
    if let Some(next) = next {
        html.push_str(&format!(r#"<div class="pager"><a href="{next}">Next</a></div>"#));
    }
    html.push_str("</body></html>");
    html
}

fn slugs(prefix: &str, range: std::ops::Range<u32>) -> Vec<String> {
    range.map(|i| format!("{prefix}-{i}")).collect()
}

fn page_url(base: &str, n: u32) -> String {
    format!("{base}?page={n}")
}

fn categories() -> Vec<Category> {
    vec![
        Category::new("Industrial Machinery", A),
        Category::new("Electronics", B),
    ]
}

fn limits(max_listings: Option<usize>, max_pages: Option<usize>) -> RunLimits {
    RunLimits {
        max_listings,
        max_pages,
        category_delay: Duration::ZERO,
    }
}

/// Category A: 3 pages of 10; category B: 1 page of 5, two of them repeats of A page 1
fn two_category_site() -> MemoryRenderer {
    let mut b_slugs = slugs("b", 0..3);
    b_slugs.push("a-0".to_string());
    b_slugs.push("a-1".to_string());

    MemoryRenderer::new()
        .with_page(A, index_page(&slugs("a", 0..10), Some("?page=2")))
        .with_page(&page_url(A, 2), index_page(&slugs("a", 10..20), Some("?page=3")))
        .with_page(&page_url(A, 3), index_page(&slugs("a", 20..30), None))
        .with_page(B, index_page(&b_slugs, None))
}

#[tokio::test]
async fn test_duplicates_across_categories() {
    let mut renderer = two_category_site();
    let report = Pipeline::new(limits(None, None), LinkRules::default())
        .run(&mut renderer, &categories())
        .await;

    assert_eq!(report.results.len(), 33);
    assert_eq!(report.stats.duplicates_dropped, 2);
    assert_eq!(report.stats.pages_rendered, 4);

    let urls: HashSet<&str> = report.results.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(urls.len(), report.results.len());
    assert!(report.results.iter().all(|r| !r.url.is_empty()));

    // First-seen copy wins: the repeated listing keeps category A
    let repeated = report
        .results
        .iter()
        .find(|r| r.url == "https://www.indiamart.com/proddetail/a-1.html")
        .unwrap();
    assert_eq!(repeated.category, "Industrial Machinery");
    assert_eq!(repeated.name, "Product a-1");
    assert_eq!(repeated.seller.as_deref(), Some("Seller of a-1"));
    assert_eq!(repeated.location.as_deref(), Some("Surat, Gujarat"));
    assert_eq!(repeated.price.as_deref(), Some("₹ 2,500 / Unit"));
}

#[tokio::test]
async fn test_listing_cap_stops_mid_category() {
    let mut renderer = two_category_site();
    let report = Pipeline::new(limits(Some(5), None), LinkRules::default())
        .run(&mut renderer, &categories())
        .await;

    assert_eq!(report.results.len(), 5);
    assert!(report.stats.hit_listing_cap);
    // Neither A page 2 nor category B was rendered
    assert_eq!(renderer.requests(), &[A.to_string()]);
}

#[tokio::test]
async fn test_timeout_truncates_only_that_category() {
    let mut renderer = two_category_site().with_failure(
        &page_url(A, 2),
        RenderError::Timeout {
            url: page_url(A, 2),
            after: Duration::from_secs(30),
        },
    );
    let report = Pipeline::new(limits(None, None), LinkRules::default())
        .run(&mut renderer, &categories())
        .await;

    let from_a = report
        .results
        .iter()
        .filter(|r| r.category == "Industrial Machinery")
        .count();
    let from_b = report
        .results
        .iter()
        .filter(|r| r.category == "Electronics")
        .count();

    assert_eq!(from_a, 10);
    // b-0..b-2; the two repeats of A page 1 are dropped
    assert_eq!(from_b, 3);
    assert_eq!(report.stats.category_failures, 1);
    assert!(!renderer.requests().contains(&page_url(A, 3)));
}

#[tokio::test]
async fn test_page_cap_per_category() {
    let mut renderer = two_category_site();
    let report = Pipeline::new(limits(None, Some(2)), LinkRules::default())
        .run(&mut renderer, &categories())
        .await;

    // A contributes pages 1 and 2 only, B its single page
    assert_eq!(report.results.len(), 20 + 3);
    assert!(!renderer.requests().contains(&page_url(A, 3)));
}

#[tokio::test]
async fn test_collector_writes_header_only_file_when_nothing_found() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("output").join("listings.csv");

    let config = ScraperConfig {
        categories: vec![Category::new("Empty", "https://dir.example.com/empty")],
        category_delay_ms: 0,
        output_path: output.clone(),
        ..ScraperConfig::default()
    };
    let mut renderer = MemoryRenderer::new().with_page(
        "https://dir.example.com/empty",
        "<html><body><p>No products found</p></body></html>",
    );

    let report = Collector::new(config)
        .run_with_renderer(&mut renderer)
        .await
        .unwrap();

    assert!(report.results.is_empty());
    assert!(renderer.is_closed());
    assert_eq!(
        std::fs::read_to_string(&output).unwrap(),
        "name,price,seller,location,category,url,scraped_at\n"
    );
}

#[tokio::test]
async fn test_collector_persists_deduplicated_rows() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("listings.csv");

    let config = ScraperConfig {
        categories: categories(),
        category_delay_ms: 0,
        output_path: output.clone(),
        ..ScraperConfig::default()
    };
    let mut renderer = two_category_site();

    let report = Collector::new(config)
        .with_max_pages(1)
        .run_with_renderer(&mut renderer)
        .await
        .unwrap();

    assert_eq!(report.stats.records_kept, 13);
    assert!(renderer.is_closed());

    let written = std::fs::read_to_string(&output).unwrap();
    let rows: Vec<&str> = written.lines().skip(1).collect();
    assert_eq!(rows.len(), 13);
    assert!(
        rows.iter()
            .all(|row| row.contains("https://www.indiamart.com/proddetail/"))
    );
}
