use crate::error::Unparseable;
use crate::filter::LinkRules;
use crate::parsers::{ANCHOR, IMAGE, block_text, inline_text};
use crate::results::{ListingFragment, ListingRecord};
use crate::utils::truncate_chars;
use regex::Regex;
use scraper::{ElementRef, Html};
use std::sync::LazyLock;

const MAX_NAME_CHARS: usize = 500;
const MAX_SELLER_CHARS: usize = 200;
const MAX_LOCATION_CHARS: usize = 300;

/// Text that precedes the supplier's address line on a listing card
const LOCATION_MARKER: &str = "Contact Supplier";

static PRICE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)₹\s*\d[\d,]*(?:\.\d+)?(?:\s*/\s*\w+)?|\bRs\.?\s*\d[\d,]*(?:\.\d+)?")
        .expect("price pattern is valid")
});

/// Extracts a structured record from one listing card.
///
/// Only the product URL is mandatory. Name, price, seller and location are
/// left empty when the card does not show them.
pub fn extract(fragment: &ListingFragment, rules: &LinkRules) -> Result<ListingRecord, Unparseable> {
    let doc = Html::parse_fragment(&fragment.html);
    let root = doc.root_element();

    let product_links: Vec<ElementRef<'_>> = root
        .select(&ANCHOR)
        .filter(|a| a.value().attr("href").is_some_and(|h| rules.is_product_link(h)))
        .collect();

    if product_links.is_empty() {
        return Err(Unparseable::new("no product link"));
    }

    let url = match fragment.product_href.as_deref() {
        Some(href) => rules.normalize(href, &fragment.page_url),
        None => product_links
            .iter()
            .filter_map(|a| a.value().attr("href"))
            .find_map(|href| rules.normalize(href, &fragment.page_url)),
    }
    .ok_or_else(|| Unparseable::new("product link is not a valid URL"))?;

    // A shared block may hold other products; only this one's links name it
    let own_links: Vec<ElementRef<'_>> = product_links
        .into_iter()
        .filter(|a| {
            a.value()
                .attr("href")
                .and_then(|h| rules.normalize(h, &fragment.page_url))
                .is_some_and(|u| u == url)
        })
        .collect();

    let name = truncate_chars(&listing_name(&own_links), MAX_NAME_CHARS);
    let text = block_text(root);

    let mut record = ListingRecord::new(url, name, fragment.category.clone());
    record.price = extract_price(&text);
    record.location = extract_location(&text).map(|l| truncate_chars(&l, MAX_LOCATION_CHARS));
    record.seller = find_seller(root, &record, rules, &fragment.page_url)
        .map(|s| truncate_chars(&s, MAX_SELLER_CHARS));

    Ok(record)
}

/// Title text of the first product link that has one, else its tooltip or image alt
fn listing_name(product_links: &[ElementRef<'_>]) -> String {
    if let Some(text) = product_links
        .iter()
        .map(|a| inline_text(*a))
        .find(|t| t.chars().count() >= 3)
    {
        return text;
    }

    product_links
        .iter()
        .find_map(|a| {
            a.value()
                .attr("title")
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .or_else(|| {
                    a.select(&IMAGE)
                        .filter_map(|img| img.value().attr("alt"))
                        .map(str::trim)
                        .find(|alt| !alt.is_empty())
                        .map(str::to_string)
                })
        })
        .unwrap_or_default()
}

/// First price-looking run in the card text, e.g. "₹ 60,000 / Piece"
pub fn extract_price(text: &str) -> Option<String> {
    let found = PRICE.find(text)?.as_str();
    let first_line = found.lines().next().unwrap_or_default().trim();
    (!first_line.is_empty()).then(|| first_line.to_string())
}

/// First non-empty line after the "Contact Supplier" marker
pub fn extract_location(text: &str) -> Option<String> {
    let (_, after) = text.split_once(LOCATION_MARKER)?;
    after
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .map(str::to_string)
}

fn find_seller(
    root: ElementRef<'_>,
    record: &ListingRecord,
    rules: &LinkRules,
    page_url: &str,
) -> Option<String> {
    for anchor in root.select(&ANCHOR) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let Some(resolved) = rules.normalize(href, page_url) else {
            continue;
        };
        if resolved == record.url || rules.is_product_link(&resolved) {
            continue;
        }
        if !rules.is_supplier_link(&resolved) {
            continue;
        }

        let text = inline_text(anchor);
        if text.is_empty() || text == record.name {
            continue;
        }
        return Some(text);
    }

    None
}
