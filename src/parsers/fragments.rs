use crate::filter::LinkRules;
use crate::parsers::{ANCHOR, inline_text};
use crate::results::ListingFragment;
use scraper::{ElementRef, Html};
use std::collections::HashSet;
use url::Url;

/// How far up from a product link the card search may climb
const MAX_CARD_DEPTH: usize = 15;

/// Product links with shorter text are image or icon links, not titles
const MIN_TITLE_CHARS: usize = 3;

const NEXT_LABELS: [&str; 6] = ["next", "next >", "next »", "›", "»", ">"];

/// Structural view of one rendered category index page
#[derive(Debug, Clone)]
pub struct IndexPage {
    pub fragments: Vec<ListingFragment>,
    pub next_url: Option<String>,
}

/// Finds the listing cards and the next-page link on a rendered index page
pub fn parse_index_page(
    html: &str,
    page_url: &str,
    category: &str,
    rules: &LinkRules,
) -> IndexPage {
    let doc = Html::parse_document(html);

    let fragments = locate_listings(&doc, page_url, rules)
        .into_iter()
        .map(|(card, href)| ListingFragment {
            html: card.html(),
            page_url: page_url.to_string(),
            category: category.to_string(),
            product_href: Some(href.to_string()),
        })
        .collect::<Vec<_>>();

    ::log::debug!("Found {} listing cards on {}", fragments.len(), page_url);

    IndexPage {
        fragments,
        next_url: find_next_page_url(&doc, page_url, rules),
    }
}

/// Returns one card element per product, in document order, paired with the
/// href of the product link that seeded it
pub fn locate_listings<'a>(
    doc: &'a Html,
    page_url: &str,
    rules: &LinkRules,
) -> Vec<(ElementRef<'a>, &'a str)> {
    let mut seen = HashSet::new();
    let mut cards = Vec::new();

    for seed in doc.select(&ANCHOR) {
        let Some(href) = seed.value().attr("href") else {
            continue;
        };
        if !rules.is_product_link(href) {
            continue;
        }
        if inline_text(seed).chars().count() < MIN_TITLE_CHARS {
            continue;
        }

        if seen.insert(product_key(href, page_url, rules)) {
            cards.push((listing_card(seed, page_url, rules), href));
        }
    }

    cards
}

/// The largest ancestor whose product links all point at the same product as `seed`.
///
/// Falls back to the nearest ancestor showing a price, then to the parent.
fn listing_card<'a>(seed: ElementRef<'a>, page_url: &str, rules: &LinkRules) -> ElementRef<'a> {
    let mut card = None;

    for ancestor in ancestors(seed) {
        let products: HashSet<String> = ancestor
            .select(&ANCHOR)
            .filter_map(|a| a.value().attr("href"))
            .filter(|h| rules.is_product_link(h))
            .map(|h| product_key(h, page_url, rules))
            .collect();
        if products.len() > 1 {
            break;
        }
        card = Some(ancestor);
    }

    if let Some(card) = card {
        return card;
    }

    ancestors(seed)
        .find(|a| a.text().any(|t| t.contains('₹') || t.contains("Rs")))
        .or_else(|| seed.parent().and_then(ElementRef::wrap))
        .unwrap_or(seed)
}

/// Identity of a product link: its resolved URL, or the raw href if it does not resolve
fn product_key(href: &str, page_url: &str, rules: &LinkRules) -> String {
    rules
        .normalize(href, page_url)
        .unwrap_or_else(|| href.trim().to_string())
}

/// Element ancestors of `element`, nearest first, stopping below `<body>`
fn ancestors(element: ElementRef<'_>) -> impl Iterator<Item = ElementRef<'_>> {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .take_while(|a| !matches!(a.value().name(), "body" | "html"))
        .take(MAX_CARD_DEPTH)
}

/// Locates the "next page" affordance and resolves it against the current page.
///
/// Product links are never taken for pagination, whatever their text.
pub fn find_next_page_url(doc: &Html, current_url: &str, rules: &LinkRules) -> Option<String> {
    let base = Url::parse(current_url).ok()?;
    let resolve = |href: &str| -> Option<String> {
        let href = href.trim();
        if href.is_empty() {
            return None;
        }
        let mut url = base.join(href).ok()?;
        if !matches!(url.scheme(), "http" | "https") {
            return None;
        }
        url.set_fragment(None);
        Some(url.to_string())
    };

    let rel_next = doc.select(&ANCHOR).find(|a| {
        a.value()
            .attr("rel")
            .is_some_and(|rel| rel.to_lowercase().split_whitespace().any(|t| t == "next"))
    });
    if let Some(next) = rel_next.and_then(|a| a.value().attr("href")).and_then(resolve) {
        return Some(next);
    }

    for anchor in doc.select(&ANCHOR) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        if rules.is_product_link(href) {
            continue;
        }
        let label = inline_text(anchor).to_lowercase();
        if !(NEXT_LABELS.contains(&label.as_str()) || label.starts_with("next")) {
            continue;
        }
        if let Some(candidate) = resolve(href) {
            if candidate != current_url && candidate != base.as_str() {
                return Some(candidate);
            }
        }
    }

    None
}
