//! HTML handling for category index pages.
//!
//! [`fragments`] finds the repeated listing cards on a rendered page and the
//! link to the following page. [`listing`] turns one card into a
//! [`ListingRecord`](crate::results::ListingRecord).

pub mod fragments;
pub mod listing;

#[cfg(test)]
mod tests;

use scraper::{ElementRef, Selector};
use std::sync::LazyLock;

pub use fragments::{IndexPage, parse_index_page};
pub use listing::extract;

pub(crate) static ANCHOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("anchor selector is valid"));

pub(crate) static IMAGE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("img[alt]").expect("image selector is valid"));

/// Visible text of an element on a single line, whitespace collapsed
pub fn inline_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text nodes of an element, trimmed, empty ones dropped, one per line
pub fn block_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
