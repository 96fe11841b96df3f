use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Raw HTML of one listing card, as found on a category index page
#[derive(Debug, Clone)]
pub struct ListingFragment {
    /// Outer HTML of the listing card
    pub html: String,

    /// Index page the card was found on, used to resolve relative links
    pub page_url: String,

    /// Category the index page belongs to
    pub category: String,

    /// Raw href of the product link the card was found from. `None` means the
    /// first product link in the card.
    pub product_href: Option<String>,
}

/// Represents one extracted product listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingRecord {
    /// Product title (may be empty when the card has no readable title)
    pub name: String,

    /// Price as displayed, e.g. "₹ 60,000 / Piece"
    pub price: Option<String>,

    /// Supplier name
    pub seller: Option<String>,

    /// Supplier city / address line
    pub location: Option<String>,

    pub category: String,

    /// Absolute product URL; unique key of the result set
    pub url: String,

    /// Run start time, stamped by the pipeline
    pub scraped_at: Option<String>,
}

impl ListingRecord {
    /// Create a record with only the mandatory fields set
    pub fn new(url: String, name: String, category: String) -> Self {
        Self {
            name,
            price: None,
            seller: None,
            location: None,
            category,
            url,
            scraped_at: None,
        }
    }
}

/// Ordered listing records, unique by URL. The first record seen for a URL wins.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    records: Vec<ListingRecord>,
    seen: HashSet<String>,
}

impl ResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deduplicate an already collected list, keeping traversal order
    pub fn from_records(records: impl IntoIterator<Item = ListingRecord>) -> Self {
        let mut set = Self::new();
        for record in records {
            set.insert(record);
        }
        set
    }

    /// Adds a record unless its URL is already present. Returns whether it was kept.
    pub fn insert(&mut self, record: ListingRecord) -> bool {
        if self.seen.contains(&record.url) {
            ::log::trace!("Dropping duplicate listing: {}", record.url);
            return false;
        }
        self.seen.insert(record.url.clone());
        self.records.push(record);
        true
    }

    pub fn contains_url(&self, url: &str) -> bool {
        self.seen.contains(url)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[ListingRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ListingRecord> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a ListingRecord;
    type IntoIter = std::slice::Iter<'a, ListingRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
