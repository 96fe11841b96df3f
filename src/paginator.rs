use crate::config::Category;
use crate::filter::LinkRules;
use crate::parsers::parse_index_page;
use crate::renderers::Renderer;
use crate::results::ListingFragment;
use std::collections::HashSet;

/// One rendered index page and the listing cards found on it
#[derive(Debug, Clone)]
pub struct Page {
    pub url: String,
    /// 1-based position within the category
    pub number: usize,
    pub fragments: Vec<ListingFragment>,
}

/// Why a category's pagination ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    PageLimit,
    EmptyPage,
    NoNextPage,
    RenderFailed(String),
    AlreadyVisited(String),
}

/// Walks the index pages of one category, one rendered page per call.
///
/// The sequence is lazy and cannot be restarted: once `next_page` returns
/// `None` it keeps returning `None`.
pub struct Paginator<'a, R: Renderer + ?Sized> {
    renderer: &'a mut R,
    rules: &'a LinkRules,
    category: &'a Category,
    max_pages: Option<usize>,
    next_url: Option<String>,
    visited: HashSet<String>,
    pages_rendered: usize,
    stopped: Option<StopReason>,
}

impl<'a, R: Renderer + ?Sized> Paginator<'a, R> {
    /// `max_pages` of `None` or `Some(0)` means unlimited
    pub fn new(
        renderer: &'a mut R,
        category: &'a Category,
        max_pages: Option<usize>,
        rules: &'a LinkRules,
    ) -> Self {
        Self {
            renderer,
            rules,
            category,
            max_pages: max_pages.filter(|&n| n > 0),
            next_url: Some(category.index_url.clone()),
            visited: HashSet::new(),
            pages_rendered: 0,
            stopped: None,
        }
    }

    /// Render the next page and return its listing cards, or `None` when done
    pub async fn next_page(&mut self) -> Option<Page> {
        if self.stopped.is_some() {
            return None;
        }

        if let Some(limit) = self.max_pages {
            if self.pages_rendered >= limit {
                return self.stop(StopReason::PageLimit);
            }
        }

        let Some(url) = self.next_url.take() else {
            return self.stop(StopReason::NoNextPage);
        };

        if !self.visited.insert(url.clone()) {
            ::log::warn!(
                "[{}] pagination loops back to {}, stopping",
                self.category.name,
                url
            );
            return self.stop(StopReason::AlreadyVisited(url));
        }

        ::log::info!(
            "[{}] rendering page {}: {}",
            self.category.name,
            self.pages_rendered + 1,
            url
        );

        let html = match self.renderer.render(&url).await {
            Ok(html) => html,
            Err(e) => {
                ::log::warn!(
                    "[{}] giving up on category at page {} ({}): {}",
                    self.category.name,
                    self.pages_rendered + 1,
                    url,
                    e
                );
                return self.stop(StopReason::RenderFailed(url));
            }
        };
        self.pages_rendered += 1;

        let index = parse_index_page(&html, &url, &self.category.name, self.rules);
        if index.fragments.is_empty() {
            ::log::info!("[{}] no listings on {}, end of results", self.category.name, url);
            return self.stop(StopReason::EmptyPage);
        }

        self.next_url = index.next_url;

        Some(Page {
            url,
            number: self.pages_rendered,
            fragments: index.fragments,
        })
    }

    /// Pages actually rendered so far, including a final empty page
    pub fn pages_rendered(&self) -> usize {
        self.pages_rendered
    }

    /// Set once the sequence has ended
    pub fn stop_reason(&self) -> Option<&StopReason> {
        self.stopped.as_ref()
    }

    fn stop(&mut self, reason: StopReason) -> Option<Page> {
        ::log::debug!("[{}] pagination stopped: {:?}", self.category.name, reason);
        self.stopped = Some(reason);
        None
    }
}
