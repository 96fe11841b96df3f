use crate::error::RenderError;
use crate::renderers::Renderer;
use async_trait::async_trait;
use std::collections::HashMap;

/// Serves pre-rendered pages from memory.
///
/// Useful for replaying saved index pages and for driving the pipeline in
/// tests. Unknown URLs fail with a navigation error.
#[derive(Debug, Default)]
pub struct MemoryRenderer {
    pages: HashMap<String, Result<String, RenderError>>,
    requests: Vec<String>,
    closed: bool,
}

impl MemoryRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `html` for `url`
    pub fn with_page(mut self, url: &str, html: impl Into<String>) -> Self {
        self.pages.insert(url.to_string(), Ok(html.into()));
        self
    }

    /// Fail every render of `url` with `error`
    pub fn with_failure(mut self, url: &str, error: RenderError) -> Self {
        self.pages.insert(url.to_string(), Err(error));
        self
    }

    /// URLs requested so far, in order
    pub fn requests(&self) -> &[String] {
        &self.requests
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

#[async_trait]
impl Renderer for MemoryRenderer {
    async fn render(&mut self, url: &str) -> Result<String, RenderError> {
        self.requests.push(url.to_string());

        if self.closed {
            return Err(RenderError::Navigation {
                url: url.to_string(),
                reason: "renderer is closed".to_string(),
            });
        }

        match self.pages.get(url) {
            Some(page) => page.clone(),
            None => Err(RenderError::Navigation {
                url: url.to_string(),
                reason: "no such page".to_string(),
            }),
        }
    }

    async fn close(&mut self) {
        self.closed = true;
    }
}
