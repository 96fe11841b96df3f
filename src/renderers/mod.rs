pub mod memory;
pub mod webdriver;

use crate::error::RenderError;
use async_trait::async_trait;

pub use memory::MemoryRenderer;
pub use webdriver::WebDriverRenderer;

/// Produces fully rendered HTML for a URL.
///
/// One renderer serves a whole run: `render` is called repeatedly on the same
/// session and `close` exactly once at the end.
#[async_trait]
pub trait Renderer: Send {
    /// Navigate to `url` and return the page source once dynamic content has settled
    async fn render(&mut self, url: &str) -> Result<String, RenderError>;

    /// Release the underlying session. Further `render` calls fail.
    async fn close(&mut self);
}
