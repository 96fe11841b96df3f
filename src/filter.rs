use crate::config::SiteConfig;
use regex::Regex;
use url::Url;

/// Classifies and resolves the links found on listing pages
#[derive(Debug, Clone)]
pub struct LinkRules {
    config: SiteConfig,
    base_url: Url,
    product_regex: Regex,
}

impl Default for LinkRules {
    fn default() -> Self {
        Self::new(SiteConfig::default()).expect("Default site rules should be valid")
    }
}

impl LinkRules {
    /// Create link rules from site configuration
    pub fn new(config: SiteConfig) -> Result<Self, crate::Error> {
        let product_regex = Regex::new(&config.product_link_pattern)?;
        let base_url =
            Url::parse(&config.base_url).map_err(|source| crate::Error::InvalidBaseUrl {
                url: config.base_url.clone(),
                source,
            })?;

        Ok(Self {
            config,
            base_url,
            product_regex,
        })
    }

    /// Whether a raw href points at a product detail page
    pub fn is_product_link(&self, href: &str) -> bool {
        self.product_regex.is_match(href)
    }

    /// Resolve an href found on `page_url` into an absolute URL
    ///
    /// Category paths (`/impcat/...`) stay on the host they were found on,
    /// other root-relative paths and bare `proddetail/` or `company/` paths
    /// belong to the site base URL.
    pub fn normalize(&self, href: &str, page_url: &str) -> Option<String> {
        let href = href.trim();
        if href.is_empty() {
            return None;
        }

        let resolved = if let Some(rest) = href.strip_prefix("//") {
            Url::parse(&format!("https://{}", rest)).ok()?
        } else if href.starts_with("http://") || href.starts_with("https://") {
            Url::parse(href).ok()?
        } else if href.starts_with("/impcat/") || href.starts_with("impcat/") {
            let page = Url::parse(page_url).ok()?;
            page.join(&format!("/{}", href.trim_start_matches('/'))).ok()?
        } else if href.starts_with('/')
            || href.starts_with("proddetail/")
            || href.starts_with("company/")
        {
            self.base_url.join(href).ok()?
        } else {
            match Url::parse(page_url) {
                Ok(page) => page.join(href).ok()?,
                Err(_) => self.base_url.join(href).ok()?,
            }
        };

        if !matches!(resolved.scheme(), "http" | "https") {
            return None;
        }
        Some(self.normalize_url(&resolved).to_string())
    }

    /// Whether an absolute URL looks like a supplier storefront on the site
    pub fn is_supplier_link(&self, url: &str) -> bool {
        let Ok(parsed) = Url::parse(url) else {
            return false;
        };

        if !self.is_in_domain_scope(&parsed) {
            return false;
        }

        let path = parsed.path().trim_matches('/').to_lowercase();
        if path.is_empty() {
            return false;
        }

        let segments: Vec<&str> = path.split('/').collect();
        let first = segments[0];
        if self.config.non_supplier_segments.iter().any(|s| s == first) {
            return false;
        }

        first == "company" || segments.len() == 1
    }

    /// Check if a URL is on the site's domain or one of its subdomains
    fn is_in_domain_scope(&self, url: &Url) -> bool {
        let Some(host) = url.host_str() else {
            return false;
        };
        let host = host.to_lowercase();
        let domain = self.config.domain.to_lowercase();
        host == domain || host.ends_with(&format!(".{}", domain))
    }

    /// Create a normalized version of the URL (e.g., removing fragments)
    pub fn normalize_url(&self, url: &Url) -> Url {
        let mut normalized = url.clone();
        normalized.set_fragment(None);
        normalized
    }
}
