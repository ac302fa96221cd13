//! Sitemap fan-out
//!
//! The root sitemap must load; everything below it is best-effort. Index
//! documents are followed recursively and every sitemap URL is fetched at
//! most once, so cyclic indexes terminate.

use super::parser::{parse_sitemap, SitemapDocument};
use super::{SitemapError, SitemapResult};
use crate::config::HttpConfig;
use reqwest::header::{ACCEPT, USER_AGENT};
use reqwest::{redirect::Policy, Client};
use std::collections::{BTreeSet, HashSet, VecDeque};
use std::time::Duration;

/// Resolves sitemap URLs into page URLs
pub struct SitemapResolver {
    client: Client,
    user_agent: Option<String>,
    accept: String,
}

impl SitemapResolver {
    /// Creates a resolver using the sitemap settings of `http`
    ///
    /// Requests identify with the first configured identity string.
    pub fn new(http: &HttpConfig) -> SitemapResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(http.sitemap_timeout_secs))
            .redirect(Policy::limited(http.max_redirects))
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(SitemapError::Client)?;

        Ok(Self {
            client,
            user_agent: http.user_agents.first().cloned(),
            accept: http.sitemap_accept.clone(),
        })
    }

    /// Fetches one sitemap document; non-2xx statuses are errors
    pub async fn fetch_xml(&self, url: &str) -> SitemapResult<String> {
        let mut request = self.client.get(url).header(ACCEPT, self.accept.as_str());
        if let Some(user_agent) = &self.user_agent {
            request = request.header(USER_AGENT, user_agent.as_str());
        }

        let http_error = |source| SitemapError::Http {
            url: url.to_string(),
            source,
        };

        let response = request.send().await.map_err(http_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(SitemapError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(http_error)
    }

    /// Resolves `root_url` into a sorted, de-duplicated list of page URLs
    ///
    /// A failure to fetch or parse the root is returned as an error. Child
    /// sitemaps that fail are logged and skipped.
    pub async fn resolve(&self, root_url: &str) -> SitemapResult<Vec<String>> {
        tracing::info!("Fetching sitemap {}", root_url);

        let mut pages = BTreeSet::new();
        let mut seen = HashSet::from([root_url.to_string()]);
        let mut pending = VecDeque::new();

        let root = parse_sitemap(&self.fetch_xml(root_url).await?)?;
        absorb(root_url, root, &mut pages, &mut pending, &mut seen);

        while let Some(child) = pending.pop_front() {
            tracing::info!("Parsing child sitemap: {}", child);

            let document = match self.load(&child).await {
                Ok(document) => document,
                Err(e) => {
                    tracing::warn!("Skipping child sitemap {}: {}", child, e);
                    continue;
                }
            };

            absorb(&child, document, &mut pages, &mut pending, &mut seen);
        }

        tracing::info!("Total unique URLs: {}", pages.len());
        Ok(pages.into_iter().collect())
    }

    async fn load(&self, url: &str) -> SitemapResult<SitemapDocument> {
        let xml = self.fetch_xml(url).await?;
        parse_sitemap(&xml)
    }
}

/// Merges one document into the running result
fn absorb(
    source: &str,
    document: SitemapDocument,
    pages: &mut BTreeSet<String>,
    pending: &mut VecDeque<String>,
    seen: &mut HashSet<String>,
) {
    match document {
        SitemapDocument::Index(children) => {
            tracing::debug!("{} is an index of {} sitemaps", source, children.len());
            for child in children {
                if seen.insert(child.clone()) {
                    pending.push_back(child);
                }
            }
        }
        SitemapDocument::UrlSet(urls) => {
            tracing::debug!("{} lists {} URLs", source, urls.len());
            pages.extend(urls);
        }
        SitemapDocument::Unknown => {
            tracing::warn!("{} is neither a urlset nor a sitemap index", source);
        }
    }
}
