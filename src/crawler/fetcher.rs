//! HTTP fetcher implementation
//!
//! This module handles all page requests for the crawler, including:
//! - Building the HTTP client with timeout and redirect policy
//! - Rotating the client identity (User-Agent) per request
//! - Sending the standard accept/language hints
//! - Classifying responses as HTML, non-HTML, or transport failures

use crate::config::{Config, HttpConfig};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, USER_AGENT};
use reqwest::{redirect::Policy, Client};
use std::time::Duration;

/// Upper bound for the connect phase of a request
const MAX_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Fetched an HTML page (any status code)
    Success {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Content-Type header value
        content_type: String,
        /// Page body content
        body: String,
    },

    /// Response is not HTML (Content-Type mismatch)
    ContentMismatch {
        /// HTTP status code
        status_code: u16,
        /// The actual Content-Type received
        content_type: String,
    },

    /// Transport failure (connection refused, timeout, DNS, body read)
    NetworkError {
        /// Error description
        error: String,
    },
}

/// Fixed pool of client identities with an explicit random source
///
/// The pool is injected from configuration; selection uses a seedable RNG so
/// tests can make the rotation deterministic.
#[derive(Debug, Clone)]
pub struct IdentityPool {
    identities: Vec<String>,
    rng: StdRng,
}

impl IdentityPool {
    /// Creates a pool; `seed` fixes the selection sequence, `None` uses entropy
    pub fn new(identities: Vec<String>, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { identities, rng }
    }

    /// Picks the identity for the next request
    pub fn pick(&mut self) -> Option<&str> {
        self.identities.choose(&mut self.rng).map(String::as_str)
    }

    /// Returns the number of identities in the pool
    pub fn len(&self) -> usize {
        self.identities.len()
    }

    /// Returns whether the pool is empty
    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }
}

/// Builds an HTTP client with proper configuration
///
/// Redirects are followed up to the configured limit and the final response
/// is used. Compressed bodies are decoded transparently.
///
/// # Example
///
/// ```no_run
/// use sitetrawl::config::HttpConfig;
/// use sitetrawl::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(&HttpConfig::default(), Duration::from_secs(15)).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig, timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout.min(MAX_CONNECT_TIMEOUT))
        .redirect(Policy::limited(config.max_redirects))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Page fetcher used by the crawl coordinator
pub struct Fetcher {
    client: Client,
    identities: IdentityPool,
    accept: String,
    accept_language: String,
}

impl Fetcher {
    /// Creates a fetcher from the crawl configuration
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let timeout = Duration::from_secs(config.crawler.request_timeout_secs);
        let client = build_http_client(&config.http, timeout)?;

        Ok(Self {
            client,
            identities: IdentityPool::new(
                config.http.user_agents.clone(),
                config.crawler.identity_seed,
            ),
            accept: config.http.accept.clone(),
            accept_language: config.http.accept_language.clone(),
        })
    }

    /// Fetches a URL with a freshly picked identity
    ///
    /// There is no retry: a transport failure is reported once and the crawl
    /// moves on. HTTP error statuses are not failures; an HTML 404 page comes
    /// back as `Success` with its status code.
    pub async fn fetch(&mut self, url: &str) -> FetchResult {
        let mut request = self
            .client
            .get(url)
            .header(ACCEPT, self.accept.as_str())
            .header(ACCEPT_LANGUAGE, self.accept_language.as_str());

        if let Some(identity) = self.identities.pick() {
            tracing::trace!("Fetching {} as {}", url, identity);
            request = request.header(USER_AGENT, identity);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                return FetchResult::NetworkError {
                    error: describe_error(&e),
                }
            }
        };

        let status_code = response.status().as_u16();
        let final_url = response.url().to_string();

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        if !is_html(&content_type) {
            return FetchResult::ContentMismatch {
                status_code,
                content_type,
            };
        }

        match response.text().await {
            Ok(body) => FetchResult::Success {
                final_url,
                status_code,
                content_type,
                body,
            },
            Err(e) => FetchResult::NetworkError {
                error: describe_error(&e),
            },
        }
    }
}

/// Returns true if a Content-Type header denotes an HTML document
pub fn is_html(content_type: &str) -> bool {
    content_type.to_ascii_lowercase().contains("text/html")
}

fn describe_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        format!("Request timeout: {}", e)
    } else if e.is_connect() {
        format!("Connection failed: {}", e)
    } else {
        e.to_string()
    }
}
