use serde::Deserialize;

/// Identity strings rotated across requests when no pool is configured
pub const DEFAULT_USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Edg/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
];

/// Main configuration structure for Sitetrawl
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum BFS depth from the seed URL (seed = 0)
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Per-request timeout for page fetches (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Maximum number of queued frontier entries (0 = unbounded)
    #[serde(rename = "max-frontier")]
    pub max_frontier: usize,

    /// Seed for the identity rotation RNG; entropy when absent
    #[serde(rename = "identity-seed")]
    pub identity_seed: Option<u64>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: 2,
            request_timeout_secs: 15,
            max_frontier: 0,
            identity_seed: None,
        }
    }
}

/// Request header configuration shared by the crawler and sitemap resolver
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Pool of client identity strings rotated per request
    #[serde(rename = "user-agents")]
    pub user_agents: Vec<String>,

    /// Accept header for page fetches
    pub accept: String,

    /// Accept-Language header for page fetches
    #[serde(rename = "accept-language")]
    pub accept_language: String,

    /// Accept header for sitemap fetches
    #[serde(rename = "sitemap-accept")]
    pub sitemap_accept: String,

    /// Per-request timeout for sitemap fetches (seconds)
    #[serde(rename = "sitemap-timeout-secs")]
    pub sitemap_timeout_secs: u64,

    /// Maximum redirect hops followed per request
    #[serde(rename = "max-redirects")]
    pub max_redirects: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agents: DEFAULT_USER_AGENTS.iter().map(|s| s.to_string()).collect(),
            accept: "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"
                .to_string(),
            accept_language: "en-US,en;q=0.9".to_string(),
            sitemap_accept: "application/xml,text/xml;q=0.9,*/*;q=0.8".to_string(),
            sitemap_timeout_secs: 30,
            max_redirects: 10,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Path to the append-only JSON Lines results file
    #[serde(rename = "results-path")]
    pub results_path: String,

    /// Directory receiving chunked sitemap URL files
    #[serde(rename = "sitemap-dir")]
    pub sitemap_dir: String,

    /// Number of URLs per sitemap chunk file
    #[serde(rename = "sitemap-chunk-size")]
    pub sitemap_chunk_size: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            results_path: "crawl_result.jsonl".to_string(),
            sitemap_dir: "sitemap_output".to_string(),
            sitemap_chunk_size: 500,
        }
    }
}
