//! Configuration module for Sitetrawl
//!
//! Every setting has a built-in default, so a crawl can run with nothing but a
//! seed URL. An optional TOML file overrides the defaults, and command-line
//! flags override the file.
//!
//! # Example
//!
//! ```no_run
//! use sitetrawl::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("sitetrawl.toml")).unwrap();
//! println!("Crawler will use max depth: {}", config.crawler.max_depth);
//! ```

mod parser;
mod types;
mod validation;

pub use types::{Config, CrawlerConfig, HttpConfig, OutputConfig, DEFAULT_USER_AGENTS};

pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::{validate, validate_seed_url};
