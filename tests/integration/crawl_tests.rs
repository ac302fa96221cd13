//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end against a real results file.

use sitetrawl::config::Config;
use sitetrawl::content::fingerprint;
use sitetrawl::crawler::{parse_html, Coordinator, CrawlStats};
use sitetrawl::storage::{
    read_records, CrawlRecord, JsonlStore, ResultStore, ResumeState, StorageError, StorageResult,
};
use sitetrawl::CrawlError;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Builds an HTML response with the given title and body markup
fn html_page(title: &str, body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(
        format!(
            "<html><head><title>{}</title></head><body>{}</body></html>",
            title, body
        ),
        "text/html",
    )
}

/// Mounts a page that must be fetched exactly `times` times
async fn mount(server: &MockServer, at: &str, response: ResponseTemplate, times: u64) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(response)
        .expect(times)
        .mount(server)
        .await;
}

/// Creates a test configuration writing to `results`
fn create_test_config(results: &Path, max_depth: u32) -> Config {
    let mut config = Config::default();
    config.crawler.max_depth = max_depth;
    config.crawler.request_timeout_secs = 1;
    config.crawler.identity_seed = Some(7);
    config.output.results_path = results.to_string_lossy().into_owned();
    config
}

fn results_path(dir: &TempDir) -> PathBuf {
    dir.path().join("crawl_result.jsonl")
}

/// Runs one crawl to completion against a fresh store handle
async fn run_crawl(config: &Config, seed: &str) -> CrawlStats {
    let store = JsonlStore::open(Path::new(&config.output.results_path))
        .expect("Failed to open results file");
    let seed = Url::parse(seed).expect("Failed to parse seed");
    let mut coordinator =
        Coordinator::new(config, seed, store).expect("Failed to create coordinator");
    coordinator.run().await.expect("Crawl failed")
}

fn records(path: &Path) -> Vec<CrawlRecord> {
    let scan = read_records(path).expect("Failed to read results");
    assert_eq!(scan.malformed, 0);
    scan.records
}

fn find<'a>(records: &'a [CrawlRecord], url: &str) -> &'a CrawlRecord {
    records
        .iter()
        .find(|r| r.url == url)
        .unwrap_or_else(|| panic!("no record for {}", url))
}

#[tokio::test]
async fn test_crawl_stays_on_seed_domain() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount(
        &server,
        "/a",
        html_page(
            "A",
            r#"<a href="/b">B</a> <a href="http://other.com/x">Elsewhere</a>"#,
        ),
        1,
    )
    .await;
    mount(&server, "/b", html_page("B", "<p>Second page</p>"), 1).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&results_path(&dir), 1);
    let stats = run_crawl(&config, &format!("{}/a", base)).await;

    let records = records(&results_path(&dir));
    let urls: Vec<&str> = records.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(urls, vec![format!("{}/a", base), format!("{}/b", base)]);

    let a = find(&records, &format!("{}/a", base));
    assert_eq!(a.depth, 0);
    assert_eq!(a.status_code, 200);
    assert_eq!(a.title, "A");

    let b = find(&records, &format!("{}/b", base));
    assert_eq!(b.depth, 1);
    assert!(b.is_canonical);
    assert!(!b.is_duplicate);

    assert_eq!(stats.persisted, 2);
    assert_eq!(stats.fetch_failures, 0);
}

#[tokio::test]
async fn test_depth_cutoff_never_fetches_deeper_pages() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount(&server, "/a", html_page("A", r#"<a href="/b">B</a>"#), 1).await;
    mount(&server, "/b", html_page("B", r#"<a href="/c">C</a>"#), 1).await;
    mount(&server, "/c", html_page("C", "too deep"), 0).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&results_path(&dir), 1);
    let stats = run_crawl(&config, &format!("{}/a", base)).await;

    assert_eq!(records(&results_path(&dir)).len(), 2);
    assert_eq!(stats.depth_dropped, 1);
}

#[tokio::test]
async fn test_declared_canonical_is_recorded() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount(&server, "/a", html_page("A", r#"<a href="/b">B</a>"#), 1).await;
    mount(
        &server,
        "/b",
        ResponseTemplate::new(200).set_body_raw(
            format!(
                r#"<html><head><title>B</title><link rel="canonical" href="{}/a"></head>
                <body>Printable version</body></html>"#,
                base
            ),
            "text/html",
        ),
        1,
    )
    .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&results_path(&dir), 1);
    run_crawl(&config, &format!("{}/a", base)).await;

    let records = records(&results_path(&dir));
    let b = find(&records, &format!("{}/b", base));
    assert_eq!(b.canonical, format!("{}/a", base));
    assert!(!b.is_canonical);

    let a = find(&records, &format!("{}/a", base));
    assert_eq!(a.canonical, a.url);
    assert!(a.is_canonical);
}

#[tokio::test]
async fn test_identical_text_marks_second_page_duplicate() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount(
        &server,
        "/a",
        html_page("Home", r#"<a href="/c">C</a><a href="/d">D</a>"#),
        1,
    )
    .await;
    mount(&server, "/c", html_page("Same", "<p>Same words here</p>"), 1).await;
    mount(
        &server,
        "/d",
        ResponseTemplate::new(200).set_body_raw(
            r#"<html><head><title>Same</title></head>
            <body><div class="other-markup"><span>Same words here</span></div></body></html>"#,
            "text/html",
        ),
        1,
    )
    .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&results_path(&dir), 2);
    let stats = run_crawl(&config, &format!("{}/a", base)).await;

    let records = records(&results_path(&dir));
    let c = find(&records, &format!("{}/c", base));
    let d = find(&records, &format!("{}/d", base));

    assert!(!c.is_duplicate);
    assert_eq!(c.duplicate_of, None);
    assert!(d.is_duplicate);
    assert_eq!(d.duplicate_of.as_deref(), Some(c.canonical.as_str()));
    assert_eq!(c.content_hash, d.content_hash);
    assert_eq!(stats.duplicates, 1);
}

#[tokio::test]
async fn test_duplicate_points_at_owner_canonical_not_its_own() {
    let server = MockServer::start().await;
    let base = server.uri();

    let with_canonical = |canonical: &str| {
        ResponseTemplate::new(200).set_body_raw(
            format!(
                r#"<html><head><title>Mirror</title><link rel="canonical" href="{}{}"></head>
                <body><p>Mirrored article text</p></body></html>"#,
                base, canonical
            ),
            "text/html",
        )
    };

    mount(
        &server,
        "/a",
        html_page("Home", r#"<a href="/c">C</a><a href="/d">D</a>"#),
        1,
    )
    .await;
    mount(&server, "/c", with_canonical("/main"), 1).await;
    mount(&server, "/d", with_canonical("/own"), 1).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&results_path(&dir), 1);
    run_crawl(&config, &format!("{}/a", base)).await;

    let records = records(&results_path(&dir));
    let c = find(&records, &format!("{}/c", base));
    let d = find(&records, &format!("{}/d", base));

    assert_eq!(c.canonical, format!("{}/main", base));
    assert!(!c.is_duplicate);

    assert!(d.is_duplicate);
    assert_eq!(d.canonical, format!("{}/own", base));
    assert!(!d.is_canonical);
    assert_eq!(d.duplicate_of, Some(format!("{}/main", base)));
}

#[tokio::test]
async fn test_non_duplicate_record_omits_duplicate_of_key() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount(&server, "/a", html_page("A", "<p>Only page</p>"), 1).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&results_path(&dir), 0);
    run_crawl(&config, &format!("{}/a", base)).await;

    let content = std::fs::read_to_string(results_path(&dir)).unwrap();
    let line: serde_json::Value = serde_json::from_str(content.trim()).unwrap();
    assert!(line.get("duplicate_of").is_none());
    assert_eq!(line["is_duplicate"], false);
    assert_eq!(line["word_count"], 3);
    // "A" is too short to count as a keyword
    assert_eq!(line["keyword_density"]["total_words"], 2);
}

#[tokio::test]
async fn test_resume_appends_nothing_new() {
    let server = MockServer::start().await;
    let base = server.uri();

    // Each page is fetched once per run
    mount(&server, "/a", html_page("A", r#"<a href="/b">B</a>"#), 2).await;
    mount(&server, "/b", html_page("B", "<p>Leaf</p>"), 2).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&results_path(&dir), 2);
    let seed = format!("{}/a", base);

    let first = run_crawl(&config, &seed).await;
    let before = std::fs::read_to_string(results_path(&dir)).unwrap();

    let second = run_crawl(&config, &seed).await;
    let after = std::fs::read_to_string(results_path(&dir)).unwrap();

    assert_eq!(first.persisted, 2);
    assert_eq!(second.persisted, 0);
    assert_eq!(second.already_scraped, 2);
    assert_eq!(before, after);
    assert_eq!(after.lines().count(), 2);
}

#[tokio::test]
async fn test_resume_keeps_fingerprint_owner() {
    let server = MockServer::start().await;
    let base = server.uri();
    let body = "<p>Shared article text</p>";

    mount(&server, "/a", html_page("Home", r#"<a href="/d">D</a>"#), 1).await;
    mount(&server, "/d", html_page("Copy", body), 1).await;

    // A previous run recorded the same text under another URL
    let dir = TempDir::new().unwrap();
    let results = results_path(&dir);
    let page_url = Url::parse(&format!("{}/d", base)).unwrap();
    let text = parse_html(
        &format!("<html><head><title>Copy</title></head><body>{}</body></html>", body),
        &page_url,
    )
    .text;
    let previous = serde_json::json!({
        "url": "http://old.example/original",
        "canonical": "http://old.example/original",
        "content_hash": fingerprint(&text),
    });
    std::fs::write(&results, format!("{}\n", previous)).unwrap();

    let config = create_test_config(&results, 1);
    run_crawl(&config, &format!("{}/a", base)).await;

    let scan = read_records(&results).unwrap();
    // The hand-written line lacks the full schema
    assert_eq!(scan.malformed, 1);

    let d = find(&scan.records, &format!("{}/d", base));
    assert!(d.is_duplicate);
    assert_eq!(d.duplicate_of.as_deref(), Some("http://old.example/original"));
}

#[tokio::test]
async fn test_non_html_is_skipped() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount(
        &server,
        "/a",
        html_page("A", r#"<a href="/doc.pdf">PDF</a><a href="/b">B</a>"#),
        1,
    )
    .await;
    mount(
        &server,
        "/doc.pdf",
        ResponseTemplate::new(200)
            .set_body_raw(r#"%PDF-1.4 <a href="/hidden">x</a>"#, "application/pdf"),
        1,
    )
    .await;
    mount(&server, "/hidden", html_page("Hidden", ""), 0).await;
    mount(&server, "/b", html_page("B", "<p>Page</p>"), 1).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&results_path(&dir), 2);
    let stats = run_crawl(&config, &format!("{}/a", base)).await;

    let records = records(&results_path(&dir));
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| !r.url.ends_with("/doc.pdf")));
    assert_eq!(stats.non_html, 1);
}

#[tokio::test]
async fn test_timeout_is_skipped_and_crawl_continues() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount(
        &server,
        "/a",
        html_page("A", r#"<a href="/slow">Slow</a><a href="/b">B</a>"#),
        1,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(html_page("Slow", "late").set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;
    mount(&server, "/b", html_page("B", "<p>Fast page</p>"), 1).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&results_path(&dir), 1);
    let stats = run_crawl(&config, &format!("{}/a", base)).await;

    let records = records(&results_path(&dir));
    let urls: Vec<&str> = records.iter().map(|r| r.url.as_str()).collect();
    assert_eq!(urls, vec![format!("{}/a", base), format!("{}/b", base)]);
    assert_eq!(stats.fetch_failures, 1);
}

#[tokio::test]
async fn test_http_error_page_is_recorded_with_status() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount(&server, "/a", html_page("A", r#"<a href="/gone">Gone</a>"#), 1).await;
    mount(
        &server,
        "/gone",
        ResponseTemplate::new(404).set_body_raw(
            "<html><head><title>Not Found</title></head><body>Missing</body></html>",
            "text/html",
        ),
        1,
    )
    .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&results_path(&dir), 1);
    run_crawl(&config, &format!("{}/a", base)).await;

    let records = records(&results_path(&dir));
    let gone = find(&records, &format!("{}/gone", base));
    assert_eq!(gone.status_code, 404);
    assert_eq!(gone.title, "Not Found");
}

#[tokio::test]
async fn test_cycles_and_query_variants_fetch_once() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount(
        &server,
        "/a",
        html_page(
            "A",
            r#"<a href="/b?x=1">B1</a><a href="/b?x=2">B2</a><a href="/b#top">B3</a>"#,
        ),
        1,
    )
    .await;
    mount(&server, "/b", html_page("B", r#"<a href="/a">Back</a>"#), 1).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&results_path(&dir), 5);
    let stats = run_crawl(&config, &format!("{}/a", base)).await;

    let records = records(&results_path(&dir));
    assert_eq!(records.len(), 2);
    assert_eq!(find(&records, &format!("{}/b", base)).depth, 1);
    assert_eq!(stats.fetched, 2);
}

/// Store whose writes always fail, as on a full disk
struct FullDiskStore;

impl ResultStore for FullDiskStore {
    fn append(&mut self, _record: &CrawlRecord) -> StorageResult<()> {
        Err(StorageError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            "no space left on device",
        )))
    }

    fn load_existing(&self) -> StorageResult<ResumeState> {
        Ok(ResumeState::default())
    }
}

#[tokio::test]
async fn test_store_failure_is_fatal() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount(&server, "/a", html_page("A", r#"<a href="/b">B</a>"#), 1).await;
    mount(&server, "/b", html_page("B", "never reached"), 0).await;

    let config = Config::default();
    let seed = Url::parse(&format!("{}/a", base)).unwrap();
    let mut coordinator = Coordinator::new(&config, seed, FullDiskStore).unwrap();

    let result = coordinator.run().await;
    assert!(matches!(result, Err(CrawlError::Storage(_))));
}
