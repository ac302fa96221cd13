//! Integration tests for sitemap resolution
//!
//! A wiremock server plays the site; the resolver fetches, fans out over
//! index children and the chunk writer saves the result to a temp dir.

use sitetrawl::config::HttpConfig;
use sitetrawl::sitemap::{ChunkWriter, SitemapError, SitemapResolver};
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn urlset(locs: &[String]) -> String {
    let entries: String = locs
        .iter()
        .map(|loc| format!("<url><loc>{}</loc></url>", loc))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{}</urlset>"#,
        entries
    )
}

fn index(locs: &[String]) -> String {
    let entries: String = locs
        .iter()
        .map(|loc| format!("<sitemap><loc>{}</loc></sitemap>", loc))
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<sitemapindex xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">{}</sitemapindex>"#,
        entries
    )
}

fn xml(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "application/xml")
}

async fn mount(server: &MockServer, at: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(response)
        .mount(server)
        .await;
}

fn resolver() -> SitemapResolver {
    SitemapResolver::new(&HttpConfig::default()).expect("Failed to build resolver")
}

#[tokio::test]
async fn test_resolve_plain_urlset() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount(
        &server,
        "/sitemap.xml",
        xml(urlset(&[
            format!("{}/b", base),
            format!("{}/a", base),
            format!("{}/b", base),
        ])),
    )
    .await;

    let urls = resolver()
        .resolve(&format!("{}/sitemap.xml", base))
        .await
        .unwrap();

    assert_eq!(urls, vec![format!("{}/a", base), format!("{}/b", base)]);
}

#[tokio::test]
async fn test_resolve_index_fans_out_and_skips_failing_child() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount(
        &server,
        "/sitemap_index.xml",
        xml(index(&[
            format!("{}/posts.xml", base),
            format!("{}/missing.xml", base),
            format!("{}/pages.xml", base),
        ])),
    )
    .await;
    mount(
        &server,
        "/posts.xml",
        xml(urlset(&[format!("{}/post-2", base), format!("{}/post-1", base)])),
    )
    .await;
    mount(&server, "/missing.xml", ResponseTemplate::new(404)).await;
    mount(
        &server,
        "/pages.xml",
        xml(urlset(&[format!("{}/about", base), format!("{}/post-1", base)])),
    )
    .await;

    let urls = resolver()
        .resolve(&format!("{}/sitemap_index.xml", base))
        .await
        .unwrap();

    assert_eq!(
        urls,
        vec![
            format!("{}/about", base),
            format!("{}/post-1", base),
            format!("{}/post-2", base),
        ]
    );
}

#[tokio::test]
async fn test_nested_and_cyclic_indexes_terminate() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount(
        &server,
        "/root.xml",
        xml(index(&[format!("{}/nested.xml", base)])),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/nested.xml"))
        .respond_with(xml(index(&[
            format!("{}/root.xml", base),
            format!("{}/leaf.xml", base),
        ])))
        .expect(1)
        .mount(&server)
        .await;
    mount(&server, "/leaf.xml", xml(urlset(&[format!("{}/deep", base)]))).await;

    let urls = resolver()
        .resolve(&format!("{}/root.xml", base))
        .await
        .unwrap();

    assert_eq!(urls, vec![format!("{}/deep", base)]);
}

#[tokio::test]
async fn test_root_failure_is_fatal() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount(&server, "/sitemap.xml", ResponseTemplate::new(500)).await;

    let result = resolver()
        .resolve(&format!("{}/sitemap.xml", base))
        .await;

    assert!(matches!(
        result,
        Err(SitemapError::Status { status: 500, .. })
    ));
}

#[tokio::test]
async fn test_malformed_root_is_fatal() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount(
        &server,
        "/sitemap.xml",
        xml("<urlset><url><loc>x</url>".to_string()),
    )
    .await;

    let result = resolver()
        .resolve(&format!("{}/sitemap.xml", base))
        .await;

    assert!(matches!(result, Err(SitemapError::Xml(_))));
}

#[tokio::test]
async fn test_sends_configured_headers() {
    let server = MockServer::start().await;
    let base = server.uri();

    let mut http = HttpConfig::default();
    http.sitemap_accept = "application/xml".to_string();
    http.user_agents = vec!["SitemapTester/1.0".to_string()];

    Mock::given(method("GET"))
        .and(path("/sitemap.xml"))
        .and(header("accept", "application/xml"))
        .and(header("user-agent", "SitemapTester/1.0"))
        .respond_with(xml(urlset(&[format!("{}/a", base)])))
        .expect(1)
        .mount(&server)
        .await;

    let urls = SitemapResolver::new(&http)
        .unwrap()
        .resolve(&format!("{}/sitemap.xml", base))
        .await
        .unwrap();
    assert_eq!(urls.len(), 1);
}

#[tokio::test]
async fn test_resolve_then_save_chunks() {
    let server = MockServer::start().await;
    let base = server.uri();

    let locs: Vec<String> = (0..5).map(|i| format!("{}/p{}", base, i)).collect();
    mount(&server, "/sitemap.xml", xml(urlset(&locs))).await;

    let urls = resolver()
        .resolve(&format!("{}/sitemap.xml", base))
        .await
        .unwrap();

    let dir = TempDir::new().unwrap();
    let writer = ChunkWriter::new(dir.path().join("sitemap_output"), 2);
    let files = writer.save(&urls).unwrap();

    assert_eq!(files.len(), 3);
    let first = std::fs::read_to_string(writer.chunk_path(1)).unwrap();
    assert_eq!(
        first,
        format!(
            "{{\"url\":\"{}/p0\"}}\n{{\"url\":\"{}/p1\"}}\n",
            base, base
        )
    );
    let last = std::fs::read_to_string(writer.chunk_path(3)).unwrap();
    assert_eq!(last.lines().count(), 1);
}
