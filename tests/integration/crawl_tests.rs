//! Integration tests for the crawler
//!
//! These tests use wiremock to serve a small paginated blog and run the
//! crawl end-to-end against it.

use mnamky::config::{Config, HttpConfig};
use mnamky::crawler::{build_http_client, crawl, PageParser};
use mnamky::entry::{SelectorTemplate, SiteTemplate};
use encoding_rs::WINDOWS_1250;
use mnamky::ScrapeError;
use std::path::Path;
use std::sync::Arc;
use tempfile::tempdir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Builds one entry container of the blog layout
fn entry_html(title: &str, slug: &str, image: Option<&str>) -> String {
    let img = match image {
        Some(src) => format!(
            r#"<img src="data:image/gif;base64,R0lGOD" data-srcset="{src} 360w, {src}?w=720 720w">"#
        ),
        None => r#"<img src="/static/placeholder.png">"#.to_string(),
    };
    format!(
        r#"<div class="entry-inner">
            <div class="entry-image">{img}</div>
            <div class="entry-body">
                <h2 class="entry-title"><a href="https://blog.example.com/{slug}" title="{title}">{title}</a></h2>
                <p class="entry-body__text">
                    About {slug}.
                </p>
            </div>
        </div>"#
    )
}

/// Builds a listing page with a pagination control pointing at `last_page`
fn listing_html(last_page: u32, entries: &[String]) -> String {
    format!(
        r#"<!DOCTYPE html>
        <html><head><title>Mňamky</title></head><body>
            <div class="entries">{}</div>
            <ul class="pagination">
                <li class="pagination-first"><a href="/mnamky?page=1">«</a></li>
                <li class="pagination-last"><a href="/mnamky?page={}">»</a></li>
            </ul>
        </body></html>"#,
        entries.join("\n"),
        last_page
    )
}

fn html_response(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=utf-8")
}

/// Mounts listing pages; page 1 is also served for the bare base URL
///
/// Pages past the first are mounted before page 1 because the bare path
/// matcher would otherwise answer them too.
async fn mount_listing(server: &MockServer, pages: &[String]) {
    for (index, body) in pages.iter().enumerate().skip(1) {
        Mock::given(method("GET"))
            .and(path("/mnamky"))
            .and(query_param("page", (index + 1).to_string()))
            .respond_with(html_response(body.clone()))
            .mount(server)
            .await;
    }

    Mock::given(method("GET"))
        .and(path("/mnamky"))
        .respond_with(html_response(pages[0].clone()))
        .mount(server)
        .await;
}

async fn parser_for(server: &MockServer, until_page: Option<u32>) -> Result<PageParser, ScrapeError> {
    let client = build_http_client(&HttpConfig::default()).expect("Failed to build client");
    let template: Arc<dyn SiteTemplate> =
        Arc::new(SelectorTemplate::blog().expect("Failed to build template"));
    PageParser::new(
        client,
        template,
        &format!("{}/mnamky", server.uri()),
        until_page,
    )
    .await
}

fn read_lines(path: &Path) -> Vec<String> {
    std::fs::read_to_string(path)
        .expect("Failed to read CSV")
        .lines()
        .map(str::to_string)
        .collect()
}

#[tokio::test]
async fn test_two_pages_numberless_entry_first() {
    let mock_server = MockServer::start().await;
    mount_listing(
        &mock_server,
        &[
            listing_html(2, &[entry_html("Mňamka #5: Buchty", "buchty", Some("https://cdn.example.com/buchty.jpg"))]),
            listing_html(2, &[entry_html("Zavřeno o svátcích", "zavreno", None)]),
        ],
    )
    .await;

    let dir = tempdir().expect("Failed to create temp dir");
    let output = dir.path().join("out").join("mnamky.csv");

    let parser = parser_for(&mock_server, None).await.expect("Discovery failed");
    let stats = parser
        .parse_and_export(Some(output.as_path()))
        .await
        .expect("Crawl failed");

    assert_eq!(stats.pages_visited, 2);
    assert_eq!(stats.entries, 2);
    assert_eq!(stats.numbered_entries, 1);
    assert_eq!(stats.entries_without_image, 1);

    let lines = read_lines(&output);
    assert_eq!(
        lines,
        vec![
            "title,summary,url,img_url".to_string(),
            "Zavřeno o svátcích,About zavreno.,https://blog.example.com/zavreno,no image".to_string(),
            "Mňamka #5: Buchty,About buchty.,https://blog.example.com/buchty,https://cdn.example.com/buchty.jpg".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_entries_sorted_across_pages() {
    let mock_server = MockServer::start().await;
    mount_listing(
        &mock_server,
        &[
            listing_html(
                3,
                &[
                    entry_html("Mňamka #9", "nine", None),
                    entry_html("Novinky", "news", None),
                ],
            ),
            listing_html(3, &[entry_html("Mňamka #2", "two", None)]),
            listing_html(
                3,
                &[
                    entry_html("Mňamka #", "empty", None),
                    entry_html("Mňamka #4", "four", None),
                ],
            ),
        ],
    )
    .await;

    let dir = tempdir().expect("Failed to create temp dir");
    let output = dir.path().join("all.csv");

    let parser = parser_for(&mock_server, None).await.expect("Discovery failed");
    parser
        .parse_and_export(Some(output.as_path()))
        .await
        .expect("Crawl failed");

    let slugs: Vec<String> = read_lines(&output)
        .iter()
        .skip(1)
        .map(|line| line.rsplit(',').nth(1).unwrap_or_default().to_string())
        .collect();

    assert_eq!(
        slugs,
        vec![
            "https://blog.example.com/news",
            "https://blog.example.com/empty",
            "https://blog.example.com/two",
            "https://blog.example.com/four",
            "https://blog.example.com/nine",
        ]
    );
}

#[tokio::test]
async fn test_until_page_limits_traversal() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/mnamky"))
        .and(query_param("page", "2"))
        .respond_with(html_response(listing_html(2, &[entry_html("b", "b", None)])))
        .expect(0) // Should never be called
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/mnamky"))
        .respond_with(html_response(listing_html(2, &[entry_html("a", "a", None)])))
        .mount(&mock_server)
        .await;

    let parser = parser_for(&mock_server, Some(1)).await.expect("Discovery failed");
    let entries = parser.parse_all().await.expect("Crawl failed");

    assert_eq!(parser.page_list().until_page(), 1);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].title(), "a");

    // Wiremock verifies the expect(0) when mock_server drops
}

#[tokio::test]
async fn test_until_page_clamped_to_last_page() {
    let mock_server = MockServer::start().await;
    mount_listing(
        &mock_server,
        &[
            listing_html(2, &[entry_html("a", "a", None)]),
            listing_html(2, &[entry_html("b", "b", None)]),
        ],
    )
    .await;

    let parser = parser_for(&mock_server, Some(10)).await.expect("Discovery failed");
    assert_eq!(parser.page_list().last_page(), 2);
    assert_eq!(parser.page_list().until_page(), 2);

    let entries = parser.parse_all().await.expect("Crawl failed");
    let titles: Vec<&str> = entries.iter().map(|e| e.title()).collect();
    assert_eq!(titles, vec!["a", "b"]);
}

#[tokio::test]
async fn test_fetch_entry_fragments_in_document_order() {
    let mock_server = MockServer::start().await;
    mount_listing(
        &mock_server,
        &[listing_html(
            1,
            &[
                entry_html("first", "first", None),
                entry_html("second", "second", None),
                entry_html("third", "third", None),
            ],
        )],
    )
    .await;

    let parser = parser_for(&mock_server, None).await.expect("Discovery failed");
    let fragments = parser.fetch_entry_fragments(1).await.expect("Fetch failed");

    assert_eq!(fragments.len(), 3);
    assert!(fragments[0].contains("title=\"first\""));
    assert!(fragments[2].contains("title=\"third\""));
    assert!(fragments.iter().all(|f| f.starts_with("<div class=\"entry-inner\">")));
}

#[tokio::test]
async fn test_page_cursor_walk() {
    let mock_server = MockServer::start().await;
    mount_listing(
        &mock_server,
        &[
            listing_html(3, &[entry_html("p1", "p1", None)]),
            listing_html(3, &[entry_html("p2", "p2", None)]),
            listing_html(3, &[entry_html("p3", "p3", None)]),
        ],
    )
    .await;

    let parser = parser_for(&mock_server, None).await.expect("Discovery failed");
    let mut pages = parser.pages();
    assert_eq!(pages.remaining(), 3);

    let first = pages.next_page().await.expect("page 1").expect("parse 1");
    assert_eq!(first.page, 1);
    assert_eq!(first.entries[0].title(), "p1");
    assert_eq!(pages.position(), 2);

    pages.seek(3).expect("seek");
    let third = pages.next_page().await.expect("page 3").expect("parse 3");
    assert_eq!(third.page, 3);
    assert_eq!(third.entries[0].title(), "p3");
    assert!(pages.next_page().await.is_none());
    assert_eq!(pages.remaining(), 0);

    pages.rewind();
    let again = pages.next_page().await.expect("page 1").expect("parse 1");
    assert_eq!(again.page, 1);

    assert!(matches!(
        pages.seek(4),
        Err(ScrapeError::PageOutOfRange { page: 4, last: 3 })
    ));
}

#[tokio::test]
async fn test_page_cursor_stays_on_failed_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/mnamky"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(500))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    mount_listing(
        &mock_server,
        &[
            listing_html(2, &[entry_html("p1", "p1", None)]),
            listing_html(2, &[entry_html("p2", "p2", None)]),
        ],
    )
    .await;

    let parser = parser_for(&mock_server, None).await.expect("Discovery failed");
    let mut pages = parser.pages();

    let first = pages.next_page().await.expect("page 1").expect("parse 1");
    assert_eq!(first.page, 1);

    let failed = pages.next_page().await.expect("page 2");
    assert!(matches!(failed, Err(ScrapeError::Status { status: 500, .. })));
    assert_eq!(pages.position(), 2);
    assert_eq!(pages.remaining(), 1);

    let retried = pages.next_page().await.expect("page 2").expect("parse 2");
    assert_eq!(retried.page, 2);
    assert_eq!(retried.entries[0].title(), "p2");
    assert!(pages.next_page().await.is_none());
}

#[tokio::test]
async fn test_windows_1250_page_declared_in_meta() {
    let mock_server = MockServer::start().await;

    let html = format!(
        r#"<!DOCTYPE html>
        <html><head><meta charset="windows-1250"><title>Mňamky</title></head><body>
            {}
            <ul class="pagination">
                <li class="pagination-last"><a href="/mnamky?page=1">»</a></li>
            </ul>
        </body></html>"#,
        entry_html("Mňamka #7: Švestkové knedlíky", "knedliky", None)
    );
    let (bytes, _, _) = WINDOWS_1250.encode(&html);

    // Served without a charset parameter, as older Czech hosts do
    Mock::given(method("GET"))
        .and(path("/mnamky"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(bytes.into_owned(), "text/html"))
        .mount(&mock_server)
        .await;

    let parser = parser_for(&mock_server, None).await.expect("Discovery failed");
    let entries = parser.parse_all().await.expect("Crawl failed");

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].title(), "Mňamka #7: Švestkové knedlíky");
    assert_eq!(entries[0].number(), Some(7));
}

#[tokio::test]
async fn test_one_request_per_page_in_sequence() {
    let mock_server = MockServer::start().await;
    mount_listing(
        &mock_server,
        &[
            listing_html(3, &[entry_html("Mňamka #3", "three", None)]),
            listing_html(3, &[entry_html("Mňamka #2", "two", None)]),
            listing_html(3, &[entry_html("Mňamka #1", "one", None)]),
        ],
    )
    .await;

    // Discovery plus one request per page, nothing repeated
    let parser = parser_for(&mock_server, None).await.expect("Discovery failed");
    let entries = parser.parse_all().await.expect("Crawl failed");
    assert_eq!(entries.len(), 3);

    let requests = mock_server
        .received_requests()
        .await
        .expect("Request recording disabled");
    assert_eq!(requests.len(), 4);
}

#[tokio::test]
async fn test_missing_pagination_fails_discovery() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/mnamky"))
        .respond_with(html_response(
            "<html><body><div class=\"entry-inner\"></div></body></html>".to_string(),
        ))
        .mount(&mock_server)
        .await;

    let result = parser_for(&mock_server, None).await;
    assert!(matches!(result, Err(ScrapeError::MissingElement { .. })));
}

#[tokio::test]
async fn test_server_error_aborts_without_output() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/mnamky"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/mnamky"))
        .respond_with(html_response(listing_html(2, &[entry_html("a", "a", None)])))
        .mount(&mock_server)
        .await;

    let dir = tempdir().expect("Failed to create temp dir");
    let output = dir.path().join("never.csv");

    let parser = parser_for(&mock_server, None).await.expect("Discovery failed");
    let result = parser.parse_and_export(Some(output.as_path())).await;

    assert!(matches!(result, Err(ScrapeError::Status { status: 500, .. })));
    assert!(!output.exists());
}

#[tokio::test]
async fn test_malformed_entry_fails_page() {
    let mock_server = MockServer::start().await;
    let broken = r#"<div class="entry-inner">
        <img data-srcset="x.jpg 360w">
        <div class="entry-body"><a href="/no-title">Untitled</a>
        <p class="entry-body__text">text</p></div>
    </div>"#
        .to_string();

    mount_listing(
        &mock_server,
        &[listing_html(1, &[entry_html("ok", "ok", None), broken])],
    )
    .await;

    let parser = parser_for(&mock_server, None).await.expect("Discovery failed");
    let result = parser.parse_page(1).await;

    assert!(matches!(
        result,
        Err(ScrapeError::MissingAttribute { ref attribute, .. }) if attribute == "title"
    ));
}

#[tokio::test]
async fn test_crawl_from_config() {
    let mock_server = MockServer::start().await;
    mount_listing(
        &mock_server,
        &[
            listing_html(2, &[entry_html("Mňamka #2", "two", None)]),
            listing_html(2, &[entry_html("Mňamka #1", "one", Some("https://cdn.example.com/1.jpg"))]),
        ],
    )
    .await;

    let dir = tempdir().expect("Failed to create temp dir");
    let output = dir.path().join("nested").join("export.csv");

    let mut config = Config::default();
    config.target.base_url = Some(format!("{}/mnamky", mock_server.uri()));
    config.output.csv_path = output.to_string_lossy().to_string();
    config.http.user_agent = Some("mnamky-test/1.0".to_string());

    let stats = crawl(&config).await.expect("Crawl failed");

    assert_eq!(stats.output_path, output);
    let lines = read_lines(&output);
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("Mňamka #1,"));
    assert!(lines[1].ends_with(",https://cdn.example.com/1.jpg"));
    assert!(lines[2].starts_with("Mňamka #2,"));
}

#[tokio::test]
async fn test_crawl_requires_base_url() {
    let result = crawl(&Config::default()).await;
    assert!(matches!(result, Err(ScrapeError::Config(_))));
}
