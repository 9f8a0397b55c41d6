//! Integration tests for the harvesting pipeline
//!
//! These tests use wiremock to create mock HTTP servers and run the full
//! fetch, extract and persist cycle end-to-end against a temporary database.

use news_harvest::config::{Config, CrawlerConfig, HttpConfig, OutputConfig, SourceConfig};
use news_harvest::crawler::{crawl, Coordinator};
use news_harvest::storage::{
    open_storage, persist_articles, ArticleStore, PersistOutcome, RunStatus, SqliteStorage,
};
use news_harvest::NewsError;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LOCAL_ARTICLE_PATTERN: &str = r"^http://127\.0\.0\.1:\d+/article/\d+/\d+";

/// Creates a test configuration pointing at the mock server
fn create_test_config(seeds: Vec<String>, db_path: &str) -> Config {
    Config {
        source: SourceConfig {
            seeds,
            article_pattern: LOCAL_ARTICLE_PATTERN.to_string(),
        },
        crawler: CrawlerConfig {
            concurrency_limit: 4,
            fetch_retries: 2,
            retry_base_delay_ms: 10, // Very short for testing
            request_timeout_ms: 2000,
        },
        http: HttpConfig::default(),
        output: OutputConfig {
            database_path: db_path.to_string(),
        },
    }
}

fn article_html(title: &str, with_timestamp: bool) -> String {
    let timestamp = if with_timestamp {
        r#"<span class="media_end_head_info_datestamp_time _ARTICLE_DATE_TIME" data-date-time="2025-03-01 09:30:00">2025.03.01.</span>"#
    } else {
        ""
    };
    format!(
        r#"<html><head>
        <meta property="og:title" content="{title}" />
        <meta property="og:image" content="https://imgnews.example/{title}.jpg" />
        </head><body>
        <img class="media_end_head_top_logo_img" title="Test Press" />
        <em class="media_end_categorize_item">Economy</em>
        {timestamp}
        <span class="byline_s">Reporter {title}</span>
        <article id="dic_area">Paragraph one of {title}.<br/>Paragraph two.</article>
        </body></html>"#,
        title = title,
        timestamp = timestamp
    )
}

async fn mount_page(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html; charset=utf-8"),
        )
        .mount(server)
        .await;
}

fn db_path(dir: &TempDir) -> String {
    dir.path().join("news.db").to_string_lossy().to_string()
}

#[tokio::test]
async fn test_seed_links_filtered_in_source_order() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/section/101",
        format!(
            r#"<html><body>
            <a href="/article/001/2">Second story</a>
            <a href="{}/ranking">Ranking</a>
            <a href="{}/article/001/1">First story</a>
            </body></html>"#,
            base, base
        ),
    )
    .await;
    mount_page(&server, "/article/001/2", article_html("Two", true)).await;
    mount_page(&server, "/article/001/1", article_html("One", true)).await;

    let temp = TempDir::new().unwrap();
    let config = create_test_config(vec![format!("{}/section/101", base)], &db_path(&temp));

    let mut coordinator = Coordinator::new(&config).unwrap();
    let outcome = coordinator.run().await.unwrap();

    assert_eq!(outcome.stats.links_found, 2);
    let urls: Vec<&str> = outcome.records.iter().map(|a| a.url.as_str()).collect();
    assert_eq!(
        urls,
        vec![
            format!("{}/article/001/2", base),
            format!("{}/article/001/1", base),
        ]
    );
}

#[tokio::test]
async fn test_article_without_timestamp_is_not_persisted() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/section/100",
        r#"<a href="/article/002/10">Dated</a><a href="/article/002/11">Undated</a>"#.to_string(),
    )
    .await;
    mount_page(&server, "/article/002/10", article_html("Dated", true)).await;
    mount_page(&server, "/article/002/11", article_html("Undated", false)).await;

    let temp = TempDir::new().unwrap();
    let config = create_test_config(vec![format!("{}/section/100", base)], &db_path(&temp));

    let report = crawl(&config, "hash").await.unwrap();
    assert_eq!(report.stats.records_extracted, 1);
    assert_eq!(report.stats.records_rejected, 1);
    assert_eq!(report.persisted.rows_affected(), 1);

    let storage = SqliteStorage::new(Path::new(&config.output.database_path)).unwrap();
    assert_eq!(storage.count_articles().unwrap(), 1);
    assert!(storage
        .get_article_by_url(&format!("{}/article/002/11", base))
        .unwrap()
        .is_none());

    let stored = storage
        .get_article_by_url(&format!("{}/article/002/10", base))
        .unwrap()
        .unwrap();
    assert_eq!(stored.title, "Dated");
    assert_eq!(stored.publisher, "Test Press");
    assert_eq!(stored.category, "Economy");
    assert_eq!(stored.content, "Paragraph one of Dated.\nParagraph two.");
}

#[tokio::test]
async fn test_shared_article_fetched_once() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/section/100",
        r#"<a href="/article/003/1">Shared</a><a href="/article/003/2">Only here</a>"#.to_string(),
    )
    .await;
    mount_page(
        &server,
        "/section/101",
        format!(r#"<a href="{}/article/003/1">Shared again</a>"#, base),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/article/003/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string(article_html("Shared", true)))
        .expect(1)
        .mount(&server)
        .await;
    mount_page(&server, "/article/003/2", article_html("Solo", true)).await;

    let temp = TempDir::new().unwrap();
    let config = create_test_config(
        vec![
            format!("{}/section/100", base),
            format!("{}/section/101", base),
        ],
        &db_path(&temp),
    );

    let report = crawl(&config, "hash").await.unwrap();
    assert_eq!(report.stats.links_found, 2);
    assert_eq!(report.stats.records_extracted, 2);

    let upsert = report.persisted.report().unwrap();
    assert_eq!(upsert.inserted, 2);
    assert!(upsert.failures.is_empty());
}

#[tokio::test]
async fn test_empty_record_list_is_nothing_to_persist() {
    let temp = TempDir::new().unwrap();
    let mut storage = open_storage(&temp.path().join("news.db")).unwrap();

    let outcome = persist_articles(&mut storage, &[]).unwrap();

    assert_eq!(outcome, PersistOutcome::NothingToPersist);
    assert_eq!(outcome.rows_affected(), 0);
    assert_eq!(storage.count_articles().unwrap(), 0);
}

#[tokio::test]
async fn test_run_without_links_completes_with_nothing_to_persist() {
    let server = MockServer::start().await;
    let base = server.uri();
    mount_page(&server, "/", r#"<a href="/about">About</a>"#.to_string()).await;

    let temp = TempDir::new().unwrap();
    let config = create_test_config(vec![format!("{}/", base)], &db_path(&temp));

    let report = crawl(&config, "hash").await.unwrap();
    assert_eq!(report.persisted, PersistOutcome::NothingToPersist);

    let storage = SqliteStorage::new(Path::new(&config.output.database_path)).unwrap();
    let run = storage.get_run(report.run_id).unwrap();
    assert_eq!(run.status, RunStatus::Completed);
    assert_eq!(run.counts.seeds_fetched, 1);
    assert_eq!(run.counts.articles_collected, 0);
}

#[tokio::test]
async fn test_rerun_updates_instead_of_duplicating() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/section/105",
        r#"<a href="/article/004/1">A</a><a href="/article/004/2">B</a>"#.to_string(),
    )
    .await;
    mount_page(&server, "/article/004/1", article_html("A", true)).await;
    mount_page(&server, "/article/004/2", article_html("B", true)).await;

    let temp = TempDir::new().unwrap();
    let config = create_test_config(vec![format!("{}/section/105", base)], &db_path(&temp));

    let first = crawl(&config, "hash").await.unwrap();
    let second = crawl(&config, "hash").await.unwrap();

    assert_eq!(first.persisted.report().unwrap().inserted, 2);
    let again = second.persisted.report().unwrap();
    assert_eq!(again.inserted, 0);
    assert_eq!(again.updated, 2);
    assert!(second.run_id > first.run_id);

    let storage = SqliteStorage::new(Path::new(&config.output.database_path)).unwrap();
    assert_eq!(storage.count_articles().unwrap(), 2);

    let latest = storage.get_latest_run().unwrap().unwrap();
    assert_eq!(latest.id, second.run_id);
    assert_eq!(latest.counts.rows_updated, 2);
}

#[tokio::test]
async fn test_failed_seed_is_skipped() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("GET"))
        .and(path("/section/102"))
        .respond_with(ResponseTemplate::new(503))
        .expect(2)
        .mount(&server)
        .await;
    mount_page(
        &server,
        "/section/103",
        r#"<a href="/article/005/1">Story</a>"#.to_string(),
    )
    .await;
    mount_page(&server, "/article/005/1", article_html("Story", true)).await;

    let temp = TempDir::new().unwrap();
    let config = create_test_config(
        vec![
            format!("{}/section/102", base),
            format!("{}/section/103", base),
        ],
        &db_path(&temp),
    );

    let report = crawl(&config, "hash").await.unwrap();
    assert_eq!(report.stats.seeds_requested, 2);
    assert_eq!(report.stats.seeds_fetched, 1);
    assert_eq!(report.persisted.rows_affected(), 1);
}

#[tokio::test]
async fn test_storage_failure_keeps_collected_records() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_page(
        &server,
        "/section/104",
        r#"<a href="/article/006/1">Story</a>"#.to_string(),
    )
    .await;
    mount_page(&server, "/article/006/1", article_html("Kept", true)).await;

    // Parent directory does not exist, so the database cannot be opened
    let temp = TempDir::new().unwrap();
    let unreachable = temp.path().join("missing").join("news.db");
    let config = create_test_config(
        vec![format!("{}/section/104", base)],
        &unreachable.to_string_lossy(),
    );

    match crawl(&config, "hash").await {
        Err(NewsError::Persist(failure)) => {
            assert_eq!(failure.outcome.records.len(), 1);
            assert_eq!(failure.outcome.records[0].title, "Kept");
            assert_eq!(failure.outcome.stats.records_extracted, 1);
        }
        other => panic!("expected a persist failure, got {:?}", other.map(|r| r.run_id)),
    }
}
