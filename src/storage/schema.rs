//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the News-Harvest archive.

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- Harvested articles, one row per article URL
CREATE TABLE IF NOT EXISTS news (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL CHECK (length(title) > 0),
    content TEXT NOT NULL,
    publisher TEXT NOT NULL,
    reporter TEXT NOT NULL,
    published_at TEXT NOT NULL,
    url TEXT NOT NULL UNIQUE,
    category TEXT NOT NULL,
    thumbnail_url TEXT,
    crawled_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_news_category ON news(category);
CREATE INDEX IF NOT EXISTS idx_news_publisher ON news(publisher);

-- Track crawl runs
CREATE TABLE IF NOT EXISTS crawl_runs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    started_at TEXT NOT NULL,
    finished_at TEXT,
    config_hash TEXT NOT NULL,
    status TEXT NOT NULL,
    seeds_fetched INTEGER NOT NULL DEFAULT 0,
    links_found INTEGER NOT NULL DEFAULT 0,
    articles_collected INTEGER NOT NULL DEFAULT 0,
    rows_inserted INTEGER NOT NULL DEFAULT 0,
    rows_updated INTEGER NOT NULL DEFAULT 0,
    rows_failed INTEGER NOT NULL DEFAULT 0,
    error_message TEXT
);
"#;

/// Statement used for every article row
///
/// On a URL collision every non-key column takes the freshly crawled value.
pub const UPSERT_ARTICLE_SQL: &str = "
    INSERT INTO news (
        title, content, publisher, reporter, published_at,
        url, category, thumbnail_url, crawled_at
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
    ON CONFLICT(url) DO UPDATE SET
        title = excluded.title,
        content = excluded.content,
        publisher = excluded.publisher,
        reporter = excluded.reporter,
        published_at = excluded.published_at,
        category = excluded.category,
        thumbnail_url = excluded.thumbnail_url,
        crawled_at = excluded.crawled_at
";

/// Initializes the database schema
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Returns
///
/// * `Ok(())` - Schema initialized successfully
/// * `Err(rusqlite::Error)` - Failed to initialize schema
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
