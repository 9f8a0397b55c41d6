//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the ArticleStore trait.
//! The connection is owned by [`SqliteStorage`] and closed when it is dropped,
//! on success and error paths alike.

use crate::article::Article;
use crate::storage::schema::{initialize_schema, UPSERT_ARTICLE_SQL};
use crate::storage::traits::{ArticleStore, StorageError, StorageResult};
use crate::storage::{RowFailure, RunCounts, RunRecord, RunStatus, UpsertReport};
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

const ARTICLE_COLUMNS: &str = "title, content, publisher, reporter, published_at,
     url, category, thumbnail_url, crawled_at";

const RUN_COLUMNS: &str = "id, started_at, finished_at, config_hash, status,
     seeds_fetched, links_found, articles_collected, rows_inserted, rows_updated,
     rows_failed, error_message";

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(StorageError)` - Failed to open database
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }

    fn count_grouped(&self, column: &str) -> StorageResult<Vec<(String, u64)>> {
        let sql = format!(
            "SELECT {col}, COUNT(*) AS n FROM news GROUP BY {col} ORDER BY n DESC, {col} ASC",
            col = column
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as u64))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

fn article_from_row(row: &Row<'_>) -> rusqlite::Result<Article> {
    let crawled_at: String = row.get(8)?;
    let crawled_at = DateTime::parse_from_rfc3339(&crawled_at)
        .map(|stamp| stamp.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(8, Type::Text, Box::new(e)))?;

    Ok(Article {
        title: row.get(0)?,
        content: row.get(1)?,
        publisher: row.get(2)?,
        reporter: row.get(3)?,
        published_at: row.get(4)?,
        url: row.get(5)?,
        category: row.get(6)?,
        thumbnail_url: row.get(7)?,
        crawled_at,
    })
}

fn run_from_row(row: &Row<'_>) -> rusqlite::Result<RunRecord> {
    Ok(RunRecord {
        id: row.get(0)?,
        started_at: row.get(1)?,
        finished_at: row.get(2)?,
        config_hash: row.get(3)?,
        status: RunStatus::from_db_string(&row.get::<_, String>(4)?)
            .unwrap_or(RunStatus::Failed),
        counts: RunCounts {
            seeds_fetched: row.get::<_, i64>(5)? as u64,
            links_found: row.get::<_, i64>(6)? as u64,
            articles_collected: row.get::<_, i64>(7)? as u64,
            rows_inserted: row.get::<_, i64>(8)? as u64,
            rows_updated: row.get::<_, i64>(9)? as u64,
            rows_failed: row.get::<_, i64>(10)? as u64,
        },
        error_message: row.get(11)?,
    })
}

impl ArticleStore for SqliteStorage {
    // ===== Articles =====

    fn upsert_articles(&mut self, articles: &[Article]) -> StorageResult<UpsertReport> {
        let tx = self.conn.transaction()?;
        let mut report = UpsertReport::default();

        {
            let mut exists = tx.prepare("SELECT 1 FROM news WHERE url = ?1")?;
            let mut upsert = tx.prepare(UPSERT_ARTICLE_SQL)?;

            for article in articles {
                let existed = exists.exists(params![article.url])?;
                let result = upsert.execute(params![
                    article.title,
                    article.content,
                    article.publisher,
                    article.reporter,
                    article.published_at,
                    article.url,
                    article.category,
                    article.thumbnail_url,
                    article.crawled_at.to_rfc3339(),
                ]);

                match result {
                    Ok(_) if existed => report.updated += 1,
                    Ok(_) => report.inserted += 1,
                    Err(e) => report.failures.push(RowFailure {
                        url: article.url.clone(),
                        error: e.to_string(),
                    }),
                }
            }
        }

        tx.commit()?;
        Ok(report)
    }

    fn get_article_by_url(&self, url: &str) -> StorageResult<Option<Article>> {
        let sql = format!("SELECT {} FROM news WHERE url = ?1", ARTICLE_COLUMNS);
        let article = self
            .conn
            .query_row(&sql, params![url], article_from_row)
            .optional()?;
        Ok(article)
    }

    fn count_articles(&self) -> StorageResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM news", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn count_by_category(&self) -> StorageResult<Vec<(String, u64)>> {
        self.count_grouped("category")
    }

    fn count_by_publisher(&self) -> StorageResult<Vec<(String, u64)>> {
        self.count_grouped("publisher")
    }

    // ===== Run Ledger =====

    fn create_run(&mut self, config_hash: &str, started_at: DateTime<Utc>) -> StorageResult<i64> {
        self.conn.execute(
            "INSERT INTO crawl_runs (started_at, config_hash, status) VALUES (?1, ?2, ?3)",
            params![
                started_at.to_rfc3339(),
                config_hash,
                RunStatus::Running.to_db_string()
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn complete_run(&mut self, run_id: i64, counts: &RunCounts) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let updated = self.conn.execute(
            "UPDATE crawl_runs SET status = ?1, finished_at = ?2,
                 seeds_fetched = ?3, links_found = ?4, articles_collected = ?5,
                 rows_inserted = ?6, rows_updated = ?7, rows_failed = ?8
             WHERE id = ?9",
            params![
                RunStatus::Completed.to_db_string(),
                now,
                counts.seeds_fetched as i64,
                counts.links_found as i64,
                counts.articles_collected as i64,
                counts.rows_inserted as i64,
                counts.rows_updated as i64,
                counts.rows_failed as i64,
                run_id
            ],
        )?;

        if updated == 0 {
            return Err(StorageError::RunNotFound(run_id));
        }
        Ok(())
    }

    fn fail_run(&mut self, run_id: i64, message: &str) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let updated = self.conn.execute(
            "UPDATE crawl_runs SET status = ?1, finished_at = ?2, error_message = ?3 WHERE id = ?4",
            params![RunStatus::Failed.to_db_string(), now, message, run_id],
        )?;

        if updated == 0 {
            return Err(StorageError::RunNotFound(run_id));
        }
        Ok(())
    }

    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord> {
        let sql = format!("SELECT {} FROM crawl_runs WHERE id = ?1", RUN_COLUMNS);
        self.conn
            .query_row(&sql, params![run_id], run_from_row)
            .optional()?
            .ok_or(StorageError::RunNotFound(run_id))
    }

    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>> {
        let sql = format!(
            "SELECT {} FROM crawl_runs ORDER BY id DESC LIMIT 1",
            RUN_COLUMNS
        );
        let run = self.conn.query_row(&sql, [], run_from_row).optional()?;
        Ok(run)
    }
}
