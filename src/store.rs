//! Legacy document store: which legacy pages exist and what they carried.

use std::path::Path;

use rusqlite::{Connection, OptionalExtension};

use crate::error::{MigrateError, Result};

pub fn connect(path: &Path) -> Result<Connection> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|e| MigrateError::io(dir, e))?;
    }
    let conn = Connection::open(path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL;")?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS legacy_pages (
            slug        TEXT PRIMARY KEY,
            title       TEXT,
            payload     TEXT,
            imported_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        ",
    )?;
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegacyPage {
    pub slug: String,
    pub title: Option<String>,
    /// Legacy CMS record, JSON-encoded as exported.
    pub payload: Option<String>,
}

impl LegacyPage {
    pub fn new(slug: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            title: None,
            payload: None,
        }
    }
}

pub fn find_page(conn: &Connection, slug: &str) -> Result<Option<LegacyPage>> {
    let page = conn
        .query_row(
            "SELECT slug, title, payload FROM legacy_pages WHERE slug = ?1",
            [slug],
            |row| {
                Ok(LegacyPage {
                    slug: row.get(0)?,
                    title: row.get(1)?,
                    payload: row.get(2)?,
                })
            },
        )
        .optional()?;
    Ok(page)
}

pub fn insert_pages(conn: &Connection, pages: &[LegacyPage]) -> Result<usize> {
    let tx = conn.unchecked_transaction()?;
    let mut count = 0;
    {
        let mut stmt = tx.prepare(
            "INSERT OR REPLACE INTO legacy_pages (slug, title, payload) VALUES (?1, ?2, ?3)",
        )?;
        for page in pages {
            count += stmt.execute(rusqlite::params![page.slug, page.title, page.payload])?;
        }
    }
    tx.commit()?;
    Ok(count)
}

pub fn count_pages(conn: &Connection) -> Result<i64> {
    Ok(conn.query_row("SELECT COUNT(*) FROM legacy_pages", [], |row| row.get(0))?)
}

/// Parse an import list: one page per line, `slug` or `slug<TAB>title`.
/// Blank lines and `#` comments are skipped; a leading `/` is dropped.
pub fn parse_import(text: &str) -> Vec<LegacyPage> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| {
            let (slug, title) = match line.split_once('\t') {
                Some((slug, title)) => (slug, Some(title.trim().to_string())),
                None => (line, None),
            };
            let mut page = LegacyPage::new(slug.trim().trim_start_matches('/'));
            page.title = title.filter(|t| !t.is_empty());
            page
        })
        .collect()
}
