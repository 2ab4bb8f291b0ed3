//! Run configuration: where the site checkout lives and how to reach the
//! legacy site. Built from CLI flags (and their env fallbacks) in `main`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{MigrateError, Result};
use crate::guide::Guide;
use crate::redirects::RedirectTable;

pub const DEFAULT_DB_PATH: &str = "data/legacy_pages.sqlite";
pub const DEFAULT_BASE_URL: &str = "https://bizee.com";

const GUIDES_DIR: &str = "content/collections/guides";
const TREE_FILE: &str = "content/trees/collections/guides.yaml";
const REDIRECTS_FILE: &str = "app/Routing/redirects.php";
const GONE_REDIRECTS_FILE: &str = "app/Routing/gone-redirects.php";
const RELEASED_PAGES_FILE: &str = "app/Routing/migration/released-pages.php";

#[derive(Debug, Clone)]
pub struct Config {
    /// Site checkout all content and routing paths hang off.
    pub root: PathBuf,
    pub db_path: PathBuf,
    pub base_url: String,
    /// Pause after each fetched page.
    pub delay: Duration,
    /// Extract and assemble, but write nothing.
    pub dry_run: bool,
}

impl Config {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            base_url: DEFAULT_BASE_URL.to_string(),
            delay: Duration::from_millis(500),
            dry_run: false,
        }
    }

    pub fn guides_dir(&self) -> PathBuf {
        self.root.join(GUIDES_DIR)
    }

    pub fn tree_path(&self) -> PathBuf {
        self.root.join(TREE_FILE)
    }

    pub fn redirects_path(&self) -> PathBuf {
        self.root.join(REDIRECTS_FILE)
    }

    pub fn gone_redirects_path(&self) -> PathBuf {
        self.root.join(GONE_REDIRECTS_FILE)
    }

    pub fn released_pages_path(&self) -> PathBuf {
        self.root.join(RELEASED_PAGES_FILE)
    }

    /// Full link-rewrite table for `guide`: its generated redirects plus both
    /// static routing tables. A missing table, released-pages list or tree
    /// document is an error; nothing is fetched without them.
    pub fn load_redirects(&self, guide: &Guide) -> Result<RedirectTable> {
        let retired = RedirectTable::parse_entries(&read(&self.redirects_path())?);
        let gone = RedirectTable::parse_entries(&read(&self.gone_redirects_path())?);
        require(&self.released_pages_path(), "released-pages list not found")?;
        require(&self.tree_path(), "tree document not found")?;
        let (retired_count, gone_count) = (retired.len(), gone.len());
        let table = RedirectTable::build(guide.generated_redirects(), retired, gone);
        tracing::debug!(
            rules = table.len(),
            retired = retired_count,
            gone = gone_count,
            "redirect table loaded"
        );
        Ok(table)
    }
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| MigrateError::io(path, e))
}

fn require(path: &Path, missing: &str) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(MigrateError::io(
            path,
            std::io::Error::new(std::io::ErrorKind::NotFound, missing),
        ))
    }
}
