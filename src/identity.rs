//! Stable page ids across re-runs.

use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;
use uuid::Uuid;

use crate::error::{MigrateError, Result};

static ID_LINE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^id:\s*(.+)$").unwrap());

pub trait IdentityRegistry {
    /// Id already assigned to `key`, or a new one.
    fn get_or_create(&mut self, key: &str) -> Result<String>;
}

/// Reads the id back from a previously written page file; mints a UUID v4
/// when the file does not exist or carries no id.
#[derive(Debug, Clone)]
pub struct FileIdentityRegistry {
    dir: PathBuf,
}

impl FileIdentityRegistry {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl IdentityRegistry for FileIdentityRegistry {
    fn get_or_create(&mut self, key: &str) -> Result<String> {
        let path = self.dir.join(key);
        let existing = match std::fs::read_to_string(&path) {
            Ok(content) => ID_LINE_RE
                .captures(&content)
                .map(|caps| caps[1].trim().to_string())
                .filter(|id| !id.is_empty()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => return Err(MigrateError::io(path, e)),
        };
        Ok(existing.unwrap_or_else(|| Uuid::new_v4().to_string()))
    }
}

/// In-memory registry; ids live as long as the value.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    ids: std::collections::HashMap<String, String>,
}

#[cfg(test)]
impl IdentityRegistry for MemoryRegistry {
    fn get_or_create(&mut self, key: &str) -> Result<String> {
        Ok(self
            .ids
            .entry(key.to_string())
            .or_insert_with(|| Uuid::new_v4().to_string())
            .clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reuses_id_from_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("maine.1.md"),
            "---\nid: 3f0c2a9e-1111-4bbb-8ccc-000000000001\nblueprint: guide\n---\n",
        )
        .unwrap();
        let mut registry = FileIdentityRegistry::new(dir.path());
        assert_eq!(
            registry.get_or_create("maine.1.md").unwrap(),
            "3f0c2a9e-1111-4bbb-8ccc-000000000001"
        );
    }

    #[test]
    fn mints_uuid_for_new_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = FileIdentityRegistry::new(dir.path());
        let id = registry.get_or_create("business-taxes.maine-corp.md").unwrap();
        assert!(Uuid::parse_str(&id).is_ok());
    }

    #[test]
    fn memory_registry_is_stable_per_key() {
        let mut registry = MemoryRegistry::default();
        let a = registry.get_or_create("a.md").unwrap();
        assert_eq!(registry.get_or_create("a.md").unwrap(), a);
        assert_ne!(registry.get_or_create("b.md").unwrap(), a);
    }
}
