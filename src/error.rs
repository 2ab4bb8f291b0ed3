use std::path::PathBuf;

/// Failures that can stop a page (or, at startup, the whole run).
#[derive(Debug, thiserror::Error)]
pub enum MigrateError {
    /// The source site answered with something other than 200.
    #[error("HTTP {status}: {url}")]
    Fetch { url: String, status: u16 },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The legacy path already has a redirect rule, so there is nothing live to fetch.
    #[error("path {0} already has a redirect rule")]
    RedirectedPathUnsupported(String),

    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("document store error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("tree error: {0}")]
    Tree(String),

    /// A routing table without the closing `];` of its returned array.
    #[error("route table {0:?} has no closing `];`")]
    RouteTable(PathBuf),
}

pub type Result<T> = std::result::Result<T, MigrateError>;

impl MigrateError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Fetch-class failures skip the page; everything else is a real fault.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            Self::Fetch { .. } | Self::Network(_) | Self::RedirectedPathUnsupported(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_error_display() {
        let err = MigrateError::Fetch {
            url: "https://bizee.com/maine-corporation".into(),
            status: 404,
        };
        assert_eq!(err.to_string(), "HTTP 404: https://bizee.com/maine-corporation");
        assert!(err.is_fetch_failure());
    }

    #[test]
    fn redirected_path_is_fetch_class() {
        let err = MigrateError::RedirectedPathUnsupported("/maine-corporation".into());
        assert!(err.is_fetch_failure());
        assert!(err.to_string().contains("/maine-corporation"));
    }

    #[test]
    fn io_error_is_not_fetch_class() {
        let err = MigrateError::io(
            "app/Routing/redirects.php",
            std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        );
        assert!(!err.is_fetch_failure());
        assert!(err.to_string().contains("redirects.php"));
    }
}
